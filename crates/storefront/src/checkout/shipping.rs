//! Shipping method selection.

use crate::saleor::ShippingMethod;

/// Message shown when the address has no shipping method.
pub const NO_SHIPPING_METHOD: &str = "No shipping method is available for this address";

/// Pick the shipping method to submit: the first non-null entry.
#[must_use]
pub fn resolve_shipping_method(methods: &[Option<ShippingMethod>]) -> Option<&ShippingMethod> {
    methods.iter().flatten().next()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use duka_core::ShippingMethodId;

    use super::*;

    fn method(id: &str) -> ShippingMethod {
        ShippingMethod {
            id: ShippingMethodId::new(id),
            name: format!("Method {id}"),
            price: None,
        }
    }

    #[test]
    fn test_first_non_null_wins() {
        let methods = vec![None, Some(method("M-1")), Some(method("M-2"))];
        assert_eq!(
            resolve_shipping_method(&methods).unwrap().id.as_str(),
            "M-1"
        );
    }

    #[test]
    fn test_empty_or_all_null() {
        assert!(resolve_shipping_method(&[]).is_none());
        assert!(resolve_shipping_method(&[None, None]).is_none());
    }
}
