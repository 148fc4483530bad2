//! Saleor API client implementation.
//!
//! Uses `graphql_client` operation definitions with `reqwest` 0.13 for HTTP.
//! Checkout snapshots are cached with `moka` and refreshed from every
//! mutation that returns the checkout.

use std::sync::Arc;

use duka_core::{AddressInput, CheckoutToken, Email, PaymentAttempt, PaymentId, ShippingMethodId};
use graphql_client::{GraphQLQuery, Response};
use moka::future::Cache;
use secrecy::ExposeSecret;
use tracing::{debug, instrument, warn};

use crate::config::SaleorConfig;

use super::conversions::{convert_checkout_update, convert_completion, convert_order};
use super::queries::{
    CheckoutBillingAddressUpdate, CheckoutByToken, CheckoutComplete, CheckoutEmailUpdate,
    CheckoutPaymentCreate, CheckoutShippingAddressUpdate, CheckoutShippingMethodUpdate,
    checkout_billing_address_update, checkout_by_token, checkout_complete, checkout_email_update,
    checkout_payment_create, checkout_shipping_address_update, checkout_shipping_method_update,
};
use super::types::{Checkout, CheckoutCompletion, CheckoutUpdate, CheckoutUserError, PaymentCreated};
use super::{GraphQLError, GraphQLErrorLocation, SaleorError};

/// Cache key: shipping method names in a snapshot are translated for the
/// locale of the request that fetched it.
type CheckoutKey = (CheckoutToken, String);

/// Build the `AddressInput` variables of an address mutation module.
macro_rules! address_variables {
    ($op:ident, $token:expr, $locale:expr, $address:expr) => {
        $op::Variables {
            token: $token.clone(),
            locale: $locale.to_string(),
            address: $op::AddressInput {
                first_name: Some($address.first_name.clone()),
                last_name: Some($address.last_name.clone()),
                company_name: None,
                street_address1: Some($address.street_address_1.clone()),
                street_address2: None,
                city: Some($address.city.clone()),
                city_area: None,
                postal_code: Some($address.postal_code.clone()),
                country: Some($address.country.clone()),
                country_area: None,
                phone: Some($address.phone.clone()),
            },
        }
    };
}

// =============================================================================
// SaleorClient
// =============================================================================

/// Client for the Saleor GraphQL API.
///
/// Cheap to clone; all clones share the HTTP connection pool and cache.
#[derive(Clone)]
pub struct SaleorClient {
    inner: Arc<SaleorClientInner>,
}

struct SaleorClientInner {
    client: reqwest::Client,
    endpoint: String,
    app_token: Option<String>,
    checkouts: Cache<CheckoutKey, Checkout>,
}

impl SaleorClient {
    /// Create a new Saleor API client.
    #[must_use]
    pub fn new(config: &SaleorConfig) -> Self {
        let checkouts = Cache::builder()
            .max_capacity(10_000)
            .time_to_live(config.cache_ttl)
            .support_invalidation_closures()
            .build();

        Self {
            inner: Arc::new(SaleorClientInner {
                client: reqwest::Client::new(),
                endpoint: config.api_url.clone(),
                app_token: config
                    .app_token
                    .as_ref()
                    .map(|t| t.expose_secret().to_string()),
                checkouts,
            }),
        }
    }

    /// Execute a GraphQL operation.
    async fn execute<Q: GraphQLQuery>(
        &self,
        variables: Q::Variables,
    ) -> Result<Q::ResponseData, SaleorError> {
        let request_body = Q::build_query(variables);

        let mut request = self
            .inner
            .client
            .post(&self.inner.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body);

        if let Some(token) = &self.inner.app_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();

        // Check for rate limiting
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SaleorError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let response_text = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                operation = request_body.operation_name,
                body = %response_text.chars().take(500).collect::<String>(),
                "Saleor API returned non-success status"
            );
            return Err(SaleorError::Status {
                status,
                body: response_text.chars().take(200).collect(),
            });
        }

        let response: Response<Q::ResponseData> = match serde_json::from_str(&response_text) {
            Ok(r) => r,
            Err(e) => {
                tracing::error!(
                    error = %e,
                    operation = request_body.operation_name,
                    body = %response_text.chars().take(500).collect::<String>(),
                    "Failed to parse Saleor GraphQL response"
                );
                return Err(SaleorError::Parse(e));
            }
        };

        if let Some(errors) = response.errors
            && !errors.is_empty()
        {
            debug!(errors = ?errors, "GraphQL errors in response");

            return Err(SaleorError::GraphQL(
                errors
                    .into_iter()
                    .map(|e| GraphQLError {
                        message: e.message,
                        locations: e.locations.map_or_else(Vec::new, |locs| {
                            locs.into_iter()
                                .map(|l| GraphQLErrorLocation {
                                    line: i64::from(l.line),
                                    column: i64::from(l.column),
                                })
                                .collect()
                        }),
                        path: e.path.map_or_else(Vec::new, |p| {
                            p.into_iter()
                                .map(|fragment| match fragment {
                                    graphql_client::PathFragment::Key(s) => {
                                        serde_json::Value::String(s)
                                    }
                                    graphql_client::PathFragment::Index(i) => {
                                        serde_json::Value::Number(i.into())
                                    }
                                })
                                .collect()
                        }),
                    })
                    .collect(),
            ));
        }

        response.data.ok_or_else(|| {
            tracing::error!(
                operation = request_body.operation_name,
                "Saleor GraphQL response has no data and no errors"
            );
            SaleorError::EmptyResponse(request_body.operation_name)
        })
    }

    /// Store the checkout carried by a mutation result.
    async fn remember(&self, locale: &str, update: &CheckoutUpdate) {
        if let Some(checkout) = &update.checkout {
            self.inner
                .checkouts
                .insert(
                    (checkout.token.clone(), locale.to_string()),
                    checkout.clone(),
                )
                .await;
        }
    }

    // =========================================================================
    // Checkout Query
    // =========================================================================

    /// Get a checkout by token, served from cache when fresh.
    ///
    /// Returns `Ok(None)` when the backend does not know the token.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(token = %token))]
    pub async fn checkout(
        &self,
        token: &CheckoutToken,
        locale: &str,
    ) -> Result<Option<Checkout>, SaleorError> {
        let key = (token.clone(), locale.to_string());
        if let Some(checkout) = self.inner.checkouts.get(&key).await {
            debug!("Cache hit for checkout");
            return Ok(Some(checkout));
        }

        let data = self
            .execute::<CheckoutByToken>(checkout_by_token::Variables {
                token: token.clone(),
                locale: locale.to_string(),
            })
            .await?;

        let Some(checkout) = data.checkout.map(Checkout::from) else {
            return Ok(None);
        };

        self.inner.checkouts.insert(key, checkout.clone()).await;

        Ok(Some(checkout))
    }

    // =========================================================================
    // Checkout Mutations (not cached - results refresh the cache)
    // =========================================================================

    /// Set the shopper email on a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails. User errors are returned
    /// in the [`CheckoutUpdate`].
    #[instrument(skip(self, email), fields(token = %token))]
    pub async fn update_email(
        &self,
        token: &CheckoutToken,
        locale: &str,
        email: &Email,
    ) -> Result<CheckoutUpdate, SaleorError> {
        let data = self
            .execute::<CheckoutEmailUpdate>(checkout_email_update::Variables {
                token: token.clone(),
                email: email.as_str().to_string(),
                locale: locale.to_string(),
            })
            .await?;

        let update = data
            .checkout_email_update
            .map(|p| convert_checkout_update(p.checkout, p.errors))
            .ok_or(SaleorError::EmptyResponse("checkoutEmailUpdate"))?;
        self.remember(locale, &update).await;
        Ok(update)
    }

    /// Set the shipping address on a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, address), fields(token = %token))]
    pub async fn update_shipping_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        let data = self
            .execute::<CheckoutShippingAddressUpdate>(address_variables!(
                checkout_shipping_address_update,
                token,
                locale,
                address
            ))
            .await?;

        let update = data
            .checkout_shipping_address_update
            .map(|p| convert_checkout_update(p.checkout, p.errors))
            .ok_or(SaleorError::EmptyResponse("checkoutShippingAddressUpdate"))?;
        self.remember(locale, &update).await;
        Ok(update)
    }

    /// Set the billing address on a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, address), fields(token = %token))]
    pub async fn update_billing_address(
        &self,
        token: &CheckoutToken,
        locale: &str,
        address: &AddressInput,
    ) -> Result<CheckoutUpdate, SaleorError> {
        let data = self
            .execute::<CheckoutBillingAddressUpdate>(address_variables!(
                checkout_billing_address_update,
                token,
                locale,
                address
            ))
            .await?;

        let update = data
            .checkout_billing_address_update
            .map(|p| convert_checkout_update(p.checkout, p.errors))
            .ok_or(SaleorError::EmptyResponse("checkoutBillingAddressUpdate"))?;
        self.remember(locale, &update).await;
        Ok(update)
    }

    /// Select the shipping method on a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(token = %token, method = %method))]
    pub async fn update_shipping_method(
        &self,
        token: &CheckoutToken,
        locale: &str,
        method: &ShippingMethodId,
    ) -> Result<CheckoutUpdate, SaleorError> {
        let data = self
            .execute::<CheckoutShippingMethodUpdate>(checkout_shipping_method_update::Variables {
                token: token.clone(),
                shipping_method_id: method.as_str().to_string(),
                locale: locale.to_string(),
            })
            .await?;

        let update = data
            .checkout_shipping_method_update
            .map(|p| convert_checkout_update(p.checkout, p.errors))
            .ok_or(SaleorError::EmptyResponse("checkoutShippingMethodUpdate"))?;
        self.remember(locale, &update).await;
        Ok(update)
    }

    /// Create a payment for a checkout.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, payment), fields(token = %token, gateway = %payment.gateway))]
    pub async fn create_payment(
        &self,
        token: &CheckoutToken,
        payment: &PaymentAttempt,
    ) -> Result<PaymentCreated, SaleorError> {
        let data = self
            .execute::<CheckoutPaymentCreate>(checkout_payment_create::Variables {
                token: token.clone(),
                input: checkout_payment_create::PaymentInput {
                    gateway: payment.gateway.as_str().to_string(),
                    token: Some(payment.token.clone()),
                    amount: Some(payment.amount),
                    return_url: None,
                },
            })
            .await?;

        data.checkout_payment_create
            .map(|p| PaymentCreated {
                payment_id: p.payment.map(|payment| PaymentId::new(payment.id)),
                errors: p.errors.into_iter().map(CheckoutUserError::from).collect(),
            })
            .ok_or(SaleorError::EmptyResponse("checkoutPaymentCreate"))
    }

    /// Complete a checkout, turning it into an order.
    ///
    /// The cached snapshots are dropped whatever the outcome; a completed
    /// checkout no longer exists on the backend.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(token = %token))]
    pub async fn complete(&self, token: &CheckoutToken) -> Result<CheckoutCompletion, SaleorError> {
        let result = self
            .execute::<CheckoutComplete>(checkout_complete::Variables {
                token: token.clone(),
            })
            .await;
        self.invalidate_checkout(token).await;

        result?
            .checkout_complete
            .map(|p| {
                convert_completion(
                    p.order.map(|o| convert_order(o.id, o.number, o.status)),
                    p.confirmation_needed,
                    p.errors,
                )
            })
            .ok_or(SaleorError::EmptyResponse("checkoutComplete"))
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Forget every cached snapshot of a checkout, whatever its locale.
    pub async fn invalidate_checkout(&self, token: &CheckoutToken) {
        let token = token.clone();
        if let Err(e) = self
            .inner
            .checkouts
            .invalidate_entries_if(move |(cached, _), _| *cached == token)
        {
            warn!(error = %e, "Failed to invalidate cached checkout");
        }
        self.inner.checkouts.run_pending_tasks().await;
    }
}
