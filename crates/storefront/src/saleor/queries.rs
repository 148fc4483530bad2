//! GraphQL operation definitions for the Saleor checkout API.

use graphql_client::GraphQLQuery;

// Scalar and extern enum types for the Saleor schema.
// Must be defined in the same module where GraphQLQuery derive is used.
#[allow(clippy::upper_case_acronyms)]
type UUID = duka_core::CheckoutToken;
type PositiveDecimal = rust_decimal::Decimal;
type LanguageCodeEnum = String;
type CountryCode = duka_core::CountryCode;

// Checkout query
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutByToken;

// Checkout mutations
#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutEmailUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutShippingAddressUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutBillingAddressUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutShippingMethodUpdate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutPaymentCreate;

#[derive(GraphQLQuery)]
#[graphql(
    schema_path = "graphql/saleor/schema.graphql",
    query_path = "graphql/saleor/queries/checkout.graphql",
    extern_enums("LanguageCodeEnum", "CountryCode"),
    response_derives = "Debug, Clone"
)]
pub struct CheckoutComplete;
