//! Customer identity extraction.
//!
//! The upstream authenticator puts the customer id into a trusted request
//! header (see `AppState::identity_header`). This service never issues or
//! verifies credentials itself.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderName};
use axum::http::request::Parts;
use storefront_core::error::DomainError;
use storefront_core::model::CustomerId;

use crate::error::ApiError;
use crate::state::AppState;

fn customer_from_headers(headers: &HeaderMap, header: &HeaderName) -> Option<CustomerId> {
    let raw = headers.get(header)?.to_str().ok()?;
    raw.trim().parse().ok().map(CustomerId)
}

/// The identified customer. Rejects the request with 401 when the identity
/// header is missing or malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Customer(pub CustomerId);

impl FromRequestParts<AppState> for Customer {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        customer_from_headers(&parts.headers, &state.identity_header)
            .map(Self)
            .ok_or(ApiError(DomainError::Unauthenticated))
    }
}

/// The customer, if the request is identified. Never rejects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeCustomer(pub Option<CustomerId>);

impl FromRequestParts<AppState> for MaybeCustomer {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self(customer_from_headers(
            &parts.headers,
            &state.identity_header,
        )))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const HEADER: HeaderName = HeaderName::from_static("x-customer-id");

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(HEADER, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_numeric_header_yields_customer() {
        assert_eq!(
            customer_from_headers(&headers_with(" 42 "), &HEADER),
            Some(CustomerId(42))
        );
    }

    #[test]
    fn test_missing_header_yields_none() {
        assert_eq!(customer_from_headers(&HeaderMap::new(), &HEADER), None);
    }

    #[test]
    fn test_non_numeric_header_yields_none() {
        assert_eq!(customer_from_headers(&headers_with("alice"), &HEADER), None);
    }
}
