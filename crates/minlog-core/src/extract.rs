//! Axum extractor for transaction properties.
//!
//! Derives `client_id` and `x-transaction-id` from the request headers
//! through the router's [`CorrelationContext`]. A request without a
//! transaction id gets a generated one; the extractor never rejects.

use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::correlation::CorrelationContext;
use crate::properties::PropertyMap;

/// Transaction properties for the current request.
#[derive(Debug, Clone)]
pub struct TransactionProperties(pub PropertyMap);

#[async_trait]
impl<S> FromRequestParts<S> for TransactionProperties
where
    S: Send + Sync,
    CorrelationContext: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let ctx = CorrelationContext::from_ref(state);
        Ok(Self(ctx.derive_properties(Some(&parts.headers))))
    }
}
