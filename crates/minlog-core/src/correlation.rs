//! Transaction properties derived from inbound headers.
//!
//! Reads `client_id` and `x-transaction-id` from the request. A request with
//! headers but no transaction id gets a freshly generated UUID v4. A request
//! with no headers at all yields an empty map and no id.

use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

use crate::format::format;
use crate::headers::HeaderLookup;
use crate::properties::{PropertyMap, CLIENT_ID, TRANSACTION_ID};
use crate::sink::{LogSink, TracingSink};

/// Tag of the line logged when a transaction id is generated.
pub const GENERATED_TAG: &str = "Generated x-transaction-id";

/// Correlation id, propagated verbatim or generated.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a new random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl From<&str> for CorrelationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives per-request transaction properties.
#[derive(Clone)]
pub struct CorrelationContext {
    sink: Arc<dyn LogSink>,
}

impl CorrelationContext {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Build the transaction properties for a request.
    ///
    /// `None` means no request context is available: the result is empty and
    /// nothing is logged. Otherwise `client_id` and `x-transaction-id` are
    /// copied when present, and a missing transaction id is generated and
    /// logged once.
    pub fn derive_properties<H>(&self, headers: Option<&H>) -> PropertyMap
    where
        H: HeaderLookup + ?Sized,
    {
        let mut properties = PropertyMap::new();
        let Some(headers) = headers else {
            return properties;
        };

        if let Some(client_id) = headers.latest(CLIENT_ID) {
            properties.insert(CLIENT_ID, client_id);
        }

        match headers.latest(TRANSACTION_ID) {
            Some(existing) => {
                properties.insert(TRANSACTION_ID, existing);
            }
            None => {
                let id = CorrelationId::generate();
                tracing::debug!(transaction_id = %id, "No inbound transaction id");
                properties.insert(TRANSACTION_ID, id.into_inner());
                self.sink.info(&format(GENERATED_TAG, &properties));
            }
        }

        properties
    }
}

impl Default for CorrelationContext {
    fn default() -> Self {
        Self::new(Arc::new(TracingSink::new()))
    }
}

impl fmt::Debug for CorrelationContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelationContext").finish_non_exhaustive()
    }
}
