//! Per-request webhook validation

use crate::label::{BranchLabel, LabelExtractor};
use crate::verify::verify_signature;
use common::{KeyDictionary, ValidationError, DEFAULT_KEY_LABEL};
use http::{HeaderMap, HeaderName};
use std::net::IpAddr;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DELIVERY_HEADER: &str = "x-github-delivery";

pub const SIGNATURE_HEADER: &str = "x-hub-signature";

pub const UNKNOWN_DELIVERY: &str = "<unknown>";

/// Checks each inbound webhook delivery against the loaded keys.
///
/// Holds no per-request state, so one validator can be shared across all
/// request handlers.
pub struct RequestValidator {
    keys: Arc<KeyDictionary>,
    extractor: Box<dyn LabelExtractor>,
    signature_header: HeaderName,
}

impl RequestValidator {
    pub fn new(keys: Arc<KeyDictionary>) -> Self {
        Self {
            keys,
            extractor: Box::new(BranchLabel),
            signature_header: HeaderName::from_static(SIGNATURE_HEADER),
        }
    }

    /// Read the signature from `header` instead of `X-Hub-Signature`
    pub fn with_signature_header(mut self, header: HeaderName) -> Self {
        self.signature_header = header;
        self
    }

    /// Replace the default branch-based label extraction
    pub fn with_extractor(mut self, extractor: impl LabelExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn keys(&self) -> &KeyDictionary {
        &self.keys
    }

    /// Validate one delivery before its body is parsed.
    ///
    /// `body` must be the raw bytes as received.
    pub fn validate(
        &self,
        headers: &HeaderMap,
        body: &[u8],
        ip: Option<IpAddr>,
    ) -> Result<(), ValidationError> {
        let label = self
            .extractor
            .extract(body)
            .unwrap_or_else(|| DEFAULT_KEY_LABEL.to_string());
        let secret = self.keys.secret_for(&label);
        let signature = self.signature(headers);

        debug!(
            "Validating webhook for key {} (signed: {}, key found: {})",
            label,
            signature.is_some(),
            secret.is_some()
        );

        if verify_signature(body, signature, secret) {
            return Ok(());
        }

        let err = ValidationError {
            key_label: label,
            webhook_id: delivery_id(headers).to_string(),
            ip,
        };
        warn!("{}", err);
        Err(err)
    }

    fn signature<'h>(&self, headers: &'h HeaderMap) -> Option<&'h str> {
        headers
            .get(&self.signature_header)
            // A header that is not visible ASCII can never match a hex digest
            .map(|v| v.to_str().unwrap_or(""))
    }
}

/// Delivery id of a webhook, or `<unknown>` when the header is missing
pub fn delivery_id(headers: &HeaderMap) -> &str {
    headers
        .get(DELIVERY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or(UNKNOWN_DELIVERY)
}
