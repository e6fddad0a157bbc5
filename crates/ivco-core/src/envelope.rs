//! Response envelope printed by every `ivco` command.
//!
//! `data` carries the command's record (input echoes plus results), `meta`
//! describes the run and `errors` is only non-empty when the command failed,
//! in which case `data` is `null`.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{ProviderId, UtcDateTime, ValidationError};

/// Envelope layout version. Bump the minor part when fields are added.
pub const SCHEMA_VERSION: &str = "v1.0.0";

const MIN_REQUEST_ID_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub meta: EnvelopeMeta,
    pub data: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<EnvelopeError>,
}

impl<T> Envelope<T> {
    pub fn success(meta: EnvelopeMeta, data: T) -> Self {
        Self {
            meta,
            data,
            errors: Vec::new(),
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Envelope<Value> {
    /// Envelope for a command that produced no record.
    pub fn failure(meta: EnvelopeMeta, error: EnvelopeError) -> Self {
        Self {
            meta,
            data: Value::Null,
            errors: vec![error],
        }
    }
}

/// How a record was produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeMeta {
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    pub schema_version: String,
    pub generated_at: UtcDateTime,
    /// Providers consulted, in order. `local` for pure computations.
    pub source_chain: Vec<ProviderId>,
    pub latency_ms: u64,
    /// Non-fatal notes such as swapped confidence coefficients.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl EnvelopeMeta {
    /// Stamp a new record at the current [`SCHEMA_VERSION`].
    ///
    /// Repeated providers in `source_chain` collapse to their first entry.
    pub fn new(
        request_id: impl Into<String>,
        source_chain: Vec<ProviderId>,
        latency_ms: u64,
    ) -> Result<Self, ValidationError> {
        let request_id = request_id.into();
        if request_id.trim().len() < MIN_REQUEST_ID_LEN {
            return Err(ValidationError::InvalidRequestId);
        }

        let mut seen = HashSet::new();
        let source_chain = source_chain
            .into_iter()
            .filter(|provider| seen.insert(*provider))
            .collect::<Vec<_>>();
        if source_chain.is_empty() {
            return Err(ValidationError::EmptySourceChain);
        }

        Ok(Self {
            request_id,
            trace_id: None,
            schema_version: String::from(SCHEMA_VERSION),
            generated_at: UtcDateTime::now(),
            source_chain,
            latency_ms,
            warnings: Vec::new(),
        })
    }

    /// Attach a 32-hex-digit trace id. An all-zero id is rejected.
    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Result<Self, ValidationError> {
        let trace_id = trace_id.into();
        let valid = trace_id.len() == 32
            && trace_id.chars().all(|ch| ch.is_ascii_hexdigit())
            && trace_id.chars().any(|ch| ch != '0');
        if !valid {
            return Err(ValidationError::InvalidTraceId);
        }

        self.trace_id = Some(trace_id);
        Ok(self)
    }

    pub fn with_warnings<I, S>(mut self, warnings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.warnings.extend(warnings.into_iter().map(Into::into));
        self
    }
}

/// One entry of the `errors` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeError {
    /// Dotted lowercase category, e.g. `domain.terminal_growth`.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<ProviderId>,
}

impl EnvelopeError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let code = code.into();
        let message = message.into();

        if code.trim().is_empty() {
            return Err(ValidationError::EmptyErrorCode);
        }
        if message.trim().is_empty() {
            return Err(ValidationError::EmptyErrorMessage);
        }

        Ok(Self {
            code,
            message,
            source: None,
        })
    }

    pub fn with_source(mut self, source: ProviderId) -> Self {
        self.source = Some(source);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta() -> EnvelopeMeta {
        EnvelopeMeta::new("request-12345", vec![ProviderId::Local], 0).expect("valid meta")
    }

    #[test]
    fn meta_is_stamped_with_current_schema() {
        assert_eq!(meta().schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn short_request_id_is_rejected() {
        let err = EnvelopeMeta::new("req", vec![ProviderId::Local], 0).expect_err("too short");
        assert_eq!(err, ValidationError::InvalidRequestId);
    }

    #[test]
    fn source_chain_must_name_a_provider() {
        let err = EnvelopeMeta::new("request-12345", Vec::new(), 0).expect_err("must fail");
        assert_eq!(err, ValidationError::EmptySourceChain);
    }

    #[test]
    fn repeated_providers_collapse() {
        let meta = EnvelopeMeta::new(
            "request-12345",
            vec![ProviderId::Fmp, ProviderId::Fmp, ProviderId::Fmp],
            12,
        )
        .expect("valid meta");
        assert_eq!(meta.source_chain, vec![ProviderId::Fmp]);

        let meta = EnvelopeMeta::new(
            "request-12345",
            vec![ProviderId::Fmp, ProviderId::Local, ProviderId::Fmp],
            12,
        )
        .expect("valid meta");
        assert_eq!(meta.source_chain, vec![ProviderId::Fmp, ProviderId::Local]);
    }

    #[test]
    fn trace_id_must_be_non_zero_hex() {
        let err = meta()
            .with_trace_id("not-a-trace-id")
            .expect_err("must fail");
        assert_eq!(err, ValidationError::InvalidTraceId);

        let err = meta()
            .with_trace_id("0".repeat(32))
            .expect_err("all zero");
        assert_eq!(err, ValidationError::InvalidTraceId);

        let meta = meta()
            .with_trace_id("4bf92f3577b34da6a3ce929d0e0e4736")
            .expect("valid trace id");
        assert!(meta.trace_id.is_some());
    }

    #[test]
    fn blank_error_fields_are_rejected() {
        let err = EnvelopeError::new("", "message").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyErrorCode);

        let err = EnvelopeError::new("domain.par_value", " ").expect_err("must fail");
        assert_eq!(err, ValidationError::EmptyErrorMessage);
    }

    #[test]
    fn success_omits_error_list() {
        let envelope = Envelope::success(meta(), serde_json::json!({ "owner_earnings": 7 }));
        assert!(!envelope.is_failure());

        let rendered = serde_json::to_value(&envelope).expect("serializes");
        assert!(rendered.get("errors").is_none());
        assert_eq!(rendered["data"]["owner_earnings"], 7);
    }

    #[test]
    fn failure_nulls_data_and_names_provider() {
        let error = EnvelopeError::new("upstream.status", "upstream returned status 429")
            .expect("valid error")
            .with_source(ProviderId::Fmp);
        let envelope = Envelope::failure(meta(), error);
        assert!(envelope.is_failure());

        let rendered = serde_json::to_value(&envelope).expect("serializes");
        assert!(rendered["data"].is_null());
        assert_eq!(rendered["errors"][0]["code"], "upstream.status");
        assert_eq!(rendered["errors"][0]["source"], "fmp");
    }

    #[test]
    fn warnings_are_appended_in_order() {
        let meta = meta().with_warnings(["first", "second"]);
        assert_eq!(meta.warnings, vec!["first", "second"]);
    }
}
