//! Response decoding: strict parse, then salvage scan, then explicit failure.
//!
//! Models wrap JSON in prose or code fences even when told not to. The salvage
//! scan takes the greedy span from the first opening delimiter to the last
//! closing one and tries that instead. A reply that is already valid JSON of
//! the wrong kind is never salvaged. Decoding is all-or-nothing.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;

static OBJECT_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{[\s\S]*\}").expect("object span regex is valid"));

static ARRAY_OF_OBJECTS_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\s*\{[\s\S]*\}\s*\]").expect("array span regex is valid"));

/// Top-level JSON kind an operation expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope {
    Object,
    Array,
}

impl Envelope {
    fn salvage_pattern(self) -> &'static Regex {
        match self {
            Envelope::Object => &OBJECT_SPAN,
            Envelope::Array => &ARRAY_OF_OBJECTS_SPAN,
        }
    }

    fn admits(self, value: &Value) -> bool {
        match self {
            Envelope::Object => value.is_object(),
            Envelope::Array => value.is_array(),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Envelope::Object => "object",
            Envelope::Array => "array",
        }
    }
}

/// Why both decode attempts failed. The raw text is carried by the caller's error.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeFailure {
    pub reason: String,
}

/// Decodes `raw` into `T`, enforcing the envelope at both stages.
pub fn decode_response<T: DeserializeOwned>(raw: &str, envelope: Envelope) -> Result<T, DecodeFailure> {
    let direct = match decode_candidate::<T>(raw.trim(), envelope) {
        Ok(value) => return Ok(value),
        Err(CandidateError::WrongEnvelope(reason)) => {
            return Err(DecodeFailure {
                reason: format!("direct decode failed ({reason}); not salvaged"),
            })
        }
        Err(CandidateError::Invalid(reason)) => reason,
    };

    let Some(span) = envelope.salvage_pattern().find(raw) else {
        return Err(DecodeFailure {
            reason: format!(
                "direct decode failed ({direct}); no {} span found in response",
                envelope.as_str()
            ),
        });
    };

    decode_candidate::<T>(span.as_str(), envelope).map_err(|salvage| DecodeFailure {
        reason: format!(
            "direct decode failed ({direct}); salvaged span failed ({})",
            salvage.reason()
        ),
    })
}

enum CandidateError {
    /// Not JSON, or JSON of the expected kind with the wrong fields.
    Invalid(String),
    /// Well-formed JSON whose top level is the other kind.
    WrongEnvelope(String),
}

impl CandidateError {
    fn reason(&self) -> &str {
        match self {
            CandidateError::Invalid(reason) | CandidateError::WrongEnvelope(reason) => reason,
        }
    }
}

fn decode_candidate<T: DeserializeOwned>(text: &str, envelope: Envelope) -> Result<T, CandidateError> {
    let value: Value = serde_json::from_str(text)
        .map_err(|e| CandidateError::Invalid(format!("invalid JSON: {e}")))?;
    if !envelope.admits(&value) {
        return Err(CandidateError::WrongEnvelope(format!(
            "expected a JSON {}",
            envelope.as_str()
        )));
    }
    serde_json::from_value(value).map_err(|e| CandidateError::Invalid(format!("shape mismatch: {e}")))
}
