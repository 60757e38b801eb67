use thiserror::Error;

/// Errors produced while building, encoding or signing a transaction.
///
/// Signature *verification* never produces an error: a signature that does not
/// match is reported as `false` by the `verify*` methods.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A request field is malformed or outside the range its encoded width allows.
    /// The caller can always recover by correcting the input.
    #[error("Validation error: {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// A value does not fit the slot the canonical layout gives it.
    /// Reaching this from a built transaction is a contract violation.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Key material could not be parsed for the requested scheme.
    #[error("Private key parse error: {0}")]
    PrivateKeyParse(String),

    #[error("Signature failure: {0}")]
    SignatureFailure(String),

    /// Signature bytes are syntactically invalid (bad hex, wrong length, bad point).
    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("JSON parse error: {0}")]
    JsonParse(String),
}

impl Error {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Error::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// True for the errors a caller fixes by supplying different key material.
    pub fn is_signing_error(&self) -> bool {
        matches!(self, Error::PrivateKeyParse(_) | Error::SignatureFailure(_))
    }

    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation { .. })
    }
}
