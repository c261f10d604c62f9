//! Error types for filename and request parsing.
//!
//! Only two failure classes exist. Everything else the parser runs into is
//! recoverable and reported as a [`Diagnostic`](crate::diagnostics::Diagnostic)
//! instead.

/// Parser error.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// A filename could not be processed at all.
    ///
    /// Fatal for the whole batch: a listing containing such an entry cannot
    /// be matched reliably.
    #[error("Malformed filename {input:?}: {reason}")]
    MalformedInput {
        /// The offending filename.
        input: String,
        /// What was wrong with it.
        reason: String,
    },

    /// A request expression was rejected.
    ///
    /// Fatal for that request only.
    #[error("Bad request expression {expression:?}: {reason}")]
    Request {
        /// The offending expression.
        expression: String,
        /// What was wrong with it.
        reason: String,
    },
}

impl Error {
    /// Create a new MalformedInput error.
    pub fn malformed<I: Into<String>, R: Into<String>>(input: I, reason: R) -> Self {
        Self::MalformedInput {
            input: input.into(),
            reason: reason.into(),
        }
    }

    /// Create a new Request error.
    pub fn request<E: Into<String>, R: Into<String>>(expression: E, reason: R) -> Self {
        Self::Request {
            expression: expression.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error must abort a whole batch rather than one request.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::MalformedInput { .. })
    }
}

/// Result type alias using the parser Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::malformed("Series Vol 1", "file has no extension");
        assert_eq!(
            err.to_string(),
            "Malformed filename \"Series Vol 1\": file has no extension"
        );

        let err = Error::request("v1@3", "bad character '@'");
        assert_eq!(
            err.to_string(),
            "Bad request expression \"v1@3\": bad character '@'"
        );
    }

    #[test]
    fn test_fatality() {
        assert!(Error::malformed("x", "y").is_fatal());
        assert!(!Error::request("x", "y").is_fatal());
    }
}
