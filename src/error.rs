//! Error types
//!
//! One enum covers every failure a call can report. An invalid signature is not an
//! error: verification reports it through [`VerifyResult`](crate::nr::VerifyResult).

/// Result type used throughout the crate
pub type NrResult<T> = Result<T, NrError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NrError {
    /// A required object was absent (wire boundary)
    NullPointer,
    /// An object carried the wrong type tag (wire boundary)
    ContextMismatch,
    /// The curve is defined over an extension field
    UnsupportedMode,
    /// Message representative is not in (0, n)
    MessageOutOfRange,
    /// Private key is not in [1, n-1]
    InvalidPrivateKey,
    /// An output buffer or scratch buffer is too small
    BufferTooSmall,
    /// Public key element length differs from the context's
    OutOfRange,
    /// A signature component is negative
    Range,
    /// Signing produced c == 0; retry with a fresh ephemeral key
    SignatureDegenerate,
    /// Field modulus or irreducible polynomial rejected
    InvalidField(String),
    /// Curve parameters rejected
    InvalidCurve(String),
    /// Coordinates do not describe a point of the curve
    InvalidPoint,
    /// The context's scratch pool has no free slots left
    PoolExhausted,
    /// Hex or JSON decoding failed
    Codec(String),
}

impl From<serde_json::Error> for NrError {
    fn from(err: serde_json::Error) -> Self {
        NrError::Codec(err.to_string())
    }
}

impl std::fmt::Display for NrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NrError::NullPointer => write!(f, "Required object is missing"),
            NrError::ContextMismatch => write!(f, "Object has the wrong type tag"),
            NrError::UnsupportedMode => write!(f, "Extension-field curves are not supported"),
            NrError::MessageOutOfRange => write!(f, "Message representative out of range"),
            NrError::InvalidPrivateKey => write!(f, "Invalid private key"),
            NrError::BufferTooSmall => write!(f, "Buffer too small"),
            NrError::OutOfRange => write!(f, "Public key length does not match the curve"),
            NrError::Range => write!(f, "Signature component is negative"),
            NrError::SignatureDegenerate => write!(f, "Degenerate signature (c == 0)"),
            NrError::InvalidField(s) => write!(f, "Invalid field: {}", s),
            NrError::InvalidCurve(s) => write!(f, "Invalid curve: {}", s),
            NrError::InvalidPoint => write!(f, "Point is not on the curve"),
            NrError::PoolExhausted => write!(f, "Scratch pool exhausted"),
            NrError::Codec(s) => write!(f, "Decoding error: {}", s),
        }
    }
}

impl std::error::Error for NrError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(NrError::BufferTooSmall.to_string(), "Buffer too small");
        assert_eq!(
            NrError::InvalidCurve("singular".into()).to_string(),
            "Invalid curve: singular"
        );
    }

    #[test]
    fn json_errors_convert() {
        let err = serde_json::from_str::<u32>("nope").unwrap_err();
        assert!(matches!(NrError::from(err), NrError::Codec(_)));
    }
}
