use std::fmt;
use std::io;

/// Errors that can occur while range-encoding or range-decoding a byte
/// stream.
///
/// This is the sticky error surface the coder keeps: once an `Encoder` or
/// `Decoder` observes one of these, every subsequent `encode`/`decode`
/// call is a no-op that returns the same error again.
#[derive(Debug)]
pub enum RcError {
    /// The underlying byte sink or byte source failed.
    Io(io::Error),
    /// A precondition that keeps the coder's arithmetic from overflowing
    /// was violated, e.g. a probability model total that would exceed
    /// `PM_MAX_FREQ`.
    TooBig(String),
    /// A caller precondition was violated: invalid alphabet size, symbol
    /// outside the reserved alphabet, updating a zero-frequency symbol.
    Invalid(String),
    /// The compressed stream is malformed: a cumulative value resolved to
    /// no symbol, a zero-frequency symbol was selected, or range
    /// underflowed even after underflow recovery.
    Data(String),
}

impl fmt::Display for RcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RcError::Io(e) => write!(f, "I/O error: {e}"),
            RcError::TooBig(msg) => write!(f, "value too large: {msg}"),
            RcError::Invalid(msg) => write!(f, "invalid argument: {msg}"),
            RcError::Data(msg) => write!(f, "corrupt stream: {msg}"),
        }
    }
}

impl std::error::Error for RcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RcError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for RcError {
    fn from(e: io::Error) -> Self {
        RcError::Io(e)
    }
}

/// Convenience alias used throughout this crate.
pub type Result<T> = std::result::Result<T, RcError>;
