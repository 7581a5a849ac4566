//! # Editor Errors
//!
//! Every failure the core can hit. None of them is fatal: callers absorb
//! them locally and degrade to "nothing happened".
//!
//! | Variant                  | Recovery                                   |
//! |--------------------------|--------------------------------------------|
//! | `MalformedStorage`       | substitute an empty document               |
//! | `AmbiguousCursorContext` | decline to intercept the key event         |
//! | `UnmappableOffset`       | abort the single mutation, state untouched |
//! | `Io`                     | log and keep editing                       |

use std::fmt;

#[derive(Debug)]
pub enum EditorError {
    /// Persisted snapshot could not be decoded.
    MalformedStorage(String),
    /// The current line or selection could not be resolved.
    AmbiguousCursorContext(String),
    /// An absolute offset fell outside every node of the span table.
    UnmappableOffset { offset: usize, len: usize },
    Io(std::io::Error),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditorError::MalformedStorage(e) => write!(f, "malformed stored document: {e}"),
            EditorError::AmbiguousCursorContext(e) => write!(f, "ambiguous cursor context: {e}"),
            EditorError::UnmappableOffset { offset, len } => {
                write!(f, "offset {offset} cannot be mapped (text length {len})")
            }
            EditorError::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for EditorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EditorError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EditorError {
    fn from(e: std::io::Error) -> Self {
        EditorError::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_mentions_offset_and_length() {
        let err = EditorError::UnmappableOffset { offset: 12, len: 4 };
        assert_eq!(err.to_string(), "offset 12 cannot be mapped (text length 4)");
    }

    #[test]
    fn test_io_error_has_source() {
        use std::error::Error;
        let err = EditorError::from(std::io::Error::other("disk gone"));
        assert!(err.source().is_some());
        assert!(err.to_string().contains("disk gone"));
    }
}
