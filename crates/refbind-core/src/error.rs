use crate::form::FormError;
use thiserror::Error as ThisError;

///
/// ReferenceError
///
/// Rejections raised by resolution and synchronization.
/// A missing Reference is not an error; resolvers return `Ok(None)` for it.
/// Every variant is raised before the form value is written.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ReferenceError {
    #[error("source index {index} out of range for '{field}' ({len} sources)")]
    InvalidIndex {
        field: String,
        index: usize,
        len: usize,
    },

    #[error("field '{field}' has no ownership classification")]
    AmbiguousOwnership { field: String },

    #[error("field '{field}' requires an element index")]
    MissingElementIndex { field: String },

    #[error("element index {index} out of range for '{array}' (len {len})")]
    ElementOutOfRange {
        array: String,
        index: usize,
        len: usize,
    },

    #[error(transparent)]
    Form(#[from] FormError),
}

impl ReferenceError {
    pub(crate) fn ambiguous(field: &str) -> Self {
        Self::AmbiguousOwnership {
            field: field.to_string(),
        }
    }
}
