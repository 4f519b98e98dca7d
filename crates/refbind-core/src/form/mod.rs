//! Form-binding boundary.
//!
//! The surrounding form library holds the whole record as one value tree.
//! Binding logic only touches that tree through [`FormBinding`]; reads return
//! values by copy and writes replace whole subtrees.

mod path;
mod state;

pub use path::{FormPath, PathSegment};
pub use state::FormState;

use serde_json::Value;
use thiserror::Error as ThisError;

///
/// FormError
///
/// Failures reading or writing the form value tree.
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum FormError {
    #[error("no value at '{path}'")]
    PathNotFound { path: String },

    #[error("expected {expected} at '{path}'")]
    TypeMismatch {
        path: String,
        expected: &'static str,
    },

    #[error("index {index} out of range at '{path}' (len {len})")]
    IndexOutOfRange {
        path: String,
        index: usize,
        len: usize,
    },

    #[error("cannot decode '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("cannot encode '{path}': {message}")]
    Encode { path: String, message: String },
}

impl FormError {
    pub(crate) fn not_found(path: &FormPath) -> Self {
        Self::PathNotFound {
            path: path.to_string(),
        }
    }

    pub(crate) fn type_mismatch(path: &FormPath, expected: &'static str) -> Self {
        Self::TypeMismatch {
            path: path.to_string(),
            expected,
        }
    }

    pub(crate) fn decode(path: &FormPath, err: &serde_json::Error) -> Self {
        Self::Decode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn encode(path: &FormPath, err: &serde_json::Error) -> Self {
        Self::Encode {
            path: path.to_string(),
            message: err.to_string(),
        }
    }
}

///
/// FormBinding
///
/// Get/set access over a tree-shaped form value, plus array helpers.
/// The array helpers default to read-modify-write through `get`/`set`, so an
/// implementation only needs the two primitives.
///

pub trait FormBinding {
    /// Read the current value at `path`, by value.
    fn get(&self, path: &FormPath) -> Option<Value>;

    /// Replace the value at `path` wholesale.
    fn set(&mut self, path: &FormPath, value: Value) -> Result<(), FormError>;

    fn append(&mut self, list: &FormPath, item: Value) -> Result<(), FormError> {
        let mut items = read_array(self, list)?;
        items.push(item);

        self.set(list, Value::Array(items))
    }

    fn update(&mut self, list: &FormPath, index: usize, item: Value) -> Result<(), FormError> {
        let mut items = read_array(self, list)?;
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| FormError::IndexOutOfRange {
            path: list.to_string(),
            index,
            len,
        })?;
        *slot = item;

        self.set(list, Value::Array(items))
    }

    fn remove(&mut self, list: &FormPath, index: usize) -> Result<Value, FormError> {
        let mut items = read_array(self, list)?;
        if index >= items.len() {
            return Err(FormError::IndexOutOfRange {
                path: list.to_string(),
                index,
                len: items.len(),
            });
        }
        let removed = items.remove(index);
        self.set(list, Value::Array(items))?;

        Ok(removed)
    }
}

fn read_array<F: FormBinding + ?Sized>(form: &F, list: &FormPath) -> Result<Vec<Value>, FormError> {
    match form.get(list) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(FormError::type_mismatch(list, "array")),
        None => Err(FormError::not_found(list)),
    }
}
