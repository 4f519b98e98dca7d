use derive_more::Display;
use refbind_core::{
    config::ConfigError, error::ReferenceError, form::FormError, validate::StoreIssues,
};
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///
/// Any error aborts the requested action with no change to the form value.
/// UI handlers show `notice()` rather than the message.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    /// Generic notice shown to the user for any rejected action.
    pub const NOTICE: &'static str = "could not apply reference";

    #[must_use]
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }

    /// Map a core rejection raised by `origin`.
    pub(crate) fn reference(origin: ErrorOrigin, err: ReferenceError) -> Self {
        let kind = match &err {
            ReferenceError::InvalidIndex { .. } => ErrorKind::InvalidIndex,
            ReferenceError::AmbiguousOwnership { .. } => ErrorKind::AmbiguousOwnership,
            ReferenceError::MissingElementIndex { .. }
            | ReferenceError::ElementOutOfRange { .. } => ErrorKind::InvalidTarget,
            ReferenceError::Form(_) => ErrorKind::Form,
        };

        Self::new(kind, origin, err.to_string())
    }

    #[must_use]
    pub const fn notice(&self) -> &'static str {
        Self::NOTICE
    }

    #[must_use]
    pub fn display_with_kind(&self) -> String {
        format!("{}:{}: {}", self.origin, self.kind, self.message)
    }
}

impl From<FormError> for Error {
    fn from(err: FormError) -> Self {
        Self::new(ErrorKind::Form, ErrorOrigin::Form, err.to_string())
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorKind::Config, ErrorOrigin::Config, err.to_string())
    }
}

impl From<StoreIssues> for Error {
    fn from(err: StoreIssues) -> Self {
        let detail = err
            .issues()
            .iter()
            .map(|(path, messages)| format!("{path}: {}", messages.join("; ")))
            .collect::<Vec<_>>()
            .join(", ");

        Self::new(
            ErrorKind::InvalidStore,
            ErrorOrigin::Validate,
            format!("{err} ({detail})"),
        )
    }
}

///
/// ErrorKind
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Source index outside the Reference's Sources.
    #[display("invalid_index")]
    InvalidIndex,

    /// Field missing from the capability table.
    #[display("ambiguous_ownership")]
    AmbiguousOwnership,

    /// Element index missing or outside its array.
    #[display("invalid_target")]
    InvalidTarget,

    /// Draft submitted without a reference type.
    #[display("incomplete_source")]
    IncompleteSource,

    /// Action needs an open panel in a different mode.
    #[display("panel_state")]
    PanelState,

    /// Reference partitions break the store invariants.
    #[display("invalid_store")]
    InvalidStore,

    #[display("form")]
    Form,

    #[display("config")]
    Config,
}

///
/// ErrorOrigin
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    #[display("resolver")]
    Resolver,
    #[display("synchronizer")]
    Synchronizer,
    #[display("session")]
    Session,
    #[display("validate")]
    Validate,
    #[display("form")]
    Form,
    #[display("config")]
    Config,
}

///
/// TESTS
///
