//! Field-level reference binding for career-history forms.
//!
//! ## Crate layout
//! - `core`: runtime model, form boundary, resolver, synchronizer, session.
//! - `editor`: [`ReferenceEditor`], the surface UI handlers call.
//! - `error`: the public error taxonomy every core error converts into.
//!
//! The `prelude` mirrors what UI handler code needs.

pub use refbind_core as core;

pub mod editor;
pub mod error;

pub use editor::ReferenceEditor;
pub use error::{Error, ErrorKind, ErrorOrigin};

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Error, ErrorKind, ReferenceEditor,
        core::{
            config::BindingConfig,
            form::FormState,
            model::{
                Appointment, CareerRecord, Certification, DateObtained, Reference, ReferenceType,
                Source, SourceDraft,
            },
            ownership::FieldTarget,
            session::PanelMode,
            sync::{ReferenceEffect, SyncOutcome},
        },
    };
}
