//! Core runtime for refbind: the career-record model, the form-binding
//! boundary, and the logic that binds per-field reference evidence to a
//! form value.
//!
//! ## Layout
//! - `ownership`: the capability table classifying referenceable fields.
//! - `store`: reference partitions inside the form value.
//! - `resolve`: find the Reference bound to a field.
//! - `sync`: add, update, and delete Sources with create/delete of the
//!   owning Reference.
//! - `session`: panel routing state and the last applied Source.
//! - `validate`: store invariants and stale-snapshot scan.

pub mod config;
pub mod error;
pub mod form;
pub mod model;
pub mod ownership;
pub mod resolve;
pub mod session;
pub mod store;
pub mod sync;
pub mod validate;

// test
#[cfg(test)]
mod test_support;

///
/// Prelude
///
/// Domain vocabulary only; errors and helpers stay in their modules.
///

pub mod prelude {
    pub use crate::{
        form::{FormBinding, FormPath, FormState},
        model::{CareerRecord, DateObtained, Reference, ReferenceType, Source, SourceDraft},
        ownership::{FieldTable, FieldTarget, Ownership},
        resolve::Resolver,
        session::{BindingSession, PanelMode},
        sync::{SourceMutation, Synchronizer},
    };
}
