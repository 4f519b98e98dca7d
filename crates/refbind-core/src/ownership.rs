//! Field capability table.
//!
//! Every referenceable field maps to exactly one ownership category, which
//! decides the partition holding its References and whether callers must
//! supply an element index. Adding a field means adding a row.

use crate::{error::ReferenceError, form::FormPath, store::Partition};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Singular nested object owning the nested-object partition.
pub const APPOINTMENT: &str = "appointment";

/// Repeating object array whose elements own per-element partitions.
pub const CERTIFICATIONS: &str = "certifications";

/// Name of every reference list inside the record.
pub const REFERENCES: &str = "references";

///
/// Ownership
///

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ownership {
    /// Scalar field at the record root.
    Root,
    /// Element of a root-level string array, matched by `(field, content)`.
    RootArray,
    /// Scalar field of the `appointment` object.
    NestedObject,
    /// Scalar field of one `certifications` element.
    ArrayElement,
}

impl Ownership {
    #[must_use]
    pub const fn requires_index(self) -> bool {
        matches!(self, Self::RootArray | Self::ArrayElement)
    }

    #[must_use]
    pub const fn matches_by_content(self) -> bool {
        matches!(self, Self::RootArray)
    }
}

///
/// FieldSpec
///

#[derive(Clone, Copy, Debug)]
pub struct FieldSpec {
    pub field: &'static str,
    pub ownership: Ownership,
}

const BUILTIN_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        field: "company",
        ownership: Ownership::Root,
    },
    FieldSpec {
        field: "duration",
        ownership: Ownership::Root,
    },
    FieldSpec {
        field: "skills",
        ownership: Ownership::RootArray,
    },
    FieldSpec {
        field: "position",
        ownership: Ownership::NestedObject,
    },
    FieldSpec {
        field: "rank",
        ownership: Ownership::NestedObject,
    },
    FieldSpec {
        field: "name",
        ownership: Ownership::ArrayElement,
    },
    FieldSpec {
        field: "issuedBy",
        ownership: Ownership::ArrayElement,
    },
];

///
/// FieldTarget
///
/// A field identifier plus the element index the caller supplied.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct FieldTarget {
    pub field: String,
    #[serde(default)]
    pub element: Option<usize>,
}

impl FieldTarget {
    #[must_use]
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            element: None,
        }
    }

    #[must_use]
    pub fn at(field: impl Into<String>, element: usize) -> Self {
        Self {
            field: field.into(),
            element: Some(element),
        }
    }
}

///
/// Location
///
/// A classified field plus the element index it needs, if any.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Location {
    pub field: String,
    pub ownership: Ownership,
    pub element: Option<usize>,
}

impl Location {
    /// Partition holding this field's References.
    #[must_use]
    pub const fn partition(&self) -> Partition {
        match (self.ownership, self.element) {
            (Ownership::NestedObject, _) => Partition::NestedObject,
            (Ownership::ArrayElement, Some(index)) => Partition::ArrayElement(index),
            _ => Partition::Root,
        }
    }

    /// Path of the field's live value inside the form.
    #[must_use]
    pub fn value_path(&self) -> FormPath {
        let path = FormPath::root();

        match (self.ownership, self.element) {
            (Ownership::RootArray, Some(index)) => path.field(&self.field).index(index),
            (Ownership::NestedObject, _) => path.field(APPOINTMENT).field(&self.field),
            (Ownership::ArrayElement, Some(index)) => {
                path.field(CERTIFICATIONS).index(index).field(&self.field)
            }
            _ => path.field(&self.field),
        }
    }
}

///
/// FieldTable
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FieldTable {
    rows: BTreeMap<String, Ownership>,
}

impl FieldTable {
    /// Table holding only the built-in career-record fields.
    #[must_use]
    pub fn builtin() -> Self {
        let rows = BUILTIN_FIELDS
            .iter()
            .map(|spec| (spec.field.to_string(), spec.ownership))
            .collect();

        Self { rows }
    }

    #[must_use]
    pub fn is_builtin(field: &str) -> bool {
        BUILTIN_FIELDS.iter().any(|spec| spec.field == field)
    }

    /// Add or replace a row.
    pub fn insert(&mut self, field: impl Into<String>, ownership: Ownership) {
        self.rows.insert(field.into(), ownership);
    }

    pub fn classify(&self, field: &str) -> Result<Ownership, ReferenceError> {
        self.rows
            .get(field)
            .copied()
            .ok_or_else(|| ReferenceError::ambiguous(field))
    }

    /// Classify `field` and check the element index against its category.
    /// An index passed for a category that does not use one is dropped.
    pub fn locate(&self, field: &str, element: Option<usize>) -> Result<Location, ReferenceError> {
        let ownership = self.classify(field)?;

        let element = if ownership.requires_index() {
            Some(element.ok_or_else(|| ReferenceError::MissingElementIndex {
                field: field.to_string(),
            })?)
        } else {
            None
        };

        Ok(Location {
            field: field.to_string(),
            ownership,
            element,
        })
    }

    /// Fields of the given category, in name order.
    pub fn fields(&self, ownership: Ownership) -> impl Iterator<Item = &str> {
        self.rows
            .iter()
            .filter(move |(_, o)| **o == ownership)
            .map(|(field, _)| field.as_str())
    }
}

impl Default for FieldTable {
    fn default() -> Self {
        Self::builtin()
    }
}

///
/// TESTS
///
