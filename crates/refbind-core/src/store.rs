//! Reference Store partitions.
//!
//! The store is not a separate structure: it is the three kinds of reference
//! lists living inside the form value. Lists are read by value and written
//! back whole; per-element lists are written back by replacing the element
//! inside a copy of the owning array.

use crate::{
    error::ReferenceError,
    form::{FormBinding, FormError, FormPath},
    model::Reference,
    ownership::{APPOINTMENT, CERTIFICATIONS, Location, Ownership, REFERENCES},
};
use serde_json::Value;
use std::fmt;

///
/// Partition
///

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Partition {
    Root,
    NestedObject,
    ArrayElement(usize),
}

impl Partition {
    /// Path of this partition's reference list.
    #[must_use]
    pub fn references_path(self) -> FormPath {
        match self {
            Self::Root => FormPath::root().field(REFERENCES),
            Self::NestedObject => FormPath::root().field(APPOINTMENT).field(REFERENCES),
            Self::ArrayElement(index) => FormPath::root()
                .field(CERTIFICATIONS)
                .index(index)
                .field(REFERENCES),
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.references_path())
    }
}

/// Read a partition's reference list by value. A missing list reads as empty.
pub fn read_references<F>(form: &F, partition: Partition) -> Result<Vec<Reference>, ReferenceError>
where
    F: FormBinding + ?Sized,
{
    if let Partition::ArrayElement(index) = partition {
        check_element(form, CERTIFICATIONS, index)?;
    }

    let path = partition.references_path();
    match form.get(&path) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(value) => serde_json::from_value(value)
            .map_err(|err| FormError::decode(&path, &err).into()),
    }
}

/// Write a whole partition back into the form.
pub fn write_references<F>(
    form: &mut F,
    partition: Partition,
    references: &[Reference],
) -> Result<(), ReferenceError>
where
    F: FormBinding + ?Sized,
{
    let path = partition.references_path();
    let encoded = serde_json::to_value(references).map_err(|err| FormError::encode(&path, &err))?;

    match partition {
        Partition::Root | Partition::NestedObject => form.set(&path, encoded)?,
        Partition::ArrayElement(index) => {
            let array_path = FormPath::root().field(CERTIFICATIONS);
            let mut elements = read_array(form, &array_path)?;
            let len = elements.len();

            let element = elements
                .get_mut(index)
                .ok_or_else(|| ReferenceError::ElementOutOfRange {
                    array: CERTIFICATIONS.to_string(),
                    index,
                    len,
                })?;
            let object = element
                .as_object_mut()
                .ok_or_else(|| FormError::type_mismatch(&array_path.clone().index(index), "object"))?;
            object.insert(REFERENCES.to_string(), encoded);

            form.set(&array_path, Value::Array(elements))?;
        }
    }

    Ok(())
}

/// Current value of the located field, as reference content.
pub fn live_content<F>(form: &F, location: &Location) -> Result<String, ReferenceError>
where
    F: FormBinding + ?Sized,
{
    match (location.ownership, location.element) {
        (Ownership::RootArray, Some(index)) => check_element(form, &location.field, index)?,
        (Ownership::ArrayElement, Some(index)) => check_element(form, CERTIFICATIONS, index)?,
        _ => {}
    }

    Ok(form
        .get(&location.value_path())
        .map(|value| content_of(&value))
        .unwrap_or_default())
}

/// Render a field value the way it is stored in `Reference::content`.
#[must_use]
pub fn content_of(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn read_array<F>(form: &F, path: &FormPath) -> Result<Vec<Value>, ReferenceError>
where
    F: FormBinding + ?Sized,
{
    match form.get(path) {
        Some(Value::Array(items)) => Ok(items),
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(_) => Err(FormError::type_mismatch(path, "array").into()),
    }
}

fn check_element<F>(form: &F, array: &str, index: usize) -> Result<(), ReferenceError>
where
    F: FormBinding + ?Sized,
{
    let len = read_array(form, &FormPath::root().field(array))?.len();
    if index < len {
        Ok(())
    } else {
        Err(ReferenceError::ElementOutOfRange {
            array: array.to_string(),
            index,
            len,
        })
    }
}

///
/// TESTS
///
