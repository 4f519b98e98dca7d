use crate::{
    error::ReferenceError,
    form::{FormBinding, FormPath},
    model::{CareerRecord, Reference},
    ownership::{CERTIFICATIONS, FieldTable, Location, Ownership},
    store::{Partition, content_of, live_content, read_references},
};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use thiserror::Error as ThisError;

///
/// StoreIssues
///
/// Invariant violations across all reference partitions, keyed by the
/// path of the offending Reference.
///

#[derive(Clone, Debug, Default, Eq, PartialEq, ThisError)]
#[error("reference store invalid: {} issue(s)", .issues.len())]
pub struct StoreIssues {
    issues: BTreeMap<String, Vec<String>>,
}

impl StoreIssues {
    fn add(&mut self, path: String, message: String) {
        self.issues.entry(path).or_default().push(message);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    #[must_use]
    pub const fn issues(&self) -> &BTreeMap<String, Vec<String>> {
        &self.issues
    }
}

///
/// validate_store
/// Check every partition of `record` for the store invariants.
///
/// Every Reference has at least one Source, is classified by `table` into the
/// partition it sits in, and is unique by field (or by field and content for
/// root-array fields). All issues are collected before returning.
///
pub fn validate_store(record: &CareerRecord, table: &FieldTable) -> Result<(), StoreIssues> {
    let mut issues = StoreIssues::default();

    check_partition(&mut issues, table, Partition::Root, &record.references);
    check_partition(
        &mut issues,
        table,
        Partition::NestedObject,
        &record.appointment.references,
    );
    for (index, cert) in record.certifications.iter().enumerate() {
        check_partition(
            &mut issues,
            table,
            Partition::ArrayElement(index),
            &cert.references,
        );
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn check_partition(
    issues: &mut StoreIssues,
    table: &FieldTable,
    partition: Partition,
    references: &[Reference],
) {
    let mut seen = BTreeSet::new();

    for (i, reference) in references.iter().enumerate() {
        let path = format!("{partition}[{i}]");

        if reference.is_empty() {
            issues.add(path.clone(), "reference has no sources".to_string());
        }

        let Ok(ownership) = table.classify(&reference.field) else {
            issues.add(
                path,
                format!("field '{}' has no ownership classification", reference.field),
            );
            continue;
        };

        if !belongs_in(ownership, partition) {
            issues.add(
                path.clone(),
                format!("field '{}' does not belong in {partition}", reference.field),
            );
        }

        let content = ownership
            .matches_by_content()
            .then_some(reference.content.as_str());
        if !seen.insert((reference.field.as_str(), content)) {
            issues.add(
                path,
                format!("duplicate reference for field '{}'", reference.field),
            );
        }
    }
}

const fn belongs_in(ownership: Ownership, partition: Partition) -> bool {
    matches!(
        (ownership, partition),
        (Ownership::Root | Ownership::RootArray, Partition::Root)
            | (Ownership::NestedObject, Partition::NestedObject)
            | (Ownership::ArrayElement, Partition::ArrayElement(_))
    )
}

///
/// StaleSnapshot
///
/// A Reference whose stored content no longer equals its field's live value.
/// For root-array fields, stale means no element currently holds the content.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StaleSnapshot {
    pub partition: Partition,
    pub field: String,
    pub snapshot: String,
    /// Live value, or `None` for root-array fields.
    pub live: Option<String>,
}

/// List every stale snapshot held in `form`. Advisory only: nothing is
/// changed. Live values are read from the form itself, so configured fields
/// are checked like built-in ones. References with unclassified fields are
/// skipped; `validate_store` reports those.
pub fn stale_snapshots<F>(form: &F, table: &FieldTable) -> Result<Vec<StaleSnapshot>, ReferenceError>
where
    F: FormBinding + ?Sized,
{
    let elements = form
        .get(&FormPath::root().field(CERTIFICATIONS))
        .and_then(|v| v.as_array().map(Vec::len))
        .unwrap_or_default();

    let mut partitions = vec![Partition::Root, Partition::NestedObject];
    partitions.extend((0..elements).map(Partition::ArrayElement));

    let mut stale = Vec::new();
    for partition in partitions {
        for reference in read_references(form, partition)? {
            let Ok(ownership) = table.classify(&reference.field) else {
                continue;
            };

            if let Some(snapshot) = check_snapshot(form, partition, ownership, &reference)? {
                stale.push(snapshot);
            }
        }
    }

    Ok(stale)
}

fn check_snapshot<F>(
    form: &F,
    partition: Partition,
    ownership: Ownership,
    reference: &Reference,
) -> Result<Option<StaleSnapshot>, ReferenceError>
where
    F: FormBinding + ?Sized,
{
    let stale = |live| StaleSnapshot {
        partition,
        field: reference.field.clone(),
        snapshot: reference.content.clone(),
        live,
    };

    if ownership.matches_by_content() {
        let location = Location {
            field: reference.field.clone(),
            ownership,
            element: None,
        };
        let held = match form.get(&location.value_path()) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };

        return Ok((!held.iter().any(|v| content_of(v) == reference.content)).then(|| stale(None)));
    }

    // References filed in the wrong partition have no live value to compare.
    let element = match (ownership, partition) {
        (Ownership::ArrayElement, Partition::ArrayElement(index)) => Some(index),
        (Ownership::ArrayElement, _) => return Ok(None),
        _ => None,
    };
    let location = Location {
        field: reference.field.clone(),
        ownership,
        element,
    };
    let live = live_content(form, &location)?;

    Ok((live != reference.content).then(|| stale(Some(live))))
}

///
/// TESTS
///
