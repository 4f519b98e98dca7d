//! Reference Synchronizer.
//!
//! Applies one Source-level mutation to the Reference bound to a field and
//! keeps the Reference's existence tied to its Source count: the first add
//! creates it, removing the last Source deletes it. Every call reads the
//! owning partition by value, changes the copy, and writes the whole
//! partition back. Rejections happen before the write.

use crate::{
    error::ReferenceError,
    form::FormBinding,
    model::{Reference, Source},
    ownership::{FieldTable, FieldTarget, Location},
    resolve::find_position,
    store::{Partition, live_content, read_references, write_references},
};

///
/// SourceMutation
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SourceMutation {
    Add(Source),
    Update { index: usize, source: Source },
    Delete { index: usize },
}

impl SourceMutation {
    /// Build from the panel's raw inputs: a payload without an index adds,
    /// a payload with an index updates, an index without a payload deletes.
    /// Neither yields `None`.
    #[must_use]
    pub fn from_parts(source: Option<Source>, index: Option<usize>) -> Option<Self> {
        match (source, index) {
            (Some(source), None) => Some(Self::Add(source)),
            (Some(source), Some(index)) => Some(Self::Update { index, source }),
            (None, Some(index)) => Some(Self::Delete { index }),
            (None, None) => None,
        }
    }
}

///
/// ReferenceEffect
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReferenceEffect {
    /// New Reference inserted with its first Source.
    Created,
    /// Source appended to an existing Reference.
    Appended,
    /// Source replaced in place.
    Updated,
    /// Source removed; the Reference still has Sources.
    SourceRemoved,
    /// Last Source removed; the Reference was deleted.
    Removed,
}

impl ReferenceEffect {
    /// Whether the partition gained or lost a Reference.
    #[must_use]
    pub const fn changes_membership(self) -> bool {
        matches!(self, Self::Created | Self::Removed)
    }
}

///
/// SyncOutcome
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SyncOutcome {
    pub effect: ReferenceEffect,
    pub partition: Partition,
    /// Sources left on the Reference after the mutation.
    pub source_count: usize,
}

///
/// Synchronizer
///

#[derive(Clone, Copy, Debug)]
pub struct Synchronizer<'t> {
    table: &'t FieldTable,
}

impl<'t> Synchronizer<'t> {
    #[must_use]
    pub const fn new(table: &'t FieldTable) -> Self {
        Self { table }
    }

    pub fn apply<F>(
        &self,
        form: &mut F,
        field: &str,
        element: Option<usize>,
        mutation: SourceMutation,
    ) -> Result<SyncOutcome, ReferenceError>
    where
        F: FormBinding + ?Sized,
    {
        let location = self.table.locate(field, element)?;
        let partition = location.partition();
        let live = live_content(form, &location)?;

        let mut references = read_references(form, partition)?;
        let position = find_position(&references, &location, &live);
        let (effect, source_count) =
            apply_to_list(&mut references, position, &location, live, mutation)?;

        write_references(form, partition, &references)?;

        tracing::debug!(
            field = %location.field,
            %partition,
            ?effect,
            source_count,
            "reference synchronized"
        );

        Ok(SyncOutcome {
            effect,
            partition,
            source_count,
        })
    }

    /// Add the same Source to every target, all or nothing.
    /// Runs against a copy of the form and commits only if every target
    /// succeeds.
    pub fn apply_many<F>(
        &self,
        form: &mut F,
        targets: &[FieldTarget],
        source: &Source,
    ) -> Result<Vec<SyncOutcome>, ReferenceError>
    where
        F: FormBinding + Clone,
    {
        let mut scratch = form.clone();

        let outcomes = targets
            .iter()
            .map(|target| {
                self.apply(
                    &mut scratch,
                    &target.field,
                    target.element,
                    SourceMutation::Add(source.clone()),
                )
            })
            .collect::<Result<Vec<_>, _>>()?;

        *form = scratch;

        Ok(outcomes)
    }
}

// Mutate the partition copy. Index checks run before any change.
fn apply_to_list(
    references: &mut Vec<Reference>,
    position: Option<usize>,
    location: &Location,
    live: String,
    mutation: SourceMutation,
) -> Result<(ReferenceEffect, usize), ReferenceError> {
    match mutation {
        SourceMutation::Add(source) => match position {
            Some(p) => {
                let sources = &mut references[p].sources;
                sources.push(source);

                Ok((ReferenceEffect::Appended, sources.len()))
            }
            None => {
                references.push(Reference::new(&location.field, live, source));

                Ok((ReferenceEffect::Created, 1))
            }
        },

        SourceMutation::Update { index, source } => {
            let p = checked(references, position, location, index)?;
            let sources = &mut references[p].sources;
            sources[index] = source;

            Ok((ReferenceEffect::Updated, sources.len()))
        }

        SourceMutation::Delete { index } => {
            let p = checked(references, position, location, index)?;
            let sources = &mut references[p].sources;
            sources.remove(index);

            if sources.is_empty() {
                references.remove(p);
                Ok((ReferenceEffect::Removed, 0))
            } else {
                Ok((ReferenceEffect::SourceRemoved, sources.len()))
            }
        }
    }
}

// An absent Reference has zero Sources, so any index is out of range.
fn checked(
    references: &[Reference],
    position: Option<usize>,
    location: &Location,
    index: usize,
) -> Result<usize, ReferenceError> {
    let len = position.map_or(0, |p| references[p].sources.len());

    match position {
        Some(p) if index < len => Ok(p),
        _ => Err(ReferenceError::InvalidIndex {
            field: location.field.clone(),
            index,
            len,
        }),
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        form::{FormPath, FormState},
        model::{CareerRecord, ReferenceType},
        test_support::{career_record, reference, source},
    };

    fn form(record: &CareerRecord) -> FormState {
        FormState::from_record(record).expect("record should encode")
    }

    fn record(form: &FormState) -> CareerRecord {
        form.to_record().expect("record should decode")
    }

    #[test]
    fn from_parts_follows_payload_and_index_convention() {
        let s = source(ReferenceType::Document);

        assert_eq!(
            SourceMutation::from_parts(Some(s.clone()), None),
            Some(SourceMutation::Add(s.clone()))
        );
        assert_eq!(
            SourceMutation::from_parts(Some(s.clone()), Some(1)),
            Some(SourceMutation::Update { index: 1, source: s })
        );
        assert_eq!(
            SourceMutation::from_parts(None, Some(0)),
            Some(SourceMutation::Delete { index: 0 })
        );
        assert_eq!(SourceMutation::from_parts(None, None), None);
    }

    #[test]
    fn first_add_creates_reference_with_live_snapshot() {
        let mut form = form(&career_record());
        let table = FieldTable::builtin();

        let outcome = Synchronizer::new(&table)
            .apply(
                &mut form,
                "company",
                None,
                SourceMutation::Add(source(ReferenceType::Document)),
            )
            .expect("add should succeed");

        assert_eq!(outcome.effect, ReferenceEffect::Created);
        assert_eq!(outcome.partition, Partition::Root);
        assert_eq!(
            record(&form).references,
            vec![reference(
                "company",
                "Acme Shipyards",
                vec![source(ReferenceType::Document)]
            )]
        );
    }

    #[test]
    fn second_add_appends_in_order() {
        let mut form = form(&career_record());
        let table = FieldTable::builtin();
        let sync = Synchronizer::new(&table);

        for kind in [ReferenceType::Document, ReferenceType::Verbal] {
            sync.apply(&mut form, "rank", None, SourceMutation::Add(source(kind)))
                .expect("add should succeed");
        }

        let references = record(&form).appointment.references;
        assert_eq!(references.len(), 1);
        assert_eq!(
            references[0].sources,
            vec![source(ReferenceType::Document), source(ReferenceType::Verbal)]
        );
    }

    #[test]
    fn update_replaces_in_place() {
        let mut base = career_record();
        base.appointment.references = vec![reference(
            "position",
            "Foreman",
            vec![source(ReferenceType::Document), source(ReferenceType::Verbal)],
        )];
        let mut form = form(&base);
        let table = FieldTable::builtin();

        let replacement = source(ReferenceType::PublicRecord).with_comment("gazette");
        let outcome = Synchronizer::new(&table)
            .apply(
                &mut form,
                "position",
                None,
                SourceMutation::Update {
                    index: 0,
                    source: replacement.clone(),
                },
            )
            .expect("update should succeed");

        assert_eq!(outcome.effect, ReferenceEffect::Updated);
        assert_eq!(
            record(&form).appointment.references[0].sources,
            vec![replacement, source(ReferenceType::Verbal)]
        );
    }

    #[test]
    fn out_of_range_index_is_rejected_without_writing() {
        let mut base = career_record();
        base.references = vec![reference(
            "duration",
            "2019-2022",
            vec![source(ReferenceType::Document)],
        )];
        let mut form = form(&base);
        let before = form.clone();
        let table = FieldTable::builtin();
        let sync = Synchronizer::new(&table);

        let err = sync
            .apply(&mut form, "duration", None, SourceMutation::Delete { index: 1 })
            .expect_err("index == len must be rejected");
        assert_eq!(
            err,
            ReferenceError::InvalidIndex {
                field: "duration".to_string(),
                index: 1,
                len: 1,
            }
        );

        let err = sync
            .apply(
                &mut form,
                "company",
                None,
                SourceMutation::Update {
                    index: 0,
                    source: source(ReferenceType::Verbal),
                },
            )
            .expect_err("update without a reference must be rejected");
        assert!(matches!(err, ReferenceError::InvalidIndex { len: 0, .. }));

        assert_eq!(form, before);
    }

    #[test]
    fn deleting_last_source_removes_reference() {
        let mut base = career_record();
        base.appointment.references = vec![
            reference("position", "Foreman", vec![source(ReferenceType::Verbal)]),
            reference("rank", "Senior", vec![source(ReferenceType::Document)]),
        ];
        let mut form = form(&base);
        let table = FieldTable::builtin();

        let outcome = Synchronizer::new(&table)
            .apply(&mut form, "rank", None, SourceMutation::Delete { index: 0 })
            .expect("delete should succeed");

        assert_eq!(outcome.effect, ReferenceEffect::Removed);
        assert!(outcome.effect.changes_membership());
        assert_eq!(
            record(&form).appointment.references,
            vec![reference("position", "Foreman", vec![source(ReferenceType::Verbal)])]
        );
    }

    #[test]
    fn element_add_touches_only_that_element() {
        let mut form = form(&career_record());
        let before = record(&form);
        let table = FieldTable::builtin();

        let outcome = Synchronizer::new(&table)
            .apply(
                &mut form,
                "issuedBy",
                Some(2),
                SourceMutation::Add(source(ReferenceType::CertificateIssuer)),
            )
            .expect("add should succeed");
        assert_eq!(outcome.partition, Partition::ArrayElement(2));

        let after = record(&form);
        assert_eq!(
            after.certifications[2].references,
            vec![reference(
                "issuedBy",
                "Transport Board",
                vec![source(ReferenceType::CertificateIssuer)]
            )]
        );
        for i in [0, 1, 3] {
            assert_eq!(after.certifications[i], before.certifications[i]);
        }
    }

    #[test]
    fn skill_elements_get_separate_references() {
        let mut form = form(&career_record());
        let table = FieldTable::builtin();
        let sync = Synchronizer::new(&table);

        for element in [0, 1, 0] {
            sync.apply(
                &mut form,
                "skills",
                Some(element),
                SourceMutation::Add(source(ReferenceType::Verbal)),
            )
            .expect("add should succeed");
        }

        let references = record(&form).references;
        assert_eq!(references.len(), 2);
        assert_eq!(references[0].content, "Welding");
        assert_eq!(references[0].sources.len(), 2);
        assert_eq!(references[1].content, "Rigging");
    }

    #[test]
    fn apply_many_is_all_or_nothing() {
        let mut form = form(&career_record());
        let before = form.clone();
        let table = FieldTable::builtin();
        let sync = Synchronizer::new(&table);
        let s = source(ReferenceType::EmployerLetter);

        let err = sync
            .apply_many(
                &mut form,
                &[FieldTarget::new("company"), FieldTarget::at("name", 7)],
                &s,
            )
            .expect_err("out-of-range element must reject the batch");
        assert!(matches!(err, ReferenceError::ElementOutOfRange { .. }));
        assert_eq!(form, before);

        let outcomes = sync
            .apply_many(
                &mut form,
                &[
                    FieldTarget::new("company"),
                    FieldTarget::new("rank"),
                    FieldTarget::at("name", 0),
                ],
                &s,
            )
            .expect("batch should succeed");
        assert!(outcomes.iter().all(|o| o.effect == ReferenceEffect::Created));
        assert_eq!(
            form.get(&FormPath::parse("certifications.0.references.0.field")),
            Some(serde_json::json!("name"))
        );
    }
}
