use crate::error::{Error, ErrorKind, ErrorOrigin};
use refbind_core::{
    config::BindingConfig,
    form::{FormBinding, FormState},
    model::{CareerRecord, Reference, Source, SourceDraft},
    ownership::{FieldTable, FieldTarget},
    resolve::{Resolved, Resolver},
    session::{BindingSession, PanelMode},
    store::live_content,
    sync::{SourceMutation, SyncOutcome, Synchronizer},
    validate::{StaleSnapshot, stale_snapshots, validate_store},
};

///
/// ReferenceEditor
///
/// Owns the form value, the field table, and the Binding Session, and routes
/// UI actions through the resolver and synchronizer.
/// Every action either fully applies or returns an [`Error`] with the form
/// and session unchanged.
///

pub struct ReferenceEditor<F = FormState> {
    form: F,
    table: FieldTable,
    session: BindingSession,
    warn_stale: bool,
}

impl ReferenceEditor<FormState> {
    /// Start editing a typed record with the built-in field table.
    pub fn from_record(record: &CareerRecord) -> Result<Self, Error> {
        Ok(Self::new(FormState::from_record(record)?))
    }

    /// Decode the record and check the store invariants before submission.
    pub fn finish(&self) -> Result<CareerRecord, Error> {
        let record = self.form.to_record()?;
        validate_store(&record, &self.table)?;

        Ok(record)
    }
}

impl<F: FormBinding> ReferenceEditor<F> {
    #[must_use]
    pub fn new(form: F) -> Self {
        Self {
            form,
            table: FieldTable::builtin(),
            session: BindingSession::default(),
            warn_stale: true,
        }
    }

    pub fn with_config(form: F, config: &BindingConfig) -> Result<Self, Error> {
        Ok(Self {
            form,
            table: config.field_table()?,
            session: BindingSession::new(config.default_date()),
            warn_stale: config.warn_stale_snapshots,
        })
    }

    #[must_use]
    pub const fn form(&self) -> &F {
        &self.form
    }

    #[must_use]
    pub fn into_form(self) -> F {
        self.form
    }

    #[must_use]
    pub const fn session(&self) -> &BindingSession {
        &self.session
    }

    #[must_use]
    pub const fn table(&self) -> &FieldTable {
        &self.table
    }

    /// Scan every Reference for stale content snapshots.
    pub fn stale_snapshots(&self) -> Result<Vec<StaleSnapshot>, Error> {
        let stale = stale_snapshots(&self.form, &self.table)
            .map_err(|err| reject(ErrorOrigin::Validate, err))?;

        if self.warn_stale {
            for s in &stale {
                tracing::warn!(
                    field = %s.field,
                    partition = %s.partition,
                    snapshot = %s.snapshot,
                    live = ?s.live,
                    "reference content snapshot is stale"
                );
            }
        }

        Ok(stale)
    }

    //
    // Field operations
    //

    /// Reference bound to `field` (and `element`), or `None` when the field
    /// has no References yet.
    pub fn resolve(&self, field: &str, element: Option<usize>) -> Result<Option<Reference>, Error> {
        Ok(self.resolved(field, element)?.map(|r| r.reference))
    }

    /// Add a Source (no `source_index`) or replace the Source at
    /// `source_index`.
    pub fn apply_source(
        &mut self,
        field: &str,
        element: Option<usize>,
        source: Source,
        source_index: Option<usize>,
    ) -> Result<SyncOutcome, Error> {
        let mutation = match source_index {
            None => SourceMutation::Add(source),
            Some(index) => SourceMutation::Update { index, source },
        };

        self.sync(field, element, mutation)
    }

    /// Remove the Source at `source_index`; the Reference goes with its last
    /// Source.
    pub fn delete_source(
        &mut self,
        field: &str,
        element: Option<usize>,
        source_index: usize,
    ) -> Result<SyncOutcome, Error> {
        self.sync(field, element, SourceMutation::Delete { index: source_index })
    }

    /// Add one Source to several fields; if any target is rejected, none
    /// change. Closes the panel and remembers the Source.
    pub fn mass_apply(&mut self, targets: &[FieldTarget], source: Source) -> Result<Vec<SyncOutcome>, Error>
    where
        F: Clone,
    {
        let outcomes = Synchronizer::new(&self.table)
            .apply_many(&mut self.form, targets, &source)
            .map_err(|err| reject(ErrorOrigin::Synchronizer, err))?;

        tracing::debug!(targets = targets.len(), "mass apply committed");
        self.session.submitted(source);
        self.session.close();

        Ok(outcomes)
    }

    //
    // Panel actions
    //

    /// Open the reference panel for a field.
    pub fn open(&mut self, field: &str, element: Option<usize>) -> Result<PanelMode, Error> {
        let location = self
            .table
            .locate(field, element)
            .map_err(|err| reject(ErrorOrigin::Session, err))?;
        let content = live_content(&self.form, &location)
            .map_err(|err| reject(ErrorOrigin::Session, err))?;
        let count = self
            .resolved(field, element)?
            .map_or(0, |r| r.reference.sources.len());

        let target = FieldTarget {
            field: location.field,
            element: location.element,
        };
        self.session.open(target, content, count);

        Ok(self.session.mode())
    }

    /// Submit the editing draft for the active field.
    pub fn submit(&mut self, draft: SourceDraft) -> Result<SyncOutcome, Error> {
        let target = self.active_target()?;
        let source = draft.complete().ok_or_else(|| {
            Error::new(
                ErrorKind::IncompleteSource,
                ErrorOrigin::Session,
                "source has no reference type",
            )
        })?;
        let mutation = self.session.submission(source.clone()).ok_or_else(|| {
            Error::new(
                ErrorKind::PanelState,
                ErrorOrigin::Session,
                "panel is not editing",
            )
        })?;

        let outcome = self.sync(&target.field, target.element, mutation)?;
        self.session.submitted(source);

        Ok(outcome)
    }

    /// Switch from viewing to editing to add another Source.
    pub fn request_add(&mut self) -> bool {
        self.session.request_add()
    }

    /// Open the active field's Source at `index` for editing.
    pub fn edit_source(&mut self, index: usize) -> Result<SourceDraft, Error> {
        let target = self.active_target()?;
        let sources = self
            .resolved(&target.field, target.element)?
            .map(|r| r.reference.sources)
            .unwrap_or_default();

        let existing = sources.get(index).ok_or_else(|| {
            Error::new(
                ErrorKind::InvalidIndex,
                ErrorOrigin::Session,
                format!(
                    "source index {index} out of range for '{}' ({} sources)",
                    target.field,
                    sources.len()
                ),
            )
        })?;

        self.session
            .edit_source(index, existing)
            .ok_or_else(|| Error::new(ErrorKind::PanelState, ErrorOrigin::Session, "panel is closed"))
    }

    /// Delete the active field's Source at `index`.
    pub fn delete_active_source(&mut self, index: usize) -> Result<SyncOutcome, Error> {
        let target = self.active_target()?;
        let outcome = self.delete_source(&target.field, target.element, index)?;
        self.session.sources_changed(outcome.source_count);

        Ok(outcome)
    }

    /// Leave editing mode without submitting.
    pub fn cancel_edit(&mut self) -> Result<bool, Error> {
        let target = self.active_target()?;
        let count = self
            .resolved(&target.field, target.element)?
            .map_or(0, |r| r.reference.sources.len());

        Ok(self.session.cancel_edit(count))
    }

    /// Draft pre-filled from the last applied Source.
    #[must_use]
    pub fn apply_last_source(&self) -> Option<SourceDraft> {
        self.session.draft_from_last()
    }

    #[must_use]
    pub fn blank_draft(&self) -> SourceDraft {
        self.session.blank_draft()
    }

    pub fn close(&mut self) {
        self.session.close();
    }

    //
    // Internal
    //

    fn resolved(&self, field: &str, element: Option<usize>) -> Result<Option<Resolved>, Error> {
        Resolver::new(&self.table)
            .warn_stale(self.warn_stale)
            .resolve(&self.form, field, element)
            .map_err(|err| reject(ErrorOrigin::Resolver, err))
    }

    fn sync(
        &mut self,
        field: &str,
        element: Option<usize>,
        mutation: SourceMutation,
    ) -> Result<SyncOutcome, Error> {
        Synchronizer::new(&self.table)
            .apply(&mut self.form, field, element, mutation)
            .map_err(|err| reject(ErrorOrigin::Synchronizer, err))
    }

    fn active_target(&self) -> Result<FieldTarget, Error> {
        self.session.active_target().cloned().ok_or_else(|| {
            Error::new(
                ErrorKind::PanelState,
                ErrorOrigin::Session,
                "no field is open for reference editing",
            )
        })
    }
}

fn reject(origin: ErrorOrigin, err: refbind_core::error::ReferenceError) -> Error {
    tracing::debug!(%origin, error = %err, "reference action rejected");

    Error::reference(origin, err)
}
