use crate::{
    error::ReferenceError,
    form::FormBinding,
    model::Reference,
    ownership::{FieldTable, Location},
    store::{Partition, live_content, read_references},
};

///
/// Resolved
///
/// A Reference found for a field, with where it lives and the field's
/// live value at resolution time.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Resolved {
    pub location: Location,
    pub position: usize,
    pub reference: Reference,
    pub live_content: String,
}

impl Resolved {
    #[must_use]
    pub const fn partition(&self) -> Partition {
        self.location.partition()
    }

    /// Snapshot taken at creation no longer equals the live value.
    /// Snapshots are never refreshed; this is advisory only.
    #[must_use]
    pub fn is_stale(&self) -> bool {
        self.reference.content != self.live_content
    }
}

///
/// Resolver
///
/// Locates the single Reference bound to a field (and element index).
/// Absence is `Ok(None)`.
///

#[derive(Clone, Copy, Debug)]
pub struct Resolver<'t> {
    table: &'t FieldTable,
    warn_stale: bool,
}

impl<'t> Resolver<'t> {
    #[must_use]
    pub const fn new(table: &'t FieldTable) -> Self {
        Self {
            table,
            warn_stale: true,
        }
    }

    /// Toggle the warn-level event emitted for stale snapshots.
    #[must_use]
    pub const fn warn_stale(mut self, enabled: bool) -> Self {
        self.warn_stale = enabled;
        self
    }

    pub fn resolve<F>(
        &self,
        form: &F,
        field: &str,
        element: Option<usize>,
    ) -> Result<Option<Resolved>, ReferenceError>
    where
        F: FormBinding + ?Sized,
    {
        let location = self.table.locate(field, element)?;
        let live = live_content(form, &location)?;
        let mut references = read_references(form, location.partition())?;

        let Some(position) = find_position(&references, &location, &live) else {
            return Ok(None);
        };

        let resolved = Resolved {
            reference: references.swap_remove(position),
            position,
            location,
            live_content: live,
        };

        if self.warn_stale && resolved.is_stale() {
            tracing::warn!(
                field = %resolved.location.field,
                partition = %resolved.partition(),
                snapshot = %resolved.reference.content,
                live = %resolved.live_content,
                "reference content snapshot is stale"
            );
        }

        Ok(Some(resolved))
    }
}

/// Position of the Reference matching `location` within its partition list.
/// Root-array fields also match on the element's current value.
pub(crate) fn find_position(
    references: &[Reference],
    location: &Location,
    live: &str,
) -> Option<usize> {
    let content = location.ownership.matches_by_content().then_some(live);

    references
        .iter()
        .position(|r| r.matches(&location.field, content))
}

///
/// TESTS
///
