//! Binding Session.
//!
//! UI-observable routing state for the reference panel: which field (and
//! element) is open, whether the panel is editing or viewing, which Source is
//! being edited, and the last Source applied. Nothing here touches the form;
//! callers apply the mutation the session builds and then report back.

use crate::{
    model::{DateObtained, Source, SourceDraft},
    ownership::FieldTarget,
    sync::SourceMutation,
};

///
/// PanelMode
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum PanelMode {
    #[default]
    Closed,
    Editing,
    Viewing,
}

///
/// ActiveField
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ActiveField {
    pub target: FieldTarget,
    pub content: String,
}

///
/// BindingSession
///

#[derive(Clone, Debug, Default)]
pub struct BindingSession {
    active: Option<ActiveField>,
    mode: PanelMode,
    editing_source: Option<usize>,
    last_applied: Option<Source>,
    default_date: DateObtained,
}

impl BindingSession {
    /// New session whose blank drafts start at `default_date`.
    #[must_use]
    pub fn new(default_date: DateObtained) -> Self {
        Self {
            default_date,
            ..Self::default()
        }
    }

    /// Open the panel for a field. Starts in editing mode when the field has
    /// no Sources yet, viewing mode otherwise.
    pub fn open(&mut self, target: FieldTarget, content: impl Into<String>, source_count: usize) {
        self.active = Some(ActiveField {
            target,
            content: content.into(),
        });
        self.editing_source = None;
        self.mode = if source_count == 0 {
            PanelMode::Editing
        } else {
            PanelMode::Viewing
        };
    }

    /// Reset all active state. The last applied Source survives.
    pub fn close(&mut self) {
        self.active = None;
        self.editing_source = None;
        self.mode = PanelMode::Closed;
    }

    #[must_use]
    pub const fn mode(&self) -> PanelMode {
        self.mode
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self.mode, PanelMode::Closed)
    }

    #[must_use]
    pub fn active_target(&self) -> Option<&FieldTarget> {
        self.active.as_ref().map(|a| &a.target)
    }

    #[must_use]
    pub fn active_field(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.target.field.as_str())
    }

    #[must_use]
    pub fn active_element(&self) -> Option<usize> {
        self.active.as_ref().and_then(|a| a.target.element)
    }

    #[must_use]
    pub fn active_content(&self) -> Option<&str> {
        self.active.as_ref().map(|a| a.content.as_str())
    }

    /// Index of the Source open for editing, if the next submit is an update.
    #[must_use]
    pub const fn editing_source(&self) -> Option<usize> {
        self.editing_source
    }

    #[must_use]
    pub const fn last_applied_source(&self) -> Option<&Source> {
        self.last_applied.as_ref()
    }

    /// Viewing to editing, for adding another Source.
    pub fn request_add(&mut self) -> bool {
        if self.mode != PanelMode::Viewing {
            return false;
        }
        self.editing_source = None;
        self.mode = PanelMode::Editing;

        true
    }

    /// Open an existing Source for editing and return it as a draft.
    pub fn edit_source(&mut self, index: usize, existing: &Source) -> Option<SourceDraft> {
        if !self.is_open() {
            return None;
        }
        self.editing_source = Some(index);
        self.mode = PanelMode::Editing;

        Some(SourceDraft::from(existing))
    }

    /// Leave editing without submitting. Only possible once Sources exist.
    pub fn cancel_edit(&mut self, source_count: usize) -> bool {
        if self.mode != PanelMode::Editing || source_count == 0 {
            return false;
        }
        self.editing_source = None;
        self.mode = PanelMode::Viewing;

        true
    }

    /// Mutation a submit of `source` should perform, or `None` when the
    /// panel is not editing.
    #[must_use]
    pub fn submission(&self, source: Source) -> Option<SourceMutation> {
        if self.mode != PanelMode::Editing || self.active.is_none() {
            return None;
        }

        SourceMutation::from_parts(Some(source), self.editing_source)
    }

    /// Record a submit that was applied: editing to viewing, and remember
    /// the Source for the next field.
    pub fn submitted(&mut self, source: Source) {
        self.last_applied = Some(source);
        self.editing_source = None;
        if self.is_open() {
            self.mode = PanelMode::Viewing;
        }
    }

    /// Report the active Reference's Source count after a delete. Any open
    /// edit is dropped: the panel views the remaining Sources, or edits a
    /// new one when none are left.
    pub fn sources_changed(&mut self, source_count: usize) {
        self.editing_source = None;
        if self.is_open() {
            self.mode = if source_count == 0 {
                PanelMode::Editing
            } else {
                PanelMode::Viewing
            };
        }
    }

    /// Empty draft for a new Source.
    #[must_use]
    pub fn blank_draft(&self) -> SourceDraft {
        SourceDraft::new(self.default_date)
    }

    /// Draft pre-filled from the last applied Source.
    #[must_use]
    pub fn draft_from_last(&self) -> Option<SourceDraft> {
        self.last_applied.as_ref().map(SourceDraft::from)
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::ReferenceType, test_support::source};

    #[test]
    fn open_picks_mode_from_source_count() {
        let mut session = BindingSession::default();
        assert_eq!(session.mode(), PanelMode::Closed);

        session.open(FieldTarget::new("company"), "Acme", 0);
        assert_eq!(session.mode(), PanelMode::Editing);
        assert_eq!(session.active_field(), Some("company"));
        assert_eq!(session.active_content(), Some("Acme"));

        session.open(FieldTarget::at("name", 2), "First Aid", 1);
        assert_eq!(session.mode(), PanelMode::Viewing);
        assert_eq!(session.active_element(), Some(2));
    }

    #[test]
    fn submit_then_add_another_then_close() {
        let mut session = BindingSession::default();
        let s = source(ReferenceType::Document);

        session.open(FieldTarget::new("company"), "Acme", 0);
        assert_eq!(
            session.submission(s.clone()),
            Some(SourceMutation::Add(s.clone()))
        );
        session.submitted(s.clone());
        assert_eq!(session.mode(), PanelMode::Viewing);
        assert_eq!(session.submission(s.clone()), None);

        assert!(session.request_add());
        assert_eq!(session.mode(), PanelMode::Editing);
        assert!(!session.request_add());

        session.close();
        assert_eq!(session.mode(), PanelMode::Closed);
        assert_eq!(session.active_target(), None);
        assert_eq!(session.active_content(), None);
        assert_eq!(session.last_applied_source(), Some(&s));
    }

    #[test]
    fn editing_existing_source_submits_an_update() {
        let mut session = BindingSession::default();
        let existing = source(ReferenceType::Verbal).with_comment("phone call");

        session.open(FieldTarget::new("rank"), "Senior", 2);
        let draft = session
            .edit_source(1, &existing)
            .expect("open panel should allow editing");
        assert!(draft.has_comment());

        let edited = draft.complete().expect("draft should be complete");
        assert_eq!(
            session.submission(edited.clone()),
            Some(SourceMutation::Update {
                index: 1,
                source: edited
            })
        );

        assert!(session.cancel_edit(2));
        assert_eq!(session.editing_source(), None);
    }

    #[test]
    fn deleting_last_source_returns_to_editing() {
        let mut session = BindingSession::default();
        session.open(FieldTarget::new("duration"), "3y", 1);

        session.sources_changed(0);
        assert_eq!(session.mode(), PanelMode::Editing);
        assert!(!session.cancel_edit(0));
    }

    #[test]
    fn deleting_while_editing_drops_the_edit() {
        let mut session = BindingSession::default();
        session.open(FieldTarget::new("rank"), "Senior", 3);
        session
            .edit_source(2, &source(ReferenceType::Verbal))
            .expect("open panel should edit");

        session.sources_changed(2);

        assert_eq!(session.mode(), PanelMode::Viewing);
        assert_eq!(session.editing_source(), None);
        assert_eq!(session.submission(source(ReferenceType::Document)), None);
    }

    #[test]
    fn last_source_drafts_and_blank_drafts() {
        let date = DateObtained::parse_flexible("2022-11-11T12:19:54.52")
            .expect("date should parse");
        let mut session = BindingSession::new(date);

        assert_eq!(session.draft_from_last(), None);
        assert_eq!(session.blank_draft().date_obtained, date);
        assert!(!session.blank_draft().is_complete());

        session.submitted(source(ReferenceType::PublicRecord));
        let draft = session.draft_from_last().expect("last source should draft");
        assert_eq!(draft.reference_type, Some(ReferenceType::PublicRecord));
    }
}
