//! Per-item edit state machine.
//!
//! # Design
//! `Viewing → Editing` on double-click. Blur/Enter commits and Escape
//! reverts; both pass through `Exiting` for the length of the exit
//! transition before settling back in `Viewing`. Commands are returned to
//! the caller rather than issued here, so the editor never talks to the
//! controller directly. Time is passed in, which keeps the machine
//! deterministic under test.

use std::time::{Duration, Instant};

/// Length of the exit transition when the caller does not configure one.
pub const EXIT_TRANSITION: Duration = Duration::from_millis(300);

/// Mutation requested by an editor on commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemCommand {
    Rename { id: i64, title: String },
    Delete(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    Viewing,
    Editing { draft: String },
    Exiting { draft: String, since: Instant },
}

#[derive(Debug, Clone)]
pub struct ItemEditor {
    id: i64,
    title: String,
    state: EditState,
    exit_after: Duration,
}

impl ItemEditor {
    pub fn new(id: i64, title: impl Into<String>, exit_after: Duration) -> Self {
        Self {
            id,
            title: title.into(),
            state: EditState::Viewing,
            exit_after,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_viewing(&self) -> bool {
        matches!(self.state, EditState::Viewing)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// The text field stays up through the exit transition.
    pub fn shows_title_field(&self) -> bool {
        !self.is_viewing()
    }

    pub fn shows_delete_button(&self) -> bool {
        self.is_viewing()
    }

    /// Text shown in the title field, or the title itself while viewing.
    pub fn draft(&self) -> &str {
        match &self.state {
            EditState::Viewing => &self.title,
            EditState::Editing { draft } | EditState::Exiting { draft, .. } => draft,
        }
    }

    /// Double-click on the title. Ignored unless viewing.
    pub fn begin_edit(&mut self) -> bool {
        if !self.is_viewing() {
            return false;
        }
        self.state = EditState::Editing {
            draft: self.title.clone(),
        };
        true
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditState::Editing { draft } = &mut self.state {
            *draft = text.into();
        }
    }

    /// Blur or Enter. An empty draft asks for deletion, a changed one for a
    /// rename. Only the first commit of an edit session counts.
    pub fn commit(&mut self, now: Instant) -> Option<ItemCommand> {
        let EditState::Editing { draft } = &self.state else {
            return None;
        };
        let trimmed = draft.trim();
        let command = if trimmed.is_empty() {
            Some(ItemCommand::Delete(self.id))
        } else if trimmed != self.title {
            Some(ItemCommand::Rename {
                id: self.id,
                title: trimmed.to_string(),
            })
        } else {
            None
        };
        self.state = EditState::Exiting {
            draft: draft.clone(),
            since: now,
        };
        command
    }

    /// Escape. Reverts the draft without issuing anything.
    pub fn cancel(&mut self, now: Instant) {
        if self.is_editing() {
            self.state = EditState::Exiting {
                draft: self.title.clone(),
                since: now,
            };
        }
    }

    pub fn tick(&mut self, now: Instant) {
        if let EditState::Exiting { since, .. } = self.state {
            if now.saturating_duration_since(since) >= self.exit_after {
                self.state = EditState::Viewing;
            }
        }
    }

    /// Take the latest title from the collection.
    pub fn sync_title(&mut self, title: &str) {
        if self.title != title {
            self.title = title.to_string();
        }
    }
}
