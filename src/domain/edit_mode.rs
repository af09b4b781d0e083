// Edit-mode state machine - gates which dashboard mutations are allowed
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditMode {
    #[default]
    Viewing,
    Editing,
}

/// Mutations a user can request on a dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Add,
    Remove,
    Duplicate,
    Configure,
    Layout,
    Select,
}

#[derive(Debug, Clone)]
pub struct EditModeController {
    mode: EditMode,
    editable: bool,
}

impl EditModeController {
    /// Starts in `Viewing`; a non-editable dashboard never leaves it.
    pub fn new(editable: bool) -> Self {
        Self {
            mode: EditMode::Viewing,
            editable,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn editable(&self) -> bool {
        self.editable
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditMode::Editing
    }

    /// Viewing -> Editing. Returns true if the transition happened.
    pub fn begin_edit(&mut self) -> bool {
        if !self.editable || self.is_editing() {
            return false;
        }
        self.mode = EditMode::Editing;
        true
    }

    /// Editing -> Viewing. Returns true if the transition happened; the caller
    /// hands the current snapshot to persistence only in that case.
    pub fn save(&mut self) -> bool {
        if !self.is_editing() {
            return false;
        }
        self.mode = EditMode::Viewing;
        true
    }

    pub fn permits(&self, mutation: Mutation) -> bool {
        let permitted = self.is_editing();
        if !permitted {
            tracing::debug!("Ignoring {:?} while viewing", mutation);
        }
        permitted
    }
}
