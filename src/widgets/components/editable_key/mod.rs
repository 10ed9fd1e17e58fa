mod render;

pub use render::{DUPLICATE, EDITING, KEY_CLASS, class_name, style_tokens, title};

use unicode_width::UnicodeWidthStr;

use crate::document::{ContainerType, ElementId, KeyModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusRequest {
    None,
    Claim,
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Esc,
    Char(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EditableKeyState {
    pub editing: bool,
    pub duplicate: bool,
}

/// Edit state for the key of one rendered field.
///
/// Holds only the field's id; every operation borrows the document that
/// owns the field. The duplicate flag is advisory: renames always reach
/// the model so no keystroke is lost while a conflict is shown.
#[derive(Debug, Clone)]
pub struct EditableKey {
    field: ElementId,
    state: EditableKeyState,
    width_hint: usize,
    insert_index: Option<usize>,
}

impl EditableKey {
    pub fn new(field: ElementId) -> Self {
        Self {
            field,
            state: EditableKeyState::default(),
            width_hint: 0,
            insert_index: None,
        }
    }

    /// `insert_index` is the 1-based position of the field inside an
    /// insert dialog, `None` when the field belongs to a loaded row.
    pub fn with_insert_index(mut self, insert_index: Option<usize>) -> Self {
        self.insert_index = insert_index;
        self
    }

    pub fn mount<M: KeyModel + ?Sized>(
        field: ElementId,
        model: &M,
        insert_index: Option<usize>,
    ) -> (Self, FocusRequest) {
        let mut key = Self::new(field).with_insert_index(insert_index);
        key.width_hint = model.current_key(field).width();
        let focus = key.initial_focus(model);
        (key, focus)
    }

    pub fn field(&self) -> ElementId {
        self.field
    }

    pub fn state(&self) -> EditableKeyState {
        self.state
    }

    pub fn is_editing(&self) -> bool {
        self.state.editing
    }

    pub fn is_duplicate(&self) -> bool {
        self.state.duplicate
    }

    pub fn width_hint(&self) -> usize {
        self.width_hint
    }

    /// Array elements have positional keys and are never editable.
    pub fn is_editable<M: KeyModel + ?Sized>(&self, model: &M) -> bool {
        model.is_key_editable(self.field)
            && model.parent_container_type(self.field) != ContainerType::Array
    }

    pub fn initial_focus<M: KeyModel + ?Sized>(&self, model: &M) -> FocusRequest {
        if !model.is_added(self.field) {
            return FocusRequest::None;
        }
        let claim = match self.insert_index {
            Some(index) => index == 1 && model.current_key(self.field).is_empty(),
            None => !self.is_editable(model),
        };
        if claim {
            FocusRequest::Claim
        } else {
            FocusRequest::None
        }
    }

    pub fn handle_focus<M: KeyModel + ?Sized>(&mut self, model: &M) {
        if self.is_editable(model) {
            self.state.editing = true;
        }
    }

    pub fn handle_blur<M: KeyModel + ?Sized>(&mut self, model: &M) {
        if self.is_editable(model) {
            self.state.editing = false;
        }
    }

    pub fn handle_change<M: KeyModel + ?Sized>(&mut self, model: &mut M, text: &str) {
        self.width_hint = text.width();
        if !self.is_editable(model) {
            return;
        }
        self.state.duplicate = model.is_duplicate_key(self.field, text);
        model.rename(self.field, text);
    }

    /// Escape only gives focus up; the blur that follows settles the state.
    pub fn handle_key(&self, key: KeyCode) -> FocusRequest {
        match key {
            KeyCode::Esc => FocusRequest::Release,
            _ => FocusRequest::None,
        }
    }

    pub fn class_name(&self) -> String {
        class_name(self.state)
    }

    pub fn title<M: KeyModel + ?Sized>(&self, model: &M) -> String {
        title(self.state, model.current_key(self.field))
    }
}
