use super::EditableKeyState;

pub const KEY_CLASS: &str = "editable-key";
pub const EDITING: &str = "editing";
pub const DUPLICATE: &str = "duplicate";

pub fn style_tokens(state: EditableKeyState) -> Vec<&'static str> {
    let mut tokens = vec![KEY_CLASS];
    if state.editing {
        tokens.push(EDITING);
    }
    if state.duplicate {
        tokens.push(DUPLICATE);
    }
    tokens
}

pub fn class_name(state: EditableKeyState) -> String {
    style_tokens(state).join(" ")
}

pub fn title(state: EditableKeyState, current_key: &str) -> String {
    if state.duplicate {
        return format!("Duplicate key: '{current_key}'");
    }
    current_key.to_string()
}
