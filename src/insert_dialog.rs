use crate::core::value::Value;
use crate::document::{Document, DocumentError, ID_KEY};

/// Builds the editable document an insert dialog opens with.
///
/// A clone keeps every field of its source except a leading `_id`, which
/// would collide with the source on insert and cannot be edited.
pub fn prepare(template: &Value, clone: bool) -> Result<Document, DocumentError> {
    let mut doc = Document::from_value(template, true)?;
    if clone
        && let Some(first) = doc.roots().first().copied()
        && doc.current_key(first) == ID_KEY
    {
        doc.detach_root(0);
    }
    Ok(doc)
}
