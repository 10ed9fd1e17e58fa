use super::{ContainerType, Document, ElementId};

/// The per-field operations an editable key needs from its document.
pub trait KeyModel {
    fn current_key(&self, field: ElementId) -> &str;
    fn is_key_editable(&self, field: ElementId) -> bool;
    fn parent_container_type(&self, field: ElementId) -> ContainerType;
    fn is_duplicate_key(&self, field: ElementId, candidate: &str) -> bool;
    fn rename(&mut self, field: ElementId, new_key: &str);
    fn is_added(&self, field: ElementId) -> bool;
}

impl KeyModel for Document {
    fn current_key(&self, field: ElementId) -> &str {
        Document::current_key(self, field)
    }

    fn is_key_editable(&self, field: ElementId) -> bool {
        Document::is_key_editable(self, field)
    }

    fn parent_container_type(&self, field: ElementId) -> ContainerType {
        Document::parent_container_type(self, field)
    }

    fn is_duplicate_key(&self, field: ElementId, candidate: &str) -> bool {
        Document::is_duplicate_key(self, field, candidate)
    }

    fn rename(&mut self, field: ElementId, new_key: &str) {
        Document::rename(self, field, new_key)
    }

    fn is_added(&self, field: ElementId) -> bool {
        Document::is_added(self, field)
    }
}
