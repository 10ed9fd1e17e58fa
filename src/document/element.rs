use crate::core::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(super) usize);

impl ElementId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(super) enum ElementKind {
    Leaf(Value),
    Object(Vec<ElementId>),
    Array(Vec<ElementId>),
}

/// One key/value pair inside a [`super::Document`].
#[derive(Debug, Clone)]
pub struct Element {
    pub(super) key: String,
    pub(super) original_key: String,
    pub(super) kind: ElementKind,
    pub(super) parent: Option<ElementId>,
    pub(super) added: bool,
}

impl Element {
    pub fn current_key(&self) -> &str {
        &self.key
    }

    pub fn original_key(&self) -> &str {
        &self.original_key
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// Newly inserted and not yet persisted.
    pub fn is_added(&self) -> bool {
        self.added
    }

    pub fn is_renamed(&self) -> bool {
        self.key != self.original_key
    }

    pub fn children(&self) -> &[ElementId] {
        match &self.kind {
            ElementKind::Leaf(_) => &[],
            ElementKind::Object(children) | ElementKind::Array(children) => children,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match &self.kind {
            ElementKind::Leaf(value) => value.type_name(),
            ElementKind::Object(_) => "Object",
            ElementKind::Array(_) => "Array",
        }
    }
}
