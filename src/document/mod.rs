mod element;
mod key_model;

pub use element::{Element, ElementId};
pub use key_model::KeyModel;

use element::ElementKind;
use indexmap::IndexMap;

use crate::core::DocumentId;
use crate::core::object_id::ObjectIdParseError;
use crate::core::value::Value;

pub const ID_KEY: &str = "_id";

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DocumentError {
    #[error("document must be an object, found {found}")]
    NotAnObject { found: &'static str },
    #[error("document has no `_id` field")]
    MissingId,
    #[error(transparent)]
    ObjectId(#[from] ObjectIdParseError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerType {
    Document,
    Object,
    Array,
}

impl ContainerType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Object => "Object",
            Self::Array => "Array",
        }
    }
}

/// A document record as an addressable tree of elements.
///
/// Elements live in an arena and are addressed by [`ElementId`]; ids stay
/// valid for the lifetime of the document because elements are never
/// removed from the arena.
#[derive(Debug, Clone)]
pub struct Document {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
    is_new: bool,
}

impl Document {
    pub fn from_value(value: &Value, is_new: bool) -> Result<Self, DocumentError> {
        let Value::Object(map) = value else {
            return Err(DocumentError::NotAnObject {
                found: value.type_name(),
            });
        };

        let mut doc = Self {
            elements: Vec::new(),
            roots: Vec::new(),
            is_new,
        };
        for (key, child) in map {
            let id = doc.push_element(key.clone(), child, None, is_new);
            doc.roots.push(id);
        }
        Ok(doc)
    }

    pub fn from_json(json: &serde_json::Value, is_new: bool) -> Result<Self, DocumentError> {
        Self::from_value(&Value::from_json(json)?, is_new)
    }

    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn id(&self) -> Result<DocumentId, DocumentError> {
        self.roots
            .iter()
            .filter_map(|id| self.element(*id))
            .find(|el| el.key == ID_KEY)
            .map(|el| DocumentId::new(self.element_value(el)))
            .ok_or(DocumentError::MissingId)
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    pub fn current_key(&self, id: ElementId) -> &str {
        self.element(id).map_or("", Element::current_key)
    }

    pub fn is_added(&self, id: ElementId) -> bool {
        self.element(id).is_some_and(Element::is_added)
    }

    pub fn siblings(&self, id: ElementId) -> &[ElementId] {
        match self.element(id).and_then(Element::parent) {
            Some(parent) => self.element(parent).map(Element::children).unwrap_or_default(),
            None => &self.roots,
        }
    }

    pub fn parent_container_type(&self, id: ElementId) -> ContainerType {
        let parent = self
            .element(id)
            .and_then(Element::parent)
            .and_then(|parent| self.element(parent));
        match parent.map(|el| &el.kind) {
            Some(ElementKind::Array(_)) => ContainerType::Array,
            Some(_) => ContainerType::Object,
            None => ContainerType::Document,
        }
    }

    /// An existing `_id` and everything nested under it keep their keys.
    pub fn is_key_editable(&self, id: ElementId) -> bool {
        let mut current = self.element(id);
        if current.is_none() {
            return false;
        }
        while let Some(el) = current {
            if !el.added && el.original_key == ID_KEY {
                return false;
            }
            current = el.parent.and_then(|parent| self.element(parent));
        }
        true
    }

    pub fn is_duplicate_key(&self, id: ElementId, candidate: &str) -> bool {
        if self.current_key(id) == candidate {
            return false;
        }
        self.siblings(id)
            .iter()
            .filter(|sibling| **sibling != id)
            .any(|sibling| self.current_key(*sibling) == candidate)
    }

    pub fn rename(&mut self, id: ElementId, key: &str) {
        let Some(el) = self.elements.get_mut(id.0) else {
            tracing::warn!(element = id.0, "rename of unknown element ignored");
            return;
        };
        tracing::trace!(element = id.0, from = %el.key, to = key, "element renamed");
        el.key = key.to_string();
    }

    /// Appends a new element under `parent` (or at the top level). Array
    /// children are keyed by position and ignore `key`.
    pub fn append_element(
        &mut self,
        parent: Option<ElementId>,
        key: impl Into<String>,
        value: &Value,
    ) -> Option<ElementId> {
        let key = match parent {
            None => key.into(),
            Some(parent_id) => match &self.element(parent_id)?.kind {
                ElementKind::Leaf(_) => return None,
                ElementKind::Object(_) => key.into(),
                ElementKind::Array(children) => children.len().to_string(),
            },
        };

        let id = self.push_element(key, value, parent, true);
        match parent {
            None => self.roots.push(id),
            Some(parent_id) => match &mut self.elements[parent_id.0].kind {
                ElementKind::Object(children) | ElementKind::Array(children) => children.push(id),
                ElementKind::Leaf(_) => {}
            },
        }
        Some(id)
    }

    /// Dotted-path lookup by current keys, e.g. `address.city` or `tags.0`.
    pub fn find(&self, path: &str) -> Option<ElementId> {
        let mut scope: &[ElementId] = &self.roots;
        let mut found = None;
        for segment in path.split('.') {
            let id = scope
                .iter()
                .copied()
                .find(|id| self.current_key(*id) == segment)?;
            scope = self.element(id).map(Element::children).unwrap_or_default();
            found = Some(id);
        }
        found
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.collect_object(&self.roots))
    }

    /// Drops the top-level element at `index`; its arena slot stays allocated.
    pub(crate) fn detach_root(&mut self, index: usize) -> Option<ElementId> {
        (index < self.roots.len()).then(|| self.roots.remove(index))
    }

    fn collect_object(&self, ids: &[ElementId]) -> IndexMap<String, Value> {
        ids.iter()
            .filter_map(|id| self.element(*id))
            .map(|el| (el.key.clone(), self.element_value(el)))
            .collect()
    }

    fn element_value(&self, el: &Element) -> Value {
        match &el.kind {
            ElementKind::Leaf(value) => value.clone(),
            ElementKind::Object(children) => Value::Object(self.collect_object(children)),
            ElementKind::Array(children) => Value::List(
                children
                    .iter()
                    .filter_map(|id| self.element(*id))
                    .map(|child| self.element_value(child))
                    .collect(),
            ),
        }
    }

    fn push_element(
        &mut self,
        key: String,
        value: &Value,
        parent: Option<ElementId>,
        added: bool,
    ) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            original_key: key.clone(),
            key,
            kind: ElementKind::Leaf(Value::None),
            parent,
            added,
        });

        let kind = match value {
            Value::Object(map) => ElementKind::Object(
                map.iter()
                    .map(|(k, v)| self.push_element(k.clone(), v, Some(id), added))
                    .collect(),
            ),
            Value::List(items) => ElementKind::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, v)| self.push_element(idx.to_string(), v, Some(id), added))
                    .collect(),
            ),
            other => ElementKind::Leaf(other.clone()),
        };
        self.elements[id.0].kind = kind;
        id
    }
}
