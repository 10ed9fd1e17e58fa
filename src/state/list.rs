use crate::core::DocumentId;
use crate::core::value::Value;
use crate::document::{Document, DocumentError};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ListError {
    #[error("no loaded row has id {id}")]
    RowNotFound { id: DocumentId },
    #[error("document {index} of the batch is unusable: {source}")]
    Document {
        index: usize,
        #[source]
        source: DocumentError,
    },
}

/// One loaded document. The row owns its document model.
#[derive(Debug, Clone)]
pub struct Row {
    id: DocumentId,
    document: Document,
}

impl Row {
    pub fn from_value(value: &Value) -> Result<Self, DocumentError> {
        let document = Document::from_value(value, false)?;
        let id = document.id()?;
        Ok(Self { id, document })
    }

    pub fn id(&self) -> &DocumentId {
        &self.id
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

/// Converts a whole batch or nothing.
pub fn rows_from_batch(documents: &[Value]) -> Result<Vec<Row>, ListError> {
    documents
        .iter()
        .enumerate()
        .map(|(index, value)| {
            Row::from_value(value).map_err(|source| ListError::Document { index, source })
        })
        .collect()
}

/// The fields whose change warrants re-rendering the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderStamp {
    pub rows: usize,
    pub next_skip: usize,
    pub loaded_count: usize,
}

pub fn should_rerender(prev: &RenderStamp, next: &RenderStamp) -> bool {
    prev.rows != next.rows
        || prev.next_skip != next.next_skip
        || prev.loaded_count != next.loaded_count
}

#[derive(Debug, Clone, Default)]
pub struct ListViewState {
    rows: Vec<Row>,
    next_skip: usize,
    loaded_count: usize,
    total_count: usize,
}

impl ListViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn next_skip(&self) -> usize {
        self.next_skip
    }

    pub fn loaded_count(&self) -> usize {
        self.loaded_count
    }

    pub fn total_count(&self) -> usize {
        self.total_count
    }

    pub fn render_stamp(&self) -> RenderStamp {
        RenderStamp {
            rows: self.rows.len(),
            next_skip: self.next_skip,
            loaded_count: self.loaded_count,
        }
    }

    pub fn has_more(&self) -> bool {
        self.loaded_count < self.total_count
    }

    /// Offset of the next page, or `None` once everything is loaded.
    pub fn next_page_skip(&self) -> Option<usize> {
        self.has_more().then_some(self.next_skip)
    }

    pub fn position(&self, id: &DocumentId) -> Option<usize> {
        self.rows.iter().position(|row| row.id() == id)
    }

    pub fn row(&self, id: &DocumentId) -> Option<&Row> {
        self.rows.iter().find(|row| row.id() == id)
    }

    pub fn row_mut(&mut self, id: &DocumentId) -> Option<&mut Row> {
        self.rows.iter_mut().find(|row| row.id() == id)
    }

    pub(crate) fn reset(&mut self, rows: Vec<Row>, total_count: usize) {
        self.next_skip = rows.len();
        self.loaded_count = rows.len();
        self.total_count = total_count;
        self.rows = rows;
    }

    pub(crate) fn append(&mut self, rows: Vec<Row>) -> bool {
        if rows.is_empty() {
            return false;
        }
        self.next_skip += rows.len();
        self.loaded_count += rows.len();
        self.rows.extend(rows);
        true
    }

    /// Gives the removed slot back to the pagination cursor.
    pub(crate) fn remove(&mut self, id: &DocumentId) -> Result<Row, ListError> {
        let index = self
            .position(id)
            .ok_or_else(|| ListError::RowNotFound { id: id.clone() })?;
        let row = self.rows.remove(index);
        self.loaded_count = self.loaded_count.saturating_sub(1);
        self.next_skip = self.next_skip.saturating_sub(1);
        Ok(row)
    }

    pub(crate) fn accept_insert(&mut self) {
        self.total_count += 1;
    }
}
