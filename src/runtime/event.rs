use crate::core::DocumentId;
use crate::core::value::Value;

/// Why the store could not insert a document. Passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("insert failed: {message}")]
pub struct InsertFailure {
    pub message: String,
}

impl InsertFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Results published by the data stores, applied to the list one at a time.
///
/// Stale results are not filtered here: a page fetched for a previous
/// query that arrives after a `Reset` is appended to the new list. The
/// store layer has to drop such responses before publishing them.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Reset {
        documents: Vec<Value>,
        total_count: usize,
    },
    Append {
        documents: Vec<Value>,
    },
    Remove {
        id: DocumentId,
    },
    InsertResult(Result<Value, InsertFailure>),
}

impl StoreEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Reset { .. } => "reset",
            Self::Append { .. } => "append",
            Self::Remove { .. } => "remove",
            Self::InsertResult(_) => "insert_result",
        }
    }
}

/// Requests the list sends upward to the store and dialog layers.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchNextPage { skip: usize },
    OpenInsertDialog { template: Value, clone: bool },
    RemoveDocument { id: DocumentId },
}
