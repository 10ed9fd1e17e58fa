pub mod config;
pub mod core;
pub mod document;
pub mod error;
pub mod insert_dialog;
pub mod replay;
pub mod runtime;
pub mod state;
pub mod telemetry;
pub mod widgets;

pub use crate::core::DocumentId;
pub use crate::core::object_id::ObjectId;
pub use crate::core::value::Value;

pub use document::{ContainerType, Document, DocumentError, ElementId, KeyModel};

pub use runtime::effect::Effect;
pub use runtime::event::{Action, InsertFailure, StoreEvent};
pub use runtime::reducer::Reducer;

pub use state::list::{ListError, ListViewState, RenderStamp, Row, should_rerender};

pub use widgets::components::document_list::{
    DocumentList, FixedRowHeight, PumpReport, ScrollTrigger, ViewportMetrics,
};
pub use widgets::components::editable_key::{EditableKey, EditableKeyState, FocusRequest, KeyCode};

pub use error::Error;
