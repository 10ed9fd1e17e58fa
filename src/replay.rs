//! Scripted replay of store events through a [`DocumentList`].
//!
//! A script is a YAML list of steps. Store results go through the event
//! channel and are pumped one step at a time, so the list sees them the
//! way it would see asynchronous store responses.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};

use serde::Deserialize;
use serde_json::json;

use crate::config::{BrowserConfig, ConfigError};
use crate::core::DocumentId;
use crate::core::object_id::ObjectIdParseError;
use crate::core::value::Value;
use crate::runtime::event::{Action, InsertFailure, StoreEvent};
use crate::state::list::ListError;
use crate::widgets::components::document_list::{DocumentList, FixedRowHeight};
use crate::widgets::components::editable_key::EditableKey;

pub const DEFAULT_ROW_HEIGHT: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid script: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("step {step}: {source}")]
    Value {
        step: usize,
        #[source]
        source: ObjectIdParseError,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to serialize report: {0}")]
    Report(#[source] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default)]
    pub row_height: Option<u32>,
    pub steps: Vec<Step>,
}

impl Script {
    pub fn load(path: &Path) -> Result<Self, ReplayError> {
        let raw = fs::read_to_string(path).map_err(|source| ReplayError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, ReplayError> {
        Ok(serde_yaml::from_str(raw)?)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Reset {
        documents: Vec<serde_json::Value>,
        total_count: usize,
    },
    Append {
        documents: Vec<serde_json::Value>,
    },
    Remove {
        id: serde_json::Value,
    },
    InsertOk {
        document: serde_json::Value,
    },
    InsertFailed {
        message: String,
    },
    Scroll {
        offset: u32,
    },
    OpenInsert,
    #[serde(rename = "clone")]
    CloneDocument {
        id: serde_json::Value,
    },
    RequestRemove {
        id: serde_json::Value,
    },
    EditKey {
        id: serde_json::Value,
        field: String,
        key: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeyEdit {
    pub id: DocumentId,
    pub field: String,
    pub key: String,
    pub duplicate: bool,
    pub applied: bool,
}

#[derive(Debug, Default)]
pub struct ReplayReport {
    pub renders: usize,
    pub actions: Vec<Action>,
    pub errors: Vec<String>,
    pub edits: Vec<KeyEdit>,
    pub row_ids: Vec<DocumentId>,
    pub next_skip: usize,
    pub loaded_count: usize,
    pub total_count: usize,
}

impl ReplayReport {
    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "rows": self.row_ids.iter().map(|id| id.value().to_json()).collect::<Vec<_>>(),
            "next_skip": self.next_skip,
            "loaded_count": self.loaded_count,
            "total_count": self.total_count,
            "renders": self.renders,
            "actions": self.actions.iter().map(action_json).collect::<Vec<_>>(),
            "edits": self.edits.iter().map(|edit| json!({
                "id": edit.id.value().to_json(),
                "field": edit.field,
                "key": edit.key,
                "duplicate": edit.duplicate,
                "applied": edit.applied,
            })).collect::<Vec<_>>(),
            "errors": self.errors,
        })
    }

    pub fn render(&self, pretty: bool) -> Result<String, ReplayError> {
        let json = self.to_json();
        let text = if pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        text.map_err(ReplayError::Report)
    }
}

fn action_json(action: &Action) -> serde_json::Value {
    match action {
        Action::FetchNextPage { skip } => json!({ "fetch_next_page": { "skip": skip } }),
        Action::OpenInsertDialog { template, clone } => json!({
            "open_insert_dialog": { "template": template.to_json(), "clone": clone }
        }),
        Action::RemoveDocument { id } => json!({ "remove_document": { "id": id.value().to_json() } }),
    }
}

struct Session {
    list: DocumentList<FixedRowHeight>,
    events: Sender<StoreEvent>,
    actions: Receiver<Action>,
    report: ReplayReport,
}

pub fn run(script: &Script, config: &BrowserConfig) -> Result<ReplayReport, ReplayError> {
    let (event_tx, event_rx) = mpsc::channel();
    let (action_tx, action_rx) = mpsc::channel();
    let row_height = script.row_height.unwrap_or(DEFAULT_ROW_HEIGHT);
    let list = config.apply(DocumentList::new(
        event_rx,
        action_tx,
        FixedRowHeight(row_height),
    ))?;

    let mut session = Session {
        list,
        events: event_tx,
        actions: action_rx,
        report: ReplayReport::default(),
    };

    for (idx, step) in script.steps.iter().enumerate() {
        let _span = tracing::debug_span!("replay_step", step = idx).entered();
        session.step(idx, step)?;
        session.report.actions.extend(session.actions.try_iter());
    }

    let state = session.list.state();
    let mut report = session.report;
    report.row_ids = state.rows().iter().map(|row| row.id().clone()).collect();
    report.next_skip = state.next_skip();
    report.loaded_count = state.loaded_count();
    report.total_count = state.total_count();
    Ok(report)
}

impl Session {
    fn step(&mut self, idx: usize, step: &Step) -> Result<(), ReplayError> {
        let value = |json: &serde_json::Value| {
            Value::from_json(json).map_err(|source| ReplayError::Value { step: idx, source })
        };
        let values = |docs: &[serde_json::Value]| docs.iter().map(value).collect::<Result<Vec<_>, _>>();

        match step {
            Step::Reset {
                documents,
                total_count,
            } => self.deliver(StoreEvent::Reset {
                documents: values(documents.as_slice())?,
                total_count: *total_count,
            }),
            Step::Append { documents } => self.deliver(StoreEvent::Append {
                documents: values(documents.as_slice())?,
            }),
            Step::Remove { id } => self.deliver(StoreEvent::Remove {
                id: DocumentId::new(value(id)?),
            }),
            Step::InsertOk { document } => {
                self.deliver(StoreEvent::InsertResult(Ok(value(document)?)))
            }
            Step::InsertFailed { message } => {
                self.deliver(StoreEvent::InsertResult(Err(InsertFailure::new(message.clone()))))
            }
            Step::Scroll { offset } => {
                self.list.handle_scroll(*offset);
            }
            Step::OpenInsert => self.list.open_insert_dialog(),
            Step::CloneDocument { id } => {
                let id = DocumentId::new(value(id)?);
                if let Err(err) = self.list.clone_document(&id) {
                    self.report.errors.push(err.to_string());
                }
            }
            Step::RequestRemove { id } => self.list.request_remove(DocumentId::new(value(id)?)),
            Step::EditKey { id, field, key } => {
                let id = DocumentId::new(value(id)?);
                self.edit_key(id, field, key);
            }
        }
        Ok(())
    }

    fn deliver(&mut self, event: StoreEvent) {
        if self.events.send(event).is_err() {
            return;
        }
        let pumped = self.list.pump();
        if pumped.render {
            self.report.renders += 1;
        }
        self.report
            .errors
            .extend(pumped.errors.iter().map(ToString::to_string));
    }

    fn edit_key(&mut self, id: DocumentId, path: &str, key: &str) {
        let Some(row) = self.list.row_mut(&id) else {
            self.report
                .errors
                .push(ListError::RowNotFound { id }.to_string());
            return;
        };
        let doc = row.document_mut();
        let Some(field) = doc.find(path) else {
            self.report
                .errors
                .push(format!("row {id} has no field {path:?}"));
            return;
        };

        let (mut editable, _) = EditableKey::mount(field, &*doc, None);
        editable.handle_focus(&*doc);
        editable.handle_change(doc, key);
        let duplicate = editable.is_duplicate();
        editable.handle_blur(&*doc);

        self.report.edits.push(KeyEdit {
            applied: doc.current_key(field) == key,
            id,
            field: path.to_string(),
            key: key.to_string(),
            duplicate,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::{ReplayError, Script, run};
    use crate::config::BrowserConfig;
    use crate::core::DocumentId;
    use crate::runtime::event::Action;
    use serde_json::json;

    const SCRIPT: &str = r#"
row_height: 10
steps:
  - reset:
      total_count: 10
      documents:
        - { _id: d1, name: a }
        - { _id: d2, name: b, nick: bb }
        - { _id: d3, name: c }
  - append:
      documents:
        - { _id: d4 }
        - { _id: d5 }
  - remove:
      id: d2
  - scroll:
      offset: 45
  - edit_key:
      id: d1
      field: name
      key: _id
  - remove:
      id: ghost
  - open_insert
  - insert_failed:
      message: E11000
"#;

    #[test]
    fn replay_runs_the_scenario() {
        let script = Script::from_yaml_str(SCRIPT).expect("script");
        let report = run(&script, &BrowserConfig::default()).expect("replay");

        assert_eq!(
            report.row_ids,
            vec![
                DocumentId::from("d1"),
                DocumentId::from("d3"),
                DocumentId::from("d4"),
                DocumentId::from("d5"),
            ]
        );
        assert_eq!(report.next_skip, 4);
        assert_eq!(report.loaded_count, 4);
        assert_eq!(report.total_count, 10);
        assert_eq!(report.renders, 3);

        assert_eq!(report.actions.len(), 2);
        assert_eq!(report.actions[0], Action::FetchNextPage { skip: 4 });
        assert!(matches!(
            report.actions[1],
            Action::OpenInsertDialog { clone: false, .. }
        ));

        assert_eq!(report.edits.len(), 1);
        assert!(report.edits[0].duplicate);
        assert!(report.edits[0].applied);

        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("ghost"));
    }

    #[test]
    fn report_json_lists_rows_and_actions() {
        let script = Script::from_yaml_str(
            "steps:\n  - reset: { total_count: 1, documents: [ { _id: { $oid: '000000000000000000000001' } } ] }\n  - request_remove: { id: { $oid: '000000000000000000000001' } }\n",
        )
        .expect("script");
        let report = run(&script, &BrowserConfig::default()).expect("replay");
        let json = report.to_json();
        assert_eq!(json["rows"], json!([{ "$oid": "000000000000000000000001" }]));
        assert_eq!(
            json["actions"],
            json!([{ "remove_document": { "id": { "$oid": "000000000000000000000001" } } }])
        );
    }

    #[test]
    fn malformed_ids_fail_the_step() {
        let script =
            Script::from_yaml_str("steps:\n  - remove: { id: { $oid: nope } }\n").expect("script");
        let err = run(&script, &BrowserConfig::default()).expect_err("bad oid");
        assert!(err.to_string().starts_with("step 0"));
    }

    #[test]
    fn render_honours_pretty_flag() {
        let script =
            Script::from_yaml_str("steps:\n  - reset: { total_count: 1, documents: [ { _id: a } ] }\n")
                .expect("script");
        let report = run(&script, &BrowserConfig::default()).expect("replay");

        let compact = report.render(false).expect("compact");
        let pretty = report.render(true).expect("pretty");
        assert!(!compact.contains('\n'));
        assert!(pretty.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&compact).expect("round trip");
        assert_eq!(parsed, report.to_json());
    }

    #[test]
    fn report_serialization_failure_is_an_error() {
        let source = serde_json::from_str::<serde_json::Value>("{").expect_err("truncated");
        let err = crate::error::Error::from(ReplayError::Report(source));
        assert!(err.to_string().starts_with("failed to serialize report"));
    }
}
