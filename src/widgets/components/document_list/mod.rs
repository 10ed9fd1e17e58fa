mod scroll;

pub use scroll::{FixedRowHeight, ScrollTrigger, ViewportMetrics};

use std::sync::mpsc::{Receiver, Sender, TryRecvError};

use indexmap::IndexMap;

use crate::core::DocumentId;
use crate::core::value::Value;
use crate::runtime::effect::Effect;
use crate::runtime::event::{Action, StoreEvent};
use crate::runtime::reducer::{Reducer, load_more};
use crate::state::list::{ListError, ListViewState, Row};

/// Outcome of draining the store event channel.
#[derive(Debug, Default)]
pub struct PumpReport {
    pub applied: usize,
    pub render: bool,
    pub errors: Vec<ListError>,
}

pub fn empty_insert_template() -> Value {
    let mut map = IndexMap::new();
    map.insert(String::new(), Value::Text(String::new()));
    Value::Object(map)
}

/// The incrementally loaded document list.
///
/// Store results arrive on `events` and are applied strictly one at a
/// time; requests for the store and dialog layers leave on `actions`.
pub struct DocumentList<M> {
    state: ListViewState,
    trigger: ScrollTrigger,
    metrics: M,
    events: Receiver<StoreEvent>,
    actions: Sender<Action>,
    insert_template: Value,
}

impl<M: ViewportMetrics> DocumentList<M> {
    pub fn new(events: Receiver<StoreEvent>, actions: Sender<Action>, metrics: M) -> Self {
        Self {
            state: ListViewState::new(),
            trigger: ScrollTrigger::new(),
            metrics,
            events,
            actions,
            insert_template: empty_insert_template(),
        }
    }

    pub fn with_scroll_threshold(mut self, threshold: u32) -> Self {
        self.trigger = ScrollTrigger::with_fixed_threshold(threshold);
        self
    }

    pub fn with_insert_template(mut self, template: Value) -> Self {
        self.insert_template = template;
        self
    }

    pub fn state(&self) -> &ListViewState {
        &self.state
    }

    pub fn rows(&self) -> &[Row] {
        self.state.rows()
    }

    pub fn row(&self, id: &DocumentId) -> Option<&Row> {
        self.state.row(id)
    }

    /// Value edits inside a row do not change what the list renders.
    pub fn row_mut(&mut self, id: &DocumentId) -> Option<&mut Row> {
        self.state.row_mut(id)
    }

    pub fn pump(&mut self) -> PumpReport {
        let mut report = PumpReport::default();
        loop {
            let event = match self.events.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            report.applied += 1;
            match self.apply(event) {
                Ok(render) => report.render |= render,
                Err(err) => {
                    tracing::error!(error = %err, "document list out of sync with store");
                    report.errors.push(err);
                }
            }
        }
        report
    }

    /// Applies one store event and returns whether the list needs re-rendering.
    pub fn apply(&mut self, event: StoreEvent) -> Result<bool, ListError> {
        let effects = Reducer::reduce(&mut self.state, event)?;
        Ok(self.run_effects(effects))
    }

    pub fn handle_scroll(&mut self, scroll_offset: u32) -> bool {
        let row_count = self.state.rows().len();
        if !self
            .trigger
            .should_fetch(scroll_offset, &self.metrics, row_count)
        {
            return false;
        }
        self.load_more()
    }

    pub fn load_more(&mut self) -> bool {
        match load_more(&self.state) {
            Some(effect) => {
                self.run_effects(vec![effect]);
                true
            }
            None => false,
        }
    }

    pub fn open_insert_dialog(&self) {
        self.send(Action::OpenInsertDialog {
            template: self.insert_template.clone(),
            clone: false,
        });
    }

    pub fn clone_document(&self, id: &DocumentId) -> Result<(), ListError> {
        let row = self
            .state
            .row(id)
            .ok_or_else(|| ListError::RowNotFound { id: id.clone() })?;
        self.send(Action::OpenInsertDialog {
            template: row.document().to_value(),
            clone: true,
        });
        Ok(())
    }

    /// Reports a completed user delete upward; the row itself goes away
    /// when the store confirms with a `Remove` event.
    pub fn request_remove(&self, id: DocumentId) {
        self.send(Action::RemoveDocument { id });
    }

    fn run_effects(&self, effects: Vec<Effect>) -> bool {
        let mut render = false;
        for effect in effects {
            match effect {
                Effect::Action(action) => self.send(action),
                Effect::RequestRender => render = true,
            }
        }
        render
    }

    fn send(&self, action: Action) {
        if let Err(err) = self.actions.send(action) {
            tracing::warn!(action = ?err.0, "action receiver dropped, request discarded");
        }
    }
}
