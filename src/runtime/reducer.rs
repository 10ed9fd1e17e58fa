use crate::runtime::effect::Effect;
use crate::runtime::event::{Action, StoreEvent};
use crate::state::list::{ListError, ListViewState, rows_from_batch, should_rerender};

pub struct Reducer;

impl Reducer {
    /// Applies one store event. On error the state is left exactly as it was.
    pub fn reduce(state: &mut ListViewState, event: StoreEvent) -> Result<Vec<Effect>, ListError> {
        let before = state.render_stamp();
        let name = event.name();

        let mut effects = match event {
            StoreEvent::Reset {
                documents,
                total_count,
            } => {
                let rows = rows_from_batch(&documents)?;
                state.reset(rows, total_count);
                vec![]
            }
            StoreEvent::Append { documents } => {
                let rows = rows_from_batch(&documents)?;
                state.append(rows);
                vec![]
            }
            StoreEvent::Remove { id } => {
                state.remove(&id)?;
                vec![]
            }
            StoreEvent::InsertResult(Ok(_)) => {
                state.accept_insert();
                load_more(state).into_iter().collect()
            }
            StoreEvent::InsertResult(Err(failure)) => {
                tracing::debug!(%failure, "insert failed, list unchanged");
                vec![]
            }
        };

        let after = state.render_stamp();
        if should_rerender(&before, &after) {
            effects.push(Effect::RequestRender);
        }

        tracing::debug!(
            event = name,
            rows = after.rows,
            next_skip = after.next_skip,
            loaded = state.loaded_count(),
            total = state.total_count(),
            "store event applied"
        );
        Ok(effects)
    }
}

/// Fetch request for the next page, gated on there being more to load.
pub fn load_more(state: &ListViewState) -> Option<Effect> {
    state
        .next_page_skip()
        .map(|skip| Effect::Action(Action::FetchNextPage { skip }))
}

#[cfg(test)]
mod tests {
    use super::Reducer;
    use crate::core::DocumentId;
    use crate::core::object_id::ObjectId;
    use crate::core::value::Value;
    use crate::runtime::effect::Effect;
    use crate::runtime::event::{Action, InsertFailure, StoreEvent};
    use crate::state::list::{ListError, ListViewState};
    use serde_json::json;

    fn doc(id: &str) -> Value {
        Value::from_json(&json!({ "_id": id, "v": id })).expect("doc")
    }

    fn oid_doc(byte: u8) -> Value {
        let hex = ObjectId::from_bytes([byte; 12]).to_hex();
        Value::from_json(&json!({ "_id": { "$oid": hex } })).expect("doc")
    }

    fn ids(state: &ListViewState) -> Vec<DocumentId> {
        state.rows().iter().map(|row| row.id().clone()).collect()
    }

    fn counters(state: &ListViewState) -> (usize, usize, usize, usize) {
        (
            state.rows().len(),
            state.next_skip(),
            state.loaded_count(),
            state.total_count(),
        )
    }

    #[test]
    fn reset_append_remove_scenario() {
        let mut state = ListViewState::new();

        let effects = Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("d1"), doc("d2"), doc("d3")],
                total_count: 10,
            },
        )
        .expect("reset");
        assert_eq!(effects, vec![Effect::RequestRender]);
        assert_eq!(counters(&state), (3, 3, 3, 10));

        Reducer::reduce(
            &mut state,
            StoreEvent::Append {
                documents: vec![doc("d4"), doc("d5")],
            },
        )
        .expect("append");
        assert_eq!(counters(&state), (5, 5, 5, 10));

        Reducer::reduce(
            &mut state,
            StoreEvent::Remove {
                id: DocumentId::from("d2"),
            },
        )
        .expect("remove");
        assert_eq!(counters(&state), (4, 4, 4, 10));
        assert_eq!(
            ids(&state),
            vec![
                DocumentId::from("d1"),
                DocumentId::from("d3"),
                DocumentId::from("d4"),
                DocumentId::from("d5"),
            ]
        );
    }

    #[test]
    fn empty_append_is_a_silent_noop() {
        let mut state = ListViewState::new();
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("a")],
                total_count: 4,
            },
        )
        .expect("reset");
        let before = counters(&state);

        let effects = Reducer::reduce(&mut state, StoreEvent::Append { documents: vec![] })
            .expect("append");
        assert!(effects.is_empty());
        assert_eq!(counters(&state), before);
    }

    #[test]
    fn remove_matches_structured_ids_by_value() {
        let mut state = ListViewState::new();
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![oid_doc(1), oid_doc(2), oid_doc(3)],
                total_count: 3,
            },
        )
        .expect("reset");

        let target = DocumentId::from(ObjectId::from_bytes([2; 12]));
        Reducer::reduce(&mut state, StoreEvent::Remove { id: target.clone() }).expect("remove");
        assert_eq!(counters(&state), (2, 2, 2, 3));
        assert!(state.row(&target).is_none());
    }

    #[test]
    fn compound_ids_load_and_remove() {
        let mut state = ListViewState::new();
        let compound = Value::from_json(&json!({ "_id": { "region": "eu", "n": 1 } })).expect("doc");
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("a"), compound],
                total_count: 2,
            },
        )
        .expect("compound ids should reset");
        assert_eq!(counters(&state), (2, 2, 2, 2));

        let key = Value::from_json(&json!({ "region": "eu", "n": 1 })).expect("key");
        Reducer::reduce(
            &mut state,
            StoreEvent::Remove {
                id: DocumentId::new(key),
            },
        )
        .expect("remove");
        assert_eq!(counters(&state), (1, 1, 1, 2));
        assert_eq!(ids(&state), vec![DocumentId::from("a")]);
    }

    #[test]
    fn neighbouring_large_integer_ids_stay_distinct() {
        let mut state = ListViewState::new();
        let low = Value::from_json(&json!({ "_id": 9007199254740992_i64 })).expect("doc");
        let high = Value::from_json(&json!({ "_id": 9007199254740993_i64 })).expect("doc");
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![low, high],
                total_count: 2,
            },
        )
        .expect("reset");

        let target = Value::from_json(&json!(9007199254740993_i64)).expect("id");
        Reducer::reduce(
            &mut state,
            StoreEvent::Remove {
                id: DocumentId::new(target),
            },
        )
        .expect("remove");

        let kept = Value::from_json(&json!(9007199254740992_i64)).expect("id");
        assert_eq!(counters(&state), (1, 1, 1, 2));
        assert_eq!(ids(&state), vec![DocumentId::new(kept)]);
    }

    #[test]
    fn unknown_remove_is_reported_and_changes_nothing() {
        let mut state = ListViewState::new();
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("a"), doc("b")],
                total_count: 2,
            },
        )
        .expect("reset");

        let err = Reducer::reduce(
            &mut state,
            StoreEvent::Remove {
                id: DocumentId::from("zzz"),
            },
        )
        .expect_err("missing row");
        assert_eq!(
            err,
            ListError::RowNotFound {
                id: DocumentId::from("zzz")
            }
        );
        assert_eq!(counters(&state), (2, 2, 2, 2));
    }

    #[test]
    fn bad_document_in_batch_rejects_whole_append() {
        let mut state = ListViewState::new();
        let bad = Value::from_json(&json!({ "no_id": true })).expect("value");
        let err = Reducer::reduce(
            &mut state,
            StoreEvent::Append {
                documents: vec![doc("a"), bad],
            },
        )
        .expect_err("bad batch");
        assert!(matches!(err, ListError::Document { index: 1, .. }));
        assert_eq!(counters(&state), (0, 0, 0, 0));
    }

    #[test]
    fn successful_insert_bumps_total_and_fetches() {
        let mut state = ListViewState::new();
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("a"), doc("b")],
                total_count: 2,
            },
        )
        .expect("reset");

        let effects = Reducer::reduce(&mut state, StoreEvent::InsertResult(Ok(doc("c"))))
            .expect("insert");
        assert_eq!(state.total_count(), 3);
        assert_eq!(
            effects,
            vec![Effect::Action(Action::FetchNextPage { skip: 2 })]
        );
    }

    #[test]
    fn failed_insert_leaves_state_alone() {
        let mut state = ListViewState::new();
        Reducer::reduce(
            &mut state,
            StoreEvent::Reset {
                documents: vec![doc("a")],
                total_count: 1,
            },
        )
        .expect("reset");

        let effects = Reducer::reduce(
            &mut state,
            StoreEvent::InsertResult(Err(InsertFailure::new("duplicate key"))),
        )
        .expect("failed insert is not a list error");
        assert!(effects.is_empty());
        assert_eq!(counters(&state), (1, 1, 1, 1));
    }

    #[test]
    fn loaded_count_tracks_rows_across_sequences() {
        let mut state = ListViewState::new();
        let events = vec![
            StoreEvent::Reset {
                documents: vec![doc("a"), doc("b")],
                total_count: 6,
            },
            StoreEvent::Append {
                documents: vec![doc("c")],
            },
            StoreEvent::Remove {
                id: DocumentId::from("a"),
            },
            StoreEvent::Append { documents: vec![] },
            StoreEvent::Remove {
                id: DocumentId::from("missing"),
            },
            StoreEvent::Reset {
                documents: vec![doc("x")],
                total_count: 1,
            },
            StoreEvent::Append {
                documents: vec![doc("y"), doc("z")],
            },
            StoreEvent::Remove {
                id: DocumentId::from("z"),
            },
        ];

        for event in events {
            let _ = Reducer::reduce(&mut state, event);
            assert_eq!(state.loaded_count(), state.rows().len());
        }
        assert_eq!(counters(&state), (2, 2, 2, 1));
    }
}
