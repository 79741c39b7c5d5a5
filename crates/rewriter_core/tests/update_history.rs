use rewriter_core::{
    update, AppState, CompletedRewrite, Configuration, DeliveryProfile, Effect, Msg, RequestId,
    ResultView, StoreSnapshot,
};

fn configured(history_limit: usize) -> AppState {
    let snapshot = StoreSnapshot {
        config: Configuration {
            endpoint_url: "http://localhost:11434".to_string(),
            model_name: "llama3".to_string(),
            style: "professionally".to_string(),
            history_limit,
        },
        ..StoreSnapshot::default()
    };
    let (state, _) = update(
        AppState::new(DeliveryProfile::StoreAndView),
        Msg::StateRestored(snapshot),
    );
    state
}

fn rewrite_round(state: AppState, text: &str, rewritten: &str) -> AppState {
    let (state, effects) = update(
        state,
        Msg::RewriteRequested {
            text: text.to_string(),
        },
    );
    let request_id: RequestId = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CallApi { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("call effect");
    let (state, _) = update(
        state,
        Msg::RewriteFinished {
            request_id,
            result: Ok(CompletedRewrite {
                rewritten: rewritten.to_string(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
            }),
        },
    );
    state
}

#[test]
fn history_is_newest_first() {
    let mut state = configured(10);
    state = rewrite_round(state, "one", "One.");
    state = rewrite_round(state, "two", "Two.");

    let rows: Vec<_> = state
        .view()
        .history
        .iter()
        .map(|row| row.rewritten.clone())
        .collect();
    assert_eq!(rows, vec!["Two.".to_string(), "One.".to_string()]);
}

#[test]
fn history_cap_evicts_oldest_entries() {
    let mut state = configured(2);
    state = rewrite_round(state, "one", "One.");
    state = rewrite_round(state, "two", "Two.");
    state = rewrite_round(state, "three", "Three.");

    let rows: Vec<_> = state
        .view()
        .history
        .iter()
        .map(|row| row.rewritten.clone())
        .collect();
    assert_eq!(rows, vec!["Three.".to_string(), "Two.".to_string()]);
}

#[test]
fn zero_history_limit_keeps_history_empty() {
    let mut state = configured(0);
    state = rewrite_round(state, "one", "One.");

    assert!(state.view().history.is_empty());
    // The latest result is still published even when nothing is retained.
    assert!(matches!(state.view().result, ResultView::Complete { .. }));
}

#[test]
fn clear_resets_history_and_latest_result_together() {
    let mut state = configured(10);
    state = rewrite_round(state, "one", "One.");
    state.consume_dirty();

    let (mut state, effects) = update(state, Msg::ClearHistoryClicked);

    assert!(effects.is_empty());
    let view = state.view();
    assert!(view.history.is_empty());
    assert_eq!(view.result, ResultView::Empty);
    // A single dirty publication covers both resets.
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn failed_rewrite_leaves_history_untouched() {
    let mut state = configured(10);
    state = rewrite_round(state, "one", "One.");

    let (state, effects) = update(
        state,
        Msg::RewriteRequested {
            text: "two".to_string(),
        },
    );
    let request_id = effects
        .iter()
        .find_map(|effect| match effect {
            Effect::CallApi { request_id, .. } => Some(*request_id),
            _ => None,
        })
        .expect("call effect");
    let (state, _) = update(
        state,
        Msg::RewriteFinished {
            request_id,
            result: Err("API error: 500 Internal Server Error".to_string()),
        },
    );

    assert_eq!(state.view().history.len(), 1);
    assert_eq!(state.view().history[0].rewritten, "One.");
}
