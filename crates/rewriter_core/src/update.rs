use crate::{AppState, CompletedRewrite, DeliveryProfile, Effect, Msg, RewriteRequest};

const NOTIFY_TITLE: &str = "Ollama Rewriter";

/// Pure update function: applies a message to state and returns any effects.
///
/// The caller must publish the returned state (persist + render) before
/// executing the effects, so a Loading outcome is always observable before
/// the network call it belongs to begins.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::StateRestored(snapshot) => {
            state.restore(snapshot);
            Vec::new()
        }
        Msg::RewriteRequested { text } => {
            if text.trim().is_empty() {
                return (state, Vec::new());
            }
            if !state.config().is_complete() {
                // Deliberately no state change: the notification is the only feedback.
                return (
                    state,
                    vec![Effect::Notify {
                        title: NOTIFY_TITLE.to_string(),
                        message: "API URL or model not configured. Set them in the options view."
                            .to_string(),
                    }],
                );
            }
            let endpoint_url = state.config().endpoint_url.clone();
            let model_name = state.config().model_name.clone();
            let style = state.config().style.clone();
            let request_id = state.begin_rewrite(text.clone());
            vec![Effect::CallApi {
                request_id,
                endpoint_url,
                model_name,
                request: RewriteRequest {
                    source_text: text,
                    style,
                },
            }]
        }
        Msg::RewriteFinished { request_id, result } => {
            if !state.is_active_request(request_id) {
                // A newer trigger superseded this one; drop the stale completion.
                return (state, Vec::new());
            }
            match result {
                Ok(CompletedRewrite {
                    rewritten,
                    timestamp,
                }) => {
                    state.complete_rewrite(rewritten.clone(), timestamp);
                    if state.profile() == DeliveryProfile::PageInsert {
                        vec![Effect::DeliverText { text: rewritten }]
                    } else {
                        Vec::new()
                    }
                }
                Err(error) => {
                    state.fail_rewrite(error);
                    Vec::new()
                }
            }
        }
        Msg::ClearHistoryClicked => {
            state.clear_results();
            Vec::new()
        }
        Msg::ResultViewOpened => {
            state.clear_badge();
            Vec::new()
        }
        Msg::EndpointEdited(url) => {
            state.set_endpoint_url(url);
            Vec::new()
        }
        Msg::StyleEdited(style) => {
            state.set_style(style);
            Vec::new()
        }
        Msg::ModelSelected(name) => {
            state.set_model_name(name);
            Vec::new()
        }
        Msg::ModelListRequested => {
            let endpoint_url = state.config().endpoint_url.clone();
            if endpoint_url.is_empty() {
                return (
                    state,
                    vec![Effect::Notify {
                        title: NOTIFY_TITLE.to_string(),
                        message: "Enter an API URL before fetching models.".to_string(),
                    }],
                );
            }
            state.models_loading();
            vec![Effect::FetchModels { endpoint_url }]
        }
        Msg::ModelListLoaded { result } => {
            state.apply_models(result);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
