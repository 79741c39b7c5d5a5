use crate::{RequestId, StoreSnapshot};

/// Payload of a successful API call, produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedRewrite {
    pub rewritten: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Restore persisted configuration and results at startup.
    StateRestored(StoreSnapshot),
    /// User invoked the rewrite action on the current text selection.
    RewriteRequested { text: String },
    /// Engine finished (or failed) the API call for one trigger.
    RewriteFinished {
        request_id: RequestId,
        result: Result<CompletedRewrite, String>,
    },
    /// User cleared the history (also clears the latest result).
    ClearHistoryClicked,
    /// The result/history view became visible; clears the status badge.
    ResultViewOpened,
    /// User edited the endpoint URL in the options surface.
    EndpointEdited(String),
    /// User picked a rewrite style.
    StyleEdited(String),
    /// User picked a model from the fetched list.
    ModelSelected(String),
    /// User asked the options surface to enumerate available models.
    ModelListRequested,
    /// Engine finished the model enumeration call.
    ModelListLoaded {
        result: Result<Vec<String>, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
