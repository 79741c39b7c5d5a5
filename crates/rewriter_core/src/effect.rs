use crate::RequestId;

/// Per-trigger request data handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteRequest {
    pub source_text: String,
    pub style: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the rewrite API call for an accepted trigger.
    CallApi {
        request_id: RequestId,
        endpoint_url: String,
        model_name: String,
        request: RewriteRequest,
    },
    /// Enumerate the models available on the endpoint.
    FetchModels { endpoint_url: String },
    /// Push rewritten text to the page-insertion surface.
    DeliverText { text: String },
    /// Surface a user-facing notification outside the result views.
    Notify { title: String, message: String },
}
