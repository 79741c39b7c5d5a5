//! Rewriter core: pure state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod update;
mod view_model;

pub use effect::{Effect, RewriteRequest};
pub use msg::{CompletedRewrite, Msg};
pub use state::{
    AppState, Badge, Configuration, DeliveryProfile, HistoryEntry, ModelsState, RequestId,
    RewriteOutcome, StoreSnapshot, DEFAULT_HISTORY_LIMIT,
};
pub use update::update;
pub use view_model::{AppViewModel, HistoryRowView, OptionsView, ResultView};
