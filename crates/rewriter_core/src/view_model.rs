use crate::{Badge, ModelsState};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub result: ResultView,
    pub history: Vec<HistoryRowView>,
    pub badge: Badge,
    pub options: OptionsView,
    pub dirty: bool,
}

/// Current-result view, derived from the latest outcome.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultView {
    #[default]
    Empty,
    Loading {
        original: String,
    },
    Complete {
        original: String,
        rewritten: String,
        timestamp: String,
    },
    Failed {
        original: String,
        error: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRowView {
    pub rewritten: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionsView {
    pub endpoint_url: String,
    pub style: String,
    pub model_name: String,
    pub models: ModelsState,
}
