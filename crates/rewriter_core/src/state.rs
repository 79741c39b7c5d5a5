use crate::view_model::{AppViewModel, HistoryRowView, OptionsView, ResultView};

pub type RequestId = u64;

/// History cap applied when no limit has been persisted.
pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// User-editable settings. Read-only to the trigger path; edited via the
/// options surface and persisted by the platform store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub endpoint_url: String,
    pub model_name: String,
    pub style: String,
    pub history_limit: usize,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:11434".to_string(),
            model_name: String::new(),
            style: "professionally".to_string(),
            history_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Configuration {
    /// A rewrite may only be attempted with a non-empty endpoint and model.
    pub fn is_complete(&self) -> bool {
        !self.endpoint_url.is_empty() && !self.model_name.is_empty()
    }
}

/// Tri-state result of one rewrite trigger. Exactly one instance is current
/// at a time; it moves Loading -> Complete or Loading -> Failed, once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewriteOutcome {
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
pub struct HistoryEntry {
    pub original: String,
    pub rewritten: String,
    pub timestamp: String,
}

/// Persistent status indicator for surfaces that are not reactive views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Badge {
    #[default]
    Idle,
    Busy,
    Success,
    Failure,
}

/// How a completed rewrite reaches the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryProfile {
    /// Push the text into the page's editable focus, clipboard as fallback.
    PageInsert,
    /// Persist only; the result and history views pick it up.
    #[default]
    StoreAndView,
}

/// Model enumeration state for the options surface.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelsState {
    #[default]
    NotLoaded,
    Loading,
    Loaded(Vec<String>),
    Failed(String),
}

/// Everything the platform store persists between runs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreSnapshot {
    pub config: Configuration,
    pub latest_result: Option<RewriteOutcome>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActiveRewrite {
    request_id: RequestId,
    original: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    profile: DeliveryProfile,
    config: Configuration,
    latest_result: Option<RewriteOutcome>,
    history: Vec<HistoryEntry>,
    badge: Badge,
    models: ModelsState,
    next_request_id: RequestId,
    active: Option<ActiveRewrite>,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(DeliveryProfile::default())
    }
}

impl AppState {
    pub fn new(profile: DeliveryProfile) -> Self {
        Self {
            profile,
            config: Configuration::default(),
            latest_result: None,
            history: Vec::new(),
            badge: Badge::Idle,
            models: ModelsState::NotLoaded,
            next_request_id: 0,
            active: None,
            dirty: false,
        }
    }

    pub fn profile(&self) -> DeliveryProfile {
        self.profile
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    /// Returns whether the state changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let result = match &self.latest_result {
            None => ResultView::Empty,
            Some(RewriteOutcome::Loading { original }) => ResultView::Loading {
                original: original.clone(),
            },
            Some(RewriteOutcome::Complete {
                original,
                rewritten,
                timestamp,
            }) => ResultView::Complete {
                original: original.clone(),
                rewritten: rewritten.clone(),
                timestamp: timestamp.clone(),
            },
            Some(RewriteOutcome::Failed { original, error }) => ResultView::Failed {
                original: original.clone(),
                error: error.clone(),
            },
        };
        AppViewModel {
            result,
            history: self
                .history
                .iter()
                .map(|entry| HistoryRowView {
                    rewritten: entry.rewritten.clone(),
                    timestamp: entry.timestamp.clone(),
                })
                .collect(),
            badge: self.badge,
            options: OptionsView {
                endpoint_url: self.config.endpoint_url.clone(),
                style: self.config.style.clone(),
                model_name: self.config.model_name.clone(),
                models: self.models.clone(),
            },
            dirty: self.dirty,
        }
    }

    /// Snapshot of the persisted slice of state for the platform store.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            config: self.config.clone(),
            latest_result: self.latest_result.clone(),
            history: self.history.clone(),
        }
    }

    pub(crate) fn restore(&mut self, snapshot: StoreSnapshot) {
        self.config = snapshot.config;
        self.latest_result = snapshot.latest_result;
        self.history = snapshot.history;
        self.history.truncate(self.config.history_limit);
        self.dirty = true;
    }

    pub(crate) fn begin_rewrite(&mut self, original: String) -> RequestId {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        // A second trigger while one is in flight supersedes it; the older
        // completion will no longer match `active` and is dropped.
        self.active = Some(ActiveRewrite {
            request_id,
            original: original.clone(),
        });
        self.latest_result = Some(RewriteOutcome::Loading { original });
        self.badge = Badge::Busy;
        self.dirty = true;
        request_id
    }

    pub(crate) fn is_active_request(&self, request_id: RequestId) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.request_id == request_id)
    }

    pub(crate) fn complete_rewrite(&mut self, rewritten: String, timestamp: String) {
        let Some(active) = self.active.take() else {
            return;
        };
        let entry = HistoryEntry {
            original: active.original,
            rewritten,
            timestamp,
        };
        self.history.insert(0, entry.clone());
        self.history.truncate(self.config.history_limit);
        self.latest_result = Some(RewriteOutcome::Complete {
            original: entry.original,
            rewritten: entry.rewritten,
            timestamp: entry.timestamp,
        });
        self.badge = Badge::Success;
        self.dirty = true;
    }

    pub(crate) fn fail_rewrite(&mut self, error: String) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.latest_result = Some(RewriteOutcome::Failed {
            original: active.original,
            error,
        });
        self.badge = Badge::Failure;
        self.dirty = true;
    }

    /// Clears history and the latest result together, in one observable update.
    pub(crate) fn clear_results(&mut self) {
        self.history.clear();
        self.latest_result = None;
        self.dirty = true;
    }

    pub(crate) fn clear_badge(&mut self) {
        if self.badge != Badge::Idle {
            self.badge = Badge::Idle;
            self.dirty = true;
        }
    }

    pub(crate) fn set_endpoint_url(&mut self, url: String) {
        self.config.endpoint_url = url;
        self.dirty = true;
    }

    pub(crate) fn set_style(&mut self, style: String) {
        self.config.style = style;
        self.dirty = true;
    }

    pub(crate) fn set_model_name(&mut self, name: String) {
        self.config.model_name = name;
        self.dirty = true;
    }

    pub(crate) fn models_loading(&mut self) {
        self.models = ModelsState::Loading;
        self.dirty = true;
    }

    pub(crate) fn apply_models(&mut self, result: Result<Vec<String>, String>) {
        self.models = match result {
            Ok(names) => ModelsState::Loaded(names),
            Err(error) => ModelsState::Failed(error),
        };
        self.dirty = true;
    }
}
