use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use rewriter_core::{
    Configuration, HistoryEntry, RewriteOutcome, StoreSnapshot, DEFAULT_HISTORY_LIMIT,
};
use rewriter_logging::{rw_error, rw_info, rw_warn};
use serde::{Deserialize, Serialize};

/// Durable key-value slice of state. Field names follow the storage keys the
/// page-extension flavor of this tool persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PersistedState {
    ollama_url: String,
    ollama_model: String,
    rewrite_style: String,
    history_limit: usize,
    latest_result: Option<PersistedResult>,
    history: Vec<PersistedEntry>,
}

impl Default for PersistedState {
    fn default() -> Self {
        let config = Configuration::default();
        Self {
            ollama_url: config.endpoint_url,
            ollama_model: config.model_name,
            rewrite_style: config.style,
            history_limit: DEFAULT_HISTORY_LIMIT,
            latest_result: None,
            history: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
enum PersistedResult {
    Loading {
        original: String,
    },
    Complete {
        original: String,
        rewritten: String,
        timestamp: String,
    },
    Error {
        original: String,
        message: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedEntry {
    original: String,
    rewritten: String,
    timestamp: String,
}

type ChangeListener = Box<dyn Fn(&StoreSnapshot)>;

/// Durable store for configuration and results, with change notification.
///
/// Reactive surfaces subscribe via [`SettingsStore::on_change`] and re-render
/// from the snapshot they are handed; they never reach into live state.
pub struct SettingsStore {
    path: PathBuf,
    listeners: Vec<ChangeListener>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            listeners: Vec::new(),
        }
    }

    pub fn on_change(&mut self, listener: impl Fn(&StoreSnapshot) + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Missing or unreadable state falls back to defaults.
    pub fn load(&self) -> StoreSnapshot {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return StoreSnapshot::default();
            }
            Err(err) => {
                rw_warn!("Failed to read store {:?}: {}", self.path, err);
                return StoreSnapshot::default();
            }
        };

        let state: PersistedState = match ron::from_str(&content) {
            Ok(state) => state,
            Err(err) => {
                rw_warn!("Failed to parse store {:?}: {}", self.path, err);
                return StoreSnapshot::default();
            }
        };

        rw_info!("Loaded persisted state from {:?}", self.path);
        snapshot_from_persisted(state)
    }

    /// Atomically replaces the store file, then notifies subscribers.
    pub fn save(&self, snapshot: &StoreSnapshot) {
        let state = persisted_from_snapshot(snapshot);
        let pretty = ron::ser::PrettyConfig::new();
        let content = match ron::ser::to_string_pretty(&state, pretty) {
            Ok(text) => text,
            Err(err) => {
                rw_error!("Failed to serialize store state: {}", err);
                return;
            }
        };

        if let Err(err) = write_atomic(&self.path, &content) {
            rw_error!("Failed to write store {:?}: {}", self.path, err);
            return;
        }

        for listener in &self.listeners {
            listener(snapshot);
        }
    }
}

/// Write via a temp file then rename, so readers never see a partial store.
fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;

    // Replace existing file if present to keep the rename portable.
    if path.exists() {
        fs::remove_file(path)?;
    }
    tmp.persist(path).map_err(|err| err.error)?;
    Ok(())
}

fn snapshot_from_persisted(state: PersistedState) -> StoreSnapshot {
    StoreSnapshot {
        config: Configuration {
            endpoint_url: state.ollama_url,
            model_name: state.ollama_model,
            style: state.rewrite_style,
            history_limit: state.history_limit,
        },
        latest_result: state.latest_result.map(|result| match result {
            PersistedResult::Loading { original } => RewriteOutcome::Loading { original },
            PersistedResult::Complete {
                original,
                rewritten,
                timestamp,
            } => RewriteOutcome::Complete {
                original,
                rewritten,
                timestamp,
            },
            PersistedResult::Error { original, message } => RewriteOutcome::Failed {
                original,
                error: message,
            },
        }),
        history: state
            .history
            .into_iter()
            .map(|entry| HistoryEntry {
                original: entry.original,
                rewritten: entry.rewritten,
                timestamp: entry.timestamp,
            })
            .collect(),
    }
}

fn persisted_from_snapshot(snapshot: &StoreSnapshot) -> PersistedState {
    PersistedState {
        ollama_url: snapshot.config.endpoint_url.clone(),
        ollama_model: snapshot.config.model_name.clone(),
        rewrite_style: snapshot.config.style.clone(),
        history_limit: snapshot.config.history_limit,
        latest_result: snapshot.latest_result.as_ref().map(|result| match result {
            RewriteOutcome::Loading { original } => PersistedResult::Loading {
                original: original.clone(),
            },
            RewriteOutcome::Complete {
                original,
                rewritten,
                timestamp,
            } => PersistedResult::Complete {
                original: original.clone(),
                rewritten: rewritten.clone(),
                timestamp: timestamp.clone(),
            },
            RewriteOutcome::Failed { original, error } => PersistedResult::Error {
                original: original.clone(),
                message: error.clone(),
            },
        }),
        history: snapshot
            .history
            .iter()
            .map(|entry| PersistedEntry {
                original: entry.original.clone(),
                rewritten: entry.rewritten.clone(),
                timestamp: entry.timestamp.clone(),
            })
            .collect(),
    }
}
