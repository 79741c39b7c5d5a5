use std::cell::RefCell;
use std::io::{self, BufRead};
use std::sync::mpsc;
use std::thread;

use rewriter_core::{
    update, AppState, AppViewModel, Badge, HistoryEntry, ModelsState, Msg, ResultView,
    RewriteOutcome, StoreSnapshot,
};
use rewriter_engine::DesktopSink;
use rewriter_logging::rw_info;

use super::effects::EffectRunner;
use super::logging::{self, LogDestination};
use super::store::SettingsStore;
use super::ui;
use crate::cli::Cli;

const HELP: &str = "Type text to rewrite it. Commands: :models, :url <url>, \
                    :model <name>, :style <style>, :open, :copy [n], :clear, :quit";

/// Events feeding the single-threaded dispatch loop.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum AppEvent {
    Core(Msg),
    Copy(Option<usize>),
    Quit,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    logging::initialize(if cli.log_to_terminal {
        LogDestination::Terminal
    } else {
        LogDestination::File
    });

    let mut store = SettingsStore::new(cli.store.clone());
    // The result and history views are purely reactive: they re-render from
    // the store change notifications.
    let results = RefCell::new(ResultSurface::new());
    store.on_change(move |snapshot| {
        for view in results.borrow_mut().refresh(snapshot) {
            println!("{view}");
        }
    });

    let (event_tx, event_rx) = mpsc::channel();
    let sink = Box::new(DesktopSink::new(io::stdout()));
    let runner = EffectRunner::new(event_tx.clone(), sink)?;
    spawn_input_thread(event_tx);

    println!("{HELP}");

    let mut surface = StatusSurface::new();
    let mut state = AppState::new(cli.deliver.profile());
    let snapshot = store.load();
    state = dispatch(
        state,
        Msg::StateRestored(snapshot),
        &store,
        &runner,
        &mut surface,
    );

    while let Ok(event) = event_rx.recv() {
        match event {
            AppEvent::Quit => break,
            AppEvent::Copy(index) => copy_from_view(&state.view(), index, &runner),
            AppEvent::Core(msg) => {
                state = dispatch(state, msg, &store, &runner, &mut surface);
            }
        }
    }

    rw_info!("Shutting down");
    Ok(())
}

/// Applies one message. The state is published (store write + renders)
/// before the effects run, so a Loading outcome is always observable before
/// its network call starts.
fn dispatch(
    state: AppState,
    msg: Msg,
    store: &SettingsStore,
    runner: &EffectRunner,
    surface: &mut StatusSurface,
) -> AppState {
    let (mut state, effects) = update(state, msg);
    if state.consume_dirty() {
        store.save(&state.snapshot());
        surface.refresh(&state.view());
    }
    runner.enqueue(effects);
    state
}

/// Result and history views fed by store notifications. A save that only
/// touched configuration reprints neither.
struct ResultSurface {
    latest: Option<RewriteOutcome>,
    history: Vec<HistoryEntry>,
}

impl ResultSurface {
    fn new() -> Self {
        Self {
            latest: None,
            history: Vec::new(),
        }
    }

    /// Returns the views whose slice of the snapshot changed.
    fn refresh(&mut self, snapshot: &StoreSnapshot) -> Vec<String> {
        let mut views = Vec::new();
        if self.latest != snapshot.latest_result {
            self.latest = snapshot.latest_result.clone();
            views.push(ui::render::result_view(self.latest.as_ref()));
        }
        if self.history != snapshot.history {
            self.history = snapshot.history.clone();
            views.push(ui::render::history_view(&self.history));
        }
        views
    }
}

/// Persistent status indicator plus the options surface; both only reprint
/// when their content actually changed.
struct StatusSurface {
    badge: Badge,
    models: ModelsState,
}

impl StatusSurface {
    fn new() -> Self {
        Self {
            badge: Badge::Idle,
            models: ModelsState::NotLoaded,
        }
    }

    fn refresh(&mut self, view: &AppViewModel) {
        if view.badge != self.badge {
            self.badge = view.badge;
            println!("[status: {}]", ui::render::badge_label(view.badge));
        }
        if view.options.models != self.models {
            self.models = view.options.models.clone();
            println!("{}", ui::render::options_view(&view.options));
        }
    }
}

fn copy_from_view(view: &AppViewModel, index: Option<usize>, runner: &EffectRunner) {
    let text = match index {
        None => match &view.result {
            ResultView::Complete { rewritten, .. } => Some(rewritten.clone()),
            _ => None,
        },
        Some(n) => n
            .checked_sub(1)
            .and_then(|i| view.history.get(i))
            .map(|row| row.rewritten.clone()),
    };
    match text {
        Some(text) => runner.copy(text),
        None => println!("Nothing to copy."),
    }
}

fn spawn_input_thread(event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            match parse_line(&line) {
                Some(event) => {
                    let quit = matches!(event, AppEvent::Quit);
                    if event_tx.send(event).is_err() || quit {
                        break;
                    }
                }
                None => {
                    if line.trim().starts_with(':') {
                        println!("{HELP}");
                    }
                }
            }
        }
    });
}

/// Maps an input line to an event. A plain line is a selection trigger;
/// `:`-prefixed lines are commands.
fn parse_line(line: &str) -> Option<AppEvent> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }
    let Some(rest) = trimmed.strip_prefix(':') else {
        return Some(AppEvent::Core(Msg::RewriteRequested {
            text: trimmed.to_string(),
        }));
    };
    let mut parts = rest.splitn(2, char::is_whitespace);
    let command = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::trim).unwrap_or_default();
    let event = match command {
        "quit" | "q" => AppEvent::Quit,
        "clear" => AppEvent::Core(Msg::ClearHistoryClicked),
        "open" => AppEvent::Core(Msg::ResultViewOpened),
        "models" => AppEvent::Core(Msg::ModelListRequested),
        "url" => AppEvent::Core(Msg::EndpointEdited(arg.to_string())),
        "model" => AppEvent::Core(Msg::ModelSelected(arg.to_string())),
        "style" => AppEvent::Core(Msg::StyleEdited(arg.to_string())),
        "copy" => AppEvent::Copy(if arg.is_empty() {
            None
        } else {
            Some(arg.parse().ok()?)
        }),
        _ => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::{parse_line, AppEvent, ResultSurface};
    use rewriter_core::{
        Configuration, HistoryEntry, Msg, RewriteOutcome, StoreSnapshot,
    };

    fn snapshot_with_result() -> StoreSnapshot {
        StoreSnapshot {
            config: Configuration::default(),
            latest_result: Some(RewriteOutcome::Complete {
                original: "hey whats up".to_string(),
                rewritten: "Hello, how are you?".to_string(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
            }),
            history: vec![HistoryEntry {
                original: "hey whats up".to_string(),
                rewritten: "Hello, how are you?".to_string(),
                timestamp: "2026-01-01T00:00:00Z".to_string(),
            }],
        }
    }

    #[test]
    fn result_surface_reprints_changed_slices_only() {
        let mut surface = ResultSurface::new();

        // A completed rewrite changes both views.
        let views = surface.refresh(&snapshot_with_result());
        assert_eq!(views.len(), 2);
        assert!(views[0].contains("Hello, how are you?"));
        assert!(views[1].contains("1. Hello, how are you?"));

        // A configuration-only save changes neither.
        let mut options_edit = snapshot_with_result();
        options_edit.config.style = "casually".to_string();
        assert!(surface.refresh(&options_edit).is_empty());

        // Clearing resets both views at once.
        let cleared = StoreSnapshot {
            config: options_edit.config,
            latest_result: None,
            history: Vec::new(),
        };
        assert_eq!(surface.refresh(&cleared).len(), 2);
    }

    #[test]
    fn plain_text_is_a_rewrite_trigger() {
        assert_eq!(
            parse_line("  hey whats up  "),
            Some(AppEvent::Core(Msg::RewriteRequested {
                text: "hey whats up".to_string()
            }))
        );
    }

    #[test]
    fn blank_lines_are_ignored() {
        assert_eq!(parse_line("   "), None);
    }

    #[test]
    fn commands_map_to_events() {
        assert_eq!(parse_line(":quit"), Some(AppEvent::Quit));
        assert_eq!(
            parse_line(":clear"),
            Some(AppEvent::Core(Msg::ClearHistoryClicked))
        );
        assert_eq!(
            parse_line(":url http://localhost:11434"),
            Some(AppEvent::Core(Msg::EndpointEdited(
                "http://localhost:11434".to_string()
            )))
        );
        assert_eq!(
            parse_line(":model llama3"),
            Some(AppEvent::Core(Msg::ModelSelected("llama3".to_string())))
        );
        assert_eq!(parse_line(":copy"), Some(AppEvent::Copy(None)));
        assert_eq!(parse_line(":copy 2"), Some(AppEvent::Copy(Some(2))));
    }

    #[test]
    fn unknown_commands_and_bad_indices_are_rejected() {
        assert_eq!(parse_line(":frobnicate"), None);
        assert_eq!(parse_line(":copy x"), None);
    }
}
