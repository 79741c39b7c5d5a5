use std::fmt::Write;

use rewriter_core::{Badge, HistoryEntry, ModelsState, OptionsView, RewriteOutcome};

const RESULT_PLACEHOLDER: &str = "No result yet. Select text and trigger a rewrite.";
const HISTORY_PLACEHOLDER: &str = "No history yet.";

/// Current-result view: loading, complete with a copy hint, or the error.
pub(crate) fn result_view(latest: Option<&RewriteOutcome>) -> String {
    match latest {
        None => RESULT_PLACEHOLDER.to_string(),
        Some(RewriteOutcome::Loading { original }) => {
            format!("Processing... your text is being rewritten.\n  Original: {original}")
        }
        Some(RewriteOutcome::Complete {
            original,
            rewritten,
            timestamp,
        }) => format!(
            "Rewritten text ({timestamp}):\n  {rewritten}\nOriginal text:\n  {original}\nType :copy to copy the rewritten text."
        ),
        Some(RewriteOutcome::Failed { original, error }) => {
            format!("Rewrite failed: {error}\n  Original: {original}")
        }
    }
}

pub(crate) fn history_view(history: &[HistoryEntry]) -> String {
    if history.is_empty() {
        return HISTORY_PLACEHOLDER.to_string();
    }
    let mut out = String::from("History (newest first):\n");
    for (index, entry) in history.iter().enumerate() {
        let _ = writeln!(
            out,
            "  {}. {}  [{}]",
            index + 1,
            entry.rewritten,
            entry.timestamp
        );
    }
    out.push_str("Type :copy <n> to copy an entry.");
    out
}

pub(crate) fn options_view(options: &OptionsView) -> String {
    let models = match &options.models {
        ModelsState::NotLoaded => "not fetched yet (:models)".to_string(),
        ModelsState::Loading => "fetching models...".to_string(),
        ModelsState::Loaded(names) if names.is_empty() => {
            "no models found on the server".to_string()
        }
        ModelsState::Loaded(names) => names.join(", "),
        ModelsState::Failed(error) => format!("could not fetch models: {error}"),
    };
    let model_name = if options.model_name.is_empty() {
        "(unset)"
    } else {
        &options.model_name
    };
    format!(
        "Options:\n  endpoint: {}\n  model:    {}\n  style:    {}\n  models:   {}",
        options.endpoint_url, model_name, options.style, models
    )
}

pub(crate) fn badge_label(badge: Badge) -> &'static str {
    match badge {
        Badge::Idle => " ",
        Badge::Busy => "...",
        Badge::Success => "✓",
        Badge::Failure => "!",
    }
}

pub(crate) fn notification(title: &str, message: &str) -> String {
    format!("[{title}] {message}")
}
