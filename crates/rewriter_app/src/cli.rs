use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use rewriter_core::DeliveryProfile;

/// Rewrite selected text through a local Ollama endpoint.
#[derive(Debug, Parser)]
#[command(name = "rewriter", version, about)]
pub struct Cli {
    /// How completed rewrites are delivered.
    #[arg(long, value_enum, default_value_t = DeliverMode::Store)]
    pub deliver: DeliverMode,

    /// Path of the persisted settings/results store.
    #[arg(long, default_value = ".rewriter_state.ron")]
    pub store: PathBuf,

    /// Log to the terminal instead of ./rewriter.log.
    #[arg(long)]
    pub log_to_terminal: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeliverMode {
    /// Push into the page's editable focus, clipboard as fallback.
    Page,
    /// Persist only; the result and history views react to the store.
    Store,
}

impl DeliverMode {
    pub fn profile(self) -> DeliveryProfile {
        match self {
            DeliverMode::Page => DeliveryProfile::PageInsert,
            DeliverMode::Store => DeliveryProfile::StoreAndView,
        }
    }
}
