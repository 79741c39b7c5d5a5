//! Rewriter engine: API calls, delivery capabilities and effect execution.
mod bridge;
mod client;
mod deliver;
mod engine;
mod prompt;
mod types;

pub use bridge::{PageBridge, PageInstruction};
pub use client::{ApiTarget, OllamaClient, RewriteApi, RewriteRequest};
pub use deliver::{deliver_text, DeliverError, DeliveryReport, DesktopSink, TextSink};
pub use engine::{EngineHandle, EngineSender};
pub use prompt::build_prompt;
pub use types::{ApiError, ApiFailure, EngineEvent, RequestId};
