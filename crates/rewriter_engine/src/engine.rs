use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use rewriter_logging::{rw_error, rw_info, rw_warn};

use crate::client::{ApiTarget, OllamaClient, RewriteApi, RewriteRequest};
use crate::deliver::{deliver_text, TextSink};
use crate::{ApiError, EngineEvent, RequestId};

const INSERT_RETRY_DELAY: Duration = Duration::from_millis(10);

enum EngineCommand {
    Rewrite {
        request_id: RequestId,
        target: ApiTarget,
        request: RewriteRequest,
    },
    ListModels {
        endpoint_url: String,
    },
    Deliver {
        text: String,
    },
    Copy {
        text: String,
    },
}

/// Command/event bridge to the engine thread. API calls run on a tokio
/// runtime owned by that thread; delivery runs on the thread itself.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

/// Cheap cloneable command side of an [`EngineHandle`].
#[derive(Clone)]
pub struct EngineSender {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn new(sink: Box<dyn TextSink + Send>) -> Result<Self, ApiError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let client = Arc::new(OllamaClient::new()?);

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    rw_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let mut sink = sink;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::Rewrite {
                        request_id,
                        target,
                        request,
                    } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = client.rewrite(&target, &request).await;
                            let _ = event_tx.send(EngineEvent::RewriteFinished {
                                request_id,
                                result,
                            });
                        });
                    }
                    EngineCommand::ListModels { endpoint_url } => {
                        let client = client.clone();
                        let event_tx = event_tx.clone();
                        runtime.spawn(async move {
                            let result = client.list_models(&endpoint_url).await;
                            let _ = event_tx.send(EngineEvent::ModelsListed { result });
                        });
                    }
                    // Delivery is synchronous and cheap; run it on this thread.
                    EngineCommand::Deliver { text } => {
                        let report = deliver_text(sink.as_mut(), &text, INSERT_RETRY_DELAY);
                        rw_info!(
                            "Delivered rewrite (inserted={}, copied={})",
                            report.inserted,
                            report.copied
                        );
                    }
                    EngineCommand::Copy { text } => {
                        if let Err(err) = sink.copy_to_clipboard(&text) {
                            rw_warn!("Copy action failed: {}", err);
                        }
                    }
                }
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn sender(&self) -> EngineSender {
        EngineSender {
            cmd_tx: self.cmd_tx.clone(),
        }
    }

    /// Blocks until the next engine event; `None` once the engine is gone.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }
}

impl EngineSender {
    pub fn rewrite(&self, request_id: RequestId, target: ApiTarget, request: RewriteRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Rewrite {
            request_id,
            target,
            request,
        });
    }

    pub fn list_models(&self, endpoint_url: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::ListModels {
            endpoint_url: endpoint_url.into(),
        });
    }

    pub fn deliver(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Deliver { text: text.into() });
    }

    pub fn copy(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Copy { text: text.into() });
    }
}
