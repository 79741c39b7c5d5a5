use std::sync::mpsc;
use std::thread;

use chrono::Utc;
use rewriter_core::{CompletedRewrite, Effect, Msg};
use rewriter_engine::{
    ApiTarget, EngineEvent, EngineHandle, EngineSender, RewriteRequest, TextSink,
};
use rewriter_logging::{rw_info, rw_warn};

use super::app::AppEvent;
use super::ui;

/// Bridges core effects to the engine and engine events back to core messages.
pub(crate) struct EffectRunner {
    engine: EngineSender,
}

impl EffectRunner {
    pub(crate) fn new(
        event_tx: mpsc::Sender<AppEvent>,
        sink: Box<dyn TextSink + Send>,
    ) -> anyhow::Result<Self> {
        let engine = EngineHandle::new(sink)
            .map_err(|err| anyhow::anyhow!("engine start failed: {err}"))?;
        let sender = engine.sender();
        spawn_event_loop(engine, event_tx);
        Ok(Self { engine: sender })
    }

    pub(crate) fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::CallApi {
                    request_id,
                    endpoint_url,
                    model_name,
                    request,
                } => {
                    rw_info!(
                        "CallApi request_id={} model={} text_len={}",
                        request_id,
                        model_name,
                        request.source_text.len()
                    );
                    self.engine.rewrite(
                        request_id,
                        ApiTarget {
                            endpoint_url,
                            model_name,
                        },
                        RewriteRequest {
                            source_text: request.source_text,
                            style: request.style,
                        },
                    );
                }
                Effect::FetchModels { endpoint_url } => {
                    self.engine.list_models(endpoint_url);
                }
                Effect::DeliverText { text } => {
                    self.engine.deliver(text);
                }
                Effect::Notify { title, message } => {
                    println!("{}", ui::render::notification(&title, &message));
                }
            }
        }
    }

    pub(crate) fn copy(&self, text: String) {
        self.engine.copy(text);
    }
}

fn spawn_event_loop(engine: EngineHandle, event_tx: mpsc::Sender<AppEvent>) {
    thread::spawn(move || {
        while let Some(event) = engine.recv() {
            let msg = match event {
                EngineEvent::RewriteFinished { request_id, result } => Msg::RewriteFinished {
                    request_id,
                    result: match result {
                        Ok(rewritten) => Ok(CompletedRewrite {
                            rewritten,
                            timestamp: Utc::now().to_rfc3339(),
                        }),
                        Err(err) => {
                            rw_warn!("Rewrite request {} failed: {}", request_id, err);
                            Err(err.message)
                        }
                    },
                },
                EngineEvent::ModelsListed { result } => Msg::ModelListLoaded {
                    result: result.map_err(|err| err.message),
                },
            };
            if event_tx.send(AppEvent::Core(msg)).is_err() {
                break;
            }
        }
    });
}
