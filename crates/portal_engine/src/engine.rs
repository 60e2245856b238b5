use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::{DateTime, Utc};
use portal_logging::{portal_debug, portal_error, portal_warn};

use crate::debounce::Debouncer;
use crate::export::ExportSaver;
use crate::gateway::{CollectionGateway, GatewaySettings, HttpGateway};
use crate::{EngineCommand, EngineEvent, FailureKind, GatewayError};

pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Clone)]
pub struct EngineConfig {
    pub gateway: GatewaySettings,
    pub export_dir: PathBuf,
    /// Quiet interval of the search debouncer.
    pub debounce: Duration,
    pub clock: Clock,
}

impl EngineConfig {
    pub fn default_with_export_dir(export_dir: PathBuf) -> Self {
        Self {
            export_dir,
            ..Self::default()
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            gateway: GatewaySettings::default(),
            export_dir: PathBuf::from("./exports"),
            debounce: Duration::from_millis(500),
            clock: Arc::new(Utc::now),
        }
    }
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Runs one command to completion and returns its event.
pub async fn execute(
    gateway: &dyn CollectionGateway,
    saver: &ExportSaver,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::ResolveAuth => EngineEvent::AuthResolved(gateway.current_user().await),
        EngineCommand::FetchCategories => {
            EngineEvent::CategoriesLoaded(gateway.fetch_categories().await)
        }
        EngineCommand::FetchArticles { seq, query } => EngineEvent::ArticlesLoaded {
            seq,
            result: gateway.fetch_articles(&query).await,
        },
        EngineCommand::FetchArticle { seq, id } => EngineEvent::ArticleLoaded {
            seq,
            result: gateway.fetch_article(&id).await,
        },
        EngineCommand::FetchStats { seq } => EngineEvent::StatsLoaded {
            seq,
            result: gateway.fetch_stats().await,
        },
        EngineCommand::TriggerJob => EngineEvent::JobSettled(gateway.trigger_job().await),
        EngineCommand::MutateArticle(mutation) => EngineEvent::ArticleMutated {
            action: mutation.action(),
            result: gateway.mutate_article(&mutation).await,
        },
        EngineCommand::MutateCategory(mutation) => EngineEvent::CategoryMutated {
            action: mutation.action(),
            result: gateway.mutate_category(&mutation).await,
        },
        EngineCommand::Export(kind) => {
            let result = match gateway.export_csv(kind).await {
                Ok(bytes) => saver.save(kind, &bytes).map_err(|err| {
                    GatewayError::new(FailureKind::ExportFailed(kind), err.to_string())
                }),
                Err(err) => Err(err),
            };
            EngineEvent::ExportSettled { kind, result }
        }
    }
}

enum Request {
    Execute(EngineCommand),
    Debounce(String),
}

/// Handle to the engine thread.
///
/// The thread owns a tokio runtime; each command runs as its own task and
/// reports through the [`EventSink`]. Dropping the last handle stops the
/// thread and cancels any pending debounced search.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<Request>,
}

impl EngineHandle {
    pub fn new(config: EngineConfig, sink: Arc<dyn EventSink>) -> Result<Self, GatewayError> {
        let gateway = HttpGateway::new(config.gateway.clone())?;
        Ok(Self::with_gateway(config, Arc::new(gateway), sink))
    }

    pub fn with_gateway(
        config: EngineConfig,
        gateway: Arc<dyn CollectionGateway>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let saver = Arc::new(ExportSaver::new(config.export_dir.clone(), config.clock.clone()));

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    portal_error!("Failed to start engine runtime: {}", err);
                    return;
                }
            };
            let _enter = runtime.enter();
            let debouncer = {
                let sink = sink.clone();
                Debouncer::spawn(config.debounce, move |text: String| {
                    sink.emit(EngineEvent::SearchSettled(text));
                })
            };

            while let Ok(request) = cmd_rx.recv() {
                match request {
                    Request::Debounce(text) => debouncer.push(text),
                    Request::Execute(command) => {
                        portal_debug!("Executing {:?}", command);
                        let gateway = gateway.clone();
                        let saver = saver.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let event = execute(gateway.as_ref(), &saver, command).await;
                            log_failure(&event);
                            sink.emit(event);
                        });
                    }
                }
            }
            debouncer.dispose();
        });

        Self { cmd_tx }
    }

    pub fn submit(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(Request::Execute(command));
    }

    /// Feeds raw search input; a [`EngineEvent::SearchSettled`] follows once
    /// input has been quiet for the configured interval.
    pub fn debounce_search(&self, text: impl Into<String>) {
        let _ = self.cmd_tx.send(Request::Debounce(text.into()));
    }
}

fn log_failure(event: &EngineEvent) {
    let failure = match event {
        EngineEvent::AuthResolved(Err(err))
        | EngineEvent::JobSettled(Err(err))
        | EngineEvent::CategoriesLoaded(Err(err)) => err,
        EngineEvent::ArticlesLoaded { result: Err(err), .. }
        | EngineEvent::ArticleLoaded { result: Err(err), .. }
        | EngineEvent::StatsLoaded { result: Err(err), .. }
        | EngineEvent::ArticleMutated { result: Err(err), .. }
        | EngineEvent::CategoryMutated { result: Err(err), .. }
        | EngineEvent::ExportSettled { result: Err(err), .. } => err,
        _ => return,
    };
    portal_warn!("Engine command failed: {}", failure);
}
