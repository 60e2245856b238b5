use std::sync::{mpsc, Arc};

use portal_core::{Effect, ExportKind, Msg, Notification, RemoteFailure, RemoteFailureKind};
use portal_engine::{
    EngineCommand, EngineConfig, EngineEvent, EngineHandle, EventSink, FailureKind, GatewayError,
};
use portal_logging::{portal_debug, portal_info};

use super::app::AppInput;

/// What an effect turns into once it leaves the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Planned {
    Engine(EngineCommand),
    Debounce(String),
    Notify(Notification),
}

pub fn plan(effect: Effect) -> Planned {
    let command = match effect {
        Effect::Notify(notification) => return Planned::Notify(notification),
        Effect::DebounceSearch(text) => return Planned::Debounce(text),
        Effect::ResolveAuth => EngineCommand::ResolveAuth,
        Effect::FetchCategories => EngineCommand::FetchCategories,
        Effect::FetchArticles { seq, query } => EngineCommand::FetchArticles { seq, query },
        Effect::FetchArticle { seq, id } => EngineCommand::FetchArticle { seq, id },
        Effect::FetchStats { seq } => EngineCommand::FetchStats { seq },
        Effect::TriggerJob => EngineCommand::TriggerJob,
        Effect::MutateArticle(mutation) => EngineCommand::MutateArticle(mutation),
        Effect::MutateCategory(mutation) => EngineCommand::MutateCategory(mutation),
        Effect::ExportCsv(kind) => EngineCommand::Export(kind),
    };
    Planned::Engine(command)
}

pub fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::AuthResolved(result) => Msg::AuthResolved(result.map_err(map_failure)),
        EngineEvent::CategoriesLoaded(result) => {
            Msg::CategoriesLoaded(result.map_err(map_failure))
        }
        EngineEvent::ArticlesLoaded { seq, result } => Msg::ArticlesLoaded {
            seq,
            result: result.map_err(map_failure),
        },
        EngineEvent::ArticleLoaded { seq, result } => Msg::ArticleLoaded {
            seq,
            result: result.map_err(map_failure),
        },
        EngineEvent::StatsLoaded { seq, result } => Msg::StatsLoaded {
            seq,
            result: result.map_err(map_failure),
        },
        EngineEvent::JobSettled(result) => Msg::JobSettled(result.map_err(map_failure)),
        EngineEvent::ArticleMutated { action, result } => Msg::ArticleMutated {
            action,
            result: result.map_err(map_failure),
        },
        EngineEvent::CategoryMutated { action, result } => Msg::CategoryMutated {
            action,
            result: result.map_err(map_failure),
        },
        EngineEvent::ExportSettled { kind, result } => Msg::ExportSettled {
            kind,
            result: result.map_err(|err| map_export_failure(kind, err)),
        },
        EngineEvent::SearchSettled(text) => Msg::SearchSettled(text),
    }
}

pub fn map_failure(err: GatewayError) -> RemoteFailure {
    let kind = match err.kind {
        FailureKind::Network | FailureKind::Timeout | FailureKind::InvalidUrl => {
            RemoteFailureKind::NetworkFailure
        }
        FailureKind::HttpStatus(code) => RemoteFailureKind::Rejected(code),
        FailureKind::MalformedResponse | FailureKind::TooLarge { .. } => {
            RemoteFailureKind::MalformedResponse
        }
        FailureKind::ExportFailed(kind) => RemoteFailureKind::ExportFailed(kind),
    };
    RemoteFailure::new(kind, err.message)
}

fn map_export_failure(kind: ExportKind, err: GatewayError) -> RemoteFailure {
    match err.kind {
        FailureKind::Network | FailureKind::Timeout => map_failure(err),
        _ => RemoteFailure::new(RemoteFailureKind::ExportFailed(kind), err.to_string()),
    }
}

/// Forwards engine completions into the app loop as core messages.
pub struct MsgSink {
    tx: mpsc::Sender<AppInput>,
}

impl MsgSink {
    pub fn new(tx: mpsc::Sender<AppInput>) -> Self {
        Self { tx }
    }
}

impl EventSink for MsgSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(AppInput::Engine(map_event(event)));
    }
}

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(config: EngineConfig, input_tx: mpsc::Sender<AppInput>) -> Result<Self, GatewayError> {
        let engine = EngineHandle::new(config, Arc::new(MsgSink::new(input_tx)))?;
        Ok(Self { engine })
    }

    pub fn from_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    /// Hands effects to the engine and returns the notifications to show.
    pub fn dispatch(&self, effects: Vec<Effect>) -> Vec<Notification> {
        let mut notifications = Vec::new();
        for effect in effects {
            match plan(effect) {
                Planned::Engine(command) => {
                    portal_info!("Dispatching {:?}", command);
                    self.engine.submit(command);
                }
                Planned::Debounce(text) => {
                    portal_debug!("Debouncing search input ({} chars)", text.chars().count());
                    self.engine.debounce_search(text);
                }
                Planned::Notify(notification) => notifications.push(notification),
            }
        }
        notifications
    }
}
