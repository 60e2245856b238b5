//! Portal engine: HTTP gateway, debouncing, exports and effect execution.
mod debounce;
mod engine;
mod envelope;
mod export;
mod gateway;
mod persist;
mod types;

pub use debounce::Debouncer;
pub use engine::{execute, ChannelEventSink, Clock, EngineConfig, EngineHandle, EventSink};
pub use export::{export_filename, ExportSaver};
pub use gateway::{CollectionGateway, GatewaySettings, HttpGateway};
pub use persist::{ExportDir, PersistError};
pub use types::{EngineCommand, EngineEvent, FailureKind, GatewayError};
