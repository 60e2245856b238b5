mod app;
mod effects;
mod settings;
pub mod ui;

pub use app::{run_app, AppInput};
pub use effects::{map_event, map_failure, plan, EffectRunner, MsgSink, Planned};
pub use settings::{load_settings, PortalSettings, DEFAULT_SETTINGS_FILE};
