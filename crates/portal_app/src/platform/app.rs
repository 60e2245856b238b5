use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use portal_core::{update, AppState, Msg};
use portal_logging::{portal_debug, portal_info, portal_warn};

use super::effects::EffectRunner;
use super::settings::load_settings;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::{render, render_notification};
use crate::cli::Cli;

/// Everything the main loop reacts to.
#[derive(Debug)]
pub enum AppInput {
    Line(String),
    Engine(Msg),
    InputClosed,
}

pub fn run_app(cli: Cli) -> anyhow::Result<()> {
    if !portal_logging::initialize(cli.log.clone(), cli.log_level) {
        eprintln!("Warning: logging is disabled ({:?})", cli.log);
    }

    let mut settings = load_settings(&cli.config)?;
    settings.apply_cli(&cli);
    portal_info!(
        "Starting portal against {} (page size {})",
        settings.api_url,
        settings.page_size()
    );

    let (input_tx, input_rx) = mpsc::channel::<AppInput>();
    let runner = EffectRunner::new(settings.engine_config(), input_tx.clone())
        .context("failed to start the engine")?;
    spawn_stdin_reader(input_tx);

    let mut out = io::stdout();
    let mut state = step(AppState::new(settings.page_size()), Msg::Started, &runner, &mut out)?;

    while let Ok(input) = input_rx.recv() {
        let msg = match input {
            AppInput::Engine(msg) => msg,
            AppInput::Line(line) => match parse_command(&line) {
                Ok(Some(Command::Msg(msg))) => msg,
                Ok(Some(Command::Help)) => {
                    writeln!(out, "{HELP}")?;
                    continue;
                }
                Ok(Some(Command::Quit)) => break,
                Ok(None) => continue,
                Err(err) => {
                    writeln!(out, "{err}")?;
                    continue;
                }
            },
            AppInput::InputClosed => break,
        };
        state = step(state, msg, &runner, &mut out)?;
    }

    portal_info!("Portal session ended");
    Ok(())
}

fn step(
    state: AppState,
    msg: Msg,
    runner: &EffectRunner,
    out: &mut impl Write,
) -> io::Result<AppState> {
    portal_debug!("Update with {:?}", msg);
    let (mut state, effects) = update(state, msg);
    for notification in runner.dispatch(effects) {
        writeln!(out, "{}", render_notification(&notification))?;
    }
    if state.consume_dirty() {
        write!(out, "{}", render(&state.view()))?;
        out.flush()?;
    }
    Ok(state)
}

fn spawn_stdin_reader(tx: mpsc::Sender<AppInput>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(AppInput::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    portal_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = tx.send(AppInput::InputClosed);
    });
}
