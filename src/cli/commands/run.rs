//! Foreground run loop for an active session.
//!
//! Multiplexes countdown ticks, typed commands and Ctrl-C onto one
//! controller, so every transition happens on the same task.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::api::{SessionOutcome, StudySession};
use crate::core::{BlockingService, SessionStore};
use crate::error::StudyError;
use crate::features::session::{EndReport, SessionController};
use crate::notify::Notifier;
use crate::output::format_snapshot_pretty;

/// A command typed while a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    TogglePause,
    /// End now, optionally with a focus score.
    End(Option<u8>),
    Discard,
    Status,
    /// Stop watching without telling the backend.
    Quit,
    Help,
}

impl RunCommand {
    /// Parse one input line. Blank lines yield `None`.
    ///
    /// # Errors
    ///
    /// Returns `StudyError::Validation` for an unknown command or a bad score.
    pub fn parse(line: &str) -> Result<Option<Self>, StudyError> {
        let mut parts = line.split_whitespace();
        let Some(word) = parts.next() else {
            return Ok(None);
        };

        let command = match word.to_lowercase().as_str() {
            "p" | "pause" | "resume" => Self::TogglePause,
            "e" | "end" => {
                let score = parts
                    .next()
                    .map(|s| {
                        s.parse::<u8>().map_err(|_| {
                            StudyError::Validation(format!("Invalid focus score: {s}"))
                        })
                    })
                    .transpose()?;
                Self::End(score)
            }
            "d" | "discard" => Self::Discard,
            "s" | "status" => Self::Status,
            "q" | "quit" => Self::Quit,
            "h" | "help" | "?" => Self::Help,
            other => {
                return Err(StudyError::Validation(format!(
                    "Unknown command '{other}' (type 'h' for help)"
                )))
            }
        };
        Ok(Some(command))
    }
}

pub(super) const HELP: &str = "p pause/resume | e [score] end | s status | d discard | q quit";

/// How the run loop finished.
#[derive(Debug)]
pub enum RunExit {
    /// Ended by the countdown or an `end` command.
    Ended(EndReport),
    /// Dropped locally with `discard` or Ctrl-C.
    Discarded(StudySession),
    /// Left running on the backend with `quit`.
    Detached(StudySession),
}

/// Drive `controller` until its session ends or the user leaves.
///
/// The controller must already have a started session. `input` supplies
/// command lines; when it closes the countdown keeps running to the end.
/// With `live` set, a progress line is redrawn on stderr every tick.
///
/// # Errors
///
/// Returns `StudyError::InvalidState` if no session is active, or an I/O
/// error from reading `input`.
pub async fn drive<S, B, N, R>(
    controller: &mut SessionController<S, B, N>,
    input: R,
    live: bool,
) -> Result<RunExit, StudyError>
where
    S: SessionStore,
    B: BlockingService,
    N: Notifier,
    R: AsyncBufRead + Unpin,
{
    if !controller.is_active() {
        return Err(StudyError::InvalidState("No active study session".to_string()));
    }

    let mut lines = input.lines();
    let mut input_open = true;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            tick = controller.next_tick() => {
                if let Some(report) = controller.handle_tick(tick).await {
                    clear_line(live);
                    return Ok(RunExit::Ended(report));
                }
                if live {
                    redraw(&format_snapshot_pretty(&controller.snapshot()));
                }
            }
            line = lines.next_line(), if input_open => {
                let Some(line) = line? else {
                    debug!("input closed; running until the countdown ends");
                    input_open = false;
                    continue;
                };
                let command = match RunCommand::parse(&line) {
                    Ok(Some(command)) => command,
                    Ok(None) => continue,
                    Err(e) => {
                        controller.notifier().warning(&e.to_string());
                        continue;
                    }
                };
                clear_line(live);
                if let Some(exit) = apply(controller, command).await? {
                    return Ok(exit);
                }
            }
            _ = &mut ctrl_c => {
                clear_line(live);
                let session = controller.discard().await?;
                return Ok(RunExit::Discarded(session));
            }
        }
    }
}

async fn apply<S, B, N>(
    controller: &mut SessionController<S, B, N>,
    command: RunCommand,
) -> Result<Option<RunExit>, StudyError>
where
    S: SessionStore,
    B: BlockingService,
    N: Notifier,
{
    match command {
        RunCommand::TogglePause => {
            if let Err(e) = controller.toggle_pause() {
                controller.notifier().warning(&e.to_string());
            }
            Ok(None)
        }
        RunCommand::End(score) => {
            let goals = controller
                .active_session()
                .map(|s| s.goals.clone())
                .unwrap_or_default();
            let score = score.unwrap_or(controller.options().default_focus_score);
            match controller.end(SessionOutcome::completed(&goals, score)).await {
                Ok(report) => Ok(Some(RunExit::Ended(report))),
                // The controller already warned; the session keeps running.
                Err(StudyError::Validation(_)) => Ok(None),
                Err(e) => {
                    controller.notifier().warning(&e.to_string());
                    Ok(None)
                }
            }
        }
        RunCommand::Discard => Ok(Some(RunExit::Discarded(controller.discard().await?))),
        RunCommand::Quit => Ok(controller.teardown().map(RunExit::Detached)),
        RunCommand::Status => {
            eprintln!("{}", format_snapshot_pretty(&controller.snapshot()));
            Ok(None)
        }
        RunCommand::Help => {
            eprintln!("{HELP}");
            Ok(None)
        }
    }
}

fn redraw(line: &str) {
    let mut stderr = std::io::stderr();
    let _ = write!(stderr, "\r\x1b[2K{line}");
    let _ = stderr.flush();
}

fn clear_line(live: bool) {
    if live {
        redraw("");
    }
}
