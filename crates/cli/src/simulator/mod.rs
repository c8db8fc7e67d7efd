//! `stoplight run` -- terminal traffic light animation.
//!
//! Prompts for the phase durations, then draws one frame per tick until
//! the cycle ends (once-mode) or the user exits with `q` or Ctrl+C.

mod exit;
mod prompt;
mod render;

use std::io::{self, IsTerminal, Write};
use std::process;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};
use stoplight_core::{parse_duration, LightConfig, TrafficLight};
use tokio::sync::watch;

use self::exit::ExitSignal;
use self::prompt::{Preset, Prompter, Timing};
use crate::{report_error, OutputFormat};

const EXIT_MESSAGE: &str = "Exiting Traffic Light Simulator";

/// Values taken from `stoplight run` flags.
pub(crate) struct RunOptions {
    pub green: Option<i64>,
    pub yellow: Option<i64>,
    pub red: Option<i64>,
    /// `Some(false)` for `--once`, `Some(true)` for `--repeat`.
    pub repeat: Option<bool>,
    pub tick: Duration,
}

pub(crate) fn cmd_run(opts: RunOptions, output: OutputFormat, quiet: bool) {
    let preset = match preset_from(&opts) {
        Ok(preset) => preset,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let stdout = io::stdout();
    if !stdout.is_terminal() {
        crossterm::style::force_color_output(false);
    }

    if !quiet {
        println!("\nEnter q to exit at any time.\n");
    }

    let collected = {
        let stdin = io::stdin();
        Prompter::new(stdin.lock(), stdout.lock()).collect(preset)
    };
    let timing = match collected {
        Ok(Some(timing)) => timing,
        Ok(None) => {
            println!("{}", EXIT_MESSAGE);
            return;
        }
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };

    if !quiet {
        if let Err(e) = prompt::write_summary(&mut stdout.lock(), &timing) {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    }

    let rt = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            report_error(
                &format!("failed to create tokio runtime: {}", e),
                output,
                quiet,
            );
            process::exit(1);
        }
    };

    let result = rt.block_on(async {
        let (signal, exit_rx) = ExitSignal::new();
        signal.watch_lines(io::BufReader::new(io::stdin()));
        signal.watch_ctrl_c();
        animate(&timing, opts.tick, exit_rx, &mut io::stdout(), stdout.is_terminal()).await
    });

    match result {
        Ok(frames) => {
            tracing::debug!(frames, "simulator stopped");
            println!("{}", EXIT_MESSAGE);
        }
        Err(e) => {
            report_error(
                &format!("An error was encountered. {} with exception {}", EXIT_MESSAGE, e),
                output,
                quiet,
            );
            process::exit(1);
        }
    }
}

/// Check flag values before any prompt is shown.
fn preset_from(opts: &RunOptions) -> Result<Preset, String> {
    let field = |name: &str, value: Option<i64>| {
        value
            .map(|v| parse_duration(name, &v.to_string()))
            .transpose()
            .map_err(|e| e.to_string())
    };
    let preset = Preset {
        green: field("green_time", opts.green)?,
        yellow: field("yellow_time", opts.yellow)?,
        red: field("red_time", opts.red)?,
        repeat: opts.repeat,
    };
    if let (Some(g), Some(y), Some(r)) = (opts.green, opts.yellow, opts.red) {
        LightConfig::new(g, y, r)
            .validate()
            .map_err(|e| e.to_string())?;
    }
    Ok(preset)
}

/// Draw frames every `tick` until the cycle ends or exit is requested.
///
/// In once-mode exactly `total_time` frames are drawn. The exit flag is
/// checked before every frame and also wakes the tick sleep, so an exit
/// lands within one tick. Returns the number of frames drawn.
pub(crate) async fn animate<W: Write>(
    timing: &Timing,
    tick: Duration,
    mut exit: watch::Receiver<bool>,
    out: &mut W,
    clear_screen: bool,
) -> Result<u64, Box<dyn std::error::Error>> {
    let mut light = TrafficLight::new(&timing.config())?;
    light.ensure_renderable()?;
    tracing::debug!(id = %light.id(), total_time = light.total_time(), repeat = timing.repeat, "starting simulator");

    let mut drawn: u64 = 0;
    loop {
        if !timing.repeat && drawn >= light.total_time() {
            break;
        }
        if *exit.borrow() {
            break;
        }

        let frame = render::frame(&light)?;
        if clear_screen {
            execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
        }
        writeln!(out, "{}", frame)?;
        out.flush()?;
        light.tick();
        drawn += 1;

        tokio::select! {
            _ = tokio::time::sleep(tick) => {}
            Ok(()) = exit.changed() => {}
        }
    }

    if clear_screen && !timing.repeat && !*exit.borrow() {
        execute!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    }
    Ok(drawn)
}
