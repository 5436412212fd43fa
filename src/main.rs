// Copyright (c) 2026 rezky_nightky

mod config;
mod droplet;
mod engine;
mod error;
mod frame;
mod glyph;
mod logging;
mod mask;
mod palette;
mod terminal;
mod viewport;

use std::io::{stdout, IsTerminal};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyEventKind};
use rand::{rngs::StdRng, SeedableRng};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::config::{color_enabled_stdout, print_list_colors, print_list_ranges, Args};
use crate::engine::RainEngine;
use crate::error::RainError;
use crate::logging::{init_logging, LoggingConfig};
use crate::mask::{ImageMaskRenderer, MaskTask};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_exit_handlers() {
    std::panic::set_hook(Box::new(|info| {
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    tracing::info!(signal = sig, "stopping on signal");
                    restore_terminal_best_effort();
                    std::process::exit(0);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            restore_terminal_best_effort();
            std::process::exit(0);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

fn parse_args() -> Args {
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    let cmd = Args::command()
        .styles(clap_styles())
        .help_template(help_template);
    let matches = cmd.get_matches();
    Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

fn run(args: Args) -> Result<(), RainError> {
    let config = args.into_config()?;

    if !stdout().is_terminal() {
        return Err(RainError::NotATerminal);
    }

    let _log_guard = init_logging(&LoggingConfig::from_env())?;
    tracing::info!(
        orientation = ?config.orientation,
        color = config.color.name(),
        fps = config.fps,
        mask = config.mask.is_some(),
        "starting rain"
    );

    let mask_task = config
        .mask
        .map(|settings| MaskTask::new(Arc::new(ImageMaskRenderer), settings));

    let term = Terminal::new()?;
    let (w, h) = term.size()?;

    let mut engine = RainEngine::new(
        stdout(),
        config.glyphs,
        config.orientation,
        config.color,
        mask_task,
        StdRng::from_os_rng(),
    );
    engine.resize(w, h);
    tracing::debug!(
        cols = engine.viewport().num_cols,
        rows = engine.viewport().num_rows,
        "first frame"
    );

    let period = Duration::from_secs_f64(1.0 / config.fps as f64);
    let mut next_frame = Instant::now();

    'rain: loop {
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => pending_resize = Some((nw, nh)),
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        tracing::info!(key = ?k.code, "stopping on keypress");
                        break 'rain;
                    }
                    _ => {}
                }
            }

            let now = Instant::now();
            if now >= next_frame {
                break;
            }
            let _ = Terminal::poll_event(next_frame - now)?;
        }

        if let Some((nw, nh)) = pending_resize {
            engine.resize(nw, nh);
        }

        if let Err(e) = engine.render_frame() {
            tracing::error!(error = %e, "frame failed");
            return Err(e);
        }

        next_frame += period;
        let now = Instant::now();
        if now > next_frame {
            next_frame = now;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    install_exit_handlers();

    let args = parse_args();

    if args.list_ranges {
        print_list_ranges();
        return ExitCode::SUCCESS;
    }

    if args.list_colors {
        print_list_colors();
        return ExitCode::SUCCESS;
    }

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}
