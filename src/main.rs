use clap::{Parser, Subcommand, ValueEnum};
use std::io::Write;
use std::path::PathBuf;

use hudsnap::ReplContext;
use hudsnap::commands;
use hudsnap::logging;
use hudsnap::readline;
use hudsnap_core::{AppConfigExt, Point, Size};

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    let mut ctx = ReplContext::new()?;
    if let Err(e) = ctx.config.validate_hotkeys() {
        tracing::warn!(error = %e, "Invalid shortcut in config");
    }

    loop {
        let line = readline()?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, &mut ctx).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "hudsnap")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Switch {
    On,
    Off,
    Toggle,
}

#[derive(Subcommand)]
enum Commands {
    /// Mount a widget
    Register {
        id: String,
        width: f32,
        height: f32,
        /// Default position
        #[arg(long, default_value_t = 0.0)]
        x: f32,
        #[arg(long, default_value_t = 0.0)]
        y: f32,
        #[arg(short, long)]
        label: Option<String>,
        /// Keep receiving input outside edit mode
        #[arg(short, long)]
        interactive: bool,
    },
    Unregister {
        id: String,
    },
    /// Report a new measured size
    Size {
        id: String,
        width: f32,
        height: f32,
    },
    /// Position update from outside a drag
    Place {
        id: String,
        x: f32,
        y: f32,
    },
    Edit {
        #[arg(value_enum, default_value_t = Switch::Toggle)]
        state: Switch,
    },
    Down {
        x: f32,
        y: f32,
        #[arg(short, long, default_value_t = 0)]
        pointer: u32,
    },
    Move {
        x: f32,
        y: f32,
        #[arg(short, long, default_value_t = 0)]
        pointer: u32,
    },
    Up {
        x: f32,
        y: f32,
        #[arg(short, long, default_value_t = 0)]
        pointer: u32,
    },
    /// Process queued drag moves and repaint
    Frame,
    Resize {
        width: u32,
        height: u32,
    },
    Reset {
        id: String,
    },
    ResetAll,
    /// Deliver a shortcut such as "Ctrl+Shift+E"
    Key {
        shortcut: String,
    },
    Threshold {
        value: f32,
    },
    SaveConfig,
    Show,
    /// Write the current frame to a PNG file
    Render {
        path: PathBuf,
    },
    Exit,
}

async fn respond(line: &str, ctx: &mut ReplContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "hudsnap".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Register {
            id,
            width,
            height,
            x,
            y,
            label,
            interactive,
        }) => commands::register(
            ctx,
            &id,
            Size::new(width, height),
            Point::new(x, y),
            label.as_deref(),
            interactive,
        ),
        Some(Commands::Unregister { id }) => commands::unregister(ctx, &id),
        Some(Commands::Size { id, width, height }) => {
            commands::set_size(ctx, &id, Size::new(width, height))
        }
        Some(Commands::Place { id, x, y }) => commands::place(ctx, &id, Point::new(x, y)),
        Some(Commands::Edit { state }) => {
            let enabled = match state {
                Switch::On => Some(true),
                Switch::Off => Some(false),
                Switch::Toggle => None,
            };
            commands::set_edit_mode(ctx, enabled)
        }
        Some(Commands::Down { x, y, pointer }) => {
            commands::pointer_down(ctx, pointer, Point::new(x, y))
        }
        Some(Commands::Move { x, y, pointer }) => {
            commands::pointer_move(ctx, pointer, Point::new(x, y))
        }
        Some(Commands::Up { x, y, pointer }) => commands::pointer_up(ctx, pointer, Point::new(x, y)),
        Some(Commands::Frame) => commands::frame(ctx),
        Some(Commands::Resize { width, height }) => commands::resize(ctx, width, height)?,
        Some(Commands::Reset { id }) => commands::reset(ctx, &id),
        Some(Commands::ResetAll) => commands::reset_all(ctx),
        Some(Commands::Key { shortcut }) => commands::shortcut(ctx, &shortcut)?,
        Some(Commands::Threshold { value }) => commands::set_threshold(ctx, value)?,
        Some(Commands::SaveConfig) => commands::save_config(ctx)?,
        Some(Commands::Show) => commands::show(ctx),
        Some(Commands::Render { path }) => commands::render(ctx, &path)?,
        Some(Commands::Exit) => {
            commands::exit(ctx);
            return Ok(true);
        }
        None => {}
    }
    ctx.settle();
    Ok(false)
}
