//! tablekick command line.
//!
//! - `run`: drive a scripted XR session headless or in the terminal
//! - `config init`: write a default configuration file
//! - `config show`: print the effective configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use tablekick::audio::{Cue, CueBank, CueSink, LogCueSink, NullCueSink};
use tablekick::display::terminal::{poll_quit, TerminalDisplaySink};
use tablekick::display::{DisplaySink, LogDisplaySink};
use tablekick::host::XrHost;
use tablekick::input::{FrameScript, ScriptedHost};
use tablekick::{AppConfig, Session, SessionProfile};

/// Augmented-reality tabletop foosball, driven by a scripted XR host.
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Log at debug level unless RUST_LOG is set.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted session and print a summary.
    Run {
        /// Config file (defaults to the per-user config location).
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Session profile: hit-test-only, hit-test+hand-tracking, asset-driven-rig.
        #[arg(short, long)]
        profile: Option<SessionProfile>,

        /// Stop after this many frames.
        #[arg(short = 'n', long)]
        frames: Option<usize>,

        /// Input script to replay.
        #[arg(short, long, value_enum, default_value_t = Script::Demo)]
        script: Script,

        /// Draw the table in the terminal.
        #[arg(short, long)]
        terminal: bool,

        /// Simulate a host without hand tracking.
        #[arg(long)]
        no_hands: bool,

        /// Run frames back to back instead of at the display frame rate.
        #[arg(long)]
        unpaced: bool,
    },

    /// Manage the configuration file.
    Config {
        #[command(subcommand)]
        action: ConfigCommand,
    },
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Write the default configuration.
    Init {
        /// Target path (defaults to the per-user config location).
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },

    /// Print the effective configuration as TOML.
    Show {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Script {
    /// Place the table, kick with each hand, lose tracking, end.
    Demo,
    /// Place the table and let the ball settle.
    Idle,
}

struct RunOptions {
    config: Option<PathBuf>,
    profile: Option<SessionProfile>,
    frames: Option<usize>,
    script: Script,
    terminal: bool,
    no_hands: bool,
    unpaced: bool,
}

const DEFAULT_IDLE_FRAMES: usize = 300;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Run {
            config,
            profile,
            frames,
            script,
            terminal,
            no_hands,
            unpaced,
        }) => {
            let options = RunOptions {
                config,
                profile,
                frames,
                script,
                terminal,
                no_hands,
                unpaced,
            };
            run(options, cli.verbose).await
        }
        Some(Commands::Config { action }) => match action {
            ConfigCommand::Init { path, force } => config_init(path, force),
            ConfigCommand::Show { config } => config_show(config),
        },
        None => {
            println!("tablekick {}", env!("CARGO_PKG_VERSION"));
            println!("run `tablekick run` for a scripted session or `tablekick --help` for usage");
            Ok(())
        }
    }
}

fn init_tracing(level: &str, verbose: bool) {
    let fallback = if verbose { "debug" } else { level };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<PathBuf>) -> Result<AppConfig> {
    let path = path.or_else(AppConfig::default_path);
    AppConfig::load_from(path.as_deref()).context("failed to load configuration")
}

async fn run(options: RunOptions, verbose: bool) -> Result<()> {
    let mut config = load_config(options.config)?;
    if let Some(profile) = options.profile {
        config = config.with_profile(profile);
    }
    if options.terminal {
        config = config.with_terminal(true);
    }
    init_tracing(&config.logging.level, verbose);

    let delta = config.display.frame_interval();
    let mut frames = match options.script {
        Script::Demo => FrameScript::demo(delta).build(),
        Script::Idle => {
            FrameScript::idle_demo(delta, options.frames.unwrap_or(DEFAULT_IDLE_FRAMES)).build()
        }
    };
    if let Some(limit) = options.frames {
        frames.truncate(limit);
    }

    let mut host = if options.no_hands {
        ScriptedHost::hit_test_only(frames)
    } else {
        ScriptedHost::full(frames)
    };

    let cues: Box<dyn CueSink> = if config.audio.enabled {
        let bank = CueBank::new()
            .with_asset(Cue::Kick, &config.audio.kick_cue)
            .with_asset(Cue::Goal, &config.audio.goal_cue);
        Box::new(LogCueSink::new(bank))
    } else {
        Box::new(NullCueSink)
    };
    let display: Box<dyn DisplaySink> = if config.display.terminal {
        Box::new(TerminalDisplaySink::new().context("failed to open terminal display")?)
    } else {
        Box::new(LogDisplaySink::new())
    };

    let mut session = Session::start(&mut host, &config, cues, display)
        .await
        .context("failed to start XR session")?;

    tracing::info!(
        "running {} frames with profile {}",
        host.frames_remaining(),
        session.profile()
    );
    let mut pacing = tokio::time::interval(Duration::from_secs_f32(delta));
    loop {
        if !options.unpaced {
            pacing.tick().await;
        }
        if config.display.terminal && poll_quit()? {
            tracing::info!("quit requested after {} frames", session.stats().frames);
            break;
        }
        match session.pump(&mut host) {
            Some(report) if report.ended => break,
            Some(_) => {}
            None => break,
        }
    }
    if !session.is_ended() {
        session.shutdown();
        host.end_session();
    }

    let stats = session.stats();
    tracing::info!(
        "run finished: {} frames, {} kicks, {} goals",
        stats.frames,
        stats.kicks,
        stats.goals
    );
    println!("profile:       {}", session.profile());
    println!("frames:        {}", stats.frames);
    println!("placements:    {}", stats.placements);
    println!("kicks:         {}", stats.kicks);
    println!("goals:         {}", stats.goals);
    println!("out of bounds: {}", stats.out_of_bounds);
    println!("sub-steps:     {}", stats.substeps);
    Ok(())
}

fn config_init(path: Option<PathBuf>, force: bool) -> Result<()> {
    let Some(path) = path.or_else(AppConfig::default_path) else {
        bail!("no config directory available; pass a path");
    };
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    AppConfig::default()
        .save(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("wrote {}", path.display());
    Ok(())
}

fn config_show(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml_string()?);
    Ok(())
}
