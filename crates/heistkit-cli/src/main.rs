use clap::{Parser, Subcommand};
use color_eyre::eyre::Result;
use heistkit_config::HeistkitConfig;
use std::io::IsTerminal;
use tracing::{debug, error};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "heistkit", version, about = "Heist game toolkit: locale bundles and API diagnostics")]
struct Cli {
    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Only log warnings and errors to the console
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert locales/**/*.yaml into public/locales/**/*.json
    Locales {
        /// Keep running and apply source changes as they happen
        #[arg(long)]
        watch: bool,
    },

    /// Query the GraphQL backend configured in heistkit.toml
    Api {
        #[command(subcommand)]
        cmd: ApiCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ApiCommand {
    /// Fetch one user
    User { id: String },

    /// Fetch one heist, optionally with a custom selection set
    Heist {
        id: String,
        /// Fields to select, e.g. "id name crewMembers { totalCount }"
        #[arg(long)]
        fields: Option<String>,
    },

    /// List locations
    Locations {
        #[arg(long, default_value_t = 20)]
        first: u32,
    },
}

struct Ctx {
    use_color: bool,
    config: HeistkitConfig,
}

trait Runnable {
    fn run(self, ctx: &Ctx) -> Result<()>;
}

impl Runnable for Commands {
    fn run(self, ctx: &Ctx) -> Result<()> {
        let cmd_name = format!("{:?}", self);
        debug!(event = "command_start", command = %cmd_name);

        let result = match self {
            Commands::Locales { watch } => commands::locales::run(&ctx.config, watch, ctx.use_color),
            Commands::Api { cmd } => match cmd {
                ApiCommand::User { id } => commands::api::run_user(&ctx.config, &id),
                ApiCommand::Heist { id, fields } => {
                    commands::api::run_heist(&ctx.config, &id, fields.as_deref())
                }
                ApiCommand::Locations { first } => {
                    commands::api::run_locations(&ctx.config, first)
                }
            },
        };

        match &result {
            Ok(_) => debug!(event = "command_done", command = %cmd_name),
            Err(e) => error!(event = "command_failed", command = %cmd_name, error = %e),
        }

        result
    }
}

fn init_tracing(quiet: bool, use_color: bool) -> WorkerGuard {
    let file_appender = rolling::daily("logs", "heistkit.log");
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let console_filter = if quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    // stdout is reserved for command output (JSON from `api`).
    let console_layer = fmt::layer()
        .with_target(false)
        .with_ansi(use_color)
        .with_writer(std::io::stderr)
        .with_filter(console_filter);

    let file_layer = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_writer(file_writer)
        .with_filter(EnvFilter::new("debug"));

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();

    guard
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let use_color = !cli.no_color
        && std::io::stderr().is_terminal()
        && std::env::var_os("NO_COLOR").is_none();

    let _guard = init_tracing(cli.quiet, use_color);
    debug!(event = "startup", version = env!("CARGO_PKG_VERSION"));

    let ctx = Ctx {
        use_color,
        config: heistkit_config::load_config(),
    };
    cli.cmd.run(&ctx)
}
