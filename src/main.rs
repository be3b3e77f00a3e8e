//! notepub - mirror a web-clipper note account and publish it as a static site.

mod cli;
mod config;
mod error;
mod logger;
mod mirror;
mod remote;
mod render;
mod sync;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use cli::{Cli, Commands};
use config::AppConfig;
use error::{EXIT_MISSING_ARGUMENT, EXIT_UNKNOWN_ACTION, FatalError};
use remote::HttpNoteSource;
use render::Generator;
use sync::Collector;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => exit_for_parse_error(err),
    };

    if let Err(err) = run(&cli) {
        if let Some(fatal) = err.downcast_ref::<FatalError>() {
            crate::log!(error: "notepub"; "{fatal}");
            std::process::exit(fatal.exit_code());
        }
        crate::log!(error: "notepub"; "{err:#}");
        crate::log!(error: "notepub"; "hint: check that [remote.endpoint] and [remote.token] are valid");
        std::process::exit(1);
    }
}

/// Map clap parse failures onto the documented exit codes. Help and
/// version requests are not errors and exit 0.
fn exit_for_parse_error(err: clap::Error) -> ! {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => err.exit(),
        ErrorKind::MissingRequiredArgument
        | ErrorKind::MissingSubcommand
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
            let _ = err.print();
            std::process::exit(EXIT_MISSING_ARGUMENT);
        }
        ErrorKind::InvalidSubcommand | ErrorKind::UnknownArgument => {
            let _ = err.print();
            std::process::exit(EXIT_UNKNOWN_ACTION);
        }
        _ => err.exit(),
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Collect { collection } => collect(&config, collection),
        Commands::Rebuild => Generator::new(&config)
            .with_scope(render::scope_from_env())
            .generate(),
        Commands::RebuildIndices => Generator::new(&config)
            .with_scope(render::scope_from_env())
            .generate_indices(),
        Commands::Refresh { collection } => {
            collect(&config, collection)?;
            Generator::new(&config)
                .with_scope(render::scope_from_env())
                .generate()
        }
    }
}

/// Load and validate configuration from CLI arguments.
///
/// A missing config file is not an error for local-only commands; the
/// defaults mirror into `./data` and render into `./public`.
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let root = cli.root.as_deref().unwrap_or(std::path::Path::new("./"));
    let config_path = root.join(&cli.config);

    let mut config = if config_path.exists() {
        AppConfig::from_path(&config_path)?
    } else {
        AppConfig::default()
    };
    config.update_with_cli(cli);

    let needs_remote = cli.is_collect() || cli.is_refresh();
    config.validate(needs_remote)?;

    Ok(config)
}

/// Run the sync engine against the configured remote store.
fn collect(config: &AppConfig, collection: &str) -> Result<()> {
    let source = HttpNoteSource::new(&config.remote.endpoint, &config.remote.token)?;
    Collector::new(config, &source)?.run(collection)
}
