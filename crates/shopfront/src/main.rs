mod cli;
mod commands;
mod error;
mod output;

use clap::{Parser, ValueEnum};
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use shopfront_config::{Config, Profile};
use shopfront_core::{Loader, Locale, SessionConfig, StatusReconciler};

use crate::cli::{Cli, Command, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output::View;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let Cli { global, command } = cli;

    // Shell completions need no configuration at all
    if let Command::Completions(args) = &command {
        use clap::CommandFactory;
        use clap_complete::generate;

        let mut cmd = Cli::command();
        generate(args.shell, &mut cmd, "shopfront", &mut std::io::stdout());
        return Ok(());
    }

    let config_path = global
        .config
        .clone()
        .unwrap_or_else(shopfront_config::config_path);
    let cfg = shopfront_config::load_config_from(&config_path)?;
    let view = build_view(&global, &cfg)?;

    match command {
        // Offline commands
        Command::Config(args) => commands::config_cmd::handle(args, &cfg, &config_path, &view),
        Command::Status(args) => {
            commands::status::handle(args, &offline_reconciler(&cfg, view.locale)?, &view)
        }
        Command::Normalize(args) => {
            commands::normalize::handle(args, &offline_reconciler(&cfg, view.locale)?, &view)
        }

        // Everything else talks to the back office
        cmd => {
            let session = build_session(&global, &cfg)?;
            let loader = Loader::connect(&session)?;

            tracing::debug!(command = ?cmd, url = %session.api_url, "dispatching command");
            tokio::select! {
                result = commands::dispatch(cmd, &loader, &view) => result,
                _ = tokio::signal::ctrl_c() => {
                    loader.shutdown();
                    Err(CliError::Interrupted)
                }
            }
        }
    }
}

/// Locale precedence: flag, active profile, config defaults.
fn resolve_locale(global: &GlobalOpts, cfg: &Config) -> Locale {
    let profile = cfg.profile_name(global.profile.as_deref());
    global
        .locale
        .or_else(|| cfg.profiles.get(profile).and_then(|p| p.locale))
        .unwrap_or(cfg.defaults.locale)
}

fn build_view(global: &GlobalOpts, cfg: &Config) -> Result<View, CliError> {
    let format = match global.output {
        Some(format) => format,
        None => OutputFormat::from_str(&cfg.defaults.output, true).map_err(|_| {
            CliError::Validation {
                field: "defaults.output".into(),
                reason: format!("unknown output format '{}'", cfg.defaults.output),
            }
        })?,
    };
    Ok(View {
        format,
        locale: resolve_locale(global, cfg),
        color: output::should_color(global.color),
        quiet: global.quiet,
    })
}

fn offline_reconciler(cfg: &Config, locale: Locale) -> Result<StatusReconciler, CliError> {
    Ok(StatusReconciler::with_overrides(
        &cfg.statuses.reservation,
        &cfg.statuses.sale,
        locale,
    )?)
}

/// Build a `SessionConfig` from the config file, profile, and CLI overrides.
fn build_session(global: &GlobalOpts, cfg: &Config) -> Result<SessionConfig, CliError> {
    let name = cfg.profile_name(global.profile.as_deref());

    let mut profile = match cfg.profile(name) {
        Ok(profile) => profile,
        // An explicit URL is enough to run without a matching profile
        Err(_) if global.api_url.is_some() => Profile::default(),
        Err(_) => {
            return Err(CliError::ProfileNotFound {
                name: name.to_owned(),
                available: commands::config_cmd::available_profiles(cfg),
            });
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }
    profile.locale = Some(resolve_locale(global, cfg));

    let token = global
        .token
        .clone()
        .map(SecretString::from)
        .or_else(|| shopfront_config::resolve_token(&profile));

    Ok(shopfront_config::profile_to_session_config(cfg, &profile, token)?)
}
