//! Config subcommand handlers.

use std::path::Path;

use tabled::Tabled;

use shopfront_config::{self as config, Config, Profile};

use crate::cli::{ConfigArgs, ConfigCommand};
use crate::error::CliError;
use crate::output::{self, View};

// ── Helpers ─────────────────────────────────────────────────────────

/// Copy of the config with plaintext tokens masked.
fn redacted(cfg: &Config) -> Config {
    let mut cfg = cfg.clone();
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("****".into());
        }
    }
    cfg
}

/// Render the config as TOML, the same form `config init` writes.
fn format_config(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg)
        .map(|text| text.trim_end().to_owned())
        .map_err(|e| CliError::Config {
            message: format!("cannot render config as TOML: {e}"),
        })
}

/// Comma-separated profile names, for error help text.
pub fn available_profiles(cfg: &Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "")]
    marker: &'static str,
    #[tabled(rename = "Profile")]
    name: String,
    #[tabled(rename = "API URL")]
    api_url: String,
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    args: ConfigArgs,
    cfg: &Config,
    path: &Path,
    view: &View,
) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            name,
            url,
            token_env,
            force,
        } => {
            if path.exists() && !force {
                return Err(CliError::ConfigExists {
                    path: path.display().to_string(),
                });
            }
            let profile = Profile {
                api_url: url,
                token_env,
                ..Profile::default()
            };
            let mut fresh = Config {
                default_profile: Some(name.clone()),
                ..Config::default()
            };
            // Validates the URL before anything is written.
            config::profile_to_session_config(&fresh, &profile, None)?;
            fresh.profiles.insert(name, profile);

            config::save_config_to(&fresh, path)?;
            if !view.quiet {
                eprintln!("Wrote {}", path.display());
            }
            Ok(())
        }

        ConfigCommand::Show => {
            let shown = redacted(cfg);
            let text = format_config(&shown)?;
            let out =
                output::render_single(view.format, &shown, |_| text.clone(), |_| text.clone())?;
            output::print_output(&out, view.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }

        ConfigCommand::Profiles => {
            let default = cfg.profile_name(None);
            let profiles: Vec<(&String, &Profile)> = cfg.profiles.iter().collect();
            let out = output::render_list(
                view.format,
                &profiles,
                |(name, p)| ProfileRow {
                    marker: if name.as_str() == default { "*" } else { "" },
                    name: (*name).clone(),
                    api_url: p.api_url.clone(),
                },
                |(name, _)| (*name).clone(),
            )?;
            output::print_output(&out, view.quiet);
            Ok(())
        }

        ConfigCommand::Use { name } => {
            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    available: available_profiles(cfg),
                    name,
                });
            }
            let mut updated = cfg.clone();
            updated.default_profile = Some(name.clone());
            config::save_config_to(&updated, path)?;
            if !view.quiet {
                eprintln!("Default profile set to '{name}'");
            }
            Ok(())
        }
    }
}
