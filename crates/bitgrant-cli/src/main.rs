//! Bitgrant CLI - inspect capability masks.
//!
//! Reads the families declared in `bitgrant.toml` and encodes, decodes and
//! checks the integer masks owners store for them.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(unreachable_pub)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

mod commands;
pub mod config_bridge;
mod theme;

use commands::{OutputFormat, Schema, check, decode, encode, families, parse_mask};
use theme::Theme;

/// Bitgrant - bitmask capability families
#[derive(Parser)]
#[command(name = "bitgrant")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (defaults to ./bitgrant.toml, then ~/.bitgrant/config.toml)
    #[arg(short, long, global = true, env = "BITGRANT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format: pretty (default) or json
    #[arg(long, global = true, default_value = "pretty")]
    format: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List declared families with their bits and defaults
    Families,

    /// Print the mask for a list of capability names
    Encode {
        /// Resource the family is declared on (omit for the owner-wide family)
        #[arg(short, long, default_value = "")]
        family: String,

        /// Capability names
        names: Vec<String>,
    },

    /// Print the capabilities a mask grants
    Decode {
        /// Resource the family is declared on (omit for the owner-wide family)
        #[arg(short, long, default_value = "")]
        family: String,

        /// Mask in decimal, 0x hex or 0b binary
        #[arg(value_parser = parse_mask)]
        mask: u64,

        /// Read the mask as held by a superuser
        #[arg(long)]
        sticky: bool,
    },

    /// Evaluate a rights spec against a mask; exits 1 when denied
    Check {
        /// Resource the family is declared on (omit for the owner-wide family)
        #[arg(short, long, default_value = "")]
        family: String,

        /// Mask in decimal, 0x hex or 0b binary
        #[arg(short, long, value_parser = parse_mask)]
        mask: u64,

        /// Rights spec, e.g. `delete` or `post:update,post:delete`
        spec: String,
    },
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", Theme::error(&format!("{e:#}")));
            ExitCode::from(2)
        },
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let workspace_root = std::env::current_dir().ok();
    let loaded = bitgrant_config::Config::load(cli.config.as_deref(), workspace_root.as_deref());

    // Set up logging from config, with --verbose override.
    let log_config = match &loaded {
        Ok(loaded) => config_bridge::to_log_config(&loaded.config.logging, cli.verbose),
        Err(_) => config_bridge::fallback_log_config(cli.verbose),
    };
    if let Err(e) = bitgrant_telemetry::setup_logging(&log_config) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let loaded = loaded.context("failed to load configuration")?;
    tracing::debug!(source = %loaded.source, families = loaded.config.families.len(), "configuration loaded");

    let schema: Schema =
        config_bridge::to_schema(&loaded.config).context("invalid family declaration")?;
    let format = OutputFormat::parse(&cli.format);

    match cli.command {
        Commands::Families => families::run_families(&schema, format)?,
        Commands::Encode { family, names } => {
            encode::run_encode(&schema, &family, &names, format)?;
        },
        Commands::Decode {
            family,
            mask,
            sticky,
        } => decode::run_decode(&schema, &family, mask, sticky, format)?,
        Commands::Check { family, mask, spec } => {
            let allowed = check::run_check(
                &schema,
                &family,
                mask,
                &spec,
                &loaded.config.gate.deny_message,
                format,
            )?;
            if !allowed {
                return Ok(ExitCode::FAILURE);
            }
        },
    }

    Ok(ExitCode::SUCCESS)
}
