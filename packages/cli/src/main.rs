#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Terminal front end for the crime analytics dashboard.
//!
//! Each subcommand loads one view from the configured SPARQL endpoint and
//! prints it as a table (or as JSON with `--json`). Without a subcommand,
//! an interactive menu lets the user open views and change their filters.
//!
//! Uses `indicatif-log-bridge` (via [`crime_dash_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and the loading spinner never fight for the terminal.

mod context;
mod interactive;
mod render;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use crime_dash_sparql::ConfigError;
use crime_dash_sparql::config::EndpointConfig;
use crime_dash_views::{CrossCity, Hotspots, PoliceImpact, Temporal};
use crime_dash_views_models::{CrossCityFilter, NoFilter, PoliceImpactFilter, TemporalFilter};

use crate::context::Context;

#[derive(Parser)]
#[command(name = "crime_dash", about = "Crime analytics dashboard over a SPARQL endpoint")]
struct Cli {
    /// TOML file with `base_url`, `repository` and `namespace`
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Endpoint server root (overrides config and `CRIME_DASH_ENDPOINT`)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// Repository identifier (overrides config and `CRIME_DASH_REPOSITORY`)
    #[arg(long, global = true)]
    repository: Option<String>,
    /// Ontology namespace IRI (overrides config and `CRIME_DASH_NAMESPACE`)
    #[arg(long, global = true)]
    namespace: Option<String>,
    /// Print the derived view as JSON instead of a table
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crime locations with their descriptions
    Hotspots,
    /// Crime counts per city and description
    CrossCity {
        /// Only show rows with this crime description
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Yearly crime counts for one crime description
    Temporal {
        /// Crime description to chart (case-insensitive)
        #[arg(long, default_value = TemporalFilter::DEFAULT_DESCRIPTION)]
        description: String,
    },
    /// Arrest counts per crime description for one year
    PoliceImpact {
        /// Year to break down (matched exactly, e.g. "2020")
        #[arg(long, default_value = "")]
        year: String,
    },
}

impl Cli {
    /// Resolves the endpoint: config file and environment first, then the
    /// command-line flags.
    fn endpoint_config(&self) -> Result<EndpointConfig, ConfigError> {
        let mut config = EndpointConfig::load(self.config.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.base_url.clone_from(endpoint);
        }
        if let Some(repository) = &self.repository {
            config.repository.clone_from(repository);
        }
        if let Some(namespace) = &self.namespace {
            config.namespace.clone_from(namespace);
        }
        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let multi = crime_dash_cli_utils::init_logger();
    let cli = Cli::parse();

    let endpoint = cli.endpoint_config()?;
    log::info!("Using SPARQL endpoint {}", endpoint.query_url());
    let ctx = Context::new(endpoint, multi, cli.json);

    let Some(command) = cli.command else {
        println!("Crime Analytics Dashboard");
        println!();
        interactive::run(&ctx).await?;
        return Ok(ExitCode::SUCCESS);
    };

    let loaded = match command {
        Commands::Hotspots => ctx.run_once::<Hotspots>(NoFilter).await,
        Commands::CrossCity { description } => {
            ctx.run_once::<CrossCity>(CrossCityFilter { description }).await
        }
        Commands::Temporal { description } => {
            ctx.run_once::<Temporal>(TemporalFilter { description }).await
        }
        Commands::PoliceImpact { year } => {
            ctx.run_once::<PoliceImpact>(PoliceImpactFilter { year }).await
        }
    }?;

    Ok(if loaded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
