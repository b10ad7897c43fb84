use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use http::Method;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::RouterConfig;
use crate::controllers;
use crate::dispatcher::{DispatchRequest, Dispatcher};
use crate::ids::RequestId;
use crate::logging::{init_logging, LogConfig, LogFormat};
use crate::router::Router;

/// Command-line interface for the router over the sample controllers
#[derive(Parser, Debug)]
#[command(name = "htf-router")]
#[command(about = "Inspect and exercise the controller routing table", long_about = None)]
pub struct Cli {
    /// Router configuration file (YAML). Defaults to `HTF_*` environment variables.
    #[arg(short, long, global = true, env = "HTF_ROUTER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormatArg>,

    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Print the routing table
    Routes,
    /// Resolve METHOD PATH pairs and print the matched operation
    Resolve {
        /// Alternating methods and paths, e.g. `GET /user/get/42 POST /pet`
        #[arg(required = true, num_args = 2.., value_names = ["METHOD", "PATH"])]
        requests: Vec<String>,
    },
    /// Dispatch one request to the sample controllers and print the response
    Dispatch {
        method: String,
        uri: String,
        /// JSON request body
        #[arg(short, long)]
        body: Option<String>,
        /// Correlation id to reuse
        #[arg(long)]
        request_id: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Json,
    Pretty,
}

impl From<LogFormatArg> for LogFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Json => LogFormat::Json,
            LogFormatArg::Pretty => LogFormat::Pretty,
        }
    }
}

fn load_config(path: Option<&PathBuf>) -> Result<RouterConfig> {
    match path {
        Some(path) => RouterConfig::from_yaml_file(path),
        None => RouterConfig::from_env(),
    }
}

fn parse_method(raw: &str) -> Result<Method> {
    Method::from_bytes(raw.to_ascii_uppercase().as_bytes())
        .with_context(|| format!("invalid HTTP method `{raw}`"))
}

/// Parse arguments and run the selected command.
pub fn run_cli() -> Result<()> {
    run(Cli::parse())
}

pub fn run(cli: Cli) -> Result<()> {
    let mut log_config = LogConfig::from_env();
    if let Some(format) = cli.log_format {
        log_config.format = format.into();
    }
    init_logging(&log_config)?;

    let config = load_config(cli.config.as_ref())?;
    let router = Router::from_provider(&controllers::registry(), config)?;

    match &cli.command {
        Commands::Routes => {
            router.dump_routes();
            Ok(())
        }
        Commands::Resolve { requests } => {
            anyhow::ensure!(
                requests.len() % 2 == 0,
                "expected METHOD PATH pairs, got {} argument(s)",
                requests.len()
            );
            for pair in requests.chunks(2) {
                let (method, path) = (parse_method(&pair[0])?, &pair[1]);
                match router.resolve_method(&method, path) {
                    Ok(resolved) => println!(
                        "{method} {path} -> {}::{} params={:?}",
                        resolved.target.controller.name(),
                        resolved.operation().name(),
                        resolved.url_params.as_slice()
                    ),
                    Err(e) => println!("{method} {path} -> {} {e}", e.status_code().as_u16()),
                }
            }
            Ok(())
        }
        Commands::Dispatch {
            method,
            uri,
            body,
            request_id,
        } => {
            let mut request = DispatchRequest::new(parse_method(method)?, uri.as_str())
                .with_request_id(RequestId::from_header_or_new(request_id.as_deref()));
            if let Some(body) = body {
                request = request.with_body(serde_json::from_str(body).context("invalid JSON body")?);
            }
            let dispatcher = Dispatcher::new(Arc::new(router));
            let response = dispatcher.dispatch(&request);
            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
