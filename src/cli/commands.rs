//! CLI commands and argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Declarative integration execution engine CLI
#[derive(Parser, Debug)]
#[command(name = "integration-engine")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Connector definition file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub connector: Option<PathBuf>,

    /// Engine configuration file (YAML)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Execute one endpoint and print the execution result
    Execute {
        /// Endpoint id within the connector definition
        #[arg(short, long)]
        endpoint: String,

        /// Integration id (defaults to the connector id, then the file name)
        #[arg(long)]
        integration: Option<String>,

        /// Parameters as a JSON object
        #[arg(long)]
        params_json: Option<String>,

        /// Request body as JSON
        #[arg(long)]
        body_json: Option<String>,

        /// Extra headers as a JSON object of strings
        #[arg(long)]
        headers_json: Option<String>,

        /// Authentication as JSON, e.g. {"type":"bearer_token","bearer_token":"..."}
        #[arg(long)]
        auth_json: Option<String>,

        /// Timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Actor recorded as `executed_by`
        #[arg(long, default_value = "cli")]
        actor: String,
    },

    /// Validate connector definition
    Validate,

    /// List endpoints of the connector definition
    Endpoints,

    /// Start HTTP server mode
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,

        /// Directory containing connector definition files
        #[arg(long, default_value = "connectors")]
        connectors_dir: PathBuf,

        /// Reject executions for integrations the caller has not installed
        #[arg(long)]
        require_installation: bool,

        /// Actor used when a request carries no `X-User-Id` header
        #[arg(long, default_value = "anonymous")]
        default_actor: String,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Compact JSON, one document per line
    Json,
    /// Indented JSON
    Pretty,
}
