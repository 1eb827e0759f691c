//! CLI runner - executes commands

use crate::auth::AuthConfig;
use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::server::{serve, ServerConfig};
use crate::config::EngineConfig;
use crate::engine::{ExecuteRequest, ExecutionEngine};
use crate::error::{Error, Result, ResultExt};
use crate::loader::{load_connector, ConnectorDefinition};
use crate::types::{JsonValue, StringMap, ValueMap};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use std::path::Path;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

/// Arguments of a one-shot execution
struct ExecuteArgs<'a> {
    endpoint: &'a str,
    integration: Option<&'a str>,
    params_json: Option<&'a str>,
    body_json: Option<&'a str>,
    headers_json: Option<&'a str>,
    auth_json: Option<&'a str>,
    timeout: Option<u64>,
    actor: &'a str,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        match &self.cli.command {
            Commands::Execute {
                endpoint,
                integration,
                params_json,
                body_json,
                headers_json,
                auth_json,
                timeout,
                actor,
            } => {
                self.execute(ExecuteArgs {
                    endpoint,
                    integration: integration.as_deref(),
                    params_json: params_json.as_deref(),
                    body_json: body_json.as_deref(),
                    headers_json: headers_json.as_deref(),
                    auth_json: auth_json.as_deref(),
                    timeout: *timeout,
                    actor,
                })
                .await
            }
            Commands::Validate => self.validate(),
            Commands::Endpoints => self.endpoints(),
            Commands::Serve {
                port,
                connectors_dir,
                require_installation,
                default_actor,
            } => {
                let config = ServerConfig {
                    connectors_dir: connectors_dir.clone(),
                    require_installation: *require_installation,
                    default_actor: default_actor.clone(),
                    engine: self.engine_config()?,
                };
                serve(config, *port).await
            }
        }
    }

    /// Load connector definition
    fn load_connector(&self) -> Result<ConnectorDefinition> {
        let path = self
            .cli
            .connector
            .as_ref()
            .ok_or_else(|| Error::config("Connector file not specified (use -c flag)"))?;
        load_connector(path)
    }

    /// Load engine configuration
    fn engine_config(&self) -> Result<EngineConfig> {
        EngineConfig::load(self.cli.config.as_deref())
    }

    /// Integration id: explicit, then the definition id, then the file stem
    fn integration_id(&self, explicit: Option<&str>, connector: &ConnectorDefinition) -> String {
        if let Some(id) = explicit {
            return id.to_string();
        }
        if !connector.id.is_empty() {
            return connector.id.clone();
        }
        self.cli
            .connector
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or("default")
            .to_string()
    }

    /// Execute one endpoint
    async fn execute(&self, args: ExecuteArgs<'_>) -> Result<()> {
        let connector = self.load_connector()?;
        let integration_id = self.integration_id(args.integration, &connector);

        let request = ExecuteRequest {
            endpoint_id: args.endpoint.to_string(),
            params: parse_json::<ValueMap>(args.params_json, "params")?.unwrap_or_default(),
            body: parse_json::<JsonValue>(args.body_json, "body")?,
            headers: parse_json::<StringMap>(args.headers_json, "headers")?.unwrap_or_default(),
            auth: parse_json::<AuthConfig>(args.auth_json, "auth")?,
            timeout: args.timeout,
        };

        let engine = ExecutionEngine::new(self.engine_config()?)?;
        let result = engine
            .execute(&integration_id, request, args.actor, &connector)
            .await?;

        self.output(&result);
        Ok(())
    }

    /// Validate connector definition
    fn validate(&self) -> Result<()> {
        let connector = self.load_connector()?;

        self.output(&json!({
            "valid": true,
            "id": connector.id,
            "name": connector.name,
            "version": connector.version,
            "base_url": connector.base_url,
            "endpoints": connector.endpoints.len(),
        }));

        Ok(())
    }

    /// List endpoints
    fn endpoints(&self) -> Result<()> {
        let connector = self.load_connector()?;

        let endpoints: Vec<_> = connector
            .endpoints
            .iter()
            .map(|e| {
                json!({
                    "id": e.id,
                    "method": e.method.to_ascii_uppercase(),
                    "path": e.path,
                    "description": e.description,
                })
            })
            .collect();

        self.output(&endpoints);
        Ok(())
    }

    fn output<T: Serialize>(&self, value: &T) {
        let rendered = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value),
            OutputFormat::Pretty => serde_json::to_string_pretty(value),
        };
        println!("{}", rendered.unwrap_or_default());
    }
}

/// Parse an optional inline JSON argument
fn parse_json<T: DeserializeOwned>(inline: Option<&str>, what: &str) -> Result<Option<T>> {
    inline
        .map(|raw| serde_json::from_str(raw).with_context(|| format!("Invalid {what} JSON")))
        .transpose()
}
