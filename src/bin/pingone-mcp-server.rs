//! PingOne MCP server binary.
//!
//! Speaks MCP over stdin/stdout. Logs go to stderr; set `RUST_LOG` to adjust
//! verbosity (default `info`).

use clap::Parser;
use log::{error, info};
use pingone_mcp_server::config::{Region, ServerConfig, parse_collections};
use pingone_mcp_server::{ConfigError, PingOneMcpServer, ToolRegistry};
use std::process::ExitCode;
use std::sync::Arc;

/// Model Context Protocol server for PingOne administration
#[derive(Debug, Parser)]
#[command(name = "pingone-mcp-server", version, about)]
struct Args {
    /// PingOne region (NA, EU, CA, AP, AU, SG); overrides PINGONE_REGION
    #[arg(long)]
    region: Option<String>,

    /// Only enable these tools (comma-separated)
    #[arg(long, value_delimiter = ',')]
    include_tools: Vec<String>,

    /// Disable these tools (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_tools: Vec<String>,

    /// Only enable tools in these collections (comma-separated)
    #[arg(long, value_delimiter = ',')]
    include_collections: Vec<String>,

    /// Disable tools in these collections (comma-separated)
    #[arg(long, value_delimiter = ',')]
    exclude_collections: Vec<String>,

    /// Print the enabled tools and exit
    #[arg(long)]
    list_tools: bool,
}

impl Args {
    fn apply(self, mut config: ServerConfig) -> Result<ServerConfig, ConfigError> {
        if let Some(region) = &self.region {
            config = config.with_region(region.parse::<Region>()?);
        }

        let filter = &mut config.tool_filter;
        if !self.include_tools.is_empty() {
            filter.include_tools = self.include_tools;
        }
        if !self.exclude_tools.is_empty() {
            filter.exclude_tools = self.exclude_tools;
        }
        if !self.include_collections.is_empty() {
            filter.include_collections =
                parse_collections(&self.include_collections.join(","))?;
        }
        if !self.exclude_collections.is_empty() {
            filter.exclude_collections =
                parse_collections(&self.exclude_collections.join(","))?;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    let args = Args::parse();
    let list_tools = args.list_tools;

    let config = match ServerConfig::from_env().and_then(|config| args.apply(config)) {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let registry = ToolRegistry::filtered(&config.tool_filter);

    if list_tools {
        for tool in registry.definitions() {
            println!("{}\t{}\t{:?}", tool.name, tool.collection, tool.policy);
        }
        return ExitCode::SUCCESS;
    }

    info!(
        "Starting PingOne MCP server (region {}, API {})",
        config.region, config.api_base_url
    );

    let server = Arc::new(PingOneMcpServer::new(config.client_provider(), registry));
    match server.run_stdio().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("MCP transport failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
