mod router;
mod state;

use std::sync::Arc;

use tracing::info;

use hearth_mcp::{McpServer, StdioTransport};
use hearth_store::{db, Store};
use hearth_tools::{register_all, ToolContext, ToolRegistry};

const SERVER_NAME: &str = "hearth";

fn load_config() -> hearth_core::Config {
    hearth_core::config::load_dotenv();
    hearth_core::Config::from_env()
}

async fn build_mcp(config: &hearth_core::Config) -> anyhow::Result<McpServer> {
    let pool = db::connect(&config.postgres).await?;
    let context = ToolContext::new(Store::new(pool), config.default_owner.clone());

    let mut registry = ToolRegistry::new();
    register_all(&mut registry)?;
    info!(tools = registry.len(), "Tool catalogue registered");

    Ok(McpServer::new(registry, context).with_name(SERVER_NAME))
}

async fn serve(config: &hearth_core::Config) -> anyhow::Result<()> {
    config.log_summary();
    let mcp = build_mcp(config).await?;
    let state = Arc::new(state::AppState::new(mcp, SERVER_NAME));
    let app = router::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn serve_stdio(config: &hearth_core::Config) -> anyhow::Result<()> {
    let mcp = build_mcp(config).await?;
    let mut transport = StdioTransport::new();
    mcp.run(&mut transport).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    let config = load_config();
    let args: Vec<String> = std::env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        Some("stdio") => {
            serve_stdio(&config).await?;
        }
        Some("serve") | None => {
            serve(&config).await?;
        }
        Some(other) => {
            println!("hearth v{}", env!("CARGO_PKG_VERSION"));
            println!("Unknown command: {}", other);
            println!("Usage: hearth-server <command>");
            println!("  serve   Start the HTTP MCP server (default)");
            println!("  stdio   Speak MCP over stdin/stdout");
        }
    }

    Ok(())
}
