use std::time::Duration;

use clap::Parser;

use enhancer_llm::LlmConfig;
use enhancer_pipeline::{Enhancer, PipelineConfig};
use enhancer_server::logging::init_logging;
use enhancer_server::{run_server, AppState};

#[derive(Parser, Debug, Clone)]
#[command(name = "enhancer-server")]
#[command(about = "Prompt Enhancement HTTP Server")]
#[command(version)]
struct Cli {
    /// Bind address
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: String,

    /// Server port
    #[arg(long, env = "PORT", default_value = "8080")]
    port: u16,

    /// Enable debug mode
    #[arg(long, env = "DEBUG", default_value = "false")]
    debug: bool,

    /// MiniMax API key. Without it every request uses the local template.
    #[arg(long, env = "MINIMAX_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// MiniMax group id, sent as the `GroupId` query parameter
    #[arg(long, env = "MINIMAX_GROUP_ID")]
    group_id: Option<String>,

    /// Completion API base URL
    #[arg(long, env = "MINIMAX_BASE_URL", default_value = enhancer_llm::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Model name
    #[arg(long, env = "MINIMAX_MODEL", default_value = enhancer_llm::config::DEFAULT_MODEL)]
    model: String,

    /// Remote request timeout in seconds
    #[arg(long, env = "MINIMAX_TIMEOUT_SECS", default_value = "30")]
    timeout_secs: u64,

    /// Pause between synthesized template chunks, in milliseconds
    #[arg(long, env = "ENHANCER_TOKEN_DELAY_MS", default_value = "10")]
    token_delay_ms: u64,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_logging(cli.debug);

    let llm_config = LlmConfig::new(cli.api_key)
        .with_group_id(cli.group_id)
        .with_base_url(cli.base_url)
        .with_model(cli.model)
        .with_timeout(Duration::from_secs(cli.timeout_secs));

    match llm_config.masked_credential() {
        Some(masked) => {
            log::info!("LLM Configuration:");
            log::info!("  Base URL: {}", llm_config.base_url);
            log::info!("  Model: {}", llm_config.model);
            log::info!("  API key: {}", masked);
            log::info!("  Group id: {}", llm_config.group_id().unwrap_or("none"));
        }
        None => log::warn!("MINIMAX_API_KEY not set, serving template-based enhancements"),
    }
    log::debug!("Configuration: {:?}", llm_config);

    let enhancer = Enhancer::new(llm_config.build_provider()).with_config(PipelineConfig {
        token_delay: Duration::from_millis(cli.token_delay_ms),
    });

    run_server(&cli.host, cli.port, AppState::new(enhancer)).await?;
    Ok(())
}
