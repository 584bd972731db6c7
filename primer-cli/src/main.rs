use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use primer_agents::rag::RagAgentConfig;
use primer_cli::{Cli, Commands, Config, console};
use primer_core::Llm;
use primer_model::{GeminiConfig, GeminiModel};
use primer_rag::GeminiEmbeddingProvider;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    primer_telemetry::init_telemetry("primer").map_err(|e| anyhow::anyhow!("{e}"))?;

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let llm: Arc<dyn Llm> =
        Arc::new(GeminiModel::new(GeminiConfig::new(config.api_key.clone(), &cli.model))?);
    tracing::debug!(model = %cli.model, command = ?cli.command, "starting tutorial");

    match cli.command {
        Commands::Chat { log_file } => console::run_chat(llm, &log_file).await,
        Commands::React { query } => console::run_react(llm, &query).await,
        Commands::Drafter { output_dir } => console::run_drafter(llm, &output_dir).await,
        Commands::Rag { pdf, persist_dir, collection } => {
            let embeddings = Arc::new(GeminiEmbeddingProvider::new(config.api_key)?);
            let rag_config =
                RagAgentConfig { pdf_path: pdf, persist_dir, collection, ..Default::default() };
            console::run_rag(llm, embeddings, &rag_config).await
        }
    }
}
