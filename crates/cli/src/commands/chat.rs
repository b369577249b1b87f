//! `stockchat chat` — Interactive or single-message chat mode.

use std::sync::Arc;
use stockchat_agent::ChatTurn;
use stockchat_config::AppConfig;
use stockchat_core::schema::ContextRetriever;
use stockchat_providers::OllamaProvider;
use stockchat_retrieval::{default_schema_docs, SchemaIndex};
use stockchat_store::SqliteStore;
use tokio::io::{self, AsyncBufReadExt, BufReader};
use tracing::warn;

pub async fn run(message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    let provider = Arc::new(OllamaProvider::new(Some(&config.ollama.base_url)));

    if !std::path::Path::new(&config.store.path).exists() {
        return Err(format!(
            "No inventory database at {} — run `stockchat init` first",
            config.store.path
        )
        .into());
    }
    let store = Arc::new(SqliteStore::new(&config.store.path).await?);

    let mut index = SchemaIndex::new(default_schema_docs());
    if config.retrieval.embeddings {
        index = index.with_embedder(provider.clone(), config.retrieval.embedding_model.clone());
        // Embeddings are an optimization; keyword ranking still works without them.
        if let Err(e) = index.build_embeddings().await {
            warn!("Could not embed schema documents, using keyword ranking: {e}");
        }
    }
    let retriever: Arc<dyn ContextRetriever> = Arc::new(index);

    let mut turn = ChatTurn::new(provider, retriever, store, &config.model)
        .with_temperature(config.temperature)
        .with_top_k(config.retrieval.top_k);
    if let Some(max_tokens) = config.max_tokens {
        turn = turn.with_max_tokens(max_tokens);
    }

    if let Some(msg) = message {
        // Single message mode
        let response = turn.run(&msg).await?;
        println!("{response}");
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════╗");
    println!("  ║     stockchat — Inventory Assistant       ║");
    println!("  ╚══════════════════════════════════════════╝");
    println!();
    println!("  Model:     {}", config.model);
    println!("  Ollama:    {}", config.ollama.base_url);
    println!("  Database:  {}", config.store.path);
    println!();
    println!("  Ask about your inventory, add items, or update quantities.");
    println!("  Type 'exit' or Ctrl+C to quit.");
    println!();

    let stdin = io::stdin();
    let reader = BufReader::new(stdin);
    let mut lines = reader.lines();

    print!("  You > ");
    use std::io::Write;
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();
        if line.is_empty() {
            print!("  You > ");
            std::io::stdout().flush()?;
            continue;
        }

        if matches!(line.as_str(), "exit" | "quit" | "/exit" | "/quit" | ":q") {
            break;
        }

        // A failed turn never ends the session
        match turn.run(&line).await {
            Ok(response) => {
                println!();
                for out in response.lines() {
                    println!("  Assistant > {out}");
                }
                println!();
            }
            Err(e) => {
                eprintln!("  [Error] {e}");
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye!");
    println!();

    Ok(())
}
