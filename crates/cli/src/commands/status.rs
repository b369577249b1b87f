//! `stockchat status` — Show configuration and connectivity.

use stockchat_config::AppConfig;
use stockchat_core::item::InventoryStore;
use stockchat_core::provider::Provider;
use stockchat_providers::OllamaProvider;
use stockchat_store::SqliteStore;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    println!("stockchat Status");
    println!("================");
    println!("  Config dir:   {}", AppConfig::config_dir().display());
    println!("  Model:        {}", config.model);
    println!("  Temperature:  {}", config.temperature);
    println!("  Ollama:       {}", config.ollama.base_url);
    println!("  Database:     {}", config.store.path);
    println!(
        "  Retrieval:    top_k={}, {}",
        config.retrieval.top_k,
        if config.retrieval.embeddings {
            "embeddings"
        } else {
            "keyword"
        }
    );

    let provider = OllamaProvider::new(Some(&config.ollama.base_url));
    match provider.health_check().await {
        Ok(true) => println!("\n  Ollama reachable"),
        Ok(false) => println!("\n  Ollama responded with an error — is the daemon healthy?"),
        Err(e) => println!("\n  Ollama unreachable: {e}"),
    }

    if std::path::Path::new(&config.store.path).exists() {
        let store = SqliteStore::new(&config.store.path).await?;
        let items = store.list_items(None).await?;
        println!("  Inventory:    {} items", items.len());
    } else {
        println!("  Inventory:    no database — run `stockchat init` first");
    }

    Ok(())
}
