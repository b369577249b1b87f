//! `stockchat init` — First-time setup: config file and seeded database.

use stockchat_config::AppConfig;
use stockchat_store::{seed_sample_items, SqliteStore};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    println!("stockchat — First-Time Setup");
    println!("============================\n");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
        println!("  Created config directory: {}", config_dir.display());
    } else {
        println!("  Config directory exists: {}", config_dir.display());
    }

    if config_path.exists() {
        println!("  Config already exists at: {}", config_path.display());
        println!("  Edit it manually or delete and re-run init.");
    } else {
        std::fs::write(&config_path, AppConfig::default_toml())?;
        println!("  Created config.toml at: {}", config_path.display());
    }

    let config = AppConfig::load()?;

    if let Some(parent) = std::path::Path::new(&config.store.path).parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let store = SqliteStore::new(&config.store.path).await?;
    let seeded = seed_sample_items(&store).await?;
    if seeded > 0 {
        println!("  Seeded {seeded} sample items into {}", config.store.path);
    } else {
        println!("  Database already populated: {}", config.store.path);
    }

    println!("\nSetup complete. Run `stockchat chat` to start.\n");

    Ok(())
}
