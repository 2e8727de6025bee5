//! `prospecto init` — Write a starter config file.

use std::path::Path;

use prospecto_config::{AppConfig, DEFAULT_CONFIG_FILE};

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(DEFAULT_CONFIG_FILE);

    println!("🎓 Prospecto — First-Time Setup");
    println!("===============================\n");

    if path.exists() {
        println!("⚠️  Config already exists at: {}", path.display());
        println!("   Edit it manually or delete and re-run init.\n");
        return Ok(());
    }

    std::fs::write(path, AppConfig::default_toml())?;
    println!("✅ Created {}", path.display());
    println!("\n📝 Next steps:");
    println!("   1. Edit {} and point delivery at your WPPConnect server", path.display());
    println!("   2. Set PROSPECTO_BRIDGE_TOKEN in the environment");
    println!("   3. Run: prospecto serve");
    println!("   4. Point the bridge's message webhook at POST /webhook\n");

    println!("🎉 Setup complete! Run `prospecto chat` to try the flow locally.\n");

    Ok(())
}
