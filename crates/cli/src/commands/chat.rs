//! `prospecto chat` — Drive the conversation from the terminal.
//!
//! Uses the in-memory store and the console adapter, so nothing touches
//! disk or the bridge. Useful for editing copy and checking flows.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};

use prospecto_catalog::CatalogIndex;
use prospecto_channels::{ConsoleAdapter, Courier, RetryPolicy};
use prospecto_config::AppConfig;
use prospecto_core::blacklist::Blacklist;
use prospecto_flow::{MessagePack, SessionEngine, script};
use prospecto_store::MemoryStore;

const CHAT_USER: &str = "cli";

/// Lines that leave the REPL instead of reaching the engine.
fn wants_exit(line: &str) -> bool {
    matches!(line, "exit" | "quit")
}

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config =
        AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    let catalog = Arc::new(
        CatalogIndex::load(Path::new(&config.catalog.catalog_file))
            .map_err(|e| format!("Failed to load catalog: {e}"))?,
    );
    let copy = MessagePack::load(Path::new(&config.catalog.messages_dir));
    let graph = script::build_graph(&copy)?;

    let courier = Courier::new(
        Arc::new(ConsoleAdapter),
        RetryPolicy {
            attempts: 1,
            delay: Duration::ZERO,
        },
    );
    let engine = SessionEngine::new(
        graph,
        catalog,
        Arc::new(MemoryStore::new()),
        courier,
        Arc::new(Blacklist::new()),
        copy.info.clone(),
    );

    println!();
    println!("  Prospecto — local chat (state lives in memory only)");
    println!("  Type a message and press Enter.");
    println!("  Type 'exit' or 'quit' to leave (an empty line works too).");
    println!();

    // Kick off the welcome the way a first inbound message would.
    engine.handle_message(CHAT_USER, "hola").await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("  > ");
        use std::io::Write;
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let text = line.trim();
        if text.is_empty() || wants_exit(text) {
            break;
        }

        if let Err(e) = engine.handle_message(CHAT_USER, text).await {
            eprintln!("  [Error] {e}");
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_words_leave_the_repl() {
        assert!(wants_exit("exit"));
        assert!(wants_exit("quit"));
        assert!(!wants_exit("exito"));
        assert!(!wants_exit("hola"));
        assert!(!wants_exit("1"));
    }
}
