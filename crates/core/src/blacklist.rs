//! Number block list — senders the assistant must ignore.
//!
//! Mutated by the HTTP surface, consulted by the session engine on every
//! inbound message and dispatch. In-memory only: a restart clears it.

use std::collections::HashSet;

use tokio::sync::RwLock;
use tracing::info;

/// In-memory set of blocked phone numbers.
#[derive(Debug, Default)]
pub struct Blacklist {
    numbers: RwLock<HashSet<String>>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block a number. Returns `false` if it was already blocked.
    pub async fn add(&self, number: &str) -> bool {
        let added = self.numbers.write().await.insert(number.trim().to_string());
        if added {
            info!(number = %number.trim(), "Number added to blacklist");
        }
        added
    }

    /// Unblock a number. Returns `false` if it was not blocked.
    pub async fn remove(&self, number: &str) -> bool {
        let removed = self.numbers.write().await.remove(number.trim());
        if removed {
            info!(number = %number.trim(), "Number removed from blacklist");
        }
        removed
    }

    /// Whether a number is blocked.
    pub async fn contains(&self, number: &str) -> bool {
        self.numbers.read().await.contains(number.trim())
    }

    /// Sorted snapshot of the blocked numbers.
    pub async fn list(&self) -> Vec<String> {
        let guard = self.numbers.read().await;
        let mut numbers: Vec<String> = guard.iter().cloned().collect();
        numbers.sort();
        numbers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_contains_remove() {
        let bl = Blacklist::new();
        assert!(!bl.contains("51999000111").await);

        assert!(bl.add("51999000111").await);
        assert!(bl.contains("51999000111").await);

        // Re-adding is a no-op
        assert!(!bl.add("51999000111").await);

        assert!(bl.remove("51999000111").await);
        assert!(!bl.contains("51999000111").await);
        assert!(!bl.remove("51999000111").await);
    }

    #[tokio::test]
    async fn trims_input() {
        let bl = Blacklist::new();
        bl.add("  51999000111  ").await;
        assert!(bl.contains("51999000111").await);
        assert!(bl.contains(" 51999000111 ").await);
    }

    #[tokio::test]
    async fn list_is_sorted() {
        let bl = Blacklist::new();
        bl.add("51999000222").await;
        bl.add("51999000111").await;
        assert_eq!(bl.list().await, vec!["51999000111", "51999000222"]);
    }
}
