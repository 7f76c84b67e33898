use std::fs;
use std::path::Path;
use tracing::{info, warn};

pub struct ProxyManager;

impl ProxyManager {
    /// Loads the proxy pool from a newline-delimited file.
    /// A missing or unreadable file yields an empty pool (run without proxies).
    pub fn load(path: impl AsRef<Path>) -> Vec<String> {
        let path = path.as_ref();
        if !path.exists() {
            warn!("{} not found. Running without proxies.", path.display());
            return Vec::new();
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                return Vec::new();
            }
        };

        let proxies: Vec<String> = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();

        info!("Loaded {} proxies from {}", proxies.len(), path.display());
        proxies
    }

    /// Round-robin pick for a 1-based iteration index.
    pub fn select(pool: &[String], iteration: usize) -> Option<String> {
        if pool.is_empty() {
            return None;
        }
        let index = iteration.saturating_sub(1) % pool.len();
        Some(Self::normalize(&pool[index]))
    }

    /// Accepts `scheme://...`, `ip:port:user:pass` and bare `host:port` /
    /// `user:pass@host:port` entries, defaulting to http.
    pub fn normalize(entry: &str) -> String {
        let entry = entry.trim();
        if entry.contains("://") {
            return entry.to_string();
        }

        let parts: Vec<&str> = entry.split(':').collect();
        if parts.len() == 4 && !entry.contains('@') {
            return format!(
                "http://{}:{}@{}:{}",
                parts[2], parts[3], parts[0], parts[1]
            );
        }

        format!("http://{}", entry)
    }
}
