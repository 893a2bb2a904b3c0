//! Runtime configuration
//!
//! Everything is read from the environment; there is no config file.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable overriding the SQLite database location
pub const DATABASE_PATH_VAR: &str = "NOMAD_DATABASE_PATH";

/// Environment variable overriding the HTTP bind address
pub const HTTP_ADDR_VAR: &str = "NOMAD_HTTP_ADDR";

pub const DEFAULT_HTTP_ADDR: &str = "127.0.0.1:8080";

/// Get the database path from environment or use default
///
/// The default lives in `data/nomad_spoon.db` next to the project root, so a
/// binary run from `target/debug` or `target/release` shares one database.
pub fn database_path() -> PathBuf {
    std::env::var(DATABASE_PATH_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let mut path = std::env::current_exe()
                .ok()
                .and_then(|p| p.parent().map(|p| p.to_path_buf()))
                .unwrap_or_else(|| PathBuf::from("."));

            // Go up from target/release or target/debug to project root
            if path.ends_with("release") || path.ends_with("debug") {
                if let Some(grandparent) = path.parent().and_then(|p| p.parent()) {
                    path = grandparent.to_path_buf();
                }
            }

            path.push("data");
            path.push("nomad_spoon.db");
            path
        })
}

/// Resolve the HTTP bind address
pub fn http_addr() -> Result<SocketAddr, std::net::AddrParseError> {
    let raw = std::env::var(HTTP_ADDR_VAR).unwrap_or_else(|_| DEFAULT_HTTP_ADDR.to_string());
    parse_http_addr(&raw)
}

fn parse_http_addr(raw: &str) -> Result<SocketAddr, std::net::AddrParseError> {
    raw.trim().parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_http_addr_parses() {
        let addr = parse_http_addr(DEFAULT_HTTP_ADDR).unwrap();
        assert_eq!(addr.port(), 8080);
    }

    #[test]
    fn test_http_addr_trims_whitespace() {
        let addr = parse_http_addr(" 0.0.0.0:3000 ").unwrap();
        assert_eq!(addr.port(), 3000);
        assert!(parse_http_addr("localhost").is_err());
    }

    #[test]
    fn test_database_path_ends_with_db_file() {
        // Only meaningful without an override in the environment
        if std::env::var(DATABASE_PATH_VAR).is_err() {
            assert!(database_path().ends_with("data/nomad_spoon.db"));
        }
    }
}
