use std::env;

/// Where the dashboard listens and which browser origins may call its JSON API
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (`LEAPP_API_HOST`)
    pub host: String,
    /// Bind port (`LEAPP_API_PORT`)
    pub port: u16,
    /// Origins allowed to read `/api/*` cross-site, from the comma-separated
    /// `LEAPP_ALLOWED_ORIGINS`. Empty means any origin.
    pub allowed_origins: Vec<String>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: env::var("LEAPP_API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("LEAPP_API_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            allowed_origins: parse_origins(&env::var("LEAPP_ALLOWED_ORIGINS").unwrap_or_default()),
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().trim_end_matches('/').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins(" https://reports.example.com/ ,,http://localhost:8000"),
            vec!["https://reports.example.com", "http://localhost:8000"]
        );
        assert!(parse_origins("").is_empty());
    }
}
