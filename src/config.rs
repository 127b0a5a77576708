use std::env;

const DEFAULT_BASE_URL: &str = "https://api.coursebook.io";

#[derive(Debug, Clone)]
pub struct Config {
    /// REST base URL, no trailing slash.
    pub base_url: String,
}

impl Config {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Reads `COURSEBOOK_API_URL`, falling back to the hosted backend.
    /// `.env` files are honored when present.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        let base_url = env::var("COURSEBOOK_API_URL").unwrap_or_else(|_| {
            log::debug!("COURSEBOOK_API_URL not set, using {}", DEFAULT_BASE_URL);
            DEFAULT_BASE_URL.to_string()
        });
        Self::new(&base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_stripped() {
        let config = Config::new("http://localhost:8080/");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
