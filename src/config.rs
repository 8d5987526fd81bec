use serde::Deserialize;

pub const DEFAULT_YOUTH_API_BASE_URL: &str = "https://www.youthcenter.go.kr";
pub const DEFAULT_JUSO_API_BASE_URL: &str = "https://www.juso.go.kr";

/// Process configuration, read once at startup and shared by every fetcher.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub port: u16,
    pub youth_api_key: String,
    pub juso_api_key: String,
    pub youth_api_base_url: String,
    pub juso_api_base_url: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            youth_api_key: required_secret("YOUTH_API_KEY")?,
            juso_api_key: required_secret("JUSO_API_KEY")?,
            youth_api_base_url: base_url_or_default(
                "YOUTH_API_BASE_URL",
                DEFAULT_YOUTH_API_BASE_URL,
            )?,
            juso_api_base_url: base_url_or_default("JUSO_API_BASE_URL", DEFAULT_JUSO_API_BASE_URL)?,
        };

        // Secrets stay out of the logs
        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Youth API base URL: {}", config.youth_api_base_url);
        tracing::debug!("Juso API base URL: {}", config.juso_api_base_url);
        tracing::debug!("Server Port: {}", config.port);

        Ok(config)
    }
}

fn required_secret(name: &str) -> anyhow::Result<String> {
    std::env::var(name)
        .map_err(|_| anyhow::anyhow!("{} environment variable required", name))
        .and_then(|value| {
            if value.trim().is_empty() {
                anyhow::bail!("{} cannot be empty", name);
            }
            Ok(value)
        })
}

fn base_url_or_default(name: &str, default: &str) -> anyhow::Result<String> {
    let raw = std::env::var(name)
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| default.to_string());
    validate_base_url(name, &raw)
}

/// Checks that `raw` is an absolute http(s) URL and strips any trailing slash.
pub fn validate_base_url(name: &str, raw: &str) -> anyhow::Result<String> {
    let parsed = url::Url::parse(raw.trim())
        .map_err(|e| anyhow::anyhow!("{} is not a valid URL: {}", name, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        anyhow::bail!("{} must start with http:// or https://", name);
    }
    Ok(raw.trim().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_base_url_trims_trailing_slash() {
        let url = validate_base_url("X", "https://www.juso.go.kr/").unwrap();
        assert_eq!(url, "https://www.juso.go.kr");
    }

    #[test]
    fn test_validate_base_url_rejects_other_schemes() {
        assert!(validate_base_url("X", "ftp://example.com").is_err());
        assert!(validate_base_url("X", "not a url").is_err());
    }
}
