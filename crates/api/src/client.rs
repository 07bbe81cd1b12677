use std::env;
use std::time::Duration;

use aisle_catalog::CategoryTree;
use reqwest::{Client, RequestBuilder, Url, header};
use tracing::{debug, info};

use crate::error::CatalogError;
use crate::payload::parse_tree_json;

/// Environment variable overriding the catalog API base URL.
pub const API_BASE_ENV: &str = "AISLE_API_BASE";
/// Environment variable holding an optional bearer token.
pub const API_TOKEN_ENV: &str = "AISLE_API_TOKEN";
/// Base URL used when nothing is configured.
pub const DEFAULT_API_BASE: &str = "http://localhost:8080/api";

const CATEGORIES_PATH: &str = "/categories";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Hostnames allowed to use plain HTTP.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Connection settings for the catalog API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl CatalogConfig {
    /// Read `AISLE_API_BASE` / `AISLE_API_TOKEN`, with `base_override` taking precedence.
    pub fn from_env(base_override: Option<String>) -> Self {
        let base_url = base_override
            .or_else(|| env::var(API_BASE_ENV).ok())
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
        let token = env::var(API_TOKEN_ENV).ok().filter(|value| !value.trim().is_empty());
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }
}

/// Thin wrapper around a configured `reqwest::Client` for the catalog service.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    base_url: String,
    http: Client,
    user_agent: String,
}

impl CatalogClient {
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogError> {
        validate_base_url(&config.base_url)?;

        let mut default_headers = header::HeaderMap::new();
        default_headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref() {
            let value = header::HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|_| CatalogError::InvalidToken)?;
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let http = Client::builder()
            .default_headers(default_headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            base_url: config.base_url,
            http,
            user_agent: format!("aisle/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a GET request for an API-relative path.
    pub fn get(&self, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "building request");
        self.http.get(url).header(header::USER_AGENT, &self.user_agent)
    }

    /// Fetch the complete category tree snapshot.
    pub async fn fetch_category_tree(&self) -> Result<CategoryTree, CatalogError> {
        let response = self.get(CATEGORIES_PATH).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                body,
            });
        }
        let tree = parse_tree_json(&body)?;
        info!(nodes = tree.node_count(), base = %self.base_url, "fetched category tree");
        Ok(tree)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// `localhost` and `127.0.0.1` may use any scheme; every other host must use HTTPS.
pub fn validate_base_url(base: &str) -> Result<(), CatalogError> {
    let parsed = Url::parse(base).map_err(|error| CatalogError::InvalidBaseUrl(format!("'{base}': {error}")))?;
    let host = parsed
        .host_str()
        .ok_or_else(|| CatalogError::InvalidBaseUrl(format!("'{base}' has no host")))?;

    if LOCALHOST_DOMAINS.iter().any(|allowed| host.eq_ignore_ascii_case(allowed)) {
        return Ok(());
    }
    if parsed.scheme() != "https" {
        return Err(CatalogError::InvalidBaseUrl(format!(
            "{API_BASE_ENV} must use https for non-localhost hosts; got '{}://'",
            parsed.scheme()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn localhost_may_use_http() {
        assert!(validate_base_url("http://localhost:8080/api").is_ok());
        assert!(validate_base_url("http://127.0.0.1:3000").is_ok());
    }

    #[test]
    fn remote_hosts_require_https() {
        assert!(validate_base_url("https://shop.example.com/api").is_ok());
        let error = validate_base_url("http://shop.example.com/api").unwrap_err();
        assert!(error.to_string().contains("https"), "{error}");
        assert!(validate_base_url("not a url").is_err());
    }

    #[test]
    fn config_prefers_override_and_trims_slash() {
        temp_env::with_vars(
            [(API_BASE_ENV, Some("https://env.example.com/")), (API_TOKEN_ENV, Some("secret"))],
            || {
                let config = CatalogConfig::from_env(None);
                assert_eq!(config.base_url, "https://env.example.com");
                assert_eq!(config.token.as_deref(), Some("secret"));

                let config = CatalogConfig::from_env(Some("http://localhost:9000/".into()));
                assert_eq!(config.base_url, "http://localhost:9000");
            },
        );
    }

    #[test]
    fn config_falls_back_to_default() {
        temp_env::with_vars_unset([API_BASE_ENV, API_TOKEN_ENV], || {
            let config = CatalogConfig::from_env(None);
            assert_eq!(config.base_url, DEFAULT_API_BASE);
            assert!(config.token.is_none());
        });
    }

    #[test]
    fn client_rejects_insecure_remote_base() {
        let config = CatalogConfig {
            base_url: "http://shop.example.com".into(),
            token: None,
        };
        assert!(matches!(CatalogClient::new(config), Err(CatalogError::InvalidBaseUrl(_))));
    }
}
