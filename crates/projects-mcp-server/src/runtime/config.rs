use std::time::Duration;

use projects_mcp_server::errors::ServerError;
use projects_mcp_server::server::Transport;
use reqwest::header::{AUTHORIZATION, HeaderMap};
use schemars::JsonSchema;
use serde::Deserialize;
use url::Url;

use super::{endpoint::Endpoint, github::GitHubConfig, logging::Logging, overrides::Overrides};

/// Configuration for the MCP server
#[derive(Debug, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// The GitHub GraphQL endpoint. Derived from `github.host` when unset
    #[schemars(with = "Option<Url>")]
    pub endpoint: Option<Endpoint>,

    /// GitHub credentials and host
    pub github: GitHubConfig,

    /// List of hard-coded headers to include in all GraphQL requests
    #[serde(deserialize_with = "parsers::map_from_str")]
    #[schemars(schema_with = "super::schemas::header_map")]
    pub headers: HeaderMap,

    /// Request timeout for calls to the GraphQL endpoint
    #[serde(with = "humantime_serde")]
    #[schemars(with = "String")]
    pub timeout: Duration,

    /// Logging configuration
    pub logging: Logging,

    /// Overrides for server behaviour
    pub overrides: Overrides,

    /// The type of server transport to use
    pub transport: Transport,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            github: GitHubConfig::default(),
            headers: HeaderMap::new(),
            timeout: Duration::from_secs(30),
            logging: Logging::default(),
            overrides: Overrides::default(),
            transport: Transport::default(),
        }
    }
}

impl Config {
    /// The endpoint to send GraphQL requests to
    pub fn endpoint(&self) -> Result<Url, ServerError> {
        match (&self.endpoint, self.github.host()) {
            (Some(endpoint), _) => Ok(endpoint.clone().into_inner()),
            (None, Some(host)) => Ok(Endpoint::for_host(host)?.into_inner()),
            (None, None) => Ok(Endpoint::default().into_inner()),
        }
    }

    /// Configured headers plus the bearer token
    pub fn request_headers(&self) -> Result<HeaderMap, ServerError> {
        let mut headers = self.headers.clone();
        headers.insert(AUTHORIZATION, self.github.authorization()?);
        Ok(headers)
    }
}

mod parsers {
    use std::str::FromStr;

    use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
    use serde::Deserializer;

    pub(super) fn map_from_str<'de, D>(deserializer: D) -> Result<HeaderMap, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MapFromStrVisitor;
        impl<'de> serde::de::Visitor<'de> for MapFromStrVisitor {
            type Value = HeaderMap;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a map of header string keys and values")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut parsed = HeaderMap::with_capacity(map.size_hint().unwrap_or(0));

                while let Some((key, value)) = map.next_entry::<String, String>()? {
                    let key = HeaderName::from_str(&key)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;
                    let value = HeaderValue::from_str(&value)
                        .map_err(|e| serde::de::Error::custom(e.to_string()))?;

                    parsed.insert(key, value);
                }

                Ok(parsed)
            }
        }

        deserializer.deserialize_map(MapFromStrVisitor)
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use projects_mcp_server::mutation_mode::MutationMode;
    use reqwest::header::AUTHORIZATION;

    use super::Config;

    #[test]
    fn it_parses_a_minimal_config() {
        let config = serde_json::from_str::<Config>("{}").unwrap();

        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.overrides.mutation_mode, MutationMode::All);
        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://api.github.com/graphql"
        );
    }

    #[test]
    fn it_contains_no_keys_with_double_underscore() {
        // `__` splits nested keys in the env provider, see [runtime::read_config]
        let schema = schemars::schema_for!(Config).to_value().to_string();

        assert!(!schema.contains("__"))
    }

    #[test]
    fn it_derives_the_endpoint_from_the_host() {
        let config: Config =
            serde_json::from_str(r#"{ "github": { "host": "github.example.com" } }"#).unwrap();

        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "https://github.example.com/api/graphql"
        );
    }

    #[test]
    fn an_explicit_endpoint_wins_over_the_host() {
        let config: Config = serde_json::from_str(
            r#"{ "endpoint": "http://localhost:9000/graphql", "github": { "host": "acme.ghe.com" } }"#,
        )
        .unwrap();

        assert_eq!(
            config.endpoint().unwrap().as_str(),
            "http://localhost:9000/graphql"
        );
    }

    #[test]
    fn it_parses_timeouts_and_headers() {
        let config: Config = serde_json::from_str(
            r#"{ "timeout": "5s", "headers": { "x-github-next-global-id": "1" } }"#,
        )
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.headers.get("x-github-next-global-id").unwrap(),
            "1"
        );
    }

    #[test]
    fn it_adds_the_token_to_the_request_headers() {
        let config: Config = serde_json::from_str(
            r#"{ "github": { "token": "ghp_abc" }, "headers": { "authorization": "Bearer stale" } }"#,
        )
        .unwrap();

        let headers = config.request_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "Bearer ghp_abc");
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn it_rejects_invalid_headers() {
        assert!(
            serde_json::from_str::<Config>(r#"{ "headers": { "bad header": "x" } }"#).is_err()
        );
    }
}
