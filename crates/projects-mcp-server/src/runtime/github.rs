use projects_mcp_server::errors::ServerError;
use reqwest::header::HeaderValue;
use schemars::JsonSchema;
use secrecy::{ExposeSecret as _, SecretString};
use serde::Deserialize;

pub(super) const GITHUB_TOKEN_ENV: &str = "GITHUB_PERSONAL_ACCESS_TOKEN";

/// GitHub credentials and host
#[derive(Debug, Deserialize, Default, JsonSchema)]
#[serde(default)]
pub struct GitHubConfig {
    /// A personal access token with the `project` scope
    #[schemars(with = "Option<String>")]
    token: Option<SecretString>,

    /// The GitHub host, for GitHub Enterprise
    host: Option<String>,
}

impl GitHubConfig {
    /// The configured GitHub host, if any
    pub fn host(&self) -> Option<&str> {
        self.host.as_deref().filter(|host| !host.trim().is_empty())
    }

    /// The bearer authorization header for the configured token
    pub fn authorization(&self) -> Result<HeaderValue, ServerError> {
        let token = self
            .token
            .as_ref()
            .map(|token| token.expose_secret().trim())
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ServerError::EnvironmentVariable(GITHUB_TOKEN_ENV.to_string()))?;

        let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use super::GitHubConfig;
    use projects_mcp_server::errors::ServerError;

    #[test]
    fn it_builds_a_sensitive_bearer_header() {
        let config: GitHubConfig = serde_json::from_str(r#"{ "token": "ghp_abc" }"#).unwrap();
        let header = config.authorization().unwrap();

        assert_eq!(header, "Bearer ghp_abc");
        assert!(header.is_sensitive());
    }

    #[test]
    fn it_requires_a_token() {
        let config = GitHubConfig::default();
        assert!(matches!(
            config.authorization(),
            Err(ServerError::EnvironmentVariable(name)) if name == "GITHUB_PERSONAL_ACCESS_TOKEN"
        ));
    }

    #[test]
    fn it_rejects_a_token_that_is_not_a_valid_header() {
        let config: GitHubConfig = serde_json::from_str(r#"{ "token": "ghp\nabc" }"#).unwrap();
        assert!(matches!(config.authorization(), Err(ServerError::HeaderValue(_))));
    }

    #[test]
    fn it_treats_blank_values_as_unset() {
        let config: GitHubConfig =
            serde_json::from_str(r#"{ "token": "  ", "host": "" }"#).unwrap();
        assert!(config.authorization().is_err());
        assert!(config.host().is_none());
    }

    #[test]
    fn it_does_not_leak_the_token_in_debug_output() {
        let config: GitHubConfig = serde_json::from_str(r#"{ "token": "ghp_abc" }"#).unwrap();
        assert!(!format!("{config:?}").contains("ghp_abc"));
    }
}
