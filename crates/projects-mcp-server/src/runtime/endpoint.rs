//! Endpoint newtype
//!
//! Wraps the URL of the GitHub GraphQL API so that defaults and host
//! derivation live in one place.

use std::ops::Deref;

use serde::Deserialize;
use url::Url;

/// A GitHub GraphQL endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoint(Url);

impl Endpoint {
    /// Derive the GraphQL endpoint for a GitHub host
    ///
    /// `github.com` maps to the public API, `*.ghe.com` hosts to their `api.`
    /// subdomain, and any other host to a GitHub Enterprise Server at
    /// `/api/graphql`. The host may be given bare or as a URL.
    pub fn for_host(host: &str) -> Result<Self, url::ParseError> {
        let host = host.trim().trim_end_matches('/');
        let base = if host.contains("://") {
            Url::parse(host)?
        } else {
            Url::parse(&format!("https://{host}"))?
        };
        let name = base.host_str().ok_or(url::ParseError::EmptyHost)?;

        if name == "github.com" || name == "api.github.com" {
            return Ok(Self::default());
        }

        let url = if name.ends_with(".ghe.com") {
            let name = name.strip_prefix("api.").unwrap_or(name);
            Url::parse(&format!("{}://api.{name}/graphql", base.scheme()))?
        } else {
            base.join("/api/graphql")?
        };
        Ok(Self(url))
    }

    /// Unwrap the endpoint into its inner URL
    pub fn into_inner(self) -> Url {
        self.0
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self(defaults::endpoint())
    }
}

impl<'de> Deserialize<'de> for Endpoint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let url = Url::deserialize(deserializer)?;
        Ok(Self(url))
    }
}

impl Deref for Endpoint {
    type Target = Url;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

mod defaults {
    use url::Url;

    pub(super) fn endpoint() -> Url {
        // SAFETY: a constant URL, parsed in [test::default_endpoint_parses_correctly]
        #[allow(clippy::unwrap_used)]
        Url::parse("https://api.github.com/graphql").unwrap()
    }

}
