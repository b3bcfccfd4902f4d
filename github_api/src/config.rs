//! Host and credential configuration for a [`Client`](crate::Client).

use std::fmt;
use std::str::FromStr;

use url::Url;

use crate::Error;

/// Default API host.
pub const HOST_API: &str = "api.github.com";

/// URL scheme used to reach the API host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Protocol {
    Http,
    #[default]
    Https,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Http => "http",
            Protocol::Https => "https",
        }
    }

    pub fn default_port(&self) -> u16 {
        match self {
            Protocol::Http => 80,
            Protocol::Https => 443,
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.scheme())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "http" => Ok(Protocol::Http),
            "https" => Ok(Protocol::Https),
            _ => Err(Error::UnsupportedScheme(s.to_string())),
        }
    }
}

/// Target endpoint: host, optional port, protocol, and path prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostConfig {
    pub host: String,
    /// `None` uses the protocol's default port.
    pub port: Option<u16>,
    pub protocol: Protocol,
    /// Path every request URI is appended to, e.g. `/api/v3` for GitHub
    /// Enterprise. Empty for the public API; never ends with `/`.
    pub path_prefix: String,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            host: HOST_API.to_string(),
            port: None,
            protocol: Protocol::Https,
            path_prefix: String::new(),
        }
    }
}

impl HostConfig {
    pub fn new(host: &str, port: Option<u16>, protocol: Protocol) -> Self {
        Self {
            host: host.to_string(),
            port,
            protocol,
            path_prefix: String::new(),
        }
    }

    pub fn with_path_prefix(mut self, prefix: &str) -> Self {
        self.path_prefix = normalize_prefix(prefix);
        self
    }

    /// Reads `GITHUB_API_HOST`, `GITHUB_API_PORT` and `GITHUB_API_PROTOCOL`.
    ///
    /// Unset or unparsable values fall back to the defaults.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: env_string("GITHUB_API_HOST").unwrap_or(defaults.host),
            port: env_string("GITHUB_API_PORT").and_then(|v| v.parse::<u16>().ok()),
            protocol: env_string("GITHUB_API_PROTOCOL")
                .and_then(|v| v.parse::<Protocol>().ok())
                .unwrap_or(defaults.protocol),
            path_prefix: defaults.path_prefix,
        }
    }

    /// Splits a base URL such as `http://127.0.0.1:8080` or
    /// `https://ghe.example.com/api/v3` into its parts.
    pub fn from_url(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url)?;
        let protocol = url.scheme().parse::<Protocol>()?;
        let host = url
            .host_str()
            .ok_or(Error::InvalidUrl(url::ParseError::EmptyHost))?;
        Ok(Self::new(host, url.port(), protocol).with_path_prefix(url.path()))
    }

    /// Port requests are sent to, resolving the protocol default.
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or_else(|| self.protocol.default_port())
    }

    /// Base URL of the host including the path prefix, e.g. `https://api.github.com`.
    pub fn base_url(&self) -> Result<Url, url::ParseError> {
        let raw = match self.port {
            Some(port) if port != self.protocol.default_port() => {
                format!("{}://{}:{}{}", self.protocol, self.host, port, self.path_prefix)
            }
            _ => format!("{}://{}{}", self.protocol, self.host, self.path_prefix),
        };
        Url::parse(&raw)
    }

    /// Appends a relative request URI to the base URL.
    ///
    /// Absolute and scheme-relative URIs (`//host/..`) are rejected so that
    /// requests, and the credentials sent with them, never leave the
    /// configured host.
    pub fn url_for(&self, uri: &str) -> Result<Url, Error> {
        if uri.starts_with("//") || Url::parse(uri).is_ok() {
            return Err(Error::ForeignUri(uri.to_string()));
        }
        let base = self.base_url()?;
        let mut raw = base.as_str().trim_end_matches('/').to_string();
        if !uri.starts_with('/') {
            raw.push('/');
        }
        raw.push_str(uri);
        let url = Url::parse(&raw)?;
        if url.origin() != base.origin() {
            return Err(Error::ForeignUri(uri.to_string()));
        }
        Ok(url)
    }
}

/// Username and password sent with HTTP Basic authentication.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Builds credentials only when both parts are present and non-empty.
    pub fn new(username: Option<&str>, password: Option<&str>) -> Option<Self> {
        match (username, password) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => Some(Self {
                username: user.to_string(),
                password: pass.to_string(),
            }),
            _ => None,
        }
    }

    /// Reads `GITHUB_USER` and `GITHUB_PASSWORD`.
    pub fn from_env() -> Option<Self> {
        Self::new(
            env_string("GITHUB_USER").as_deref(),
            env_string("GITHUB_PASSWORD").as_deref(),
        )
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_host_is_github_https() {
        let config = HostConfig::default();
        assert_eq!(config.host, "api.github.com");
        assert_eq!(config.effective_port(), 443);
        assert_eq!(config.base_url().unwrap().as_str(), "https://api.github.com/");
    }

    #[test]
    fn explicit_port_is_kept() {
        let config = HostConfig::new("localhost", Some(8080), Protocol::Http);
        assert_eq!(config.base_url().unwrap().as_str(), "http://localhost:8080/");
        assert_eq!(
            config.url_for("/repos/rust-lang/rust").unwrap().as_str(),
            "http://localhost:8080/repos/rust-lang/rust"
        );
    }

    #[test]
    fn default_port_is_not_repeated() {
        let config = HostConfig::new("example.com", Some(443), Protocol::Https);
        assert_eq!(config.base_url().unwrap().as_str(), "https://example.com/");
    }

    #[test]
    fn absolute_uri_is_rejected() {
        let config = HostConfig::default();
        assert!(matches!(
            config.url_for("http://other.example/x"),
            Err(Error::ForeignUri(uri)) if uri == "http://other.example/x"
        ));
        assert!(matches!(
            config.url_for("https://api.github.com/user"),
            Err(Error::ForeignUri(_))
        ));
    }

    #[test]
    fn scheme_relative_uri_is_rejected() {
        let config = HostConfig::default();
        assert!(matches!(
            config.url_for("//evil.example/steal"),
            Err(Error::ForeignUri(_))
        ));
    }

    #[test]
    fn backslash_uri_stays_on_host() {
        let config = HostConfig::default();
        let url = config.url_for("\\\\evil.example/steal").unwrap();
        assert_eq!(url.host_str(), Some("api.github.com"));
    }

    #[test]
    fn uri_without_leading_slash_is_appended() {
        let config = HostConfig::default();
        let url = config.url_for("user/repos").unwrap();
        assert_eq!(url.as_str(), "https://api.github.com/user/repos");
    }

    #[test]
    fn from_url_keeps_path_prefix() {
        let config = HostConfig::from_url("https://ghe.example.com/api/v3/").unwrap();
        assert_eq!(config.path_prefix, "/api/v3");
        assert_eq!(
            config.url_for("/user").unwrap().as_str(),
            "https://ghe.example.com/api/v3/user"
        );
        assert_eq!(
            config.base_url().unwrap().as_str(),
            "https://ghe.example.com/api/v3"
        );
    }

    #[test]
    fn from_url_splits_parts() {
        let config = HostConfig::from_url("http://127.0.0.1:8080").unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.protocol, Protocol::Http);

        let config = HostConfig::from_url("https://api.github.com").unwrap();
        assert_eq!(config, HostConfig::default());

        assert!(matches!(
            HostConfig::from_url("ftp://example.com"),
            Err(Error::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn protocol_from_str() {
        assert_eq!("HTTPS".parse::<Protocol>().unwrap(), Protocol::Https);
        assert_eq!("http".parse::<Protocol>().unwrap(), Protocol::Http);
        assert!(matches!(
            "ftp".parse::<Protocol>(),
            Err(Error::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
    }

    #[test]
    fn host_from_env_falls_back_on_bad_values() {
        std::env::set_var("GITHUB_API_HOST", "ghe.example.com");
        std::env::set_var("GITHUB_API_PORT", "not-a-port");
        std::env::set_var("GITHUB_API_PROTOCOL", "gopher");
        let config = HostConfig::from_env();
        std::env::remove_var("GITHUB_API_HOST");
        std::env::remove_var("GITHUB_API_PORT");
        std::env::remove_var("GITHUB_API_PROTOCOL");

        assert_eq!(config.host, "ghe.example.com");
        assert_eq!(config.port, None);
        assert_eq!(config.protocol, Protocol::Https);
    }

    #[test]
    fn credentials_require_both_parts() {
        assert!(Credentials::new(Some("user"), Some("pass")).is_some());
        assert!(Credentials::new(Some("user"), None).is_none());
        assert!(Credentials::new(None, Some("pass")).is_none());
        assert!(Credentials::new(Some(""), Some("pass")).is_none());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let creds = Credentials::new(Some("octocat"), Some("hunter2")).unwrap();
        let debug = format!("{:?}", creds);
        assert!(debug.contains("octocat"));
        assert!(!debug.contains("hunter2"));
    }
}
