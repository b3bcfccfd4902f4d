//! Blocking HTTP client for the GitHub JSON API.

use serde::de::DeserializeOwned;

use crate::{
    codec,
    config::{Credentials, HostConfig, Protocol},
    transport::{ApiRequest, Method, ReqwestTransport, Transport, TransportResponse},
    types::RequestError,
    Error, RequestException,
};

/// HTTP client for the GitHub JSON API.
///
/// Each call builds one request against the configured host, executes it on
/// the calling thread, and either decodes the JSON body or returns an
/// [`Error`]. Once credentials are set they are sent preemptively with
/// every request. Nothing is retried.
pub struct Client<T = ReqwestTransport> {
    host: HostConfig,
    credentials: Option<Credentials>,
    transport: T,
}

impl Client<ReqwestTransport> {
    /// Creates a client for `https://api.github.com` without credentials.
    pub fn new() -> Result<Self, Error> {
        Self::with_host(HostConfig::default())
    }

    pub fn with_host(host: HostConfig) -> Result<Self, Error> {
        Ok(Self::with_transport(host, ReqwestTransport::new()?))
    }

    /// Creates a client with a custom base URL. Used for testing with wiremock.
    pub fn with_base_url(base_url: &str) -> Result<Self, Error> {
        Self::with_host(HostConfig::from_url(base_url)?)
    }

    /// Creates a client from `GITHUB_API_*` host settings and
    /// `GITHUB_USER`/`GITHUB_PASSWORD` credentials.
    pub fn from_env() -> Result<Self, Error> {
        let mut client = Self::with_host(HostConfig::from_env())?;
        client.credentials = Credentials::from_env();
        Ok(client)
    }
}

impl<T: Transport> Client<T> {
    pub fn with_transport(host: HostConfig, transport: T) -> Self {
        Self {
            host,
            credentials: None,
            transport,
        }
    }

    /// Points the client at another endpoint. No network activity.
    pub fn configure(&mut self, host: &str, port: Option<u16>, protocol: Protocol) {
        self.host = HostConfig::new(host, port, protocol);
    }

    pub fn host_config(&self) -> &HostConfig {
        &self.host
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Stores credentials for preemptive Basic authentication.
    ///
    /// If either part is missing or empty, any stored credentials are
    /// cleared and requests go out unauthenticated.
    pub fn set_credentials(&mut self, user: Option<&str>, password: Option<&str>) {
        self.credentials = Credentials::new(user, password);
    }

    /// Whether requests currently carry credentials.
    pub fn sends_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    fn prepare(
        &self,
        method: Method,
        uri: &str,
        params: &[(String, String)],
    ) -> Result<ApiRequest, Error> {
        let mut url = self.host.url_for(uri)?;
        let mut form = Vec::new();
        match method {
            Method::Get => {
                if !params.is_empty() {
                    url.query_pairs_mut().extend_pairs(params);
                }
            }
            Method::Post => form.extend_from_slice(params),
        }
        if self.credentials.is_some() {
            tracing::trace!("Sending credentials preemptively to {}", self.host.host);
        }
        Ok(ApiRequest {
            method,
            url,
            form,
            credentials: self.credentials.clone(),
            follow_redirects: method == Method::Get,
        })
    }

    /// Executes the request and returns the response if its status is one of
    /// `accepted`. Any other status consumes the response into an error.
    fn execute(&self, request: ApiRequest, accepted: &[u16]) -> Result<T::Response, Error> {
        let method = request.method;
        let url = request.url.clone();
        let response = self.transport.execute(request)?;
        let status = response.status();
        tracing::debug!("{} {} -> {}", method.as_str(), url, status);

        match status {
            s if accepted.contains(&s) => Ok(response),
            404 | 500 => {
                let body = response.into_body()?;
                let error: RequestError = codec::decode(&body)?;
                Err(RequestException::new(error, status).into())
            }
            _ => Err(Error::UnexpectedStatus {
                status,
                status_text: response.status_text(),
            }),
        }
    }

    /// Fetches `uri` and decodes the 200 response into `V`.
    ///
    /// `params` are sent as the query string. Redirects are followed.
    pub fn get<V: DeserializeOwned>(
        &self,
        uri: &str,
        params: &[(String, String)],
    ) -> Result<V, Error> {
        let request = self.prepare(Method::Get, uri, params)?;
        let response = self.execute(request, &[200])?;
        codec::decode(&response.into_body()?)
    }

    /// Posts `params` as a form body and decodes the 200/201 response into `V`.
    pub fn post<V: DeserializeOwned>(
        &self,
        uri: &str,
        params: &[(String, String)],
    ) -> Result<V, Error> {
        let request = self.prepare(Method::Post, uri, params)?;
        let response = self.execute(request, &[200, 201])?;
        codec::decode(&response.into_body()?)
    }

    /// Posts `params` as a form body, ignoring the body of a 200/201 response.
    pub fn post_no_response(&self, uri: &str, params: &[(String, String)]) -> Result<(), Error> {
        let request = self.prepare(Method::Post, uri, params)?;
        self.execute(request, &[200, 201])?;
        Ok(())
    }
}
