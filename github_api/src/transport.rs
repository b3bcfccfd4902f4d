//! The boundary between the client core and the HTTP stack.
//!
//! [`Client`](crate::Client) describes each call as an [`ApiRequest`] and
//! hands it to a [`Transport`]. The returned [`TransportResponse`] owns the
//! underlying connection: consuming it with `into_body` or dropping it
//! releases the connection.

use reqwest::blocking;
use reqwest::header::ACCEPT;
use reqwest::redirect::Policy;
use url::Url;

use crate::{config::Credentials, user_agent::get_user_agent, Error};

/// HTTP verbs the client issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully prepared request: URL (query string included), form body,
/// credentials to send preemptively, and redirect handling.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: Url,
    /// Form fields for POST bodies. Always empty for GET.
    pub form: Vec<(String, String)>,
    /// When set, sent as an HTTP Basic `Authorization` header on the first attempt.
    pub credentials: Option<Credentials>,
    pub follow_redirects: bool,
}

/// An executed response. Holds the connection until consumed or dropped.
pub trait TransportResponse {
    fn status(&self) -> u16;

    /// Reason phrase for the status, e.g. "Forbidden".
    ///
    /// The reqwest transport returns the canonical phrase for the code, not
    /// the text the server put on the status line.
    fn status_text(&self) -> String;

    /// Reads the whole body and releases the connection.
    fn into_body(self) -> Result<String, Error>;
}

/// Executes prepared requests synchronously.
pub trait Transport {
    type Response: TransportResponse;

    fn execute(&self, request: ApiRequest) -> Result<Self::Response, Error>;
}

/// Production transport backed by `reqwest`'s blocking client.
///
/// Keeps two clients because redirect policy is fixed per client: GET
/// requests follow redirects, POST requests do not.
pub struct ReqwestTransport {
    client: blocking::Client,
    no_redirect: blocking::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, Error> {
        let client = blocking::Client::builder()
            .user_agent(get_user_agent())
            .build()
            .map_err(Error::ClientBuild)?;
        let no_redirect = blocking::Client::builder()
            .user_agent(get_user_agent())
            .redirect(Policy::none())
            .build()
            .map_err(Error::ClientBuild)?;
        Ok(Self {
            client,
            no_redirect,
        })
    }
}

impl Transport for ReqwestTransport {
    type Response = blocking::Response;

    fn execute(&self, request: ApiRequest) -> Result<Self::Response, Error> {
        let client = if request.follow_redirects {
            &self.client
        } else {
            &self.no_redirect
        };
        let mut builder = match request.method {
            Method::Get => client.get(request.url),
            Method::Post => client.post(request.url),
        };
        builder = builder.header(ACCEPT, "application/json");
        if !request.form.is_empty() {
            builder = builder.form(&request.form);
        }
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }
        Ok(builder.send()?)
    }
}

impl TransportResponse for blocking::Response {
    fn status(&self) -> u16 {
        blocking::Response::status(self).as_u16()
    }

    fn status_text(&self) -> String {
        let status = blocking::Response::status(self);
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.as_u16().to_string())
    }

    fn into_body(self) -> Result<String, Error> {
        Ok(self.text()?)
    }
}
