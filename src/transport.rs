//! HTTP transport.
//!
//! A thin wrapper over a configured `reqwest::Client`. Requests never fail
//! because of their HTTP status; callers inspect the status themselves.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT as USER_AGENT_HEADER};
use reqwest::{Client, Method, Response};
use serde_json::Value;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{Result, RipsError};

/// Connector version reported in the `User-Agent` header.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub(crate) const USER_AGENT: &str = concat!("RIPS-API-Connector/", env!("CARGO_PKG_VERSION"));

/// Request payload encodings accepted by the RIPS API.
#[derive(Debug, Clone)]
pub enum RequestBody {
    /// `application/json`.
    Json(Value),
    /// `application/x-www-form-urlencoded`, nested keys in bracket notation.
    Form(Value),
}

/// Configured HTTP client with baked-in default headers.
///
/// Cheap to clone; clones share the same connection pool and headers.
#[derive(Clone)]
pub struct Transport {
    http: Client,
    base_url: Arc<Url>,
}

impl std::fmt::Debug for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Transport {
    /// Build a transport from the configuration plus extra headers.
    ///
    /// Header precedence, lowest first: configured headers, `User-Agent`,
    /// then `extra`. Names are compared case-insensitively.
    pub fn new(config: &ClientConfig, extra: HeaderMap) -> Result<Self> {
        // Ensure base URL ends with /
        let base_url_str = if config.base_uri.ends_with('/') {
            config.base_uri.clone()
        } else {
            format!("{}/", config.base_uri)
        };
        let base_url = Url::parse(&base_url_str)?;

        if config.http_errors {
            tracing::debug!("ignoring http_errors=true, status codes are checked explicitly");
        }

        let mut headers = header_map(
            config
                .headers
                .iter()
                .map(|(name, value)| (name.as_str(), value.as_str())),
        )?;
        headers.insert(USER_AGENT_HEADER, HeaderValue::from_static(USER_AGENT));
        for (name, value) in extra.iter() {
            headers.insert(name.clone(), value.clone());
        }

        let mut builder = Client::builder()
            .default_headers(headers)
            .brotli(true)
            .gzip(true)
            .deflate(true);
        // Zero disables a timeout
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        let http = builder.build().map_err(RipsError::HttpError)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve `path` against the base URL and attach a bracket-encoded query.
    ///
    /// `Value::Null` and empty objects produce no query string.
    pub fn url(&self, path: &str, query: &Value) -> Result<Url> {
        let mut url = self.base_url.join(path.trim_start_matches('/'))?;

        let encoded = encode_params(query)?;
        if !encoded.is_empty() {
            url.set_query(Some(&encoded));
        }

        Ok(url)
    }

    /// Send a request and return the response whatever its status.
    #[tracing::instrument(skip(self, query, body))]
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Value,
        body: Option<&RequestBody>,
    ) -> Result<Response> {
        let url = self.url(path, query)?;
        let mut request = self.http.request(method, url);

        match body {
            Some(RequestBody::Json(json)) => {
                request = request.json(json);
            }
            Some(RequestBody::Form(form)) => {
                request = request
                    .header(
                        reqwest::header::CONTENT_TYPE,
                        "application/x-www-form-urlencoded",
                    )
                    .body(encode_params(form)?);
            }
            None => {}
        }

        let response = request.send().await.map_err(RipsError::HttpError)?;
        tracing::debug!(status = response.status().as_u16(), "received response");

        Ok(response)
    }
}

/// Encode a JSON object as `a=1&b[c]=2`. Null and empty objects encode to "".
pub(crate) fn encode_params(params: &Value) -> Result<String> {
    match params {
        Value::Null => Ok(String::new()),
        Value::Object(map) if map.is_empty() => Ok(String::new()),
        other => Ok(serde_qs::to_string(other)?),
    }
}

/// Build a header map from string pairs.
pub(crate) fn header_map<'a, I>(pairs: I) -> Result<HeaderMap>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| RipsError::InvalidHeader(format!("bad header name '{name}'")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| RipsError::InvalidHeader(format!("bad value for header '{name}'")))?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transport(base: &str) -> Transport {
        Transport::new(&ClientConfig::new(base), HeaderMap::new()).unwrap()
    }

    #[test]
    fn test_transport_debug() {
        let debug = format!("{:?}", transport("http://localhost:8080"));
        assert!(debug.contains("Transport"));
        assert!(debug.contains("localhost"));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let t1 = transport("https://rips.example/api");
        let t2 = transport("https://rips.example/api/");
        assert_eq!(t1.base_url().as_str(), t2.base_url().as_str());
    }

    #[test]
    fn test_url_keeps_base_path() {
        let t = transport("https://rips.example/api");
        let url = t.url("/applications/1/scans", &Value::Null).unwrap();
        assert_eq!(url.as_str(), "https://rips.example/api/applications/1/scans");
        assert_eq!(url.query(), None);
    }

    #[test]
    fn test_url_bracket_query() {
        let t = transport("http://localhost:8080");
        let url = t
            .url(
                "logs",
                &json!({"notEqual": {"phase": 1}, "limit": 10}),
            )
            .unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert!(pairs.contains(&("notEqual[phase]".to_string(), "1".to_string())));
        assert!(pairs.contains(&("limit".to_string(), "10".to_string())));
    }

    #[test]
    fn test_encode_params_empty() {
        assert_eq!(encode_params(&Value::Null).unwrap(), "");
        assert_eq!(encode_params(&json!({})).unwrap(), "");
    }

    #[test]
    fn test_invalid_base_uri() {
        let result = Transport::new(&ClientConfig::new("not a url"), HeaderMap::new());
        assert!(matches!(result, Err(RipsError::UrlError(_))));
    }

    #[test]
    fn test_header_map_rejects_bad_name() {
        let result = header_map([("bad header", "x")]);
        assert!(matches!(result, Err(RipsError::InvalidHeader(_))));
    }
}
