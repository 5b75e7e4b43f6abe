//! Generic resource client.
//!
//! Every RIPS resource is addressed the same way: a path template with one
//! `{}` placeholder per parent id, an optional trailing item id, and a
//! request body wrapped under the resource's singular name. A
//! [`ResourceSpec`] captures those three facts and [`ResourceClient`] turns
//! them into HTTP calls.

use std::path::Path;

use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tokio::io::AsyncWriteExt;

use crate::error::{Result, RipsError};
use crate::transport::{RequestBody, Transport};

/// How a resource expects create/update payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyEncoding {
    /// JSON document.
    Json,
    /// Form fields in bracket notation, e.g. `comment[text]=hi`.
    Form,
}

/// Static description of one REST resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceSpec {
    /// Collection path with `{}` placeholders for parent ids,
    /// e.g. `applications/{}/scans/{}/issues`.
    pub path: &'static str,
    /// Root key wrapping request bodies, e.g. `issue`.
    pub root_key: &'static str,
    /// Body encoding for create/update.
    pub encoding: BodyEncoding,
}

impl ResourceSpec {
    /// A resource taking JSON bodies.
    pub const fn json(path: &'static str, root_key: &'static str) -> Self {
        Self {
            path,
            root_key,
            encoding: BodyEncoding::Json,
        }
    }

    /// A resource taking form bodies.
    pub const fn form(path: &'static str, root_key: &'static str) -> Self {
        Self {
            path,
            root_key,
            encoding: BodyEncoding::Form,
        }
    }

    /// Number of parent ids the path template expects.
    pub fn arity(&self) -> usize {
        self.path.matches("{}").count()
    }

    /// Fill the path template with parent ids.
    ///
    /// # Errors
    ///
    /// Returns [`RipsError::InvalidPath`] if the number of ids does not match
    /// the template and [`RipsError::InvalidId`] for a zero id.
    pub fn collection_path(&self, parents: &[u64]) -> Result<String> {
        if parents.len() != self.arity() {
            return Err(RipsError::InvalidPath(format!(
                "'{}' takes {} parent id(s), got {}",
                self.path,
                self.arity(),
                parents.len()
            )));
        }

        let mut path = String::with_capacity(self.path.len() + parents.len() * 4);
        let mut ids = parents.iter();
        for (i, part) in self.path.split("{}").enumerate() {
            if i > 0 {
                // Counts were checked above, so an id is always available.
                if let Some(id) = ids.next() {
                    path.push_str(&checked_id(*id)?.to_string());
                }
            }
            path.push_str(part);
        }

        Ok(path)
    }

    /// Path of a single item below the collection.
    pub fn item_path(&self, parents: &[u64], id: u64) -> Result<String> {
        let collection = self.collection_path(parents)?;
        Ok(format!("{}/{}", collection, checked_id(id)?))
    }

    /// Wrap `input` under the root key and encode it.
    pub fn body(&self, input: &Value) -> RequestBody {
        let mut wrapped = Map::new();
        wrapped.insert(self.root_key.to_string(), input.clone());
        let wrapped = Value::Object(wrapped);

        match self.encoding {
            BodyEncoding::Json => RequestBody::Json(wrapped),
            BodyEncoding::Form => RequestBody::Form(wrapped),
        }
    }
}

fn checked_id(id: u64) -> Result<u64> {
    if id == 0 {
        Err(RipsError::InvalidId)
    } else {
        Ok(id)
    }
}

/// CRUD operations for one resource over a shared [`Transport`].
///
/// Stateless; cloning is cheap.
///
/// # Example
///
/// ```no_run
/// use ripsapi::{resources, ResourceClient, Transport, ClientConfig};
/// use serde_json::{json, Value};
///
/// # async fn example(transport: Transport) -> ripsapi::Result<()> {
/// let comments = ResourceClient::new(transport, resources::COMMENTS);
/// let created = comments
///     .create(&[1, 2, 3], &json!({"text": "false positive"}), &Value::Null)
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct ResourceClient {
    transport: Transport,
    spec: ResourceSpec,
}

impl ResourceClient {
    /// Create a client for `spec`.
    pub fn new(transport: Transport, spec: ResourceSpec) -> Self {
        Self { transport, spec }
    }

    /// The resource description.
    pub fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// `GET` the collection.
    pub async fn get_all(&self, parents: &[u64], query: &Value) -> Result<Value> {
        let path = self.spec.collection_path(parents)?;
        let response = self.transport.send(Method::GET, &path, query, None).await?;
        decode(response).await
    }

    /// `GET` one item.
    pub async fn get_by_id(&self, parents: &[u64], id: u64, query: &Value) -> Result<Value> {
        let path = self.spec.item_path(parents, id)?;
        let response = self.transport.send(Method::GET, &path, query, None).await?;
        decode(response).await
    }

    /// `GET` a sub-path of the collection such as `scans/all` or `stats`.
    pub async fn get_path(&self, parents: &[u64], suffix: &str, query: &Value) -> Result<Value> {
        let path = join_suffix(&self.spec.collection_path(parents)?, suffix);
        let response = self.transport.send(Method::GET, &path, query, None).await?;
        decode(response).await
    }

    /// `POST` a new item, wrapped under the root key.
    pub async fn create(&self, parents: &[u64], input: &Value, query: &Value) -> Result<Value> {
        let path = self.spec.collection_path(parents)?;
        let body = self.spec.body(input);
        let response = self
            .transport
            .send(Method::POST, &path, query, Some(&body))
            .await?;
        decode(response).await
    }

    /// `PATCH` an item, wrapped under the root key.
    pub async fn update(
        &self,
        parents: &[u64],
        id: u64,
        input: &Value,
        query: &Value,
    ) -> Result<Value> {
        let path = self.spec.item_path(parents, id)?;
        let body = self.spec.body(input);
        let response = self
            .transport
            .send(Method::PATCH, &path, query, Some(&body))
            .await?;
        decode(response).await
    }

    /// `PATCH` the collection itself (resources without item ids, e.g. settings).
    pub async fn update_all(&self, parents: &[u64], input: &Value, query: &Value) -> Result<Value> {
        let path = self.spec.collection_path(parents)?;
        let body = self.spec.body(input);
        let response = self
            .transport
            .send(Method::PATCH, &path, query, Some(&body))
            .await?;
        decode(response).await
    }

    /// `DELETE` the collection (optionally filtered). The body is discarded.
    pub async fn delete_all(&self, parents: &[u64], query: &Value) -> Result<()> {
        let path = self.spec.collection_path(parents)?;
        let response = self
            .transport
            .send(Method::DELETE, &path, query, None)
            .await?;
        check_response(response).await.map(|_| ())
    }

    /// `DELETE` one item. The body is discarded.
    pub async fn delete_by_id(&self, parents: &[u64], id: u64, query: &Value) -> Result<()> {
        let path = self.spec.item_path(parents, id)?;
        let response = self
            .transport
            .send(Method::DELETE, &path, query, None)
            .await?;
        check_response(response).await.map(|_| ())
    }

    /// `GET` a sub-path and stream the raw body into `out_file`.
    ///
    /// Returns the number of bytes written. Nothing is written when the
    /// response status is not a success.
    pub async fn download(
        &self,
        parents: &[u64],
        suffix: &str,
        query: &Value,
        out_file: &Path,
    ) -> Result<u64> {
        let path = join_suffix(&self.spec.collection_path(parents)?, suffix);
        let response = self.transport.send(Method::GET, &path, query, None).await?;
        let mut response = check_response(response).await?;

        let mut file = tokio::fs::File::create(out_file).await?;
        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.map_err(RipsError::HttpError)? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;

        tracing::debug!(bytes = written, file = %out_file.display(), "download complete");
        Ok(written)
    }
}

fn join_suffix(collection: &str, suffix: &str) -> String {
    let suffix = suffix.trim_matches('/');
    if suffix.is_empty() {
        collection.to_string()
    } else {
        format!("{collection}/{suffix}")
    }
}

/// Check the status and decode the body as JSON. Empty bodies decode to `Null`.
pub async fn decode(response: Response) -> Result<Value> {
    let response = check_response(response).await?;
    let body = response.bytes().await.map_err(RipsError::HttpError)?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Decode a loosely typed document into a concrete type.
pub fn decode_as<T: DeserializeOwned>(value: Value) -> Result<T> {
    Ok(serde_json::from_value(value)?)
}

/// Check response status and convert errors.
pub async fn check_response(response: Response) -> Result<Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let message = extract_error_message(response, status).await;
    Err(RipsError::ApiError {
        message,
        status_code: status.as_u16(),
    })
}

/// Extract error message from a failed response.
async fn extract_error_message(response: Response, status: reqwest::StatusCode) -> String {
    let body = match response.text().await {
        Ok(b) => b,
        Err(_) => return format!("HTTP {status}"),
    };

    // Try to parse as JSON and extract message field
    if let Ok(json) = serde_json::from_str::<Value>(&body) {
        if let Some(msg) = json.get("message").and_then(|m| m.as_str()) {
            return msg.to_string();
        }
        if let Some(err) = json.get("error").and_then(|m| m.as_str()) {
            return err.to_string();
        }
    }

    if body.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        body
    }
}
