//! HTTP client for the tree service.
//!
//! All calls are blocking and run on the worker thread, never on the UI
//! thread. Each mutating endpoint answers with the full tree as JSON.

use super::{Avatar, AvatarUpload, NewNode, ServiceError, TreeService};
use crate::document::node::{Node, NodeId};
use anyhow::{Context, Result};
use log::{debug, info};
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Request encoding used by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApiStyle {
    /// Creates are always multipart forms carrying a `jsonData` field; deletes
    /// are `GET /deleteNode/ID={id}`.
    #[default]
    Form,
    /// Creates are JSON bodies (multipart only when an avatar is attached);
    /// deletes are `POST /deleteNode` with a JSON body.
    Json,
}

#[derive(Serialize)]
struct AddPayload<'a> {
    #[serde(rename = "ParentID")]
    parent_id: &'a NodeId,
    #[serde(rename = "Title")]
    title: &'a str,
}

#[derive(Serialize)]
struct DeletePayload<'a> {
    #[serde(rename = "ID")]
    id: &'a NodeId,
}

/// Tree service reached over HTTP.
pub struct HttpTreeService {
    client: Client,
    base: Url,
    api: ApiStyle,
    static_avatar: Option<PathBuf>,
}

impl HttpTreeService {
    /// Creates a client for the service at `base_url`.
    ///
    /// `timeout` of `None` disables the request timeout entirely.
    pub fn new(base_url: &str, api: ApiStyle, timeout: Option<Duration>) -> Result<Self> {
        let mut base = Url::parse(base_url)
            .with_context(|| format!("Invalid service URL: {}", base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let client = Client::builder()
            .user_agent(concat!("treequill/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base,
            api,
            static_avatar: None,
        })
    }

    /// Serves every avatar from one local file instead of the service.
    pub fn with_static_avatar(mut self, path: PathBuf) -> Self {
        self.static_avatar = Some(path);
        self
    }

    /// Returns the base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ServiceError> {
        self.base
            .join(path)
            .map_err(|err| ServiceError::Malformed(format!("bad endpoint {}: {}", path, err)))
    }

    fn add_form(&self, node: &NewNode) -> Result<Form, ServiceError> {
        let json = add_payload(node);
        let form = match &node.avatar_file {
            Some(path) => {
                let upload = AvatarUpload::read(path)?;
                let part = Part::bytes(upload.bytes)
                    .file_name(upload.file_name)
                    .mime_str(upload.kind.mime())?;
                Form::new()
                    .text("filestatus", "true")
                    .part("uploadfile", part)
            }
            None => Form::new().text("filestatus", "false"),
        };
        Ok(form.text("jsonData", json))
    }
}

fn add_payload(node: &NewNode) -> String {
    serde_json::to_string(&AddPayload {
        parent_id: &node.parent_id,
        title: &node.title,
    })
    .unwrap_or_default()
}

/// Path of the delete endpoint for the given style.
pub fn delete_path(api: ApiStyle, id: &NodeId) -> String {
    match api {
        ApiStyle::Form => format!("deleteNode/ID={}", id),
        ApiStyle::Json => "deleteNode".to_string(),
    }
}

/// Path of the avatar endpoint.
pub fn avatar_path(id: &NodeId) -> String {
    format!("getAvatar/ID={}", id)
}

fn check_status(response: Response) -> Result<Response, ServiceError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().unwrap_or_default();
        Err(ServiceError::Status {
            status: status.as_u16(),
            body: body.trim().to_string(),
        })
    }
}

/// Decodes a tree snapshot from a response body.
///
/// There is no nesting limit: the decoder moves to a heap-allocated stack
/// segment when it runs deep, so a tall tree is loaded in full and only its
/// display is truncated.
pub fn parse_snapshot(text: &str) -> Result<Node, ServiceError> {
    let malformed = |err: serde_json::Error| ServiceError::Malformed(err.to_string());

    let mut json = serde_json::Deserializer::from_str(text);
    json.disable_recursion_limit();
    let node = Node::deserialize(serde_stacker::Deserializer::new(&mut json)).map_err(malformed)?;
    json.end().map_err(malformed)?;
    Ok(node)
}

fn read_snapshot(response: Response) -> Result<Node, ServiceError> {
    debug!("Response: {:?}", &response);
    let response = check_status(response)?;
    let text = response.text()?;
    parse_snapshot(&text)
}

impl TreeService for HttpTreeService {
    fn fetch_tree(&self) -> Result<Node, ServiceError> {
        let url = self.endpoint("getTree")?;
        info!("GET {}", url);
        read_snapshot(self.client.get(url).send()?)
    }

    fn add_node(&self, node: &NewNode) -> Result<Node, ServiceError> {
        let url = self.endpoint("addNode")?;
        info!("POST {} (parent {}, title {:?})", url, node.parent_id, node.title);

        let request = match (self.api, &node.avatar_file) {
            (ApiStyle::Json, None) => self
                .client
                .post(url)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(add_payload(node)),
            _ => self.client.post(url).multipart(self.add_form(node)?),
        };
        read_snapshot(request.send()?)
    }

    fn delete_node(&self, id: &NodeId) -> Result<Node, ServiceError> {
        let url = self.endpoint(&delete_path(self.api, id))?;
        let request = match self.api {
            ApiStyle::Form => {
                info!("GET {}", url);
                self.client.get(url)
            }
            ApiStyle::Json => {
                info!("POST {} (id {})", url, id);
                self.client.post(url).json(&DeletePayload { id })
            }
        };
        read_snapshot(request.send()?)
    }

    fn fetch_avatar(&self, id: &NodeId) -> Result<Avatar, ServiceError> {
        if let Some(path) = &self.static_avatar {
            let bytes = std::fs::read(path).map_err(|source| ServiceError::AvatarFile {
                path: path.clone(),
                source,
            })?;
            return Ok(Avatar::from_bytes(bytes));
        }

        let url = self.endpoint(&avatar_path(id))?;
        info!("GET {}", url);
        let response = check_status(self.client.get(url).send()?)?;
        let bytes = response.bytes()?;
        Ok(Avatar::from_bytes(bytes.to_vec()))
    }
}
