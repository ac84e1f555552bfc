//! Remote tree service access.
//!
//! The editor never changes its tree locally. Every mutation is a call to a
//! [`TreeService`], and every successful call hands back a complete snapshot
//! that replaces the editor's state.
//!
//! Two implementations are provided:
//! - [`http::HttpTreeService`]: talks to the tree service over HTTP
//! - [`memory::InMemoryTreeService`]: keeps the tree in process (offline mode and tests)

pub mod http;
pub mod memory;

use crate::document::node::{Node, NodeId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a service call.
///
/// The controller treats every variant the same way (log it, keep the current
/// snapshot), but the variants keep the log readable.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request never produced a response.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be decoded.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// The avatar chosen for upload could not be read.
    #[error("cannot read avatar file {}: {source}", path.display())]
    AvatarFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The service refused the operation.
    #[error("rejected: {0}")]
    Rejected(String),
}

/// A request to create a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNode {
    /// Node the new child is appended to
    pub parent_id: NodeId,
    /// Title as typed by the user
    pub title: String,
    /// Image file to upload as the avatar
    pub avatar_file: Option<PathBuf>,
}

impl NewNode {
    pub fn new(parent_id: NodeId, title: impl Into<String>) -> Self {
        Self {
            parent_id,
            title: title.into(),
            avatar_file: None,
        }
    }
}

/// Image formats the editor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
    Unknown,
}

impl ImageKind {
    /// Detects the format from the leading bytes of an image.
    ///
    /// # Example
    ///
    /// ```
    /// use treequill::service::ImageKind;
    ///
    /// assert_eq!(ImageKind::sniff(b"\x89PNG\r\n\x1a\n...."), ImageKind::Png);
    /// assert_eq!(ImageKind::sniff(b"hello"), ImageKind::Unknown);
    /// ```
    pub fn sniff(bytes: &[u8]) -> Self {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            ImageKind::Png
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            ImageKind::Jpeg
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            ImageKind::Gif
        } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
            ImageKind::Webp
        } else if looks_like_svg(bytes) {
            ImageKind::Svg
        } else {
            ImageKind::Unknown
        }
    }

    /// Guesses the format from a file extension.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("png") => ImageKind::Png,
            Some("jpg") | Some("jpeg") => ImageKind::Jpeg,
            Some("gif") => ImageKind::Gif,
            Some("webp") => ImageKind::Webp,
            Some("svg") => ImageKind::Svg,
            _ => ImageKind::Unknown,
        }
    }

    /// MIME type sent with uploads.
    pub fn mime(&self) -> &'static str {
        match self {
            ImageKind::Png => "image/png",
            ImageKind::Jpeg => "image/jpeg",
            ImageKind::Gif => "image/gif",
            ImageKind::Webp => "image/webp",
            ImageKind::Svg => "image/svg+xml",
            ImageKind::Unknown => "application/octet-stream",
        }
    }

    /// Short label used in the tree view.
    pub fn label(&self) -> &'static str {
        match self {
            ImageKind::Png => "png",
            ImageKind::Jpeg => "jpeg",
            ImageKind::Gif => "gif",
            ImageKind::Webp => "webp",
            ImageKind::Svg => "svg",
            ImageKind::Unknown => "img",
        }
    }
}

fn looks_like_svg(bytes: &[u8]) -> bool {
    let head = &bytes[..bytes.len().min(256)];
    let head = String::from_utf8_lossy(head);
    let head = head.trim_start();
    head.starts_with("<svg") || (head.starts_with("<?xml") && head.contains("<svg"))
}

/// An avatar image fetched from the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Avatar {
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl Avatar {
    /// Wraps raw image bytes, sniffing their format.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            kind: ImageKind::sniff(&bytes),
            bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// An avatar file read from disk, ready to upload.
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub kind: ImageKind,
    pub bytes: Vec<u8>,
}

impl AvatarUpload {
    /// Reads an image file for upload.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::AvatarFile`] if the file cannot be read.
    pub fn read(path: &Path) -> Result<Self, ServiceError> {
        let bytes = std::fs::read(path).map_err(|source| ServiceError::AvatarFile {
            path: path.to_path_buf(),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "avatar".to_string());
        let kind = match ImageKind::from_path(path) {
            ImageKind::Unknown => ImageKind::sniff(&bytes),
            kind => kind,
        };
        Ok(Self {
            file_name,
            kind,
            bytes,
        })
    }
}

/// Operations offered by a tree service.
///
/// Implementations are shared by the worker's threads.
///
/// Every mutating call returns the complete tree as the service sees it after
/// the call.
pub trait TreeService: Send + Sync {
    /// Fetches the whole tree.
    fn fetch_tree(&self) -> Result<Node, ServiceError>;

    /// Appends a new node as the last child of `node.parent_id`.
    fn add_node(&self, node: &NewNode) -> Result<Node, ServiceError>;

    /// Deletes a node and its subtree.
    fn delete_node(&self, id: &NodeId) -> Result<Node, ServiceError>;

    /// Fetches the avatar image of a node.
    fn fetch_avatar(&self, id: &NodeId) -> Result<Avatar, ServiceError>;
}
