//! TreeQuill: a terminal editor for a remote tree of named nodes.
//!
//! The tree lives in an HTTP tree service. The editor fetches it, renders it
//! recursively with an add and a delete control per node, and replaces its
//! local copy with the full snapshot the service returns after every change.

pub mod config;
pub mod document;
pub mod editor;
pub mod input;
pub mod logging;
pub mod service;
pub mod theme;
pub mod ui;
pub mod worker;
