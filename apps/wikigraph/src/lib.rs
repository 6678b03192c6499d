//! # WikiGraph
//!
//! The application crate: Bolt gateway, algorithm orchestration, the
//! [`service::GraphService`] facade, and the HTTP and CLI surfaces over it.
//! All query text and all scoring live in `wikigraph-core`.

pub mod algorithms;
pub mod api;
pub mod cli;
pub mod config;
pub mod gateway;
pub mod service;
