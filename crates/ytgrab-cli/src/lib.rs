//! Command-line front end for the ytgrab server.
//!
//! The binary parses flags into a [`ytgrab_axum::ServerConfig`] and hands it
//! to the web adapter.

#![deny(unsafe_code)]
#![deny(unused_crate_dependencies)]

// Used by main.rs binary
use anyhow as _;
use dotenvy as _;
use tokio as _;
use tracing as _;
use tracing_subscriber as _;

pub mod parser;

pub use parser::Cli;
