//! Media viewer - content-id driven image and video viewer
//!
//! This library crate exposes the core functionality for integration testing.

pub mod catalog;
pub mod config;
pub mod server;
pub mod source;
