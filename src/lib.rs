//! Task Manager MCP Server Library
//!
//! This module exports the core components for testing and integration.

pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod resources;
pub mod tools;
pub mod types;
pub mod web;
