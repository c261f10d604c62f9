//! Madodl - manga archive selection
//!
//! This library crate exposes the configuration, listing and batch layers
//! for integration testing. Filename and request parsing live in
//! `madodl-parser`.

pub mod batch;
pub mod config;
pub mod listing;
pub mod report;
