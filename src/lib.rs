//! launchboard library
//!
//! Fetches upcoming rocket launches from Launch Library 2, keeps timestamped
//! snapshots on disk, and exposes them through an immutable [`store::DataStore`].

pub mod app;
pub mod cache;
pub mod cli;
pub mod data;
pub mod logging;
pub mod store;
pub mod ui;
