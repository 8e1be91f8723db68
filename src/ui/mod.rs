//! UI rendering module for launchboard
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components, plus the plain-text listing.

pub mod help_overlay;
pub mod launch_tabs;
pub mod panel;
pub mod plain;

pub use help_overlay::render as render_help_overlay;
pub use launch_tabs::render as render_launch_tabs;
pub use panel::LaunchPanel;
pub use plain::render_plain;
