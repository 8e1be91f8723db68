//! Plain-text rendering for `--list`

use std::fmt::Write;

use crate::store::{DataStore, StoreError};
use crate::ui::LaunchPanel;

/// Formats up to `limit` launches as numbered plain-text entries
pub fn render_plain(store: &DataStore, limit: usize) -> Result<String, StoreError> {
    let mut out = String::new();

    if store.results_len() == 0 {
        out.push_str("No upcoming launches in this snapshot\n");
        return Ok(out);
    }

    for idx in 0..store.results_len().min(limit) {
        write_entry(&mut out, idx + 1, &LaunchPanel::load(store, idx)?);
    }

    Ok(out)
}

fn write_entry(out: &mut String, number: usize, launch: &LaunchPanel) {
    let _ = writeln!(out, "{}. {} [{}]", number, launch.name, launch.status);
    let _ = writeln!(out, "   Provider: {}", launch.provider);
    let _ = writeln!(
        out,
        "   Window:   {} - {}",
        launch.window.start, launch.window.end
    );
    let _ = writeln!(out, "   Pad:      {}, {}", launch.latitude, launch.longitude);
    if let Some(description) = launch.description {
        let _ = writeln!(out, "   {}", description);
    }
    out.push('\n');
}
