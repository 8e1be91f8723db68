//! Help overlay showing all keybindings
//!
//! Renders a centered modal overlay with keyboard shortcuts.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

/// Key column and description, in display order
const KEYBINDINGS: [(&str, &str); 5] = [
    ("→/l, Tab", "Next launch"),
    ("←/h", "Previous launch"),
    ("1-9, 0", "Jump to launch tab"),
    ("?", "Toggle this help"),
    ("q, Esc", "Quit application"),
];

const OVERLAY_WIDTH: u16 = 46;

/// Title, blank line, bindings, blank line, two notes, borders
const OVERLAY_HEIGHT: u16 = KEYBINDINGS.len() as u16 + 7;

/// Renders the help overlay on top of the current view
pub fn render(frame: &mut Frame) {
    let overlay_area = centered_rect(OVERLAY_WIDTH, OVERLAY_HEIGHT, frame.area());

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let note = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    lines.extend(KEYBINDINGS.iter().map(|(key, action)| help_line(key, action)));
    lines.push(Line::from(""));
    lines.push(Line::styled("Data refreshes on the next start once stale", note));
    lines.push(Line::styled("Press Esc or ? to close", note));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Left);

    frame.render_widget(paragraph, overlay_area);
}

fn help_line(key: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<12}", key), Style::default().fg(Color::Yellow)),
        Span::raw(action.to_string()),
    ])
}

/// A `width` x `height` rect in the middle of `area`, shrunk to fit
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);
    cell
}
