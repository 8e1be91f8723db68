//! Launch tabs screen
//!
//! One numbered tab per launch. Each tab shows the launch service provider
//! as a header, the mission summary on the left and a world map with the
//! launch pad marked on the right.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Map, MapResolution, Points},
        Block, Borders, Paragraph, Tabs, Wrap,
    },
    Frame,
};

use crate::app::App;
use crate::ui::LaunchPanel;

/// Color scheme
mod colors {
    use ratatui::style::Color;

    pub const HEADER: Color = Color::Cyan;
    pub const SECONDARY: Color = Color::Gray;
    pub const MAP: Color = Color::DarkGray;
    pub const PAD: Color = Color::Red;
}

/// Half of the visible map width, in degrees of longitude
const HALF_SPAN_LON: f64 = 60.0;
/// Half of the visible map height, in degrees of latitude
const HALF_SPAN_LAT: f64 = 30.0;

/// Renders the tabbed launch view
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tabs
            Constraint::Length(3), // Provider
            Constraint::Min(5),    // Mission + map
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_tabs(frame, app, chunks[0]);

    match app.selected_launch() {
        Some(launch) => {
            render_provider(frame, &launch, chunks[1]);

            let body = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(chunks[2]);
            render_mission(frame, &launch, body[0]);
            render_map(frame, &launch, body[1]);
        }
        None => {
            let empty = Paragraph::new("No upcoming launches in this snapshot")
                .style(Style::default().fg(colors::SECONDARY))
                .alignment(Alignment::Center);
            frame.render_widget(empty, chunks[2]);
        }
    }

    render_footer(frame, app, chunks[3]);
}

fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<String> = (1..=app.tab_count()).map(|n| n.to_string()).collect();

    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Upcoming Launches "),
        )
        .select(app.selected_tab)
        .highlight_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}

fn render_provider(frame: &mut Frame, launch: &LaunchPanel, area: Rect) {
    let header = Paragraph::new(Line::from(Span::styled(
        launch.provider.to_string(),
        Style::default()
            .fg(colors::HEADER)
            .add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::BOTTOM));

    frame.render_widget(header, area);
}

/// Mission panel text for a launch
pub(crate) fn mission_lines(launch: &LaunchPanel) -> Vec<Line<'static>> {
    let description = launch
        .description
        .unwrap_or("No mission description available.")
        .to_string();

    vec![
        Line::from(vec![
            Span::raw(format!("The {} has status: ", launch.name)),
            Span::styled(
                launch.status.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Window: {} - {}", launch.window.start, launch.window.end),
            Style::default().fg(colors::SECONDARY),
        )),
        Line::from(""),
        Line::from(description),
    ]
}

fn render_mission(frame: &mut Frame, launch: &LaunchPanel, area: Rect) {
    let paragraph = Paragraph::new(mission_lines(launch))
        .block(Block::default().borders(Borders::ALL).title(" Mission "))
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Visible window of the map, centered on the pad where possible
///
/// The window keeps a fixed size and slides to stay inside the world
/// bounds, so the pad is always visible.
pub(crate) fn map_bounds(lon: f64, lat: f64) -> ([f64; 2], [f64; 2]) {
    fn window(center: f64, half: f64, limit: f64) -> [f64; 2] {
        let center = center.clamp(-limit + half, limit - half);
        [center - half, center + half]
    }

    (
        window(lon, HALF_SPAN_LON, 180.0),
        window(lat, HALF_SPAN_LAT, 90.0),
    )
}

fn render_map(frame: &mut Frame, launch: &LaunchPanel, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Launch Pad ");

    let Some((lon, lat)) = launch.coordinates else {
        let unavailable = Paragraph::new("Pad location unavailable")
            .style(Style::default().fg(colors::SECONDARY))
            .alignment(Alignment::Center)
            .block(block);
        frame.render_widget(unavailable, area);
        return;
    };

    let (x_bounds, y_bounds) = map_bounds(lon, lat);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(move |ctx| {
            ctx.draw(&Map {
                color: colors::MAP,
                resolution: MapResolution::High,
            });
            ctx.layer();
            ctx.draw(&Points {
                coords: &[(lon, lat)],
                color: colors::PAD,
            });
            ctx.print(
                lon,
                lat,
                Span::styled(
                    "X",
                    Style::default()
                        .fg(colors::PAD)
                        .add_modifier(Modifier::BOLD),
                ),
            );
        });

    frame.render_widget(canvas, area);
}

fn render_footer(frame: &mut Frame, app: &App, area: Rect) {
    let snapshot = app
        .store()
        .fetched_at()
        .map(|at| format!("snapshot {}", at.format("%Y-%m-%d %H:%M UTC")))
        .unwrap_or_default();

    let footer = Paragraph::new(Line::from(vec![
        Span::styled("←/→", Style::default().fg(Color::Yellow)),
        Span::raw(" switch  "),
        Span::styled("1-0", Style::default().fg(Color::Yellow)),
        Span::raw(" jump  "),
        Span::styled("?", Style::default().fg(Color::Yellow)),
        Span::raw(" help  "),
        Span::styled("q", Style::default().fg(Color::Yellow)),
        Span::raw(" quit   "),
        Span::styled(snapshot, Style::default().fg(colors::SECONDARY)),
    ]));

    frame.render_widget(footer, area);
}
