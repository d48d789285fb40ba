//! All drawing / rendering functions.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::grid::{GridContent, NO_RESULTS, Tile};
use crate::{ToastKind, ToastPhase};

use super::app::App;

const TILE_WIDTH: u16 = 24;
const TILE_HEIGHT: u16 = 4;

pub fn draw(frame: &mut ratatui::Frame, app: &mut App) {
    let area = frame.area();

    let outer = Block::default()
        .title(" icon-gallery ")
        .title_alignment(Alignment::Left)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Search bar
            Constraint::Min(TILE_HEIGHT), // Grid
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Controls bar
        ])
        .split(inner);

    // --- Search bar ---
    let search = Paragraph::new(app.search.as_str())
        .block(
            Block::default()
                .title(" Search icons: ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .style(Style::default().fg(Color::White));
    frame.render_widget(search, chunks[0]);

    // --- Grid ---
    app.columns = usize::from((chunks[1].width / TILE_WIDTH).max(1));
    draw_grid(frame, app, chunks[1]);

    // --- Status line ---
    frame.render_widget(
        Paragraph::new(Line::from(build_status_line(app))).style(Style::default().fg(Color::White)),
        chunks[2],
    );

    // --- Controls bar ---
    let controls_bar = Paragraph::new("type:search  arrows:move  enter:copy name  esc:clear/quit")
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);
    frame.render_widget(controls_bar, chunks[3]);

    draw_toast(frame, app, area);
}

fn build_status_line(app: &App) -> Vec<Span<'_>> {
    let mut spans = Vec::new();

    if app.loading {
        spans.push(Span::styled(
            " Refreshing from GitHub...",
            Style::default().fg(Color::Yellow),
        ));
    }

    if !app.status.is_empty() {
        if !spans.is_empty() {
            spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        }
        spans.push(Span::styled(
            format!(" {}", app.status),
            Style::default().fg(Color::Cyan),
        ));
    }

    if !app.search.is_empty() {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("{} match", app.grid.len()),
            Style::default().fg(Color::White),
        ));
    }

    if let Some(at) = app.cached_at {
        spans.push(Span::styled(" | ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            format!("cached {}", at.format("%Y-%m-%d %H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans
}

fn draw_grid(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    match app.grid.content() {
        GridContent::NoResults => {
            let text = Paragraph::new(NO_RESULTS)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(text, centered_line(area));
        }
        GridContent::Error(message) => {
            let text = Paragraph::new(message.as_str())
                .style(Style::default().fg(Color::Red))
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(text, centered_line(area));
        }
        GridContent::Tiles(tiles) => draw_tiles(frame, tiles, app.grid.selected(), app.columns, area),
    }
}

fn draw_tiles(frame: &mut ratatui::Frame, tiles: &[Tile], selected: usize, columns: usize, area: Rect) {
    let visible_rows = usize::from((area.height / TILE_HEIGHT).max(1));
    let selected_row = selected / columns;
    // Scroll so the selected row is always on screen
    let first_row = selected_row.saturating_sub(visible_rows - 1);

    for (i, tile) in tiles.iter().enumerate().skip(first_row * columns) {
        let row = i / columns - first_row;
        if row >= visible_rows {
            break;
        }
        let col = i % columns;
        #[allow(clippy::cast_possible_truncation)]
        let rect = Rect::new(
            area.x.saturating_add((col as u16).saturating_mul(TILE_WIDTH)),
            area.y.saturating_add((row as u16).saturating_mul(TILE_HEIGHT)),
            TILE_WIDTH,
            TILE_HEIGHT,
        )
        .intersection(area);
        if rect.is_empty() {
            continue;
        }

        let is_selected = i == selected;
        let border = if is_selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let caption_color = if tile.placeholder { Color::Red } else { Color::Green };

        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                tile.name.as_str(),
                Style::default().fg(Color::White),
            )),
            Line::from(Span::styled(tile.caption(), Style::default().fg(caption_color))),
        ])
        .block(Block::default().borders(Borders::ALL).border_style(border));
        frame.render_widget(body, rect);
    }
}

fn draw_toast(frame: &mut ratatui::Frame, app: &App, area: Rect) {
    let Some(toast) = app.toasts.current() else {
        return;
    };
    let style = match app.toasts.phase_at(Instant::now()) {
        // Not on screen until the entrance tick
        None | Some(ToastPhase::Entering) => return,
        Some(ToastPhase::Visible) => Style::default(),
        Some(ToastPhase::Leaving) => Style::default().add_modifier(Modifier::DIM),
    };
    let color = match toast.kind {
        ToastKind::Success => Color::Green,
        ToastKind::Error => Color::Red,
        ToastKind::Warning => Color::Yellow,
    };

    let width = u16::try_from(toast.message.chars().count())
        .unwrap_or(u16::MAX)
        .saturating_add(4)
        .min(area.width.saturating_sub(2));
    let rect = Rect::new(
        area.x + area.width.saturating_sub(width + 1),
        area.y + area.height.saturating_sub(5),
        width,
        3,
    )
    .intersection(area);
    if rect.is_empty() {
        return;
    }

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .style(style.fg(color))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(style.fg(color)),
            ),
        rect,
    );
}

fn centered_line(area: Rect) -> Rect {
    let height = area.height.min(3);
    Rect::new(
        area.x,
        area.y + area.height.saturating_sub(height) / 2,
        area.width,
        height,
    )
}
