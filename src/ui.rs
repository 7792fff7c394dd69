use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
    Frame,
};
use trainclock::{
    controller::{PlaybackStatus, Snapshot},
    util::{format_clock, percent, truncate_to_width},
};

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;

pub fn draw(app: &App, f: &mut Frame) {
    f.render_widget(app, f.area());
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.controller.snapshot();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Length(3), // title
                Constraint::Length(3), // session progress
                Constraint::Length(9), // current step and timer
                Constraint::Min(3),    // step list
                Constraint::Length(1), // status / keys
            ])
            .split(area);

        render_header(self, &snapshot, chunks[0], buf);
        render_session_progress(&snapshot, chunks[1], buf);
        render_current_step(self, &snapshot, chunks[2], buf);
        render_step_list(self, &snapshot, chunks[3], buf);
        render_status_line(self, &snapshot, chunks[4], buf);

        if snapshot.alert_pending {
            render_alert(area, buf);
        }
        if snapshot.completed {
            render_completed(self, area, buf);
        }
    }
}

fn render_header(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let session = app.controller.session();
    let title = Line::from(vec![
        Span::styled(
            session.title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "  ·  Exercise {} of {}",
            snapshot.current_step_index + 1,
            snapshot.step_count
        )),
    ]);

    Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL).title("Training"))
        .alignment(Alignment::Center)
        .render(area, buf);
}

fn render_session_progress(snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Progress"))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(snapshot.progress_fraction.clamp(0.0, 1.0))
        .label(format!("{}%", percent(snapshot.progress_fraction)))
        .render(area, buf);
}

fn render_current_step(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let step = app.controller.current_step();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(step.category.clone().unwrap_or_default());
    let inner = block.inner(area);
    block.render(area, buf);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // label
            Constraint::Length(2), // description
            Constraint::Length(1),
            Constraint::Length(1), // time
            Constraint::Length(1),
            Constraint::Length(1), // step gauge
        ])
        .split(inner);

    Paragraph::new(Span::styled(
        step.label.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(rows[0], buf);

    Paragraph::new(step.description.clone())
        .style(Style::default().add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(rows[1], buf);

    let time_color = match snapshot.status {
        PlaybackStatus::Running => Color::Green,
        _ if snapshot.remaining_seconds == 0 => Color::Red,
        _ => Color::White,
    };
    Paragraph::new(Span::styled(
        snapshot.remaining.clone(),
        Style::default()
            .fg(time_color)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(rows[3], buf);

    Gauge::default()
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(snapshot.step_fraction.clamp(0.0, 1.0))
        .label(format!("of {}", format_clock(step.duration_seconds())))
        .render(rows[5], buf);
}

fn render_step_list(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title("Exercises");
    let inner = block.inner(area);
    block.render(area, buf);

    let visible = inner.height as usize;
    if visible == 0 {
        return;
    }
    // keep the cursor row on screen
    let offset = (app.cursor + 1).saturating_sub(visible);
    let name_width = (inner.width as usize).saturating_sub(16);

    let lines: Vec<Line> = app
        .controller
        .session()
        .steps()
        .iter()
        .enumerate()
        .skip(offset)
        .take(visible)
        .map(|(idx, step)| {
            let current = idx == snapshot.current_step_index;
            let marker = if idx < snapshot.current_step_index || (current && snapshot.completed) {
                "✔"
            } else if current && snapshot.running {
                "▶"
            } else if current {
                "●"
            } else {
                " "
            };

            let mut style = if current {
                Style::default().add_modifier(Modifier::BOLD)
            } else if idx < snapshot.current_step_index {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            if idx == app.cursor {
                style = style.bg(Color::DarkGray);
            }

            Line::from(Span::styled(
                format!(
                    "{} {:>2}. {:<width$} {:>6} min",
                    marker,
                    idx + 1,
                    truncate_to_width(&step.label, name_width),
                    step.duration_seconds() / 60,
                    width = name_width
                ),
                style,
            ))
        })
        .collect();

    Paragraph::new(lines).render(inner, buf);
}

fn render_status_line(app: &App, snapshot: &Snapshot, area: Rect, buf: &mut Buffer) {
    let line = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )),
        None => Line::from(vec![
            Span::styled(
                format!("[{}] ", snapshot.status),
                Style::default().fg(Color::Yellow),
            ),
            Span::styled(
                "(space) start/pause (r)eset (n)ext (p)rev (1-9/enter) select (R)estart (q)uit",
                Style::default().add_modifier(Modifier::DIM),
            ),
        ]),
    };

    Paragraph::new(line).render(area, buf);
}

fn render_alert(area: Rect, buf: &mut Buffer) {
    let popup = top_rect(40, 4, area);
    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Exercise completed!",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from("Move on to the next exercise"),
    ])
    .block(Block::default().borders(Borders::ALL))
    .style(Style::default().fg(Color::Black).bg(Color::Green))
    .alignment(Alignment::Center)
    .render(popup, buf);
}

fn render_completed(app: &App, area: Rect, buf: &mut Buffer) {
    let session = app.controller.session();
    let popup = centered_rect(50, 8, area);
    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            "Training completed!",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(format!("{} exercises", session.len())),
        Line::from(format!(
            "{} total minutes",
            session.total_duration_seconds() / 60
        )),
        Line::from(""),
        Line::from("(r) restart  (q) quit"),
    ])
    .block(Block::default().borders(Borders::ALL))
    .alignment(Alignment::Center)
    .render(popup, buf);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let width = (u32::from(area.width) * u32::from(percent_x) / 100) as u16;
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn top_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    Rect {
        y: area.y + 1u16.min(area.height),
        ..centered_rect(percent_x, height, area)
    }
    .intersection(area)
}
