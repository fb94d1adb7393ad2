use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Widget, Wrap},
};

use crate::app::App;
use crate::ui::{footer, pad_to_width, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAME_COLUMN_WIDTH: usize = 24;

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);
    let italic_style = Style::default().add_modifier(Modifier::ITALIC);

    let round_lines = if app.game.round_active() { 2 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(2),           // channel header
            Constraint::Length(2),           // prompt card
            Constraint::Min(1),              // score rail
            Constraint::Length(round_lines), // countdown
            Constraint::Length(1),           // key hints
        ])
        .split(area);

    let channel = app
        .guide
        .channels()
        .get(app.tuned_channel)
        .map(|c| c.name.as_str())
        .unwrap_or("off air");
    let transport = if app.paused { "paused" } else { "live" };
    let header = Paragraph::new(Line::from(vec![
        Span::styled(channel.to_string(), bold_style.fg(Color::Magenta)),
        Span::styled(format!(" ({transport})"), dim_style),
        Span::styled(
            format!(
                "   session started {}",
                app.game.session_started_at.format("%H:%M")
            ),
            dim_style,
        ),
    ]));
    header.render(chunks[0], buf);

    let prompt_line = match &app.prompt {
        Some(prompt) => Span::styled(
            format!("{} ({})", prompt.text, prompt.category.key()),
            italic_style,
        ),
        None => Span::styled("(p) draws a guessing prompt", dim_style),
    };
    let prompt = Paragraph::new(prompt_line)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    prompt.render(chunks[1], buf);

    let rows: Vec<Line> = app
        .game
        .players
        .iter()
        .enumerate()
        .map(|(idx, player)| {
            let (marker, style) = if idx == app.selected_player {
                ("❯", bold_style.fg(Color::Green))
            } else {
                (" ", Style::default())
            };
            Line::from(Span::styled(
                format!(
                    "{} {} {:>6}",
                    marker,
                    pad_to_width(&player.name, NAME_COLUMN_WIDTH),
                    player.score
                ),
                style,
            ))
        })
        .collect();
    Paragraph::new(rows).render(chunks[2], buf);

    if let Some(round) = app.game.round {
        let ratio = if round.length_secs > 0.0 {
            (round.seconds_remaining / round.length_secs).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let countdown = Gauge::default()
            .gauge_style(Style::default().fg(Color::Magenta))
            .label(format!("{:.0}s", round.seconds_remaining.max(0.0)))
            .ratio(ratio);
        countdown.render(chunks[3], buf);
    }

    footer("(1/3/5) award / (t) round / (p)rompt / (e)nd game / (space) pause / (r)oster / (h)istory / (l)eaders / (c)hannels / (esc)ape")
        .render(chunks[4], buf);
}
