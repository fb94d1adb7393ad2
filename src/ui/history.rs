use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use time_humanize::HumanTime;

use crate::app::App;
use crate::game::GameRecord;
use crate::ui::{footer, titled_block, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // game list
            Constraint::Length(1), // key hints
        ])
        .split(area);

    if app.game.recent_games.is_empty() {
        let empty = Paragraph::new(Span::styled("no games yet", dim_style))
            .block(titled_block("recent games"))
            .alignment(Alignment::Center);
        empty.render(chunks[0], buf);
    } else {
        // Newest first
        let rows: Vec<Line> = app
            .game
            .recent_games
            .iter()
            .rev()
            .map(|record| present_record(record, dim_style))
            .collect();

        // Scroll state is unbounded while keys are handled; clamp it against
        // the list here, where the viewport height is known
        let visible = chunks[0].height.saturating_sub(2) as usize;
        let max_scroll = rows.len().saturating_sub(visible);
        let scroll = app.history_scroll.min(max_scroll);

        let list: Vec<Line> = rows.into_iter().skip(scroll).collect();
        Paragraph::new(list)
            .block(titled_block("recent games"))
            .render(chunks[0], buf);
    }

    footer("(up/down) scroll / (x) clear history / (esc) back").render(chunks[1], buf);
}

fn present_record(record: &GameRecord, dim_style: Style) -> Line<'static> {
    let elapsed = (chrono::Local::now() - record.ended_at).num_seconds().max(0);
    let when = HumanTime::from(-elapsed).to_string();

    // Winner first; tied scores fall back to name order
    let standings = record
        .entries
        .iter()
        .sorted_by(|a, b| b.score.cmp(&a.score).then_with(|| a.name.cmp(&b.name)))
        .map(|e| format!("{} {}", e.name, e.score))
        .join(" · ");

    Line::from(vec![
        Span::styled(format!("ended {when}  "), dim_style),
        Span::styled(standings, Style::default().fg(Color::Cyan)),
    ])
}
