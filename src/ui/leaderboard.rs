use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Cell, Paragraph, Row, Table, Widget},
};

use crate::app::App;
use crate::leaderboard::{sorted_rows, LeaderboardRow};
use crate::ui::{footer, titled_block, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // standings
            Constraint::Length(1), // key hints
        ])
        .split(area);

    if app.game.all_time_totals.is_empty() {
        let empty = Paragraph::new(Span::styled("no totals yet", dim_style))
            .block(titled_block("all-time totals"))
            .alignment(Alignment::Center);
        empty.render(chunks[0], buf);
    } else {
        let header = Row::new(vec![Cell::from("#"), Cell::from("player"), Cell::from("total")])
            .style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );

        let rows: Vec<Row> = sorted_rows(&app.game.all_time_totals)
            .iter()
            .enumerate()
            .map(|(idx, row)| present_row(idx + 1, row))
            .collect();

        let widths = [
            Constraint::Length(4),
            Constraint::Min(12),
            Constraint::Length(10),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(titled_block("all-time totals"))
            .column_spacing(2);
        table.render(chunks[0], buf);
    }

    footer("(x) clear totals / (esc) back").render(chunks[1], buf);
}

fn present_row(rank: usize, row: &LeaderboardRow) -> Row<'static> {
    let rank_style = if rank == 1 {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    Row::new(vec![
        Cell::from(rank.to_string()).style(rank_style),
        Cell::from(row.name.clone()),
        Cell::from(row.total.to_string()),
    ])
}
