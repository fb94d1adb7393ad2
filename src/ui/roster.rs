use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::game::DEFAULT_PLAYERS;
use crate::ui::{footer, pad_to_width, titled_block, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAME_COLUMN_WIDTH: usize = 24;

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Length(3), // name input
            Constraint::Min(1),    // roster
            Constraint::Length(1), // key hints
        ])
        .split(area);

    let input = Paragraph::new(app.name_input.as_str()).block(titled_block("add player"));
    input.render(chunks[0], buf);

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
            let mut spans = vec![Span::styled(
                format!("{} {}", marker, pad_to_width(&player.name, NAME_COLUMN_WIDTH)),
                style,
            )];
            if DEFAULT_PLAYERS.contains(&player.name.as_str()) {
                spans.push(Span::styled(" default", dim_style));
            }
            Line::from(spans)
        })
        .collect();
    Paragraph::new(rows).render(chunks[1], buf);

    footer("(type) name / (enter) add / (del) remove / (up/down) select / (esc) back")
        .render(chunks[2], buf);
}
