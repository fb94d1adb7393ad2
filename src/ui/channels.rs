use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use crate::app::App;
use crate::ui::{footer, pad_to_width, titled_block, HORIZONTAL_MARGIN, VERTICAL_MARGIN};

const NAME_COLUMN_WIDTH: usize = 16;

pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let dim_style = Style::default().add_modifier(Modifier::DIM);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints([
            Constraint::Min(1),    // guide
            Constraint::Length(1), // key hints
        ])
        .split(area);

    let rows: Vec<Line> = app
        .guide
        .channels()
        .iter()
        .enumerate()
        .map(|(idx, channel)| {
            let tuned = if idx == app.tuned_channel { "▶" } else { " " };
            let name_style = if idx == app.selected_channel {
                bold_style.fg(Color::Green)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{} {}", tuned, pad_to_width(&channel.name, NAME_COLUMN_WIDTH)),
                    name_style,
                ),
                Span::styled(format!("  {}", channel.url), dim_style),
            ])
        })
        .collect();

    Paragraph::new(rows)
        .block(titled_block("channel guide"))
        .render(chunks[0], buf);

    footer("(up/down) select / (enter) tune / (esc) back").render(chunks[1], buf);
}
