pub mod channels;
pub mod history;
pub mod leaderboard;
pub mod live;
pub mod roster;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Paragraph, Widget},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::{App, Screen};

pub(crate) const HORIZONTAL_MARGIN: u16 = 2;
pub(crate) const VERTICAL_MARGIN: u16 = 1;

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.screen {
            Screen::Live => live::render(self, area, buf),
            Screen::Roster => roster::render(self, area, buf),
            Screen::History => history::render(self, area, buf),
            Screen::Leaderboard => leaderboard::render(self, area, buf),
            Screen::Channels => channels::render(self, area, buf),
        }
    }
}

pub(crate) fn titled_block(title: &'static str) -> Block<'static> {
    Block::default().borders(Borders::ALL).title(title)
}

pub(crate) fn footer(hints: &'static str) -> Paragraph<'static> {
    Paragraph::new(Span::styled(
        hints,
        Style::default().add_modifier(Modifier::ITALIC),
    ))
}

/// Pads `text` with spaces to exactly `width` display columns, truncating
/// with an ellipsis when it does not fit. Width is measured in terminal
/// columns, not chars, so wide glyphs line up too.
pub(crate) fn pad_to_width(text: &str, width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;

    if text.width() <= width {
        out.push_str(text);
        used = text.width();
    } else {
        for c in text.chars() {
            let w = c.width().unwrap_or(0);
            if used + w > width.saturating_sub(1) {
                break;
            }
            out.push(c);
            used += w;
        }
        out.push('…');
        used += 1;
    }

    for _ in used..width {
        out.push(' ');
    }
    out
}
