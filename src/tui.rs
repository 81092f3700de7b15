use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::DefaultTerminal;

use crate::error::Result;
use crate::fmt;
use crate::models::{Category, Transaction};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

pub const FOOTER_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const INCOME_STYLE: Style = Style::new().fg(Color::Rgb(80, 220, 100));
pub const EXPENSE_STYLE: Style = Style::new().fg(Color::Red);
pub const OVERDUE_STYLE: Style = Style::new().fg(Color::Red).add_modifier(Modifier::BOLD);
pub const PAID_STYLE: Style = Style::new().fg(Color::DarkGray);

pub const SELECTED_STYLE: Style = Style::new()
    .bg(Color::Rgb(40, 40, 60))
    .add_modifier(Modifier::BOLD);

/// Signed amount as a colored Span (green for income, red for expense).
pub fn amount_span(t: &Transaction, privacy: bool) -> Span<'static> {
    let style = if t.is_expense() { EXPENSE_STYLE } else { INCOME_STYLE };
    Span::styled(fmt::signed_amount(t, privacy), style)
}

pub fn category_span(category: Category) -> Span<'static> {
    let (r, g, b) = category.rgb();
    Span::styled(category.label(), Style::new().fg(Color::Rgb(r, g, b)))
}

/// Wrap text to a given width. Returns (wrapped_string, line_count).
pub fn wrap_text(text: &str, width: usize) -> (String, u16) {
    if width == 0 {
        return (text.to_string(), 1);
    }
    let wrapped = textwrap::fill(text, width);
    let lines = wrapped.lines().count().max(1) as u16;
    (wrapped, lines)
}

/// Set up the terminal and panic hook, run `body`, then restore the terminal.
pub fn with_terminal<F>(body: F) -> Result<()>
where
    F: FnOnce(&mut DefaultTerminal) -> Result<()>,
{
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        hook(info);
    }));

    let mut terminal = ratatui::init();
    let result = body(&mut terminal);
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_text_counts_lines() {
        let (wrapped, lines) = wrap_text("parcela do notebook novo da loja", 10);
        assert!(lines > 1);
        assert_eq!(wrapped.lines().count() as u16, lines);
        assert_eq!(wrap_text("abc", 0), ("abc".to_string(), 1));
    }

    #[test]
    fn test_category_span_uses_label() {
        let span = category_span(Category::Food);
        assert_eq!(span.content, "Alimentação");
        assert_eq!(span.style.fg, Some(Color::Rgb(245, 158, 11)));
    }
}
