//! Program pane rendering with syntax highlighting
//!
//! Displays the pretty-printed AST listing, one statement header per line,
//! with the statement that produced the current snapshot highlighted.
//!
//! # Rendering
//!
//! Highlighting runs a word-level pass over each listing line: keywords are
//! bold, numbers and identifiers are colored, operators keep the default
//! foreground. Listing lines are already normalized, so no full lexer is
//! needed.

use crate::parser::ast::{ListingLine, StatementId};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const KEYWORDS: &[&str] = &["read", "write", "if", "fi", "do", "od", "check"];

fn highlight_listing_line(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut word = String::new();

    for c in text.chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            word.push(c);
            continue;
        }
        if !word.is_empty() {
            spans.push(styled_word(std::mem::take(&mut word)));
        }
        spans.push(Span::styled(c.to_string(), Style::default().fg(DEFAULT_THEME.fg)));
    }
    if !word.is_empty() {
        spans.push(styled_word(word));
    }
    spans
}

fn styled_word(word: String) -> Span<'static> {
    let style = if KEYWORDS.contains(&word.as_str()) {
        Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD)
    } else if word.starts_with(|c: char| c.is_ascii_digit()) {
        Style::default().fg(DEFAULT_THEME.number)
    } else {
        Style::default().fg(DEFAULT_THEME.identifier)
    };
    Span::styled(word, style)
}

/// Scroll state for the program pane
#[derive(Default)]
pub struct ProgramScrollState {
    pub offset: usize,
    /// Visual row the current line is pinned to; centered on first render
    pub target_line_row: Option<usize>,
}

/// Data needed to render the program pane
pub struct ProgramRenderData<'a> {
    pub listing: &'a [ListingLine],
    /// Statement that produced the current snapshot
    pub current: Option<StatementId>,
    /// Whether that statement ended in a runtime error
    pub is_error: bool,
}

/// Render the program pane
pub fn render_program_pane(
    frame: &mut Frame,
    area: Rect,
    data: ProgramRenderData,
    is_focused: bool,
    scroll_state: &mut ProgramScrollState,
) {
    let block = Block::default()
        .title(" Program ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let total_lines = data.listing.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders (2), min 1

    let target_row = scroll_state
        .target_line_row
        .unwrap_or(visible_height / 2)
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    let current_idx = data
        .current
        .and_then(|id| data.listing.iter().position(|l| l.statement == Some(id)));

    // Keep the current line at the target visual row
    if let Some(idx) = current_idx {
        scroll_state.offset = idx.saturating_sub(target_row);
    }
    if total_lines > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_lines - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_lines: Vec<Line> = data
        .listing
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let is_current = current_idx == Some(idx);
            let marker = match line.statement {
                Some(id) => format!("{:4} ", id),
                None => "     ".to_string(),
            };

            let (num_style, content_style) = if is_current && data.is_error {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                    Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White) // White text on red for visibility
                        .add_modifier(Modifier::BOLD),
                )
            } else if is_current {
                (
                    Style::default()
                        .fg(DEFAULT_THEME.secondary)
                        .add_modifier(Modifier::BOLD),
                    Style::default().bg(DEFAULT_THEME.current_line_bg),
                )
            } else {
                (Style::default().fg(DEFAULT_THEME.comment), Style::default())
            };

            let mut spans = vec![
                Span::styled(marker, num_style),
                Span::raw("   ".repeat(line.depth)),
            ];
            for mut span in highlight_listing_line(&line.text) {
                if is_current && data.is_error {
                    span.style = content_style;
                } else {
                    span.style = span.style.patch(content_style);
                }
                spans.push(span);
            }
            Line::from(spans)
        })
        .collect();

    let paragraph = if visible_lines.is_empty() {
        Paragraph::new("(empty program)").style(Style::default().fg(DEFAULT_THEME.comment))
    } else {
        Paragraph::new(visible_lines)
    };
    frame.render_widget(paragraph.block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_splits_words_and_operators() {
        let spans = highlight_listing_line("check n > 10");
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, vec!["check", " ", "n", " ", ">", " ", "10"]);
        assert_eq!(spans[0].style.fg, Some(DEFAULT_THEME.keyword));
        assert_eq!(spans[2].style.fg, Some(DEFAULT_THEME.identifier));
        assert_eq!(spans[6].style.fg, Some(DEFAULT_THEME.number));
    }
}
