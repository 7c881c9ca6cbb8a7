//! Input and output pane rendering
//!
//! Both panes show a word queue: the input words `read` has not consumed
//! yet, and the words `write` (or a runtime error) produced so far.

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, List, ListItem, Padding, Paragraph},
    Frame,
};

/// Data needed to render a word pane
pub struct WordsRenderData<'a, I> {
    pub title: &'a str,
    pub words: I,
    pub placeholder: &'a str,
    /// Style the last word as an error message
    pub last_is_error: bool,
}

/// Render a word pane, one word per row
pub fn render_words_pane<'w, I>(
    frame: &mut Frame,
    area: Rect,
    data: WordsRenderData<'_, I>,
    is_focused: bool,
    scroll_offset: &mut usize,
) where
    I: ExactSizeIterator<Item = &'w String>,
{
    let block = Block::default()
        .title(format!(" {} ", data.title))
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let total_items = data.words.len();
    if total_items == 0 {
        let paragraph = Paragraph::new(data.placeholder)
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let all_items: Vec<ListItem> = data
        .words
        .enumerate()
        .map(|(i, word)| {
            let color = if data.last_is_error && i + 1 == total_items {
                DEFAULT_THEME.error
            } else {
                DEFAULT_THEME.fg
            };
            ListItem::new(word.as_str()).style(Style::default().fg(color))
        })
        .collect();

    let visible_height = area.height.saturating_sub(2).max(1) as usize; // Account for borders, min 1

    // Clamp scroll offset only if content exceeds visible area
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
