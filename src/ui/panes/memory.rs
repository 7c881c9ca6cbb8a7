//! Memory pane rendering
//!
//! One row per variable in declaration order: name, value, and a marker for
//! variables that have not been read since their last binding. Rows new
//! since the previous render pull the view down so fresh bindings stay
//! visible.

use crate::memory::Memory;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

/// Scroll state for the memory pane
#[derive(Default)]
pub struct MemoryScrollState {
    pub offset: usize,
    pub prev_item_count: usize,
}

/// Render the memory pane
pub fn render_memory_pane(
    frame: &mut Frame,
    area: Rect,
    memory: &Memory,
    is_focused: bool,
    scroll_state: &mut MemoryScrollState,
) {
    let block = Block::default()
        .title(" Memory ")
        .borders(Borders::ALL)
        .border_style(super::border_style(is_focused));

    let name_width = memory
        .cells()
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(0);

    let all_items: Vec<ListItem> = if memory.is_empty() {
        vec![ListItem::new("(empty)").style(Style::default().fg(DEFAULT_THEME.comment))]
    } else {
        memory
            .cells()
            .iter()
            .map(|cell| {
                let used = if cell.used {
                    Span::styled("  ", Style::default())
                } else {
                    Span::styled(
                        "  unused",
                        Style::default()
                            .fg(DEFAULT_THEME.comment)
                            .add_modifier(Modifier::ITALIC),
                    )
                };
                ListItem::new(Line::from(vec![
                    Span::styled("▸ ", Style::default().fg(DEFAULT_THEME.secondary)),
                    Span::styled(
                        format!("{:width$}", cell.name, width = name_width),
                        Style::default()
                            .fg(DEFAULT_THEME.identifier)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(" = ", Style::default().fg(DEFAULT_THEME.comment)),
                    Span::styled(
                        cell.value.to_string(),
                        Style::default().fg(DEFAULT_THEME.number),
                    ),
                    used,
                ]))
            })
            .collect()
    };

    let total_items = all_items.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;

    // Follow new bindings
    if total_items > scroll_state.prev_item_count && total_items > visible_height {
        scroll_state.offset = total_items - visible_height;
    }
    scroll_state.prev_item_count = total_items;

    if total_items > visible_height {
        scroll_state.offset = scroll_state.offset.min(total_items - visible_height);
    } else {
        scroll_state.offset = 0;
    }

    let visible_items: Vec<ListItem> = all_items
        .into_iter()
        .skip(scroll_state.offset)
        .take(visible_height)
        .collect();

    frame.render_widget(List::new(visible_items).block(block), area);
}
