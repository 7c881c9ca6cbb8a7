//! TUI pane rendering modules
//!
//! # Pane Modules
//!
//! - [`program`]: AST listing with syntax highlighting and current statement indicator
//! - [`memory`]: variable cells with values and unused markers
//! - [`words`]: remaining input and produced output
//! - [`status`]: Status bar with keybindings and execution state
//!
//! Each pane module exports a `render_*` function plus the scroll state or
//! render data types it needs.

pub mod memory;
pub mod program;
pub mod status;
pub mod words;

use crate::ui::theme::DEFAULT_THEME;
use ratatui::style::{Modifier, Style};

pub use memory::{render_memory_pane, MemoryScrollState};
pub use program::{render_program_pane, ProgramRenderData, ProgramScrollState};
pub use status::{render_status_bar, StatusRenderData};
pub use words::{render_words_pane, WordsRenderData};

/// Border style shared by all bordered panes
fn border_style(is_focused: bool) -> Style {
    if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    }
}
