//! Main TUI application state and logic

use crate::interpreter::{State, Status};
use crate::parser::ast::{ListingLine, Program};
use crate::snapshot::SnapshotManager;
use crate::ui::panes::{
    self, MemoryScrollState, ProgramRenderData, ProgramScrollState, StatusRenderData,
    WordsRenderData,
};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use std::io;
use std::time::{Duration, Instant};

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Program,
    Memory,
    Input,
    Output,
}

impl FocusedPane {
    /// Move focus to the next pane (clockwise: program -> output -> memory -> input)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Memory,
            FocusedPane::Memory => FocusedPane::Input,
            FocusedPane::Input => FocusedPane::Program,
        }
    }

    /// Move focus to the previous pane (counter-clockwise)
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Program => FocusedPane::Input,
            FocusedPane::Output => FocusedPane::Program,
            FocusedPane::Memory => FocusedPane::Output,
            FocusedPane::Input => FocusedPane::Memory,
        }
    }
}

/// The main application state
pub struct App {
    /// Recorded run being replayed
    pub history: SnapshotManager,

    /// Pretty-printed program, one entry per displayed line
    pub listing: Vec<ListingLine>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Per-pane scroll offsets
    pub program_scroll: ProgramScrollState,
    pub memory_scroll: MemoryScrollState,
    pub input_scroll: usize,
    pub output_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,

    /// Whether auto-play mode is active
    pub is_playing: bool,

    /// Last time a step was taken in play mode
    pub last_play_time: Instant,

    /// Last time space was pressed (for debouncing)
    pub last_space_press: Instant,
}

impl App {
    /// Create a new app replaying `history` over the listing of `program`
    pub fn new(program: &Program, history: SnapshotManager) -> Self {
        let status_message = if history.is_truncated() {
            format!("History truncated after {} steps", history.len())
        } else {
            String::from("Ready!")
        };
        App {
            history,
            listing: program.listing(),
            focused_pane: FocusedPane::Program,
            program_scroll: ProgramScrollState::default(),
            memory_scroll: MemoryScrollState::default(),
            input_scroll: 0,
            output_scroll: 0,
            should_quit: false,
            status_message,
            is_playing: false,
            last_play_time: Instant::now(),
            last_space_press: Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or(Instant::now()),
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            // Handle auto-play mode
            if self.is_playing && self.last_play_time.elapsed() >= Duration::from_millis(500) {
                if self.history.step_forward() {
                    self.status_message = "Playing...".to_string();
                    self.output_scroll = usize::MAX;
                } else {
                    self.is_playing = false;
                    self.status_message = "Playback complete".to_string();
                }
                self.last_play_time = Instant::now();
            }

            // Use poll with timeout to allow auto-play to work
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }
        }

        Ok(())
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(frame.area());

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(main_chunks[0]);

        // Left column: Program (top) | Output (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[0]);

        // Right column: Memory (top) | Input (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);

        let empty = State::default();
        let snapshot = self.history.current();
        let state = snapshot.map(|s| &s.state).unwrap_or(&empty);
        let status = snapshot.map(|s| s.status).unwrap_or(Status::Continue);

        panes::render_program_pane(
            frame,
            left_rows[0],
            ProgramRenderData {
                listing: &self.listing,
                current: snapshot.and_then(|s| s.statement),
                is_error: status == Status::Error,
            },
            self.focused_pane == FocusedPane::Program,
            &mut self.program_scroll,
        );

        panes::render_words_pane(
            frame,
            left_rows[1],
            WordsRenderData {
                title: "Output",
                words: state.output.iter(),
                placeholder: "(no output)",
                last_is_error: status == Status::Error,
            },
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_memory_pane(
            frame,
            right_rows[0],
            &state.memory,
            self.focused_pane == FocusedPane::Memory,
            &mut self.memory_scroll,
        );

        panes::render_words_pane(
            frame,
            right_rows[1],
            WordsRenderData {
                title: "Input",
                words: state.input.iter(),
                placeholder: "(input exhausted)",
                last_is_error: false,
            },
            self.focused_pane == FocusedPane::Input,
            &mut self.input_scroll,
        );

        panes::render_status_bar(
            frame,
            main_chunks[1],
            StatusRenderData {
                message: &self.status_message,
                current_step: self.history.position(),
                total_steps: self.history.len(),
                status,
                truncated: self.history.is_truncated(),
                is_playing: self.is_playing,
            },
        );
    }

    /// Handle keyboard events
    fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            // Number keys step forward N times directly
            KeyCode::Char(c @ '1'..='9') => {
                self.is_playing = false;
                let n = (c as u8 - b'0') as usize;
                let stepped = (0..n).take_while(|_| self.history.step_forward()).count();
                self.status_message = format!("Stepped forward {} step(s)", stepped);
                self.output_scroll = usize::MAX;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Left => {
                self.is_playing = false;
                self.step_backward();
            }
            KeyCode::Right => {
                self.is_playing = false;
                self.step_forward();
            }
            KeyCode::Up => match self.focused_pane {
                FocusedPane::Program => {
                    // Scrolling up makes the current line move down visually
                    if let Some(row) = self.program_scroll.target_line_row {
                        self.program_scroll.target_line_row = Some(row.saturating_add(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll.offset = self.memory_scroll.offset.saturating_sub(1);
                }
                FocusedPane::Input => {
                    self.input_scroll = self.input_scroll.saturating_sub(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_sub(1);
                }
            },
            KeyCode::Down => match self.focused_pane {
                FocusedPane::Program => {
                    if let Some(row) = self.program_scroll.target_line_row {
                        self.program_scroll.target_line_row = Some(row.saturating_sub(1));
                    }
                }
                FocusedPane::Memory => {
                    self.memory_scroll.offset = self.memory_scroll.offset.saturating_add(1);
                }
                FocusedPane::Input => {
                    self.input_scroll = self.input_scroll.saturating_add(1);
                }
                FocusedPane::Output => {
                    self.output_scroll = self.output_scroll.saturating_add(1);
                }
            },
            KeyCode::Char(' ') => {
                // Toggle auto-play mode (with 200ms debounce to prevent key repeat spam)
                if self.last_space_press.elapsed() >= Duration::from_millis(200) {
                    self.last_space_press = Instant::now();
                    self.is_playing = !self.is_playing;
                    self.status_message = if self.is_playing {
                        "Playing...".to_string()
                    } else {
                        "Paused".to_string()
                    };
                }
            }
            KeyCode::Enter => {
                self.is_playing = false;
                self.history.jump_to_end();
                self.status_message = "Jumped to end".to_string();
                self.output_scroll = usize::MAX;
            }
            KeyCode::Backspace => {
                self.is_playing = false;
                self.history.rewind_to_start();
                self.status_message = "Jumped to start".to_string();
                self.output_scroll = usize::MAX;
            }
            _ => {}
        }
    }

    /// Step forward in execution
    fn step_forward(&mut self) {
        if self.history.step_forward() {
            self.status_message = "Stepped forward".to_string();
            self.output_scroll = usize::MAX;
        } else if self.history.is_truncated() {
            self.status_message = "Cannot step forward: history was truncated here".to_string();
        } else {
            self.status_message = "Cannot step forward: execution finished".to_string();
        }
    }

    /// Step backward in execution
    fn step_backward(&mut self) {
        if self.history.step_backward() {
            self.status_message = "Stepped backward".to_string();
            self.output_scroll = usize::MAX;
        } else {
            self.status_message = "Cannot step backward: at the beginning".to_string();
        }
    }
}
