//! Main Application
//!
//! The App is a thin surface over a [`Harness`]:
//! 1. Converts key events into harness intents or form edits
//! 2. Polls the harness for completed background calls every frame
//! 3. Renders the four panels from the harness views

use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Layout};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::{Frame, Terminal};
use tracing::{debug, info};

use harness_core::{BodhiClient, Harness};

use crate::focus::{Field, Focus, Section};
use crate::sections;
use crate::theme::{DIM_GRAY, ERROR_RED};
use crate::widgets::TextBlockState;

/// Frame tick; results are applied and the screen redrawn at this rate
const FRAME_DURATION: Duration = Duration::from_millis(50);

/// How often client and server state are re-probed
const STATE_REFRESH_INTERVAL: Duration = Duration::from_secs(15);

/// Height of the status/auth row
const TOP_ROW_HEIGHT: u16 = 6;

/// Lines moved per PageUp/PageDown
const PAGE_SCROLL: i32 = 5;

const KEY_HINTS: &str =
    " Tab section | ↑↓ field | Enter run | Space toggle | ^L clear | ^R models | ^S setup | Esc quit";

/// Main application state
pub struct App<C: BodhiClient + ?Sized + 'static> {
    /// Is the app still running?
    running: bool,
    /// Orchestrator owning all section state
    harness: Harness<C>,
    /// Keyboard focus
    focus: Focus,
    /// Tester response scroll
    tester_scroll: TextBlockState,
    /// Chat response scroll
    chat_scroll: TextBlockState,
}

impl<C: BodhiClient + ?Sized + 'static> App<C> {
    /// Create an app around a harness
    pub fn new(harness: Harness<C>) -> Self {
        Self {
            running: true,
            harness,
            focus: Focus::default(),
            tester_scroll: TextBlockState::default(),
            chat_scroll: TextBlockState::following(),
        }
    }

    /// The harness
    pub fn harness(&self) -> &Harness<C> {
        &self.harness
    }

    /// The harness, mutably
    pub fn harness_mut(&mut self) -> &mut Harness<C> {
        &mut self.harness
    }

    /// Current focus
    pub fn focus(&self) -> Focus {
        self.focus
    }

    /// Whether the event loop should keep going
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Main event loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> anyhow::Result<()> {
        let mut event_stream = EventStream::new();
        let mut state_refresh = tokio::time::interval(STATE_REFRESH_INTERVAL);

        terminal.draw(|frame| self.draw(frame))?;

        while self.running {
            tokio::select! {
                biased;

                maybe_event = event_stream.next() => {
                    match maybe_event {
                        // Only handle Press events (not Release or Repeat)
                        Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                            self.handle_key(key);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(e.into()),
                        None => self.running = false,
                    }
                }

                _ = state_refresh.tick() => {
                    self.harness.refresh_state();
                }

                _ = tokio::time::sleep(FRAME_DURATION) => {}
            }

            // One draw per applied chat chunk
            loop {
                let applied = self.harness.poll();
                terminal.draw(|frame| self.draw(frame))?;
                if !applied || !self.harness.has_pending() {
                    break;
                }
            }
        }

        info!("Event loop finished");
        Ok(())
    }

    // ============================================
    // Input
    // ============================================

    /// Handle one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => self.running = false,
            KeyCode::Char('c') if ctrl => self.running = false,

            KeyCode::Char('l') if ctrl => {
                self.harness.clear_response();
                self.tester_scroll.reset();
            }
            KeyCode::Char('r') if ctrl => {
                self.harness.refresh_models();
            }
            KeyCode::Char('s') if ctrl => self.harness.show_setup(),

            KeyCode::Tab => self.focus.cycle_section(true),
            KeyCode::BackTab => self.focus.cycle_section(false),
            KeyCode::Up => self.focus.move_field(false),
            KeyCode::Down => self.focus.move_field(true),
            KeyCode::Left => self.cycle_choice(false),
            KeyCode::Right => self.cycle_choice(true),
            KeyCode::PageUp => self.scroll_response(-PAGE_SCROLL),
            KeyCode::PageDown => self.scroll_response(PAGE_SCROLL),

            KeyCode::Enter => self.activate(),
            KeyCode::Char(' ') if !self.focus.field().is_text() => self.toggle(),
            KeyCode::Char(c) if !ctrl => self.edit(|text| text.push(c)),
            KeyCode::Backspace => self.edit(|text| {
                text.pop();
            }),

            _ => {}
        }
    }

    /// Run the focused section's primary action
    fn activate(&mut self) {
        debug!(section = ?self.focus.section(), field = ?self.focus.field(), "Activate");
        match self.focus.section() {
            Section::Status => self.harness.show_setup(),
            Section::Auth => {
                self.harness.toggle_auth();
            }
            Section::Tester => {
                if self.harness.send_request() {
                    self.tester_scroll.reset();
                }
            }
            Section::Chat if self.focus.field() == Field::RefreshModels => {
                self.harness.refresh_models();
            }
            Section::Chat => {
                if self.harness.send_chat() {
                    self.chat_scroll = TextBlockState::following();
                }
            }
        }
    }

    fn toggle(&mut self) {
        match self.focus.field() {
            Field::TesterAuthenticated => {
                let draft = self.harness.tester_mut().draft_mut();
                draft.authenticated = !draft.authenticated;
            }
            Field::ChatAuthenticated => {
                let chat = self.harness.chat_mut();
                let authenticated = chat.authenticated();
                chat.set_authenticated(!authenticated);
            }
            _ => {}
        }
    }

    fn cycle_choice(&mut self, forward: bool) {
        match self.focus.field() {
            Field::Method => self.harness.tester_mut().draft_mut().cycle_method(forward),
            Field::Model => {
                self.harness.chat_mut().cycle_suggestion(forward);
            }
            _ => {}
        }
    }

    fn edit(&mut self, edit: impl FnOnce(&mut String)) {
        match self.focus.field() {
            Field::Path => edit(&mut self.harness.tester_mut().draft_mut().path),
            Field::Body => edit(&mut self.harness.tester_mut().draft_mut().body_text),
            Field::Model => {
                self.harness.chat_mut().edit_model_input(edit);
            }
            Field::Prompt => {
                self.harness.chat_mut().edit_prompt(edit);
            }
            _ => {}
        }
    }

    fn scroll_response(&mut self, delta: i32) {
        match self.focus.section() {
            Section::Tester => self.tester_scroll.scroll(delta),
            Section::Chat => self.chat_scroll.scroll(delta),
            Section::Status | Section::Auth => {}
        }
    }

    // ============================================
    // Rendering
    // ============================================

    /// Draw every panel into the frame
    pub fn draw(&mut self, frame: &mut Frame) {
        let [top, middle, footer] = Layout::vertical([
            Constraint::Length(TOP_ROW_HEIGHT),
            Constraint::Min(8),
            Constraint::Length(1),
        ])
        .areas(frame.area());
        let [status_area, auth_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(top);
        let [tester_area, chat_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(middle);

        sections::status::render(
            frame,
            status_area,
            &self.harness.status_view(),
            self.focus.field_in(Section::Status),
        );
        sections::auth::render(
            frame,
            auth_area,
            &self.harness.auth_view(),
            self.focus.field_in(Section::Auth),
        );
        sections::tester::render(
            frame,
            tester_area,
            self.harness.tester(),
            self.focus.field_in(Section::Tester),
            &mut self.tester_scroll,
        );
        sections::chat::render(
            frame,
            chat_area,
            self.harness.chat(),
            self.focus.field_in(Section::Chat),
            &mut self.chat_scroll,
        );

        let footer_line = match self.harness.notice() {
            Some(notice) => Line::from(Span::styled(
                format!(" {notice}"),
                Style::default().fg(ERROR_RED),
            )),
            None => Line::from(Span::styled(KEY_HINTS, Style::default().fg(DIM_GRAY))),
        };
        frame.render_widget(Paragraph::new(footer_line), footer);
    }
}
