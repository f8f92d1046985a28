use anyhow::Result;
use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent,
    MouseEventKind,
};
use ratatui::layout::Position;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tui_textarea::Input;

use crate::chat::{ChatStatus, Settled, spawn_exchange};
use crate::tui::terminal::{self, TerminalGuard, Tui};
use crate::tui::view::TuiApp;

const WHEEL_ROWS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Continue,
    Quit,
}

impl TuiApp {
    pub fn run(&mut self) -> Result<()> {
        terminal::install_panic_hook();
        let mut term = terminal::init()?;
        let _guard = TerminalGuard;
        info!("tui started");
        let res = self.event_loop(&mut term);
        // Pending exchanges die with the view.
        self.cancel.cancel();
        info!("tui stopped");
        res
    }

    fn event_loop(&mut self, term: &mut Tui) -> Result<()> {
        let mut last_spinner_update = Instant::now();
        loop {
            if self.drain_inbox() > 0 {
                self.dirty = true;
            }

            if matches!(self.chat.status(), ChatStatus::AwaitingResponse { .. })
                && last_spinner_update.elapsed() >= Duration::from_millis(150)
            {
                self.spinner_state = self.spinner_state.wrapping_add(1);
                last_spinner_update = Instant::now();
                self.dirty = true;
            }

            if self.dirty {
                term.draw(|f| self.view(f))?;
                self.dirty = false;
            }

            if event::poll(Duration::from_millis(50))?
                && self.handle_event(event::read()?) == KeyOutcome::Quit
            {
                return Ok(());
            }
        }
    }

    pub(crate) fn handle_event(&mut self, ev: Event) -> KeyOutcome {
        match ev {
            Event::Key(k) if k.kind == KeyEventKind::Press => return self.handle_key(k),
            Event::Mouse(m) => self.handle_mouse(m),
            Event::Paste(text) => self.handle_paste(&text),
            Event::Resize(_, _) => self.dirty = true,
            _ => {}
        }
        KeyOutcome::Continue
    }

    /// Pasted text goes into the draft verbatim. Its newlines never submit.
    pub(crate) fn handle_paste(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        if self.textarea.insert_str(text) {
            self.sync_draft();
        }
        self.dirty = true;
    }

    /// Apply every settlement waiting in the inbox. Returns how many landed.
    pub(crate) fn drain_inbox(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(settled) = self.inbox_rx.try_recv() {
            if self.apply_settled(settled) {
                applied += 1;
            }
        }
        applied
    }

    pub(crate) fn apply_settled(&mut self, settled: Settled) -> bool {
        let Settled { id, outcome } = settled;
        if self.chat.settle(id, outcome).is_some() {
            self.scroll.note_new_turn();
            self.dirty = true;
            true
        } else {
            false
        }
    }

    /// Submit the current draft. The key binding, Ctrl+S and the Send button
    /// all end up here.
    pub(crate) fn submit(&mut self) -> bool {
        self.sync_draft();
        let Some(submission) = self.chat.submit() else {
            return false;
        };
        debug!(id = submission.id, "spawning exchange");
        spawn_exchange(
            self.backend.clone(),
            submission,
            self.inbox_tx.clone(),
            self.cancel.child_token(),
        );
        self.reset_input();
        self.scroll.scroll_to_bottom();
        self.spinner_state = 0;
        self.dirty = true;
        true
    }

    fn sync_draft(&mut self) {
        self.chat.set_draft(self.textarea.lines().join("\n"));
    }

    fn page_rows(&self) -> usize {
        (self.log_area.height as usize).saturating_sub(1).max(1)
    }

    pub(crate) fn handle_key(&mut self, k: KeyEvent) -> KeyOutcome {
        self.dirty = true;
        match k {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: m,
                ..
            } if m.contains(KeyModifiers::CONTROL) => return KeyOutcome::Quit,

            KeyEvent {
                code: KeyCode::Esc, ..
            } => return KeyOutcome::Quit,

            KeyEvent {
                code: KeyCode::Enter,
                modifiers: m,
                ..
            } if m.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
                self.textarea.insert_newline();
                self.sync_draft();
            }

            KeyEvent {
                code: KeyCode::Enter,
                ..
            } => {
                self.submit();
            }

            KeyEvent {
                code: KeyCode::Char('s'),
                modifiers: m,
                ..
            } if m.contains(KeyModifiers::CONTROL) => {
                self.submit();
            }

            KeyEvent {
                code: KeyCode::PageUp,
                ..
            } => self.scroll.scroll_up(self.page_rows()),

            KeyEvent {
                code: KeyCode::PageDown,
                ..
            } => self.scroll.scroll_down(self.page_rows()),

            KeyEvent {
                code: KeyCode::Home,
                modifiers: m,
                ..
            } if m.contains(KeyModifiers::CONTROL) => self.scroll.scroll_to_top(self.total_rows),

            KeyEvent {
                code: KeyCode::End,
                modifiers: m,
                ..
            } if m.contains(KeyModifiers::CONTROL) => self.scroll.scroll_to_bottom(),

            _ => {
                if self.textarea.input(Input::from(k)) {
                    self.sync_draft();
                }
            }
        }
        KeyOutcome::Continue
    }

    pub(crate) fn handle_mouse(&mut self, m: MouseEvent) {
        let pos = Position::new(m.column, m.row);
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) if self.send_button.contains(pos) => {
                self.submit();
            }
            MouseEventKind::ScrollUp => {
                self.scroll.scroll_up(WHEEL_ROWS);
                self.dirty = true;
            }
            MouseEventKind::ScrollDown => {
                self.scroll.scroll_down(WHEEL_ROWS);
                self.dirty = true;
            }
            _ => {}
        }
    }
}
