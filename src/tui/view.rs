use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};
use std::sync::Arc;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_util::sync::CancellationToken;
use tui_textarea::TextArea;

use crate::chat::{ChatBackend, ChatStatus, ChatView, Role, Settled};
use crate::tui::state::{RowKind, ScrollState, build_render_plan, visible_rows};
use crate::tui::theme::Theme;

const SPINNER: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const SEND_BUTTON_WIDTH: u16 = 7;
const PLACEHOLDER: &str = "Type your message...";

pub struct TuiApp {
    pub(crate) title: String,
    pub(crate) chat: ChatView,
    pub(crate) textarea: TextArea<'static>,
    pub(crate) scroll: ScrollState,
    pub(crate) theme: Theme,
    pub(crate) backend: Arc<dyn ChatBackend>,
    pub(crate) inbox_tx: UnboundedSender<Settled>,
    pub(crate) inbox_rx: UnboundedReceiver<Settled>,
    pub(crate) cancel: CancellationToken,
    // Filled in by the last draw; used for mouse hit testing and paging.
    pub(crate) send_button: Rect,
    pub(crate) log_area: Rect,
    pub(crate) total_rows: usize,
    pub(crate) spinner_state: usize,
    pub(crate) dirty: bool,
}

impl TuiApp {
    pub fn new(title: impl Into<String>, theme: &str, backend: Arc<dyn ChatBackend>) -> Self {
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();
        let theme = Theme::from_name(theme);
        Self {
            title: title.into(),
            chat: ChatView::new(),
            textarea: new_textarea(&theme),
            scroll: ScrollState::default(),
            theme,
            backend,
            inbox_tx,
            inbox_rx,
            cancel: CancellationToken::new(),
            send_button: Rect::default(),
            log_area: Rect::default(),
            total_rows: 0,
            spinner_state: 0,
            dirty: true,
        }
    }

    #[cfg(test)]
    pub fn chat(&self) -> &ChatView {
        &self.chat
    }

    pub(crate) fn reset_input(&mut self) {
        self.textarea = new_textarea(&self.theme);
    }

    pub fn view(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Min(3),    // Message log
                Constraint::Length(5), // Input area
                Constraint::Length(1), // Footer
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_log(f, chunks[1]);
        self.render_input(f, chunks[2]);
        self.render_footer(f, chunks[3]);
    }

    fn render_header(&self, f: &mut Frame, area: Rect) {
        let header = Paragraph::new(self.title.as_str())
            .style(self.theme.header_style)
            .alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn render_log(&mut self, f: &mut Frame, area: Rect) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style);
        if self.scroll.new_messages > 0 {
            block = block.title_bottom(
                Line::from(format!(" ↓ {} new ", self.scroll.new_messages)).right_aligned(),
            );
        }
        let inner = block.inner(area);
        self.log_area = inner;

        let plan = build_render_plan(self.chat.history());
        let rows = plan.rows(inner.width);
        self.total_rows = rows.len();
        self.scroll.clamp(rows.len(), inner.height as usize);

        let lines: Vec<Line> = visible_rows(&rows, inner.height as usize, self.scroll.offset)
            .iter()
            .map(|row| {
                let style = match row.kind {
                    RowKind::Label => self.theme.label_style(row.role),
                    RowKind::Body => self.theme.body_style(row.role),
                    RowKind::Spacer => Style::default(),
                };
                let line = Line::from(Span::styled(row.text.clone(), style));
                match row.role {
                    Role::User => line.alignment(Alignment::Right),
                    Role::Ai | Role::Error => line.alignment(Alignment::Left),
                }
            })
            .collect();

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn render_input(&mut self, f: &mut Frame, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(10), Constraint::Length(SEND_BUTTON_WIDTH)])
            .split(area);

        f.render_widget(&self.textarea, cols[0]);

        self.send_button = cols[1];
        let button = Paragraph::new(vec![Line::from(""), Line::from("➤")])
            .alignment(Alignment::Center)
            .style(self.theme.button_style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(self.theme.border_style),
            );
        f.render_widget(button, cols[1]);
    }

    fn render_footer(&self, f: &mut Frame, area: Rect) {
        let status = match self.chat.status() {
            ChatStatus::Idle => "Idle".to_string(),
            ChatStatus::AwaitingResponse { pending } => {
                let spin = SPINNER[self.spinner_state % SPINNER.len()];
                if pending > 1 {
                    format!("{spin} Awaiting response ({pending})")
                } else {
                    format!("{spin} Awaiting response")
                }
            }
        };
        let text = format!(
            "{status} | {} | Enter send · Alt+Enter newline · PgUp/PgDn scroll · Ctrl+C quit",
            self.backend.endpoint()
        );
        f.render_widget(Paragraph::new(text).style(self.theme.footer_style), area);
    }
}

fn new_textarea(theme: &Theme) -> TextArea<'static> {
    let mut textarea = TextArea::default();
    textarea.set_block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border_style)
            .title("Message"),
    );
    textarea.set_placeholder_text(PLACEHOLDER);
    textarea.set_style(theme.input_style);
    textarea.set_cursor_line_style(Style::default());
    textarea
}
