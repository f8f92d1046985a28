use unicode_width::UnicodeWidthChar;

use crate::chat::format::format_content;
use crate::chat::{History, Role};

/// Scroll position of the message log, counted in rows from the bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScrollState {
    pub offset: usize,
    pub auto_scroll: bool,
    pub new_messages: usize,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            offset: 0,
            auto_scroll: true,
            new_messages: 0,
        }
    }
}

impl ScrollState {
    pub fn scroll_up(&mut self, rows: usize) {
        self.offset = self.offset.saturating_add(rows);
        self.auto_scroll = false;
    }

    pub fn scroll_down(&mut self, rows: usize) {
        self.offset = self.offset.saturating_sub(rows);
        if self.offset == 0 {
            self.scroll_to_bottom();
        }
    }

    pub fn scroll_to_top(&mut self, total_rows: usize) {
        self.offset = total_rows;
        self.auto_scroll = false;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.offset = 0;
        self.auto_scroll = true;
        self.new_messages = 0;
    }

    /// A turn was appended below the visible window.
    pub fn note_new_turn(&mut self) {
        if !self.auto_scroll {
            self.new_messages += 1;
        }
    }

    /// Keep the offset within the scrollable range for the current layout.
    pub fn clamp(&mut self, total_rows: usize, height: usize) {
        self.offset = self.offset.min(total_rows.saturating_sub(height));
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedTurn {
    pub role: Role,
    pub label: &'static str,
    pub blocks: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowKind {
    Label,
    Body,
    Spacer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub role: Role,
    pub kind: RowKind,
    pub text: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderPlan {
    pub turns: Vec<RenderedTurn>,
}

pub fn build_render_plan(history: &History) -> RenderPlan {
    let turns = history
        .iter()
        .map(|t| RenderedTurn {
            role: t.role,
            label: t.role.label(),
            blocks: format_content(&t.content),
        })
        .collect();
    RenderPlan { turns }
}

impl RenderPlan {
    /// Flatten turns into display rows wrapped to `width` columns.
    pub fn rows(&self, width: u16) -> Vec<Row> {
        let width = width as usize;
        let mut rows = Vec::new();
        for turn in &self.turns {
            rows.push(Row {
                role: turn.role,
                kind: RowKind::Label,
                text: truncate_display(&format!("{}:", turn.label), width),
            });
            for block in &turn.blocks {
                for piece in wrap_display(block, width) {
                    rows.push(Row {
                        role: turn.role,
                        kind: RowKind::Body,
                        text: piece,
                    });
                }
            }
            rows.push(Row {
                role: turn.role,
                kind: RowKind::Spacer,
                text: String::new(),
            });
        }
        rows
    }
}

/// Rows visible in a window of `height` rows, `offset` rows above the bottom.
pub fn visible_rows(rows: &[Row], height: usize, offset: usize) -> &[Row] {
    let end = rows.len().saturating_sub(offset);
    let start = end.saturating_sub(height);
    &rows[start..end]
}

pub fn truncate_display(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let mut width = 0usize;
    let mut out = String::new();
    for ch in s.chars() {
        let ch_w = ch.width().unwrap_or(0);
        if ch_w == 0 {
            out.push(ch);
            continue;
        }
        if width + ch_w > max {
            break;
        }
        out.push(ch);
        width += ch_w;
    }
    out
}

/// Hard-wrap `s` into pieces of at most `max` display columns.
pub fn wrap_display(s: &str, max: usize) -> Vec<String> {
    if max == 0 {
        return vec![String::new()];
    }
    let mut out = Vec::new();
    let mut line = String::new();
    let mut width = 0usize;
    for ch in s.chars() {
        let ch_w = ch.width().unwrap_or(0);
        if width + ch_w > max && !line.is_empty() {
            out.push(std::mem::take(&mut line));
            width = 0;
        }
        line.push(ch);
        width += ch_w;
    }
    out.push(line);
    out
}
