use ratatui::style::{Color, Modifier, Style};

use crate::chat::Role;

#[derive(Debug, Clone)]
pub struct Theme {
    pub header_style: Style,
    pub border_style: Style,
    pub user_style: Style,
    pub ai_style: Style,
    pub error_style: Style,
    pub body_style: Style,
    pub ai_body_style: Style,
    pub footer_style: Style,
    pub button_style: Style,
    pub input_style: Style,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            header_style: Style::default()
                .bg(Color::Rgb(0xe4, 0xaf, 0xed))
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Rgb(0x33, 0x33, 0x33)),
            user_style: Style::default()
                .fg(Color::Rgb(0x00, 0x7b, 0xff))
                .add_modifier(Modifier::BOLD),
            ai_style: Style::default()
                .fg(Color::Rgb(0x28, 0xa7, 0x45))
                .add_modifier(Modifier::BOLD),
            error_style: Style::default()
                .fg(Color::Rgb(0xdc, 0x35, 0x45))
                .add_modifier(Modifier::BOLD),
            body_style: Style::default().fg(Color::Rgb(0xf0, 0xf0, 0xf0)),
            ai_body_style: Style::default()
                .fg(Color::Rgb(0xf0, 0xf0, 0xf0))
                .bg(Color::Rgb(0x2c, 0x2c, 0x2c)),
            footer_style: Style::default().fg(Color::DarkGray),
            button_style: Style::default()
                .fg(Color::White)
                .bg(Color::Rgb(0x00, 0x7b, 0xff)),
            input_style: Style::default().fg(Color::Rgb(0xf0, 0xf0, 0xf0)),
        }
    }

    pub fn light() -> Self {
        Self {
            header_style: Style::default()
                .bg(Color::Magenta)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            border_style: Style::default().fg(Color::Gray),
            user_style: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            ai_style: Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
            error_style: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            body_style: Style::default().fg(Color::Black),
            ai_body_style: Style::default().fg(Color::Black).bg(Color::Gray),
            footer_style: Style::default().fg(Color::DarkGray),
            button_style: Style::default().fg(Color::White).bg(Color::Blue),
            input_style: Style::default().fg(Color::Black),
        }
    }

    /// Unknown names fall back to the dark theme.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn label_style(&self, role: Role) -> Style {
        match role {
            Role::User => self.user_style,
            Role::Ai => self.ai_style,
            Role::Error => self.error_style,
        }
    }

    pub fn body_style(&self, role: Role) -> Style {
        match role {
            Role::Ai => self.ai_body_style,
            Role::User | Role::Error => self.body_style,
        }
    }
}
