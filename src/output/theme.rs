//! Colors used by the printer

use crate::report::{Link, StatusClass};
use colored::Color;

const BOLD: &str = "1";
const RESET: &str = "\x1b[0m";

/// Role of a printed line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ink {
    /// Reachable link on the same host as its page
    Shaded,
    Success,
    Warning,
    /// Failed links, site errors and problems
    Danger,
}

impl Ink {
    /// Ink for a link line
    pub fn for_link(link: &Link) -> Self {
        match link.class() {
            StatusClass::Success if link.internal => Ink::Shaded,
            StatusClass::Success => Ink::Success,
            StatusClass::Warning => Ink::Warning,
            StatusClass::Danger => Ink::Danger,
        }
    }
}

/// Foreground color plus weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub color: Option<Color>,
    pub bold: bool,
}

impl Style {
    pub const fn fg(color: Color) -> Self {
        Self {
            color: Some(color),
            bold: false,
        }
    }

    pub const fn bold(self) -> Self {
        Self { bold: true, ..self }
    }
}

/// One style per [`Ink`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    pub shaded: Style,
    pub success: Style,
    pub warning: Style,
    pub danger: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            shaded: Style::fg(Color::BrightBlack),
            success: Style::fg(Color::White),
            warning: Style::fg(Color::Yellow),
            danger: Style::fg(Color::Red).bold(),
        }
    }
}

impl Theme {
    /// Theme without any styling
    pub fn plain() -> Self {
        Self {
            shaded: Style::default(),
            success: Style::default(),
            warning: Style::default(),
            danger: Style::default(),
        }
    }

    pub fn style(&self, ink: Ink) -> Style {
        match ink {
            Ink::Shaded => self.shaded,
            Ink::Success => self.success,
            Ink::Warning => self.warning,
            Ink::Danger => self.danger,
        }
    }

    /// Wraps `text` in the escape sequences of the style for `ink`
    ///
    /// Painting is unconditional: terminal detection and `NO_COLOR` are left
    /// to whoever decides to paint, so output written to a buffer is colored
    /// the same way as output written to a terminal.
    pub fn paint(&self, ink: Ink, text: &str) -> String {
        let style = self.style(ink);
        let mut codes: Vec<String> = Vec::with_capacity(2);
        if style.bold {
            codes.push(BOLD.to_string());
        }
        if let Some(color) = style.color {
            codes.push(color.to_fg_str().to_string());
        }
        if codes.is_empty() {
            return text.to_string();
        }
        format!("\x1b[{}m{}{}", codes.join(";"), text, RESET)
    }
}
