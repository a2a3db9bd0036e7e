//! Color themes.

use crossterm::style::{Color, Stylize};

/// Role of a bar segment, mapped to a color by the painter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarStyle {
    /// Usage comfortably below the limit
    Normal,
    /// Usage approaching the limit
    Warning,
    /// Usage at or past the limit
    Alert,
    /// Units beyond the limit, drawn outside the brackets
    Overflow,
    /// Unused part of the bar
    Empty,
}

/// Turns bar segments into display text.
pub trait Painter {
    fn paint(&self, text: &str, style: BarStyle) -> String;
}

/// Painter for pipes, files and tests: no escape codes.
#[derive(Debug, Clone, Copy, Default)]
pub struct Plain;

impl Painter for Plain {
    fn paint(&self, text: &str, _style: BarStyle) -> String {
        text.to_string()
    }
}

/// ANSI terminal painter.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub normal: Color,
    pub warning: Color,
    pub alert: Color,
    pub empty: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            normal: Color::Green,
            warning: Color::Yellow,
            alert: Color::Red,
            empty: Color::DarkGrey,
        }
    }

    pub fn light() -> Self {
        Self {
            normal: Color::DarkGreen,
            warning: Color::DarkYellow,
            alert: Color::DarkRed,
            empty: Color::Grey,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Painter for Theme {
    fn paint(&self, text: &str, style: BarStyle) -> String {
        if text.is_empty() {
            return String::new();
        }
        let styled = match style {
            BarStyle::Normal => text.with(self.normal).bold(),
            BarStyle::Warning => text.with(self.warning).bold(),
            BarStyle::Alert => text.with(self.alert),
            BarStyle::Overflow => text.with(self.alert).bold(),
            BarStyle::Empty => text.with(self.empty),
        };
        styled.to_string()
    }
}
