// src/output/palette.rs

use anstyle::{AnsiColor, Color, Style};

const fn bold(color: AnsiColor) -> Style {
    Style::new().fg_color(Some(Color::Ansi(color))).bold()
}

/// Colours handed out to named commands, in order of their position in a group.
pub const PALETTE: [Style; 5] = [
    bold(AnsiColor::Cyan),
    bold(AnsiColor::Green),
    bold(AnsiColor::Magenta),
    bold(AnsiColor::Yellow),
    bold(AnsiColor::Blue),
];

/// Palette entry for the command at `index`.
pub fn color_for(index: usize) -> Style {
    PALETTE[index % PALETTE.len()]
}

/// Rendered prefix for one command's output.
///
/// An anonymous (empty-named) command has no label at all: its output is
/// written through untouched so partial lines stream correctly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    rendered: Option<String>,
}

impl Label {
    pub fn new(name: &str, color: Option<Style>) -> Self {
        let rendered = if name.is_empty() {
            None
        } else {
            match color {
                Some(style) => Some(format!("{style}{name}{style:#}")),
                None => Some(name.to_string()),
            }
        };
        Self { rendered }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.rendered.as_deref()
    }
}
