pub mod header;
pub mod statusbar;
pub mod table;

#[cfg(test)]
mod tests;

use std::io::{self, Write};

use crossterm::cursor::MoveTo;
use crossterm::queue;
use crossterm::style::{Attribute, Color, Print, ResetColor, SetAttribute, SetForegroundColor};
use crossterm::terminal::{Clear, ClearType};

use crate::app::App;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Plain,
    Title,
    High,
    Ok,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLine {
    pub text: String,
    pub tone: Tone,
}

impl TextLine {
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        TextLine {
            text: text.into(),
            tone,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, Tone::Plain)
    }
}

pub fn to_text(lines: &[TextLine]) -> String {
    lines
        .iter()
        .map(|l| l.text.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Header, table and status sections of one frame, in display order.
pub fn render(app: &App) -> Vec<Vec<TextLine>> {
    let report = app.latest.as_deref();
    let table = match report {
        Some(report) => table::render(&report.ranked),
        None => vec![TextLine::plain("Collecting process information...")],
    };
    vec![
        header::render(report, app.threshold),
        table,
        statusbar::render(app.status_message.as_deref(), app.notice.as_deref()),
    ]
}

/// Writes a full frame. `interactive` clears the screen first and colours
/// HIGH rows; off a terminal the frames are simply appended.
pub fn draw<W: Write>(out: &mut W, app: &App, interactive: bool) -> io::Result<()> {
    if interactive {
        queue!(out, Clear(ClearType::All), MoveTo(0, 0))?;
    }
    for section in render(app) {
        for line in section {
            write_line(out, &line, interactive)?;
        }
        queue!(out, Print("\n"))?;
    }
    queue!(out, Print("> "))?;
    out.flush()
}

fn write_line<W: Write>(out: &mut W, line: &TextLine, colored: bool) -> io::Result<()> {
    let color = match line.tone {
        Tone::Plain => None,
        Tone::Title => Some(Color::Cyan),
        Tone::High => Some(Color::Red),
        Tone::Ok => Some(Color::Green),
        Tone::Warning => Some(Color::Yellow),
    };
    match color {
        Some(color) if colored => {
            queue!(out, SetForegroundColor(color))?;
            if line.tone == Tone::High || line.tone == Tone::Title {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            queue!(
                out,
                Print(&line.text),
                SetAttribute(Attribute::Reset),
                ResetColor,
                Print("\n")
            )
        }
        _ => queue!(out, Print(&line.text), Print("\n")),
    }
}
