use crate::action::USAGE;
use crate::ui::{TextLine, Tone};

pub fn render(status_message: Option<&str>, notice: Option<&str>) -> Vec<TextLine> {
    let mut lines = vec![TextLine::plain(USAGE)];

    if let Some(msg) = status_message {
        let tone = if msg.contains("successfully") {
            Tone::Ok
        } else {
            Tone::Warning
        };
        lines.push(TextLine::new(msg, tone));
    }
    if let Some(notice) = notice {
        lines.push(TextLine::new(notice, Tone::Warning));
    }
    lines
}
