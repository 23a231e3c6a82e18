use crate::format::{fit_unicode, format_percent};
use crate::ranking::{CpuStatus, RankedEntry, RankedSnapshot};
use crate::ui::{TextLine, Tone};

const NAME_WIDTH: usize = 24;
const PID_WIDTH: usize = 8;
const CPU_WIDTH: usize = 7;
const MEM_WIDTH: usize = 8;
const USER_WIDTH: usize = 12;

pub fn header_row() -> String {
    format!(
        "{} {:>PID_WIDTH$} {:>CPU_WIDTH$} {:>MEM_WIDTH$} {} Status",
        fit_unicode("Name", NAME_WIDTH),
        "PID",
        "CPU%",
        "Memory%",
        fit_unicode("User", USER_WIDTH),
    )
}

pub fn row(entry: &RankedEntry) -> String {
    let sample = &entry.sample;
    format!(
        "{} {:>PID_WIDTH$} {:>CPU_WIDTH$} {:>MEM_WIDTH$} {} {}",
        fit_unicode(sample.display_name(), NAME_WIDTH),
        sample.pid,
        format_percent(sample.cpu_percent),
        format_percent(sample.memory_percent),
        fit_unicode(sample.display_owner(), USER_WIDTH),
        entry.status.label(),
    )
}

pub fn render(snapshot: &RankedSnapshot) -> Vec<TextLine> {
    let header = header_row();
    let rule = "-".repeat(header.len());
    let mut lines = vec![TextLine::plain(header), TextLine::plain(rule)];

    if snapshot.entries.is_empty() {
        lines.push(TextLine::plain("(no processes visible)"));
        return lines;
    }

    lines.extend(snapshot.entries.iter().map(|entry| {
        let tone = match entry.status {
            CpuStatus::High => Tone::High,
            CpuStatus::Normal => Tone::Plain,
        };
        TextLine::new(row(entry), tone)
    }));
    lines
}
