use crate::format::format_percent;
use crate::monitor::CycleReport;
use crate::ui::{TextLine, Tone};

pub fn render(report: Option<&CycleReport>, threshold: f32) -> Vec<TextLine> {
    let Some(report) = report else {
        return vec![
            TextLine::new("CPU Monitor", Tone::Title),
            TextLine::plain(format!("Threshold: {}%", format_percent(threshold))),
        ];
    };

    let load = &report.ranked.system;
    let mut system = format!(
        "System CPU Usage: {}% | Memory: {}% | Cores: {}",
        format_percent(load.cpu_percent),
        format_percent(load.memory_percent),
        load.cpu_count
    );
    if load.cpu_frequency_mhz > 0 {
        system.push_str(&format!(" @ {} MHz", load.cpu_frequency_mhz));
    }

    let mut processes = format!("Processes: {}", report.total_processes);
    if report.partial > 0 {
        processes.push_str(&format!(" ({} partially readable)", report.partial));
    }

    vec![
        TextLine::new(
            format!(
                "CPU Monitor - {}",
                report.taken_at.format("%Y-%m-%d %H:%M:%S")
            ),
            Tone::Title,
        ),
        TextLine::plain(system),
        TextLine::plain(format!(
            "Threshold: {}% | {}",
            format_percent(report.ranked.threshold),
            processes
        )),
    ]
}
