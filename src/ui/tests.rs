use std::sync::Arc;

use chrono::{Local, TimeZone};
use insta::assert_snapshot;
use tokio::sync::mpsc;

use crate::alert::{AlertLogger, AlertPolicy, LogFormat, MemorySink};
use crate::app::App;
use crate::model::{ProcessSample, ProcessState, SystemLoad};
use crate::monitor::CycleReport;
use crate::ranking::rank;
use crate::ui::{Tone, header, statusbar, table, to_text};

fn make_process(pid: u32, name: Option<&str>, cpu: f32, mem: f32, owner: Option<&str>) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.map(str::to_string),
        cpu_percent: cpu,
        memory_percent: mem,
        owner: owner.map(str::to_string),
        state: ProcessState::Running,
    }
}

fn make_report() -> CycleReport {
    let samples = vec![
        make_process(100, None, 85.0, 0.2, None),
        make_process(101, Some("B"), 40.0, 12.3, Some("bob")),
        make_process(99, Some("C"), 85.0, 1.5, Some("alice")),
    ];
    let load = SystemLoad {
        cpu_percent: 37.5,
        memory_percent: 61.2,
        cpu_count: 8,
        cpu_frequency_mhz: 0,
    };
    CycleReport {
        taken_at: Local
            .with_ymd_and_hms(2026, 3, 14, 9, 26, 53)
            .single()
            .unwrap(),
        ranked: rank(&samples, load, 15, 70.0),
        total_processes: 3,
        partial: 1,
        skipped: 0,
        alerts_logged: 2,
        warning: None,
    }
}

#[test]
fn snapshot_table() {
    let report = make_report();
    let output = to_text(&table::render(&report.ranked));

    assert_snapshot!(output, @r"
Name                          PID    CPU%  Memory% User         Status
----------------------------------------------------------------------
C                              99    85.0      1.5 alice        HIGH
Access Denied                 100    85.0      0.2 unknown      HIGH
B                             101    40.0     12.3 bob          NORMAL
");
}

#[test]
fn table_truncates_wide_cells() {
    let ranked = rank(
        &[make_process(
            7,
            Some("a-very-long-process-name-indeed"),
            350.0,
            3.0,
            Some("svc-account-long"),
        )],
        SystemLoad::default(),
        15,
        70.0,
    );
    let lines = table::render(&ranked);
    assert_eq!(
        lines[2].text,
        "a-very-long-process-nam\u{2026}        7   350.0      3.0 svc-account\u{2026} HIGH"
    );
    assert_eq!(lines[2].tone, Tone::High);
}

#[test]
fn empty_table_says_so() {
    let ranked = rank(&[], SystemLoad::default(), 15, 70.0);
    let lines = table::render(&ranked);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[2].text, "(no processes visible)");
}

#[test]
fn snapshot_header() {
    let report = make_report();
    let output = to_text(&header::render(Some(&report), 70.0));

    assert_snapshot!(output, @r"
CPU Monitor - 2026-03-14 09:26:53
System CPU Usage: 37.5% | Memory: 61.2% | Cores: 8
Threshold: 70.0% | Processes: 3 (1 partially readable)
");
}

#[test]
fn header_before_first_cycle() {
    let output = to_text(&header::render(None, 55.0));
    assert_eq!(output, "CPU Monitor\nThreshold: 55.0%");
}

#[test]
fn snapshot_statusbar() {
    let output = to_text(&statusbar::render(
        Some("Failed to terminate process 9999: process not found"),
        Some("Warning: cannot write to cpu_monitor.log: read-only file system"),
    ));

    assert_snapshot!(output, @r"
Commands: 'k <pid>' to kill process, 'q' to quit
Failed to terminate process 9999: process not found
Warning: cannot write to cpu_monitor.log: read-only file system
");
}

#[test]
fn statusbar_marks_success_green() {
    let lines = statusbar::render(Some("Process 42 terminated successfully (SIGTERM sent)"), None);
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[1].tone, Tone::Ok);
}

#[test]
fn draw_plain_frame_without_terminal_codes() {
    let (tx, _rx) = mpsc::unbounded_channel();
    let alerts = Arc::new(AlertLogger::new(
        Box::new(MemorySink::new()),
        LogFormat::Text,
        AlertPolicy::EveryCycle,
    ));
    let mut app = App::new(70.0, sysinfo::Signal::Term, alerts, tx);
    app.latest = Some(Arc::new(make_report()));

    let mut out = Vec::new();
    crate::ui::draw(&mut out, &app, false).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.starts_with("CPU Monitor - 2026-03-14 09:26:53\n"));
    assert!(text.contains("C                              99    85.0"));
    assert!(text.ends_with("'q' to quit\n\n> "));
    assert!(!text.contains('\u{1b}'));
}
