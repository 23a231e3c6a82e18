use std::fs;

use cpuwatch::alert::{AlertLogger, AlertPolicy, FileSink, LogFormat};
use cpuwatch::model::{ProcessSample, ProcessState, SystemLoad};
use cpuwatch::ranking::rank;
use cpuwatch::system::kill::KillResult;

fn sample(pid: u32, name: Option<&str>, cpu: f32) -> ProcessSample {
    ProcessSample {
        pid,
        name: name.map(str::to_string),
        cpu_percent: cpu,
        memory_percent: 1.0,
        owner: None,
        state: ProcessState::Running,
    }
}

#[test]
fn file_sink_appends_one_line_per_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cpu_monitor.log");
    fs::write(&path, "previous run\n").unwrap();

    let logger = AlertLogger::new(
        Box::new(FileSink::new(&path)),
        LogFormat::Text,
        AlertPolicy::EveryCycle,
    );
    let ranked = rank(
        &[sample(99, Some("C"), 85.0), sample(100, None, 85.0), sample(101, Some("B"), 40.0)],
        SystemLoad::default(),
        15,
        70.0,
    );

    let first = logger.on_cycle(&ranked);
    let second = logger.on_cycle(&ranked);
    assert_eq!(first.logged, 2);
    assert_eq!(second.logged, 2);
    assert!(first.warning.is_none());

    let content = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[0], "previous run");
    assert!(lines[1].contains("HIGH_CPU_ALERT pid=99 name=\"C\" cpu=85.0"));
    assert!(lines[2].contains("HIGH_CPU_ALERT pid=100 name=\"Access Denied\" cpu=85.0"));
    assert!(lines.iter().all(|l| !l.contains("pid=101")));
    assert!(content.ends_with('\n'));
}

#[test]
fn json_termination_record_is_one_object_per_line() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("events.jsonl");
    let logger = AlertLogger::new(
        Box::new(FileSink::new(&path)),
        LogFormat::Json,
        AlertPolicy::EveryCycle,
    );

    let warning = logger.on_terminate(9999, "unknown", &KillResult::NotFound(9999));
    assert!(warning.is_none());

    let content = fs::read_to_string(&path).unwrap();
    let record: serde_json::Value = serde_json::from_str(content.trim_end()).unwrap();
    assert_eq!(record["event"], "PROCESS_TERMINATED");
    assert_eq!(record["pid"], 9999);
    assert_eq!(record["outcome"], "failure");
    assert_eq!(
        record["detail"],
        "Failed to terminate process 9999: process not found"
    );
}

#[test]
fn unwritable_log_warns_once_and_keeps_going() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened for appending.
    let logger = AlertLogger::new(
        Box::new(FileSink::new(dir.path())),
        LogFormat::Text,
        AlertPolicy::EveryCycle,
    );
    let ranked = rank(&[sample(7, Some("spin"), 99.0)], SystemLoad::default(), 15, 70.0);

    let first = logger.on_cycle(&ranked);
    assert_eq!(first.logged, 0);
    let warning = first.warning.expect("first failure is surfaced");
    assert!(warning.starts_with("Warning: cannot write to"));

    let second = logger.on_cycle(&ranked);
    assert_eq!(second.logged, 0);
    assert!(second.warning.is_none());
    assert!(logger.on_terminate(7, "spin", &KillResult::NotFound(7)).is_none());
}
