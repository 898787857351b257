//! Integration test: selector handling and probe placement.

use std::fs;
use std::path::PathBuf;

use memchurn::prelude::*;

const STATUS: &str = "Name:\tmemchurn\nVmRSS:\t    4096 kB\n";

fn status_file(tag: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "memchurn-session-{}-{tag}",
        std::process::id()
    ));
    fs::write(&path, STATUS).unwrap();
    path
}

fn session(tag: &str, mid_run: bool) -> (Session<Vec<u8>>, PathBuf) {
    let path = status_file(tag);
    let session = Session::new(Vec::new())
        .config(DriverConfig::with_budgets(20_000, 100_000))
        .probe(MemoryProbe::at(&path))
        .mid_run_probe(mid_run);
    (session, path)
}

#[test]
fn out_of_range_selector_only_probes() {
    let (mut s, path) = session("baseline", true);
    let report = s.execute("99".parse().unwrap()).unwrap();
    fs::remove_file(path).unwrap();

    assert_eq!(report, None);
    assert_eq!(String::from_utf8(s.into_inner()).unwrap(), STATUS);
}

#[test]
fn experiment_probes_once_at_the_end() {
    let (mut s, path) = session("final-only", false);
    let report = s
        .execute(Selector::Experiment(ExperimentId::new(0).unwrap()))
        .unwrap()
        .unwrap();
    fs::remove_file(path).unwrap();

    assert_eq!(report.phase_one.fill.populated, 200);
    assert!(report.total_allocations() > 200);
    assert_eq!(String::from_utf8(s.into_inner()).unwrap(), STATUS);
}

#[test]
fn mid_run_probe_prints_twice() {
    let (mut s, path) = session("mid-run", true);
    let report = s
        .execute(Selector::Experiment(ExperimentId::new(6).unwrap()))
        .unwrap()
        .unwrap();
    fs::remove_file(path).unwrap();

    assert!(report.phase_two.is_some());
    let out = String::from_utf8(s.into_inner()).unwrap();
    assert_eq!(out, format!("{STATUS}{STATUS}"));
}

#[test]
fn missing_status_file_prints_nothing() {
    let mut s = Session::new(Vec::new())
        .config(DriverConfig::with_budgets(20_000, 100_000))
        .probe(MemoryProbe::at("/nonexistent/memchurn/status"))
        .mid_run_probe(true);
    assert!(s.execute(Selector::Baseline).unwrap().is_none());
    assert!(s.into_inner().is_empty());
}

#[test]
fn driver_errors_surface() {
    let mut s = Session::new(Vec::new())
        .config(DriverConfig::with_budgets(20_000, 20_000))
        .probe(MemoryProbe::at("/nonexistent/memchurn/status"));
    let err = s
        .execute(Selector::Experiment(ExperimentId::new(1).unwrap()))
        .unwrap_err();
    assert!(matches!(err, SessionError::Driver(DriverError::Config(_))));
}

#[test]
fn selector_comes_from_first_non_blank_line() {
    let seven = Selector::Experiment(ExperimentId::new(7).unwrap());
    assert_eq!(read_selector("\n  \n7abc\n3\n".as_bytes()).unwrap(), seven);
    assert_eq!(read_selector(" 7 \n".as_bytes()).unwrap(), seven);
}

#[test]
fn unreadable_selector_falls_back_to_baseline() {
    assert_eq!(read_selector("".as_bytes()).unwrap(), Selector::Baseline);
    assert_eq!(read_selector("\n\n".as_bytes()).unwrap(), Selector::Baseline);
    assert_eq!(read_selector("abc\n7\n".as_bytes()).unwrap(), Selector::Baseline);
}
