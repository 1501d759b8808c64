//! Integration tests for the SDB monitor.
//!
//! Drives the demo counter program through monitor commands: printing,
//! memory dumps, watchpoint management, and stepping that stops as soon
//! as a watched expression changes.

use sdb_eval::EvalError;
use sdb_monitor::sim::MEMORY_BASE;
use sdb_monitor::{
    CommandError, Cpu, CpuState, Monitor, MonitorError, SimMachine, StopReason, WatchHit,
};
use sdb_types::Limits;
use sdb_watchpoint::WatchpointError;

// ─────────────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────────────

/// Number of ops in the demo program: one `li`, then five `addi`/`sw` pairs.
const DEMO_LEN: u64 = 11;

fn demo() -> Monitor<SimMachine> {
    Monitor::new(SimMachine::demo(MEMORY_BASE, 0x1000), Limits::default())
}

/// Run a command and return its output, panicking on error.
fn run(monitor: &mut Monitor<SimMachine>, line: &str) -> String {
    monitor
        .execute_line(line)
        .unwrap_or_else(|e| panic!("`{line}` failed: {e}"))
        .output
}

// ─────────────────────────────────────────────────────────────────────
// Plain commands
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_print_shows_decimal_and_hex() {
    let mut monitor = demo();
    assert_eq!(run(&mut monitor, "p 1+2*3"), "7 (0x7)");
    assert_eq!(run(&mut monitor, "p -1"), "4294967295 (0xffffffff)");
}

#[test]
fn test_print_reads_registers_after_stepping() {
    let mut monitor = demo();
    run(&mut monitor, "si");
    assert_eq!(run(&mut monitor, "p $sp"), "2147483904 (0x80000100)");
    assert_eq!(run(&mut monitor, "p $pc"), "2147483652 (0x80000004)");
}

#[test]
fn test_print_zero_register_spellings() {
    let mut monitor = demo();
    for line in ["p $0", "p $$0", "p $zero", "p $x0"] {
        assert_eq!(run(&mut monitor, line), "0 (0x0)", "{line}");
    }
}

#[test]
fn test_print_error_is_returned() {
    let mut monitor = demo();
    let err = monitor.execute_line("p 5/0").unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Eval(EvalError::DivisionByZero { .. })
    ));
}

#[test]
fn test_blank_line_does_nothing() {
    let mut monitor = demo();
    let outcome = monitor.execute_line("   ").unwrap();
    assert!(outcome.output.is_empty());
    assert!(!outcome.quit);
    assert_eq!(monitor.cpu().pc(), MEMORY_BASE);
}

#[test]
fn test_quit() {
    let mut monitor = demo();
    assert!(monitor.execute_line("q").unwrap().quit);
}

#[test]
fn test_help_lists_every_command() {
    let mut monitor = demo();
    let all = run(&mut monitor, "help");
    for name in ["help", "c", "q", "si", "info", "x", "p", "w", "d"] {
        assert!(
            all.lines().any(|l| l.starts_with(&format!("{name} - "))),
            "missing {name}"
        );
    }
    assert!(run(&mut monitor, "help si").starts_with("si - "));
    assert!(matches!(
        monitor.execute_line("help nope"),
        Err(MonitorError::Command(CommandError::Unknown(_)))
    ));
}

#[test]
fn test_unknown_command() {
    let mut monitor = demo();
    assert_eq!(
        monitor.execute_line("jump 4").unwrap_err(),
        MonitorError::Command(CommandError::Unknown("jump".into()))
    );
}

#[test]
fn test_info_registers_lists_pc_last() {
    let mut monitor = demo();
    let out = run(&mut monitor, "info r");
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 33);
    assert!(lines[0].starts_with("$0"));
    assert!(lines[32].starts_with("pc"));
    assert!(lines[32].contains("0x80000000"));
}

#[test]
fn test_examine_dumps_words() {
    let mut monitor = demo();
    run(&mut monitor, "c");
    let out = run(&mut monitor, "x 2 $sp");
    assert_eq!(
        out,
        "0x80000100: 0x00000005\t5\n0x80000104: 0x00000000\t0"
    );
}

#[test]
fn test_examine_out_of_range_is_error() {
    let mut monitor = demo();
    let err = monitor.execute_line("x 1 0x10").unwrap_err();
    assert!(matches!(err, MonitorError::Eval(EvalError::BadAddress(_))));
}

// ─────────────────────────────────────────────────────────────────────
// Watchpoint commands
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_watch_list_and_delete() {
    let mut monitor = demo();
    assert_eq!(run(&mut monitor, "info w"), "No watchpoints");

    let out = run(&mut monitor, "w $a0 + 1");
    assert_eq!(out, "watchpoint 0: $a0 + 1 = 1");
    run(&mut monitor, "w 2*3");

    let listing = run(&mut monitor, "info w");
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines[0], "NO\tEXPR\t\tlast\t\tcurrent\t\tis_changed");
    assert_eq!(lines.len(), 3);
    // Newest first.
    assert!(lines[1].starts_with("1\t2*3"));
    assert!(lines[2].starts_with("0\t$a0 + 1"));

    assert_eq!(run(&mut monitor, "d 0"), "deleted watchpoint 0");
    assert_eq!(monitor.watchpoints().active_ids(), vec![1]);
}

#[test]
fn test_delete_unknown_watchpoint() {
    let mut monitor = demo();
    assert_eq!(
        monitor.execute_line("d 5").unwrap_err(),
        MonitorError::Watchpoint(WatchpointError::NotFound(5))
    );
}

#[test]
fn test_invalid_watch_takes_no_slot() {
    let mut monitor = demo();
    let err = monitor.execute_line("w $nope").unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Watchpoint(WatchpointError::InvalidExpression(
            EvalError::UnknownRegister(_)
        ))
    ));
    assert_eq!(monitor.watchpoints().active_len(), 0);
}

// ─────────────────────────────────────────────────────────────────────
// Stepping
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_step_count_completes() {
    let mut monitor = demo();
    let report = monitor.step(Some(3)).unwrap();
    assert_eq!(report.executed, 3);
    assert_eq!(report.stop, StopReason::Completed);
    assert_eq!(monitor.cpu().pc(), MEMORY_BASE + 12);
}

#[test]
fn test_continue_runs_to_halt() {
    let mut monitor = demo();
    let report = monitor.step(None).unwrap();
    assert_eq!(report.executed, DEMO_LEN);
    assert_eq!(report.stop, StopReason::Halted);
    assert_eq!(monitor.cpu().state(), CpuState::Halted);

    let out = run(&mut monitor, "c");
    assert!(out.contains("halted"));
}

#[test]
fn test_register_watchpoint_stops_stepping() {
    let mut monitor = demo();
    run(&mut monitor, "w $a0");

    let report = monitor.step(None).unwrap();
    assert_eq!(report.executed, 2);
    assert_eq!(
        report.stop,
        StopReason::Watchpoint(vec![WatchHit {
            id: 0,
            expression: "$a0".into(),
            old_value: 0,
            new_value: 1,
        }])
    );

    // Each further increment stops again.
    let report = monitor.step(None).unwrap();
    assert_eq!(report.executed, 2);
    assert!(matches!(
        &report.stop,
        StopReason::Watchpoint(hits) if hits[0].old_value == 1 && hits[0].new_value == 2
    ));
}

#[test]
fn test_memory_watchpoint_stops_after_store() {
    let mut monitor = demo();
    run(&mut monitor, "w *0x80000100");
    let out = run(&mut monitor, "c");
    assert!(out.contains("watchpoint 0: *0x80000100 changed 0 -> 1"));
    assert!(out.ends_with("stopped at pc = 0x8000000c"));
}

#[test]
fn test_step_count_is_cut_short_by_watchpoint() {
    let mut monitor = demo();
    run(&mut monitor, "w $a0");
    let report = monitor.step(Some(10)).unwrap();
    assert_eq!(report.executed, 2);
    assert!(matches!(report.stop, StopReason::Watchpoint(_)));
}

#[test]
fn test_unchanged_watchpoint_runs_to_halt() {
    let mut monitor = demo();
    run(&mut monitor, "w 1+1");
    let report = monitor.step(None).unwrap();
    assert_eq!(report.stop, StopReason::Halted);
    assert_eq!(report.executed, DEMO_LEN);
}

#[test]
fn test_failing_poll_stops_with_error_and_keeps_pool() {
    let mut monitor = demo();
    // 1 / (a0 - 1): fine at a0 = 0, divides by zero once a0 = 1.
    run(&mut monitor, "w 1/($a0-1)");
    let before = monitor.watchpoints().list_active();

    let err = monitor.step(None).unwrap_err();
    assert!(matches!(
        err,
        MonitorError::Watchpoint(WatchpointError::Eval { id: 0, .. })
    ));
    assert_eq!(monitor.watchpoints().list_active(), before);
}

// ─────────────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────────────

#[test]
fn test_session_determinism_100_iterations() {
    let script = ["w $a0", "c", "si 2", "info w", "x 1 $sp", "p $pc", "d 0", "c", "info r"];
    let session = || {
        let mut monitor = demo();
        script
            .iter()
            .map(|line| run(&mut monitor, line))
            .collect::<Vec<_>>()
    };
    let first = session();
    for i in 0..100 {
        assert_eq!(session(), first, "iteration {i} diverged");
    }
}
