//! Foreground launch behavior.
//!
//! These tests only ever wait on specific process IDs, so they can share a
//! process with each other. Anything that reaps arbitrary children with
//! `waitpid(-1)` lives in its own integration binary instead.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use smallsh_rs::common::CommandSpec;
use smallsh_rs::exec::{JobControl, SignalManager};

fn sh(script: &str) -> CommandSpec {
    CommandSpec {
        arguments: vec!["-c".to_string(), script.to_string()],
        ..CommandSpec::new("sh")
    }
}

#[test]
fn records_exit_value() {
    let mut jobs = JobControl::new();
    assert_eq!(jobs.describe(), "exit value 0");

    jobs.launch(&sh("exit 1"));
    assert_eq!(jobs.describe(), "exit value 1");

    jobs.launch(&sh("exit 0"));
    assert_eq!(jobs.describe(), "exit value 0");
}

#[test]
fn reports_termination_signal() {
    let mut jobs = JobControl::new();

    // The child terminates itself, so no other test's child is involved.
    jobs.launch(&sh("kill -TERM $$"));

    assert_eq!(jobs.describe(), "terminated by signal 15");
}

#[test]
fn missing_input_redirection_is_child_fatal() {
    let mut jobs = JobControl::new();

    let mut spec = sh("echo unreachable");
    spec.input = Some(PathBuf::from("/nonexistent/smallsh-input.txt"));
    jobs.launch(&spec);

    // The failure happened inside the child, which exited nonzero before
    // reaching its program; the interpreter itself carries on with nothing
    // tracked and a plain foreground outcome recorded.
    assert_eq!(jobs.describe(), "exit value 1");
    assert!(jobs.background_pids().is_empty());

    jobs.launch(&sh("exit 0"));
    assert_eq!(jobs.describe(), "exit value 0");
}

#[test]
fn background_request_denied_in_foreground_only_mode() {
    let _signals = SignalManager::install().unwrap();

    // Deliver the stop signal to ourselves: enters foreground-only mode.
    unsafe { libc::raise(libc::SIGTSTP) };

    let mut jobs = JobControl::new();
    let mut spec = sh("exit 4");
    spec.background = true;

    jobs.launch(&spec);

    // The command ran in the foreground: its outcome was recorded and
    // nothing was registered as a background job.
    assert_eq!(jobs.describe(), "exit value 4");
    assert!(jobs.background_pids().is_empty());

    // Leave foreground-only mode again.
    unsafe { libc::raise(libc::SIGTSTP) };
}
