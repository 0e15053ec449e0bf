use std::io::{self, BufRead};
use std::path::PathBuf;

use crate::exec::{JobControl, SignalManager};
use crate::log::ShellLogger;
use crate::system::{
    interface::ProcessId,
    wait::{Wait, WaitOptions},
};

mod parser;

pub fn main() {
    ShellLogger::new("smallsh: ").into_global_logger();

    if let Err(err) = run() {
        eprintln_ignore_io_error!("smallsh: {err}");
        std::process::exit(1);
    }
}

fn run() -> io::Result<()> {
    // Held for the whole session; dropping it would restore the default
    // dispositions for the interrupt and stop signals.
    let _signals = SignalManager::install()?;

    let shell_pid = std::process::id();
    let mut jobs = JobControl::new();

    let stdin = io::stdin();
    let mut line = String::new();

    loop {
        jobs.drain();

        print_ignore_io_error!(": ");

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            // End of input: same shutdown path as `exit`.
            break;
        }

        let Some(spec) = parser::parse(&line, shell_pid) else {
            continue;
        };

        match spec.program.as_str() {
            "exit" => break,
            "cd" => change_directory(spec.arguments.first()),
            "status" => println_ignore_io_error!("{}", jobs.describe()),
            _ => jobs.launch(&spec),
        }

        jobs.drain();
    }

    shutdown(&jobs);

    Ok(())
}

/// Built-in `cd`: change to the given directory, or to `$HOME` without one.
fn change_directory(target: Option<&String>) {
    let target = match target {
        Some(path) => PathBuf::from(path),
        None => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home),
            None => return,
        },
    };

    if std::env::set_current_dir(&target).is_err() {
        println_ignore_io_error!("cd: no such file or directory");
    }
}

/// Kill all remaining background jobs, then sweep up those already dead.
///
/// The sweep never blocks; a job that survives the race simply gets
/// reparented when the interpreter exits.
fn shutdown(jobs: &JobControl) {
    const ANY_CHILD: ProcessId = -1;

    jobs.kill_all();

    while ANY_CHILD.wait(WaitOptions::new().no_hang()).is_ok() {}
}
