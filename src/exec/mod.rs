mod jobs;
mod signal_manager;
mod status;

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::process::CommandExt;
use std::process::Command;

use crate::common::CommandSpec;
use crate::log::{dev_info, dev_warn, user_error};
use crate::system::{
    dup2, fork,
    interface::ProcessId,
    wait::{Wait, WaitError, WaitOptions, WaitStatus},
    ForkResult, _exit,
};

pub use signal_manager::SignalManager;

use self::jobs::JobRegistry;
use self::status::ForegroundStatus;

const NULL_DEVICE: &str = "/dev/null";

/// How a finished command left the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    Code(i32),
    Signal(i32),
}

impl ExitReason {
    fn from_status(status: &WaitStatus) -> Option<Self> {
        if let Some(code) = status.exit_status() {
            Some(Self::Code(code))
        } else if let Some(signal) = status.term_signal() {
            Some(Self::Signal(signal))
        } else {
            None
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exit value {code}"),
            Self::Signal(signal) => write!(f, "terminated by signal {signal}"),
        }
    }
}

/// Job-control state owned by the control loop.
///
/// Bundles the background job registry and the last foreground outcome so
/// the shell carries a single context object instead of file-scope
/// globals. The background-permission flag is the deliberate exception:
/// its writes belong to the stop-signal handler (see [`signal_manager`]).
pub struct JobControl {
    registry: JobRegistry,
    status: ForegroundStatus,
}

impl Default for JobControl {
    fn default() -> Self {
        Self::new()
    }
}

impl JobControl {
    pub fn new() -> Self {
        Self {
            registry: JobRegistry::new(),
            status: ForegroundStatus::default(),
        }
    }

    /// Process identifiers of the background jobs still being tracked.
    pub fn background_pids(&self) -> &[ProcessId] {
        self.registry.pids()
    }

    /// Render the outcome of the most recent foreground command.
    pub fn describe(&self) -> String {
        self.status.describe()
    }

    /// Reap every finished child without blocking, reporting the tracked ones.
    pub fn drain(&mut self) {
        jobs::drain(&mut self.registry)
    }

    /// Send an immediate termination signal to every tracked background job.
    ///
    /// Does not wait for any of them to actually die.
    pub fn kill_all(&self) {
        self.registry.kill_all()
    }

    /// Run `spec`: spawn a child, bind its streams, then either track it as
    /// a background job or wait for it and record the outcome.
    ///
    /// A request for background execution is only honored while the
    /// stop-signal toggle permits it. No failure propagates to the caller:
    /// a fork error is reported and dropped, and everything past the fork
    /// is fatal only to the child.
    pub fn launch(&mut self, spec: &CommandSpec) {
        let background = spec.background && signal_manager::background_enabled();

        let mut command = Command::new(&spec.program);
        command.args(&spec.arguments);

        let pid = match fork() {
            Ok(ForkResult::Parent(pid)) => pid,
            Ok(ForkResult::Child) => exec_child(spec, background, command),
            Err(err) => {
                user_error!("cannot fork child process: {err}");
                return;
            }
        };

        if background {
            self.registry.add(pid);
            println_ignore_io_error!("background pid is {pid}");
            return;
        }

        dev_info!("waiting for foreground command with pid {pid}");

        if let Some(outcome) = wait_foreground(pid) {
            if let ExitReason::Signal(signal) = outcome {
                println_ignore_io_error!("terminated by signal {signal}");
            }
            self.status.record(outcome);
        }
    }
}

/// Block until the foreground child terminates and decode its status.
fn wait_foreground(pid: ProcessId) -> Option<ExitReason> {
    let status = loop {
        match pid.wait(WaitOptions::new()) {
            Ok((_, status)) => break status,
            Err(WaitError::Io(err)) if was_interrupted(&err) => {}
            Err(WaitError::Io(err)) => {
                dev_warn!("cannot wait for foreground child {pid}: {err}");
                return None;
            }
            Err(WaitError::NotReady) => {
                // Not reachable without `no_hang`; treat it like a lost child.
                dev_warn!("foreground child {pid} has no status report");
                return None;
            }
        }
    };

    let outcome = ExitReason::from_status(&status);
    if outcome.is_none() {
        dev_warn!("unexpected wait status for foreground child {pid}: {status:?}");
    }
    outcome
}

pub(crate) fn was_interrupted(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::Interrupted
}

/// Child side of [`JobControl::launch`]; never returns.
///
/// Everything here runs before the process image is replaced. Any failure
/// terminates the child with a nonzero status and leaves the interpreter
/// untouched.
fn exec_child(spec: &CommandSpec, background: bool, mut command: Command) -> ! {
    if let Err(err) = signal_manager::prepare_child_signals(background) {
        dev_warn!("cannot reset child signal dispositions: {err}");
    }

    if bind_streams(spec, background).is_err() {
        _exit(1);
    }

    let err = command.exec();

    dev_warn!("failed to execute {}: {err}", spec.program);
    println_ignore_io_error!("{}: no such file or directory", spec.program);
    _exit(1);
}

/// Bind the standard streams for a child about to exec.
///
/// Explicit redirections take priority. Otherwise a background child gets
/// the null device on all three streams, so an unattended job can neither
/// block on terminal input it will never receive nor interleave output
/// with the interactive prompt; that fallback is best effort. An open
/// failure for an explicit path is reported here, naming the path.
fn bind_streams(spec: &CommandSpec, background: bool) -> io::Result<()> {
    if let Some(path) = &spec.input {
        let file = File::open(path).map_err(|err| {
            println_ignore_io_error!("{}: cannot open input file", path.display());
            err
        })?;
        dup2(&file, libc::STDIN_FILENO)?;
    } else if background {
        if let Ok(null) = File::open(NULL_DEVICE) {
            dup2(&null, libc::STDIN_FILENO)?;
        }
    }

    if let Some(path) = &spec.output {
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o644)
            .open(path)
            .map_err(|err| {
                println_ignore_io_error!("{}: cannot open output file", path.display());
                err
            })?;
        dup2(&file, libc::STDOUT_FILENO)?;
    } else if background {
        if let Ok(null) = OpenOptions::new().write(true).open(NULL_DEVICE) {
            dup2(&null, libc::STDOUT_FILENO)?;
            dup2(&null, libc::STDERR_FILENO)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::ExitReason;
    use crate::system::{
        interface::ProcessId,
        wait::{Wait, WaitOptions},
    };

    #[test]
    fn exit_reason_rendering() {
        assert_eq!(ExitReason::Code(0).to_string(), "exit value 0");
        assert_eq!(ExitReason::Code(1).to_string(), "exit value 1");
        assert_eq!(ExitReason::Signal(15).to_string(), "terminated by signal 15");
    }

    #[test]
    fn decode_wait_status() {
        let command = std::process::Command::new("sh")
            .args(["-c", "exit 5"])
            .spawn()
            .unwrap();

        let pid = command.id() as ProcessId;
        let (_, status) = pid.wait(WaitOptions::new()).unwrap();

        assert_eq!(ExitReason::from_status(&status), Some(ExitReason::Code(5)));
    }
}
