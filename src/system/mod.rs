use std::{
    io,
    os::fd::{AsRawFd, RawFd},
};

use interface::ProcessId;
use signal::SignalNumber;

pub mod interface;

pub(crate) mod signal;

pub mod wait;

pub(crate) fn cerr<Int: Copy + TryInto<libc::c_long>>(res: Int) -> io::Result<Int> {
    match res.try_into() {
        Ok(-1) => Err(io::Error::last_os_error()),
        _ => Ok(res),
    }
}

pub(crate) fn _exit(status: libc::c_int) -> ! {
    // SAFETY: `_exit` terminates the process without unwinding and performs
    // no cleanup; there is no state it could corrupt.
    unsafe { libc::_exit(status) }
}

pub(crate) enum ForkResult {
    // Parent process branch with the child process' PID.
    Parent(ProcessId),
    // Child process branch.
    Child,
}

unsafe fn inner_fork() -> io::Result<ForkResult> {
    let pid = cerr(unsafe { libc::fork() })?;
    if pid == 0 {
        Ok(ForkResult::Child)
    } else {
        Ok(ForkResult::Parent(pid))
    }
}

#[cfg(target_os = "linux")]
/// Create a new process.
pub(crate) fn fork() -> io::Result<ForkResult> {
    // SAFETY: `fork` is implemented using `clone` in linux so we don't need to worry about signal
    // safety.
    unsafe { inner_fork() }
}

#[cfg(not(target_os = "linux"))]
/// Create a new process.
///
/// # Safety
///
/// In a multithreaded program, only async-signal-safe functions are guaranteed to work in the
/// child process until a call to `execve` or a similar function is done.
pub(crate) unsafe fn fork() -> io::Result<ForkResult> {
    inner_fork()
}

/// Send a signal to a process with the specified ID.
pub(crate) fn kill(pid: ProcessId, signal: SignalNumber) -> io::Result<()> {
    // SAFETY: This function cannot cause UB even if `pid` is not a valid process ID or if
    // `signal` is not a valid signal code.
    cerr(unsafe { libc::kill(pid, signal) }).map(|_| ())
}

/// Rebind `dst` (one of the standard stream descriptors) to whatever `src`
/// currently refers to.
pub(crate) fn dup2<F: AsRawFd>(src: &F, dst: RawFd) -> io::Result<()> {
    // SAFETY: This function cannot cause UB for any pair of descriptor values.
    cerr(unsafe { libc::dup2(src.as_raw_fd(), dst) }).map(|_| ())
}

pub(crate) fn make_zeroed_sigaction() -> libc::sigaction {
    // SAFETY: since sigaction is a C struct, all-zeroes is a valid representation
    // We cannot use a "literal struct" initialization method since the exact representation
    // of libc::sigaction is not fixed.
    unsafe { std::mem::zeroed() }
}

#[cfg(test)]
mod tests {
    use super::{fork, interface::ProcessId, ForkResult, _exit};
    use crate::system::signal::consts::*;
    use crate::system::wait::{Wait, WaitOptions};

    #[test]
    fn kill_test() {
        let mut child = std::process::Command::new("/bin/sleep")
            .arg("1")
            .spawn()
            .unwrap();
        super::kill(child.id() as ProcessId, SIGKILL).unwrap();
        assert!(!child.wait().unwrap().success());
    }

    #[test]
    fn fork_test() {
        let ForkResult::Parent(child_pid) = fork().unwrap() else {
            _exit(7);
        };

        let (pid, status) = child_pid.wait(WaitOptions::new()).unwrap();
        assert_eq!(child_pid, pid);
        assert_eq!(status.exit_status(), Some(7));
    }
}
