use crate::log::{dev_info, dev_warn};
use crate::system::{
    interface::ProcessId,
    kill,
    signal::consts::SIGKILL,
    wait::{Wait, WaitError, WaitOptions},
};

use super::ExitReason;

/// Upper bound on tracked background jobs.
///
/// Tracking is best effort: a job launched past this bound still runs, it
/// just won't be reported by name when it finishes.
const MAX_BACKGROUND_JOBS: usize = 1024;

/// `waitpid(2)` accepts `-1` to wait for any child.
const ANY_CHILD: ProcessId = -1;

/// Bounded set of background process identifiers.
///
/// Mutated only from the main thread: the launcher inserts, the reaper
/// removes. The stop-signal handler never touches this.
pub(super) struct JobRegistry {
    pids: Vec<ProcessId>,
    capacity: usize,
}

impl JobRegistry {
    pub(super) fn new() -> Self {
        Self::with_capacity(MAX_BACKGROUND_JOBS)
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            pids: Vec::new(),
            capacity,
        }
    }

    pub(super) fn pids(&self) -> &[ProcessId] {
        &self.pids
    }

    /// Track `pid`; silently dropped when the registry is full.
    pub(super) fn add(&mut self, pid: ProcessId) {
        if self.pids.contains(&pid) {
            return;
        }
        if self.pids.len() >= self.capacity {
            dev_warn!("job registry is full; pid {pid} will not be tracked");
            return;
        }
        self.pids.push(pid);
    }

    /// Stop tracking `pid`, reporting whether it was tracked at all.
    pub(super) fn remove(&mut self, pid: ProcessId) -> bool {
        match self.pids.iter().position(|&tracked| tracked == pid) {
            Some(index) => {
                self.pids.swap_remove(index);
                true
            }
            None => false,
        }
    }

    /// Send an immediate termination signal to every tracked job.
    ///
    /// Does not wait for any of them to die; the caller is about to leave.
    pub(super) fn kill_all(&self) {
        for &pid in &self.pids {
            if let Err(err) = kill(pid, SIGKILL) {
                dev_warn!("cannot kill background pid {pid}: {err}");
            }
        }
    }
}

/// Reap finished children without blocking.
///
/// Tracked background jobs are reported and removed from the registry.
/// Children the registry does not recognize are consumed all the same so
/// they don't linger as zombies, just without a report.
pub(super) fn drain(registry: &mut JobRegistry) {
    loop {
        match ANY_CHILD.wait(WaitOptions::new().no_hang()) {
            Ok((pid, status)) => {
                let tracked = registry.remove(pid);
                match ExitReason::from_status(&status) {
                    Some(reason) if tracked => {
                        println_ignore_io_error!("background pid {pid} is done: {reason}");
                    }
                    Some(_) => dev_info!("reaped untracked child {pid}"),
                    None => dev_warn!("unexpected wait status for child {pid}: {status:?}"),
                }
            }
            Err(WaitError::NotReady) => break,
            Err(WaitError::Io(err)) if err.raw_os_error() == Some(libc::ECHILD) => break,
            Err(WaitError::Io(err)) if super::was_interrupted(&err) => {}
            Err(WaitError::Io(err)) => {
                dev_warn!("cannot wait for background children: {err}");
                break;
            }
        }
    }
}
