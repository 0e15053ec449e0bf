use std::io;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::system::signal::{
    consts::*, set_disposition, SignalHandler, SignalHandlerBehavior, SignalNumber,
};

/// Whether `&` on a command line is currently honored.
///
/// Written from asynchronous signal context by [`toggle_foreground_only`]
/// and read by the launcher. Everything else in job control stays owned by
/// the main thread, so this atomic is the only cross-context state.
static BACKGROUND_ENABLED: AtomicBool = AtomicBool::new(true);

const ENTER_FOREGROUND_ONLY: &[u8] = b"\nEntering foreground-only mode (& is now ignored)\n";
const EXIT_FOREGROUND_ONLY: &[u8] = b"\nExiting foreground-only mode\n";

/// Stop-signal handler: flip background permission and announce the change.
///
/// Runs in asynchronous signal context and is therefore limited to one
/// atomic read-modify-write and one `write(2)` of a message whose length
/// is known ahead of time. It must not allocate, call into non-reentrant
/// library code, or touch the job registry or status tracker.
extern "C" fn toggle_foreground_only(_signal: SignalNumber) {
    let was_enabled = BACKGROUND_ENABLED.fetch_xor(true, Ordering::SeqCst);

    let notice = if was_enabled {
        ENTER_FOREGROUND_ONLY
    } else {
        EXIT_FOREGROUND_ONLY
    };

    // SAFETY: `write(2)` is async-signal-safe and the buffer is a live static.
    unsafe { libc::write(libc::STDOUT_FILENO, notice.as_ptr().cast(), notice.len()) };
}

pub(crate) fn background_enabled() -> bool {
    BACKGROUND_ENABLED.load(Ordering::SeqCst)
}

/// The interpreter's own signal dispositions, held for the whole session.
///
/// An interactive interrupt must never kill the interpreter itself, and
/// the stop signal is repurposed to toggle foreground-only mode. No other
/// signal is altered.
pub struct SignalManager {
    _handlers: [SignalHandler; 2],
}

impl SignalManager {
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            _handlers: [
                SignalHandler::register(SIGINT, SignalHandlerBehavior::Ignore)?,
                SignalHandler::register(
                    SIGTSTP,
                    SignalHandlerBehavior::Custom(toggle_foreground_only),
                )?,
            ],
        })
    }
}

/// Dispositions for a child, applied between fork and exec.
///
/// Only the interpreter toggles job control, so children always ignore the
/// stop signal; an interactive interrupt must only reach foreground work,
/// so background children ignore the interrupt as well.
pub(super) fn prepare_child_signals(background: bool) -> io::Result<()> {
    set_disposition(SIGTSTP, SignalHandlerBehavior::Ignore)?;

    let interrupt = if background {
        SignalHandlerBehavior::Ignore
    } else {
        SignalHandlerBehavior::Default
    };
    set_disposition(SIGINT, interrupt)
}
