//! Utilities to handle signals.

use std::borrow::Cow;
use std::io;

mod handler;
mod set;

pub(crate) use handler::{SignalHandler, SignalHandlerBehavior};

pub(crate) type SignalNumber = libc::c_int;

/// Set the disposition for `signal` without remembering the previous one.
///
/// This is meant for the child side of a fork, where the process image is
/// about to be replaced and nothing will ever restore the old action; the
/// interpreter itself registers dispositions through [`SignalHandler`].
pub(crate) fn set_disposition(
    signal: SignalNumber,
    behavior: SignalHandlerBehavior,
) -> io::Result<()> {
    set::SignalAction::new(behavior)?.register(signal).map(|_| ())
}

macro_rules! define_consts {
    ($($signal:ident,)*) => {
        pub(crate) mod consts {
            pub(crate) use libc::{$($signal,)*};
        }

        pub(crate) fn signal_name(signal: SignalNumber) -> Option<&'static str> {
            match signal {
                $(consts::$signal => Some(stringify!($signal)),)*
                _ => None,
            }
        }
    };
}

define_consts! {
    SIGINT,
    SIGQUIT,
    SIGTSTP,
    SIGTERM,
    SIGHUP,
    SIGPIPE,
    SIGCHLD,
    SIGCONT,
    SIGKILL,
    SIGSTOP,
}

pub(crate) fn signal_fmt(signal: SignalNumber) -> Cow<'static, str> {
    signal_name(signal)
        .map(|name| name.into())
        .unwrap_or_else(|| format!("unknown signal #{signal}").into())
}

#[cfg(test)]
mod tests {
    use super::{consts::*, signal_fmt};

    #[test]
    fn formats_known_and_unknown_signals() {
        assert_eq!(signal_fmt(SIGINT), "SIGINT");
        assert_eq!(signal_fmt(SIGTSTP), "SIGTSTP");
        assert_eq!(signal_fmt(-1), "unknown signal #-1");
    }
}
