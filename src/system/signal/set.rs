use std::{io, mem::MaybeUninit};

use crate::system::{cerr, make_zeroed_sigaction};

use super::{SignalHandlerBehavior, SignalNumber};

#[repr(transparent)]
pub(super) struct SignalAction {
    raw: libc::sigaction,
}

impl SignalAction {
    pub(super) fn new(behavior: SignalHandlerBehavior) -> io::Result<Self> {
        // This guarantees that functions won't be interrupted by this signal as long as the
        // handler is alive.
        let sa_flags = libc::SA_RESTART;

        // A custom handler gets a full `sa_mask` so its single write cannot
        // itself be interrupted by another managed signal.
        let (sa_sigaction, sa_mask) = match behavior {
            SignalHandlerBehavior::Default => (libc::SIG_DFL, SignalSet::empty()?),
            SignalHandlerBehavior::Ignore => (libc::SIG_IGN, SignalSet::empty()?),
            SignalHandlerBehavior::Custom(handler) => {
                (handler as libc::sighandler_t, SignalSet::full()?)
            }
        };

        let mut raw = make_zeroed_sigaction();
        raw.sa_sigaction = sa_sigaction;
        raw.sa_mask = sa_mask.raw;
        raw.sa_flags = sa_flags;

        Ok(Self { raw })
    }

    pub(super) fn register(&self, signal: SignalNumber) -> io::Result<Self> {
        let mut original_action = MaybeUninit::<Self>::zeroed();

        // SAFETY: `self.raw` is a fully initialized sigaction and the output pointer is valid
        // for a sigaction-sized write.
        cerr(unsafe { libc::sigaction(signal, &self.raw, original_action.as_mut_ptr().cast()) })?;

        // SAFETY: `sigaction` filled the output value on success.
        Ok(unsafe { original_action.assume_init() })
    }
}

// A signal set usable as a sigaction mask.
#[repr(transparent)]
pub(super) struct SignalSet {
    raw: libc::sigset_t,
}

impl SignalSet {
    /// Create an empty set.
    pub(super) fn empty() -> io::Result<Self> {
        let mut set = MaybeUninit::<Self>::zeroed();

        // SAFETY: the pointer is valid for a sigset_t-sized write.
        cerr(unsafe { libc::sigemptyset(set.as_mut_ptr().cast()) })?;

        // SAFETY: `sigemptyset` initialized the set.
        Ok(unsafe { set.assume_init() })
    }

    /// Create a set containing all the signals.
    pub(super) fn full() -> io::Result<Self> {
        let mut set = MaybeUninit::<Self>::zeroed();

        // SAFETY: the pointer is valid for a sigset_t-sized write.
        cerr(unsafe { libc::sigfillset(set.as_mut_ptr().cast()) })?;

        // SAFETY: `sigfillset` initialized the set.
        Ok(unsafe { set.assume_init() })
    }
}
