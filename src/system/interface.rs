/// Process identifier as used by the kernel interfaces this crate wraps.
///
/// `-1` is meaningful to `waitpid(2)` ("any child"), so this stays a plain
/// alias rather than a validating newtype.
pub type ProcessId = libc::pid_t;
