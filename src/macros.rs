// the `std::print` macros panic on any IO error. these are non-panicking alternatives
macro_rules! print_ignore_io_error {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, $($tt)*);
        let _ = stdout.flush();
    }}
}

macro_rules! println_ignore_io_error {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stdout(), $($tt)*);
    }}
}

macro_rules! eprintln_ignore_io_error {
    ($($tt:tt)*) => {{
        use std::io::Write;
        let _ = writeln!(std::io::stderr(), $($tt)*);
    }}
}
