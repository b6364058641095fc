// Macros for user-facing console lines. Logs go through tracing instead.

#[macro_export]
macro_rules! ui_ok {
    ($($arg:tt)*) => {{
        eprintln!("✔ {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_info {
    ($($arg:tt)*) => {{
        eprintln!("ℹ {}", format_args!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_warn {
    ($($arg:tt)*) => {{
        use std::io::IsTerminal;
        let show_icon = std::io::stderr().is_terminal() && std::env::var_os("NO_ICONS").is_none();
        if show_icon {
            eprintln!("⚠ {}", format_args!($($arg)*));
        } else {
            eprintln!("{}", format_args!($($arg)*));
        }
    }};
}

/// Command output proper (stdout), e.g. JSON documents.
#[macro_export]
macro_rules! ui_out {
    ($($arg:tt)*) => {{
        println!("{}", format_args!($($arg)*));
    }};
}
