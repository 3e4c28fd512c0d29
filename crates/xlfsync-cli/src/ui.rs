// Console output helpers. Diagnostics go through tracing; these are for results.

#[macro_export]
macro_rules! ui_ok {
    ($($arg:tt)*) => {{
        println!("✔ {}", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_info {
    ($($arg:tt)*) => {{
        eprintln!("ℹ {}", format!($($arg)*));
    }};
}

#[macro_export]
macro_rules! ui_warn {
    ($($arg:tt)*) => {{
        use std::io::IsTerminal;
        if std::io::stderr().is_terminal() && std::env::var_os("NO_ICONS").is_none() {
            eprintln!("⚠ {}", format!($($arg)*));
        } else {
            eprintln!("{}", format!($($arg)*));
        }
    }};
}

#[macro_export]
macro_rules! ui_out {
    ($($arg:tt)*) => {{
        println!("{}", format!($($arg)*));
    }};
}
