#![macro_use]
#![allow(unused_macros)]

// status lines go to stderr, stdout only carries results

/// prints an error line, exits when an exit code above 1 is given
macro_rules! err {
    ($message:expr) => {{
        use colored::Colorize;
        eprintln!("[E] {}", $message.bold().red());
    }};

    ($message:expr,$exit_code:expr) => {{
        use colored::Colorize;
        eprintln!("[E] {}", $message.bold().red());
        if $exit_code > 1 {
            std::process::exit($exit_code);
        }
    }};
}

macro_rules! warn {
    ($message:expr) => {{
        use colored::Colorize;
        eprintln!("[W] {}", $message.italic().yellow())
    }};
}

macro_rules! info {
    ($message:expr) => {{
        use colored::Colorize;
        eprintln!("[I] {}", $message.italic().white());
    }};
}

/// found something worth reporting
macro_rules! success {
    ($message:expr) => {{
        use colored::Colorize;
        println!("[+] {}", $message.bold().green());
    }};
}
