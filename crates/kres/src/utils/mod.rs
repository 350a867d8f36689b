use regex::Regex;

pub mod config;

#[macro_export]
macro_rules! println_pad {
    ($($arg:tt)*) => {{
        let __s = format!($($arg)*);
        for __line in __s.lines() {
            println!("    {}", __line);
        }
    }};
}

/// Removes ANSI color codes.
pub fn strip_ansi(line: &str) -> String {
    match Regex::new("\x1b\\[[0-9;]*m") {
        Ok(ansi) => ansi.replace_all(line, "").into_owned(),
        Err(_) => line.to_string(),
    }
}

/// Number of characters a line takes on screen.
pub fn visible_len(line: &str) -> usize {
    strip_ansi(line).chars().count()
}

/// Prints the provided lines inside an ASCII box
pub fn print_ansi_boxed_lines(lines: &[String]) {
    let width = lines
        .iter()
        .map(|s| visible_len(s.as_str()))
        .max()
        .unwrap_or(0);

    let border = "-".repeat(width + 4);
    println_pad!("{}", border);
    for line in lines {
        let pad = width - visible_len(line.as_str());
        println_pad!("| {}{} |", line, " ".repeat(pad));
    }
    println_pad!("{}", border);
}
