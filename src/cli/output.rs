//! Terminal output for cattree commands.
//!
//! Data lines (ids, tab-separated rows) stay uncolored so they can be piped.
//! `colored` honors NO_COLOR, CLICOLOR and CLICOLOR_FORCE.

use std::fmt::Display;

use colored::Colorize;

pub fn error(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

pub fn warning(msg: &(impl Display + ?Sized)) {
    eprintln!("{}: {}", "warning".yellow(), msg);
}

/// Accepted edit or passed check
pub fn success(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✓".green(), msg);
}

/// Rejected edit or integrity problem
pub fn failure(msg: &(impl Display + ?Sized)) {
    println!("{} {}", "✗".red(), msg);
}

pub fn header(msg: &(impl Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// `label: value` with the label dimmed
pub fn field(label: &str, value: &(impl Display + ?Sized)) {
    println!("{} {}", format!("{label}:").dimmed(), value);
}

pub fn detail(msg: &(impl Display + ?Sized)) {
    println!("  {}", msg);
}

/// Uncolored line
pub fn info(msg: &(impl Display + ?Sized)) {
    println!("{}", msg);
}

/// Tab-separated data row
pub fn row(cells: &[&dyn Display]) {
    let line: Vec<String> = cells.iter().map(|c| c.to_string()).collect();
    println!("{}", line.join("\t"));
}
