//! Output formatting and progress bars for CLI

use std::fmt::Display;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{Error, Result};

/// Create a progress bar counting `unit`s up to `total`
pub fn create_progress(total: u64, unit: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(&format!(
            "[{{elapsed_precise}}] {{bar:40.cyan/blue}} {{pos}}/{{len}} {unit} ({{msg}})"
        ))
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })?
        .progress_chars("=>-");
    pb.set_style(style);
    Ok(pb)
}

/// Create a spinner for graph construction and other unbounded work
pub fn create_spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::default_spinner()
        .template("{spinner:.green} {msg}")
        .map_err(|e| Error::ProgressBarTemplate {
            message: e.to_string(),
        })?;
    pb.set_style(style);
    pb.set_message(message.to_string());
    Ok(pb)
}

/// Print a section header
pub fn print_section(title: &str) {
    println!("\n{}", "=".repeat(60));
    println!("{title}");
    println!("{}", "=".repeat(60));
}

/// Print a subsection header
pub fn print_subsection(title: &str) {
    println!("\n{title}");
    println!("{}", "-".repeat(40));
}

/// Format a number with thousands separators
pub fn format_number(n: impl Display) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i.is_multiple_of(3) {
            result.insert(0, ',');
        }
        result.insert(0, c);
    }
    result
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:24} {}", format!("{}:", key), value);
}
