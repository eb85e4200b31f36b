//! Output formatting for the CLI.

use console::style;
use grocer_commerce::checkout::OrderStatus;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        println!("  {}", format_row(cols, widths));
    }

    /// Create a spinner for a remote call.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Pad each column to its width. Columns beyond `widths` are left unpadded.
pub fn format_row(cols: &[&str], widths: &[usize]) -> String {
    cols.iter()
        .enumerate()
        .map(|(i, col)| match widths.get(i) {
            Some(width) => format!("{:width$}", truncate(col, *width), width = width),
            None => col.to_string(),
        })
        .collect::<Vec<_>>()
        .join("  ")
        .trim_end()
        .to_string()
}

/// Shorten `s` to at most `max` characters, marking the cut with `…`.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

/// Status badge for order states.
pub fn status_badge(status: OrderStatus) -> String {
    let name = status.display_name();
    match status {
        OrderStatus::Delivered => style(name).green().to_string(),
        s if s.is_terminal() => style(name).dim().to_string(),
        _ => style(name).yellow().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_row() {
        assert_eq!(format_row(&["Milk", "x2", "$2.50"], &[6, 4]), "Milk    x2    $2.50");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Bananas", 10), "Bananas");
        assert_eq!(truncate("Organic Bananas", 8), "Organic…");
        assert_eq!(truncate("Ünïcødé", 3), "Ün…");
    }

    #[test]
    fn test_status_badge() {
        assert_eq!(
            status_badge(OrderStatus::Delivered),
            style("Delivered").green().to_string()
        );
        assert_eq!(
            status_badge(OrderStatus::Cancelled),
            style("Cancelled").dim().to_string()
        );
        assert_eq!(
            status_badge(OrderStatus::OutForDelivery),
            style("Out for delivery").yellow().to_string()
        );
    }
}
