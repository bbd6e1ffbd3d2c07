//! Headers, key/value lines and toast notifications.

/// Line width for separators.
pub const LINE_WIDTH: usize = 60;

/// Status icons
pub mod icons {
    pub const SUCCESS: &str = "✓";
    pub const FAILURE: &str = "✗";
    pub const WARNING: &str = "⚠";
}

/// Kind of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Warning,
    Error,
}

impl ToastKind {
    fn icon(&self) -> &'static str {
        match self {
            ToastKind::Success => icons::SUCCESS,
            ToastKind::Warning => icons::WARNING,
            ToastKind::Error => icons::FAILURE,
        }
    }
}

/// Render a section header.
///
/// ```text
/// DASHBOARD
/// ════════════════════════════════════════════════════════════
/// ```
pub fn format_header(title: &str) -> String {
    format!("{}\n{}", title, "═".repeat(LINE_WIDTH))
}

/// Print a section header surrounded by blank lines.
pub fn print_header(title: &str) {
    println!();
    println!("{}", format_header(title));
    println!();
}

/// Render a toast: the title on the first line, the description indented
/// below it.
///
/// ```text
/// ✓ Trade recorded
///   BUY 0.5 BTC/USD @ 42000
/// ```
pub fn format_toast(kind: ToastKind, title: &str, description: &str) -> String {
    if description.is_empty() {
        format!("{} {}", kind.icon(), title)
    } else {
        format!("{} {}\n  {}", kind.icon(), title, description)
    }
}

/// Print a success or warning toast to stdout.
pub fn print_toast(kind: ToastKind, title: &str, description: &str) {
    println!("{}", format_toast(kind, title, description));
}

/// Print an error toast to stderr.
pub fn print_error_toast(title: &str, description: &str) {
    eprintln!("{}", format_toast(ToastKind::Error, title, description));
}

/// Print aligned `label: value` lines.
///
/// ```text
///   Email: trader@example.com
///   Role:  admin
/// ```
pub fn print_fields(fields: &[(&str, String)]) {
    let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in fields {
        println!("  {:<width$} {}", format!("{}:", label), value, width = width + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_header() {
        let header = format_header("DASHBOARD");
        let lines: Vec<&str> = header.lines().collect();
        assert_eq!(lines[0], "DASHBOARD");
        assert_eq!(lines[1].chars().count(), LINE_WIDTH);
    }

    #[test]
    fn test_format_toast() {
        assert_eq!(
            format_toast(ToastKind::Success, "Signed out", ""),
            "✓ Signed out"
        );
        assert_eq!(
            format_toast(ToastKind::Error, "Access Denied", "Admins only"),
            "✗ Access Denied\n  Admins only"
        );
    }
}
