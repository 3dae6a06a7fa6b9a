//! Terminal output formatting with colors
//!
//! Respects NO_COLOR, CLICOLOR, CLICOLOR_FORCE automatically.

use colored::{ColoredString, Colorize};

use crate::domain::{classify, Color, PositionedNode, SceneDiff};

/// Print error (red bold "error:" prefix) to stderr
pub fn error(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "error".red().bold(), msg);
}

/// Print warning (yellow "Warning:" prefix) to stderr
pub fn warning(msg: &(impl std::fmt::Display + ?Sized)) {
    eprintln!("{}: {}", "Warning".yellow(), msg);
}

/// Print section header (cyan bold)
pub fn header(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().cyan().bold());
}

/// Print connection status line (dimmed)
pub fn status(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg.to_string().dimmed());
}

/// Print indented detail (no color)
pub fn detail(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("  {}", msg);
}

/// Print plain output (no color, for data such as JSON)
pub fn info(msg: &(impl std::fmt::Display + ?Sized)) {
    println!("{}", msg);
}

/// Text drawn in a node color.
pub fn paint(text: &str, color: Color) -> ColoredString {
    let (r, g, b) = color.rgb();
    text.truecolor(r, g, b)
}

/// Tree label: colored name followed by the position.
pub fn node_label(node: &PositionedNode<'_>) -> String {
    let color = classify(node.node.overlap_level);
    format!(
        "{} {}",
        paint(&node.node.name, color).bold(),
        node.position.to_string().dimmed()
    )
}

/// One-line summary of what changed between two scenes
pub fn diff_summary(diff: &SceneDiff) -> String {
    format!(
        "{} {}  {} {}  {} {}",
        "+".green(),
        diff.added.len(),
        "-".red(),
        diff.removed.len(),
        "~".yellow(),
        diff.changed.len()
    )
}
