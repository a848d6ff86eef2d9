/// A text progress bar such as `[▓▓▓░░░░░░░] 30%`.
/// `width` is the number of cells between the brackets.
pub fn render_progress_bar(done: usize, total: usize, width: usize) -> String {
    if total == 0 {
        return format!("[{}] 0%", " ".repeat(width));
    }
    let done = done.min(total);
    let filled = done * width / total;
    let pct = done * 100 / total;
    format!(
        "[{}{}] {}%",
        "▓".repeat(filled),
        "░".repeat(width - filled),
        pct
    )
}
