use crate::lines::{split_lines, trim_space};

const MAX_UNTERMINATED_STREAK: usize = 2;

pub fn extract_lead_paragraph(text: &str) -> String {
    let mut result = String::new();
    let mut pending = String::new();
    let mut streak = 0;

    for line in split_lines(text) {
        let stripped = trim_space(line);

        // Unterminated and blank lines wait for the next sentence
        if stripped.ends_with('.') {
            result.push_str(&pending);
            pending.clear();
            result.push_str(line);
            result.push('\n');
            streak = 0;
            continue;
        }

        pending.push_str(line);
        pending.push('\n');

        if !stripped.is_empty() {
            streak += 1;
            if streak >= MAX_UNTERMINATED_STREAK {
                break;
            }
        }
    }

    result.trim_end_matches('\n').to_string()
}
