//! Strips quoted reply chains and signature blocks from raw message text
//! before any signal extraction runs.

use std::sync::LazyLock;

use regex::Regex;

/// "On <anything> wrote:" reply marker; everything from the marker onward
/// is a quoted earlier message.
static REPLY_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)On [^\n]* wrote:.*$").unwrap());

/// "--" on a line of its own starts an email signature block.
static SIGNATURE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)(?:^|\n)--\n.*$").unwrap());

/// Normalize raw message text: drop `>`-quoted lines, drop everything from
/// the first "On ... wrote:" marker onward, drop the signature block, trim.
///
/// Idempotent: normalizing already-normalized text is a no-op. Empty or
/// whitespace-only input yields an empty string.
pub fn normalize(text: &str) -> String {
    let unquoted: Vec<&str> = text
        .lines()
        .filter(|line| !line.trim_start().starts_with('>'))
        .collect();
    let joined = unquoted.join("\n");

    let without_reply = REPLY_MARKER.replace(&joined, "");
    let without_signature = SIGNATURE_BLOCK.replace(&without_reply, "");
    without_signature.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_quoted_lines() {
        let text = "Lunch tomorrow?\n> are you free this week\n> let me know";
        assert_eq!(normalize(text), "Lunch tomorrow?");
    }

    #[test]
    fn strips_indented_quote_markers() {
        let text = "Plan stands.\n  > old quoted line";
        assert_eq!(normalize(text), "Plan stands.");
    }

    #[test]
    fn strips_reply_marker_and_everything_after() {
        let text = "New plan.\n> old message\nOn Jan 1 wrote:\nignored";
        assert_eq!(normalize(text), "New plan.");
    }

    #[test]
    fn strips_reply_marker_spanning_lines() {
        let text = "Meet at 3pm.\nOn Mon, Nov 3, 2025 at 9:12 AM Anna wrote:\nold\nolder";
        assert_eq!(normalize(text), "Meet at 3pm.");
    }

    #[test]
    fn strips_signature_block() {
        let text = "Coffee Friday?\n--\nBob Smith\nAcme Inc";
        assert_eq!(normalize(text), "Coffee Friday?");
    }

    #[test]
    fn no_quote_markers_survive() {
        let text = "a\n> one\nb\n> two\nc";
        let out = normalize(text);
        assert!(out.lines().all(|l| !l.trim_start().starts_with('>')));
        assert_eq!(out, "a\nb\nc");
    }

    #[test]
    fn idempotent() {
        let samples = [
            "New plan.\n> old message\nOn Jan 1 wrote:\nignored",
            "Coffee Friday?\n--\nBob",
            "  plain text, nothing to strip  ",
            "",
        ];
        for text in samples {
            let once = normalize(text);
            assert_eq!(normalize(&once), once, "not idempotent for {text:?}");
        }
    }

    #[test]
    fn empty_and_whitespace_input() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t  "), "");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(normalize("  dentist at 3pm  \n"), "dentist at 3pm");
    }
}
