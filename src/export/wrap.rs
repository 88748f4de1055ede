//! Greedy word wrapping of section bodies.

use textwrap::{Options, WordSplitter, WrapAlgorithm};

/// Wrap `text` into lines of at most `columns` display columns.
///
/// Words are accumulated until the next one would overflow, then the line
/// breaks (first-fit). Lines break only at spaces; hyphens are part of the
/// word. Words longer than a line are split. Explicit newlines are kept as
/// line breaks, whether written `\n`, `\r\n` or a bare `\r`. A blank body
/// produces no lines.
pub fn wrap_body(text: &str, columns: usize) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let text = text.replace("\r\n", "\n").replace('\r', "\n");
    let options = Options::new(columns.max(1))
        .wrap_algorithm(WrapAlgorithm::FirstFit)
        .word_splitter(WordSplitter::NoHyphenation)
        .break_words(true);

    textwrap::wrap(&text, options)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_body_has_no_lines() {
        assert!(wrap_body("", 10).is_empty());
        assert!(wrap_body("   ", 10).is_empty());
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(wrap_body("hola mundo", 20), vec!["hola mundo"]);
    }

    #[test]
    fn test_greedy_breaks() {
        assert_eq!(
            wrap_body("aaa bbb ccc ddd", 7),
            vec!["aaa bbb", "ccc ddd"]
        );
    }

    #[test]
    fn test_first_fit_does_not_rebalance() {
        // An optimal-fit wrapper would move "bb" down to even out the lines.
        assert_eq!(wrap_body("aaaa bb c", 7), vec!["aaaa bb", "c"]);
    }

    #[test]
    fn test_long_word_is_split() {
        assert_eq!(wrap_body("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_newlines_are_kept() {
        assert_eq!(wrap_body("uno\ndos", 20), vec!["uno", "dos"]);
    }

    #[test]
    fn test_carriage_returns_become_line_breaks() {
        assert_eq!(wrap_body("uno\r\ndos\rtres", 20), vec!["uno", "dos", "tres"]);
        assert_eq!(wrap_body("uno\r\n\r\ndos", 20), vec!["uno", "", "dos"]);
        assert!(wrap_body("a\r\nb", 20).iter().all(|l| !l.contains('\r')));
    }

    #[test]
    fn test_hyphens_are_not_break_points() {
        assert_eq!(wrap_body("ab-cd", 4), vec!["ab-c", "d"]);
        assert_eq!(wrap_body("co-creation ideas", 11), vec!["co-creation", "ideas"]);
        assert_eq!(wrap_body("pre-mortem", 12), vec!["pre-mortem"]);
    }

    #[test]
    fn test_repeated_words_fill_lines() {
        let body = "x ".repeat(100);
        let lines = wrap_body(&body, 80);
        assert_eq!(lines.len(), 3);
        assert!(lines.iter().all(|l| l.chars().count() <= 80));
    }
}
