/// Splits text into whitespace-delimited tokens.
///
/// Runs of any Unicode whitespace count as a single separator, so empty or
/// whitespace-only input yields no tokens.
pub fn split_words(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_owned).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_simple_sentence() {
        let words = split_words("The quick brown fox jumps");
        assert_eq!(words, vec!["The", "quick", "brown", "fox", "jumps"]);
    }

    #[test]
    fn test_split_collapses_whitespace_runs() {
        let words = split_words("  one\t\ttwo\n\nthree   ");
        assert_eq!(words, vec!["one", "two", "three"]);
    }

    #[test]
    fn test_split_empty_and_blank() {
        assert!(split_words("").is_empty());
        assert!(split_words(" \n\t ").is_empty());
    }

    #[test]
    fn test_split_keeps_punctuation_attached() {
        let words = split_words("Hola, ¿qué tal? — bien.");
        assert_eq!(words, vec!["Hola,", "¿qué", "tal?", "—", "bien."]);
    }

    #[test]
    fn test_split_on_unicode_whitespace() {
        let text = "a  b\u{00A0}c\nd";
        assert_eq!(split_words(text), vec!["a", "b", "c", "d"]);
    }
}
