/// A token split into an emphasized prefix and a plain remainder.
///
/// `bold` carries any leading punctuation plus the emphasized letters, `normal`
/// carries the rest of the letters plus trailing punctuation, so
/// `bold + normal == original` for every non-blank token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BionicWord {
    pub bold: String,
    pub normal: String,
    pub original: String,
}

impl BionicWord {
    fn blank(original: &str) -> Self {
        Self {
            bold: String::new(),
            normal: String::new(),
            original: original.to_owned(),
        }
    }
}

/// Emphasized prefix length for a cleaned word of `n` characters.
pub fn bold_length(n: usize) -> usize {
    match n {
        0..=3 => 1,
        4..=5 => 2,
        6..=8 => 3,
        // ceil(n * 0.4) without going through floats
        _ => (n * 2).div_ceil(5),
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

pub fn transform_word(token: &str) -> BionicWord {
    if token.trim().is_empty() {
        return BionicWord::blank(token);
    }

    let chars: Vec<char> = token.chars().collect();
    let start = chars
        .iter()
        .position(|c| is_word_char(*c))
        .unwrap_or(chars.len());
    let end = chars
        .iter()
        .rposition(|c| is_word_char(*c))
        .map_or(start, |i| i + 1);

    let leading = &chars[..start];
    let core = &chars[start..end];
    let trailing = &chars[end..];

    let split = bold_length(core.len()).min(core.len());

    let bold = leading.iter().chain(&core[..split]).collect::<String>();
    let normal = core[split..].iter().chain(trailing).collect::<String>();

    BionicWord {
        bold,
        normal,
        original: token.to_owned(),
    }
}

pub fn transform_words<S: AsRef<str>>(words: &[S]) -> Vec<BionicWord> {
    words.iter().map(|w| transform_word(w.as_ref())).collect()
}
