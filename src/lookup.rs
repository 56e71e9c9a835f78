use log::warn;
use regex::Regex;

/// Strategy seam for picking the first sentence out of a block of
/// extracted encyclopedia text. Any implementation that returns the
/// first substring ending in sentence-final punctuation will do.
pub trait SentenceSplitter {
    fn first_sentence(&self, text: &str) -> Option<String>;
}

/// Regex-backed splitter.
///
/// A sentence ends at '.', '!' or '?' preceded by a word of at least two
/// lowercase letters or a digit and followed by whitespace and a capital,
/// or by the end of the text. That keeps common abbreviations like
/// "z.B." or "St." from terminating the sentence early. The pattern is
/// not linguistically complete; swap the splitter where it falls short.
pub struct AbbreviationTolerantSplitter {
    boundary: Regex,
}

impl AbbreviationTolerantSplitter {
    pub fn new() -> AbbreviationTolerantSplitter {
        let boundary = Regex::new(r"(?s)^\s*(.*?(?:\p{Ll}{2}|\d)[.!?])(?:\s+\p{Lu}|\s*$)");
        AbbreviationTolerantSplitter {
            boundary: boundary.unwrap(),
        }
    }
}

impl Default for AbbreviationTolerantSplitter {
    fn default() -> AbbreviationTolerantSplitter {
        AbbreviationTolerantSplitter::new()
    }
}

impl SentenceSplitter for AbbreviationTolerantSplitter {
    fn first_sentence(&self, text: &str) -> Option<String> {
        self.boundary
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|sentence| sentence.as_str().to_string())
    }
}

/// Resolves the description for a new station.
///
/// When the encyclopedia lookup produced an extract and the splitter
/// finds a sentence in it, that sentence wins; in every other case the
/// user supplied text is kept. A failed lookup never aborts station
/// creation.
pub fn autofill_description<S>(extract: Option<&str>, splitter: &S, fallback: &str) -> String
where
    S: SentenceSplitter,
{
    match extract {
        Some(text) => match splitter.first_sentence(text) {
            Some(sentence) => sentence,
            None => {
                warn!("no sentence boundary in lookup extract, keeping user description");
                fallback.to_string()
            }
        },
        None => {
            warn!("encyclopedia lookup failed, keeping user description");
            fallback.to_string()
        }
    }
}
