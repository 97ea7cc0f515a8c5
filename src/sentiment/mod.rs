//! Sentiment Analysis Module
//!
//! Two lexicon analyzers with different scoring models. The ranker blends
//! both and rescales the averaged polarity into [0, 1].

mod pattern;
mod valence;

pub use pattern::PatternAnalyzer;
pub use valence::ValenceAnalyzer;

/// Score assigned to text with nothing to analyze.
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Anything that turns free text into a polarity in [-1, 1].
pub trait SentimentOracle: Send + Sync {
    fn name(&self) -> &'static str;

    fn polarity(&self, text: &str) -> f64;
}

/// Averages several oracles and maps the result onto [0, 1].
pub struct SentimentBlend {
    oracles: Vec<Box<dyn SentimentOracle>>,
}

impl Default for SentimentBlend {
    fn default() -> Self {
        Self::new(vec![Box::new(ValenceAnalyzer), Box::new(PatternAnalyzer)])
    }
}

impl SentimentBlend {
    pub fn new(oracles: Vec<Box<dyn SentimentOracle>>) -> Self {
        Self { oracles }
    }

    pub fn score(&self, text: &str) -> f64 {
        let text = text.trim();
        if text.is_empty() || self.oracles.is_empty() {
            return NEUTRAL_SCORE;
        }
        let total: f64 = self
            .oracles
            .iter()
            .map(|o| {
                let polarity = o.polarity(text).clamp(-1.0, 1.0);
                tracing::trace!(oracle = o.name(), polarity, "sentiment");
                polarity
            })
            .sum();
        let average = total / self.oracles.len() as f64;
        ((average + 1.0) / 2.0).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub word: String,
    /// Raw token ended a clause (`.`, `,`, `;`, `:`, `!`, `?`).
    pub boundary: bool,
}

pub(crate) fn tokenize(text: &str) -> Vec<Token> {
    text.split_whitespace()
        .filter_map(|raw| {
            let word = raw
                .trim_matches(|c: char| !c.is_alphanumeric() && c != '\'')
                .trim_matches('\'')
                .to_lowercase();
            let boundary = raw.ends_with(['.', ',', ';', ':', '!', '?']);
            if word.is_empty() {
                None
            } else {
                Some(Token { word, boundary })
            }
        })
        .collect()
}

pub(crate) fn is_negation(word: &str) -> bool {
    matches!(
        word,
        "not" | "no" | "never" | "none" | "nor" | "neither" | "without" | "cannot" | "nothing"
    ) || word.ends_with("n't")
}
