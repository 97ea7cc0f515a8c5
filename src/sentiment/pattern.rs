//! Averaged-polarity analyzer.
//!
//! Polarity is the mean of the scored words in the text, each in [-1, 1].
//! An intensifier multiplies the next scored word; a negation flips it
//! and halves it. Both reset at the next scored word or clause boundary.

use super::{is_negation, tokenize, SentimentOracle};

const NEGATION_FACTOR: f64 = -0.5;

#[derive(Debug, Clone, Copy, Default)]
pub struct PatternAnalyzer;

impl SentimentOracle for PatternAnalyzer {
    fn name(&self) -> &'static str {
        "pattern"
    }

    fn polarity(&self, text: &str) -> f64 {
        let mut assessments: Vec<f64> = Vec::new();
        let mut modifier = 1.0;
        let mut negate = false;

        for token in tokenize(text) {
            if is_negation(&token.word) {
                negate = true;
            } else if let Some(intensity) = intensifier(&token.word) {
                modifier *= intensity;
            } else if let Some(polarity) = word_polarity(&token.word) {
                let mut value = (polarity * modifier).clamp(-1.0, 1.0);
                if negate {
                    value *= NEGATION_FACTOR;
                }
                assessments.push(value);
                modifier = 1.0;
                negate = false;
            }

            if token.boundary {
                modifier = 1.0;
                negate = false;
            }
        }

        if assessments.is_empty() {
            return 0.0;
        }
        let mean = assessments.iter().sum::<f64>() / assessments.len() as f64;
        mean.clamp(-1.0, 1.0)
    }
}

fn intensifier(word: &str) -> Option<f64> {
    match word {
        "very" | "highly" => Some(1.3),
        "extremely" | "exceptionally" | "most" => Some(1.5),
        "really" | "truly" => Some(1.2),
        "quite" => Some(1.1),
        "slightly" | "somewhat" => Some(0.7),
        _ => None,
    }
}

fn word_polarity(word: &str) -> Option<f64> {
    let value = match word {
        "amazing" => 0.6,
        "best" => 1.0,
        "better" => 0.5,
        "bright" => 0.7,
        "brilliant" => 0.9,
        "deserving" => 0.3,
        "easy" => 0.43,
        "excellent" => 1.0,
        "exceptional" => 0.67,
        "free" => 0.4,
        "full" => 0.35,
        "generous" => 0.5,
        "good" => 0.7,
        "great" => 0.8,
        "happy" => 0.8,
        "helpful" => 0.5,
        "meritorious" => 0.5,
        "new" => 0.14,
        "outstanding" => 0.5,
        "perfect" => 1.0,
        "promising" => 0.5,
        "remarkable" => 0.75,
        "special" => 0.36,
        "strong" => 0.43,
        "successful" => 0.75,
        "talented" => 0.7,
        "top" => 0.5,
        "wonderful" => 1.0,
        "worthy" => 0.3,

        "bad" => -0.7,
        "difficult" => -0.5,
        "failed" => -0.5,
        "hard" => -0.29,
        "late" => -0.3,
        "limited" => -0.07,
        "low" => -0.15,
        "needy" => -0.3,
        "poor" => -0.4,
        "sad" => -0.5,
        "terrible" => -1.0,
        "weak" => -0.375,
        "worst" => -1.0,
        "wrong" => -0.5,
        _ => return None,
    };
    Some(value)
}
