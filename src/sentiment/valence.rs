//! Valence-sum analyzer.
//!
//! Each lexicon word carries a valence in [-4, 4]. Boosters and negations in
//! the three preceding words adjust it, "but" shifts weight to the second
//! clause, and the sum is squashed into [-1, 1].

use super::{is_negation, tokenize, SentimentOracle};

const BOOSTER_INCREMENT: f64 = 0.293;
const NEGATION_SCALAR: f64 = -0.74;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const NORMALIZATION_ALPHA: f64 = 15.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct ValenceAnalyzer;

impl SentimentOracle for ValenceAnalyzer {
    fn name(&self) -> &'static str {
        "valence"
    }

    fn polarity(&self, text: &str) -> f64 {
        let words: Vec<String> = tokenize(text).into_iter().map(|t| t.word).collect();
        let mut sentiments = Vec::with_capacity(words.len());

        for (i, word) in words.iter().enumerate() {
            let Some(mut value) = word_valence(word) else {
                sentiments.push(0.0);
                continue;
            };

            let mut negated = false;
            for (distance, scale) in [(1, 1.0), (2, 0.95), (3, 0.9)] {
                let Some(prev) = i.checked_sub(distance).and_then(|j| words.get(j)) else {
                    break;
                };
                if let Some(boost) = booster(prev) {
                    let boost = if value < 0.0 { -boost } else { boost };
                    value += boost * scale;
                }
                negated |= is_negation(prev);
            }
            if negated {
                value *= NEGATION_SCALAR;
            }
            sentiments.push(value);
        }

        if let Some(pivot) = words.iter().position(|w| w == "but") {
            for (i, s) in sentiments.iter_mut().enumerate() {
                if i < pivot {
                    *s *= 0.5;
                } else if i > pivot {
                    *s *= 1.5;
                }
            }
        }

        let mut sum: f64 = sentiments.iter().sum();
        if sum == 0.0 {
            return 0.0;
        }

        let bangs = text.matches('!').count().min(MAX_EXCLAMATIONS) as f64 * EXCLAMATION_INCREMENT;
        sum += if sum > 0.0 { bangs } else { -bangs };

        normalize(sum)
    }
}

fn normalize(score: f64) -> f64 {
    (score / (score * score + NORMALIZATION_ALPHA).sqrt()).clamp(-1.0, 1.0)
}

fn booster(word: &str) -> Option<f64> {
    match word {
        "very" | "extremely" | "highly" | "really" | "most" | "fully" | "completely" | "totally"
        | "exceptionally" | "truly" | "especially" => Some(BOOSTER_INCREMENT),
        "slightly" | "somewhat" | "barely" | "partially" | "marginally" | "hardly" => {
            Some(-BOOSTER_INCREMENT)
        }
        _ => None,
    }
}

fn word_valence(word: &str) -> Option<f64> {
    let value = match word {
        "achieve" => 1.3,
        "achievement" | "achievements" => 2.0,
        "award" => 2.5,
        "awarded" => 1.7,
        "benefit" => 2.0,
        "benefits" => 1.6,
        "best" => 3.2,
        "better" => 1.9,
        "bright" => 1.9,
        "brilliant" => 2.8,
        "encourage" => 2.3,
        "encourages" | "encouraged" => 1.9,
        "empower" => 1.6,
        "empowering" => 1.9,
        "excellence" => 3.1,
        "excellent" => 2.7,
        "exceptional" => 1.5,
        "free" => 2.3,
        "generous" => 2.3,
        "good" => 1.9,
        "great" => 3.1,
        "happy" => 2.7,
        "help" => 1.7,
        "helpful" => 1.8,
        "honor" | "honour" => 2.2,
        "hope" => 1.9,
        "inspiring" => 2.4,
        "love" => 3.2,
        "opportunity" => 1.8,
        "opportunities" => 1.6,
        "outstanding" => 3.0,
        "prize" => 2.3,
        "promising" => 1.7,
        "proud" => 2.1,
        "reward" => 2.7,
        "rewarding" => 2.4,
        "secure" => 1.4,
        "special" => 1.7,
        "strong" => 2.3,
        "success" => 2.7,
        "successful" => 2.8,
        "support" => 1.7,
        "supports" | "supported" => 1.5,
        "talented" => 2.3,
        "top" => 0.8,
        "welcome" => 2.0,
        "win" => 2.8,
        "winner" | "winners" => 2.8,

        "bad" => -2.5,
        "crisis" => -3.1,
        "denied" => -1.9,
        "difficult" => -1.5,
        "fail" => -2.5,
        "failed" => -2.3,
        "failure" => -2.3,
        "hard" => -0.4,
        "hardship" => -1.6,
        "lack" => -1.3,
        "late" => -0.8,
        "limited" => -0.9,
        "loss" => -1.3,
        "low" => -1.1,
        "needy" => -1.4,
        "penalty" => -2.0,
        "poor" => -2.1,
        "poverty" => -2.3,
        "problem" | "problems" => -1.7,
        "reject" => -1.7,
        "rejected" => -2.3,
        "risk" => -1.1,
        "sad" => -2.1,
        "struggling" => -1.8,
        "unfortunately" => -1.6,
        "worst" => -3.1,
        _ => return None,
    };
    Some(value)
}
