use strsim::{jaro_winkler, normalized_levenshtein};

/// Strategy for calculating similarity between two tokens
///
/// Returns a value between 0.0 (completely different) and 1.0 (identical).
pub trait SimilarityStrategy: Send + Sync {
    fn calculate(&self, query: &str, target: &str) -> f64;

    /// Get the name of this strategy for logging/debugging
    fn name(&self) -> &'static str;
}

/// Jaro-Winkler similarity strategy
///
/// Gives more weight to matching prefixes, so partially typed words score well.
#[derive(Debug, Clone)]
pub struct JaroWinklerStrategy;

impl SimilarityStrategy for JaroWinklerStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        jaro_winkler(query, target)
    }

    fn name(&self) -> &'static str {
        "JaroWinkler"
    }
}

/// Normalized Levenshtein similarity strategy
///
/// Good for detecting typos and character-level differences.
#[derive(Debug, Clone)]
pub struct LevenshteinStrategy;

impl SimilarityStrategy for LevenshteinStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        normalized_levenshtein(query, target)
    }

    fn name(&self) -> &'static str {
        "Levenshtein"
    }
}

/// Weighted average of several strategies
pub struct HybridStrategy {
    strategies: Vec<(Box<dyn SimilarityStrategy>, f64)>,
}

impl HybridStrategy {
    /// Weights must sum to approximately 1.0
    pub fn try_new(strategies: Vec<(Box<dyn SimilarityStrategy>, f64)>) -> Result<Self, String> {
        let weight_sum: f64 = strategies.iter().map(|(_, w)| w).sum();
        if (weight_sum - 1.0).abs() >= 0.01 {
            return Err(format!(
                "Strategy weights must sum to 1.0, got {}",
                weight_sum
            ));
        }
        Ok(Self { strategies })
    }

    pub fn with_weights(jaro_winkler_weight: f64, levenshtein_weight: f64) -> Result<Self, String> {
        Self::try_new(vec![
            (Box::new(JaroWinklerStrategy), jaro_winkler_weight),
            (Box::new(LevenshteinStrategy), levenshtein_weight),
        ])
    }
}

impl SimilarityStrategy for HybridStrategy {
    fn calculate(&self, query: &str, target: &str) -> f64 {
        self.strategies
            .iter()
            .map(|(strategy, weight)| strategy.calculate(query, target) * weight)
            .sum()
    }

    fn name(&self) -> &'static str {
        "Hybrid"
    }
}
