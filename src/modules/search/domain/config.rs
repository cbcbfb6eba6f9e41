/// Configuration for the study search index
///
/// Field weights decide ranking; the similarity weights and threshold decide
/// how tolerant token matching is. An invalid configuration makes the index
/// build fail, which puts search into substring-fallback mode.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    // Field weights, highest to lowest
    pub title_weight: f64,
    pub categories_weight: f64,
    pub description_weight: f64,
    pub subjects_weight: f64,
    pub organization_weight: f64,

    // Fuzzy matching configuration
    /// Weight for Jaro-Winkler similarity (0.0 to 1.0)
    pub jaro_winkler_weight: f64,

    /// Weight for Levenshtein similarity (0.0 to 1.0)
    pub levenshtein_weight: f64,

    /// Minimum token similarity that counts as a match (0.0, 1.0]
    pub fuzzy_threshold: f64,

    /// Query tokens shorter than this must match a field token exactly
    pub min_fuzzy_token_length: usize,

    // Text normalization rules
    /// Stop words dropped from query and document tokens
    pub stop_words: Vec<String>,

    /// Minimum token length to keep during normalization
    pub min_token_length: usize,
}

impl SearchConfig {
    /// Creates a new configuration with sensible production defaults
    pub fn new() -> Self {
        Self {
            title_weight: 0.35,
            categories_weight: 0.25,
            description_weight: 0.20,
            subjects_weight: 0.12,
            organization_weight: 0.08,

            // Jaro-Winkler favours shared prefixes, which suits partial words
            jaro_winkler_weight: 0.7,
            levenshtein_weight: 0.3,
            fuzzy_threshold: 0.78,
            min_fuzzy_token_length: 4,

            stop_words: ["the", "a", "an", "and", "of", "in", "on", "for", "to"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            min_token_length: 2,
        }
    }

    pub fn field_weights(&self) -> [f64; 5] {
        [
            self.title_weight,
            self.categories_weight,
            self.description_weight,
            self.subjects_weight,
            self.organization_weight,
        ]
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<(), String> {
        let field_weights = self.field_weights();
        if field_weights.iter().any(|w| *w < 0.0) {
            return Err("Field weights must be non-negative".to_string());
        }
        let field_sum: f64 = field_weights.iter().sum();
        if (field_sum - 1.0).abs() > 0.01 {
            return Err(format!("Field weights must sum to 1.0, got {}", field_sum));
        }

        // Validate weights are non-negative
        if self.jaro_winkler_weight < 0.0 || self.levenshtein_weight < 0.0 {
            return Err("Fuzzy matching weights must be non-negative".to_string());
        }
        let weight_sum = self.jaro_winkler_weight + self.levenshtein_weight;
        if (weight_sum - 1.0).abs() > 0.01 {
            return Err(format!(
                "Fuzzy matching weights must sum to 1.0, got {}",
                weight_sum
            ));
        }

        if !(self.fuzzy_threshold > 0.0 && self.fuzzy_threshold <= 1.0) {
            return Err(format!(
                "fuzzy_threshold must be in (0, 1], got {}",
                self.fuzzy_threshold
            ));
        }

        if self.min_token_length == 0 {
            return Err("min_token_length must be > 0".to_string());
        }

        Ok(())
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for SearchConfig to make test setup easier
#[derive(Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: SearchConfig::new(),
        }
    }

    pub fn field_weights(
        mut self,
        title: f64,
        categories: f64,
        description: f64,
        subjects: f64,
        organization: f64,
    ) -> Self {
        self.config.title_weight = title;
        self.config.categories_weight = categories;
        self.config.description_weight = description;
        self.config.subjects_weight = subjects;
        self.config.organization_weight = organization;
        self
    }

    pub fn jaro_winkler_weight(mut self, weight: f64) -> Self {
        self.config.jaro_winkler_weight = weight;
        self
    }

    pub fn levenshtein_weight(mut self, weight: f64) -> Self {
        self.config.levenshtein_weight = weight;
        self
    }

    pub fn fuzzy_threshold(mut self, threshold: f64) -> Self {
        self.config.fuzzy_threshold = threshold;
        self
    }

    pub fn stop_words(mut self, words: Vec<String>) -> Self {
        self.config.stop_words = words;
        self
    }

    pub fn min_token_length(mut self, length: usize) -> Self {
        self.config.min_token_length = length;
        self
    }

    /// Skips validation; an invalid config surfaces as an index build error
    pub fn build_unchecked(self) -> SearchConfig {
        self.config
    }

    pub fn build(self) -> Result<SearchConfig, String> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SearchConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_field_weights_descend_from_title() {
        let weights = SearchConfig::default().field_weights();
        assert!(weights.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_weights_must_sum_to_one() {
        let config = SearchConfigBuilder::new()
            .jaro_winkler_weight(0.5)
            .levenshtein_weight(0.3)
            .build();

        assert!(config.is_err());
        assert!(config.unwrap_err().contains("must sum to 1.0"));
    }

    #[test]
    fn test_field_weights_must_sum_to_one() {
        let config = SearchConfigBuilder::new()
            .field_weights(0.5, 0.5, 0.5, 0.0, 0.0)
            .build();
        assert!(config.unwrap_err().contains("Field weights"));
    }

    #[test]
    fn test_threshold_range() {
        assert!(SearchConfigBuilder::new().fuzzy_threshold(0.0).build().is_err());
        assert!(SearchConfigBuilder::new().fuzzy_threshold(1.5).build().is_err());
        assert!(SearchConfigBuilder::new().fuzzy_threshold(1.0).build().is_ok());
    }
}
