use std::cmp::Ordering;
use std::collections::HashMap;

use super::similarity_strategy::{HybridStrategy, SimilarityStrategy};
use super::text_normalizer::TextNormalizer;
use crate::modules::search::domain::config::SearchConfig;
use crate::modules::study::Study;
use crate::shared::errors::{AppError, AppResult};

const FIELD_COUNT: usize = 5;

/// One searchable field: lowercased raw values for substring checks and
/// normalized tokens for fuzzy matching
#[derive(Debug, Clone, Default)]
struct FieldText {
    values: Vec<String>,
    tokens: Vec<String>,
}

/// Pre-tokenized view of one study, in field-weight order
#[derive(Debug, Clone)]
pub struct SearchDocument {
    study: Study,
    fields: [FieldText; FIELD_COUNT],
}

impl SearchDocument {
    pub fn study(&self) -> &Study {
        &self.study
    }
}

#[derive(Debug, Clone)]
pub struct PreparedQuery {
    raw: String,
    tokens: Vec<String>,
}

impl PreparedQuery {
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

/// Scores studies against a query with weighted, typo-tolerant field matching
pub struct FuzzyRanker {
    config: SearchConfig,
    normalizer: TextNormalizer,
    strategy: HybridStrategy,
}

impl FuzzyRanker {
    /// Fails with `IndexBuildError` when the configuration is invalid
    pub fn try_new(config: SearchConfig) -> AppResult<Self> {
        config.validate().map_err(AppError::IndexBuildError)?;
        let strategy =
            HybridStrategy::with_weights(config.jaro_winkler_weight, config.levenshtein_weight)
                .map_err(AppError::IndexBuildError)?;
        let normalizer =
            TextNormalizer::default_pipeline(config.stop_words.clone(), config.min_token_length);

        Ok(Self {
            config,
            normalizer,
            strategy,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn prepare(&self, query: &str) -> PreparedQuery {
        PreparedQuery {
            raw: query.trim().to_lowercase(),
            tokens: self.normalizer.tokens(query),
        }
    }

    pub fn document(&self, study: &Study) -> SearchDocument {
        let field = |values: Vec<&str>| FieldText {
            tokens: values
                .iter()
                .flat_map(|value| self.normalizer.tokens(value))
                .collect(),
            values: values.iter().map(|value| value.to_lowercase()).collect(),
        };

        SearchDocument {
            study: study.clone(),
            fields: [
                field(vec![study.title.as_str()]),
                field(study.categories.iter().map(String::as_str).collect()),
                field(vec![study.description.as_str()]),
                field(study.metadata.subjects.iter().map(String::as_str).collect()),
                field(vec![study.organization.as_str()]),
            ],
        }
    }

    /// Weighted sum of field scores. A document with a literal substring
    /// match in any field always scores above zero.
    pub fn score(&self, query: &PreparedQuery, document: &SearchDocument) -> f64 {
        if query.is_empty() {
            return 0.0;
        }

        let mut total = 0.0;
        let mut literal_hit = false;

        for (field, weight) in document.fields.iter().zip(self.config.field_weights()) {
            let field_score = if field.values.iter().any(|v| v.contains(&query.raw)) {
                literal_hit = true;
                1.0
            } else {
                self.fuzzy_field_score(&query.tokens, &field.tokens)
            };
            total += weight * field_score;
        }

        if literal_hit && total <= 0.0 {
            f64::MIN_POSITIVE
        } else {
            total
        }
    }

    /// Mean of the best per-token matches, or 0 if any query token misses
    fn fuzzy_field_score(&self, query_tokens: &[String], field_tokens: &[String]) -> f64 {
        if query_tokens.is_empty() || field_tokens.is_empty() {
            return 0.0;
        }

        let mut sum = 0.0;
        for query_token in query_tokens {
            let best = field_tokens
                .iter()
                .map(|field_token| self.token_similarity(query_token, field_token))
                .fold(0.0_f64, f64::max);

            if best < self.config.fuzzy_threshold {
                return 0.0;
            }
            sum += best;
        }
        sum / query_tokens.len() as f64
    }

    fn token_similarity(&self, query_token: &str, field_token: &str) -> f64 {
        if query_token == field_token || field_token.starts_with(query_token) {
            return 1.0;
        }
        // Short tokens are too ambiguous for approximate matching
        if query_token.chars().count() < self.config.min_fuzzy_token_length {
            return 0.0;
        }
        self.strategy.calculate(query_token, field_token)
    }
}

/// Documents keyed by study id, built once per collection
pub struct FuzzyIndex {
    ranker: FuzzyRanker,
    documents: HashMap<String, SearchDocument>,
}

impl FuzzyIndex {
    pub fn build(config: SearchConfig, studies: &[Study]) -> AppResult<Self> {
        let ranker = FuzzyRanker::try_new(config)?;
        let documents = studies
            .iter()
            .map(|study| (study.id.clone(), ranker.document(study)))
            .collect();

        Ok(Self { ranker, documents })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Rank `studies` against `query`.
    ///
    /// Only studies scoring above zero are returned, best first; equal
    /// scores keep their input order. A study that is not in the index (or
    /// changed since it was indexed) is scored from a fresh document.
    pub fn search(&self, query: &str, studies: &[Study]) -> Vec<Study> {
        let query = self.ranker.prepare(query);
        if query.is_empty() {
            return studies.to_vec();
        }

        let mut scored: Vec<(f64, &Study)> = studies
            .iter()
            .filter_map(|study| {
                let score = match self.documents.get(&study.id) {
                    Some(document) if document.study() == study => {
                        self.ranker.score(&query, document)
                    }
                    _ => self.ranker.score(&query, &self.ranker.document(study)),
                };
                (score > 0.0).then_some((score, study))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(Ordering::Equal));
        scored.into_iter().map(|(_, study)| study.clone()).collect()
    }
}
