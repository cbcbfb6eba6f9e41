use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static NON_WORD: LazyLock<Regex> = LazyLock::new(|| {
    // Anything that is not a letter, digit or whitespace separates tokens
    Regex::new(r"[^\p{L}\p{N}\s]+").expect("static regex")
});

/// Transformation that can be applied to searchable text
///
/// Each transformation is composable and testable in isolation.
pub trait TextTransformation: Send + Sync {
    fn transform(&self, text: &str) -> String;
    fn name(&self) -> &'static str;
}

/// Converts text to lowercase
#[derive(Debug, Clone)]
pub struct LowercaseTransform;

impl TextTransformation for LowercaseTransform {
    fn transform(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn name(&self) -> &'static str {
        "Lowercase"
    }
}

/// Replaces punctuation with spaces so "AI-driven" tokenizes as "ai driven"
#[derive(Debug, Clone)]
pub struct SplitPunctuationTransform;

impl TextTransformation for SplitPunctuationTransform {
    fn transform(&self, text: &str) -> String {
        NON_WORD.replace_all(text, " ").into_owned()
    }

    fn name(&self) -> &'static str {
        "SplitPunctuation"
    }
}

/// Normalizes whitespace (collapses multiple spaces, trims)
#[derive(Debug, Clone)]
pub struct NormalizeWhitespaceTransform;

impl TextTransformation for NormalizeWhitespaceTransform {
    fn transform(&self, text: &str) -> String {
        text.split_whitespace().collect::<Vec<&str>>().join(" ")
    }

    fn name(&self) -> &'static str {
        "NormalizeWhitespace"
    }
}

/// Removes stop words and short words
#[derive(Debug, Clone)]
pub struct RemoveStopWordsTransform {
    stop_words: HashSet<String>,
    min_word_length: usize,
}

impl RemoveStopWordsTransform {
    pub fn new(stop_words: Vec<String>, min_word_length: usize) -> Self {
        Self {
            stop_words: stop_words.into_iter().map(|w| w.to_lowercase()).collect(),
            min_word_length,
        }
    }
}

impl TextTransformation for RemoveStopWordsTransform {
    fn transform(&self, text: &str) -> String {
        text.split_whitespace()
            .filter(|word| {
                !self.stop_words.contains(&word.to_lowercase())
                    && word.chars().count() >= self.min_word_length
            })
            .collect::<Vec<&str>>()
            .join(" ")
    }

    fn name(&self) -> &'static str {
        "RemoveStopWords"
    }
}

/// Text normalizer that applies a pipeline of transformations
pub struct TextNormalizer {
    transformations: Vec<Box<dyn TextTransformation>>,
}

impl TextNormalizer {
    /// Create a new empty normalizer
    pub fn new() -> Self {
        Self {
            transformations: Vec::new(),
        }
    }

    /// Lowercase, split punctuation, collapse whitespace, drop stop words
    pub fn default_pipeline(stop_words: Vec<String>, min_word_length: usize) -> Self {
        Self::new()
            .with_lowercase()
            .with_split_punctuation()
            .with_normalize_whitespace()
            .with_remove_stop_words(stop_words, min_word_length)
    }

    pub fn with_lowercase(mut self) -> Self {
        self.transformations.push(Box::new(LowercaseTransform));
        self
    }

    pub fn with_split_punctuation(mut self) -> Self {
        self.transformations.push(Box::new(SplitPunctuationTransform));
        self
    }

    pub fn with_normalize_whitespace(mut self) -> Self {
        self.transformations
            .push(Box::new(NormalizeWhitespaceTransform));
        self
    }

    pub fn with_remove_stop_words(mut self, stop_words: Vec<String>, min_word_length: usize) -> Self {
        self.transformations
            .push(Box::new(RemoveStopWordsTransform::new(
                stop_words,
                min_word_length,
            )));
        self
    }

    /// Apply all transformations to the text
    pub fn normalize(&self, text: &str) -> String {
        let mut result = text.to_string();

        for transformation in &self.transformations {
            result = transformation.transform(&result);
            tracing::trace!("After {}: '{}'", transformation.name(), result);
        }

        result
    }

    /// Normalized text split into tokens
    pub fn tokens(&self, text: &str) -> Vec<String> {
        self.normalize(text)
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

impl Default for TextNormalizer {
    fn default() -> Self {
        Self::new()
    }
}
