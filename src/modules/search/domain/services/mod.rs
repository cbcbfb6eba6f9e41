pub mod fallback;
pub mod fuzzy_ranker;
pub mod similarity_strategy;
pub mod text_normalizer;

pub use fallback::substring_search;
pub use fuzzy_ranker::{FuzzyIndex, FuzzyRanker, PreparedQuery, SearchDocument};
pub use similarity_strategy::{
    HybridStrategy, JaroWinklerStrategy, LevenshteinStrategy, SimilarityStrategy,
};
pub use text_normalizer::{
    LowercaseTransform, NormalizeWhitespaceTransform, RemoveStopWordsTransform,
    SplitPunctuationTransform, TextNormalizer, TextTransformation,
};
