use serde::{Deserialize, Serialize};

/// A single classified category with its normalized score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicScore {
    pub category: String,
    pub score: f64,
}

/// Trait for assigning topic categories to document text.
/// The lexicon classifier is the default; the trait keeps the index builder
/// decoupled so a model-based classifier can be swapped in later.
pub trait TopicClassifier: Send + Sync {
    /// Score the text against each category, descending score order.
    /// Categories with no matches are omitted; the returned scores sum to
    /// 1.0 whenever anything matched.
    fn classify(&self, text: &str) -> Vec<TopicScore>;
}
