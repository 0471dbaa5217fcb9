// Topic classification: lightweight lexicon scoring of page text.

pub mod lexicon;
pub mod traits;
