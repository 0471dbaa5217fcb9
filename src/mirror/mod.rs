// Mirror clustering: deciding which same-title URLs are mirrors.
//
// Three independent signals (exact content hash, TF-IDF cosine similarity,
// operator-identifier overlap) are merged per title group through a
// union-find structure; connected components spanning at least two base
// domains become mirror clusters.

pub mod engine;
pub mod summary;
pub mod tfidf;
pub mod unionfind;
