//! Core engine: registry build, then filter → parse → resolve over the corpus.

pub mod builder;
pub mod filter;
