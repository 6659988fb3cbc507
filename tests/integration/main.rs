//! Integration tests: full dataset builds against an in-memory wiki and
//! a temporary snapshot corpus.

mod fake_wiki;
mod pipeline;
