//! Question answering over a household's family data.
//!
//! Retrieval always runs first ([`KeywordRetriever`]). The ranked members then
//! feed either the LLM path, through [`ContextAssembler`], or the
//! deterministic path in [`rules`].

mod context;
mod retriever;
pub mod rules;

pub use context::ContextAssembler;
pub use retriever::KeywordRetriever;
pub use rules::{generate_rule_based, NO_MATCH_RESPONSE};
