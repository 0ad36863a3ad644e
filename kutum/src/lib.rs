//! Family-management assistant service.
//!
//! Questions about a household are answered by ranking its members with a
//! keyword scorer, then asking a language model with an assembled context or,
//! when no model is available, by fixed rules. Uploaded document images are
//! read by a vision model for their expiry date.

pub mod api;
pub mod assistant;
pub mod config;
pub mod error;
pub mod expiry;
pub mod llm;
pub mod models;
pub mod services;
pub mod vision;
