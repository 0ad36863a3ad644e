//! Vision-model access for reading document images.
//!
//! The provider talks to any OpenAI-compatible `chat/completions` endpoint
//! that accepts `image_url` content parts carrying a base64 data URL.
//!
//! ```rust,ignore
//! let vision = VisionProvider::new(config.vision.as_ref());
//! let reply = vision.extract(&image_bytes, system_prompt, user_prompt).await?;
//! ```

mod api;
mod provider;

pub use api::{detect_mime_type, OpenAiVisionClient};
pub use provider::VisionProvider;
