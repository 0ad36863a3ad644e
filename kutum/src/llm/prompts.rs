//! Prompt templates for the model-backed features.
//!
//! Templates use plain `format!()` interpolation.

/// System prompt for family-assistant chat answers.
pub const ASSISTANT_SYSTEM_PROMPT: &str = "You are a helpful family management assistant. \
You have access to comprehensive information about the user's family, including: family members, documents, vehicles, health records, reminders, and activities. \
Answer questions accurately based on the provided data. \
Be friendly, concise, and helpful. \
If specific information is not available, say so politely. \
You can answer questions about counts, specifics, relationships, and provide summaries.";

/// System prompt for reading an expiry date off a document image.
pub const EXPIRY_SYSTEM_PROMPT: &str = "You are a document analysis expert. \
Extract ONLY the expiry date, expiration date, valid until date, or validity date from documents. \
Return ONLY the date in YYYY-MM-DD format. \
If no expiry date is found, return 'NO_DATE_FOUND'.";

/// User instruction sent alongside the document image.
pub const EXPIRY_USER_PROMPT: &str = "Extract the expiry date, expiration date, or valid until date from this document. \
Return ONLY the date in YYYY-MM-DD format, nothing else. \
If there's no expiry date visible, return 'NO_DATE_FOUND'.";

/// User message for a chat answer: the assembled context, a blank line, then
/// the question.
///
/// # Example
/// ```
/// use kutum::llm::prompts::chat_user_prompt;
///
/// let prompt = chat_user_prompt("=== FAMILY MEMBERS ===\n- Raj (Son)", "Who is Raj?");
/// assert!(prompt.ends_with("\n\nQuestion: Who is Raj?"));
/// ```
pub fn chat_user_prompt(context: &str, query: &str) -> String {
    format!("{context}\n\nQuestion: {query}")
}
