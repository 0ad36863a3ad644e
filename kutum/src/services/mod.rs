mod chat;
mod scan;
mod store;

pub use chat::{AnswerSource, ChatOutcome, ChatQuery, ChatService};
pub use scan::DocumentScanService;
pub use store::MemberStore;
