pub mod chat;
pub mod documents;
pub mod members;
pub mod root;

pub use chat::chat;
pub use documents::{check_expiring_documents, scan_document};
pub use members::update_members;
pub use root::{health_check, root};

/// Local time in ISO-8601 with microseconds and no offset.
pub(crate) fn iso_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}
