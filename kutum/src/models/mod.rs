mod member;
mod snapshot;

pub use member::*;
pub use snapshot::*;
