pub mod grants;
pub mod retrieval;

pub use grants::AuthorizedSet;
pub use retrieval::{Candidate, Document, GroundedPassage};
