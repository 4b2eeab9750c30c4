pub mod extract;

pub use extract::{FileId, ValidatedJson};
