pub mod document;

pub use document::{content_hash, DocFormat, DocumentRole};
