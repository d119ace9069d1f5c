//! Domain entities - Core business objects with no external dependencies

pub mod message;
pub mod reply;

pub use message::{Message, Content};
pub use reply::Reply;
