//! Message handling - Turning raw requests into messages

pub mod parser;
pub mod rate_limit;

pub use parser::{allowed_file, secure_filename, MessageParser, Payload, Upload};
pub use rate_limit::{RateLimited, RateLimiter};
