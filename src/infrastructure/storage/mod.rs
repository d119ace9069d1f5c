//! Storage - runtime secrets and on-disk artifacts

pub mod env_file;
pub mod files;
pub mod keys;

pub use env_file::EnvFile;
pub use files::AudioStore;
pub use keys::KeyStore;
