//! Versioned save/restore with a checksummed envelope and a backup slot.

pub mod save_data;
pub mod save_manager;
pub mod store;

pub use save_data::SaveData;
pub use save_manager::{decode, encode, LoadOutcome, LoadSource, SaveManager};
pub use store::{FileStore, MemoryStore, SaveStore};

use thiserror::Error;

/// Errors that can occur while reading or writing a save slot.
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("save storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid save magic: expected 0x{expected:016X}, found 0x{found:016X}")]
    BadMagic { expected: u64, found: u64 },

    #[error("save data truncated: needed {needed} bytes, had {available}")]
    Truncated { needed: usize, available: usize },

    #[error("save checksum verification failed")]
    Checksum,

    #[error("save payload could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("save payload is missing root field `{0}`")]
    MissingRoot(&'static str),
}
