//! Filesystem primitives for Mirror Sync
//!
//! Provides normalized path handling, streaming checksums, atomic report
//! writes, metadata-preserving copies, and recursive tree walking.

pub mod checksum;
pub mod error;
pub mod io;
pub mod path;
pub mod walk;

pub use checksum::{FileHasher, StreamingSha256};
pub use error::{Error, Result};
pub use path::NormalizedPath;
pub use walk::{WalkedFile, walk_files};
