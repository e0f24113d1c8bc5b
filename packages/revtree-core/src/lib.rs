#![forbid(unsafe_code)]
//! Revision history of a single text document kept as a forest of immutable, patch-based
//! versions.
//! The manager picks a deterministic main branch across divergent leaves and rebuilds the
//! document text for any branch by replaying patches from its root.

pub mod compile;
pub mod error;
pub mod ids;
pub mod manager;
pub mod patch;
pub mod traits;
pub mod version;

pub use compile::compile_text;
pub use error::{Error, Result};
pub use ids::{Timestamp, VersionId};
pub use manager::VersionManager;
pub use patch::{
    apply_patches, apply_patches_lenient, make_patch, make_patch_with, Hunk, Patch,
    PatchApplication, PatchConfig,
};
#[cfg(feature = "system")]
pub use traits::SystemSource;
pub use traits::{SequentialSource, VersionSource};
#[cfg(feature = "system")]
pub use version::new_version;
pub use version::{new_version_with, Version};
