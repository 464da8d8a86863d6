use anyhow::Result;

// Public modules
pub mod archive;
pub mod asset;
pub mod cli;
pub mod config;
pub mod detect;
pub mod download;
pub mod install;
pub mod models;
pub mod release;
pub mod select;

// Re-export commonly used types
pub use asset::{Asset, CpuType, Os, PackageManager};
pub use detect::SystemProfile;
pub use select::{SelectionResult, select_asset};
pub use anyhow::{Context, Result as AnyhowResult};

// Common type aliases
pub type RelgetResult<T> = Result<T>;
