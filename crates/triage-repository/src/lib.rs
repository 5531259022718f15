//! Collaborator layer for the triage engine
//!
//! The traversal engine performs no I/O. Everything it needs from the outside
//! world is expressed as async traits in this crate and injected by the SDK:
//!
//! - **Session store**: the current session of each subject
//! - **Subject directory**: age and category used for tree selection
//! - **Outcome sink**: finished assessments with their treatment plan
//! - **Tree repository**: tree documents loaded at startup
//!
//! In-memory implementations are provided for all four, plus file system
//! implementations for sessions (JSON per subject) and trees (YAML / JSON).
//!
//! # Quick Start
//!
//! ```no_run
//! use triage_repository::{FileSystemTreeRepository, TreeRepository};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let repo = FileSystemTreeRepository::new("trees")?;
//!
//!     for (path, content) in repo.load_all().await? {
//!         println!("{}: {} bytes", path, content.len());
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod file_system;
pub mod memory;
pub mod models;
pub mod traits;

// Re-exports - Error
pub use error::{RepositoryError, RepositoryResult};

// Re-exports - Implementations
pub use file_system::{FileSystemSessionStore, FileSystemTreeRepository};
pub use memory::{InMemoryOutcomeSink, InMemorySessionStore, InMemorySubjectDirectory};

pub use models::*;
pub use traits::*;
