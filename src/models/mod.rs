//! Domain models for the studio core.
//!
//! # Core Concepts
//!
//! ## Persisted Entities
//!
//! - [`Project`]: A user's saved unit of work: ordered content plus platform settings.
//! - [`Element`]: A content block (quiz, header, ...) inside a project.
//! - [`RecentList`]: Bounded, deduplicated list of most-recently-used project ids.
//!
//! ## Runtime State
//!
//! These are never written to storage:
//!
//! - [`SessionState`]: Whether a project is open and whether it has unsaved changes.
//! - [`StudioEvent`]: Notifications published to collaborators.
//! - [`PreviewMode`]: Device frame used when previewing.

mod element;
mod event;
mod preview;
mod project;
mod recent;
mod session;

pub use element::*;
pub use event::*;
pub use preview::*;
pub use project::*;
pub use recent::*;
pub use session::*;
