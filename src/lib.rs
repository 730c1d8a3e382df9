pub mod autosave;
pub mod config;
pub mod editor;
pub mod error;
pub mod events;
pub mod models;
pub mod preview;
pub mod repository;
pub mod session;
pub mod storage;
pub mod studio;

pub use error::{Error, Result};
pub use studio::{SharedStudio, Studio};
