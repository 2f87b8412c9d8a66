//! Core types for verso.

mod options;
mod resource;
mod search;
mod version;

pub use options::*;
pub use resource::*;
pub use search::*;
pub use version::*;
