//! Core traits implemented by repository backends.

mod connection;
mod project;
mod workspace;

pub use connection::*;
pub use project::*;
pub use workspace::*;
