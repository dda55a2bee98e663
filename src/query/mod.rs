//! Query execution and the read-only guard.

pub mod executor;
pub mod guard;

pub use executor::{execute, execute_or_empty, QueryOutput};
pub use guard::ensure_read_only;
