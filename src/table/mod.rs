//! Dynamic table — client-side filter/sort/paginate/select over
//! already-fetched records, with schema-driven column resolution.
//!
//! The table performs no network I/O; bulk actions hand the selected
//! full records back to the owning screen.

pub mod bulk;
pub mod columns;
pub mod state;

pub use bulk::*;
pub use columns::*;
pub use state::*;
