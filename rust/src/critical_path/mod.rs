//! Critical path extraction and sub-network analysis.
//!
//! The critical set is every activity with zero free float once the network
//! is scheduled over exactly its minimal duration. When several longest
//! chains exist the set covers all of them; [`Network::critical_chains`]
//! splits it into walkable initial-to-terminal paths.

mod calculation;
mod subnet;
mod types;

pub use types::CriticalPath;
