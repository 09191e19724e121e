// src/document/mod.rs
mod path;
mod path_set;
mod tooltip;

pub use self::path::{AddOutcome, Path, PathState, Preview};
pub use self::path_set::{FinalizeOutcome, PathSet, VertexRef};
pub use self::tooltip::Tooltip;
