//! Read models derived from the normalized resource list.

pub mod dashboard;
pub mod directory;
pub mod interviews;
pub mod requirements;
pub mod soft_blocks;
pub mod weekly;
