//! Static schema model: descriptors built once and shared for the life of
//! the process.

pub mod field;
pub mod message;
pub mod registry;
