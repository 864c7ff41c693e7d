//! # mandap-storage
//!
//! Object storage for the Mandap marketplace backend: a bucket-style
//! contract for partner file uploads, plus an in-memory implementation
//! for development and tests.
//!
//! ## Modules
//!
//! - [`object`] - The [`ObjectStorage`] contract
//! - [`memory`] - [`MemoryObjectStorage`]

pub mod memory;
pub mod object;

pub use memory::MemoryObjectStorage;
pub use object::ObjectStorage;
