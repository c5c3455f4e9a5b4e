//! Resource definitions.
//!
//! Each module declares a schema and thin wrappers over [`crate::request`].

pub mod customer;
pub mod file;
pub mod token;
