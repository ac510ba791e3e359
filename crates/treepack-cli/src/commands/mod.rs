//! Command implementations.

pub mod pack;
