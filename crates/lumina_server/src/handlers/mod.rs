//! Request handlers, one module per resource.

pub mod backup;
pub mod databases;
pub mod pages;
pub mod public;
pub mod trash;
pub mod workspace;
