//! Page/block/database domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by core business logic.
//! - Keep the wire shape (camelCase JSON) next to the types that own it.
//!
//! # Invariants
//! - Every page, block, property, option and view has a stable string id.
//! - Deletion is represented by a `deleted_at` tombstone until purged.

pub mod block;
pub mod page;
pub mod property;
pub mod view;
pub mod workspace;
