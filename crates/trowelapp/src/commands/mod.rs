//! # Command Layer
//!
//! The business logic of the find lifecycle, one operation per module, as
//! pure functions over the store traits. Commands return typed results and
//! typed failures; they never print, prompt, or exit. The UI layer decides
//! what any of it looks like.
//!
//! Failure policy (per operation docs):
//! - validation and conflict errors (`Validation`, `DuplicateId`,
//!   `FindNotFound`) are resolved here with NO store mutation;
//! - storage failures propagate as the failure of the enclosing operation;
//! - a missing blob on read is degraded data, not an error.
//!
//! This is where the lion's share of testing lives, against the in-memory
//! stores.

pub mod delete;
pub mod export;
pub mod get;
pub mod import;
pub mod list;
pub mod save;
