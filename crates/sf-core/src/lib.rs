//! sf-core - Core library for Schemaflow
//!
//! This crate provides the delta catalog, tag and selection types, no-op SQL
//! detection, and project configuration shared by the database layer, the
//! engine and the CLI.

pub mod catalog;
pub mod config;
pub mod delta;
pub mod error;
pub mod noop;
pub mod selection;
pub mod tag;

pub use catalog::DeltaCatalog;
pub use config::{Config, DbType};
pub use delta::{Delta, Direction, PostStatus};
pub use error::{CoreError, CoreResult};
pub use noop::is_no_op;
pub use selection::{RawSelection, Selection};
pub use tag::Tag;
