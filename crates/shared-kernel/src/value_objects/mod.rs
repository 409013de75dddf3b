// crates/shared-kernel/src/value_objects/mod.rs
pub mod counts;
pub mod percentage;
pub mod source_path;

pub use counts::{FunctionCount, LineCount};
pub use percentage::Percentage;
pub use source_path::SourcePath;
