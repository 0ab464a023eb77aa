//! CLI command implementations

pub mod aggregate;
pub mod completions;
pub mod context;
pub mod export;
pub mod init;
pub mod kb;
pub mod register;
pub mod select;
pub mod validate;
