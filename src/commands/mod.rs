//! CLI subcommands

pub mod delete;
pub mod list;
pub mod new;
