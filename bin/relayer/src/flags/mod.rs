//! CLI flags shared by every subcommand.

mod globals;
pub(crate) use globals::GlobalArgs;
