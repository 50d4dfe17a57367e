//! CLI domain: parse, route, help, output, and presentation only.
//! No merge logic here; the route table dispatches to the merger, the policy and the settings store.

mod help;
mod output;
mod parse;
mod presentation;
mod route;

pub use help::command_name;
pub use output::map_error;
pub use parse::{Cli, Commands, ConfigCommands};
pub use presentation::{format_branches, format_merge_outcome, format_settings};
pub use route::RunContext;
