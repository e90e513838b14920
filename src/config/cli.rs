use clap::Parser;
use std::ffi::OsString;

/// The launcher has no options of its own; every argument, `--help`
/// included, belongs to the launched server.
#[derive(Debug, Clone, Parser)]
#[command(name = "seo-analytics-launcher")]
#[command(about = "Bootstraps and launches the seo-analytics-mcp server")]
#[command(disable_help_flag = true, disable_version_flag = true)]
pub struct Args {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, num_args = 0..)]
    pub forwarded: Vec<OsString>,
}
