use clap::{Parser, ValueEnum};

use a11y_core::{DEFAULT_TIMEOUT_MS, Standard};

#[derive(Parser, Debug)]
#[command(name = "a11y")]
#[command(about = "Audit a web page's accessibility with HTML_CodeSniffer")]
#[command(version)]
pub struct Cli {
    /// Page to audit (scheme defaults to http://)
    pub url: String,

    /// Accessibility standard to audit against
    #[arg(short, long, default_value = "WCAG2AA")]
    pub standard: Standard,

    /// Deadline for the whole audit (ms)
    #[arg(short, long, default_value_t = DEFAULT_TIMEOUT_MS)]
    pub timeout: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "console")]
    pub reporter: ReporterKind,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReporterKind {
    Console,
    Json,
}
