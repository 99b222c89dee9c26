use std::time::Duration;

use clap::Parser;
use tracing::error;

use a11y_cli::cli::{Cli, ReporterKind};
use a11y_cli::reporters::{ConsoleReporter, JsonReporter};
use a11y_cli::{logging, url};
use a11y_core::{AuditOptions, run_audit};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let target = match url::sanitize(&cli.url) {
        Ok(parsed) => url::with_standard(parsed, cli.standard),
        Err(err) => {
            error!(target = "a11y", error = %err, "invalid URL");
            std::process::exit(1);
        }
    };

    let opts = AuditOptions {
        url: String::from(target),
        standard: cli.standard,
        timeout: Duration::from_millis(cli.timeout),
    };

    let code = match cli.reporter {
        ReporterKind::Console => {
            let mut reporter = ConsoleReporter::new();
            let outcome = run_audit(opts, &mut reporter).await;
            exit_code(outcome.is_ok(), reporter.error_count())
        }
        ReporterKind::Json => {
            let mut reporter = JsonReporter::new();
            let outcome = run_audit(opts, &mut reporter).await;
            exit_code(outcome.is_ok(), reporter.error_count())
        }
    };

    std::process::exit(code);
}

// 0 clean, 1 the audit itself failed, 2 it completed but found errors.
fn exit_code(succeeded: bool, errors: usize) -> i32 {
    if !succeeded {
        1
    } else if errors > 0 {
        2
    } else {
        0
    }
}
