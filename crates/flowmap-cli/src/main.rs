//! Flowmap command-line tool.
//!
//! Provides the `flowmap` binary. Every subcommand loads one catalog snapshot
//! (`--catalog` or `FLOWMAP_CATALOG`) and then either prints an assembled
//! graph (`message`, `service`, `data-product`) as JSON or Mermaid, or lists
//! dangling relationships (`lint`).
//!
//! Exit codes: 0 = success, 1 = lint findings or any error.

use std::process;

use clap::Parser;

use flowmap_cli::{init_logging, run, Cli};

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(report) => {
            println!("{}", report.output);
            if !report.clean {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    }
}
