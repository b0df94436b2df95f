//! Frame Adapter - stdin to stdout analysis filter
//!
//! Reads one JSON document from standard input, writes one line of JSON to
//! standard output and exits with 0 on success, 1 on any failure.

use std::io::{self, Read};

use clap::Parser;
use log::error;

use frame_adapter::adapter::Adapter;
use frame_adapter::analysis::AnalysisOptions;
use frame_adapter::error::AdapterError;

#[derive(Parser)]
#[command(name = "frame-adapter")]
#[command(about = "Linear static analysis of a planar frame: JSON on stdin, displacements on stdout", long_about = None)]
struct Cli {
    /// Fail on element or load types that are not supported instead of skipping them
    #[arg(long)]
    strict: bool,

    /// Recover element end forces into "elementForces"
    #[arg(long)]
    element_forces: bool,

    /// Add "kind" and "details" to error documents
    #[arg(long)]
    error_detail: bool,
}

impl Cli {
    fn adapter(&self) -> Adapter {
        let mut options = AnalysisOptions::linear();
        if self.strict {
            options = options.strict();
        }
        if self.element_forces {
            options = options.with_element_forces();
        }
        Adapter::new(options).with_error_detail(self.error_detail)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let adapter = cli.adapter();

    let mut body = String::new();
    let (line, code) = match io::stdin().read_to_string(&mut body) {
        Ok(_) => adapter.respond(&body),
        Err(e) => {
            let err = AdapterError::Io(e);
            error!("failed to read standard input: {}", err);
            let line = serde_json::to_string(&adapter.error_response(&err))
                .unwrap_or_else(|_| r#"{"error":"Internal error"}"#.to_string());
            (line, 1)
        }
    };

    println!("{}", line);
    std::process::exit(code);
}
