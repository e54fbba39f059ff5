//! photoscan - duplicate photo and video finder
//!
//! Entry point for the photoscan CLI application.

use clap::Parser;
use photoscan::{
    cli::Cli,
    error::{is_prompt_failure, ExitCode, StructuredError},
};

fn main() {
    let cli = Cli::parse();
    let json_errors = cli.json_errors;

    match photoscan::run_app(cli) {
        Ok(code) => std::process::exit(code.as_i32()),
        Err(err) => {
            let exit_code = ExitCode::for_error(&err);

            if json_errors {
                let structured = StructuredError::new(&err, exit_code);
                if let Ok(json) = serde_json::to_string_pretty(&structured) {
                    eprintln!("{json}");
                } else {
                    eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                }
            } else {
                eprintln!("[{}] Error: {:#}", exit_code.code_prefix(), err);
                if is_prompt_failure(&err) {
                    eprintln!(
                        "hint: dedup needs an interactive terminal; use --json to list duplicates"
                    );
                }
            }

            std::process::exit(exit_code.as_i32());
        }
    }
}
