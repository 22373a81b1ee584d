use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use intel_hex_crc::{check_file, Error, ScanError, ScanOptions};
use tracing_subscriber::EnvFilter;

/*
Usage:
  hexcrc firmware.hex

  Prints nothing and exits with 0 when every record checksum is right.
  Otherwise prints the first problem to stderr and exits with 1.

 */

/// Verify the checksum of every record in an Intel HEX file.
#[derive(Debug, Parser)]
#[command(name = "hexcrc", version)]
struct Cli {
    /// Intel HEX file to check.
    file: PathBuf,

    /// Also reject a last record that is cut off by the end of the file.
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            // --help and --version are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_logging();

    match try_main(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<ExitCode> {
    let options = ScanOptions {
        reject_unterminated: cli.strict,
    };

    match check_file(&cli.file, options) {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(Error::Scan(e)) => {
            let mut stderr = io::stderr().lock();
            report(&mut stderr, &e).context("failed to write the diagnostic")?;
            Ok(ExitCode::FAILURE)
        }
        Err(e @ Error::ReadFile { .. }) => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e).with_context(|| format!("failed to check {}", cli.file.display())),
    }
}

/// Logs go to stderr and are off unless `RUST_LOG` asks for them.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .try_init();
}

/// Writes the diagnostic for `err`. The offending byte is written as is, which for a
/// checksum failure is the low byte of the record sum rather than a character of the input.
fn report<W: Write>(out: &mut W, err: &ScanError) -> io::Result<()> {
    match (err.position(), err.offending_byte()) {
        (Some(position), Some(input)) => {
            writeln!(out, "ERROR at line {position}: {}", err.message())?;
            out.write_all(b"INVALID INPUT: '")?;
            out.write_all(&[input])?;
            out.write_all(b"'\n")
        }
        (Some(position), None) => writeln!(out, "ERROR at line {position}: {}", err.message()),
        (None, _) => writeln!(out, "ERROR: {}", err.message()),
    }
}
