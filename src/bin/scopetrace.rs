use anyhow::Result;
use clap::Parser;
use std::io::IsTerminal;

use scopetrace::cli::args::CliArgs;
use scopetrace::cli::driver;

fn main() -> Result<()> {
    // SCOPETRACE_LOG / SCOPETRACE_LOG_FORMAT (see src/tracing_config.rs)
    scopetrace::tracing_config::init_tracing();

    let args = CliArgs::parse();
    let color = !args.no_color && std::io::stdout().is_terminal();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = driver::run(&args, color, &mut out)?;
    drop(out);

    std::process::exit(code);
}
