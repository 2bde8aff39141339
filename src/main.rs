mod bench;
mod buffer;
mod config;
mod pattern;
mod report;

use std::io::{self, Write};

use anyhow::Result;
use env_logger::Env;
use log::{debug, info};

use crate::bench::{memory_latency_read, memory_latency_write, Access};
use crate::config::{parse_args, Invocation};

fn main() -> Result<()> {
    // Log level from RUST_LOG, e.g. RUST_LOG=memlat=debug ./memlat 256 16
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let stdout = io::stdout();
    run(&args, &mut stdout.lock())
}

/// Whole program after logger setup. An `Err` here becomes a nonzero exit.
fn run<S: AsRef<str>>(args: &[S], out: &mut impl Write) -> Result<()> {
    let config = match parse_args(args)? {
        Invocation::Usage => {
            report::usage(out)?;
            return Ok(());
        }
        Invocation::Run(config) => config,
    };
    info!(
        "resolved {} MiB memory, {} MiB disk, {}% intensity",
        config.mem_mib, config.disk_mib, config.intensity
    );
    debug!("{} iterations per benchmark", config.iterations());
    debug!("disk parameter: {} bytes, not measured", config.disk_bytes());
    report::config(out, &config)?;

    report::header(out, Access::Read)?;
    out.flush()?;
    let read = memory_latency_read(&config)?;
    report::sample(out, Access::Read, &read.sample)?;

    report::header(out, Access::Write)?;
    out.flush()?;
    let write = memory_latency_write(&config)?;
    report::sample(out, Access::Write, &write)?;

    report::discard(out, read.discard)?;
    Ok(())
}
