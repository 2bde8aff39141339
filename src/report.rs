use std::io::{self, Write};

use crate::bench::{Access, Sample};
use crate::config::RunConfig;

pub const USAGE: &str = "\
Usage: memlat <memUsageMiB> <diskUsageMiB> [<timeFactor>]
       where <memUsage> and <diskUsage> are in Mebibytes
       and timeFactor is in percent of the normal runtime.";

pub fn usage(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", USAGE)?;
    writeln!(out)
}

/// Echoes the resolved values so clamping is visible to the user.
pub fn config(out: &mut impl Write, config: &RunConfig) -> io::Result<()> {
    writeln!(out, "Memory usage in MiB: {}", config.mem_mib)?;
    writeln!(out, "Disk   usage in MiB: {}", config.disk_mib)?;
    if config.intensity_given {
        writeln!(out, "Time factor        : {}%", config.intensity)?;
    }
    Ok(())
}

pub fn header(out: &mut impl Write, access: Access) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}:", access.name())?;
    writeln!(out)?;
    writeln!(out, "{}", access.description())?;
    writeln!(out)
}

pub fn sample(out: &mut impl Write, access: Access, sample: &Sample) -> io::Result<()> {
    writeln!(out, "Total Time: {} nanoseconds for {} operations.", sample.elapsed_ns, sample.ops)?;
    writeln!(out, "Time per '{}': {} nanoseconds", access.operation(), sample.nanos_per_op())
}

pub fn discard(out: &mut impl Write, discard: u64) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Please ignore: {}", discard)
}
