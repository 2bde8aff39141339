use anyhow::{Context, Result};

/// Bytes per mebibyte.
pub const MIB: u64 = 1024 * 1024;

pub const DEFAULT_MEM_MIB: u64 = 128;
/// Upper bound for both size arguments: 1 TiB.
pub const MAX_MIB: u64 = 1024 * 1024;
pub const MIN_DISK_MIB: u64 = 16;

pub const DEFAULT_INTENSITY: u64 = 100;
pub const MAX_INTENSITY: u64 = 999;

/// Iterations per benchmark at 100% intensity.
pub const BASE_ITERATIONS: u64 = 300_000_000;

/// Resolved run parameters. Never changes once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    pub mem_mib: u64,
    /// Carried through and echoed, not consumed by any measurement.
    pub disk_mib: u64,
    pub intensity: u64,
    /// Whether the intensity came from the command line.
    pub intensity_given: bool,
}

/// What the command line asks for.
#[derive(Debug, PartialEq, Eq)]
pub enum Invocation {
    Usage,
    Run(RunConfig),
}

impl RunConfig {
    /// Clamps raw values into their operating bounds. Never fails.
    pub fn resolve(mem_mib: u64, disk_mib: u64, intensity: Option<u64>) -> Self {
        Self {
            mem_mib: resolve_mem_mib(mem_mib),
            disk_mib: resolve_disk_mib(disk_mib),
            intensity: resolve_intensity(intensity.unwrap_or(DEFAULT_INTENSITY)),
            intensity_given: intensity.is_some(),
        }
    }

    pub fn mem_bytes(&self) -> u64 {
        self.mem_mib * MIB
    }

    pub fn disk_bytes(&self) -> u64 {
        self.disk_mib * MIB
    }

    /// Iterations each benchmark runs: `BASE_ITERATIONS * intensity / 100`.
    pub fn iterations(&self) -> u64 {
        BASE_ITERATIONS * self.intensity / 100
    }
}

pub fn resolve_mem_mib(raw: u64) -> u64 {
    if raw == 0 {
        DEFAULT_MEM_MIB
    } else {
        raw.min(MAX_MIB)
    }
}

pub fn resolve_disk_mib(raw: u64) -> u64 {
    raw.clamp(MIN_DISK_MIB, MAX_MIB)
}

pub fn resolve_intensity(raw: u64) -> u64 {
    if raw == 0 {
        DEFAULT_INTENSITY
    } else {
        raw.min(MAX_INTENSITY)
    }
}

/// Interprets the positional arguments (program name excluded).
///
/// Fewer than two arguments is a request for the usage text. Any argument
/// that is present must be an unsigned decimal number; ranges are clamped,
/// not rejected. Arguments past the third are ignored.
pub fn parse_args<S: AsRef<str>>(args: &[S]) -> Result<Invocation> {
    if args.len() < 2 {
        return Ok(Invocation::Usage);
    }
    let mem = parse_number("memUsageMiB", args[0].as_ref())?;
    let disk = parse_number("diskUsageMiB", args[1].as_ref())?;
    let intensity = match args.get(2) {
        Some(raw) => Some(parse_number("timeFactor", raw.as_ref())?),
        None => None,
    };
    Ok(Invocation::Run(RunConfig::resolve(mem, disk, intensity)))
}

fn parse_number(name: &str, raw: &str) -> Result<u64> {
    raw.parse::<u64>()
        .with_context(|| format!("invalid <{}> argument {:?}: expected an unsigned integer", name, raw))
}
