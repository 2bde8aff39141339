use std::hint::black_box;
use std::time::Instant;

use anyhow::Result;
use log::{debug, info};

use crate::buffer::Buffer;
use crate::config::RunConfig;
use crate::pattern::StrideCursor;

/// The two measured access kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

impl Access {
    pub fn name(self) -> &'static str {
        match self {
            Access::Read => "memoryLatencyRead",
            Access::Write => "memoryLatencyWrite",
        }
    }

    pub fn operation(self) -> &'static str {
        match self {
            Access::Read => "single byte read",
            Access::Write => "single byte write",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Access::Read => {
                "This allocates as much memory as allowed and does single byte reads in a\n\
                 random access fashion. The result is the average time it takes to fetch\n\
                 a cache line."
            }
            Access::Write => {
                "This allocates as much memory as allowed and does single byte writes\n\
                 in a random access fashion. The result is the average time it takes to\n\
                 write a byte."
            }
        }
    }
}

/// Monotonic time spent in one measurement loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub elapsed_ns: u64,
    pub ops: u64,
}

impl Sample {
    /// Mean cost of one operation, not truncated.
    pub fn nanos_per_op(&self) -> f64 {
        if self.ops == 0 {
            return 0.0;
        }
        self.elapsed_ns as f64 / self.ops as f64
    }
}

/// Runs `body` between two monotonic timestamps and charges the elapsed
/// time to `ops` operations.
#[inline(always)]
pub fn measure<T>(ops: u64, body: impl FnOnce() -> T) -> (Sample, T) {
    let start = Instant::now();
    let out = body();
    let end = Instant::now();
    // u64 nanoseconds covers about 584 years.
    let elapsed_ns = end.duration_since(start).as_nanos() as u64;
    (Sample { elapsed_ns, ops }, out)
}

/// Result of the read benchmark. `discard` is the byte sum that keeps the
/// reads alive; its value means nothing.
#[derive(Debug, Clone, Copy)]
pub struct ReadOutcome {
    pub sample: Sample,
    pub discard: u64,
}

pub fn memory_latency_read(config: &RunConfig) -> Result<ReadOutcome> {
    memory_latency_read_with(config.mem_bytes(), config.iterations())
}

pub fn memory_latency_write(config: &RunConfig) -> Result<Sample> {
    memory_latency_write_with(config.mem_bytes(), config.iterations())
}

/// Single byte reads at stride offsets over a fresh `len` byte buffer.
pub fn memory_latency_read_with(len: u64, ops: u64) -> Result<ReadOutcome> {
    info!("{}: {} reads over {} bytes", Access::Read.name(), ops, len);
    let buffer = Buffer::allocate(len)?;

    let (sample, discard) = measure(ops, || read_pass(&buffer, ops));

    debug!("read loop took {} ns", sample.elapsed_ns);
    Ok(ReadOutcome { sample, discard })
}

/// Single byte writes (`iteration mod 255`) at stride offsets over a fresh
/// `len` byte buffer.
pub fn memory_latency_write_with(len: u64, ops: u64) -> Result<Sample> {
    info!("{}: {} writes over {} bytes", Access::Write.name(), ops, len);
    let mut buffer = Buffer::allocate(len)?;

    let (sample, ()) = measure(ops, || write_pass(&mut buffer, ops));
    black_box(&*buffer);

    debug!("write loop took {} ns", sample.elapsed_ns);
    Ok(sample)
}

/// Timed body of the read benchmark: wrapping sum of `ops` stride reads.
#[inline(always)]
fn read_pass(buf: &[u8], ops: u64) -> u64 {
    let mut discard = 0u64;
    for pos in StrideCursor::over(buf.len(), ops) {
        discard = discard.wrapping_add(u64::from(buf[pos]));
    }
    discard
}

/// Timed body of the write benchmark: step `i` stores `i mod 255`.
#[inline(always)]
fn write_pass(buf: &mut [u8], ops: u64) {
    let cursor = StrideCursor::over(buf.len(), ops);
    for (i, pos) in (0u64..).zip(cursor) {
        buf[pos] = (i % 255) as u8;
    }
}
