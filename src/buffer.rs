use std::ops::{Deref, DerefMut};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use log::{debug, trace};
use memmap2::{MmapMut, MmapOptions};

/// Benchmark memory: one anonymous private mapping, owned by a single
/// benchmark routine and unmapped when dropped.
pub struct Buffer {
    map: MmapMut,
}

impl Buffer {
    /// Maps `len` bytes and touches every one of them (`cell[i] = i mod 256`)
    /// so that first-touch page faults happen before any timing starts.
    ///
    /// There is no fallback to a smaller size: if the platform cannot
    /// satisfy the request, the error is returned as is.
    pub fn allocate(len: u64) -> Result<Self> {
        if len == 0 {
            bail!("refusing to allocate an empty buffer");
        }
        let len = usize::try_from(len)
            .with_context(|| format!("buffer of {} bytes does not fit the address space", len))?;

        let before = Instant::now();
        let map = MmapOptions::new()
            .len(len)
            .map_anon()
            .with_context(|| format!("failed to allocate {} bytes", len))?;
        debug!("mapped {} bytes in {:.2?}", len, before.elapsed());

        let mut buffer = Self { map };
        let before = Instant::now();
        buffer.fill_pattern();
        debug!("initialised {} bytes in {:.2?}", len, before.elapsed());
        Ok(buffer)
    }

    fn fill_pattern(&mut self) {
        for (i, cell) in self.map.iter_mut().enumerate() {
            *cell = i as u8;
        }
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.map
    }
}

impl DerefMut for Buffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.map
    }
}

impl Drop for Buffer {
    fn drop(&mut self) {
        trace!("releasing {} byte buffer", self.map.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_exact_length() {
        let buffer = Buffer::allocate(1 << 20).expect("1 MiB should map");
        assert_eq!(buffer.len(), 1_048_576);
    }

    #[test]
    fn test_cells_hold_index_mod_256() {
        let buffer = Buffer::allocate(4096 + 3).expect("small buffer should map");
        for (i, &cell) in buffer.iter().enumerate() {
            assert_eq!(cell as usize, i % 256, "cell {} not initialised", i);
        }
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(Buffer::allocate(0).is_err());
    }

    #[test]
    fn test_writes_visible_through_deref() {
        let mut buffer = Buffer::allocate(100).expect("tiny buffer should map");
        buffer[99] = 7;
        assert_eq!(buffer[99], 7);
        assert_eq!(buffer[98], 98);
    }
}
