/// Bytes added to the cursor on every step: 17 cache lines of 64 bytes.
/// Not a power of two, so successive touches land on different lines and
/// walk the buffer in an order simple prefetchers do not follow.
pub const STRIDE: usize = 17 * 64;

/// Lazy, deterministic stream of buffer offsets.
///
/// Starts at 0 and yields exactly `steps` offsets, each `stride` bytes past
/// the previous one, wrapped back into `0..len`. A cursor is not restartable;
/// make a new one for every benchmark run.
#[derive(Debug)]
pub struct StrideCursor {
    pos: usize,
    stride: usize,
    len: usize,
    remaining: u64,
}

impl StrideCursor {
    /// Panics if `len` is zero: no offset could satisfy `0 <= pos < len`.
    pub fn new(len: usize, stride: usize, steps: u64) -> Self {
        assert!(len > 0, "cursor over an empty buffer");
        Self { pos: 0, stride, len, remaining: steps }
    }

    /// Cursor with the benchmark stride.
    pub fn over(len: usize, steps: u64) -> Self {
        Self::new(len, STRIDE, steps)
    }

    #[inline(always)]
    fn advance(&mut self) {
        self.pos += self.stride;
        // Loops more than once when stride > len.
        while self.pos >= self.len {
            self.pos -= self.len;
        }
    }
}

impl Iterator for StrideCursor {
    type Item = usize;

    #[inline(always)]
    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let current = self.pos;
        self.advance();
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_starts_at_zero_and_strides() {
        let offsets: Vec<usize> = StrideCursor::over(1 << 20, 4).collect();
        assert_eq!(offsets, vec![0, 1088, 2176, 3264]);
    }

    #[test]
    fn test_yields_exactly_steps_offsets() {
        assert_eq!(StrideCursor::over(4096, 0).count(), 0);
        assert_eq!(StrideCursor::over(4096, 12_345).count(), 12_345);
        assert_eq!(StrideCursor::over(4096, 10).size_hint(), (10, Some(10)));
    }

    #[test]
    fn test_wraps_around_buffer_end() {
        // 3 * 1088 = 3264 < 4000, 4 * 1088 = 4352 wraps to 352.
        let offsets: Vec<usize> = StrideCursor::over(4000, 6).collect();
        assert_eq!(offsets, vec![0, 1088, 2176, 3264, 352, 1440]);
    }

    #[test]
    fn test_stride_larger_than_buffer() {
        // 1088 = 10 * 100 + 88, so every step wraps ten times.
        let offsets: Vec<usize> = StrideCursor::over(100, 4).collect();
        assert_eq!(offsets, vec![0, 88, 76, 64]);

        assert!(StrideCursor::over(1, 50).all(|pos| pos == 0));
    }

    #[test]
    fn test_congruent_to_n_times_stride_mod_len() {
        let mut rng = rand::rng();
        for _ in 0..200 {
            let len: usize = rng.random_range(1..=1 << 16);
            let stride: usize = rng.random_range(0..=1 << 18);
            let steps: u64 = rng.random_range(1..=2_000);
            for (n, pos) in StrideCursor::new(len, stride, steps).enumerate() {
                assert!(pos < len, "offset {} escaped buffer of {}", pos, len);
                let expected = ((n as u128 * stride as u128) % len as u128) as usize;
                assert_eq!(pos, expected, "step {} with stride {} over {}", n, stride, len);
            }
        }
    }

    #[test]
    fn test_sequence_is_deterministic() {
        let first: Vec<usize> = StrideCursor::over(1 << 20, 5_000).collect();
        let second: Vec<usize> = StrideCursor::over(1 << 20, 5_000).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_covers_every_line_of_a_power_of_two_buffer() {
        // gcd(1088, 2^20) = 64, so the walk visits every 64-byte line once
        // before returning to 0.
        let len = 1 << 20;
        let lines = len / 64;
        let mut seen = vec![false; lines];
        for pos in StrideCursor::over(len, lines as u64) {
            assert_eq!(pos % 64, 0);
            assert!(!seen[pos / 64], "line {} visited twice", pos / 64);
            seen[pos / 64] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    #[should_panic]
    fn test_empty_length_panics() {
        StrideCursor::over(0, 1);
    }
}
