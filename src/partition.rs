//! Splitting a keyspace into contiguous per-worker ranges.

/// A half-open range `[start, end)` of candidate indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyspaceRange {
    pub start: u64,
    pub end: u64,
}

impl KeyspaceRange {
    pub fn new(start: u64, end: u64) -> Self {
        debug_assert!(start <= end);
        KeyspaceRange { start, end }
    }

    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

/// Split `[0, n)` into `min(workers, n)` contiguous ranges.
///
/// Range sizes differ by at most one; the first `n % w` ranges take the
/// extra candidate. The result depends only on `(n, workers)`. An empty
/// keyspace yields no ranges, and `workers == 0` is treated as one.
pub fn partition(n: u64, workers: usize) -> Vec<KeyspaceRange> {
    let w = (workers.max(1) as u64).min(n);
    if w == 0 {
        return Vec::new();
    }

    let base = n / w;
    let remainder = n % w;
    let mut ranges = Vec::with_capacity(w as usize);
    let mut start = 0u64;
    for i in 0..w {
        let size = base + u64::from(i < remainder);
        ranges.push(KeyspaceRange::new(start, start + size));
        start += size;
    }
    ranges
}
