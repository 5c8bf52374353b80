use std::sync::atomic::{AtomicU64, Ordering};

/// Allocates monotonically increasing 9-digit outbound request ids,
/// wrapping back to the low end of the range rather than overflowing.
/// Re-keying every outbound request this way means clashing ids from
/// concurrent front-end clients never collide on the wire to the
/// upstream node.
pub struct IdAllocator {
    next: AtomicU64,
}

const MIN_ID: u64 = 100_000_000;
const MAX_ID: u64 = 999_999_999;

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator {
            next: AtomicU64::new(MIN_ID),
        }
    }

    pub fn next(&self) -> u64 {
        let mut current = self.next.load(Ordering::Relaxed);
        loop {
            let after = if current >= MAX_ID { MIN_ID } else { current + 1 };
            match self
                .next
                .compare_exchange_weak(current, after, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(allocated) => return allocated,
                Err(actual) => current = actual,
            }
        }
    }

    /// Allocates the next id, formatted as the 9-digit zero-padded
    /// decimal string the wire protocol expects.
    pub fn next_as_string(&self) -> String {
        format!("{:09}", self.next())
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_nine_digit_values() {
        let allocator = IdAllocator::new();
        for _ in 0..5 {
            let id = allocator.next();
            assert!((MIN_ID..=MAX_ID).contains(&id));
        }
    }

    #[test]
    fn increments_monotonically_until_wraparound() {
        let allocator = IdAllocator::new();
        let first = allocator.next();
        let second = allocator.next();
        assert_eq!(second, first + 1);
    }

    #[test]
    fn wraps_around_at_the_top_of_the_range() {
        let allocator = IdAllocator {
            next: AtomicU64::new(MAX_ID),
        };
        assert_eq!(allocator.next(), MIN_ID);
    }

    #[test]
    fn next_as_string_is_nine_digits() {
        let allocator = IdAllocator::new();
        let id = allocator.next_as_string();
        assert_eq!(id.len(), 9);
        assert!(id.bytes().all(|b| b.is_ascii_digit()));
    }

    #[test]
    fn next_as_string_zero_pads_small_values() {
        let allocator = IdAllocator {
            next: AtomicU64::new(1),
        };
        assert_eq!(allocator.next_as_string(), "000000001");
    }
}
