use core::sync::atomic::{AtomicU64, Ordering};

/// Picks addresses in rotation with a single counter.
///
/// The counter is shared by every host dialed through the same dialer, so
/// interleaved dials to different hosts shift each other's rotation. Over `n`
/// consecutive picks from the same list of length `n` every entry is visited
/// exactly once.
#[derive(Debug)]
pub(crate) struct RoundRobin {
  idx: AtomicU64,
}

impl Default for RoundRobin {
  fn default() -> Self {
    Self::new(0)
  }
}

impl RoundRobin {
  pub(crate) const fn new(start: u64) -> Self {
    Self {
      idx: AtomicU64::new(start),
    }
  }

  /// Bumps the counter and returns the entry at the new value modulo the
  /// length of `list`. An empty `list` yields `None` and leaves the counter
  /// untouched.
  pub(crate) fn pick<'a, T>(&self, list: &'a [T]) -> Option<&'a T> {
    if list.is_empty() {
      return None;
    }
    let idx = self.idx.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
    list.get((idx % list.len() as u64) as usize)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use quickcheck::TestResult;
  use quickcheck_macros::quickcheck;

  #[test]
  fn test_pick_starts_after_first_entry() {
    let rr = RoundRobin::default();
    let list = ["a", "b", "c"];
    let picked: Vec<_> = (0..6).map(|_| *rr.pick(&list).unwrap()).collect();
    assert_eq!(picked, ["b", "c", "a", "b", "c", "a"]);
  }

  #[test]
  fn test_pick_empty() {
    let rr = RoundRobin::default();
    assert!(rr.pick::<u8>(&[]).is_none());
    assert!(rr.pick::<u8>(&[]).is_none());
    // the counter has not moved
    assert_eq!(rr.pick(&[1, 2]), Some(&2));
  }

  #[quickcheck]
  fn rotation_covers_every_entry(start: u32, len: u8) -> TestResult {
    if len == 0 {
      return TestResult::discard();
    }

    let rr = RoundRobin::new(start as u64);
    let list: Vec<usize> = (0..len as usize).collect();
    let mut seen = vec![false; list.len()];
    for _ in 0..list.len() {
      let idx = *rr.pick(&list).unwrap();
      if seen[idx] {
        return TestResult::failed();
      }
      seen[idx] = true;
    }
    TestResult::from_bool(seen.into_iter().all(|s| s))
  }
}
