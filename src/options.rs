use core::time::Duration;

/// The options used to construct a [`CachingDialer`](crate::CachingDialer).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialerOptions {
  #[cfg_attr(
    feature = "serde",
    serde(with = "humantime_serde", default = "default_ttl")
  )]
  ttl: Duration,
  #[cfg_attr(feature = "serde", serde(default))]
  exclude_ipv6: bool,
}

impl Default for DialerOptions {
  fn default() -> Self {
    Self::new()
  }
}

const fn default_ttl() -> Duration {
  Duration::from_secs(60 * 60)
}

impl DialerOptions {
  /// Create a new [`DialerOptions`]: one hour TTL, IPv6 results kept.
  pub const fn new() -> Self {
    Self {
      ttl: default_ttl(),
      exclude_ipv6: false,
    }
  }

  /// Set the cache ttl in builder pattern
  pub const fn with_ttl(mut self, val: Duration) -> Self {
    self.ttl = val;
    self
  }

  /// Set the cache ttl
  pub fn set_ttl(&mut self, val: Duration) {
    self.ttl = val;
  }

  /// Returns the cache ttl.
  ///
  /// The ttl applies to the cache as a whole: once it has elapsed since the
  /// most recent resolution of *any* host, the next dial re-resolves.
  pub const fn ttl(&self) -> Duration {
    self.ttl
  }

  /// Set whether IPv6 results are dropped in builder pattern
  pub const fn with_exclude_ipv6(mut self, val: bool) -> Self {
    self.exclude_ipv6 = val;
    self
  }

  /// Set whether IPv6 results are dropped
  pub fn set_exclude_ipv6(&mut self, val: bool) {
    self.exclude_ipv6 = val;
  }

  /// Returns `true` if IPv6 addresses returned by the lookup are dropped.
  pub const fn exclude_ipv6(&self) -> bool {
    self.exclude_ipv6
  }
}
