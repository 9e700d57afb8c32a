use std::net::IpAddr;

pub use hickory_resolver::{
  TokioAsyncResolver,
  config::{ResolverConfig, ResolverOpts},
  error::ResolveError,
};

use super::Lookup;

/// The options used to construct a [`DnsLookup`].
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DnsLookupOptions {
  resolver_opts: ResolverOpts,
  resolver_config: ResolverConfig,
}

impl DnsLookupOptions {
  /// Options that query the hickory default name servers with hickory's
  /// default timeouts and retries.
  pub fn new() -> Self {
    Self::default()
  }

  /// Picks the name servers and search domains queried by the lookup.
  pub fn with_resolver_config(mut self, c: ResolverConfig) -> Self {
    self.resolver_config = c;
    self
  }

  /// Replaces the name servers and search domains queried by the lookup.
  pub fn set_resolver_config(&mut self, c: ResolverConfig) {
    self.resolver_config = c;
  }

  /// Name servers and search domains the lookup will query.
  pub fn resolver_config(&self) -> &ResolverConfig {
    &self.resolver_config
  }

  /// Tunes how queries are sent: timeouts, attempts, address family
  /// preference and hickory's own answer cache.
  pub fn with_resolver_opts(mut self, o: ResolverOpts) -> Self {
    self.resolver_opts = o;
    self
  }

  /// Replaces the query tuning. See [`with_resolver_opts`](Self::with_resolver_opts).
  pub fn set_resolver_opts(&mut self, o: ResolverOpts) {
    self.resolver_opts = o;
  }

  /// Query tuning passed to hickory.
  pub fn resolver_opts(&self) -> &ResolverOpts {
    &self.resolver_opts
  }
}

/// A [`Lookup`] which sends DNS queries through hickory instead of asking the
/// operating system.
///
/// Results are not cached here beyond what hickory itself does; the dialer
/// keeps its own cache on top.
pub struct DnsLookup {
  resolver: TokioAsyncResolver,
}

impl DnsLookup {
  /// Create a new [`DnsLookup`] with the given options.
  pub fn new(opts: DnsLookupOptions) -> Self {
    Self {
      resolver: TokioAsyncResolver::tokio(opts.resolver_config, opts.resolver_opts),
    }
  }

  /// Create a new [`DnsLookup`] from the system configuration, e.g.
  /// `/etc/resolv.conf` on unix.
  pub fn from_system_conf() -> Result<Self, ResolveError> {
    TokioAsyncResolver::tokio_from_system_conf().map(|resolver| Self { resolver })
  }
}

impl From<TokioAsyncResolver> for DnsLookup {
  fn from(resolver: TokioAsyncResolver) -> Self {
    Self { resolver }
  }
}

impl Lookup for DnsLookup {
  type Error = ResolveError;

  async fn lookup_ip(&self, host: &str) -> Result<Vec<IpAddr>, ResolveError> {
    let lookup = self.resolver.lookup_ip(host).await?;
    #[cfg(feature = "tracing")]
    tracing::trace!(
      target = "cdialer.lookup.dns",
      "{} answered with {} records",
      host,
      lookup.as_lookup().records().len(),
    );
    Ok(lookup.iter().collect())
  }
}
