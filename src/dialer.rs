use smol_str::SmolStr;

use crate::{
  Connector, DialerOptions, Error, Lookup, ResolveError, SystemLookup, TcpConnector,
  cache::{AddrCache, Addrs},
  lookup::resolve,
  selector::RoundRobin,
};

/// A dialer which caches name resolution and balances connections over the
/// resolved addresses.
///
/// Every [`dial`](CachingDialer::dial) for a `host:port`:
///
/// 1. takes the addresses cached for that exact `host:port`, resolving it
///    through the [`Lookup`] if nothing is cached or the cache has outlived
///    its [ttl](DialerOptions::ttl),
/// 2. picks one of them in round-robin order,
/// 3. connects to it through the [`Connector`], and if that fails removes the
///    address from the cache so later dials avoid it. Once every address of
///    a host has failed, the next dial resolves the host again.
///
/// One address is tried per call; nothing is retried internally.
///
/// The ttl is tracked for the cache as a whole, not per host: resolving any
/// host restarts it for all of them. Likewise the round-robin counter is
/// shared by all hosts, so the rotation over one host's addresses is only
/// strict when nothing else is dialed in between.
///
/// Addresses are cached under the exact string passed to `dial`, so
/// `example.com:443` and `EXAMPLE.com:443` are two entries. IPv6 hosts need
/// brackets (`[::1]:8080`), and the port must be a number: `example.com:https`
/// is rejected as malformed.
///
/// The dialer is `Send + Sync`; share it behind an [`Arc`](std::sync::Arc) to
/// dial from many tasks.
#[derive(Debug)]
pub struct CachingDialer<C = TcpConnector, L = SystemLookup> {
  connector: C,
  lookup: L,
  opts: DialerOptions,
  cache: AddrCache,
  rr: RoundRobin,
}

impl Default for CachingDialer {
  fn default() -> Self {
    Self::new(TcpConnector::default(), SystemLookup, DialerOptions::default())
  }
}

impl<C> CachingDialer<C> {
  /// Wraps `connector` with the default options and the system resolver.
  pub fn wrap(connector: C) -> Self {
    Self::new(connector, SystemLookup, DialerOptions::default())
  }
}

impl<C, L> CachingDialer<C, L> {
  /// Create a new [`CachingDialer`] with the given connector, lookup and options.
  pub fn new(connector: C, lookup: L, opts: DialerOptions) -> Self {
    Self {
      connector,
      lookup,
      opts,
      cache: AddrCache::default(),
      rr: RoundRobin::default(),
    }
  }

  /// Returns the options of this dialer.
  #[inline]
  pub const fn options(&self) -> &DialerOptions {
    &self.opts
  }

  /// Returns the connector used to establish connections.
  #[inline]
  pub const fn connector(&self) -> &C {
    &self.connector
  }

  /// Returns the lookup used to resolve hosts.
  #[inline]
  pub const fn lookup(&self) -> &L {
    &self.lookup
  }

  /// Returns the addresses currently cached for `address`, whether or not
  /// the cache is still fresh.
  pub async fn cached(&self, address: &str) -> Option<Addrs> {
    self.cache.get(address).await
  }

  /// Drops the addresses cached for `address`, so the next dial to it resolves
  /// again. Returns what was cached.
  pub async fn forget(&self, address: &str) -> Option<Addrs> {
    self.cache.remove(address).await
  }

  /// Drops every cached address.
  pub async fn clear(&self) {
    self.cache.clear().await
  }
}

impl<C, L> CachingDialer<C, L>
where
  C: Connector,
  L: Lookup,
{
  /// Connects to `address`, a `host:port`, over `network`.
  ///
  /// `network` is passed through to the [`Connector`] untouched.
  ///
  /// Dropping the returned future cancels the dial. A resolution cancelled
  /// halfway leaves the cache as it was.
  pub async fn dial(
    &self,
    network: &str,
    address: &str,
  ) -> Result<C::Connection, Error<C::Error, L::Error>> {
    let addrs = self.addrs(address).await?;
    let Some(addr) = self.rr.pick(&addrs[..]) else {
      #[cfg(feature = "tracing")]
      tracing::warn!(
        target = "cdialer.dialer",
        "{} resolved to no usable address",
        address
      );
      return Err(ResolveError::Unresolvable(SmolStr::new(address)).into());
    };

    #[cfg(feature = "tracing")]
    tracing::trace!(target = "cdialer.dialer", "dialing {} via {}", address, addr);

    match self.connector.connect(network, addr).await {
      Ok(conn) => Ok(conn),
      Err(e) => {
        let _remaining = self.cache.evict(address, addr).await;
        #[cfg(feature = "tracing")]
        if let Some(remaining) = _remaining {
          tracing::debug!(
            target = "cdialer.dialer",
            "evicted {} from {} after failed dial: {}, {} address(es) left",
            addr,
            address,
            e,
            remaining,
          );
        }
        Err(Error::Connect(e))
      }
    }
  }

  async fn addrs(&self, address: &str) -> Result<Addrs, ResolveError<L::Error>> {
    self
      .cache
      .get_or_resolve(address, self.opts.ttl(), || async {
        let addrs = resolve(&self.lookup, address, self.opts.exclude_ipv6()).await?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
          target = "cdialer.dialer",
          "resolved {} to {} address(es)",
          address,
          addrs.len(),
        );
        Ok::<_, ResolveError<L::Error>>(addrs)
      })
      .await
  }
}
