use core::future::Future;
use std::{io, net::IpAddr, sync::Arc};

use smol_str::{SmolStr, format_smolstr};

use crate::{ResolveError, split_host_port};

/// Hickory backed lookup
#[cfg(feature = "dns")]
#[cfg_attr(docsrs, doc(cfg(feature = "dns")))]
pub mod dns;

/// Turns a host name into IP addresses.
pub trait Lookup: Send + Sync + 'static {
  /// The error type returned by the lookup.
  type Error: std::error::Error + Send + Sync + 'static;

  /// Looks up the IP addresses of `host`, in preference order.
  fn lookup_ip(&self, host: &str) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send;
}

impl<T: Lookup> Lookup for Arc<T> {
  type Error = T::Error;

  fn lookup_ip(&self, host: &str) -> impl Future<Output = Result<Vec<IpAddr>, Self::Error>> + Send {
    (**self).lookup_ip(host)
  }
}

/// The default [`Lookup`], using the operating system resolver through
/// [`tokio::net::lookup_host`].
///
/// IP literals are returned as they are without touching the resolver.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLookup;

impl Lookup for SystemLookup {
  type Error = io::Error;

  async fn lookup_ip(&self, host: &str) -> io::Result<Vec<IpAddr>> {
    if let Ok(ip) = host.parse::<IpAddr>() {
      return Ok(vec![ip]);
    }

    let mut ips: Vec<IpAddr> = Vec::new();
    for addr in tokio::net::lookup_host((host, 0)).await? {
      if !ips.contains(&addr.ip()) {
        ips.push(addr.ip());
      }
    }
    Ok(ips)
  }
}

/// Resolves `address` (a `host:port`) into `[ip]:port` strings, keeping the
/// order the lookup returned them in.
pub(crate) async fn resolve<L: Lookup>(
  lookup: &L,
  address: &str,
  exclude_ipv6: bool,
) -> Result<Vec<SmolStr>, ResolveError<L::Error>> {
  let (host, port) = split_host_port(address)?;
  let ips = lookup
    .lookup_ip(host)
    .await
    .map_err(|source| ResolveError::Lookup {
      host: SmolStr::new(host),
      source,
    })?;

  Ok(
    ips
      .into_iter()
      // ipv4-mapped addresses count as ipv4
      .map(|ip| ip.to_canonical())
      .filter(|ip| !(exclude_ipv6 && ip.is_ipv6()))
      .map(|ip| format_smolstr!("[{ip}]:{port}"))
      .collect(),
  )
}
