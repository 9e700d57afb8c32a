use core::{future::Future, time::Duration};
use std::{
  io,
  net::{IpAddr, SocketAddr},
  sync::Arc,
};

use tokio::net::TcpStream;

use crate::{split_host_port, utils::invalid_input};

/// Establishes a connection to a single, already resolved address.
///
/// This is the low-level dial primitive the [`CachingDialer`](crate::CachingDialer)
/// wraps. The `address` handed to [`connect`](Connector::connect) is one of
/// the cached entries, formatted as `[ip]:port`.
pub trait Connector: Send + Sync + 'static {
  /// The connection returned on success.
  type Connection: Send;
  /// The error type returned by the connector.
  type Error: std::error::Error + Send + Sync + 'static;

  /// Connects to `address` over `network`.
  fn connect(
    &self,
    network: &str,
    address: &str,
  ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send;
}

impl<T: Connector> Connector for Arc<T> {
  type Connection = T::Connection;
  type Error = T::Error;

  fn connect(
    &self,
    network: &str,
    address: &str,
  ) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
    (**self).connect(network, address)
  }
}

/// The options used to construct a [`TcpConnector`].
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TcpConnectorOptions {
  #[cfg_attr(
    feature = "serde",
    serde(with = "humantime_serde", default, skip_serializing_if = "Option::is_none")
  )]
  timeout: Option<Duration>,
  #[cfg_attr(feature = "serde", serde(default))]
  nodelay: bool,
}

impl TcpConnectorOptions {
  /// Create a new [`TcpConnectorOptions`]: no timeout, Nagle's algorithm enabled.
  pub const fn new() -> Self {
    Self {
      timeout: None,
      nodelay: false,
    }
  }

  /// Set the connect timeout in builder pattern
  pub const fn with_timeout(mut self, val: Option<Duration>) -> Self {
    self.timeout = val;
    self
  }

  /// Set the connect timeout
  pub fn set_timeout(&mut self, val: Option<Duration>) {
    self.timeout = val;
  }

  /// Returns the connect timeout
  pub const fn timeout(&self) -> Option<Duration> {
    self.timeout
  }

  /// Set `TCP_NODELAY` on established streams in builder pattern
  pub const fn with_nodelay(mut self, val: bool) -> Self {
    self.nodelay = val;
    self
  }

  /// Set `TCP_NODELAY` on established streams
  pub fn set_nodelay(&mut self, val: bool) {
    self.nodelay = val;
  }

  /// Returns `true` if `TCP_NODELAY` is set on established streams
  pub const fn nodelay(&self) -> bool {
    self.nodelay
  }
}

/// The default [`Connector`], backed by [`tokio::net::TcpStream`].
///
/// Supported networks are `tcp`, `tcp4` and `tcp6`. The address must be an IP
/// literal with a port, bracketed or not, e.g. `[10.0.0.1]:80`,
/// `10.0.0.1:80` or `[::1]:80`; no name resolution happens here.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnector {
  opts: TcpConnectorOptions,
}

impl TcpConnector {
  /// Create a new [`TcpConnector`] with the given options.
  pub const fn new(opts: TcpConnectorOptions) -> Self {
    Self { opts }
  }

  /// Returns the options of this connector.
  pub const fn options(&self) -> &TcpConnectorOptions {
    &self.opts
  }
}

impl Connector for TcpConnector {
  type Connection = TcpStream;
  type Error = io::Error;

  async fn connect(&self, network: &str, address: &str) -> io::Result<TcpStream> {
    let addr = socket_addr(network, address)?;
    let stream = match self.opts.timeout {
      Some(timeout) => tokio::time::timeout(timeout, TcpStream::connect(addr))
        .await
        .map_err(|_| {
          io::Error::new(
            io::ErrorKind::TimedOut,
            format!("connect to {addr} timed out"),
          )
        })??,
      None => TcpStream::connect(addr).await?,
    };

    if self.opts.nodelay {
      stream.set_nodelay(true)?;
    }
    Ok(stream)
  }
}

fn socket_addr(network: &str, address: &str) -> io::Result<SocketAddr> {
  let (host, port) = split_host_port(address).map_err(invalid_input)?;
  let ip: IpAddr = host.parse().map_err(invalid_input)?;
  match (network, ip) {
    ("tcp", _) | ("tcp4", IpAddr::V4(_)) | ("tcp6", IpAddr::V6(_)) => Ok(SocketAddr::new(ip, port)),
    ("tcp4" | "tcp6", _) => Err(invalid_input(format!(
      "address {address} does not match network {network}"
    ))),
    _ => Err(invalid_input(format!("unsupported network {network}"))),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_socket_addr() {
    assert_eq!(
      socket_addr("tcp", "[10.0.0.1]:80").unwrap(),
      "10.0.0.1:80".parse::<SocketAddr>().unwrap()
    );
    assert_eq!(
      socket_addr("tcp4", "10.0.0.1:80").unwrap(),
      "10.0.0.1:80".parse::<SocketAddr>().unwrap()
    );
    assert_eq!(
      socket_addr("tcp6", "[2001:470:1:18::119]:80").unwrap(),
      "[2001:470:1:18::119]:80".parse::<SocketAddr>().unwrap()
    );

    let err = socket_addr("tcp6", "[10.0.0.1]:80").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    let err = socket_addr("udp", "[10.0.0.1]:80").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    let err = socket_addr("tcp", "github.com:80").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    let err = socket_addr("tcp", "10.0.0.1").unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
  }

  #[test]
  fn test_options_access() {
    let mut opts = TcpConnectorOptions::new()
      .with_timeout(Some(Duration::from_secs(1)))
      .with_nodelay(true);
    assert_eq!(opts.timeout(), Some(Duration::from_secs(1)));
    assert!(opts.nodelay());

    opts.set_timeout(None);
    opts.set_nodelay(false);
    assert_eq!(opts, TcpConnectorOptions::default());
    assert_eq!(TcpConnector::new(opts).options(), &opts);
  }

  #[tokio::test]
  async fn test_connect_local_listener() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();

    let connector = TcpConnector::new(
      TcpConnectorOptions::new()
        .with_timeout(Some(Duration::from_secs(5)))
        .with_nodelay(true),
    );
    let addr = format!("[127.0.0.1]:{port}");
    let (stream, accepted) = tokio::join!(connector.connect("tcp", &addr), listener.accept());
    let stream = stream.unwrap();
    let (_, peer) = accepted.unwrap();
    assert_eq!(stream.local_addr().unwrap(), peer);
    assert!(stream.nodelay().unwrap());
  }
}
