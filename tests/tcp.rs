use std::{convert::Infallible, net::IpAddr, time::Duration};

use cdialer::{CachingDialer, DialerOptions, Lookup, TcpConnector, TcpConnectorOptions};
use tokio::net::TcpListener;

/// Resolves every host to the same fixed addresses.
struct FixedLookup(Vec<IpAddr>);

impl Lookup for FixedLookup {
  type Error = Infallible;

  async fn lookup_ip(&self, _host: &str) -> Result<Vec<IpAddr>, Infallible> {
    Ok(self.0.clone())
  }
}

fn connector() -> TcpConnector {
  TcpConnector::new(TcpConnectorOptions::new().with_timeout(Some(Duration::from_secs(2))))
}

#[tokio::test]
async fn test_dial_local_listener() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let port = listener.local_addr().unwrap().port();
  let dialer = CachingDialer::new(
    connector(),
    FixedLookup(vec!["127.0.0.1".parse().unwrap()]),
    DialerOptions::default(),
  );

  let address = format!("service.test:{port}");
  for _ in 0..3 {
    let (stream, accepted) = tokio::join!(dialer.dial("tcp", &address), listener.accept());
    let stream = stream.unwrap();
    let (_, peer) = accepted.unwrap();
    assert_eq!(stream.local_addr().unwrap(), peer);
  }

  let cached = dialer.cached(&address).await.unwrap();
  assert_eq!(&cached[..], [format!("[127.0.0.1]:{port}")]);
}

#[tokio::test]
async fn test_evict_dead_address() {
  let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let port = listener.local_addr().unwrap().port();
  let dead = TcpListener::bind("127.0.0.1:0").await.unwrap();
  let dead_port = dead.local_addr().unwrap().port();
  drop(dead);

  let dialer = CachingDialer::new(
    connector(),
    FixedLookup(vec!["127.0.0.1".parse().unwrap()]),
    DialerOptions::default(),
  );

  // nothing listens on the dead port any more
  let err = dialer
    .dial("tcp", &format!("dead.test:{dead_port}"))
    .await
    .unwrap_err();
  assert!(err.is_connect());
  assert!(
    dialer
      .cached(&format!("dead.test:{dead_port}"))
      .await
      .unwrap()
      .is_empty()
  );

  // other hosts are unaffected
  let address = format!("alive.test:{port}");
  let (stream, accepted) = tokio::join!(dialer.dial("tcp", &address), listener.accept());
  stream.unwrap();
  accepted.unwrap();
}

#[tokio::test]
async fn test_malformed_address() {
  let dialer: CachingDialer = CachingDialer::default();
  let err = dialer.dial("tcp", "localhost").await.unwrap_err();
  assert!(err.is_parse());
  assert_eq!(err.to_string(), "address is missing port");

  let dialer = CachingDialer::wrap(connector());
  let err = dialer.dial("tcp", "[::1:80").await.unwrap_err();
  assert!(err.is_parse());
}

#[tokio::test]
async fn test_unsupported_network() {
  let dialer = CachingDialer::new(
    connector(),
    FixedLookup(vec!["127.0.0.1".parse().unwrap()]),
    DialerOptions::default(),
  );
  let err = dialer.dial("udp", "service.test:80").await.unwrap_err();
  let err = err.into_connect().unwrap();
  assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
  assert!(dialer.cached("service.test:80").await.unwrap().is_empty());
}
