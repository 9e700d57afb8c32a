#![doc = include_str!("../README.md")]
#![deny(missing_docs)]
#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(docsrs, allow(unused_attributes))]

mod cache;
mod connector;
mod dialer;
mod error;
mod host_port;
mod lookup;
mod options;
mod selector;
mod utils;

pub use cache::Addrs;
pub use connector::{Connector, TcpConnector, TcpConnectorOptions};
pub use dialer::CachingDialer;
pub use error::{Error, ResolveError};
pub use host_port::{ParseHostPortError, split_host_port};
pub use lookup::{Lookup, SystemLookup};
pub use options::DialerOptions;

/// [`Lookup`] sending DNS queries through hickory.
#[cfg(feature = "dns")]
#[cfg_attr(docsrs, doc(cfg(feature = "dns")))]
pub use lookup::dns;

pub use smol_str::SmolStr;
