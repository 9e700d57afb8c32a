use smol_str::SmolStr;

use crate::ParseHostPortError;

/// Errors that can occur while turning a `host:port` into cached addresses.
///
/// `L` is the error type of the [`Lookup`](crate::Lookup) in use.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError<L> {
  /// Returned when the requested address is not a valid `host:port`.
  #[error(transparent)]
  Parse(#[from] ParseHostPortError),
  /// Returned when the lookup fails.
  #[error("failed to resolve {host}: {source}")]
  Lookup {
    /// The host that was looked up.
    host: SmolStr,
    /// The error reported by the lookup.
    #[source]
    source: L,
  },
  /// Returned when the lookup succeeds but yields no usable address.
  #[error("can't resolve host \"{0}\"")]
  Unresolvable(SmolStr),
}

/// Errors returned by [`CachingDialer::dial`](crate::CachingDialer::dial).
///
/// `C` is the error type of the [`Connector`](crate::Connector), `L` the
/// error type of the [`Lookup`](crate::Lookup).
#[derive(Debug, thiserror::Error)]
pub enum Error<C, L> {
  /// Returned when the address could not be resolved.
  #[error(transparent)]
  Resolve(#[from] ResolveError<L>),
  /// Returned when the connector fails to connect to the selected address.
  ///
  /// The address has been evicted from the cache by the time this is returned.
  #[error(transparent)]
  Connect(C),
}

impl<C, L> Error<C, L> {
  /// Returns `true` if the requested address was not a valid `host:port`.
  #[inline]
  pub const fn is_parse(&self) -> bool {
    matches!(self, Self::Resolve(ResolveError::Parse(_)))
  }

  /// Returns `true` if the lookup failed.
  #[inline]
  pub const fn is_lookup(&self) -> bool {
    matches!(self, Self::Resolve(ResolveError::Lookup { .. }))
  }

  /// Returns `true` if the host resolved to no usable address.
  #[inline]
  pub const fn is_unresolvable(&self) -> bool {
    matches!(self, Self::Resolve(ResolveError::Unresolvable(_)))
  }

  /// Returns `true` if the connector failed.
  #[inline]
  pub const fn is_connect(&self) -> bool {
    matches!(self, Self::Connect(_))
  }

  /// Consumes the error, returning the connector error if there is one.
  #[inline]
  pub fn into_connect(self) -> Option<C> {
    match self {
      Self::Connect(e) => Some(e),
      Self::Resolve(_) => None,
    }
  }
}

impl<C, L> From<ParseHostPortError> for Error<C, L> {
  fn from(value: ParseHostPortError) -> Self {
    Self::Resolve(ResolveError::Parse(value))
  }
}
