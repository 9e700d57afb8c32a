/// An error which can be returned when splitting a `host:port` string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseHostPortError {
  /// Returned if the provided str is missing port.
  #[error("address is missing port")]
  MissingPort,
  /// Returned if the host part contains a colon but is not bracketed.
  #[error("too many colons in address")]
  TooManyColons,
  /// Returned if an opening `[` has no matching `]`.
  #[error("missing ']' in address")]
  MissingBracket,
  /// Returned if a bracket appears where it is not allowed.
  #[error("unexpected '{0}' in address")]
  UnexpectedBracket(char),
  /// Returned if the host part is empty.
  #[error("address is missing host")]
  EmptyHost,
  /// Returned if the provided str is not a valid port.
  #[error("invalid port: {0}")]
  InvalidPort(#[from] core::num::ParseIntError),
}

/// Splits `host:port` or `[host]:port` into its host and port.
///
/// The brackets of an IPv6 literal are stripped from the returned host,
/// e.g. `[::1]:80` yields `("::1", 80)`. A bracketed IPv4 address such as
/// `[10.0.0.1]:80` is accepted as well, which is the format the dialer
/// stores resolved addresses in.
pub fn split_host_port(s: &str) -> Result<(&str, u16), ParseHostPortError> {
  let (host, port) = if let Some(rest) = s.strip_prefix('[') {
    let Some(end) = rest.find(']') else {
      return Err(ParseHostPortError::MissingBracket);
    };
    let host = &rest[..end];
    let port = match &rest[end + 1..] {
      "" => return Err(ParseHostPortError::MissingPort),
      tail => match tail.strip_prefix(':') {
        Some(port) => port,
        None if tail.contains(':') => return Err(ParseHostPortError::TooManyColons),
        None => return Err(ParseHostPortError::MissingPort),
      },
    };
    (host, port)
  } else {
    let Some((host, port)) = s.rsplit_once(':') else {
      return Err(ParseHostPortError::MissingPort);
    };
    if host.contains(':') {
      return Err(ParseHostPortError::TooManyColons);
    }
    (host, port)
  };

  if let Some(ch) = host.chars().find(|ch| matches!(ch, '[' | ']')) {
    return Err(ParseHostPortError::UnexpectedBracket(ch));
  }
  if let Some(ch) = port.chars().find(|ch| matches!(ch, '[' | ']')) {
    return Err(ParseHostPortError::UnexpectedBracket(ch));
  }
  if host.is_empty() {
    return Err(ParseHostPortError::EmptyHost);
  }

  Ok((host, port.parse()?))
}
