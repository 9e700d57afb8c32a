use core::{future::Future, time::Duration};
use std::{collections::HashMap, sync::Arc, time::Instant};

use cheap_clone::CheapClone;
use smol_str::SmolStr;
use tokio::sync::RwLock;

/// A snapshot of the addresses cached for one host.
pub type Addrs = Arc<[SmolStr]>;

/// The cached addresses of every host plus the one timestamp they all share.
#[derive(Debug, Default)]
pub(crate) struct CacheState {
  pub(crate) addrs: HashMap<SmolStr, Addrs>,
  /// When any host was last resolved. `None` until the first resolution.
  pub(crate) resolved: Option<Instant>,
}

impl CacheState {
  fn is_fresh(&self, ttl: Duration) -> bool {
    self.resolved.is_some_and(|at| at.elapsed() <= ttl)
  }

  /// Returns the cached list for `key` if the cache is fresh and the list
  /// is not empty.
  pub(crate) fn fresh(&self, key: &str, ttl: Duration) -> Option<Addrs> {
    if !self.is_fresh(ttl) {
      return None;
    }
    self
      .addrs
      .get(key)
      .filter(|addrs| !addrs.is_empty())
      .map(Arc::clone)
  }

  /// Replaces the list for `key` and marks the whole cache as just resolved.
  pub(crate) fn store(&mut self, key: &str, addrs: Addrs) {
    self.addrs.insert(SmolStr::new(key), addrs);
    self.resolved = Some(Instant::now());
  }

  /// Removes `addr` from the list of `key`, keeping the order of the rest.
  ///
  /// Returns the number of addresses left, or `None` if `addr` was not cached.
  pub(crate) fn evict(&mut self, key: &str, addr: &str) -> Option<usize> {
    let addrs = self.addrs.get_mut(key)?;
    let idx = addrs.iter().position(|a| a == addr)?;
    let remaining: Addrs = addrs
      .iter()
      .enumerate()
      .filter(|(i, _)| *i != idx)
      .map(|(_, a)| a.cheap_clone())
      .collect();
    *addrs = remaining;
    Some(addrs.len())
  }
}

/// Resolved addresses keyed by the `host:port` they were resolved from, behind
/// one reader/writer lock.
#[derive(Debug, Default)]
pub(crate) struct AddrCache {
  state: RwLock<CacheState>,
}

impl AddrCache {
  /// Returns the fresh, non-empty list for `key`, calling `resolve` to fill
  /// it otherwise.
  ///
  /// `resolve` runs while the write lock is held, so callers racing on a
  /// stale or empty entry wait for one resolution and then share its
  /// result. Whatever `resolve` returns, an empty list included, replaces the
  /// entry of `key` and restarts the shared TTL.
  pub(crate) async fn get_or_resolve<F, Fut, E>(
    &self,
    key: &str,
    ttl: Duration,
    resolve: F,
  ) -> Result<Addrs, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Vec<SmolStr>, E>>,
  {
    if let Some(addrs) = self.state.read().await.fresh(key, ttl) {
      return Ok(addrs);
    }

    let mut state = self.state.write().await;
    // another caller may have refreshed the cache while we were waiting
    if let Some(addrs) = state.fresh(key, ttl) {
      return Ok(addrs);
    }

    let addrs: Addrs = resolve().await?.into();
    state.store(key, Arc::clone(&addrs));
    Ok(addrs)
  }

  /// Removes `addr` from the list of `key`. See [`CacheState::evict`].
  pub(crate) async fn evict(&self, key: &str, addr: &str) -> Option<usize> {
    self.state.write().await.evict(key, addr)
  }

  /// Returns whatever is cached for `key`, fresh or not.
  pub(crate) async fn get(&self, key: &str) -> Option<Addrs> {
    self.state.read().await.addrs.get(key).map(Arc::clone)
  }

  /// Drops the list of `key`, returning it.
  pub(crate) async fn remove(&self, key: &str) -> Option<Addrs> {
    self.state.write().await.addrs.remove(key)
  }

  /// Drops every list and marks the cache stale.
  pub(crate) async fn clear(&self) {
    let mut state = self.state.write().await;
    state.addrs.clear();
    state.resolved = None;
  }

  #[cfg(test)]
  pub(crate) async fn write(&self) -> tokio::sync::RwLockWriteGuard<'_, CacheState> {
    self.state.write().await
  }
}
