//! # Role Resolution Engine
//!
//! Computes the effective role for the selected conference with two
//! cache tiers: an in-process LRU (cleared on restart) over a durable
//! device-local store (survives restart).
//!
//! Authorization checks serve a cached role optimistically so navigation
//! never blocks on the network, then revalidate in the background. A
//! demoted user keeps elevated UI access for at most one revalidation
//! cycle; the correction emits a redirect event.

use crate::algorithms::role_precedence;
use crate::config::SyncConfig;
use crate::domain::{
    AccessDecision, CacheKey, ConferenceRole, RedirectEvent, Role, RosterEntry, SyncError,
};
use crate::ports::{AccessCheck, RemoteStore, RoleCacheStore, RoleResolutionApi};
use async_trait::async_trait;
use lru::LruCache;
use parking_lot::Mutex;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Resolve the effective role from the two source tables.
///
/// Owner short-circuits: when `is_owner` is set, the per-conference
/// override is never queried. Absence of an override row means the
/// default role `user`.
pub async fn resolve_effective_role(
    remote: &dyn RemoteStore,
    user_id: &str,
    conference_id: &str,
) -> Result<Role, SyncError> {
    let profile = remote
        .get_profile(user_id)
        .await?
        .ok_or_else(|| SyncError::ProfileNotFound(user_id.to_string()))?;

    if profile.is_owner {
        return Ok(Role::Owner);
    }

    let override_role = remote
        .get_conference_role(user_id, conference_id)
        .await?
        .map(|row| row.role);

    Ok(role_precedence(false, override_role))
}

/// Role resolution engine with its two cache tiers.
pub struct RoleResolver {
    config: SyncConfig,
    remote: Arc<dyn RemoteStore>,
    durable: Arc<dyn RoleCacheStore>,
    memory: Arc<Mutex<LruCache<CacheKey, Role>>>,
    redirects_tx: mpsc::UnboundedSender<RedirectEvent>,
    redirects_rx: Mutex<Option<mpsc::UnboundedReceiver<RedirectEvent>>>,
}

impl RoleResolver {
    /// Create a resolver over the given collaborators.
    pub fn new(
        config: SyncConfig,
        remote: Arc<dyn RemoteStore>,
        durable: Arc<dyn RoleCacheStore>,
    ) -> Self {
        let capacity = NonZeroUsize::new(config.role_cache_capacity)
            .unwrap_or(NonZeroUsize::new(DEFAULT_CAPACITY_FALLBACK).unwrap());
        let (redirects_tx, redirects_rx) = mpsc::unbounded_channel();
        Self {
            config,
            remote,
            durable,
            memory: Arc::new(Mutex::new(LruCache::new(capacity))),
            redirects_tx,
            redirects_rx: Mutex::new(Some(redirects_rx)),
        }
    }

    /// Take the redirect event stream. Yields `None` after the first
    /// call; one consumer (the navigation shell) owns it.
    pub fn subscribe_redirects(&self) -> Option<mpsc::UnboundedReceiver<RedirectEvent>> {
        self.redirects_rx.lock().take()
    }

    /// Cached role for a key, promoting durable hits into memory.
    fn cached(&self, key: &CacheKey) -> Option<Role> {
        if let Some(role) = self.memory.lock().get(key).copied() {
            return Some(role);
        }
        match self.durable.load(key) {
            Ok(Some(role)) => {
                self.memory.lock().put(key.clone(), role);
                Some(role)
            }
            Ok(None) => None,
            Err(e) => {
                warn!("durable role cache read failed: {}", e);
                None
            }
        }
    }

    /// Write a resolved role through both tiers.
    fn store_cached(&self, key: &CacheKey, role: Role) {
        self.memory.lock().put(key.clone(), role);
        if let Err(e) = self.durable.store(key, role) {
            warn!("durable role cache write failed: {}", e);
        }
    }

    /// Drop one key from both tiers.
    pub fn invalidate(&self, user_id: &str, conference_id: &str) {
        let key = CacheKey::new(user_id, conference_id);
        self.memory.lock().pop(&key);
        if let Err(e) = self.durable.remove(&key) {
            warn!("durable role cache remove failed: {}", e);
        }
    }

    /// Drop everything (sign-out).
    pub fn clear(&self) {
        self.memory.lock().clear();
        if let Err(e) = self.durable.clear() {
            warn!("durable role cache clear failed: {}", e);
        }
    }

    fn decide(&self, role: Role, required: &[Role]) -> AccessDecision {
        if role.satisfies(required) {
            AccessDecision::Granted(role)
        } else {
            AccessDecision::Redirect(self.config.fallback_route.clone())
        }
    }

    /// Spawn the background revalidation for a cache-served decision.
    fn spawn_revalidation(
        &self,
        key: CacheKey,
        cached: Role,
        required: Vec<Role>,
    ) -> tokio::task::JoinHandle<()> {
        let remote = Arc::clone(&self.remote);
        let durable = Arc::clone(&self.durable);
        let memory = Arc::clone(&self.memory);
        let redirects_tx = self.redirects_tx.clone();
        let fallback_route = self.config.fallback_route.clone();

        tokio::spawn(async move {
            let fresh =
                match resolve_effective_role(remote.as_ref(), &key.user_id, &key.conference_id)
                    .await
                {
                    Ok(role) => role,
                    Err(e) => {
                        warn!(
                            "role revalidation for ({}, {}) failed: {}",
                            key.user_id, key.conference_id, e
                        );
                        return;
                    }
                };

            if fresh == cached {
                return;
            }

            debug!(
                "role for ({}, {}) changed: {} -> {}",
                key.user_id, key.conference_id, cached, fresh
            );
            memory.lock().put(key.clone(), fresh);
            if let Err(e) = durable.store(&key, fresh) {
                warn!("durable role cache write failed: {}", e);
            }

            if !fresh.satisfies(&required) {
                let _ = redirects_tx.send(RedirectEvent {
                    user_id: key.user_id.clone(),
                    conference_id: key.conference_id.clone(),
                    route: fallback_route,
                    fresh_role: fresh,
                });
            }
        })
    }
}

const DEFAULT_CAPACITY_FALLBACK: usize = 16;

#[async_trait]
impl RoleResolutionApi for RoleResolver {
    async fn resolve(&self, user_id: &str, conference_id: &str) -> Result<Role, SyncError> {
        let role = resolve_effective_role(self.remote.as_ref(), user_id, conference_id).await?;
        self.store_cached(&CacheKey::new(user_id, conference_id), role);
        Ok(role)
    }

    async fn check_access(
        &self,
        user_id: &str,
        conference_id: Option<&str>,
        required: &[Role],
    ) -> Result<AccessCheck, SyncError> {
        let conference_id = match conference_id {
            Some(id) => id,
            None => {
                // No conference selected: assume the default role. A
                // gated page redirects to conference selection instead
                // of failing authorization.
                let decision = if required.is_empty() {
                    AccessDecision::Granted(Role::User)
                } else {
                    AccessDecision::Redirect(self.config.conference_select_route.clone())
                };
                return Ok(AccessCheck {
                    decision,
                    revalidation: None,
                });
            }
        };

        let key = CacheKey::new(user_id, conference_id);

        if let Some(cached) = self.cached(&key) {
            // Stale-but-fast: answer from cache, correct in background.
            let decision = self.decide(cached, required);
            let revalidation = self.spawn_revalidation(key, cached, required.to_vec());
            return Ok(AccessCheck {
                decision,
                revalidation: Some(revalidation),
            });
        }

        let fresh = self.resolve(user_id, conference_id).await?;
        Ok(AccessCheck {
            decision: self.decide(fresh, required),
            revalidation: None,
        })
    }

    async fn assign_role(
        &self,
        user_id: &str,
        conference_id: &str,
        role: Role,
    ) -> Result<(), SyncError> {
        self.remote
            .upsert_conference_role(ConferenceRole {
                user_id: user_id.to_string(),
                conference_id: conference_id.to_string(),
                role,
            })
            .await?;
        self.invalidate(user_id, conference_id);
        Ok(())
    }

    async fn list_conference_users(
        &self,
        conference_id: &str,
        search: Option<&str>,
    ) -> Result<Vec<RosterEntry>, SyncError> {
        match self
            .remote
            .get_users_for_conference(conference_id, search)
            .await
        {
            Ok(roster) => Ok(roster),
            Err(e) => {
                warn!("role-aware user listing rpc failed, falling back: {}", e);
                let profiles = self.remote.list_profiles(search).await?;
                let mut roster = Vec::with_capacity(profiles.len());
                for profile in profiles {
                    let role = if profile.is_owner {
                        Role::Owner
                    } else {
                        let override_role = self
                            .remote
                            .get_conference_role(&profile.id, conference_id)
                            .await?
                            .map(|row| row.role);
                        role_precedence(false, override_role)
                    };
                    roster.push(RosterEntry { profile, role });
                }
                Ok(roster)
            }
        }
    }
}
