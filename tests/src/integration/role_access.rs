//! # Role Access Flows
//!
//! Two-tier cache behavior across simulated process restarts, and the
//! stale-read-then-correct authorization model end to end.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use attendance_sync::adapters::{InMemoryRemoteStore, InMemoryRoleCacheStore};
    use attendance_sync::{
        AccessDecision, CacheKey, ConferenceRole, Profile, RemoteStore, Role, RoleCacheStore,
        RoleResolutionApi, RoleResolver, SyncConfig,
    };

    fn profile(id: &str, is_owner: bool) -> Profile {
        Profile {
            id: id.into(),
            first_name: "Grace".into(),
            last_name: "Hopper".into(),
            email: format!("{}@example.org", id),
            role: Role::User,
            is_owner,
            degree: None,
            short_id: format!("SID-{}", id),
            gender: None,
        }
    }

    /// The durable tier survives a "restart" (a fresh resolver over the
    /// same store) and keeps answering without the remote.
    #[tokio::test]
    async fn test_durable_tier_survives_restart() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote.add_profile(profile("u-1", false));
        remote.add_conference_role(ConferenceRole {
            user_id: "u-1".into(),
            conference_id: "c-1".into(),
            role: Role::Admin,
        });
        let durable = Arc::new(InMemoryRoleCacheStore::new());

        let resolver = RoleResolver::new(
            SyncConfig::for_testing(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&durable) as Arc<dyn RoleCacheStore>,
        );
        assert_eq!(resolver.resolve("u-1", "c-1").await.unwrap(), Role::Admin);
        drop(resolver);

        // New process: in-memory tier is empty, durable tier is not.
        let resolver = RoleResolver::new(
            SyncConfig::for_testing(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&durable) as Arc<dyn RoleCacheStore>,
        );
        let check = resolver
            .check_access("u-1", Some("c-1"), &[Role::Admin])
            .await
            .unwrap();
        assert_eq!(check.decision, AccessDecision::Granted(Role::Admin));
        // Cached answer, so a revalidation was spawned.
        check.revalidation.unwrap().await.unwrap();
    }

    /// Demotion flow: the admin page stays up for the stale read, then
    /// the revalidation demotes, rewrites both tiers, and emits the
    /// redirect the navigation shell acts on.
    #[tokio::test]
    async fn test_demotion_corrected_within_one_cycle() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote.add_profile(profile("u-1", false));
        remote.add_conference_role(ConferenceRole {
            user_id: "u-1".into(),
            conference_id: "c-1".into(),
            role: Role::Admin,
        });
        let durable = Arc::new(InMemoryRoleCacheStore::new());
        let resolver = RoleResolver::new(
            SyncConfig::for_testing(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&durable) as Arc<dyn RoleCacheStore>,
        );
        let mut redirects = resolver.subscribe_redirects().unwrap();

        assert_eq!(resolver.resolve("u-1", "c-1").await.unwrap(), Role::Admin);

        // Backstage, the admin grant is replaced by plain staff.
        remote.add_conference_role(ConferenceRole {
            user_id: "u-1".into(),
            conference_id: "c-1".into(),
            role: Role::Staff,
        });

        let check = resolver
            .check_access("u-1", Some("c-1"), &[Role::Admin, Role::Owner])
            .await
            .unwrap();
        assert_eq!(check.decision, AccessDecision::Granted(Role::Admin));

        check.revalidation.unwrap().await.unwrap();
        let event = redirects.recv().await.unwrap();
        assert_eq!(event.fresh_role, Role::Staff);
        assert_eq!(event.route, "/home");
        assert_eq!(
            durable.load(&CacheKey::new("u-1", "c-1")).unwrap(),
            Some(Role::Staff)
        );

        // The next gate check is already correct without waiting.
        let check = resolver
            .check_access("u-1", Some("c-1"), &[Role::Admin, Role::Owner])
            .await
            .unwrap();
        assert_eq!(check.decision, AccessDecision::Redirect("/home".to_string()));
        check.revalidation.unwrap().await.unwrap();
    }

    /// Owner flag set while a per-conference row exists: every surface
    /// reports owner.
    #[tokio::test]
    async fn test_owner_wins_everywhere() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote.add_profile(profile("u-1", true));
        remote.add_conference_role(ConferenceRole {
            user_id: "u-1".into(),
            conference_id: "c-1".into(),
            role: Role::User,
        });
        let resolver = RoleResolver::new(
            SyncConfig::for_testing(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::new(InMemoryRoleCacheStore::new()),
        );

        assert_eq!(resolver.resolve("u-1", "c-1").await.unwrap(), Role::Owner);
        let roster = resolver.list_conference_users("c-1", None).await.unwrap();
        assert_eq!(roster[0].role, Role::Owner);

        remote.set_fail_rpc(true);
        let roster = resolver.list_conference_users("c-1", None).await.unwrap();
        assert_eq!(roster[0].role, Role::Owner);
    }
}
