//! # Integration Test Flows
//!
//! Exercises the scan desk, the reconciliation loop, and the
//! notification side-effects together, over the in-memory adapters.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use attendance_sync::adapters::{
        InMemoryLocalMirror, InMemoryRemoteStore, RecordingPushDispatch,
    };
    use attendance_sync::{
        AgendaStatus, Event, EventInterest, LocalMirror, NotificationDispatch, Notifier, Profile,
        ReconciliationApi, RemoteStore, Role, ScanSession, ScanState, SyncConfig, SyncContext,
        SyncOrchestrator,
    };

    // =========================================================================
    // TEST FIXTURES
    // =========================================================================

    fn profile(id: &str, short_id: &str, is_owner: bool) -> Profile {
        Profile {
            id: id.into(),
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            email: format!("{}@example.org", id),
            role: Role::User,
            is_owner,
            degree: None,
            short_id: short_id.into(),
            gender: None,
        }
    }

    fn event(id: &str, duration_days: u32, gives_certificate: bool) -> Event {
        Event {
            id: id.into(),
            conference_id: "c-1".into(),
            title: format!("Event {}", id),
            starts_at: 1_750_000_000,
            duration_days,
            gives_certificate,
            speaker_id: None,
        }
    }

    struct Harness {
        remote: Arc<InMemoryRemoteStore>,
        mirror: Arc<InMemoryLocalMirror>,
        push: Arc<RecordingPushDispatch>,
        notifier: Arc<Notifier>,
        orchestrator: SyncOrchestrator,
    }

    fn harness() -> Harness {
        let remote = Arc::new(InMemoryRemoteStore::new());
        let mirror = Arc::new(InMemoryLocalMirror::new());
        let push = Arc::new(RecordingPushDispatch::new());
        let notifier = Arc::new(Notifier::new(
            SyncConfig::for_testing(),
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&push) as Arc<dyn NotificationDispatch>,
        ));
        let orchestrator = SyncOrchestrator::new(
            Arc::clone(&remote) as Arc<dyn RemoteStore>,
            Arc::clone(&mirror) as Arc<dyn LocalMirror>,
        );
        Harness {
            remote,
            mirror,
            push,
            notifier,
            orchestrator,
        }
    }

    fn scan_session(h: &Harness) -> ScanSession {
        ScanSession::new(
            Arc::clone(&h.remote) as Arc<dyn RemoteStore>,
            Arc::clone(&h.notifier),
            "c-1",
        )
    }

    // =========================================================================
    // SCAN DESK -> CERTIFICATE PUSH
    // =========================================================================

    /// A three-day event: the certificate push fires after the third
    /// confirmed scan and never again.
    #[tokio::test]
    async fn test_three_day_event_certificate_fires_once() {
        let h = harness();
        h.remote.add_profile(profile("u-1", "CK2-AB12", false));
        h.remote.add_event(event("e-1", 3, true));

        let mut session = scan_session(&h);
        session.start("e-1").unwrap();

        let mut pushes_after = Vec::new();
        for _ in 0..4 {
            session.handle_decode("CK2-AB12").await.unwrap();
            let outcome = session.confirm().await.unwrap();
            outcome.certificate_check.await.unwrap();
            pushes_after.push(h.push.sent_to("u-1").len());
        }

        assert_eq!(pushes_after, vec![0, 0, 1, 1]);
        assert_eq!(h.remote.attendance_rows("u-1", "e-1"), 4);
    }

    /// Scan desk accepts both payload forms and the session keeps
    /// cycling without manual resets.
    #[tokio::test]
    async fn test_scan_desk_full_cycle() {
        let h = harness();
        h.remote.add_profile(profile("u-1", "CK2-AB12", false));
        h.remote.add_profile(profile("u-2", "CK2-CD34", false));
        h.remote.add_event(event("e-1", 1, true));

        let mut session = scan_session(&h);
        session.start("e-1").unwrap();

        // First participant, bare payload.
        session.handle_decode("CK2-AB12").await.unwrap();
        session.confirm().await.unwrap().certificate_check.await.unwrap();

        // Unknown badge in between: transient, desk keeps running.
        assert!(session.handle_decode("ZZZ-9999").await.is_err());
        assert_eq!(session.state(), ScanState::Scanning);

        // Second participant, JSON envelope payload.
        session
            .handle_decode(r#"{"id":"CK2-CD34"}"#)
            .await
            .unwrap();
        session.confirm().await.unwrap().certificate_check.await.unwrap();

        assert_eq!(h.remote.attendance_rows("u-1", "e-1"), 1);
        assert_eq!(h.remote.attendance_rows("u-2", "e-1"), 1);
        // Single-day certificate event: both got their push.
        assert_eq!(h.push.sent_to("u-1").len(), 1);
        assert_eq!(h.push.sent_to("u-2").len(), 1);
    }

    // =========================================================================
    // SCAN -> SYNC -> MIRROR
    // =========================================================================

    /// Attendance committed at the desk shows up in the participant's
    /// mirror as a ticket plus an attending agenda entry.
    #[tokio::test]
    async fn test_committed_scan_reaches_the_mirror() {
        let h = harness();
        h.remote.add_profile(profile("u-1", "CK2-AB12", false));
        h.remote.add_event(event("e-1", 2, true));
        h.remote.add_interest(EventInterest {
            user_id: "u-1".into(),
            event_id: "e-1".into(),
        });

        // Before any scan: interested only.
        h.orchestrator
            .run_pass(&SyncContext::ready("u-1", "c-1"))
            .await
            .unwrap();
        assert_eq!(
            h.mirror.snapshot().agenda["e-1"].status,
            AgendaStatus::Interested
        );
        assert!(h.mirror.snapshot().tickets.is_empty());

        let mut session = scan_session(&h);
        session.start("e-1").unwrap();
        session.handle_decode("CK2-AB12").await.unwrap();
        session.confirm().await.unwrap().certificate_check.await.unwrap();

        let mut revision = h.mirror.subscribe();
        h.orchestrator
            .run_pass(&SyncContext::ready("u-1", "c-1"))
            .await
            .unwrap();
        revision.changed().await.unwrap();

        let snap = h.mirror.snapshot();
        assert_eq!(snap.agenda["e-1"].status, AgendaStatus::Attending);
        assert_eq!(snap.tickets.len(), 1);
        // 1 of 2 required scans: no certificate projected yet.
        assert!(snap.certificates.is_empty());
    }

    /// Reconciliation is idempotent and rapid re-triggers (connectivity
    /// flapping) converge on the same mirror contents.
    #[tokio::test]
    async fn test_flapping_triggers_converge() {
        let h = harness();
        h.remote.add_profile(profile("u-1", "CK2-AB12", false));
        h.remote.add_event(event("e-1", 1, true));
        h.remote.add_interest(EventInterest {
            user_id: "u-1".into(),
            event_id: "e-1".into(),
        });

        let ctx = SyncContext::ready("u-1", "c-1");
        h.orchestrator.run_pass(&ctx).await.unwrap();
        let baseline = h.mirror.snapshot();

        for _ in 0..5 {
            h.orchestrator.run_pass(&ctx).await.unwrap();
        }
        assert_eq!(h.mirror.snapshot(), baseline);
        assert_eq!(h.orchestrator.passes_completed(), 6);
    }

    // =========================================================================
    // REMINDER CRON BOUNDARY
    // =========================================================================

    /// The cron trigger shares the push collaborator with the
    /// certificate check and neither interferes with the other.
    #[tokio::test]
    async fn test_reminders_and_certificates_share_dispatch() {
        let h = harness();
        h.remote.add_profile(profile("u-1", "CK2-AB12", false));

        let now = 2_000_000u64;
        let mut soon = event("e-soon", 1, true);
        soon.starts_at = now + 90; // inside for_testing() window [60, 120]
        h.remote.add_event(soon);
        h.remote.add_interest(EventInterest {
            user_id: "u-1".into(),
            event_id: "e-soon".into(),
        });

        let sent = h.notifier.run_reminder_pass("c-1", now).await.unwrap();
        assert_eq!(sent, 1);

        let mut session = scan_session(&h);
        session.start("e-soon").unwrap();
        session.handle_decode("CK2-AB12").await.unwrap();
        session.confirm().await.unwrap().certificate_check.await.unwrap();

        let messages = h.push.sent_to("u-1");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].title, "Starting soon");
        assert_eq!(messages[1].title, "Certificate ready");
    }
}
