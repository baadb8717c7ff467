//! In-memory implementation of `LocalMirror` for testing.
//!
//! Bulk-puts are last-writer-wins overwrites keyed by id. Every write
//! bumps a watch revision so reactive consumers re-render.

use crate::domain::{
    LocalAgendaItem, LocalCertificate, LocalProfile, LocalTicket, MirrorSnapshot, SyncError,
};
use crate::ports::LocalMirror;
use parking_lot::RwLock;
use tokio::sync::watch;

/// In-memory local mirror.
pub struct InMemoryLocalMirror {
    data: RwLock<MirrorSnapshot>,
    revision_tx: watch::Sender<u64>,
}

impl InMemoryLocalMirror {
    /// Create an empty mirror at revision 0.
    pub fn new() -> Self {
        let (revision_tx, _) = watch::channel(0);
        Self {
            data: RwLock::new(MirrorSnapshot::default()),
            revision_tx,
        }
    }

    fn bump(&self) {
        self.revision_tx.send_modify(|rev| *rev += 1);
    }

    /// Current revision number.
    pub fn revision(&self) -> u64 {
        *self.revision_tx.borrow()
    }
}

impl Default for InMemoryLocalMirror {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalMirror for InMemoryLocalMirror {
    fn get_profile(&self, id: &str) -> Option<LocalProfile> {
        self.data.read().profiles.get(id).cloned()
    }

    fn put_profile(&self, profile: LocalProfile) -> Result<(), SyncError> {
        self.data
            .write()
            .profiles
            .insert(profile.id.clone(), profile);
        self.bump();
        Ok(())
    }

    fn put_agenda_items(&self, items: Vec<LocalAgendaItem>) -> Result<(), SyncError> {
        {
            let mut data = self.data.write();
            for item in items {
                data.agenda.insert(item.event_id.clone(), item);
            }
        }
        self.bump();
        Ok(())
    }

    fn put_tickets(&self, tickets: Vec<LocalTicket>) -> Result<(), SyncError> {
        {
            let mut data = self.data.write();
            for ticket in tickets {
                data.tickets.insert(ticket.event_id.clone(), ticket);
            }
        }
        self.bump();
        Ok(())
    }

    fn put_certificates(&self, certificates: Vec<LocalCertificate>) -> Result<(), SyncError> {
        {
            let mut data = self.data.write();
            for cert in certificates {
                data.certificates.insert(cert.event_id.clone(), cert);
            }
        }
        self.bump();
        Ok(())
    }

    fn snapshot(&self) -> MirrorSnapshot {
        self.data.read().clone()
    }

    fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision_tx.subscribe()
    }
}
