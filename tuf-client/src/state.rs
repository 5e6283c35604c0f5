use crate::verify::Verified;
use chrono::{DateTime, Utc};
use tuf_client_json::root::Root;
use tuf_client_json::snapshot::Snapshot;
use tuf_client_json::timestamp::Timestamp;

/// How far the chain of trust has been established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientState {
    Untrusted,
    RootTrusted,
    TimestampTrusted,
    SnapshotTrusted,
}

/// The metadata trusted by a client. Every stage reads it and replaces its own role on success.
#[derive(Debug, Clone, Default)]
pub struct TrustedState {
    pub(crate) root: Option<Verified<Root>>,
    pub(crate) timestamp: Option<Verified<Timestamp>>,
    pub(crate) snapshot: Option<Verified<Snapshot>>,
    /// Fixed instant all expiry checks of the current update compare against.
    pub(crate) update_start: Option<DateTime<Utc>>,
}

impl TrustedState {
    pub fn root(&self) -> Option<&Verified<Root>> {
        self.root.as_ref()
    }

    pub fn timestamp(&self) -> Option<&Verified<Timestamp>> {
        self.timestamp.as_ref()
    }

    pub fn snapshot(&self) -> Option<&Verified<Snapshot>> {
        self.snapshot.as_ref()
    }

    pub fn update_start(&self) -> Option<DateTime<Utc>> {
        self.update_start
    }

    pub fn state(&self) -> ClientState {
        match (&self.root, &self.timestamp, &self.snapshot) {
            (None, _, _) => ClientState::Untrusted,
            (Some(_), None, _) => ClientState::RootTrusted,
            (Some(_), Some(_), None) => ClientState::TimestampTrusted,
            (Some(_), Some(_), Some(_)) => ClientState::SnapshotTrusted,
        }
    }

    /// Forget the timestamp and snapshot, used after their keys were rotated.
    pub(crate) fn discard_timestamp_and_snapshot(&mut self) {
        self.timestamp = None;
        self.snapshot = None;
    }
}
