use crate::ids::{Timestamp, VersionId};

/// Pluggable source of version identity and creation time.
pub trait VersionSource {
    fn next_id(&mut self) -> VersionId;
    fn now(&mut self) -> Timestamp;
}

/// Random UUID v4 identifiers stamped with wall-clock milliseconds.
#[cfg(feature = "system")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemSource;

#[cfg(feature = "system")]
impl VersionSource for SystemSource {
    fn next_id(&mut self) -> VersionId {
        VersionId(uuid::Uuid::new_v4().to_string())
    }

    fn now(&mut self) -> Timestamp {
        chrono::Utc::now().timestamp_millis()
    }
}

/// Deterministic `v1, v2, ...` identifiers with timestamps `1, 2, ...`, for tests and replays.
#[derive(Clone, Debug, Default)]
pub struct SequentialSource {
    ids: u64,
    ticks: Timestamp,
}

impl SequentialSource {
    /// Start counting after `counter`, so the next id is `v{counter + 1}`.
    pub fn starting_at(counter: u64) -> Self {
        Self {
            ids: counter,
            ticks: counter as Timestamp,
        }
    }
}

impl VersionSource for SequentialSource {
    fn next_id(&mut self) -> VersionId {
        self.ids += 1;
        VersionId(format!("v{}", self.ids))
    }

    fn now(&mut self) -> Timestamp {
        self.ticks += 1;
        self.ticks
    }
}
