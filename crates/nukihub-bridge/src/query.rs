//! Refresh request coalescing

use nukihub_mqtt::PublishOutbox;

use crate::{publisher::TopicPublisher, topics};

/// Payload that requests a refresh
const REQUEST: &str = "1";
/// Payload republished once a request is recorded
const IDLE: &str = "0";

/// Data category an operator can ask to have refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Config,
    LockState,
    Keypad,
    Battery,
}

impl QueryKind {
    pub const ALL: [QueryKind; 4] = [
        QueryKind::Config,
        QueryKind::LockState,
        QueryKind::Keypad,
        QueryKind::Battery,
    ];

    const fn flag(self) -> u8 {
        match self {
            QueryKind::Config => 1 << 0,
            QueryKind::LockState => 1 << 1,
            QueryKind::Keypad => 1 << 2,
            QueryKind::Battery => 1 << 3,
        }
    }

    /// Query topic of the category
    pub const fn suffix(self) -> &'static str {
        match self {
            QueryKind::Config => topics::QUERY_CONFIG,
            QueryKind::LockState => topics::QUERY_LOCKSTATE,
            QueryKind::Keypad => topics::QUERY_KEYPAD,
            QueryKind::Battery => topics::QUERY_BATTERY,
        }
    }

    pub fn from_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.suffix() == suffix)
    }
}

/// Set of pending refresh requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QueryCommands(u8);

impl QueryCommands {
    pub const EMPTY: Self = Self(0);

    pub const fn contains(self, kind: QueryKind) -> bool {
        self.0 & kind.flag() != 0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn with(self, kind: QueryKind) -> Self {
        Self(self.0 | kind.flag())
    }

    pub fn insert(&mut self, kind: QueryKind) {
        *self = self.with(kind);
    }

    pub fn iter(self) -> impl Iterator<Item = QueryKind> {
        QueryKind::ALL
            .into_iter()
            .filter(move |kind| self.contains(*kind))
    }
}

/// Collects refresh requests until the poll cycle drains them.
#[derive(Debug, Default)]
pub struct QueryCoalescer {
    pending: QueryCommands,
}

impl QueryCoalescer {
    pub const fn new() -> Self {
        Self {
            pending: QueryCommands::EMPTY,
        }
    }

    /// Handle a payload received on the query topic of `kind`.
    ///
    /// Only `"1"` counts as a request; it is acknowledged right away by
    /// republishing `"0"`. Returns whether the request was recorded.
    pub fn on_request<O: PublishOutbox + ?Sized>(
        &mut self,
        kind: QueryKind,
        payload: &str,
        publisher: &mut TopicPublisher<'_, O>,
    ) -> bool {
        if payload != REQUEST {
            return false;
        }

        self.request(kind);
        publisher.publish_str(kind.suffix(), IDLE);
        true
    }

    /// Record a request without acknowledging it.
    pub fn request(&mut self, kind: QueryKind) {
        self.pending.insert(kind);
    }

    pub const fn pending(&self) -> QueryCommands {
        self.pending
    }

    /// Take every pending request, leaving the set empty.
    pub fn drain(&mut self) -> QueryCommands {
        core::mem::take(&mut self.pending)
    }
}
