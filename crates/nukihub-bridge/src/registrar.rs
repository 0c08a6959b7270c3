//! Inbound topic subscriptions and their initial values

use nukihub_mqtt::{PublishOutbox, TopicCollector};

use crate::{publisher::TopicPublisher, topic::TopicResolver, topics};

/// An inbound topic and the value seeded on it at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopicDefault {
    pub suffix: &'static str,
    pub default: Option<&'static str>,
}

impl TopicDefault {
    const fn new(suffix: &'static str, default: Option<&'static str>) -> Self {
        Self { suffix, default }
    }
}

/// Topics subscribed regardless of configuration
pub const CORE_TOPICS: &[TopicDefault] = &[
    TopicDefault::new(topics::LOCK_ACTION, Some("--")),
    TopicDefault::new(topics::CONFIG_ACTION, Some("--")),
    TopicDefault::new(topics::MAINTENANCE_RESET, Some("0")),
    TopicDefault::new(topics::QUERY_CONFIG, Some("0")),
    TopicDefault::new(topics::QUERY_LOCKSTATE, Some("0")),
    TopicDefault::new(topics::QUERY_BATTERY, Some("0")),
];

/// Topics subscribed only while keypad control is enabled
pub const KEYPAD_TOPICS: &[TopicDefault] = &[
    TopicDefault::new(topics::KEYPAD_COMMAND_ACTION, Some("--")),
    TopicDefault::new(topics::KEYPAD_COMMAND_ID, Some("0")),
    TopicDefault::new(topics::KEYPAD_COMMAND_NAME, Some("--")),
    TopicDefault::new(topics::KEYPAD_COMMAND_CODE, Some("000000")),
    TopicDefault::new(topics::KEYPAD_COMMAND_ENABLED, Some("1")),
    TopicDefault::new(topics::QUERY_KEYPAD, Some("0")),
];

/// Keeps the subscription set and seeds defaults once per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionRegistrar {
    keypad_enabled: bool,
    seeded: bool,
}

impl SubscriptionRegistrar {
    pub const fn new(keypad_enabled: bool) -> Self {
        Self {
            keypad_enabled,
            seeded: false,
        }
    }

    pub const fn keypad_enabled(&self) -> bool {
        self.keypad_enabled
    }

    /// Every active inbound topic, core first.
    pub fn active(&self) -> impl Iterator<Item = &'static TopicDefault> {
        let keypad: &'static [TopicDefault] = if self.keypad_enabled {
            KEYPAD_TOPICS
        } else {
            &[]
        };
        CORE_TOPICS.iter().chain(keypad.iter())
    }

    /// Whether `suffix` is one of the active inbound topics.
    pub fn is_active(&self, suffix: &str) -> bool {
        self.active().any(|entry| entry.suffix == suffix)
    }

    pub fn register(&self, resolver: &TopicResolver, collector: &mut dyn TopicCollector) {
        for entry in self.active() {
            collector.add(resolver.resolve(entry.suffix).as_str());
        }
    }

    /// Publish the default of every active inbound topic.
    ///
    /// Only the first call publishes. Returns whether anything was sent.
    pub fn seed_defaults<O: PublishOutbox + ?Sized>(
        &mut self,
        publisher: &mut TopicPublisher<'_, O>,
    ) -> bool {
        if self.seeded {
            return false;
        }
        self.seeded = true;

        for entry in self.active() {
            if let Some(default) = entry.default {
                publisher.publish_str(entry.suffix, default);
            }
        }
        log::info!(
            "lock: seeded command topic defaults (keypad control {})",
            if self.keypad_enabled { "on" } else { "off" }
        );
        true
    }
}
