//! Topic namespace resolution
//!
//! A topic is the configured lock path followed by a catalog suffix. The
//! prefix is validated once, at construction; after that every resolved
//! topic is guaranteed to fit [`MAX_TOPIC_LEN`].

use heapless::String;

use crate::{
    config::{DEFAULT_LOCK_PATH, PreferenceStore, keys},
    error::BridgeError,
};

/// Longest fully-qualified topic
pub const MAX_TOPIC_LEN: usize = 128;
/// Longest catalog or slot suffix
pub const MAX_SUFFIX_LEN: usize = 48;
/// Longest accepted lock path
pub const MAX_PREFIX_LEN: usize = MAX_TOPIC_LEN - MAX_SUFFIX_LEN;

/// Fully-qualified topic
pub type Topic = String<MAX_TOPIC_LEN>;

type Prefix = String<MAX_PREFIX_LEN>;

/// Builds and recognises topics under one lock path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicResolver {
    prefix: Prefix,
}

impl TopicResolver {
    /// Validate a lock path.
    ///
    /// A trailing `/` is dropped since every suffix starts with one. An empty
    /// path falls back to [`DEFAULT_LOCK_PATH`]; a path longer than
    /// [`MAX_PREFIX_LEN`] is refused.
    pub fn new(path: &str) -> Result<Self, BridgeError> {
        let path = path.trim_end_matches('/');
        let path = if path.is_empty() {
            DEFAULT_LOCK_PATH
        } else {
            path
        };

        let mut prefix = Prefix::new();
        prefix
            .push_str(path)
            .map_err(|()| BridgeError::PrefixTooLong {
                len: path.len(),
                max: MAX_PREFIX_LEN,
            })?;

        Ok(Self { prefix })
    }

    /// Load the lock path from the preference store.
    ///
    /// When no path is stored the default is written back so later boots
    /// and other components see the same value.
    pub fn load(prefs: &mut impl PreferenceStore) -> Result<Self, BridgeError> {
        let stored = prefs
            .get_string(keys::MQTT_LOCK_PATH)
            .filter(|path| !path.is_empty());

        match stored {
            Some(path) => Self::new(path.as_str()),
            None => {
                log::info!("lock: no lock path stored, using '{}'", DEFAULT_LOCK_PATH);
                prefs.put_string(keys::MQTT_LOCK_PATH, DEFAULT_LOCK_PATH)?;
                Self::new(DEFAULT_LOCK_PATH)
            }
        }
    }

    pub fn prefix(&self) -> &str {
        self.prefix.as_str()
    }

    /// `prefix ‖ suffix`.
    ///
    /// Suffixes come from the catalog; one longer than [`MAX_SUFFIX_LEN`] is a
    /// programming error.
    pub fn resolve(&self, suffix: &str) -> Topic {
        assert!(
            suffix.len() <= MAX_SUFFIX_LEN,
            "topic suffix '{}' exceeds MAX_SUFFIX_LEN",
            suffix
        );

        let mut topic = Topic::new();
        // MAX_PREFIX_LEN + MAX_SUFFIX_LEN == MAX_TOPIC_LEN
        let _ = topic.push_str(self.prefix.as_str());
        let _ = topic.push_str(suffix);
        topic
    }

    /// `true` iff `candidate == resolve(suffix)`.
    pub fn matches(&self, candidate: &str, suffix: &str) -> bool {
        candidate.strip_prefix(self.prefix.as_str()) == Some(suffix)
    }

    /// The suffix part of a topic under this prefix.
    pub fn suffix_of<'t>(&self, candidate: &'t str) -> Option<&'t str> {
        candidate
            .strip_prefix(self.prefix.as_str())
            .filter(|suffix| suffix.starts_with('/'))
    }
}
