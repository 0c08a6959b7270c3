/// MQTT delivery guarantee requested for a publish or subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QoS {
    /// Fire and forget
    #[default]
    AtMostOnce,
    /// Acknowledged delivery, possibly duplicated
    AtLeastOnce,
}

/// Inbound application message handed to modules.
///
/// Borrows the transport's receive buffer, so it only lives for the
/// duration of a single dispatch.
#[derive(Debug, Clone, Copy)]
pub struct Publish<'a> {
    pub topic: &'a str,
    pub payload: &'a [u8],
}

impl<'a> Publish<'a> {
    pub const fn new(topic: &'a str, payload: &'a [u8]) -> Self {
        Self { topic, payload }
    }
}
