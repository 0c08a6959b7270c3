//! Command result reporting

use core::fmt;

use nukihub_mqtt::PublishOutbox;

use crate::publisher::TopicPublisher;

/// Outcome of a lock or configuration command.
///
/// Every command is answered with exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultCode {
    Success,
    UnknownAction,
    AccessDenied,
    Failed,
}

impl ResultCode {
    /// Token published back on the command topic
    pub const fn as_str(self) -> &'static str {
        match self {
            ResultCode::Success => "ack",
            ResultCode::UnknownAction => "unknown_action",
            ResultCode::AccessDenied => "denied",
            ResultCode::Failed => "error",
        }
    }

    pub fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "ack" => ResultCode::Success,
            "unknown_action" => ResultCode::UnknownAction,
            "denied" => ResultCode::AccessDenied,
            "error" => ResultCode::Failed,
            _ => return None,
        })
    }
}

impl fmt::Display for ResultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Neutral value of a command topic
pub const PLACEHOLDER: &str = "--";

/// Whether a command payload is one the bridge itself publishes.
///
/// Such payloads come back to us through our own subscription and must not
/// be treated as new commands.
pub fn is_protocol_echo(payload: &str) -> bool {
    payload.is_empty() || payload == PLACEHOLDER || ResultCode::from_token(payload).is_some()
}

/// Publish `code` on the command topic it answers.
pub fn report<O: PublishOutbox + ?Sized>(
    publisher: &mut TopicPublisher<'_, O>,
    origin: &str,
    code: ResultCode,
) {
    log::debug!("lock: {} -> {}", origin, code);
    publisher.publish_str(origin, code.as_str());
}
