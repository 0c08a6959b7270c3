//! Keypad command staging
//!
//! A keypad edit arrives as up to five independent messages. The field
//! topics (`id`, `name`, `code`, `enabled`) only update the staged command;
//! a message on the `action` topic commits it. Field messages delivered after
//! the commit belong to the next command.
//!
//! A name or code that does not fit its buffer poisons the staged command:
//! the next commit is dropped instead of sending the previous value.

use heapless::String;
use nukihub_lock::{NAME_LEN, Name};
use nukihub_mqtt::PublishOutbox;

use crate::{publisher::TopicPublisher, result::PLACEHOLDER, topics};

/// Capacity of a staged keypad code
pub const CODE_LEN: usize = 16;

pub type Code = String<CODE_LEN>;

const DEFAULT_ID: u32 = 0;
const DEFAULT_NAME: &str = PLACEHOLDER;
const DEFAULT_CODE: &str = "000000";
const DEFAULT_ENABLED: i32 = 1;

/// Command handed to the keypad handler on commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeypadCommand<'a> {
    pub action: &'a str,
    pub id: u32,
    pub name: &'a str,
    pub code: &'a str,
    pub enabled: i32,
}

/// Fields staged so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingKeypadCommand {
    pub id: u32,
    pub name: Name,
    pub code: Code,
    pub enabled: i32,
    /// Last staged name was refused
    pub name_rejected: bool,
    /// Last staged code was refused
    pub code_rejected: bool,
}

impl PendingKeypadCommand {
    /// Field whose last staged value was refused, if any.
    pub const fn rejected_field(&self) -> Option<&'static str> {
        if self.name_rejected {
            Some("name")
        } else if self.code_rejected {
            Some("code")
        } else {
            None
        }
    }
}

impl Default for PendingKeypadCommand {
    fn default() -> Self {
        let mut name = Name::new();
        let _ = name.push_str(DEFAULT_NAME);
        let mut code = Code::new();
        let _ = code.push_str(DEFAULT_CODE);

        Self {
            id: DEFAULT_ID,
            name,
            code,
            enabled: DEFAULT_ENABLED,
            name_rejected: false,
            code_rejected: false,
        }
    }
}

/// Holds the single in-flight keypad command.
#[derive(Debug, Default)]
pub struct KeypadStaging {
    pending: PendingKeypadCommand,
}

impl KeypadStaging {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> &PendingKeypadCommand {
        &self.pending
    }

    pub fn set_id(&mut self, payload: &str) {
        self.pending.id = u32::try_from(parse_leading_int(payload)).unwrap_or(0);
    }

    pub fn set_enabled(&mut self, payload: &str) {
        self.pending.enabled = i32::try_from(parse_leading_int(payload)).unwrap_or(0);
    }

    /// Stage a name.
    ///
    /// A name longer than the lock accepts is refused and marks the staged
    /// command as rejected until a valid name is staged.
    pub fn set_name(&mut self, payload: &str) -> bool {
        let stored = store_bounded(&mut self.pending.name, payload, "name");
        self.pending.name_rejected = !stored;
        stored
    }

    /// Stage a code. Same rules as [`set_name`](Self::set_name), bounded by
    /// [`CODE_LEN`].
    pub fn set_code(&mut self, payload: &str) -> bool {
        let stored = store_bounded(&mut self.pending.code, payload, "code");
        self.pending.code_rejected = !stored;
        stored
    }

    /// Commit the staged command with `action`.
    ///
    /// The placeholder action is ignored. Any other action is passed to
    /// `handler`, after which the staging resets and every command topic is
    /// republished with its default so observers never read a stale field.
    ///
    /// When a staged field was refused the handler is not called; the
    /// staging still resets and the defaults are still republished.
    ///
    /// # Returns
    ///
    /// Whether `handler` was called.
    pub fn commit<O, F>(
        &mut self,
        action: &str,
        handler: F,
        publisher: &mut TopicPublisher<'_, O>,
    ) -> bool
    where
        O: PublishOutbox + ?Sized,
        F: FnOnce(&KeypadCommand<'_>),
    {
        if action == PLACEHOLDER {
            return false;
        }

        let staged = core::mem::take(&mut self.pending);
        let committed = if let Some(field) = staged.rejected_field() {
            log::warn!(
                "lock: dropping keypad command '{}' for code id {}, staged {} was refused",
                action,
                staged.id,
                field
            );
            false
        } else {
            let command = KeypadCommand {
                action,
                id: staged.id,
                name: staged.name.as_str(),
                code: staged.code.as_str(),
                enabled: staged.enabled,
            };
            log::info!(
                "lock: keypad command '{}' for code id {}",
                command.action,
                command.id
            );
            handler(&command);
            true
        };

        publisher.publish_str(topics::KEYPAD_COMMAND_ACTION, PLACEHOLDER);
        publisher.publish_uint(topics::KEYPAD_COMMAND_ID, self.pending.id);
        publisher.publish_str(topics::KEYPAD_COMMAND_NAME, self.pending.name.as_str());
        publisher.publish_str(topics::KEYPAD_COMMAND_CODE, self.pending.code.as_str());
        publisher.publish_int(
            topics::KEYPAD_COMMAND_ENABLED,
            i64::from(self.pending.enabled),
        );
        committed
    }
}

fn store_bounded<const N: usize>(slot: &mut String<N>, payload: &str, field: &str) -> bool {
    let mut value = String::<N>::new();
    if value.push_str(payload).is_err() {
        log::warn!(
            "lock: keypad {} of {} bytes exceeds {} bytes, keeping previous value",
            field,
            payload.len(),
            N
        );
        return false;
    }
    *slot = value;
    true
}

/// Leading decimal integer of `text`, 0 when there is none.
///
/// Leading whitespace and one sign are accepted; parsing stops at the first
/// non-digit. Values saturate at the `i64` bounds.
pub fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };

    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| {
            acc.saturating_mul(10)
                .saturating_add(i64::from(digit - b'0'))
        });

    if negative { -magnitude } else { magnitude }
}

const _: () = assert!(DEFAULT_NAME.len() <= NAME_LEN && DEFAULT_CODE.len() <= CODE_LEN);
