use core::cell::RefCell;

use embassy_sync::blocking_mutex::{Mutex, raw::RawMutex};
use embassy_time::Duration;
use nukihub_mqtt::{MqttModule, Publish, PublishOutbox, TopicCollector};

use crate::{module::LockModule, ports::LockPort};

/// [`LockModule`] behind a blocking mutex.
///
/// Lets the MQTT task and the task talking to the lock share one module. All
/// bridge state is only touched while the mutex is held, so a keypad commit
/// can never interleave with a field update.
pub struct SharedLockModule<M: RawMutex, P: LockPort, const BUF_SIZE: usize> {
    inner: Mutex<M, RefCell<LockModule<P, BUF_SIZE>>>,
}

impl<M: RawMutex, P: LockPort, const BUF_SIZE: usize> SharedLockModule<M, P, BUF_SIZE> {
    pub const fn new(module: LockModule<P, BUF_SIZE>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(module)),
        }
    }

    /// Run `f` with exclusive access to the module.
    ///
    /// Must not be re-entered from inside `f`.
    pub fn lock<R>(&self, f: impl FnOnce(&mut LockModule<P, BUF_SIZE>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }

    pub fn into_inner(self) -> LockModule<P, BUF_SIZE> {
        self.inner.into_inner().into_inner()
    }
}

impl<M: RawMutex, P: LockPort, const BUF_SIZE: usize> MqttModule
    for &SharedLockModule<M, P, BUF_SIZE>
{
    fn register(&self, collector: &mut dyn TopicCollector) {
        self.inner.lock(|cell| cell.borrow().register(collector));
    }

    fn on_start(&mut self, outbox: &mut dyn PublishOutbox) {
        self.lock(|module| module.on_start(outbox));
    }

    fn on_message(&mut self, msg: &Publish<'_>, outbox: &mut dyn PublishOutbox) {
        self.lock(|module| module.on_message(msg, outbox));
    }

    fn on_tick(&mut self, outbox: &mut dyn PublishOutbox) -> Duration {
        self.lock(|module| module.on_tick(outbox))
    }

    fn on_reconnect(&mut self) {
        self.lock(|module| module.on_reconnect());
    }

    fn needs_immediate_publish(&self) -> bool {
        self.inner
            .lock(|cell| cell.borrow().needs_immediate_publish())
    }
}
