//! Replay-latest publish/subscribe channel.
//!
//! Every subscriber is first handed the most recently published value, then
//! each later publication in emission order. Only the latest value is
//! retained; there is no history buffer.
//!
//! Handlers always run outside the channel lock, so a handler may publish,
//! subscribe or unsubscribe. A publication made from inside a handler is
//! queued and delivered once the current delivery finishes, which keeps every
//! subscriber's view in emission order.
//!
//! One thread delivers at a time. An emitter on another thread waits for the
//! running delivery loop to go idle, so its own publication has reached every
//! subscriber by the time `publish` returns.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError, Weak};
use std::thread::{self, ThreadId};

/// A subscriber callback.
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync + 'static>;

struct Registered<T> {
    id: u64,
    /// Sequence number of the value replayed on subscription.
    joined_at: u64,
    handler: Handler<T>,
}

struct Delivery<T> {
    seq: u64,
    value: T,
    /// Replays target a single subscriber.
    only: Option<u64>,
}

struct ChannelState<T> {
    latest: T,
    seq: u64,
    next_id: u64,
    handlers: Vec<Registered<T>>,
    queue: VecDeque<Delivery<T>>,
    /// Thread currently running the delivery loop.
    delivering: Option<ThreadId>,
}

impl<T: Clone> ChannelState<T> {
    fn recipients(&self, delivery: &Delivery<T>) -> Vec<Handler<T>> {
        self.handlers
            .iter()
            .filter(|registered| match delivery.only {
                Some(id) => registered.id == id,
                None => registered.joined_at < delivery.seq,
            })
            .map(|registered| Arc::clone(&registered.handler))
            .collect()
    }
}

struct Channel<T> {
    state: Mutex<ChannelState<T>>,
    /// Signalled whenever the delivery loop goes idle.
    idle: Condvar,
}

impl<T> Channel<T> {
    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn release(&self, mut state: MutexGuard<'_, ChannelState<T>>) {
        state.delivering = None;
        drop(state);
        self.idle.notify_all();
    }
}

/// Replay-latest broadcast channel.
///
/// Cloning yields another handle to the same channel.
pub struct Broadcast<T> {
    inner: Arc<Channel<T>>,
}

impl<T> Clone for Broadcast<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Clone + Send + 'static> Broadcast<T> {
    /// Creates a channel whose first replay is `initial`.
    #[must_use]
    pub fn new(initial: T) -> Self {
        Self {
            inner: Arc::new(Channel {
                state: Mutex::new(ChannelState {
                    latest: initial,
                    seq: 0,
                    next_id: 0,
                    handlers: Vec::new(),
                    queue: VecDeque::new(),
                    delivering: None,
                }),
                idle: Condvar::new(),
            }),
        }
    }

    /// Returns the most recently published value.
    #[must_use]
    pub fn latest(&self) -> T {
        self.lock().latest.clone()
    }

    /// Number of active subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.lock().handlers.len()
    }

    /// Registers `handler` and immediately replays the latest value to it.
    ///
    /// The handler stays registered until the returned [`Subscription`] is
    /// dropped or explicitly unsubscribed.
    pub fn subscribe<F>(&self, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let id = {
            let mut state = self.lock();
            let id = state.next_id;
            state.next_id += 1;
            let seq = state.seq;
            let value = state.latest.clone();
            state.handlers.push(Registered {
                id,
                joined_at: seq,
                handler: Arc::new(handler),
            });
            state.queue.push_back(Delivery {
                seq,
                value,
                only: Some(id),
            });
            id
        };
        self.drain();

        let channel: Arc<dyn Detach> = self.inner.clone();
        Subscription {
            id,
            channel: Arc::downgrade(&channel),
        }
    }

    /// Publishes `value` to every current subscriber and retains it for
    /// future ones.
    pub fn publish(&self, value: T) {
        self.emit(value);
        self.drain();
    }

    /// Records `value` as the latest emission without delivering it.
    ///
    /// Lets a caller fix emission order while holding its own lock, then
    /// deliver with [`Broadcast::drain`] after releasing it.
    pub(crate) fn emit(&self, value: T) {
        let mut state = self.lock();
        state.seq += 1;
        let seq = state.seq;
        state.latest = value.clone();
        state.queue.push_back(Delivery {
            seq,
            value,
            only: None,
        });
    }

    /// Delivers queued emissions in order.
    ///
    /// Returns immediately when called from inside a handler on the thread
    /// already delivering; that loop picks up anything queued meanwhile. On
    /// any other thread it waits for the running loop to finish, so the
    /// caller's emissions are delivered before it returns.
    pub(crate) fn drain(&self) {
        let me = thread::current().id();
        {
            let mut state = self.lock();
            loop {
                match state.delivering {
                    Some(owner) if owner == me => return,
                    Some(_) => {
                        state = self
                            .inner
                            .idle
                            .wait(state)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                    None => break,
                }
            }
            if state.queue.is_empty() {
                return;
            }
            state.delivering = Some(me);
        }
        let mut guard = DeliveringGuard {
            channel: &self.inner,
            armed: true,
        };

        loop {
            let (value, recipients) = {
                let mut state = self.lock();
                let Some(delivery) = state.queue.pop_front() else {
                    guard.armed = false;
                    self.inner.release(state);
                    return;
                };
                let recipients = state.recipients(&delivery);
                (delivery.value, recipients)
            };
            for handler in recipients {
                handler(&value);
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ChannelState<T>> {
        self.inner.lock()
    }
}

/// Releases delivery ownership if a handler panics mid-loop.
struct DeliveringGuard<'a, T> {
    channel: &'a Channel<T>,
    armed: bool,
}

impl<T> Drop for DeliveringGuard<'_, T> {
    fn drop(&mut self) {
        if self.armed {
            self.channel.release(self.channel.lock());
        }
    }
}

trait Detach: Send + Sync {
    fn detach(&self, id: u64);
}

impl<T: Send> Detach for Channel<T> {
    fn detach(&self, id: u64) {
        self.lock().handlers.retain(|registered| registered.id != id);
    }
}

/// Handle to a registered subscriber.
///
/// Dropping it unsubscribes. The channel's retained value is unaffected.
#[must_use = "dropping a Subscription unsubscribes its handler"]
pub struct Subscription {
    id: u64,
    channel: Weak<dyn Detach>,
}

impl Subscription {
    /// Stops future deliveries to this subscriber.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.upgrade() {
            channel.detach(self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
