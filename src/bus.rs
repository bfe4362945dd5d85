//! Handler registry and one-shot "await" subscriptions.
//!
//! The dispatcher raises one [`DispatchedEvent`] per cache-affecting gateway
//! frame; this module fans each one out to whatever handlers and awaits are
//! currently registered for its kind.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{error, warn};

use crate::model::*;

/// The kind of a [`DispatchedEvent`], used to key handler and await
/// registrations without requiring the caller to construct a dummy payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Ready,
    GuildCreate,
    GuildUpdate,
    GuildDelete,
    GuildMemberAdd,
    GuildMemberUpdate,
    GuildMemberDelete,
    GuildRoleCreate,
    GuildRoleUpdate,
    GuildRoleDelete,
    UserBan,
    UserUnban,
    ChannelCreate,
    ChannelUpdate,
    ChannelDelete,
    Message,
    Mention,
    PrivateMessage,
    MessageEdit,
    MessageDelete,
    Typing,
    Presence,
    Playing,
    VoiceStateUpdate,
}

/// A fully-formed event handed to the bus after dispatch processing.
///
/// Each variant corresponds to one row of the recognized-event table: the
/// dispatcher decides which of these (zero, one, or several) a given gateway
/// frame produces, and raises them on [`EventBus`] in order.
#[derive(Debug, Clone)]
pub enum DispatchedEvent {
    Ready(ReadyEvent),
    GuildCreate(LiveServer),
    GuildUpdate(LiveServer),
    GuildDelete(ServerId),
    GuildMemberAdd(ServerId, Member),
    GuildMemberUpdate(ServerId, Member),
    GuildMemberDelete(ServerId, UserId),
    GuildRoleCreate(ServerId, Role),
    GuildRoleUpdate(ServerId, Role),
    GuildRoleDelete(ServerId, RoleId),
    UserBan(ServerId, User),
    UserUnban(ServerId, User),
    ChannelCreate(Channel),
    ChannelUpdate(Channel),
    ChannelDelete(Channel),
    Message(Message),
    Mention(Message),
    PrivateMessage(Message),
    MessageEdit {
        channel_id: ChannelId,
        message_id: MessageId,
    },
    MessageDelete {
        channel_id: ChannelId,
        message_id: MessageId,
    },
    Typing {
        channel_id: ChannelId,
        user_id: UserId,
        timestamp: i64,
    },
    Presence(UserId, OnlineStatus),
    Playing {
        user_id: UserId,
        game: Option<String>,
    },
    VoiceStateUpdate(VoiceState),
}

impl DispatchedEvent {
    /// The kind this event is filed under for handler/await matching.
    pub fn kind(&self) -> EventKind {
        match self {
            DispatchedEvent::Ready(_) => EventKind::Ready,
            DispatchedEvent::GuildCreate(_) => EventKind::GuildCreate,
            DispatchedEvent::GuildUpdate(_) => EventKind::GuildUpdate,
            DispatchedEvent::GuildDelete(_) => EventKind::GuildDelete,
            DispatchedEvent::GuildMemberAdd(_, _) => EventKind::GuildMemberAdd,
            DispatchedEvent::GuildMemberUpdate(_, _) => EventKind::GuildMemberUpdate,
            DispatchedEvent::GuildMemberDelete(_, _) => EventKind::GuildMemberDelete,
            DispatchedEvent::GuildRoleCreate(_, _) => EventKind::GuildRoleCreate,
            DispatchedEvent::GuildRoleUpdate(_, _) => EventKind::GuildRoleUpdate,
            DispatchedEvent::GuildRoleDelete(_, _) => EventKind::GuildRoleDelete,
            DispatchedEvent::UserBan(_, _) => EventKind::UserBan,
            DispatchedEvent::UserUnban(_, _) => EventKind::UserUnban,
            DispatchedEvent::ChannelCreate(_) => EventKind::ChannelCreate,
            DispatchedEvent::ChannelUpdate(_) => EventKind::ChannelUpdate,
            DispatchedEvent::ChannelDelete(_) => EventKind::ChannelDelete,
            DispatchedEvent::Message(_) => EventKind::Message,
            DispatchedEvent::Mention(_) => EventKind::Mention,
            DispatchedEvent::PrivateMessage(_) => EventKind::PrivateMessage,
            DispatchedEvent::MessageEdit { .. } => EventKind::MessageEdit,
            DispatchedEvent::MessageDelete { .. } => EventKind::MessageDelete,
            DispatchedEvent::Typing { .. } => EventKind::Typing,
            DispatchedEvent::Presence(_, _) => EventKind::Presence,
            DispatchedEvent::Playing { .. } => EventKind::Playing,
            DispatchedEvent::VoiceStateUpdate(_) => EventKind::VoiceStateUpdate,
        }
    }

    /// A small set of well-known attributes usable as await filters, e.g.
    /// `"channel_id"` or `"user_id"`. Returns `None` if this event does not
    /// carry an attribute of that name.
    pub fn attr(&self, key: &str) -> Option<Value> {
        let id = |n: u64| Some(Value::from(n));
        match (self, key) {
            (DispatchedEvent::GuildCreate(s), "server_id") => id(s.id.0),
            (DispatchedEvent::GuildUpdate(s), "server_id") => id(s.id.0),
            (DispatchedEvent::GuildDelete(s), "server_id") => id(s.0),
            (DispatchedEvent::GuildMemberAdd(s, _), "server_id") => id(s.0),
            (DispatchedEvent::GuildMemberUpdate(s, _), "server_id") => id(s.0),
            (DispatchedEvent::GuildMemberDelete(s, _), "server_id") => id(s.0),
            (DispatchedEvent::GuildMemberDelete(_, u), "user_id") => id(u.0),
            (DispatchedEvent::Message(m), "channel_id") => id(m.channel_id.0),
            (DispatchedEvent::Message(m), "author_id") => id(m.author.id.0),
            (DispatchedEvent::Mention(m), "channel_id") => id(m.channel_id.0),
            (DispatchedEvent::Mention(m), "author_id") => id(m.author.id.0),
            (DispatchedEvent::PrivateMessage(m), "channel_id") => id(m.channel_id.0),
            (DispatchedEvent::MessageEdit { channel_id, .. }, "channel_id") => id(channel_id.0),
            (DispatchedEvent::MessageDelete { channel_id, .. }, "channel_id") => id(channel_id.0),
            (DispatchedEvent::Typing { channel_id, .. }, "channel_id") => id(channel_id.0),
            (DispatchedEvent::Typing { user_id, .. }, "user_id") => id(user_id.0),
            (DispatchedEvent::Presence(u, _), "user_id") => id(u.0),
            (DispatchedEvent::Playing { user_id, .. }, "user_id") => id(user_id.0),
            (DispatchedEvent::VoiceStateUpdate(v), "channel_id") => v.channel_id.map(|c| Value::from(c.0)),
            (DispatchedEvent::VoiceStateUpdate(v), "user_id") => id(v.user_id.0),
            _ => None,
        }
    }
}

/// Identifier returned by [`EventBus::on`], usable with [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegistrationId(u64);

/// A registered handler, boxed so the bus can hold handlers of any closure
/// type behind a uniform interface.
type Handler = Arc<dyn Fn(DispatchedEvent) + Send + Sync + 'static>;
type Predicate = Arc<dyn Fn(&DispatchedEvent) -> bool + Send + Sync + 'static>;

struct Registration {
    id: RegistrationId,
    kind: EventKind,
    predicate: Predicate,
    handler: Handler,
}

/// A one-shot keyed subscription matching the next event satisfying its
/// filters.
pub struct Await {
    pub key: String,
    pub kind: EventKind,
    pub attrs: HashMap<String, Value>,
    pub durable: bool,
    sender: tokio::sync::mpsc::UnboundedSender<DispatchedEvent>,
}

impl Await {
    fn matches(&self, event: &DispatchedEvent) -> bool {
        if event.kind() != self.kind {
            return false;
        }
        self.attrs
            .iter()
            .all(|(k, v)| event.attr(k).as_ref() == Some(v))
    }
}

struct Inner {
    registrations: Vec<Registration>,
    awaits: Vec<Await>,
}

/// Handler registry and await table.
///
/// Cheap to clone; all clones share the same underlying registrations.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Mutex<Inner>>,
    next_registration: Arc<AtomicU64>,
    next_task: Arc<AtomicU64>,
    max_concurrent_handlers: Option<Arc<tokio::sync::Semaphore>>,
}

impl EventBus {
    /// Create an event bus with unbounded handler concurrency.
    pub fn new() -> Self {
        Self::with_max_concurrent_handlers(None)
    }

    /// Create an event bus whose handler tasks are bounded by a semaphore of
    /// the given size. `None` preserves the unbounded, one-task-per-handler
    /// default.
    pub fn with_max_concurrent_handlers(max: Option<usize>) -> Self {
        EventBus {
            inner: Arc::new(Mutex::new(Inner {
                registrations: Vec::new(),
                awaits: Vec::new(),
            })),
            next_registration: Arc::new(AtomicU64::new(1)),
            next_task: Arc::new(AtomicU64::new(1)),
            max_concurrent_handlers: max.map(|n| Arc::new(tokio::sync::Semaphore::new(n))),
        }
    }

    /// Register a handler for events of `kind` that satisfy `predicate`.
    /// Returns an id usable with [`EventBus::off`].
    pub fn on<P, H>(&self, kind: EventKind, predicate: P, handler: H) -> RegistrationId
    where
        P: Fn(&DispatchedEvent) -> bool + Send + Sync + 'static,
        H: Fn(DispatchedEvent) + Send + Sync + 'static,
    {
        let id = RegistrationId(self.next_registration.fetch_add(1, Ordering::Relaxed));
        let mut inner = self.inner.lock().unwrap();
        inner.registrations.push(Registration {
            id,
            kind,
            predicate: Arc::new(predicate),
            handler: Arc::new(handler),
        });
        id
    }

    /// Remove a previously registered handler. No-op if it is already gone.
    pub fn off(&self, id: RegistrationId) {
        let mut inner = self.inner.lock().unwrap();
        inner.registrations.retain(|r| r.id != id);
    }

    /// Register a subscription matching events of `kind` whose attributes
    /// contain every `(key, value)` pair in `attrs`. A non-durable await is
    /// removed after its first match and its channel yields exactly one
    /// event; a durable one stays registered and keeps yielding a matching
    /// event every time `raise` sees one, so callers should `recv()` in a
    /// loop rather than awaiting a single value.
    pub fn add_await(
        &self,
        key: impl Into<String>,
        kind: EventKind,
        attrs: HashMap<String, Value>,
        durable: bool,
    ) -> tokio::sync::mpsc::UnboundedReceiver<DispatchedEvent> {
        let (sender, receiver) = tokio::sync::mpsc::unbounded_channel();
        let mut inner = self.inner.lock().unwrap();
        inner.awaits.push(Await {
            key: key.into(),
            kind,
            attrs,
            durable,
            sender,
        });
        receiver
    }

    /// Fan `event` out to every handler registered for its kind (in
    /// registration order, each on its own orphaned task), then to every
    /// matching await (removed unless durable).
    pub fn raise(&self, event: DispatchedEvent) {
        let (matched_handlers, matched_awaits_fired): (Vec<Handler>, usize) = {
            let mut inner = self.inner.lock().unwrap();

            let matched_handlers: Vec<Handler> = inner
                .registrations
                .iter()
                .filter(|r| r.kind == event.kind() && (r.predicate)(&event))
                .map(|r| r.handler.clone())
                .collect();

            let mut fired = 0;
            let mut remaining = Vec::with_capacity(inner.awaits.len());
            for a in inner.awaits.drain(..) {
                if a.matches(&event) {
                    fired += 1;
                    let _ = a.sender.send(event.clone());
                    if a.durable {
                        remaining.push(a);
                    }
                } else {
                    remaining.push(a);
                }
            }
            inner.awaits = remaining;
            (matched_handlers, fired)
        };

        if matched_awaits_fired > 0 {
            tracing::trace!("matched {} await(s) for {:?}", matched_awaits_fired, event.kind());
        }

        for handler in matched_handlers {
            let event = event.clone();
            let name = format!("et-{}", self.next_task.fetch_add(1, Ordering::Relaxed));
            let permit_source = self.max_concurrent_handlers.clone();

            tokio::spawn(async move {
                let _permit = match permit_source {
                    Some(sem) => Some(sem.acquire_owned().await.expect("semaphore not closed")),
                    None => None,
                };
                tracing::trace!(task = %name, "invoking handler");
                handler(event);
            });
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn server_id(n: u64) -> ServerId {
        ServerId(n)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn handlers_fire_in_registration_order_but_run_concurrently() {
        let bus = EventBus::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for i in 0..3u8 {
            let order = order.clone();
            bus.on(
                EventKind::GuildDelete,
                |_| true,
                move |_| {
                    order.lock().unwrap().push(i);
                },
            );
        }

        bus.raise(DispatchedEvent::GuildDelete(server_id(1)));
        tokio::task::yield_now().await;
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        let mut seen = order.lock().unwrap().clone();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn off_removes_a_handler() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let calls2 = calls.clone();
        let id = bus.on(EventKind::GuildDelete, |_| true, move |_| {
            calls2.fetch_add(1, Ordering::SeqCst);
        });
        bus.off(id);
        bus.raise(DispatchedEvent::GuildDelete(server_id(1)));
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn await_is_removed_after_firing_unless_durable() {
        let bus = EventBus::new();
        let mut receiver = bus.add_await(
            "k1",
            EventKind::GuildDelete,
            HashMap::new(),
            false,
        );
        bus.raise(DispatchedEvent::GuildDelete(server_id(7)));
        let event = receiver.recv().await.expect("await should fire");
        assert!(matches!(event, DispatchedEvent::GuildDelete(id) if id == server_id(7)));

        // A second raise has nothing left to match against; the await was consumed.
        assert_eq!(bus.inner.lock().unwrap().awaits.len(), 0);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn await_attribute_filters_must_all_match() {
        let bus = EventBus::new();
        let mut attrs = HashMap::new();
        attrs.insert("server_id".to_string(), Value::from(42u64));
        let mut receiver = bus.add_await("k2", EventKind::GuildDelete, attrs, false);

        bus.raise(DispatchedEvent::GuildDelete(server_id(1)));
        bus.raise(DispatchedEvent::GuildDelete(server_id(42)));

        let event = receiver.recv().await.expect("await should fire for id 42");
        assert!(matches!(event, DispatchedEvent::GuildDelete(id) if id == server_id(42)));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn durable_await_keeps_matching_subsequent_events() {
        let bus = EventBus::new();
        let mut receiver = bus.add_await("k3", EventKind::GuildDelete, HashMap::new(), true);

        bus.raise(DispatchedEvent::GuildDelete(server_id(1)));
        bus.raise(DispatchedEvent::GuildDelete(server_id(2)));

        let first = receiver.recv().await.expect("first match");
        assert!(matches!(first, DispatchedEvent::GuildDelete(id) if id == server_id(1)));
        let second = receiver.recv().await.expect("second match");
        assert!(matches!(second, DispatchedEvent::GuildDelete(id) if id == server_id(2)));

        assert_eq!(bus.inner.lock().unwrap().awaits.len(), 1);
    }
}
