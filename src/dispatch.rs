//! Translates inbound gateway dispatches (op=0 frames) into cache mutations
//! and bus emissions.
//!
//! One [`Dispatcher::dispatch`] call handles exactly one frame: the cache
//! mutation for that frame completes, then every event emission the frame
//! produces is raised on the [`EventBus`] in the order listed in the
//! recognized-event table, before the next frame is processed. Matches the
//! per-frame ordering guarantee in the concurrency model: the dispatcher
//! itself never runs two frames concurrently, only the handlers it hands off
//! to the bus do.

use tracing::{debug, warn};

use crate::bus::{DispatchedEvent, EventBus};
use crate::model::*;
use crate::state::State;
use crate::voice::VoicePending;

/// A side effect the session manager must perform in response to a
/// dispatched frame, beyond the cache mutation and bus emission the
/// dispatcher already took care of.
///
/// Kept separate from `DispatchedEvent` because these are wire-protocol
/// actions, not values a handler should ever see.
pub enum Outbound {
    /// Request the full member list for every server named, via op=8.
    RequestGuildMembers(Vec<ServerId>),
    /// A pending voice connection's handshake has completed; the caller of
    /// `voice_connect` should be resumed with this.
    VoiceServerReady(VoiceHandshake),
}

/// Everything needed to construct the voice transport after
/// VOICE_SERVER_UPDATE, per the spec's "voice session" contract: the core
/// only constructs this value, it does not open the RTP/UDP transport.
#[derive(Debug, Clone)]
pub struct VoiceHandshake {
    pub server_id: Option<ServerId>,
    pub channel_id: Option<ChannelId>,
    pub session_id: String,
    pub token: String,
    pub endpoint: Option<String>,
    pub encrypted: bool,
}

/// Consumes one [`Event`] at a time, mutating `state` and raising
/// [`DispatchedEvent`]s on `bus` per the recognized-event table.
pub struct Dispatcher {
    state: State,
    bus: EventBus,
    /// When false (the default), `MESSAGE_CREATE` authored by the bot itself
    /// is suppressed entirely rather than raised as `Message`/`Mention`.
    parse_self: bool,
    voice_pending: VoicePending,
}

impl Dispatcher {
    pub fn new(state: State, bus: EventBus, parse_self: bool, voice_pending: VoicePending) -> Self {
        Dispatcher {
            state,
            bus,
            parse_self,
            voice_pending,
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Route one inbound dispatch. Returns any outbound actions the session
    /// manager must perform as a result (e.g. the op=8 member request sent
    /// right after READY).
    pub fn dispatch(&self, event: Event) -> Vec<Outbound> {
        match event {
            Event::Ready(ready) => self.on_ready(ready),
            Event::ServerCreate(server) => {
                self.on_server_create(server);
                Vec::new()
            }
            Event::ServerUpdate(server) => {
                self.on_server_update(server);
                Vec::new()
            }
            Event::ServerDelete(server) => {
                self.on_server_delete(server);
                Vec::new()
            }
            Event::ServerMembersChunk(server_id, members) => {
                for member in members {
                    self.state.add_member(server_id, member);
                }
                Vec::new()
            }
            Event::ServerMemberAdd(server_id, member) => {
                self.state.add_member(server_id, member.clone());
                self.bus.raise(DispatchedEvent::GuildMemberAdd(server_id, member));
                Vec::new()
            }
            Event::ServerMemberUpdate {
                server_id,
                roles,
                user,
                nick,
            } => {
                self.state
                    .merge_roles(server_id, user.id, roles.clone());
                self.bus.raise(DispatchedEvent::GuildMemberUpdate(
                    server_id,
                    Member {
                        user: Some(user),
                        nick,
                        avatar: None,
                        roles,
                        joined_at: epoch(),
                        mute: false,
                        deaf: false,
                        flags: Default::default(),
                        boosting_since: None,
                    },
                ));
                Vec::new()
            }
            Event::ServerMemberRemove(server_id, user) => {
                self.state.remove_member(server_id, user.id);
                self.bus
                    .raise(DispatchedEvent::GuildMemberDelete(server_id, user.id));
                Vec::new()
            }
            Event::ServerRoleCreate(server_id, role) => {
                self.state.upsert_role(server_id, role.clone());
                self.bus
                    .raise(DispatchedEvent::GuildRoleCreate(server_id, role));
                Vec::new()
            }
            Event::ServerRoleUpdate(server_id, role) => {
                self.state.upsert_role(server_id, role.clone());
                self.bus
                    .raise(DispatchedEvent::GuildRoleUpdate(server_id, role));
                Vec::new()
            }
            Event::ServerRoleDelete(server_id, role_id) => {
                self.state.remove_role(server_id, role_id);
                self.bus
                    .raise(DispatchedEvent::GuildRoleDelete(server_id, role_id));
                Vec::new()
            }
            Event::ServerBanAdd(server_id, user) => {
                // Extension point: the cache does not track bans (spec §4.5).
                self.bus.raise(DispatchedEvent::UserBan(server_id, user));
                Vec::new()
            }
            Event::ServerBanRemove(server_id, user) => {
                self.bus.raise(DispatchedEvent::UserUnban(server_id, user));
                Vec::new()
            }
            Event::ChannelCreate(channel) => {
                self.state.upsert_channel(channel.clone());
                self.bus.raise(DispatchedEvent::ChannelCreate(channel));
                Vec::new()
            }
            Event::ChannelUpdate(channel) => {
                self.state.upsert_channel(channel.clone());
                self.bus.raise(DispatchedEvent::ChannelUpdate(channel));
                Vec::new()
            }
            Event::ChannelDelete(channel) => {
                self.state.remove_channel(channel.id());
                self.bus.raise(DispatchedEvent::ChannelDelete(channel));
                Vec::new()
            }
            Event::MessageCreate(message) => {
                self.on_message_create(message);
                Vec::new()
            }
            Event::MessageUpdate {
                id, channel_id, ..
            } => {
                // Extension point: the source's update_message hook was empty;
                // the cache does not track message bodies either way.
                self.bus.raise(DispatchedEvent::MessageEdit {
                    channel_id,
                    message_id: id,
                });
                Vec::new()
            }
            Event::MessageDelete {
                channel_id,
                message_id,
            } => {
                self.bus.raise(DispatchedEvent::MessageDelete {
                    channel_id,
                    message_id,
                });
                Vec::new()
            }
            Event::MessageDeleteBulk { channel_id, ids } => {
                for message_id in ids {
                    self.bus.raise(DispatchedEvent::MessageDelete {
                        channel_id,
                        message_id,
                    });
                }
                Vec::new()
            }
            Event::TypingStart {
                channel_id,
                user_id,
                timestamp,
            } => {
                if self.state.is_restricted(channel_id) {
                    debug!(%channel_id, "dropping TYPING_START for a restricted channel");
                    return Vec::new();
                }
                self.bus.raise(DispatchedEvent::Typing {
                    channel_id,
                    user_id,
                    timestamp: timestamp.timestamp(),
                });
                Vec::new()
            }
            Event::PresenceUpdate {
                presence,
                server_id,
                ..
            } => {
                self.on_presence_update(presence, server_id);
                Vec::new()
            }
            Event::VoiceStateUpdate(server_id, voice_state) => {
                self.state.set_voice_state(server_id, voice_state.clone());
                let is_own = self
                    .state
                    .bot_user()
                    .map(|bot| bot.id == voice_state.user_id)
                    .unwrap_or(false);
                if is_own {
                    self.voice_pending
                        .update_session_id(server_id, voice_state.session_id.clone());
                }
                self.bus
                    .raise(DispatchedEvent::VoiceStateUpdate(voice_state));
                Vec::new()
            }
            Event::VoiceServerUpdate {
                server_id,
                channel_id,
                endpoint,
                token,
            } => self
                .on_voice_server_update(server_id, channel_id, endpoint, token)
                .into_iter()
                .collect(),
            Event::Resumed { .. } | Event::Unknown => Vec::new(),
            other => {
                debug!(event = ?other, "dropping a recognized but cache-inert event");
                Vec::new()
            }
        }
    }

    fn on_ready(&self, ready: ReadyEvent) -> Vec<Outbound> {
        self.state.reset();
        self.state.set_bot_user(ready.user.clone());

        for server in &ready.servers {
            if let PossibleServer::Online(server) = server {
                self.state.add_server(server.clone());
            }
        }
        if let Some(private_channels) = ready.private_channels.clone() {
            for channel in private_channels {
                self.state.add_private_channel(channel);
            }
        }

        let server_ids = self.state.server_ids();
        self.bus.raise(DispatchedEvent::Ready(ready));

        if server_ids.is_empty() {
            Vec::new()
        } else {
            vec![Outbound::RequestGuildMembers(server_ids)]
        }
    }

    fn on_server_create(&self, server: PossibleServer<LiveServer>) {
        match server {
            PossibleServer::Online(server) => {
                self.state.add_server(server.clone());
                self.bus.raise(DispatchedEvent::GuildCreate(server));
            }
            PossibleServer::Offline { id, unavailable } => {
                debug!(server_id = %id.0, unavailable, "ignoring an unavailable GUILD_CREATE");
            }
        }
    }

    fn on_server_update(&self, server: Server) {
        let id = server.id;
        self.state.update_server(server);
        if let Some(merged) = self.state.server(id) {
            self.bus.raise(DispatchedEvent::GuildUpdate(merged));
        }
    }

    fn on_server_delete(&self, server: PossibleServer<Server>) {
        let id = server.id();
        self.state.remove_server(id);
        self.bus.raise(DispatchedEvent::GuildDelete(id));
    }

    fn on_message_create(&self, message: Message) {
        let is_self = self
            .state
            .bot_user()
            .map(|bot| bot.id == message.author.id)
            .unwrap_or(false);
        if is_self && !self.parse_self {
            return;
        }

        let is_mentioned = self
            .state
            .bot_user()
            .map(|bot| message.mentions.iter().any(|u| u.id == bot.id))
            .unwrap_or(false);
        let is_private = matches!(
            self.state.channel(message.channel_id),
            Some(Channel::DirectMessage(_)) | Some(Channel::Group(_))
        );

        self.bus.raise(DispatchedEvent::Message(message.clone()));
        if is_mentioned {
            self.bus.raise(DispatchedEvent::Mention(message.clone()));
        }
        if is_private {
            self.bus.raise(DispatchedEvent::PrivateMessage(message));
        }
    }

    fn on_presence_update(&self, presence: Presence, server_id: Option<ServerId>) {
        let game = presence.activities.first().map(|a| a.name.clone());
        let changed = self.state.apply_presence(server_id, &presence);
        if changed {
            self.bus.raise(DispatchedEvent::Playing {
                user_id: presence.user_id,
                game,
            });
        } else {
            self.bus
                .raise(DispatchedEvent::Presence(presence.user_id, presence.status));
        }
    }

    fn on_voice_server_update(
        &self,
        server_id: Option<ServerId>,
        channel_id: Option<ChannelId>,
        endpoint: Option<String>,
        token: String,
    ) -> Option<Outbound> {
        let pending = self.voice_pending.take_if_matching(server_id)?;
        warn_if_no_session(&pending.session_id);
        Some(Outbound::VoiceServerReady(VoiceHandshake {
            server_id,
            channel_id: channel_id.or(pending.channel_id),
            session_id: pending.session_id,
            token,
            endpoint,
            encrypted: pending.encrypted,
        }))
    }
}

fn warn_if_no_session(session_id: &str) {
    if session_id.is_empty() {
        warn!("VOICE_SERVER_UPDATE arrived before a VOICE_STATE_UPDATE recorded a session id");
    }
}

/// A placeholder join timestamp for members synthesized from partial gateway
/// payloads (e.g. `GUILD_MEMBER_UPDATE`, which does not carry `joined_at`).
fn epoch() -> chrono::DateTime<chrono::FixedOffset> {
    chrono::DateTime::parse_from_rfc3339("1970-01-01T00:00:00+00:00").unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::EventKind;
    use std::sync::{Arc, Mutex};

    #[test]
    fn guild_delete_clears_member_roles_and_raises_once() {
        let state = State::new();
        let bus = EventBus::new();
        let dispatcher = Dispatcher::new(state.clone(), bus.clone(), false, VoicePending::new());

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen2 = seen.clone();
        bus.on(EventKind::GuildDelete, |_| true, move |event| {
            if let DispatchedEvent::GuildDelete(id) = event {
                seen2.lock().unwrap().push(id);
            }
        });

        let mut server = sample_server(1);
        let user = sample_user(42);
        server.members.push(Member {
            user: Some(user.clone()),
            nick: None,
            avatar: None,
            roles: vec![RoleId(7)],
            joined_at: epoch(),
            mute: false,
            deaf: false,
            flags: Default::default(),
            boosting_since: None,
        });

        dispatcher.dispatch(Event::ServerCreate(PossibleServer::Online(server.clone())));
        dispatcher.dispatch(Event::ServerDelete(PossibleServer::Offline {
            id: server.id,
            unavailable: false,
        }));

        assert!(state.server(server.id).is_none());
        assert!(state.user(user.id).is_some());
    }

    fn sample_user(id: u64) -> User {
        User {
            id: UserId(id),
            name: format!("user-{id}"),
            discriminator: 1,
            avatar: None,
            bot: false,
        }
    }

    fn sample_server(id: u64) -> LiveServer {
        LiveServer {
            id: ServerId(id),
            name: format!("server-{id}"),
            owner_id: UserId(1),
            application_id: None,
            voice_states: Vec::new(),
            roles: Vec::new(),
            region: "us-east".into(),
            presences: Vec::new(),
            member_count: 0,
            members: Vec::new(),
            joined_at: String::new(),
            icon: None,
            large: false,
            channels: Vec::new(),
            categories: Vec::new(),
            afk_timeout: 300,
            afk_channel_id: None,
            system_channel_id: None,
            verification_level: VerificationLevel::None,
            emojis: Vec::new(),
            features: Vec::new(),
            splash: None,
            default_message_notifications: 0,
            mfa_level: 0,
            explicit_content_filter: 0,
        }
    }
}
