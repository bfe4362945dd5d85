//! An in-process cache of servers, channels, users, and roles, kept
//! up to date by the dispatcher as gateway events arrive.
//!
//! The cache is coarse-grained on purpose: every mutation takes and releases
//! the whole lock rather than locking individual entities. Frames are
//! processed one at a time by the dispatcher, so there is never contention
//! between two writers; the lock exists to let handler tasks read a
//! consistent snapshot while the next frame is being processed.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::model::{
    Channel, ChannelId, CurrentUser, LiveServer, Member, OnlineStatus, Presence, Role, RoleId,
    Server, ServerChannel, ServerId, User, UserId, VoiceState,
};

/// A user as tracked by the cache, merging the REST-shaped `User` with the
/// live presence data the gateway pushes separately.
#[derive(Debug, Clone)]
pub struct CachedUser {
    /// The user's profile fields.
    pub user: User,
    /// The user's last-known online status.
    pub status: OnlineStatus,
    /// The name of the game the user is currently playing, if any.
    pub game: Option<String>,
}

#[derive(Default)]
struct Inner {
    servers: HashMap<ServerId, LiveServer>,
    channels: HashMap<ChannelId, Channel>,
    /// Direct-message channels, keyed by the other party's user id.
    private_channels: HashMap<UserId, ChannelId>,
    users: HashMap<UserId, CachedUser>,
    /// `user -> server -> roles held on that server`.
    user_roles: HashMap<UserId, HashMap<ServerId, Vec<RoleId>>>,
    /// Channels the bot is known to lack permission to read.
    denylist: HashSet<ChannelId>,
    bot_user: Option<CurrentUser>,
    heartbeat_interval: Option<u64>,
}

impl Inner {
    fn lazy_user(&mut self, user: User) -> &mut CachedUser {
        self.users.entry(user.id).or_insert_with(|| CachedUser {
            user,
            status: OnlineStatus::Offline,
            game: None,
        })
    }
}

/// A placeholder `User` for an id the cache has only ever seen in a
/// presence payload, which carries no username/avatar/discriminator.
fn stub_user(id: UserId) -> User {
    User {
        id,
        name: String::new(),
        discriminator: 0,
        avatar: None,
        bot: false,
    }
}

/// The process-wide cache store. Cheaply cloneable; clones share the same
/// underlying data.
#[derive(Clone, Default)]
pub struct State {
    inner: Arc<Mutex<Inner>>,
}

impl State {
    /// Construct an empty cache.
    pub fn new() -> Self {
        State::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Drop all cached state. Called immediately before re-seeding the cache
    /// from a freshly received READY payload.
    pub fn reset(&self) {
        *self.lock() = Inner::default();
    }

    /// Record the heartbeat interval (in milliseconds) supplied by the last READY/HELLO.
    pub fn set_heartbeat_interval(&self, millis: u64) {
        self.lock().heartbeat_interval = Some(millis);
    }

    /// The last-known heartbeat interval, in milliseconds.
    pub fn heartbeat_interval(&self) -> Option<u64> {
        self.lock().heartbeat_interval
    }

    /// Record the logged-in user, and mirror it into the user cache so that
    /// `user(bot_user.id)` resolves to the same profile.
    pub fn set_bot_user(&self, user: CurrentUser) {
        let mut inner = self.lock();
        let cached = User {
            id: user.id,
            name: user.username.clone(),
            discriminator: user.discriminator,
            avatar: user.avatar.clone(),
            bot: user.bot,
        };
        inner.lazy_user(cached);
        inner.bot_user = Some(user);
    }

    /// The logged-in user, if a READY has been received.
    pub fn bot_user(&self) -> Option<CurrentUser> {
        self.lock().bot_user.clone()
    }

    /// Seed the cache with a DM channel at startup (from the READY payload).
    pub fn add_private_channel(&self, channel: Channel) {
        let mut inner = self.lock();
        if let Channel::DirectMessage(ref dm) = channel {
            inner.private_channels.insert(dm.recipient[0].id, dm.id);
        }
        inner.channels.insert(channel.id(), channel);
    }

    /// Add or replace a server in the cache.
    pub fn add_server(&self, server: LiveServer) {
        let mut inner = self.lock();
        for channel in &server.channels {
            inner
                .channels
                .insert(*channel.id(), Channel::Server(channel.clone()));
        }
        for member in &server.members {
            if let Some(ref user) = member.user {
                let cached = inner.lazy_user(user.clone());
                cached.user = user.clone();
                inner
                    .user_roles
                    .entry(user.id)
                    .or_default()
                    .insert(server.id, member.roles.clone());
            }
        }
        inner.servers.insert(server.id, server);
    }

    /// Merge a partial `Server` update into the cached `LiveServer`.
    pub fn update_server(&self, server: Server) {
        let mut inner = self.lock();
        if let Some(existing) = inner.servers.get_mut(&server.id) {
            existing.name = server.name;
            existing.icon = server.icon;
            existing.owner_id = server.owner_id;
            existing.region = server.region;
            existing.afk_timeout = server.afk_timeout;
            existing.afk_channel_id = server.afk_channel_id;
            existing.verification_level = server.verification_level;
            existing.splash = server.splash;
            existing.emojis = server.emojis;
            existing.roles = server.roles;
        }
    }

    /// Remove a server, and strip every member's role entry for it.
    pub fn remove_server(&self, id: ServerId) -> Option<LiveServer> {
        let mut inner = self.lock();
        let removed = inner.servers.remove(&id);
        if let Some(ref server) = removed {
            for channel in &server.channels {
                inner.channels.remove(channel.id());
            }
        }
        for roles in inner.user_roles.values_mut() {
            roles.remove(&id);
        }
        removed
    }

    /// Insert or replace a channel, keeping its parent server's channel list
    /// (if any) in sync.
    pub fn upsert_channel(&self, channel: Channel) {
        let mut inner = self.lock();
        if let Channel::Server(ref sc) = channel {
            if let Some(server_id) = channel.server_id() {
                if let Some(server) = inner.servers.get_mut(&server_id) {
                    let id = *sc.id();
                    match server.channels.iter_mut().find(|c| *c.id() == id) {
                        Some(slot) => *slot = sc.clone(),
                        None => server.channels.push(sc.clone()),
                    }
                }
            }
        }
        if let Channel::DirectMessage(ref dm) = channel {
            inner.private_channels.insert(dm.recipient[0].id, dm.id);
        }
        inner.channels.insert(channel.id(), channel);
    }

    /// Remove a channel from the cache and from its parent server's channel list.
    pub fn remove_channel(&self, id: ChannelId) -> Option<Channel> {
        let mut inner = self.lock();
        let removed = inner.channels.remove(&id);
        if let Some(ref channel) = removed {
            if let Some(server_id) = channel.server_id() {
                if let Some(server) = inner.servers.get_mut(&server_id) {
                    server.channels.retain(|c| *c.id() != id);
                }
            }
        }
        inner.private_channels.retain(|_, ch| *ch != id);
        removed
    }

    /// Add a member to a server, creating the user lazily if unknown, and
    /// resolving their role set.
    pub fn add_member(&self, server_id: ServerId, member: Member) {
        let mut inner = self.lock();
        if let Some(ref user) = member.user {
            inner.lazy_user(user.clone());
            inner
                .user_roles
                .entry(user.id)
                .or_default()
                .insert(server_id, member.roles.clone());
        }
        if let Some(server) = inner.servers.get_mut(&server_id) {
            server.member_count += 1;
            server.members.push(member);
        }
    }

    /// Remove a member from a server, clearing their role map entry for it.
    pub fn remove_member(&self, server_id: ServerId, user_id: UserId) {
        let mut inner = self.lock();
        if let Some(server) = inner.servers.get_mut(&server_id) {
            server.members.retain(|m| {
                m.user.as_ref().map(|u| u.id) != Some(user_id)
            });
            server.member_count = server.member_count.saturating_sub(1);
        }
        if let Some(roles) = inner.user_roles.get_mut(&user_id) {
            roles.remove(&server_id);
        }
    }

    /// Replace a member's role set on a server.
    pub fn merge_roles(&self, server_id: ServerId, user_id: UserId, roles: Vec<RoleId>) {
        let mut inner = self.lock();
        if let Some(server) = inner.servers.get_mut(&server_id) {
            if let Some(member) = server
                .members
                .iter_mut()
                .find(|m| m.user.as_ref().map(|u| u.id) == Some(user_id))
            {
                member.roles = roles.clone();
            }
        }
        inner
            .user_roles
            .entry(user_id)
            .or_default()
            .insert(server_id, roles);
    }

    /// Insert or replace a role on a server.
    pub fn upsert_role(&self, server_id: ServerId, role: Role) {
        let mut inner = self.lock();
        if let Some(server) = inner.servers.get_mut(&server_id) {
            match server.roles.iter_mut().find(|r| r.id == role.id) {
                Some(slot) => *slot = role,
                None => server.roles.push(role),
            }
        }
    }

    /// Remove a role from a server, and strip it from every member who held it.
    pub fn remove_role(&self, server_id: ServerId, role_id: RoleId) {
        let mut inner = self.lock();
        if let Some(server) = inner.servers.get_mut(&server_id) {
            server.roles.retain(|r| r.id != role_id);
            for member in &mut server.members {
                member.roles.retain(|r| *r != role_id);
            }
        }
        for roles in inner.user_roles.values_mut() {
            if let Some(server_roles) = roles.get_mut(&server_id) {
                server_roles.retain(|r| *r != role_id);
            }
        }
    }

    /// Update a user's online status and current game, creating the user
    /// lazily from a minimal stub if they are not yet known.
    ///
    /// Returns `true` if the game changed from its previous value.
    pub fn set_presence(&self, user: User, status: OnlineStatus, game: Option<String>) -> bool {
        let mut inner = self.lock();
        let cached = inner.lazy_user(user.clone());
        cached.user = user;
        let changed = cached.game != game;
        cached.status = status;
        cached.game = game;
        changed
    }

    /// Merge a gateway `Presence` payload, creating a minimal stub user if
    /// the id is not yet cached. `server_id` is only used to keep a joining
    /// server's member count roughly in sync; the status/game update itself
    /// is unconditional, since a presence can arrive without guild context.
    pub fn apply_presence(&self, server_id: Option<ServerId>, presence: &Presence) -> bool {
        let game = presence.activities.first().map(|a| a.name.clone());
        let mut inner = self.lock();
        let cached = inner.lazy_user(stub_user(presence.user_id));
        let changed = cached.game != game;
        cached.status = presence.status;
        cached.game = game;

        if let Some(server_id) = server_id {
            if let Some(server) = inner.servers.get_mut(&server_id) {
                if !server
                    .members
                    .iter()
                    .any(|m| m.user.as_ref().map(|u| u.id) == Some(presence.user_id))
                    && presence.status != OnlineStatus::Offline
                {
                    server.member_count += 1;
                }
            }
        }
        changed
    }

    /// Replace the voice state for a user on a server, or remove it if they
    /// left voice entirely (`channel_id` is `None`).
    pub fn set_voice_state(&self, server_id: Option<ServerId>, state: VoiceState) {
        let Some(server_id) = server_id else { return };
        let mut inner = self.lock();
        if let Some(server) = inner.servers.get_mut(&server_id) {
            server.voice_states.retain(|s| s.user_id != state.user_id);
            if state.channel_id.is_some() {
                server.voice_states.push(state);
            }
        }
    }

    /// Mark a channel as one the bot is known to lack permission to read.
    pub fn mark_restricted(&self, id: ChannelId) {
        self.lock().denylist.insert(id);
    }

    /// Whether a channel is on the permission denylist.
    pub fn is_restricted(&self, id: ChannelId) -> bool {
        self.lock().denylist.contains(&id)
    }

    /// Look up a channel by id.
    pub fn channel(&self, id: ChannelId) -> Option<Channel> {
        self.lock().channels.get(&id).cloned()
    }

    /// Look up the DM channel open with a given user, if any.
    pub fn private_channel_with(&self, user_id: UserId) -> Option<ChannelId> {
        self.lock().private_channels.get(&user_id).copied()
    }

    /// Look up a server by id.
    pub fn server(&self, id: ServerId) -> Option<LiveServer> {
        self.lock().servers.get(&id).cloned()
    }

    /// Look up a cached user by id.
    pub fn user(&self, id: UserId) -> Option<CachedUser> {
        self.lock().users.get(&id).cloned()
    }

    /// The ids of every server currently in the cache.
    pub fn server_ids(&self) -> Vec<ServerId> {
        self.lock().servers.keys().copied().collect()
    }

    /// Find every channel matching `name`, optionally restricted to a named server.
    pub fn find_channel(&self, name: &str, server_name: Option<&str>) -> Vec<ChannelId> {
        let inner = self.lock();
        let mut found = Vec::new();
        for server in inner.servers.values() {
            let server_matches = server_name.map(|n| n == server.name).unwrap_or(true);
            if !server_matches {
                continue;
            }
            for channel in &server.channels {
                let matches = match channel {
                    ServerChannel::Text { channel, .. } => channel.name == name,
                    ServerChannel::Voice { channel, .. } => channel.name == name,
                    ServerChannel::Announcement { channel, .. } => channel.name == name,
                    ServerChannel::Category { category, .. } => category.name == name,
                    ServerChannel::AnnouncementThread { thread, .. } => thread.name == name,
                    ServerChannel::PublicThread { thread, .. } => thread.name == name,
                    ServerChannel::PrivateThread { thread, .. } => thread.name == name,
                };
                if matches {
                    found.push(*channel.id());
                }
            }
        }
        found
    }

    /// Find every cached user whose username matches `name`.
    pub fn find_user(&self, name: &str) -> Vec<UserId> {
        self.lock()
            .users
            .values()
            .filter(|cached| cached.user.name == name)
            .map(|cached| cached.user.id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ChannelType, Permissions, PermissionOverwrite, VerificationLevel};

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

    #[test]
    fn remove_server_strips_member_roles() {
        let state = State::new();
        let mut server = sample_server(1);
        let user = User {
            id: UserId(42),
            name: "alice".into(),
            discriminator: 1,
            avatar: None,
            bot: false,
        };
        server.members.push(Member {
            user: Some(user.clone()),
            nick: None,
            avatar: None,
            roles: vec![RoleId(7)],
            joined_at: "1970-01-01T00:00:00+00:00".parse().unwrap(),
            mute: false,
            deaf: false,
            flags: Default::default(),
            boosting_since: None,
        });
        state.add_server(server);
        assert_eq!(
            state.lock().user_roles.get(&UserId(42)).unwrap().get(&ServerId(1)),
            Some(&vec![RoleId(7)])
        );

        state.remove_server(ServerId(1));
        assert!(state.server(ServerId(1)).is_none());
        assert!(state
            .lock()
            .user_roles
            .get(&UserId(42))
            .map(|m| m.is_empty())
            .unwrap_or(true));
    }

    #[test]
    fn channel_cache_stays_consistent_with_server_channel_set() {
        let state = State::new();
        state.add_server(sample_server(1));

        let text = ServerChannel::Text {
            channel: crate::model::TextChannel {
                id: ChannelId(100),
                server_id: Some(ServerId(1)),
                name: "general".into(),
                position: 0,
                category_id: None,
                permission_overwrites: Vec::new(),
                topic: None,
                nsfw: false,
                last_message_id: None,
                last_pin_timestamp: None,
                rate_limit_per_user: None,
            },
            kind: crate::serial::Eq,
        };
        state.upsert_channel(Channel::Server(text));
        assert!(state.channel(ChannelId(100)).is_some());
        assert_eq!(state.server(ServerId(1)).unwrap().channels.len(), 1);

        state.remove_channel(ChannelId(100));
        assert!(state.channel(ChannelId(100)).is_none());
        assert_eq!(state.server(ServerId(1)).unwrap().channels.len(), 0);
    }

    #[test]
    fn set_presence_reports_whether_the_game_changed() {
        let state = State::new();
        let user = User {
            id: UserId(5),
            name: "bob".into(),
            discriminator: 2,
            avatar: None,
            bot: false,
        };
        assert!(!state.set_presence(user.clone(), OnlineStatus::Online, None));
        assert!(state.set_presence(user.clone(), OnlineStatus::Online, Some("chess".into())));
        assert!(!state.set_presence(user, OnlineStatus::Idle, Some("chess".into())));
    }

    fn sample_presence(user_id: UserId, status: OnlineStatus) -> Presence {
        Presence {
            user_id,
            status,
            last_modified: None,
            activities: Vec::new(),
        }
    }

    #[test]
    fn apply_presence_creates_an_unknown_user() {
        let state = State::new();
        assert!(state.user(UserId(9)).is_none());

        state.apply_presence(None, &sample_presence(UserId(9), OnlineStatus::Online));

        let cached = state.user(UserId(9)).expect("presence should lazily create the user");
        assert_eq!(cached.status, OnlineStatus::Online);
    }

    #[test]
    fn apply_presence_updates_status_without_a_server_context() {
        let state = State::new();
        state.apply_presence(None, &sample_presence(UserId(9), OnlineStatus::Idle));
        state.apply_presence(None, &sample_presence(UserId(9), OnlineStatus::DoNotDisturb));

        assert_eq!(
            state.user(UserId(9)).unwrap().status,
            OnlineStatus::DoNotDisturb
        );
    }

    #[allow(dead_code)]
    fn _unused_permission_types(_: Permissions, _: PermissionOverwrite, _: ChannelType) {}
}
