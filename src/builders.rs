//! Builders for REST API calls that patch or create rich objects.
//!
//! Each builder wraps the JSON object that will be sent as the request body,
//! pre-seeded with whatever fields the calling method already knows about
//! (e.g. `edit_channel` seeds the builder with the channel's current state,
//! so fields you don't touch keep their existing value). Call the setter
//! methods you need, in any order; each one consumes and returns `Self` so
//! calls can be chained.

use serde_json::{json, Value};

use crate::model::{ChannelId, PermissionOverwrite, Permissions, RoleId, VerificationLevel};
use crate::Object;

/// Patch content for the `edit_channel` call.
pub struct EditChannel(Object);

impl EditChannel {
    pub(crate) fn apply<F: FnOnce(Self) -> Self>(f: F, map: Object) -> Object {
        f(EditChannel(map)).0
    }

    /// Change the channel's name.
    pub fn name(mut self, name: &str) -> Self {
        self.0.insert("name".into(), json!(name));
        self
    }

    /// Change the channel's topic. Only applies to text-like channels.
    pub fn topic(mut self, topic: &str) -> Self {
        self.0.insert("topic".into(), json!(topic));
        self
    }

    /// Mark the channel as NSFW or not.
    pub fn nsfw(mut self, nsfw: bool) -> Self {
        self.0.insert("nsfw".into(), json!(nsfw));
        self
    }

    /// Change the voice channel's bitrate, in bits per second.
    pub fn bitrate(mut self, bitrate: u32) -> Self {
        self.0.insert("bitrate".into(), json!(bitrate));
        self
    }

    /// Change the voice channel's user limit. `0` means unlimited.
    pub fn user_limit(mut self, user_limit: u32) -> Self {
        self.0.insert("user_limit".into(), json!(user_limit));
        self
    }

    /// Change the channel's position in the channel list.
    pub fn position(mut self, position: i32) -> Self {
        self.0.insert("position".into(), json!(position));
        self
    }

    /// Move the channel under a different category, or out of one with `None`.
    pub fn category(mut self, category: Option<ChannelId>) -> Self {
        self.0.insert("parent_id".into(), json!(category));
        self
    }

    /// Change the slowmode delay, in seconds, between messages a single user may send.
    pub fn rate_limit_per_user(mut self, seconds: u32) -> Self {
        self.0.insert("rate_limit_per_user".into(), json!(seconds));
        self
    }

    /// Replace the channel's permission overwrites entirely.
    pub fn permission_overwrites(mut self, overwrites: &[PermissionOverwrite]) -> Self {
        self.0
            .insert("permission_overwrites".into(), json!(overwrites));
        self
    }
}

/// Patch content for the `edit_server` call.
pub struct EditServer(Object);

impl EditServer {
    pub(crate) fn build<F: FnOnce(Self) -> Self>(f: F) -> Object {
        f(EditServer(Object::new())).0
    }

    /// Edit the server's name.
    pub fn name(mut self, name: &str) -> Self {
        self.0.insert("name".into(), json!(name));
        self
    }

    /// Edit the server's voice region.
    pub fn region(mut self, region: &str) -> Self {
        self.0.insert("region".into(), json!(region));
        self
    }

    /// Edit the server's icon. Use `None` to remove the icon.
    pub fn icon(mut self, icon: Option<&str>) -> Self {
        self.0.insert("icon".into(), json!(icon));
        self
    }

    /// Edit the server's AFK channel. Use `None` to select no AFK channel.
    pub fn afk_channel(mut self, channel: Option<ChannelId>) -> Self {
        self.0.insert("afk_channel_id".into(), json!(channel));
        self
    }

    /// Edit the server's AFK timeout, in seconds.
    pub fn afk_timeout(mut self, timeout: u64) -> Self {
        self.0.insert("afk_timeout".into(), json!(timeout));
        self
    }

    /// Transfer ownership of the server to a new owner.
    pub fn owner(mut self, owner: crate::model::UserId) -> Self {
        self.0.insert("owner_id".into(), json!(owner));
        self
    }

    /// Edit the verification level required to participate in the server.
    pub fn verification_level(mut self, level: VerificationLevel) -> Self {
        self.0.insert("verification_level".into(), json!(level));
        self
    }

    /// Edit the server's invite splash image. Use `None` to remove it.
    pub fn splash(mut self, splash: Option<&str>) -> Self {
        self.0.insert("splash".into(), json!(splash));
        self
    }
}

/// Patch content for the `edit_member` call.
pub struct EditMember(Object);

impl EditMember {
    pub(crate) fn build<F: FnOnce(Self) -> Self>(f: F) -> Object {
        f(EditMember(Object::new())).0
    }

    /// Replace the member's nickname. Use `None` to remove it.
    pub fn nick(mut self, nick: Option<&str>) -> Self {
        self.0.insert("nick".into(), json!(nick.unwrap_or("")));
        self
    }

    /// Replace the member's role list entirely.
    pub fn roles(mut self, roles: &[RoleId]) -> Self {
        self.0.insert("roles".into(), json!(roles));
        self
    }

    /// Server-mute or unmute the member in voice channels.
    pub fn mute(mut self, mute: bool) -> Self {
        self.0.insert("mute".into(), json!(mute));
        self
    }

    /// Server-deafen or undeafen the member in voice channels.
    pub fn deaf(mut self, deaf: bool) -> Self {
        self.0.insert("deaf".into(), json!(deaf));
        self
    }

    /// Move the member to a different voice channel, or disconnect with `None`.
    pub fn channel(mut self, channel: Option<ChannelId>) -> Self {
        self.0.insert("channel_id".into(), json!(channel));
        self
    }
}

/// Patch content for the `create_role`/`create_role_from_builder`/`edit_role` calls.
pub struct EditRole(Object);

impl EditRole {
    pub(crate) fn build<F: FnOnce(Self) -> Self>(f: F) -> Object {
        f(EditRole(Object::new())).0
    }

    /// Set the role's name.
    pub fn name(mut self, name: &str) -> Self {
        self.0.insert("name".into(), json!(name));
        self
    }

    /// Set the role's permission bitfield.
    pub fn permissions(mut self, permissions: Permissions) -> Self {
        self.0.insert("permissions".into(), json!(permissions.bits()));
        self
    }

    /// Set the role's display color, as an RGB integer.
    pub fn color(mut self, color: u64) -> Self {
        self.0.insert("color".into(), json!(color));
        self
    }

    /// Set whether the role should be displayed separately in the member list.
    pub fn hoist(mut self, hoist: bool) -> Self {
        self.0.insert("hoist".into(), json!(hoist));
        self
    }

    /// Set whether the role can be mentioned by members without the mention-everyone permission.
    pub fn mentionable(mut self, mentionable: bool) -> Self {
        self.0.insert("mentionable".into(), json!(mentionable));
        self
    }
}

/// Patch content for the `edit_profile` call, usable for both bot and user accounts.
pub struct EditProfile(Object);

impl EditProfile {
    pub(crate) fn apply<F: FnOnce(Self) -> Self>(f: F, map: Object) -> Object {
        f(EditProfile(map)).0
    }

    /// Edit the account's username. Must be between 2 and 32 characters long.
    pub fn username(mut self, username: &str) -> Self {
        self.0.insert("username".into(), json!(username));
        self
    }

    /// Edit the account's avatar. Use `None` to remove it.
    ///
    /// The image should already be encoded as a `data:` URI, e.g. via `read_image`.
    pub fn avatar(mut self, avatar: Option<&str>) -> Self {
        self.0.insert("avatar".into(), json!(avatar));
        self
    }
}

/// Patch content for the `edit_user_profile` call, usable only for non-bot accounts.
pub struct EditUserProfile(Object);

impl EditUserProfile {
    pub(crate) fn apply<F: FnOnce(Self) -> Self>(f: F, map: Object) -> Object {
        f(EditUserProfile(map)).0
    }

    /// Edit the account's username. Must be between 2 and 32 characters long.
    pub fn username(mut self, username: &str) -> Self {
        self.0.insert("username".into(), json!(username));
        self
    }

    /// Edit the account's avatar. Use `None` to remove it.
    pub fn avatar(mut self, avatar: Option<&str>) -> Self {
        self.0.insert("avatar".into(), json!(avatar));
        self
    }

    /// Provide the account's current password. Required by Discord to apply this patch.
    pub fn password(mut self, password: &str) -> Self {
        self.0.insert("password".into(), json!(password));
        self
    }

    /// Edit the account's email address.
    pub fn email(mut self, email: &str) -> Self {
        self.0.insert("email".into(), json!(email));
        self
    }

    /// Change the account's password.
    pub fn new_password(mut self, password: &str) -> Self {
        self.0.insert("new_password".into(), json!(password));
        self
    }
}

/// Content for the `send_message`/`edit_message` calls.
#[derive(Default)]
pub struct SendMessage(Object);

impl SendMessage {
    pub(crate) fn build<F: FnOnce(Self) -> Self>(f: F) -> Object {
        f(SendMessage(Object::new())).0
    }

    /// Set the message's text content.
    pub fn content(mut self, content: &str) -> Self {
        self.0.insert("content".into(), json!(content));
        self
    }

    /// Set whether the message should be read aloud by clients with TTS enabled.
    pub fn tts(mut self, tts: bool) -> Self {
        self.0.insert("tts".into(), json!(tts));
        self
    }

    /// Attach a client-generated nonce, echoed back on the created message, useful for
    /// matching a locally queued message against the one the gateway later dispatches.
    pub fn nonce(mut self, nonce: &str) -> Self {
        self.0.insert("nonce".into(), json!(nonce));
        self
    }

    /// Attach a rich embed to the message, as a raw JSON value.
    pub fn embed(mut self, embed: Value) -> Self {
        self.0.insert("embeds".into(), json!([embed]));
        self
    }
}
