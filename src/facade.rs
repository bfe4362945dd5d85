//! The public surface a bot author actually writes against.
//!
//! Everything else in this crate — the cache, the bus, the dispatcher, the
//! session manager — is plumbing [`Bot`] wires together. A caller builds one
//! with [`BotBuilder`], registers handlers with [`Bot::on`]/[`Bot::add_await`],
//! and starts it with [`Bot::run`] or [`Bot::run_async`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;

use crate::bus::{DispatchedEvent, EventBus, EventKind, RegistrationId};
use crate::connection::{Credentials, Session};
use crate::dispatch::{Dispatcher, VoiceHandshake};
use crate::model::{Channel, ChannelId, LiveServer, Message, ServerId, UserId};
use crate::rest::{ChannelExt, MessageExt};
use crate::state::{CachedUser, State};
use crate::token_cache::TokenCache;
use crate::voice::VoicePending;
use crate::{Discord, Error, Result};

const DEFAULT_BOT_NAME: &str = "discord-gateway";
const DEFAULT_TOKEN_CACHE_PATH: &str = "discord-tokens.tsv";

/// Identity placeholder that tells the session manager the secret given to
/// [`BotBuilder::new`] is already a usable token: skip the token cache and
/// the REST login call entirely. Mirrors [`crate::connection`]'s sentinel.
const TOKEN_SENTINEL: &str = "token";

/// Builds a [`Bot`].
///
/// ```no_run
/// # use discord_gateway::BotBuilder;
/// let bot = BotBuilder::from_bot_token("MTA5...").bot_name("my-cool-bot").build();
/// ```
pub struct BotBuilder {
    identity: String,
    secret: String,
    bot_name: String,
    token_cache_path: PathBuf,
    parse_self: bool,
    max_concurrent_handlers: Option<usize>,
}

impl BotBuilder {
    /// Log in with an `(identity, secret)` pair the way a user account would
    /// (email + password), consulting and refreshing the token cache as
    /// described in §4.1/§4.6 of the core's design. Most bots want
    /// [`BotBuilder::from_bot_token`] instead.
    pub fn new(identity: impl Into<String>, secret: impl Into<String>) -> Self {
        BotBuilder {
            identity: identity.into(),
            secret: secret.into(),
            bot_name: DEFAULT_BOT_NAME.to_string(),
            token_cache_path: PathBuf::from(DEFAULT_TOKEN_CACHE_PATH),
            parse_self: false,
            max_concurrent_handlers: None,
        }
    }

    /// Log in with a pre-issued bot token, bypassing the token cache and the
    /// login call entirely (the login routine's `"token"` sentinel identity).
    pub fn from_bot_token(token: impl Into<String>) -> Self {
        BotBuilder::new(TOKEN_SENTINEL, token)
    }

    /// Set the bot name sent as the `X-Bot-Name` header on every REST
    /// request and as the `$browser`/`$device` identify fingerprint.
    pub fn bot_name(mut self, name: impl Into<String>) -> Self {
        self.bot_name = name.into();
        self
    }

    /// Override where the token cache is persisted. Defaults to
    /// `discord-tokens.tsv` in the current working directory.
    pub fn token_cache_path(mut self, path: impl AsRef<Path>) -> Self {
        self.token_cache_path = path.as_ref().to_path_buf();
        self
    }

    /// Whether `MESSAGE_CREATE` authored by the bot's own user should still
    /// raise `Message`/`Mention`/`PrivateMessage`. Defaults to `false`
    /// (self-authored messages are suppressed).
    pub fn parse_self(mut self, parse_self: bool) -> Self {
        self.parse_self = parse_self;
        self
    }

    /// Bound how many event handler invocations may run concurrently.
    /// `None` (the default) preserves the one-task-per-handler, unbounded
    /// semantics described in §5.
    pub fn max_concurrent_handlers(mut self, max: Option<usize>) -> Self {
        self.max_concurrent_handlers = max;
        self
    }

    /// Finish building. Does not connect; call [`Bot::run`] or
    /// [`Bot::run_async`] to start the session.
    pub fn build(self) -> Bot {
        let state = State::new();
        let bus = EventBus::with_max_concurrent_handlers(self.max_concurrent_handlers);
        let voice_pending = VoicePending::new();
        let dispatcher = Dispatcher::new(state, bus, self.parse_self, voice_pending.clone());
        let token_cache = TokenCache::load(&self.token_cache_path);
        let credentials = Credentials {
            identity: self.identity,
            secret: self.secret,
            bot_name: self.bot_name,
        };

        Bot {
            session: Session::new(credentials, token_cache, dispatcher, voice_pending),
        }
    }
}

/// A running (or not-yet-started) Discord gateway client.
///
/// Cheap to clone: every method borrows shared state, so a `Bot` can be
/// handed to handler closures (via `Arc` or simply cloned) without any of
/// them owning the session outright.
#[derive(Clone)]
pub struct Bot {
    session: Session,
}

impl Bot {
    fn bus(&self) -> &EventBus {
        self.session.dispatcher().bus()
    }

    fn state(&self) -> &State {
        self.session.dispatcher().state()
    }

    async fn discord(&self) -> Result<Arc<Discord>> {
        self.session
            .discord()
            .await
            .ok_or(Error::Other("not connected to the gateway yet"))
    }

    /// Start the session manager on a fresh Tokio runtime and block the
    /// calling thread until it stops (via [`Bot::stop`] or a fatal login
    /// error). Do not call this from within an existing Tokio runtime —
    /// use [`Bot::run_async`] there instead.
    pub fn run(&self) -> Result<()> {
        let runtime = tokio::runtime::Runtime::new().map_err(Error::Io)?;
        runtime.block_on(self.session.clone().run())
    }

    /// Start the session manager on the current Tokio runtime and return
    /// immediately. The session keeps running in the background (handling
    /// reconnects and backoff on its own) until [`Bot::stop`] is called or
    /// a fatal login error occurs.
    pub fn run_async(&self) -> tokio::task::JoinHandle<Result<()>> {
        tokio::spawn(self.session.clone().run())
    }

    /// Forcibly terminate the running session. Idempotent; safe to call
    /// whether or not the session has started.
    pub fn stop(&self) {
        self.session.stop();
    }

    /// Whether a `READY` has been processed on the current connection (the
    /// heartbeat timer is active exactly when this is `true`).
    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    /// Register a handler for events of `kind` matching `predicate`. Returns
    /// an id usable with [`Bot::off`]. Handlers run in registration order
    /// but concurrently with each other, each on its own orphaned task.
    pub fn on<P, H>(&self, kind: EventKind, predicate: P, handler: H) -> RegistrationId
    where
        P: Fn(&DispatchedEvent) -> bool + Send + Sync + 'static,
        H: Fn(DispatchedEvent) + Send + Sync + 'static,
    {
        self.bus().on(kind, predicate, handler)
    }

    /// Remove a previously registered handler. No-op if already gone.
    pub fn off(&self, id: RegistrationId) {
        self.bus().off(id)
    }

    /// Register a subscription matching events of `kind` whose attributes
    /// contain every `(key, value)` pair in `attrs`. A non-durable await
    /// yields exactly one event and is then dropped from the registry; a
    /// durable one stays registered and keeps yielding a matching event on
    /// every subsequent `raise` — call `recv()` on the returned channel in
    /// a loop to observe them all.
    pub fn add_await(
        &self,
        key: impl Into<String>,
        kind: EventKind,
        attrs: HashMap<String, Value>,
        durable: bool,
    ) -> mpsc::UnboundedReceiver<DispatchedEvent> {
        self.bus().add_await(key, kind, attrs, durable)
    }

    /// Look up a channel: cache first, then REST on a miss. A successful
    /// REST fetch is cached; a `NoPermission` response is recorded on the
    /// denylist so future lookups fail fast without another round trip.
    pub async fn channel(&self, id: ChannelId) -> Result<Channel> {
        if let Some(channel) = self.state().channel(id) {
            return Ok(channel);
        }
        if self.state().is_restricted(id) {
            return Err(Error::NoPermission);
        }

        let discord = self.discord().await?;
        match discord.get_channel(id).await {
            Ok(channel) => {
                self.state().upsert_channel(channel.clone());
                Ok(channel)
            }
            Err(Error::NoPermission) => {
                self.state().mark_restricted(id);
                Err(Error::NoPermission)
            }
            Err(e) => Err(e),
        }
    }

    /// Look up a cached user by id. Cache-only; returns `None` on a miss
    /// rather than falling back to REST.
    pub fn user(&self, id: UserId) -> Option<CachedUser> {
        self.state().user(id)
    }

    /// Look up a cached server by id. Cache-only.
    pub fn server(&self, id: ServerId) -> Option<LiveServer> {
        self.state().server(id)
    }

    /// Find every channel named `name` across every cached server,
    /// optionally restricted to the server named `server_name`.
    pub fn find_channel(&self, name: &str, server_name: Option<&str>) -> Vec<ChannelId> {
        self.state().find_channel(name, server_name)
    }

    /// Find every cached user whose username matches `name`.
    pub fn find_user(&self, name: &str) -> Vec<UserId> {
        self.state().find_user(name)
    }

    /// Send a plain-text message to a channel.
    pub async fn send_message(&self, channel_id: ChannelId, content: &str, tts: bool) -> Result<Message> {
        let discord = self.discord().await?;
        discord
            .send_message(channel_id, |m| m.content(content).tts(tts))
            .await
    }

    /// Parse a `<@id>` or `<@!id>` user mention out of `text` and look the
    /// referenced user up in the cache. Returns `None` if the text isn't a
    /// user mention or the mentioned user isn't cached.
    pub fn parse_mention(&self, text: &str) -> Option<CachedUser> {
        let id = parse_user_mention_id(text)?;
        self.state().user(UserId(id))
    }

    /// Set (or clear) the bot's current "Playing ..." presence.
    pub async fn set_game(&self, name: Option<String>) -> Result<()> {
        self.session.set_game(name).await
    }

    /// Begin a voice handshake for `channel_id` (on `server_id`, or `None`
    /// for a group/private call). Tears down any existing voice session
    /// first, then waits for `VOICE_SERVER_UPDATE` to complete the
    /// handshake.
    pub async fn voice_connect(
        &self,
        server_id: Option<ServerId>,
        channel_id: ChannelId,
        encrypted: bool,
    ) -> Result<VoiceHandshake> {
        self.session.voice_connect(server_id, channel_id, encrypted).await
    }

    /// Tear down the active (or still-pending) voice session for
    /// `server_id`.
    pub async fn voice_destroy(&self, server_id: Option<ServerId>) -> Result<()> {
        self.session.voice_destroy(server_id).await
    }
}

/// Parse the numeric id out of a `<@id>` or `<@!id>` user mention. Discord
/// adds the `!` when the author has a per-server nickname; both forms refer
/// to the same user id.
fn parse_user_mention_id(text: &str) -> Option<u64> {
    let text = text.trim();
    let rest = text.strip_prefix("<@")?;
    let rest = rest.strip_prefix('!').unwrap_or(rest);
    let digits = rest.strip_suffix('>')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_nickname_mentions() {
        assert_eq!(parse_user_mention_id("<@123>"), Some(123));
        assert_eq!(parse_user_mention_id("<@!456>"), Some(456));
    }

    #[test]
    fn rejects_non_mentions() {
        assert_eq!(parse_user_mention_id("hello"), None);
        assert_eq!(parse_user_mention_id("<@>"), None);
        assert_eq!(parse_user_mention_id("<@12a>"), None);
        assert_eq!(parse_user_mention_id("<#123>"), None);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(parse_user_mention_id("  <@789>  "), Some(789));
    }
}
