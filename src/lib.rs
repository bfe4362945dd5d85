//! Gateway client core for the [Discord](https://discord.com) API.
//!
//! This crate owns the long-lived, bidirectional session between a bot
//! process and Discord's real-time gateway: authenticated session
//! establishment, the reconnect/backoff loop, the heartbeat scheduler, and
//! the dispatch of server-pushed events into an in-process cache of
//! guilds/channels/users/roles, fanned out to registered handlers and
//! one-shot awaits.
//!
//! Build a [`Bot`] with [`BotBuilder::from_bot_token`] (or [`BotBuilder::new`]
//! for a user-style login that goes through the token cache), register
//! handlers with [`Bot::on`], and start it with [`Bot::run`] (blocking) or
//! [`Bot::run_async`] (spawns on the current runtime). `Bot::channel`,
//! `Bot::user`, `Bot::server`, `Bot::find_channel`, and `Bot::find_user`
//! read the cache the dispatcher keeps up to date; `Bot::send_message` and
//! the rest of the REST API (re-exported at the crate root) make outbound
//! calls.
//!
//! To join a voice channel, call [`Bot::voice_connect`]; once
//! `VOICE_SERVER_UPDATE` arrives the returned [`VoiceHandshake`] carries
//! everything a separate RTP/UDP transport needs to take over — opening
//! that transport is out of scope for this crate.

#![warn(missing_docs)]
#![allow(deprecated)]

type Object = serde_json::Map<String, serde_json::Value>;

mod bus;
mod connection;
mod dispatch;
mod error;
mod facade;
mod io;
mod ratelimit;
mod state;
mod token_cache;

mod rest;
pub use rest::*;

macro_rules! cdn_concat {
    ($e:expr) => {
        // Out of everything, only the CDN still uses the old domain.
        concat!("https://cdn.discordapp.com", $e)
    };
}

/// Struct and enum definitions of values in the Discord model.
pub mod model {
    mod event;
    pub use self::event::*;

    mod frozen;
    pub use frozen::*;

    mod live;
    pub use live::*;
}

pub mod voice;

#[macro_use]
mod serial;
pub mod builders;

pub use bus::{DispatchedEvent, EventBus, EventKind, RegistrationId};
pub use dispatch::{Dispatcher, Outbound, VoiceHandshake};
pub use error::{Error, Result};
pub use facade::{Bot, BotBuilder};
pub use state::{CachedUser, State};

use crate::model::MessageId;

/// Read an image from a file into a string suitable for upload.
///
/// If the file's extension is `.png`, the claimed media type will be `image/png`, or `image/jpg`
/// otherwise. Note that Discord may convert the image to JPEG or another format after upload.
pub fn read_image<P: AsRef<::std::path::Path>>(path: P) -> Result<String> {
    use std::io::Read;
    let path = path.as_ref();
    let mut vec = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut vec)?;
    Ok(format!(
        "data:image/{};base64,{}",
        if path.extension() == Some("png".as_ref()) {
            "png"
        } else {
            "jpg"
        },
        base64::encode(&vec),
    ))
}

/// Argument to `get_messages` to specify the desired message retrieval.
pub enum GetMessages {
    /// Get the N most recent messages.
    MostRecent,
    /// Get the first N messages before the specified message.
    Before(MessageId),
    /// Get the first N messages after the specified message.
    After(MessageId),
    /// Get N/2 messages before, N/2 messages after, and the specified message.
    Around(MessageId),
}

/// Send a request with the correct `UserAgent`, retrying it a second time if the
/// connection is aborted the first time.
pub(crate) async fn retry<'a, F: FnMut() -> reqwest::RequestBuilder>(
    f: &mut F,
) -> reqwest::Result<reqwest::Response> {
    // retry on a ConnectionAborted, which occurs if it's been a while since the last request
    match f().send().await {
        Err(err) if err.is_connect() => f().send().await,
        other => other,
    }
}

pub(crate) fn resolve_invite(invite: &str) -> &str {
    if invite.starts_with("http://discord.gg/") {
        &invite[18..]
    } else if invite.starts_with("https://discord.gg/") {
        &invite[19..]
    } else if invite.starts_with("discord.gg/") {
        &invite[11..]
    } else {
        invite
    }
}
