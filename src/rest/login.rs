use serde_json::json;

use crate::{error::Error, ratelimit::RateLimits, Object, Result};

use super::{Discord, API_BASE};

/// User agent to use when logging into a bot account.
const BOT_USER_AGENT: &'static str = concat!(
    "DiscordBot (https://github.com/spiceswag/discord-tokio, ",
    env!("CARGO_PKG_VERSION"),
    ")"
);

/// User agent to use when logging into a user account.
const USERBOT_USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/119.0.0.0 Safari/537.36";

/// Login methods for creating a [`Discord`] API client.
pub trait LoginExt {
    /// Log in as a bot account using the given bot authentication token.
    /// The token will automatically be prefixed with `Bot `.
    fn from_bot_token(bot_name: &str, token: &str) -> Result<Discord>;

    /// Log in as a user account using the given user authentication token.
    fn from_user_token(bot_name: &str, token: &str) -> Result<Discord>;
}

impl LoginExt for Discord {
    /// Log in as a bot account using the given bot authentication token.
    /// The token will automatically be prefixed with `Bot `.
    fn from_bot_token(bot_name: &str, token: &str) -> Result<Discord> {
        Ok(Discord {
            rate_limits: RateLimits::default(),
            client: reqwest::Client::builder()
                .https_only(true)
                .user_agent(BOT_USER_AGENT)
                .build()
                .expect("Couldn't build HTTPS reqwest client"),
            token: format!("Bot {}", token.trim()),
            bot_name: bot_name.to_string(),
        })
    }

    /// Log in as a user account using the given user authentication token.
    fn from_user_token(bot_name: &str, token: &str) -> Result<Discord> {
        Ok(Discord {
            rate_limits: RateLimits::default(),
            client: reqwest::Client::builder()
                .https_only(true)
                .user_agent(USERBOT_USER_AGENT)
                .build()
                .expect("Couldn't build HTTPS reqwest client"),
            token: token.trim().to_string(),
            bot_name: bot_name.to_string(),
        })
    }
}

/// Exchange a pair of login credentials for a fresh authentication token.
///
/// `identity` and `secret` are passed through verbatim as the `email` and
/// `password` fields of Discord's `/auth/login` endpoint. A `523` response
/// (origin unreachable, something Discord's edge returns under load) is
/// reported as [`Error::Transport`] so the caller can retry; any other
/// non-success status is fatal.
pub async fn login(identity: &str, secret: &str) -> Result<String> {
    let client = reqwest::Client::builder()
        .https_only(true)
        .user_agent(USERBOT_USER_AGENT)
        .build()
        .expect("Couldn't build HTTPS reqwest client");

    let map = json! {{ "email": identity, "password": secret }};

    let response = client
        .post(&format!("{API_BASE}/auth/login"))
        .json(&map)
        .send()
        .await
        .map_err(Error::from)?;

    if response.status().as_u16() == 523 {
        return Err(Error::Transport);
    }

    let mut map: Object = if response.status().is_success() {
        response
    } else {
        return Err(Error::from_response(response).await);
    }
    .json()
    .await?;

    match map.remove("token") {
        Some(serde_json::Value::String(token)) => Ok(token),
        _ => Err(Error::Protocol("login response missing \"token\"")),
    }
}
