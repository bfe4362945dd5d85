use reqwest::Method;
use std::collections::BTreeMap;

use crate::{Discord, Error, Object, Result};

/// Extension trait for the gateway-discovery REST endpoints.
pub trait ConnectExt {
    /// Retrieves the number of guild shards Discord suggests to use based on the number of guilds.
    /// This endpoint is only available for bots.
    async fn suggested_shard_count(&self) -> Result<u8>;
}

impl ConnectExt for Discord {
    async fn suggested_shard_count(&self) -> Result<u8> {
        let mut response = self
            .empty_request("/gateway/bot", Method::GET)
            .await?
            .json::<Object>()
            .await?;

        match response.remove("shards") {
            Some(value) => match value.as_u64() {
                Some(shards) => Ok(shards as u8),
                None => Err(Error::Decode("Invalid \"shards\"", value)),
            },
            None => Err(Error::Decode(
                "suggested_shard_count missing \"shards\"",
                serde_json::Value::Object(response),
            )),
        }
    }
}

/// Fetch the gateway URL to connect to.
pub(crate) async fn get_gateway_url(client: &Discord) -> Result<String> {
    let mut response: BTreeMap<String, String> = client
        .empty_request("/gateway", Method::GET)
        .await?
        .json()
        .await?;

    match response.remove("url") {
        Some(url) => Ok(url),
        None => Err(Error::Protocol(
            "Response missing \"url\" in Discord::get_gateway_url()",
        )),
    }
}
