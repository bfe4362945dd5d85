//! Voice session handshake bookkeeping.
//!
//! Establishing a voice connection is a three-step exchange over the main
//! gateway socket: send op=4 (`Voice State Update`) naming a channel, wait
//! for `VOICE_STATE_UPDATE` to come back with our own session id, then wait
//! for `VOICE_SERVER_UPDATE` to hand over the token and endpoint for that
//! session. Once all three pieces are in hand the caller has everything
//! needed to open the actual voice transport; this module stops there and
//! leaves the RTP/UDP/Opus machinery to a separate crate.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::model::{ChannelId, ServerId};

/// The parts of a voice connect request that must survive from the op=4
/// send until `VOICE_SERVER_UPDATE` arrives.
#[derive(Debug, Clone)]
pub struct PendingVoice {
    pub channel_id: Option<ChannelId>,
    pub session_id: String,
    pub encrypted: bool,
}

/// Tracks in-flight voice connect requests, keyed by server id (`None` for a
/// group/private call). Registration happens when the op=4 payload is sent
/// and the session id is known; resolution happens when
/// `VOICE_SERVER_UPDATE` for the same key arrives.
#[derive(Clone)]
pub struct VoicePending {
    inner: Arc<Mutex<HashMap<Option<ServerId>, PendingVoice>>>,
}

impl VoicePending {
    pub fn new() -> Self {
        VoicePending {
            inner: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record a voice connect in flight for `server_id`. Replaces any
    /// previous pending request for the same key, per the "single voice
    /// session at a time" rule.
    pub fn register(
        &self,
        server_id: Option<ServerId>,
        channel_id: Option<ChannelId>,
        session_id: String,
        encrypted: bool,
    ) {
        self.inner.lock().unwrap().insert(
            server_id,
            PendingVoice {
                channel_id,
                session_id,
                encrypted,
            },
        );
    }

    /// Remove and return the pending request for `server_id`, if one is
    /// outstanding. Called once per `VOICE_SERVER_UPDATE`.
    pub fn take_if_matching(&self, server_id: Option<ServerId>) -> Option<PendingVoice> {
        self.inner.lock().unwrap().remove(&server_id)
    }

    /// Record the bot's own session id for a pending voice connect, once
    /// `VOICE_STATE_UPDATE` reports it. No-op if no request is pending for
    /// this key, e.g. for voice states belonging to other users.
    pub fn update_session_id(&self, server_id: Option<ServerId>, session_id: String) {
        if let Some(pending) = self.inner.lock().unwrap().get_mut(&server_id) {
            pending.session_id = session_id;
        }
    }

    /// Drop a pending request without resolving it, e.g. on disconnect.
    pub fn cancel(&self, server_id: Option<ServerId>) {
        self.inner.lock().unwrap().remove(&server_id);
    }
}

impl Default for VoicePending {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_if_matching_consumes_the_entry() {
        let pending = VoicePending::new();
        pending.register(Some(ServerId(1)), Some(ChannelId(2)), "sess".into(), true);

        let taken = pending.take_if_matching(Some(ServerId(1))).unwrap();
        assert_eq!(taken.channel_id, Some(ChannelId(2)));
        assert_eq!(taken.session_id, "sess");
        assert!(taken.encrypted);

        assert!(pending.take_if_matching(Some(ServerId(1))).is_none());
    }

    #[test]
    fn unrelated_server_ids_do_not_interfere() {
        let pending = VoicePending::new();
        pending.register(Some(ServerId(1)), None, "a".into(), false);
        pending.register(Some(ServerId(2)), None, "b".into(), false);

        assert_eq!(
            pending.take_if_matching(Some(ServerId(2))).unwrap().session_id,
            "b"
        );
        assert_eq!(
            pending.take_if_matching(Some(ServerId(1))).unwrap().session_id,
            "a"
        );
    }
}
