//! Session manager: owns the gateway WebSocket, the heartbeat timer, and the
//! reconnect/backoff loop.
//!
//! This is the only module allowed to write to the socket. Everything else
//! (the facade, the heartbeat task, voice handshakes) goes through
//! [`OutboundQueue`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::{oneshot, watch, RwLock};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};
use websockets::WebSocket;

use crate::dispatch::{Dispatcher, Outbound, VoiceHandshake};
use crate::io::{GatewayEventStream, JsonSink, JsonStream, SharedSink};
use crate::model::{
    Activity, ActivityFlags, ActivityType, ChannelId, Event, HelloPayload, IdentifyConnection,
    IdentifyPayload, OnlineStatus, ReadyEvent, ReceivedMessage, RequestGuildMembersPayload,
    ResumePayload, SentMessage, ServerId, UpdatePresencePayload, UpdateVoiceStatePayload,
    GATEWAY_VERSION,
};
use crate::rest::{get_gateway_url, login, Discord, LoginExt};
use crate::serial::Eq;
use crate::token_cache::TokenCache;
use crate::voice::VoicePending;
use crate::{Error, Result};

/// Identity placeholder meaning "the secret you gave me is already a token,
/// skip the login dance and the token cache entirely".
const TOKEN_SENTINEL: &str = "token";

/// Identify protocol fingerprint.
const CLIENT_NAME: &str = "discord-gateway";

/// Number of offline members a guild must exceed before the gateway stops
/// sending the full member list on READY.
const LARGE_THRESHOLD: u64 = 100;

const LOGIN_RETRY_ATTEMPTS: u32 = 100;
const LOGIN_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Exponential-with-jitter backoff: starts at 1.0s, multiplies by 1.5 per
/// failure, and clamps into `[115, 125]` seconds once that product exceeds
/// 1.0 second. Reset to 1.0 on every successful READY.
pub(crate) struct Backoff {
    next_value: f64,
}

impl Backoff {
    pub fn new() -> Self {
        Backoff { next_value: 1.0 }
    }

    pub fn reset(&mut self) {
        self.next_value = 1.0;
    }

    pub fn next(&mut self) -> Duration {
        let value = self.next_value;
        let candidate = value * 1.5;
        self.next_value = if candidate > 1.0 {
            115.0 + rand::random::<f64>() * 10.0
        } else {
            candidate
        };
        Duration::from_secs_f64(value)
    }
}

/// The single outbound queue owned by the session task. All writers (the
/// heartbeat task, the voice handshake, the facade's `game=`) funnel through
/// this rather than touching the socket directly.
#[derive(Clone)]
pub(crate) struct OutboundQueue {
    sink: Arc<Mutex<Option<SharedSink<JsonSink, Value>>>>,
}

impl OutboundQueue {
    fn new() -> Self {
        OutboundQueue {
            sink: Arc::new(Mutex::new(None)),
        }
    }

    fn set(&self, sink: SharedSink<JsonSink, Value>) {
        *self.sink.lock().unwrap() = Some(sink);
    }

    fn clear(&self) {
        *self.sink.lock().unwrap() = None;
    }

    pub async fn send(&self, value: Value) -> Result<()> {
        use futures::SinkExt;

        let mut sink = match self.sink.lock().unwrap().clone() {
            Some(sink) => sink,
            None => return Err(Error::Closed(None, "no active gateway connection".into())),
        };
        sink.send(value)
            .await
            .map_err(|_| Error::Closed(None, "gateway connection closed mid-send".into()))
    }
}

/// Bridges a dispatcher-raised [`Outbound::VoiceServerReady`] back to
/// whichever task called `voice_connect`, keyed the same way as
/// [`VoicePending`].
#[derive(Clone)]
struct VoiceWaiters {
    inner: Arc<Mutex<std::collections::HashMap<Option<ServerId>, oneshot::Sender<VoiceHandshake>>>>,
}

impl VoiceWaiters {
    fn new() -> Self {
        VoiceWaiters {
            inner: Arc::new(Mutex::new(std::collections::HashMap::new())),
        }
    }

    fn register(&self, server_id: Option<ServerId>) -> oneshot::Receiver<VoiceHandshake> {
        let (tx, rx) = oneshot::channel();
        self.inner.lock().unwrap().insert(server_id, tx);
        rx
    }

    fn resolve(&self, handshake: VoiceHandshake) {
        if let Some(tx) = self.inner.lock().unwrap().remove(&handshake.server_id) {
            let _ = tx.send(handshake);
        }
    }

    fn cancel(&self, server_id: Option<ServerId>) {
        self.inner.lock().unwrap().remove(&server_id);
    }
}

/// Credentials the session manager logs in with.
pub(crate) struct Credentials {
    pub identity: String,
    pub secret: String,
    pub bot_name: String,
}

/// Handle shared between the background session task and the public facade.
///
/// Cheap to clone; clones refer to the same running (or not-yet-started)
/// session.
#[derive(Clone)]
pub(crate) struct Session {
    credentials: Arc<Credentials>,
    token_cache: Arc<Mutex<TokenCache>>,
    dispatcher: Arc<Dispatcher>,
    voice_pending: VoicePending,
    voice_waiters: VoiceWaiters,
    outbound: OutboundQueue,
    discord: Arc<RwLock<Option<Arc<Discord>>>>,
    stop: watch::Sender<bool>,
    ready: Arc<AtomicBool>,
}

/// What ended one connected socket's run.
enum RunOutcome {
    /// `stop()` was called; the whole session should shut down.
    Stopped,
    /// The socket closed (or the gateway asked to reconnect). If a session
    /// id and sequence are known, the caller should try to resume before
    /// falling back to a fresh login + identify.
    Closed { resume: Option<(String, u64)> },
}

/// A connected, authenticated socket: ready to process dispatches.
struct ConnectedSocket {
    stream: GatewayEventStream,
    session_id: String,
    last_sequence: u64,
    /// Shared with the heartbeat task so every beat carries the most
    /// recently observed sequence number, not just the one seen at connect
    /// time.
    sequence_cell: Arc<Mutex<u64>>,
    shutdown_heartbeat: oneshot::Sender<()>,
}

impl Session {
    pub(crate) fn new(
        credentials: Credentials,
        token_cache: TokenCache,
        dispatcher: Dispatcher,
        voice_pending: VoicePending,
    ) -> Self {
        let (stop, _) = watch::channel(false);
        Session {
            credentials: Arc::new(credentials),
            token_cache: Arc::new(Mutex::new(token_cache)),
            dispatcher: Arc::new(dispatcher),
            voice_pending,
            voice_waiters: VoiceWaiters::new(),
            outbound: OutboundQueue::new(),
            discord: Arc::new(RwLock::new(None)),
            stop,
            ready: Arc::new(AtomicBool::new(false)),
        }
    }

    pub(crate) fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub(crate) async fn discord(&self) -> Option<Arc<Discord>> {
        self.discord.read().await.clone()
    }

    /// Request that the running session terminate. Idempotent.
    pub(crate) fn stop(&self) {
        let _ = self.stop.send(true);
    }

    fn is_stopping(&self) -> bool {
        *self.stop.borrow()
    }

    /// Whether a READY has been processed on the current connection.
    pub(crate) fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Send a presence update (`game=`).
    pub(crate) async fn set_game(&self, name: Option<String>) -> Result<()> {
        let activities = match name {
            Some(name) => vec![Activity {
                name,
                kind: ActivityType::Playing,
                url: None,
                created_at: chrono::Utc::now(),
                application_id: None,
                details: None,
                state: None,
                emoji: None,
                party: (),
                assets: (),
                secrets: (),
                instance: false,
                flags: ActivityFlags::empty(),
                buttons: None,
            }],
            None => Vec::new(),
        };
        let message = SentMessage::UpdatePresence {
            op: Eq,
            payload: UpdatePresencePayload {
                activities,
                status: OnlineStatus::Online,
                since: None,
                afk: false,
            },
        };
        self.outbound.send(serde_json::to_value(&message)?).await
    }

    /// Begin a voice handshake: tear down any existing session for this key,
    /// send op=4, and return a future resolving once VOICE_SERVER_UPDATE
    /// arrives.
    pub(crate) async fn voice_connect(
        &self,
        server_id: Option<ServerId>,
        channel_id: ChannelId,
        encrypted: bool,
    ) -> Result<VoiceHandshake> {
        self.voice_pending.cancel(server_id);
        self.voice_waiters.cancel(server_id);
        self.voice_pending
            .register(server_id, Some(channel_id), String::new(), encrypted);
        let waiter = self.voice_waiters.register(server_id);

        let message = SentMessage::UpdateVoiceState {
            op: Eq,
            payload: UpdateVoiceStatePayload {
                guild_id: server_id,
                channel_id: Some(channel_id),
                self_mute: false,
                self_deaf: false,
            },
        };
        self.outbound.send(serde_json::to_value(&message)?).await?;

        waiter
            .await
            .map_err(|_| Error::Closed(None, "voice handshake cancelled by a reconnect".into()))
    }

    /// Tear down an active (or pending) voice session.
    pub(crate) async fn voice_destroy(&self, server_id: Option<ServerId>) -> Result<()> {
        self.voice_pending.cancel(server_id);
        self.voice_waiters.cancel(server_id);

        let message = SentMessage::UpdateVoiceState {
            op: Eq,
            payload: UpdateVoiceStatePayload {
                guild_id: server_id,
                channel_id: None,
                self_mute: false,
                self_deaf: false,
            },
        };
        self.outbound.send(serde_json::to_value(&message)?).await
    }

    /// Run the session to completion: login, connect, process dispatches,
    /// reconnect with backoff, repeat until `stop()` is called or a fatal
    /// login error occurs. Returns the fatal error, if any.
    pub(crate) async fn run(self) -> Result<()> {
        let mut backoff = Backoff::new();
        let mut resume: Option<(String, u64)> = None;
        let mut stop_rx = self.stop.subscribe();

        loop {
            if self.is_stopping() {
                break;
            }

            if let Some((session_id, last_sequence)) = resume.take() {
                match self.try_resume(&session_id, last_sequence).await {
                    Ok(connected) => match self.run_frames(connected, &mut stop_rx).await {
                        RunOutcome::Stopped => break,
                        RunOutcome::Closed { resume: next } => {
                            resume = next;
                            continue;
                        }
                    },
                    Err(e) => {
                        debug!(error = ?e, "resume failed, falling back to a fresh session");
                    }
                }
            }

            let wait = backoff.next();
            debug!(seconds = wait.as_secs_f64(), "waiting before reconnecting");
            tokio::select! {
                _ = tokio::time::sleep(wait) => {}
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break;
                    }
                }
            }
            if self.is_stopping() {
                break;
            }

            let token = match self.login_routine().await {
                Ok(token) => token,
                Err(e) => {
                    error!(error = ?e, "login failed fatally, shutting down the session");
                    return Err(e);
                }
            };

            *self.discord.write().await = Some(Arc::new(Discord::from_bot_token(&self.credentials.bot_name, &token)?));

            match self.connect_and_identify(&token).await {
                Ok(connected) => {
                    backoff.reset();
                    match self.run_frames(connected, &mut stop_rx).await {
                        RunOutcome::Stopped => break,
                        RunOutcome::Closed { resume: next } => {
                            resume = next;
                        }
                    }
                }
                Err(e) => {
                    warn!(error = ?e, "failed to establish a gateway connection");
                }
            }
        }

        self.ready.store(false, Ordering::SeqCst);
        self.outbound.clear();
        Ok(())
    }

    async fn try_resume(&self, session_id: &str, last_sequence: u64) -> Result<ConnectedSocket> {
        let token = self.login_routine().await?;
        if self.discord().await.is_none() {
            *self.discord.write().await = Some(Arc::new(Discord::from_bot_token(&self.credentials.bot_name, &token)?));
        }
        self.connect_and_resume(&token, session_id, last_sequence).await
    }

    async fn login_routine(&self) -> Result<String> {
        let Credentials { identity, secret, .. } = &*self.credentials;

        if identity == TOKEN_SENTINEL {
            return Ok(secret.clone());
        }

        if let Some(token) = self.token_cache.lock().unwrap().lookup(identity, secret) {
            return Ok(token);
        }

        for attempt in 1..=LOGIN_RETRY_ATTEMPTS {
            match login(identity, secret).await {
                Ok(token) => {
                    self.token_cache.lock().unwrap().store(identity, secret, &token);
                    return Ok(token);
                }
                Err(e) if e.is_transient() => {
                    warn!(attempt, error = ?e, "transient login failure, retrying");
                    tokio::time::sleep(LOGIN_RETRY_DELAY).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::Transport)
    }

    fn identify_payload(&self, token: &str) -> IdentifyPayload {
        IdentifyPayload {
            version: GATEWAY_VERSION,
            token: token.to_string(),
            shard: None,
            intents: None,
            compress: None,
            large_threshold: Some(LARGE_THRESHOLD),
            fingerprint: IdentifyConnection {
                os: std::env::consts::OS.to_string(),
                browser: CLIENT_NAME.to_string(),
                device: CLIENT_NAME.to_string(),
                referrer: String::new(),
                referring_domain: String::new(),
            },
        }
    }

    async fn gateway_url(&self) -> Result<String> {
        let discord = self.discord.read().await;
        let discord = discord
            .as_ref()
            .ok_or(Error::Other("no REST client available to fetch the gateway URL"))?;
        let url = get_gateway_url(discord).await?;
        Ok(format!("{url}?v={GATEWAY_VERSION}"))
    }

    /// Open a socket, wait for Hello, send `op=2` IDENTIFY, and wait for
    /// READY (retrying the identify once on a resumable INVALID_SESSION).
    async fn connect_and_identify(&self, token: &str) -> Result<ConnectedSocket> {
        let url = self.gateway_url().await?;
        let (mut stream, hello) = self.open_socket(&url).await?;

        let identify = SentMessage::Identify {
            op: Eq,
            payload: self.identify_payload(token),
        };
        self.outbound.send(serde_json::to_value(&identify)?).await?;

        let mut retried = false;
        loop {
            match stream.next().await {
                Some(Ok(ReceivedMessage::Dispatch { dispatch, .. })) => match dispatch.event {
                    Event::Ready(ready) => {
                        let session_id = ready.session_id.clone();
                        let sequence = dispatch.sequence;
                        self.finish_ready(ready, hello.heartbeat_interval).await;
                        let (shutdown_heartbeat, sequence_cell) =
                            spawn_heartbeat(self.outbound.clone(), hello.heartbeat_interval, sequence);
                        return Ok(ConnectedSocket {
                            stream,
                            session_id,
                            last_sequence: sequence,
                            sequence_cell,
                            shutdown_heartbeat,
                        });
                    }
                    other => {
                        debug!(event = ?other, "unexpected dispatch before READY");
                    }
                },
                Some(Ok(ReceivedMessage::InvalidSession { resumable })) if !resumable && !retried => {
                    retried = true;
                    debug!("session invalidated during identify, retrying once");
                    let jitter = Duration::from_millis(1000 + rand::random::<u64>() % 4000);
                    tokio::time::sleep(jitter).await;
                    let identify = SentMessage::Identify {
                        op: Eq,
                        payload: self.identify_payload(token),
                    };
                    self.outbound.send(serde_json::to_value(&identify)?).await?;
                }
                Some(Ok(other)) => return Err(protocol_error_for(&other)),
                Some(Err(e)) => return Err(e),
                None => return Err(Error::Closed(None, "socket closed during identify".into())),
            }
        }
    }

    /// Open a socket and send `op=6` RESUME. Any outcome other than a
    /// `RESUMED` dispatch is treated as a failed resume by the caller.
    async fn connect_and_resume(
        &self,
        token: &str,
        session_id: &str,
        last_sequence: u64,
    ) -> Result<ConnectedSocket> {
        let url = self.gateway_url().await?;
        let (mut stream, hello) = self.open_socket(&url).await?;

        let resume = SentMessage::Resume {
            op: Eq,
            payload: ResumePayload::new(token.to_string(), session_id.to_string(), last_sequence),
        };
        self.outbound.send(serde_json::to_value(&resume)?).await?;

        loop {
            match stream.next().await {
                Some(Ok(ReceivedMessage::Dispatch { dispatch, .. })) => {
                    let sequence = dispatch.sequence;
                    match dispatch.event {
                        Event::Resumed { .. } => {
                            info!(%session_id, "resumed the previous gateway session");
                            let (shutdown_heartbeat, sequence_cell) =
                                spawn_heartbeat(self.outbound.clone(), hello.heartbeat_interval, sequence);
                            return Ok(ConnectedSocket {
                                stream,
                                session_id: session_id.to_string(),
                                last_sequence: sequence,
                                sequence_cell,
                                shutdown_heartbeat,
                            });
                        }
                        other => {
                            let outbound = self.dispatcher.dispatch(other);
                            self.handle_outbound(outbound).await;
                        }
                    }
                }
                Some(Ok(ReceivedMessage::InvalidSession { .. })) => {
                    return Err(Error::Protocol("gateway rejected the resume attempt"));
                }
                Some(Ok(other)) => return Err(protocol_error_for(&other)),
                Some(Err(e)) => return Err(e),
                None => return Err(Error::Closed(None, "socket closed during resume".into())),
            }
        }
    }

    async fn open_socket(&self, url: &str) -> Result<(GatewayEventStream, HelloPayload)> {
        let ws = WebSocket::connect(url).await?;
        let (read, write) = ws.split();
        let mut stream = GatewayEventStream::new(JsonStream::<Value>::new(read));
        let sink = SharedSink::new(JsonSink::new(write));
        self.outbound.set(sink);

        match stream.next().await {
            Some(Ok(ReceivedMessage::Hello { payload, .. })) => Ok((stream, payload)),
            Some(Ok(other)) => {
                self.outbound.clear();
                Err(protocol_error_for(&other))
            }
            Some(Err(e)) => {
                self.outbound.clear();
                Err(e)
            }
            None => {
                self.outbound.clear();
                Err(Error::Closed(None, "socket closed before Hello".into()))
            }
        }
    }

    async fn finish_ready(&self, ready: ReadyEvent, heartbeat_interval: u64) {
        self.dispatcher.state().set_heartbeat_interval(heartbeat_interval);
        let outbound = self.dispatcher.dispatch(Event::Ready(ready));
        self.ready.store(true, Ordering::SeqCst);
        self.handle_outbound(outbound).await;
    }

    /// Process frames until the socket closes, the gateway asks to
    /// reconnect, or `stop()` is called.
    async fn run_frames(&self, mut connected: ConnectedSocket, stop_rx: &mut watch::Receiver<bool>) -> RunOutcome {
        let result = loop {
            tokio::select! {
                _ = stop_rx.changed() => {
                    if *stop_rx.borrow() {
                        break RunOutcome::Stopped;
                    }
                }
                message = connected.stream.next() => {
                    match message {
                        Some(Ok(ReceivedMessage::Dispatch { dispatch, .. })) => {
                            connected.last_sequence = dispatch.sequence;
                            *connected.sequence_cell.lock().unwrap() = dispatch.sequence;
                            let outbound = self.dispatcher.dispatch(dispatch.event);
                            self.handle_outbound(outbound).await;
                        }
                        Some(Ok(ReceivedMessage::Reconnect { .. })) => {
                            debug!("gateway asked us to reconnect");
                            break RunOutcome::Closed {
                                resume: Some((connected.session_id.clone(), connected.last_sequence)),
                            };
                        }
                        Some(Ok(ReceivedMessage::InvalidSession { resumable })) => {
                            warn!(resumable, "session invalidated mid-connection");
                            break RunOutcome::Closed {
                                resume: resumable.then(|| (connected.session_id.clone(), connected.last_sequence)),
                            };
                        }
                        Some(Ok(ReceivedMessage::Hello { .. })) => {
                            debug!("duplicate Hello on an established connection, ignoring");
                        }
                        Some(Ok(ReceivedMessage::HeartbeatAck { .. })) => {}
                        Some(Err(e)) => {
                            warn!(error = ?e, "gateway connection error");
                            break RunOutcome::Closed {
                                resume: Some((connected.session_id.clone(), connected.last_sequence)),
                            };
                        }
                        None => {
                            debug!("gateway socket closed");
                            break RunOutcome::Closed {
                                resume: Some((connected.session_id.clone(), connected.last_sequence)),
                            };
                        }
                    }
                }
            }
        };

        self.ready.store(false, Ordering::SeqCst);
        let _ = connected.shutdown_heartbeat.send(());
        self.outbound.clear();
        self.voice_pending.cancel(None);
        result
    }

    async fn handle_outbound(&self, actions: Vec<Outbound>) {
        for action in actions {
            match action {
                Outbound::RequestGuildMembers(server_ids) => {
                    let nonce = server_ids.iter().map(|id| id.0.to_string()).collect::<Vec<_>>().join(",");
                    let message = SentMessage::RequestGuildMembers {
                        op: Eq,
                        payload: RequestGuildMembersPayload {
                            server_ids,
                            username_query: Some(String::new()),
                            limit: 0,
                            presences: false,
                            user_ids: None,
                            nonce,
                        },
                    };
                    match serde_json::to_value(&message) {
                        Ok(value) => {
                            if let Err(e) = self.outbound.send(value).await {
                                warn!(error = ?e, "failed to request guild members");
                            }
                        }
                        Err(e) => warn!(error = ?e, "failed to encode a guild members request"),
                    }
                }
                Outbound::VoiceServerReady(handshake) => {
                    self.voice_waiters.resolve(handshake);
                }
            }
        }
    }
}

fn protocol_error_for(message: &ReceivedMessage) -> Error {
    debug!(message = ?message, "unexpected gateway frame");
    Error::Protocol("unexpected gateway frame in this state")
}

fn spawn_heartbeat(
    outbound: OutboundQueue,
    interval_millis: u64,
    initial_sequence: u64,
) -> (oneshot::Sender<()>, Arc<Mutex<u64>>) {
    let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
    let sequence = Arc::new(Mutex::new(initial_sequence));
    let sequence_for_task = sequence.clone();

    tokio::spawn(async move {
        let sequence = sequence_for_task;
        let mut ticker = tokio::time::interval(Duration::from_millis(interval_millis));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => break,
                _ = ticker.tick() => {
                    let last_sequence = Some(*sequence.lock().unwrap());
                    let message = SentMessage::Heartbeat {
                        op: Eq,
                        last_sequence,
                    };
                    let value = match serde_json::to_value(&message) {
                        Ok(value) => value,
                        Err(e) => {
                            warn!(error = ?e, "failed to encode a heartbeat frame");
                            continue;
                        }
                    };
                    if let Err(e) = outbound.send(value).await {
                        warn!(error = ?e, "failed to send a heartbeat, ending heartbeat task");
                        break;
                    }
                }
            }
        }
    });

    (shutdown_tx, sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backoff_increases_then_clamps_into_jittered_window() {
        let mut backoff = Backoff::new();
        let mut prev = backoff.next().as_secs_f64();
        let mut saw_clamp = false;

        for _ in 0..10 {
            let value = backoff.next().as_secs_f64();
            if saw_clamp {
                assert!((115.0..=125.0).contains(&value));
            } else if value >= 115.0 {
                saw_clamp = true;
                assert!((115.0..=125.0).contains(&value));
            } else {
                assert!(value > prev);
            }
            prev = value;
        }

        assert!(saw_clamp, "backoff never reached the clamped window");
    }

    #[test]
    fn backoff_clamps_on_the_very_first_step() {
        // 1.0 * 1.5 = 1.5 > 1.0, so the second call already lands in [115, 125].
        let mut backoff = Backoff::new();
        let first = backoff.next().as_secs_f64();
        assert_eq!(first, 1.0);
        let second = backoff.next().as_secs_f64();
        assert!((115.0..=125.0).contains(&second));
    }

    #[test]
    fn reset_returns_to_the_initial_value() {
        let mut backoff = Backoff::new();
        backoff.next();
        backoff.next();
        backoff.reset();
        assert_eq!(backoff.next().as_secs_f64(), 1.0);
    }
}
