//! Playtime accounting
//!
//! Each connected player has a session with a connect time and a last-flush
//! time. A periodic flush hands out the time accumulated since the last
//! flush; the disconnect hands out whatever is left. Because each delta is
//! measured from the previous flush, summing every delta gives the session
//! length exactly once.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cs2prac_sdk::SteamId;

/// Minimum time since the last flush before a session is flushed again
pub const DEFAULT_FLUSH_GUARD: Duration = Duration::from_secs(55);

/// Live session of a connected player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub connect_time: Instant,
    /// Always `>= connect_time`
    pub last_flush: Instant,
}

/// Seconds to add to a player's persisted total
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaytimeDelta {
    pub player: SteamId,
    pub seconds: u64,
}

/// Result of closing a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionEnd {
    /// Whole session length
    pub session_seconds: u64,
    /// Time not yet handed out by a periodic flush
    pub unflushed_seconds: u64,
}

/// Tracks connected players and their unflushed time
pub struct PlaytimeTracker {
    sessions: HashMap<SteamId, Session>,
    flush_guard: Duration,
}

impl Default for PlaytimeTracker {
    fn default() -> Self {
        Self::new(DEFAULT_FLUSH_GUARD)
    }
}

impl PlaytimeTracker {
    pub fn new(flush_guard: Duration) -> Self {
        Self {
            sessions: HashMap::new(),
            flush_guard,
        }
    }

    /// Start a session, replacing any session the player already had
    pub fn record_connect(&mut self, player: SteamId, now: Instant) {
        if self.sessions.contains_key(&player) {
            tracing::debug!(%player, "Reconnect without disconnect, restarting session");
        }
        self.sessions.insert(
            player,
            Session {
                connect_time: now,
                last_flush: now,
            },
        );
        tracing::info!(%player, "Playtime session started");
    }

    /// End a session and return its length in seconds
    pub fn record_disconnect(&mut self, player: SteamId, now: Instant) -> Option<u64> {
        self.record_disconnect_with_remainder(player, now)
            .map(|end| end.session_seconds)
    }

    /// End a session, also returning the time no flush has covered yet
    pub fn record_disconnect_with_remainder(
        &mut self,
        player: SteamId,
        now: Instant,
    ) -> Option<SessionEnd> {
        let session = self.sessions.remove(&player)?;
        let end = SessionEnd {
            session_seconds: now.saturating_duration_since(session.connect_time).as_secs(),
            unflushed_seconds: now.saturating_duration_since(session.last_flush).as_secs(),
        };
        tracing::info!(
            %player,
            session_seconds = end.session_seconds,
            "Playtime session ended"
        );
        Some(end)
    }

    /// Collect the time accumulated by every session due for a flush
    ///
    /// A session is due once `now - last_flush` reaches the guard. Only
    /// whole seconds are handed out; the fraction stays in the session and
    /// is counted by a later flush or the disconnect.
    pub fn periodic_flush(&mut self, now: Instant) -> Vec<PlaytimeDelta> {
        let mut deltas = Vec::new();

        for (player, session) in self.sessions.iter_mut() {
            let elapsed = now.saturating_duration_since(session.last_flush);
            if elapsed < self.flush_guard {
                continue;
            }

            let seconds = elapsed.as_secs();
            session.last_flush += Duration::from_secs(seconds);
            deltas.push(PlaytimeDelta {
                player: *player,
                seconds,
            });
        }

        if !deltas.is_empty() {
            tracing::debug!(count = deltas.len(), "Flushed playtime");
        }
        deltas
    }

    /// Seconds since the player connected, 0 when not connected
    pub fn session_seconds(&self, player: SteamId, now: Instant) -> u64 {
        self.sessions
            .get(&player)
            .map(|s| now.saturating_duration_since(s.connect_time).as_secs())
            .unwrap_or(0)
    }

    pub fn is_connected(&self, player: SteamId) -> bool {
        self.sessions.contains_key(&player)
    }

    pub fn connect_time(&self, player: SteamId) -> Option<Instant> {
        self.sessions.get(&player).map(|s| s.connect_time)
    }

    pub fn last_flush_time(&self, player: SteamId) -> Option<Instant> {
        self.sessions.get(&player).map(|s| s.last_flush)
    }

    /// Drop a session without accounting for it
    pub fn remove_player(&mut self, player: SteamId) {
        self.sessions.remove(&player);
    }

    /// Players with an open session
    pub fn connected(&self) -> impl Iterator<Item = SteamId> + '_ {
        self.sessions.keys().copied()
    }
}

/// Split seconds into whole hours and remaining minutes
pub fn format_duration(seconds: u64) -> (u64, u64) {
    (seconds / 3600, (seconds % 3600) / 60)
}
