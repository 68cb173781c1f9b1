//! Pending teleport and watch requests
//!
//! A player can hold at most one pending request. Sending a new one to the
//! same recipient replaces the old. Requests expire after a TTL (5 minutes
//! by default) and are swept periodically.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use cs2prac_sdk::SteamId;

/// Default request lifetime
pub const DEFAULT_REQUEST_TTL: Duration = Duration::from_secs(5 * 60);

/// What accepting a request does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
    /// Move the recipient to the requester
    TeleportHere,
    /// Move the requester to the recipient
    TeleportTo,
    /// Recipient spectates the requester
    Watch,
}

/// A request waiting for the recipient to accept
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRequest {
    pub requester: SteamId,
    /// The recipient, also the registry key
    pub target: SteamId,
    pub kind: RequestKind,
    pub created_at: Instant,
}

impl PendingRequest {
    /// Strictly older than `ttl`
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) > ttl
    }
}

/// Why an accept did not go through
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("no pending request")]
    NoPending,
    #[error("request expired")]
    Expired,
    #[error("request is no longer valid")]
    Stale,
}

/// A consumed request and whether the host carried it out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    pub request: PendingRequest,
    pub succeeded: bool,
}

/// Pending requests keyed by recipient
pub struct RequestRegistry {
    pending: HashMap<SteamId, PendingRequest>,
    ttl: Duration,
}

impl Default for RequestRegistry {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TTL)
    }
}

impl RequestRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            pending: HashMap::new(),
            ttl,
        }
    }

    /// Queue a request for `target`, replacing any request it already has
    pub fn send(&mut self, requester: SteamId, target: SteamId, kind: RequestKind, now: Instant) {
        let request = PendingRequest {
            requester,
            target,
            kind,
            created_at: now,
        };
        if let Some(old) = self.pending.insert(target, request) {
            tracing::debug!(%target, replaced = %old.requester, "Replaced pending request");
        }
        tracing::debug!(%requester, %target, ?kind, "Request sent");
    }

    /// Accept the recipient's pending request
    ///
    /// The entry is removed on every outcome except `NoPending`. `is_live`
    /// reports whether a player is still connected. `effect` performs the
    /// request on the host and reports success.
    pub fn accept<L, E>(
        &mut self,
        recipient: SteamId,
        now: Instant,
        is_live: L,
        effect: E,
    ) -> Result<Accepted, RequestError>
    where
        L: Fn(SteamId) -> bool,
        E: FnOnce(&PendingRequest) -> bool,
    {
        let request = self
            .pending
            .remove(&recipient)
            .ok_or(RequestError::NoPending)?;

        if request.is_expired(now, self.ttl) {
            tracing::debug!(%recipient, "Request expired");
            return Err(RequestError::Expired);
        }

        if !is_live(request.requester) || !is_live(request.target) {
            tracing::debug!(%recipient, requester = %request.requester, "Request stale");
            return Err(RequestError::Stale);
        }

        let succeeded = effect(&request);
        tracing::debug!(%recipient, succeeded, ?request.kind, "Request accepted");
        Ok(Accepted { request, succeeded })
    }

    /// Remove every expired request, returning how many were removed
    pub fn sweep_expired(&mut self, now: Instant) -> usize {
        let ttl = self.ttl;
        let before = self.pending.len();
        self.pending.retain(|_, request| !request.is_expired(now, ttl));
        let removed = before - self.pending.len();
        if removed > 0 {
            tracing::debug!(removed, "Swept expired requests");
        }
        removed
    }

    /// Remove every request the player sent or received
    pub fn purge_player(&mut self, player: SteamId) -> usize {
        let before = self.pending.len();
        self.pending
            .retain(|target, request| *target != player && request.requester != player);
        before - self.pending.len()
    }

    pub fn pending_for(&self, recipient: SteamId) -> Option<&PendingRequest> {
        self.pending.get(&recipient)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: SteamId = SteamId::new(76561198000000001);
    const BOB: SteamId = SteamId::new(76561198000000002);
    const CAROL: SteamId = SteamId::new(76561198000000003);

    fn live(_: SteamId) -> bool {
        true
    }

    #[test]
    fn test_expired_on_accept() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportHere, t0);

        let result = registry.accept(BOB, t0 + Duration::from_secs(301), live, |_| true);
        assert_eq!(result, Err(RequestError::Expired));
        assert!(registry.pending_for(BOB).is_none());
    }

    #[test]
    fn test_exactly_ttl_not_expired() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportTo, t0);

        let accepted = registry
            .accept(BOB, t0 + Duration::from_secs(300), live, |_| true)
            .unwrap();
        assert_eq!(accepted.request.requester, ALICE);
        assert!(accepted.succeeded);
    }

    #[test]
    fn test_no_pending() {
        let mut registry = RequestRegistry::default();
        assert_eq!(
            registry.accept(BOB, Instant::now(), live, |_| true),
            Err(RequestError::NoPending)
        );
    }

    #[test]
    fn test_stale_when_requester_gone() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::Watch, t0);

        let result = registry.accept(BOB, t0, |id| id != ALICE, |_| true);
        assert_eq!(result, Err(RequestError::Stale));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_failed_effect_still_consumes() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportHere, t0);

        let accepted = registry.accept(BOB, t0, live, |_| false).unwrap();
        assert!(!accepted.succeeded);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportHere, t0);
        registry.send(CAROL, BOB, RequestKind::TeleportTo, t0);

        assert_eq!(registry.len(), 1);
        let pending = registry.pending_for(BOB).unwrap();
        assert_eq!(pending.requester, CAROL);
        assert_eq!(pending.kind, RequestKind::TeleportTo);
    }

    #[test]
    fn test_sweep_expired() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportHere, t0);
        registry.send(ALICE, CAROL, RequestKind::TeleportHere, t0 + Duration::from_secs(120));

        assert_eq!(registry.sweep_expired(t0 + Duration::from_secs(360)), 1);
        assert!(registry.pending_for(BOB).is_none());
        assert!(registry.pending_for(CAROL).is_some());
    }

    #[test]
    fn test_purge_player_both_roles() {
        let t0 = Instant::now();
        let mut registry = RequestRegistry::default();
        registry.send(ALICE, BOB, RequestKind::TeleportHere, t0);
        registry.send(CAROL, ALICE, RequestKind::Watch, t0);
        registry.send(BOB, CAROL, RequestKind::TeleportTo, t0);

        assert_eq!(registry.purge_player(ALICE), 2);
        assert_eq!(registry.len(), 1);
        assert!(registry.pending_for(CAROL).is_some());
    }
}
