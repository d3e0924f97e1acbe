//! Outbound HTTP to peer replicas: bounded-retry broadcast of KVS
//! mutations, best-effort single-attempt view notifications, and the
//! bootstrap state-transfer fetch.
//!
//! Generalizes the resend-until-acked loop in
//! `src/actor/ordered_reliable_link.rs` from UDP resend to HTTP
//! request/timeout/backoff: each attempt gets its own 1-second timeout,
//! and a 503 (not-yet-deliverable) or transport failure triggers a
//! 1-second backoff before the next attempt, up to 3 attempts total.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;

use crate::clock::VectorClock;
use crate::dto::{CausalRequest, PutRequest, StateSnapshot, ViewRequest};

const MAX_ATTEMPTS: u32 = 3;
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(1);
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Outcome of a bounded-retry broadcast to one peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BroadcastOutcome {
    Delivered,
    Unreachable,
}

#[derive(Clone)]
pub struct PeerClient {
    http: Client,
}

impl Default for PeerClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PeerClient {
    pub fn new() -> Self {
        Self {
            http: Client::builder()
                .timeout(ATTEMPT_TIMEOUT)
                .build()
                .expect("reqwest client configuration is static and always valid"),
        }
    }

    /// Replicates a `PUT` to `peer`'s `/replica/kvs/{key}/{origin}`.
    pub async fn replicate_put(
        &self,
        peer: &str,
        key: &str,
        origin: &str,
        value: &JsonValue,
        vc: &VectorClock,
    ) -> BroadcastOutcome {
        let url = format!("http://{peer}/replica/kvs/{key}/{origin}");
        let body = PutRequest {
            value: Some(value.clone()),
            causal_metadata: Some(vc.clone()),
        };
        self.broadcast_with_retry(peer, || self.http.put(&url).json(&body)).await
    }

    /// Replicates a `DELETE` to `peer`'s `/replica/kvs/{key}/{origin}`.
    /// Carries only `causal-metadata`: the origin's delete broadcast has
    /// no `value` field (§9 open question, resolved as "omit it").
    ///
    /// A 404 here means the peer already delivered this exact event and
    /// found the key gone (e.g. a prior delivery of the same message, or
    /// the key was never replicated to it) — the delivery itself still
    /// succeeded causally, so 404 is accepted alongside 200/201 rather
    /// than triggering a retry (§9 open question: "200 and 404 as
    /// success").
    pub async fn replicate_delete(
        &self,
        peer: &str,
        key: &str,
        origin: &str,
        vc: &VectorClock,
    ) -> BroadcastOutcome {
        let url = format!("http://{peer}/replica/kvs/{key}/{origin}");
        let body = CausalRequest {
            causal_metadata: Some(vc.clone()),
        };
        self.broadcast_with_retry_accepting(peer, &[StatusCode::NOT_FOUND], || {
            self.http.delete(&url).json(&body)
        })
        .await
    }

    async fn broadcast_with_retry<F>(&self, peer: &str, build_request: F) -> BroadcastOutcome
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        self.broadcast_with_retry_accepting(peer, &[], build_request).await
    }

    /// Like `broadcast_with_retry`, but also treats any status in
    /// `extra_success` as a delivered outcome alongside 2xx.
    async fn broadcast_with_retry_accepting<F>(
        &self,
        peer: &str,
        extra_success: &[StatusCode],
        build_request: F,
    ) -> BroadcastOutcome
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        for attempt in 1..=MAX_ATTEMPTS {
            match build_request().send().await {
                Ok(resp) if resp.status().is_success() || extra_success.contains(&resp.status()) => {
                    log::debug!("broadcast to {peer} delivered on attempt {attempt}");
                    return BroadcastOutcome::Delivered;
                }
                Ok(resp) if resp.status() == StatusCode::SERVICE_UNAVAILABLE => {
                    log::debug!(
                        "broadcast to {peer} not yet deliverable (attempt {attempt}/{MAX_ATTEMPTS})"
                    );
                }
                Ok(resp) => {
                    log::warn!(
                        "broadcast to {peer} got unexpected status {} (attempt {attempt}/{MAX_ATTEMPTS})",
                        resp.status()
                    );
                }
                Err(err) => {
                    log::warn!(
                        "broadcast to {peer} failed: {err} (attempt {attempt}/{MAX_ATTEMPTS})"
                    );
                }
            }
            if attempt < MAX_ATTEMPTS {
                actix_rt::time::sleep(RETRY_BACKOFF).await;
            }
        }
        log::warn!("peer {peer} unreachable after {MAX_ATTEMPTS} attempts; marking for eviction");
        BroadcastOutcome::Unreachable
    }

    /// Single best-effort attempt notifying `peer` of a view addition.
    /// No retry: storms are prevented by `/viewed` handlers never
    /// re-broadcasting, not by resending this notification.
    pub async fn notify_viewed_add(&self, peer: &str, added: &str) {
        let url = format!("http://{peer}/viewed");
        let body = ViewRequest { socket_address: added.to_owned() };
        if let Err(err) = self.http.put(&url).json(&body).send().await {
            log::warn!("view-add notification to {peer} failed: {err}");
        }
    }

    /// Single best-effort attempt notifying `peer` of a view removal.
    pub async fn notify_viewed_delete(&self, peer: &str, removed: &str) {
        let url = format!("http://{peer}/viewed");
        let body = ViewRequest { socket_address: removed.to_owned() };
        if let Err(err) = self.http.delete(&url).json(&body).send().await {
            log::warn!("view-delete notification to {peer} failed: {err}");
        }
    }

    /// Single best-effort attempt announcing `self_addr` to `peer` during
    /// bootstrap.
    pub async fn announce_self(&self, peer: &str, self_addr: &str) {
        self.notify_viewed_add(peer, self_addr).await;
    }

    /// Fetches `/vckvs` from `peer`. Returns `None` on any failure
    /// (transport error or non-2xx); bootstrap treats this as "try the
    /// next peer."
    pub async fn fetch_state(&self, peer: &str) -> Option<StateSnapshot> {
        let url = format!("http://{peer}/vckvs");
        let resp = self.http.get(&url).send().await.ok()?;
        if !resp.status().is_success() {
            return None;
        }
        resp.json::<StateSnapshot>().await.ok()
    }
}
