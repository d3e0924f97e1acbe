//! The `ReplicationEngine`: the single owned struct holding `View`,
//! `VectorClock`, and `Store` behind one mutex, per `SPEC_FULL.md` §9's
//! explicit direction to replace module-level globals with an owned
//! struct that HTTP handlers receive a reference to.
//!
//! Every method that mutates state acquires the mutex for exactly the
//! critical section — predicate evaluation, VC increment, mutation, and
//! VC snapshot capture — and releases it before issuing any broadcast
//! I/O, so the guard is never held across an `.await` point.

use parking_lot::Mutex;

use crate::clock::{ReplicaId, VectorClock};
use crate::dto::StateSnapshot;
use crate::error::ApiError;
use crate::peer_client::{BroadcastOutcome, PeerClient};
use crate::store::{validate_key, DeleteOutcome, PutOutcome, Store};
use crate::view::View;
use serde_json::Value as JsonValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPutOutcome {
    Added,
    AlreadyPresent,
}

struct ReplicaState {
    view: View,
    clock: VectorClock,
    store: Store,
}

pub struct ReplicationEngine {
    self_addr: ReplicaId,
    state: Mutex<ReplicaState>,
    peer_client: PeerClient,
}

impl ReplicationEngine {
    pub fn new(self_addr: ReplicaId, peer_client: PeerClient) -> Self {
        Self {
            self_addr,
            state: Mutex::new(ReplicaState {
                view: View::new(),
                clock: VectorClock::new(),
                store: Store::new(),
            }),
            peer_client,
        }
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn peer_client(&self) -> &PeerClient {
        &self.peer_client
    }

    /// Seeds the view and vector clock with the given members, used once
    /// by bootstrap before any request is served.
    pub fn seed_view(&self, members: impl IntoIterator<Item = ReplicaId>) {
        let mut state = self.state.lock();
        for member in members {
            state.view.add(member.clone());
            state.clock.ensure_tracked(&member);
        }
    }

    /// Overwrites the local clock and store with a donor's snapshot,
    /// used once by bootstrap's state transfer. Unconditional: a joining
    /// replica trusts the first responder since it has no prior history.
    pub fn apply_state_transfer(&self, snapshot: StateSnapshot) {
        let mut state = self.state.lock();
        state.clock = snapshot.vc;
        state.store.replace_all(snapshot.kvs);
    }

    pub fn snapshot(&self) -> StateSnapshot {
        let state = self.state.lock();
        StateSnapshot {
            vc: state.clock.clone(),
            kvs: state.store.snapshot(),
        }
    }

    pub fn view_list(&self) -> Vec<ReplicaId> {
        self.state.lock().view.members()
    }

    // ---- client-facing KVS operations ----

    pub fn client_get(
        &self,
        key: &str,
        client_vc: Option<VectorClock>,
    ) -> Result<(JsonValue, VectorClock), ApiError> {
        let state = self.state.lock();
        if let Some(cvc) = &client_vc {
            if !state.clock.is_causally_consistent_with(cvc) {
                log::debug!(
                    "cc failed for GET {key}: client {cvc:?} not a prefix of replica {:?}",
                    state.clock
                );
                return Err(ApiError::CausalPending);
            }
        }
        match state.store.get(key) {
            Some(value) => Ok((value.clone(), state.clock.clone())),
            None => Err(ApiError::KeyNotFound),
        }
    }

    pub async fn client_put(
        &self,
        key: String,
        value: Option<JsonValue>,
        client_vc: Option<VectorClock>,
    ) -> Result<(PutOutcome, VectorClock), ApiError> {
        let value = value.ok_or(ApiError::MissingValue)?;
        if !validate_key(&key) {
            return Err(ApiError::KeyTooLong(crate::store::MAX_KEY_LEN));
        }
        let (outcome, snapshot, peers) = {
            let mut state = self.state.lock();
            if let Some(cvc) = &client_vc {
                if !state.clock.is_causally_consistent_with(cvc) {
                    log::debug!(
                        "cc failed for PUT {key}: client {cvc:?} not a prefix of replica {:?}",
                        state.clock
                    );
                    return Err(ApiError::CausalPending);
                }
            }
            state.clock.increment(&self.self_addr);
            let outcome = state.store.put(key.clone(), value.clone());
            let snapshot = state.clock.clone();
            let peers = state.view.peers_of(&self.self_addr);
            (outcome, snapshot, peers)
        };
        log::info!("local {outcome:?} of {key} at {}, vc now {snapshot:?}", self.self_addr);
        self.broadcast_put(peers, &key, &value, &snapshot).await;
        Ok((outcome, snapshot))
    }

    pub async fn client_delete(
        &self,
        key: String,
        client_vc: Option<VectorClock>,
    ) -> Result<VectorClock, ApiError> {
        if !validate_key(&key) {
            return Err(ApiError::KeyTooLong(crate::store::MAX_KEY_LEN));
        }
        let (snapshot, peers) = {
            let mut state = self.state.lock();
            if let Some(cvc) = &client_vc {
                if !state.clock.is_causally_consistent_with(cvc) {
                    log::debug!(
                        "cc failed for DELETE {key}: client {cvc:?} not a prefix of replica {:?}",
                        state.clock
                    );
                    return Err(ApiError::CausalPending);
                }
            }
            if state.store.delete(&key) == DeleteOutcome::NotFound {
                return Err(ApiError::KeyNotFound);
            }
            state.clock.increment(&self.self_addr);
            let snapshot = state.clock.clone();
            let peers = state.view.peers_of(&self.self_addr);
            (snapshot, peers)
        };
        log::info!("local delete of {key} at {}, vc now {snapshot:?}", self.self_addr);
        self.broadcast_delete(peers, &key, &snapshot).await;
        Ok(snapshot)
    }

    // ---- peer-originated KVS delivery ----

    pub fn deliver_put(
        &self,
        key: String,
        origin: &str,
        value: Option<JsonValue>,
        msg_vc: VectorClock,
    ) -> Result<PutOutcome, ApiError> {
        let value = value.ok_or(ApiError::MissingValue)?;
        let mut state = self.state.lock();
        if !state.clock.admits_delivery_from(origin, &msg_vc) {
            log::debug!(
                "cd failed for PUT {key} from {origin}: message {msg_vc:?} not yet deliverable against replica {:?}",
                state.clock
            );
            return Err(ApiError::CausalPending);
        }
        state.clock.increment(origin);
        let outcome = state.store.put(key.clone(), value);
        log::info!("delivered {outcome:?} of {key} from {origin}, vc now {:?}", state.clock);
        Ok(outcome)
    }

    pub fn deliver_delete(
        &self,
        key: String,
        origin: &str,
        msg_vc: VectorClock,
    ) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        if !state.clock.admits_delivery_from(origin, &msg_vc) {
            log::debug!(
                "cd failed for DELETE {key} from {origin}: message {msg_vc:?} not yet deliverable against replica {:?}",
                state.clock
            );
            return Err(ApiError::CausalPending);
        }
        // The event is delivered (and counted) regardless of whether the
        // key still exists locally: VC tracks delivered events, not
        // successful mutations.
        state.clock.increment(origin);
        let outcome = state.store.delete(&key);
        log::info!("delivered delete of {key} from {origin}, vc now {:?}", state.clock);
        match outcome {
            DeleteOutcome::Deleted => Ok(()),
            DeleteOutcome::NotFound => Err(ApiError::KeyNotFound),
        }
    }

    // ---- view management ----

    pub async fn view_put(&self, replica: ReplicaId) -> ViewPutOutcome {
        let (peers_to_notify, vc) = {
            let mut state = self.state.lock();
            if state.view.contains(&replica) {
                return ViewPutOutcome::AlreadyPresent;
            }
            state.view.add(replica.clone());
            state.clock.ensure_tracked(&replica);
            let peers = state
                .view
                .peers_of(&self.self_addr)
                .into_iter()
                .filter(|p| p != &replica)
                .collect::<Vec<_>>();
            (peers, state.clock.clone())
        };
        log::info!("view add {replica} at {}, vc now {vc:?}", self.self_addr);
        for peer in &peers_to_notify {
            self.peer_client.notify_viewed_add(peer, &replica).await;
        }
        ViewPutOutcome::Added
    }

    pub async fn view_delete(&self, replica: &str) -> Result<(), ApiError> {
        let (peers, vc) = {
            let mut state = self.state.lock();
            if !state.view.remove(replica) {
                return Err(ApiError::ReplicaNotFound);
            }
            (state.view.peers_of(&self.self_addr), state.clock.clone())
        };
        log::info!("view remove {replica} at {}, vc now {vc:?}", self.self_addr);
        for peer in &peers {
            self.peer_client.notify_viewed_delete(peer, replica).await;
        }
        Ok(())
    }

    /// Peer-originated view add: mutates locally, never re-broadcasts
    /// (prevents notification storms).
    pub fn viewed_put(&self, replica: ReplicaId) -> ViewPutOutcome {
        let mut state = self.state.lock();
        if state.view.contains(&replica) {
            return ViewPutOutcome::AlreadyPresent;
        }
        state.view.add(replica.clone());
        state.clock.ensure_tracked(&replica);
        log::info!("view add {replica} at {} (peer-originated), vc now {:?}", self.self_addr, state.clock);
        ViewPutOutcome::Added
    }

    /// Peer-originated view removal: mutates locally, never re-broadcasts.
    pub fn viewed_delete(&self, replica: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        if state.view.remove(replica) {
            log::info!("view remove {replica} at {} (peer-originated), vc now {:?}", self.self_addr, state.clock);
            Ok(())
        } else {
            Err(ApiError::ReplicaNotFound)
        }
    }

    // ---- broadcast fan-out ----

    async fn broadcast_put(&self, peers: Vec<ReplicaId>, key: &str, value: &JsonValue, vc: &VectorClock) {
        let futures = peers.iter().map(|peer| {
            let peer = peer.clone();
            async move {
                let outcome = self
                    .peer_client
                    .replicate_put(&peer, key, &self.self_addr, value, vc)
                    .await;
                (peer, outcome)
            }
        });
        let results = futures::future::join_all(futures).await;
        self.evict_unreachable(results).await;
    }

    async fn broadcast_delete(&self, peers: Vec<ReplicaId>, key: &str, vc: &VectorClock) {
        let futures = peers.iter().map(|peer| {
            let peer = peer.clone();
            async move {
                let outcome = self
                    .peer_client
                    .replicate_delete(&peer, key, &self.self_addr, vc)
                    .await;
                (peer, outcome)
            }
        });
        let results = futures::future::join_all(futures).await;
        self.evict_unreachable(results).await;
    }

    /// Removes every peer that exhausted its retry budget from the view,
    /// then best-effort notifies the remaining peers of each eviction.
    async fn evict_unreachable(&self, results: Vec<(ReplicaId, BroadcastOutcome)>) {
        let mut evicted = Vec::new();
        {
            let mut state = self.state.lock();
            for (peer, outcome) in &results {
                if *outcome == BroadcastOutcome::Unreachable && state.view.remove(peer) {
                    evicted.push(peer.clone());
                }
            }
        }
        if evicted.is_empty() {
            return;
        }
        let remaining = self.state.lock().view.peers_of(&self.self_addr);
        for removed in &evicted {
            log::warn!("replica {removed} evicted after exhausting broadcast retry budget");
            for peer in &remaining {
                self.peer_client.notify_viewed_delete(peer, removed).await;
            }
        }
    }
}
