//! Vector clocks and the two predicates that gate every state transition:
//! causal consistency for client requests, and causal delivery for
//! peer-originated broadcasts.
//!
//! A vector clock here is a mapping from replica identity to the count of
//! write/delete events originated by that replica which have been
//! delivered locally. A missing entry is distinct from an entry of zero:
//! zero means "I have seen zero events from R, and R is in my view";
//! missing means "R is unknown to me" (relevant only to `cc`, which treats
//! an absent *client* entry as automatically satisfied, never to `cd`,
//! which requires the origin to already be a known view member).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A replica identity: an opaque, stable `host:port` string.
pub type ReplicaId = String;

/// A vector clock: one counter per replica this node has delivered
/// events from (including itself).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VectorClock(HashMap<ReplicaId, u64>);

impl VectorClock {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, replica: &str) -> Option<u64> {
        self.0.get(replica).copied()
    }

    /// Inserts `replica` with counter zero if it is not already present.
    /// Used when a replica joins the view. A no-op if already tracked, so
    /// that a rejoining replica does not lose its delivered-event count.
    pub fn ensure_tracked(&mut self, replica: &str) {
        self.0.entry(replica.to_owned()).or_insert(0);
    }

    /// Increments `replica`'s counter by one and returns the new value.
    pub fn increment(&mut self, replica: &str) -> u64 {
        let entry = self.0.entry(replica.to_owned()).or_insert(0);
        *entry += 1;
        *entry
    }

    pub fn contains(&self, replica: &str) -> bool {
        self.0.contains_key(replica)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u64)> {
        self.0.iter()
    }

    /// Causal-consistency predicate `cc(client, self)`.
    ///
    /// Holds iff every replica named in `client` is also known to `self`
    /// with a count at least as large as the client's. An absent
    /// `client` vector clock (the client presented no causal metadata) is
    /// trivially satisfied — callers should short-circuit on `None`
    /// before calling this, but the check is safe to call with an empty
    /// clock too.
    pub fn is_causally_consistent_with(&self, client: &VectorClock) -> bool {
        client
            .0
            .iter()
            .all(|(replica, &count)| matches!(self.0.get(replica), Some(&local) if count <= local))
    }

    /// Causal-delivery predicate `cd(origin, msg, self)`.
    ///
    /// Holds iff `origin` is a replica `self` already tracks, `msg`'s
    /// entry for `origin` is exactly one more than `self`'s (the next
    /// message `self` expects from `origin`, enforcing per-origin order),
    /// and every other entry in `msg` is already covered by `self`
    /// (all causal dependencies have been observed).
    pub fn admits_delivery_from(&self, origin: &str, msg: &VectorClock) -> bool {
        let Some(&local_origin) = self.0.get(origin) else {
            return false;
        };
        let Some(&msg_origin) = msg.0.get(origin) else {
            return false;
        };
        if msg_origin != local_origin + 1 {
            return false;
        }
        msg.0
            .iter()
            .filter(|(replica, _)| replica.as_str() != origin)
            .all(|(replica, &count)| matches!(self.0.get(replica), Some(&local) if count <= local))
    }

    /// True when `self` and `other` agree on every entry present in
    /// either. Used only by tests to assert convergence after
    /// quiescence; never consulted on a request path.
    pub fn converges_with(&self, other: &VectorClock) -> bool {
        let keys = self.0.keys().chain(other.0.keys());
        keys.into_iter()
            .all(|k| self.0.get(k).copied().unwrap_or(0) == other.0.get(k).copied().unwrap_or(0))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn vc(pairs: &[(&str, u64)]) -> VectorClock {
        let mut v = VectorClock::new();
        for (r, c) in pairs {
            v.0.insert((*r).to_owned(), *c);
        }
        v
    }

    #[test]
    fn cc_passes_when_client_is_prefix_of_replica_history() {
        let replica = vc(&[("A", 2), ("B", 1)]);
        let client = vc(&[("A", 1)]);
        assert!(replica.is_causally_consistent_with(&client));
    }

    #[test]
    fn cc_fails_when_client_has_seen_more_than_replica() {
        let replica = vc(&[("A", 1)]);
        let client = vc(&[("A", 2)]);
        assert!(!replica.is_causally_consistent_with(&client));
    }

    #[test]
    fn cc_fails_when_client_references_unknown_replica() {
        let replica = vc(&[("A", 1)]);
        let client = vc(&[("C", 0)]);
        assert!(!replica.is_causally_consistent_with(&client));
    }

    #[test]
    fn cc_trivially_holds_for_empty_client_clock() {
        let replica = vc(&[("A", 1)]);
        assert!(replica.is_causally_consistent_with(&VectorClock::new()));
    }

    #[test]
    fn cd_holds_for_next_expected_message_with_satisfied_dependencies() {
        let replica = vc(&[("A", 1), ("B", 0)]);
        let msg = vc(&[("A", 2), ("B", 0)]);
        assert!(replica.admits_delivery_from("A", &msg));
    }

    #[test]
    fn cd_rejects_gap_in_origin_sequence() {
        let replica = vc(&[("A", 1)]);
        let msg = vc(&[("A", 3)]);
        assert!(!replica.admits_delivery_from("A", &msg));
    }

    #[test]
    fn cd_rejects_unmet_dependency_on_another_replica() {
        let replica = vc(&[("A", 0), ("B", 0)]);
        let msg = vc(&[("A", 1), ("B", 1)]);
        assert!(!replica.admits_delivery_from("A", &msg));
    }

    #[test]
    fn cd_rejects_unknown_origin() {
        let replica = vc(&[("A", 0)]);
        let msg = vc(&[("C", 1)]);
        assert!(!replica.admits_delivery_from("C", &msg));
    }

    #[test]
    fn increment_and_ensure_tracked_are_idempotent_for_joins() {
        let mut v = VectorClock::new();
        v.ensure_tracked("A");
        v.ensure_tracked("A");
        assert_eq!(v.get("A"), Some(0));
        assert_eq!(v.increment("A"), 1);
        assert_eq!(v.increment("A"), 2);
    }

    #[test]
    fn convergence_ignores_key_order() {
        let a = vc(&[("A", 1), ("B", 2)]);
        let b = vc(&[("B", 2), ("A", 1)]);
        assert!(a.converges_with(&b));
    }
}
