//! Membership: the set of replicas this node currently believes are live.
//! `View` itself only tracks membership; the decision of *when* to add,
//! remove, or broadcast a change belongs to [`crate::engine::ReplicationEngine`].

use std::collections::HashSet;

use crate::clock::ReplicaId;

#[derive(Clone, Debug, Default)]
pub struct View(HashSet<ReplicaId>);

impl View {
    pub fn new() -> Self {
        Self(HashSet::new())
    }

    pub fn contains(&self, replica: &str) -> bool {
        self.0.contains(replica)
    }

    /// Adds `replica` to the view. Returns `true` if it was newly added.
    pub fn add(&mut self, replica: ReplicaId) -> bool {
        self.0.insert(replica)
    }

    /// Removes `replica` from the view. Returns `true` if it was present.
    pub fn remove(&mut self, replica: &str) -> bool {
        self.0.remove(replica)
    }

    /// All members other than `self_id`, used to determine broadcast fan-out.
    pub fn peers_of(&self, self_id: &str) -> Vec<ReplicaId> {
        self.0.iter().filter(|r| r.as_str() != self_id).cloned().collect()
    }

    pub fn members(&self) -> Vec<ReplicaId> {
        self.0.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn add_reports_whether_newly_inserted() {
        let mut v = View::new();
        assert!(v.add("A".into()));
        assert!(!v.add("A".into()));
    }

    #[test]
    fn peers_of_excludes_self() {
        let mut v = View::new();
        v.add("A".into());
        v.add("B".into());
        v.add("C".into());
        let mut peers = v.peers_of("A");
        peers.sort();
        assert_eq!(peers, vec!["B".to_owned(), "C".to_owned()]);
    }

    #[test]
    fn remove_reports_whether_present() {
        let mut v = View::new();
        v.add("A".into());
        assert!(v.remove("A"));
        assert!(!v.remove("A"));
    }
}
