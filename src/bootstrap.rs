//! Startup join protocol: seed the view from configuration, announce
//! this replica to its seeds, then fetch a state snapshot from whichever
//! peer answers first.
//!
//! Grounded on `src/actor/spawn.rs`'s `on_start_out` sequencing, where an
//! actor emits its startup commands (announce, in that library's case a
//! message send) before entering its serve loop.

use crate::engine::ReplicationEngine;

/// Runs the full bootstrap sequence against an already-constructed
/// engine. `config.seeds` may or may not include `config.self_addr`;
/// both the view seed and the announce/transfer fan-out treat `self`
/// specially so self-addressed network calls are never attempted.
pub async fn run(engine: &ReplicationEngine, self_addr: &str, seeds: &[String]) {
    let mut members: Vec<String> = seeds.to_vec();
    if !members.iter().any(|m| m == self_addr) {
        members.push(self_addr.to_owned());
    }
    engine.seed_view(members);

    let peers: Vec<String> = seeds.iter().filter(|s| s.as_str() != self_addr).cloned().collect();

    if peers.is_empty() {
        log::info!("no seeds configured ({self_addr} starting as a single-member view)");
        return;
    }

    log::info!("announcing self ({self_addr}) to {} seed(s)", peers.len());
    for peer in &peers {
        engine.peer_client().announce_self(peer, self_addr).await;
    }

    for peer in &peers {
        if let Some(snapshot) = engine.peer_client().fetch_state(peer).await {
            log::info!("state transfer from {peer} succeeded");
            engine.apply_state_transfer(snapshot);
            return;
        }
        log::warn!("state transfer from {peer} failed; trying next seed");
    }
    log::warn!("no seed responded to state transfer; starting with zero-initialized state");
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::peer_client::PeerClient;

    #[actix_rt::test]
    async fn empty_seed_list_yields_single_member_view() {
        let engine = ReplicationEngine::new("A".to_owned(), PeerClient::new());
        run(&engine, "A", &[]).await;
        assert_eq!(engine.view_list(), vec!["A".to_owned()]);
    }

    #[actix_rt::test]
    async fn self_address_in_view_string_is_not_treated_as_a_peer() {
        let engine = ReplicationEngine::new("A".to_owned(), PeerClient::new());
        // "A" appears in its own seed list, as the wire format allows;
        // bootstrap must not try to announce to itself.
        run(&engine, "A", &["A".to_owned()]).await;
        assert_eq!(engine.view_list(), vec!["A".to_owned()]);
    }
}
