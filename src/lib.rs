//! A causally-consistent replicated key-value store.
//!
//! Clients read, write, and delete keys against any replica. Replicas
//! lazily propagate mutations to their peers and refuse to serve a
//! client request whose declared causal context outruns their own
//! knowledge ([`clock`]). Peer-originated updates are applied only once
//! every causal dependency has been observed, in the originating
//! replica's order ([`engine`]). Membership is dynamic: replicas join by
//! announcing themselves and pulling a state snapshot from an existing
//! member ([`bootstrap`]), and are evicted from the view after a
//! broadcast exhausts its retry budget ([`peer_client`]).
//!
//! See `SPEC_FULL.md` for the full component design and `DESIGN.md` for
//! how each module is grounded in prior art.

pub mod bootstrap;
pub mod clock;
pub mod config;
pub mod dto;
pub mod engine;
pub mod error;
pub mod http;
pub mod peer_client;
pub mod store;
pub mod view;
