pub mod apply;
pub mod creator;
pub mod dispute;
pub mod rights;

pub use apply::apply;
pub use creator::CreatorProfile;
pub use dispute::{Dispute, DisputeStatus};
pub use rights::ContentRights;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Core domain state: disputes, creator profiles, and content rights,
/// each keyed by a sequential `u64` id, plus the id counters.
///
/// Records are append-only — nothing is ever removed — so ordered maps
/// keep iteration in id order for audit. State is fully reconstructible
/// by replaying transactions from genesis; the counters travel with the
/// state so a replay reassigns identical ids. All state transitions are
/// deterministic and side-effect free.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct State {
    /// All disputes indexed by id (ids start at 1)
    pub disputes: BTreeMap<u64, Dispute>,

    /// All creator profiles indexed by id
    pub creators: BTreeMap<u64, CreatorProfile>,

    /// All content rights indexed by id
    pub rights: BTreeMap<u64, ContentRights>,

    /// Last assigned dispute id (0 = none yet); only increases
    pub dispute_nonce: u64,

    /// Last assigned creator profile id
    pub creator_nonce: u64,

    /// Last assigned content rights id
    pub rights_nonce: u64,
}

impl State {
    /// Create empty genesis state
    pub fn new() -> Self {
        State {
            disputes: BTreeMap::new(),
            creators: BTreeMap::new(),
            rights: BTreeMap::new(),
            dispute_nonce: 0,
            creator_nonce: 0,
            rights_nonce: 0,
        }
    }

    /// Allocate the next dispute id (1, 2, 3, ...)
    pub fn next_dispute_id(&mut self) -> u64 {
        self.dispute_nonce += 1;
        self.dispute_nonce
    }

    /// Allocate the next creator profile id
    pub fn next_creator_id(&mut self) -> u64 {
        self.creator_nonce += 1;
        self.creator_nonce
    }

    /// Allocate the next content rights id
    pub fn next_rights_id(&mut self) -> u64 {
        self.rights_nonce += 1;
        self.rights_nonce
    }

    /// Get dispute by id (never fails; absent id yields None)
    pub fn get_dispute(&self, id: u64) -> Option<&Dispute> {
        self.disputes.get(&id)
    }

    /// Get dispute mutably
    pub fn get_dispute_mut(&mut self, id: u64) -> Option<&mut Dispute> {
        self.disputes.get_mut(&id)
    }

    /// Insert a dispute under an allocated id
    pub fn insert_dispute(&mut self, id: u64, dispute: Dispute) {
        self.disputes.insert(id, dispute);
    }

    /// All disputes in id order
    pub fn all_disputes(&self) -> impl Iterator<Item = (&u64, &Dispute)> {
        self.disputes.iter()
    }

    /// Disputes naming a principal as either party, in id order
    pub fn disputes_for_party(&self, principal: &str) -> Vec<(u64, &Dispute)> {
        self.disputes
            .iter()
            .filter(|(_, d)| d.client == principal || d.creator == principal)
            .map(|(id, d)| (*id, d))
            .collect()
    }

    /// Get creator profile by id
    pub fn get_creator(&self, id: u64) -> Option<&CreatorProfile> {
        self.creators.get(&id)
    }

    /// Get creator profile mutably
    pub fn get_creator_mut(&mut self, id: u64) -> Option<&mut CreatorProfile> {
        self.creators.get_mut(&id)
    }

    /// Insert a creator profile under an allocated id
    pub fn insert_creator(&mut self, id: u64, profile: CreatorProfile) {
        self.creators.insert(id, profile);
    }

    /// Get content rights by id
    pub fn get_rights(&self, id: u64) -> Option<&ContentRights> {
        self.rights.get(&id)
    }

    /// Get content rights mutably
    pub fn get_rights_mut(&mut self, id: u64) -> Option<&mut ContentRights> {
        self.rights.get_mut(&id)
    }

    /// Insert content rights under an allocated id
    pub fn insert_rights(&mut self, id: u64, rights: ContentRights) {
        self.rights.insert(id, rights);
    }

    /// Content rights held by a principal, in id order
    pub fn rights_owned_by(&self, principal: &str) -> Vec<(u64, &ContentRights)> {
        self.rights
            .iter()
            .filter(|(_, r)| r.owner == principal)
            .map(|(id, r)| (*id, r))
            .collect()
    }
}

impl Default for State {
    fn default() -> Self {
        State::new()
    }
}
