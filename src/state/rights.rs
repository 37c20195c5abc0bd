use serde::{Deserialize, Serialize};

/// Content rights record: a license registration for a piece of content.
///
/// Identity: sequential `u64` id with its own counter.
///
/// Invariants:
/// - Only the owner may transfer or relicense
/// - `owner` changes only through a transfer, and only when `transferable`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentRights {
    /// Current rights holder
    pub owner: String,

    /// License identifier (e.g., "CC BY-SA")
    pub license: String,

    /// Optional expiration timestamp; `None` means perpetual
    pub expiration: Option<u64>,

    /// Whether ownership may be transferred
    pub transferable: bool,
}

impl ContentRights {
    pub fn new(owner: String, license: String, expiration: Option<u64>, transferable: bool) -> Self {
        ContentRights {
            owner,
            license,
            expiration,
            transferable,
        }
    }

    /// Hand ownership to a new principal
    pub fn transfer_to(&mut self, new_owner: String) {
        self.owner = new_owner;
    }

    /// Replace the license identifier
    pub fn update_license(&mut self, license: String) {
        self.license = license;
    }

    pub fn is_owned_by(&self, principal: &str) -> bool {
        self.owner == principal
    }
}
