use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Every operation the ledger accepts.
///
/// Dispute operations drive the `Open -> Voting -> Resolved` lifecycle;
/// the registry operations are keyed-record CRUD with ownership checks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub enum Transaction {
    /// File a new dispute between two principals. Open to any caller;
    /// the parties are not required to include the caller and are not
    /// validated against the registries.
    FileDispute {
        client: String,
        creator: String,
        description: String,
    },

    /// Open the voting window for a dispute. Arbiter only.
    StartVoting { dispute_id: u64 },

    /// Cast one vote while the dispute is in `Voting`. Open to any
    /// caller; repeat votes accumulate.
    Vote { dispute_id: u64, for_client: bool },

    /// Close a dispute with a resolution text. Arbiter only.
    ResolveDispute { dispute_id: u64, resolution: String },

    /// Register a creator profile owned by the signer.
    RegisterCreator { name: String, bio: String },

    /// Update a creator profile. Owner only.
    UpdateProfile {
        creator_id: u64,
        name: String,
        bio: String,
    },

    /// Register content rights owned by the signer.
    RegisterRights {
        license: String,
        expiration: Option<u64>,
        transferable: bool,
    },

    /// Transfer content rights to a new owner. Owner only, and only
    /// when the record is transferable.
    TransferRights { rights_id: u64, new_owner: String },

    /// Replace the license on content rights. Owner only.
    UpdateLicense { rights_id: u64, license: String },
}

/// Transaction envelope: caller principal, operation, optional signature.
///
/// `signer` is the principal the hosting environment attributes the call
/// to. The signature, when present, is a 64-byte Ed25519 signature over
/// the canonical unsigned encoding and binds the envelope to the
/// signer's address (hex of the public key).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SignedTx {
    /// Caller principal (address)
    pub signer: String,

    /// The operation to apply
    pub kind: Transaction,

    /// Ed25519 signature over `message_to_sign()`; `None` for
    /// environment-attributed calls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature: Option<Vec<u8>>,
}

impl SignedTx {
    /// Build an unsigned envelope
    pub fn new(signer: String, kind: Transaction) -> Self {
        SignedTx {
            signer,
            kind,
            signature: None,
        }
    }

    /// Canonical message bytes for signing: the bincode encoding of the
    /// envelope with the signature cleared.
    pub fn message_to_sign(&self) -> Result<Vec<u8>> {
        let unsigned = SignedTx {
            signer: self.signer.clone(),
            kind: self.kind.clone(),
            signature: None,
        };
        bincode::serialize(&unsigned)
            .map_err(|e| Error::InvalidTransaction(format!("Failed to encode transaction: {}", e)))
    }

    /// SHA256 digest of the canonical encoding, hex-encoded. Shown on
    /// apply and usable as an audit reference for log entries.
    pub fn digest(&self) -> Result<String> {
        let message = self.message_to_sign()?;
        Ok(hex::encode(crate::sha256_digest(&message)))
    }
}

/// Decode a bincode-framed transaction (log entries)
pub fn deserialize_signed_tx_bincode(bytes: &[u8]) -> Result<SignedTx> {
    bincode::deserialize(bytes)
        .map_err(|e| Error::InvalidTransaction(format!("Failed to decode transaction: {}", e)))
}
