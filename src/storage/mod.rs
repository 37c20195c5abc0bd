pub mod file;

pub use file::FileStorage;

use crate::error::Result;
use crate::state::State;
use crate::tx::SignedTx;

/// Storage abstraction for the append-only transaction log and state snapshots.
///
/// Implementations must preserve:
/// - Append-only semantics for the transaction log
/// - Atomic snapshot writes (crash-safe)
/// - Deterministic replay from the transaction log
pub trait Storage {
    /// Append a transaction to the log (append-only, fsync before ack)
    fn append_tx(&mut self, tx: &SignedTx) -> Result<()>;

    /// Load the latest state snapshot with the last applied transaction ID
    ///
    /// Returns `None` if no snapshot exists (genesis state).
    fn load_state(&self) -> Result<Option<(State, u64)>>;

    /// Persist state snapshot atomically (write to temp file, fsync, rename)
    ///
    /// `last_tx_id` is the count of transactions applied to this state.
    fn persist_state(&mut self, state: &State, last_tx_id: u64) -> Result<()>;

    /// Load transactions from the log starting from `from_tx_id` (inclusive)
    ///
    /// Log positions are sequential (0, 1, 2, ...).
    fn load_txs_from(&self, from_tx_id: u64) -> Result<Vec<SignedTx>>;
}
