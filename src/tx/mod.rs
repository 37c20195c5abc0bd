pub mod transaction;
pub mod validation;

pub use transaction::{deserialize_signed_tx_bincode, SignedTx, Transaction};
pub use validation::{
    validate, validate_resolve, validate_start_voting, validate_transfer_rights,
    validate_update_license, validate_update_profile, validate_vote,
};
