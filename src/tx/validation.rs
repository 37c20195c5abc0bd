use crate::error::{Error, Result};
use crate::state::{DisputeStatus, State};
use crate::tx::{SignedTx, Transaction};

/// Validate a transaction against current state without mutating it.
///
/// Check order is fixed and tested:
/// - Arbiter-gated operations: authorization, then existence, then
///   status precondition (`NotAuthorized` > `NotFound` > `InvalidState`).
/// - Owner-gated registry operations: the ownership check reads the
///   record, so existence comes first (`NotFound` > `NotAuthorized` >
///   `InvalidState`).
///
/// A transaction that validates here applies without error.
pub fn validate(state: &State, tx: &SignedTx, arbiter: &str) -> Result<()> {
    match &tx.kind {
        Transaction::FileDispute { .. } => Ok(()),
        Transaction::StartVoting { dispute_id } => {
            validate_start_voting(state, tx, arbiter, *dispute_id)
        }
        Transaction::Vote { dispute_id, .. } => validate_vote(state, *dispute_id),
        Transaction::ResolveDispute { dispute_id, .. } => {
            validate_resolve(state, tx, arbiter, *dispute_id)
        }
        Transaction::RegisterCreator { .. } => Ok(()),
        Transaction::UpdateProfile { creator_id, .. } => {
            validate_update_profile(state, tx, *creator_id)
        }
        Transaction::RegisterRights { .. } => Ok(()),
        Transaction::TransferRights { rights_id, .. } => {
            validate_transfer_rights(state, tx, *rights_id)
        }
        Transaction::UpdateLicense { rights_id, .. } => {
            validate_update_license(state, tx, *rights_id)
        }
    }
}

fn require_arbiter(tx: &SignedTx, arbiter: &str) -> Result<()> {
    if tx.signer != arbiter {
        return Err(Error::NotAuthorized(format!(
            "{} is not the arbiter",
            tx.signer
        )));
    }
    Ok(())
}

pub fn validate_start_voting(
    state: &State,
    tx: &SignedTx,
    arbiter: &str,
    dispute_id: u64,
) -> Result<()> {
    require_arbiter(tx, arbiter)?;
    let dispute = state
        .get_dispute(dispute_id)
        .ok_or_else(|| Error::NotFound(format!("Dispute {}", dispute_id)))?;
    if dispute.status != DisputeStatus::Open {
        return Err(Error::InvalidState(format!(
            "Dispute {} is {:?}, voting can only start while Open",
            dispute_id, dispute.status
        )));
    }
    Ok(())
}

pub fn validate_vote(state: &State, dispute_id: u64) -> Result<()> {
    let dispute = state
        .get_dispute(dispute_id)
        .ok_or_else(|| Error::NotFound(format!("Dispute {}", dispute_id)))?;
    if dispute.status != DisputeStatus::Voting {
        return Err(Error::InvalidState(format!(
            "Dispute {} is {:?}, votes are only accepted while Voting",
            dispute_id, dispute.status
        )));
    }
    Ok(())
}

pub fn validate_resolve(
    state: &State,
    tx: &SignedTx,
    arbiter: &str,
    dispute_id: u64,
) -> Result<()> {
    require_arbiter(tx, arbiter)?;
    let dispute = state
        .get_dispute(dispute_id)
        .ok_or_else(|| Error::NotFound(format!("Dispute {}", dispute_id)))?;
    if dispute.status != DisputeStatus::Voting {
        return Err(Error::InvalidState(format!(
            "Dispute {} is {:?}, resolution requires Voting",
            dispute_id, dispute.status
        )));
    }
    Ok(())
}

pub fn validate_update_profile(state: &State, tx: &SignedTx, creator_id: u64) -> Result<()> {
    let profile = state
        .get_creator(creator_id)
        .ok_or_else(|| Error::NotFound(format!("Creator profile {}", creator_id)))?;
    if !profile.is_owned_by(&tx.signer) {
        return Err(Error::NotAuthorized(format!(
            "{} does not own creator profile {}",
            tx.signer, creator_id
        )));
    }
    Ok(())
}

pub fn validate_transfer_rights(state: &State, tx: &SignedTx, rights_id: u64) -> Result<()> {
    let rights = state
        .get_rights(rights_id)
        .ok_or_else(|| Error::NotFound(format!("Content rights {}", rights_id)))?;
    if !rights.is_owned_by(&tx.signer) {
        return Err(Error::NotAuthorized(format!(
            "{} does not own content rights {}",
            tx.signer, rights_id
        )));
    }
    if !rights.transferable {
        return Err(Error::InvalidState(format!(
            "Content rights {} are not transferable",
            rights_id
        )));
    }
    Ok(())
}

pub fn validate_update_license(state: &State, tx: &SignedTx, rights_id: u64) -> Result<()> {
    let rights = state
        .get_rights(rights_id)
        .ok_or_else(|| Error::NotFound(format!("Content rights {}", rights_id)))?;
    if !rights.is_owned_by(&tx.signer) {
        return Err(Error::NotAuthorized(format!(
            "{} does not own content rights {}",
            tx.signer, rights_id
        )));
    }
    Ok(())
}
