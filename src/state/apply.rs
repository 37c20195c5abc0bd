use crate::error::Result;
use crate::state::{ContentRights, CreatorProfile, Dispute, State};
use crate::tx::validation::validate;
use crate::tx::{SignedTx, Transaction};

/// Apply one transaction to the state, producing the successor state.
///
/// Validation runs first; an error commits nothing and the input state is
/// untouched. On success the second element carries the id allocated by a
/// record-creating operation (`FileDispute`, `RegisterCreator`,
/// `RegisterRights`), `None` otherwise.
///
/// `arbiter` is the process-wide privileged principal, fixed at
/// deployment and injected by the caller.
pub fn apply(state: &State, tx: &SignedTx, arbiter: &str) -> Result<(State, Option<u64>)> {
    validate(state, tx, arbiter)?;
    let mut new_state = state.clone();
    let assigned = match &tx.kind {
        Transaction::FileDispute {
            client,
            creator,
            description,
        } => Some(apply_file_dispute(
            &mut new_state,
            client,
            creator,
            description,
        )),
        Transaction::StartVoting { dispute_id } => {
            apply_start_voting(&mut new_state, *dispute_id);
            None
        }
        Transaction::Vote {
            dispute_id,
            for_client,
        } => {
            apply_vote(&mut new_state, *dispute_id, *for_client);
            None
        }
        Transaction::ResolveDispute {
            dispute_id,
            resolution,
        } => {
            apply_resolve(&mut new_state, *dispute_id, resolution);
            None
        }
        Transaction::RegisterCreator { name, bio } => {
            Some(apply_register_creator(&mut new_state, &tx.signer, name, bio))
        }
        Transaction::UpdateProfile {
            creator_id,
            name,
            bio,
        } => {
            apply_update_profile(&mut new_state, *creator_id, name, bio);
            None
        }
        Transaction::RegisterRights {
            license,
            expiration,
            transferable,
        } => Some(apply_register_rights(
            &mut new_state,
            &tx.signer,
            license,
            *expiration,
            *transferable,
        )),
        Transaction::TransferRights {
            rights_id,
            new_owner,
        } => {
            apply_transfer_rights(&mut new_state, *rights_id, new_owner);
            None
        }
        Transaction::UpdateLicense { rights_id, license } => {
            apply_update_license(&mut new_state, *rights_id, license);
            None
        }
    };

    Ok((new_state, assigned))
}

fn apply_file_dispute(state: &mut State, client: &str, creator: &str, description: &str) -> u64 {
    let id = state.next_dispute_id();
    state.insert_dispute(
        id,
        Dispute::filed(
            client.to_string(),
            creator.to_string(),
            description.to_string(),
        ),
    );
    id
}

fn apply_start_voting(state: &mut State, dispute_id: u64) {
    // Existence and Open status were checked by validate
    if let Some(dispute) = state.get_dispute_mut(dispute_id) {
        dispute.open_voting();
    }
}

fn apply_vote(state: &mut State, dispute_id: u64, for_client: bool) {
    if let Some(dispute) = state.get_dispute_mut(dispute_id) {
        dispute.record_vote(for_client);
    }
}

fn apply_resolve(state: &mut State, dispute_id: u64, resolution: &str) {
    if let Some(dispute) = state.get_dispute_mut(dispute_id) {
        dispute.resolve(resolution.to_string());
    }
}

fn apply_register_creator(state: &mut State, signer: &str, name: &str, bio: &str) -> u64 {
    let id = state.next_creator_id();
    state.insert_creator(
        id,
        CreatorProfile::new(signer.to_string(), name.to_string(), bio.to_string()),
    );
    id
}

fn apply_update_profile(state: &mut State, creator_id: u64, name: &str, bio: &str) {
    if let Some(profile) = state.get_creator_mut(creator_id) {
        profile.update(name.to_string(), bio.to_string());
    }
}

fn apply_register_rights(
    state: &mut State,
    signer: &str,
    license: &str,
    expiration: Option<u64>,
    transferable: bool,
) -> u64 {
    let id = state.next_rights_id();
    state.insert_rights(
        id,
        ContentRights::new(
            signer.to_string(),
            license.to_string(),
            expiration,
            transferable,
        ),
    );
    id
}

fn apply_transfer_rights(state: &mut State, rights_id: u64, new_owner: &str) {
    if let Some(rights) = state.get_rights_mut(rights_id) {
        rights.transfer_to(new_owner.to_string());
    }
}

fn apply_update_license(state: &mut State, rights_id: u64, license: &str) {
    if let Some(rights) = state.get_rights_mut(rights_id) {
        rights.update_license(license.to_string());
    }
}
