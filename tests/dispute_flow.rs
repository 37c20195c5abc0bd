use dispute_ledger::error::Error;
use dispute_ledger::replay::replay_to_tip;
use dispute_ledger::state::{apply, DisputeStatus, State};
use dispute_ledger::storage::{FileStorage, Storage};
use dispute_ledger::tx::{SignedTx, Transaction};
use tempfile::TempDir;

const ARBITER: &str = "arbiter";

fn create_test_storage() -> (FileStorage, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let tx_log_path = temp_dir.path().join("tx.log");
    let state_path = temp_dir.path().join("state.bin");
    let storage = FileStorage::with_paths(tx_log_path, state_path);
    (storage, temp_dir)
}

fn tx(signer: &str, kind: Transaction) -> SignedTx {
    SignedTx::new(signer.to_string(), kind)
}

fn file_dispute(signer: &str, description: &str) -> SignedTx {
    tx(
        signer,
        Transaction::FileDispute {
            client: "client1".to_string(),
            creator: "creator1".to_string(),
            description: description.to_string(),
        },
    )
}

/// Test the complete happy path: File -> StartVoting -> Vote -> Resolve
#[test]
fn test_happy_path_end_to_end() {
    let (mut storage, _temp_dir) = create_test_storage();
    let mut state = State::new();
    let mut tx_id = 0u64;

    // 1. File: any principal may file
    let tx1 = file_dispute("client1", "bad work");
    let (next, assigned) = apply(&state, &tx1, ARBITER).unwrap();
    state = next;
    storage.append_tx(&tx1).unwrap();
    tx_id += 1;
    storage.persist_state(&state, tx_id).unwrap();

    // Verify: id 1, Open, zeroed tallies
    assert_eq!(assigned, Some(1));
    let dispute = state.get_dispute(1).unwrap();
    assert_eq!(dispute.status, DisputeStatus::Open);
    assert_eq!(dispute.votes_for_client, 0);
    assert_eq!(dispute.votes_for_creator, 0);
    assert_eq!(dispute.resolution, None);

    // 2. StartVoting: arbiter only
    let tx2 = tx(ARBITER, Transaction::StartVoting { dispute_id: 1 });
    state = apply(&state, &tx2, ARBITER).unwrap().0;
    storage.append_tx(&tx2).unwrap();
    tx_id += 1;
    storage.persist_state(&state, tx_id).unwrap();

    assert_eq!(state.get_dispute(1).unwrap().status, DisputeStatus::Voting);

    // 3. Votes: one for each side
    let tx3 = tx(
        "voter1",
        Transaction::Vote {
            dispute_id: 1,
            for_client: true,
        },
    );
    state = apply(&state, &tx3, ARBITER).unwrap().0;
    storage.append_tx(&tx3).unwrap();
    tx_id += 1;

    let tx4 = tx(
        "voter2",
        Transaction::Vote {
            dispute_id: 1,
            for_client: false,
        },
    );
    state = apply(&state, &tx4, ARBITER).unwrap().0;
    storage.append_tx(&tx4).unwrap();
    tx_id += 1;
    storage.persist_state(&state, tx_id).unwrap();

    let dispute = state.get_dispute(1).unwrap();
    assert_eq!(dispute.votes_for_client, 1);
    assert_eq!(dispute.votes_for_creator, 1);

    // 4. Resolve: arbiter closes with free-text resolution
    let tx5 = tx(
        ARBITER,
        Transaction::ResolveDispute {
            dispute_id: 1,
            resolution: "refund 50%".to_string(),
        },
    );
    state = apply(&state, &tx5, ARBITER).unwrap().0;
    storage.append_tx(&tx5).unwrap();
    tx_id += 1;
    storage.persist_state(&state, tx_id).unwrap();

    let dispute = state.get_dispute(1).unwrap();
    assert_eq!(dispute.status, DisputeStatus::Resolved);
    assert_eq!(dispute.resolution.as_deref(), Some("refund 50%"));
    // Tallies frozen at resolution
    assert_eq!(dispute.votes_for_client, 1);
    assert_eq!(dispute.votes_for_creator, 1);
}

/// Test state reconstruction from the transaction log
#[test]
fn test_state_reconstruction() {
    let (mut storage, _temp_dir) = create_test_storage();
    let mut state = State::new();
    let mut tx_id = 0u64;

    let tx1 = file_dispute("client1", "bad work");
    state = apply(&state, &tx1, ARBITER).unwrap().0;
    storage.append_tx(&tx1).unwrap();
    tx_id += 1;

    let tx2 = tx(ARBITER, Transaction::StartVoting { dispute_id: 1 });
    state = apply(&state, &tx2, ARBITER).unwrap().0;
    storage.append_tx(&tx2).unwrap();
    tx_id += 1;

    // Persist snapshot after tx2, then apply more without snapshotting
    // (simulating a crash before the next snapshot)
    storage.persist_state(&state, tx_id).unwrap();

    let tx3 = tx(
        "voter1",
        Transaction::Vote {
            dispute_id: 1,
            for_client: true,
        },
    );
    state = apply(&state, &tx3, ARBITER).unwrap().0;
    storage.append_tx(&tx3).unwrap();
    tx_id += 1;

    // Reconstruct from snapshot + log tail
    let (reconstructed, reconstructed_tx_id) = replay_to_tip(&storage, ARBITER).unwrap();

    assert_eq!(reconstructed_tx_id, tx_id);
    assert_eq!(reconstructed, state);
    assert_eq!(reconstructed.get_dispute(1).unwrap().votes_for_client, 1);
    // Counters replay identically: the next filed dispute gets id 2
    assert_eq!(reconstructed.dispute_nonce, 1);
}

/// Test rejection: non-arbiter cannot start voting
#[test]
fn test_rejection_non_arbiter_start_voting() {
    let state = State::new();
    let (state, _) = apply(&state, &file_dispute("client1", "bad work"), ARBITER).unwrap();

    let result = apply(
        &state,
        &tx("user1", Transaction::StartVoting { dispute_id: 1 }),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::NotAuthorized(_))));
    // State unchanged on error
    assert_eq!(state.get_dispute(1).unwrap().status, DisputeStatus::Open);
}

/// Test rejection: vote before voting opens
#[test]
fn test_rejection_vote_while_open() {
    let state = State::new();
    let (state, _) = apply(&state, &file_dispute("client1", "bad work"), ARBITER).unwrap();

    let result = apply(
        &state,
        &tx(
            "voter1",
            Transaction::Vote {
                dispute_id: 1,
                for_client: true,
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

/// Test rejection: no Open -> Resolved shortcut
#[test]
fn test_rejection_resolve_while_open() {
    let state = State::new();
    let (state, _) = apply(&state, &file_dispute("client1", "bad work"), ARBITER).unwrap();

    let result = apply(
        &state,
        &tx(
            ARBITER,
            Transaction::ResolveDispute {
                dispute_id: 1,
                resolution: "skip the vote".to_string(),
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::InvalidState(_))));
}

/// Test rejection: missing disputes yield NotFound for mutations,
/// None for reads
#[test]
fn test_missing_dispute() {
    let state = State::new();

    assert!(state.get_dispute(99).is_none());

    let result = apply(
        &state,
        &tx(ARBITER, Transaction::StartVoting { dispute_id: 99 }),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::NotFound(_))));

    let result = apply(
        &state,
        &tx(
            "voter1",
            Transaction::Vote {
                dispute_id: 99,
                for_client: true,
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::NotFound(_))));
}

/// Test fixed error precedence: authorization outranks existence for
/// arbiter-gated operations
#[test]
fn test_error_precedence_authorization_first() {
    let state = State::new();

    let result = apply(
        &state,
        &tx(
            "user1",
            Transaction::ResolveDispute {
                dispute_id: 99,
                resolution: "x".to_string(),
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::NotAuthorized(_))));

    let result = apply(
        &state,
        &tx("user1", Transaction::StartVoting { dispute_id: 99 }),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::NotAuthorized(_))));
}

/// Test second resolve always fails InvalidState
#[test]
fn test_double_resolve() {
    let state = State::new();
    let (state, _) = apply(&state, &file_dispute("client1", "bad work"), ARBITER).unwrap();
    let (state, _) = apply(
        &state,
        &tx(ARBITER, Transaction::StartVoting { dispute_id: 1 }),
        ARBITER,
    )
    .unwrap();
    let (state, _) = apply(
        &state,
        &tx(
            ARBITER,
            Transaction::ResolveDispute {
                dispute_id: 1,
                resolution: "refund 50%".to_string(),
            },
        ),
        ARBITER,
    )
    .unwrap();

    let result = apply(
        &state,
        &tx(
            ARBITER,
            Transaction::ResolveDispute {
                dispute_id: 1,
                resolution: "x".to_string(),
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::InvalidState(_))));
    // First resolution stands
    assert_eq!(
        state.get_dispute(1).unwrap().resolution.as_deref(),
        Some("refund 50%")
    );
}

/// Test several disputes advancing independently
#[test]
fn test_independent_disputes() {
    let mut state = State::new();

    for i in 0..3 {
        state = apply(
            &state,
            &file_dispute("client1", &format!("grievance {}", i)),
            ARBITER,
        )
        .unwrap()
        .0;
    }

    // Advance only dispute 2
    state = apply(
        &state,
        &tx(ARBITER, Transaction::StartVoting { dispute_id: 2 }),
        ARBITER,
    )
    .unwrap()
    .0;
    state = apply(
        &state,
        &tx(
            "voter1",
            Transaction::Vote {
                dispute_id: 2,
                for_client: false,
            },
        ),
        ARBITER,
    )
    .unwrap()
    .0;

    assert_eq!(state.get_dispute(1).unwrap().status, DisputeStatus::Open);
    assert_eq!(state.get_dispute(2).unwrap().status, DisputeStatus::Voting);
    assert_eq!(state.get_dispute(2).unwrap().votes_for_creator, 1);
    assert_eq!(state.get_dispute(3).unwrap().status, DisputeStatus::Open);
}

/// Test registry flows end to end alongside a dispute
#[test]
fn test_registries_end_to_end() {
    let mut state = State::new();

    // Creator registry
    let (next, creator_id) = apply(
        &state,
        &tx(
            "alice",
            Transaction::RegisterCreator {
                name: "Alice".to_string(),
                bio: "Freelance writer".to_string(),
            },
        ),
        ARBITER,
    )
    .unwrap();
    state = next;
    assert_eq!(creator_id, Some(1));

    state = apply(
        &state,
        &tx(
            "alice",
            Transaction::UpdateProfile {
                creator_id: 1,
                name: "Alice Smith".to_string(),
                bio: "Experienced freelance writer".to_string(),
            },
        ),
        ARBITER,
    )
    .unwrap()
    .0;
    assert_eq!(state.get_creator(1).unwrap().name, "Alice Smith");

    // Rights registry
    let (next, rights_id) = apply(
        &state,
        &tx(
            "alice",
            Transaction::RegisterRights {
                license: "CC BY-SA".to_string(),
                expiration: None,
                transferable: true,
            },
        ),
        ARBITER,
    )
    .unwrap();
    state = next;
    assert_eq!(rights_id, Some(1));

    state = apply(
        &state,
        &tx(
            "alice",
            Transaction::TransferRights {
                rights_id: 1,
                new_owner: "bob".to_string(),
            },
        ),
        ARBITER,
    )
    .unwrap()
    .0;
    assert_eq!(state.get_rights(1).unwrap().owner, "bob");

    // Registry ids do not interfere with dispute ids
    let (state, dispute_id) =
        apply(&state, &file_dispute("alice", "late delivery"), ARBITER).unwrap();
    assert_eq!(dispute_id, Some(1));
    assert!(state.get_dispute(1).is_some());
}

/// Test rejection: non-transferable rights stay put
#[test]
fn test_rejection_non_transferable_rights() {
    let state = State::new();
    let (state, _) = apply(
        &state,
        &tx(
            "creator1",
            Transaction::RegisterRights {
                license: "CC BY-SA".to_string(),
                expiration: None,
                transferable: false,
            },
        ),
        ARBITER,
    )
    .unwrap();

    let result = apply(
        &state,
        &tx(
            "creator1",
            Transaction::TransferRights {
                rights_id: 1,
                new_owner: "newowner".to_string(),
            },
        ),
        ARBITER,
    );
    assert!(matches!(result, Err(Error::InvalidState(_))));
    assert_eq!(state.get_rights(1).unwrap().owner, "creator1");
}

/// Test full log replay reproduces every record type and counter
#[test]
fn test_replay_reproduces_mixed_log() {
    let (mut storage, _temp_dir) = create_test_storage();
    let mut state = State::new();

    let txs = vec![
        tx(
            "alice",
            Transaction::RegisterCreator {
                name: "Alice".to_string(),
                bio: "Writer".to_string(),
            },
        ),
        file_dispute("client1", "bad work"),
        tx(ARBITER, Transaction::StartVoting { dispute_id: 1 }),
        tx(
            "voter1",
            Transaction::Vote {
                dispute_id: 1,
                for_client: true,
            },
        ),
        tx(
            "alice",
            Transaction::RegisterRights {
                license: "CC BY-SA".to_string(),
                expiration: Some(1_900_000_000),
                transferable: true,
            },
        ),
        tx(
            ARBITER,
            Transaction::ResolveDispute {
                dispute_id: 1,
                resolution: "refund 50%".to_string(),
            },
        ),
    ];

    for t in &txs {
        state = apply(&state, t, ARBITER).unwrap().0;
        storage.append_tx(t).unwrap();
    }

    let (replayed, tip) = replay_to_tip(&storage, ARBITER).unwrap();
    assert_eq!(tip, txs.len() as u64);
    assert_eq!(replayed, state);
}
