use serde::{Deserialize, Serialize};

/// Dispute status lifecycle.
///
/// `Open` and `Voting` are the only states with outward transitions;
/// `Resolved` is terminal. There is no direct `Open -> Resolved` edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DisputeStatus {
    /// Filed, awaiting the arbiter to open voting.
    Open,
    /// Accepting votes from any principal.
    Voting,
    /// Closed with a recorded resolution (terminal).
    Resolved,
}

impl DisputeStatus {
    /// Whether this status is terminal.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved)
    }
}

/// Dispute aggregate: one client/creator disagreement tracked from filing
/// through voting to resolution.
///
/// Identity: sequential `u64` id assigned by the ledger, never reused.
///
/// Invariants:
/// - `client`, `creator`, `description` are immutable after filing
/// - `resolution` is `None` iff `status != Resolved`, set exactly once
/// - Vote tallies are monotonic and frozen once status leaves `Voting`
/// - Records are never deleted; a resolved dispute stays readable
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dispute {
    /// Principal that filed the grievance side of the dispute
    pub client: String,

    /// Principal the grievance is against
    pub creator: String,

    /// Free-form grievance text (may be empty)
    pub description: String,

    /// Current lifecycle status
    pub status: DisputeStatus,

    /// Arbiter-chosen free text, present once resolved
    pub resolution: Option<String>,

    /// Votes siding with the client
    pub votes_for_client: u64,

    /// Votes siding with the creator
    pub votes_for_creator: u64,
}

impl Dispute {
    /// Create a freshly filed dispute with zeroed tallies
    pub fn filed(client: String, creator: String, description: String) -> Self {
        Dispute {
            client,
            creator,
            description,
            status: DisputeStatus::Open,
            resolution: None,
            votes_for_client: 0,
            votes_for_creator: 0,
        }
    }

    /// Transition Open -> Voting
    ///
    /// Preconditions are enforced by validation; this only flips status.
    pub fn open_voting(&mut self) {
        self.status = DisputeStatus::Voting;
    }

    /// Record one vote: exactly one tally increments per call.
    ///
    /// Votes are cumulative; repeat votes by the same principal are not
    /// deduplicated.
    pub fn record_vote(&mut self, for_client: bool) {
        if for_client {
            self.votes_for_client = self.votes_for_client.saturating_add(1);
        } else {
            self.votes_for_creator = self.votes_for_creator.saturating_add(1);
        }
    }

    /// Transition Voting -> Resolved and record the resolution text.
    ///
    /// The tally is advisory input for the arbiter, not a binding
    /// threshold; no winner is computed here.
    pub fn resolve(&mut self, resolution: String) {
        self.status = DisputeStatus::Resolved;
        self.resolution = Some(resolution);
    }

    /// Check if the dispute accepts votes
    pub fn is_voting(&self) -> bool {
        self.status == DisputeStatus::Voting
    }

    /// Total votes cast so far
    pub fn total_votes(&self) -> u64 {
        self.votes_for_client
            .saturating_add(self.votes_for_creator)
    }
}
