// Random fill of the spots left over after fixed claims.

use std::collections::BTreeMap;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::claims::{available_spots, compute_claims, ClaimMap, Conflict};
use super::participant::{Participant, ParticipantId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssignError {
    #[error("{} fixed spot conflict(s) must be resolved first", .0.len())]
    Conflicts(Vec<Conflict>),
}

/// A completed random assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Final spot -> name mapping: fixed claims plus random grants.
    pub mapping: ClaimMap,
    /// Spots granted at random per participant, in the order they were drawn.
    /// Every participant has an entry, possibly empty.
    pub random: BTreeMap<ParticipantId, Vec<u32>>,
    /// Sum of all requested random counts.
    pub requested: u64,
    /// Number of spots actually handed out at random.
    pub granted: u64,
}

impl Assignment {
    /// Random spots granted to one participant.
    pub fn random_for(&self, id: ParticipantId) -> &[u32] {
        self.random.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Requested random spots that could not be granted.
    pub fn shortfall(&self) -> u64 {
        self.requested - self.granted
    }
}

/// Build a final assignment from the current participants.
///
/// Fixed claims are resolved exactly as `compute_claims` does; any conflict
/// aborts. The remaining spots are shuffled with `rng` and dealt out from the
/// front to participants in order, each taking up to its `random_count`.
/// Running out of spots is not an error: later requests simply go short.
pub fn build_assignment<R: Rng + ?Sized>(
    participants: &[Participant],
    total_spots: u32,
    rng: &mut R,
) -> Result<Assignment, AssignError> {
    let claims = compute_claims(participants, total_spots);
    if !claims.is_valid() {
        return Err(AssignError::Conflicts(claims.conflicts));
    }

    let mut pool = available_spots(&claims.mapping, total_spots);
    pool.shuffle(rng);

    let mut mapping = claims.mapping;
    let mut random = BTreeMap::new();
    let mut requested = 0u64;
    let mut drawn = pool.into_iter();

    for participant in participants {
        requested += u64::from(participant.random_count);
        let granted: Vec<u32> = drawn
            .by_ref()
            .take(participant.random_count as usize)
            .collect();
        for &spot in &granted {
            mapping.insert(spot, participant.name.clone());
        }
        random.insert(participant.id, granted);
    }

    let granted = random.values().map(|spots| spots.len() as u64).sum();

    Ok(Assignment {
        mapping,
        random,
        requested,
        granted,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
