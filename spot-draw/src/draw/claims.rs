// Fixed-claim resolution and conflict detection.
//
// Claims are derived from the participant list on demand; nothing here is
// cached between calls.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::participant::Participant;

/// Spot number -> claimant name.
pub type ClaimMap = BTreeMap<u32, String>;

/// Two participants reserving the same spot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    pub spot: u32,
    /// The participant who reserved the spot first (earlier in insertion order).
    pub first: String,
    /// The later participant whose reservation was refused.
    pub later: String,
}

/// Fixed-only claims plus any collisions found while resolving them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Claims {
    pub mapping: ClaimMap,
    pub conflicts: Vec<Conflict>,
}

impl Claims {
    /// A claim set is valid when no fixed reservations collide.
    pub fn is_valid(&self) -> bool {
        self.conflicts.is_empty()
    }
}

/// Resolve fixed spot reservations first-come-first-served.
///
/// Participants are visited in slice order. Spots outside `[1, total_spots]`
/// are ignored. A spot reserved again under a different name produces one
/// `Conflict` per later claimant; a repeat under the same name does not.
pub fn compute_claims(participants: &[Participant], total_spots: u32) -> Claims {
    let mut mapping = ClaimMap::new();
    let mut conflicts = Vec::new();

    for participant in participants {
        for &spot in &participant.fixed_spots {
            if spot == 0 || spot > total_spots {
                continue;
            }
            match mapping.get(&spot) {
                None => {
                    mapping.insert(spot, participant.name.clone());
                }
                Some(holder) if *holder != participant.name => {
                    conflicts.push(Conflict {
                        spot,
                        first: holder.clone(),
                        later: participant.name.clone(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    Claims { mapping, conflicts }
}

/// Spots in `[1, total_spots]` not present in `mapping`, ascending.
pub fn available_spots(mapping: &ClaimMap, total_spots: u32) -> Vec<u32> {
    (1..=total_spots)
        .filter(|spot| !mapping.contains_key(spot))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
