use crate::models::{Pair, Participant};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

/// Outcome of one pairing pass: the disjoint pair set for the round plus
/// every participant left without a table this round.
#[derive(Debug, Clone, Default)]
pub struct RoundAssignment {
    pub pairs: Vec<Pair>,
    pub waiting: Vec<Participant>,
}

impl RoundAssignment {
    pub fn partner_of(&self, participant_id: &str) -> Option<&Participant> {
        self.pairs
            .iter()
            .find_map(|pair| pair.partner_of(participant_id))
    }

    pub fn is_waiting(&self, participant_id: &str) -> bool {
        self.waiting.iter().any(|p| p.id == participant_id)
    }
}

/// Pairings accumulated over a session, used by the greedy fallback to
/// avoid repeats and to spread rounds evenly across participants.
#[derive(Debug, Clone, Default)]
pub struct PairingHistory {
    met: HashSet<(String, String)>,
    totals: HashMap<String, u32>,
}

impl PairingHistory {
    pub fn record(&mut self, assignment: &RoundAssignment) {
        for pair in &assignment.pairs {
            self.met.insert(Self::key(&pair.left.id, &pair.right.id));
            *self.totals.entry(pair.left.id.clone()).or_insert(0) += 1;
            *self.totals.entry(pair.right.id.clone()).or_insert(0) += 1;
        }
    }

    pub fn have_met(&self, a: &str, b: &str) -> bool {
        self.met.contains(&Self::key(a, b))
    }

    pub fn total_pairings(&self, participant_id: &str) -> u32 {
        self.totals.get(participant_id).copied().unwrap_or(0)
    }

    fn key(a: &str, b: &str) -> (String, String) {
        if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        }
    }
}

/// Produce the pair set for a round.
///
/// The common two-orientation pool rotates structurally: one group stays
/// seated in pool order while the other shifts by one position per round,
/// which guarantees no repeat pairing for `min(|A|,|B|)` rounds. Pools
/// that do not split cleanly into two mutually compatible groups fall
/// back to a greedy pass driven by the session's pairing history.
///
/// Deterministic for a given pool order, round number, and history.
pub fn assign_round(
    pool: &[Participant],
    round: u32,
    history: &PairingHistory,
    formed_at: DateTime<Utc>,
) -> RoundAssignment {
    if let Some((stationary, rotating)) = two_group_split(pool) {
        rotation_assignment(&stationary, &rotating, round, formed_at)
    } else {
        greedy_assignment(pool, round, history, formed_at)
    }
}

/// Split the pool into two groups where every member of one is compatible
/// with every member of the other. Holds exactly when two gender
/// categories are present and each side is wholly interested in the other.
fn two_group_split(pool: &[Participant]) -> Option<(Vec<&Participant>, Vec<&Participant>)> {
    let mut genders: Vec<&str> = Vec::new();
    for p in pool {
        if !genders.contains(&p.gender.as_str()) {
            genders.push(p.gender.as_str());
        }
    }
    if genders.len() != 2 {
        return None;
    }
    let (first, second) = (genders[0], genders[1]);

    let mut group_a = Vec::new();
    let mut group_b = Vec::new();
    for p in pool {
        if p.gender == first {
            if p.interested_in != second {
                return None;
            }
            group_a.push(p);
        } else {
            if p.interested_in != first {
                return None;
            }
            group_b.push(p);
        }
    }

    Some((group_a, group_b))
}

/// Classic round-robin: group A keeps its seats, group B shifts one
/// position per round (last member moves to the front).
fn rotation_assignment(
    stationary: &[&Participant],
    rotating: &[&Participant],
    round: u32,
    formed_at: DateTime<Utc>,
) -> RoundAssignment {
    let n = rotating.len();
    let shift = (round.saturating_sub(1) as usize) % n.max(1);

    let rotated: Vec<&Participant> = (0..n)
        .map(|i| rotating[(i + n - shift) % n])
        .collect();

    let seats = stationary.len().min(n);
    let pairs = (0..seats)
        .map(|i| Pair {
            left: stationary[i].clone(),
            right: rotated[i].clone(),
            round_number: round,
            formed_at,
        })
        .collect();

    let mut waiting: Vec<Participant> = Vec::new();
    waiting.extend(stationary.iter().skip(seats).map(|p| (*p).clone()));
    waiting.extend(rotated.iter().skip(seats).map(|p| (*p).clone()));

    RoundAssignment { pairs, waiting }
}

/// Fallback for pools that do not decompose into two groups: walk the
/// pool in order and seat each participant with a compatible partner
/// they have not met this session, preferring whoever has had the
/// fewest rounds so far. Anyone left over waits out the round.
fn greedy_assignment(
    pool: &[Participant],
    round: u32,
    history: &PairingHistory,
    formed_at: DateTime<Utc>,
) -> RoundAssignment {
    let mut paired = vec![false; pool.len()];
    let mut pairs = Vec::new();

    for i in 0..pool.len() {
        if paired[i] {
            continue;
        }

        let mut best: Option<usize> = None;
        for (j, candidate) in pool.iter().enumerate() {
            if j == i || paired[j] {
                continue;
            }
            if !pool[i].compatible_with(candidate) || history.have_met(&pool[i].id, &candidate.id)
            {
                continue;
            }
            let better = match best {
                None => true,
                Some(k) => history.total_pairings(&candidate.id)
                    < history.total_pairings(&pool[k].id),
            };
            if better {
                best = Some(j);
            }
        }

        if let Some(j) = best {
            paired[i] = true;
            paired[j] = true;
            pairs.push(Pair {
                left: pool[i].clone(),
                right: pool[j].clone(),
                round_number: round,
                formed_at,
            });
        }
    }

    let waiting = pool
        .iter()
        .enumerate()
        .filter(|(i, _)| !paired[*i])
        .map(|(_, p)| p.clone())
        .collect();

    RoundAssignment { pairs, waiting }
}
