use serde::{Deserialize, Serialize};

/// A checked-in event participant, as loaded from the registration store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: String,
    pub name: String,
    pub gender: String,
    #[serde(rename = "interestedIn")]
    pub interested_in: String,
    pub age: u8,
    #[serde(rename = "checkedIn", default = "default_true")]
    pub checked_in: bool,
}

fn default_true() -> bool {
    true
}

impl Participant {
    /// Mutual-interest compatibility check. Symmetric by construction:
    /// each side's interest category must match the other's gender, and
    /// self-pairing is never allowed.
    pub fn compatible_with(&self, other: &Participant) -> bool {
        self.id != other.id
            && self.interested_in == other.gender
            && other.interested_in == self.gender
    }
}

/// Two participants seated together for one round. Unordered; a new round
/// produces new Pair values rather than mutating old ones.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pair {
    pub left: Participant,
    pub right: Participant,
    #[serde(rename = "roundNumber")]
    pub round_number: u32,
    #[serde(rename = "formedAt")]
    pub formed_at: chrono::DateTime<chrono::Utc>,
}

impl Pair {
    pub fn contains(&self, participant_id: &str) -> bool {
        self.left.id == participant_id || self.right.id == participant_id
    }

    /// The other member of the pair, if `participant_id` is in it.
    pub fn partner_of(&self, participant_id: &str) -> Option<&Participant> {
        if self.left.id == participant_id {
            Some(&self.right)
        } else if self.right.id == participant_id {
            Some(&self.left)
        } else {
            None
        }
    }
}

/// Interest level one participant records about a partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RatingValue {
    NotInterested,
    Maybe,
    Interested,
}

/// One participant's recorded interest in one partner, scoped to an event.
/// Keyed by the ordered (rater, ratee) pair; resubmission overwrites.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    #[serde(rename = "raterId")]
    pub rater_id: String,
    #[serde(rename = "rateeId")]
    pub ratee_id: String,
    #[serde(rename = "eventId")]
    pub event_id: String,
    pub rating: RatingValue,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// How far along a pair is with rating each other, any value counting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RatingStatus {
    Both,
    Partial,
    None,
}

/// A derived mutual match: both sides rated each other `interested`.
/// Ids are stored in sorted order so each unordered pair appears once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutualMatch {
    #[serde(rename = "participantA")]
    pub participant_a: String,
    #[serde(rename = "participantB")]
    pub participant_b: String,
}

impl MutualMatch {
    pub fn new(a: &str, b: &str) -> Self {
        let (participant_a, participant_b) = if a <= b {
            (a.to_string(), b.to_string())
        } else {
            (b.to_string(), a.to_string())
        };
        Self {
            participant_a,
            participant_b,
        }
    }
}

/// Lifecycle status of an event in the external store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

/// Event document as read from the external store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: String,
    pub title: String,
    pub status: EventStatus,
}
