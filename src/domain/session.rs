// ==========================================
// Club Session Scheduler - session domain model
// ==========================================
// A session is one scheduled block of club play: a time window, a court
// count, duration parameters and a roster of participants.
// ==========================================

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::domain::types::{Gender, ParticipantCategory, MatchType, SessionStatus};

// ==========================================
// Session
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub club_id: i64,
    pub season_id: Option<i64>,
    pub session_date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub num_courts: u32,
    pub match_duration_minutes: i64,
    pub break_duration_minutes: Option<i64>,
    pub warmup_duration_minutes: Option<i64>,
    pub status: SessionStatus,
}

impl Session {
    /// Break duration with the stored NULL treated as zero.
    pub fn break_minutes(&self) -> i64 {
        self.break_duration_minutes.unwrap_or(0)
    }

    /// Warmup duration with the stored NULL treated as zero.
    pub fn warmup_minutes(&self) -> i64 {
        self.warmup_duration_minutes.unwrap_or(0)
    }
}

// ==========================================
// ParticipantRef - tagged participant reference
// ==========================================
// Exactly one underlying entity backs a roster or match slot. The variants
// replace the three nullable foreign keys of the storage rows, so callers
// resolve display name and gender through one capability instead of
// null-checking columns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ParticipantRef {
    Member {
        club_member_id: i64,
        name: String,
        gender: Gender,
    },
    Guest {
        guest_id: i64,
        name: String,
        gender: Gender,
    },
    Associate {
        user_id: i64,
        name: String,
        // Associates self-register; gender is not always on file.
        gender: Option<Gender>,
    },
}

impl ParticipantRef {
    pub fn category(&self) -> ParticipantCategory {
        match self {
            ParticipantRef::Member { .. } => ParticipantCategory::Member,
            ParticipantRef::Guest { .. } => ParticipantCategory::Guest,
            ParticipantRef::Associate { .. } => ParticipantCategory::Associate,
        }
    }

    /// Display name, suffixed for non-member categories the way rosters
    /// are shown to managers.
    pub fn display_name(&self) -> String {
        match self {
            ParticipantRef::Member { name, .. } => name.clone(),
            ParticipantRef::Guest { name, .. } => format!("{name} (guest)"),
            ParticipantRef::Associate { name, .. } => format!("{name} (associate)"),
        }
    }

    /// Gender, when known. Associates may not have one on file.
    pub fn gender(&self) -> Option<Gender> {
        match self {
            ParticipantRef::Member { gender, .. } | ParticipantRef::Guest { gender, .. } => {
                Some(*gender)
            }
            ParticipantRef::Associate { gender, .. } => *gender,
        }
    }

    /// Club member id when the participant is a member; rankings key on this.
    pub fn club_member_id(&self) -> Option<i64> {
        match self {
            ParticipantRef::Member { club_member_id, .. } => Some(*club_member_id),
            _ => None,
        }
    }

    /// Id of the underlying entity, unique within its category.
    pub fn entity_id(&self) -> i64 {
        match self {
            ParticipantRef::Member { club_member_id, .. } => *club_member_id,
            ParticipantRef::Guest { guest_id, .. } => *guest_id,
            ParticipantRef::Associate { user_id, .. } => *user_id,
        }
    }
}

// ==========================================
// SessionParticipant - one roster entry
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionParticipant {
    pub id: i64,
    pub session_id: i64,
    pub participant: ParticipantRef,
    /// Declared match-type preference; None means "infer from gender".
    pub participation_type: Option<MatchType>,
}
