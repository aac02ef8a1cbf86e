// ==========================================
// Club Session Scheduler - domain type definitions
// ==========================================
// Serialization format: snake_case (matches the database and wire format)
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// Gender
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "male"),
            Gender::Female => write!(f, "female"),
        }
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Gender::Male),
            "female" => Ok(Gender::Female),
            other => Err(format!("unknown gender: {other}")),
        }
    }
}

// ==========================================
// Session lifecycle status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Draft,
    Confirmed,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::Draft => write!(f, "draft"),
            SessionStatus::Confirmed => write!(f, "confirmed"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SessionStatus::Draft),
            "confirmed" => Ok(SessionStatus::Confirmed),
            "completed" => Ok(SessionStatus::Completed),
            other => Err(format!("unknown session status: {other}")),
        }
    }
}

// ==========================================
// Participant category
// ==========================================
// Three kinds of entity can appear on a roster. The category tag mirrors
// which variant of ParticipantRef backs the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantCategory {
    /// Club member (joined the club)
    Member,
    /// Guest (not registered in the system)
    Guest,
    /// Associate (registered user, not a club member)
    Associate,
}

impl fmt::Display for ParticipantCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParticipantCategory::Member => write!(f, "member"),
            ParticipantCategory::Guest => write!(f, "guest"),
            ParticipantCategory::Associate => write!(f, "associate"),
        }
    }
}

impl FromStr for ParticipantCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(ParticipantCategory::Member),
            "guest" => Ok(ParticipantCategory::Guest),
            "associate" => Ok(ParticipantCategory::Associate),
            other => Err(format!("unknown participant category: {other}")),
        }
    }
}

// ==========================================
// Match type
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Singles,
    MensDoubles,
    WomensDoubles,
    MixedDoubles,
}

impl MatchType {
    /// Players per team (1 for singles, 2 for any doubles type).
    pub fn team_size(self) -> usize {
        match self {
            MatchType::Singles => 1,
            _ => 2,
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchType::Singles => write!(f, "singles"),
            MatchType::MensDoubles => write!(f, "mens_doubles"),
            MatchType::WomensDoubles => write!(f, "womens_doubles"),
            MatchType::MixedDoubles => write!(f, "mixed_doubles"),
        }
    }
}

impl FromStr for MatchType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singles" => Ok(MatchType::Singles),
            "mens_doubles" => Ok(MatchType::MensDoubles),
            "womens_doubles" => Ok(MatchType::WomensDoubles),
            "mixed_doubles" => Ok(MatchType::MixedDoubles),
            other => Err(format!("unknown match type: {other}")),
        }
    }
}

// ==========================================
// Match lifecycle status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    Scheduled,
    InProgress,
    Completed,
}

impl fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStatus::Scheduled => write!(f, "scheduled"),
            MatchStatus::InProgress => write!(f, "in_progress"),
            MatchStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for MatchStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(MatchStatus::Scheduled),
            "in_progress" => Ok(MatchStatus::InProgress),
            "completed" => Ok(MatchStatus::Completed),
            other => Err(format!("unknown match status: {other}")),
        }
    }
}

// ==========================================
// Team tag
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    A,
    B,
}

impl Team {
    /// The opposing team.
    pub fn opponent(self) -> Team {
        match self {
            Team::A => Team::B,
            Team::B => Team::A,
        }
    }
}

impl fmt::Display for Team {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Team::A => write!(f, "A"),
            Team::B => write!(f, "B"),
        }
    }
}

impl FromStr for Team {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Team::A),
            "B" => Ok(Team::B),
            other => Err(format!("unknown team tag: {other}")),
        }
    }
}

// ==========================================
// Member role / status (membership gate)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Manager,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberRole::Member => write!(f, "member"),
            MemberRole::Manager => write!(f, "manager"),
        }
    }
}

impl FromStr for MemberRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(MemberRole::Member),
            "manager" => Ok(MemberRole::Manager),
            other => Err(format!("unknown member role: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    Pending,
    Active,
    Inactive,
}

impl fmt::Display for MemberStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MemberStatus::Pending => write!(f, "pending"),
            MemberStatus::Active => write!(f, "active"),
            MemberStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl FromStr for MemberStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MemberStatus::Pending),
            "active" => Ok(MemberStatus::Active),
            "inactive" => Ok(MemberStatus::Inactive),
            other => Err(format!("unknown member status: {other}")),
        }
    }
}

// ==========================================
// Season status
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    Upcoming,
    Active,
    Completed,
}

impl SeasonStatus {
    /// Derive the status from the season window relative to `today`.
    pub fn from_dates(
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        today: chrono::NaiveDate,
    ) -> Self {
        if start > today {
            SeasonStatus::Upcoming
        } else if end < today {
            SeasonStatus::Completed
        } else {
            SeasonStatus::Active
        }
    }
}

impl fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeasonStatus::Upcoming => write!(f, "upcoming"),
            SeasonStatus::Active => write!(f, "active"),
            SeasonStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SeasonStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upcoming" => Ok(SeasonStatus::Upcoming),
            "active" => Ok(SeasonStatus::Active),
            "completed" => Ok(SeasonStatus::Completed),
            other => Err(format!("unknown season status: {other}")),
        }
    }
}
