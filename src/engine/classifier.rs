// ==========================================
// Club Session Scheduler - participant classifier
// ==========================================
// Splits a session roster into match-type pools for the pairing
// algorithms. Gender and display name are always resolved through the
// participant reference (member / guest / associate), never assumed here.
// ==========================================

use crate::domain::session::SessionParticipant;
use crate::domain::types::{Gender, MatchType};

// ==========================================
// ClassifiedPools
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPools {
    pub mixed: Vec<SessionParticipant>,
    pub mens: Vec<SessionParticipant>,
    pub womens: Vec<SessionParticipant>,
    pub singles: Vec<SessionParticipant>,
}

impl ClassifiedPools {
    /// Split the mixed pool into gendered queues. Participants without a
    /// resolvable gender cannot be paired in mixed doubles and are returned
    /// separately (the generator silently excludes them).
    pub fn mixed_by_gender(
        &self,
    ) -> (
        Vec<SessionParticipant>,
        Vec<SessionParticipant>,
        Vec<SessionParticipant>,
    ) {
        let mut males = Vec::new();
        let mut females = Vec::new();
        let mut unknown = Vec::new();
        for p in &self.mixed {
            match p.participant.gender() {
                Some(Gender::Male) => males.push(p.clone()),
                Some(Gender::Female) => females.push(p.clone()),
                None => unknown.push(p.clone()),
            }
        }
        (males, females, unknown)
    }

    pub fn total(&self) -> usize {
        self.mixed.len() + self.mens.len() + self.womens.len() + self.singles.len()
    }
}

/// The match type a participant plays: a declared participation type wins;
/// without one, mens/womens doubles is inferred from gender, and a
/// participant with no gender on file falls back to mixed doubles.
pub fn effective_match_type(p: &SessionParticipant) -> MatchType {
    match p.participation_type {
        Some(t) => t,
        None => match p.participant.gender() {
            Some(Gender::Male) => MatchType::MensDoubles,
            Some(Gender::Female) => MatchType::WomensDoubles,
            None => MatchType::MixedDoubles,
        },
    }
}

/// Classify a roster into pools by effective match type.
pub fn classify_roster(roster: &[SessionParticipant]) -> ClassifiedPools {
    let mut pools = ClassifiedPools::default();

    for p in roster {
        match effective_match_type(p) {
            MatchType::MixedDoubles => pools.mixed.push(p.clone()),
            MatchType::MensDoubles => pools.mens.push(p.clone()),
            MatchType::WomensDoubles => pools.womens.push(p.clone()),
            MatchType::Singles => pools.singles.push(p.clone()),
        }
    }

    pools
}
