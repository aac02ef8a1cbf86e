// ==========================================
// Club Session Scheduler - round-robin match generator
// ==========================================
// Deterministically converts classified pools into a full match plan.
// Pools are shuffled exactly once with the caller's RNG, then consumed in
// strict priority order: mixed, mens, womens, singles. Leftovers that
// cannot fill a complete group are silently excluded.
// ==========================================

use std::collections::VecDeque;

use chrono::Duration;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::matches::{PlannedMatch, TeamSlots};
use crate::domain::session::{Session, SessionParticipant};
use crate::domain::types::MatchType;
use crate::engine::classifier::classify_roster;
use crate::engine::{EngineError, EngineResult};
use crate::tz;

/// Minimum roster size for any generation at all.
pub const MIN_ROSTER_SIZE: usize = 2;

// ==========================================
// RoundRobinGenerator
// ==========================================
pub struct RoundRobinGenerator;

impl RoundRobinGenerator {
    /// Generate the complete match plan for a session roster.
    ///
    /// Court assignment is cyclic over the session's courts; the scheduled
    /// instant advances one match+break block per court cycle, starting
    /// after warmup.
    pub fn generate<R: Rng>(
        session: &Session,
        roster: &[SessionParticipant],
        rng: &mut R,
    ) -> EngineResult<Vec<PlannedMatch>> {
        if roster.len() < MIN_ROSTER_SIZE {
            return Err(EngineError::RosterTooSmall {
                actual: roster.len(),
                minimum: MIN_ROSTER_SIZE,
            });
        }
        if session.num_courts == 0 {
            return Err(EngineError::InvalidInput(
                "session has no courts".to_string(),
            ));
        }

        let pools = classify_roster(roster);

        let (mixed_males, mixed_females, _mixed_unpairable) = pools.mixed_by_gender();
        let mut mixed_males = shuffled(mixed_males, rng);
        let mut mixed_females = shuffled(mixed_females, rng);
        let mut mens = shuffled(pools.mens, rng);
        let mut womens = shuffled(pools.womens, rng);
        let mut singles = shuffled(pools.singles, rng);

        let mut plan = Vec::new();
        let mut match_number: u32 = 0;

        // Pass 1: mixed doubles, one male + one female per team.
        while mixed_males.len() >= 2 && mixed_females.len() >= 2 {
            match_number += 1;
            let team_a = TeamSlots::doubles(
                pop(&mut mixed_males),
                pop(&mut mixed_females),
            );
            let team_b = TeamSlots::doubles(
                pop(&mut mixed_males),
                pop(&mut mixed_females),
            );
            plan.push(Self::emit(
                session,
                match_number,
                MatchType::MixedDoubles,
                team_a,
                team_b,
            ));
        }

        // Leftover mixed participants fall through to the gendered pools so
        // an all-male mixed-preference roster still plays mens doubles.
        for p in mixed_males.drain(..) {
            mens.push_back(p);
        }
        for p in mixed_females.drain(..) {
            womens.push_back(p);
        }

        // Pass 2: mens doubles, groups of four.
        while mens.len() >= 4 {
            match_number += 1;
            let team_a = TeamSlots::doubles(pop(&mut mens), pop(&mut mens));
            let team_b = TeamSlots::doubles(pop(&mut mens), pop(&mut mens));
            plan.push(Self::emit(
                session,
                match_number,
                MatchType::MensDoubles,
                team_a,
                team_b,
            ));
        }

        // Pass 3: womens doubles, groups of four.
        while womens.len() >= 4 {
            match_number += 1;
            let team_a = TeamSlots::doubles(pop(&mut womens), pop(&mut womens));
            let team_b = TeamSlots::doubles(pop(&mut womens), pop(&mut womens));
            plan.push(Self::emit(
                session,
                match_number,
                MatchType::WomensDoubles,
                team_a,
                team_b,
            ));
        }

        // Pass 4: singles pairs.
        while singles.len() >= 2 {
            match_number += 1;
            let team_a = TeamSlots::singles(pop(&mut singles));
            let team_b = TeamSlots::singles(pop(&mut singles));
            plan.push(Self::emit(
                session,
                match_number,
                MatchType::Singles,
                team_a,
                team_b,
            ));
        }

        Ok(plan)
    }

    fn emit(
        session: &Session,
        match_number: u32,
        match_type: MatchType,
        team_a: TeamSlots,
        team_b: TeamSlots,
    ) -> PlannedMatch {
        let court_number = (match_number - 1) % session.num_courts + 1;
        let round_index = i64::from((match_number - 1) / session.num_courts);

        let base = tz::local_date_time_to_utc(session.session_date, session.start_time);
        let offset_minutes = session.warmup_minutes()
            + round_index * (session.match_duration_minutes + session.break_minutes());

        PlannedMatch {
            match_number,
            court_number,
            match_type,
            scheduled_at: base + Duration::minutes(offset_minutes),
            team_a,
            team_b,
        }
    }
}

fn shuffled<R: Rng>(mut pool: Vec<SessionParticipant>, rng: &mut R) -> VecDeque<SessionParticipant> {
    pool.shuffle(rng);
    pool.into()
}

fn pop(queue: &mut VecDeque<SessionParticipant>) -> crate::domain::session::ParticipantRef {
    queue
        .pop_front()
        .map(|p| p.participant)
        .expect("caller checked queue length")
}
