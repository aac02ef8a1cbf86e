// ==========================================
// Club Session Scheduler - time slot planner
// ==========================================
// Pure duration arithmetic: a session time window plus court/duration
// parameters becomes an ordered list of play rounds with clock times and
// utilization statistics. No side effects; exactly reproducible.
// ==========================================

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::engine::{EngineError, EngineResult};

const MINUTES_PER_DAY: i64 = 24 * 60;

// ==========================================
// ScheduleRequest - planner input
// ==========================================
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub start_time: NaiveTime,
    /// end <= start means the window crosses midnight (treated as +24h).
    pub end_time: NaiveTime,
    pub num_courts: u32,
    pub match_duration_minutes: i64,
    pub break_duration_minutes: i64,
    pub warmup_duration_minutes: i64,
}

// ==========================================
// SchedulePlan - planner output
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulePlan {
    pub total_duration_minutes: i64,
    pub warmup_end_time: NaiveTime,
    pub available_minutes: i64,
    pub max_rounds: u32,
    /// num_courts matches run simultaneously per round.
    pub matches_per_round: u32,
    pub total_matches: u32,
    pub rounds: Vec<PlannedRound>,
    /// Clock time after the last round's match slot.
    pub actual_end_time: NaiveTime,
    /// used / total * 100, rounded to one decimal.
    pub utilization_percent: f64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PlannedRound {
    pub round: u32,
    pub match_start: NaiveTime,
    pub match_end: NaiveTime,
    /// Absent after the final round.
    pub break_start: Option<NaiveTime>,
    pub break_end: Option<NaiveTime>,
}

// ==========================================
// TimeSlotPlanner
// ==========================================
pub struct TimeSlotPlanner;

impl TimeSlotPlanner {
    /// Plan the round structure of a session window.
    ///
    /// `available = (end - start) - warmup`; zero rounds when nothing fits,
    /// otherwise `max_rounds = (available + break) / (match + break)` with a
    /// floor of one round whenever a single match duration fits.
    pub fn plan(req: &ScheduleRequest) -> EngineResult<SchedulePlan> {
        Self::validate(req)?;

        let total = Self::window_minutes(req.start_time, req.end_time);
        let available = total - req.warmup_duration_minutes;

        let match_min = req.match_duration_minutes;
        let break_min = req.break_duration_minutes;

        let max_rounds = if available <= 0 {
            0
        } else {
            let by_formula = (available + break_min) / (match_min + break_min);
            if by_formula == 0 && available >= match_min {
                1
            } else {
                by_formula
            }
        };
        let max_rounds = u32::try_from(max_rounds.max(0)).unwrap_or(0);

        let warmup_end = req.start_time + Duration::minutes(req.warmup_duration_minutes);

        let mut rounds = Vec::with_capacity(max_rounds as usize);
        let mut clock = warmup_end;
        let mut actual_end = warmup_end;

        for round in 1..=max_rounds {
            let match_start = clock;
            let match_end = match_start + Duration::minutes(match_min);
            actual_end = match_end;

            let (break_start, break_end) = if round < max_rounds {
                let bs = match_end;
                let be = bs + Duration::minutes(break_min);
                clock = be;
                (Some(bs), Some(be))
            } else {
                clock = match_end;
                (None, None)
            };

            rounds.push(PlannedRound {
                round,
                match_start,
                match_end,
                break_start,
                break_end,
            });
        }

        let used = if max_rounds == 0 {
            0
        } else {
            req.warmup_duration_minutes
                + i64::from(max_rounds) * match_min
                + i64::from(max_rounds - 1) * break_min
        };
        let utilization = if total > 0 {
            ((used as f64) / (total as f64) * 1000.0).round() / 10.0
        } else {
            0.0
        };

        Ok(SchedulePlan {
            total_duration_minutes: total,
            warmup_end_time: warmup_end,
            available_minutes: available,
            max_rounds,
            matches_per_round: req.num_courts,
            total_matches: max_rounds * req.num_courts,
            rounds,
            actual_end_time: actual_end,
            utilization_percent: utilization,
        })
    }

    /// Minutes between two same-day clock times, wrapping past midnight
    /// when end <= start.
    pub fn window_minutes(start: NaiveTime, end: NaiveTime) -> i64 {
        let diff = (end - start).num_minutes();
        if diff <= 0 {
            diff + MINUTES_PER_DAY
        } else {
            diff
        }
    }

    fn validate(req: &ScheduleRequest) -> EngineResult<()> {
        if req.num_courts == 0 {
            return Err(EngineError::InvalidInput(
                "num_courts must be at least 1".to_string(),
            ));
        }
        if req.match_duration_minutes <= 0 {
            return Err(EngineError::InvalidInput(
                "match_duration_minutes must be positive".to_string(),
            ));
        }
        if req.break_duration_minutes < 0 || req.warmup_duration_minutes < 0 {
            return Err(EngineError::InvalidInput(
                "break/warmup durations must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn req(start: NaiveTime, end: NaiveTime) -> ScheduleRequest {
        ScheduleRequest {
            start_time: start,
            end_time: end,
            num_courts: 4,
            match_duration_minutes: 30,
            break_duration_minutes: 5,
            warmup_duration_minutes: 10,
        }
    }

    #[test]
    fn test_reference_window() {
        // 09:00-12:00, 4 courts, 30/5/10
        let plan = TimeSlotPlanner::plan(&req(t(9, 0), t(12, 0))).unwrap();

        assert_eq!(plan.total_duration_minutes, 180);
        assert_eq!(plan.available_minutes, 170);
        assert_eq!(plan.max_rounds, 5);
        assert_eq!(plan.matches_per_round, 4);
        assert_eq!(plan.total_matches, 20);
        assert_eq!(plan.warmup_end_time, t(9, 10));

        // rounds: 09:10 + 5*(30) + 4*(5) = 09:10 + 170 = 12:00
        assert_eq!(plan.actual_end_time, t(12, 0));
        assert_eq!(plan.rounds.len(), 5);
        assert_eq!(plan.rounds[0].match_start, t(9, 10));
        assert_eq!(plan.rounds[0].match_end, t(9, 40));
        assert_eq!(plan.rounds[0].break_end, Some(t(9, 45)));
        assert!(plan.rounds[4].break_start.is_none());

        // used = 10 + 150 + 20 = 180 of 180
        assert!((plan.utilization_percent - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_plan_is_reproducible() {
        let a = TimeSlotPlanner::plan(&req(t(19, 0), t(22, 0))).unwrap();
        let b = TimeSlotPlanner::plan(&req(t(19, 0), t(22, 0))).unwrap();
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn test_window_crossing_midnight() {
        // 22:00 -> 01:00 is a 3 hour window
        assert_eq!(TimeSlotPlanner::window_minutes(t(22, 0), t(1, 0)), 180);
        let plan = TimeSlotPlanner::plan(&req(t(22, 0), t(1, 0))).unwrap();
        assert_eq!(plan.total_duration_minutes, 180);
        assert_eq!(plan.max_rounds, 5);
    }

    #[test]
    fn test_equal_start_end_is_full_day() {
        assert_eq!(TimeSlotPlanner::window_minutes(t(9, 0), t(9, 0)), 24 * 60);
    }

    #[test]
    fn test_warmup_consumes_entire_window() {
        let mut r = req(t(9, 0), t(9, 30));
        r.warmup_duration_minutes = 30;
        let plan = TimeSlotPlanner::plan(&r).unwrap();
        assert_eq!(plan.max_rounds, 0);
        assert_eq!(plan.total_matches, 0);
        assert!(plan.rounds.is_empty());
        assert_eq!(plan.utilization_percent, 0.0);
        // no rounds: the clock never advances past warmup
        assert_eq!(plan.actual_end_time, t(9, 30));
    }

    #[test]
    fn test_single_round_floor() {
        // available = 35, match 30, break 20: formula gives 0, floor gives 1
        let r = ScheduleRequest {
            start_time: t(9, 0),
            end_time: t(9, 45),
            num_courts: 2,
            match_duration_minutes: 30,
            break_duration_minutes: 20,
            warmup_duration_minutes: 10,
        };
        let plan = TimeSlotPlanner::plan(&r).unwrap();
        assert_eq!(plan.available_minutes, 35);
        assert_eq!(plan.max_rounds, 1);
        assert_eq!(plan.total_matches, 2);
        assert_eq!(plan.actual_end_time, t(9, 40));
    }

    #[test]
    fn test_utilization_rounding() {
        // total 100, used = 10 + 2*30 + 5 = 75 -> 75.0
        let r = ScheduleRequest {
            start_time: t(9, 0),
            end_time: t(10, 40),
            num_courts: 1,
            match_duration_minutes: 30,
            break_duration_minutes: 5,
            warmup_duration_minutes: 10,
        };
        let plan = TimeSlotPlanner::plan(&r).unwrap();
        assert_eq!(plan.max_rounds, 2);
        assert!((plan.utilization_percent - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let mut r = req(t(9, 0), t(12, 0));
        r.num_courts = 0;
        assert!(TimeSlotPlanner::plan(&r).is_err());

        let mut r = req(t(9, 0), t(12, 0));
        r.match_duration_minutes = 0;
        assert!(TimeSlotPlanner::plan(&r).is_err());

        let mut r = req(t(9, 0), t(12, 0));
        r.break_duration_minutes = -5;
        assert!(TimeSlotPlanner::plan(&r).is_err());
    }
}
