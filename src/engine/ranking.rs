// ==========================================
// Club Session Scheduler - ranking aggregation
// ==========================================
// From-scratch tally over a scope's completed match results. The output is
// keyed and ordered by member id, so permuting the processed-match order
// never changes the result.
// ==========================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::ranking::MemberTally;
use crate::domain::types::Team;

// ==========================================
// CompletedMatch - aggregation input
// ==========================================
// One completed match with a persisted result, reduced to the club-member
// ids on each team. Guests and associates are filtered out before this
// point; rankings key on club-member identity only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletedMatch {
    pub match_id: i64,
    pub team_a_member_ids: Vec<i64>,
    pub team_b_member_ids: Vec<i64>,
    pub winner_team: Option<Team>,
}

/// Aggregate win/loss/draw tallies for every implicated member.
///
/// Winner-team members get a win, the opposing members a loss; a match
/// without a winner is a draw for everyone. Every implicated member is
/// counted toward total matches.
pub fn aggregate_results(matches: &[CompletedMatch]) -> BTreeMap<i64, MemberTally> {
    let mut tallies: BTreeMap<i64, MemberTally> = BTreeMap::new();

    for m in matches {
        match m.winner_team {
            Some(Team::A) => {
                bump(&mut tallies, &m.team_a_member_ids, |t| t.wins += 1);
                bump(&mut tallies, &m.team_b_member_ids, |t| t.losses += 1);
            }
            Some(Team::B) => {
                bump(&mut tallies, &m.team_b_member_ids, |t| t.wins += 1);
                bump(&mut tallies, &m.team_a_member_ids, |t| t.losses += 1);
            }
            None => {
                bump(&mut tallies, &m.team_a_member_ids, |t| t.draws += 1);
                bump(&mut tallies, &m.team_b_member_ids, |t| t.draws += 1);
            }
        }
    }

    tallies
}

fn bump<F: Fn(&mut MemberTally)>(
    tallies: &mut BTreeMap<i64, MemberTally>,
    member_ids: &[i64],
    apply: F,
) {
    for id in member_ids {
        let tally = tallies.entry(*id).or_default();
        apply(tally);
        tally.total_matches += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(id: i64, a: Vec<i64>, b: Vec<i64>, winner: Option<Team>) -> CompletedMatch {
        CompletedMatch {
            match_id: id,
            team_a_member_ids: a,
            team_b_member_ids: b,
            winner_team: winner,
        }
    }

    #[test]
    fn test_win_loss_and_draw_tallies() {
        let matches = vec![
            m(1, vec![1, 2], vec![3, 4], Some(Team::A)),
            m(2, vec![1, 3], vec![2, 4], None),
        ];
        let tallies = aggregate_results(&matches);

        let one = tallies[&1];
        assert_eq!(one.wins, 1);
        assert_eq!(one.draws, 1);
        assert_eq!(one.losses, 0);
        assert_eq!(one.total_matches, 2);
        assert_eq!(one.points(), 4);

        let four = tallies[&4];
        assert_eq!(four.wins, 0);
        assert_eq!(four.draws, 1);
        assert_eq!(four.losses, 1);
        assert_eq!(four.points(), 1);
    }

    #[test]
    fn test_order_independence() {
        let mut matches = vec![
            m(1, vec![1, 2], vec![3, 4], Some(Team::A)),
            m(2, vec![1, 3], vec![2, 4], Some(Team::B)),
            m(3, vec![1, 4], vec![2, 3], None),
            m(4, vec![2, 4], vec![1, 3], Some(Team::A)),
        ];
        let forward = aggregate_results(&matches);
        matches.reverse();
        let backward = aggregate_results(&matches);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_empty_history() {
        assert!(aggregate_results(&[]).is_empty());
    }

    #[test]
    fn test_singles_match_tallies() {
        let tallies = aggregate_results(&[m(1, vec![7], vec![8], Some(Team::B))]);
        assert_eq!(tallies[&8].wins, 1);
        assert_eq!(tallies[&7].losses, 1);
    }
}
