//! Splitting roster rows into physical pages.

use std::collections::BTreeMap;

use crate::models::{Division, RosterRow, RosterSlot};

/// Week 1 row height bounds, in points.
pub const WEEK1_MIN_ROW_HEIGHT: f32 = 24.0;
pub const WEEK1_MAX_ROW_HEIGHT: f32 = 44.0;

/// Week 2 row height bounds, in points.
pub const WEEK2_MIN_ROW_HEIGHT: f32 = 9.0;
pub const WEEK2_MAX_ROW_HEIGHT: f32 = 22.0;

/// Divisions drawn on one week 2 page.
pub const DIVISIONS_PER_PAGE: usize = 3;

/// A week 1 session/court pairing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotKey {
    pub session: u32,
    pub court: u32,
}

/// One physical week 1 page.
#[derive(Debug, Clone, PartialEq)]
pub struct Week1Page {
    pub key: SlotKey,
    pub rows: Vec<RosterRow>,
    /// 0 for the first page of a slot, 1.. for continuations
    pub part: usize,
}

/// Every scheduled session × court, plus any slot present in the data.
pub fn group_week1(rows: &[RosterRow], sessions: u32, courts: u32) -> BTreeMap<SlotKey, Vec<RosterRow>> {
    let mut groups: BTreeMap<SlotKey, Vec<RosterRow>> = BTreeMap::new();
    for session in 1..=sessions {
        for court in 1..=courts {
            groups.insert(SlotKey { session, court }, Vec::new());
        }
    }
    for row in rows {
        if let RosterSlot::Week1 { session, court } = row.slot {
            groups
                .entry(SlotKey { session, court })
                .or_default()
                .push(row.clone());
        }
    }
    groups
}

/// Shared row height for a grid whose largest group has `max_rows` rows.
pub fn row_height(max_rows: usize, available: f32, min: f32, max: f32) -> f32 {
    if max_rows == 0 {
        return max;
    }
    (available / max_rows as f32).clamp(min, max)
}

/// Rows that fit in `available` points at `height` per row.
pub fn capacity(available: f32, height: f32) -> usize {
    // Tolerate rounding when `height` was derived from `available`
    ((available / height + 1e-3).floor() as usize).max(1)
}

/// Lay week 1 groups out as pages, continuing overfull groups on extra
/// pages. Returns the shared row height and the pages in slot order.
pub fn paginate_week1(groups: &BTreeMap<SlotKey, Vec<RosterRow>>, available: f32) -> (f32, Vec<Week1Page>) {
    let max_rows = groups.values().map(Vec::len).max().unwrap_or(0);
    let height = row_height(max_rows, available, WEEK1_MIN_ROW_HEIGHT, WEEK1_MAX_ROW_HEIGHT);
    let per_page = capacity(available, height);

    let mut pages = Vec::new();
    for (key, rows) in groups {
        if rows.is_empty() {
            pages.push(Week1Page {
                key: *key,
                rows: Vec::new(),
                part: 0,
            });
            continue;
        }
        for (part, chunk) in rows.chunks(per_page).enumerate() {
            pages.push(Week1Page {
                key: *key,
                rows: chunk.to_vec(),
                part,
            });
        }
    }
    (height, pages)
}

/// Week 2 session in which a provisional team plays: teams 1-2 in
/// session 1, 3-4 in session 2, and so on.
pub fn session_for_team(team: u32) -> u32 {
    team.div_ceil(2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MatchupKey {
    pub session: u32,
    pub level: i64,
    pub division_id: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TeamRoster {
    pub team: u32,
    pub rows: Vec<RosterRow>,
}

/// Two provisional teams of one division facing each other in a session.
#[derive(Debug, Clone, PartialEq)]
pub struct Matchup {
    pub key: MatchupKey,
    pub division_name: String,
    /// Odd-numbered team
    pub left: TeamRoster,
    /// Even-numbered team
    pub right: TeamRoster,
}

impl Matchup {
    pub fn row_count(&self) -> usize {
        self.left.rows.len() + self.right.rows.len()
    }

    pub fn max_team_rows(&self) -> usize {
        self.left.rows.len().max(self.right.rows.len())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Week2Page {
    pub session: u32,
    pub matchups: Vec<Matchup>,
    /// 0 for the first page of a session's divisions, 1.. for continuations
    pub part: usize,
}

impl Week2Page {
    pub fn max_team_rows(&self) -> usize {
        self.matchups.iter().map(Matchup::max_team_rows).max().unwrap_or(0)
    }

    pub fn rows(&self) -> impl Iterator<Item = &RosterRow> {
        self.matchups
            .iter()
            .flat_map(|m| m.left.rows.iter().chain(m.right.rows.iter()))
    }
}

/// Group week 2 rows into per-session pages of up to three divisions.
///
/// Divisions are ordered by level; those from `divisions` always get a
/// band so layouts stay stable. Pages without any rows are skipped.
pub fn group_week2(rows: &[RosterRow], divisions: &[Division]) -> Vec<Week2Page> {
    let mut names: BTreeMap<(i64, i64), String> = divisions
        .iter()
        .map(|d| ((d.level, d.id), d.name.clone()))
        .collect();
    let mut teams: BTreeMap<MatchupKey, BTreeMap<u32, Vec<RosterRow>>> = BTreeMap::new();

    for row in rows {
        if let RosterSlot::Week2 {
            division_id,
            division_name,
            division_level,
            team,
        } = &row.slot
        {
            names
                .entry((*division_level, *division_id))
                .or_insert_with(|| division_name.clone());
            let key = MatchupKey {
                session: session_for_team(*team),
                level: *division_level,
                division_id: *division_id,
            };
            teams
                .entry(key)
                .or_default()
                .entry(*team)
                .or_default()
                .push(row.clone());
        }
    }

    let ordered: Vec<((i64, i64), String)> = names.into_iter().collect();
    let mut sessions: Vec<u32> = teams.keys().map(|k| k.session).collect();
    sessions.dedup();

    let mut pages = Vec::new();
    for session in sessions {
        for chunk in ordered.chunks(DIVISIONS_PER_PAGE) {
            let matchups: Vec<Matchup> = chunk
                .iter()
                .map(|((level, division_id), name)| {
                    let key = MatchupKey {
                        session,
                        level: *level,
                        division_id: *division_id,
                    };
                    let mut left = TeamRoster {
                        team: (2 * session).saturating_sub(1),
                        rows: Vec::new(),
                    };
                    let mut right = TeamRoster {
                        team: 2 * session,
                        rows: Vec::new(),
                    };
                    for (team, team_rows) in teams.remove(&key).unwrap_or_default() {
                        let side = if team % 2 == 1 { &mut left } else { &mut right };
                        side.rows.extend(team_rows);
                    }
                    Matchup {
                        key,
                        division_name: name.clone(),
                        left,
                        right,
                    }
                })
                .collect();

            if matchups.iter().any(|m| m.row_count() > 0) {
                pages.push(Week2Page {
                    session,
                    matchups,
                    part: 0,
                });
            }
        }
    }
    pages
}

fn team_slice(team: &TeamRoster, part: usize, per_band: usize) -> TeamRoster {
    TeamRoster {
        team: team.team,
        rows: team.rows.iter().skip(part * per_band).take(per_band).cloned().collect(),
    }
}

/// Split week 2 pages whose largest team does not fit a band of
/// `available` points at the minimum row height. Continuation pages keep
/// only the matchups that still have rows to show.
pub fn paginate_week2(pages: Vec<Week2Page>, available: f32) -> Vec<Week2Page> {
    let per_band = capacity(available, WEEK2_MIN_ROW_HEIGHT);
    let mut out = Vec::with_capacity(pages.len());
    for page in pages {
        let max_rows = page.max_team_rows();
        if max_rows <= per_band {
            out.push(page);
            continue;
        }
        for part in 0..max_rows.div_ceil(per_band) {
            let matchups: Vec<Matchup> = page
                .matchups
                .iter()
                .map(|m| Matchup {
                    key: m.key,
                    division_name: m.division_name.clone(),
                    left: team_slice(&m.left, part, per_band),
                    right: team_slice(&m.right, part, per_band),
                })
                .filter(|m| part == 0 || m.row_count() > 0)
                .collect();
            out.push(Week2Page {
                session: page.session,
                matchups,
                part,
            });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::roster::{week1_row, week2_row};
    use proptest::prelude::*;

    fn division(id: i64, level: i64) -> Division {
        Division {
            id,
            season_id: 1,
            name: format!("Division {}", level),
            level,
        }
    }

    #[test]
    fn test_week1_groups_include_empty_slots() {
        let rows = vec![week1_row(1, 1, 2, "Ann"), week1_row(2, 3, 1, "Bo")];
        let groups = group_week1(&rows, 2, 2);
        // 2x2 scheduled plus the unscheduled session 3
        assert_eq!(groups.len(), 5);
        assert!(groups[&SlotKey { session: 1, court: 1 }].is_empty());
        assert_eq!(groups[&SlotKey { session: 3, court: 1 }].len(), 1);
    }

    #[test]
    fn test_forty_rows_with_missing_court_make_eight_pages() {
        let occupied: Vec<(u32, u32)> = (1..=2)
            .flat_map(|s| (1..=4).map(move |c| (s, c)))
            .filter(|&slot| slot != (2, 3))
            .collect();
        let rows: Vec<RosterRow> = (0..40)
            .map(|i| {
                let (session, court) = occupied[i % occupied.len()];
                week1_row(i as i64, session, court, "Player")
            })
            .collect();

        let groups = group_week1(&rows, 2, 4);
        let (height, pages) = paginate_week1(&groups, 460.0);
        assert_eq!(pages.len(), 8);
        assert!(pages.iter().any(|p| p.rows.is_empty()));
        assert_eq!(pages.iter().map(|p| p.rows.len()).sum::<usize>(), 40);
        assert_eq!(height, WEEK1_MAX_ROW_HEIGHT);
    }

    #[test]
    fn test_overfull_slot_continues() {
        let rows: Vec<RosterRow> = (0..30).map(|i| week1_row(i, 1, 1, "P")).collect();
        let groups = group_week1(&rows, 1, 1);
        let (height, pages) = paginate_week1(&groups, 460.0);
        assert_eq!(height, WEEK1_MIN_ROW_HEIGHT);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].rows.len(), 19);
        assert_eq!(pages[1].part, 1);
    }

    #[test]
    fn test_row_height_clamps() {
        assert_eq!(row_height(2, 460.0, 24.0, 44.0), 44.0);
        assert_eq!(row_height(100, 460.0, 24.0, 44.0), 24.0);
        assert_eq!(row_height(0, 460.0, 24.0, 44.0), 44.0);
        assert!((row_height(15, 450.0, 24.0, 44.0) - 30.0).abs() < 0.001);
    }

    #[test]
    fn test_session_for_team() {
        assert_eq!(session_for_team(1), 1);
        assert_eq!(session_for_team(2), 1);
        assert_eq!(session_for_team(3), 2);
        assert_eq!(session_for_team(6), 3);
    }

    #[test]
    fn test_week2_pages_pair_teams_by_session() {
        let rows = vec![
            week2_row(1, 10, 1, 1),
            week2_row(2, 10, 1, 2),
            week2_row(3, 10, 1, 3),
            week2_row(4, 20, 2, 4),
        ];
        let divisions = vec![division(10, 1), division(20, 2)];
        let pages = group_week2(&rows, &divisions);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].session, 1);
        assert_eq!(pages[0].matchups.len(), 2);
        let first = &pages[0].matchups[0];
        assert_eq!((first.left.team, first.right.team), (1, 2));
        assert_eq!(first.left.rows[0].user_id, 1);
        assert_eq!(first.right.rows[0].user_id, 2);
        assert_eq!(pages[0].matchups[1].row_count(), 0);

        assert_eq!(pages[1].session, 2);
        assert_eq!(pages[1].matchups[0].left.rows[0].user_id, 3);
        assert_eq!(pages[1].matchups[1].right.rows[0].user_id, 4);
    }

    #[test]
    fn test_week2_splits_divisions_across_pages() {
        let divisions: Vec<Division> = (1..=4).map(|l| division(l * 10, l)).collect();
        let rows: Vec<RosterRow> = (1..=4).map(|l| week2_row(l, l * 10, l, 1)).collect();
        let pages = group_week2(&rows, &divisions);
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].matchups.len(), 3);
        assert_eq!(pages[1].matchups.len(), 1);
        assert_eq!(pages[1].matchups[0].division_name, "Division 4");
    }

    #[test]
    fn test_week2_overfull_team_continues() {
        let divisions = vec![division(10, 1), division(20, 2)];
        let mut rows: Vec<RosterRow> = (0..16).map(|i| week2_row(i, 10, 1, 1)).collect();
        rows.push(week2_row(100, 20, 2, 2));
        let pages = paginate_week2(group_week2(&rows, &divisions), 13.0 * WEEK2_MIN_ROW_HEIGHT);

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].part, 0);
        assert_eq!(pages[0].matchups.len(), 2);
        assert_eq!(pages[0].matchups[0].left.rows.len(), 13);
        assert_eq!(pages[1].part, 1);
        // Only the division with rows left continues
        assert_eq!(pages[1].matchups.len(), 1);
        assert_eq!(pages[1].matchups[0].left.rows.len(), 3);

        let shown: usize = pages.iter().map(|p| p.rows().count()).sum();
        assert_eq!(shown, rows.len());
    }

    #[test]
    fn test_capacity_tolerates_rounding() {
        let available = 137.3;
        let height = row_height(7, available, 1.0, 100.0);
        assert_eq!(capacity(available, height), 7);
    }

    proptest! {
        #[test]
        fn prop_week2_pagination_preserves_rows(
            slots in prop::collection::vec((1i64..=3, 1u32..=4), 0..120),
            band_rows in 1usize..20,
        ) {
            let rows: Vec<RosterRow> = slots
                .iter()
                .enumerate()
                .map(|(i, (level, team))| week2_row(i as i64, level * 100, *level, *team))
                .collect();
            let divisions: Vec<Division> = (1..=3).map(|l| division(l * 100, l)).collect();
            let available = band_rows as f32 * WEEK2_MIN_ROW_HEIGHT;
            let pages = paginate_week2(group_week2(&rows, &divisions), available);

            let mut seen: Vec<i64> = pages.iter().flat_map(|p| p.rows().map(|r| r.user_id)).collect();
            seen.sort_unstable();
            let expected: Vec<i64> = (0..rows.len() as i64).collect();
            prop_assert_eq!(seen, expected);
            for page in &pages {
                prop_assert!(page.max_team_rows() <= band_rows);
            }
        }

        #[test]
        fn prop_week2_grouping_preserves_rows(
            slots in prop::collection::vec((1i64..=5, 1u32..=6), 0..80),
        ) {
            let rows: Vec<RosterRow> = slots
                .iter()
                .enumerate()
                .map(|(i, (level, team))| week2_row(i as i64, level * 100, *level, *team))
                .collect();
            let divisions: Vec<Division> = (1..=3).map(|l| division(l * 100, l)).collect();
            let pages = group_week2(&rows, &divisions);

            let mut seen: Vec<i64> = pages.iter().flat_map(|p| p.rows().map(|r| r.user_id)).collect();
            seen.sort_unstable();
            let expected: Vec<i64> = (0..rows.len() as i64).collect();
            prop_assert_eq!(seen, expected);

            for page in &pages {
                prop_assert!(page.matchups.len() <= DIVISIONS_PER_PAGE);
                for m in &page.matchups {
                    let odd_left = m
                        .left
                        .rows
                        .iter()
                        .all(|r| matches!(r.slot, RosterSlot::Week2 { team, .. } if team % 2 == 1));
                    prop_assert!(odd_left, "odd team on the left");
                }
            }
        }
    }
}
