use std::cmp::Ordering;
use std::collections::BTreeMap;

use rust_decimal::Decimal;
use tracing::debug;

use super::SeriesTotal;

/// One boat's results within a ranking scope.
#[derive(Debug, Clone, PartialEq)]
pub struct BoatSeries {
    pub boat_id: i64,
    /// One slot per race in scope, oldest first, discards included. `None`
    /// where the boat has no result in that race.
    pub raw: Vec<Option<Decimal>>,
    pub series: SeriesTotal,
}

impl BoatSeries {
    pub fn new(boat_id: i64, raw: Vec<Option<Decimal>>) -> Self {
        let points: Vec<Decimal> = raw.iter().flatten().copied().collect();
        let series = SeriesTotal::aggregate(&points, points.len());
        Self {
            boat_id,
            raw,
            series,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placing {
    pub boat_id: i64,
    pub total: Decimal,
    pub place: u32,
    pub races_sailed: usize,
    pub has_raced: bool,
}

/// Assign strict places 1..N to a field.
///
/// Boats are grouped by total (lower is better), with boats that have not
/// raced grouped after everyone who has. Within a tied group the kept scores
/// are compared best-first, then remaining ties are broken on the most recent
/// results. Fully tied boats keep their input order.
pub fn rank(field: &[BoatSeries]) -> Vec<Placing> {
    let mut groups: BTreeMap<(bool, Decimal), Vec<&BoatSeries>> = BTreeMap::new();
    for boat in field {
        groups
            .entry((!boat.series.has_raced(), boat.series.total))
            .or_default()
            .push(boat);
    }

    let mut placings = Vec::with_capacity(field.len());
    for ((_, total), mut tied) in groups {
        if tied.len() > 1 {
            tied.sort_by(|a, b| compare_tied(a, b));
            let unresolved = tied
                .windows(2)
                .filter(|pair| compare_tied(pair[0], pair[1]) == Ordering::Equal)
                .count();
            if unresolved > 0 {
                debug!(total = %total, unresolved, "Ties left in input order");
            }
        }

        for boat in tied {
            placings.push(Placing {
                boat_id: boat.boat_id,
                total: boat.series.total,
                place: placings.len() as u32 + 1,
                races_sailed: boat.series.races_sailed,
                has_raced: boat.series.has_raced(),
            });
        }
    }
    placings
}

/// Kept scores first, most recent results only on a residual tie
fn compare_tied(a: &BoatSeries, b: &BoatSeries) -> Ordering {
    compare_kept(a, b).then_with(|| compare_recent(a, b))
}

/// Kept scores best-first; the first difference decides. Running out of
/// scores on either side leaves the boats tied.
fn compare_kept(a: &BoatSeries, b: &BoatSeries) -> Ordering {
    a.series
        .kept
        .iter()
        .zip(&b.series.kept)
        .map(|(x, y)| x.cmp(y))
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Raw scores race by race from the most recent backward. A missing result
/// counts as worse than any score.
fn compare_recent(a: &BoatSeries, b: &BoatSeries) -> Ordering {
    let slot = |boat: &BoatSeries, race: usize| boat.raw.get(race).copied().flatten();

    (0..a.raw.len().max(b.raw.len()))
        .rev()
        .map(|race| match (slot(a, race), slot(b, race)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .find(|o| o.is_ne())
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    /// Results in race order; negative values mark a race without a result
    fn results(values: &[i64]) -> Vec<Option<Decimal>> {
        values
            .iter()
            .map(|&v| (v >= 0).then(|| Decimal::from(v)))
            .collect()
    }

    fn boat(boat_id: i64, raw: &[i64]) -> BoatSeries {
        BoatSeries::new(boat_id, results(raw))
    }

    fn places(placings: &[Placing]) -> Vec<(i64, u32)> {
        placings.iter().map(|p| (p.boat_id, p.place)).collect()
    }

    #[test]
    fn test_orders_by_total() {
        let field = vec![boat(1, &[3, 3]), boat(2, &[1, 1]), boat(3, &[2, 2])];
        assert_eq!(places(&rank(&field)), vec![(2, 1), (3, 2), (1, 3)]);
    }

    #[test]
    fn test_kept_scores_break_tie() {
        // Both at 20; best-first 1,4,5,10 beats 1,4,6,9 at the third score
        let a = BoatSeries {
            boat_id: 1,
            raw: results(&[10, 5, 4, 1]),
            series: SeriesTotal {
                total: Decimal::from(20),
                kept: pts(&[1, 4, 5, 10]),
                discarded: vec![],
                races_sailed: 4,
            },
        };
        let b = BoatSeries {
            boat_id: 2,
            raw: results(&[9, 6, 4, 1]),
            series: SeriesTotal {
                total: Decimal::from(20),
                kept: pts(&[1, 4, 6, 9]),
                discarded: vec![],
                races_sailed: 4,
            },
        };
        assert_eq!(places(&rank(&[b.clone(), a.clone()])), vec![(1, 1), (2, 2)]);
        assert_eq!(places(&rank(&[a, b])), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_recent_results_break_residual_tie() {
        // Same kept scores, boat 2 did better in the last race
        let field = vec![boat(1, &[1, 2]), boat(2, &[2, 1])];
        assert_eq!(places(&rank(&field)), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_recent_results_look_further_back() {
        let field = vec![boat(1, &[1, 3, 2, 4]), boat(2, &[3, 1, 2, 4])];
        // Totals: both drop the 4 and keep 1,2,3. Last race 4 = 4, then 2 = 2,
        // then 3 vs 1: boat 2 better.
        assert_eq!(places(&rank(&field)), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_missing_recent_result_counts_as_worst() {
        // Both keep 1,2,3 for 6; boat 2 has no result in the last race, so
        // boat 1's discarded 9 still beats it there
        let field = vec![boat(2, &[3, 2, 1, -1]), boat(1, &[1, 2, 3, 9])];
        let placings = rank(&field);
        assert_eq!(placings[0].total, placings[1].total);
        assert_eq!(places(&placings), vec![(1, 1), (2, 2)]);
    }

    #[test]
    fn test_recent_results_compare_the_same_race() {
        // Both keep 1,2,3 and match in races 3 and 4; boat 1 missed race 2,
        // which counts worse than boat 2's discarded 9 there
        let field = vec![boat(1, &[1, -1, 3, 2]), boat(2, &[1, 9, 3, 2])];
        assert_eq!(places(&rank(&field)), vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn test_full_tie_keeps_input_order() {
        let field = vec![boat(7, &[1, 2]), boat(3, &[1, 2])];
        assert_eq!(places(&rank(&field)), vec![(7, 1), (3, 2)]);
    }

    #[test]
    fn test_boats_without_races_rank_last() {
        let field = vec![boat(1, &[]), boat(2, &[0, 0]), boat(3, &[5])];
        let placings = rank(&field);
        assert_eq!(places(&placings), vec![(2, 1), (3, 2), (1, 3)]);
        assert!(!placings[2].has_raced);
        assert_eq!(placings[2].total, Decimal::ZERO);
    }

    #[test]
    fn test_places_form_a_bijection() {
        let field: Vec<BoatSeries> = (0..37)
            .map(|id| {
                let raw: Vec<i64> = (0..(id % 9)).map(|r| (id * 13 + r * 5) % 6).collect();
                boat(id, &raw)
            })
            .collect();
        let placings = rank(&field);

        let mut seen: Vec<u32> = placings.iter().map(|p| p.place).collect();
        seen.sort_unstable();
        assert_eq!(seen, (1..=37).collect::<Vec<u32>>());

        let mut boats: Vec<i64> = placings.iter().map(|p| p.boat_id).collect();
        boats.sort_unstable();
        assert_eq!(boats, (0..37).collect::<Vec<i64>>());

        assert_eq!(rank(&field), placings);
    }
}
