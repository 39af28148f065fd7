use rust_decimal::Decimal;

/// Races sailed at which one more worst result is discarded.
/// Past the last threshold no further discards are added.
pub const DISCARD_THRESHOLDS: [usize; 10] = [4, 8, 16, 24, 32, 40, 48, 56, 64, 72];

/// Number of results discarded after `races` races
pub fn discard_count(races: usize) -> usize {
    DISCARD_THRESHOLDS.iter().filter(|&&t| races >= t).count()
}

/// A boat's series total with the results that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesTotal {
    pub total: Decimal,
    /// Retained points, ascending (best first)
    pub kept: Vec<Decimal>,
    /// Dropped points, worst first
    pub discarded: Vec<Decimal>,
    pub races_sailed: usize,
}

impl SeriesTotal {
    /// Aggregate `points` over `races` races sailed.
    ///
    /// Worst results are dropped according to [`discard_count`]. When the
    /// discard count reaches the number of results nothing is dropped.
    pub fn aggregate(points: &[Decimal], races: usize) -> Self {
        let mut worst_first = points.to_vec();
        worst_first.sort_by(|a, b| b.cmp(a));

        let drops = match discard_count(races) {
            n if n >= worst_first.len() => 0,
            n => n,
        };

        let mut kept = worst_first.split_off(drops);
        kept.reverse();
        let total = kept.iter().copied().sum();

        Self {
            total,
            kept,
            discarded: worst_first,
            races_sailed: races,
        }
    }

    /// A boat entered in scope that has no results yet
    pub fn has_raced(&self) -> bool {
        self.races_sailed > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(values: &[i64]) -> Vec<Decimal> {
        values.iter().map(|&v| Decimal::from(v)).collect()
    }

    #[test]
    fn test_discard_count_thresholds() {
        assert_eq!(discard_count(0), 0);
        assert_eq!(discard_count(3), 0);
        assert_eq!(discard_count(4), 1);
        assert_eq!(discard_count(7), 1);
        assert_eq!(discard_count(8), 2);
        assert_eq!(discard_count(15), 2);
        assert_eq!(discard_count(16), 3);
        assert_eq!(discard_count(72), 10);
        assert_eq!(discard_count(200), 10);
    }

    #[test]
    fn test_discard_count_non_decreasing() {
        let mut previous = 0;
        for races in 0..=120 {
            let count = discard_count(races);
            assert!(count >= previous, "discards dropped at {} races", races);
            assert_eq!(
                count,
                DISCARD_THRESHOLDS.iter().filter(|&&t| races >= t).count()
            );
            previous = count;
        }
    }

    #[test]
    fn test_nine_races_drop_two_worst() {
        let series = SeriesTotal::aggregate(&pts(&[1, 2, 3, 4, 5, 6, 7, 8, 50]), 9);
        assert_eq!(series.total, Decimal::from(28));
        assert_eq!(series.discarded, pts(&[50, 8]));
        assert_eq!(series.kept, pts(&[1, 2, 3, 4, 5, 6, 7]));
    }

    #[test]
    fn test_total_is_sum_of_kept() {
        for races in 0..40usize {
            let points: Vec<Decimal> = (0..races)
                .map(|i| Decimal::from(((i * 7) % 11 + 1) as i64))
                .collect();
            let series = SeriesTotal::aggregate(&points, races);
            let sum: Decimal = series.kept.iter().copied().sum();
            assert_eq!(series.total, sum);
            assert_eq!(series.kept.len(), races.saturating_sub(discard_count(races)));
            assert_eq!(series.kept.len() + series.discarded.len(), races);
        }
    }

    #[test]
    fn test_fewer_results_than_discards_drops_nothing() {
        // Four races counted but only one result recorded
        let series = SeriesTotal::aggregate(&pts(&[6]), 4);
        assert_eq!(series.total, Decimal::from(6));
        assert!(series.discarded.is_empty());
    }

    #[test]
    fn test_zero_races() {
        let series = SeriesTotal::aggregate(&[], 0);
        assert_eq!(series.total, Decimal::ZERO);
        assert!(series.kept.is_empty());
        assert!(!series.has_raced());
    }

    #[test]
    fn test_fractional_points() {
        let points = vec![Decimal::new(15, 1), Decimal::new(35, 1), Decimal::from(2)];
        let series = SeriesTotal::aggregate(&points, 3);
        assert_eq!(series.total, Decimal::from(7));
    }
}
