//! Lake ranking by ice coverage.

use std::cmp::Ordering;

use serde::Serialize;

use super::observation::{Lake, Observation};

/// A lake's place in the coverage ranking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedLake {
    pub lake: Lake,
    pub coverage: Option<f64>,
    /// 1-based rank.
    pub position: usize,
    /// Coverage relative to the leader, `0.0..=1.0`.
    pub share_of_max: f64,
}

/// Rank the five individual lakes by coverage, highest first.
///
/// Lakes without a value sort last. Ties fall back to west-to-east order so
/// the ranking is stable between refreshes.
pub fn rank(observation: &Observation) -> Vec<RankedLake> {
    let mut lakes: Vec<(Lake, Option<f64>)> = Lake::INDIVIDUAL
        .iter()
        .map(|&lake| (lake, observation.get(lake)))
        .collect();

    lakes.sort_by(|a, b| compare_coverage(a.1, b.1).then_with(|| a.0.cmp(&b.0)));

    let leader = lakes.first().and_then(|(_, coverage)| *coverage).unwrap_or(0.0);

    lakes
        .into_iter()
        .enumerate()
        .map(|(i, (lake, coverage))| RankedLake {
            lake,
            coverage,
            position: i + 1,
            share_of_max: match coverage {
                Some(v) if leader > 0.0 => (v / leader).clamp(0.0, 1.0),
                _ => 0.0,
            },
        })
        .collect()
}

/// Descending order with `None` last.
fn compare_coverage(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn observation() -> Observation {
        Observation::new(Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap())
    }

    #[test]
    fn ranks_descending_by_coverage() {
        let obs = observation()
            .with(Lake::Superior, 20.0)
            .with(Lake::Michigan, 15.0)
            .with(Lake::Huron, 30.0)
            .with(Lake::Erie, 80.0)
            .with(Lake::Ontario, 10.0)
            .with(Lake::Total, 25.0);

        let ranking = rank(&obs);
        let order: Vec<Lake> = ranking.iter().map(|r| r.lake).collect();
        assert_eq!(
            order,
            vec![Lake::Erie, Lake::Huron, Lake::Superior, Lake::Michigan, Lake::Ontario]
        );
        assert_eq!(ranking[0].position, 1);
        assert_eq!(ranking[4].position, 5);
        assert_eq!(ranking[0].share_of_max, 1.0);
        assert!((ranking[1].share_of_max - 0.375).abs() < 1e-9);
    }

    #[test]
    fn total_is_never_ranked() {
        let obs = observation().with(Lake::Total, 99.0);
        assert!(rank(&obs).iter().all(|r| r.lake != Lake::Total));
    }

    #[test]
    fn missing_values_sort_last() {
        let obs = observation().with(Lake::Ontario, 5.0);
        let ranking = rank(&obs);
        assert_eq!(ranking[0].lake, Lake::Ontario);
        assert!(ranking[1..].iter().all(|r| r.coverage.is_none()));
        // Remaining lakes keep geographic order
        assert_eq!(ranking[1].lake, Lake::Superior);
        assert_eq!(ranking[4].lake, Lake::Erie);
    }

    #[test]
    fn ties_use_geographic_order() {
        let obs = observation()
            .with(Lake::Erie, 10.0)
            .with(Lake::Superior, 10.0)
            .with(Lake::Michigan, 10.0)
            .with(Lake::Huron, 10.0)
            .with(Lake::Ontario, 10.0);
        let order: Vec<Lake> = rank(&obs).iter().map(|r| r.lake).collect();
        assert_eq!(order, Lake::INDIVIDUAL.to_vec());
    }

    #[test]
    fn zero_leader_gives_zero_share() {
        let obs = observation().with(Lake::Erie, 0.0).with(Lake::Huron, 0.0);
        assert!(rank(&obs).iter().all(|r| r.share_of_max == 0.0));
    }
}
