use epi_assoc::{odds_ratio, relative_risk, CiMethod, Options};
use polars::prelude::{DataFrame, NamedFrom, Series};
use proptest::prelude::*;

fn frame(rows: &[(bool, Option<i64>)]) -> DataFrame {
    // Both outcomes and the base level are always present.
    let mut all = vec![(true, Some(0)), (false, Some(0))];
    all.extend_from_slice(rows);
    DataFrame::new(vec![
        Series::new(
            "outcome".into(),
            all.iter()
                .map(|(y, _)| if *y { "case" } else { "control" })
                .collect::<Vec<_>>(),
        ),
        Series::new(
            "level".into(),
            all.iter().map(|(_, x)| *x).collect::<Vec<_>>(),
        ),
    ])
    .unwrap()
}

fn observations() -> impl Strategy<Value = Vec<(bool, Option<i64>)>> {
    prop::collection::vec((any::<bool>(), prop::option::weighted(0.9, 0i64..4)), 0..200)
}

proptest! {
    #[test]
    fn counts_match_retained_rows(rows in observations()) {
        let df = frame(&rows);
        let retained = 2 + rows.iter().filter(|(_, x)| x.is_some()).count() as u64;
        let table = relative_risk(&df, "outcome", "case", "level", 0i64, &Options::default()).unwrap();
        prop_assert_eq!(table.total(), retained);
    }

    #[test]
    fn base_row_is_identity(rows in observations()) {
        let table = odds_ratio(&frame(&rows), "outcome", "case", "level", 0i64, &Options::default()).unwrap();
        let base = table.rows.iter().find(|r| r.is_base).unwrap();
        prop_assert_eq!(base.ratio, 1.0);
        prop_assert_eq!(base.lower.as_str(), "---");
        prop_assert_eq!(base.upper.as_str(), "---");
    }

    #[test]
    fn method_follows_zero_cells(rows in observations()) {
        let table = odds_ratio(&frame(&rows), "outcome", "case", "level", 0i64, &Options::default()).unwrap();
        let has_zero = table.rows.iter().any(|r| r.cases == 0 || r.controls == 0);
        let expected = if has_zero { CiMethod::Gart } else { CiMethod::Woolf };
        prop_assert_eq!(table.method, expected);
    }

    #[test]
    fn swapping_outcomes_inverts_odds_ratios(rows in observations()) {
        let df = frame(&rows);
        let forward = odds_ratio(&df, "outcome", "case", "level", 0i64, &Options::default()).unwrap();
        let reverse = odds_ratio(&df, "outcome", "control", "level", 0i64, &Options::default()).unwrap();
        for (f, r) in forward.rows.iter().zip(&reverse.rows) {
            prop_assert_eq!(&f.level, &r.level);
            prop_assert!((f.ratio * r.ratio - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn intervals_cover_the_point_estimate(rows in observations()) {
        let table = relative_risk(&frame(&rows), "outcome", "case", "level", 0i64, &Options::default()).unwrap();
        for row in table.rows.iter().filter(|r| !r.is_base) {
            let ci = row.interval.unwrap();
            prop_assert!(ci.lower <= row.ratio && row.ratio <= ci.upper);
        }
    }
}
