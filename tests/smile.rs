//! End-to-end smile construction from synthetic option chains.

use approx::assert_relative_eq;

use volkit::core::{OptionType, PricingError};
use volkit::engines::analytic::bs_price;
use volkit::vol::smile::{
    ChainData, ChainTable, PriceSeries, RowOutcome, SkipReason, compute_smile,
    compute_smile_outcomes,
};

fn chain_from_vols(
    strikes: &[f64],
    vols: &[f64],
    side: OptionType,
    s: f64,
    r: f64,
    t: f64,
) -> ChainData {
    let prices: Vec<f64> = strikes
        .iter()
        .zip(vols)
        .map(|(&k, &sigma)| bs_price(side, s, k, r, sigma, t).unwrap())
        .collect();
    let table = ChainTable::from_column(strikes.to_vec(), "last_price", prices).unwrap();
    ChainData::Table(table)
}

#[test]
fn recovers_skewed_smile_from_call_chain() {
    let strikes = [70.0, 80.0, 90.0, 100.0, 110.0, 120.0, 130.0];
    let vols = [0.38, 0.33, 0.28, 0.25, 0.26, 0.29, 0.33];
    let chain = chain_from_vols(&strikes, &vols, OptionType::Call, 100.0, 0.03, 1.0);

    let smile = compute_smile(&chain, 100.0, 1.0, 0.03, OptionType::Call).unwrap();
    assert_eq!(smile.strikes, strikes.to_vec());
    for (got, want) in smile.vols.iter().zip(vols) {
        assert_relative_eq!(*got, want, epsilon = 1e-7);
    }
}

#[test]
fn put_chain_inverts_with_put_pricer() {
    let strikes = [85.0, 95.0, 105.0];
    let vols = [0.3, 0.26, 0.24];
    let chain = chain_from_vols(&strikes, &vols, OptionType::Put, 100.0, 0.02, 0.5);

    let smile = compute_smile(&chain, 100.0, 0.5, 0.02, OptionType::Put).unwrap();
    assert_eq!(smile.len(), 3);
    for (got, want) in smile.vols.iter().zip(vols) {
        assert_relative_eq!(*got, want, epsilon = 1e-7);
    }
}

#[test]
fn bad_rows_are_dropped_and_attributed() {
    let good = bs_price(OptionType::Call, 100.0, 100.0, 0.03, 0.22, 1.0).unwrap();
    let chain = ChainData::Series(PriceSeries {
        name: "mid".into(),
        strikes: vec![90.0, 100.0, 110.0, 120.0],
        values: vec![-1.0, good, 0.0, f64::NAN],
    });

    let outcomes = compute_smile_outcomes(&chain, 100.0, 1.0, 0.03, OptionType::Call).unwrap();
    assert_eq!(outcomes.len(), 4);
    for idx in [0, 2, 3] {
        assert!(matches!(
            outcomes[idx],
            RowOutcome::Skipped {
                reason: SkipReason::NonPositivePrice,
                ..
            }
        ));
    }

    let smile = compute_smile(&chain, 100.0, 1.0, 0.03, OptionType::Call).unwrap();
    assert_eq!(smile.strikes, vec![100.0]);
    assert_relative_eq!(smile.vols[0], 0.22, epsilon = 1e-8);
}

#[test]
fn uninvertible_quote_is_skipped_not_fatal() {
    // Second quote sits above the spot bound; no volatility reproduces it.
    let good = bs_price(OptionType::Call, 100.0, 95.0, 0.03, 0.2, 1.0).unwrap();
    let chain = ChainData::Series(PriceSeries {
        name: "mid".into(),
        strikes: vec![95.0, 105.0],
        values: vec![good, 140.0],
    });

    let outcomes = compute_smile_outcomes(&chain, 100.0, 1.0, 0.03, OptionType::Call).unwrap();
    assert!(matches!(outcomes[0], RowOutcome::Solved { .. }));
    assert!(matches!(
        outcomes[1],
        RowOutcome::Skipped {
            reason: SkipReason::NoSolution,
            ..
        }
    ));
}

#[test]
fn ambiguous_table_fails_loudly() {
    let table = ChainTable::new(
        vec![95.0, 105.0],
        vec![
            ("bid".into(), vec![7.0, 3.0]),
            ("ask".into(), vec![8.0, 4.0]),
        ],
    )
    .unwrap();

    let err = compute_smile(&ChainData::Table(table), 100.0, 1.0, 0.03, OptionType::Call)
        .unwrap_err();
    assert!(matches!(err, PricingError::InvalidInput(_)));
}

#[test]
fn chain_round_trips_through_json() {
    let table = ChainTable::from_column(vec![90.0, 100.0], "last_price", vec![14.0, 8.0]).unwrap();
    let chain = ChainData::Table(table);

    let json = serde_json::to_string(&chain).unwrap();
    let back: ChainData = serde_json::from_str(&json).unwrap();
    assert_eq!(back, chain);
}
