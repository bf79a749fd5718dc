#![allow(dead_code)]

use polars::prelude::{DataFrame, NamedFrom, Series};

/// Frame with string outcome `ill` and string factor `food`, one row per observation.
pub fn frame(cells: &[(&str, &str, usize)]) -> DataFrame {
    let mut outcome = Vec::new();
    let mut factor = Vec::new();
    for (y, x, n) in cells {
        for _ in 0..*n {
            outcome.push(y.to_string());
            factor.push(x.to_string());
        }
    }
    DataFrame::new(vec![
        Series::new("ill".into(), outcome),
        Series::new("food".into(), factor),
    ])
    .unwrap()
}

/// Two-level frame from 2x2 counts: `exposed` (a, b) and the base `unexposed` (c, d).
pub fn two_by_two(a: usize, b: usize, c: usize, d: usize) -> DataFrame {
    frame(&[
        ("y", "exposed", a),
        ("n", "exposed", b),
        ("y", "unexposed", c),
        ("n", "unexposed", d),
    ])
}
