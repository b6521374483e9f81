#![no_main]

use libfuzzer_sys::fuzz_target;
use rangeslider_model::{PositionSpace, SliderValue, SpaceSource};

fuzz_target!(|entries: Vec<(f64, Option<i32>, u8)>| {
    let entries: Vec<(f64, SliderValue)> = entries
        .into_iter()
        .take(256)
        .map(|(ratio, number, token)| {
            let value = match number {
                Some(n) => SliderValue::from(n),
                None => SliderValue::Token(format!("t{token}")),
            };
            (ratio, value)
        })
        .collect();

    let Ok(space) = PositionSpace::build(&SpaceSource::Map(entries), None) else {
        return;
    };

    assert!(!space.is_empty());
    for pair in space.points().windows(2) {
        assert!(pair[0].ratio < pair[1].ratio, "ratios not strictly ascending");
    }
    for probe in [0.0, 0.25, 0.5, 1.0, -1.0, 2.0, f64::NAN] {
        let index = space.nearest_index_by_ratio(probe);
        assert!(index < space.len());
    }
    for point in space.points() {
        assert!((0.0..=1.0).contains(&point.ratio));
        assert!(space.index_of_value(&point.value).is_some());
    }
});
