#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use rangeslider_model::{SliderConfig, SliderModel, Stateful};

#[derive(Debug, Arbitrary)]
enum Op {
    Position(u8, f64),
    Value(u8, f64),
    Unknown(f64),
    Step(u8, i64),
    Recompute(u8),
}

#[derive(Debug, Arbitrary)]
struct Input {
    min: i16,
    span: u16,
    step_tenths: u8,
    initial: Vec<f64>,
    collision_avoidance: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let min = f64::from(input.min);
    let max = min + f64::from(input.span.max(1));
    let step = f64::from(input.step_tenths.max(1)) / 10.0;

    let mut config = SliderConfig::range(min, max, step)
        .with_collision_avoidance(input.collision_avoidance);
    for (i, value) in input.initial.iter().take(6).enumerate() {
        config = config.with_point(format!("p{i}"), *value);
    }
    let Ok(model) = SliderModel::new(&config) else {
        return;
    };
    let ids = model.ids();
    if ids.is_empty() {
        return;
    }
    let id = |i: u8| ids[usize::from(i) % ids.len()].as_str();
    let space = model.space();

    for op in input.ops.iter().take(64) {
        // Every call targets a registered id.
        match *op {
            Op::Position(i, r) => {
                model.select_by_position(id(i), r).expect("position");
            }
            Op::Value(i, v) => {
                // NaN is not a value of any space.
                let result = model.select_by_value(id(i), v);
                assert!(result.is_ok() || v.is_nan(), "value {v} rejected");
            }
            Op::Unknown(r) => {
                model.select_by_unknown_position(r).expect("unknown");
            }
            Op::Step(i, s) => {
                model.step_by(id(i), s).expect("step");
            }
            Op::Recompute(i) => {
                model.recompute_limits(id(i)).expect("recompute");
            }
        }

        let state = model.state();
        for (id, point) in &state.points {
            assert!(
                space.index_of_ratio(point.ratio).is_some(),
                "{id} off grid at {}",
                point.ratio
            );
            let limits = state.limits(id).expect("limits for every point");
            assert!(limits.min <= limits.max, "inverted limits for {id}");
        }
    }
});
