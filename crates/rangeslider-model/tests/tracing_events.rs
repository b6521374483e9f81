#![forbid(unsafe_code)]

//! Structured log output of the slider model.
//!
//! Captures `tracing` events with a registry layer and checks the event
//! names and fields emitted for construction, selection and fallbacks.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use rangeslider_model::{SliderConfig, SliderModel};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;

#[derive(Debug, Clone)]
struct CapturedEvent {
    level: Level,
    message: Option<String>,
    fields: HashMap<String, String>,
}

struct EventCapture {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

struct FieldVisitor(Vec<(String, String)>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.push((field.name().to_string(), format!("{value:?}")));
    }

    fn record_u64(&mut self, field: &tracing::field::Field, value: u64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_f64(&mut self, field: &tracing::field::Field, value: f64) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.push((field.name().to_string(), value.to_string()));
    }

    fn record_bool(&mut self, field: &tracing::field::Field, value: bool) {
        self.0.push((field.name().to_string(), value.to_string()));
    }
}

impl<S> tracing_subscriber::Layer<S> for EventCapture
where
    S: tracing::Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: tracing_subscriber::layer::Context<'_, S>) {
        let mut visitor = FieldVisitor(Vec::new());
        event.record(&mut visitor);
        let fields: HashMap<String, String> = visitor.0.into_iter().collect();
        let message = fields.get("message").cloned();
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            message,
            fields,
        });
    }
}

fn with_captured_events<F>(f: F) -> Vec<CapturedEvent>
where
    F: FnOnce(),
{
    let events = Arc::new(Mutex::new(Vec::new()));
    let layer = EventCapture {
        events: Arc::clone(&events),
    };
    let subscriber = tracing_subscriber::registry().with(layer);
    tracing::subscriber::with_default(subscriber, f);
    events.lock().unwrap().clone()
}

fn named<'a>(events: &'a [CapturedEvent], message: &str) -> Vec<&'a CapturedEvent> {
    events
        .iter()
        .filter(|e| e.message.as_deref() == Some(message))
        .collect()
}

#[test]
fn construction_logs_space_and_model() {
    let events = with_captured_events(|| {
        SliderModel::new(&SliderConfig::range(0.0, 10.0, 1.0).with_point("v", 3)).unwrap();
    });

    let built = named(&events, "slider.space.built");
    assert_eq!(built.len(), 1);
    assert_eq!(built[0].level, Level::DEBUG);
    assert_eq!(built[0].fields["source"], "range");
    assert_eq!(built[0].fields["points"], "11");

    let init = named(&events, "slider.model.init");
    assert_eq!(init.len(), 1);
    assert_eq!(init[0].fields["points"], "1");
    assert_eq!(init[0].fields["collision_avoidance"], "true");
}

#[test]
fn unknown_initial_value_warns() {
    let events = with_captured_events(|| {
        let model =
            SliderModel::new(&SliderConfig::values(["s", "m", "l"]).with_point("size", "xl"))
                .unwrap();
        assert_eq!(model.point("size").unwrap().value.as_token(), Some("s"));
    });

    let fallback = named(&events, "slider.initial_fallback");
    assert_eq!(fallback.len(), 1);
    assert_eq!(fallback[0].level, Level::WARN);
    assert_eq!(fallback[0].fields["id"], "size");
    assert_eq!(fallback[0].fields["requested"], "xl");
    assert_eq!(fallback[0].fields["value"], "s");
}

#[test]
fn discarded_map_ratio_warns() {
    let events = with_captured_events(|| {
        SliderModel::new(&SliderConfig::points_map([(0.0, 1), (0.5, 2), (1.5, 3)])).unwrap();
    });

    let discarded = named(&events, "slider.space.ratio_discarded");
    assert_eq!(discarded.len(), 1);
    assert_eq!(discarded[0].level, Level::WARN);
    assert_eq!(discarded[0].fields["ratio"], "1.5");
}

#[test]
fn selection_logs_source_of_move() {
    let events = with_captured_events(|| {
        let model = SliderModel::new(
            &SliderConfig::range(0.0, 10.0, 1.0)
                .with_point("from", 2)
                .with_point("to", 8),
        )
        .unwrap();
        model.select_by_position("from", 0.4).unwrap();
        model.select_by_value("to", 6).unwrap();
        model.step_by("to", 1).unwrap();
    });

    let selects = named(&events, "slider.select");
    let via: Vec<&str> = selects.iter().map(|e| e.fields["via"].as_str()).collect();
    assert_eq!(via, vec!["position", "value", "step"]);
    assert_eq!(selects[0].fields["id"], "from");
    assert_eq!(selects[0].fields["value"], "4");
    assert_eq!(selects[0].fields["limits_changed"], "1");
}

#[test]
fn failed_selection_logs_nothing() {
    let events = with_captured_events(|| {
        let model =
            SliderModel::new(&SliderConfig::range(0.0, 10.0, 1.0).with_point("from", 2)).unwrap();
        assert!(model.select_by_position("nope", 0.4).is_err());
    });
    assert!(named(&events, "slider.select").is_empty());
}
