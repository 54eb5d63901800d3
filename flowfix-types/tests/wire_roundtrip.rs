//! Round-trip tests for blueprint wire forms.
//!
//! A document that never needed healing must round-trip stably, and each
//! binding must keep the surface shape (compact single-target vs expanded
//! list) it was written in.

use flowfix_types::blueprint::{Binding, BindingShape, Blueprint, Endpoint};
use flowfix_types::wire::{DocumentFormat, parse_blueprint, render_blueprint};
use pretty_assertions::assert_eq;

const COMPACT_DOC: &str = r#"
schema_version: "1.0.0"
system:
  name: telemetry
  components:
    - name: event_source
      type: generator
      role: source
      ports:
        output_main:
          direction: out
          schema: common_object_schema
    - name: event_store
      type: store
      role: sink
      ports:
        input_main:
          direction: in
          schema: common_object_schema
          buffer:
            capacity: 64
            overflow: block
  bindings:
    - from: { component: event_source, port: output_main }
      to: { component: event_store, port: input_main }
policy:
  retry:
    max_attempts: 3
    backoff_ms: 250
  resources:
    max_memory_mb: 256
    max_queue_depth: 1024
"#;

const EXPANDED_DOC: &str = r#"
schema_version: "1.0.0"
system:
  name: fanout
  components:
    - name: source
      type: generator
      ports:
        output_main: { direction: out, schema: any }
    - name: sink_a
      type: store
      ports:
        input_main: { direction: in, schema: any }
    - name: sink_b
      type: emitter
      ports:
        input_main: { direction: in, schema: any }
  bindings:
    - from: { component: source, port: output_main }
      to:
        - { component: sink_a, port: input_main }
        - { component: sink_b, port: input_main }
"#;

#[test]
fn compact_binding_shape_survives_round_trip() {
    let bp = parse_blueprint(COMPACT_DOC, DocumentFormat::Yaml).expect("parse");
    assert_eq!(bp.system.bindings.len(), 1);
    assert_eq!(bp.system.bindings[0].shape, BindingShape::Compact);
    assert_eq!(bp.system.bindings[0].to.len(), 1);

    let out = render_blueprint(&bp, DocumentFormat::Yaml).expect("render");
    let reparsed = parse_blueprint(&out, DocumentFormat::Yaml).expect("reparse");
    assert_eq!(reparsed.system.bindings[0].shape, BindingShape::Compact);
    assert_eq!(bp, reparsed);
}

#[test]
fn expanded_binding_shape_survives_round_trip() {
    let bp = parse_blueprint(EXPANDED_DOC, DocumentFormat::Yaml).expect("parse");
    assert_eq!(bp.system.bindings[0].shape, BindingShape::Expanded);
    assert_eq!(bp.system.bindings[0].to.len(), 2);

    let out = render_blueprint(&bp, DocumentFormat::Yaml).expect("render");
    let reparsed = parse_blueprint(&out, DocumentFormat::Yaml).expect("reparse");
    assert_eq!(reparsed.system.bindings[0].shape, BindingShape::Expanded);
    assert_eq!(bp, reparsed);
}

#[test]
fn serialization_is_stable_across_repeated_round_trips() {
    let bp = parse_blueprint(COMPACT_DOC, DocumentFormat::Yaml).expect("parse");
    let first = render_blueprint(&bp, DocumentFormat::Yaml).expect("render");
    let second = render_blueprint(
        &parse_blueprint(&first, DocumentFormat::Yaml).expect("reparse"),
        DocumentFormat::Yaml,
    )
    .expect("render again");
    assert_eq!(first, second);
}

#[test]
fn synthesized_bindings_serialize_compact() {
    let mut bp = parse_blueprint(COMPACT_DOC, DocumentFormat::Yaml).expect("parse");
    bp.system.bindings.push(Binding::compact(
        Endpoint::new("event_source", "output_main"),
        Endpoint::new("event_store", "input_main"),
    ));
    let out = render_blueprint(&bp, DocumentFormat::Yaml).expect("render");
    let reparsed = parse_blueprint(&out, DocumentFormat::Yaml).expect("reparse");
    assert!(
        reparsed
            .system
            .bindings
            .iter()
            .all(|b| b.shape == BindingShape::Compact)
    );
}

#[test]
fn json_documents_parse_and_render() {
    let bp = parse_blueprint(COMPACT_DOC, DocumentFormat::Yaml).expect("parse");
    let json = render_blueprint(&bp, DocumentFormat::Json).expect("render json");
    let reparsed = parse_blueprint(&json, DocumentFormat::Json).expect("parse json");
    assert_eq!(bp, reparsed);
}

#[test]
fn opaque_buffer_config_is_preserved() {
    let bp = parse_blueprint(COMPACT_DOC, DocumentFormat::Yaml).expect("parse");
    let store = bp.system.component("event_store").expect("component");
    let port = store.port("input_main").expect("port");
    let buffer = port.buffer.as_ref().expect("buffer block");
    assert_eq!(buffer["capacity"], serde_json::json!(64));
    assert_eq!(buffer["overflow"], serde_json::json!("block"));
}

#[test]
fn missing_schema_version_parses_as_none() {
    let doc = r#"
system:
  name: bare
  components: []
"#;
    let bp: Blueprint = parse_blueprint(doc, DocumentFormat::Yaml).expect("parse");
    assert_eq!(bp.schema_version, None);
}
