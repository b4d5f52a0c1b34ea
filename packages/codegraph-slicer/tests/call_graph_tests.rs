//! Call graph integration tests

mod common;

use common::*;
use codegraph_slicer::features::call_graph::{CallGraphBuilder, CallGraphEdgeKind, ClassFilter};
use codegraph_slicer::features::ir_provider::{BodyBuilder, ClassBuilder};
use codegraph_slicer::shared::models::{FieldSig, Type};
use codegraph_slicer::{SlicingConfig, SlicingPipeline};
use pretty_assertions::assert_eq;

#[test]
fn test_callers_and_field_reads_are_indexed() {
    let scenario = login_scenario();
    let build = CallGraphBuilder::new(&ClassFilter::from_config(&SlicingConfig::default()))
        .build(&scenario.program);

    let mut callers = build.graph.callers_of(&login_sig().to_string());
    callers.sort();
    assert_eq!(
        callers,
        vec![
            "<com.app.Admin: void sudo()>".to_string(),
            "<com.app.Main: void main()>".to_string(),
        ]
    );

    let admin_key = FieldSig::new("com.app.Keys", Type::string(), "ADMIN").to_string();
    assert_eq!(build.graph.readers_of(&admin_key), vec!["<com.app.Admin: void sudo()>"]);
    assert!(build.graph.writers_of(&admin_key).is_empty());
    assert_eq!(
        build.constants.get(&admin_key).map(|c| c.literal_text()),
        Some("root-pass".to_string())
    );
}

#[test]
fn test_library_calls_are_recorded_but_not_expanded() {
    let scenario = login_scenario();
    let build = CallGraphBuilder::new(&ClassFilter::from_config(&SlicingConfig::default()))
        .build(&scenario.program);

    let calls: Vec<String> = build
        .graph
        .edges()
        .into_iter()
        .filter(|(_, _, kind)| *kind == CallGraphEdgeKind::Calls)
        .map(|(_, callee, _)| callee)
        .collect();
    assert!(calls.contains(&cipher_do_final().to_string()));
    assert!(!build.is_processed(CIPHER));
    assert!(build.is_processed("com.app.Login"));
}

#[test]
fn test_refresh_without_new_classes_adds_nothing() {
    let scenario = login_scenario();
    let mut pipeline = SlicingPipeline::new(scenario.program, SlicingConfig::default()).unwrap();
    let edges = pipeline.call_graph().graph.edges();

    assert_eq!(pipeline.refresh_call_graph(), 0);
    assert_eq!(pipeline.call_graph().graph.edges(), edges);
}

#[test]
fn test_refresh_picks_up_new_callers() {
    let scenario = login_scenario();
    let mut pipeline = SlicingPipeline::new(scenario.program, SlicingConfig::default()).unwrap();
    let guest = method("com.app.Guest", Type::Void, "visit", vec![]);
    assert_eq!(pipeline.program().method_count(), 3);

    pipeline.program_mut().add_class(
        ClassBuilder::new("com.app.Guest").method(
            BodyBuilder::new(guest.clone())
                .constant("r1", string_ty(), text("guest"))
                .invoke(static_call(login_sig(), vec![str_local("r1")]))
                .ret_void(),
        ),
    );

    assert_eq!(pipeline.program().method_count(), 4);
    assert_eq!(pipeline.refresh_call_graph(), 1);
    assert!(pipeline
        .call_graph()
        .graph
        .callers_of(&login_sig().to_string())
        .contains(&guest.to_string()));
    assert_eq!(pipeline.refresh_call_graph(), 0);
}

#[test]
fn test_excluded_namespace_is_skipped() {
    let scenario = login_scenario();
    let config = SlicingConfig::default().excluded_namespaces(["com.app.Admin"]);
    let build = CallGraphBuilder::new(&ClassFilter::from_config(&config)).build(&scenario.program);

    assert!(!build.is_processed("com.app.Admin"));
    assert_eq!(
        build.graph.callers_of(&login_sig().to_string()),
        vec!["<com.app.Main: void main()>"]
    );
}
