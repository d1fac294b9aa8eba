use indoc::indoc;

use crate::constant_pool::FlowValue;
use crate::diagnostics::DiagnosticKind;
use crate::expr::undefined_instructions;
use crate::model::CallTarget;
use crate::test_utils::{messages, resolve_json};

const PUSH_INPUT: u16 = 1 << 13;
const PUSH_LOCAL_VAR: u16 = 2 << 13;
const PUSH_GLOBAL_VAR: u16 = 3 << 13;
const END: u16 = 6 << 13;

#[test]
fn wiring_inputs_and_properties() {
    let (model, diag) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "variables": [{ "name": "total", "type": "integer", "defaultValue": "5" }],
          "actions": [{
            "name": "compute", "implementationType": "flow",
            "localVariables": [{ "name": "tmp", "type": "integer", "defaultValue": "1" }],
            "components": [
              { "type": "StartAction", "id": "s",
                "outputs": [{ "name": "@seqout", "type": "sequence" }] },
              { "type": "EvalExpr", "id": "e",
                "inputs": [{ "name": "@seqin", "type": "sequence" }, { "name": "x" }],
                "properties": { "expression": "x + tmp + total" },
                "outputs": [{ "name": "result" }] },
              { "type": "EndAction", "id": "end",
                "inputs": [{ "name": "@seqin", "type": "sequence" }] }
            ],
            "connectionLines": [
              { "source": "s", "output": "@seqout", "target": "e", "input": "@seqin" },
              { "source": "e", "output": "result", "target": "end", "input": "@seqin" },
              { "source": "e", "output": "result", "target": "nowhere", "input": "x" }
            ]
          }]
        }
    "#});

    assert_eq!(
        messages(&diag, DiagnosticKind::ConnectionNotFound),
        ["connection line endpoint not found: nowhere"]
    );

    let flow = &model.flows[0];
    assert_eq!(flow.path, "actions/compute");
    assert!(flow.root_action);
    assert_eq!(flow.local_variables, ["tmp"]);
    assert_eq!(flow.local_defaults, [FlowValue::Integer(1)]);
    assert_eq!(flow.input_flags, [3, 0, 3]);
    assert_eq!(
        flow.inputs,
        [
            (1, "@seqin".to_string()),
            (1, "x".to_string()),
            (2, "@seqin".to_string())
        ]
    );

    let [start, eval, end] = &flow.components[..] else {
        panic!("expected three components");
    };
    assert_eq!(start.type_code, 1001);
    assert_eq!(start.outputs[0].targets, [(1, 0)]);
    assert!(start.outputs[0].is_sequence);

    assert_eq!(eval.type_code, 1006);
    assert_eq!(
        eval.inputs,
        [("@seqin".to_string(), 0), ("x".to_string(), 1)]
    );
    assert_eq!(eval.outputs[0].targets, [(2, 2)]);
    assert!(!eval.outputs[0].is_sequence);
    assert_eq!(eval.error_catch_output, -1);

    let instructions = &eval.properties[0].instructions;
    assert_eq!(instructions.len(), 6);
    assert_eq!(instructions[0], PUSH_INPUT | 1);
    assert_eq!(instructions[1], PUSH_LOCAL_VAR);
    assert_eq!(instructions[3], PUSH_GLOBAL_VAR);
    assert_eq!(instructions[5], END);

    assert_eq!(end.type_code, 1002);
    assert!(end.outputs.is_empty());
    assert_eq!(model.variables[0].default_value, FlowValue::Integer(5));
}

#[test]
fn bad_expressions_fall_back_to_undefined() {
    let (model, diag) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [{ "name": "Main", "components": [
            { "type": "Log", "properties": { "value": "nope + 1" } },
            { "type": "Log", "properties": { "value": "1 +" } }
          ] }]
        }
    "#});

    assert_eq!(
        messages(&diag, DiagnosticKind::UnknownIdentifier),
        ["unknown identifier `nope`"]
    );
    assert_eq!(diag.of_kind(DiagnosticKind::InvalidExpression).count(), 1);

    let components = &model.flows[0].components;
    assert_eq!(components[0].properties[0].instructions, undefined_instructions());
    assert_eq!(components[1].properties[0].instructions, undefined_instructions());

    let source = diag
        .of_kind(DiagnosticKind::UnknownIdentifier)
        .next()
        .and_then(|m| m.source())
        .expect("source");
    assert_eq!(source.to_string(), "pages/Main/components/0.value");
    assert_eq!(source.expression, Some(("nope + 1".to_string(), 0..4)));
}

#[test]
fn call_action_targets_the_callee_flow() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [{ "name": "Main", "components": [
            { "type": "CallAction", "attrs": { "action": "compute" },
              "inputs": [{ "name": "@seqin", "type": "sequence" }, { "name": "a" }],
              "outputs": [{ "name": "@seqout", "type": "sequence" }, { "name": "done" }] },
            { "type": "CallAction", "attrs": { "action": "native_one" } }
          ] }],
          "actions": [
            { "name": "compute", "implementationType": "flow", "components": [
              { "type": "InputAction", "name": "a", "top": 10 },
              { "type": "OutputAction", "name": "done", "top": 20 }
            ] },
            { "name": "native_one" }
          ]
        }
    "#});

    let main = &model.flows[0];
    assert_eq!(main.components[0].type_code, 1013);
    assert_eq!(
        main.components[0].call,
        Some(CallTarget {
            flow_index: 1,
            inputs_start: 1,
            outputs_start: 1,
        })
    );
    assert_eq!(
        main.components[1].call,
        Some(CallTarget {
            flow_index: -1,
            inputs_start: 0,
            outputs_start: 0,
        })
    );

    let callee = &model.flows[1];
    assert_eq!(callee.name, "compute");
    assert_eq!(callee.components[0].identifier, None);
}

#[test]
fn user_widget_ports_follow_page_markers() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [
            { "name": "Main",
              "components": [
                { "type": "StartAction", "id": "s",
                  "outputs": [{ "name": "@seqout", "type": "sequence" }] },
                { "type": "LayoutView", "id": "lv", "attrs": { "layout": "W" } }
              ],
              "connectionLines": [
                { "source": "s", "output": "@seqout", "target": "lv", "input": "@seqin" }
              ] },
            { "name": "W", "components": [
              { "type": "StartAction" },
              { "type": "InputAction", "name": "a", "top": 20 },
              { "type": "InputAction", "name": "b", "top": 0 },
              { "type": "EndAction" },
              { "type": "OutputAction", "name": "o", "top": 5 }
            ] }
          ]
        }
    "#});

    let main = &model.flows[0];
    let view = &main.components[1];
    assert_eq!(
        view.inputs,
        [
            ("@seqin".to_string(), 0),
            ("b".to_string(), 1),
            ("a".to_string(), 2)
        ]
    );
    assert_eq!(main.input_flags, [3, 0, 0]);
    let outputs: Vec<_> = view.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(outputs, ["@seqout", "o"]);
    assert!(view.outputs[0].is_sequence);
    assert_eq!(
        view.call,
        Some(CallTarget {
            flow_index: 1,
            inputs_start: 1,
            outputs_start: 1,
        })
    );
    assert_eq!(main.components[0].outputs[0].targets, [(1, 0)]);
}

#[test]
fn catch_error_adds_an_error_output() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [{ "name": "Main", "components": [
            { "type": "Delay", "name": "wait", "catchError": true,
              "outputs": [{ "name": "@seqout", "type": "sequence" }] }
          ] }]
        }
    "#});

    let delay = &model.flows[0].components[0];
    let names: Vec<_> = delay.outputs.iter().map(|o| o.name.as_str()).collect();
    assert_eq!(names, ["@seqout", "@error"]);
    assert_eq!(delay.error_catch_output, 1);
    assert_eq!(delay.identifier.as_deref(), Some("wait"));
}

#[test]
fn unknown_component_types() {
    let (model, diag) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [{ "name": "Main", "components": [{ "type": "Gizmo" }] }]
        }
    "#});
    assert_eq!(model.flows[0].components[0].type_code, 0);
    assert_eq!(
        messages(&diag, DiagnosticKind::UnknownComponentType),
        ["unknown component type `Gizmo`"]
    );

    let (model, diag) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "projectType": "dashboard" } },
          "pages": [{ "name": "Main", "components": [
            { "type": "Gizmo" }, { "type": "Plot" }, { "type": "Gizmo" }
          ] }]
        }
    "#});
    let codes: Vec<_> = model.flows[0]
        .components
        .iter()
        .map(|c| c.type_code)
        .collect();
    assert_eq!(codes, [10000, 10001, 10000]);
    let types: Vec<_> = model
        .dashboard_component_types
        .iter()
        .map(|(code, name)| (*code, name.as_str()))
        .collect();
    assert_eq!(types, [(10000, "Gizmo"), (10001, "Plot")]);
    assert_eq!(diag.of_kind(DiagnosticKind::UnknownComponentType).count(), 0);
}

#[test]
fn non_literal_defaults_warn() {
    let (model, diag) = resolve_json(indoc! {r#"
        {
          "variables": [
            { "name": "a", "type": "float", "defaultValue": "2" },
            { "name": "b", "type": "integer", "defaultValue": "a + 1" }
          ]
        }
    "#});

    assert_eq!(model.variables[0].default_value, FlowValue::Float(2.0));
    assert_eq!(model.variables[1].default_value, FlowValue::Undefined);
    assert_eq!(
        messages(&diag, DiagnosticKind::NonLiteralDefault),
        ["default value of `b` is not a literal"]
    );
}
