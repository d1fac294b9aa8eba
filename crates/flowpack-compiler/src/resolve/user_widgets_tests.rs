use indoc::indoc;

use crate::assets::AssetRef;
use crate::diagnostics::DiagnosticKind;
use crate::model::{CallTarget, WidgetSpecific};
use crate::test_utils::{messages, resolve_json};

fn layout(model: &crate::model::ResolvedModel, page: usize) -> AssetRef {
    match model.pages[page].root.children()[0].specific {
        WidgetSpecific::LayoutView { layout, .. } => layout,
        _ => panic!("expected a layout view"),
    }
}

#[test]
fn mutual_embedding_is_a_cycle() {
    let (model, diag) = resolve_json(indoc! {r#"
        { "pages": [
            { "name": "A", "components": [{ "type": "LayoutView", "attrs": { "layout": "B" } }] },
            { "name": "B", "components": [{ "type": "LayoutView", "attrs": { "layout": "A" } }] }
        ] }
    "#});

    assert_eq!(
        messages(&diag, DiagnosticKind::UserWidgetCycle),
        [
            "cycle detected in user widget: B",
            "cycle detected in user widget: A"
        ]
    );
    assert_eq!(layout(&model, 0), AssetRef::Unresolved);
    assert_eq!(layout(&model, 1), AssetRef::Unresolved);

    let source = diag
        .of_kind(DiagnosticKind::UserWidgetCycle)
        .next()
        .and_then(|m| m.source())
        .expect("source");
    assert_eq!(source.to_string(), "pages/A/components/0.layout");
}

#[test]
fn self_embedding_is_a_cycle() {
    let (_, diag) = resolve_json(indoc! {r#"
        { "pages": [
            { "name": "A", "components": [{ "type": "LayoutView", "attrs": { "layout": "A" } }] }
        ] }
    "#});

    assert_eq!(diag.of_kind(DiagnosticKind::UserWidgetCycle).count(), 1);
}

#[test]
fn chains_without_cycles_resolve() {
    let (model, diag) = resolve_json(indoc! {r#"
        { "pages": [
            { "name": "A", "components": [{ "type": "LayoutView", "attrs": { "layout": "B" } }] },
            { "name": "B", "components": [{ "type": "LayoutView", "attrs": { "layout": "C" } }] },
            { "name": "C" }
        ] }
    "#});

    assert!(diag.is_empty());
    assert_eq!(layout(&model, 0), AssetRef::Local(2));
    assert_eq!(layout(&model, 1), AssetRef::Local(3));
}

#[test]
fn cyclic_user_widgets_call_nothing() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "pages": [
            { "name": "A", "components": [{ "type": "LayoutView", "attrs": { "layout": "B" } }] },
            { "name": "B", "components": [{ "type": "LayoutView", "attrs": { "layout": "A" } }] },
            { "name": "C", "components": [{ "type": "LayoutView", "attrs": { "layout": "B" } }] }
          ]
        }
    "#});

    let unresolved = Some(CallTarget {
        flow_index: -1,
        inputs_start: 0,
        outputs_start: 0,
    });
    assert_eq!(model.flows[0].components[0].call, unresolved);
    assert_eq!(model.flows[1].components[0].call, unresolved);
    // C is outside the cycle and still calls B.
    assert_eq!(
        model.flows[2].components[0].call,
        Some(CallTarget {
            flow_index: 1,
            inputs_start: 0,
            outputs_start: 0,
        })
    );
}
