use indoc::indoc;

use flowpack_core::project::LvglKind;
use flowpack_format::TextEncoding;
use flowpack_format::constants::widget_type;

use crate::assets::AssetRef;
use crate::build::BuildMode;
use crate::model::{
    BindingSource, EventTarget, ItemTarget, LvglBinding, LvglEvent, LvglProperty, WidgetBinding,
    WidgetSpecific,
};
use crate::test_utils::{graph, resolve_graph, resolve_json};

#[test]
fn widgets_bind_globals_without_flow_support() {
    let (model, diag) = resolve_json(indoc! {r#"
        {
          "variables": [{ "name": "counter", "type": "integer", "defaultValue": "0" }],
          "actions": [{ "name": "go" }],
          "pages": [{
            "name": "Main", "width": 480, "height": 272,
            "components": [
              { "type": "Text", "left": 10, "top": 20, "width": 100, "height": 30,
                "properties": { "data": "counter" }, "attrs": { "text": "Hi" } },
              { "type": "Button", "properties": { "data": "counter" },
                "attrs": { "action": "go", "text": "Go" } }
            ]
          }]
        }
    "#});

    assert!(diag.is_empty());
    assert_eq!(model.encoding, TextEncoding::Utf16);
    assert_eq!((model.display_width, model.display_height), (480, 272));

    let page = &model.pages[0];
    assert_eq!(page.flow_index, None);
    let children = page.root.children();
    assert_eq!(children.len(), 2);

    let text = &children[0];
    assert_eq!(text.type_code, widget_type::TEXT);
    assert_eq!(text.data, WidgetBinding::Asset(AssetRef::Local(1)));
    assert_eq!(text.action, WidgetBinding::Unbound);
    assert_eq!((text.left, text.top, text.width, text.height), (10, 20, 100, 30));
    assert_eq!(text.style, AssetRef::Unresolved);
    assert!(matches!(
        &text.specific,
        WidgetSpecific::Text { text: Some(t), flags: 0 } if t == "Hi"
    ));

    let button = &children[1];
    assert_eq!(button.type_code, widget_type::BUTTON);
    assert_eq!(button.action, WidgetBinding::Asset(AssetRef::Local(1)));
    let WidgetSpecific::Button {
        text,
        enabled,
        disabled_style,
    } = &button.specific
    else {
        panic!("expected a button");
    };
    assert_eq!(text.as_deref(), Some("Go"));
    assert_eq!(*enabled, WidgetBinding::Unbound);
    assert_eq!(*disabled_style, AssetRef::Unresolved);
}

#[test]
fn unknown_variable_is_reported_on_the_property() {
    let (model, diag) = resolve_json(indoc! {r#"
        { "pages": [{ "name": "Main", "components": [
            { "type": "Text", "properties": { "data": "missing" } }
        ] }] }
    "#});

    let text = &model.pages[0].root.children()[0];
    assert_eq!(text.data, WidgetBinding::Asset(AssetRef::Unresolved));

    let messages: Vec<_> = diag.iter().map(|m| m.to_string()).collect();
    assert_eq!(
        messages,
        ["error: global variable `missing` not found (at pages/Main/components/0.data)"]
    );
}

#[test]
fn flow_widgets_allocate_data_items_and_actions() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "flowSupport": true } },
          "actions": [{ "name": "go", "id": 1 }],
          "pages": [{ "name": "Main", "components": [
            { "type": "Text", "properties": { "data": "\"hello\"" } },
            { "type": "Button", "attrs": { "action": "go" } },
            { "type": "Button", "asOutputProperties": ["action"] }
          ] }]
        }
    "#});

    assert_eq!(model.encoding, TextEncoding::Utf8);
    let page = &model.pages[0];
    assert_eq!(page.flow_index, Some(0));

    let children = page.root.children();
    assert_eq!(children[0].data, WidgetBinding::FlowItem(0));
    assert_eq!(children[0].component_index, Some(0));
    assert_eq!(children[1].action, WidgetBinding::NativeAction(1));
    assert_eq!(children[1].data, WidgetBinding::Unbound);
    assert_eq!(children[2].action, WidgetBinding::FlowItem(0));

    let flow = &model.flows[0];
    assert_eq!(
        flow.widget_data_items,
        [ItemTarget {
            target: Some((0, 0))
        }]
    );
    assert_eq!(
        flow.widget_actions,
        [ItemTarget {
            target: Some((2, 0))
        }]
    );
}

#[test]
fn flow_item_bindings_encode_negated() {
    assert_eq!(WidgetBinding::FlowItem(0).encode(false), -1);
    assert_eq!(WidgetBinding::FlowItem(4).encode(true), -5);
    assert_eq!(WidgetBinding::flow_item(-3), WidgetBinding::FlowItem(2));
    assert_eq!(WidgetBinding::Asset(AssetRef::Local(2)).encode(true), -2);
}

#[test]
fn filler_pages_copy_the_first_page() {
    let (model, _) = resolve_json(indoc! {r#"
        { "pages": [
            { "name": "a", "id": 1, "width": 10 },
            { "name": "c", "id": 3, "width": 30 }
        ] }
    "#});

    let names: Vec<_> = model.pages.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["a", "a", "c"]);
    assert!(model.pages[1].filler);
    assert_eq!(model.real_pages().count(), 2);
}

#[test]
fn widget_attributes_fill_specific_fields() {
    let (model, diag) = resolve_json(indoc! {r##"
        {
          "styles": [{ "name": "accent", "color": "#ff0000" }],
          "pages": [
            { "name": "Main", "components": [
              { "type": "BarGraph",
                "attrs": { "orientation": "top-bottom", "displayValue": true,
                           "textStyle": "accent" } },
              { "type": "LayoutView", "attrs": { "layout": "Inner" } },
              { "type": "Rectangle", "attrs": { "ignoreLuminosity": true } }
            ] },
            { "name": "Inner" }
          ]
        }
    "##});

    assert!(!diag.has_errors());
    let children = model.pages[0].root.children();

    let WidgetSpecific::BarGraph {
        orientation,
        flags,
        text_style,
        line1_style,
        ..
    } = &children[0].specific
    else {
        panic!("expected a bar graph");
    };
    assert_eq!((*orientation, *flags), (2, 1));
    assert_eq!(*text_style, AssetRef::Local(1));
    assert_eq!(*line1_style, AssetRef::Unresolved);

    assert!(matches!(
        children[1].specific,
        WidgetSpecific::LayoutView {
            layout: AssetRef::Local(2),
            context: WidgetBinding::Unbound
        }
    ));
    assert!(matches!(
        children[2].specific,
        WidgetSpecific::Rectangle { flags: 2 }
    ));
}

#[test]
fn lvgl_widgets_bind_native_variables_and_actions() {
    let g = graph(indoc! {r#"
        {
          "settings": { "general": { "projectType": "lvgl" } },
          "variables": [{ "name": "level", "type": "integer", "native": true }],
          "actions": [{ "name": "do_it" }],
          "pages": [{ "name": "Main", "components": [
            { "type": "LVGLLabel", "name": "title",
              "properties": { "text": "level" }, "attrs": { "text": "x" },
              "eventHandlers": [
                { "event": "clicked", "handlerType": "action", "action": "do_it" }
              ] }
          ] }]
        }
    "#});
    let (model, diag) = resolve_graph(&g, BuildMode::BuildFiles);

    assert!(diag.is_empty());
    assert_eq!((model.display_width, model.display_height), (480, 272));

    let screen = model.pages[0].root.lvgl().expect("screen");
    assert_eq!(screen.kind, LvglKind::Screen);

    let label = screen.children[0].lvgl().expect("label");
    assert_eq!(label.kind, LvglKind::Label);
    assert_eq!(label.text.as_deref(), Some("x"));
    assert_eq!(
        label.bindings,
        [LvglBinding {
            property: LvglProperty::Text,
            source: BindingSource::Variable("level".to_string()),
        }]
    );
    assert_eq!(
        label.events,
        [LvglEvent {
            event: "CLICKED".to_string(),
            target: EventTarget::NativeAction("do_it".to_string()),
        }]
    );
    assert!(model.variables[0].native);
    assert!(model.actions[0].native);
}

#[test]
fn lvgl_flow_events_become_outputs() {
    let (model, _) = resolve_json(indoc! {r#"
        {
          "settings": { "general": { "projectType": "lvgl", "flowSupport": true } },
          "pages": [{ "name": "Main", "components": [
            { "type": "LVGLButton", "name": "ok",
              "eventHandlers": [{ "event": "pressed" }] }
          ] }]
        }
    "#});

    let button = model.pages[0].root.children()[0].lvgl().expect("button");
    assert_eq!(
        button.events,
        [LvglEvent {
            event: "PRESSED".to_string(),
            target: EventTarget::Output {
                component_index: 0,
                output_index: 0
            },
        }]
    );

    let component = &model.flows[0].components[0];
    assert_eq!(component.outputs[0].name, "PRESSED");
    assert!(component.outputs[0].is_sequence);
}
