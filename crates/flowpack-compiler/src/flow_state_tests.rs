use flowpack_core::project::{ComponentId, Page};
use flowpack_core::{FlowRef, Handle, ProjectId};

use crate::flow_state::{FlowStateTable, ItemBinding};

fn page(index: usize) -> FlowRef {
    FlowRef::Page(Handle::<Page>::new(ProjectId(0), index))
}

const A: ComponentId = ComponentId(0);
const B: ComponentId = ComponentId(1);

#[test]
fn flow_indexes_follow_registration_order() {
    let mut table = FlowStateTable::new();
    assert_eq!(table.flow_index(page(3)), 0);
    assert_eq!(table.flow_index(page(1)), 1);
    assert_eq!(table.flow_index(page(3)), 0);
    assert_eq!(table.find_flow_index(page(1)), Some(1));
    assert_eq!(table.find_flow_index(page(7)), None);
    assert_eq!(table.flow_count(), 2);
}

#[test]
fn component_indexes_are_idempotent() {
    let mut table = FlowStateTable::new();
    assert_eq!(table.component_index(page(0), B), 0);
    assert_eq!(table.component_index(page(0), A), 1);
    assert_eq!(table.component_index(page(0), B), 0);
    assert_eq!(table.find_component_index(page(0), A), Some(1));
    assert_eq!(table.find_component_index(page(1), A), None);
}

#[test]
fn widget_data_item_index_is_stable_per_property() {
    let mut table = FlowStateTable::new();
    let first = table.widget_data_item_index(page(0), A, "data");
    let other = table.widget_data_item_index(page(0), B, "data");
    let again = table.widget_data_item_index(page(0), A, "data");

    assert_eq!(first, -1);
    assert_eq!(other, -2);
    assert_eq!(again, first);
}

#[test]
fn widget_action_indexes_are_separate_from_data_items() {
    let mut table = FlowStateTable::new();
    table.widget_data_item_index(page(0), A, "data");
    assert_eq!(table.widget_action_index(page(0), A, "action"), -1);
    assert_eq!(table.widget_action_index(page(0), A, "action"), -1);
}

#[test]
fn find_input_does_not_allocate() {
    let mut table = FlowStateTable::new();
    assert_eq!(table.find_component_input_index(page(0), A, "in"), None);
    assert_eq!(table.input_count(page(0)), 0);

    assert_eq!(table.component_input_index(page(0), A, "in", 0), 0);
    assert_eq!(table.component_input_index(page(0), B, "in", 0), 1);
    assert_eq!(table.find_component_input_index(page(0), B, "in"), Some(1));
    assert_eq!(table.input_count(page(0)), 2);
}

#[test]
fn input_flags_recorded_on_allocation() {
    let mut table = FlowStateTable::new();
    table.component_input_index(page(0), A, "@seqin", 3);
    table.component_input_index(page(0), A, "value", 0);
    table.component_input_index(page(0), A, "@seqin", 0);

    let flows = table.finalize();
    assert_eq!(flows[0].input_flags, vec![3, 0]);
    assert_eq!(
        flows[0].inputs,
        vec![(A, "@seqin".to_string()), (A, "value".to_string())]
    );
}

#[test]
fn finalize_links_registered_items() {
    let mut table = FlowStateTable::new();
    table.widget_data_item_index(page(0), A, "data");
    table.widget_data_item_index(page(0), B, "data");
    table.widget_action_index(page(0), A, "action");

    table.register_component_property(page(0), A, "data", 4, 1);
    table.register_component_output(page(0), A, "action", 4, 2);
    // never requested as a data item
    table.register_component_property(page(0), A, "color", 4, 3);

    let flows = table.finalize();
    assert_eq!(
        flows[0].widget_data_items,
        vec![
            ItemBinding {
                component: A,
                name: "data".into(),
                target: Some((4, 1)),
            },
            ItemBinding {
                component: B,
                name: "data".into(),
                target: None,
            },
        ]
    );
    assert_eq!(flows[0].widget_actions[0].target, Some((4, 2)));
}

#[test]
fn finalize_keeps_flow_order() {
    let mut table = FlowStateTable::new();
    table.flow_index(page(2));
    table.flow_index(page(0));
    let flows: Vec<FlowRef> = table.finalize().into_iter().map(|f| f.flow).collect();
    assert_eq!(flows, vec![page(2), page(0)]);
}
