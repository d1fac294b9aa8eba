//! Debugger map of the built assets.
//!
//! A JSON document that lets a runtime inspector translate the indices in
//! a running blob back to flows, components and widget items. Item owners
//! that never registered are `-1`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::constant_pool::FlowValue;
use crate::model::{ItemTarget, ResolvedComponent, ResolvedFlow, ResolvedModel};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetsMap {
    pub flows: Vec<FlowMap>,
    /// Flow path to flow index.
    pub flow_indexes: IndexMap<String, usize>,
    /// Root-project action name to flow index.
    pub action_flow_indexes: IndexMap<String, usize>,
    pub constants: Vec<ValueMap>,
    pub global_variables: Vec<GlobalVariableMap>,
    pub dashboard_component_type_to_name_map: IndexMap<u16, String>,
    pub display_width: u16,
    pub display_height: u16,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowMap {
    pub flow_index: usize,
    pub path: String,
    pub readable_flow_path: String,
    pub components: Vec<ComponentMap>,
    pub component_indexes: IndexMap<String, usize>,
    pub component_inputs: Vec<ComponentInputMap>,
    pub local_variables: Vec<LocalVariableMap>,
    pub widget_data_items: Vec<WidgetDataItemMap>,
    pub widget_actions: Vec<WidgetActionMap>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMap {
    pub component_index: usize,
    pub path: String,
    #[serde(rename = "type")]
    pub type_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    pub inputs: Vec<u16>,
    pub properties: Vec<String>,
    pub outputs: Vec<OutputMap>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputMap {
    pub output_name: String,
    pub output_index: usize,
    pub is_sequence_output: bool,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInputMap {
    pub input_index: usize,
    pub component_index: u16,
    pub input_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalVariableMap {
    pub index: usize,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetDataItemMap {
    pub widget_data_item_index: usize,
    pub flow_index: usize,
    pub component_index: i32,
    pub property_value_index: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetActionMap {
    pub widget_action_index: usize,
    pub flow_index: usize,
    pub component_index: i32,
    pub output_index: i32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueMap {
    pub value_type: String,
    pub value: serde_json::Value,
}

impl From<&FlowValue> for ValueMap {
    fn from(value: &FlowValue) -> Self {
        Self {
            value_type: value.value_type().to_string(),
            value: value.to_json(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalVariableMap {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub value_type: String,
    pub native: bool,
}

impl AssetsMap {
    pub fn new(model: &ResolvedModel) -> Self {
        let flows: Vec<_> = model.flows.iter().map(FlowMap::new).collect();

        let flow_indexes = flows
            .iter()
            .map(|flow| (flow.path.clone(), flow.flow_index))
            .collect();
        let action_flow_indexes = model
            .flows
            .iter()
            .filter(|flow| flow.root_action)
            .map(|flow| (flow.name.clone(), flow.flow_index as usize))
            .collect();

        let global_variables = model
            .variables
            .iter()
            .enumerate()
            .map(|(index, variable)| GlobalVariableMap {
                index,
                name: variable.name.clone(),
                value_type: variable.value_type.to_string(),
                native: variable.native,
            })
            .collect();

        log::debug!(
            "assets map: {} flows, {} constants",
            flows.len(),
            model.constants.len()
        );

        Self {
            flows,
            flow_indexes,
            action_flow_indexes,
            constants: model.constants.iter().map(ValueMap::from).collect(),
            global_variables,
            dashboard_component_type_to_name_map: model.dashboard_component_types.clone(),
            display_width: model.display_width,
            display_height: model.display_height,
        }
    }

    /// Pretty JSON with a two-space indent.
    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn flow_index(&self, path: &str) -> Option<usize> {
        self.flow_indexes.get(path).copied()
    }
}

impl FlowMap {
    fn new(flow: &ResolvedFlow) -> Self {
        let flow_index = flow.flow_index as usize;
        let components: Vec<_> = flow
            .components
            .iter()
            .enumerate()
            .map(|(i, c)| ComponentMap::new(i, c))
            .collect();
        let component_indexes = components
            .iter()
            .map(|c| (c.path.clone(), c.component_index))
            .collect();

        let widget_data_items = flow
            .widget_data_items
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (component_index, property_value_index) = owner(item);
                WidgetDataItemMap {
                    widget_data_item_index: index,
                    flow_index,
                    component_index,
                    property_value_index,
                }
            })
            .collect();
        let widget_actions = flow
            .widget_actions
            .iter()
            .enumerate()
            .map(|(index, item)| {
                let (component_index, output_index) = owner(item);
                WidgetActionMap {
                    widget_action_index: index,
                    flow_index,
                    component_index,
                    output_index,
                }
            })
            .collect();

        Self {
            flow_index,
            path: flow.path.clone(),
            readable_flow_path: flow.name.clone(),
            components,
            component_indexes,
            component_inputs: flow
                .inputs
                .iter()
                .enumerate()
                .map(|(input_index, (component_index, name))| ComponentInputMap {
                    input_index,
                    component_index: *component_index,
                    input_name: name.clone(),
                })
                .collect(),
            local_variables: flow
                .local_variables
                .iter()
                .enumerate()
                .map(|(index, name)| LocalVariableMap {
                    index,
                    name: name.clone(),
                })
                .collect(),
            widget_data_items,
            widget_actions,
        }
    }
}

impl ComponentMap {
    fn new(index: usize, component: &ResolvedComponent) -> Self {
        Self {
            component_index: index,
            path: component.path.clone(),
            type_name: component.type_name.clone(),
            identifier: component.identifier.clone(),
            inputs: component.inputs.iter().map(|(_, index)| *index).collect(),
            properties: component.properties.iter().map(|p| p.name.clone()).collect(),
            outputs: component
                .outputs
                .iter()
                .enumerate()
                .map(|(output_index, output)| OutputMap {
                    output_name: output.name.clone(),
                    output_index,
                    is_sequence_output: output.is_sequence,
                })
                .collect(),
        }
    }
}

fn owner(item: &ItemTarget) -> (i32, i32) {
    match item.target {
        Some((component, sub)) => (component as i32, sub as i32),
        None => (-1, -1),
    }
}
