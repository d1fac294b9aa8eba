//! Per-flow bookkeeping tables.
//!
//! Every flow gets an index on first access and owns four insertion-ordered
//! tables: components, component inputs, widget data items and widget
//! actions. Entries are keyed by `(ComponentId, Symbol)` so the same
//! component property always maps to the same slot within a build.
//!
//! Widget data items and widget actions are handed out negated and 1-based
//! (`-(index + 1)`), which tells the runtime that a widget property is bound
//! to the flow rather than to a global variable or native action.

use indexmap::{IndexMap, IndexSet};

use flowpack_core::project::ComponentId;
use flowpack_core::{FlowRef, Interner, Symbol};

type Key = (ComponentId, Symbol);

/// Owner of a widget data item or action, set by the registration calls.
pub type Binding = Option<(u16, u16)>;

#[derive(Debug, Default)]
struct FlowState {
    components: IndexSet<ComponentId>,
    /// Input flags per allocated input.
    inputs: IndexMap<Key, u8>,
    widget_data_items: IndexMap<Key, Binding>,
    widget_actions: IndexMap<Key, Binding>,
}

#[derive(Debug, Default)]
pub struct FlowStateTable {
    interner: Interner,
    flows: IndexMap<FlowRef, FlowState>,
}

/// One data item or action after finalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemBinding {
    pub component: ComponentId,
    pub name: String,
    /// `(component index, property value index)` for data items,
    /// `(component index, output index)` for actions.
    pub target: Binding,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalizedFlow {
    pub flow: FlowRef,
    pub input_flags: Vec<u8>,
    pub inputs: Vec<(ComponentId, String)>,
    pub widget_data_items: Vec<ItemBinding>,
    pub widget_actions: Vec<ItemBinding>,
}

impl FlowStateTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&mut self, flow: FlowRef) -> &mut FlowState {
        self.flows.entry(flow).or_default()
    }

    fn key(&mut self, component: ComponentId, name: &str) -> Key {
        (component, self.interner.intern(name))
    }

    fn lookup_key(&self, component: ComponentId, name: &str) -> Option<Key> {
        Some((component, self.interner.get(name)?))
    }

    /// Index of `flow`, registering it on first call.
    pub fn flow_index(&mut self, flow: FlowRef) -> usize {
        let entry = self.flows.entry(flow);
        let index = entry.index();
        entry.or_default();
        index
    }

    pub fn find_flow_index(&self, flow: FlowRef) -> Option<usize> {
        self.flows.get_index_of(&flow)
    }

    pub fn flow_count(&self) -> usize {
        self.flows.len()
    }

    pub fn flows(&self) -> impl Iterator<Item = FlowRef> + '_ {
        self.flows.keys().copied()
    }

    pub fn component_index(&mut self, flow: FlowRef, component: ComponentId) -> usize {
        self.state(flow).components.insert_full(component).0
    }

    pub fn find_component_index(&self, flow: FlowRef, component: ComponentId) -> Option<usize> {
        self.flows.get(&flow)?.components.get_index_of(&component)
    }

    /// Flow-wide index of a component input. `flags` are recorded only when
    /// the input is allocated.
    pub fn component_input_index(
        &mut self,
        flow: FlowRef,
        component: ComponentId,
        input: &str,
        flags: u8,
    ) -> usize {
        let key = self.key(component, input);
        let entry = self.state(flow).inputs.entry(key);
        let index = entry.index();
        entry.or_insert(flags);
        index
    }

    /// Non-allocating lookup, for passes that must not grow the table.
    pub fn find_component_input_index(
        &self,
        flow: FlowRef,
        component: ComponentId,
        input: &str,
    ) -> Option<usize> {
        let key = self.lookup_key(component, input)?;
        self.flows.get(&flow)?.inputs.get_index_of(&key)
    }

    pub fn input_count(&self, flow: FlowRef) -> usize {
        self.flows.get(&flow).map_or(0, |s| s.inputs.len())
    }

    /// Negated, 1-based widget data item index of `component.property`.
    pub fn widget_data_item_index(
        &mut self,
        flow: FlowRef,
        component: ComponentId,
        property: &str,
    ) -> i32 {
        let key = self.key(component, property);
        let entry = self.state(flow).widget_data_items.entry(key);
        let index = entry.index();
        entry.or_insert(None);
        -(index as i32 + 1)
    }

    /// Negated, 1-based widget action index of `component.property`.
    pub fn widget_action_index(
        &mut self,
        flow: FlowRef,
        component: ComponentId,
        property: &str,
    ) -> i32 {
        let key = self.key(component, property);
        let entry = self.state(flow).widget_actions.entry(key);
        let index = entry.index();
        entry.or_insert(None);
        -(index as i32 + 1)
    }

    /// Bind a widget data item to the component property that computes it.
    ///
    /// Properties that were never requested as data items are ignored.
    pub fn register_component_property(
        &mut self,
        flow: FlowRef,
        component: ComponentId,
        property: &str,
        component_index: usize,
        property_value_index: usize,
    ) {
        let Some(key) = self.lookup_key(component, property) else {
            return;
        };
        if let Some(state) = self.flows.get_mut(&flow)
            && let Some(binding) = state.widget_data_items.get_mut(&key)
        {
            *binding = Some((component_index as u16, property_value_index as u16));
        }
    }

    /// Bind a widget action to the component output that fires it.
    pub fn register_component_output(
        &mut self,
        flow: FlowRef,
        component: ComponentId,
        output: &str,
        component_index: usize,
        output_index: usize,
    ) {
        let Some(key) = self.lookup_key(component, output) else {
            return;
        };
        if let Some(state) = self.flows.get_mut(&flow)
            && let Some(binding) = state.widget_actions.get_mut(&key)
        {
            *binding = Some((component_index as u16, output_index as u16));
        }
    }

    /// Flatten every flow's tables, in flow index order.
    pub fn finalize(self) -> Vec<FinalizedFlow> {
        let interner = self.interner;
        let bindings = |items: IndexMap<Key, Binding>| -> Vec<ItemBinding> {
            items
                .into_iter()
                .map(|((component, name), target)| ItemBinding {
                    component,
                    name: interner.resolve(name).to_string(),
                    target,
                })
                .collect()
        };

        self.flows
            .into_iter()
            .map(|(flow, state)| FinalizedFlow {
                flow,
                input_flags: state.inputs.values().copied().collect(),
                inputs: state
                    .inputs
                    .keys()
                    .map(|(component, name)| (*component, interner.resolve(*name).to_string()))
                    .collect(),
                widget_data_items: bindings(state.widget_data_items),
                widget_actions: bindings(state.widget_actions),
            })
            .collect()
    }
}
