//! Flow components: inputs, compiled properties, wired outputs and callees.

use flowpack_core::project::{
    Action, ActionKind, Component, ComponentId, ComponentKind, FlowBody, LocalVariable, Page, Port,
    ProjectType,
};
use flowpack_core::FlowRef;
use flowpack_format::constants::{component_type, input_flags};
use flowpack_format::{FIRST_DASHBOARD_COMPONENT_TYPE, LVGL_WIDGET_COMPONENT_TYPE};

use super::widgets::{component_outputs, widget_type_code};
use super::{Resolver, flow_project, user_widget_page};
use crate::diagnostics::{DiagnosticKind, SourceRef};
use crate::expr::{self, ExprError, Operand, Scope};
use crate::model::{CallTarget, ResolvedComponent, ResolvedFlow, ResolvedOutput, ResolvedProperty};

/// Identifiers visible to one component's properties.
struct ComponentScope<'a> {
    /// Data inputs of the component with their flow-wide input index.
    inputs: &'a [(String, usize)],
    locals: &'a [LocalVariable],
    globals: &'a [String],
}

impl Scope for ComponentScope<'_> {
    fn resolve(&mut self, name: &str) -> Option<Operand> {
        if let Some((_, index)) = self.inputs.iter().find(|(input, _)| input == name) {
            return Some(Operand::Input(*index));
        }
        if let Some(index) = self.locals.iter().position(|v| v.name == name) {
            return Some(Operand::LocalVariable(index));
        }
        self.globals
            .iter()
            .position(|g| g == name)
            .map(Operand::GlobalVariable)
    }
}

/// A connection line whose endpoints both exist.
struct Wire<'b> {
    source: ComponentId,
    output: &'b str,
    target: ComponentId,
    input: &'b str,
}

impl Resolver<'_, '_> {
    pub(super) fn resolve_flow(
        &mut self,
        flow: FlowRef,
        flow_index: usize,
        globals: &[String],
    ) -> ResolvedFlow {
        let graph = self.graph;
        let body = graph.flow_body(flow);
        let path = graph.flow_path(flow);
        let order = body.preorder();
        log::trace!("resolving flow {path} ({} components)", order.len());

        // Declared inputs come first so their indices do not depend on wiring.
        for &id in &order {
            let (inputs, _) = self.component_ports(flow, id);
            for input in &inputs {
                let mut flags = 0;
                if input.is_sequence() {
                    flags |= input_flags::SEQUENCE;
                }
                if input.optional {
                    flags |= input_flags::OPTIONAL;
                }
                self.table.component_input_index(flow, id, &input.name, flags);
            }
        }

        let wires = self.wires(flow, body, &path);

        let components = order
            .iter()
            .map(|&id| self.resolve_component(flow, id, &wires, globals))
            .collect();

        let local_defaults = body
            .local_variables
            .iter()
            .map(|local| {
                let source = SourceRef::new(format!("{path}/localVariables/{}", local.name))
                    .property("defaultValue");
                self.default_value(&local.name, &local.value_type, &local.default_value, source)
            })
            .collect();

        ResolvedFlow {
            flow_index: flow_index as u16,
            name: graph.flow_name(flow).to_string(),
            root_action: matches!(flow, FlowRef::Action(h) if h.project == graph.root()),
            components,
            local_variables: body.local_variables.iter().map(|v| v.name.clone()).collect(),
            local_defaults,
            input_flags: Vec::new(),
            inputs: Vec::new(),
            widget_data_items: Vec::new(),
            widget_actions: Vec::new(),
            path,
        }
    }

    /// Connection lines with both endpoints present. Dangling lines warn
    /// and are dropped.
    fn wires<'b>(&mut self, flow: FlowRef, body: &'b FlowBody, path: &str) -> Vec<Wire<'b>> {
        let mut wires = Vec::new();
        for line in &body.connection_lines {
            let source = body.find_by_object_id(&line.source);
            let target = body.find_by_object_id(&line.target);
            let (Some(source), Some(target)) = (source, target) else {
                let missing = if source.is_none() {
                    &line.source
                } else {
                    &line.target
                };
                self.diag
                    .report(
                        DiagnosticKind::ConnectionNotFound,
                        SourceRef::new(format!("{path}/connectionLines")),
                    )
                    .message(missing.as_str())
                    .emit();
                continue;
            };
            // Wiring into an undeclared input still needs a slot.
            self.table.component_input_index(flow, target, &line.input, 0);
            wires.push(Wire {
                source,
                output: &line.output,
                target,
                input: &line.input,
            });
        }
        wires
    }

    fn resolve_component(
        &mut self,
        flow: FlowRef,
        id: ComponentId,
        wires: &[Wire<'_>],
        globals: &[String],
    ) -> ResolvedComponent {
        let graph = self.graph;
        let body = graph.flow_body(flow);
        let c = body.component(id);
        let path = graph.component_path(flow, id);
        let component_index = self.table.component_index(flow, id);

        let type_code = self.component_type_code(c, &path);
        let (input_ports, ports) = self.component_ports(flow, id);

        let inputs: Vec<(String, u16)> = input_ports
            .iter()
            .filter_map(|input| {
                let index = self.table.find_component_input_index(flow, id, &input.name)?;
                Some((input.name.clone(), index as u16))
            })
            .collect();
        let data_inputs: Vec<(String, usize)> = input_ports
            .iter()
            .zip(&inputs)
            .filter(|(port, _)| !port.is_sequence())
            .map(|(_, (name, index))| (name.clone(), *index as usize))
            .collect();

        let mut scope = ComponentScope {
            inputs: &data_inputs,
            locals: &body.local_variables,
            globals,
        };
        let mut properties = Vec::with_capacity(c.properties.len());
        for (i, (name, text)) in c.properties.iter().enumerate() {
            let instructions = match expr::compile(text, &mut scope, &mut self.constants) {
                Ok(instructions) => instructions,
                Err(err) => {
                    self.report_expression(&err, &path, name, text);
                    expr::undefined_instructions()
                }
            };
            self.table
                .register_component_property(flow, id, name, component_index, i);
            properties.push(ResolvedProperty {
                name: name.clone(),
                instructions,
            });
        }

        let mut outputs = Vec::with_capacity(ports.len());
        for (i, port) in ports.iter().enumerate() {
            let targets = wires
                .iter()
                .filter(|w| w.source == id && w.output == port.name)
                .filter_map(|w| {
                    let component = self.table.find_component_index(flow, w.target)?;
                    let input = self.table.find_component_input_index(flow, w.target, w.input)?;
                    Some((component as u16, input as u16))
                })
                .collect();
            self.table
                .register_component_output(flow, id, &port.name, component_index, i);
            outputs.push(ResolvedOutput {
                name: port.name.clone(),
                targets,
                is_sequence: port.is_sequence(),
            });
        }

        let error_catch_output = if c.catch_error {
            ports
                .iter()
                .position(|p| p.name == "@error")
                .map_or(-1, |i| i as i16)
        } else {
            -1
        };

        let identifier = match c.kind {
            ComponentKind::Action(ActionKind::Input | ActionKind::Output) => None,
            _ => c.name.clone().filter(|n| !n.is_empty()),
        };

        ResolvedComponent {
            id,
            call: self.call_target(flow, id, &input_ports, &ports),
            path,
            type_name: c.type_name.clone(),
            identifier,
            type_code,
            inputs,
            properties,
            outputs,
            error_catch_output,
        }
    }

    fn report_expression(&mut self, err: &ExprError, path: &str, property: &str, text: &str) {
        let kind = match err {
            ExprError::Parse(_) => DiagnosticKind::InvalidExpression,
            ExprError::UnknownIdentifier { .. } => DiagnosticKind::UnknownIdentifier,
            ExprError::OperandOverflow { .. } => DiagnosticKind::OperandOverflow,
        };
        let message = match err {
            ExprError::UnknownIdentifier { name, .. } => name.clone(),
            _ => err.to_string(),
        };
        let source = SourceRef::new(path)
            .property(property)
            .expression(text, err.span());
        self.diag.report(kind, source).message(message).emit();
    }

    fn component_type_code(&mut self, c: &Component, path: &str) -> u16 {
        use component_type as T;
        match c.kind {
            ComponentKind::Widget(kind) => widget_type_code(kind) as u16,
            ComponentKind::Lvgl(_) => LVGL_WIDGET_COMPONENT_TYPE,
            ComponentKind::Action(kind) => match kind {
                ActionKind::Start => T::START_ACTION,
                ActionKind::End => T::END_ACTION,
                ActionKind::Input => T::INPUT_ACTION,
                ActionKind::Output => T::OUTPUT_ACTION,
                ActionKind::WatchVariable => T::WATCH_VARIABLE_ACTION,
                ActionKind::EvalExpr => T::EVAL_EXPR_ACTION,
                ActionKind::SetVariable => T::SET_VARIABLE_ACTION,
                ActionKind::SwitchCase => T::SWITCH_CASE_ACTION,
                ActionKind::Compare => T::COMPARE_ACTION,
                ActionKind::IsTrue => T::IS_TRUE_ACTION,
                ActionKind::Constant => T::CONSTANT_ACTION,
                ActionKind::Log => T::LOG_ACTION,
                ActionKind::CallAction => T::CALL_ACTION_ACTION,
                ActionKind::Delay => T::DELAY_ACTION,
                ActionKind::Error => T::ERROR_ACTION,
                ActionKind::CatchError => T::CATCH_ERROR_ACTION,
                ActionKind::Counter => T::COUNTER_ACTION,
                ActionKind::Loop => T::LOOP_ACTION,
                ActionKind::ShowPage => T::SHOW_PAGE_ACTION,
            },
            ComponentKind::Unknown => {
                if self.project_type == ProjectType::Dashboard {
                    let next = FIRST_DASHBOARD_COMPONENT_TYPE + self.dashboard_types.len() as u16;
                    return *self
                        .dashboard_types
                        .entry(c.type_name.clone())
                        .or_insert(next);
                }
                self.diag
                    .report(DiagnosticKind::UnknownComponentType, SourceRef::new(path))
                    .message(c.type_name.as_str())
                    .emit();
                0
            }
        }
    }

    /// Page embedded by a user widget, when it exists.
    fn user_widget_callee(&self, flow: FlowRef, c: &Component) -> Option<FlowRef> {
        let (_, name) = user_widget_page(c)?;
        self.index
            .find::<Page>(flow_project(flow), name)
            .map(FlowRef::Page)
    }

    /// Input and output ports of a component in index order. A user widget
    /// continues both lists with one port per marker of its page: `@seqin`
    /// for each start marker then the input markers from the top down, and
    /// `@seqout` for each end marker then the output markers.
    pub(super) fn component_ports(
        &self,
        flow: FlowRef,
        id: ComponentId,
    ) -> (Vec<Port>, Vec<Port>) {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let mut inputs = c.inputs.clone();
        let mut outputs = component_outputs(c);

        let Some(page) = self.user_widget_callee(flow, c) else {
            return (inputs, outputs);
        };
        let body = graph.flow_body(page);
        let markers = move |kind: ActionKind| {
            body.markers_by_top(kind)
                .into_iter()
                .map(move |m| body.component(m))
        };
        inputs.extend(markers(ActionKind::Start).map(|_| Port::sequence("@seqin")));
        inputs.extend(markers(ActionKind::Input).map(|m| Port::data(marker_port(m))));
        outputs.extend(markers(ActionKind::End).map(|_| Port::sequence("@seqout")));
        outputs.extend(markers(ActionKind::Output).map(|m| Port::data(marker_port(m))));
        (inputs, outputs)
    }

    /// Callee of a call-action or user-widget component.
    fn call_target(
        &mut self,
        flow: FlowRef,
        id: ComponentId,
        inputs: &[Port],
        outputs: &[Port],
    ) -> Option<CallTarget> {
        let graph = self.graph;
        let c = graph.flow_body(flow).component(id);
        let project = flow_project(flow);

        let callee = match c.kind {
            ComponentKind::Action(ActionKind::CallAction) => {
                let name = c.attr_str("action").unwrap_or("");
                self.index
                    .find::<Action>(project, name)
                    .filter(|&h| !graph.get(h).is_native())
                    .map(FlowRef::Action)
            }
            kind if kind.is_user_widget() => {
                if self.cycles.contains(&(flow, id)) {
                    None
                } else {
                    self.user_widget_callee(flow, c)
                }
            }
            _ => return None,
        };

        let Some(callee) = callee else {
            return Some(CallTarget {
                flow_index: -1,
                inputs_start: 0,
                outputs_start: 0,
            });
        };

        let callee_body = graph.flow_body(callee);
        let inputs_start = marker_start(
            callee_body,
            ActionKind::Input,
            inputs.iter().map(|p| p.name.as_str()),
        );
        let outputs_start = marker_start(
            callee_body,
            ActionKind::Output,
            outputs.iter().map(|p| p.name.as_str()),
        );

        Some(CallTarget {
            flow_index: self.register_flow(callee) as i16,
            inputs_start,
            outputs_start,
        })
    }
}

/// Position among `names` of the callee's topmost marker of `kind`.
fn marker_start<'a>(
    callee: &FlowBody,
    kind: ActionKind,
    mut names: impl Iterator<Item = &'a str>,
) -> u8 {
    let Some(&first) = callee.markers_by_top(kind).first() else {
        return 0;
    };
    let marker = marker_port(callee.component(first));
    names
        .position(|name| name == marker)
        .map_or(0, |i| i.min(u8::MAX as usize) as u8)
}

/// Port name a caller wires to for an input or output marker.
fn marker_port(marker: &Component) -> &str {
    marker
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(marker.object_id.as_deref())
        .unwrap_or("")
}
