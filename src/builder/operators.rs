//! Rehoming of free operator functions into classes.

use super::MetaBuilder;
use super::traverse::apply_modifications;
use crate::base::{ClassId, FunctionId};
use crate::diagnostics::RejectReason;
use crate::model::MetaType;

/// Where a free operator goes: the receiving class, the index of the
/// operand that becomes the receiver, and whether operands are swapped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    class: ClassId,
    receiver: usize,
    reverse: bool,
}

impl MetaBuilder<'_> {
    pub(super) fn rehome_operators(&mut self) {
        let operators = std::mem::take(&mut self.operators);
        tracing::debug!("[BUILD] rehoming {} operators", operators.len());
        for id in operators {
            self.rehome_operator(id);
        }
    }

    /// The class of a type, if that class is built and generates code.
    fn exposed_class(&self, ty: &MetaType) -> Option<ClassId> {
        let class = self.class_for_entry(ty.entry)?;
        self.registry
            .get(self.model.class(class).entry)
            .generates_code()
            .then_some(class)
    }

    fn place_operator(&mut self, id: FunctionId) -> Option<Placement> {
        let function = self.model.function(id);
        match function.arguments.as_slice() {
            [operand] => self.exposed_class(&operand.ty).map(|class| Placement {
                class,
                receiver: 0,
                reverse: false,
            }),
            [lhs, rhs] => {
                let is_shift = matches!(&*function.original_name, "operator<<" | "operator>>");
                let stream = self
                    .class_for_entry(lhs.ty.entry)
                    .filter(|c| self.registry.get(self.model.class(*c).entry).is_stream());
                match stream {
                    Some(stream) if is_shift => {
                        let streamed = self.exposed_class(&rhs.ty);
                        let placement = match (self.exposed_class(&lhs.ty), streamed) {
                            (Some(stream), _) => Placement {
                                class: stream,
                                receiver: 0,
                                reverse: false,
                            },
                            (None, Some(streamed)) => Placement {
                                class: streamed,
                                receiver: 1,
                                reverse: true,
                            },
                            (None, None) => return None,
                        };
                        if let Some(streamed) = self.class_for_entry(rhs.ty.entry) {
                            self.model.class_mut(stream).add_include_dependency(streamed);
                            self.model.class_mut(streamed).add_include_dependency(stream);
                        }
                        Some(placement)
                    }
                    _ => self.place_binary(id),
                }
            }
            _ => None,
        }
    }

    fn place_binary(&self, id: FunctionId) -> Option<Placement> {
        let function = self.model.function(id);
        let [lhs, rhs] = function.arguments.as_slice() else {
            return None;
        };
        let left = self.exposed_class(&lhs.ty);
        let right = self.exposed_class(&rhs.ty);
        let returned = function
            .return_type
            .as_ref()
            .filter(|ty| ty.kind.is_complex())
            .and_then(|ty| self.class_for_entry(ty.entry));

        let use_right = match (left, right) {
            (None, Some(_)) => true,
            (Some(left), Some(right)) => left != right && returned == Some(right),
            _ => false,
        };
        if use_right {
            right.map(|class| Placement {
                class,
                receiver: 1,
                reverse: true,
            })
        } else {
            left.map(|class| Placement {
                class,
                receiver: 0,
                reverse: false,
            })
        }
    }

    fn rehome_operator(&mut self, id: FunctionId) {
        let signature = self.model.function(id).original_signature.clone();
        let Some(placement) = self.place_operator(id) else {
            tracing::trace!("[BUILD] operator {} has no exposed operand", signature);
            self.model.detach_function(id);
            self.diagnostics
                .reject_function(signature, RejectReason::NotInSpecification);
            return;
        };

        let class_name = self.model.class(placement.class).name.to_string();
        let name = self.model.function(id).original_name.clone();
        if let Some(reason) = self.registry.is_rejected(&class_name, Some(&*name)) {
            self.model.detach_function(id);
            self.diagnostics.reject_function(signature, reason);
            return;
        }

        let function = self.model.function_mut(id);
        function.arguments.remove(placement.receiver);
        for (index, arg) in function.arguments.iter_mut().enumerate() {
            arg.index = index;
        }
        function.attributes.is_reverse_operator = placement.reverse;
        function.attributes.is_static = false;
        function.declaring_class = Some(placement.class);
        function.implementing_class = Some(placement.class);

        let minimal = function.minimal_signature();
        let modifications = self.modifications_for(Some(placement.class), &name, &minimal);
        if modifications.iter().any(|m| m.remove) {
            self.model.detach_function(id);
            self.diagnostics
                .reject_function(signature, RejectReason::GenerationDisabled);
            return;
        }
        apply_modifications(self.model.function_mut(id), modifications);

        tracing::trace!(
            "[BUILD] operator {} -> {}{}",
            signature,
            class_name,
            if placement.reverse { " (reverse)" } else { "" }
        );
        self.model.set_function_owner(id, Some(placement.class));
    }
}
