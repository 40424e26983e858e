//! Named variables, parameters, and the encoding-knob configuration shared by
//! [`crate::cnf::Cnf`] and [`crate::anf::Anf`].
//!
//! Both formula representations hold one of these by composition rather than
//! by inheriting a common base class: a capability a type doesn't need is
//! simply a field it doesn't touch.

use std::collections::BTreeMap;

use crate::config::EncodingConfig;
use crate::error::VARIABLEID_ERROR;
use crate::literal::{Literal, VariableId};
use crate::variable::VariableGenerator;
use crate::variables_array::VariablesArray;

pub type NamedVariables = BTreeMap<String, VariablesArray>;
/// Parameter values are write-only, comma-separated `name: value` blobs
/// keyed by category, matching the text formats in [`crate::io`].
pub type Parameters = BTreeMap<String, String>;

#[derive(Clone, Debug, Default)]
pub struct FormulaBase {
    parameters: Parameters,
    named_variables: NamedVariables,
    pub config: EncodingConfig,
    variable_generator: VariableGenerator,
}

impl FormulaBase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_variable(&mut self) -> VariableId {
        self.variable_generator.new_variable()
    }

    pub fn new_variable_literal(&mut self) -> Literal {
        self.variable_generator.new_variable_literal()
    }

    pub fn variables_size(&self) -> VariableId {
        self.variable_generator.next_value()
    }

    // -- Named variables --------------------------------------------------

    pub fn named_variables(&self) -> &NamedVariables {
        &self.named_variables
    }

    /// Binds (or rebinds, overwriting) `name` to a copy of `value`.
    pub fn add_named_variable(&mut self, name: &str, value: &VariablesArray) {
        self.named_variables.insert(name.to_string(), value.clone());
    }

    /// Binds element `index` of `name`'s array to `value`, growing the
    /// binding (and creating it) as needed.
    ///
    /// The source's CNF and ANF formulas disagree here — CNF only supports a
    /// strict append, ANF grows-then-overwrites. This crate uses the ANF
    /// behavior uniformly for both backends since it is total and never
    /// panics on an existing larger binding (see `DESIGN.md`).
    pub fn add_named_variable_indexed(&mut self, name: &str, value: &VariablesArray, index: usize) {
        match self.named_variables.get_mut(name) {
            Some(existing) => existing.assign_element(value, index),
            None => {
                let mut fresh = VariablesArray::new((index + 1) * value.element_size(), value.element_size());
                fresh.assign_element(value, index);
                self.named_variables.insert(name.to_string(), fresh);
            }
        }
    }

    /// Rewrites every bound literal through `source` used as a template (see
    /// [`VariablesArray::assign_template_into`]).
    pub fn named_variables_update(&mut self, source: &VariablesArray) {
        for value in self.named_variables.values_mut() {
            let template = value.clone();
            source.assign_template_into(&template, value);
        }
    }

    /// Fills only the unassigned slots of `name`'s binding from the
    /// positionally matching slots of `source`. Returns the number of slots
    /// filled, or the [`VARIABLEID_ERROR`] sentinel if `name` is unbound —
    /// mirroring the source's in-band "missing name" signal rather than an
    /// exception.
    pub fn update_unassigned(&mut self, name: &str, source: &VariablesArray) -> u32 {
        let Some(existing) = self.named_variables.get_mut(name) else {
            return VARIABLEID_ERROR;
        };
        assert_eq!(existing.len(), source.len());
        let mut changed = 0u32;
        for i in 0..existing.len() {
            if existing.data()[i].is_unassigned() {
                existing.data_mut()[i] = source.data()[i];
                changed += 1;
            }
        }
        changed
    }

    /// Projects the sign of every bound variable occurrence back onto
    /// `destination`, indexed by variable id. Later bindings win on overlap;
    /// no conflict is reported (matches the source).
    pub fn named_variables_assign_negations(&self, destination: &mut VariablesArray) {
        for value in self.named_variables.values() {
            for &lit in value.data() {
                if lit.is_variable() {
                    let idx = lit.variable_id() as usize;
                    assert!(idx < destination.len());
                    destination.data_mut()[idx] = lit;
                }
            }
        }
    }

    // -- Parameters ---------------------------------------------------------

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn add_parameter(&mut self, key: &str, name: &str, value: &str, quote: bool) {
        let item = if quote {
            format!("{name}: \"{value}\"")
        } else {
            format!("{name}: {value}")
        };
        self.parameters
            .entry(key.to_string())
            .and_modify(|existing| {
                if !existing.is_empty() {
                    existing.push_str(", ");
                }
                existing.push_str(&item);
            })
            .or_insert(item);
    }

    pub fn add_parameter_u32(&mut self, key: &str, name: &str, value: u32) {
        self.add_parameter(key, name, &value.to_string(), false);
    }

    pub fn clear_parameters(&mut self, key: &str) {
        self.parameters.remove(key);
    }
}
