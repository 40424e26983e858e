//! Flat ordered sequence of literals with template substitution and
//! element-wise (2-D) access.

use std::fmt;

use crate::error::AssignmentConflict;
use crate::literal::Literal;

/// An ordered, fixed-stride sequence of literals.
///
/// `element_size` treats the flat buffer as a 2-D array of `len() /
/// element_size` elements of `element_size` literals each; `element_size ==
/// 1` degenerates to a plain bit sequence.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariablesArray {
    data: Vec<Literal>,
    element_size: usize,
}

impl VariablesArray {
    pub fn new(size: usize, element_size: usize) -> Self {
        assert!(element_size > 0 && size % element_size == 0);
        Self {
            data: vec![Literal::UNASSIGNED; size],
            element_size,
        }
    }

    pub fn from_literals(data: Vec<Literal>, element_size: usize) -> Self {
        assert!(element_size > 0 && data.len() % element_size == 0);
        Self { data, element_size }
    }

    /// Copies the shape (size and element width) of `template`, with every
    /// slot unassigned.
    pub fn like(template: &VariablesArray) -> Self {
        Self::new(template.len(), template.element_size)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn element_size(&self) -> usize {
        self.element_size
    }

    pub fn element_count(&self) -> usize {
        self.data.len() / self.element_size
    }

    pub fn data(&self) -> &[Literal] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [Literal] {
        &mut self.data
    }

    /// `self[i] = variable_literal(i)` for every slot.
    pub fn assign_sequence(&mut self) {
        for (i, slot) in self.data.iter_mut().enumerate() {
            *slot = Literal::from_variable_id(i as u32);
        }
    }

    /// For every position `i` where `template[i]` names a variable, writes
    /// `value[i]` (signed through `template[i]`) into `self` at that
    /// variable's index. Constants in `template` are ignored: they carry no
    /// destination.
    pub fn assign_template_from(
        &mut self,
        template: &VariablesArray,
        value: &VariablesArray,
    ) -> Result<(), AssignmentConflict> {
        assert_eq!(template.len(), value.len());
        for i in 0..template.len() {
            let t = template.data[i];
            if t.is_variable() {
                let idx = t.variable_id() as usize;
                let substituted = Literal::substitute_literal(t, value.data[i]);
                let existing = self.data[idx];
                if existing.is_constant() && substituted.is_constant() && existing != substituted {
                    return Err(AssignmentConflict {
                        variable_id: t.variable_id(),
                    });
                }
                self.data[idx] = substituted;
            }
        }
        Ok(())
    }

    /// Inverse of [`VariablesArray::assign_template_from`]: reads the value
    /// bound to each position named by `template` back out of `self`.
    pub fn assign_template_into(&self, template: &VariablesArray, result: &mut VariablesArray) {
        assert_eq!(template.len(), result.len());
        for i in 0..template.len() {
            let t = template.data[i];
            result.data[i] = if t.is_variable() {
                Literal::substitute_literal(t, self.data[t.variable_id() as usize])
            } else {
                t
            };
        }
    }

    /// Grows the array, in whole elements, to `element_count` elements,
    /// padding new slots with [`Literal::UNASSIGNED`]. A no-op if already at
    /// least that large.
    pub fn expand_elements(&mut self, element_count: usize) {
        let target = element_count * self.element_size;
        if target > self.data.len() {
            self.data.resize(target, Literal::UNASSIGNED);
        }
    }

    /// Writes `value` (which must match `element_size`) into element `index`,
    /// expanding first if necessary.
    pub fn assign_element(&mut self, value: &VariablesArray, index: usize) {
        assert_eq!(value.len(), self.element_size);
        self.expand_elements(index + 1);
        let start = index * self.element_size;
        self.data[start..start + self.element_size].copy_from_slice(&value.data);
    }

    /// Strict-append counterpart used by the CNF formula: `index` must equal
    /// the current element count, i.e. this can only grow the array by
    /// exactly one element at a time.
    pub fn expand_append_element(&mut self, value: &VariablesArray, index: usize) {
        assert_eq!(index, self.element_count());
        assert_eq!(value.len(), self.element_size);
        self.data.extend_from_slice(&value.data);
    }

    pub fn element(&self, index: usize) -> &[Literal] {
        let start = index * self.element_size;
        &self.data[start..start + self.element_size]
    }

    /// `(length, step)` of the maximal arithmetic progression of variable ids
    /// starting at index 0 (see [`Literal::sequence`]).
    pub fn sequence(&self) -> (usize, i32) {
        Literal::sequence(&self.data)
    }

    /// Element-wise counterpart of [`VariablesArray::sequence`]: detects a
    /// constant per-element stride across whole elements rather than single
    /// literals.
    pub fn range_sequence(&self) -> (usize, i32) {
        Literal::range_sequence(&self.data, self.element_size)
    }
}

impl fmt::Display for VariablesArray {
    /// Renders the same grammar the text writers use for named-variable
    /// bindings: singleton literals bare, a detected run as `first..count
    /// step`, anything else as a braced, comma separated list.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.data.len() == 1 {
            return write!(f, "{}", self.data[0]);
        }
        let (size, step) = self.range_sequence();
        if self.element_size > 1 && size == self.element_count() && size > 1 {
            write!(f, "{}..{} step {}", self.data[0], size, step)
        } else {
            write!(f, "{{")?;
            for (i, lit) in self.data.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{lit}")?;
            }
            write!(f, "}}")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_sequence_fills_positional_variables() {
        let mut arr = VariablesArray::new(3, 1);
        arr.assign_sequence();
        assert_eq!(arr.data()[0], Literal::from_variable_id(0));
        assert_eq!(arr.data()[2], Literal::from_variable_id(2));
    }

    #[test]
    fn template_round_trips_through_from_and_into() {
        let mut backing = VariablesArray::new(2, 1);
        backing.assign_sequence();

        let template = VariablesArray::from_literals(
            vec![Literal::from_variable_id(0), Literal::from_variable_id(1)],
            1,
        );
        let value = VariablesArray::from_literals(vec![Literal::CONST_1, Literal::CONST_0], 1);
        backing.assign_template_from(&template, &value).unwrap();

        let mut result = VariablesArray::like(&template);
        backing.assign_template_into(&template, &mut result);
        assert_eq!(result.data(), value.data());
    }

    #[test]
    fn conflicting_constant_assignment_is_an_error() {
        let mut backing = VariablesArray::new(1, 1);
        let template = VariablesArray::from_literals(
            vec![Literal::from_variable_id(0), Literal::from_variable_id(0)],
            1,
        );
        let value = VariablesArray::from_literals(vec![Literal::CONST_1, Literal::CONST_0], 1);
        assert!(backing.assign_template_from(&template, &value).is_err());
    }

    #[test]
    fn element_assignment_expands_and_writes_in_place() {
        let mut arr = VariablesArray::new(0, 2);
        let elem = VariablesArray::from_literals(
            vec![Literal::from_variable_id(5), Literal::from_variable_id(6)],
            2,
        );
        arr.assign_element(&elem, 1);
        assert_eq!(arr.len(), 4);
        assert_eq!(arr.element(1), elem.data());
        assert!(arr.element(0)[0].is_unassigned());
    }
}
