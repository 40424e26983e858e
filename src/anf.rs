//! ANF (Algebraic Normal Form) equation store: three parallel flat arenas
//! (`symbols`, `terms`, `equations`) with on-insert normalization.
//!
//! Every stored equation is `head ⊕ term_1 ⊕ term_2 ⊕ ...`, where `head` is a
//! single signed variable symbol (its sign doubling as the equation's
//! constant-1 offset) and every other term is a sorted, deduplicated,
//! unnegated conjunction — see [`Anf::append_equation_term`] for how that
//! invariant is maintained incrementally.

use crate::encoder::Encoder;
use crate::error::DomainError;
use crate::formula::FormulaBase;
use crate::literal::{Literal, VariableId};
use crate::variables_array::VariablesArray;
use crate::word::Word;

#[derive(Clone, Debug, Default)]
pub struct Anf {
    pub base: FormulaBase,
    symbols: Vec<Literal>,
    terms: Vec<usize>,
    equations: Vec<usize>,
}

impl Anf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.equations.is_empty()
    }

    pub fn equations_len(&self) -> usize {
        self.equations.len()
    }

    pub fn variables_size(&self) -> VariableId {
        self.base.variables_size()
    }

    pub fn new_variable_literal(&mut self) -> Literal {
        self.base.new_variable_literal()
    }

    pub fn set_add_max_args(&mut self, value: u32) -> Result<(), DomainError> {
        self.base.config.add_max_args.set(value)
    }

    pub fn set_xor_max_args(&mut self, value: u32) -> Result<(), DomainError> {
        self.base.config.xor_max_args.set(value)
    }

    /// One equation whose terms are the singleton variables in `args`, i.e.
    /// `args[0] ^ args[1] ^ ... `. Shared by `alloc_xor_many`'s direct and
    /// per-chunk paths.
    fn alloc_xor_equation(&mut self, args: &[Literal]) -> Literal {
        self.append_equation();
        for &a in args {
            self.append_equation_term(&[a]);
        }
        self.complete_equation(true)
    }

    /// Sums `words`, consulting `add_max_args` the same way
    /// [`Cnf::add_many`](crate::cnf::Cnf::add_many) does, but combining
    /// carry-save-reduced groups with [`add_carry_eliminated`] instead of
    /// [`crate::word::add_ripple_carry`] to keep the ANF backend's carry-free
    /// representation.
    pub fn add_many<const N: usize>(&mut self, words: &[Word<N>]) -> Word<N> {
        assert!(!words.is_empty());
        if words.len() == 1 {
            return words[0];
        }
        let max_args = (self.base.config.add_max_args.get() as usize).max(2);
        let mut combine2 = |a: &mut Anf, x: Word<N>, y: Word<N>| add_carry_eliminated(a, x, y);
        if words.len() <= max_args {
            return crate::word::carry_save_reduce(self, words, &mut combine2);
        }
        let mut chunks = words.chunks(max_args);
        let mut acc = crate::word::carry_save_reduce(self, chunks.next().unwrap(), &mut combine2);
        for chunk in chunks {
            let chunk_sum = if chunk.len() == 1 {
                chunk[0]
            } else {
                crate::word::carry_save_reduce(self, chunk, &mut combine2)
            };
            acc = add_carry_eliminated(self, acc, chunk_sum);
        }
        acc
    }

    fn terms_size(&self, equation_index: usize) -> usize {
        let start = self.equations[equation_index];
        let end = self
            .equations
            .get(equation_index + 1)
            .copied()
            .unwrap_or(self.terms.len());
        end - start
    }

    fn symbols_size(&self, term_index: usize) -> usize {
        let start = self.terms[term_index];
        let end = self.terms.get(term_index + 1).copied().unwrap_or(self.symbols.len());
        end - start
    }

    fn debug_check_incomplete_last_equation(&self) {
        debug_assert!(!self.equations.is_empty());
        let last = self.equations.len() - 1;
        debug_assert!(self.terms_size(last) > 0);
        let head_term = self.equations[last];
        debug_assert_eq!(self.symbols_size(head_term), 1);
        debug_assert!(self.symbols[self.terms[head_term]].is_constant());
    }

    fn remove_last_equation(&mut self) {
        self.debug_check_incomplete_last_equation();
        let last = self.equations.len() - 1;
        let head_term = self.equations[last];
        let sym_start = self.terms[head_term];
        self.symbols.truncate(sym_start);
        self.terms.truncate(head_term);
        self.equations.pop();
    }

    /// Starts a new equation whose head is the placeholder constant `0`.
    pub fn append_equation(&mut self) {
        self.equations.push(self.terms.len());
        self.terms.push(self.symbols.len());
        self.symbols.push(Literal::CONST_0);
    }

    /// Normalizes `symbols` as one conjunction and inserts (or cancels) it
    /// into the equation currently under construction. See module docs for
    /// the invariant this maintains.
    ///
    /// Negation is eliminated by expansion rather than recursion: a term with
    /// a negated variable is split into a constant-1 substitution and an
    /// unnegated substitution, both pushed back onto an explicit work list.
    pub fn append_equation_term(&mut self, symbols: &[Literal]) {
        self.debug_check_incomplete_last_equation();
        let mut work: Vec<Vec<Literal>> = vec![symbols.to_vec()];

        while let Some(raw) = work.pop() {
            let mut validated: Vec<Literal> = Vec::with_capacity(raw.len());
            let mut zeroed = false;

            for &s in &raw {
                if s.is_constant_0() {
                    zeroed = true;
                    break;
                }
                if s.is_constant_1() {
                    continue;
                }
                if validated.iter().any(|&v| s.is_negation_of(v)) {
                    zeroed = true;
                    break;
                }
                if !validated.contains(&s) {
                    let pos = validated.partition_point(|&v| v.raw() < s.raw());
                    validated.insert(pos, s);
                }
            }

            if zeroed {
                continue;
            }

            if validated.is_empty() {
                // the term collapsed to the constant 1: toggle the head's sign.
                let last = self.equations.len() - 1;
                let head_symbol = self.terms[self.equations[last]];
                self.symbols[head_symbol] = self.symbols[head_symbol].negate();
                continue;
            }

            if let Some(neg_idx) = validated.iter().position(|l| l.is_negation()) {
                let negated_literal = validated[neg_idx];
                let mut as_unnegated = validated.clone();
                as_unnegated[neg_idx] = negated_literal.unnegated();
                let mut as_one = validated;
                as_one[neg_idx] = Literal::CONST_1;
                // push in reverse processing order: `as_one` pops first, matching
                // the source's recursive call order.
                work.push(as_unnegated);
                work.push(as_one);
                continue;
            }

            self.insert_or_cancel_term(&validated);
        }
    }

    fn insert_or_cancel_term(&mut self, validated: &[Literal]) {
        let last = self.equations.len() - 1;
        let equation_terms_size = self.terms_size(last);
        let mut found = None;

        if equation_terms_size > 1 {
            let first_term_index = self.equations[last] + 1; // skip the constant head
            for i in first_term_index..first_term_index + equation_terms_size - 1 {
                if self.symbols_size(i) == validated.len() {
                    let start = self.terms[i];
                    if &self.symbols[start..start + validated.len()] == validated {
                        found = Some(i);
                        break;
                    }
                }
            }
        }

        match found {
            Some(term_index) => {
                let term_len = self.symbols_size(term_index);
                let start = self.terms[term_index];
                self.symbols.drain(start..start + term_len);
                self.terms.remove(term_index);
                for t in self.terms[term_index..].iter_mut() {
                    *t -= term_len;
                }
            }
            None => {
                self.terms.push(self.symbols.len());
                self.symbols.extend_from_slice(validated);
            }
        }
    }

    /// Finalizes the equation under construction:
    /// - head-only ⇒ it was a constant; the equation is discarded and the
    ///   constant returned.
    /// - head plus exactly one single-variable term ⇒ that variable (signed)
    ///   is returned directly and the equation discarded, unless
    ///   `optimize_negation` is false.
    /// - otherwise a fresh variable is allocated to represent the equation.
    pub fn complete_equation(&mut self, optimize_negation: bool) -> Literal {
        self.debug_check_incomplete_last_equation();
        let last = self.equations.len() - 1;
        let equation_terms_size = self.terms_size(last);
        let head_term_index = self.equations[last];
        let head_symbol_index = self.terms[head_term_index];
        let mut result = self.symbols[head_symbol_index];

        if equation_terms_size == 1 {
            self.remove_last_equation();
        } else if optimize_negation
            && equation_terms_size == 2
            && self.symbols_size(head_term_index + 1) == 1
        {
            let single_var = self.symbols[self.terms[head_term_index + 1]];
            result = Literal::substitute_literal(result.negate(), single_var);
            self.remove_last_equation();
        } else {
            let new_var = self.base.new_variable();
            log::trace!(target: "anf", "equation with {equation_terms_size} terms falls through to fresh variable {new_var}");
            let substituted = Literal::substitute_variable(result.negate(), new_var);
            if optimize_negation {
                self.symbols[head_symbol_index] = substituted.unnegated();
                result = substituted;
            } else {
                self.symbols[head_symbol_index] = substituted;
                result = substituted.unnegated();
            }
        }

        result
    }

    /// Term slices of equation `index`, skipping the head.
    pub fn equation_terms(&self, index: usize) -> Vec<&[Literal]> {
        let terms_size = self.terms_size(index);
        let first_term = self.equations[index] + 1;
        (first_term..first_term + terms_size - 1)
            .map(|t| {
                let start = self.terms[t];
                let len = self.symbols_size(t);
                &self.symbols[start..start + len]
            })
            .collect()
    }

    pub fn equation_head(&self, index: usize) -> Literal {
        self.symbols[self.terms[self.equations[index]]]
    }

    fn evaluate_into(&self, variables: &mut VariablesArray) {
        for i in 0..self.equations.len() {
            let terms_size = self.terms_size(i);
            debug_assert!(terms_size >= 2);
            let head = self.symbols[self.terms[self.equations[i]]];
            debug_assert!(head.is_variable());
            let mut value = head.is_negation();
            let variable_id = head.variable_id() as usize;

            for t in self.equations[i] + 1..self.equations[i] + terms_size {
                let start = self.terms[t];
                let len = self.symbols_size(t);
                let mut term_value = true;
                for &sym in &self.symbols[start..start + len] {
                    debug_assert!(sym.is_variable() && !sym.is_negation());
                    let symbol_value = variables.data()[sym.variable_id() as usize];
                    debug_assert!(symbol_value.is_constant());
                    term_value &= symbol_value.is_constant_1();
                }
                value ^= term_value;
            }

            variables.data_mut()[variable_id] = Literal::constant(value);
        }
    }

    /// Turns every negated entry of `template` into a view over an
    /// unnegated variable, appending one one-term equation per negation.
    fn encode_negations(&mut self, template: &mut VariablesArray) {
        for i in 0..template.len() {
            let lit = template.data()[i];
            if lit.is_negation() {
                self.append_equation();
                self.append_equation_term(&[lit]);
                template.data_mut()[i] = self.complete_equation(false);
            }
        }
    }

    /// Binds free variables named by `value_template` to `value`, propagates
    /// constants through every stored equation, then reads the outcome back
    /// out through `result_template`.
    pub fn evaluate(
        &self,
        value_template: &VariablesArray,
        value: &VariablesArray,
        result_template: &VariablesArray,
    ) -> VariablesArray {
        assert!(self.variables_size() > 0);
        let mut variables = VariablesArray::new(self.variables_size() as usize, 1);
        variables.assign_sequence();
        variables
            .assign_template_from(value_template, value)
            .expect("evaluate: conflicting constant assignment");

        self.evaluate_into(&mut variables);

        let mut result = VariablesArray::like(result_template);
        variables.assign_template_into(result_template, &mut result);
        result
    }

    /// Appends equations asserting `name`'s bound variables take on `value`,
    /// then rebinds `name` to `value`.
    pub fn assign_named_variable(&mut self, name: &str, value: &VariablesArray) {
        let template = self
            .base
            .named_variables()
            .get(name)
            .expect("assign_named_variable: unknown name")
            .clone();
        assert_eq!(template.len(), value.len());

        for i in 0..template.len() {
            if template.data()[i] != value.data()[i] {
                self.append_equation();
                self.append_equation_term(&[value.data()[i]]);
                let last = self.equations.len() - 1;
                let head_symbol = self.terms[self.equations[last]];
                let first_id = self.symbols[head_symbol];
                self.symbols[head_symbol] =
                    Literal::substitute_literal(first_id.negate(), template.data()[i]);
            }
        }

        self.base.add_named_variable(name, value);
    }

    /// Rewrites every named variable binding so that no entry is negated,
    /// by appending one defining equation per negated occurrence.
    pub fn normalize_variables(&mut self) {
        let names: Vec<String> = self.base.named_variables().keys().cloned().collect();
        for name in names {
            let mut template = self.base.named_variables().get(&name).unwrap().clone();
            self.encode_negations(&mut template);
            self.base.add_named_variable(&name, &template);
        }
    }
}

impl Encoder for Anf {
    fn alloc_and(&mut self, x: Literal, y: Literal) -> Literal {
        self.append_equation();
        self.append_equation_term(&[x, y]);
        self.complete_equation(true)
    }

    fn alloc_or(&mut self, x: Literal, y: Literal) -> Literal {
        // x | y = x + y + xy
        self.append_equation();
        self.append_equation_term(&[x]);
        self.append_equation_term(&[y]);
        self.append_equation_term(&[x, y]);
        self.complete_equation(true)
    }

    fn alloc_xor2(&mut self, x: Literal, y: Literal) -> Literal {
        self.alloc_xor_many(&[x, y])
    }

    /// Overrides the trait default so `xor_max_args` bounds equation width:
    /// up to that many arguments go into one equation directly; beyond it,
    /// args are chunked into equations of at most `xor_max_args` terms and
    /// the per-chunk results chained with `alloc_xor2` (which allocates a
    /// fresh variable per chunk boundary, same as the CNF side's chaining).
    fn alloc_xor_many(&mut self, args: &[Literal]) -> Literal {
        assert!(!args.is_empty());
        if args.len() == 1 {
            return args[0];
        }
        let max_args = self.base.config.xor_max_args.get() as usize;
        if args.len() <= max_args {
            return self.alloc_xor_equation(args);
        }
        let mut chunks = args.chunks(max_args);
        let mut acc = self.alloc_xor_equation(chunks.next().unwrap());
        for chunk in chunks {
            let chunk_xor = if chunk.len() == 1 { chunk[0] } else { self.alloc_xor_equation(chunk) };
            acc = self.alloc_xor2(acc, chunk_xor);
        }
        acc
    }

    fn alloc_maj(&mut self, x: Literal, y: Literal, z: Literal) -> Literal {
        // xy + xz + yz
        self.append_equation();
        self.append_equation_term(&[x, y]);
        self.append_equation_term(&[x, z]);
        self.append_equation_term(&[y, z]);
        self.complete_equation(true)
    }

    fn alloc_ch(&mut self, x: Literal, y: Literal, z: Literal) -> Literal {
        // x&y ^ ~x&z = xy ^ xz ^ z
        self.append_equation();
        self.append_equation_term(&[x, y]);
        self.append_equation_term(&[x, z]);
        self.append_equation_term(&[z]);
        self.complete_equation(true)
    }
}

impl Anf {
    /// `x + y + x_prev*y_prev + x_prev*r_prev + y_prev*r_prev`, the
    /// carry-eliminated recurrence's per-bit equation, built directly rather
    /// than through the bit-level simplification table (there is nothing to
    /// simplify: every argument is a free variable or result of a prior bit).
    fn add_no_carry(&mut self, x: Literal, y: Literal, x_prev: Literal, y_prev: Literal, r_prev: Literal) -> Literal {
        self.append_equation();
        self.append_equation_term(&[x]);
        self.append_equation_term(&[y]);
        self.append_equation_term(&[x_prev]);
        self.append_equation_term(&[y_prev]);
        self.append_equation_term(&[x_prev, y_prev]);
        self.append_equation_term(&[x_prev, r_prev]);
        self.append_equation_term(&[y_prev, r_prev]);
        self.complete_equation(true)
    }
}

/// The ANF-specialized adder: substitutes out the carry chain algebraically
/// (`c[i-1] = x[i] ⊕ y[i] ⊕ r[i]`), trading one variable per bit for three
/// extra AND terms. See [`crate::word::add_ripple_carry`] for the generic
/// alternative used by CNF.
pub fn add_carry_eliminated<const N: usize>(anf: &mut Anf, x: Word<N>, y: Word<N>) -> Word<N> {
    use crate::bit::Bit;

    let mut result = [Bit::constant(false); N];
    let mut prev = None;
    for i in 0..N {
        let xi = x.0[i].literal();
        let yi = y.0[i].literal();
        let ri = if i == 0 {
            anf.alloc_xor2(xi, yi)
        } else {
            let (x_prev, y_prev, r_prev) = prev.unwrap();
            anf.add_no_carry(xi, yi, x_prev, y_prev, r_prev)
        };
        result[i] = Bit(ri);
        prev = Some((xi, yi, ri));
    }
    Word(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn con2_on_two_fresh_variables_allocates_one_equation() {
        let mut anf = Anf::new();
        let x = anf.new_variable_literal();
        let y = anf.new_variable_literal();
        let _z = anf.alloc_and(x, y);
        assert_eq!(anf.equations_len(), 1);
    }

    #[test]
    fn equation_term_is_stored_in_ascending_literal_order() {
        let mut anf = Anf::new();
        let x = anf.new_variable_literal();
        let y = anf.new_variable_literal();
        // pass the higher-id literal first; the stored term must still come
        // out sorted ascending by raw id.
        let _z = anf.alloc_and(y, x);
        let terms = anf.equation_terms(0);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0], [x, y].as_slice());
    }

    #[test]
    fn xor_many_past_max_args_chains_through_alloc_xor2() {
        let mut anf = Anf::new();
        let args: Vec<Literal> = (0..7).map(|_| anf.new_variable_literal()).collect();
        let equations_before = anf.equations_len();
        let _z = anf.alloc_xor_many(&args);
        // 7 args chunked at the default max of 3 produce 3 direct equations
        // (3, 3, 1) plus 2 `alloc_xor2` combiner equations.
        assert!(anf.equations_len() - equations_before > 1);
    }

    #[test]
    fn add_many_matches_integer_sum_mod_2n() {
        let mut anf = Anf::new();
        let sum = anf.add_many(&[Word::<8>::constant(3), Word::<8>::constant(5), Word::<8>::constant(250), Word::<8>::constant(10)]);
        assert!(sum.is_constant());
        assert_eq!(sum.value(), (3u64 + 5 + 250 + 10) % 256);
    }

    #[test]
    fn appending_the_same_term_twice_cancels_it() {
        let mut anf = Anf::new();
        let x1 = anf.new_variable_literal();
        let x2 = anf.new_variable_literal();
        anf.append_equation();
        anf.append_equation_term(&[x1, x2]);
        anf.append_equation_term(&[x1, x2]);
        // only the placeholder head term remains
        assert_eq!(anf.terms_size(anf.equations_len() - 1), 1);
        let head = anf.complete_equation(true);
        assert_eq!(head, Literal::CONST_0);
        assert_eq!(anf.equations_len(), 0);
    }

    #[test]
    fn equation_invariant_holds_after_complete() {
        let mut anf = Anf::new();
        let x1 = anf.new_variable_literal();
        let x2 = anf.new_variable_literal();
        let x3 = anf.new_variable_literal();
        anf.append_equation();
        anf.append_equation_term(&[x1, x2]);
        anf.append_equation_term(&[x3]);
        let _ = anf.complete_equation(true);
        assert_eq!(anf.equations_len(), 1);
        assert_eq!(anf.terms_size(0), 3); // head + 2 terms
        for t in anf.equation_terms(0) {
            assert!(t.iter().all(|l| l.is_variable() && !l.is_negation()));
        }
    }

    #[test]
    fn symbolic_4bit_add_matches_integer_addition() {
        let mut anf = Anf::new();
        let mut x_lits = vec![];
        let mut y_lits = vec![];
        for _ in 0..4 {
            x_lits.push(anf.new_variable_literal());
        }
        for _ in 0..4 {
            y_lits.push(anf.new_variable_literal());
        }
        let x = Word::<4>::from_big_endian(&{
            let mut v = x_lits.clone();
            v.reverse();
            v
        });
        let y = Word::<4>::from_big_endian(&{
            let mut v = y_lits.clone();
            v.reverse();
            v
        });
        let sum = add_carry_eliminated(&mut anf, x, y);
        assert_eq!(anf.equations_len(), 4); // one defining equation per bit

        let value_template = VariablesArray::from_literals(x_lits.iter().chain(y_lits.iter()).copied().collect(), 1);
        let value = VariablesArray::from_literals(
            vec![
                Literal::CONST_0, Literal::CONST_1, Literal::CONST_0, Literal::CONST_1, // x = 0b1010
                Literal::CONST_0, Literal::CONST_1, Literal::CONST_1, Literal::CONST_0, // y = 0b0110
            ],
            1,
        );
        let result_template = VariablesArray::from_literals(sum.to_big_endian().into_iter().rev().collect(), 1);
        let result = anf.evaluate(&value_template, &value, &result_template);
        let mut total = 0u32;
        for (i, lit) in result.data().iter().enumerate() {
            assert!(lit.is_constant());
            total |= (lit.is_constant_1() as u32) << i;
        }
        assert_eq!(total, 0);
    }
}
