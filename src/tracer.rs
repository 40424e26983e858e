//! Records named intermediate values produced while encoding a computation,
//! so they show up as `c var name = ...` bindings in the emitted formula
//! rather than being lost once their bits are folded into later expressions.

use crate::formula::FormulaBase;
use crate::variables_array::VariablesArray;
use crate::word::Word;

/// A thin recorder over [`FormulaBase`]'s named-variable bindings, scoped to
/// whole words (and word arrays) rather than individual bits.
pub struct Tracer;

impl Tracer {
    /// Binds `name` to `word`'s bits, most significant bit first.
    pub fn trace_word<const N: usize>(base: &mut FormulaBase, name: &str, word: Word<N>) {
        base.add_named_variable(name, &VariablesArray::from_literals(word.to_big_endian(), N));
    }

    /// Binds element `index` of `name`'s word array to `word`, growing the
    /// binding as needed (see [`FormulaBase::add_named_variable_indexed`]).
    pub fn trace_word_indexed<const N: usize>(
        base: &mut FormulaBase,
        name: &str,
        index: usize,
        word: Word<N>,
    ) {
        base.add_named_variable_indexed(
            name,
            &VariablesArray::from_literals(word.to_big_endian(), N),
            index,
        );
    }

    /// Binds `name` to an entire array of words at once.
    pub fn trace_words<const N: usize>(base: &mut FormulaBase, name: &str, words: &[Word<N>]) {
        let mut data = Vec::with_capacity(words.len() * N);
        for word in words {
            data.extend(word.to_big_endian());
        }
        base.add_named_variable(name, &VariablesArray::from_literals(data, N));
    }
}
