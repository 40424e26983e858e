//! CNF (Conjunctive Normal Form) clause store, encoded via the standard
//! Tseitin transformation.
//!
//! Unlike [`crate::anf`], which inherits its equation algebra directly from
//! the source material, this backend has no original-source bit-level
//! encoder to transliterate: SAT solvers consume plain CNF, so each
//! `alloc_*` method below builds the textbook clause set defining the new
//! variable in terms of its operands.

use crate::encoder::Encoder;
use crate::error::DomainError;
use crate::formula::FormulaBase;
use crate::literal::Literal;

/// Largest number of literals a single clause may hold. Every Tseitin clause
/// this backend emits has at most four literals; the margin above that
/// covers clauses a caller appends directly through [`Cnf::append_clause`].
pub const CLAUSE_SIZE_MAX: usize = 16;

#[derive(Clone, Debug, Default)]
pub struct Cnf {
    pub base: FormulaBase,
    literals: Vec<Literal>,
    clause_offsets: Vec<usize>,
    /// Preserved verbatim from the source's DIMACS writer flag; this crate
    /// assigns it no behavior of its own (see `DESIGN.md`).
    pub is_compare_left_right: bool,
}

impl Cnf {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_variable_literal(&mut self) -> Literal {
        self.base.new_variable_literal()
    }

    pub fn clauses_len(&self) -> usize {
        self.clause_offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clause_offsets.is_empty()
    }

    fn clause_len(&self, index: usize) -> usize {
        let start = self.clause_offsets[index];
        let end = self
            .clause_offsets
            .get(index + 1)
            .copied()
            .unwrap_or(self.literals.len());
        end - start
    }

    pub fn clause(&self, index: usize) -> &[Literal] {
        let start = self.clause_offsets[index];
        let len = self.clause_len(index);
        &self.literals[start..start + len]
    }

    pub fn clauses(&self) -> impl Iterator<Item = &[Literal]> {
        (0..self.clauses_len()).map(move |i| self.clause(i))
    }

    /// Appends a clause verbatim. Rejects anything over [`CLAUSE_SIZE_MAX`];
    /// does not deduplicate or simplify, unlike the ANF equation store.
    pub fn append_clause(&mut self, literals: &[Literal]) -> Result<(), DomainError> {
        if literals.len() > CLAUSE_SIZE_MAX {
            return Err(DomainError::ClauseTooLarge {
                size: literals.len(),
                max: CLAUSE_SIZE_MAX,
            });
        }
        self.clause_offsets.push(self.literals.len());
        self.literals.extend_from_slice(literals);
        Ok(())
    }

    fn append_clause_unchecked(&mut self, literals: &[Literal]) {
        self.append_clause(literals)
            .expect("internal Tseitin clause exceeded CLAUSE_SIZE_MAX");
    }

    /// Sums `words`, consulting `add_max_args` to decide how many operands a
    /// single carry-save reduction round folds before chaining a full
    /// [`crate::word::add_ripple_carry`] between groups. See
    /// [`crate::word::add_many`].
    pub fn add_many<const N: usize>(&mut self, words: &[crate::word::Word<N>]) -> crate::word::Word<N> {
        let max_args = self.base.config.add_max_args.get();
        crate::word::add_many(self, words, max_args)
    }

    /// A direct n-ary Tseitin XOR gate defining `z = args[0] ^ ... ^
    /// args[args.len()-1]`: one clause per sign pattern of odd parity over
    /// `args` plus `z`, forbidding every assignment that would violate the
    /// XOR. Used directly when `args.len() <= xor_max_args`; chunked and
    /// chained via [`Encoder::alloc_xor2`] otherwise (see `alloc_xor_many`).
    fn alloc_xor_direct(&mut self, args: &[Literal]) -> Literal {
        let z = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_xor_direct allocating fresh variable {z:?} over {} args", args.len());
        let n = args.len();
        for mask in 0u32..(1 << (n + 1)) {
            if (mask.count_ones() % 2) == 0 {
                continue;
            }
            let mut clause: Vec<Literal> = Vec::with_capacity(n + 1);
            for (i, &a) in args.iter().enumerate() {
                clause.push(if (mask >> i) & 1 == 1 { a.negate() } else { a });
            }
            clause.push(if (mask >> n) & 1 == 1 { z.negate() } else { z });
            self.append_clause_unchecked(&clause);
        }
        z
    }
}

impl Encoder for Cnf {
    fn alloc_and(&mut self, x: Literal, y: Literal) -> Literal {
        let z = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_and allocating fresh variable {z:?}");
        self.append_clause_unchecked(&[x.negate(), y.negate(), z]);
        self.append_clause_unchecked(&[x, z.negate()]);
        self.append_clause_unchecked(&[y, z.negate()]);
        z
    }

    fn alloc_or(&mut self, x: Literal, y: Literal) -> Literal {
        let z = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_or allocating fresh variable {z:?}");
        self.append_clause_unchecked(&[x, y, z.negate()]);
        self.append_clause_unchecked(&[x.negate(), z]);
        self.append_clause_unchecked(&[y.negate(), z]);
        z
    }

    fn alloc_xor2(&mut self, x: Literal, y: Literal) -> Literal {
        let z = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_xor2 allocating fresh variable {z:?}");
        self.append_clause_unchecked(&[x.negate(), y.negate(), z.negate()]);
        self.append_clause_unchecked(&[x, y, z.negate()]);
        self.append_clause_unchecked(&[x, y.negate(), z]);
        self.append_clause_unchecked(&[x.negate(), y, z]);
        z
    }

    /// Overrides the trait default fold so `xor_max_args` actually bounds
    /// circuit shape: up to that many arguments get one direct n-ary gate
    /// (fewer variables, more clauses); beyond it, args are chunked and the
    /// per-chunk gates chained with `alloc_xor2` (more variables, bounded
    /// clause count per gate).
    fn alloc_xor_many(&mut self, args: &[Literal]) -> Literal {
        assert!(!args.is_empty());
        if args.len() == 1 {
            return args[0];
        }
        let max_args = self.base.config.xor_max_args.get() as usize;
        if args.len() <= max_args {
            return self.alloc_xor_direct(args);
        }
        let mut chunks = args.chunks(max_args);
        let mut acc = self.alloc_xor_direct(chunks.next().unwrap());
        for chunk in chunks {
            let chunk_xor = if chunk.len() == 1 { chunk[0] } else { self.alloc_xor_direct(chunk) };
            acc = self.alloc_xor2(acc, chunk_xor);
        }
        acc
    }

    fn alloc_maj(&mut self, x: Literal, y: Literal, z: Literal) -> Literal {
        let w = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_maj allocating fresh variable {w:?}");
        self.append_clause_unchecked(&[x.negate(), y.negate(), w]);
        self.append_clause_unchecked(&[x.negate(), z.negate(), w]);
        self.append_clause_unchecked(&[y.negate(), z.negate(), w]);
        self.append_clause_unchecked(&[x, y, w.negate()]);
        self.append_clause_unchecked(&[x, z, w.negate()]);
        self.append_clause_unchecked(&[y, z, w.negate()]);
        w
    }

    fn alloc_ch(&mut self, x: Literal, y: Literal, z: Literal) -> Literal {
        let w = self.new_variable_literal();
        log::trace!(target: "cnf", "alloc_ch allocating fresh variable {w:?}");
        self.append_clause_unchecked(&[x.negate(), y.negate(), w]);
        self.append_clause_unchecked(&[x.negate(), y, w.negate()]);
        self.append_clause_unchecked(&[x, z.negate(), w]);
        self.append_clause_unchecked(&[x, z, w.negate()]);
        w
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bit::{Bit, Logical};

    #[test]
    fn constant_fold_and_allocates_no_clauses() {
        let mut cnf = Cnf::new();
        let x = Bit(cnf.new_variable_literal());
        let one = Bit::constant(true);
        let result = one.con2(x, &mut cnf);
        assert_eq!(result, x);
        assert_eq!(cnf.clauses_len(), 0);
    }

    #[test]
    fn contradiction_folds_without_allocating() {
        let mut cnf = Cnf::new();
        let x = Bit(cnf.new_variable_literal());
        let result = x.con2(x.inv(), &mut cnf);
        assert_eq!(result, Bit::constant(false));
        assert_eq!(cnf.clauses_len(), 0);
    }

    #[test]
    fn and_allocates_three_defining_clauses() {
        let mut cnf = Cnf::new();
        let x = cnf.new_variable_literal();
        let y = cnf.new_variable_literal();
        let _z = cnf.alloc_and(x, y);
        assert_eq!(cnf.clauses_len(), 3);
        for clause in cnf.clauses() {
            assert!(clause.len() <= 3);
        }
    }

    #[test]
    fn xor_many_within_max_args_allocates_a_single_variable() {
        let mut cnf = Cnf::new();
        assert_eq!(cnf.base.config.xor_max_args.get(), 3);
        let args: Vec<Literal> = (0..3).map(|_| cnf.new_variable_literal()).collect();
        let before = cnf.base.variables_size();
        let _z = cnf.alloc_xor_many(&args);
        assert_eq!(cnf.base.variables_size(), before + 1);
    }

    #[test]
    fn xor_many_past_max_args_chains_fresh_variables() {
        let mut cnf = Cnf::new();
        let args: Vec<Literal> = (0..7).map(|_| cnf.new_variable_literal()).collect();
        let before = cnf.base.variables_size();
        let _z = cnf.alloc_xor_many(&args);
        // 7 args over a max of 3 chunk into 3 groups (3, 3, 1), each direct
        // group past the first allocating one gate variable plus one
        // `alloc_xor2` combiner variable.
        assert!(cnf.base.variables_size() > before + 1);
    }

    #[test]
    fn add_many_matches_integer_sum_mod_2n() {
        use crate::word::Word;

        let mut cnf = Cnf::new();
        let words: Vec<Word<8>> = [3u64, 5, 250, 10].into_iter().map(Word::constant).collect();
        let sum = cnf.add_many(&words);
        assert!(sum.is_constant());
        assert_eq!(sum.value(), (3u64 + 5 + 250 + 10) % 256);
    }

    #[test]
    fn clause_too_large_is_rejected() {
        let mut cnf = Cnf::new();
        let literals: Vec<Literal> = (0..CLAUSE_SIZE_MAX + 1)
            .map(|_| cnf.new_variable_literal())
            .collect();
        assert!(cnf.append_clause(&literals).is_err());
    }

    #[test]
    fn four_bit_symbolic_ripple_carry_add_matches_integer_addition() {
        use crate::word::{add_ripple_carry, Word};

        let mut cnf = Cnf::new();
        let x = Word::<4>::from_big_endian(&{
            let mut v: Vec<Literal> = (0..4).map(|_| cnf.new_variable_literal()).collect();
            v.reverse();
            v
        });
        let y = Word::<4>::constant(0b0011);
        let sum = add_ripple_carry(&mut cnf, x, y);
        assert!(cnf.clauses_len() > 0);
        assert!(!sum.is_constant());
    }
}
