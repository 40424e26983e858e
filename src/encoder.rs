//! The narrow interface between bit/word algebra and a concrete formula
//! backend (CNF or ANF).
//!
//! [`bit`](crate::bit) and [`word`](crate::word) perform every algebraic
//! simplification they can without allocating; when a rule doesn't fire they
//! fall through to one of these `alloc_*` methods, which is the only place a
//! fresh variable and its defining clause/equation get appended.

use crate::literal::Literal;

/// Backend-specific allocation of a fresh variable for an operation that
/// could not be simplified away.
pub trait Encoder {
    fn alloc_and(&mut self, x: Literal, y: Literal) -> Literal;
    fn alloc_or(&mut self, x: Literal, y: Literal) -> Literal;

    /// Two-argument xor, used as the default fold step for [`Encoder::alloc_xor_many`].
    fn alloc_xor2(&mut self, x: Literal, y: Literal) -> Literal;

    /// `args[0] ^ args[1] ^ ... ^ args[n-1]` for `args.len() >= 1`.
    ///
    /// The default left-folds through [`Encoder::alloc_xor2`], matching the
    /// generic n-ary reduction every bit operator otherwise follows. ANF
    /// overrides this to build a single batched equation instead, since it
    /// can fold any number of xor terms without allocating an intermediate
    /// variable per pair.
    fn alloc_xor_many(&mut self, args: &[Literal]) -> Literal {
        assert!(!args.is_empty());
        let mut acc = args[0];
        for &a in &args[1..] {
            acc = self.alloc_xor2(acc, a);
        }
        acc
    }

    fn alloc_maj(&mut self, x: Literal, y: Literal, z: Literal) -> Literal;
    fn alloc_ch(&mut self, x: Literal, y: Literal, z: Literal) -> Literal;
}
