//! Single-bit boolean expressions and their algebraic simplification.
//!
//! The encoder keeps four capability traits separate — [`Logical`],
//! [`Majority`], [`Choose`], [`Parity`] — rather than one fat interface, so a
//! type only needs to implement the operations it actually exposes. [`Bit`]
//! implements all four directly over a single stored [`Literal`]; see
//! [`crate::word::Word`] for the element-wise lift to fixed-width words.
//!
//! Every operation first tries a table of algebraic identities that avoid
//! allocating a fresh variable (constant folding, idempotence, absorption);
//! only when nothing applies does it fall through to [`Encoder`].

use crate::encoder::Encoder;
use crate::literal::Literal;

/// A single boolean-valued expression, represented directly by the literal it
/// denotes. Cheap to copy; there is no separate node allocation because a
/// literal already is the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bit(pub Literal);

impl Bit {
    pub const fn constant(value: bool) -> Self {
        Bit(Literal::constant(value))
    }

    pub const fn literal(self) -> Literal {
        self.0
    }

    pub const fn is_constant(self) -> bool {
        self.0.is_constant()
    }
}

impl From<Literal> for Bit {
    fn from(lit: Literal) -> Self {
        Bit(lit)
    }
}

/// `inv`, pairwise and reduce-left and/or/xor.
pub trait Logical: Copy {
    fn inv(self) -> Self;
    fn con2(self, other: Self, enc: &mut impl Encoder) -> Self;
    fn dis2(self, other: Self, enc: &mut impl Encoder) -> Self;
    fn eor2(self, other: Self, enc: &mut impl Encoder) -> Self;

    fn con(args: &[Self], enc: &mut impl Encoder) -> Self {
        assert!(args.len() >= 2);
        let mut acc = args[0];
        for &a in &args[1..] {
            acc = acc.con2(a, enc);
        }
        acc
    }

    fn dis(args: &[Self], enc: &mut impl Encoder) -> Self {
        assert!(args.len() >= 2);
        let mut acc = args[0];
        for &a in &args[1..] {
            acc = acc.dis2(a, enc);
        }
        acc
    }
}

/// `maj(x, y, z) = xy ⊕ xz ⊕ yz`.
pub trait Majority: Copy {
    fn maj(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self;
}

/// `ch(x, y, z) = x ? y : z = xy ⊕ (¬x)z`.
pub trait Choose: Copy {
    fn ch(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self;
}

/// `parity(x, y, z) = x ⊕ y ⊕ z`.
pub trait Parity: Copy {
    fn parity(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self;
}

impl Logical for Bit {
    fn inv(self) -> Self {
        Bit(self.0.negate())
    }

    fn con2(self, other: Self, enc: &mut impl Encoder) -> Self {
        Bit(reduce_con2(self.0, other.0).unwrap_or_else(|| {
            log::trace!(target: "bit", "con2({:?}, {:?}) allocating, no reduction applies", self.0, other.0);
            enc.alloc_and(self.0, other.0)
        }))
    }

    fn dis2(self, other: Self, enc: &mut impl Encoder) -> Self {
        Bit(reduce_dis2(self.0, other.0).unwrap_or_else(|| {
            log::trace!(target: "bit", "dis2({:?}, {:?}) allocating, no reduction applies", self.0, other.0);
            enc.alloc_or(self.0, other.0)
        }))
    }

    fn eor2(self, other: Self, enc: &mut impl Encoder) -> Self {
        Bit(enc.alloc_xor_many(&[self.0, other.0]))
    }
}

impl Majority for Bit {
    fn maj(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self {
        Bit(reduce_maj(self, y, z, enc).unwrap_or_else(|| enc.alloc_maj(self.0, y.0, z.0)))
    }
}

impl Choose for Bit {
    fn ch(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self {
        Bit(reduce_ch(self, y, z, enc).unwrap_or_else(|| enc.alloc_ch(self.0, y.0, z.0)))
    }
}

impl Parity for Bit {
    fn parity(self, y: Self, z: Self, enc: &mut impl Encoder) -> Self {
        Bit(enc.alloc_xor_many(&[self.0, y.0, z.0]))
    }
}

/// n-ary xor, always delegated directly to the encoder: unlike con/dis it has
/// no pairwise simplification table, so there is nothing to try before
/// allocating.
pub fn eor(args: &[Bit], enc: &mut impl Encoder) -> Bit {
    assert!(!args.is_empty());
    let lits: Vec<Literal> = args.iter().map(|b| b.0).collect();
    Bit(enc.alloc_xor_many(&lits))
}

fn reduce_con2(x: Literal, y: Literal) -> Option<Literal> {
    if x == y {
        Some(x)
    } else if x.is_negation_of(y) {
        Some(Literal::CONST_0)
    } else if x.is_constant_0() || y.is_constant_0() {
        Some(Literal::CONST_0)
    } else if x.is_constant_1() {
        Some(y)
    } else if y.is_constant_1() {
        Some(x)
    } else {
        None
    }
}

fn reduce_dis2(x: Literal, y: Literal) -> Option<Literal> {
    if x == y {
        Some(x)
    } else if x.is_negation_of(y) {
        Some(Literal::CONST_1)
    } else if x.is_constant_0() {
        Some(y)
    } else if y.is_constant_0() {
        Some(x)
    } else if x.is_constant_1() || y.is_constant_1() {
        Some(Literal::CONST_1)
    } else {
        None
    }
}

fn reduce_maj(x: Bit, y: Bit, z: Bit, enc: &mut impl Encoder) -> Option<Bit> {
    if x.0.is_constant_0() {
        Some(y.con2(z, enc))
    } else if y.0.is_constant_0() {
        Some(x.con2(z, enc))
    } else if z.0.is_constant_0() {
        Some(x.con2(y, enc))
    } else if x.0.is_constant_1() {
        Some(y.dis2(z, enc))
    } else if y.0.is_constant_1() {
        Some(x.dis2(z, enc))
    } else if z.0.is_constant_1() {
        Some(x.dis2(y, enc))
    } else if x.0 == y.0 || x.0 == z.0 {
        Some(x)
    } else if y.0 == z.0 {
        Some(y)
    } else {
        None
    }
}

/// Direct transliteration of the source's `reduce_ch` case table: every case
/// that can be resolved without introducing a fresh variable, tried in order.
fn reduce_ch(x: Bit, y: Bit, z: Bit, enc: &mut impl Encoder) -> Option<Bit> {
    if x.0.is_constant_0() {
        return Some(z);
    }
    if x.0.is_constant_1() || y.0 == z.0 {
        return Some(y);
    }
    if y.0.is_constant() && z.0.is_constant() {
        return if y.0 == z.0 {
            Some(y)
        } else if y.0.is_constant_0() {
            Some(x.inv())
        } else {
            Some(x)
        };
    }
    if y.0.is_constant_0() || y.0.is_negation_of(x.0) {
        return Some(x.inv().con2(z, enc));
    }
    if y.0 == x.0 && z.0.is_constant_0() {
        return Some(x);
    }
    if y.0 == x.0 && z.0.is_constant_1() {
        return Some(Bit::constant(true));
    }
    if y.0.is_constant_1() && z.0.is_negation_of(x.0) {
        return Some(Bit::constant(true));
    }
    if y.0.is_constant_1() || y.0 == x.0 {
        // x ^ !x*z == x | z
        return Some(x.dis2(z, enc));
    }
    if z.0.is_constant_0() || z.0 == x.0 {
        return Some(x.con2(y, enc));
    }
    if z.0.is_constant_1() || z.0.is_negation_of(x.0) {
        // x&y ^ !x == !(x&!y) == !x | y
        return Some(x.inv().dis2(y, enc));
    }
    if z.0.is_negation_of(y.0) {
        // !(x^y)
        return Some(x.eor2(y, enc).inv());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cnf::Cnf;

    #[test]
    fn con2_constant_fold_leaves_x_unchanged() {
        let mut cnf = Cnf::new();
        let x = Bit(cnf.new_variable_literal());
        let one = Bit::constant(true);
        let result = one.con2(x, &mut cnf);
        assert_eq!(result, x);
        assert_eq!(cnf.clauses_len(), 0);
    }

    #[test]
    fn con2_contradiction_folds_to_zero() {
        let mut cnf = Cnf::new();
        let x = Bit(cnf.new_variable_literal());
        let result = x.con2(x.inv(), &mut cnf);
        assert_eq!(result, Bit::constant(false));
        assert_eq!(cnf.clauses_len(), 0);
    }

    #[test]
    fn maj_with_a_constant_arm_folds_to_con2_or_dis2() {
        let mut cnf = Cnf::new();
        let y = Bit(cnf.new_variable_literal());
        let z = Bit(cnf.new_variable_literal());
        let zero = Bit::constant(false);
        let via_maj = zero.maj(y, z, &mut cnf);
        let clauses_after_maj = cnf.clauses_len();

        let mut cnf2 = Cnf::new();
        let y2 = Bit(cnf2.new_variable_literal());
        let z2 = Bit(cnf2.new_variable_literal());
        let via_con2 = y2.con2(z2, &mut cnf2);

        assert_eq!(clauses_after_maj, cnf2.clauses_len());
        assert_eq!(via_maj.0.is_variable(), via_con2.0.is_variable());
    }

    #[test]
    fn ch_with_constant_selector_picks_the_right_arm() {
        let mut cnf = Cnf::new();
        let y = Bit(cnf.new_variable_literal());
        let z = Bit(cnf.new_variable_literal());
        assert_eq!(Bit::constant(false).ch(y, z, &mut cnf), z);
        assert_eq!(Bit::constant(true).ch(y, z, &mut cnf), y);
    }
}
