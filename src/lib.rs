/*!
A library for encoding bit and word level boolean expressions into CNF and
ANF formulas, for use by SAT and Gröbner basis solvers.

bool_algebra builds boolean circuits out of [bits](crate::bit) and
fixed-width [words](crate::word), and lowers them into one of two formula
representations as the circuit is built:
- [`cnf::Cnf`], a Tseitin-encoded clause set consumable by any DIMACS-reading
  SAT solver.
- [`anf::Anf`], a system of equations over GF(2) consumable by Gröbner basis
  tools such as PolyBoRi.

Both share the same [`bit::Logical`], [`bit::Majority`], [`bit::Choose`], and
[`bit::Parity`] capability traits and the same [`encoder::Encoder`] seam, so
a circuit written once encodes into either backend.

# Orientation

- [`literal`] is the signed-literal codec every other module builds on.
- [`variables_array`] and [`formula`] hold a formula's named variables and
  parameters.
- [`bit`] and [`word`] are where circuits are actually expressed.
- [`io`] reads and writes the DIMACS and PolyBoRi text formats.
- [`tracer`] records named intermediate values as a circuit is built.
*/

pub mod anf;
pub mod bit;
pub mod cnf;
pub mod config;
pub mod encoder;
pub mod error;
pub mod formula;
pub mod io;
pub mod literal;
pub mod tracer;
pub mod variable;
pub mod variables_array;
pub mod word;
