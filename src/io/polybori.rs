//! PolyBoRi-style text writer for ANF equations.
//!
//! Grammar:
//! ```text
//! c variables: N, equations: M
//! c var .key = {name: value, ...}
//! c var name = <literal-array>
//! x_a [+ 1] + x_b * x_c + ...
//! ```
//! One line per equation; the head variable is printed as an ordinary
//! (one-symbol) term, and a trailing `+ 1` is appended when the head carries
//! the ANF formula's negation bit. Variables are written 1-based (`x_1` is
//! variable id 0), matching [`crate::literal::Literal::as_signed`]'s
//! convention.

use std::io::Write;

use crate::anf::Anf;
use crate::error::EncodeError;
use crate::literal::Literal;

pub fn write_polybori<W: Write>(anf: &Anf, writer: &mut W) -> Result<(), EncodeError> {
    writeln!(writer, "c variables: {}, equations: {}", anf.variables_size(), anf.equations_len())?;

    for (key, value) in anf.base.parameters() {
        writeln!(writer, "c var .{key} = {{{value}}}")?;
    }
    for (name, value) in anf.base.named_variables() {
        writeln!(writer, "c var {name} = {value}")?;
    }

    for i in 0..anf.equations_len() {
        write_equation(anf, i, writer)?;
    }
    Ok(())
}

fn write_equation<W: Write>(anf: &Anf, index: usize, writer: &mut W) -> Result<(), EncodeError> {
    let head = anf.equation_head(index);
    write!(writer, "x{}", head.variable_id() + 1)?;
    for term in anf.equation_terms(index) {
        write!(writer, " + ")?;
        for (k, &sym) in term.iter().enumerate() {
            if k > 0 {
                write!(writer, " * ")?;
            }
            write!(writer, "x{}", symbol_id(sym))?;
        }
    }
    if head.is_negation() {
        write!(writer, " + 1")?;
    }
    writeln!(writer)?;
    Ok(())
}

fn symbol_id(lit: Literal) -> u32 {
    lit.variable_id() + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::Encoder;

    #[test]
    fn writes_header_and_one_equation_per_line() {
        let mut anf = Anf::new();
        let x = anf.new_variable_literal();
        let y = anf.new_variable_literal();
        let _z = anf.alloc_and(x, y);

        let mut buf = Vec::new();
        write_polybori(&anf, &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("c variables: 3, equations: 1"));
        assert!(text.contains("x3 + x1 * x2\n") || text.contains("x3 + x1 * x2 + 1\n"));
    }
}
