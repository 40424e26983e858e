//! DIMACS CNF reader/writer.
//!
//! Grammar (one statement per line):
//! ```text
//! c var .key = {name: value, name: "quoted value"}
//! c var name = <literal-array>
//! p cnf <n_vars> <n_clauses>
//! <literal> <literal> ... 0
//! ```
//! Comment lines not matching `c var ...` are ignored. The writer always
//! emits parameters and named variables before the header, matching the
//! source's `DimacsStreamWriter::write` order.

use std::io::{BufRead, Write};

use crate::cnf::Cnf;
use crate::error::{EncodeError, ParseError};
use crate::io::text_literal::{parse_literal, parse_variables_value};
use crate::literal::Literal;

pub fn read_dimacs<R: BufRead>(reader: R) -> Result<Cnf, EncodeError> {
    let mut cnf = Cnf::new();
    let mut header_seen = false;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(rest) = line.strip_prefix('c') {
            let rest = rest.trim();
            if let Some(rest) = rest.strip_prefix("var") {
                let rest = rest.trim();
                if let Some(rest) = rest.strip_prefix('.') {
                    read_parameters(&mut cnf, rest, line_no)?;
                } else {
                    read_named_variable(&mut cnf, rest, line_no)?;
                }
            }
            continue;
        }

        if let Some(rest) = line.strip_prefix('p') {
            if header_seen {
                return Err(ParseError::at_line(line_no, "duplicate header").into());
            }
            let mut parts = rest.split_whitespace();
            let kind = parts.next().ok_or_else(|| ParseError::at_line(line_no, "missing 'cnf' token"))?;
            if kind != "cnf" {
                return Err(ParseError::at_line(line_no, "expected 'cnf'").into());
            }
            let n_vars: u32 = parts
                .next()
                .ok_or_else(|| ParseError::at_line(line_no, "missing variable count"))?
                .parse()
                .map_err(|_| ParseError::at_line(line_no, "invalid variable count"))?;
            let _n_clauses: u32 = parts
                .next()
                .ok_or_else(|| ParseError::at_line(line_no, "missing clause count"))?
                .parse()
                .map_err(|_| ParseError::at_line(line_no, "invalid clause count"))?;
            for _ in 0..n_vars {
                cnf.new_variable_literal();
            }
            header_seen = true;
            continue;
        }

        if !header_seen {
            return Err(ParseError::at_line(line_no, "clause before header").into());
        }
        let mut literals = Vec::new();
        for token in line.split_whitespace() {
            if token == "0" {
                break;
            }
            literals.push(parse_literal(token).map_err(|e| with_line(line_no, e))?);
        }
        cnf.append_clause(&literals)?;
    }

    Ok(cnf)
}

fn read_parameters(cnf: &mut Cnf, rest: &str, line_no: usize) -> Result<(), ParseError> {
    let (key, rest) = rest
        .split_once('=')
        .ok_or_else(|| ParseError::at_line(line_no, "malformed parameter line"))?;
    let key = key.trim();
    let inner = rest
        .trim()
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .ok_or_else(|| ParseError::at_line(line_no, "parameter block must be braced"))?;

    for item in inner.split(',') {
        let (name, value) = item
            .split_once(':')
            .ok_or_else(|| ParseError::at_line(line_no, "malformed parameter entry"))?;
        let name = name.trim();
        let value = value.trim();
        if let Some(unquoted) = value.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
            cnf.base.add_parameter(key, name, unquoted, true);
        } else {
            cnf.base.add_parameter(key, name, value, false);
        }
    }
    Ok(())
}

fn read_named_variable(cnf: &mut Cnf, rest: &str, line_no: usize) -> Result<(), EncodeError> {
    let (name, value) = rest
        .split_once('=')
        .ok_or_else(|| ParseError::at_line(line_no, "malformed named variable line"))?;
    let value = parse_variables_value(value.trim(), 1).map_err(|e| with_line(line_no, e))?;
    cnf.base.add_named_variable(name.trim(), &value);
    Ok(())
}

/// Re-stamps a line number onto a [`ParseError`] produced deeper in the
/// parsing call chain; a [`crate::error::DomainError`] (e.g. an out-of-range
/// literal) has no natural line association and is passed through unchanged.
fn with_line(line_no: usize, e: EncodeError) -> EncodeError {
    match e {
        EncodeError::Parse(p) => EncodeError::Parse(ParseError::at_line(line_no, p.message)),
        other => other,
    }
}

pub fn write_dimacs<W: Write>(cnf: &Cnf, writer: &mut W) -> Result<(), EncodeError> {
    for (key, value) in cnf.base.parameters() {
        if key != "writer" {
            writeln!(writer, "c var .{key} = {{{value}}}")?;
        }
    }
    if !cnf.is_empty() {
        let order = if cnf.is_compare_left_right { "left-right" } else { "right-left" };
        writeln!(
            writer,
            "c var .writer = {{is_sorted: 1, literals_order: \"ascending\", literals_compare_order: \"{order}\"}}"
        )?;
    }
    for (name, value) in cnf.base.named_variables() {
        writeln!(writer, "c var {name} = {value}")?;
    }

    writeln!(writer, "p cnf {} {}", cnf.base.variables_size(), cnf.clauses_len())?;
    for clause in cnf.clauses() {
        for lit in clause {
            write!(writer, "{} ", signed(*lit))?;
        }
        writeln!(writer, "0")?;
    }
    Ok(())
}

fn signed(lit: Literal) -> i32 {
    lit.as_signed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn round_trips_a_small_formula() {
        let mut cnf = Cnf::new();
        let x = cnf.new_variable_literal();
        let y = cnf.new_variable_literal();
        cnf.append_clause(&[x, y]).unwrap();
        cnf.append_clause(&[x.negate(), y.negate()]).unwrap();

        let mut buf = Vec::new();
        write_dimacs(&cnf, &mut buf).unwrap();

        let parsed = read_dimacs(Cursor::new(buf)).unwrap();
        assert_eq!(parsed.clauses_len(), 2);
        assert_eq!(parsed.clause(0), cnf.clause(0));
    }

    #[test]
    fn rejects_clause_with_out_of_range_literal() {
        let text = format!("p cnf 1 1\n{} 0\n", i32::MIN);
        match read_dimacs(Cursor::new(text)) {
            Err(EncodeError::Domain(crate::error::DomainError::VariableIdOutOfRange { .. })) => {}
            other => panic!("expected a domain error, got {other:?}"),
        }
    }

    #[test]
    fn rejects_clause_before_header() {
        let text = "1 2 0\n";
        assert!(read_dimacs(Cursor::new(text)).is_err());
    }
}
