//! Shared text grammar for a literal and a `VariablesArray` binding, as used
//! by both the DIMACS and PolyBoRi text formats: a bare signed literal, the
//! `*`/`0b0`/`0b1` specials, a braced comma list, or a `first..count step n`
//! range.

use crate::error::{EncodeError, ParseError};
use crate::literal::Literal;
use crate::variables_array::VariablesArray;

/// Parses a bare literal token. Malformed text is a [`ParseError`]; a
/// well-formed but out-of-range variable id (untrusted input, unlike the
/// crate's own variable generator) is a [`crate::error::DomainError`] — both
/// fold into [`EncodeError`] so callers handle one error type.
pub fn parse_literal(token: &str) -> Result<Literal, EncodeError> {
    let token = token.trim();
    if token == "*" {
        return Ok(Literal::UNASSIGNED);
    }
    if token == "0b0" {
        return Ok(Literal::CONST_0);
    }
    if token == "0b1" {
        return Ok(Literal::CONST_1);
    }
    let value: i32 = token
        .parse()
        .map_err(|_| ParseError::new(format!("invalid literal '{token}'")))?;
    Literal::from_signed_checked(value).map_err(EncodeError::Domain)
}

pub fn format_literal(lit: Literal) -> String {
    format!("{lit}")
}

/// Parses either a braced list (`{a, b, c}`), a range (`first..count step n`),
/// or a single bare literal, producing an `element_size`-wide array.
pub fn parse_variables_value(text: &str, element_size: usize) -> Result<VariablesArray, EncodeError> {
    let text = text.trim();
    if let Some(inner) = text.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        let data = if inner.trim().is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(parse_literal)
                .collect::<Result<Vec<_>, _>>()?
        };
        return Ok(VariablesArray::from_literals(data, element_size));
    }

    if let Some(dotdot) = text.find("..") {
        let first = parse_literal(&text[..dotdot])?;
        let rest = &text[dotdot + 2..];
        let step_pos = rest
            .find("step")
            .ok_or_else(|| ParseError::new("range is missing 'step'"))?;
        let count: usize = rest[..step_pos]
            .trim()
            .parse()
            .map_err(|_| ParseError::new("invalid range count"))?;
        let step: i32 = rest[step_pos + 4..]
            .trim()
            .parse()
            .map_err(|_| ParseError::new("invalid range step"))?;
        if !first.is_variable() {
            return Err(ParseError::new("range must start at a variable literal").into());
        }
        let first_id = first.variable_id() as i64;
        let mut data = Vec::with_capacity(count * element_size);
        for k in 0..count as i64 {
            for e in 0..element_size as i64 {
                let id = first_id + k * step as i64 * element_size as i64 + e;
                let lit = Literal::from_variable_id_checked(id as u32).map_err(EncodeError::Domain)?;
                data.push(lit.negated_onlyif(first.is_negation()));
            }
        }
        return Ok(VariablesArray::from_literals(data, element_size));
    }

    Ok(VariablesArray::from_literals(vec![parse_literal(text)?], element_size))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_braced_list() {
        let arr = parse_variables_value("{1, -2, 0b0}", 1).unwrap();
        assert_eq!(arr.len(), 3);
        assert_eq!(arr.data()[1], Literal::from_signed(-2));
    }

    #[test]
    fn parses_bare_literal() {
        let arr = parse_variables_value("-5", 1).unwrap();
        assert_eq!(arr.data()[0], Literal::from_signed(-5));
    }

    #[test]
    fn round_trips_through_display() {
        let arr = VariablesArray::from_literals(
            vec![Literal::from_variable_id(0), Literal::from_variable_id(1), Literal::from_variable_id(2)],
            1,
        );
        let text = format!("{arr}");
        let parsed = parse_variables_value(&text, 1).unwrap();
        assert_eq!(parsed.data(), arr.data());
    }

    #[test]
    fn parse_literal_surfaces_domain_error_for_out_of_range_id() {
        match parse_literal(&i32::MIN.to_string()) {
            Err(EncodeError::Domain(crate::error::DomainError::VariableIdOutOfRange { .. })) => {}
            other => panic!("expected a domain error, got {other:?}"),
        }
    }
}
