//! S5: a formula with parameters and named variables survives a
//! write/read/write cycle byte-for-byte.

use bool_algebra::cnf::Cnf;
use bool_algebra::io::dimacs::{read_dimacs, write_dimacs};
use bool_algebra::literal::Literal;
use bool_algebra::variables_array::VariablesArray;

#[test]
fn write_read_write_is_byte_identical() {
    let mut cnf = Cnf::new();
    let _v1 = cnf.new_variable_literal();
    let _v2 = cnf.new_variable_literal();
    let _v3 = cnf.new_variable_literal();

    cnf.append_clause(&[Literal::from_signed(1), Literal::from_signed(-2)]).unwrap();
    cnf.append_clause(&[Literal::from_signed(2), Literal::from_signed(3)]).unwrap();

    cnf.base.add_parameter("origin", "hash", "test", true);
    cnf.base.add_named_variable(
        "a",
        &VariablesArray::from_literals(
            vec![Literal::from_signed(1), Literal::from_signed(2), Literal::from_signed(3)],
            1,
        ),
    );

    let mut first = Vec::new();
    write_dimacs(&cnf, &mut first).unwrap();

    let parsed = read_dimacs(std::io::Cursor::new(&first)).unwrap();

    let mut second = Vec::new();
    write_dimacs(&parsed, &mut second).unwrap();

    assert_eq!(first, second);
}
