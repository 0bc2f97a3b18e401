use chemparse::{Composition, FormulaError, Parser, parse_formula};
use miette::Diagnostic;
use pretty_assertions::assert_eq;

fn assert_composition(formula: &str, expected: &[(&str, f64)]) {
    let composition = parse_formula(formula)
        .unwrap_or_else(|e| panic!("`{formula}` failed to parse: {e}"));

    let mut symbols: Vec<_> = expected.iter().map(|(symbol, _)| *symbol).collect();
    symbols.sort();
    let found: Vec<_> = composition.iter().map(|(symbol, _)| symbol).collect();
    assert_eq!(found, symbols, "symbols of `{formula}`");

    for (symbol, count) in expected {
        let got = composition.get(symbol).unwrap();
        assert!(
            (got - count).abs() < 1e-9,
            "`{formula}`: expected {symbol}:{count}, got {symbol}:{got}"
        );
    }
}

#[test]
fn hydrates() {
    assert_composition("CaO·H2O", &[("Ca", 1.0), ("O", 2.0), ("H", 2.0)]);
    assert_composition("CaO·1H2O", &[("Ca", 1.0), ("O", 2.0), ("H", 2.0)]);
    assert_composition("CaO·2H2O", &[("Ca", 1.0), ("O", 3.0), ("H", 4.0)]);
    assert_composition("CaO·2(H2O)", &[("Ca", 1.0), ("O", 3.0), ("H", 4.0)]);
    assert_composition("2(CaO)·2(H2O)", &[("Ca", 2.0), ("O", 4.0), ("H", 4.0)]);
    assert_composition(
        "2(CaO)·2(SiO2)·2(H2O)",
        &[("Ca", 2.0), ("Si", 2.0), ("O", 8.0), ("H", 4.0)],
    );
}

#[test]
fn calcium_silicate_hydrates() {
    assert_composition("Ca2SiO3(OH)2", &[("Ca", 2.0), ("Si", 1.0), ("O", 5.0), ("H", 2.0)]);
    assert_composition(
        "Ca7Si16O38(OH)2",
        &[("Ca", 7.0), ("Si", 16.0), ("O", 40.0), ("H", 2.0)],
    );
    assert_composition(
        "Ca6.4(H0.6Si2O7)2(OH)2",
        &[("Ca", 6.4), ("H", 3.2), ("Si", 4.0), ("O", 16.0)],
    );
    assert_composition(
        "Ca9Si6O18(OH)6·8H2O",
        &[("Ca", 9.0), ("Si", 6.0), ("O", 32.0), ("H", 22.0)],
    );
    assert_composition(
        "Ca9Si6O18(OH)6·8(H2O)",
        &[("Ca", 9.0), ("Si", 6.0), ("O", 32.0), ("H", 22.0)],
    );
}

#[test]
fn nested_brackets() {
    assert_composition("COOH[C[CH3]2]3CH3", &[("C", 11.0), ("O", 2.0), ("H", 22.0)]);
    assert_composition("COOH(C(CH3)2)3CH3", &[("C", 11.0), ("O", 2.0), ("H", 22.0)]);
    assert_composition("(NH4)3PO4", &[("N", 3.0), ("H", 12.0), ("P", 1.0), ("O", 4.0)]);
}

#[test]
fn all_dot_glyphs_are_equivalent() {
    let middle = parse_formula("CuSO4·5H2O").unwrap();
    assert_eq!(parse_formula("CuSO4•5H2O").unwrap(), middle);
    assert_eq!(parse_formula("CuSO4∙5H2O").unwrap(), middle);
    assert_eq!(parse_formula("CuSO4\u{0387}5H2O").unwrap(), middle);
}

#[test]
fn multiplier_of_one_is_a_no_op() {
    let plain = parse_formula("CaOH2O").unwrap();
    assert_eq!(parse_formula("CaO(H2O)").unwrap(), plain);
    assert_eq!(parse_formula("CaO(H2O)1").unwrap(), plain);
    assert_eq!(parse_formula("CaO1(H2O)").unwrap(), plain);
}

#[test]
fn error_kinds() {
    assert!(matches!(parse_formula(""), Err(FormulaError::InvalidArgument(_))));
    assert!(matches!(
        parse_formula(")H2"),
        Err(FormulaError::UnbalancedRightDelimiter(_))
    ));
    assert!(matches!(
        parse_formula("(H2"),
        Err(FormulaError::UnbalancedLeftDelimiter(_))
    ));
    assert!(matches!(
        parse_formula("2(H2)3"),
        Err(FormulaError::ConflictingMultiplier(_))
    ));
    assert!(matches!(
        parse_formula("H2O "),
        Err(FormulaError::UnrecognizedToken(_))
    ));
    assert!(matches!(
        parse_formula("h2o"),
        Err(FormulaError::UnrecognizedToken(_))
    ));
}

#[test]
fn diagnostics_point_into_the_formula() {
    let e = parse_formula("Ca2(SiO4)2)").unwrap_err();
    assert_eq!(e.to_string(), "unmatched right parenthesis");
    assert_eq!(
        e.code().map(|code| code.to_string()).as_deref(),
        Some("chemparse::unbalanced_right")
    );
    let labels: Vec<_> = e.labels().unwrap().map(|label| label.offset()).collect();
    assert_eq!(labels, vec![10]);

    let e = parse_formula("3(OH)2").unwrap_err();
    assert_eq!(
        e.to_string(),
        "numbers before and after parenthesis (3 and 2)"
    );
    let labels: Vec<_> = e
        .labels()
        .unwrap()
        .map(|label| (label.offset(), label.len()))
        .collect();
    assert_eq!(labels, vec![(0, 2), (4, 2)]);
}

#[test]
fn named_sources_label_the_input() {
    let e = Parser::new(Some("minerals.txt:3"), "Ca(OH")
        .parse()
        .unwrap_err();
    let FormulaError::UnbalancedLeftDelimiter(e) = e else {
        panic!("expected an unbalanced left delimiter, got {e:?}");
    };
    assert_eq!(e.offset(), 2);
    let source = e.source_code().unwrap();
    let contents = source.read_span(&(0..1).into(), 0, 0).unwrap();
    assert_eq!(contents.name(), Some("minerals.txt:3"));
}

#[test]
fn deep_nesting_does_not_overflow() {
    let depth = 100_000;
    let formula = format!("{}H{}", "(".repeat(depth), ")".repeat(depth));
    assert_composition(&formula, &[("H", 1.0)]);

    let formula = format!("{}H{}", "[".repeat(depth), "]1".repeat(depth));
    assert_composition(&formula, &[("H", 1.0)]);
}

#[test]
fn long_formula() {
    let formula = "CH2".repeat(50_000);
    assert_composition(&formula, &[("C", 50_000.0), ("H", 100_000.0)]);
}

#[test]
fn composition_total() {
    let composition: Composition = parse_formula("Ca9Si6O18(OH)6·8H2O").unwrap();
    assert_eq!(composition.total(), 69.0);
    assert_eq!(composition.to_string(), "Ca:9 H:22 O:32 Si:6");
}
