use std::fmt::Write;

use indoc::indoc;

use super::{Statement, parse};
use crate::ir::Operand;
use crate::operator::{ALL, OperandShape, Operator};

/// Render parsed functions, one statement per line.
fn outline(source: &str) -> String {
    let result = parse(source);
    assert!(
        result.diagnostics.is_empty(),
        "{}",
        result.diagnostics.render_plain(source)
    );
    let mut out = String::new();
    for func in &result.unit.functions {
        writeln!(out, "{}", func.signature()).unwrap();
        for arg in &func.args {
            writeln!(out, "  argument {} {}", arg.ty, arg.name).unwrap();
        }
        for stmt in &func.body {
            match stmt {
                Statement::Label(label) => writeln!(out, "{}:", label.name).unwrap(),
                Statement::Op(op) => writeln!(out, "  {op}").unwrap(),
            }
        }
    }
    out
}

fn errors(source: &str) -> String {
    parse(source).diagnostics.render_plain(source)
}

/// `(operator, operand)` of every operation, ignoring ids and spans.
fn shape(source: &str) -> Vec<(Operator, Operand)> {
    let result = parse(source);
    assert!(result.diagnostics.is_empty(), "{source}");
    result.unit.functions[0]
        .operations()
        .map(|op| (op.op, op.operand.clone()))
        .collect()
}

#[test]
fn factorial() {
    let source = indoc! {"
        define factorial returns int
            argument int x
            dup
            load 1
            bgt recurse
            load 1
            return
        recurse:
            dup
            load 1
            sub
            call factorial
            mul
    "};
    insta::assert_snapshot!(outline(source), @r"
    factorial(int) -> int
      argument int x
      dup
      load 1
      bgt recurse
      load 1
      return
    recurse:
      dup
      load 1
      sub
      load factorial
      call
      mul
    ");
}

#[test]
fn operation_ids_follow_expansion() {
    let result = parse("define f returns int\nadd 1\n");
    let ids: Vec<u32> = result.unit.functions[0]
        .operations()
        .map(|op| op.id.0)
        .collect();
    assert_eq!(ids, [0, 1]);
    assert_eq!(result.unit.functions[0].next_op_id, 2);
}

#[test]
fn semicolons_labels_and_comments() {
    let source = indoc! {"
        define g returns ptr // comment
            argument ptr p; argument int n
        top: add; goto top /* block */
        bottom:
        name 0, q; deref p, ptr; cast int; pick 255
    "};
    insta::assert_snapshot!(outline(source), @r"
    g(ptr, int) -> ptr
      argument ptr p
      argument int n
    top:
      add
      goto top
    bottom:
      name 0, q
      load p
      deref ptr
      cast int
      pick 255
    ");
}

#[test]
fn folded_load_matches_explicit_load() {
    for op in ALL.iter().copied().filter(|op| op.info().foldable) {
        let rest = match op.info().shape {
            OperandShape::None => "",
            OperandShape::Label => ", somewhere",
            OperandShape::Type => ", int",
            other => panic!("unexpected foldable shape {other:?} for {op}"),
        };
        let explicit_rest = rest.trim_start_matches(',');
        for value in ["7", "-3", "0x10", "x"] {
            let folded = format!("define f returns int\nargument int x\n{op} {value}{rest}\n");
            let explicit =
                format!("define f returns int\nargument int x\nload {value}\n{op}{explicit_rest}\n");
            assert_eq!(shape(&folded), shape(&explicit), "{op} {value}");
        }
    }
}

#[test]
fn non_foldable_operators_reject_folded_load() {
    for (source, op) in [
        ("pick 1, 2", "pick"),
        ("cast 1, int", "cast"),
        ("goto 1, there", "goto"),
        ("load 1, 2", "load"),
        ("name x, 0, y", "name"),
    ] {
        let source = format!("define f returns int\n{source}\n");
        assert_eq!(
            errors(&source),
            format!("syntax error: `{op}` cannot take a folded load at 2:1\n")
        );
    }
}

#[test]
fn nullary_operators_reject_operands() {
    for op in ["abs", "neg", "not", "drop", "dup", "over", "rot", "swap", "return"] {
        let source = format!("define f returns int\n{op} 1\n");
        assert_eq!(
            errors(&source),
            format!("syntax error: `{op}` takes no operands at 2:1\n"),
        );
    }
}

#[test]
fn too_many_operands() {
    insta::assert_snapshot!(errors("define f returns int\nadd 1, 2\n"), @"syntax error: `add` takes no operands or one folded load, got 2 at 2:1");
    insta::assert_snapshot!(errors("define f returns int\nbgt 1, 2, L\n"), @"syntax error: `bgt` takes 1 operand, got 3 at 2:1");
    insta::assert_snapshot!(errors("define f returns int\nload\n"), @"syntax error: `load` takes 1 operand, got 0 at 2:1");
}

#[test]
fn operand_shape_errors() {
    insta::assert_snapshot!(errors("define f returns int\ngoto 3\n"), @"syntax error: `goto` expects a label at 2:6");
    insta::assert_snapshot!(errors("define f returns int\npick 256\n"), @"syntax error: `pick` expects a slot index between 0 and 255 at 2:6");
    insta::assert_snapshot!(errors("define f returns int\ncast float\n"), @"syntax error: unknown type `float`, expected `int` or `ptr` at 2:6");
    insta::assert_snapshot!(errors("define f returns int\nname 0, 1\n"), @"syntax error: `name` expects a name as its second operand at 2:9");
    insta::assert_snapshot!(errors("define f returns int\nload 99999999999999999999\n"), @"syntax error: integer `99999999999999999999` does not fit in 64 bits at 2:6");
}

#[test]
fn header_errors() {
    insta::assert_snapshot!(errors("define f int\n"), @"syntax error: expected `returns`, found `int` at 1:10");
    insta::assert_snapshot!(errors("define f returns long\n"), @"syntax error: unknown type `long`, expected `int` or `ptr` at 1:18");
    insta::assert_snapshot!(errors("dup\n"), @"syntax error: expected `define`, found `dup` at 1:1");
}

#[test]
fn unknown_operation() {
    insta::assert_snapshot!(errors("define f returns int\nfrobnicate\n"), @"syntax error: unknown operation `frobnicate` at 2:1");
}

#[test]
fn arguments_before_operations() {
    let source = "define f returns int\ndup\nargument int x\n";
    insta::assert_snapshot!(errors(source), @"syntax error: arguments must come before operations at 3:1");
}

#[test]
fn duplicate_argument() {
    let source = "define f returns int\nargument int x\nargument ptr x\n";
    insta::assert_snapshot!(errors(source), @"name error: argument `x` is already defined at 3:14");
}

#[test]
fn recovery_continues_with_next_function() {
    let source = indoc! {"
        define broken returns int
            add 1, 2, 3
            dup
        define fine returns int
            load 1
        define also_broken returns int
            goto
    "};
    let result = parse(source);
    insta::assert_snapshot!(result.diagnostics.render_plain(source), @r"
    syntax error: `add` takes no operands or one folded load, got 3 at 2:5
    syntax error: `goto` takes 1 operand, got 0 at 7:5
    ");
    let names: Vec<(&str, bool)> = result
        .unit
        .functions
        .iter()
        .map(|f| (f.name.as_str(), f.broken))
        .collect();
    assert_eq!(
        names,
        [("broken", true), ("fine", false), ("also_broken", true)]
    );
    assert!(result.diagnostics.iter().all(|d| d.function.is_some()));
}

#[test]
fn empty_source() {
    let result = parse("\n// nothing here\n\n");
    assert!(result.diagnostics.is_empty());
    assert!(result.unit.functions.is_empty());
}
