//! # AST dumper
//!
//! A diagnostic tree printer: one node per line, children indented by four
//! spaces per depth. Purely for human inspection — nothing downstream of
//! the parser reads this output.

use crate::ast::{Expr, FunctionExpr, Program, Stmt};

#[must_use]
pub fn dump_program(program: &Program) -> String {
    let mut out = String::new();
    writeln(&mut out, 0, "program_declaration");
    for stmt in &program.statements {
        dump_stmt(&mut out, 1, stmt);
    }
    out
}

fn writeln(out: &mut String, depth: usize, line: &str) {
    for _ in 0..depth {
        out.push_str("    ");
    }
    out.push_str(line);
    out.push('\n');
}

fn dump_stmt(out: &mut String, depth: usize, stmt: &Stmt) {
    match stmt {
        Stmt::Block(statements) => {
            writeln(out, depth, "block");
            for s in statements {
                dump_stmt(out, depth + 1, s);
            }
        }
        Stmt::VariableDecl { name, ty, init, .. } => {
            writeln(
                out,
                depth,
                &format!("variable_declaration ({name}, {ty})"),
            );
            dump_expr(out, depth + 1, init);
        }
        Stmt::Assignment { name, value } => {
            writeln(out, depth, "assignment_statement");
            writeln(out, depth + 1, &format!("variable ({name})"));
            dump_expr(out, depth + 1, value);
        }
        Stmt::If { predicate, body } => {
            writeln(out, depth, "if_statement");
            dump_expr(out, depth + 1, predicate);
            for s in body {
                dump_stmt(out, depth + 1, s);
            }
        }
        Stmt::Return(expr) => {
            writeln(out, depth, "return_statement");
            dump_expr(out, depth + 1, expr);
        }
        Stmt::FunctionDecl { name, function } => {
            writeln(out, depth, &format!("function_declaration (\"{name}\")"));
            dump_function(out, depth + 1, function);
        }
    }
}

fn dump_function(out: &mut String, depth: usize, function: &FunctionExpr) {
    for stmt in &function.body {
        dump_stmt(out, depth, stmt);
    }
}

fn dump_expr(out: &mut String, depth: usize, expr: &Expr) {
    match expr {
        Expr::Literal(ty, value) => {
            writeln(out, depth, &format!("literal ({ty}, {value})"));
        }
        Expr::Variable(name) => {
            writeln(out, depth, &format!("variable ({name})"));
        }
        Expr::Unary(_, operand) => {
            writeln(out, depth, "unary_expression");
            dump_expr(out, depth + 1, operand);
        }
        Expr::Binary(_, left, right) => {
            writeln(out, depth, "binary_expression");
            dump_expr(out, depth + 1, left);
            dump_expr(out, depth + 1, right);
        }
        Expr::Call(name, args) => {
            writeln(out, depth, &format!("function_call ({name})"));
            for arg in args {
                dump_expr(out, depth + 1, arg);
            }
        }
        Expr::Function(function) => {
            dump_function(out, depth, function);
        }
    }
}
