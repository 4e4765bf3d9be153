//! # Test harness
//!
//! Runs `.osp` scripts through the full lex → parse → compile → execute
//! pipeline and reports pass/fail. A script passes iff every stage
//! succeeds and the VM halts with a non-empty stack whose top value is 0.
//!
//! Directory mode discovers immediate (non-recursive) `.osp` children and
//! runs each in turn, continuing past failures so one broken file does not
//! hide the results of the rest.

use std::fs;
use std::path::Path;

use colored::Colorize;

use crate::compiler::compile;
use crate::lexer::tokenize;
use crate::parser::parse;
use crate::vm::Vm;

/// Outcome of running a single `.osp` file.
pub struct RunResult {
    pub path: String,
    pub passed: bool,
    pub message: Option<String>,
}

impl RunResult {
    fn pass(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            passed: true,
            message: None,
        }
    }

    fn fail(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            passed: false,
            message: Some(message.into()),
        }
    }
}

/// Runs the pipeline against a single `.osp` file, reading it first.
pub fn run_file(path: &Path) -> RunResult {
    let label = path.display().to_string();
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => return RunResult::fail(label, format!("failed to read file: {err}")),
    };
    run_source(&label, &source)
}

/// Runs the pipeline against an in-memory source string, used by both
/// [`run_file`] and tests that embed `.osp` source directly.
pub fn run_source(label: &str, source: &str) -> RunResult {
    let lexed = tokenize(source);
    if let Some(err) = lexed.errors.first() {
        return RunResult::fail(label, err.to_string());
    }

    let program = match parse(lexed.tokens) {
        Ok(program) => program,
        Err(err) => return RunResult::fail(label, err.to_string()),
    };

    let bytecode = match compile(&program) {
        Ok(bytecode) => bytecode,
        Err(err) => return RunResult::fail(label, err.to_string()),
    };

    let mut vm = Vm::new(bytecode);
    let stack = match vm.run() {
        Ok(stack) => stack,
        Err(err) => return RunResult::fail(label, err.to_string()),
    };

    match stack.last() {
        Some(0) => RunResult::pass(label),
        Some(top) => RunResult::fail(label, format!("expected top of stack 0, got {top}")),
        None => RunResult::fail(label, "VM halted with an empty stack"),
    }
}

/// Discovers the immediate (non-recursive) `.osp` children of `dir`, sorted
/// by file name so runs are reproducible.
pub fn discover_osp_files(dir: &Path) -> std::io::Result<Vec<std::path::PathBuf>> {
    let mut files: Vec<_> = fs::read_dir(dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "osp"))
        .collect();
    files.sort();
    Ok(files)
}

/// Runs every `.osp` file directly inside `dir`, printing a pass/fail line
/// per file as it goes.
pub fn run_directory(dir: &Path) -> std::io::Result<Vec<RunResult>> {
    let files = discover_osp_files(dir)?;
    let mut results = Vec::with_capacity(files.len());
    for file in files {
        let result = run_file(&file);
        print_result(&result);
        results.push(result);
    }
    Ok(results)
}

/// Prints a single result as an ANSI green `(Pass)`/red `(Fail)` line.
pub fn print_result(result: &RunResult) {
    if result.passed {
        println!("{} {}", result.path, "(Pass)".green());
    } else {
        let reason = result.message.as_deref().unwrap_or("unknown failure");
        println!("{} {} - {}", result.path, "(Fail)".red(), reason);
    }
}
