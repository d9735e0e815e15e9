//! Front end for the zabaan language: tokenize, parse, analyze.
//!
//! The driver boundary is [`compile`]: raw source text in, a success flag
//! plus an ordered list of diagnostic lines out. Printing, file loading and
//! evaluation live outside this workspace.

use zabaan_parser::lexer::tokenize;
use zabaan_parser::parser::Parser;
use zabaan_passes::analyze::SemanticAnalyzer;
use zabaan_source::Source;

/// Outcome of running the front end over one source text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompileResult {
    pub success: bool,
    /// `ERROR: ...` / `EXCEPTION: ...` lines, in detection order.
    pub diagnostics: Vec<String>,
}

/// Runs the full pipeline. A syntax error aborts before analysis and becomes
/// the single diagnostic; semantic problems accumulate without stopping.
pub fn compile(text: &str) -> CompileResult {
    let source = Source::new(text);
    let tokens = tokenize(&source);

    let mut parser = Parser::new(tokens);
    let program = match parser.parse() {
        Ok(program) => program,
        Err(error) => {
            return CompileResult {
                success: false,
                diagnostics: vec![format!("ERROR: {}", error)],
            }
        }
    };

    let mut analyzer = SemanticAnalyzer::new(&source);
    let success = analyzer.analyze(&program);

    CompileResult {
        success,
        diagnostics: source.errors.to_strings(),
    }
}
