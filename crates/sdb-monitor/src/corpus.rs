//! Batch checking of expressions against expected values.
//!
//! A corpus is plain text, one case per line:
//!
//! ```text
//! <expected> <expression>
//! ```
//!
//! where `<expected>` is an unsigned decimal word. Blank lines are skipped.

use sdb_eval::{evaluate_with, EvalError, Machine};
use sdb_lexer::Lexer;
use sdb_types::Word;
use std::fmt;
use std::io::{self, BufRead};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mismatch {
    /// The line has no `<expected> <expression>` shape.
    Unparsable(String),
    /// The expression failed to evaluate.
    Failed(EvalError),
    /// The expression evaluated to something else.
    Wrong { actual: Word },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusFailure {
    /// 1-based line number.
    pub line: usize,
    pub expression: String,
    pub expected: Option<Word>,
    pub mismatch: Mismatch,
}

impl fmt::Display for CorpusFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: `{}`: ", self.line, self.expression)?;
        match (&self.mismatch, self.expected) {
            (Mismatch::Unparsable(why), _) => write!(f, "{why}"),
            (Mismatch::Failed(err), _) => write!(f, "{err}"),
            (Mismatch::Wrong { actual }, Some(expected)) => {
                write!(f, "expected {expected}, got {actual}")
            }
            (Mismatch::Wrong { actual }, None) => write!(f, "got {actual}"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CorpusReport {
    pub passed: usize,
    pub failures: Vec<CorpusFailure>,
}

impl CorpusReport {
    pub fn total(&self) -> usize {
        self.passed + self.failures.len()
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Evaluate every case in `reader` and compare with its expected value.
pub fn check_corpus<R: BufRead, M: Machine + ?Sized>(
    reader: R,
    lexer: &Lexer<'_>,
    machine: &M,
) -> io::Result<CorpusReport> {
    let mut report = CorpusReport::default();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let number = index + 1;

        let Some((expected, expression)) = text.split_once(char::is_whitespace) else {
            report.failures.push(CorpusFailure {
                line: number,
                expression: String::new(),
                expected: None,
                mismatch: Mismatch::Unparsable("expected `<value> <expression>`".to_string()),
            });
            continue;
        };
        let expression = expression.trim().to_string();

        let expected = match expected.parse::<Word>() {
            Ok(v) => v,
            Err(e) => {
                report.failures.push(CorpusFailure {
                    line: number,
                    expression,
                    expected: None,
                    mismatch: Mismatch::Unparsable(format!("bad expected value `{expected}`: {e}")),
                });
                continue;
            }
        };

        let mismatch = match evaluate_with(lexer, &expression, machine) {
            Ok(actual) if actual == expected => None,
            Ok(actual) => Some(Mismatch::Wrong { actual }),
            Err(err) => Some(Mismatch::Failed(err)),
        };
        debug!(line = number, %expression, ok = mismatch.is_none(), "corpus case");
        match mismatch {
            None => report.passed += 1,
            Some(mismatch) => report.failures.push(CorpusFailure {
                line: number,
                expression,
                expected: Some(expected),
                mismatch,
            }),
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdb_eval::{BadAddress, UnknownRegister};

    struct NoMachine;

    impl Machine for NoMachine {
        fn read_register(&self, name: &str) -> Result<Word, UnknownRegister> {
            Err(UnknownRegister { name: name.to_string() })
        }

        fn read_physical_memory(&self, addr: Word, len: u8) -> Result<Word, BadAddress> {
            Err(BadAddress { addr, len })
        }
    }

    fn run(text: &str) -> CorpusReport {
        check_corpus(text.as_bytes(), &Lexer::default(), &NoMachine).unwrap()
    }

    #[test]
    fn test_all_cases_pass() {
        let report = run("7 1+2*3\n\n9 (1+2)*3\n4294967295 0-1\n");
        assert_eq!(report.passed, 3);
        assert!(report.is_ok());
        assert_eq!(report.total(), 3);
    }

    #[test]
    fn test_wrong_value_is_reported_with_line() {
        let report = run("7 1+2*3\n10 1+2*3\n");
        assert_eq!(report.passed, 1);
        assert_eq!(report.failures.len(), 1);
        let failure = &report.failures[0];
        assert_eq!(failure.line, 2);
        assert_eq!(failure.expected, Some(10));
        assert_eq!(failure.mismatch, Mismatch::Wrong { actual: 7 });
        assert_eq!(failure.to_string(), "line 2: `1+2*3`: expected 10, got 7");
    }

    #[test]
    fn test_eval_error_is_a_failure() {
        let report = run("0 5/0\n0 $a0\n");
        assert_eq!(report.passed, 0);
        assert!(matches!(
            report.failures[0].mismatch,
            Mismatch::Failed(EvalError::DivisionByZero { .. })
        ));
        assert!(matches!(
            report.failures[1].mismatch,
            Mismatch::Failed(EvalError::UnknownRegister(_))
        ));
    }

    #[test]
    fn test_unparsable_lines() {
        let report = run("justone\nabc 1+1\n");
        assert_eq!(report.failures.len(), 2);
        assert!(report
            .failures
            .iter()
            .all(|f| matches!(f.mismatch, Mismatch::Unparsable(_))));
        assert_eq!(report.failures[1].expression, "1+1");
    }
}
