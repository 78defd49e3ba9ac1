#![cfg_attr(not(test), allow(dead_code, unused_imports))]

use std::{
    fmt::Display,
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use msl_parse::{
    syntax::TranslationUnit,
    ParseOptions, Parser, Precedence,
};
use serde::Deserialize;

fn data_dir(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join(name)
}

fn parse_or_report(source: &str, path: &Path) -> TranslationUnit {
    let (unit, diagnostics) = Parser::parse_str(source);
    if let Some(diag) = diagnostics.first() {
        let origin = path.display().to_string();
        eprintln!("{}", diag.report(source).with_origin(&origin));
        panic!("parse error in `{origin}`");
    }
    unit
}

#[test]
fn samples() {
    let dir = std::fs::read_dir(data_dir("samples")).expect("missing directory samples");
    for entry in dir {
        let entry = entry.expect("error reading entry");
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "msl") {
            println!("testing sample `{}`", path.display());
            let source = std::fs::read_to_string(&path).expect("failed to read file");
            let source_unit = parse_or_report(&source, &path);
            let disp = format!("{source_unit}");
            let disp_unit = parse_or_report(&disp, &path);
            assert_eq!(source_unit, disp_unit);
        }
    }
}

#[derive(Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum SyntaxKind {
    Unit,
    Expression,
}

impl Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxKind::Unit => f.write_str("Unit"),
            SyntaxKind::Expression => f.write_str("Expression"),
        }
    }
}

#[derive(Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum SyntaxExpect {
    Pass,
    Fail,
}

impl Display for SyntaxExpect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyntaxExpect::Pass => f.write_str("Pass"),
            SyntaxExpect::Fail => f.write_str("Fail"),
        }
    }
}

#[derive(Deserialize)]
struct SyntaxTest {
    name: String,
    desc: String,
    syntax: SyntaxKind,
    code: String,
    expect: SyntaxExpect,
    /// Parse with C operator precedence instead of the flat default.
    #[serde(default)]
    c_precedence: bool,
    /// Accept parenthesized expressions.
    #[serde(default)]
    parens: bool,
    /// For `fail` tests, the start of the expected diagnostic message.
    error: Option<String>,
}

impl SyntaxTest {
    fn parser(&self) -> Parser {
        Parser::with_options(ParseOptions {
            precedence: if self.c_precedence {
                Precedence::CLike
            } else {
                Precedence::Flat
            },
            parenthesized: self.parens,
        })
    }

    /// The message of the first diagnostic, if any.
    fn run(&self) -> Option<String> {
        let parser = self.parser();
        match self.syntax {
            SyntaxKind::Unit => {
                let (_, diagnostics) = parser.parse(&self.code);
                diagnostics.first().map(|diag| diag.message())
            }
            SyntaxKind::Expression => parser
                .parse_expression(&self.code)
                .err()
                .map(|diag| diag.message()),
        }
    }
}

#[test]
fn syntax_tests() {
    let dir = std::fs::read_dir(data_dir("syntax-tests")).expect("missing directory syntax-tests");
    let mut total_fails = 0;
    let mut total_count = 0;

    for entry in dir {
        let entry = entry.expect("error reading entry");
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            let (fails, count) = json_test(&path);
            println!("{fails}/{count} failures");
            total_fails += fails;
            total_count += count;
        }
    }

    let total_pass = total_count - total_fails;
    println!("SUMMARY: {total_pass}/{total_count} Pass, {total_fails}/{total_count} Fails");
    assert!(total_fails == 0);
}

fn json_test(path: &Path) -> (u32, u32) {
    let mut fails = 0;
    println!("testing json-test `{}`", path.display());

    let file = File::open(path).expect("failed to read file");
    let reader = BufReader::new(file);
    let json: Vec<SyntaxTest> = serde_json::from_reader(reader)
        .inspect_err(|err| eprintln!("{err}"))
        .expect("invalid json test file");

    for test in &json {
        print!(
            " * `{}` kind: {}, expect: {}, result: ",
            test.name, test.syntax, test.expect
        );

        let error = test.run();
        let result = match error {
            None => SyntaxExpect::Pass,
            Some(_) => SyntaxExpect::Fail,
        };
        println!("{result}");

        let message_matches = match (&test.error, &error) {
            (Some(expected), Some(found)) => found.starts_with(expected.as_str()),
            _ => true,
        };

        if result != test.expect || !message_matches {
            println!(
                "   TEST FAILED\n   * {}\n   * code: `{}`\n   * error: {:?}\n",
                test.desc, test.code, error
            );
            fails += 1;
        }
    }

    (fails, json.len() as u32)
}
