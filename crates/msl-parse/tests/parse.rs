use msl_parse::{
    error::LexError,
    syntax::*,
    ParseError, ParseOptions, Parser, Precedence, Token,
};

const SHADER: &str = r#"
// A small lighting shader.
struct VertexIn {
    float3 position;
    float3 normal;
    float2 uv;
}

struct VertexOut {
    float4 position;
    float3 normal;
    half4 tint;
};

enum LightKind : uint { Directional, Point = 4, Spot }

float4x4 model;
uint light_count = 3;
float weights[4];

/* the vertex stage
 ** transforms positions **/
VertexOut vert(VertexIn in [[stage_in]], uint vid [[vertex_id]]) [[vertex]] {
    VertexOut out;
    float scale = 0.5;
    if (vid > 2 && light_count != 0) {
        rescale(out, 1.0);
    } else {
        rescale(out, -scale);
    }
    for (int i = 0; i < 4; next(i)) {
        accumulate(out, weights, i);
    }
    while (!done(out)) {
        step(out);
    }
    do {
        light_count - 1;
    } while (light_count >= 1);
    return out;
}

half4 frag(VertexOut in [[stage_in]], texture2d albedo [[texture(t0)]]) [[fragment]] {
    return shade(in, albedo, 1.5 * 2 % 3);
}
"#;

fn parse_ok(source: &str) -> TranslationUnit {
    let (unit, diagnostics) = Parser::parse_str(source);
    if let Some(diag) = diagnostics.first() {
        panic!("{}", diag.report(source));
    }
    unit
}

#[test]
fn parses_a_complete_shader() {
    let unit = parse_ok(SHADER);
    let names: Vec<_> = unit.definitions.iter().map(|def| def.name()).collect();
    assert_eq!(
        names,
        vec![
            "VertexIn",
            "VertexOut",
            "LightKind",
            "model",
            "light_count",
            "weights",
            "vert",
            "frag"
        ]
    );
    let vert = unit.functions().next().expect("vertex function");
    assert_eq!(vert.attribute.as_ref().map(|a| a.name.as_str()), Some("vertex"));
    assert_eq!(vert.body.statements.len(), 7);
}

#[test]
fn parsing_is_deterministic() {
    let first = Parser::parse_str(SHADER);
    let second = Parser::parse_str(SHADER);
    assert_eq!(first, second);
    // spans are equal too
    assert_eq!(format!("{:?}", first.0), format!("{:?}", second.0));
}

#[test]
fn display_round_trip() {
    let unit = parse_ok(SHADER);
    let printed = unit.to_string();
    let reparsed = parse_ok(&printed);
    assert_eq!(unit, reparsed);
    // printing is stable
    assert_eq!(printed, reparsed.to_string());
}

#[test]
fn display_round_trip_with_extensions() {
    let options = ParseOptions {
        precedence: Precedence::CLike,
        parenthesized: true,
    };
    let parser = Parser::with_options(options);
    let source = "float f(float a, float b) { return (a + b) * -(a - b) / 2.0 || a < b && b == 1; }";
    let (unit, diagnostics) = parser.parse(source);
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    let (reparsed, diagnostics) = parser.parse(&unit.to_string());
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(unit, reparsed);
}

#[test]
fn dangling_else_nested() {
    let unit = parse_ok("void f() { if (a) { if (b) { } } else { } }");
    let f = unit.functions().next().unwrap();
    let Statement::If(outer) = f.body.statements[0].node() else {
        panic!("expected an if statement")
    };
    assert!(outer.else_block.is_some());
    let Statement::If(inner) = outer.then_block.statements[0].node() else {
        panic!("expected an if statement")
    };
    assert!(inner.else_block.is_none());
}

#[test]
fn float_and_operator_lexing() {
    let tokens: Vec<_> = msl_parse::tokenize("2.75 a <= b")
        .unwrap()
        .into_iter()
        .map(|(tok, _)| tok)
        .collect();
    assert_eq!(
        tokens,
        vec![
            Token::FloatLiteral(2.75),
            Token::Ident("a".to_string()),
            Token::LessThanEqual,
            Token::Ident("b".to_string()),
            Token::Eof,
        ]
    );
}

#[test]
fn empty_for() {
    let unit = parse_ok("void f() { for (;;) { } }");
    let f = unit.functions().next().unwrap();
    let Statement::For(stmt) = f.body.statements[0].node() else {
        panic!("expected a for statement")
    };
    assert_eq!(
        *stmt,
        ForStatement {
            initializer: None,
            condition: None,
            increment: None,
            body: CompoundStatement::default().into(),
        }
    );
}

#[test]
fn missing_expression_then_recovery() {
    let source = "int x = ;\nstruct Point { float x; float y; }";
    let (unit, diagnostics) = Parser::parse_str(source);
    assert_eq!(diagnostics.len(), 1);
    let diag = &diagnostics[0];
    assert!(matches!(diag.error, ParseError::ExpectedToken { .. }));
    assert_eq!(diag.message(), "expected an expression, found `;`");
    assert_eq!(diag.line_col(source), (1, 9));
    assert_eq!(unit.definitions.len(), 1);
    assert!(unit.definitions[0].is_struct());
}

#[test]
fn struct_and_enum() {
    let unit = parse_ok("struct Point { float x; float y; }\nenum Color : uint { Red, Green = 5, Blue }");
    let point = unit.structs().next().unwrap();
    assert_eq!(point.members.len(), 2);
    for (member, name) in point.members.iter().zip(["x", "y"]) {
        assert_eq!(*member.ty.node(), TypeSpecifier::Primitive(PrimitiveType::Float));
        assert_eq!(member.name, name);
    }
    let color = unit.enums().next().unwrap();
    let values: Vec<_> = color.enumerators.iter().map(|e| e.value).collect();
    assert_eq!(values, vec![None, Some(5), None]);
}

#[test]
fn lex_error_aborts() {
    let source = "int a = 1;\nint b = 2 # 3;\nint c;";
    let (unit, diagnostics) = Parser::parse_str(source);
    assert!(unit.definitions.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(
        diagnostics[0].error,
        ParseError::Lex(LexError::UnrecognizedCharacter('#'))
    );
    assert_eq!(diagnostics[0].line_col(source), (2, 11));
}

#[test]
fn independent_errors_are_all_reported() {
    let source = "
        void a() { return 1 }
        void b() { while x { } }
        void c() { }
    ";
    let (unit, diagnostics) = Parser::parse_str(source);
    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0].error,
        ParseError::ExpectedToken {
            expected: "`;`".to_string(),
            found: Token::BraceRight
        }
    );
    assert_eq!(
        diagnostics[1].error,
        ParseError::ExpectedToken {
            expected: "`(`".to_string(),
            found: Token::Ident("x".to_string())
        }
    );
    assert_eq!(unit.definitions.len(), 1);
    assert_eq!(unit.definitions[0].name(), "c");
}

#[test]
fn recognize() {
    assert!(Parser::recognize_str(SHADER).is_ok());
    let err = Parser::recognize_str("void f() { (a); }").unwrap_err();
    assert!(matches!(err.error, ParseError::UnexpectedToken { .. }));
}

#[test]
fn parse_in_parallel() {
    let handles: Vec<_> = (0..4)
        .map(|i| {
            std::thread::spawn(move || {
                let source = format!("int v{i} = {i};\n{SHADER}");
                Parser::parse_str(&source)
            })
        })
        .collect();
    for handle in handles {
        let (unit, diagnostics) = handle.join().expect("thread panicked");
        assert!(diagnostics.is_empty());
        assert_eq!(unit.definitions.len(), 9);
    }
}

#[test]
fn deep_nesting_is_a_diagnostic() {
    let too_deep = ParseError::NestingTooDeep {
        limit: msl_parse::parser::MAX_DEPTH,
    };
    let blocks = format!("void f() {{ {}{} }}", "{".repeat(5_000), "}".repeat(5_000));
    let negations = format!("int x = {}a;", "-".repeat(200_000));
    for source in [blocks, negations] {
        let (unit, diagnostics) = Parser::parse_str(&source);
        assert!(unit.definitions.is_empty());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].error, too_deep);
        // renders like any other diagnostic
        assert!(diagnostics[0]
            .report(&source)
            .to_string()
            .contains("nesting too deep"));
    }
}

#[test]
fn end_of_input_inside_bodies() {
    for (source, construct) in [
        ("void f() { int a", "compound statement"),
        ("struct S { int", "struct body"),
    ] {
        let (_, diagnostics) = Parser::parse_str(source);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].error,
            ParseError::UnterminatedConstruct { construct }
        );
        assert_eq!(diagnostics[0].span.range(), 9..10);
    }
}
