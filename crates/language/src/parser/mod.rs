use bumpalo::Bump;
use bumpalo::collections::{String as BumpString, Vec};

use crate::ast::{
    BinaryFlavor, Block, Branch, Declaration, Expression, Function, Program, Statement,
    UnaryFlavor,
};
use crate::error::{LineIndex, ParseResult, SyntaxError};
use crate::lexer::{Lexer, Token, TokenKind};

/// Recursive-descent parser with one token of lookahead.
///
/// There is a single forward cursor into the source: `peek` reads the token
/// at the cursor without moving it, `advance` reads it and moves the cursor
/// past it. The first mismatch aborts the parse.
///
/// Binary operators all share one precedence level and associate to the
/// right, so `a - b - c` is `a - (b - c)`. This is the language's semantics,
/// not an accident of the parser.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    arena: &'a Bump,
    lines: LineIndex<'a>,
    cursor: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>, arena: &'a Bump) -> Self {
        Parser {
            lexer,
            arena,
            lines: LineIndex::new(lexer.input()),
            cursor: 0,
        }
    }

    // --- Cursor ---

    fn peek(&self) -> ParseResult<Token> {
        let token = self.lexer.read(self.cursor);
        if token.kind == TokenKind::Error {
            return Err(self.error_at(&token, "invalid token"));
        }
        Ok(token)
    }

    fn advance(&mut self) -> ParseResult<Token> {
        let token = self.peek()?;
        self.cursor = token.end;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        let token = self.advance()?;
        if token.kind == kind {
            Ok(token)
        } else {
            Err(self.error_at(&token, format!("expected {}", kind.describe())))
        }
    }

    fn expect_identifier(&mut self) -> ParseResult<&'a str> {
        let token = self.expect(TokenKind::Identifier)?;
        Ok(self.lexer.lexeme(&token))
    }

    fn error_at(&self, token: &Token, message: impl Into<String>) -> SyntaxError {
        self.lines.error(token.start, message)
    }

    fn alloc(&self, expr: Expression<'a, &'a str>) -> &'a Expression<'a, &'a str> {
        self.arena.alloc(expr)
    }

    // --- Declarations ---

    pub fn parse_program(&mut self) -> ParseResult<Program<'a, &'a str>> {
        let mut declarations = Vec::new_in(self.arena);
        while let Some(decl) = self.parse_declaration()? {
            declarations.push(decl);
        }
        log::debug!("parsed {} declaration(s)", declarations.len());
        Ok(Program { declarations })
    }

    /// `Ok(None)` once the input is exhausted.
    fn parse_declaration(&mut self) -> ParseResult<Option<Declaration<'a, &'a str>>> {
        let token = self.advance()?;
        let decl = match token.kind {
            TokenKind::Eof => return Ok(None),
            TokenKind::Import => {
                let path = self.expect(TokenKind::String)?;
                let path = self.decode_string(&path)?;
                self.expect(TokenKind::Semicolon)?;
                Declaration::Import { path }
            }
            TokenKind::Global => {
                let name = self.expect_identifier()?;
                self.expect(TokenKind::Semicolon)?;
                Declaration::Global { name }
            }
            TokenKind::Function => Declaration::Function(self.parse_function()?),
            _ => {
                return Err(self.error_at(&token, "expected `import`, `global`, or `function`"));
            }
        };
        Ok(Some(decl))
    }

    fn parse_function(&mut self) -> ParseResult<Function<'a, &'a str>> {
        let name = self.expect_identifier()?;
        self.expect(TokenKind::LParen)?;
        let parameters = self.parse_parameters()?;
        let body = self.parse_block()?;

        log::debug!("parsed function `{}` ({} parameter(s))", name, parameters.len());
        Ok(Function { name, parameters, body })
    }

    // `(` already consumed. No trailing comma.
    fn parse_parameters(&mut self) -> ParseResult<Vec<'a, &'a str>> {
        let mut params = Vec::new_in(self.arena);

        let first = self.advance()?;
        match first.kind {
            TokenKind::RParen => return Ok(params),
            TokenKind::Identifier => params.push(self.lexer.lexeme(&first)),
            _ => return Err(self.error_at(&first, "expected identifier or `)`")),
        }

        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::RParen => return Ok(params),
                TokenKind::Comma => params.push(self.expect_identifier()?),
                _ => return Err(self.error_at(&token, "expected `)` or `,`")),
            }
        }
    }

    fn parse_block(&mut self) -> ParseResult<Block<'a, &'a str>> {
        self.expect(TokenKind::LBrace)?;

        let mut statements = Vec::new_in(self.arena);
        loop {
            let peek = self.peek()?;
            match peek.kind {
                TokenKind::RBrace => {
                    self.cursor = peek.end;
                    return Ok(statements);
                }
                TokenKind::Eof => return Err(self.error_at(&peek, "expected `}`")),
                _ => statements.push(self.parse_statement()?),
            }
        }
    }

    // --- Statements ---

    fn parse_statement(&mut self) -> ParseResult<Statement<'a, &'a str>> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::Return => {
                let value = if self.peek()?.kind == TokenKind::Semicolon {
                    Expression::Null
                } else {
                    self.parse_expr()?
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Return { value })
            }
            TokenKind::Do => {
                let value = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Do { value })
            }
            TokenKind::Let => {
                let name = self.expect_identifier()?;
                self.expect(TokenKind::Equal)?;
                let initializer = self.parse_expr()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::VariableDeclaration { name, initializer })
            }
            TokenKind::While => {
                let condition = self.parse_condition()?;
                let body = self.parse_block()?;
                Ok(Statement::While { condition, body })
            }
            TokenKind::If => self.parse_if(),
            TokenKind::Set => self.parse_assignment(),
            _ => Err(self.error_at(
                &token,
                "expected `if`, `while`, `return`, `let`, `set`, or `do`",
            )),
        }
    }

    /// `( expr )`
    fn parse_condition(&mut self) -> ParseResult<Expression<'a, &'a str>> {
        self.expect(TokenKind::LParen)?;
        let condition = self.parse_expr()?;
        self.expect(TokenKind::RParen)?;
        Ok(condition)
    }

    // `if` already consumed. The `else if` chain is collected in a loop,
    // not by recursion.
    fn parse_if(&mut self) -> ParseResult<Statement<'a, &'a str>> {
        let mut branches = Vec::new_in(self.arena);
        let condition = self.parse_condition()?;
        let body = self.parse_block()?;
        branches.push(Branch { condition, body });

        let mut otherwise = None;
        while self.peek()?.kind == TokenKind::Else {
            self.advance()?;
            let next = self.peek()?;
            match next.kind {
                TokenKind::If => {
                    self.cursor = next.end;
                    let condition = self.parse_condition()?;
                    let body = self.parse_block()?;
                    branches.push(Branch { condition, body });
                }
                TokenKind::Eof => return Err(self.error_at(&next, "expected `if` or `{`")),
                _ => {
                    otherwise = Some(self.parse_block()?);
                    break;
                }
            }
        }

        Ok(Statement::If { branches, otherwise })
    }

    // `set` already consumed.
    fn parse_assignment(&mut self) -> ParseResult<Statement<'a, &'a str>> {
        let target = self.expect_identifier()?;
        let mut indices = Vec::new_in(self.arena);

        loop {
            let token = self.advance()?;
            match token.kind {
                TokenKind::LBracket => {
                    indices.push(self.parse_expr()?);
                    self.expect(TokenKind::RBracket)?;
                }
                TokenKind::Equal => {
                    let value = self.parse_expr()?;
                    self.expect(TokenKind::Semicolon)?;
                    return Ok(Statement::Assignment { target, indices, value });
                }
                _ => return Err(self.error_at(&token, "expected `[` or `=`")),
            }
        }
    }

    // --- Expressions ---

    pub fn parse_expr(&mut self) -> ParseResult<Expression<'a, &'a str>> {
        let left = self.parse_primary()?;

        let peek = self.peek()?;
        let Some(flavor) = binary_flavor(peek.kind) else {
            return Ok(left);
        };
        self.cursor = peek.end;

        let right = self.parse_expr()?;
        Ok(Expression::Binary {
            flavor,
            left: self.alloc(left),
            right: self.alloc(right),
        })
    }

    fn parse_primary(&mut self) -> ParseResult<Expression<'a, &'a str>> {
        let peek = self.peek()?;
        let mut expr = match peek.kind {
            TokenKind::LParen => {
                self.cursor = peek.end;
                let inner = self.parse_expr()?;
                self.expect(TokenKind::RParen)?;
                inner
            }
            TokenKind::Minus | TokenKind::Bang => {
                self.cursor = peek.end;
                let flavor = if peek.kind == TokenKind::Minus {
                    UnaryFlavor::Negate
                } else {
                    UnaryFlavor::Not
                };
                let operand = self.parse_primary()?;
                Expression::Unary { flavor, operand: self.alloc(operand) }
            }
            _ => self.parse_literal()?,
        };

        loop {
            let peek = self.peek()?;
            match peek.kind {
                TokenKind::LParen => {
                    self.cursor = peek.end;
                    let arguments = self.parse_expression_list(TokenKind::RParen)?;
                    expr = Expression::Call { callee: self.alloc(expr), arguments };
                }
                TokenKind::LBracket => {
                    self.cursor = peek.end;
                    let key = self.parse_expr()?;
                    self.expect(TokenKind::RBracket)?;
                    expr = Expression::Index {
                        collection: self.alloc(expr),
                        key: self.alloc(key),
                    };
                }
                _ => return Ok(expr),
            }
        }
    }

    fn parse_literal(&mut self) -> ParseResult<Expression<'a, &'a str>> {
        let token = self.advance()?;
        match token.kind {
            TokenKind::True => Ok(Expression::Boolean(true)),
            TokenKind::False => Ok(Expression::Boolean(false)),
            TokenKind::Null => Ok(Expression::Null),
            TokenKind::String => Ok(Expression::String(self.decode_string(&token)?)),
            TokenKind::Identifier => Ok(Expression::Identifier(self.lexer.lexeme(&token))),
            TokenKind::Integer => self.parse_integer(&token),
            TokenKind::LBracket => {
                let elements = self.parse_expression_list(TokenKind::RBracket)?;
                Ok(Expression::List(elements))
            }
            TokenKind::Eof => Err(self.error_at(&token, "unexpected end of input")),
            _ => Err(self.error_at(&token, "expected a literal or identifier")),
        }
    }

    fn parse_integer(&self, token: &Token) -> ParseResult<Expression<'a, &'a str>> {
        let digits = self.lexer.lexeme(token);
        if !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(self.error_at(token, "invalid number literal"));
        }
        digits
            .parse::<i64>()
            .map(Expression::Integer)
            .map_err(|_| self.error_at(token, "number literal would overflow"))
    }

    /// Comma separated expressions up to `close`, which is consumed. The
    /// opening delimiter is already consumed. A comma right before `close`
    /// is accepted.
    fn parse_expression_list(
        &mut self,
        close: TokenKind,
    ) -> ParseResult<Vec<'a, Expression<'a, &'a str>>> {
        let mut items = Vec::new_in(self.arena);
        loop {
            let peek = self.peek()?;
            if peek.kind == close {
                self.cursor = peek.end;
                return Ok(items);
            }

            items.push(self.parse_expr()?);

            let separator = self.peek()?;
            if separator.kind == TokenKind::Comma {
                self.cursor = separator.end;
            } else if separator.kind != close {
                return Err(self.error_at(
                    &separator,
                    format!("expected `,` or {}", close.describe()),
                ));
            }
        }
    }

    /// Strip the quotes and decode escapes into the arena.
    fn decode_string(&self, token: &Token) -> ParseResult<&'a str> {
        let raw = self.lexer.lexeme(token);
        let body = &raw[1..raw.len() - 1];

        let mut out = BumpString::with_capacity_in(body.len(), self.arena);
        let mut chars = body.chars();
        while let Some(ch) = chars.next() {
            if ch != '\\' {
                out.push(ch);
                continue;
            }
            let decoded = match chars.next() {
                Some('n') => '\n',
                Some('t') => '\t',
                Some('r') => '\r',
                Some('f') => '\u{c}',
                Some('0') => '\0',
                Some('"') => '"',
                Some('\'') => '\'',
                Some('\\') => '\\',
                Some('x') => {
                    let hex: String = chars.by_ref().take(2).collect();
                    if hex.len() != 2 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
                        return Err(self.error_at(token, "invalid `\\x` escape"));
                    }
                    // Strings are UTF-8, so only single-byte code points can be spelled.
                    match u8::from_str_radix(&hex, 16) {
                        Ok(byte) if byte.is_ascii() => char::from(byte),
                        _ => return Err(self.error_at(token, "invalid `\\x` escape")),
                    }
                }
                _ => return Err(self.error_at(token, "invalid escape sequence")),
            };
            out.push(decoded);
        }
        Ok(out.into_bump_str())
    }
}

fn binary_flavor(kind: TokenKind) -> Option<BinaryFlavor> {
    let flavor = match kind {
        TokenKind::EqualEqual => BinaryFlavor::Equal,
        TokenKind::NotEqual => BinaryFlavor::NotEqual,
        TokenKind::GreaterEqual => BinaryFlavor::GreaterOrEqual,
        TokenKind::LessEqual => BinaryFlavor::LessOrEqual,
        TokenKind::Greater => BinaryFlavor::GreaterThan,
        TokenKind::Less => BinaryFlavor::LessThan,
        TokenKind::Ampersand => BinaryFlavor::And,
        TokenKind::Pipe => BinaryFlavor::Or,
        TokenKind::Plus => BinaryFlavor::Add,
        TokenKind::Minus => BinaryFlavor::Subtract,
        TokenKind::Star => BinaryFlavor::Multiply,
        TokenKind::Slash => BinaryFlavor::Divide,
        TokenKind::Percent => BinaryFlavor::Remainder,
        _ => return None,
    };
    Some(flavor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::*;

    fn parse<'a>(input: &'a str, arena: &'a Bump) -> Program<'a, &'a str> {
        let mut p = Parser::new(Lexer::new(input), arena);
        match p.parse_program() {
            Ok(program) => program,
            Err(e) => panic!("Parser error: {}", e),
        }
    }

    fn parse_err(input: &str) -> SyntaxError {
        let arena = Bump::new();
        let mut p = Parser::new(Lexer::new(input), &arena);
        match p.parse_program() {
            Ok(program) => panic!("expected a syntax error, got {:?}", program),
            Err(e) => e,
        }
    }

    fn body<'p, 'a>(program: &'p Program<'a, &'a str>) -> &'p [Statement<'a, &'a str>] {
        match &program.declarations[0] {
            Declaration::Function(f) => &f.body[..],
            other => panic!("Expected function, got {:?}", other),
        }
    }

    /// Parse `src` as the body of a function and return its only statement's value.
    fn do_expr<'a>(src: &str, arena: &'a Bump) -> &'a Expression<'a, &'a str> {
        let source = arena.alloc_str(&format!("function t() {{ do {}; }}", src));
        let program: &'a Program<'a, &'a str> = arena.alloc(parse(source, arena));
        match &body(program)[0] {
            Statement::Do { value } => value,
            other => panic!("Expected do, got {:?}", other),
        }
    }

    #[test]
    fn test_declarations() {
        let arena = Bump::new();
        let prog = parse("import \"std/io\"; global counter; function main(argv) { }", &arena);
        assert_eq!(prog.declarations.len(), 3);
        assert_eq!(prog.declarations[0], Declaration::Import { path: "std/io" });
        assert_eq!(prog.declarations[1], Declaration::Global { name: "counter" });
        match &prog.declarations[2] {
            Declaration::Function(f) => {
                assert_eq!(f.name, "main");
                assert_eq!(&f.parameters[..], &["argv"]);
                assert!(f.body.is_empty());
            }
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_functions_skip_other_declarations() {
        let arena = Bump::new();
        let prog = parse("function a() { } global g; import \"x\"; function b(p) { }", &arena);
        let names: std::vec::Vec<&str> = prog.functions().map(|f| f.name).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_empty_program() {
        let arena = Bump::new();
        let prog = parse("  // nothing here\n", &arena);
        assert!(prog.declarations.is_empty());
    }

    #[test]
    fn test_fn_parameters() {
        let arena = Bump::new();
        let prog = parse("function add(a, b, c) { return a; }", &arena);
        match &prog.declarations[0] {
            Declaration::Function(f) => assert_eq!(&f.parameters[..], &["a", "b", "c"]),
            _ => panic!("Expected function"),
        }
    }

    #[test]
    fn test_binary_operators_associate_right() {
        let arena = Bump::new();
        let expr = do_expr("10 - 3 - 2", &arena);
        match expr {
            Expression::Binary { flavor: BinaryFlavor::Subtract, left, right } => {
                assert_eq!(**left, Expression::Integer(10));
                match right {
                    Expression::Binary { flavor: BinaryFlavor::Subtract, left, right } => {
                        assert_eq!(**left, Expression::Integer(3));
                        assert_eq!(**right, Expression::Integer(2));
                    }
                    _ => panic!("Expected nested subtraction, got {:?}", right),
                }
            }
            _ => panic!("Expected subtraction, got {:?}", expr),
        }
    }

    #[test]
    fn test_no_precedence_between_operators() {
        let arena = Bump::new();
        // `1 * 2 + 3` is `1 * (2 + 3)`.
        let expr = do_expr("1 * 2 + 3", &arena);
        match expr {
            Expression::Binary { flavor: BinaryFlavor::Multiply, right, .. } => {
                assert!(matches!(right, Expression::Binary { flavor: BinaryFlavor::Add, .. }));
            }
            _ => panic!("Expected multiplication at the root, got {:?}", expr),
        }
    }

    #[test]
    fn test_parentheses_group() {
        let arena = Bump::new();
        let expr = do_expr("(1 - 2) - 3", &arena);
        match expr {
            Expression::Binary { left, right, .. } => {
                assert!(matches!(left, Expression::Binary { flavor: BinaryFlavor::Subtract, .. }));
                assert_eq!(**right, Expression::Integer(3));
            }
            _ => panic!("Expected binary, got {:?}", expr),
        }
    }

    #[test]
    fn test_all_binary_tokens() {
        let arena = Bump::new();
        let cases = [
            ("==", BinaryFlavor::Equal),
            ("!=", BinaryFlavor::NotEqual),
            (">", BinaryFlavor::GreaterThan),
            (">=", BinaryFlavor::GreaterOrEqual),
            ("<", BinaryFlavor::LessThan),
            ("<=", BinaryFlavor::LessOrEqual),
            ("&", BinaryFlavor::And),
            ("|", BinaryFlavor::Or),
            ("+", BinaryFlavor::Add),
            ("-", BinaryFlavor::Subtract),
            ("*", BinaryFlavor::Multiply),
            ("/", BinaryFlavor::Divide),
            ("%", BinaryFlavor::Remainder),
        ];
        for (op, expected) in cases {
            let expr = do_expr(&format!("a {} b", op), &arena);
            match expr {
                Expression::Binary { flavor, .. } => assert_eq!(*flavor, expected, "operator {}", op),
                _ => panic!("Expected binary for {}", op),
            }
        }
    }

    #[test]
    fn test_prefix_operators_nest() {
        let arena = Bump::new();
        let expr = do_expr("--x", &arena);
        match expr {
            Expression::Unary { flavor: UnaryFlavor::Negate, operand } => {
                assert!(matches!(
                    operand,
                    Expression::Unary { flavor: UnaryFlavor::Negate, operand: Expression::Identifier("x") }
                ));
            }
            _ => panic!("Expected negation, got {:?}", expr),
        }
    }

    #[test]
    fn test_prefix_binds_to_postfix_chain() {
        let arena = Bump::new();
        let expr = do_expr("!f(x)", &arena);
        match expr {
            Expression::Unary { flavor: UnaryFlavor::Not, operand } => {
                assert!(matches!(operand, Expression::Call { .. }));
            }
            _ => panic!("Expected not, got {:?}", expr),
        }
    }

    #[test]
    fn test_call_index_chaining() {
        let arena = Bump::new();
        let expr = do_expr("f(1)[0]", &arena);
        match expr {
            Expression::Index { collection, key } => {
                assert_eq!(**key, Expression::Integer(0));
                match collection {
                    Expression::Call { callee, arguments } => {
                        assert_eq!(**callee, Expression::Identifier("f"));
                        assert_eq!(&arguments[..], &[Expression::Integer(1)]);
                    }
                    _ => panic!("Expected call, got {:?}", collection),
                }
            }
            _ => panic!("Expected index, got {:?}", expr),
        }
    }

    #[test]
    fn test_postfix_is_left_associative() {
        let arena = Bump::new();
        let expr = do_expr("f(x)[0](y)", &arena);
        match expr {
            Expression::Call { callee, arguments } => {
                assert_eq!(&arguments[..], &[Expression::Identifier("y")]);
                assert!(matches!(callee, Expression::Index { collection: Expression::Call { .. }, .. }));
            }
            _ => panic!("Expected call, got {:?}", expr),
        }
    }

    #[test]
    fn test_call_without_arguments() {
        let arena = Bump::new();
        let expr = do_expr("f()", &arena);
        match expr {
            Expression::Call { arguments, .. } => assert!(arguments.is_empty()),
            _ => panic!("Expected call"),
        }
    }

    #[test]
    fn test_array_literal() {
        let arena = Bump::new();
        match do_expr("[1, \"two\", [true]]", &arena) {
            Expression::List(elems) => {
                assert_eq!(elems.len(), 3);
                assert_eq!(elems[1], Expression::String("two"));
                assert!(matches!(&elems[2], Expression::List(inner) if inner.len() == 1));
            }
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_array_trailing_comma() {
        let arena = Bump::new();
        match do_expr("[1, 2,]", &arena) {
            Expression::List(elems) => {
                assert_eq!(&elems[..], &[Expression::Integer(1), Expression::Integer(2)]);
            }
            other => panic!("Expected list, got {:?}", other),
        }
        match do_expr("[]", &arena) {
            Expression::List(elems) => assert!(elems.is_empty()),
            other => panic!("Expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_array_rejects_stray_commas() {
        let err = parse_err("function t() { do [,]; }");
        assert_eq!(err.message, "expected a literal or identifier");
        let err = parse_err("function t() { do [1 2]; }");
        assert_eq!(err.message, "expected `,` or `]`");
    }

    #[test]
    fn test_literals() {
        let arena = Bump::new();
        assert_eq!(*do_expr("true", &arena), Expression::Boolean(true));
        assert_eq!(*do_expr("false", &arena), Expression::Boolean(false));
        assert_eq!(*do_expr("null", &arena), Expression::Null);
        assert_eq!(*do_expr("9223372036854775807", &arena), Expression::Integer(i64::MAX));
    }

    #[test]
    fn test_string_escapes_decoded() {
        let arena = Bump::new();
        assert_eq!(
            *do_expr(r#""a\n\t\"q\"\\\x41""#, &arena),
            Expression::String("a\n\t\"q\"\\A")
        );
    }

    #[test]
    fn test_invalid_escape() {
        let err = parse_err(r#"function t() { do "\q"; }"#);
        assert_eq!(err.message, "invalid escape sequence");
        assert_eq!((err.line, err.column), (1, 19));
        let err = parse_err(r#"function t() { do "\xZ1"; }"#);
        assert_eq!(err.message, "invalid `\\x` escape");
    }

    #[test]
    fn test_hex_escape_is_ascii_only() {
        let arena = Bump::new();
        assert_eq!(*do_expr(r#""\x00\x7f""#, &arena), Expression::String("\0\u{7f}"));

        let err = parse_err(r#"function t() { do "\xff"; }"#);
        assert_eq!(err.message, "invalid `\\x` escape");
        assert_eq!((err.line, err.column), (1, 19));
        let err = parse_err(r#"function t() { do "\x80"; }"#);
        assert_eq!(err.message, "invalid `\\x` escape");
    }

    #[test]
    fn test_number_overflow() {
        let err = parse_err("function t() { do 9223372036854775808; }");
        assert_eq!(err.message, "number literal would overflow");
    }

    #[test]
    fn test_invalid_number() {
        let err = parse_err("function t() { do 12ab; }");
        assert_eq!(err.message, "invalid number literal");
        assert_eq!(err.column, 19);
    }

    #[test]
    fn test_statements() {
        let arena = Bump::new();
        let prog = parse(
            "function f() {
                let x = 1;
                set x = 2;
                do print(x);
                while (x) { return; }
                return x;
            }",
            &arena,
        );
        let stmts = body(&prog);
        assert_eq!(stmts.len(), 5);
        assert!(matches!(&stmts[0], Statement::VariableDeclaration { name: "x", initializer: Expression::Integer(1) }));
        assert!(matches!(&stmts[1], Statement::Assignment { target: "x", indices, .. } if indices.is_empty()));
        assert!(matches!(&stmts[2], Statement::Do { value: Expression::Call { .. } }));
        match &stmts[3] {
            Statement::While { condition, body } => {
                assert_eq!(*condition, Expression::Identifier("x"));
                assert_eq!(&body[..], &[Statement::Return { value: Expression::Null }]);
            }
            _ => panic!("Expected while"),
        }
        assert!(matches!(&stmts[4], Statement::Return { value: Expression::Identifier("x") }));
    }

    #[test]
    fn test_set_with_index_chain() {
        let arena = Bump::new();
        let prog = parse("function f() { set a[i][j + 1] = v; }", &arena);
        match &body(&prog)[0] {
            Statement::Assignment { target, indices, value } => {
                assert_eq!(*target, "a");
                assert_eq!(indices.len(), 2);
                assert_eq!(indices[0], Expression::Identifier("i"));
                assert!(matches!(indices[1], Expression::Binary { flavor: BinaryFlavor::Add, .. }));
                assert_eq!(*value, Expression::Identifier("v"));
            }
            other => panic!("Expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_if_else_if_else() {
        let arena = Bump::new();
        let prog = parse("function f() { if (a) {} else if (b) {} else {} }", &arena);
        match &body(&prog)[0] {
            Statement::If { branches, otherwise } => {
                assert_eq!(branches.len(), 2);
                assert_eq!(branches[0].condition, Expression::Identifier("a"));
                assert_eq!(branches[1].condition, Expression::Identifier("b"));
                assert!(otherwise.is_some());
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_long_else_if_chain() {
        let arena = Bump::new();
        let prog = parse(
            "function f() { if (a) { do 1; } else if (b) { do 2; } else if (c) { do 3; } do 4; }",
            &arena,
        );
        let stmts = body(&prog);
        assert_eq!(stmts.len(), 2);
        match &stmts[0] {
            Statement::If { branches, otherwise } => {
                assert_eq!(branches.len(), 3);
                assert!(otherwise.is_none());
            }
            other => panic!("Expected if, got {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_parameter_list() {
        let err = parse_err("function f( { }");
        assert_eq!(err.to_string(), "Syntax error at 1:13: expected identifier or `)`.");
    }

    #[test]
    fn test_parameter_trailing_comma_rejected() {
        let err = parse_err("function f(a,) { }");
        assert_eq!(err.message, "expected identifier");
        let err = parse_err("function f(a b) { }");
        assert_eq!(err.message, "expected `)` or `,`");
    }

    #[test]
    fn test_error_location_on_later_line() {
        let err = parse_err("function f() {\n  let x = 1\n}");
        assert_eq!(err.to_string(), "Syntax error at 3:1: expected `;`.");
    }

    #[test]
    fn test_bad_declaration() {
        let err = parse_err("let x = 1;");
        assert_eq!(err.message, "expected `import`, `global`, or `function`");
    }

    #[test]
    fn test_bad_statement() {
        let err = parse_err("function f() { x = 1; }");
        assert_eq!(err.message, "expected `if`, `while`, `return`, `let`, `set`, or `do`");
        assert_eq!(err.column, 16);
    }

    #[test]
    fn test_unterminated_block() {
        let err = parse_err("function f() { do 1;");
        assert_eq!(err.message, "expected `}`");
        let err = parse_err("function f() { if (a) {} else");
        assert_eq!(err.message, "expected `if` or `{`");
    }

    #[test]
    fn test_unexpected_end_in_expression() {
        let err = parse_err("function f() { do");
        assert_eq!(err.message, "unexpected end of input");
    }

    #[test]
    fn test_invalid_token() {
        let err = parse_err("function f() { do @; }");
        assert_eq!(err.message, "invalid token");
        assert_eq!(err.column, 19);
    }

    #[test]
    fn test_set_requires_equals() {
        let err = parse_err("function f() { set x 1; }");
        assert_eq!(err.message, "expected `[` or `=`");
    }
}
