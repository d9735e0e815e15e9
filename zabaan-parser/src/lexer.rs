use logos::Logos;
use zabaan_source::Source;

#[derive(Debug, Logos, Clone, PartialEq)]
pub enum TokenKind {
    // literals
    #[regex(r"[0-9][0-9.]*", |lex| number_value(lex.slice()))]
    Number(f64),
    #[regex(r#""[^"]*"?|'[^']*'?"#, |lex| string_value(lex.slice()))]
    Str(String),

    // identifiers
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // keywords
    #[token("banao")]
    Banao,
    #[token("kaam")]
    Kaam,
    #[token("agar")]
    Agar,
    #[token("warnah")]
    Warnah,
    #[token("daura")]
    Daura,
    #[token("wapas")]
    Wapas,
    #[token("dekh")]
    Dekh,
    #[token("lou")]
    Lou,
    #[token("haan")]
    Haan,
    #[token("na")]
    Na,
    #[token("band")]
    Band,

    // operators
    // - arithmetics
    #[token("+")]
    Plus,
    #[token("-")]
    Minus, // NOTE: can also be unary
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    // - assignment
    #[token("=")]
    Assign,
    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    // - equality
    #[token("==")]
    Eq,
    #[token("!=")]
    Ne,
    // - ordering
    #[token("<")]
    Lt,
    #[token("<=")]
    Le,
    #[token(">")]
    Gt,
    #[token(">=")]
    Ge,
    // - logical
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("!")]
    Not,

    // punctuation
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,

    // misc
    #[regex(r"[ \t\n\r\f]+", logos::skip)]
    #[regex(r"//[^\n]*", logos::skip)] // single line comments
    #[error]
    Unknown,

    /// Only generated by [`Lexer::next_token`] when the underlying lexer is exhausted.
    Eof,
}

/// Number payloads use longest-valid-prefix conversion, so an unvalidated
/// literal like `1.2.3` still lexes as a single token (with value `1.2`).
fn number_value(slice: &str) -> f64 {
    match slice.parse() {
        Ok(value) => value,
        Err(_) => {
            let end = slice
                .match_indices('.')
                .nth(1)
                .map(|(offset, _)| offset)
                .unwrap_or_else(|| slice.len());
            slice[..end].parse().unwrap_or(0.0)
        }
    }
}

/// Strips the delimiting quotes. An unterminated string has no closing quote
/// and takes everything up to the end of input.
fn string_value(slice: &str) -> String {
    let quote = slice.chars().next();
    if slice.len() >= 2 && slice.ends_with(|c| Some(c) == quote) {
        slice[1..slice.len() - 1].to_string()
    } else {
        slice[1..].to_string()
    }
}

impl TokenKind {
    /// Returns the binary binding power or `None` if invalid binop token.
    /// Assignment (and its compound forms) binds lowest and is right-associative.
    pub fn binop_bp(&self) -> Option<(u8, u8)> {
        match self {
            /* Assignment */
            TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign => Some((2, 1)),
            /* Logical */
            TokenKind::Or => Some((3, 4)),
            TokenKind::And => Some((5, 6)),
            /* Equality */
            TokenKind::Eq | TokenKind::Ne => Some((7, 8)),
            /* Ordering */
            TokenKind::Lt | TokenKind::Le | TokenKind::Gt | TokenKind::Ge => Some((9, 10)),
            /* Additive */
            TokenKind::Plus | TokenKind::Minus => Some((11, 12)),
            /* Multiplicative */
            TokenKind::Star | TokenKind::Slash | TokenKind::Percent => Some((13, 14)),
            _ => None,
        }
    }

    /// Source spelling of an operator kind, used in diagnostics and printing.
    pub fn op_str(&self) -> &'static str {
        match self {
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::Assign => "=",
            TokenKind::Eq => "==",
            TokenKind::Ne => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::And => "&&",
            TokenKind::Or => "||",
            TokenKind::Not => "!",
            _ => "?",
        }
    }
}

/// A lexical unit: kind, raw matched text and 1-based source position.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

/// Streaming tokenizer over a [`Source`].
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
    source: &'a Source<'a>,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source<'a>) -> Self {
        Self {
            inner: TokenKind::lexer(source.content),
            source,
        }
    }

    /// Returns the next token, advancing the internal position. Once the
    /// input is exhausted this returns an end-of-input token indefinitely.
    /// Unrecognized characters become [`TokenKind::Unknown`] tokens carrying
    /// the offending text; the lexer itself never fails.
    pub fn next_token(&mut self) -> Token {
        match self.inner.next() {
            Some(kind) => {
                let span = self.inner.span();
                let (line, column) = self.source.line_col(span.start);
                Token {
                    kind,
                    lexeme: self.inner.slice().to_string(),
                    line,
                    column,
                }
            }
            None => {
                let (line, column) = self.source.line_col(self.source.content.len());
                Token {
                    kind: TokenKind::Eof,
                    lexeme: String::new(),
                    line,
                    column,
                }
            }
        }
    }
}

/// Tokenizes the whole source. The returned sequence always ends with a
/// single end-of-input token.
pub fn tokenize(source: &Source) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            break;
        }
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<TokenKind> {
        let source = Source::new(text);
        tokenize(&source).into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(
            kinds("banao kaam agar warnah daura wapas haan na"),
            vec![
                TokenKind::Banao,
                TokenKind::Kaam,
                TokenKind::Agar,
                TokenKind::Warnah,
                TokenKind::Daura,
                TokenKind::Wapas,
                TokenKind::Haan,
                TokenKind::Na,
                TokenKind::Eof,
            ]
        );
        // a keyword prefix does not make an identifier a keyword
        assert_eq!(
            kinds("banaox _agar na1"),
            vec![
                TokenKind::Identifier("banaox".to_string()),
                TokenKind::Identifier("_agar".to_string()),
                TokenKind::Identifier("na1".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn builtin_names_lex_as_planned() {
        // dekh/lou/band are keywords, the remaining builtins are identifiers
        assert_eq!(
            kinds("dekh lou band nikal sqrt random"),
            vec![
                TokenKind::Dekh,
                TokenKind::Lou,
                TokenKind::Band,
                TokenKind::Identifier("nikal".to_string()),
                TokenKind::Identifier("sqrt".to_string()),
                TokenKind::Identifier("random".to_string()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn numbers() {
        assert_eq!(
            kinds("1 2.5 0.125"),
            vec![
                TokenKind::Number(1.0),
                TokenKind::Number(2.5),
                TokenKind::Number(0.125),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn number_with_multiple_dots_is_one_token() {
        let source = Source::new("1.2.3");
        let tokens = tokenize(&source);
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::Number(1.2));
        assert_eq!(tokens[0].lexeme, "1.2.3");
    }

    #[test]
    fn strings_with_both_quote_kinds() {
        assert_eq!(
            kinds(r#""salam" 'duniya'"#),
            vec![
                TokenKind::Str("salam".to_string()),
                TokenKind::Str("duniya".to_string()),
                TokenKind::Eof,
            ]
        );
        // no escape processing; the other quote kind is plain content
        assert_eq!(
            kinds(r#""it's fine""#),
            vec![TokenKind::Str("it's fine".to_string()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_string_consumes_to_end() {
        assert_eq!(
            kinds("\"no closing quote"),
            vec![
                TokenKind::Str("no closing quote".to_string()),
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("'"), vec![TokenKind::Str(String::new()), TokenKind::Eof]);
    }

    #[test]
    fn multiline_string_positions() {
        let source = Source::new("\"do\nlines\" banao");
        let tokens = tokenize(&source);
        assert_eq!(tokens[0].kind, TokenKind::Str("do\nlines".to_string()));
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[1].line, tokens[1].column), (2, 8));
    }

    #[test]
    fn operators() {
        assert_eq!(
            kinds("+ += - -= * *= / /= % = == != < <= > >= && || !"),
            vec![
                TokenKind::Plus,
                TokenKind::PlusAssign,
                TokenKind::Minus,
                TokenKind::MinusAssign,
                TokenKind::Star,
                TokenKind::StarAssign,
                TokenKind::Slash,
                TokenKind::SlashAssign,
                TokenKind::Percent,
                TokenKind::Assign,
                TokenKind::Eq,
                TokenKind::Ne,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::And,
                TokenKind::Or,
                TokenKind::Not,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn operator_at_end_of_input() {
        // lookahead on the last character must not overrun the buffer
        assert_eq!(
            kinds("1 +"),
            vec![TokenKind::Number(1.0), TokenKind::Plus, TokenKind::Eof]
        );
        assert_eq!(kinds("="), vec![TokenKind::Assign, TokenKind::Eof]);
        assert_eq!(kinds("!"), vec![TokenKind::Not, TokenKind::Eof]);
    }

    #[test]
    fn unrecognized_characters_become_unknown_tokens() {
        let source = Source::new("banao @ x");
        let tokens = tokenize(&source);
        assert_eq!(tokens[1].kind, TokenKind::Unknown);
        assert_eq!(tokens[1].lexeme, "@");

        // a lone `&` or `|` is not an operator
        assert_eq!(
            kinds("& |"),
            vec![TokenKind::Unknown, TokenKind::Unknown, TokenKind::Eof]
        );
        assert_eq!(kinds("&&"), vec![TokenKind::And, TokenKind::Eof]);
    }

    #[test]
    fn comments_and_whitespace_are_skipped() {
        assert_eq!(
            kinds("banao x; // declares x\n// whole line\nx = 2;"),
            vec![
                TokenKind::Banao,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Semicolon,
                TokenKind::Identifier("x".to_string()),
                TokenKind::Assign,
                TokenKind::Number(2.0),
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
        assert_eq!(kinds("// only a comment"), vec![TokenKind::Eof]);
    }

    #[test]
    fn token_positions() {
        let source = Source::new("banao x = 1;\nx = 2;");
        let tokens = tokenize(&source);
        let positions: Vec<(usize, usize)> = tokens.iter().map(|t| (t.line, t.column)).collect();
        assert_eq!(
            positions,
            vec![
                (1, 1),
                (1, 7),
                (1, 9),
                (1, 11),
                (1, 12),
                (2, 1),
                (2, 3),
                (2, 5),
                (2, 6),
                (2, 7), // end of input
            ]
        );
    }

    #[test]
    fn next_token_after_exhaustion_keeps_returning_eof() {
        let source = Source::new("1");
        let mut lexer = Lexer::new(&source);
        assert_eq!(lexer.next_token().kind, TokenKind::Number(1.0));
        for _ in 0..4 {
            assert_eq!(lexer.next_token().kind, TokenKind::Eof);
        }
    }

    #[test]
    fn tokenization_is_total_on_junk() {
        let source = Source::new("@@##\u{7}?? banao $ 12..5 'open");
        let tokens = tokenize(&source);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
    }

    #[test]
    fn lexemes_reconstruct_the_source() {
        // with whitespace and comments removed, concatenated lexemes are the source
        let text = "kaam main() { // entry\n    banao x = 1.5;\n    x += 2;\n}";
        let expected: String = text
            .lines()
            .map(|line| line.split("//").next().unwrap_or(""))
            .collect::<Vec<_>>()
            .join("")
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect();

        let source = Source::new(text);
        let actual: String = tokenize(&source).iter().map(|t| t.lexeme.as_str()).collect();
        assert_eq!(actual, expected);
    }
}
