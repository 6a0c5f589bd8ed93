use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::error::{self, ErrorKind, ScriptError},
};
use lazy_static::lazy_static;
use std::{
    fmt::{self, Debug, Display, Formatter},
    fs::read_to_string,
};

/// The binary integer operators.  Applied as a left fold over every integer on the stack.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Or,
    And,
    Xor,
    ShiftLeft,
    ShiftRight,
}

impl Operator {
    pub const ALL: [Operator; 9] = [
        Operator::Add,
        Operator::Subtract,
        Operator::Multiply,
        Operator::Divide,
        Operator::Or,
        Operator::And,
        Operator::Xor,
        Operator::ShiftLeft,
        Operator::ShiftRight,
    ];

    /// The operator as it is written in a script.
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
            Operator::Or => "|",
            Operator::And => "&",
            Operator::Xor => "^",
            Operator::ShiftLeft => "<<",
            Operator::ShiftRight => ">>",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Operator> {
        Operator::ALL.into_iter().find(|op| op.symbol() == symbol)
    }

    /// Bitwise operators lex to their own token class.
    pub fn is_bitwise(&self) -> bool {
        matches!(
            self,
            Operator::Or | Operator::And | Operator::Xor | Operator::ShiftLeft | Operator::ShiftRight
        )
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The comparison operators.  Each one consumes two values and produces a boolean.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Comparison {
    NotEqual,
    LessOrEqual,
    GreaterOrEqual,
    Equal,
    Less,
    Greater,
}

impl Comparison {
    /// Listed so that every two character symbol comes before its one character prefix.
    pub const ALL: [Comparison; 6] = [
        Comparison::NotEqual,
        Comparison::LessOrEqual,
        Comparison::GreaterOrEqual,
        Comparison::Equal,
        Comparison::Less,
        Comparison::Greater,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Comparison::NotEqual => "!=",
            Comparison::LessOrEqual => "<=",
            Comparison::GreaterOrEqual => ">=",
            Comparison::Equal => "=",
            Comparison::Less => "<",
            Comparison::Greater => ">",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Comparison> {
        Comparison::ALL.into_iter().find(|cmp| cmp.symbol() == symbol)
    }
}

impl Display for Comparison {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// The closed set of reserved words of the language.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ReservedWord {
    Stdout,
    Print,
    Size,
    Dup,
    Drop,
    Swap,
    Over,
    Rot,
    Proc,
    While,
    If,
    Begin,
    End,
}

impl ReservedWord {
    pub const ALL: [ReservedWord; 13] = [
        ReservedWord::Stdout,
        ReservedWord::Print,
        ReservedWord::Size,
        ReservedWord::Dup,
        ReservedWord::Drop,
        ReservedWord::Swap,
        ReservedWord::Over,
        ReservedWord::Rot,
        ReservedWord::Proc,
        ReservedWord::While,
        ReservedWord::If,
        ReservedWord::Begin,
        ReservedWord::End,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReservedWord::Stdout => "stdout",
            ReservedWord::Print => "print",
            ReservedWord::Size => "size",
            ReservedWord::Dup => "dup",
            ReservedWord::Drop => "drop",
            ReservedWord::Swap => "swap",
            ReservedWord::Over => "over",
            ReservedWord::Rot => "rot",
            ReservedWord::Proc => "proc",
            ReservedWord::While => "while",
            ReservedWord::If => "if",
            ReservedWord::Begin => "begin",
            ReservedWord::End => "end",
        }
    }

    pub fn from_name(name: &str) -> Option<ReservedWord> {
        ReservedWord::ALL.into_iter().find(|word| word.name() == name)
    }
}

impl Display for ReservedWord {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// What a special identifier does with the name that follows its sigil.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Binding {
    /// `!name`, pop the top of the stack into the variable.
    Bind,

    /// `?name`, forget the variable.
    Unbind,
}

/// The class a lexer rule assigns to the text it matches.  The text is then decoded into the
/// matching TokenKind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenClass {
    Int,
    Bool,
    MathOp,
    BitwiseOp,
    CompareOp,
    Reserved,
    Identifier,
    SpecialIdentifier,
}

/// The decoded kind of a token.  The interpreter dispatches on this with an exhaustive match.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum TokenKind {
    /// An integer literal.
    Int(i64),

    /// One of the literal words `true` or `false`.
    Bool(bool),

    /// One of `+ - * /`.
    MathOp(Operator),

    /// One of `| & ^ << >>`.
    BitwiseOp(Operator),

    /// One of `= < > != <= >=`.
    CompareOp(Comparison),

    /// A reserved word.
    Reserved(ReservedWord),

    /// A variable read or procedure call, or the name of a procedure being defined.
    Identifier,

    /// `!name` or `?name`.
    SpecialIdentifier(Binding),
}

/// A token is the text matched by a lexer rule along with its decoded kind and the location in the
/// original source code where it was found.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
    location: SourceLocation,
    text: String,
    kind: TokenKind,
}

/// A list of tokens found in the source code.
pub type TokenList = Vec<Token>;

/// Make sure that the tokens are nicely printable for debugging purposes.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Include the original location when debugging.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {} {:?}", self.location, self.text, self.kind)
    }
}

impl Token {
    pub fn new(location: SourceLocation, text: String, kind: TokenKind) -> Token {
        Token {
            location,
            text,
            kind,
        }
    }

    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The text exactly as it appeared in the source.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> &TokenKind {
        &self.kind
    }

    /// Check if the token is the given reserved word.
    pub fn is_reserved(&self, word: ReservedWord) -> bool {
        self.kind == TokenKind::Reserved(word)
    }

    /// The name a special identifier refers to, that is the text without its sigil.  For every
    /// other token this is the full text.
    pub fn name(&self) -> &str {
        match self.kind {
            TokenKind::SpecialIdentifier(_) => &self.text[1..],
            _ => &self.text,
        }
    }
}

/// The shapes of text a lexer rule can match.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Pattern {
    /// A run of spaces, tabs, carriage returns and new lines.
    Whitespace,

    /// `//` up to, but not including, the end of the line.
    LineComment,

    /// Any number of `-` followed by at least one digit.
    Integer,

    /// The exact symbol text.
    Symbol(&'static str),

    /// The exact word, provided it isn't the prefix of a longer identifier.
    Keyword(&'static str),

    /// A letter followed by letters, digits and underscores.
    Identifier,

    /// `!` or `?` followed by an identifier.
    SpecialIdentifier,
}

/// Check if the given character is considered whitespace.
fn is_whitespace(next: char) -> bool {
    next == ' ' || next == '\t' || next == '\r' || next == '\n'
}

fn is_identifier_char(next: char) -> bool {
    next.is_ascii_alphanumeric() || next == '_'
}

/// Length of the identifier at the start of the text, if there is one.
fn identifier_len(text: &str) -> Option<usize> {
    if !text.starts_with(|next: char| next.is_ascii_alphabetic()) {
        return None;
    }

    Some(text.find(|next: char| !is_identifier_char(next)).unwrap_or(text.len()))
}

impl Pattern {
    /// Try to match the pattern at the very start of the text.  Returns the length in bytes of the
    /// matched text.
    pub fn match_len(&self, text: &str) -> Option<usize> {
        match self {
            Pattern::Whitespace => {
                let length = text.find(|next: char| !is_whitespace(next)).unwrap_or(text.len());
                (length > 0).then_some(length)
            }

            Pattern::LineComment => text
                .starts_with("//")
                .then(|| text.find('\n').unwrap_or(text.len())),

            Pattern::Integer => {
                let minus = text.len() - text.trim_start_matches('-').len();
                let rest = &text[minus..];
                let digits = rest
                    .find(|next: char| !next.is_ascii_digit())
                    .unwrap_or(rest.len());

                (digits > 0).then_some(minus + digits)
            }

            Pattern::Symbol(symbol) => text.starts_with(symbol).then_some(symbol.len()),

            Pattern::Keyword(word) => {
                let whole_word =
                    text.starts_with(word) && !text[word.len()..].starts_with(is_identifier_char);
                whole_word.then_some(word.len())
            }

            Pattern::Identifier => identifier_len(text),

            Pattern::SpecialIdentifier => {
                if text.starts_with(['!', '?']) {
                    identifier_len(&text[1..]).map(|length| length + 1)
                } else {
                    None
                }
            }
        }
    }
}

/// A single lexer rule.  Rules without a class consume text without producing a token.
#[derive(Clone, Copy, Debug)]
pub struct LexRule {
    pub pattern: Pattern,
    pub class: Option<TokenClass>,
}

impl LexRule {
    pub fn new(pattern: Pattern, class: TokenClass) -> LexRule {
        LexRule {
            pattern,
            class: Some(class),
        }
    }

    pub fn skip(pattern: Pattern) -> LexRule {
        LexRule {
            pattern,
            class: None,
        }
    }
}

lazy_static! {
    /// The language's lexer rules in priority order, the first rule to match wins.
    pub static ref TOKEN_RULES: Vec<LexRule> = {
        let mut rules = vec![
            LexRule::skip(Pattern::Whitespace),
            LexRule::skip(Pattern::LineComment),
            LexRule::new(Pattern::Integer, TokenClass::Int),
        ];

        // Shifts before the comparisons, otherwise `<<` lexes as two `<`.
        rules.extend(
            [Operator::ShiftLeft, Operator::ShiftRight]
                .map(|op| LexRule::new(Pattern::Symbol(op.symbol()), TokenClass::BitwiseOp)),
        );

        rules.extend(
            Comparison::ALL
                .map(|cmp| LexRule::new(Pattern::Symbol(cmp.symbol()), TokenClass::CompareOp)),
        );

        rules.extend(
            Operator::ALL
                .into_iter()
                .filter(|op| !matches!(op, Operator::ShiftLeft | Operator::ShiftRight))
                .map(|op| {
                    let class = if op.is_bitwise() {
                        TokenClass::BitwiseOp
                    } else {
                        TokenClass::MathOp
                    };

                    LexRule::new(Pattern::Symbol(op.symbol()), class)
                }),
        );

        rules.extend(
            ReservedWord::ALL
                .map(|word| LexRule::new(Pattern::Keyword(word.name()), TokenClass::Reserved)),
        );

        rules.extend(
            ["true", "false"].map(|word| LexRule::new(Pattern::Keyword(word), TokenClass::Bool)),
        );

        rules.push(LexRule::new(Pattern::Identifier, TokenClass::Identifier));
        rules.push(LexRule::new(Pattern::SpecialIdentifier, TokenClass::SpecialIdentifier));

        rules
    };
}

/// Decode an integer literal.  Every leading minus sign negates the value, so `--5` is `5`.
fn to_integer(text: &str) -> Option<i64> {
    let digits = text.trim_start_matches('-');
    let minus = text.len() - digits.len();

    if minus % 2 == 1 {
        format!("-{}", digits).parse().ok()
    } else {
        digits.parse().ok()
    }
}

/// Turn the matched text into a token of the rule's class.
fn decode_token(location: SourceLocation, text: &str, class: TokenClass) -> error::Result<Token> {
    let kind = match class {
        TokenClass::Int => to_integer(text).map(TokenKind::Int),
        TokenClass::Bool => Some(TokenKind::Bool(text == "true")),
        TokenClass::MathOp => Operator::from_symbol(text).map(TokenKind::MathOp),
        TokenClass::BitwiseOp => Operator::from_symbol(text).map(TokenKind::BitwiseOp),
        TokenClass::CompareOp => Comparison::from_symbol(text).map(TokenKind::CompareOp),
        TokenClass::Reserved => ReservedWord::from_name(text).map(TokenKind::Reserved),
        TokenClass::Identifier => Some(TokenKind::Identifier),
        TokenClass::SpecialIdentifier => match text.chars().next() {
            Some('!') => Some(TokenKind::SpecialIdentifier(Binding::Bind)),
            Some('?') => Some(TokenKind::SpecialIdentifier(Binding::Unbind)),
            _ => None,
        },
    };

    match kind {
        Some(kind) => Ok(Token::new(location, text.to_string(), kind)),
        None => ScriptError::new_as_result(
            Some(location),
            ErrorKind::Lexical,
            format!("Could not decode '{}' as {:?}.", text, class),
            None,
        ),
    }
}

/// Tokenize source code with the given ordered rule set.
pub fn tokenize_with_rules(path: &str, source: &str, rules: &[LexRule]) -> error::Result<TokenList> {
    let mut buffer = SourceBuffer::new(path, source);
    let mut token_list = TokenList::new();

    while !buffer.is_exhausted() {
        let remaining = buffer.remaining();
        let found = rules
            .iter()
            .find_map(|rule| rule.pattern.match_len(remaining).map(|length| (rule, length)));

        let Some((rule, length)) = found else {
            let next = remaining.chars().next().unwrap_or_default();

            return ScriptError::new_as_result(
                Some(buffer.location().clone()),
                ErrorKind::Lexical,
                format!("Unexpected character '{}'.", next),
                None,
            );
        };

        if let Some(class) = rule.class {
            let location = buffer.location().clone();
            token_list.push(decode_token(location, &remaining[..length], class)?);
        }

        buffer.advance(length);
    }

    Ok(token_list)
}

/// Tokenize the source code from a string.
pub fn tokenize_from_source(path: &str, source: &str) -> error::Result<TokenList> {
    tokenize_with_rules(path, source, &TOKEN_RULES)
}

/// Load the code from a file and then tokenize it.
pub fn tokenize_from_file(path: &str) -> error::Result<TokenList> {
    let source = match read_to_string(path) {
        Ok(source) => source,
        Err(error) => {
            return ScriptError::new_as_result(
                None,
                ErrorKind::Io,
                format!("Could not read file {}: {}", path, error),
                None,
            );
        }
    };

    tokenize_from_source(path, &source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize_from_source("<test>", source)
            .unwrap()
            .iter()
            .map(|token| *token.kind())
            .collect()
    }

    #[test]
    fn skips_whitespace_and_comments() {
        let tokens = tokenize_from_source("<test>", "1 // one\n\t2 //\r\n").unwrap();
        let texts: Vec<&str> = tokens.iter().map(|token| token.text()).collect();

        assert_eq!(texts, vec!["1", "2"]);
        assert_eq!(tokens[1].location().line(), 2);
        assert_eq!(tokens[1].location().column(), 2);
    }

    #[test]
    fn minus_signs_fold_into_literals() {
        assert_eq!(
            kinds("-5 --5 ---5 5 - -"),
            vec![
                TokenKind::Int(-5),
                TokenKind::Int(5),
                TokenKind::Int(-5),
                TokenKind::Int(5),
                TokenKind::MathOp(Operator::Subtract),
                TokenKind::MathOp(Operator::Subtract),
            ]
        );
    }

    #[test]
    fn two_character_operators_win_over_prefixes() {
        assert_eq!(
            kinds("<< >> <= >= != < > ="),
            vec![
                TokenKind::BitwiseOp(Operator::ShiftLeft),
                TokenKind::BitwiseOp(Operator::ShiftRight),
                TokenKind::CompareOp(Comparison::LessOrEqual),
                TokenKind::CompareOp(Comparison::GreaterOrEqual),
                TokenKind::CompareOp(Comparison::NotEqual),
                TokenKind::CompareOp(Comparison::Less),
                TokenKind::CompareOp(Comparison::Greater),
                TokenKind::CompareOp(Comparison::Equal),
            ]
        );
    }

    #[test]
    fn keywords_only_match_whole_words() {
        assert_eq!(
            kinds("size sizes if iffy true truth"),
            vec![
                TokenKind::Reserved(ReservedWord::Size),
                TokenKind::Identifier,
                TokenKind::Reserved(ReservedWord::If),
                TokenKind::Identifier,
                TokenKind::Bool(true),
                TokenKind::Identifier,
            ]
        );
    }

    #[test]
    fn special_identifiers_keep_their_name() {
        let tokens = tokenize_from_source("<test>", "!count ?count_2").unwrap();

        assert_eq!(*tokens[0].kind(), TokenKind::SpecialIdentifier(Binding::Bind));
        assert_eq!(tokens[0].name(), "count");
        assert_eq!(*tokens[1].kind(), TokenKind::SpecialIdentifier(Binding::Unbind));
        assert_eq!(tokens[1].name(), "count_2");
    }

    #[test]
    fn unmatched_text_is_a_lexical_error() {
        let error = tokenize_from_source("<test>", "1\n 2 @").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Lexical);
        assert_eq!(error.location().as_ref().map(|l| (l.line(), l.column())), Some((2, 4)));
    }

    #[test]
    fn out_of_range_literal_is_rejected() {
        let error = tokenize_from_source("<test>", "99999999999999999999").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::Lexical);
    }

    #[test]
    fn custom_rules_are_tried_in_order() {
        let rules = [
            LexRule::skip(Pattern::Whitespace),
            LexRule::new(Pattern::Identifier, TokenClass::Identifier),
            LexRule::new(Pattern::Keyword("dup"), TokenClass::Reserved),
        ];

        assert_eq!(
            tokenize_with_rules("<test>", "dup", &rules).unwrap()[0].kind(),
            &TokenKind::Identifier
        );
    }
}
