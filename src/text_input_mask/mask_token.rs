use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Input class of one mask position.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Must be shown verbatim.
    Literal,
    // 0
    RequiredDigit,
    // 9
    OptionalDigit,
    // A
    RequiredLetter,
    // a
    OptionalLetter,
    // L, converted to uppercase
    RequiredLetterUpper,
    // ?, converted to uppercase
    OptionalLetterUpper,
    // &
    RequiredAny,
    // C
    OptionalAny,
}

/// One token of the input mask.
///
/// For a literal the char is the text that is rendered,
/// for a placeholder it's the pattern symbol it was parsed from.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub character: char,
}

/// A compiled input mask.
///
/// This is the immutable grammar part of a masked field.
/// It can be shared between any number of fields, the raw text
/// and everything else that changes while editing lives elsewhere.
///
/// * `0`: required digit
/// * `9`: optional digit
/// * `A`: required letter
/// * `a`: optional letter
/// * `L`: required letter, converted to uppercase
/// * `?`: optional letter, converted to uppercase
/// * `&`: required, any character
/// * `C`: optional, any character
/// * `\`: escapes the following character and uses it as a literal.
/// * everything else is a literal.
///
/// An empty pattern gives an empty mask, which passes through
/// any input unchanged.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct InputMask {
    pattern: String,
    tokens: Vec<Token>,
    // number of placeholder tokens
    capacity: usize,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::Literal => "\\",
            TokenKind::RequiredDigit => "0",
            TokenKind::OptionalDigit => "9",
            TokenKind::RequiredLetter => "A",
            TokenKind::OptionalLetter => "a",
            TokenKind::RequiredLetterUpper => "L",
            TokenKind::OptionalLetterUpper => "?",
            TokenKind::RequiredAny => "&",
            TokenKind::OptionalAny => "C",
        };
        write!(f, "{}", s)
    }
}

impl Debug for TokenKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Debug for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Literal => write!(f, "\\{}", self.character),
            kind => write!(f, "{}", kind),
        }
    }
}

impl TokenKind {
    /// Symbol -> placeholder kind. None for everything that's a literal.
    #[inline]
    pub fn from_symbol(c: char) -> Option<TokenKind> {
        match c {
            '0' => Some(TokenKind::RequiredDigit),
            '9' => Some(TokenKind::OptionalDigit),
            'A' => Some(TokenKind::RequiredLetter),
            'a' => Some(TokenKind::OptionalLetter),
            'L' => Some(TokenKind::RequiredLetterUpper),
            '?' => Some(TokenKind::OptionalLetterUpper),
            '&' => Some(TokenKind::RequiredAny),
            'C' => Some(TokenKind::OptionalAny),
            _ => None,
        }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        *self == TokenKind::Literal
    }

    /// Takes one char of the raw text.
    #[inline]
    pub fn is_placeholder(&self) -> bool {
        !self.is_literal()
    }

    /// Must be filled for the mask to be complete.
    #[inline]
    pub fn is_required(&self) -> bool {
        match self {
            TokenKind::RequiredDigit
            | TokenKind::RequiredLetter
            | TokenKind::RequiredLetterUpper
            | TokenKind::RequiredAny => true,
            TokenKind::Literal
            | TokenKind::OptionalDigit
            | TokenKind::OptionalLetter
            | TokenKind::OptionalLetterUpper
            | TokenKind::OptionalAny => false,
        }
    }

    /// Placeholder that may stay empty.
    #[inline]
    pub fn is_optional(&self) -> bool {
        self.is_placeholder() && !self.is_required()
    }
}

impl Token {
    pub const fn new(kind: TokenKind, character: char) -> Self {
        Self { kind, character }
    }

    pub const fn literal(character: char) -> Self {
        Self {
            kind: TokenKind::Literal,
            character,
        }
    }

    #[inline]
    pub fn is_literal(&self) -> bool {
        self.kind.is_literal()
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        self.kind.is_placeholder()
    }

    #[inline]
    pub fn is_required(&self) -> bool {
        self.kind.is_required()
    }
}

/// Parse a mask pattern into tokens.
///
/// Never fails, anything unknown is a literal.
pub fn parse_mask(pattern: &str) -> Vec<Token> {
    let mut out = Vec::new();

    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            // a lone backslash at the end is kept as is.
            let esc = chars.next().unwrap_or('\\');
            out.push(Token::literal(esc));
        } else if let Some(kind) = TokenKind::from_symbol(c) {
            out.push(Token::new(kind, c));
        } else {
            out.push(Token::literal(c));
        }
    }

    out
}

impl InputMask {
    /// Compile the pattern.
    pub fn new(pattern: impl AsRef<str>) -> Self {
        let pattern = pattern.as_ref();
        let tokens = parse_mask(pattern);
        let capacity = tokens.iter().filter(|t| t.is_placeholder()).count();
        Self {
            pattern: pattern.to_string(),
            tokens,
            capacity,
        }
    }

    /// The original pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Empty mask. Works as pass-through.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Number of display positions.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Maximum length of the raw text.
    /// None if the mask is empty and the length is not limited.
    pub fn capacity(&self) -> Option<usize> {
        if self.tokens.is_empty() {
            None
        } else {
            Some(self.capacity)
        }
    }

    /// Number of placeholders that must be filled.
    pub fn required_len(&self) -> usize {
        self.tokens.iter().filter(|t| t.is_required()).count()
    }

    /// The n-th placeholder token.
    pub fn slot(&self, n: usize) -> Option<&Token> {
        self.slots().nth(n)
    }

    /// All placeholder tokens in order.
    pub fn slots(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter().filter(|t| t.is_placeholder())
    }
}

impl Debug for InputMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputMask")
            .field("pattern", &self.pattern)
            .field("tokens", &self.tokens)
            .finish()
    }
}

impl Display for InputMask {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

impl FromStr for InputMask {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(InputMask::new(s))
    }
}

impl From<&str> for InputMask {
    fn from(value: &str) -> Self {
        InputMask::new(value)
    }
}
