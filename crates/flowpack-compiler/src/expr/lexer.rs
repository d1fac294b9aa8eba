use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\n\r]+")]
pub enum Token<'src> {
    #[token("true")]
    True,

    #[token("false")]
    False,

    #[token("null")]
    Null,

    #[token("undefined")]
    Undefined,

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Integer(&'src str),

    #[regex(r"0[xX][0-9a-fA-F]+", |lex| lex.slice())]
    HexInteger(&'src str),

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice())]
    Float(&'src str),

    /// Quoted string, quotes included.
    #[regex(r#""([^"\\]|\\.)*""#, |lex| lex.slice())]
    #[regex(r"'([^'\\]|\\.)*'", |lex| lex.slice())]
    Str(&'src str),

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*", |lex| lex.slice())]
    Ident(&'src str),

    #[token("||")]
    OrOr,

    #[token("&&")]
    AndAnd,

    #[token("|")]
    Pipe,

    #[token("^")]
    Caret,

    #[token("&")]
    Amp,

    #[token("==")]
    EqEq,

    #[token("!=")]
    NotEq,

    #[token("<=")]
    LessEq,

    #[token(">=")]
    GreaterEq,

    #[token("<<")]
    Shl,

    #[token(">>")]
    Shr,

    #[token("<")]
    Less,

    #[token(">")]
    Greater,

    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("%")]
    Percent,

    #[token("!")]
    Bang,

    #[token("~")]
    Tilde,

    #[token("?")]
    Question,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl Token<'_> {
    /// Source spelling of an operator token.
    pub fn operator(&self) -> Option<&'static str> {
        Some(match self {
            Self::OrOr => "||",
            Self::AndAnd => "&&",
            Self::Pipe => "|",
            Self::Caret => "^",
            Self::Amp => "&",
            Self::EqEq => "==",
            Self::NotEq => "!=",
            Self::LessEq => "<=",
            Self::GreaterEq => ">=",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::Bang => "!",
            Self::Tilde => "~",
            _ => return None,
        })
    }

    /// Binding power of a binary operator; higher binds tighter.
    pub fn binary_precedence(&self) -> Option<u8> {
        Some(match self {
            Self::OrOr => 1,
            Self::AndAnd => 2,
            Self::Pipe => 3,
            Self::Caret => 4,
            Self::Amp => 5,
            Self::EqEq | Self::NotEq => 6,
            Self::Less | Self::LessEq | Self::Greater | Self::GreaterEq => 7,
            Self::Shl | Self::Shr => 8,
            Self::Plus | Self::Minus => 9,
            Self::Star | Self::Slash | Self::Percent => 10,
            _ => return None,
        })
    }
}
