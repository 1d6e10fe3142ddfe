use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Identifier,
    IntegerLiteral,
    FloatLiteral,
    StringLiteral,

    Shader,
    Vertex,
    Fragment,
    Compute,
    In,
    Out,
    Uniform,
    Const,
    Struct,
    If,
    Else,
    For,
    While,
    Return,
    True,
    False,

    Void,
    Bool,
    Int,
    Float,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
    Sampler2D,
    Sampler3D,
    SamplerCube,

    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqualEqual,
    BangEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    AndAnd,
    OrOr,
    Bang,

    Semicolon,
    Colon,
    Comma,
    Dot,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    EndOfFile,
    Unknown,
}

impl TokenKind {
    /// Keyword table lookup. Anything not listed lexes as an identifier.
    pub fn keyword(text: &str) -> Option<TokenKind> {
        let kind = match text {
            "shader" => TokenKind::Shader,
            "vertex" => TokenKind::Vertex,
            "fragment" => TokenKind::Fragment,
            "compute" => TokenKind::Compute,
            "in" => TokenKind::In,
            "out" => TokenKind::Out,
            "uniform" => TokenKind::Uniform,
            "const" => TokenKind::Const,
            "struct" => TokenKind::Struct,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "for" => TokenKind::For,
            "while" => TokenKind::While,
            "return" => TokenKind::Return,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            "void" => TokenKind::Void,
            "bool" => TokenKind::Bool,
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "vec2" => TokenKind::Vec2,
            "vec3" => TokenKind::Vec3,
            "vec4" => TokenKind::Vec4,
            "mat2" => TokenKind::Mat2,
            "mat3" => TokenKind::Mat3,
            "mat4" => TokenKind::Mat4,
            "sampler2D" => TokenKind::Sampler2D,
            "sampler3D" => TokenKind::Sampler3D,
            "samplerCube" => TokenKind::SamplerCube,
            _ => return None,
        };
        Some(kind)
    }

    pub fn is_type(self) -> bool {
        matches!(
            self,
            TokenKind::Void
                | TokenKind::Bool
                | TokenKind::Int
                | TokenKind::Float
                | TokenKind::Vec2
                | TokenKind::Vec3
                | TokenKind::Vec4
                | TokenKind::Mat2
                | TokenKind::Mat3
                | TokenKind::Mat4
                | TokenKind::Sampler2D
                | TokenKind::Sampler3D
                | TokenKind::SamplerCube
        )
    }

    pub fn is_qualifier(self) -> bool {
        matches!(
            self,
            TokenKind::In | TokenKind::Out | TokenKind::Uniform | TokenKind::Const
        )
    }

    fn name(self) -> &'static str {
        match self {
            TokenKind::Identifier => "IDENTIFIER",
            TokenKind::IntegerLiteral => "INTEGER_LITERAL",
            TokenKind::FloatLiteral => "FLOAT_LITERAL",
            TokenKind::StringLiteral => "STRING_LITERAL",
            TokenKind::Shader => "SHADER",
            TokenKind::Vertex => "VERTEX",
            TokenKind::Fragment => "FRAGMENT",
            TokenKind::Compute => "COMPUTE",
            TokenKind::In => "IN",
            TokenKind::Out => "OUT",
            TokenKind::Uniform => "UNIFORM",
            TokenKind::Const => "CONST",
            TokenKind::Struct => "STRUCT",
            TokenKind::If => "IF",
            TokenKind::Else => "ELSE",
            TokenKind::For => "FOR",
            TokenKind::While => "WHILE",
            TokenKind::Return => "RETURN",
            TokenKind::True => "TRUE",
            TokenKind::False => "FALSE",
            TokenKind::Void => "VOID",
            TokenKind::Bool => "BOOL",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Vec2 => "VEC2",
            TokenKind::Vec3 => "VEC3",
            TokenKind::Vec4 => "VEC4",
            TokenKind::Mat2 => "MAT2",
            TokenKind::Mat3 => "MAT3",
            TokenKind::Mat4 => "MAT4",
            TokenKind::Sampler2D => "SAMPLER2D",
            TokenKind::Sampler3D => "SAMPLER3D",
            TokenKind::SamplerCube => "SAMPLERCUBE",
            TokenKind::Assign => "ASSIGN",
            TokenKind::Plus => "PLUS",
            TokenKind::Minus => "MINUS",
            TokenKind::Star => "MULTIPLY",
            TokenKind::Slash => "DIVIDE",
            TokenKind::Percent => "MODULO",
            TokenKind::EqualEqual => "EQUAL",
            TokenKind::BangEqual => "NOT_EQUAL",
            TokenKind::Less => "LESS_THAN",
            TokenKind::LessEqual => "LESS_EQUAL",
            TokenKind::Greater => "GREATER_THAN",
            TokenKind::GreaterEqual => "GREATER_EQUAL",
            TokenKind::AndAnd => "LOGICAL_AND",
            TokenKind::OrOr => "LOGICAL_OR",
            TokenKind::Bang => "LOGICAL_NOT",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::Dot => "DOT",
            TokenKind::LeftParen => "LEFT_PAREN",
            TokenKind::RightParen => "RIGHT_PAREN",
            TokenKind::LeftBrace => "LEFT_BRACE",
            TokenKind::RightBrace => "RIGHT_BRACE",
            TokenKind::LeftBracket => "LEFT_BRACKET",
            TokenKind::RightBracket => "RIGHT_BRACKET",
            TokenKind::EndOfFile => "END_OF_FILE",
            TokenKind::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub line: usize,
    pub column: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            column,
        }
    }
}
