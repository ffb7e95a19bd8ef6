// AST (Abstract Syntax Tree) definitions for the Pascal front end

use std::fmt;

/// Source position, 1-based line and column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Position and leading source text carried by every node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeInfo {
    pub position: Position,
    pub text: String,
}

impl NodeInfo {
    pub fn new(position: Position, text: impl Into<String>) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Discriminant of every node in the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    VarSection,
    VarDecl,
    ConstSection,
    ConstDecl,
    Block,
    ConditionalBranch,
    If,
    While,
    For,
    Function,
    Procedure,
    Parameter,
    Argument,
    Call,
    Assignment,
    Operator,
    Identifier,
    IntegerLiteral,
    StringLiteral,
}

/// Common accessors shared by all node types
pub trait Node {
    fn info(&self) -> &NodeInfo;
    fn kind(&self) -> NodeKind;

    fn position(&self) -> Position {
        self.info().position
    }

    fn source_text(&self) -> &str {
        &self.info().text
    }
}

macro_rules! impl_node {
    ($($ty:ident => $kind:ident),* $(,)?) => {
        $(
            impl Node for $ty {
                fn info(&self) -> &NodeInfo {
                    &self.info
                }

                fn kind(&self) -> NodeKind {
                    NodeKind::$kind
                }
            }
        )*
    };
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identifier {
    pub name: String,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegerLiteral {
    pub value: i64,
    pub info: NodeInfo,
}

/// String literal; `value` has the quotes stripped, `info.text` keeps them
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringLiteral {
    pub value: String,
    pub info: NodeInfo,
}

/// Operators appearing as interior expression nodes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    // Relational level (`or` shares it)
    Eq,
    NotEq,
    Less,
    LessEq,
    Greater,
    GreaterEq,
    Or,
    // Additive
    Add,
    Sub,
    // Multiplicative
    Mul,
    Divide,
    Div,
    Mod,
    And,
    // Unary
    Negate,
    Not,
}

impl Operator {
    pub const RELATIONAL: [Operator; 7] = [
        Operator::Eq,
        Operator::NotEq,
        Operator::Less,
        Operator::LessEq,
        Operator::Greater,
        Operator::GreaterEq,
        Operator::Or,
    ];
    pub const ADDITIVE: [Operator; 2] = [Operator::Add, Operator::Sub];
    pub const MULTIPLICATIVE: [Operator; 5] = [
        Operator::Mul,
        Operator::Divide,
        Operator::Div,
        Operator::Mod,
        Operator::And,
    ];
    pub const UNARY: [Operator; 2] = [Operator::Negate, Operator::Not];

    /// Source spelling of the operator
    pub fn text(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::NotEq => "<>",
            Operator::Less => "<",
            Operator::LessEq => "<=",
            Operator::Greater => ">",
            Operator::GreaterEq => ">=",
            Operator::Or => "or",
            Operator::Add => "+",
            Operator::Sub => "-",
            Operator::Mul => "*",
            Operator::Divide => "/",
            Operator::Div => "div",
            Operator::Mod => "mod",
            Operator::And => "and",
            Operator::Negate => "-",
            Operator::Not => "not",
        }
    }

    /// Whether the operator is spelled as a reserved word rather than a symbol
    pub fn is_word(self) -> bool {
        matches!(
            self,
            Operator::Or | Operator::Div | Operator::Mod | Operator::And | Operator::Not
        )
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Expressions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    Identifier(Identifier),
    Integer(IntegerLiteral),
    String(StringLiteral),
    Call(Call),
    Binary {
        op: Operator,
        left: Box<Expr>,
        right: Box<Expr>,
        info: NodeInfo,
    },
    Unary {
        op: Operator,
        operand: Box<Expr>,
        info: NodeInfo,
    },
}

impl Node for Expr {
    fn info(&self) -> &NodeInfo {
        match self {
            Expr::Identifier(ident) => &ident.info,
            Expr::Integer(lit) => &lit.info,
            Expr::String(lit) => &lit.info,
            Expr::Call(call) => &call.info,
            Expr::Binary { info, .. } | Expr::Unary { info, .. } => info,
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Expr::Identifier(_) => NodeKind::Identifier,
            Expr::Integer(_) => NodeKind::IntegerLiteral,
            Expr::String(_) => NodeKind::StringLiteral,
            Expr::Call(_) => NodeKind::Call,
            Expr::Binary { .. } | Expr::Unary { .. } => NodeKind::Operator,
        }
    }
}

/// Actual argument at a call site.
///
/// The parser only knows the value expression. The formal the argument binds to
/// is filled in by [`Argument::bind`] once the callee's parameters are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    pub value: Expr,
    pub parameter: Option<Identifier>,
    pub type_ident: Option<Identifier>,
    pub by_reference: bool,
    pub info: NodeInfo,
}

impl Argument {
    pub fn new(value: Expr) -> Self {
        let info = value.info().clone();
        Self {
            value,
            parameter: None,
            type_ident: None,
            by_reference: false,
            info,
        }
    }

    /// Returns this argument bound to the formal `param`
    pub fn bind(self, param: &Parameter) -> Self {
        Self {
            parameter: Some(param.name.clone()),
            type_ident: Some(param.type_ident.clone()),
            by_reference: param.by_reference,
            ..self
        }
    }

    pub fn is_bound(&self) -> bool {
        self.parameter.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub routine: Identifier,
    pub args: Vec<Argument>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub target: Identifier,
    pub value: Expr,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub statements: Vec<Statement>,
    pub info: NodeInfo,
}

/// A condition paired with the block it guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalBranch {
    pub condition: Expr,
    pub body: Block,
    pub info: NodeInfo,
}

/// `if` with its `else if` chain kept flat
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct If {
    pub branches: Vec<ConditionalBranch>,
    pub otherwise: Option<Block>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct While {
    pub branch: ConditionalBranch,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct For {
    pub variable: Identifier,
    pub init: Expr,
    pub terminal: Expr,
    pub downto: bool, // false = `to`, true = `downto`
    pub body: Block,
    pub info: NodeInfo,
}

/// Statements
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Assignment(Assignment),
    Call(Call),
    If(If),
    While(While),
    For(For),
    Block(Block),
}

impl Node for Statement {
    fn info(&self) -> &NodeInfo {
        match self {
            Statement::Assignment(s) => &s.info,
            Statement::Call(s) => &s.info,
            Statement::If(s) => &s.info,
            Statement::While(s) => &s.info,
            Statement::For(s) => &s.info,
            Statement::Block(s) => &s.info,
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            Statement::Assignment(_) => NodeKind::Assignment,
            Statement::Call(_) => NodeKind::Call,
            Statement::If(_) => NodeKind::If,
            Statement::While(_) => NodeKind::While,
            Statement::For(_) => NodeKind::For,
            Statement::Block(_) => NodeKind::Block,
        }
    }
}

impl From<Statement> for Block {
    /// A `begin ... end` statement is its own block; anything else is wrapped.
    fn from(statement: Statement) -> Self {
        match statement {
            Statement::Block(block) => block,
            other => Block {
                info: other.info().clone(),
                statements: vec![other],
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarDecl {
    pub name: Identifier,
    pub type_ident: Identifier,
    pub init: Option<Expr>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarSection {
    pub decls: Vec<VarDecl>,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstDecl {
    pub name: Identifier,
    pub value: Expr,
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstSection {
    pub decls: Vec<ConstDecl>,
    pub info: NodeInfo,
}

/// Formal parameter of a routine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub name: Identifier,
    pub type_ident: Identifier,
    pub by_reference: bool, // declared with `var`
    pub info: NodeInfo,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoutineKind {
    Function { return_type: Identifier },
    Procedure,
}

/// Function or procedure declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routine {
    pub kind: RoutineKind,
    pub name: Identifier,
    pub params: Vec<Parameter>,
    pub locals: Vec<VarDecl>,
    pub body: Block,
    pub info: NodeInfo,
}

impl Routine {
    pub fn return_type(&self) -> Option<&Identifier> {
        match &self.kind {
            RoutineKind::Function { return_type } => Some(return_type),
            RoutineKind::Procedure => None,
        }
    }
}

impl Node for Routine {
    fn info(&self) -> &NodeInfo {
        &self.info
    }

    fn kind(&self) -> NodeKind {
        match self.kind {
            RoutineKind::Function { .. } => NodeKind::Function,
            RoutineKind::Procedure => NodeKind::Procedure,
        }
    }
}

/// Root of the tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    pub name: Identifier,
    pub vars: Option<VarSection>,
    pub consts: Option<ConstSection>,
    pub routines: Vec<Routine>,
    pub body: Block,
    pub info: NodeInfo,
}

impl_node! {
    Identifier => Identifier,
    IntegerLiteral => IntegerLiteral,
    StringLiteral => StringLiteral,
    Argument => Argument,
    Call => Call,
    Assignment => Assignment,
    Block => Block,
    ConditionalBranch => ConditionalBranch,
    If => If,
    While => While,
    For => For,
    VarDecl => VarDecl,
    VarSection => VarSection,
    ConstDecl => ConstDecl,
    ConstSection => ConstSection,
    Parameter => Parameter,
    Program => Program,
}
