//! Type-tag alias hierarchy.
//!
//! Aliases are supertags grouping concrete node types ("Expression" covers
//! `Identifier`, `Literal`, `MemberExpression`, ...). Other subsystems ask
//! `is_type(ty, tag)` instead of switching over every concrete tag.

use crate::node::NodeType;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Alias {
    Expression,
    Statement,
    Declaration,
    Function,
    /// Introduces a lexical scope.
    Scopable,
    /// Can hold a block of statements directly or through its body.
    BlockParent,
    Block,
    For,
    ForXStatement,
    Loop,
    While,
    Conditional,
    CompletionStatement,
    Terminatorless,
    Pattern,
    LVal,
    Class,
    Binary,
    ModuleDeclaration,
    ModuleSpecifier,
}

impl Alias {
    pub const ALL: &'static [Alias] = &[
        Alias::Expression,
        Alias::Statement,
        Alias::Declaration,
        Alias::Function,
        Alias::Scopable,
        Alias::BlockParent,
        Alias::Block,
        Alias::For,
        Alias::ForXStatement,
        Alias::Loop,
        Alias::While,
        Alias::Conditional,
        Alias::CompletionStatement,
        Alias::Terminatorless,
        Alias::Pattern,
        Alias::LVal,
        Alias::Class,
        Alias::Binary,
        Alias::ModuleDeclaration,
        Alias::ModuleSpecifier,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Alias::Expression => "Expression",
            Alias::Statement => "Statement",
            Alias::Declaration => "Declaration",
            Alias::Function => "Function",
            Alias::Scopable => "Scopable",
            Alias::BlockParent => "BlockParent",
            Alias::Block => "Block",
            Alias::For => "For",
            Alias::ForXStatement => "ForXStatement",
            Alias::Loop => "Loop",
            Alias::While => "While",
            Alias::Conditional => "Conditional",
            Alias::CompletionStatement => "CompletionStatement",
            Alias::Terminatorless => "Terminatorless",
            Alias::Pattern => "Pattern",
            Alias::LVal => "LVal",
            Alias::Class => "Class",
            Alias::Binary => "Binary",
            Alias::ModuleDeclaration => "ModuleDeclaration",
            Alias::ModuleSpecifier => "ModuleSpecifier",
        }
    }

    pub fn from_name(name: &str) -> Option<Alias> {
        Alias::ALL.iter().copied().find(|alias| alias.name() == name)
    }

    /// Concrete node types carrying this alias.
    pub fn members(self) -> impl Iterator<Item = NodeType> {
        NodeType::ALL
            .iter()
            .copied()
            .filter(move |ty| ty.aliases().contains(&self))
    }
}

impl NodeType {
    /// Supertags of this node type.
    pub const fn aliases(self) -> &'static [Alias] {
        use Alias::*;
        match self {
            NodeType::Program => &[Scopable, BlockParent, Block],
            NodeType::BlockStatement => &[Scopable, BlockParent, Block, Statement],
            NodeType::ExpressionStatement
            | NodeType::EmptyStatement
            | NodeType::DebuggerStatement
            | NodeType::WithStatement
            | NodeType::LabeledStatement
            | NodeType::TryStatement => &[Statement],
            NodeType::ReturnStatement
            | NodeType::BreakStatement
            | NodeType::ContinueStatement
            | NodeType::ThrowStatement => &[Statement, Terminatorless, CompletionStatement],
            NodeType::IfStatement => &[Statement, Conditional],
            NodeType::SwitchStatement => &[Statement, BlockParent, Scopable],
            NodeType::CatchClause => &[Scopable],
            NodeType::WhileStatement | NodeType::DoWhileStatement => {
                &[Statement, BlockParent, Loop, While, Scopable]
            }
            NodeType::ForStatement => &[Scopable, Statement, For, BlockParent, Loop],
            NodeType::ForInStatement | NodeType::ForOfStatement => {
                &[Scopable, Statement, For, BlockParent, Loop, ForXStatement]
            }
            NodeType::FunctionDeclaration => {
                &[Scopable, Function, BlockParent, Statement, Declaration]
            }
            NodeType::FunctionExpression | NodeType::ArrowFunctionExpression => {
                &[Scopable, Function, BlockParent, Expression]
            }
            NodeType::VariableDeclaration => &[Statement, Declaration],
            NodeType::ClassDeclaration => &[Scopable, Class, Statement, Declaration],
            NodeType::ClassExpression => &[Scopable, Class, Expression],
            NodeType::Identifier | NodeType::MemberExpression => &[Expression, LVal],
            NodeType::Literal
            | NodeType::ThisExpression
            | NodeType::ArrayExpression
            | NodeType::ObjectExpression
            | NodeType::UnaryExpression
            | NodeType::UpdateExpression
            | NodeType::AssignmentExpression
            | NodeType::CallExpression
            | NodeType::NewExpression
            | NodeType::SequenceExpression => &[Expression],
            NodeType::BinaryExpression | NodeType::LogicalExpression => &[Expression, Binary],
            NodeType::ConditionalExpression => &[Expression, Conditional],
            NodeType::ObjectPattern | NodeType::ArrayPattern | NodeType::AssignmentPattern => {
                &[Pattern, LVal]
            }
            NodeType::RestElement => &[LVal],
            NodeType::ImportDeclaration
            | NodeType::ExportNamedDeclaration
            | NodeType::ExportDefaultDeclaration => &[Statement, Declaration, ModuleDeclaration],
            NodeType::ImportSpecifier
            | NodeType::ImportDefaultSpecifier
            | NodeType::ImportNamespaceSpecifier
            | NodeType::ExportSpecifier => &[ModuleSpecifier],
            NodeType::SwitchCase
            | NodeType::VariableDeclarator
            | NodeType::ClassBody
            | NodeType::MethodDefinition
            | NodeType::Property => &[],
        }
    }

    pub fn has_alias(self, alias: Alias) -> bool {
        self.aliases().contains(&alias)
    }

    /// Whether this type is `tag` itself or one of its subtypes.
    pub fn is(self, tag: TypeTag) -> bool {
        match tag {
            TypeTag::Node(ty) => self == ty,
            TypeTag::Alias(alias) => self.has_alias(alias),
        }
    }
}

/// A concrete node type or an alias, as accepted by type predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Node(NodeType),
    Alias(Alias),
}

impl TypeTag {
    /// Resolve a tag name. Concrete node types take precedence over aliases.
    pub fn from_name(name: &str) -> Option<TypeTag> {
        NodeType::from_name(name)
            .map(TypeTag::Node)
            .or_else(|| Alias::from_name(name).map(TypeTag::Alias))
    }

    pub const fn name(self) -> &'static str {
        match self {
            TypeTag::Node(ty) => ty.name(),
            TypeTag::Alias(alias) => alias.name(),
        }
    }
}

impl From<NodeType> for TypeTag {
    fn from(ty: NodeType) -> Self {
        TypeTag::Node(ty)
    }
}

impl From<Alias> for TypeTag {
    fn from(alias: Alias) -> Self {
        TypeTag::Alias(alias)
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// `is_type` over a tag name. Unknown names never match.
pub fn is_type_name(ty: NodeType, name: &str) -> bool {
    TypeTag::from_name(name).is_some_and(|tag| ty.is(tag))
}

/// `is_type` over a typed tag.
#[inline]
pub fn is_type(ty: NodeType, tag: impl Into<TypeTag>) -> bool {
    ty.is(tag.into())
}
