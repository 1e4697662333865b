//! Scope tree and binding table types.
//!
//! Scopes and bindings live in arenas owned by
//! [`TraverseState`](crate::TraverseState) and refer to each other (and to
//! paths) by handle, so parent links never own their targets.

use crate::path::PathId;
use estrav_ast::{NodeArena, NodeIndex, NodeKind, NodeType};
use indexmap::IndexMap;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

impl BindingId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// What introduced a scope.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Program,
    Function,
    Class,
    Catch,
    /// `for`, `for-in`, `for-of`, `while`, `do-while`
    Loop,
    Switch,
    Block,
}

impl ScopeKind {
    pub fn of(node_type: NodeType) -> ScopeKind {
        match node_type {
            NodeType::Program => ScopeKind::Program,
            NodeType::FunctionDeclaration
            | NodeType::FunctionExpression
            | NodeType::ArrowFunctionExpression => ScopeKind::Function,
            NodeType::ClassDeclaration | NodeType::ClassExpression => ScopeKind::Class,
            NodeType::CatchClause => ScopeKind::Catch,
            NodeType::SwitchStatement => ScopeKind::Switch,
            NodeType::ForStatement
            | NodeType::ForInStatement
            | NodeType::ForOfStatement
            | NodeType::WhileStatement
            | NodeType::DoWhileStatement => ScopeKind::Loop,
            _ => ScopeKind::Block,
        }
    }

    /// Whether `var` declarations stop here.
    pub fn is_var_target(self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

/// One lexical scope.
#[derive(Clone, Debug)]
pub struct Scope {
    pub id: ScopeId,
    pub kind: ScopeKind,
    /// Path of the node that introduced the scope.
    pub path: PathId,
    pub parent: ScopeId,
    /// Name to binding, in declaration order.
    pub(crate) bindings: IndexMap<String, BindingId>,
    pub(crate) crawled: bool,
    /// The scope's path was removed or replaced.
    pub(crate) detached: bool,
}

impl Scope {
    pub(crate) fn new(id: ScopeId, kind: ScopeKind, path: PathId, parent: ScopeId) -> Scope {
        Scope {
            id,
            kind,
            path,
            parent,
            bindings: IndexMap::new(),
            crawled: false,
            detached: false,
        }
    }

    pub fn is_crawled(&self) -> bool {
        self.crawled
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }

    /// Names bound directly in this scope, as of the last crawl.
    pub fn binding_names(&self) -> impl Iterator<Item = &str> {
        self.bindings.keys().map(String::as_str)
    }
}

/// Syntactic form that declared a binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Import specifier local name.
    Module,
    Var,
    Let,
    Const,
    Param,
    /// Function declaration.
    Hoisted,
    Class,
    CatchParam,
    /// Self-name of a function or class expression.
    Local,
}

impl BindingKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            BindingKind::Module => "module",
            BindingKind::Var => "var",
            BindingKind::Let => "let",
            BindingKind::Const => "const",
            BindingKind::Param => "param",
            BindingKind::Hoisted => "hoisted",
            BindingKind::Class => "class",
            BindingKind::CatchParam => "catch",
            BindingKind::Local => "local",
        }
    }

    /// Redeclaring the name in the same scope is an error.
    pub fn is_block_scoped(self) -> bool {
        matches!(
            self,
            BindingKind::Module | BindingKind::Let | BindingKind::Const | BindingKind::Class
        )
    }

    /// Whether a binding of this kind may be defined by a node of `ty`.
    pub fn accepts_definition(self, ty: NodeType) -> bool {
        match self {
            BindingKind::Module => ty == NodeType::ImportDeclaration,
            BindingKind::Var | BindingKind::Let | BindingKind::Const => {
                ty == NodeType::VariableDeclarator
            }
            BindingKind::Hoisted => ty == NodeType::FunctionDeclaration,
            BindingKind::Class => ty == NodeType::ClassDeclaration,
            BindingKind::CatchParam => ty == NodeType::CatchClause,
            BindingKind::Param => true,
            BindingKind::Local => {
                matches!(ty, NodeType::FunctionExpression | NodeType::ClassExpression)
            }
        }
    }
}

impl std::fmt::Display for BindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared name.
#[derive(Clone, Debug)]
pub struct Binding {
    pub id: BindingId,
    pub name: String,
    pub kind: BindingKind,
    pub scope: ScopeId,
    /// The declaring construct: import declaration, declarator, function,
    /// class, catch clause or parameter.
    pub path: PathId,
    /// The binding identifier itself.
    pub identifier: PathId,
    pub references: SmallVec<[PathId; 4]>,
    pub constant_violations: SmallVec<[PathId; 2]>,
}

impl Binding {
    pub fn is_referenced(&self) -> bool {
        !self.references.is_empty()
    }

    /// Never written after its declaration.
    pub fn is_constant(&self) -> bool {
        self.constant_violations.is_empty()
    }
}

/// A block-scoped name declared twice in one scope. The first declaration
/// keeps the binding.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BindingCollision {
    pub scope: ScopeId,
    pub name: String,
    pub existing: BindingId,
    pub duplicate: PathId,
}

/// Whether identifier `node` is read (rather than declared, labelled or
/// written) when held by `parent`, itself held by `grandparent`.
pub fn is_referenced(
    arena: &NodeArena,
    node: NodeIndex,
    parent: NodeIndex,
    grandparent: NodeIndex,
) -> bool {
    let Some(parent_node) = arena.get(parent) else {
        return true;
    };
    match &parent_node.kind {
        // yes: PARENT[NODE], NODE.child
        // no: parent.CHILD
        NodeKind::MemberExpression {
            object,
            property,
            computed,
        } => {
            if *property == node {
                *computed
            } else {
                *object == node
            }
        }
        // yes: { [NODE]: "" }, { key: NODE }
        // no: { NODE: "" }, ({ key: NODE } = obj)
        NodeKind::Property { key, computed, .. } => {
            if *key == node {
                *computed
            } else {
                arena.node_type(grandparent) != Some(NodeType::ObjectPattern)
            }
        }
        NodeKind::VariableDeclarator { id, .. } => *id != node,
        NodeKind::FunctionDeclaration { id, params, .. }
        | NodeKind::FunctionExpression { id, params, .. } => {
            *id != node && !params.nodes.contains(&node)
        }
        NodeKind::ArrowFunctionExpression { params, .. } => !params.nodes.contains(&node),
        // yes: export { NODE as foo };
        // no: export { foo as NODE }; export { NODE } from "foo";
        NodeKind::ExportSpecifier { local, .. } => {
            let reexport = arena.get(grandparent).is_some_and(|n| {
                matches!(&n.kind, NodeKind::ExportNamedDeclaration { source, .. } if source.is_some())
            });
            !reexport && *local == node
        }
        NodeKind::ImportSpecifier { .. }
        | NodeKind::ImportDefaultSpecifier { .. }
        | NodeKind::ImportNamespaceSpecifier { .. } => false,
        NodeKind::ClassDeclaration { id, .. } | NodeKind::ClassExpression { id, .. } => *id != node,
        NodeKind::MethodDefinition { key, computed, .. } => *key == node && *computed,
        NodeKind::LabeledStatement { .. }
        | NodeKind::BreakStatement { .. }
        | NodeKind::ContinueStatement { .. } => false,
        NodeKind::CatchClause { param, .. } => *param != node,
        NodeKind::RestElement { .. } => false,
        // yes: left = NODE
        // no: NODE = right
        NodeKind::AssignmentExpression { right, .. } | NodeKind::AssignmentPattern { right, .. } => {
            *right == node
        }
        NodeKind::ForInStatement { left, .. } | NodeKind::ForOfStatement { left, .. } => {
            *left != node
        }
        NodeKind::ObjectPattern { .. } | NodeKind::ArrayPattern { .. } => false,
        _ => true,
    }
}

/// Whether identifier `node` is written when held by `parent`.
pub fn is_write_target(arena: &NodeArena, node: NodeIndex, parent: NodeIndex) -> bool {
    match arena.get(parent).map(|n| &n.kind) {
        Some(NodeKind::AssignmentExpression { left, .. })
        | Some(NodeKind::ForInStatement { left, .. })
        | Some(NodeKind::ForOfStatement { left, .. }) => *left == node,
        Some(NodeKind::UpdateExpression { argument, .. }) => *argument == node,
        _ => false,
    }
}
