//! Scope crawling and binding lookup.
//!
//! A scope's binding table is built on first query (or by an explicit
//! [`crawl_scope`](TraverseState::crawl_scope)) and is not refreshed by
//! mutations: after changing declarations, re-crawl the affected scope
//! before asking about its bindings again.
//!
//! A crawl runs in two passes over the scope's subtree:
//! - declarations whose target scope is this one are registered
//!   (nested function and class bodies are not entered);
//! - with `track_references`, every read or write of an identifier that
//!   resolves to one of those bindings is recorded on it.

use crate::error::{Result, TraverseError};
use crate::path::PathId;
use crate::scope::{
    Binding, BindingCollision, BindingId, BindingKind, Scope, ScopeId, ScopeKind, is_referenced,
    is_write_target,
};
use crate::state::TraverseState;
use estrav_ast::{Alias, NodeIndex, NodeKind, NodeType, VariableKind};
use smallvec::SmallVec;
use tracing::{Level, debug, span, trace, warn};

impl TraverseState {
    // =========================================================================
    // Scope access
    // =========================================================================

    pub fn scope(&self, id: ScopeId) -> Result<&Scope> {
        self.scopes
            .get(id.index())
            .ok_or(TraverseError::UnknownScope(id))
    }

    /// `None` for ids never issued and for bindings dropped by a re-crawl
    /// whose slot has not been reused yet.
    pub fn binding(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.index())?.as_ref()
    }

    /// Scope of the traversal root.
    pub fn program_scope(&self) -> Result<ScopeId> {
        self.scope_of(self.root())
    }

    /// Block-scoped redeclarations found by crawls so far.
    pub fn binding_diagnostics(&self) -> &[BindingCollision] {
        &self.diagnostics
    }

    /// Nearest enclosing scope where `var` declarations land.
    pub fn function_scope(&self, scope: ScopeId) -> Result<ScopeId> {
        let mut current = scope;
        for _ in 0..self.options.max_scope_depth {
            let data = self.scope(current)?;
            if data.kind.is_var_target() || data.parent.is_none() {
                return Ok(current);
            }
            current = data.parent;
        }
        Ok(current)
    }

    // =========================================================================
    // Crawling
    // =========================================================================

    /// Crawl `scope` unless it has been crawled already.
    pub fn ensure_crawled(&mut self, scope: ScopeId) -> Result<()> {
        if self.scope(scope)?.crawled {
            return Ok(());
        }
        self.crawl_scope(scope)
    }

    /// Rebuild the binding table of `scope` from the current tree.
    pub fn crawl_scope(&mut self, scope: ScopeId) -> Result<()> {
        let (kind, root) = {
            let data = self.scope(scope)?;
            if data.detached {
                return Err(TraverseError::DetachedScope(scope));
            }
            (data.kind, data.path)
        };
        self.validated(root)?;

        let _span = span!(Level::DEBUG, "crawl", scope = scope.0, ?kind).entered();
        let source_type = self.source_type();
        debug!(path = root.0, source_type = source_type.as_str(), "crawling scope");

        let previous = {
            let data = &mut self.scopes[scope.index()];
            data.crawled = true;
            std::mem::take(&mut data.bindings)
        };
        self.diagnostics.retain(|d| d.scope != scope);
        // Reversed so an unchanged scope gets its old ids back in order.
        for &id in previous.values().rev() {
            self.bindings[id.index()] = None;
            self.free_bindings.push(id);
        }
        trace!(dropped = previous.len(), "freed bindings");

        self.collect_declarations(scope, root)?;
        if self.options.track_references {
            self.collect_references(scope, root)?;
        }

        debug!(bindings = self.scopes[scope.index()].bindings.len(), "crawl done");
        Ok(())
    }

    /// Crawl every live scope created so far.
    pub fn crawl_program(&mut self) -> Result<()> {
        let program = self.program_scope()?;
        self.crawl_scope(program)?;
        for index in 0..self.scopes.len() {
            let id = ScopeId(index as u32);
            if id != program && !self.scopes[index].detached {
                self.crawl_scope(id)?;
            }
        }
        Ok(())
    }

    /// Register the declarations of `scope`'s subtree that land in `scope`.
    fn collect_declarations(&mut self, scope: ScopeId, root: PathId) -> Result<()> {
        let root_type = self.node_type(root)?;
        let mut stack: Vec<PathId> = Vec::new();

        match root_type {
            NodeType::FunctionDeclaration
            | NodeType::FunctionExpression
            | NodeType::ArrowFunctionExpression => {
                if root_type == NodeType::FunctionExpression
                    && let Some(id) = self.child(root, "id")?
                {
                    self.register(scope, BindingKind::Local, root, id)?;
                }
                for param in self.children(root, "params")? {
                    self.register_pattern(scope, BindingKind::Param, param, param)?;
                }
                stack.extend(self.child(root, "body")?);
            }
            NodeType::ClassDeclaration | NodeType::ClassExpression => {
                if root_type == NodeType::ClassExpression
                    && let Some(id) = self.child(root, "id")?
                {
                    self.register(scope, BindingKind::Local, root, id)?;
                }
            }
            NodeType::CatchClause => {
                if let Some(param) = self.child(root, "param")? {
                    self.register_pattern(scope, BindingKind::CatchParam, root, param)?;
                }
                stack.extend(self.child(root, "body")?);
            }
            _ => {
                let mut children = self.child_paths(root)?;
                children.reverse();
                stack.extend(children);
            }
        }

        while let Some(path) = stack.pop() {
            let node_type = self.node_type(path)?;
            match node_type {
                NodeType::VariableDeclaration => {
                    let kind = match self.node_ref(path)?.kind {
                        NodeKind::VariableDeclaration { kind, .. } => kind,
                        _ => VariableKind::Var,
                    };
                    let here = self.scope_of(path)?;
                    let target = match kind {
                        VariableKind::Var => self.function_scope(here)?,
                        VariableKind::Let | VariableKind::Const => here,
                    };
                    if target != scope {
                        continue;
                    }
                    let binding_kind = match kind {
                        VariableKind::Var => BindingKind::Var,
                        VariableKind::Let => BindingKind::Let,
                        VariableKind::Const => BindingKind::Const,
                    };
                    for declarator in self.children(path, "declarations")? {
                        if let Some(id) = self.child(declarator, "id")? {
                            self.register_pattern(scope, binding_kind, declarator, id)?;
                        }
                    }
                }
                NodeType::FunctionDeclaration | NodeType::ClassDeclaration => {
                    // Own scope is the function's; the name lands one up.
                    let own = self.scope_of(path)?;
                    if self.scope(own)?.parent != scope {
                        continue;
                    }
                    let kind = if node_type == NodeType::FunctionDeclaration {
                        BindingKind::Hoisted
                    } else {
                        BindingKind::Class
                    };
                    if let Some(id) = self.child(path, "id")? {
                        self.register(scope, kind, path, id)?;
                    }
                }
                NodeType::ImportDeclaration => {
                    if self.scope_of(path)? != scope {
                        continue;
                    }
                    self.register_import(scope, path)?;
                }
                ty if ty.has_alias(Alias::Expression) || ty.has_alias(Alias::Pattern) => {}
                _ => {
                    let mut children = self.child_paths(path)?;
                    children.reverse();
                    stack.extend(children);
                }
            }
        }
        Ok(())
    }

    /// Register every identifier bound by the pattern at `target`.
    pub(crate) fn register_pattern(
        &mut self,
        scope: ScopeId,
        kind: BindingKind,
        defining: PathId,
        target: PathId,
    ) -> Result<()> {
        let mut stack = vec![target];
        while let Some(path) = stack.pop() {
            match self.node_type(path)? {
                NodeType::Identifier => self.register(scope, kind, defining, path)?,
                NodeType::ObjectPattern => {
                    for property in self.children(path, "properties")? {
                        let field = if self.node_type(property)? == NodeType::RestElement {
                            "argument"
                        } else {
                            "value"
                        };
                        stack.extend(self.child(property, field)?);
                    }
                }
                NodeType::ArrayPattern => stack.extend(self.children(path, "elements")?),
                NodeType::AssignmentPattern => stack.extend(self.child(path, "left")?),
                NodeType::RestElement => stack.extend(self.child(path, "argument")?),
                _ => {}
            }
        }
        Ok(())
    }

    /// Add a binding for the identifier at `identifier`. A second declaration
    /// of a name keeps the first binding; involving a block-scoped kind, it
    /// is also reported.
    pub(crate) fn register(
        &mut self,
        scope: ScopeId,
        kind: BindingKind,
        defining: PathId,
        identifier: PathId,
    ) -> Result<()> {
        let Some(name) = self.node_ref(identifier)?.identifier_name().map(str::to_string) else {
            return Ok(());
        };
        debug_assert!(
            kind.accepts_definition(self.node_type(defining)?),
            "{kind} binding defined by a {}",
            self.node_type(defining)?
        );

        if let Some(&existing) = self.scopes[scope.index()].bindings.get(&name) {
            let existing_kind = self.binding(existing).map(|binding| binding.kind);
            if kind.is_block_scoped() || existing_kind.is_some_and(BindingKind::is_block_scoped) {
                warn!(
                    scope = scope.0,
                    name = name.as_str(),
                    ?existing_kind,
                    %kind,
                    "duplicate declaration"
                );
                self.diagnostics.push(BindingCollision {
                    scope,
                    name,
                    existing,
                    duplicate: identifier,
                });
            }
            return Ok(());
        }

        let id = match self.free_bindings.pop() {
            Some(id) => id,
            None => {
                self.bindings.push(None);
                BindingId((self.bindings.len() - 1) as u32)
            }
        };
        trace!(binding = id.0, name = name.as_str(), %kind, "binding registered");
        self.bindings[id.index()] = Some(Binding {
            id,
            name: name.clone(),
            kind,
            scope,
            path: defining,
            identifier,
            references: SmallVec::new(),
            constant_violations: SmallVec::new(),
        });
        self.scopes[scope.index()].bindings.insert(name, id);
        Ok(())
    }

    /// Record reads and writes in `root`'s subtree that resolve to bindings
    /// of `scope`.
    fn collect_references(&mut self, scope: ScopeId, root: PathId) -> Result<()> {
        let mut stack = vec![root];
        while let Some(path) = stack.pop() {
            if self.node_type(path)? != NodeType::Identifier {
                let mut children = self.child_paths(path)?;
                children.reverse();
                stack.extend(children);
                continue;
            }

            let node = self.node(path)?;
            let parent = self.parent_node(path)?;
            let grandparent = match self.parent_path(path)? {
                Some(parent_path) => self.parent_node(parent_path)?,
                None => NodeIndex::NONE,
            };
            let read = is_referenced(&self.arena, node, parent, grandparent);
            let write = is_write_target(&self.arena, node, parent);
            if !read && !write {
                continue;
            }

            let Some(name) = self.arena.identifier_name(node).map(str::to_string) else {
                continue;
            };
            let from = self.scope_of(path)?;
            let Some(binding) = self.resolve_within(from, &name, scope)? else {
                continue;
            };
            let Some(binding) = self.bindings[binding.index()].as_mut() else {
                continue;
            };
            if read {
                binding.references.push(path);
            }
            if write {
                binding.constant_violations.push(path);
            }
        }
        Ok(())
    }

    /// Resolve `name` from `from` upward, stopping at `stop`. Only a binding
    /// owned by `stop` is returned; anything closer shadows it.
    fn resolve_within(
        &mut self,
        from: ScopeId,
        name: &str,
        stop: ScopeId,
    ) -> Result<Option<BindingId>> {
        let mut current = from;
        for _ in 0..self.options.max_scope_depth {
            if current == stop {
                return Ok(self.scopes[stop.index()].bindings.get(name).copied());
            }
            if current.is_none() {
                return Ok(None);
            }
            self.ensure_crawled(current)?;
            let data = self.scope(current)?;
            if data.bindings.contains_key(name) {
                return Ok(None);
            }
            current = data.parent;
        }
        Ok(None)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// The binding `name` resolves to from `scope`, walking up the scope
    /// chain. Scopes on the way are crawled if needed.
    pub fn get_binding(&mut self, scope: ScopeId, name: &str) -> Result<Option<BindingId>> {
        let mut current = scope;
        for _ in 0..self.options.max_scope_depth {
            if current.is_none() {
                break;
            }
            if let Some(binding) = self.get_own_binding(current, name)? {
                return Ok(Some(binding));
            }
            current = self.scope(current)?.parent;
        }
        Ok(None)
    }

    /// The binding `name` has in `scope` itself.
    pub fn get_own_binding(&mut self, scope: ScopeId, name: &str) -> Result<Option<BindingId>> {
        self.ensure_crawled(scope)?;
        Ok(self.scope(scope)?.bindings.get(name).copied())
    }

    pub fn has_binding(&mut self, scope: ScopeId, name: &str) -> Result<bool> {
        Ok(self.get_binding(scope, name)?.is_some())
    }

    /// Bindings declared directly in `scope`, in declaration order.
    pub fn bindings_of(&mut self, scope: ScopeId) -> Result<Vec<BindingId>> {
        self.ensure_crawled(scope)?;
        Ok(self.scope(scope)?.bindings.values().copied().collect())
    }

    /// Whether the identifier at `path` is read, as opposed to declared,
    /// written, used as a label or as a non-computed property name.
    pub fn is_referenced_identifier(&self, path: PathId) -> Result<bool> {
        let data = *self.validated(path)?;
        if data.node_type != NodeType::Identifier {
            return Ok(false);
        }
        let parent = data.container.owner().unwrap_or(NodeIndex::NONE);
        let grandparent = if data.parent.is_some() {
            self.parent_node(data.parent)?
        } else {
            NodeIndex::NONE
        };
        Ok(is_referenced(&self.arena, data.node, parent, grandparent))
    }

    /// Scope kind helper for callers holding only a path.
    pub fn scope_kind_of(&self, path: PathId) -> Result<ScopeKind> {
        let scope = self.scope_of(path)?;
        Ok(self.scope(scope)?.kind)
    }
}
