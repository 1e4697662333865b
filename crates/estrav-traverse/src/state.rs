//! Traversal state: the node arena plus the path and scope arenas built
//! over it.
//!
//! Paths are created on first navigation to a position and cached under
//! their parent path by `(field, index)`, so revisiting a position yields the
//! same `PathId`. Every query revalidates that the path's container still
//! holds its node.

use crate::error::{Result, TraverseError};
use crate::options::TraverseOptions;
use crate::path::{CacheKey, Container, PathData, PathId, PathKey};
use crate::scope::{Binding, BindingCollision, BindingId, Scope, ScopeId, ScopeKind};
use estrav_ast::{Alias, Node, NodeArena, NodeIndex, NodeKind, NodeType, Slot, SourceType};
use estrav_common::limits::MAX_ANCESTOR_WALK_ITERATIONS;
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

/// Path of the traversal root.
pub const ROOT_PATH: PathId = PathId(0);

/// Owner of the tree and of every path, scope and binding derived from it.
pub struct TraverseState {
    pub(crate) arena: NodeArena,
    /// Node held by the root container.
    pub(crate) root: NodeIndex,
    pub(crate) paths: Vec<PathData>,
    /// Parent path -> (field, index) -> child path
    pub(crate) child_cache: FxHashMap<PathId, FxHashMap<CacheKey, PathId>>,
    pub(crate) scopes: Vec<Scope>,
    /// `None` marks a slot freed by a re-crawl and queued in `free_bindings`.
    pub(crate) bindings: Vec<Option<Binding>>,
    pub(crate) free_bindings: Vec<BindingId>,
    pub(crate) options: TraverseOptions,
    pub(crate) diagnostics: Vec<BindingCollision>,
}

impl TraverseState {
    pub fn new(arena: NodeArena, root: NodeIndex) -> Result<TraverseState> {
        TraverseState::with_options(arena, root, TraverseOptions::default())
    }

    pub fn with_options(
        arena: NodeArena,
        root: NodeIndex,
        options: TraverseOptions,
    ) -> Result<TraverseState> {
        let node_type = arena
            .node_type(root)
            .ok_or(TraverseError::MissingNode(root))?;
        let mut state = TraverseState {
            arena,
            root,
            paths: Vec::new(),
            child_cache: FxHashMap::default(),
            scopes: Vec::new(),
            bindings: Vec::new(),
            free_bindings: Vec::new(),
            options,
            diagnostics: Vec::new(),
        };
        let root_path = state.push_path(PathData {
            node: root,
            node_type,
            parent: PathId::NONE,
            container: Container::Root,
            key: PathKey::Field("root"),
            scope: ScopeId::NONE,
            removed: false,
        });
        debug_assert_eq!(root_path, ROOT_PATH);
        Ok(state)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Direct arena access, for allocating replacement nodes. Paths whose
    /// containers are edited through here report `Stale` on next use.
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    pub fn into_arena(self) -> NodeArena {
        self.arena
    }

    pub fn options(&self) -> &TraverseOptions {
        &self.options
    }

    #[inline]
    pub fn root(&self) -> PathId {
        ROOT_PATH
    }

    pub fn root_node(&self) -> NodeIndex {
        self.root
    }

    /// Whether the tree is a script or a module. The options override the
    /// Program's own attribute.
    pub fn source_type(&self) -> SourceType {
        if let Some(source_type) = self.options.source_type {
            return source_type;
        }
        match self.arena.get(self.root).map(|n| &n.kind) {
            Some(NodeKind::Program { source_type, .. }) => *source_type,
            _ => SourceType::Script,
        }
    }

    /// Number of paths created so far, including removed ones.
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Number of binding slots allocated, live or awaiting reuse.
    pub fn binding_slots(&self) -> usize {
        self.bindings.len()
    }

    // =========================================================================
    // Path validation
    // =========================================================================

    /// Raw bookkeeping for `path`, without the position check.
    pub fn path_data(&self, path: PathId) -> Result<&PathData> {
        self.paths
            .get(path.index())
            .ok_or(TraverseError::UnknownPath(path))
    }

    /// Bookkeeping for `path`, checked to be live and in place.
    pub(crate) fn validated(&self, path: PathId) -> Result<&PathData> {
        let data = self.path_data(path)?;
        if data.removed {
            return Err(TraverseError::Removed(path));
        }
        if self.held_at(data.container, data.key) != Some(data.node) {
            return Err(TraverseError::Stale(path));
        }
        Ok(data)
    }

    /// The node currently stored at `container[key]`.
    pub(crate) fn held_at(&self, container: Container, key: PathKey) -> Option<NodeIndex> {
        match (container, key) {
            (Container::Root, _) => Some(self.root),
            (Container::Field { owner }, PathKey::Field(field)) => {
                match self.arena.slot(owner, field)? {
                    Slot::Single(node) => Some(node),
                    Slot::List(_) => None,
                }
            }
            (Container::List { owner, field }, PathKey::Index(index)) => {
                match self.arena.slot(owner, field)? {
                    Slot::List(list) => list.get(index),
                    Slot::Single(_) => None,
                }
            }
            _ => None,
        }
    }

    pub fn is_removed(&self, path: PathId) -> bool {
        self.paths.get(path.index()).is_some_and(|d| d.removed)
    }

    /// Whether `path` can still be queried.
    pub fn is_valid(&self, path: PathId) -> bool {
        self.validated(path).is_ok()
    }

    // =========================================================================
    // Node access
    // =========================================================================

    pub fn node(&self, path: PathId) -> Result<NodeIndex> {
        Ok(self.validated(path)?.node)
    }

    pub fn node_ref(&self, path: PathId) -> Result<&Node> {
        let node = self.node(path)?;
        self.arena.get(node).ok_or(TraverseError::MissingNode(node))
    }

    /// Type tag recorded for `path`. Still answers after removal.
    pub fn node_type(&self, path: PathId) -> Result<NodeType> {
        Ok(self.path_data(path)?.node_type)
    }

    pub fn container(&self, path: PathId) -> Result<Container> {
        Ok(self.validated(path)?.container)
    }

    pub fn key(&self, path: PathId) -> Result<PathKey> {
        Ok(self.validated(path)?.key)
    }

    pub fn parent_path(&self, path: PathId) -> Result<Option<PathId>> {
        let parent = self.validated(path)?.parent;
        Ok(parent.is_some().then_some(parent))
    }

    /// Node held by the parent path, or `NONE` at the root.
    pub fn parent_node(&self, path: PathId) -> Result<NodeIndex> {
        let data = self.validated(path)?;
        Ok(data.container.owner().unwrap_or(NodeIndex::NONE))
    }

    pub fn scope_of(&self, path: PathId) -> Result<ScopeId> {
        Ok(self.validated(path)?.scope)
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    fn resolve_field(node_type: NodeType, field: &str) -> Result<&'static str> {
        node_type
            .visitor_keys()
            .iter()
            .copied()
            .find(|key| *key == field)
            .ok_or_else(|| TraverseError::UnknownField {
                node_type,
                field: field.to_string(),
            })
    }

    /// Path of the single child in `field`, or `None` when the field is empty.
    pub fn child(&mut self, path: PathId, field: &str) -> Result<Option<PathId>> {
        let data = *self.validated(path)?;
        let field = Self::resolve_field(data.node_type, field)?;
        match self.arena.slot(data.node, field) {
            Some(Slot::Single(child)) if child.is_none() => Ok(None),
            Some(Slot::Single(child)) => self
                .cached_child(path, data.node, field, None, child)
                .map(Some),
            Some(Slot::List(_)) => Err(TraverseError::NotASingleField {
                node_type: data.node_type,
                field,
            }),
            None => Err(TraverseError::UnknownField {
                node_type: data.node_type,
                field: field.to_string(),
            }),
        }
    }

    /// Path of element `index` of the list `field`, or `None` for a hole.
    pub fn child_at(&mut self, path: PathId, field: &str, index: usize) -> Result<Option<PathId>> {
        let data = *self.validated(path)?;
        let field = Self::resolve_field(data.node_type, field)?;
        let child = match self.arena.slot(data.node, field) {
            Some(Slot::List(list)) => list.get(index).ok_or(TraverseError::IndexOutOfBounds {
                field,
                index,
                len: list.len(),
            })?,
            _ => {
                return Err(TraverseError::NotAList {
                    node_type: data.node_type,
                    field,
                });
            }
        };
        if child.is_none() {
            return Ok(None);
        }
        self.cached_child(path, data.node, field, Some(index), child)
            .map(Some)
    }

    /// Paths of every element of the list `field`, skipping holes.
    pub fn children(&mut self, path: PathId, field: &str) -> Result<Vec<PathId>> {
        let len = self.list_len(path, field)?;
        let mut out = Vec::with_capacity(len);
        for index in 0..len {
            if let Some(child) = self.child_at(path, field, index)? {
                out.push(child);
            }
        }
        Ok(out)
    }

    /// Paths of all children of `path`, in visiting order.
    pub fn child_paths(&mut self, path: PathId) -> Result<Vec<PathId>> {
        let data = *self.validated(path)?;
        let mut out = Vec::new();
        for field in data.node_type.visitor_keys() {
            match self.arena.slot(data.node, field) {
                Some(Slot::Single(_)) => out.extend(self.child(path, field)?),
                Some(Slot::List(_)) => out.extend(self.children(path, field)?),
                None => {}
            }
        }
        Ok(out)
    }

    /// Length of the list `field` of `path`'s node.
    pub fn list_len(&self, path: PathId, field: &str) -> Result<usize> {
        let data = self.validated(path)?;
        let field = Self::resolve_field(data.node_type, field)?;
        match self.arena.slot(data.node, field) {
            Some(Slot::List(list)) => Ok(list.len()),
            _ => Err(TraverseError::NotAList {
                node_type: data.node_type,
                field,
            }),
        }
    }

    /// Navigate a dotted path such as `"body.0.expression"`. A numeric segment
    /// indexes the list named by the previous segment.
    pub fn get(&mut self, path: PathId, dotted: &str) -> Result<Option<PathId>> {
        let mut current = path;
        let mut pending_list: Option<(NodeType, &'static str)> = None;
        for segment in dotted.split('.') {
            if let Some((node_type, field)) = pending_list.take() {
                let index = segment
                    .parse::<usize>()
                    .map_err(|_| TraverseError::NotASingleField { node_type, field })?;
                match self.child_at(current, field, index)? {
                    Some(next) => current = next,
                    None => return Ok(None),
                }
                continue;
            }
            let data = *self.validated(current)?;
            let field = Self::resolve_field(data.node_type, segment)?;
            match self.arena.slot(data.node, field) {
                Some(Slot::List(_)) => pending_list = Some((data.node_type, field)),
                _ => match self.child(current, field)? {
                    Some(next) => current = next,
                    None => return Ok(None),
                },
            }
        }
        if let Some((node_type, field)) = pending_list {
            return Err(TraverseError::NotASingleField { node_type, field });
        }
        Ok(Some(current))
    }

    /// Element `index` of the list holding `path`.
    pub fn sibling(&mut self, path: PathId, index: usize) -> Result<Option<PathId>> {
        let data = *self.validated(path)?;
        match data.container {
            Container::List { field, .. } => self.child_at(data.parent, field, index),
            _ => Err(TraverseError::NotAList {
                node_type: self.node_type(data.parent).unwrap_or(data.node_type),
                field: data.key.as_field().unwrap_or("root"),
            }),
        }
    }

    /// Nearest proper ancestor of `path` satisfying `pred`.
    pub fn find_parent(
        &self,
        path: PathId,
        mut pred: impl FnMut(&TraverseState, PathId) -> bool,
    ) -> Result<Option<PathId>> {
        let mut current = self.validated(path)?.parent;
        let mut iterations = 0;
        while current.is_some() {
            iterations += 1;
            if iterations > MAX_ANCESTOR_WALK_ITERATIONS {
                break;
            }
            if pred(self, current) {
                return Ok(Some(current));
            }
            current = self.path_data(current)?.parent;
        }
        Ok(None)
    }

    /// Nearest enclosing function.
    pub fn function_parent(&self, path: PathId) -> Result<Option<PathId>> {
        self.find_parent(path, |state, p| {
            state
                .node_type(p)
                .is_ok_and(|ty| ty.has_alias(Alias::Function))
        })
    }

    /// Nearest statement held in a list, starting at `path` itself.
    pub fn statement_parent(&self, path: PathId) -> Result<Option<PathId>> {
        let data = self.validated(path)?;
        if data.container.is_list() && data.node_type.has_alias(Alias::Statement) {
            return Ok(Some(path));
        }
        self.find_parent(path, |state, p| {
            state.path_data(p).is_ok_and(|d| {
                d.container.is_list() && d.node_type.has_alias(Alias::Statement)
            })
        })
    }

    // =========================================================================
    // Path arena bookkeeping
    // =========================================================================

    /// Reuse the cached path for a position, or create one.
    pub(crate) fn cached_child(
        &mut self,
        parent: PathId,
        owner: NodeIndex,
        field: &'static str,
        index: Option<usize>,
        child: NodeIndex,
    ) -> Result<PathId> {
        let cache_key = (field, index);
        if let Some(&existing) = self
            .child_cache
            .get(&parent)
            .and_then(|cache| cache.get(&cache_key))
        {
            let data = &self.paths[existing.index()];
            if !data.removed && data.node == child {
                return Ok(existing);
            }
            // The position now holds a different node.
            self.mark_removed(existing);
            self.invalidate_descendants(existing);
        }

        let node_type = self
            .arena
            .node_type(child)
            .ok_or(TraverseError::MissingNode(child))?;
        let (container, key) = match index {
            None => (Container::Field { owner }, PathKey::Field(field)),
            Some(index) => (Container::List { owner, field }, PathKey::Index(index)),
        };
        let id = self.push_path(PathData {
            node: child,
            node_type,
            parent,
            container,
            key,
            scope: ScopeId::NONE,
            removed: false,
        });
        self.child_cache
            .entry(parent)
            .or_default()
            .insert(cache_key, id);
        trace!(path = id.0, parent = parent.0, %node_type, %key, "path created");
        Ok(id)
    }

    fn push_path(&mut self, data: PathData) -> PathId {
        let id = PathId(self.paths.len() as u32);
        self.paths.push(data);
        self.assign_scope(id);
        id
    }

    /// Give `path` its own scope if its node introduces one, else inherit the
    /// parent path's scope.
    pub(crate) fn assign_scope(&mut self, path: PathId) {
        let data = self.paths[path.index()];
        let parent_scope = if data.parent.is_some() {
            self.paths[data.parent.index()].scope
        } else {
            ScopeId::NONE
        };
        let parent_type = data
            .parent
            .is_some()
            .then(|| self.paths[data.parent.index()].node_type);

        let scope = if creates_scope(data.node_type, parent_type, data.key) {
            self.new_scope(ScopeKind::of(data.node_type), path, parent_scope)
        } else {
            parent_scope
        };
        self.paths[path.index()].scope = scope;
    }

    fn new_scope(&mut self, kind: ScopeKind, path: PathId, parent: ScopeId) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope::new(id, kind, path, parent));
        trace!(scope = id.0, ?kind, path = path.0, parent = parent.0, "scope created");
        id
    }

    /// Mark `path` removed and detach the scope it introduced, if any.
    pub(crate) fn mark_removed(&mut self, path: PathId) {
        let Some(data) = self.paths.get_mut(path.index()) else {
            return;
        };
        data.removed = true;
        self.detach_own_scope(path);
        trace!(path = path.0, "path invalidated");
    }

    /// Detach the scope introduced by `path`, if it introduced one.
    pub(crate) fn detach_own_scope(&mut self, path: PathId) {
        let scope = self.paths[path.index()].scope;
        if let Some(scope) = self.scopes.get_mut(scope.index())
            && scope.path == path
        {
            scope.detached = true;
        }
    }

    /// Drop every cached path below `path`, marking each removed.
    pub(crate) fn invalidate_descendants(&mut self, path: PathId) {
        let mut stack: Vec<PathId> = self
            .child_cache
            .remove(&path)
            .map(|cache| cache.into_values().collect())
            .unwrap_or_default();
        while let Some(current) = stack.pop() {
            self.mark_removed(current);
            if let Some(cache) = self.child_cache.remove(&current) {
                stack.extend(cache.into_values());
            }
        }
    }

    /// Log a structural edit.
    pub(crate) fn log_mutation(&self, action: &'static str, path: PathId, count: usize) {
        debug!(action, path = path.0, count, "tree mutated");
    }
}

/// Whether a node of `node_type` held at `key` under a `parent_type` node
/// introduces its own scope. A function's or catch clause's body block shares
/// the scope of its owner.
pub(crate) fn creates_scope(
    node_type: NodeType,
    parent_type: Option<NodeType>,
    key: PathKey,
) -> bool {
    if !node_type.has_alias(Alias::Scopable) {
        return false;
    }
    if node_type == NodeType::BlockStatement
        && key == PathKey::Field("body")
        && parent_type
            .is_some_and(|p| p.has_alias(Alias::Function) || p == NodeType::CatchClause)
    {
        return false;
    }
    true
}
