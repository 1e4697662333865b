//! Import bindings and import-reference resolution.

use crate::error::Result;
use crate::path::PathId;
use crate::scope::{BindingKind, ScopeId};
use crate::state::TraverseState;
use estrav_ast::{NodeKind, NodeType};
use tracing::trace;

/// `import_name` selecting the default import.
pub const DEFAULT_IMPORT: &str = "default";
/// `import_name` selecting the namespace import.
pub const NAMESPACE_IMPORT: &str = "*";

impl TraverseState {
    /// Register the local names of the import declaration at `path`. Each
    /// binding is defined by the declaration itself.
    pub(crate) fn register_import(&mut self, scope: ScopeId, path: PathId) -> Result<()> {
        for specifier in self.children(path, "specifiers")? {
            if let Some(local) = self.child(specifier, "local")? {
                self.register(scope, BindingKind::Module, path, local)?;
            }
        }
        Ok(())
    }

    /// Module source of the import declaration at `path`.
    pub fn import_source(&self, path: PathId) -> Result<Option<&str>> {
        let node = self.node_ref(path)?;
        let NodeKind::ImportDeclaration { source, .. } = &node.kind else {
            return Ok(None);
        };
        Ok(self.arena.string_value(*source))
    }

    /// Whether the identifier at `path` refers to `import_name` of
    /// `module_source`.
    ///
    /// `None` accepts any import from the module, [`DEFAULT_IMPORT`] the
    /// default import, [`NAMESPACE_IMPORT`] the namespace import, and any
    /// other name the named import of that name. Every failed step answers
    /// `false`; only an invalid `path` is an error.
    pub fn references_import(
        &mut self,
        path: PathId,
        module_source: &str,
        import_name: Option<&str>,
    ) -> Result<bool> {
        if !self.is_referenced_identifier(path)? {
            return Ok(false);
        }
        let Some(name) = self.node_ref(path)?.identifier_name().map(str::to_string) else {
            return Ok(false);
        };
        let scope = self.scope_of(path)?;
        let Some(binding) = self.get_binding(scope, &name)? else {
            trace!(path = path.0, name = name.as_str(), "no binding");
            return Ok(false);
        };
        let Some(binding) = self.binding(binding) else {
            return Ok(false);
        };
        if binding.kind != BindingKind::Module {
            return Ok(false);
        }
        let (declaration, identifier) = (binding.path, binding.identifier);

        // The declaration may have been removed since the last crawl.
        if !self.is_valid(declaration)
            || self.node_type(declaration)? != NodeType::ImportDeclaration
        {
            return Ok(false);
        }
        if self.import_source(declaration)? != Some(module_source) {
            return Ok(false);
        }
        let Some(import_name) = import_name else {
            return Ok(true);
        };

        // The specifier that introduced this local name.
        let Ok(Some(specifier)) = self.parent_path(identifier) else {
            return Ok(false);
        };
        let specifier = self.node_ref(specifier)?;
        let matched = match &specifier.kind {
            NodeKind::ImportDefaultSpecifier { .. } => import_name == DEFAULT_IMPORT,
            NodeKind::ImportNamespaceSpecifier { .. } => import_name == NAMESPACE_IMPORT,
            NodeKind::ImportSpecifier { imported, .. } => {
                self.arena.identifier_name(*imported) == Some(import_name)
            }
            _ => false,
        };
        Ok(matched)
    }
}
