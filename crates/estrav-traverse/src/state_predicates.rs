//! Generic attribute and type queries over paths.

use crate::error::Result;
use crate::path::PathId;
use crate::state::TraverseState;
use estrav_ast::{TypeTag, Value};

impl TraverseState {
    /// Whether the attribute `key` is truthy. A list attribute is truthy when
    /// non-empty; an unknown key is falsy.
    pub fn has(&self, path: PathId, key: &str) -> Result<bool> {
        let node = self.node_ref(path)?;
        Ok(node.get(key).is_some_and(|value| value.is_truthy()))
    }

    /// Alias of [`has`](Self::has).
    #[inline]
    pub fn is(&self, path: PathId, key: &str) -> Result<bool> {
        self.has(path, key)
    }

    pub fn isnt(&self, path: PathId, key: &str) -> Result<bool> {
        Ok(!self.has(path, key)?)
    }

    /// Strict equality between the attribute `key` and `value`. An unknown
    /// key equals nothing.
    pub fn equals<'v>(&self, path: PathId, key: &str, value: impl Into<Value<'v>>) -> Result<bool> {
        let node = self.node_ref(path)?;
        let value = value.into();
        Ok(node.get(key).is_some_and(|actual| actual.strict_eq(&value)))
    }

    /// Whether the recorded type of `path` is `tag` or one of its subtypes.
    /// Answers for removed paths from the type cached at removal; an unknown
    /// path is never of any type.
    pub fn is_node_type(&self, path: PathId, tag: impl Into<TypeTag>) -> bool {
        let tag = tag.into();
        self.node_type(path).is_ok_and(|ty| ty.is(tag))
    }

    /// [`is_node_type`](Self::is_node_type) over a tag name.
    pub fn is_node_type_name(&self, path: PathId, name: &str) -> bool {
        TypeTag::from_name(name).is_some_and(|tag| self.is_node_type(path, tag))
    }

    /// The node came from the input text.
    pub fn is_user(&self, path: PathId) -> Result<bool> {
        Ok(self.node_ref(path)?.loc.is_some())
    }

    /// The node was synthesized by a transform.
    pub fn is_generated(&self, path: PathId) -> Result<bool> {
        Ok(!self.is_user(path)?)
    }
}
