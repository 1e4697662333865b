//! Tests for import bindings and `references_import`.

use estrav_ast::{NodeArena, NodeIndex, SourceType};
use estrav_traverse::{BindingKind, PathId, ROOT_PATH, TraverseState};

fn read(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let id = arena.identifier(name);
    arena.expression_statement(id)
}

/// ```js
/// import React from "react";
/// import { Component, useState as useLocal } from "react";
/// import * as path from "path";
/// React; Component; useLocal; path;
/// ```
fn module() -> TraverseState {
    let mut arena = NodeArena::new();
    let default = arena.import_default_specifier("React");
    let react = arena.import_declaration(vec![default], "react");
    let component = arena.import_specifier("Component", "Component");
    let renamed = arena.import_specifier("useState", "useLocal");
    let named = arena.import_declaration(vec![component, renamed], "react");
    let namespace = arena.import_namespace_specifier("path");
    let path = arena.import_declaration(vec![namespace], "path");

    let mut body = vec![react, named, path];
    for name in ["React", "Component", "useLocal", "path"] {
        body.push(read(&mut arena, name));
    }
    let program = arena.program(body, SourceType::Module);
    TraverseState::new(arena, program).unwrap()
}

fn use_site(state: &mut TraverseState, index: usize) -> PathId {
    state
        .get(ROOT_PATH, &format!("body.{index}.expression"))
        .unwrap()
        .unwrap()
}

#[test]
fn test_default_import() {
    let mut state = module();
    let react = use_site(&mut state, 3);
    assert!(state.references_import(react, "react", Some("default")).unwrap());
    assert!(state.references_import(react, "react", None).unwrap());
    assert!(!state.references_import(react, "react", Some("React")).unwrap());
    assert!(!state.references_import(react, "react", Some("*")).unwrap());
    assert!(!state.references_import(react, "preact", Some("default")).unwrap());
}

#[test]
fn test_named_import_is_not_default() {
    let mut state = module();
    let component = use_site(&mut state, 4);
    assert!(!state.references_import(component, "react", Some("default")).unwrap());
    assert!(state.references_import(component, "react", Some("Component")).unwrap());
    assert!(state.references_import(component, "react", None).unwrap());
}

#[test]
fn test_renamed_import_matches_imported_name() {
    let mut state = module();
    let local = use_site(&mut state, 5);
    assert!(state.references_import(local, "react", Some("useState")).unwrap());
    assert!(!state.references_import(local, "react", Some("useLocal")).unwrap());
}

#[test]
fn test_namespace_import() {
    let mut state = module();
    let path = use_site(&mut state, 6);
    assert!(state.references_import(path, "path", Some("*")).unwrap());
    assert!(!state.references_import(path, "path", Some("default")).unwrap());
}

#[test]
fn test_default_named_specifier_counts_as_default() {
    let mut arena = NodeArena::new();
    let specifier = arena.import_specifier("default", "Thing");
    let decl = arena.import_declaration(vec![specifier], "thing");
    let use_thing = read(&mut arena, "Thing");
    let program = arena.program(vec![decl, use_thing], SourceType::Module);
    let mut state = TraverseState::new(arena, program).unwrap();

    let thing = use_site(&mut state, 1);
    assert!(state.references_import(thing, "thing", Some("default")).unwrap());
}

#[test]
fn test_mixed_declaration_checks_the_bound_specifier_only() {
    // import React, { Component } from "react"; React; Component;
    let mut arena = NodeArena::new();
    let default = arena.import_default_specifier("React");
    let component = arena.import_specifier("Component", "Component");
    let decl = arena.import_declaration(vec![default, component], "react");
    let use_react = read(&mut arena, "React");
    let use_component = read(&mut arena, "Component");
    let program = arena.program(vec![decl, use_react, use_component], SourceType::Module);
    let mut state = TraverseState::new(arena, program).unwrap();

    let react = use_site(&mut state, 1);
    let component = use_site(&mut state, 2);
    assert!(state.references_import(react, "react", Some("default")).unwrap());
    assert!(!state.references_import(react, "react", Some("Component")).unwrap());
    // The default specifier next to it does not make `Component` a default import.
    assert!(!state.references_import(component, "react", Some("default")).unwrap());
    assert!(state.references_import(component, "react", Some("Component")).unwrap());
}

#[test]
fn test_declaration_target_is_not_a_reference() {
    let mut state = module();
    let local = state
        .get(ROOT_PATH, "body.0.specifiers.0.local")
        .unwrap()
        .unwrap();
    assert!(!state.references_import(local, "react", Some("default")).unwrap());
    assert!(!state.references_import(local, "react", None).unwrap());
}

#[test]
fn test_import_bindings_are_module_kind() {
    let mut state = module();
    let program_scope = state.program_scope().unwrap();
    let names: Vec<_> = state
        .bindings_of(program_scope)
        .unwrap()
        .into_iter()
        .map(|id| {
            let binding = state.binding(id).unwrap();
            assert_eq!(binding.kind, BindingKind::Module);
            binding.name.clone()
        })
        .collect();
    assert_eq!(names, ["React", "Component", "useLocal", "path"]);

    let react = state.get_own_binding(program_scope, "React").unwrap().unwrap();
    let use_react = use_site(&mut state, 3);
    assert_eq!(state.binding(react).unwrap().references.as_slice(), &[use_react]);
}

#[test]
fn test_removed_import_after_recrawl() {
    let mut state = module();
    let react = use_site(&mut state, 3);
    assert!(state.references_import(react, "react", Some("default")).unwrap());

    let decl = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    state.remove(decl).unwrap();
    let program_scope = state.program_scope().unwrap();
    state.crawl_scope(program_scope).unwrap();

    // The use site shifted up one slot but is the same path.
    assert_eq!(use_site(&mut state, 2), react);
    assert!(!state.references_import(react, "react", Some("default")).unwrap());
    assert!(!state.references_import(react, "react", None).unwrap());
}

#[test]
fn test_removed_import_before_recrawl() {
    let mut state = module();
    let react = use_site(&mut state, 3);
    assert!(state.references_import(react, "react", None).unwrap());

    let decl = state.child_at(ROOT_PATH, "body", 0).unwrap().unwrap();
    state.remove(decl).unwrap();
    // The stale binding points at a removed declaration: a negative answer,
    // not an error.
    assert!(!state.references_import(react, "react", None).unwrap());
}

#[test]
fn test_shadowing_local_hides_import() {
    let mut arena = NodeArena::new();
    let default = arena.import_default_specifier("React");
    let decl = arena.import_declaration(vec![default], "react");
    let use_react = read(&mut arena, "React");
    let function = arena.function_declaration("render", &["React"], vec![use_react]);
    let program = arena.program(vec![decl, function], SourceType::Module);
    let mut state = TraverseState::new(arena, program).unwrap();

    let inner = state
        .get(ROOT_PATH, "body.1.body.body.0.expression")
        .unwrap()
        .unwrap();
    assert!(!state.references_import(inner, "react", None).unwrap());
}

#[test]
fn test_non_identifier_is_false() {
    let mut state = module();
    let statement = state.child_at(ROOT_PATH, "body", 3).unwrap().unwrap();
    assert!(!state.references_import(statement, "react", None).unwrap());
}

#[test]
fn test_repeated_queries_agree() {
    let mut state = module();
    let react = use_site(&mut state, 3);
    let first = state.references_import(react, "react", Some("default")).unwrap();
    let paths = state.path_count();
    let second = state.references_import(react, "react", Some("default")).unwrap();
    assert_eq!(first, second);
    assert_eq!(state.path_count(), paths);
}
