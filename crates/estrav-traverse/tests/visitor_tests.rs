//! Tests for the enter/exit walk.

use estrav_ast::{NodeArena, NodeIndex, NodeType, SourceType};
use estrav_traverse::{
    PathId, ROOT_PATH, Result, TraverseState, VisitResult, Visitor, traverse, traverse_from,
};

fn statement(arena: &mut NodeArena, name: &str) -> NodeIndex {
    let id = arena.identifier(name);
    arena.expression_statement(id)
}

/// Records `enter:<type>` and `exit:<type>` events.
#[derive(Default)]
struct Recorder {
    events: Vec<String>,
}

impl Visitor for Recorder {
    fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
        self.events.push(format!("enter:{}", state.node_type(path)?));
        Ok(VisitResult::Continue)
    }

    fn exit(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
        self.events.push(format!("exit:{}", state.node_type(path)?));
        Ok(VisitResult::Continue)
    }
}

/// Names of identifiers in visiting order.
#[derive(Default)]
struct Names {
    names: Vec<String>,
}

impl Visitor for Names {
    fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
        if let Some(name) = state.node_ref(path)?.identifier_name() {
            self.names.push(name.to_string());
        }
        Ok(VisitResult::Continue)
    }
}

#[test]
fn test_enter_exit_order() {
    let mut arena = NodeArena::new();
    let a = statement(&mut arena, "a");
    let program = arena.program(vec![a], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut recorder = Recorder::default();
    traverse(&mut state, &mut recorder).unwrap();
    assert_eq!(
        recorder.events,
        [
            "enter:Program",
            "enter:ExpressionStatement",
            "enter:Identifier",
            "exit:Identifier",
            "exit:ExpressionStatement",
            "exit:Program",
        ]
    );
}

#[test]
fn test_siblings_in_container_order() {
    let mut arena = NodeArena::new();
    let callee = arena.member_chain("console.log");
    let x = arena.identifier("x");
    let y = arena.identifier("y");
    let call = arena.call(callee, vec![x, y]);
    let stmt = arena.expression_statement(call);
    let program = arena.program(vec![stmt], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut names = Names::default();
    traverse(&mut state, &mut names).unwrap();
    assert_eq!(names.names, ["console", "log", "x", "y"]);
}

#[test]
fn test_skip_children_and_stop() {
    struct SkipFunctions {
        names: Vec<String>,
    }
    impl Visitor for SkipFunctions {
        fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            if state.is_node_type(path, NodeType::FunctionDeclaration) {
                return Ok(VisitResult::SkipChildren);
            }
            if let Some(name) = state.node_ref(path)?.identifier_name() {
                self.names.push(name.to_string());
                if name == "stop" {
                    return Ok(VisitResult::Stop);
                }
            }
            Ok(VisitResult::Continue)
        }
    }

    let mut arena = NodeArena::new();
    let inner = statement(&mut arena, "hidden");
    let function = arena.function_declaration("f", &["p"], vec![inner]);
    let a = statement(&mut arena, "a");
    let stop = statement(&mut arena, "stop");
    let after = statement(&mut arena, "after");
    let program = arena.program(vec![function, a, stop, after], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut visitor = SkipFunctions { names: Vec::new() };
    traverse(&mut state, &mut visitor).unwrap();
    assert_eq!(visitor.names, ["a", "stop"]);
}

#[test]
fn test_removal_during_walk_visits_every_remaining_sibling() {
    struct RemoveDrops {
        seen: Vec<String>,
    }
    impl Visitor for RemoveDrops {
        fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            if state.is_node_type(path, NodeType::ExpressionStatement) {
                let expression = state.child(path, "expression")?;
                let name = expression
                    .and_then(|e| state.node_ref(e).ok())
                    .and_then(|n| n.identifier_name())
                    .unwrap_or_default()
                    .to_string();
                self.seen.push(name.clone());
                if name.starts_with("drop") {
                    state.remove(path)?;
                }
            }
            Ok(VisitResult::Continue)
        }
    }

    let mut arena = NodeArena::new();
    let body = ["keep1", "drop1", "drop2", "keep2"]
        .map(|name| statement(&mut arena, name))
        .to_vec();
    let program = arena.program(body, SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut visitor = RemoveDrops { seen: Vec::new() };
    traverse(&mut state, &mut visitor).unwrap();
    assert_eq!(visitor.seen, ["keep1", "drop1", "drop2", "keep2"]);
    assert_eq!(state.list_len(ROOT_PATH, "body").unwrap(), 2);
}

#[test]
fn test_removed_path_is_not_exited() {
    struct RemoveFirst {
        exited: usize,
    }
    impl Visitor for RemoveFirst {
        fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            if state.key(path)? == estrav_traverse::PathKey::Index(0) {
                state.remove(path)?;
            }
            Ok(VisitResult::Continue)
        }
        fn exit(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            if state.is_node_type(path, NodeType::ExpressionStatement) {
                self.exited += 1;
            }
            Ok(VisitResult::Continue)
        }
    }

    let mut arena = NodeArena::new();
    let only = statement(&mut arena, "only");
    let program = arena.program(vec![only], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut visitor = RemoveFirst { exited: 0 };
    traverse(&mut state, &mut visitor).unwrap();
    assert_eq!(visitor.exited, 0);
}

#[test]
fn test_replacement_children_are_visited() {
    struct ReplaceA;
    impl Visitor for ReplaceA {
        fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            if state.node_ref(path)?.identifier_name() == Some("a") {
                let member = state.arena_mut().member_chain("b.c");
                state.replace_with(path, member)?;
            }
            Ok(VisitResult::Continue)
        }
    }

    let mut arena = NodeArena::new();
    let a = statement(&mut arena, "a");
    let program = arena.program(vec![a], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut replace = ReplaceA;
    traverse(&mut state, &mut replace).unwrap();
    let mut names = Names::default();
    traverse(&mut state, &mut names).unwrap();
    assert_eq!(names.names, ["b", "c"]);

    let member = state.get(ROOT_PATH, "body.0.expression").unwrap().unwrap();
    assert!(state.matches_pattern(member, "b.c", false).unwrap());
}

#[test]
fn test_inserted_siblings_after_current_are_visited() {
    struct Duplicate {
        seen: Vec<String>,
    }
    impl Visitor for Duplicate {
        fn enter(&mut self, state: &mut TraverseState, path: PathId) -> Result<VisitResult> {
            let Some(name) = state.node_ref(path)?.identifier_name().map(str::to_string) else {
                return Ok(VisitResult::Continue);
            };
            self.seen.push(name.clone());
            if name == "first" {
                let statement = state.parent_path(path)?.unwrap_or(path);
                let extra = {
                    let arena = state.arena_mut();
                    let before = arena.identifier("before");
                    let before = arena.expression_statement(before);
                    let after = arena.identifier("after");
                    let after = arena.expression_statement(after);
                    (before, after)
                };
                state.insert_before(statement, vec![extra.0])?;
                state.insert_after(statement, vec![extra.1])?;
            }
            Ok(VisitResult::Continue)
        }
    }

    let mut arena = NodeArena::new();
    let first = statement(&mut arena, "first");
    let last = statement(&mut arena, "last");
    let program = arena.program(vec![first, last], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let mut visitor = Duplicate { seen: Vec::new() };
    traverse(&mut state, &mut visitor).unwrap();
    // Nodes inserted before the current element were already passed.
    assert_eq!(visitor.seen, ["first", "after", "last"]);
    assert_eq!(state.list_len(ROOT_PATH, "body").unwrap(), 4);
}

#[test]
fn test_traverse_from_subtree() {
    let mut arena = NodeArena::new();
    let outside = statement(&mut arena, "outside");
    let inside = statement(&mut arena, "inside");
    let block = arena.block(vec![inside]);
    let program = arena.program(vec![outside, block], SourceType::Script);
    let mut state = TraverseState::new(arena, program).unwrap();

    let block = state.child_at(ROOT_PATH, "body", 1).unwrap().unwrap();
    let mut names = Names::default();
    traverse_from(&mut state, block, &mut names).unwrap();
    assert_eq!(names.names, ["inside"]);
}
