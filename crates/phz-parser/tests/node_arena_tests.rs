use crate::{NodeIndex, NodeLocator, SyntaxStore};
use phz_scanner::SyntaxKind;
use std::path::Path;

const SOURCE: &str = r#"<?php
namespace App;

class Runner
{
    public function first() { return 1; }

    public function run(Client $client)
    {
        $result = $client->send();
        return $result;
    }
}
"#;

#[test]
fn detach_subtree_keeps_only_the_subtree() {
    let unit = SyntaxStore::default()
        .parse_file(Path::new("runner.php"), SOURCE)
        .unwrap();
    let class = NodeLocator::new()
        .find_first_of_kind(&unit.arena, unit.root, &[SyntaxKind::ClassDeclaration])
        .unwrap();
    let method = unit.arena.find_method(class, "run").unwrap();
    let subtree_size = unit.arena.descendants(method).len();

    let (detached, root) = unit.arena.detach_subtree(method);
    assert_eq!(root, NodeIndex(0));
    assert_eq!(detached.len(), subtree_size);
    assert!(detached.len() < unit.arena.len());
    assert_eq!(detached.kind(root), Some(SyntaxKind::MethodDeclaration));
    assert_eq!(detached.declaration_name(root), Some("run"));
    assert!(detached.get(root).unwrap().parent.is_none());

    for index in detached.descendants(root) {
        for child in detached.children(index) {
            assert!((child.0 as usize) < detached.len());
            assert_eq!(detached.get(child).unwrap().parent, index);
        }
    }
}

#[test]
fn detached_metadata_keeps_names_but_drops_outside_links() {
    let unit = SyntaxStore::default()
        .parse_file(Path::new("runner.php"), SOURCE)
        .unwrap();
    let class = NodeLocator::new()
        .find_first_of_kind(&unit.arena, unit.root, &[SyntaxKind::ClassDeclaration])
        .unwrap();
    let method = unit.arena.find_method(class, "run").unwrap();

    let (detached, root) = unit.arena.detach_subtree(method);
    let metadata = detached.get_metadata(root).unwrap();
    assert_eq!(metadata.class_name.as_deref(), Some("App\\Runner"));
    assert!(metadata.class_like.is_none());
    assert_eq!(metadata.function, root);
    assert_eq!(
        detached.scope_of(root).and_then(|scope| scope.namespace.as_deref()),
        Some("App")
    );
}

#[test]
fn descendants_are_in_source_order() {
    let unit = SyntaxStore::default()
        .parse_file(Path::new("runner.php"), SOURCE)
        .unwrap();
    let methods: Vec<_> = unit
        .arena
        .descendants(unit.root)
        .into_iter()
        .filter(|index| unit.arena.kind(*index) == Some(SyntaxKind::MethodDeclaration))
        .filter_map(|index| unit.arena.declaration_name(index))
        .collect();
    assert_eq!(methods, vec!["first", "run"]);
}

#[test]
fn payload_borrows_from_the_node_not_the_arena() {
    let unit = SyntaxStore::default()
        .parse_file(Path::new("runner.php"), SOURCE)
        .unwrap();
    let call = NodeLocator::new()
        .find_first_of_kind(&unit.arena, unit.root, &[SyntaxKind::MethodCall])
        .unwrap();
    let node = unit.arena.get(call).unwrap().clone();
    drop(unit);

    let data = {
        let scratch = crate::NodeArena::new();
        scratch.get_call(&node)
    };
    assert!(data.is_some_and(|call| call.arguments.is_empty()));
}

#[test]
fn modifier_flags_serialize() {
    let flags = crate::ModifierFlags::PUBLIC | crate::ModifierFlags::STATIC;
    let json = serde_json::to_value(flags).unwrap();
    let text = json.as_str().unwrap();
    assert!(text.contains("PUBLIC"));
    assert!(text.contains("STATIC"));
}
