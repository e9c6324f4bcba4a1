use crate::{Decorator, NodeArena, NodeIndex, NodeLocator, ScopeDecorator, SyntaxStore};
use phz_scanner::SyntaxKind;
use std::path::Path;

fn resolved_names(arena: &NodeArena, root: NodeIndex) -> Vec<(String, Option<String>)> {
    NodeLocator::new()
        .find_all_of_kind(arena, root, &[SyntaxKind::Name])
        .into_iter()
        .map(|index| {
            let node = arena.get(index).unwrap();
            let text = arena.get_name(node).unwrap().text.clone();
            (text, arena.resolved_name(index).map(str::to_string))
        })
        .collect()
}

fn lookup<'a>(names: &'a [(String, Option<String>)], text: &str) -> Option<&'a str> {
    names
        .iter()
        .find(|(written, _)| written == text)
        .and_then(|(_, resolved)| resolved.as_deref())
}

#[test]
fn resolves_names_through_namespace_and_imports() {
    let source = r#"<?php
namespace App\Service;

use Vendor\Lib\Client as HttpClient;
use Vendor\Lib;

class Runner extends Base
{
    public function go()
    {
        $client = new HttpClient();
        Lib\Thing::make();
        \Other\Tool::run();
        parent::go();
        self::stop();
        strlen('a');
        return LIMIT;
    }
}
"#;
    let unit = SyntaxStore::default()
        .parse_file(Path::new("runner.php"), source)
        .unwrap();
    let class = NodeLocator::new()
        .find_first_of_kind(&unit.arena, unit.root, &[SyntaxKind::ClassDeclaration])
        .unwrap();
    assert_eq!(unit.arena.resolved_name(class), Some("App\\Service\\Runner"));

    let names = resolved_names(&unit.arena, unit.root);
    assert_eq!(lookup(&names, "Base"), Some("App\\Service\\Base"));
    assert_eq!(lookup(&names, "HttpClient"), Some("Vendor\\Lib\\Client"));
    assert_eq!(lookup(&names, "Lib\\Thing"), Some("Vendor\\Lib\\Thing"));
    assert_eq!(lookup(&names, "Other\\Tool"), Some("Other\\Tool"));
    assert_eq!(lookup(&names, "parent"), Some("App\\Service\\Base"));
    assert_eq!(lookup(&names, "self"), Some("App\\Service\\Runner"));
    assert_eq!(lookup(&names, "strlen"), Some("App\\Service\\strlen"));
    assert_eq!(lookup(&names, "LIMIT"), None);
}

#[test]
fn braced_namespaces_get_their_own_scope() {
    let source = r#"<?php
namespace First { class A {} }
namespace Second { class A {} }
namespace { class A {} }
"#;
    let unit = SyntaxStore::default()
        .parse_file(Path::new("multi.php"), source)
        .unwrap();
    let names: Vec<_> = NodeLocator::new()
        .find_class_likes(&unit.arena, unit.root)
        .into_iter()
        .filter_map(|index| unit.arena.resolved_name(index))
        .collect();
    assert_eq!(names, vec!["First\\A", "Second\\A", "A"]);
}

#[test]
fn decoration_is_idempotent() {
    let source = "<?php namespace N; use X\\Y; class C extends Y { function f() { return new Y(); } }";
    let unit = SyntaxStore::default()
        .parse_file(Path::new("c.php"), source)
        .unwrap();
    let once = unit.arena.clone();
    let twice = ScopeDecorator::new().decorate(unit);
    assert_eq!(twice.arena, once);
}

#[test]
fn nodes_know_their_enclosing_declarations() {
    let source = "<?php class C { function f() { return $x; } } function g() { return $y; }";
    let unit = SyntaxStore::default()
        .parse_file(Path::new("c.php"), source)
        .unwrap();
    let variables = NodeLocator::new().find_all_of_kind(&unit.arena, unit.root, &[SyntaxKind::Variable]);
    assert_eq!(variables.len(), 2);

    let in_method = unit.arena.get_metadata(variables[0]).unwrap();
    assert_eq!(unit.arena.kind(in_method.class_like), Some(SyntaxKind::ClassDeclaration));
    assert_eq!(unit.arena.kind(in_method.function), Some(SyntaxKind::MethodDeclaration));
    assert_eq!(in_method.class_name.as_deref(), Some("C"));

    let in_function = unit.arena.get_metadata(variables[1]).unwrap();
    assert!(in_function.class_like.is_none());
    assert_eq!(unit.arena.kind(in_function.function), Some(SyntaxKind::FunctionDeclaration));
    assert_eq!(in_function.class_name, None);
}
