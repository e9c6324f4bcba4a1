use crate::{ClassKind, ClassReflection, FunctionReflection, InMemoryReflectionProvider, ReflectionProvider};
use std::path::PathBuf;

fn provider() -> InMemoryReflectionProvider {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(
        ClassReflection::new("App\\Base", ClassKind::Class)
            .with_file("base.php")
            .with_method("boot", false),
    );
    provider.add_class(
        ClassReflection::new("App\\Loggable", ClassKind::Trait)
            .with_file("loggable.php")
            .with_method("log", false),
    );
    provider.add_class(
        ClassReflection::new("App\\Child", ClassKind::Class)
            .with_file("child.php")
            .with_parent("\\App\\Base")
            .with_trait("App\\Loggable")
            .with_method("run", true),
    );
    provider.add_function(FunctionReflection::new(
        "App\\helper",
        Some(PathBuf::from("functions.php")),
    ));
    provider
}

#[test]
fn lookups_are_case_insensitive_and_ignore_leading_backslash() {
    let provider = provider();
    assert!(provider.has_class("\\app\\child"));
    assert!(provider.get_function("APP\\HELPER").is_some());
    assert!(!provider.has_class("App\\Missing"));
}

#[test]
fn method_lookup_reports_the_declaring_class() {
    let provider = provider();

    let own = provider.get_method("App\\Child", "RUN").unwrap();
    assert_eq!(own.declaring_class.name, "App\\Child");
    assert_eq!(own.name, "run");
    assert!(own.is_static);

    let from_trait = provider.get_method("App\\Child", "log").unwrap();
    assert_eq!(from_trait.declaring_class.name, "App\\Loggable");

    let inherited = provider.get_method("App\\Child", "boot").unwrap();
    assert_eq!(inherited.declaring_class.name, "App\\Base");

    assert!(provider.get_method("App\\Child", "missing").is_none());
}

#[test]
fn cyclic_hierarchies_terminate() {
    let mut provider = InMemoryReflectionProvider::new();
    provider.add_class(ClassReflection::new("A", ClassKind::Class).with_parent("B"));
    provider.add_class(ClassReflection::new("B", ClassKind::Class).with_parent("A"));
    assert!(provider.get_method("A", "anything").is_none());
}

#[test]
fn names_split_into_namespace_and_short_name() {
    let class = ClassReflection::new("\\App\\Http\\Kernel", ClassKind::Class);
    assert_eq!(class.name, "App\\Http\\Kernel");
    assert_eq!(class.short_name(), "Kernel");
    assert_eq!(class.namespace(), Some("App\\Http"));
    assert!(ClassReflection::builtin("Exception").builtin);
}
