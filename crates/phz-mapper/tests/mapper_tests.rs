use phz_common::PhpVersion;
use phz_mapper::mappers::{
    FloatTypeMapper, IntegerTypeMapper, ObjectTypeMapper, SelfReferenceTypeMapper,
    UnionTypeMapper,
};
use phz_mapper::{TypeContext, TypeKind, TypeMapperError, TypeMapperRegistry};
use phz_parser::{NameData, NameScope, TypeNode};
use phz_types::{SemanticType, TypeShape};

fn doc(registry: &TypeMapperRegistry, ty: &SemanticType) -> String {
    registry
        .to_doc_type_node(ty, TypeKind::Any)
        .expect("doc type")
        .to_string()
}

fn syntax(version: PhpVersion, ty: &SemanticType, kind: TypeKind) -> Option<String> {
    TypeMapperRegistry::with_default_mappers(version)
        .to_syntax_type_node(ty, kind)
        .expect("syntax type")
        .map(|node| node.to_string())
}

#[test]
fn specific_mapper_registered_first_wins() {
    let self_ref = SemanticType::SelfReference("App\\Node".to_string());

    let specific_first = TypeMapperRegistry::new(PhpVersion::LATEST)
        .add_mapper(SelfReferenceTypeMapper)
        .add_mapper(ObjectTypeMapper);
    assert_eq!(doc(&specific_first, &self_ref), "self");
    assert_eq!(
        doc(&specific_first, &SemanticType::object("App\\Node")),
        "\\App\\Node"
    );

    let generic_first = TypeMapperRegistry::new(PhpVersion::LATEST)
        .add_mapper(ObjectTypeMapper)
        .add_mapper(SelfReferenceTypeMapper);
    assert_eq!(doc(&generic_first, &self_ref), "\\App\\Node");
}

#[test]
fn unsupported_shape_is_an_error() {
    let registry = TypeMapperRegistry::new(PhpVersion::LATEST).add_mapper(IntegerTypeMapper);

    let err = registry
        .to_doc_type_node(&SemanticType::Resource, TypeKind::Param)
        .unwrap_err();
    assert_eq!(
        err,
        TypeMapperError::UnsupportedTypeShape {
            shape: TypeShape::Resource,
            kind: TypeKind::Param,
        }
    );
    assert!(err.to_string().contains("resource"));

    let err = registry
        .to_syntax_type_node(&SemanticType::Resource, TypeKind::Return)
        .unwrap_err();
    assert!(matches!(
        err,
        TypeMapperError::UnsupportedTypeShape {
            shape: TypeShape::Resource,
            ..
        }
    ));
}

#[test]
fn unsupported_union_member_is_an_error() {
    let registry = TypeMapperRegistry::new(PhpVersion::LATEST)
        .add_mapper(UnionTypeMapper)
        .add_mapper(IntegerTypeMapper);
    let ty = SemanticType::union([SemanticType::Integer, SemanticType::Float]);

    let err = registry.to_doc_type_node(&ty, TypeKind::Any).unwrap_err();
    assert!(matches!(
        err,
        TypeMapperError::UnsupportedTypeShape {
            shape: TypeShape::Float,
            ..
        }
    ));

    let registry = registry.add_mapper(FloatTypeMapper);
    assert_eq!(doc(&registry, &ty), "int|float");
}

#[test]
fn default_mappers_doc_forms() {
    let registry = TypeMapperRegistry::with_default_mappers(PhpVersion::LATEST);
    let user = SemanticType::object("App\\User");

    assert_eq!(doc(&registry, &SemanticType::mixed_array()), "array");
    assert_eq!(
        doc(
            &registry,
            &SemanticType::array(SemanticType::Integer, SemanticType::String)
        ),
        "string[]"
    );
    assert_eq!(
        doc(
            &registry,
            &SemanticType::array(SemanticType::String, SemanticType::Integer)
        ),
        "array<string, int>"
    );
    assert_eq!(
        doc(
            &registry,
            &SemanticType::ClassString(Some("App\\User".to_string()))
        ),
        "class-string<\\App\\User>"
    );
    assert_eq!(
        doc(
            &registry,
            &SemanticType::GenericObject {
                class: "Doctrine\\Collection".to_string(),
                args: vec![user.clone()],
            }
        ),
        "\\Doctrine\\Collection<\\App\\User>"
    );
    assert_eq!(doc(&registry, &SemanticType::nullable(user.clone())), "?\\App\\User");
    assert_eq!(
        doc(
            &registry,
            &SemanticType::nullable(SemanticType::union([
                SemanticType::Integer,
                SemanticType::String
            ]))
        ),
        "int|string|null"
    );
    assert_eq!(
        doc(
            &registry,
            &SemanticType::StaticReference("App\\User".to_string())
        ),
        "static"
    );
    assert_eq!(doc(&registry, &SemanticType::Resource), "resource");
}

#[test]
fn nullable_and_union_syntax_follow_target_version() {
    let user = SemanticType::nullable(SemanticType::object("App\\User"));
    assert_eq!(syntax(PhpVersion::PHP_70, &user, TypeKind::Param), None);
    assert_eq!(
        syntax(PhpVersion::PHP_71, &user, TypeKind::Param).as_deref(),
        Some("?\\App\\User")
    );

    let int_or_null = SemanticType::union([SemanticType::Integer, SemanticType::Null]);
    assert_eq!(
        syntax(PhpVersion::PHP_71, &int_or_null, TypeKind::Return).as_deref(),
        Some("?int")
    );

    let int_or_string = SemanticType::union([SemanticType::Integer, SemanticType::String]);
    assert_eq!(syntax(PhpVersion::PHP_74, &int_or_string, TypeKind::Param), None);
    assert_eq!(
        syntax(PhpVersion::PHP_80, &int_or_string, TypeKind::Param).as_deref(),
        Some("int|string")
    );

    let nullable_mixed = SemanticType::union([SemanticType::Mixed, SemanticType::Null]);
    assert_eq!(
        syntax(PhpVersion::PHP_80, &nullable_mixed, TypeKind::Param).as_deref(),
        Some("mixed")
    );
}

#[test]
fn position_restricted_types() {
    assert_eq!(syntax(PhpVersion::LATEST, &SemanticType::Void, TypeKind::Param), None);
    assert_eq!(
        syntax(PhpVersion::LATEST, &SemanticType::Void, TypeKind::Return).as_deref(),
        Some("void")
    );
    assert_eq!(
        syntax(PhpVersion::LATEST, &SemanticType::Callable, TypeKind::Property),
        None
    );
    assert_eq!(syntax(PhpVersion::LATEST, &SemanticType::Null, TypeKind::Param), None);
    assert_eq!(syntax(PhpVersion::LATEST, &SemanticType::Resource, TypeKind::Param), None);

    let static_ref = SemanticType::StaticReference("App\\User".to_string());
    assert_eq!(
        syntax(PhpVersion::PHP_80, &static_ref, TypeKind::Return).as_deref(),
        Some("static")
    );
    assert_eq!(syntax(PhpVersion::PHP_74, &static_ref, TypeKind::Return), None);
    assert_eq!(syntax(PhpVersion::PHP_80, &static_ref, TypeKind::Param), None);
}

#[test]
fn typed_properties_need_php_74() {
    assert_eq!(
        syntax(PhpVersion::PHP_73, &SemanticType::Integer, TypeKind::Property),
        None
    );
    assert_eq!(
        syntax(PhpVersion::PHP_74, &SemanticType::Integer, TypeKind::Property).as_deref(),
        Some("int")
    );
}

#[test]
fn intersections_need_php_81_and_class_members() {
    let both = SemanticType::Intersection(vec![
        SemanticType::object("Countable"),
        SemanticType::object("Traversable"),
    ]);
    assert_eq!(syntax(PhpVersion::PHP_80, &both, TypeKind::Param), None);
    assert_eq!(
        syntax(PhpVersion::PHP_81, &both, TypeKind::Param).as_deref(),
        Some("\\Countable&\\Traversable")
    );

    let with_scalar = SemanticType::Intersection(vec![
        SemanticType::object("Countable"),
        SemanticType::Integer,
    ]);
    assert_eq!(syntax(PhpVersion::LATEST, &with_scalar, TypeKind::Param), None);
}

#[test]
fn annotations_map_back_to_semantic_types() {
    let registry = TypeMapperRegistry::with_default_mappers(PhpVersion::LATEST);
    let mut scope = NameScope {
        namespace: Some("App".to_string()),
        ..NameScope::default()
    };
    scope
        .class_imports
        .insert("carbon".to_string(), "Carbon\\Carbon".to_string());
    let context = TypeContext::new(&scope).in_class(Some("App\\Node"), Some("App\\Base"));

    let nullable_local = TypeNode::nullable(TypeNode::Name(NameData::new("Tree")));
    assert_eq!(
        registry.to_semantic_type(&nullable_local, &context),
        SemanticType::nullable(SemanticType::object("App\\Tree"))
    );

    let imported_or_null = TypeNode::Union(vec![
        TypeNode::Name(NameData::new("Carbon")),
        TypeNode::identifier("null"),
    ]);
    assert_eq!(
        registry.to_semantic_type(&imported_or_null, &context),
        SemanticType::Union(vec![
            SemanticType::object("Carbon\\Carbon"),
            SemanticType::Null
        ])
    );

    assert_eq!(
        registry.to_semantic_type(&TypeNode::identifier("self"), &context),
        SemanticType::SelfReference("App\\Node".to_string())
    );
    assert_eq!(
        registry.to_semantic_type(&TypeNode::identifier("parent"), &context),
        SemanticType::ParentReference("App\\Base".to_string())
    );
    assert_eq!(
        registry.to_semantic_type(&TypeNode::identifier("int"), &context),
        SemanticType::Integer
    );

    let outside_class = TypeContext::new(&scope);
    assert_eq!(
        registry.to_semantic_type(&TypeNode::identifier("static"), &outside_class),
        SemanticType::Mixed
    );
}

#[test]
fn null_only_union_has_no_annotation() {
    let null_only = SemanticType::Union(vec![SemanticType::Null]);
    assert_eq!(syntax(PhpVersion::LATEST, &null_only, TypeKind::Param), None);
    assert_eq!(syntax(PhpVersion::LATEST, &null_only, TypeKind::Return), None);
}
