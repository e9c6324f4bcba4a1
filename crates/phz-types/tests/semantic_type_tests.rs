use crate::{SemanticType, TypeShape};

#[test]
fn reference_shapes_are_object_sub_shapes() {
    assert!(TypeShape::SelfReference.is_a(TypeShape::Object));
    assert!(TypeShape::StaticReference.is_a(TypeShape::Object));
    assert!(TypeShape::ParentReference.is_a(TypeShape::Object));
    assert!(TypeShape::GenericObject.is_a(TypeShape::Object));
    assert!(TypeShape::ClassString.is_a(TypeShape::String));
    assert!(TypeShape::Object.is_a(TypeShape::Object));
    assert!(!TypeShape::Object.is_a(TypeShape::SelfReference));
    assert!(!TypeShape::ObjectWithoutClass.is_a(TypeShape::Object));
}

#[test]
fn union_flattens_and_deduplicates() {
    let ty = SemanticType::union([
        SemanticType::Integer,
        SemanticType::union([SemanticType::String, SemanticType::Integer]),
        SemanticType::nullable(SemanticType::Float),
    ]);
    assert_eq!(
        ty,
        SemanticType::Union(vec![
            SemanticType::Integer,
            SemanticType::String,
            SemanticType::Float,
            SemanticType::Null,
        ])
    );
    assert_eq!(
        SemanticType::union([SemanticType::Integer, SemanticType::Integer]),
        SemanticType::Integer
    );
}

#[test]
fn nullability_helpers() {
    let ty = SemanticType::union([SemanticType::object("\\App\\User"), SemanticType::Null]);
    assert!(ty.is_nullable());
    assert_eq!(ty.without_null(), Some(SemanticType::object("App\\User")));
    assert_eq!(SemanticType::Null.without_null(), None);
    assert_eq!(
        SemanticType::nullable(SemanticType::Mixed),
        SemanticType::Mixed
    );
}

#[test]
fn class_name_of_object_like_types() {
    assert_eq!(SemanticType::object("A").class_name(), Some("A"));
    assert_eq!(
        SemanticType::StaticReference("B".to_string()).class_name(),
        Some("B")
    );
    assert_eq!(SemanticType::Integer.class_name(), None);
}

#[test]
fn describes_types() {
    let ty = SemanticType::union([
        SemanticType::array(SemanticType::String, SemanticType::Integer),
        SemanticType::Intersection(vec![SemanticType::object("A"), SemanticType::object("B")]),
        SemanticType::Null,
    ]);
    assert_eq!(ty.to_string(), "array<string, int>|(A&B)|null");
    assert_eq!(SemanticType::mixed_array().to_string(), "array");
    assert_eq!(
        SemanticType::GenericObject {
            class: "Collection".to_string(),
            args: vec![SemanticType::object("User")],
        }
        .to_string(),
        "Collection<User>"
    );
    assert_eq!(
        SemanticType::nullable(SemanticType::Integer).to_string(),
        "?int"
    );
}
