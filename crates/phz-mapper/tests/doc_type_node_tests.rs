use crate::DocTypeNode;

#[test]
fn prints_phpdoc_syntax() {
    let user = DocTypeNode::class("App\\User");
    assert_eq!(user.to_string(), "\\App\\User");

    let list = DocTypeNode::Array(Box::new(DocTypeNode::identifier("string")));
    assert_eq!(list.to_string(), "string[]");

    let map = DocTypeNode::generic(
        "array",
        vec![DocTypeNode::identifier("string"), user.clone()],
    );
    assert_eq!(map.to_string(), "array<string, \\App\\User>");

    let nullable = DocTypeNode::Nullable(Box::new(user));
    assert_eq!(nullable.to_string(), "?\\App\\User");
}

#[test]
fn groups_compound_members() {
    let int_or_string = DocTypeNode::Union(vec![
        DocTypeNode::identifier("int"),
        DocTypeNode::identifier("string"),
    ]);
    assert_eq!(
        DocTypeNode::Array(Box::new(int_or_string)).to_string(),
        "(int|string)[]"
    );

    let both = DocTypeNode::Intersection(vec![
        DocTypeNode::class("Countable"),
        DocTypeNode::class("Traversable"),
    ]);
    let union = DocTypeNode::Union(vec![both, DocTypeNode::identifier("null")]);
    assert_eq!(union.to_string(), "(\\Countable&\\Traversable)|null");
}
