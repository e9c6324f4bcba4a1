//! Human-readable descriptions of semantic types.
//!
//! The output uses phpdoc-like spelling and is meant for logs and CLI
//! output. Producing real doc-comment or annotation syntax is the job of the
//! type mappers.

use crate::semantic_type::SemanticType;
use std::fmt;

impl fmt::Display for SemanticType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticType::Mixed => f.write_str("mixed"),
            SemanticType::Void => f.write_str("void"),
            SemanticType::Never => f.write_str("never"),
            SemanticType::Null => f.write_str("null"),
            SemanticType::Boolean => f.write_str("bool"),
            SemanticType::Integer => f.write_str("int"),
            SemanticType::Float => f.write_str("float"),
            SemanticType::String => f.write_str("string"),
            SemanticType::ClassString(None) => f.write_str("class-string"),
            SemanticType::ClassString(Some(class)) => write!(f, "class-string<{class}>"),
            SemanticType::Callable => f.write_str("callable"),
            SemanticType::Iterable(item) => {
                if **item == SemanticType::Mixed {
                    f.write_str("iterable")
                } else {
                    write!(f, "iterable<{item}>")
                }
            }
            SemanticType::Array { key, item } => print_array(f, key, item),
            SemanticType::Resource => f.write_str("resource"),
            SemanticType::ObjectWithoutClass => f.write_str("object"),
            SemanticType::Object(class) => f.write_str(class),
            SemanticType::SelfReference(class) => write!(f, "self({class})"),
            SemanticType::StaticReference(class) => write!(f, "static({class})"),
            SemanticType::ParentReference(class) => write!(f, "parent({class})"),
            SemanticType::GenericObject { class, args } => {
                write!(f, "{class}<")?;
                print_list(f, args, ", ")?;
                f.write_str(">")
            }
            SemanticType::Union(members) => print_list(f, members, "|"),
            SemanticType::Nullable(inner) => match **inner {
                SemanticType::Union(_) | SemanticType::Intersection(_) => {
                    write!(f, "{inner}|null")
                }
                _ => write!(f, "?{inner}"),
            },
            SemanticType::Intersection(members) => print_list(f, members, "&"),
        }
    }
}

fn print_array(f: &mut fmt::Formatter<'_>, key: &SemanticType, item: &SemanticType) -> fmt::Result {
    match (key, item) {
        (SemanticType::Mixed, SemanticType::Mixed) => f.write_str("array"),
        (SemanticType::Mixed, item) | (SemanticType::Integer, item) => write!(f, "array<{item}>"),
        (key, item) => write!(f, "array<{key}, {item}>"),
    }
}

fn print_list(f: &mut fmt::Formatter<'_>, types: &[SemanticType], separator: &str) -> fmt::Result {
    for (i, ty) in types.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        let needs_parens = separator == "|" && matches!(ty, SemanticType::Intersection(_));
        if needs_parens {
            write!(f, "({ty})")?;
        } else {
            write!(f, "{ty}")?;
        }
    }
    Ok(())
}
