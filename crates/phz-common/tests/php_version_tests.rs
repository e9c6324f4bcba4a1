use crate::{PhpVersion, PhpVersionFeature};

#[test]
fn parses_dotted_and_numeric_forms() {
    assert_eq!("7.4".parse::<PhpVersion>(), Ok(PhpVersion::PHP_74));
    assert_eq!("8.1.12".parse::<PhpVersion>(), Ok(PhpVersion::PHP_81));
    assert_eq!("80000".parse::<PhpVersion>(), Ok(PhpVersion::PHP_80));
    assert_eq!("80123".parse::<PhpVersion>(), Ok(PhpVersion::PHP_81));
}

#[test]
fn rejects_garbage_versions() {
    assert!("".parse::<PhpVersion>().is_err());
    assert!("eight".parse::<PhpVersion>().is_err());
    assert!("8".parse::<PhpVersion>().is_err());
    assert!("12.0".parse::<PhpVersion>().is_err());
}

#[test]
fn displays_major_minor() {
    assert_eq!(PhpVersion::PHP_73.to_string(), "7.3");
    assert_eq!(PhpVersion::new(8, 2).to_string(), "8.2");
}

#[test]
fn feature_gates_follow_release_history() {
    assert!(!PhpVersion::PHP_70.supports(PhpVersionFeature::NullableType));
    assert!(PhpVersion::PHP_71.supports(PhpVersionFeature::NullableType));
    assert!(!PhpVersion::PHP_74.supports(PhpVersionFeature::UnionTypes));
    assert!(PhpVersion::PHP_80.supports(PhpVersionFeature::UnionTypes));
    assert!(!PhpVersion::PHP_80.supports(PhpVersionFeature::IntersectionTypes));
    assert!(PhpVersion::PHP_81.supports(PhpVersionFeature::NeverType));
    assert!(PhpVersion::LATEST.supports(PhpVersionFeature::TypedProperties));
}
