//! Target PHP language level.
//!
//! Type-annotation syntax grew over several PHP releases. Mappers consult the
//! configured target version before producing a syntax node, and decline when
//! the construct is not available yet.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// PHP version encoded as `major * 10000 + minor * 100`, e.g. `80100` for 8.1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct PhpVersion(u32);

impl PhpVersion {
    pub const PHP_70: PhpVersion = PhpVersion(70000);
    pub const PHP_71: PhpVersion = PhpVersion(70100);
    pub const PHP_72: PhpVersion = PhpVersion(70200);
    pub const PHP_73: PhpVersion = PhpVersion(70300);
    pub const PHP_74: PhpVersion = PhpVersion(70400);
    pub const PHP_80: PhpVersion = PhpVersion(80000);
    pub const PHP_81: PhpVersion = PhpVersion(80100);
    pub const PHP_82: PhpVersion = PhpVersion(80200);
    pub const PHP_83: PhpVersion = PhpVersion(80300);

    /// Newest version the mappers know about.
    pub const LATEST: PhpVersion = PhpVersion::PHP_83;

    pub const fn new(major: u32, minor: u32) -> PhpVersion {
        PhpVersion(major * 10000 + minor * 100)
    }

    pub const fn id(self) -> u32 {
        self.0
    }

    pub const fn major(self) -> u32 {
        self.0 / 10000
    }

    pub const fn minor(self) -> u32 {
        (self.0 % 10000) / 100
    }

    /// Whether code targeting this version may use `feature`.
    #[inline]
    pub fn supports(self, feature: PhpVersionFeature) -> bool {
        self >= feature.min_version()
    }
}

impl Default for PhpVersion {
    fn default() -> Self {
        PhpVersion::LATEST
    }
}

impl fmt::Display for PhpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major(), self.minor())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid PHP version '{0}', expected a value like \"7.4\" or \"80100\"")]
pub struct InvalidPhpVersion(pub String);

impl FromStr for PhpVersion {
    type Err = InvalidPhpVersion;

    /// Accepts `"8.1"`, `"8.1.12"` (patch ignored) and the numeric id form `"80100"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = || InvalidPhpVersion(s.to_string());

        if !trimmed.contains('.') {
            let id: u32 = trimmed.parse().map_err(|_| invalid())?;
            if !(50000..=99999).contains(&id) {
                return Err(invalid());
            }
            return Ok(PhpVersion(id - id % 100));
        }

        let mut parts = trimmed.split('.');
        let major: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        let minor: u32 = parts
            .next()
            .and_then(|p| p.parse().ok())
            .ok_or_else(invalid)?;
        if !(5..=9).contains(&major) || minor > 99 {
            return Err(invalid());
        }
        Ok(PhpVersion::new(major, minor))
    }
}

/// Type-system syntax features gated on the target version.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhpVersionFeature {
    ScalarTypes,
    NullableType,
    VoidType,
    IterableType,
    ObjectType,
    TypedProperties,
    UnionTypes,
    MixedType,
    StaticReturnType,
    IntersectionTypes,
    NeverType,
    NullFalseStandalone,
}

impl PhpVersionFeature {
    pub const fn min_version(self) -> PhpVersion {
        match self {
            PhpVersionFeature::ScalarTypes => PhpVersion::PHP_70,
            PhpVersionFeature::NullableType
            | PhpVersionFeature::VoidType
            | PhpVersionFeature::IterableType => PhpVersion::PHP_71,
            PhpVersionFeature::ObjectType => PhpVersion::PHP_72,
            PhpVersionFeature::TypedProperties => PhpVersion::PHP_74,
            PhpVersionFeature::UnionTypes
            | PhpVersionFeature::MixedType
            | PhpVersionFeature::StaticReturnType => PhpVersion::PHP_80,
            PhpVersionFeature::IntersectionTypes | PhpVersionFeature::NeverType => {
                PhpVersion::PHP_81
            }
            PhpVersionFeature::NullFalseStandalone => PhpVersion::PHP_82,
        }
    }
}
