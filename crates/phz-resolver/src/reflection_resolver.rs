//! Name-based lookups against the reflection provider.

use phz_types::{ClassReflection, FunctionReflection, MethodReflection, ReflectionProvider};
use std::sync::Arc;
use tracing::trace;

#[derive(Clone)]
pub struct ReflectionResolver {
    provider: Arc<dyn ReflectionProvider>,
}

impl ReflectionResolver {
    pub fn new(provider: Arc<dyn ReflectionProvider>) -> ReflectionResolver {
        ReflectionResolver { provider }
    }

    pub fn provider(&self) -> &dyn ReflectionProvider {
        self.provider.as_ref()
    }

    pub fn resolve_class_reflection(&self, class: &str) -> Option<Arc<ClassReflection>> {
        self.provider.get_class(class)
    }

    /// Method on `class` or one of its ancestors. `None` when the class is
    /// unknown.
    pub fn resolve_method_reflection(&self, class: &str, method: &str) -> Option<MethodReflection> {
        if !self.provider.has_class(class) {
            trace!(class, "class not known to reflection");
            return None;
        }
        self.provider.get_method(class, method)
    }

    /// Function by fully-qualified name. A namespaced name that does not
    /// exist falls back to the global function of the same short name.
    pub fn resolve_function_reflection(&self, name: &str) -> Option<Arc<FunctionReflection>> {
        if let Some(function) = self.provider.get_function(name) {
            return Some(function);
        }
        let (_, short_name) = name.trim_start_matches('\\').rsplit_once('\\')?;
        self.provider.get_function(short_name)
    }
}
