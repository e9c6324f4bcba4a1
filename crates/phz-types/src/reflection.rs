//! Reflection handles and the provider contract.
//!
//! Reflection describes symbols as the analysis layer knows them: names,
//! hierarchy and the file that defines them. Handles are produced by a
//! `ReflectionProvider` and never built by the resolver itself.

use phz_common::limits::MAX_INHERITANCE_DEPTH;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum ClassKind {
    Class,
    Interface,
    Trait,
    Enum,
}

/// A method as declared on a class-like.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DeclaredMethod {
    pub name: String,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ClassReflection {
    /// Fully-qualified name without a leading backslash.
    pub name: String,
    /// Defining file; `None` for native (built-in or extension) classes.
    pub file_name: Option<PathBuf>,
    pub builtin: bool,
    pub kind: ClassKind,
    pub parent: Option<String>,
    pub interfaces: Vec<String>,
    pub traits: Vec<String>,
    pub methods: Vec<DeclaredMethod>,
}

impl ClassReflection {
    pub fn new(name: &str, kind: ClassKind) -> ClassReflection {
        ClassReflection {
            name: normalize_name(name),
            file_name: None,
            builtin: false,
            kind,
            parent: None,
            interfaces: Vec::new(),
            traits: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// A native class with no source file.
    pub fn builtin(name: &str) -> ClassReflection {
        ClassReflection {
            builtin: true,
            ..ClassReflection::new(name, ClassKind::Class)
        }
    }

    pub fn with_file(mut self, file_name: impl Into<PathBuf>) -> ClassReflection {
        self.file_name = Some(file_name.into());
        self
    }

    pub fn with_parent(mut self, parent: &str) -> ClassReflection {
        self.parent = Some(normalize_name(parent));
        self
    }

    pub fn with_interface(mut self, interface: &str) -> ClassReflection {
        self.interfaces.push(normalize_name(interface));
        self
    }

    pub fn with_trait(mut self, name: &str) -> ClassReflection {
        self.traits.push(normalize_name(name));
        self
    }

    pub fn with_method(mut self, name: &str, is_static: bool) -> ClassReflection {
        self.methods.push(DeclaredMethod {
            name: name.to_string(),
            is_static,
        });
        self
    }

    /// Short name: the last namespace segment.
    pub fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }

    /// Namespace part of the name, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.name.rsplit_once('\\').map(|(namespace, _)| namespace)
    }

    /// Declared (not inherited) method, case-insensitive.
    pub fn declared_method(&self, name: &str) -> Option<&DeclaredMethod> {
        self.methods
            .iter()
            .find(|method| method.name.eq_ignore_ascii_case(name))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.trim_start_matches('\\'))
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MethodReflection {
    pub name: String,
    /// The class-like whose body contains the method.
    pub declaring_class: Arc<ClassReflection>,
    pub is_static: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FunctionReflection {
    pub name: String,
    pub file_name: Option<PathBuf>,
    pub builtin: bool,
}

impl FunctionReflection {
    pub fn new(name: &str, file_name: Option<PathBuf>) -> FunctionReflection {
        FunctionReflection {
            name: normalize_name(name),
            builtin: file_name.is_none(),
            file_name,
        }
    }
}

/// Source of reflection data. Lookups are by fully-qualified name and are
/// case-insensitive.
pub trait ReflectionProvider: Send + Sync {
    fn get_class(&self, name: &str) -> Option<Arc<ClassReflection>>;

    fn get_function(&self, name: &str) -> Option<Arc<FunctionReflection>>;

    fn has_class(&self, name: &str) -> bool {
        self.get_class(name).is_some()
    }

    /// Find `method` on `class`, searching the class, its traits and then
    /// its ancestors. The returned handle names the declaring class-like.
    fn get_method(&self, class: &str, method: &str) -> Option<MethodReflection> {
        find_declaring_method(self, class, method)
    }
}

/// Hierarchy walk behind `ReflectionProvider::get_method`.
pub fn find_declaring_method<P: ReflectionProvider + ?Sized>(
    provider: &P,
    class: &str,
    method: &str,
) -> Option<MethodReflection> {
    let mut visited: FxHashSet<String> = FxHashSet::default();
    let mut pending = vec![normalize_name(class)];
    while let Some(name) = pending.pop() {
        if visited.len() >= MAX_INHERITANCE_DEPTH {
            tracing::debug!(class, method, "inheritance walk limit reached");
            return None;
        }
        if !visited.insert(name.to_ascii_lowercase()) {
            continue;
        }
        let Some(reflection) = provider.get_class(&name) else {
            continue;
        };
        if let Some(declared) = reflection.declared_method(method) {
            return Some(MethodReflection {
                name: declared.name.clone(),
                is_static: declared.is_static,
                declaring_class: reflection,
            });
        }
        // Stack order: traits first, then the parent chain, interfaces last.
        for interface in reflection.interfaces.iter().rev() {
            pending.push(interface.clone());
        }
        if let Some(parent) = &reflection.parent {
            pending.push(parent.clone());
        }
        for name in reflection.traits.iter().rev() {
            pending.push(name.clone());
        }
    }
    None
}

/// Strip a leading backslash.
pub fn normalize_name(name: &str) -> String {
    name.trim_start_matches('\\').to_string()
}

/// Map-backed provider, filled by hand.
#[derive(Clone, Debug, Default)]
pub struct InMemoryReflectionProvider {
    classes: FxHashMap<String, Arc<ClassReflection>>,
    functions: FxHashMap<String, Arc<FunctionReflection>>,
}

impl InMemoryReflectionProvider {
    pub fn new() -> InMemoryReflectionProvider {
        InMemoryReflectionProvider::default()
    }

    pub fn add_class(&mut self, class: ClassReflection) -> Arc<ClassReflection> {
        let class = Arc::new(class);
        self.classes
            .insert(class.name.to_ascii_lowercase(), Arc::clone(&class));
        class
    }

    pub fn add_function(&mut self, function: FunctionReflection) -> Arc<FunctionReflection> {
        let function = Arc::new(function);
        self.functions
            .insert(function.name.to_ascii_lowercase(), Arc::clone(&function));
        function
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    /// All classes, in no particular order.
    pub fn classes(&self) -> impl Iterator<Item = &Arc<ClassReflection>> {
        self.classes.values()
    }
}

impl ReflectionProvider for InMemoryReflectionProvider {
    fn get_class(&self, name: &str) -> Option<Arc<ClassReflection>> {
        self.classes
            .get(&normalize_name(name).to_ascii_lowercase())
            .cloned()
    }

    fn get_function(&self, name: &str) -> Option<Arc<FunctionReflection>> {
        self.functions
            .get(&normalize_name(name).to_ascii_lowercase())
            .cloned()
    }
}
