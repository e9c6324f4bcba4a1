//! Reflection handle to declaration syntax, with memoization.
//!
//! Resolving a declaration means reading its file, parsing and decorating
//! it, and finding the declaration node. Results are cached per symbol,
//! including failures, so each symbol costs at most one read and parse per
//! run. A cache entry is only written once its value is fully computed.

use crate::cache::{CacheEntry, MissReason, ResolutionCache, ResolutionStats, SymbolKey};
use crate::file_system::FileReader;
use crate::node_type_resolver::{LocalNodeTypeResolver, NodeTypeResolver};
use crate::reflection_resolver::ReflectionResolver;
use crate::resolved_node::{ResolvedDeclaration, ResolvedNode};
use phz_parser::{NodeArena, NodeIndex, NodeLocator, SourceUnit, SyntaxStore};
use phz_scanner::SyntaxKind;
use phz_types::{ClassReflection, FunctionReflection, MethodReflection, ReflectionProvider, SemanticType};
use rustc_hash::FxHashMap;
use std::hash::Hash;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, debug_span, trace};

pub struct AstResolver {
    file_reader: Arc<dyn FileReader>,
    reflection: ReflectionResolver,
    syntax_store: SyntaxStore,
    node_type_resolver: Arc<dyn NodeTypeResolver>,
    locator: NodeLocator,
    cache: ResolutionCache,
    stats: ResolutionStats,
}

impl AstResolver {
    pub fn new(provider: Arc<dyn ReflectionProvider>, file_reader: Arc<dyn FileReader>) -> AstResolver {
        AstResolver {
            file_reader,
            reflection: ReflectionResolver::new(provider),
            syntax_store: SyntaxStore::default(),
            node_type_resolver: Arc::new(LocalNodeTypeResolver::default()),
            locator: NodeLocator::new(),
            cache: ResolutionCache::new(),
            stats: ResolutionStats::default(),
        }
    }

    pub fn with_syntax_store(mut self, syntax_store: SyntaxStore) -> AstResolver {
        self.syntax_store = syntax_store;
        self
    }

    pub fn with_node_type_resolver(mut self, resolver: Arc<dyn NodeTypeResolver>) -> AstResolver {
        self.node_type_resolver = resolver;
        self
    }

    pub fn reflection(&self) -> &ReflectionResolver {
        &self.reflection
    }

    pub fn stats(&self) -> ResolutionStats {
        self.stats
    }

    pub fn cache(&self) -> &ResolutionCache {
        &self.cache
    }

    /// Forget every cached result and zero the counters.
    pub fn reset(&mut self) {
        self.cache.clear();
        self.stats = ResolutionStats::default();
    }

    /// Declaration of `method` as seen from `class`; inherited methods
    /// resolve to the declaring class-like's body.
    pub fn resolve_class_method(&mut self, class: &str, method: &str) -> Option<ResolvedNode> {
        let _span = debug_span!("resolve_class_method", class, method).entered();
        let Some(reflection) = self.reflection.resolve_method_reflection(class, method) else {
            debug!(class, method, "no method reflection");
            return None;
        };
        self.resolve_class_method_from_reflection(&reflection)
    }

    pub fn resolve_class_method_from_reflection(
        &mut self,
        method: &MethodReflection,
    ) -> Option<ResolvedNode> {
        let class = &method.declaring_class;
        let key = ResolutionCache::method_key(
            SymbolKey::new(&class.name, class.file_name.as_deref()),
            &method.name,
        );
        if let Some(entry) = self.cache.methods.get(&key) {
            return cache_hit(&mut self.stats, entry);
        }

        self.stats.cache_misses += 1;
        let result = self.load_method(class, &method.name);
        if let Err(reason) = &result {
            debug!(class = %class.name, method = %method.name, %reason, "method declaration not resolved");
        }
        remember(&mut self.cache.methods, key, result)
    }

    pub fn resolve_function_from_reflection(
        &mut self,
        function: &FunctionReflection,
    ) -> Option<ResolvedNode> {
        let _span = debug_span!("resolve_function", function = %function.name).entered();
        let key = SymbolKey::new(&function.name, function.file_name.as_deref());
        if let Some(entry) = self.cache.functions.get(&key) {
            return cache_hit(&mut self.stats, entry);
        }

        self.stats.cache_misses += 1;
        let result = self.load_function(function);
        if let Err(reason) = &result {
            debug!(function = %function.name, %reason, "function declaration not resolved");
        }
        remember(&mut self.cache.functions, key, result)
    }

    /// Declaration of `class`. `requested_name` must name the same class as
    /// the reflection. Native classes have no declaration and are not cached.
    pub fn resolve_class_from_reflection(
        &mut self,
        class: &ClassReflection,
        requested_name: &str,
    ) -> Option<ResolvedNode> {
        let _span = debug_span!("resolve_class", class = %class.name).entered();
        if class.builtin {
            trace!("native class");
            return None;
        }
        if !class.is_named(requested_name) {
            debug!(requested_name, "requested name does not match the reflection");
            return None;
        }
        let key = SymbolKey::new(&class.name, class.file_name.as_deref());
        if let Some(entry) = self.cache.classes.get(&key) {
            return cache_hit(&mut self.stats, entry);
        }

        self.stats.cache_misses += 1;
        let result = self.load_class(class);
        if let Err(reason) = &result {
            debug!(%reason, "class declaration not resolved");
        }
        remember(&mut self.cache.classes, key, result)
    }

    pub fn resolve_class_from_name(&mut self, name: &str) -> Option<ResolvedNode> {
        let Some(class) = self.reflection.resolve_class_reflection(name) else {
            debug!(name, "no class reflection");
            return None;
        };
        self.resolve_class_from_reflection(&class, name)
    }

    /// Class declaration behind an object type. `null` is ignored, so
    /// `?Foo` resolves like `Foo`.
    pub fn resolve_class_from_object_type(&mut self, ty: &SemanticType) -> Option<ResolvedNode> {
        let ty = ty.without_null()?;
        let Some(class) = ty.class_name() else {
            trace!(%ty, "type carries no class name");
            return None;
        };
        self.resolve_class_from_name(class)
    }

    /// Method declaration called by a method call (`$a->run()`) or static
    /// call (`A::run()`). The callee needs a known class and a plain method
    /// name.
    pub fn resolve_class_method_from_call(
        &mut self,
        arena: &NodeArena,
        call: NodeIndex,
    ) -> Option<ResolvedNode> {
        let node = arena.get(call)?;
        if !matches!(node.kind, SyntaxKind::MethodCall | SyntaxKind::StaticCall) {
            return None;
        }
        let data = arena.get_call(node)?;
        let Some(method) = arena.identifier_text(data.name) else {
            debug!(call = call.0, "dynamic method name");
            return None;
        };
        let receiver = self.node_type_resolver.resolve(arena, data.target);
        let class = receiver
            .without_null()
            .and_then(|ty| ty.class_name().map(str::to_string));
        let Some(class) = class else {
            debug!(method, receiver = %receiver, "receiver type has no class");
            return None;
        };
        self.resolve_class_method(&class, method)
    }

    /// Like `resolve_class_method_from_call`, for instance calls only.
    pub fn resolve_class_method_from_method_call(
        &mut self,
        arena: &NodeArena,
        call: NodeIndex,
    ) -> Option<ResolvedNode> {
        if arena.kind(call) != Some(SyntaxKind::MethodCall) {
            return None;
        }
        self.resolve_class_method_from_call(arena, call)
    }

    fn load_method(&mut self, class: &ClassReflection, method: &str) -> Result<ResolvedNode, MissReason> {
        let unit = self.load_unit(class.file_name.as_deref())?;
        let class_like = self
            .locate_class_like(&unit, class)
            .ok_or(MissReason::DeclarationNotFound)?;
        let method = unit
            .arena
            .find_method(class_like, method)
            .ok_or(MissReason::MethodNotDeclared)?;
        ResolvedDeclaration::extract(&unit, method).ok_or(MissReason::DeclarationNotFound)
    }

    fn load_function(&mut self, function: &FunctionReflection) -> Result<ResolvedNode, MissReason> {
        let unit = self.load_unit(function.file_name.as_deref())?;
        let declarations = self.locator.find_all_of_kind(
            &unit.arena,
            unit.root,
            &[SyntaxKind::FunctionDeclaration],
        );
        let declaration = declarations
            .into_iter()
            .find(|&index| {
                unit.arena
                    .resolved_name(index)
                    .is_some_and(|name| name.eq_ignore_ascii_case(&function.name))
            })
            .ok_or(MissReason::DeclarationNotFound)?;
        ResolvedDeclaration::extract(&unit, declaration).ok_or(MissReason::DeclarationNotFound)
    }

    fn load_class(&mut self, class: &ClassReflection) -> Result<ResolvedNode, MissReason> {
        let unit = self.load_unit(class.file_name.as_deref())?;
        let declaration = self
            .locator
            .find_class_likes(&unit.arena, unit.root)
            .into_iter()
            .find(|&index| {
                unit.arena
                    .resolved_name(index)
                    .is_some_and(|name| class.is_named(name))
            })
            .ok_or(MissReason::DeclarationNotFound)?;
        ResolvedDeclaration::extract(&unit, declaration).ok_or(MissReason::DeclarationNotFound)
    }

    /// The class-like named like `class`. A file with a single class-like
    /// declaration yields that one even if the names differ.
    fn locate_class_like(&self, unit: &SourceUnit, class: &ClassReflection) -> Option<NodeIndex> {
        let class_likes = self.locator.find_class_likes(&unit.arena, unit.root);
        let named = class_likes.iter().copied().find(|&index| {
            unit.arena
                .resolved_name(index)
                .is_some_and(|name| class.is_named(name))
        });
        match (named, class_likes.as_slice()) {
            (Some(index), _) => Some(index),
            (None, [only]) => {
                debug!(class = %class.name, "no class-like matches by name, using the only one in the file");
                Some(*only)
            }
            (None, _) => None,
        }
    }

    fn load_unit(&mut self, path: Option<&Path>) -> Result<SourceUnit, MissReason> {
        let path = path.ok_or(MissReason::NativeSymbol)?;
        self.stats.files_read += 1;
        let text = self.file_reader.read_file(path).map_err(|err| {
            debug!(path = %path.display(), error = %err, "cannot read source file");
            MissReason::UnreadableFile
        })?;
        debug!(path = %path.display(), bytes = text.len(), "parsing source file");
        self.stats.files_parsed += 1;
        self.syntax_store
            .parse_file(path, &text)
            .ok_or(MissReason::UnparseableFile)
    }
}

fn cache_hit(stats: &mut ResolutionStats, entry: &CacheEntry) -> Option<ResolvedNode> {
    stats.cache_hits += 1;
    match entry.miss_reason() {
        Some(reason) => {
            stats.negative_hits += 1;
            trace!(%reason, "negative cache hit");
        }
        None => trace!("cache hit"),
    }
    entry.found()
}

fn remember<K: Hash + Eq>(
    table: &mut FxHashMap<K, CacheEntry>,
    key: K,
    result: Result<ResolvedNode, MissReason>,
) -> Option<ResolvedNode> {
    let entry = CacheEntry::from(result);
    let found = entry.found();
    table.insert(key, entry);
    found
}
