use anyhow::{Result, anyhow};
use phz_common::Span;
use phz_mapper::{TypeContext, TypeKind, TypeMapperRegistry};
use phz_parser::{NameScope, ParserState};
use phz_resolver::{
    AstResolver, FsFileReader, ResolutionStats, ResolvedNode, SourceIndexReflectionProvider,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info_span};

use crate::cli::args::Command;
use crate::cli::config::ResolvedConfig;

/// Result of one command, rendered by the reporter or printed as JSON.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CommandOutput {
    Declaration(DeclarationReport),
    NotFound { symbol: String },
    Type(TypeReport),
    Index(IndexReport),
}

impl CommandOutput {
    pub fn is_success(&self) -> bool {
        !matches!(self, CommandOutput::NotFound { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationReport {
    pub symbol: String,
    pub path: PathBuf,
    pub span: Span,
    /// Enclosing (or own) class-like for methods and classes.
    pub class_name: Option<String>,
    pub text: String,
    pub stats: ResolutionStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeReport {
    pub annotation: String,
    pub position: String,
    pub semantic: String,
    pub shape: String,
    /// phpdoc form; `None` when no mapper accepts the type.
    pub doc: Option<String>,
    /// Native form; `None` when the type has none in this position and version.
    pub native: Option<String>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexReport {
    pub files: usize,
    pub skipped_files: Vec<PathBuf>,
    pub classes: usize,
    pub functions: usize,
    /// Names, only when listing was requested.
    pub class_names: Vec<String>,
    pub function_names: Vec<String>,
}

pub fn execute(config: &ResolvedConfig, command: &Command) -> Result<CommandOutput> {
    match command {
        Command::Type {
            annotation,
            kind,
            namespace,
        } => map_annotation(config, annotation, TypeKind::from(*kind), namespace.as_deref()),
        Command::Index { list } => Ok(index_project(config, *list)),
        Command::Method { class, method } => {
            let mut resolver = project_resolver(config);
            let symbol = format!("{}::{method}", class.trim_start_matches('\\'));
            let node = resolver.resolve_class_method(class, method);
            Ok(declaration_output(symbol, node, resolver.stats()))
        }
        Command::Function { name } => {
            let mut resolver = project_resolver(config);
            let function = resolver.reflection().resolve_function_reflection(name);
            let node = function.and_then(|function| resolver.resolve_function_from_reflection(&function));
            Ok(declaration_output(
                name.trim_start_matches('\\').to_string(),
                node,
                resolver.stats(),
            ))
        }
        Command::Class { name } => {
            let mut resolver = project_resolver(config);
            let node = resolver.resolve_class_from_name(name);
            Ok(declaration_output(
                name.trim_start_matches('\\').to_string(),
                node,
                resolver.stats(),
            ))
        }
    }
}

fn build_index(config: &ResolvedConfig) -> SourceIndexReflectionProvider {
    let _span = info_span!("index", roots = config.paths.len()).entered();
    SourceIndexReflectionProvider::build(&config.source_index_options(), &FsFileReader)
}

fn project_resolver(config: &ResolvedConfig) -> AstResolver {
    let provider = build_index(config);
    AstResolver::new(Arc::new(provider), Arc::new(FsFileReader))
}

fn declaration_output(
    symbol: String,
    node: Option<ResolvedNode>,
    stats: ResolutionStats,
) -> CommandOutput {
    match node {
        Some(node) => CommandOutput::Declaration(DeclarationReport {
            symbol,
            path: node.path.clone(),
            span: node.span,
            class_name: node.class_name().map(str::to_string),
            text: node.text.clone(),
            stats,
        }),
        None => {
            debug!(symbol, "declaration not resolved");
            CommandOutput::NotFound { symbol }
        }
    }
}

fn map_annotation(
    config: &ResolvedConfig,
    annotation: &str,
    kind: TypeKind,
    namespace: Option<&str>,
) -> Result<CommandOutput> {
    let node = ParserState::parse_type_annotation(annotation).map_err(|diagnostics| {
        let details: Vec<String> = diagnostics
            .iter()
            .map(|diagnostic| format!("{} at offset {}", diagnostic.message, diagnostic.start))
            .collect();
        anyhow!("invalid type annotation '{annotation}': {}", details.join("; "))
    })?;

    let scope = NameScope {
        namespace: namespace
            .map(|namespace| namespace.trim_matches('\\').to_string())
            .filter(|namespace| !namespace.is_empty()),
        ..NameScope::default()
    };
    let registry = TypeMapperRegistry::with_default_mappers(config.php_version);
    let semantic = registry.to_semantic_type(&node, &TypeContext::new(&scope));

    let mut report = TypeReport {
        annotation: annotation.to_string(),
        position: kind.to_string(),
        semantic: semantic.to_string(),
        shape: semantic.shape().to_string(),
        doc: None,
        native: None,
        error: None,
    };
    match registry.to_doc_type_node(&semantic, kind) {
        Ok(doc) => report.doc = Some(doc.to_string()),
        Err(err) => report.error = Some(err.to_string()),
    }
    match registry.to_syntax_type_node(&semantic, kind) {
        Ok(native) => report.native = native.map(|node| node.to_string()),
        Err(err) => report.error = report.error.or(Some(err.to_string())),
    }
    Ok(CommandOutput::Type(report))
}

fn index_project(config: &ResolvedConfig, list: bool) -> CommandOutput {
    let index = build_index(config);
    let mut class_names = Vec::new();
    let mut function_names = Vec::new();
    if list {
        class_names = index.classes().map(|class| class.name.clone()).collect();
        function_names = index
            .functions()
            .map(|function| function.name.clone())
            .collect();
    }
    CommandOutput::Index(IndexReport {
        files: index.files().len(),
        skipped_files: index.skipped_files().to_vec(),
        classes: index.class_count(),
        functions: index.function_count(),
        class_names,
        function_names,
    })
}
