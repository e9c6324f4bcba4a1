use clap::{Parser, Subcommand, ValueEnum};
use phz_common::PhpVersion;
use phz_mapper::TypeKind;
use std::path::PathBuf;

/// CLI arguments for the phz binary.
#[derive(Parser, Debug)]
#[command(
    name = "phz",
    version,
    about = "Resolve PHP declarations and map types between semantic and syntax forms"
)]
pub struct CliArgs {
    /// Path to phz.json or a directory containing it.
    #[arg(short = 'p', long = "project", global = true)]
    pub project: Option<PathBuf>,

    /// Target PHP version (e.g. 7.4, 8.1). Overrides phpVersion from the config.
    #[arg(long = "php-version", global = true)]
    pub php_version: Option<PhpVersion>,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Print the declaration of a method, searching parents and traits.
    Method {
        /// Fully-qualified class name.
        class: String,
        method: String,
    },
    /// Print the declaration of a function.
    Function {
        /// Fully-qualified function name.
        name: String,
    },
    /// Print the declaration of a class, interface or trait.
    Class {
        /// Fully-qualified class name.
        name: String,
    },
    /// Map a type annotation to its phpdoc and native forms.
    Type {
        /// Annotation such as `?Foo`, `int|string` or `A&B`.
        annotation: String,
        /// Position the native form is produced for.
        #[arg(long, value_enum, default_value_t = Position::Any)]
        kind: Position,
        /// Namespace the annotation is written in.
        #[arg(long)]
        namespace: Option<String>,
    },
    /// Index the project and print a summary.
    Index {
        /// List every indexed class and function.
        #[arg(long)]
        list: bool,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Position {
    Property,
    Param,
    Return,
    Any,
}

impl From<Position> for TypeKind {
    fn from(position: Position) -> TypeKind {
        match position {
            Position::Property => TypeKind::Property,
            Position::Param => TypeKind::Param,
            Position::Return => TypeKind::Return,
            Position::Any => TypeKind::Any,
        }
    }
}
