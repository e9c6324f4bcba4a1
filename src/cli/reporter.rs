use colored::Colorize;

use crate::cli::driver::{CommandOutput, DeclarationReport, IndexReport, TypeReport};

/// Renders command results for a terminal.
pub struct Reporter {
    color: bool,
}

impl Reporter {
    pub fn new(color: bool) -> Self {
        Reporter { color }
    }

    pub fn render(&self, output: &CommandOutput) -> String {
        match output {
            CommandOutput::Declaration(report) => self.format_declaration(report),
            CommandOutput::NotFound { symbol } => {
                format!("{} {symbol}", self.paint_error("not found:"))
            }
            CommandOutput::Type(report) => self.format_type(report),
            CommandOutput::Index(report) => self.format_index(report),
        }
    }

    fn format_declaration(&self, report: &DeclarationReport) -> String {
        let mut out = String::new();
        let location = format!(
            "{}:{}-{}",
            report.path.display(),
            report.span.start,
            report.span.end
        );
        out.push_str(&self.paint_path(&location));
        if let Some(class_name) = &report.class_name {
            out.push_str(&format!(" ({class_name})"));
        }
        out.push('\n');
        out.push_str(&report.text);
        out.push('\n');
        out
    }

    fn format_type(&self, report: &TypeReport) -> String {
        let mut out = String::new();
        out.push_str(&self.row("semantic", &report.semantic));
        out.push_str(&self.row("shape", &report.shape));
        out.push_str(&self.row("position", &report.position));
        if let Some(doc) = &report.doc {
            out.push_str(&self.row("phpdoc", doc));
        }
        let native = report.native.as_deref().unwrap_or("(none)");
        out.push_str(&self.row("native", native));
        if let Some(error) = &report.error {
            out.push_str(&format!("{} {error}\n", self.paint_error("error:")));
        }
        out
    }

    fn format_index(&self, report: &IndexReport) -> String {
        let mut out = String::new();
        out.push_str(&self.row("files", &report.files.to_string()));
        out.push_str(&self.row("classes", &report.classes.to_string()));
        out.push_str(&self.row("functions", &report.functions.to_string()));
        for path in &report.skipped_files {
            out.push_str(&format!(
                "{} {}\n",
                self.paint_warning("skipped:"),
                path.display()
            ));
        }
        for name in report.class_names.iter().chain(&report.function_names) {
            out.push_str(&format!("  {name}\n"));
        }
        out
    }

    fn row(&self, label: &str, value: &str) -> String {
        let label = format!("{label:>9}");
        if self.color {
            format!("{} {value}\n", label.bold())
        } else {
            format!("{label} {value}\n")
        }
    }

    fn paint_path(&self, text: &str) -> String {
        if self.color {
            text.cyan().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_error(&self, text: &str) -> String {
        if self.color {
            text.red().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn paint_warning(&self, text: &str) -> String {
        if self.color {
            text.yellow().to_string()
        } else {
            text.to_string()
        }
    }
}
