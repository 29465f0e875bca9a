use console::style;
use std::fmt;
use std::path::Path;

/// Enhanced error type with suggestions
pub struct CliError {
    pub message: String,
    pub context: Option<String>,
    pub suggestions: Vec<String>,
    pub help_command: Option<String>,
}

impl CliError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
            help_command: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }

    pub fn with_help(mut self, command: impl Into<String>) -> Self {
        self.help_command = Some(command.into());
        self
    }

    pub fn display(&self) {
        eprintln!("{} {}\n", style("✗").red().bold(), style(&self.message).red().bold());

        if let Some(ref context) = self.context {
            eprintln!("{}", context);
            eprintln!();
        }

        if !self.suggestions.is_empty() {
            eprintln!("{}", style("To fix this:").yellow().bold());
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                eprintln!("  {}. {}", i + 1, suggestion);
            }
            eprintln!();
        }

        if let Some(ref help_cmd) = self.help_command {
            eprintln!("{} {}", style("Need help?").cyan(), style(help_cmd).cyan().bold());
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Input file does not exist
pub fn input_not_found(path: &Path) -> CliError {
    CliError::new("Input file not found")
        .with_context(format!("The specified input file does not exist.\n\nPath: {}", path.display()))
        .with_suggestion("Check the file path and try again")
        .with_suggestion("Use absolute path or path relative to current directory")
}

/// Geometry the editor refused to load
pub fn unloadable_geometry(path: &Path, reason: impl fmt::Display) -> CliError {
    CliError::new("Geometry cannot be edited")
        .with_context(format!("Path: {}\nReason: {}", path.display(), reason))
        .with_suggestion("Provide a Point, LineString, Polygon, MultiLineString or MultiPolygon")
        .with_suggestion("Or a GeometryCollection containing one of those types")
        .with_help("Run: parcel inspect --help")
}

/// Vertex deletion refused because the ring is at its minimum size
pub fn figure_deletion_required(index: usize, minimum: usize) -> CliError {
    CliError::new("Vertex deletion refused")
        .with_context(format!(
            "Deleting vertex {} would leave fewer than {} vertices.\n\nOnly the whole figure can be deleted.",
            index, minimum
        ))
        .with_suggestion("Use --op clear to delete the whole figure")
        .with_help("Run: parcel edit --help")
}

/// An edit operation referenced a vertex that does not exist
pub fn vertex_not_found(index: usize, count: usize) -> CliError {
    CliError::new(format!("No vertex at index {}", index))
        .with_context(format!("The first part of the figure has {} vertices.", count))
        .with_suggestion("Run parcel inspect to list vertex indices")
}

/// An edit operation ran after the figure was cleared
pub fn no_active_figure(op: impl fmt::Display) -> CliError {
    CliError::new(format!("Cannot apply {}: no active figure", op))
        .with_suggestion("Put --op clear last")
}
