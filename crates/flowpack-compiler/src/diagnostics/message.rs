use std::fmt;
use std::ops::Range;

/// Diagnostic kinds, grouped by the build phase that reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DiagnosticKind {
    // Asset indexing
    MissingId,
    AssetIdOutOfRange,
    MasterAssetWithoutId,
    AssetNotFound,
    UnusedAsset,

    // Flows
    UnknownComponentType,
    ConnectionNotFound,
    UserWidgetCycle,

    // Expressions
    InvalidExpression,
    UnknownIdentifier,
    OperandOverflow,
    NonLiteralDefault,

    // Source backend
    DuplicateIdentifier,

    // Reporting
    BuildInfo,
}

impl DiagnosticKind {
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnusedAsset | Self::BuildInfo => Severity::Info,
            Self::MissingId
            | Self::MasterAssetWithoutId
            | Self::UnknownComponentType
            | Self::ConnectionNotFound
            | Self::NonLiteralDefault
            | Self::DuplicateIdentifier => Severity::Warning,
            Self::AssetNotFound
            | Self::AssetIdOutOfRange
            | Self::UserWidgetCycle
            | Self::InvalidExpression
            | Self::UnknownIdentifier
            | Self::OperandOverflow => Severity::Error,
        }
    }

    /// Base message for this diagnostic kind, used when no custom message is provided.
    pub fn fallback_message(&self) -> &'static str {
        match self {
            Self::MissingId => "missing asset id",
            Self::AssetIdOutOfRange => "asset id out of range",
            Self::MasterAssetWithoutId => "master project asset without ID can not be used",
            Self::AssetNotFound => "asset not found",
            Self::UnusedAsset => "unused asset",
            Self::UnknownComponentType => "unknown component type",
            Self::ConnectionNotFound => "connection line endpoint not found",
            Self::UserWidgetCycle => "cycle detected in user widget",
            Self::InvalidExpression => "invalid expression",
            Self::UnknownIdentifier => "unknown identifier",
            Self::OperandOverflow => "expression operand out of range",
            Self::NonLiteralDefault => "default value is not a literal",
            Self::DuplicateIdentifier => "duplicate identifier",
            Self::BuildInfo => "build info",
        }
    }

    /// Template for custom messages. Contains `{}` placeholder for caller-provided detail.
    pub fn custom_message(&self) -> String {
        match self {
            Self::MissingId => "Missing {}".to_string(),
            Self::AssetIdOutOfRange => "{} is out of range".to_string(),
            Self::MasterAssetWithoutId => "master project {} without ID can not be used".to_string(),
            Self::AssetNotFound => "{} not found".to_string(),
            Self::UnusedAsset => "Unused {}".to_string(),
            Self::UnknownComponentType => "unknown component type `{}`".to_string(),
            Self::UnknownIdentifier => "unknown identifier `{}`".to_string(),
            Self::NonLiteralDefault => "default value of `{}` is not a literal".to_string(),
            Self::DuplicateIdentifier => "duplicate identifier `{}`".to_string(),
            Self::BuildInfo => "{}".to_string(),
            _ => format!("{}: {{}}", self.fallback_message()),
        }
    }

    /// Render the final message.
    ///
    /// - `None` → returns `fallback_message()`
    /// - `Some(detail)` → returns `custom_message()` with `{}` replaced by detail
    pub fn message(&self, msg: Option<&str>) -> String {
        match msg {
            None => self.fallback_message().to_string(),
            Some(detail) => self.custom_message().replace("{}", detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Severity {
    Info,
    Warning,
    #[default]
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

/// Output pane a diagnostic belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    Checks,
    #[default]
    Output,
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Checks => write!(f, "checks"),
            Section::Output => write!(f, "output"),
        }
    }
}

/// Where in the project a diagnostic points.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceRef {
    /// Readable object path, e.g. `pages/Main/components/2`.
    pub path: String,
    pub property: Option<String>,
    /// Expression text and the offending byte range inside it.
    pub expression: Option<(String, Range<usize>)>,
}

impl SourceRef {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            property: None,
            expression: None,
        }
    }

    pub fn property(mut self, name: impl Into<String>) -> Self {
        self.property = Some(name.into());
        self
    }

    pub fn expression(mut self, text: impl Into<String>, range: Range<usize>) -> Self {
        self.expression = Some((text.into(), range));
        self
    }
}

impl fmt::Display for SourceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.property {
            Some(property) => write!(f, "{}.{}", self.path, property),
            None => write!(f, "{}", self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticMessage {
    pub(crate) kind: DiagnosticKind,
    pub(crate) section: Section,
    pub(crate) source: Option<SourceRef>,
    pub(crate) message: String,
}

impl DiagnosticMessage {
    pub(crate) fn with_default_message(
        kind: DiagnosticKind,
        section: Section,
        source: Option<SourceRef>,
    ) -> Self {
        Self {
            kind,
            section,
            source,
            message: kind.fallback_message().to_string(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        self.kind
    }

    pub fn section(&self) -> Section {
        self.section
    }

    pub fn source(&self) -> Option<&SourceRef> {
        self.source.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn severity(&self) -> Severity {
        self.kind.default_severity()
    }

    pub(crate) fn is_error(&self) -> bool {
        self.severity() == Severity::Error
    }

    pub(crate) fn is_warning(&self) -> bool {
        self.severity() == Severity::Warning
    }
}

impl fmt::Display for DiagnosticMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity(), self.message)?;
        if let Some(source) = &self.source {
            write!(f, " (at {source})")?;
        }
        Ok(())
    }
}
