use super::*;

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Info), @"info");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
}

#[test]
fn severity_order() {
    assert!(Severity::Info < Severity::Warning);
    assert!(Severity::Warning < Severity::Error);
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::AssetNotFound, SourceRef::new("pages/Main"))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.message(), "asset not found");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report_global(DiagnosticKind::MissingId)
        .message("page with ID = 2")
        .emit();
    diagnostics
        .report_global(DiagnosticKind::UnusedAsset)
        .message("style: small")
        .emit();

    let messages: Vec<&str> = diagnostics.iter().map(|m| m.message()).collect();
    assert_eq!(messages, ["Missing page with ID = 2", "Unused style: small"]);
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.warning_count(), 1);
}

#[test]
fn messages_carry_section() {
    let mut diagnostics = Diagnostics::for_section(Section::Checks);
    diagnostics.report_global(DiagnosticKind::BuildInfo).emit();

    let msg = diagnostics.iter().next().unwrap();
    assert_eq!(msg.section(), Section::Checks);
    assert_eq!(msg.severity(), Severity::Info);
}

#[test]
fn counts() {
    let mut diagnostics = Diagnostics::new();
    diagnostics.report_global(DiagnosticKind::UnknownIdentifier).emit();
    diagnostics.report_global(DiagnosticKind::OperandOverflow).emit();
    diagnostics.report_global(DiagnosticKind::MissingId).emit();
    diagnostics.report_global(DiagnosticKind::UnusedAsset).emit();

    assert_eq!(diagnostics.error_count(), 2);
    assert_eq!(diagnostics.warning_count(), 1);
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.of_kind(DiagnosticKind::MissingId).count(), 1);
}

#[test]
fn extend_appends() {
    let mut a = Diagnostics::new();
    a.report_global(DiagnosticKind::MissingId).emit();
    let mut b = Diagnostics::new();
    b.report_global(DiagnosticKind::UnusedAsset).emit();
    a.extend(b);
    assert_eq!(a.len(), 2);
}

#[test]
fn plain_rendering() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::MissingId, SourceRef::new("pages"))
        .message("page with ID = 2")
        .emit();
    diagnostics
        .report(
            DiagnosticKind::UnknownIdentifier,
            SourceRef::new("pages/Main/components/1").property("data"),
        )
        .message("counter")
        .emit();

    insta::assert_snapshot!(diagnostics.printer().render_plain(), @r"
    warning: Missing page with ID = 2 (at pages)
    error: unknown identifier `counter` (at pages/Main/components/1.data)
    ");
}

#[test]
fn plain_rendering_respects_min_severity() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report_global(DiagnosticKind::BuildInfo)
        .message("Uncompressed size: 10")
        .emit();
    diagnostics.report_global(DiagnosticKind::MissingId).emit();

    let out = diagnostics
        .printer()
        .min_severity(Severity::Warning)
        .render_plain();
    assert_eq!(out, "warning: missing asset id");
}

#[test]
fn snippet_rendering_mentions_location() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(
            DiagnosticKind::UnknownIdentifier,
            SourceRef::new("pages/Main/components/1")
                .property("data")
                .expression("a + missing", 4..11),
        )
        .message("missing")
        .emit();
    diagnostics
        .report(DiagnosticKind::MissingId, SourceRef::new("pages"))
        .message("page with ID = 2")
        .emit();

    let out = diagnostics.printer().render();
    assert!(out.contains("unknown identifier `missing`"));
    assert!(out.contains("pages/Main/components/1.data"));
    assert!(out.contains("a + missing"));
    assert!(out.contains("Missing page with ID = 2"));
    assert!(out.contains("at pages"));
}

#[test]
fn empty_renders_nothing() {
    let diagnostics = Diagnostics::new();
    assert_eq!(diagnostics.printer().render(), "");
    assert_eq!(diagnostics.printer().render_plain(), "");
}
