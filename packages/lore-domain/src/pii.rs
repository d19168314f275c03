/// Placeholder markers left by the upstream redaction stage. Their presence
/// in a synthesized answer means it surfaces sensitive-field context.
pub const PII_MARKERS: [&str; 4] = ["[SSN]", "[CARD]", "[EMAIL]", "[PHONE]"];

/// Case-sensitive scan for redaction markers in their exact bracket form.
pub fn contains_pii_markers(text: &str) -> bool {
	PII_MARKERS.iter().any(|marker| text.contains(marker))
}
