//! The document record and the rules its input fields must satisfy.
//!
//! A [`DocumentInput`] can only be obtained through validation, so anything
//! the [`Registry`](crate::Registry) receives is already known to be good.
//! Validation reports every offending field at once, one [`FieldError`] per
//! field, and never trims or coerces what the client sent.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};

/// Shortest accepted `name` / `owner`, in characters.
pub const MIN_TEXT_LEN: usize = 2;
/// Longest accepted `name` / `owner`, in characters.
pub const MAX_TEXT_LEN: usize = 50;

// Letters, digits, spaces and `. , ' ( ) & _ -`, with at least one letter
// or digit somewhere.
static TEXT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[\p{L}\p{N} .,'()&_-]*[\p{L}\p{N}][\p{L}\p{N} .,'()&_-]*$")
        .expect("text pattern compiles")
});

// ── DocumentId ────────────────────────────────────────────────────────────────

/// Server-assigned document identifier. Positive, sequential, never reused.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ── DocumentType ──────────────────────────────────────────────────────────────

/// The closed set of document categories. Labels are matched exactly.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize)]
pub enum DocumentType {
    #[serde(rename = "PDF")]
    Pdf,
    Word,
    Excel,
    PowerPoint,
    #[serde(rename = "Plain Text")]
    PlainText,
    Markdown,
    #[serde(rename = "HTML")]
    Html,
    Image,
}

impl DocumentType {
    pub const ALL: [DocumentType; 8] = [
        Self::Pdf,
        Self::Word,
        Self::Excel,
        Self::PowerPoint,
        Self::PlainText,
        Self::Markdown,
        Self::Html,
        Self::Image,
    ];

    /// The wire label, e.g. `"Plain Text"`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pdf        => "PDF",
            Self::Word       => "Word",
            Self::Excel      => "Excel",
            Self::PowerPoint => "PowerPoint",
            Self::PlainText  => "Plain Text",
            Self::Markdown   => "Markdown",
            Self::Html       => "HTML",
            Self::Image      => "Image",
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("`{0}` is not a known document type")]
pub struct InvalidDocumentType(pub String);

impl FromStr for DocumentType {
    type Err = InvalidDocumentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.label() == s)
            .ok_or_else(|| InvalidDocumentType(s.to_owned()))
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ── Document ──────────────────────────────────────────────────────────────────

/// A stored document, as sent over the wire.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Document {
    pub id: DocumentId,
    pub name: String,
    pub owner: String,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
}

impl Document {
    pub fn new(id: DocumentId, input: DocumentInput) -> Self {
        Self {
            id,
            name: input.name,
            owner: input.owner,
            doc_type: input.doc_type,
        }
    }
}

// ── Validation errors ─────────────────────────────────────────────────────────

/// Machine-readable reason a field was rejected.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Reason {
    Missing,
    NotAString,
    TooShort,
    TooLong,
    PatternMismatch,
    NotInEnumeration,
    JsonInvalid,
    ObjectExpected,
    IntParsing,
}

/// One violated constraint. `loc` is the field path, e.g. `["body", "name"]`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldError {
    pub loc: Vec<String>,
    #[serde(rename = "type")]
    pub reason: Reason,
    pub msg: String,
}

impl FieldError {
    pub fn new(loc: &[&str], reason: Reason, msg: impl Into<String>) -> Self {
        Self {
            loc: loc.iter().map(|s| (*s).to_owned()).collect(),
            reason,
            msg: msg.into(),
        }
    }

    /// The innermost path segment, i.e. the field name.
    pub fn field(&self) -> &str {
        self.loc.last().map(String::as_str).unwrap_or_default()
    }
}

/// Every constraint a request violated. Serialises as `{"detail": [...]}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, thiserror::Error)]
#[error("invalid input: {} field error(s)", .detail.len())]
pub struct ValidationErrors {
    detail: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn single(error: FieldError) -> Self {
        Self { detail: vec![error] }
    }

    pub fn push(&mut self, error: FieldError) {
        self.detail.push(error);
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.detail.extend(other.detail);
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.detail
    }

    pub fn is_empty(&self) -> bool {
        self.detail.is_empty()
    }
}

// ── DocumentInput ─────────────────────────────────────────────────────────────

/// Validated `{name, owner, type}` payload used by create and update.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DocumentInput {
    name: String,
    owner: String,
    doc_type: DocumentType,
}

impl DocumentInput {
    /// Validates already-typed fields.
    pub fn new(
        name: impl Into<String>,
        owner: impl Into<String>,
        doc_type: DocumentType,
    ) -> Result<Self, ValidationErrors> {
        let (name, owner) = (name.into(), owner.into());
        let mut errors = ValidationErrors::default();
        for (field, value) in [("name", &name), ("owner", &owner)] {
            if let Err(e) = check_text(field, value) {
                errors.push(e);
            }
        }
        if errors.is_empty() {
            Ok(Self { name, owner, doc_type })
        } else {
            Err(errors)
        }
    }

    /// Parses and validates a raw JSON request body.
    pub fn from_json(body: &[u8]) -> Result<Self, ValidationErrors> {
        if body.is_empty() {
            return Err(ValidationErrors::single(FieldError::new(
                &["body"],
                Reason::Missing,
                "Field required",
            )));
        }
        let value: Value = serde_json::from_slice(body).map_err(|e| {
            ValidationErrors::single(FieldError::new(
                &["body"],
                Reason::JsonInvalid,
                format!("JSON decode error: {e}"),
            ))
        })?;
        Self::from_value(&value)
    }

    /// Validates a decoded JSON value. Unknown keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, ValidationErrors> {
        let Some(object) = value.as_object() else {
            return Err(ValidationErrors::single(FieldError::new(
                &["body"],
                Reason::ObjectExpected,
                "Input should be a valid object",
            )));
        };

        let mut errors = ValidationErrors::default();
        let name = text_field(object, "name", &mut errors);
        let owner = text_field(object, "owner", &mut errors);
        let doc_type = type_field(object, &mut errors);

        match (name, owner, doc_type) {
            (Some(name), Some(owner), Some(doc_type)) if errors.is_empty() => {
                Ok(Self { name, owner, doc_type })
            }
            _ => Err(errors),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }
}

fn present<'a>(
    object: &'a Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a str> {
    let Some(value) = object.get(field) else {
        errors.push(FieldError::new(&["body", field], Reason::Missing, "Field required"));
        return None;
    };
    let text = value.as_str();
    if text.is_none() {
        errors.push(FieldError::new(
            &["body", field],
            Reason::NotAString,
            "Input should be a valid string",
        ));
    }
    text
}

fn text_field(
    object: &Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let text = present(object, field, errors)?;
    match check_text(field, text) {
        Ok(()) => Some(text.to_owned()),
        Err(e) => {
            errors.push(e);
            None
        }
    }
}

fn type_field(object: &Map<String, Value>, errors: &mut ValidationErrors) -> Option<DocumentType> {
    let text = present(object, "type", errors)?;
    match text.parse() {
        Ok(doc_type) => Some(doc_type),
        Err(_) => {
            let allowed = DocumentType::ALL
                .iter()
                .map(|t| format!("'{t}'"))
                .collect::<Vec<_>>()
                .join(", ");
            errors.push(FieldError::new(
                &["body", "type"],
                Reason::NotInEnumeration,
                format!("Input should be one of {allowed}"),
            ));
            None
        }
    }
}

fn check_text(field: &str, text: &str) -> Result<(), FieldError> {
    let len = text.chars().count();
    let loc = ["body", field];
    if len < MIN_TEXT_LEN {
        return Err(FieldError::new(
            &loc,
            Reason::TooShort,
            format!("String should have at least {MIN_TEXT_LEN} characters"),
        ));
    }
    if len > MAX_TEXT_LEN {
        return Err(FieldError::new(
            &loc,
            Reason::TooLong,
            format!("String should have at most {MAX_TEXT_LEN} characters"),
        ));
    }
    if !TEXT_PATTERN.is_match(text) {
        return Err(FieldError::new(
            &loc,
            Reason::PatternMismatch,
            format!("String should match pattern '{}'", TEXT_PATTERN.as_str()),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn reasons(value: Value) -> Vec<(String, Reason)> {
        DocumentInput::from_value(&value)
            .unwrap_err()
            .errors()
            .iter()
            .map(|e| (e.field().to_owned(), e.reason))
            .collect()
    }

    #[test]
    fn accepts_valid_input() {
        let input = DocumentInput::from_value(&json!({
            "name": "Test Document",
            "owner": "Tester",
            "type": "PDF",
            "ignored": true,
        }))
        .unwrap();
        assert_eq!(input.name(), "Test Document");
        assert_eq!(input.owner(), "Tester");
        assert_eq!(input.doc_type(), DocumentType::Pdf);
    }

    #[test]
    fn length_bounds_are_inclusive() {
        let fifty = "a".repeat(50);
        assert!(DocumentInput::new("ab", fifty.as_str(), DocumentType::Word).is_ok());

        let errs = DocumentInput::new("a", "a".repeat(51), DocumentType::Word).unwrap_err();
        let got: Vec<_> = errs.errors().iter().map(|e| (e.field(), e.reason)).collect();
        assert_eq!(got, vec![("name", Reason::TooShort), ("owner", Reason::TooLong)]);
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        assert!(DocumentInput::new("Zoë", "Ünal", DocumentType::Image).is_ok());
        assert!(DocumentInput::new("é".repeat(50), "Ok", DocumentType::Image).is_ok());
    }

    #[test]
    fn rejects_disallowed_punctuation() {
        assert_eq!(
            reasons(json!({"name": "Bad;Name", "owner": "Tester", "type": "PDF"})),
            vec![("name".to_owned(), Reason::PatternMismatch)]
        );
        assert!(DocumentInput::new("Q3 report (final) - v2.1, Smith & Co's", "Jo_Ann", DocumentType::Pdf).is_ok());
    }

    #[test]
    fn rejects_text_without_letters_or_digits() {
        for blank in ["  ", "--", " . ", "()"] {
            let errs = DocumentInput::new(blank, "Tester", DocumentType::Pdf).unwrap_err();
            assert_eq!(errs.errors()[0].reason, Reason::PatternMismatch, "{blank:?}");
        }
        assert!(DocumentInput::new(" 7 ", "_a_", DocumentType::Pdf).is_ok());
    }

    #[test]
    fn reports_every_bad_field() {
        assert_eq!(
            reasons(json!({"owner": 7, "type": "Spreadsheet"})),
            vec![
                ("name".to_owned(), Reason::Missing),
                ("owner".to_owned(), Reason::NotAString),
                ("type".to_owned(), Reason::NotInEnumeration),
            ]
        );
    }

    #[test]
    fn type_labels_are_case_sensitive() {
        assert_eq!("Plain Text".parse::<DocumentType>().unwrap(), DocumentType::PlainText);
        assert!("pdf".parse::<DocumentType>().is_err());
    }

    #[test]
    fn rejects_non_object_and_bad_json() {
        let errs = DocumentInput::from_json(b"[1, 2]").unwrap_err();
        assert_eq!(errs.errors()[0].reason, Reason::ObjectExpected);

        let errs = DocumentInput::from_json(b"{not json").unwrap_err();
        assert_eq!(errs.errors()[0].reason, Reason::JsonInvalid);
        assert_eq!(errs.errors()[0].loc, vec!["body"]);

        let errs = DocumentInput::from_json(b"").unwrap_err();
        assert_eq!(errs.errors()[0].reason, Reason::Missing);
    }

    #[test]
    fn document_serialises_with_type_key() {
        let input = DocumentInput::new("Notes", "Ana", DocumentType::PlainText).unwrap();
        let doc = Document::new(DocumentId::new(3), input);
        assert_eq!(
            serde_json::to_value(&doc).unwrap(),
            json!({"id": 3, "name": "Notes", "owner": "Ana", "type": "Plain Text"})
        );
    }
}
