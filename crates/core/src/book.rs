//! Book records and the loosely-typed request payload they are built from.
//!
//! Request bodies are accepted as [`BookInput`], where every field is an
//! optional JSON value. Presence checks follow truthiness rules (see
//! [`is_truthy`]) rather than JSON shape, so a body missing `title` yields a
//! validation error naming `title` instead of a deserialization failure.
//!
//! An explicit `null` is kept distinct from an absent key: it fails the
//! presence checks on creation, but an update applies it like any other value.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::types::BookId;

/// Operation names used in validation messages.
pub const OP_ADD: &str = "addBook";
pub const OP_UPDATE: &str = "updateBook";
pub const OP_REMOVE: &str = "removeBook";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// A persisted book record.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub year: Option<Value>,
    /// Stored exactly as the client sent it; never normalized to a number.
    pub quantity: Value,
    #[serde(
        rename = "imageURL",
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_url: Option<Value>,
    pub description: String,
}

impl Book {
    /// Shallow field-level merge: supplied fields replace, omitted fields stay.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(year) = patch.year {
            self.year = Some(year);
        }
        if let Some(quantity) = patch.quantity {
            self.quantity = quantity;
        }
        if let Some(image_url) = patch.image_url {
            self.image_url = Some(image_url);
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
    }
}

/// A validated record that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub year: Option<Value>,
    pub quantity: Value,
    pub image_url: Option<Value>,
    pub description: String,
}

impl NewBook {
    pub fn with_id(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            year: self.year,
            quantity: self.quantity,
            image_url: self.image_url,
            description: self.description,
        }
    }
}

/// The subset of mutable fields supplied by an update request.
///
/// `Some(Value::Null)` means the client sent `null` for that field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookPatch {
    pub title: Option<String>,
    pub year: Option<Value>,
    pub quantity: Option<Value>,
    pub image_url: Option<Value>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Request payload
// ---------------------------------------------------------------------------

/// Raw add/update request body. `None` means the key was absent; a JSON
/// `null` arrives as `Some(Value::Null)`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookInput {
    #[serde(default, deserialize_with = "present")]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub year: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub quantity: Option<Value>,
    #[serde(rename = "imageURL", default, deserialize_with = "present")]
    pub image_url: Option<Value>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Value>,
}

impl BookInput {
    /// Check the fields required on creation, in the order `title`,
    /// `quantity`, `description`, and build the unsaved record.
    pub fn into_new_book(self) -> Result<NewBook, CoreError> {
        let title = require(self.title, "title", OP_ADD)?;
        let quantity = require(self.quantity, "quantity", OP_ADD)?;
        let description = require(self.description, "description", OP_ADD)?;

        Ok(NewBook {
            title: expect_string(title, "title")?,
            year: self.year,
            quantity,
            image_url: self.image_url,
            description: expect_string(description, "description")?,
        })
    }

    /// The id an update request targets. Whole-valued floats such as `2.0`
    /// name the same record as `2`.
    pub fn target_id(&self) -> Result<BookId, CoreError> {
        match &self.id {
            Some(value) if is_truthy(value) => value
                .as_i64()
                .or_else(|| value.as_f64().and_then(whole_number))
                .ok_or_else(|| {
                    CoreError::Validation(format!("'id' must be an integer, got {value}"))
                }),
            _ => Err(CoreError::missing_field("id", OP_UPDATE)),
        }
    }

    /// Split the mutable fields off into a patch. The `id` is not part of it.
    pub fn into_patch(self) -> Result<BookPatch, CoreError> {
        Ok(BookPatch {
            title: self.title.map(|v| expect_string(v, "title")).transpose()?,
            year: self.year,
            quantity: self.quantity,
            image_url: self.image_url,
            description: self
                .description
                .map(|v| expect_string(v, "description"))
                .transpose()?,
        })
    }
}

/// Parse a removal target taken from the URL path.
pub fn parse_path_id(raw: &str) -> Result<BookId, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::missing_path_param("id", OP_REMOVE));
    }
    raw.parse()
        .map_err(|_| CoreError::Validation(format!("'id' must be an integer, got '{raw}'")))
}

/// JSON truthiness: `null`, `false`, zero and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Deserialize a key that is present, keeping an explicit `null` as
/// `Some(Value::Null)`. Absent keys fall back to `None` via `#[serde(default)]`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn whole_number(f: f64) -> Option<BookId> {
    let in_range = f >= BookId::MIN as f64 && f < BookId::MAX as f64;
    (f.fract() == 0.0 && in_range).then_some(f as BookId)
}

fn require(value: Option<Value>, field: &str, operation: &str) -> Result<Value, CoreError> {
    match value {
        Some(v) if is_truthy(&v) => Ok(v),
        _ => Err(CoreError::missing_field(field, operation)),
    }
}

fn expect_string(value: Value, field: &str) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(CoreError::Validation(format!(
            "'{field}' must be a string, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    fn input(body: Value) -> BookInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn truthiness_matches_presence_rules() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("0")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!({})));
    }

    #[test]
    fn new_book_requires_title_first() {
        let err = input(json!({})).into_new_book().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("'title' is required"));
    }

    #[test]
    fn new_book_requires_quantity_then_description() {
        let err = input(json!({"title": "Dune"})).into_new_book().unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("'quantity'"));

        let err = input(json!({"title": "Dune", "quantity": 3}))
            .into_new_book()
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("'description'"));
    }

    #[test]
    fn zero_quantity_counts_as_missing() {
        let err = input(json!({"title": "Dune", "quantity": 0, "description": "d"}))
            .into_new_book()
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("'quantity'"));
    }

    #[test]
    fn new_book_keeps_quantity_type() {
        let book = input(json!({"title": "Dune", "quantity": "7", "description": "d"}))
            .into_new_book()
            .unwrap();
        assert_eq!(book.quantity, json!("7"));
        assert_eq!(book.year, None);
        assert_eq!(book.image_url, None);
    }

    #[test]
    fn non_string_title_is_rejected() {
        let err = input(json!({"title": 12, "quantity": 1, "description": "d"}))
            .into_new_book()
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.contains("'title' must be a string"));
    }

    #[test]
    fn target_id_requires_truthy_integer() {
        assert_matches!(input(json!({})).target_id(), Err(CoreError::Validation(_)));
        assert_matches!(input(json!({"id": 0})).target_id(), Err(CoreError::Validation(_)));
        assert_matches!(input(json!({"id": null})).target_id(), Err(CoreError::Validation(_)));
        assert_matches!(input(json!({"id": "2"})).target_id(), Err(CoreError::Validation(_)));
        assert_matches!(input(json!({"id": 2.5})).target_id(), Err(CoreError::Validation(_)));
        assert_eq!(input(json!({"id": 2})).target_id().unwrap(), 2);
        assert_eq!(input(json!({"id": 2.0})).target_id().unwrap(), 2);
    }

    #[test]
    fn null_is_distinct_from_absent() {
        let body = input(json!({"id": 2, "year": null}));
        assert_eq!(body.year, Some(Value::Null));
        assert_eq!(body.quantity, None);
    }

    #[test]
    fn null_in_update_overwrites_field() {
        let mut book = Book {
            id: 2,
            title: "Foo".into(),
            year: Some(json!(1999)),
            quantity: json!(5),
            image_url: None,
            description: "d".into(),
        };
        let patch = input(json!({"id": 2, "year": null})).into_patch().unwrap();
        book.apply(patch);

        assert_eq!(book.year, Some(Value::Null));
        assert_eq!(book.quantity, json!(5));
        assert_eq!(
            serde_json::to_value(&book).unwrap()["year"],
            Value::Null,
            "an explicit null is persisted"
        );
    }

    #[test]
    fn null_is_missing_on_creation() {
        let err = input(json!({"title": null, "quantity": 1, "description": "d"}))
            .into_new_book()
            .unwrap_err();
        assert_matches!(err, CoreError::Validation(msg) if msg.starts_with("'title' is required"));
    }

    #[test]
    fn image_url_accepts_any_json_value() {
        let book = input(json!({"title": "Dune", "quantity": 1, "description": "d", "imageURL": 5}))
            .into_new_book()
            .unwrap()
            .with_id(1);
        assert_eq!(book.image_url, Some(json!(5)));

        let patch = input(json!({"id": 1, "imageURL": {"src": "a.png"}}))
            .into_patch()
            .unwrap();
        assert_eq!(patch.image_url, Some(json!({"src": "a.png"})));

        let text = serde_json::to_string(&book).unwrap();
        let reloaded: Book = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded, book);
    }

    #[test]
    fn stored_nulls_survive_a_reload() {
        let text = r#"{"id":3,"title":"t","year":null,"quantity":1,"imageURL":null,"description":"d"}"#;
        let book: Book = serde_json::from_str(text).unwrap();
        assert_eq!(book.year, Some(Value::Null));
        assert_eq!(book.image_url, Some(Value::Null));
        assert_eq!(serde_json::to_string(&book).unwrap(), text);
    }

    #[test]
    fn apply_only_touches_supplied_fields() {
        let mut book = Book {
            id: 2,
            title: "Foo".into(),
            year: Some(json!(1999)),
            quantity: json!(5),
            image_url: Some(json!("http://img")),
            description: "d".into(),
        };
        let patch = input(json!({"id": 2, "quantity": 9})).into_patch().unwrap();
        book.apply(patch);

        assert_eq!(book.quantity, json!(9));
        assert_eq!(book.title, "Foo");
        assert_eq!(book.year, Some(json!(1999)));
        assert_eq!(book.image_url, Some(json!("http://img")));
        assert_eq!(book.description, "d");
    }

    #[test]
    fn serialization_omits_absent_optionals_and_keeps_key_order() {
        let book = NewBook {
            title: "Dune".into(),
            year: None,
            quantity: json!(3),
            image_url: None,
            description: "sci-fi".into(),
        }
        .with_id(1);

        let text = serde_json::to_string(&book).unwrap();
        assert_eq!(
            text,
            r#"{"id":1,"title":"Dune","quantity":3,"description":"sci-fi"}"#
        );
    }

    #[test]
    fn path_id_parsing() {
        assert_eq!(parse_path_id("5").unwrap(), 5);
        assert_matches!(parse_path_id(" "), Err(CoreError::Validation(msg)) if msg.contains("required"));
        assert_matches!(parse_path_id("five"), Err(CoreError::Validation(msg)) if msg.contains("integer"));
    }
}
