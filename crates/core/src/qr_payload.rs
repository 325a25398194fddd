//! QR payload text: building it from an article, and reading it back.
//!
//! Format: `Serial Number: <id>` followed by `<Label>: <value>` segments for
//! the selected fields in canonical order, all joined with `", "`.
//!
//! ```
//! use stockqr_core::qr_field::FieldSelection;
//! use stockqr_core::qr_payload::{build_payload, ArticleSnapshot};
//!
//! let article = ArticleSnapshot {
//!     serial_number: 7,
//!     name: Some("Bolt".into()),
//!     length: Some(5.0),
//!     ..Default::default()
//! };
//! let (selection, _) = FieldSelection::from_tokens(["nom"]);
//! assert_eq!(build_payload(&article, &selection), "Serial Number: 7, Name: Bolt");
//! ```

use serde::Serialize;

use crate::error::CoreError;
use crate::qr_field::{FieldSelection, QrField};
use crate::types::DbId;

/// Label of the mandatory leading segment.
pub const SERIAL_NUMBER_LABEL: &str = "Serial Number";

const SEGMENT_SEPARATOR: &str = ", ";
const LABEL_SEPARATOR: &str = ": ";

/// The article values a payload can carry.
///
/// Relational fields hold the referenced entity's name, or `None` when the
/// article has no such reference.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArticleSnapshot {
    pub serial_number: DbId,
    pub name: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub warehouse: Option<String>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
}

/// Build the payload for `article` embedding the fields in `selection`.
///
/// A selected scalar without a value still prints its label with an empty
/// value. A selected relational field without a reference is skipped.
pub fn build_payload(article: &ArticleSnapshot, selection: &FieldSelection) -> String {
    let mut segments = vec![segment(
        SERIAL_NUMBER_LABEL,
        &article.serial_number.to_string(),
    )];

    for field in selection.iter() {
        let value = match field {
            QrField::Name => Some(text(&article.name)),
            QrField::Length => Some(number(article.length)),
            QrField::Width => Some(number(article.width)),
            QrField::Height => Some(number(article.height)),
            QrField::Category => Some(text(&article.category)),
            QrField::Warehouse => article.warehouse.clone(),
            QrField::Manufacturer => article.manufacturer.clone(),
            QrField::Supplier => article.supplier.clone(),
        };
        if let Some(value) = value {
            segments.push(segment(field.label(), &value));
        }
    }

    segments.join(SEGMENT_SEPARATOR)
}

fn segment(label: &str, value: &str) -> String {
    format!("{label}{LABEL_SEPARATOR}{value}")
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

fn number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// What could be recovered from a scanned payload.
///
/// Only the fields that were embedded come back. Relational fields come
/// back as names; they are never resolved to ids here.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DecodedArticle {
    /// `None` when the serial number segment is not an integer.
    pub serial_number: Option<DbId>,
    pub name: Option<String>,
    pub length: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub category: Option<String>,
    pub warehouse: Option<String>,
    pub manufacturer: Option<String>,
    pub supplier: Option<String>,
    /// Labels found in the payload, i.e. the selection it was built with.
    pub fields: FieldSelection,
}

/// Parse a payload produced by [`build_payload`].
///
/// A segment that does not start with a known label is treated as part of
/// the previous value, so values containing `", "` survive. Numbers that do
/// not parse are dropped; the label still counts as selected.
pub fn parse_payload(payload: &str) -> Result<DecodedArticle, CoreError> {
    let prefix = format!("{SERIAL_NUMBER_LABEL}{LABEL_SEPARATOR}");
    let rest = payload.trim().strip_prefix(&prefix).ok_or_else(|| {
        CoreError::Validation(format!(
            "QR payload does not start with '{prefix}'"
        ))
    })?;

    let mut pieces = rest.split(SEGMENT_SEPARATOR);
    let mut serial = pieces.next().unwrap_or_default().to_string();
    let mut entries: Vec<(QrField, String)> = Vec::new();

    for piece in pieces {
        match labelled(piece) {
            Some((field, value)) => entries.push((field, value.to_string())),
            None => {
                let target = match entries.last_mut() {
                    Some((_, value)) => value,
                    None => &mut serial,
                };
                target.push_str(SEGMENT_SEPARATOR);
                target.push_str(piece);
            }
        }
    }

    let mut decoded = DecodedArticle {
        serial_number: serial.trim().parse().ok(),
        ..Default::default()
    };

    for (field, value) in entries {
        decoded.fields.insert(field);
        match field {
            QrField::Name => decoded.name = non_empty(value),
            QrField::Length => decoded.length = value.trim().parse().ok(),
            QrField::Width => decoded.width = value.trim().parse().ok(),
            QrField::Height => decoded.height = value.trim().parse().ok(),
            QrField::Category => decoded.category = non_empty(value),
            QrField::Warehouse => decoded.warehouse = non_empty(value),
            QrField::Manufacturer => decoded.manufacturer = non_empty(value),
            QrField::Supplier => decoded.supplier = non_empty(value),
        }
    }

    Ok(decoded)
}

fn labelled(piece: &str) -> Option<(QrField, &str)> {
    let (label, value) = piece.split_once(LABEL_SEPARATOR)?;
    QrField::from_label(label).map(|field| (field, value))
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
