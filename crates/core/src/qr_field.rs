//! Closed vocabulary of article fields that may be embedded in a QR payload.
//!
//! Tokens arrive from form submissions and from the `qr_fields` column.
//! Both the English tokens and the legacy French ones (`nom`, `longueur`,
//! ...) are accepted. Anything else is ignored rather than rejected, and
//! handed back to the caller so it can be logged.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One optional article attribute eligible for inclusion in a QR payload.
///
/// Declaration order is the canonical payload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QrField {
    Name,
    Length,
    Width,
    Height,
    Category,
    Warehouse,
    Manufacturer,
    Supplier,
}

impl QrField {
    /// Every field in canonical payload order.
    pub const ALL: [QrField; 8] = [
        QrField::Name,
        QrField::Length,
        QrField::Width,
        QrField::Height,
        QrField::Category,
        QrField::Warehouse,
        QrField::Manufacturer,
        QrField::Supplier,
    ];

    /// Canonical token, as stored in `articles.qr_fields`.
    pub fn token(self) -> &'static str {
        match self {
            QrField::Name => "name",
            QrField::Length => "length",
            QrField::Width => "width",
            QrField::Height => "height",
            QrField::Category => "category",
            QrField::Warehouse => "warehouse",
            QrField::Manufacturer => "manufacturer",
            QrField::Supplier => "supplier",
        }
    }

    /// Legacy form token accepted as an alias of [`QrField::token`].
    fn legacy_token(self) -> &'static str {
        match self {
            QrField::Name => "nom",
            QrField::Length => "longueur",
            QrField::Width => "largeur",
            QrField::Height => "hauteur",
            QrField::Category => "categorie",
            QrField::Warehouse => "entrepot",
            QrField::Manufacturer => "fabricant",
            QrField::Supplier => "fournisseur",
        }
    }

    /// Human-readable label printed in front of the value in a payload.
    pub fn label(self) -> &'static str {
        match self {
            QrField::Name => "Name",
            QrField::Length => "Length",
            QrField::Width => "Width",
            QrField::Height => "Height",
            QrField::Category => "Category",
            QrField::Warehouse => "Warehouse",
            QrField::Manufacturer => "Manufacturer",
            QrField::Supplier => "Supplier",
        }
    }

    /// `true` for fields that point at another entity and are only printed
    /// when the reference is present.
    pub fn is_relational(self) -> bool {
        matches!(
            self,
            QrField::Warehouse | QrField::Manufacturer | QrField::Supplier
        )
    }

    /// Parse a form token. Surrounding whitespace is ignored, case is not.
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|f| f.token() == token || f.legacy_token() == token)
    }

    /// Parse a payload label (`"Name"`, `"Warehouse"`, ...).
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.label() == label)
    }
}

impl fmt::Display for QrField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// The set of fields chosen for one article.
///
/// Iteration always follows canonical order, whatever order the fields were
/// inserted in. Serializes as a list of canonical tokens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldSelection(BTreeSet<QrField>);

impl FieldSelection {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a selection from raw tokens.
    ///
    /// Returns the selection together with the tokens that matched nothing
    /// in the vocabulary. Duplicates collapse.
    pub fn from_tokens<I, S>(tokens: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selection = Self::empty();
        let mut ignored = Vec::new();
        for token in tokens {
            match QrField::from_token(token.as_ref()) {
                Some(field) => selection.insert(field),
                None => ignored.push(token.as_ref().to_string()),
            }
        }
        (selection, ignored)
    }

    pub fn insert(&mut self, field: QrField) {
        self.0.insert(field);
    }

    pub fn contains(&self, field: QrField) -> bool {
        self.0.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Selected fields in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = QrField> + '_ {
        self.0.iter().copied()
    }

    /// Canonical tokens, for persisting.
    pub fn to_tokens(&self) -> Vec<String> {
        self.iter().map(|f| f.token().to_string()).collect()
    }
}

impl FromIterator<QrField> for FieldSelection {
    fn from_iter<T: IntoIterator<Item = QrField>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
