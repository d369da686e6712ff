//! Lost and found item records.
//!
//! Items are written by the report flow and rewritten whole by updates.
//! They are never deleted; [`ItemStatus`] carries the soft state instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Error;

/// Validation errors raised while constructing item values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemValidationError {
    EmptyId,
    IdContainsWhitespace,
    UnknownKind { raw: String },
    UnknownStatus { raw: String },
}

impl fmt::Display for ItemValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "item id must not be empty"),
            Self::IdContainsWhitespace => {
                write!(f, "item id must not contain surrounding whitespace")
            }
            Self::UnknownKind { raw } => write!(f, "invalid item type: {raw}"),
            Self::UnknownStatus { raw } => write!(f, "invalid item status: {raw}"),
        }
    }
}

impl std::error::Error for ItemValidationError {}

impl From<ItemValidationError> for Error {
    fn from(value: ItemValidationError) -> Self {
        Self::invalid_argument(value.to_string())
    }
}

/// Document identifier shared by the record and its live projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ItemId(String);

impl ItemId {
    /// Validate and construct an [`ItemId`].
    pub fn new(id: impl Into<String>) -> Result<Self, ItemValidationError> {
        let raw = id.into();
        if raw.trim().is_empty() {
            return Err(ItemValidationError::EmptyId);
        }
        if raw.trim() != raw {
            return Err(ItemValidationError::IdContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for ItemId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<ItemId> for String {
    fn from(value: ItemId) -> Self {
        value.0
    }
}

impl TryFrom<String> for ItemId {
    type Error = ItemValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Which board an item was reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// Someone lost the item.
    Lost,
    /// Someone found the item.
    Found,
}

impl ItemKind {
    /// Both kinds, in display order.
    pub const ALL: [Self; 2] = [Self::Lost, Self::Found];

    /// Parse a kind, ignoring ASCII case.
    ///
    /// # Examples
    /// ```
    /// use lostfound::domain::ItemKind;
    ///
    /// assert_eq!(ItemKind::parse("FOUND"), Ok(ItemKind::Found));
    /// assert!(ItemKind::parse("bogus").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ItemValidationError> {
        match raw.to_ascii_lowercase().as_str() {
            "lost" => Ok(Self::Lost),
            "found" => Ok(Self::Found),
            _ => Err(ItemValidationError::UnknownKind {
                raw: raw.to_owned(),
            }),
        }
    }

    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lost => "lost",
            Self::Found => "found",
        }
    }

    /// Document collection holding the full records of this kind.
    pub fn collection(self) -> &'static str {
        match self {
            Self::Lost => "LostItems",
            Self::Found => "FoundItems",
        }
    }

    /// Live-view path holding the projections of this kind.
    pub fn live_path(self) -> &'static str {
        match self {
            Self::Lost => "LostLiveItems",
            Self::Found => "FoundLiveItems",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemKind {
    type Err = ItemValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Soft state of an item; records are never deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemStatus {
    /// Visible and open.
    #[default]
    Active,
    /// Returned to its owner.
    Claimed,
    /// Withdrawn by the reporter.
    Deactivated,
}

impl ItemStatus {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Claimed => "claimed",
            Self::Deactivated => "deactivated",
        }
    }
}

impl FromStr for ItemStatus {
    type Err = ItemValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "active" => Ok(Self::Active),
            "claimed" => Ok(Self::Claimed),
            "deactivated" => Ok(Self::Deactivated),
            _ => Err(ItemValidationError::UnknownStatus { raw: s.to_owned() }),
        }
    }
}

/// Full item record stored in the document collection.
///
/// Serialised in camelCase; `kind` travels as `type`, `owner_id` as
/// `userId` and the creation time as `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub description: String,
    pub location: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(rename = "userId")]
    pub owner_id: String,
    #[serde(rename = "timestamp")]
    pub created_at_millis: i64,
    #[serde(default)]
    pub status: ItemStatus,
}

impl Item {
    /// Build a freshly reported, active item with a generated id.
    pub fn new(
        kind: ItemKind,
        owner_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        created_at_millis: i64,
    ) -> Self {
        Self {
            id: ItemId::generate(),
            title: title.into(),
            description: description.into(),
            location: location.into(),
            kind,
            owner_id: owner_id.into(),
            created_at_millis,
            status: ItemStatus::Active,
        }
    }

    /// Return the record rewritten with a new status.
    #[must_use]
    pub fn with_status(self, status: ItemStatus) -> Self {
        Self { status, ..self }
    }

    /// Reduced projection mirrored to the live view.
    pub fn projection(&self) -> LiveProjection {
        LiveProjection {
            title: self.title.clone(),
            kind: self.kind,
            status: self.status,
        }
    }
}

/// Reduced-field mirror of an [`Item`] kept in the low-latency store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveProjection {
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    pub status: ItemStatus,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use serde_json::json;

    fn sample_item() -> Item {
        Item {
            id: ItemId::new("item-1").expect("valid id"),
            title: "Blue umbrella".to_owned(),
            description: "Left under a desk".to_owned(),
            location: "Library, 2nd floor".to_owned(),
            kind: ItemKind::Lost,
            owner_id: "ada@campus.edu".to_owned(),
            created_at_millis: 1_700_000_000_000,
            status: ItemStatus::Active,
        }
    }

    #[rstest]
    #[case("lost", ItemKind::Lost)]
    #[case("Found", ItemKind::Found)]
    #[case("LOST", ItemKind::Lost)]
    fn kind_parse_ignores_case(#[case] raw: &str, #[case] expected: ItemKind) {
        assert_eq!(ItemKind::parse(raw), Ok(expected));
    }

    #[rstest]
    #[case("bogus")]
    #[case("")]
    #[case("deactivate")]
    fn unknown_kind_maps_to_invalid_argument(#[case] raw: &str) {
        let error: Error = ItemKind::parse(raw).expect_err("kind rejected").into();
        assert_eq!(error.code(), ErrorCode::InvalidArgument);
    }

    #[rstest]
    #[case("", ItemValidationError::EmptyId)]
    #[case(" padded ", ItemValidationError::IdContainsWhitespace)]
    fn item_id_rejects_malformed_input(#[case] raw: &str, #[case] expected: ItemValidationError) {
        assert_eq!(ItemId::new(raw), Err(expected));
    }

    #[rstest]
    fn generated_ids_are_distinct() {
        assert_ne!(ItemId::generate(), ItemId::generate());
    }

    #[rstest]
    fn record_uses_document_field_names() {
        let value = serde_json::to_value(sample_item()).expect("serialise");
        assert_eq!(
            value,
            json!({
                "id": "item-1",
                "title": "Blue umbrella",
                "description": "Left under a desk",
                "location": "Library, 2nd floor",
                "type": "lost",
                "userId": "ada@campus.edu",
                "timestamp": 1_700_000_000_000_i64,
                "status": "active"
            })
        );
    }

    #[rstest]
    fn missing_status_defaults_to_active() {
        let item: Item = serde_json::from_value(json!({
            "id": "item-2",
            "title": "Keys",
            "description": "",
            "location": "Gym",
            "type": "found",
            "userId": "bob@campus.edu",
            "timestamp": 0
        }))
        .expect("deserialise");
        assert_eq!(item.status, ItemStatus::Active);
    }

    #[rstest]
    fn projection_keeps_title_kind_and_status() {
        let item = sample_item().with_status(ItemStatus::Claimed);
        let projection = item.projection();
        assert_eq!(projection.title, "Blue umbrella");
        assert_eq!(projection.kind, ItemKind::Lost);
        assert_eq!(projection.status, ItemStatus::Claimed);
    }

    #[rstest]
    fn new_items_start_active() {
        let item = Item::new(ItemKind::Found, "bob@campus.edu", "Keys", "", "Gym", 5);
        assert_eq!(item.status, ItemStatus::Active);
        assert_eq!(item.kind, ItemKind::Found);
        assert_eq!(item.created_at_millis, 5);
    }
}
