//! Orders and the rules for changing them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::id::{OrderId, UserId};
use super::status::OrderStatus;

/// Suggested jewelry types for admin forms. Not enforced.
pub const JEWELRY_TYPES: [&str; 9] = [
    "Ring",
    "Earrings",
    "Bracelet",
    "Necklace",
    "Pendant",
    "Brooch",
    "Cufflinks",
    "Chain",
    "Locket",
];

/// Suggested materials for admin forms. Not enforced.
pub const MATERIALS: [&str; 10] = [
    "White gold 585",
    "White gold 750",
    "Yellow gold 585",
    "Yellow gold 750",
    "Red gold 585",
    "Red gold 750",
    "Silver 925",
    "Silver 999",
    "Platinum 950",
    "Palladium 950",
];

/// A jewelry production order as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: OrderStatus,
    pub jewelry_type: Option<String>,
    pub material: Option<String>,
    pub carat: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Values for a new order row. `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    pub user_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub status: OrderStatus,
    pub jewelry_type: Option<String>,
    pub material: Option<String>,
    pub carat: Option<String>,
}

impl NewOrder {
    /// The three orders a customer sees on their first visit.
    #[must_use]
    pub fn samples_for(user_id: UserId) -> [Self; 3] {
        [
            Self {
                user_id,
                title: "Wedding ring with diamonds".to_owned(),
                description: Some(
                    "Classic wedding ring in white gold with diamond accents".to_owned(),
                ),
                status: OrderStatus::Design,
                jewelry_type: Some("Ring".to_owned()),
                material: Some("White gold 585".to_owned()),
                carat: Some("0.5".to_owned()),
            },
            Self {
                user_id,
                title: "Sapphire stud earrings".to_owned(),
                description: Some(
                    "Elegant stud earrings in yellow gold with natural sapphires".to_owned(),
                ),
                status: OrderStatus::Polishing,
                jewelry_type: Some("Earrings".to_owned()),
                material: Some("Yellow gold 750".to_owned()),
                carat: Some("1.2".to_owned()),
            },
            Self {
                user_id,
                title: "Platinum bracelet".to_owned(),
                description: Some("Exquisite platinum bracelet with engraving".to_owned()),
                status: OrderStatus::Completed,
                jewelry_type: Some("Bracelet".to_owned()),
                material: Some("Platinum 950".to_owned()),
                carat: Some("0".to_owned()),
            },
        ]
    }
}

/// Why an [`OrderPatch`] cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatchError {
    /// None of the mutable fields were supplied.
    #[error("No valid fields to update")]
    Empty,
    /// A required column was supplied but blank.
    #[error("{0} cannot be empty")]
    BlankField(&'static str),
}

/// Partial update to an order, restricted to the mutable-field allow-list.
///
/// Deserializing from a request body reads only the allow-listed keys; any
/// other key is dropped. For the optional descriptive columns the outer
/// `Option` records presence and the inner one the value, so `"carat": null`
/// clears the column while a missing `carat` leaves it alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct OrderPatch {
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub jewelry_type: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub material: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub carat: Option<Option<String>>,
}

/// Marks a field as present even when its value is `null`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl OrderPatch {
    /// Fields an admin may change after creation.
    pub const MUTABLE_FIELDS: [&'static str; 6] = [
        "status",
        "title",
        "description",
        "jewelry_type",
        "material",
        "carat",
    ];

    /// Names of the fields this patch will write.
    #[must_use]
    pub fn present_fields(&self) -> Vec<&'static str> {
        let flags = [
            self.status.is_some(),
            self.title.is_some(),
            self.description.is_some(),
            self.jewelry_type.is_some(),
            self.material.is_some(),
            self.carat.is_some(),
        ];

        Self::MUTABLE_FIELDS
            .into_iter()
            .zip(flags)
            .filter_map(|(name, present)| present.then_some(name))
            .collect()
    }

    /// True when no allow-listed field was supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Validate and normalize the patch before it reaches the store.
    ///
    /// Blank descriptive values become `NULL`; blank `title` or `status` are
    /// rejected since both columns are required. `title` and `status` are
    /// trimmed the same way a create request trims them.
    ///
    /// # Errors
    ///
    /// Returns [`PatchError::Empty`] when nothing would change and
    /// [`PatchError::BlankField`] for a blank required column.
    pub fn normalize(self) -> Result<Self, PatchError> {
        if self.is_empty() {
            return Err(PatchError::Empty);
        }

        if self.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(PatchError::BlankField("title"));
        }

        if self
            .status
            .as_ref()
            .is_some_and(|s| s.as_str().trim().is_empty())
        {
            return Err(PatchError::BlankField("status"));
        }

        Ok(Self {
            status: self
                .status
                .map(|s| OrderStatus::from(s.as_str().trim().to_owned())),
            title: self.title.map(|t| t.trim().to_owned()),
            description: self.description.map(blank_to_none),
            jewelry_type: self.jewelry_type.map(blank_to_none),
            material: self.material.map(blank_to_none),
            carat: self.carat.map(blank_to_none),
        })
    }
}

/// Treat blank optional text as absent.
#[must_use]
pub fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Counters shown above an order listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub total: usize,
    pub in_production: usize,
    pub completed: usize,
}

impl OrderSummary {
    #[must_use]
    pub fn from_orders(orders: &[Order]) -> Self {
        orders.iter().fold(Self::default(), |mut summary, order| {
            summary.total += 1;
            if order.status.is_in_production() {
                summary.in_production += 1;
            }
            if order.status.is_completed() {
                summary.completed += 1;
            }
            summary
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn order_with_status(status: &str) -> Order {
        Order {
            id: OrderId::new(Uuid::new_v4()),
            user_id: UserId::new(Uuid::nil()),
            title: "Signet ring".to_string(),
            description: None,
            status: OrderStatus::parse(status),
            jewelry_type: None,
            material: None,
            carat: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_patch_ignores_unknown_fields() {
        let patch: OrderPatch = serde_json::from_str(r#"{"color": "red"}"#).unwrap();
        assert!(patch.is_empty());
        assert_eq!(patch.normalize(), Err(PatchError::Empty));
    }

    #[test]
    fn test_patch_status_only() {
        let patch: OrderPatch =
            serde_json::from_str(r#"{"status": "completed", "user_id": "x"}"#).unwrap();
        assert_eq!(patch.present_fields(), vec!["status"]);
        let patch = patch.normalize().unwrap();
        assert_eq!(patch.status, Some(OrderStatus::Completed));
        assert_eq!(patch.description, None);
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: OrderPatch =
            serde_json::from_str(r#"{"carat": null, "material": "Silver 925"}"#).unwrap();
        assert_eq!(patch.carat, Some(None));
        assert_eq!(patch.material, Some(Some("Silver 925".to_string())));
        assert_eq!(patch.jewelry_type, None);
        assert_eq!(patch.present_fields(), vec!["material", "carat"]);
    }

    #[test]
    fn test_patch_normalizes_blank_optional_fields() {
        let patch: OrderPatch = serde_json::from_str(r#"{"description": "  "}"#).unwrap();
        let patch = patch.normalize().unwrap();
        assert_eq!(patch.description, Some(None));
    }

    #[test]
    fn test_patch_rejects_blank_title_and_status() {
        let patch: OrderPatch = serde_json::from_str(r#"{"title": ""}"#).unwrap();
        assert_eq!(patch.normalize(), Err(PatchError::BlankField("title")));

        let patch: OrderPatch = serde_json::from_str(r#"{"status": " "}"#).unwrap();
        assert_eq!(patch.normalize(), Err(PatchError::BlankField("status")));
    }

    #[test]
    fn test_patch_trims_title_and_status() {
        let patch: OrderPatch =
            serde_json::from_str(r#"{"title": "  Ring  ", "status": " completed "}"#).unwrap();
        let patch = patch.normalize().unwrap();
        assert_eq!(patch.title.as_deref(), Some("Ring"));
        assert_eq!(patch.status, Some(OrderStatus::Completed));
        assert!(patch.status.unwrap().is_completed());
    }

    #[test]
    fn test_null_title_counts_as_absent() {
        let patch: OrderPatch = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert!(patch.is_empty());
    }

    #[test]
    fn test_summary_counts_buckets() {
        let orders = vec![
            order_with_status("design"),
            order_with_status("casting"),
            order_with_status("in_progress"),
            order_with_status("quality_check"),
            order_with_status("completed"),
            order_with_status("engraving"),
        ];

        let summary = OrderSummary::from_orders(&orders);
        assert_eq!(
            summary,
            OrderSummary {
                total: 6,
                in_production: 3,
                completed: 1,
            }
        );
    }

    #[test]
    fn test_summary_of_empty_listing() {
        assert_eq!(OrderSummary::from_orders(&[]), OrderSummary::default());
    }

    #[test]
    fn test_samples_belong_to_user() {
        let user_id = UserId::new(Uuid::new_v4());
        let samples = NewOrder::samples_for(user_id);
        assert!(samples.iter().all(|o| o.user_id == user_id));
        let statuses: Vec<_> = samples.iter().map(|o| o.status.as_str()).collect();
        assert_eq!(statuses, vec!["design", "polishing", "completed"]);
    }

    #[test]
    fn test_blank_to_none() {
        assert_eq!(blank_to_none(Some(String::new())), None);
        assert_eq!(blank_to_none(Some(" \t".to_string())), None);
        assert_eq!(blank_to_none(None), None);
        assert_eq!(
            blank_to_none(Some("0.5".to_string())),
            Some("0.5".to_string())
        );
    }
}
