//! Order production status.
//!
//! The vocabulary is closed for display purposes only. The order store keeps
//! status as free text, so any string read back from it must round-trip and
//! render: unknown values are carried in [`OrderStatus::Other`] and shown
//! verbatim. There is no transition graph; an admin may move an order from
//! any status to any other.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Production stage of an order.
///
/// Serialized as the plain status string (`"quality_check"`, `"design"`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    Design,
    Casting,
    Polishing,
    Setting,
    QualityCheck,
    Completed,
    Created,
    InProgress,
    Pending,
    /// A value outside the known vocabulary, kept as stored.
    Other(String),
}

impl OrderStatus {
    /// Every known status, in display order.
    pub const KNOWN: [Self; 9] = [
        Self::Design,
        Self::Casting,
        Self::Polishing,
        Self::Setting,
        Self::QualityCheck,
        Self::Completed,
        Self::Created,
        Self::InProgress,
        Self::Pending,
    ];

    /// Parse a stored status string. Never fails.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s {
            "design" => Self::Design,
            "casting" => Self::Casting,
            "polishing" => Self::Polishing,
            "setting" => Self::Setting,
            "quality_check" => Self::QualityCheck,
            "completed" => Self::Completed,
            "created" => Self::Created,
            "in_progress" => Self::InProgress,
            "pending" => Self::Pending,
            other => Self::Other(other.to_owned()),
        }
    }

    /// The stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Design => "design",
            Self::Casting => "casting",
            Self::Polishing => "polishing",
            Self::Setting => "setting",
            Self::QualityCheck => "quality_check",
            Self::Completed => "completed",
            Self::Created => "created",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
            Self::Other(raw) => raw,
        }
    }

    /// Human-readable label. Unknown statuses fall back to the raw value.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Design => "Design",
            Self::Casting => "Casting",
            Self::Polishing => "Polishing",
            Self::Setting => "Setting",
            Self::QualityCheck => "Quality check",
            Self::Completed => "Completed",
            Self::Created => "Created",
            Self::InProgress => "In progress",
            Self::Pending => "Pending",
            Self::Other(raw) => raw,
        }
    }

    /// Whether this status is part of the known vocabulary.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    /// Whether the order counts as "in production" in summary views.
    #[must_use]
    pub const fn is_in_production(&self) -> bool {
        matches!(
            self,
            Self::InProgress | Self::Casting | Self::Polishing | Self::Setting | Self::QualityCheck
        )
    }

    /// Whether the order counts as completed in summary views.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Statuses offered when an admin creates or edits an order.
    ///
    /// `pending` stays readable but is not offered for new assignments.
    pub fn selectable() -> impl Iterator<Item = Self> {
        Self::KNOWN
            .into_iter()
            .filter(|status| !matches!(status, Self::Pending))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        match Self::parse(&value) {
            Self::Other(_) => Self::Other(value),
            known => known,
        }
    }
}

impl From<&str> for OrderStatus {
    fn from(value: &str) -> Self {
        Self::parse(value)
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Other(raw) => raw,
            known => known.as_str().to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_round_trip() {
        for status in OrderStatus::KNOWN {
            assert_eq!(OrderStatus::parse(status.as_str()), status);
            assert!(status.is_known());
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(OrderStatus::QualityCheck.label(), "Quality check");
        assert_eq!(OrderStatus::InProgress.label(), "In progress");
        assert_eq!(OrderStatus::Design.label(), "Design");
    }

    #[test]
    fn test_unknown_status_passes_through() {
        let status = OrderStatus::parse("engraving");
        assert_eq!(status, OrderStatus::Other("engraving".to_string()));
        assert_eq!(status.as_str(), "engraving");
        assert_eq!(status.label(), "engraving");
        assert!(!status.is_known());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        // The store compares exact strings, so "Design" is not "design".
        assert!(!OrderStatus::parse("Design").is_known());
    }

    #[test]
    fn test_in_production_bucket() {
        let in_production: Vec<_> = OrderStatus::KNOWN
            .into_iter()
            .filter(OrderStatus::is_in_production)
            .collect();

        assert_eq!(
            in_production,
            vec![
                OrderStatus::Casting,
                OrderStatus::Polishing,
                OrderStatus::Setting,
                OrderStatus::QualityCheck,
                OrderStatus::InProgress,
            ]
        );
        assert!(!OrderStatus::Design.is_in_production());
        assert!(!OrderStatus::parse("engraving").is_in_production());
    }

    #[test]
    fn test_completed_bucket() {
        let completed: Vec<_> = OrderStatus::KNOWN
            .into_iter()
            .filter(OrderStatus::is_completed)
            .collect();
        assert_eq!(completed, vec![OrderStatus::Completed]);
    }

    #[test]
    fn test_selectable_excludes_pending() {
        let selectable: Vec<_> = OrderStatus::selectable().collect();
        assert_eq!(selectable.len(), 8);
        assert!(!selectable.contains(&OrderStatus::Pending));
        assert_eq!(selectable.first(), Some(&OrderStatus::Design));
    }

    #[test]
    fn test_serde_uses_plain_strings() {
        let json = serde_json::to_string(&OrderStatus::QualityCheck).unwrap();
        assert_eq!(json, "\"quality_check\"");

        let parsed: OrderStatus = serde_json::from_str("\"resizing\"").unwrap();
        assert_eq!(parsed, OrderStatus::Other("resizing".to_string()));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "\"resizing\"");
    }
}
