//! Core request data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of a request. Assigned monotonically, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Priority
// ============================================================================

/// Priority class of a request.
///
/// The derived ordering is the service order: `Emergency` is the highest
/// class and is served first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Regular walk-in customer ("general" token).
    #[serde(alias = "general")]
    Normal,
    /// Paying premium customers and senior citizens share this rank.
    #[serde(alias = "senior")]
    Premium,
    /// VIP reservations.
    Vip,
    /// Emergencies, always at the head of the line.
    Emergency,
}

impl Priority {
    /// All priority classes, highest first.
    pub const ALL: [Priority; 4] = [
        Priority::Emergency,
        Priority::Vip,
        Priority::Premium,
        Priority::Normal,
    ];

    /// Factor applied to the base wait estimate for expedited handling.
    pub fn wait_factor(&self) -> f64 {
        match self {
            Priority::Emergency => 0.2,
            Priority::Vip => 0.5,
            Priority::Premium => 0.7,
            Priority::Normal => 1.0,
        }
    }

    /// Returns the priority as a lowercase label (used for metrics and filtering).
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Premium => "premium",
            Priority::Vip => "vip",
            Priority::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown priority label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPriority(pub String);

impl fmt::Display for UnknownPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown priority: {}", self.0)
    }
}

impl std::error::Error for UnknownPriority {}

impl FromStr for Priority {
    type Err = UnknownPriority;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "general" => Ok(Priority::Normal),
            "premium" | "senior" => Ok(Priority::Premium),
            "vip" => Ok(Priority::Vip),
            "emergency" => Ok(Priority::Emergency),
            _ => Err(UnknownPriority(s.to_string())),
        }
    }
}

// ============================================================================
// Category
// ============================================================================

/// Service category of a request (e.g. `flight`, `hotel`, `loan`).
///
/// Only compared for equality against counter specializations. Stored
/// trimmed and lowercased so `"Flight "` and `"flight"` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(String);

impl Category {
    /// Normalize a category tag. Returns `None` for an empty tag.
    pub fn new(tag: impl AsRef<str>) -> Option<Self> {
        let normalized = tag.as_ref().trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle status of a request.
///
/// ```text
/// Pending -> Assigned -> InService -> Completed
///               |            |
///               +------------+-----> Cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    /// Waiting in the queue.
    Pending,
    /// Pulled by a counter, customer called.
    Assigned,
    /// Counter is serving the customer.
    InService,
    /// Served successfully (terminal).
    Completed,
    /// Dropped at the counter (terminal).
    Cancelled,
}

impl RequestStatus {
    /// Returns true if no further transitions are possible.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Completed | RequestStatus::Cancelled)
    }

    /// Returns true while the request occupies a counter.
    pub fn is_at_counter(&self) -> bool {
        matches!(self, RequestStatus::Assigned | RequestStatus::InService)
    }

    /// Returns true if the request can be cancelled from this status.
    pub fn can_cancel(&self) -> bool {
        self.is_at_counter()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::InService => "in_service",
            RequestStatus::Completed => "completed",
            RequestStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Request
// ============================================================================

/// Display-only customer information. Never interpreted by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    /// Event, flight, train or service name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Free-form scheduled date/time as typed by the customer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheduled_for: Option<String>,
}

impl RequestMetadata {
    pub fn customer(name: impl Into<String>) -> Self {
        Self {
            customer_name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn with_event(mut self, event_name: impl Into<String>) -> Self {
        self.event_name = Some(event_name.into());
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn with_contact(mut self, email: impl Into<String>, phone: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self.phone = Some(phone.into());
        self
    }

    pub fn with_schedule(mut self, scheduled_for: impl Into<String>) -> Self {
        self.scheduled_for = Some(scheduled_for.into());
        self
    }
}

/// A reservation or service ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: RequestId,

    pub priority: Priority,

    /// Matched against counter specializations.
    pub category: Category,

    /// Number of tickets or seats.
    pub quantity: u32,

    /// Total price, recognized as revenue on completion only.
    pub amount: f64,

    pub status: RequestStatus,

    pub submitted_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub service_started_at: Option<DateTime<Utc>>,

    /// When the request reached a terminal status (completed or cancelled).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,

    /// Advisory estimate computed at submission, never updated.
    pub estimated_wait_minutes: u32,

    #[serde(default)]
    pub metadata: RequestMetadata,
}

impl Request {
    /// Confirmation number printed on the ticket.
    pub fn confirmation_code(&self) -> String {
        format!("TKT{}", self.id)
    }
}

/// Input for submitting a new request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewRequest {
    pub category: String,
    pub priority: Priority,
    pub quantity: u32,
    pub amount: f64,
    #[serde(default)]
    pub metadata: RequestMetadata,
}

impl NewRequest {
    /// Create a request with no metadata.
    pub fn new(category: impl Into<String>, priority: Priority, quantity: u32, amount: f64) -> Self {
        Self {
            category: category.into(),
            priority,
            quantity,
            amount,
            metadata: RequestMetadata::default(),
        }
    }

    pub fn with_metadata(mut self, metadata: RequestMetadata) -> Self {
        self.metadata = metadata;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_total_order() {
        assert!(Priority::Emergency > Priority::Vip);
        assert!(Priority::Vip > Priority::Premium);
        assert!(Priority::Premium > Priority::Normal);
    }

    #[test]
    fn test_priority_all_is_highest_first() {
        let mut sorted = Priority::ALL.to_vec();
        sorted.sort_by(|a, b| b.cmp(a));
        assert_eq!(sorted, Priority::ALL.to_vec());
    }

    #[test]
    fn test_priority_from_str_aliases() {
        assert_eq!("general".parse::<Priority>().unwrap(), Priority::Normal);
        assert_eq!("Senior".parse::<Priority>().unwrap(), Priority::Premium);
        assert_eq!(" VIP ".parse::<Priority>().unwrap(), Priority::Vip);
        assert_eq!("emergency".parse::<Priority>().unwrap(), Priority::Emergency);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_priority_deserialize_alias() {
        let p: Priority = serde_json::from_str("\"senior\"").unwrap();
        assert_eq!(p, Priority::Premium);
        let p: Priority = serde_json::from_str("\"vip\"").unwrap();
        assert_eq!(p, Priority::Vip);
    }

    #[test]
    fn test_wait_factors() {
        assert_eq!(Priority::Emergency.wait_factor(), 0.2);
        assert_eq!(Priority::Vip.wait_factor(), 0.5);
        assert_eq!(Priority::Premium.wait_factor(), 0.7);
        assert_eq!(Priority::Normal.wait_factor(), 1.0);
    }

    #[test]
    fn test_category_normalization() {
        assert_eq!(Category::new(" Flight ").unwrap().as_str(), "flight");
        assert!(Category::new("   ").is_none());
        assert_eq!(Category::new("HOTEL"), Category::new("hotel"));
    }

    #[test]
    fn test_status_predicates() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Pending.can_cancel());
        assert!(RequestStatus::Assigned.can_cancel());
        assert!(RequestStatus::InService.is_at_counter());
        assert!(RequestStatus::Completed.is_terminal());
        assert!(RequestStatus::Cancelled.is_terminal());
        assert!(!RequestStatus::Cancelled.can_cancel());
        assert_eq!(RequestStatus::InService.as_str(), "in_service");
    }

    #[test]
    fn test_new_request_deserialize_defaults_metadata() {
        let json = r#"{"category":"flight","priority":"premium","quantity":1,"amount":750.0}"#;
        let req: NewRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.priority, Priority::Premium);
        assert_eq!(req.metadata, RequestMetadata::default());
    }

    #[test]
    fn test_metadata_builder() {
        let meta = RequestMetadata::customer("Sarah Johnson")
            .with_contact("sarah.j@email.com", "555-0102")
            .with_event("Flight AA123")
            .with_location("New York to London")
            .with_schedule("2024-01-20 14:30");
        assert_eq!(meta.customer_name.as_deref(), Some("Sarah Johnson"));
        assert_eq!(meta.phone.as_deref(), Some("555-0102"));
        assert_eq!(meta.scheduled_for.as_deref(), Some("2024-01-20 14:30"));

        let json = serde_json::to_value(RequestMetadata::default()).unwrap();
        assert_eq!(json, serde_json::json!({}));
    }
}
