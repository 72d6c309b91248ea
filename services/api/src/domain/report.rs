//! Report types and lifecycle states.

use serde::{Deserialize, Serialize};
use sos_id::UserId;

use super::ValidationError;

/// Incident category of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportType {
    Medical,
    Fire,
    Accident,
    Crime,
    NaturalDisaster,
    Other,
}

impl ReportType {
    pub fn parse(s: &str) -> Option<ReportType> {
        match s {
            "medical" => Some(ReportType::Medical),
            "fire" => Some(ReportType::Fire),
            "accident" => Some(ReportType::Accident),
            "crime" => Some(ReportType::Crime),
            "natural_disaster" => Some(ReportType::NaturalDisaster),
            "other" => Some(ReportType::Other),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Medical => "medical",
            ReportType::Fire => "fire",
            ReportType::Accident => "accident",
            ReportType::Crime => "crime",
            ReportType::NaturalDisaster => "natural_disaster",
            ReportType::Other => "other",
        }
    }
}

/// Lifecycle state of a report.
///
/// Reports start in `pending` and move forward only:
/// `pending → in_progress → resolved`. `cancelled` is a terminal state kept in
/// the enum and the storage constraint but currently driven by no operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Pending,
    InProgress,
    Resolved,
    Cancelled,
}

impl ReportStatus {
    pub fn parse(s: &str) -> Option<ReportStatus> {
        match s {
            "pending" => Some(ReportStatus::Pending),
            "in_progress" => Some(ReportStatus::InProgress),
            "resolved" => Some(ReportStatus::Resolved),
            "cancelled" => Some(ReportStatus::Cancelled),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportStatus::Pending => "pending",
            ReportStatus::InProgress => "in_progress",
            ReportStatus::Resolved => "resolved",
            ReportStatus::Cancelled => "cancelled",
        }
    }

    /// Whether no further transition leaves this state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ReportStatus::Resolved | ReportStatus::Cancelled)
    }
}

/// A validated report creation request.
#[derive(Debug, Clone)]
pub struct NewReport {
    pub user_id: UserId,
    pub report_type: ReportType,
    pub location: String,
    pub description: String,
}

impl NewReport {
    /// Validates raw request input into a well-formed report.
    ///
    /// Location and description are required to be non-empty; the type must
    /// name a defined category.
    pub fn parse(
        user_id: UserId,
        report_type: &str,
        location: String,
        description: String,
    ) -> Result<NewReport, ValidationError> {
        let report_type = ReportType::parse(report_type).ok_or_else(|| {
            ValidationError::new("type", format!("unknown report type '{report_type}'"))
        })?;

        if location.is_empty() {
            return Err(ValidationError::new("location", "location is required"));
        }

        if description.is_empty() {
            return Err(ValidationError::new(
                "description",
                "description is required",
            ));
        }

        Ok(NewReport {
            user_id,
            report_type,
            location,
            description,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_report_accepts_valid_input() {
        let report = NewReport::parse(
            UserId::new(1),
            "fire",
            "Rue de la Kasbah 12".to_string(),
            "Smoke from the second floor".to_string(),
        )
        .unwrap();
        assert_eq!(report.report_type, ReportType::Fire);
    }

    #[test]
    fn new_report_rejects_empty_location() {
        let err = NewReport::parse(
            UserId::new(1),
            "medical",
            String::new(),
            "Person collapsed".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.field, "location");
    }

    #[test]
    fn new_report_rejects_empty_description() {
        let err = NewReport::parse(
            UserId::new(1),
            "medical",
            "Market square".to_string(),
            String::new(),
        )
        .unwrap_err();
        assert_eq!(err.field, "description");
    }

    #[test]
    fn new_report_rejects_unknown_type() {
        let err = NewReport::parse(
            UserId::new(1),
            "tsunami",
            "Coast road".to_string(),
            "Waves".to_string(),
        )
        .unwrap_err();
        assert_eq!(err.field, "type");
    }

    #[test]
    fn status_parse_roundtrips() {
        for status in [
            ReportStatus::Pending,
            ReportStatus::InProgress,
            ReportStatus::Resolved,
            ReportStatus::Cancelled,
        ] {
            assert_eq!(ReportStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ReportStatus::parse("open"), None);
    }

    #[test]
    fn terminal_states() {
        assert!(!ReportStatus::Pending.is_terminal());
        assert!(!ReportStatus::InProgress.is_terminal());
        assert!(ReportStatus::Resolved.is_terminal());
        assert!(ReportStatus::Cancelled.is_terminal());
    }
}
