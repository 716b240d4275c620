//! Status conditions shared by ProblemEnvironment and Worker.

use chrono::{SecondsFormat, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Condition truth value, as in `metav1.ConditionStatus`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub enum ConditionStatus {
    True,
    False,
    #[default]
    Unknown,
}

impl ConditionStatus {
    pub fn is_true(self) -> bool {
        self == ConditionStatus::True
    }
}

impl std::fmt::Display for ConditionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConditionStatus::True => write!(f, "True"),
            ConditionStatus::False => write!(f, "False"),
            ConditionStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A single status condition on a resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: String,
    pub status: ConditionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_transition_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Find a condition by type.
pub fn find<'a>(conditions: &'a [Condition], condition_type: &str) -> Option<&'a Condition> {
    conditions.iter().find(|c| c.condition_type == condition_type)
}

/// Status of the named condition, `Unknown` when absent.
pub fn status_of(conditions: &[Condition], condition_type: &str) -> ConditionStatus {
    find(conditions, condition_type)
        .map(|c| c.status)
        .unwrap_or_default()
}

/// Whether the named condition is present and `True`.
pub fn is_true(conditions: &[Condition], condition_type: &str) -> bool {
    status_of(conditions, condition_type).is_true()
}

/// Set or insert a condition.
///
/// `lastTransitionTime` is only touched when the status actually
/// changes; reason, message, and `observedGeneration` are always
/// overwritten. Pass the resource's `metadata.generation` as
/// `observed_generation`.
pub fn set(
    conditions: &mut Vec<Condition>,
    condition_type: &str,
    status: ConditionStatus,
    reason: &str,
    message: &str,
    observed_generation: Option<i64>,
) {
    let now = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    for condition in conditions.iter_mut() {
        if condition.condition_type != condition_type {
            continue;
        }

        if condition.status != status {
            condition.status = status;
            condition.last_transition_time = Some(now);
        }
        condition.reason = Some(reason.to_string());
        condition.message = Some(message.to_string());
        condition.observed_generation = observed_generation;
        return;
    }

    conditions.push(Condition {
        condition_type: condition_type.to_string(),
        status,
        observed_generation,
        last_transition_time: Some(now),
        reason: Some(reason.to_string()),
        message: Some(message.to_string()),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(status: ConditionStatus) -> Condition {
        Condition {
            condition_type: "Ready".to_string(),
            status,
            observed_generation: None,
            last_transition_time: Some("2024-01-01T00:00:00Z".to_string()),
            reason: None,
            message: None,
        }
    }

    #[test]
    fn find_and_status() {
        let conditions = vec![ready(ConditionStatus::True)];
        assert!(find(&conditions, "Ready").is_some());
        assert!(find(&conditions, "Assigned").is_none());
        assert_eq!(status_of(&conditions, "Ready"), ConditionStatus::True);
        assert_eq!(status_of(&conditions, "Assigned"), ConditionStatus::Unknown);
        assert!(is_true(&conditions, "Ready"));
        assert!(!is_true(&conditions, "Assigned"));
    }

    #[test]
    fn set_inserts_when_missing() {
        let mut conditions = Vec::new();
        set(&mut conditions, "Assigned", ConditionStatus::True, "Assigned", "assigned to a user", None);
        assert_eq!(conditions.len(), 1);
        assert!(is_true(&conditions, "Assigned"));
        assert_eq!(conditions[0].reason.as_deref(), Some("Assigned"));
        assert!(conditions[0].last_transition_time.is_some());
    }

    #[test]
    fn set_keeps_transition_time_when_status_unchanged() {
        let mut conditions = vec![ready(ConditionStatus::True)];
        set(&mut conditions, "Ready", ConditionStatus::True, "StillReady", "", None);
        assert_eq!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(conditions[0].reason.as_deref(), Some("StillReady"));
    }

    #[test]
    fn set_updates_transition_time_on_change() {
        let mut conditions = vec![ready(ConditionStatus::True)];
        set(&mut conditions, "Ready", ConditionStatus::False, "Gone", "", None);
        assert_ne!(
            conditions[0].last_transition_time.as_deref(),
            Some("2024-01-01T00:00:00Z")
        );
        assert_eq!(conditions[0].status, ConditionStatus::False);
    }

    #[test]
    fn set_refreshes_observed_generation() {
        let mut conditions = vec![ready(ConditionStatus::True)];
        set(&mut conditions, "Ready", ConditionStatus::True, "StillReady", "", Some(7));
        assert_eq!(conditions[0].observed_generation, Some(7));

        set(&mut conditions, "Ready", ConditionStatus::False, "Gone", "", Some(8));
        assert_eq!(conditions[0].observed_generation, Some(8));
    }

    #[test]
    fn wire_format_uses_metav1_names() {
        let condition = Condition {
            condition_type: "Ready".to_string(),
            status: ConditionStatus::True,
            observed_generation: Some(3),
            last_transition_time: Some("2024-01-01T00:00:00Z".to_string()),
            reason: Some("Ok".to_string()),
            message: None,
        };
        let json = serde_json::to_value(&condition).unwrap();
        assert_eq!(json["type"], "Ready");
        assert_eq!(json["status"], "True");
        assert_eq!(json["observedGeneration"], 3);
        assert_eq!(json["lastTransitionTime"], "2024-01-01T00:00:00Z");
        assert!(json.get("message").is_none());
    }
}
