//! Turn upstream resource payloads into canonical [`Resource`] values.
//!
//! Upstream has served three different layouts over time. The layout is
//! detected once per record from the field names present, then decoded by
//! the matching adapter in [`shapes`].

pub(crate) mod lenient;
mod records;
mod shapes;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;

use crate::date::timestamp_string;
use crate::model::{BillingHistory, Resource};
pub use records::{normalize_interview_status, normalize_status};
use shapes::{CurrentRecord, DirectoryRecord, LegacyHrRecord, ResourceFields};

const ENVELOPE_KEYS: [&str; 4] = ["data", "content", "results", "items"];
const LEGACY_HR_MARKERS: [&str; 4] = ["fullName", "empId", "skillSet", "blocks"];
const DIRECTORY_MARKERS: [&str; 4] = ["resourceName", "employeeCode", "technicalSkills", "blockedDates"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceShape {
    LegacyHr,
    Directory,
    Current,
}

#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("resource payload is not a JSON object")]
    NotAnObject,
    #[error("malformed {shape} resource payload: {source}")]
    Shape {
        shape: ResourceShape,
        #[source]
        source: serde_json::Error,
    },
}

/// The record list inside a response body: the body itself when it is an
/// array, else the first array under a common envelope key.
pub fn extract_items(body: &Value) -> &[Value] {
    if let Value::Array(items) = body {
        return items;
    }

    let found = ENVELOPE_KEYS
        .iter()
        .find_map(|key| body.get(key).and_then(Value::as_array));

    match found {
        Some(items) => items,
        None => {
            warn!("response body holds no resource list");
            &[]
        }
    }
}

pub fn detect_shape(record: &Map<String, Value>) -> ResourceShape {
    let has_any = |markers: &[&str]| markers.iter().any(|key| record.contains_key(*key));

    if has_any(&LEGACY_HR_MARKERS) {
        ResourceShape::LegacyHr
    } else if has_any(&DIRECTORY_MARKERS) {
        ResourceShape::Directory
    } else {
        ResourceShape::Current
    }
}

fn decode<'a, T>(shape: ResourceShape, value: &'a Value) -> Result<ResourceFields, NormalizeError>
where
    T: Deserialize<'a> + Into<ResourceFields>,
{
    T::deserialize(value)
        .map(Into::into)
        .map_err(|source| NormalizeError::Shape { shape, source })
}

/// Normalize one upstream record.
pub fn normalize_resource(value: &Value, now: DateTime<Utc>) -> Result<Resource, NormalizeError> {
    let record = value.as_object().ok_or(NormalizeError::NotAnObject)?;

    let shape = detect_shape(record);
    let fields = match shape {
        ResourceShape::LegacyHr => decode::<LegacyHrRecord>(shape, value)?,
        ResourceShape::Directory => decode::<DirectoryRecord>(shape, value)?,
        ResourceShape::Current => decode::<CurrentRecord>(shape, value)?,
    };

    Ok(fields.into_resource(now))
}

/// Normalize a batch. Records that cannot be decoded are replaced by a
/// minimal placeholder so one bad row never hides the rest.
pub fn map_resources(items: &[Value], now: DateTime<Utc>) -> Vec<Resource> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            normalize_resource(item, now).unwrap_or_else(|err| {
                warn!(index, error = %err, "substituting placeholder for unreadable resource");
                placeholder_resource(item, index, now)
            })
        })
        .collect()
}

fn scalar(record: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match record.get(*key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

fn placeholder_resource(item: &Value, index: usize, now: DateTime<Utc>) -> Resource {
    let unknown = format!("unknown-{index}");
    let stamp = timestamp_string(now);

    Resource {
        id: scalar(item, &["id", "employeeId"]).unwrap_or_else(|| unknown.clone()),
        employee_id: scalar(item, &["employeeId", "id"]).unwrap_or(unknown),
        name: scalar(item, &["name", "fullName", "resourceName"]).unwrap_or_default(),
        email: scalar(item, &["email"]).unwrap_or_default(),
        designation: scalar(item, &["designation"]).unwrap_or_default(),
        location: scalar(item, &["location"]).unwrap_or_default(),
        status: normalize_status(scalar(item, &["status"]).as_deref()),
        availability_date: scalar(item, &["availabilityDate"]),
        release_date: scalar(item, &["releaseDate"]),
        billing_history: BillingHistory::default(),
        ctc: item.get("ctc").and_then(Value::as_f64),
        ctc_currency: Some(scalar(item, &["ctcCurrency"]).unwrap_or_else(|| "INR".to_string())),
        created_at: scalar(item, &["createdAt"]).unwrap_or_else(|| stamp.clone()),
        updated_at: scalar(item, &["updatedAt"]).unwrap_or(stamp),
        ..Resource::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{InterviewStatus, ResourceStatus, SkillLevel, SkillType};
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 5, 10, 12, 0, 0).unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn extracts_from_array_or_envelope() {
        let bare = json!([{"id": 1}, {"id": 2}]);
        assert_eq!(extract_items(&bare).len(), 2);

        let paged = json!({"content": [{"id": 1}], "totalElements": 1});
        assert_eq!(extract_items(&paged).len(), 1);

        let wrapped = json!({"data": "nope", "items": [{"id": 1}, {"id": 2}, {"id": 3}]});
        assert_eq!(extract_items(&wrapped).len(), 3);

        assert!(extract_items(&json!({"message": "ok"})).is_empty());
        assert!(extract_items(&json!("text")).is_empty());
    }

    #[test]
    fn shape_detection_is_ordered() {
        assert_eq!(detect_shape(&object(json!({"fullName": "A"}))), ResourceShape::LegacyHr);
        assert_eq!(
            detect_shape(&object(json!({"technicalSkills": [], "blocks": []}))),
            ResourceShape::LegacyHr
        );
        assert_eq!(detect_shape(&object(json!({"employeeCode": "E1"}))), ResourceShape::Directory);
        assert_eq!(detect_shape(&object(json!({"name": "A"}))), ResourceShape::Current);
        assert_eq!(ResourceShape::LegacyHr.to_string(), "legacy-hr");
    }

    #[test]
    fn normalizes_backend_dto() {
        let value = json!({
            "employeeId": "XI-100",
            "name": "Priya Sharma",
            "email": "priya@example.com",
            "designation": "Senior Engineer",
            "location": "Pune",
            "status": "SOFT_BLOCKED",
            "availabilityDate": "2025-06-01",
            "totalExperience": 7,
            "skills": [
                {"name": "Java", "level": "EXPERT", "type": "PRIMARY", "yearsOfExperience": 6},
                {"name": "Kafka", "level": "ADVANCED", "type": "SECONDARY"}
            ],
            "softBlocks": [{"accountId": 12, "accountName": "Globex", "blockedUntil": "2025-06-15"}],
            "ctc": 2400000.0,
            "createdAt": "2025-01-02T10:00:00",
            "updatedAt": "2025-05-01T10:00:00"
        });

        let resource = normalize_resource(&value, now()).unwrap();
        assert_eq!(resource.id, "XI-100");
        assert_eq!(resource.employee_id, "XI-100");
        assert_eq!(resource.status, ResourceStatus::SoftBlocked);
        assert_eq!(resource.total_experience, Some(7.0));
        assert_eq!(resource.skills[0].level, SkillLevel::Expert);
        assert_eq!(resource.skills[1].skill_type, SkillType::Secondary);
        assert_eq!(resource.soft_blocks[0].id, "XI-100-12-2025-06-15");
        assert_eq!(resource.soft_blocks[0].reason, "Globex");
        assert_eq!(resource.ctc_currency.as_deref(), Some("INR"));
        assert!(!resource.billing_history.billable);
        assert_eq!(resource.created_at, "2025-01-02T10:00:00");
    }

    #[test]
    fn normalizes_legacy_hr_export() {
        let value = json!({
            "empId": 5521,
            "fullName": "Arjun Mehta",
            "emailAddress": "arjun@example.com",
            "title": "Consultant",
            "city": "Gurgaon",
            "status": "deployed",
            "availableFrom": "2025-07-01",
            "experience": [{"projectName": "Ledger", "technologies": ["Go"]}],
            "skillSet": [{"name": "Go"}],
            "salary": "1800000",
            "currency": "USD",
            "consideration": [{"requirementId": "REQ-7", "interviewStatus": "SCHEDULED"}]
        });

        let resource = normalize_resource(&value, now()).unwrap();
        assert_eq!(resource.id, "5521");
        assert_eq!(resource.name, "Arjun Mehta");
        assert_eq!(resource.designation, "Consultant");
        assert_eq!(resource.location, "Gurgaon");
        assert_eq!(resource.status, ResourceStatus::Deployed);
        assert_eq!(resource.total_experience, None);
        assert_eq!(resource.project_experience[0].project_name, "Ledger");
        assert_eq!(resource.ctc, Some(1_800_000.0));
        assert_eq!(resource.ctc_currency.as_deref(), Some("USD"));
        assert_eq!(
            resource.considerations[0].interview_status,
            Some(InterviewStatus::Scheduled)
        );
        assert_eq!(resource.created_at, "2025-05-10T12:00:00.000Z");
    }

    #[test]
    fn legacy_numeric_experience_is_total_years() {
        let value = json!({"fullName": "A", "experience": 4.5});
        let resource = normalize_resource(&value, now()).unwrap();
        assert_eq!(resource.total_experience, Some(4.5));
        assert!(resource.project_experience.is_empty());
    }

    #[test]
    fn normalizes_directory_record() {
        let value = json!({
            "employeeCode": "D-9",
            "resourceName": "Lin Zhou",
            "emailId": "lin@example.com",
            "position": "Architect",
            "officeLocation": "Hyderabad",
            "availableDate": "2025-05-20",
            "yearsOfExperience": "12",
            "technicalSkills": [{"name": "Azure", "level": "guru"}],
            "blockedDates": [{"blockedUntil": "2025-05-30"}],
            "created": "2024-12-01T00:00:00Z"
        });

        let resource = normalize_resource(&value, now()).unwrap();
        assert_eq!(resource.id, "D-9");
        assert_eq!(resource.location, "Hyderabad");
        assert_eq!(resource.status, ResourceStatus::Atp);
        assert_eq!(resource.availability_date.as_deref(), Some("2025-05-20"));
        assert_eq!(resource.total_experience, Some(12.0));
        assert_eq!(resource.skills[0].level, SkillLevel::Intermediate);
        assert_eq!(resource.soft_blocks[0].id, "D-9-block-2025-05-30");
        assert_eq!(resource.soft_blocks[0].start_date, "2025-05-10");
        assert_eq!(resource.soft_blocks[0].created_by, "System");
    }

    #[test]
    fn id_and_employee_id_fill_each_other() {
        let resource = normalize_resource(&json!({"id": 17, "name": "A"}), now()).unwrap();
        assert_eq!(resource.id, "17");
        assert_eq!(resource.employee_id, "17");

        let resource =
            normalize_resource(&json!({"id": "db-1", "employeeId": "XI-1"}), now()).unwrap();
        assert_eq!(resource.id, "db-1");
        assert_eq!(resource.employee_id, "XI-1");
    }

    #[test]
    fn nameless_skills_are_dropped() {
        let value = json!({
            "employeeId": "XI-9",
            "status": "ATP",
            "location": "Delhi",
            "skills": [
                {"level": "expert", "type": "primary"},
                {"name": "   ", "level": "advanced"},
                {"name": "Go"}
            ],
            "considerations": [{
                "requirementId": "REQ-7",
                "requiredSkills": [{"level": "expert"}, {"name": ""}, {"name": "Rust"}]
            }]
        });

        let resource = normalize_resource(&value, now()).unwrap();
        assert_eq!(resource.skills.len(), 1);
        assert_eq!(resource.skills[0].name, "Go");

        let required = resource.considerations[0].required_skills.as_ref().unwrap();
        assert_eq!(required.len(), 1);
        assert_eq!(required[0].name, "Rust");
    }

    #[test]
    fn rejects_non_objects() {
        assert!(matches!(
            normalize_resource(&json!("XI-1"), now()),
            Err(NormalizeError::NotAnObject)
        ));
    }

    #[test]
    fn batch_substitutes_placeholders() {
        let items = vec![
            json!({"employeeId": "XI-1", "name": "Good"}),
            json!({"employeeId": "XI-2", "name": {"first": "Bad"}, "status": "DEPLOYED"}),
            json!(42),
        ];

        let resources = map_resources(&items, now());
        assert_eq!(resources.len(), 3);
        assert_eq!(resources[0].name, "Good");

        assert_eq!(resources[1].id, "XI-2");
        assert_eq!(resources[1].name, "");
        assert_eq!(resources[1].status, ResourceStatus::Deployed);
        assert!(resources[1].skills.is_empty());

        assert_eq!(resources[2].id, "unknown-2");
        assert_eq!(resources[2].employee_id, "unknown-2");
        assert_eq!(resources[2].status, ResourceStatus::Atp);
        assert_eq!(resources[2].created_at, "2025-05-10T12:00:00.000Z");
    }
}
