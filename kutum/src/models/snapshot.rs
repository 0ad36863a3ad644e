use serde::Serialize;
use serde_json::{Map, Value};

use super::member::{field_string, Member};

/// Typed view over the `allData` payload a client sends with a question.
///
/// Built once per request by [`Snapshot::from_value`]; every collection is
/// optional in the payload and entries that are not objects are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub stats: Option<Stats>,
    /// `None` when the payload has no `familyMembers` key at all.
    pub family_members: Option<Vec<Member>>,
    pub documents: Vec<DocumentRecord>,
    pub vehicles: Vec<VehicleRecord>,
    pub health: Vec<HealthRecord>,
    pub reminders: Vec<ReminderRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total_family: u64,
    pub total_documents: u64,
    pub total_vehicles: u64,
    pub total_reminders: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentRecord {
    pub doc_type: Option<String>,
    pub name: Option<String>,
    pub person_name: Option<String>,
    pub expires: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VehicleRecord {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<String>,
    pub plate_number: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HealthRecord {
    pub title: Option<String>,
    pub person_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReminderRecord {
    pub title: Option<String>,
    pub person: Option<String>,
}

impl Snapshot {
    pub fn from_value(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            tracing::debug!("allData is not an object, using an empty snapshot");
            return Self::default();
        };

        Self {
            stats: obj.get("stats").and_then(Value::as_object).map(Stats::from_map),
            family_members: obj
                .get("familyMembers")
                .map(|members| Member::normalize_all(as_slice(members))),
            documents: records(obj, "documents", DocumentRecord::from_map),
            vehicles: records(obj, "vehicles", VehicleRecord::from_map),
            health: records(obj, "health", HealthRecord::from_map),
            reminders: records(obj, "reminders", ReminderRecord::from_map),
        }
    }
}

impl Stats {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            total_family: count(obj, "totalFamily"),
            total_documents: count(obj, "totalDocuments"),
            total_vehicles: count(obj, "totalVehicles"),
            total_reminders: count(obj, "totalReminders"),
        }
    }
}

impl DocumentRecord {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            doc_type: field_string(obj, &["type"]),
            name: field_string(obj, &["name"]),
            person_name: field_string(obj, &["personName"]),
            expires: field_string(obj, &["expires"]),
        }
    }
}

impl VehicleRecord {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            make: field_string(obj, &["make"]),
            model: field_string(obj, &["model"]),
            year: field_string(obj, &["year"]),
            plate_number: field_string(obj, &["plateNumber"]),
        }
    }
}

impl HealthRecord {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            title: field_string(obj, &["title"]),
            person_name: field_string(obj, &["personName"]),
        }
    }
}

impl ReminderRecord {
    fn from_map(obj: &Map<String, Value>) -> Self {
        Self {
            title: field_string(obj, &["title"]),
            person: field_string(obj, &["person"]),
        }
    }
}

fn as_slice(value: &Value) -> &[Value] {
    value.as_array().map(Vec::as_slice).unwrap_or(&[])
}

fn records<T>(
    obj: &Map<String, Value>,
    key: &str,
    convert: impl Fn(&Map<String, Value>) -> T,
) -> Vec<T> {
    obj.get(key)
        .map(as_slice)
        .unwrap_or(&[])
        .iter()
        .filter_map(Value::as_object)
        .map(convert)
        .collect()
}

/// Non-negative count; accepts numbers and numeric strings, 0 otherwise.
fn count(obj: &Map<String, Value>, key: &str) -> u64 {
    match obj.get(key) {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
            .unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_value_reads_every_collection() {
        let value = json!({
            "stats": {"totalFamily": 2, "totalDocuments": "3", "totalVehicles": 1},
            "familyMembers": [{"name": "Raj", "relation": "Son", "age": "12"}],
            "documents": [{"type": "Passport", "name": "passport.pdf", "personName": "Raj", "expires": "2026-01-01"}],
            "vehicles": [{"make": "Honda", "model": "City", "year": 2019, "plateNumber": "MH01"}],
            "health": [{"title": "Checkup", "personName": "Raj"}],
            "reminders": [{"title": "Renew passport", "person": "Raj"}]
        });

        let snapshot = Snapshot::from_value(&value);
        let stats = snapshot.stats.expect("stats");
        assert_eq!(stats.total_family, 2);
        assert_eq!(stats.total_documents, 3);
        assert_eq!(stats.total_vehicles, 1);
        assert_eq!(stats.total_reminders, 0);
        assert_eq!(snapshot.family_members.map(|m| m.len()), Some(1));
        assert_eq!(snapshot.documents[0].doc_type.as_deref(), Some("Passport"));
        assert_eq!(snapshot.vehicles[0].year.as_deref(), Some("2019"));
        assert_eq!(snapshot.health[0].person_name.as_deref(), Some("Raj"));
        assert_eq!(snapshot.reminders[0].person.as_deref(), Some("Raj"));
    }

    #[test]
    fn test_from_value_tolerates_wrong_shapes() {
        let value = json!({
            "stats": "lots",
            "familyMembers": "nobody",
            "documents": [1, "two", {"name": "kept"}],
            "vehicles": {"make": "not a list"},
        });

        let snapshot = Snapshot::from_value(&value);
        assert!(snapshot.stats.is_none());
        assert_eq!(snapshot.family_members, Some(vec![]));
        assert_eq!(snapshot.documents.len(), 1);
        assert!(snapshot.vehicles.is_empty());
        assert!(snapshot.health.is_empty());
    }

    #[test]
    fn test_from_value_non_object_is_empty() {
        assert_eq!(Snapshot::from_value(&json!([1, 2])), Snapshot::default());
    }

    #[test]
    fn test_missing_family_members_key_is_none() {
        let snapshot = Snapshot::from_value(&json!({"documents": []}));
        assert!(snapshot.family_members.is_none());
    }
}
