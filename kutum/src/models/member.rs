use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One family member, as used by retrieval and the rule-based responder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub name: String,
    pub relation: String,
    pub age: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blood_group: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Member {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        relation: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            relation: relation.into(),
            age: age.into(),
            date_of_birth: None,
            gender: None,
            blood_group: None,
            height: None,
            weight: None,
            avatar: None,
        }
    }

    /// Convert a loosely-typed record into a `Member`.
    ///
    /// Returns `None` when the record is not an object or has no usable name.
    /// `index` is only used to synthesize an id for records that lack one.
    pub fn from_value(value: &Value, index: usize) -> Option<Self> {
        let obj = value.as_object()?;
        let name = field_string(obj, &["name"])?;

        Some(Self {
            id: field_string(obj, &["id"]).unwrap_or_else(|| format!("member-{index}")),
            name,
            relation: field_string(obj, &["relation"]).unwrap_or_default(),
            age: field_string(obj, &["age"]).unwrap_or_default(),
            date_of_birth: field_string(obj, &["dateOfBirth", "date_of_birth", "dob"]),
            gender: field_string(obj, &["gender"]),
            blood_group: field_string(obj, &["bloodGroup", "blood_group", "blood_group_name"]),
            height: field_string(obj, &["height"]),
            weight: field_string(obj, &["weight"]),
            avatar: field_string(obj, &["avatar"]),
        })
    }

    /// Normalize a list of raw records, dropping the ones that cannot be used.
    pub fn normalize_all(values: &[Value]) -> Vec<Self> {
        values
            .iter()
            .enumerate()
            .filter_map(|(index, value)| {
                let member = Self::from_value(value, index);
                if member.is_none() {
                    tracing::debug!(index, "Skipping family member record without a name");
                }
                member
            })
            .collect()
    }

    /// Present optional attributes as `(label, value)` pairs, in display order.
    pub fn optional_fields(&self) -> Vec<(&'static str, &str)> {
        [
            ("Gender", self.gender.as_deref()),
            ("Blood Group", self.blood_group.as_deref()),
            ("Date of Birth", self.date_of_birth.as_deref()),
            ("Height", self.height.as_deref()),
            ("Weight", self.weight.as_deref()),
        ]
        .into_iter()
        .filter_map(|(label, value)| value.map(|v| (label, v)))
        .collect()
    }

    /// Labeled text that keyword matching runs against.
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![
            format!("Name: {}", self.name),
            format!("Relation: {}", self.relation),
            format!("Age: {}", self.age),
        ];
        parts.extend(
            self.optional_fields()
                .into_iter()
                .map(|(label, value)| format!("{label}: {value}")),
        );
        parts.join(" | ")
    }

    pub fn has_relation(&self, relation: &str) -> bool {
        self.relation.eq_ignore_ascii_case(relation)
    }
}

/// Read the first present key as a trimmed, non-empty string. Numbers and
/// booleans are rendered as text; arrays, objects and nulls count as absent.
pub(crate) fn field_string(obj: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match obj.get(*key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    })
}
