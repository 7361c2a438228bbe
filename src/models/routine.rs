use chrono::{DateTime, Utc};

use super::{BodyArea, FromDocument, ToFields};
use crate::backend::{BackendError, Document, FieldValue, Fields, FieldsExt};

/// Routine assigned to a student by a trainer
#[derive(Debug, Clone, PartialEq)]
pub struct Routine {
    pub id: String,
    pub name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Exercise {
    pub name: String,
    pub sets: u32,
    pub repetitions: u32,
    /// Load in kilograms
    pub weight: f64,
    pub area: Option<BodyArea>,
}

impl Exercise {
    fn from_fields(fields: &Fields) -> Self {
        let count = |name: &str| {
            fields
                .i64_field(name)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0)
        };

        Self {
            name: fields.str_field("name").unwrap_or_default().to_string(),
            sets: count("sets"),
            repetitions: count("repetitions"),
            weight: fields.f64_field("weight").unwrap_or(0.0),
            area: fields.non_empty_str("area").map(BodyArea::from_wire),
        }
    }

    fn to_value(&self) -> FieldValue {
        let mut fields = Fields::new();
        fields.insert("name".to_string(), self.name.as_str().into());
        fields.insert("sets".to_string(), self.sets.into());
        fields.insert("repetitions".to_string(), self.repetitions.into());
        fields.insert("weight".to_string(), self.weight.into());
        if let Some(area) = &self.area {
            fields.insert("area".to_string(), area.as_wire().into());
        }
        FieldValue::map(fields)
    }
}

impl FromDocument for Routine {
    fn from_document(doc: &Document) -> Result<Self, BackendError> {
        let fields = &doc.fields;
        let exercises = fields
            .array_field("exercises")
            .iter()
            .filter_map(FieldValue::as_map)
            .map(Exercise::from_fields)
            .collect();

        Ok(Self {
            id: doc.id.clone(),
            name: fields.non_empty_str("routineName").map(str::to_string),
            start_date: fields.timestamp_field("startDate"),
            exercises,
        })
    }
}

impl ToFields for Routine {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        if let Some(name) = &self.name {
            fields.insert("routineName".to_string(), name.as_str().into());
        }
        if let Some(start) = self.start_date {
            fields.insert("startDate".to_string(), start.into());
        }
        fields.insert(
            "exercises".to_string(),
            FieldValue::array(self.exercises.iter().map(Exercise::to_value).collect()),
        );
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_routine_from_rest_document() {
        let fields: Fields = serde_json::from_value(json!({
            "routineName": {"stringValue": "Leg day"},
            "startDate": {"timestampValue": "2024-05-06T08:00:00Z"},
            "exercises": {"arrayValue": {"values": [
                {"mapValue": {"fields": {
                    "name": {"stringValue": "Squat"},
                    "sets": {"integerValue": "5"},
                    "repetitions": {"integerValue": "5"},
                    "weight": {"doubleValue": 100.0},
                    "area": {"stringValue": "Piernas"}
                }}},
                {"mapValue": {"fields": {
                    "name": {"stringValue": "Plank"},
                    "sets": {"stringValue": "3"}
                }}}
            ]}}
        }))
        .unwrap();

        let routine = Routine::from_document(&Document {
            id: "r1".to_string(),
            fields,
        })
        .unwrap();

        assert_eq!(routine.name.as_deref(), Some("Leg day"));
        assert!(routine.start_date.is_some());
        assert_eq!(routine.exercises.len(), 2);
        assert_eq!(routine.exercises[0].area, Some(BodyArea::Legs));
        assert_eq!(routine.exercises[0].weight, 100.0);
        assert_eq!(routine.exercises[1].sets, 3);
        assert_eq!(routine.exercises[1].repetitions, 0);
        assert_eq!(routine.exercises[1].area, None);
    }

    #[test]
    fn test_sparse_routine_document() {
        let routine = Routine::from_document(&Document {
            id: "r2".to_string(),
            fields: Fields::new(),
        })
        .unwrap();

        assert_eq!(routine.name, None);
        assert_eq!(routine.start_date, None);
        assert!(routine.exercises.is_empty());
    }
}
