//! Routine creation by a trainer for one of their students

use chrono::{DateTime, Utc};
use std::str::FromStr;

use crate::backend::DocumentStore;
use crate::config::CollectionsConfig;
use crate::error::{Result, ValidationError};
use crate::models::{BodyArea, Exercise, Routine, ToFields};

/// Parse `name:sets:reps[:weight[:area]]`
pub fn parse_exercise(input: &str) -> Result<Exercise, ValidationError> {
    let invalid = || ValidationError::InvalidExercise(input.to_string());
    let parts: Vec<&str> = input.split(':').map(str::trim).collect();

    if parts.len() < 3 || parts.len() > 5 || parts[0].is_empty() {
        return Err(invalid());
    }

    let sets = parts[1].parse::<u32>().map_err(|_| invalid())?;
    let repetitions = parts[2].parse::<u32>().map_err(|_| invalid())?;
    let weight = match parts.get(3) {
        Some(w) if !w.is_empty() => w.parse::<f64>().map_err(|_| invalid())?,
        _ => 0.0,
    };
    let area = parts
        .get(4)
        .filter(|a| !a.is_empty())
        .and_then(|a| BodyArea::from_str(a).ok());

    Ok(Exercise {
        name: parts[0].to_string(),
        sets,
        repetitions,
        weight,
        area,
    })
}

/// Routine being composed on the screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoutineDraft {
    pub student_id: Option<String>,
    pub name: String,
    pub start_date: Option<DateTime<Utc>>,
    pub exercises: Vec<Exercise>,
}

impl RoutineDraft {
    pub fn for_student(student_id: &str) -> Self {
        Self {
            student_id: Some(student_id.to_string()),
            ..Self::default()
        }
    }

    pub fn add_exercise(&mut self, exercise: Exercise) {
        self.exercises.push(exercise);
    }

    pub fn validate(&self, now: DateTime<Utc>) -> Result<(String, Routine), ValidationError> {
        let student_id = self
            .student_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(ValidationError::NoStudentSelected)?;

        let name = self.name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyRoutineName);
        }

        let exercises: Vec<Exercise> = self
            .exercises
            .iter()
            .filter(|e| !e.name.trim().is_empty())
            .cloned()
            .collect();
        if exercises.is_empty() {
            return Err(ValidationError::NoExercises);
        }

        Ok((
            student_id.to_string(),
            Routine {
                id: String::new(),
                name: Some(name.to_string()),
                start_date: Some(self.start_date.unwrap_or(now)),
                exercises,
            },
        ))
    }
}

/// Create the routine under the student and reset the draft's contents.
/// Returns the new routine id.
pub async fn create_routine(
    store: &dyn DocumentStore,
    collections: &CollectionsConfig,
    draft: &mut RoutineDraft,
    now: DateTime<Utc>,
) -> Result<String> {
    let (student_id, routine) = draft.validate(now)?;

    let id = store
        .create_document(&collections.routines(&student_id), routine.to_fields())
        .await
        .map_err(|e| {
            tracing::error!("Error creating routine for {}: {}", student_id, e);
            e
        })?;

    tracing::info!(
        "Created routine {} with {} exercise(s) for {}",
        id,
        routine.exercises.len(),
        student_id
    );

    *draft = RoutineDraft::for_student(&student_id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryStore;
    use crate::backend::Document;
    use crate::models::FromDocument;

    #[test]
    fn test_parse_exercise() {
        let exercise = parse_exercise("Squat:5:5:100:piernas").unwrap();
        assert_eq!(exercise.name, "Squat");
        assert_eq!(exercise.sets, 5);
        assert_eq!(exercise.weight, 100.0);
        assert_eq!(exercise.area, Some(BodyArea::Legs));

        let bodyweight = parse_exercise("Push-up:3:15").unwrap();
        assert_eq!(bodyweight.weight, 0.0);
        assert_eq!(bodyweight.area, None);

        assert!(parse_exercise("Squat:five:5").is_err());
        assert!(parse_exercise(":3:3").is_err());
        assert!(parse_exercise("Squat").is_err());
    }

    #[test]
    fn test_draft_validation_order() {
        let now = Utc::now();
        let mut draft = RoutineDraft::default();
        assert_eq!(draft.validate(now).unwrap_err(), ValidationError::NoStudentSelected);

        draft.student_id = Some("s1".to_string());
        assert_eq!(draft.validate(now).unwrap_err(), ValidationError::EmptyRoutineName);

        draft.name = "Upper body".to_string();
        assert_eq!(draft.validate(now).unwrap_err(), ValidationError::NoExercises);

        draft.add_exercise(parse_exercise("Bench:4:8:60:fuerza").unwrap());
        let (_, routine) = draft.validate(now).unwrap();
        assert_eq!(routine.start_date, Some(now));
    }

    #[tokio::test]
    async fn test_create_routine_writes_and_resets() {
        let store = MemoryStore::new();
        let collections = CollectionsConfig::default();
        let mut draft = RoutineDraft::for_student("s1");
        draft.name = "Legs".to_string();
        draft.add_exercise(parse_exercise("Squat:5:5:100:Piernas").unwrap());

        let id = create_routine(&store, &collections, &mut draft, Utc::now())
            .await
            .unwrap();

        assert_eq!(draft, RoutineDraft::for_student("s1"));
        let fields = store.fields(&collections.routines("s1").doc(&id)).unwrap();
        let routine = Routine::from_document(&Document { id, fields }).unwrap();
        assert_eq!(routine.name.as_deref(), Some("Legs"));
        assert_eq!(routine.exercises.len(), 1);
    }
}
