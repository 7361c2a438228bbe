use crate::backend::CollectionPath;
use crate::config::CollectionsConfig;
use crate::models::{Exercise, Routine};

use super::{display_date, OwnerScoped};

pub const UNNAMED_ROUTINE: &str = "Unnamed routine";
pub const AREA_NOT_SPECIFIED: &str = "not specified";

#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseView {
    pub name: String,
    pub sets: u32,
    pub repetitions: u32,
    pub weight: f64,
    pub area: String,
}

impl From<&Exercise> for ExerciseView {
    fn from(exercise: &Exercise) -> Self {
        Self {
            name: exercise.name.clone(),
            sets: exercise.sets,
            repetitions: exercise.repetitions,
            weight: exercise.weight,
            area: exercise
                .area
                .as_ref()
                .map(|area| area.to_string())
                .unwrap_or_else(|| AREA_NOT_SPECIFIED.to_string()),
        }
    }
}

impl ExerciseView {
    /// One-line summary, e.g. `Squat: 5x5 @ 100 kg (Legs)`
    pub fn summary(&self) -> String {
        format!(
            "{}: {}x{} @ {} kg ({})",
            self.name, self.sets, self.repetitions, self.weight, self.area
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RoutineView {
    pub id: String,
    pub name: String,
    pub start_date: String,
    pub exercises: Vec<ExerciseView>,
}

/// Routines assigned to a student
#[derive(Debug, Clone)]
pub struct RoutinesScreen {
    pub date_format: String,
}

impl RoutinesScreen {
    pub fn new(date_format: impl Into<String>) -> Self {
        Self {
            date_format: date_format.into(),
        }
    }
}

impl OwnerScoped for RoutinesScreen {
    type Record = Routine;
    type View = RoutineView;

    fn empty_message(&self) -> &str {
        "No routines assigned yet."
    }

    fn collection(&self, collections: &CollectionsConfig, owner_id: &str) -> CollectionPath {
        collections.routines(owner_id)
    }

    fn present(&self, records: Vec<Routine>) -> Vec<RoutineView> {
        records
            .into_iter()
            .map(|routine| RoutineView {
                name: routine
                    .name
                    .unwrap_or_else(|| UNNAMED_ROUTINE.to_string()),
                start_date: display_date(routine.start_date, &self.date_format),
                exercises: routine.exercises.iter().map(ExerciseView::from).collect(),
                id: routine.id,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BodyArea;

    #[test]
    fn test_fallbacks() {
        let screen = RoutinesScreen::new("%d/%m/%Y");
        let views = screen.present(vec![Routine {
            id: "r1".to_string(),
            name: None,
            start_date: None,
            exercises: vec![Exercise {
                name: "Row".to_string(),
                sets: 3,
                repetitions: 12,
                weight: 40.0,
                area: None,
            }],
        }]);

        assert_eq!(views[0].name, UNNAMED_ROUTINE);
        assert_eq!(views[0].start_date, "date unavailable");
        assert_eq!(views[0].exercises[0].area, "not specified");
    }

    #[test]
    fn test_exercise_summary() {
        let view = ExerciseView::from(&Exercise {
            name: "Squat".to_string(),
            sets: 5,
            repetitions: 5,
            weight: 100.0,
            area: Some(BodyArea::Legs),
        });
        assert_eq!(view.summary(), "Squat: 5x5 @ 100 kg (Legs)");
    }
}
