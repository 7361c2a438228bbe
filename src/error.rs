use thiserror::Error;

use crate::backend::{AuthError, BackendError};

/// Form validation failures, surfaced to the user as alerts
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Select a student and describe the injury.")]
    InjuryIncomplete,

    #[error("Select a student for the routine.")]
    NoStudentSelected,

    #[error("Give the routine a name.")]
    EmptyRoutineName,

    #[error("Add at least one exercise with a name.")]
    NoExercises,

    #[error("Invalid exercise '{0}'. Use name:sets:reps[:weight[:area]].")]
    InvalidExercise(String),

    #[error("Select both a student and a trainer.")]
    AssignmentIncomplete,

    #[error("Enter your name.")]
    EmptyDisplayName,

    #[error("Enter a valid email address.")]
    InvalidEmail,

    #[error("Passwords must be at least {0} characters long.")]
    WeakPassword(usize),

    #[error("Enter your email and password.")]
    MissingCredentials,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("User not authenticated.")]
    Unauthenticated,

    #[error("No profile document found for user {0}.")]
    ProfileNotFound(String),

    #[error("The trainer ID is not available.")]
    MissingTrainerId,

    #[error("No trainer data found.")]
    TrainerNotFound,
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
