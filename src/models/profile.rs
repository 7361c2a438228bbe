use super::{FromDocument, Role, ToFields};
use crate::backend::{BackendError, Document, FieldValue, Fields, FieldsExt};

pub const FIELD_ROLE: &str = "role";
pub const FIELD_NAME: &str = "nombre";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_STUDENTS: &str = "listaDeAlumnos";

/// Profile document of a user, keyed by the auth identity
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: String,
    /// `None` when the document carries no role field
    pub role: Option<Role>,
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// Assigned student ids (trainers only)
    pub students: Vec<String>,
}

impl UserProfile {
    pub fn new(id: impl Into<String>, role: Role) -> Self {
        Self {
            id: id.into(),
            role: Some(role),
            display_name: None,
            email: None,
            students: Vec::new(),
        }
    }

    /// Role used for routing; a missing field counts as an unrecognized role
    pub fn resolved_role(&self) -> Role {
        self.role.clone().unwrap_or_else(|| Role::Unknown(String::new()))
    }

    /// Label shown in pickers: display name, then email, then id
    pub fn label(&self) -> &str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .or(self.email.as_deref().filter(|email| !email.trim().is_empty()))
            .unwrap_or(&self.id)
    }

    /// Add a student to a trainer's list; returns false if already assigned
    pub fn assign_student(&mut self, student_id: &str) -> bool {
        if self.students.iter().any(|id| id == student_id) {
            return false;
        }
        self.students.push(student_id.to_string());
        true
    }

    pub fn students_field(&self) -> FieldValue {
        FieldValue::array(
            self.students
                .iter()
                .map(|id| FieldValue::string(id.as_str()))
                .collect(),
        )
    }
}

impl FromDocument for UserProfile {
    fn from_document(doc: &Document) -> Result<Self, BackendError> {
        let fields = &doc.fields;
        let students = fields
            .array_field(FIELD_STUDENTS)
            .iter()
            .filter_map(|value| value.as_str())
            .map(str::to_string)
            .collect();

        Ok(Self {
            id: doc.id.clone(),
            role: fields.str_field(FIELD_ROLE).map(Role::from_wire),
            display_name: fields.non_empty_str(FIELD_NAME).map(str::to_string),
            email: fields.non_empty_str(FIELD_EMAIL).map(str::to_string),
            students,
        })
    }
}

impl ToFields for UserProfile {
    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        if let Some(role) = &self.role {
            fields.insert(FIELD_ROLE.to_string(), role.as_wire().into());
        }
        if let Some(name) = &self.display_name {
            fields.insert(FIELD_NAME.to_string(), name.as_str().into());
        }
        if let Some(email) = &self.email {
            fields.insert(FIELD_EMAIL.to_string(), email.as_str().into());
        }
        if self.role == Some(Role::Trainer) || !self.students.is_empty() {
            fields.insert(FIELD_STUDENTS.to_string(), self.students_field());
        }
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(fields: Fields) -> Document {
        Document {
            id: "t1".to_string(),
            fields,
        }
    }

    #[test]
    fn test_trainer_profile_from_document() {
        let mut fields = Fields::new();
        fields.insert(FIELD_ROLE.to_string(), "entrenador".into());
        fields.insert(FIELD_NAME.to_string(), "Marta".into());
        fields.insert(
            FIELD_STUDENTS.to_string(),
            FieldValue::array(vec!["s1".into(), "s2".into(), FieldValue::IntegerValue(3)]),
        );

        let profile = UserProfile::from_document(&doc(fields)).unwrap();
        assert_eq!(profile.role, Some(Role::Trainer));
        assert_eq!(profile.label(), "Marta");
        assert_eq!(profile.students, vec!["s1", "s2"]);
    }

    #[test]
    fn test_missing_role_resolves_to_unknown() {
        let profile = UserProfile::from_document(&doc(Fields::new())).unwrap();
        assert_eq!(profile.role, None);
        assert_eq!(profile.resolved_role(), Role::Unknown(String::new()));
        assert_eq!(profile.label(), "t1");
    }

    #[test]
    fn test_label_falls_back_to_email() {
        let mut profile = UserProfile::new("s1", Role::Student);
        profile.display_name = Some("  ".to_string());
        profile.email = Some("ana@gym.test".to_string());
        assert_eq!(profile.label(), "ana@gym.test");
    }

    #[test]
    fn test_assign_student_is_idempotent() {
        let mut trainer = UserProfile::new("t1", Role::Trainer);
        assert!(trainer.assign_student("s1"));
        assert!(!trainer.assign_student("s1"));
        assert_eq!(trainer.students.len(), 1);
    }

    #[test]
    fn test_trainer_fields_always_carry_student_list() {
        let trainer = UserProfile::new("t1", Role::Trainer);
        let fields = trainer.to_fields();
        assert_eq!(fields.get(FIELD_STUDENTS), Some(&FieldValue::array(vec![])));

        let student = UserProfile::new("s1", Role::Student);
        assert!(student.to_fields().get(FIELD_STUDENTS).is_none());
    }
}
