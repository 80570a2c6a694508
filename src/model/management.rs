use serde::{Deserialize, Serialize};

use crate::model::{Field, Id};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Professor {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "materia")]
    pub subject: Option<String>,
}

impl Professor {
    pub fn new(name: impl Into<String>, subject: Option<String>) -> Self {
        Self {
            name: name.into(),
            subject,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfessorPatch {
    #[serde(default, rename = "nome")]
    pub name: Field<String>,
    #[serde(default, rename = "materia")]
    pub subject: Field<Option<String>>,
}

impl ProfessorPatch {
    pub fn apply(self, professor: &mut Professor) {
        self.name.assign_to(&mut professor.name);
        self.subject.assign_to(&mut professor.subject);
    }
}

/// A class group ("turma"). `professor_id` is stored as given and never
/// checked against the professors table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    #[serde(rename = "nome")]
    pub name: String,
    pub professor_id: Option<Id>,
}

impl ClassGroup {
    pub fn new(name: impl Into<String>, professor_id: Option<Id>) -> Self {
        Self {
            name: name.into(),
            professor_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassGroupPatch {
    #[serde(default, rename = "nome")]
    pub name: Field<String>,
    #[serde(default)]
    pub professor_id: Field<Option<Id>>,
}

impl ClassGroupPatch {
    pub fn apply(self, class_group: &mut ClassGroup) {
        self.name.assign_to(&mut class_group.name);
        self.professor_id.assign_to(&mut class_group.professor_id);
    }
}

/// A student ("aluno"). `class_group_id` is unenforced, like
/// [`ClassGroup::professor_id`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "turma_id")]
    pub class_group_id: Option<Id>,
}

impl Student {
    pub fn new(name: impl Into<String>, class_group_id: Option<Id>) -> Self {
        Self {
            name: name.into(),
            class_group_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    #[serde(default, rename = "nome")]
    pub name: Field<String>,
    #[serde(default, rename = "turma_id")]
    pub class_group_id: Field<Option<Id>>,
}

impl StudentPatch {
    pub fn apply(self, student: &mut Student) {
        self.name.assign_to(&mut student.name);
        self.class_group_id.assign_to(&mut student.class_group_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_professor_wire_names() {
        let professor: Professor =
            serde_json::from_str(r#"{"nome": "Ana", "materia": "Física"}"#).unwrap();
        assert_eq!(professor, Professor::new("Ana", Some("Física".into())));

        let json = serde_json::to_value(&professor).unwrap();
        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["materia"], "Física");
    }

    #[test]
    fn test_student_patch_can_clear_class_group() {
        let mut student = Student::new("Carlos", Some(1));
        let patch: StudentPatch = serde_json::from_str(r#"{"turma_id": null}"#).unwrap();
        patch.apply(&mut student);
        assert_eq!(student, Student::new("Carlos", None));
    }
}
