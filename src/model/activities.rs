use serde::{Deserialize, Serialize};

use crate::model::{Field, Id};

/// A graded activity ("atividade"). `professor_id` and `class_group_id`
/// point at records owned by the management service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "descricao")]
    pub description: Option<String>,
    #[serde(rename = "nota")]
    pub grade: Option<f64>,
    pub professor_id: Id,
    #[serde(rename = "turma_id")]
    pub class_group_id: Id,
}

impl Activity {
    pub fn new(title: impl Into<String>, professor_id: Id, class_group_id: Id) -> Self {
        Self {
            title: title.into(),
            description: None,
            grade: None,
            professor_id,
            class_group_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_grade(mut self, grade: f64) -> Self {
        self.grade = Some(grade);
        self
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ActivityPatch {
    #[serde(default, rename = "titulo")]
    pub title: Field<String>,
    #[serde(default, rename = "descricao")]
    pub description: Field<Option<String>>,
    #[serde(default, rename = "nota")]
    pub grade: Field<Option<f64>>,
    #[serde(default)]
    pub professor_id: Field<Id>,
    #[serde(default, rename = "turma_id")]
    pub class_group_id: Field<Id>,
}

impl ActivityPatch {
    pub fn apply(self, activity: &mut Activity) {
        self.title.assign_to(&mut activity.title);
        self.description.assign_to(&mut activity.description);
        self.grade.assign_to(&mut activity.grade);
        self.professor_id.assign_to(&mut activity.professor_id);
        self.class_group_id.assign_to(&mut activity.class_group_id);
    }
}

/// A student's score ("nota") on one activity. `student_id` is remote,
/// `activity_id` is checked against the local activities table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Score {
    #[serde(rename = "valor")]
    pub value: f64,
    #[serde(rename = "aluno_id")]
    pub student_id: Id,
    #[serde(rename = "atividade_id")]
    pub activity_id: Id,
}

impl Score {
    pub fn new(value: f64, student_id: Id, activity_id: Id) -> Self {
        Self {
            value,
            student_id,
            activity_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScorePatch {
    #[serde(default, rename = "valor")]
    pub value: Field<f64>,
    #[serde(default, rename = "aluno_id")]
    pub student_id: Field<Id>,
    #[serde(default, rename = "atividade_id")]
    pub activity_id: Field<Id>,
}

impl ScorePatch {
    pub fn apply(self, score: &mut Score) {
        self.value.assign_to(&mut score.value);
        self.student_id.assign_to(&mut score.student_id);
        self.activity_id.assign_to(&mut score.activity_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_optional_fields_default_to_none() {
        let activity: Activity =
            serde_json::from_str(r#"{"titulo": "T1", "professor_id": 2, "turma_id": 1}"#).unwrap();
        assert_eq!(activity.description, None);
        assert_eq!(activity.grade, None);

        let json = serde_json::to_value(&activity).unwrap();
        assert!(json["descricao"].is_null());
        assert!(json["nota"].is_null());
    }

    #[test]
    fn test_activity_patch_changes_only_sent_fields() {
        let mut activity = Activity::new("Prova", 1, 1)
            .with_description("Geometria")
            .with_grade(8.5);
        let before = activity.clone();

        let patch: ActivityPatch = serde_json::from_str(r#"{"nota": 9.0}"#).unwrap();
        patch.apply(&mut activity);

        assert_eq!(activity.grade, Some(9.0));
        assert_eq!(activity.title, before.title);
        assert_eq!(activity.description, before.description);
        assert_eq!(activity.professor_id, before.professor_id);
    }

    #[test]
    fn test_score_patch_rejects_wrong_type() {
        let result = serde_json::from_str::<ScorePatch>(r#"{"valor": "dez"}"#);
        assert!(result.is_err());
    }
}
