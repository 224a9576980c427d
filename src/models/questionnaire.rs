use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

use super::field::{Field, FieldValue, FIELD_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum QuestionnaireStatus {
    #[default]
    Draft,
    Completed,
    Reviewed,
}

impl QuestionnaireStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            QuestionnaireStatus::Draft => "draft",
            QuestionnaireStatus::Completed => "completed",
            QuestionnaireStatus::Reviewed => "reviewed",
        }
    }
}

/// Черновик анкеты одного пользователя
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireDraft {
    pub full_name: String,
    pub age: u32,
    pub phone: String,
    pub email: String,
    pub education: String,
    pub work_experience: String,
    pub skills: String,
    pub interests: String,
    pub goals: String,
    pub additional_info: String,
    pub status: QuestionnaireStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl QuestionnaireDraft {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            full_name: String::new(),
            age: 0,
            phone: String::new(),
            email: String::new(),
            education: String::new(),
            work_experience: String::new(),
            skills: String::new(),
            interests: String::new(),
            goals: String::new(),
            additional_info: String::new(),
            status: QuestionnaireStatus::Draft,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set(&mut self, field: Field, value: FieldValue) {
        use FieldValue::{Number, Text};
        match (field, value) {
            (Field::FullName, Text(v)) => self.full_name = v,
            (Field::Age, Number(v)) => self.age = v,
            (Field::Phone, Text(v)) => self.phone = v,
            (Field::Email, Text(v)) => self.email = v,
            (Field::Education, Text(v)) => self.education = v,
            (Field::WorkExperience, Text(v)) => self.work_experience = v,
            (Field::Skills, Text(v)) => self.skills = v,
            (Field::Interests, Text(v)) => self.interests = v,
            (Field::Goals, Text(v)) => self.goals = v,
            (Field::AdditionalInfo, Text(v)) => self.additional_info = v,
            (field, value) => {
                log::warn!("Mismatched value {:?} for field {:?}", value, field);
            }
        }
        self.updated_at = Utc::now();
    }

    /// Количество заполненных полей из десяти
    pub fn filled_count(&self) -> usize {
        let texts = [
            &self.full_name,
            &self.phone,
            &self.email,
            &self.education,
            &self.work_experience,
            &self.skills,
            &self.interests,
            &self.goals,
            &self.additional_info,
        ];
        let mut filled = texts.iter().filter(|v| !v.is_empty()).count();
        if self.age != 0 {
            filled += 1;
        }
        filled
    }

    pub fn completion_percentage(&self) -> u32 {
        (self.filled_count() * 100 / FIELD_COUNT) as u32
    }

    /// Полнота по шести обязательным полям
    pub fn is_complete(&self) -> bool {
        !self.full_name.is_empty()
            && self.age != 0
            && !self.phone.is_empty()
            && !self.email.is_empty()
            && !self.education.is_empty()
            && !self.work_experience.is_empty()
    }

    pub fn progress(&self) -> QuestionnaireProgress {
        QuestionnaireProgress {
            percentage: self.completion_percentage(),
            completed_fields: self.filled_count(),
            total_fields: FIELD_COUNT,
            is_complete: self.is_complete(),
        }
    }
}

impl Default for QuestionnaireDraft {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuestionnaireProgress {
    pub percentage: u32,
    pub completed_fields: usize,
    pub total_fields: usize,
    pub is_complete: bool,
}

impl QuestionnaireProgress {
    pub fn empty() -> Self {
        Self {
            percentage: 0,
            completed_fields: 0,
            total_fields: FIELD_COUNT,
            is_complete: false,
        }
    }
}
