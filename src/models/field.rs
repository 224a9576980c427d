/// Поля анкеты в порядке заполнения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FullName,
    Age,
    Phone,
    Email,
    Education,
    WorkExperience,
    Skills,
    Interests,
    Goals,
    AdditionalInfo,
}

pub const FIELD_COUNT: usize = 10;

/// Проверенное значение поля
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    Number(u32),
}

impl Field {
    pub const fn first() -> Self {
        Field::FullName
    }

    /// Следующее поле в порядке заполнения; None после последнего
    pub fn next(self) -> Option<Self> {
        match self {
            Field::FullName => Some(Field::Age),
            Field::Age => Some(Field::Phone),
            Field::Phone => Some(Field::Email),
            Field::Email => Some(Field::Education),
            Field::Education => Some(Field::WorkExperience),
            Field::WorkExperience => Some(Field::Skills),
            Field::Skills => Some(Field::Interests),
            Field::Interests => Some(Field::Goals),
            Field::Goals => Some(Field::AdditionalInfo),
            Field::AdditionalInfo => None,
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Field::FullName => "Введите ваше полное имя (Фамилия Имя Отчество):",
            Field::Age => "Введите ваш возраст:",
            Field::Phone => "Введите ваш номер телефона:",
            Field::Email => "Введите ваш email:",
            Field::Education => "Введите ваше образование:",
            Field::WorkExperience => "Опишите ваш опыт работы:",
            Field::Skills => "Опишите ваши навыки:",
            Field::Interests => "Опишите ваши интересы:",
            Field::Goals => "Опишите ваши цели:",
            Field::AdditionalInfo => "Дополнительная информация (необязательно):",
        }
    }

    /// Валидация ввода. Err содержит текст для повторного запроса.
    pub fn validate(self, text: &str) -> Result<FieldValue, &'static str> {
        let trimmed = text.trim();
        match self {
            Field::FullName => {
                if trimmed.chars().count() < 2 {
                    return Err("❌ Имя слишком короткое. Введите полное имя:");
                }
                Ok(FieldValue::Text(trimmed.to_string()))
            }
            Field::Age => {
                let age: i64 = trimmed
                    .parse()
                    .map_err(|_| "❌ Введите корректный возраст (число):")?;
                if !(1..=120).contains(&age) {
                    return Err("❌ Возраст должен быть от 1 до 120 лет. Введите корректный возраст:");
                }
                Ok(FieldValue::Number(age as u32))
            }
            Field::Phone => {
                if trimmed.chars().count() < 10 {
                    return Err("❌ Номер телефона слишком короткий. Введите корректный номер:");
                }
                Ok(FieldValue::Text(trimmed.to_string()))
            }
            Field::Email => {
                if !trimmed.contains('@') || !trimmed.contains('.') {
                    return Err("❌ Введите корректный email адрес:");
                }
                Ok(FieldValue::Text(trimmed.to_string()))
            }
            // Свободный текст принимается как есть
            Field::Education
            | Field::WorkExperience
            | Field::Skills
            | Field::Interests
            | Field::Goals
            | Field::AdditionalInfo => Ok(FieldValue::Text(trimmed.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_requires_two_chars() {
        assert!(Field::FullName.validate("И").is_err());
        assert!(Field::FullName.validate("  И  ").is_err());
        assert_eq!(
            Field::FullName.validate(" Иванов Иван "),
            Ok(FieldValue::Text("Иванов Иван".to_string()))
        );
    }

    #[test]
    fn age_rejects_non_numeric_and_out_of_range() {
        assert!(Field::Age.validate("abc").is_err());
        assert!(Field::Age.validate("0").is_err());
        assert!(Field::Age.validate("200").is_err());
        assert!(Field::Age.validate("-5").is_err());
        assert_eq!(Field::Age.validate("30"), Ok(FieldValue::Number(30)));
        assert_eq!(Field::Age.validate("1"), Ok(FieldValue::Number(1)));
        assert_eq!(Field::Age.validate("120"), Ok(FieldValue::Number(120)));
    }

    #[test]
    fn phone_requires_ten_chars() {
        assert!(Field::Phone.validate("12345").is_err());
        assert_eq!(
            Field::Phone.validate("+1 5551234567"),
            Ok(FieldValue::Text("+1 5551234567".to_string()))
        );
    }

    #[test]
    fn email_requires_at_and_dot() {
        assert!(Field::Email.validate("user.example.com").is_err());
        assert!(Field::Email.validate("user@example").is_err());
        assert_eq!(
            Field::Email.validate("a@b.co"),
            Ok(FieldValue::Text("a@b.co".to_string()))
        );
    }

    #[test]
    fn free_text_accepted_as_is() {
        assert_eq!(
            Field::Education.validate("  высшее  "),
            Ok(FieldValue::Text("высшее".to_string()))
        );
        assert_eq!(
            Field::AdditionalInfo.validate(""),
            Ok(FieldValue::Text(String::new()))
        );
    }

    #[test]
    fn order_is_fixed_and_covers_all_fields() {
        let mut seen = vec![Field::first()];
        while let Some(next) = seen.last().unwrap().next() {
            seen.push(next);
        }
        assert_eq!(seen.len(), FIELD_COUNT);
        assert_eq!(seen.first(), Some(&Field::FullName));
        assert_eq!(seen.last(), Some(&Field::AdditionalInfo));
    }
}
