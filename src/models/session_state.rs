use super::field::Field;

/// Положение пользователя в диалоге
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Главное меню, активного сценария нет
    #[default]
    Idle,
    /// Заполнение анкеты, ожидается ввод конкретного поля
    AwaitingField(Field),
    /// Меню существующей анкеты (просмотр/редактирование/удаление)
    ReviewingMenu,
    /// Все поля введены, ожидается сохранение или отмена
    ConfirmingSave,
}

impl SessionState {
    pub fn is_in_questionnaire(self) -> bool {
        matches!(self, SessionState::AwaitingField(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_field_states_count_as_questionnaire() {
        assert!(SessionState::AwaitingField(Field::Age).is_in_questionnaire());
        assert!(!SessionState::Idle.is_in_questionnaire());
        assert!(!SessionState::ReviewingMenu.is_in_questionnaire());
        assert!(!SessionState::ConfirmingSave.is_in_questionnaire());
    }
}
