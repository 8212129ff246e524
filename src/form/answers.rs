use indexmap::IndexMap;

use crate::model::AnswerValue;

/// Flat map from question id (string form) to the current answer, independent of tree shape.
///
/// Iteration follows first-insertion order. Overwriting a key keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnswerStore {
    answers: IndexMap<String, AnswerValue>,
}

impl AnswerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or overwrite the answer for `question_id`. No type validation happens here.
    pub fn set_answer(&mut self, question_id: impl Into<String>, value: AnswerValue) {
        self.answers.insert(question_id.into(), value);
    }

    /// `None` means never set; `Some(AnswerValue::Null)` means explicitly cleared.
    pub fn get_answer(&self, question_id: &str) -> Option<&AnswerValue> {
        self.answers.get(question_id)
    }

    pub fn clear_answers(&mut self) {
        self.answers.clear();
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &AnswerValue)> {
        self.answers.iter().map(|(key, value)| (key.as_str(), value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overwrite_keeps_single_entry() {
        let mut store = AnswerStore::new();
        store.set_answer("1", AnswerValue::from("first"));
        store.set_answer("1", AnswerValue::from("second"));

        assert_eq!(store.len(), 1);
        assert_eq!(store.get_answer("1"), Some(&AnswerValue::from("second")));
    }

    #[test]
    fn test_null_is_distinct_from_unset() {
        let mut store = AnswerStore::new();
        store.set_answer("1", AnswerValue::from("x"));
        store.set_answer("1", AnswerValue::Null);

        assert_eq!(store.get_answer("1"), Some(&AnswerValue::Null));
        assert_eq!(store.get_answer("2"), None);
    }

    #[test]
    fn test_clear_empties_store() {
        let mut store = AnswerStore::new();
        for id in 1..=5 {
            store.set_answer(id.to_string(), AnswerValue::from(id));
        }
        assert_eq!(store.len(), 5);

        store.clear_answers();
        assert!(store.is_empty());
        assert_eq!(store.get_answer("3"), None);

        store.set_answer("3", AnswerValue::from("again"));
        assert_eq!(store.iter().count(), 1);
    }

    #[test]
    fn test_iteration_follows_first_insertion() {
        let mut store = AnswerStore::new();
        store.set_answer("10", AnswerValue::from("a"));
        store.set_answer("2", AnswerValue::from("b"));
        store.set_answer("10", AnswerValue::from("c"));

        let keys: Vec<&str> = store.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["10", "2"]);
    }
}
