use std::collections::HashMap;

use log::{debug, warn};

use crate::model::{Question, QuestionId};

/// Nest a flat, parent-referencing list of questions into a forest.
///
/// Siblings are sorted ascending by `order` with ties kept in input order.
/// Records whose `parent_id` does not resolve to a question in the input never
/// become reachable from a root and are dropped. Input `children` are ignored.
pub fn build_forest(questions: Vec<Question>) -> Vec<Question> {
    let total = questions.len();

    let mut groups: HashMap<Option<QuestionId>, Vec<Question>> = HashMap::new();
    for mut question in questions {
        question.children.clear();
        groups.entry(question.parent_id).or_default().push(question);
    }
    for siblings in groups.values_mut() {
        siblings.sort_by_key(|q| q.order);
    }

    let roots = groups.remove(&None).unwrap_or_default();
    let forest: Vec<Question> = roots
        .into_iter()
        .map(|root| attach_children(root, &mut groups))
        .collect();

    // Anything still grouped hangs off a parent that was never placed
    let dropped: usize = groups.values().map(Vec::len).sum();
    if dropped > 0 {
        let mut parents: Vec<QuestionId> = groups.keys().flatten().copied().collect();
        parents.sort_unstable();
        warn!(
            "Dropped {} of {} questions with unresolved parents {:?}",
            dropped, total, parents
        );
    }
    debug!("Built question forest: {} nodes", count_nodes(&forest));

    forest
}

/// Each group is removed when consumed, so a cycle can never recurse forever.
fn attach_children(
    mut question: Question,
    groups: &mut HashMap<Option<QuestionId>, Vec<Question>>,
) -> Question {
    let children = groups.remove(&Some(question.id)).unwrap_or_default();
    question.children = children
        .into_iter()
        .map(|child| attach_children(child, groups))
        .collect();
    question
}

/// Total number of nodes in a forest, descendants included.
pub fn count_nodes(forest: &[Question]) -> usize {
    forest
        .iter()
        .map(|q| 1 + count_nodes(&q.children))
        .sum()
}

/// Depth-first search for a question anywhere in the forest.
pub fn find_question(forest: &[Question], id: QuestionId) -> Option<&Question> {
    for question in forest {
        if question.id == id {
            return Some(question);
        }
        if let Some(found) = find_question(&question.children, id) {
            return Some(found);
        }
    }
    None
}

/// Flat list sorted by `order` (ties by id), as served by the raw fetch path.
pub fn flat_listing(mut questions: Vec<Question>) -> Vec<Question> {
    for question in &mut questions {
        question.children.clear();
    }
    questions.sort_by_key(|q| (q.order, q.id));
    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentType;

    fn q(id: i32, parent_id: Option<i32>, order: i32) -> Question {
        Question {
            id,
            label: format!("Question {}", id),
            content: Some(ContentType::Text),
            order,
            unit: None,
            enum_values: Vec::new(),
            parent_id,
            children: Vec::new(),
        }
    }

    fn ids(questions: &[Question]) -> Vec<i32> {
        questions.iter().map(|q| q.id).collect()
    }

    #[test]
    fn test_empty_input_builds_empty_forest() {
        assert!(build_forest(Vec::new()).is_empty());
    }

    #[test]
    fn test_roots_and_children_sorted_by_order() {
        let forest = build_forest(vec![
            q(3, Some(1), 2),
            q(1, None, 1),
            q(2, Some(1), 1),
            q(4, None, 0),
        ]);

        assert_eq!(ids(&forest), vec![4, 1]);
        assert_eq!(ids(&forest[1].children), vec![2, 3]);
        assert_eq!(count_nodes(&forest), 4);
    }

    #[test]
    fn test_order_ties_keep_input_order() {
        let forest = build_forest(vec![q(5, None, 1), q(2, None, 1), q(9, None, 0)]);
        assert_eq!(ids(&forest), vec![9, 5, 2]);
    }

    #[test]
    fn test_multi_level_nesting() {
        let forest = build_forest(vec![
            q(1, None, 1),
            q(2, Some(1), 1),
            q(3, Some(2), 1),
            q(4, Some(3), 1),
        ]);

        assert_eq!(forest.len(), 1);
        let level2 = &forest[0].children;
        let level3 = &level2[0].children;
        let level4 = &level3[0].children;
        assert_eq!(ids(level2), vec![2]);
        assert_eq!(ids(level3), vec![3]);
        assert_eq!(ids(level4), vec![4]);
    }

    #[test]
    fn test_orphans_are_dropped() {
        let forest = build_forest(vec![q(1, None, 0), q(2, Some(99), 0), q(3, Some(2), 0)]);

        assert_eq!(ids(&forest), vec![1]);
        assert_eq!(count_nodes(&forest), 1);
        assert!(find_question(&forest, 2).is_none());
        assert!(find_question(&forest, 3).is_none());
    }

    #[test]
    fn test_cycles_terminate_and_are_dropped() {
        let forest = build_forest(vec![q(1, None, 0), q(2, Some(3), 0), q(3, Some(2), 0)]);
        assert_eq!(ids(&forest), vec![1]);
    }

    #[test]
    fn test_find_question_descends() {
        let forest = build_forest(vec![q(1, None, 0), q(2, Some(1), 0), q(3, Some(2), 0)]);
        assert_eq!(find_question(&forest, 3).map(|q| q.id), Some(3));
        assert!(find_question(&forest, 42).is_none());
    }

    #[test]
    fn test_flat_listing_order() {
        let mut nested = q(1, None, 2);
        nested.children.push(q(2, Some(1), 0));
        let flat = flat_listing(vec![nested, q(3, None, 0), q(2, Some(1), 0)]);

        assert_eq!(ids(&flat), vec![2, 3, 1]);
        assert!(flat.iter().all(|q| q.children.is_empty()));
    }
}
