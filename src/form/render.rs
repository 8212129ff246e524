use log::warn;
use serde::Serialize;

use crate::form::{AnswerStore, InputStrategy};
use crate::model::{AnswerValue, ContentType, Question, QuestionId, Unit};

/// Option shown by a single-choice input, in display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoiceOption {
    pub value: String,
    pub label: String,
}

/// One scalar input bound to the answer store under `key`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Binding {
    pub key: String,
    pub question_id: QuestionId,
    pub label: String,
    pub strategy: InputStrategy,
    pub unit: Option<Unit>,
    pub options: Vec<ChoiceOption>,
    /// Current value from the store; `None` when never answered
    pub value: Option<AnswerValue>,
}

impl Binding {
    fn new(question: &Question, strategy: InputStrategy, answers: &AnswerStore) -> Self {
        let key = question.id.to_string();
        let value = answers.get_answer(&key).cloned();
        let options = match strategy {
            InputStrategy::SingleChoice => question
                .enum_values
                .iter()
                .map(|ev| ChoiceOption {
                    value: ev.value.clone(),
                    label: ev.label.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        Self {
            key,
            question_id: question.id,
            label: question.label.clone(),
            strategy,
            unit: question.unit,
            options,
            value,
        }
    }

    /// Text the input shows: the stored value, or empty.
    pub fn display_value(&self) -> String {
        self.value
            .as_ref()
            .map(AnswerValue::to_answer_string)
            .unwrap_or_default()
    }
}

/// Rendered view of a question tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormNode {
    /// Grouping node: a card at depth 0, a heading below that
    Section {
        id: QuestionId,
        label: String,
        depth: usize,
        children: Vec<FormNode>,
    },
    /// Table question: one cell binding per direct child
    Table {
        id: QuestionId,
        label: String,
        cells: Vec<Binding>,
    },
    /// Scalar input, with any child questions nested beneath it
    Field {
        binding: Binding,
        children: Vec<FormNode>,
    },
}

impl FormNode {
    pub fn id(&self) -> QuestionId {
        match self {
            FormNode::Section { id, .. } | FormNode::Table { id, .. } => *id,
            FormNode::Field { binding, .. } => binding.question_id,
        }
    }

    fn collect_bindings<'a>(&'a self, out: &mut Vec<&'a Binding>) {
        match self {
            FormNode::Section { children, .. } => {
                children.iter().for_each(|child| child.collect_bindings(out));
            }
            FormNode::Table { cells, .. } => out.extend(cells.iter()),
            FormNode::Field { binding, children } => {
                out.push(binding);
                children.iter().for_each(|child| child.collect_bindings(out));
            }
        }
    }
}

/// Walk the forest and produce nested controls bound to `answers`.
pub fn render_form(forest: &[Question], answers: &AnswerStore) -> Vec<FormNode> {
    forest
        .iter()
        .map(|question| render_node(question, answers, 0))
        .collect()
}

pub fn render_node(question: &Question, answers: &AnswerStore, depth: usize) -> FormNode {
    let render_children = |children: &[Question]| -> Vec<FormNode> {
        children
            .iter()
            .map(|child| render_node(child, answers, depth + 1))
            .collect()
    };

    match InputStrategy::for_content(question.content) {
        None => FormNode::Section {
            id: question.id,
            label: question.label.clone(),
            depth,
            children: render_children(&question.children),
        },
        Some(InputStrategy::TabularComposite) => render_table(question, answers),
        Some(strategy) => FormNode::Field {
            binding: Binding::new(question, strategy, answers),
            children: render_children(&question.children),
        },
    }
}

fn render_table(question: &Question, answers: &AnswerStore) -> FormNode {
    let cells = question
        .children
        .iter()
        .map(|child| {
            if !is_table_cell_content(child.content) || !child.children.is_empty() {
                warn!(
                    "Table {} has non-scalar column {}; rendering it as a text cell",
                    question.id, child.id
                );
            }
            Binding::new(child, InputStrategy::for_table_cell(child), answers)
        })
        .collect();

    FormNode::Table {
        id: question.id,
        label: question.label.clone(),
        cells,
    }
}

/// Every scalar binding of a rendered form, in render order.
pub fn bindings(nodes: &[FormNode]) -> Vec<&Binding> {
    let mut out = Vec::new();
    for node in nodes {
        node.collect_bindings(&mut out);
    }
    out
}

/// Content tag a table cell is expected to carry.
pub fn is_table_cell_content(content: Option<ContentType>) -> bool {
    matches!(content, Some(ContentType::Text) | Some(ContentType::Number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EnumValue;

    fn q(id: i32, content: Option<ContentType>, children: Vec<Question>) -> Question {
        Question {
            id,
            label: format!("Label {}", id),
            content,
            order: 0,
            unit: None,
            enum_values: Vec::new(),
            parent_id: None,
            children,
        }
    }

    #[test]
    fn test_empty_section_renders_titled_container() {
        let nodes = render_form(&[q(1, None, Vec::new())], &AnswerStore::new());
        assert_eq!(
            nodes,
            vec![FormNode::Section {
                id: 1,
                label: "Label 1".to_string(),
                depth: 0,
                children: Vec::new(),
            }]
        );
        assert!(bindings(&nodes).is_empty());
    }

    #[test]
    fn test_sections_recurse_with_depth() {
        let forest = vec![q(
            1,
            None,
            vec![q(2, None, vec![q(3, Some(ContentType::Text), Vec::new())])],
        )];
        let nodes = render_form(&forest, &AnswerStore::new());

        let FormNode::Section { children, .. } = &nodes[0] else {
            panic!("expected a section");
        };
        let FormNode::Section { depth, children, .. } = &children[0] else {
            panic!("expected a nested section");
        };
        assert_eq!(*depth, 1);
        assert!(matches!(&children[0], FormNode::Field { binding, .. } if binding.key == "3"));
    }

    #[test]
    fn test_table_binds_children_not_itself() {
        let mut revenue = q(11, Some(ContentType::Number), Vec::new());
        revenue.unit = Some(Unit::Percentage);
        let table = q(
            10,
            Some(ContentType::Table),
            vec![q(12, Some(ContentType::Text), Vec::new()), revenue],
        );

        let mut answers = AnswerStore::new();
        answers.set_answer("11", AnswerValue::Number(12.5));

        let nodes = render_form(&[table], &answers);
        let FormNode::Table { id, cells, .. } = &nodes[0] else {
            panic!("expected a table");
        };
        assert_eq!(*id, 10);

        let keys: Vec<&str> = cells.iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["12", "11"]);
        assert_eq!(cells[0].strategy, InputStrategy::FreeText);
        assert_eq!(cells[1].strategy, InputStrategy::NumericScalar);
        assert_eq!(cells[1].unit, Some(Unit::Percentage));
        assert_eq!(cells[1].display_value(), "12.5");
        assert!(bindings(&nodes).iter().all(|b| b.key != "10"));
    }

    #[test]
    fn test_choice_binding_keeps_option_order() {
        let mut color = q(2, Some(ContentType::Enum), Vec::new());
        color.enum_values = vec![
            EnumValue { id: 1, value: "red".to_string(), order: 0, label: "Red".to_string() },
            EnumValue { id: 2, value: "blue".to_string(), order: 1, label: "Blue".to_string() },
        ];

        let nodes = render_form(&[color], &AnswerStore::new());
        let all = bindings(&nodes);
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].strategy, InputStrategy::SingleChoice);

        let labels: Vec<&str> = all[0].options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["Red", "Blue"]);
        assert_eq!(all[0].value, None);
        assert_eq!(all[0].display_value(), "");
    }

    #[test]
    fn test_scalar_children_render_nested() {
        let parent = q(
            1,
            Some(ContentType::Text),
            vec![q(2, Some(ContentType::Number), Vec::new())],
        );
        let nodes = render_form(&[parent], &AnswerStore::new());

        let keys: Vec<&str> = bindings(&nodes).iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2"]);
        assert_eq!(nodes[0].id(), 1);
    }

    #[test]
    fn test_table_cell_content() {
        assert!(is_table_cell_content(Some(ContentType::Number)));
        assert!(!is_table_cell_content(Some(ContentType::Enum)));
        assert!(!is_table_cell_content(None));
    }
}
