//! The step tree (spec.md §9 "Step trees"): a heterogeneous nested list
//! recording what the engine did, grounded on the teacher's educational
//! step-by-step trace but reshaped into the tagged variant the spec calls
//! for instead of the teacher's bespoke struct hierarchy.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Step {
    Text(String),
    Group(Vec<Step>),
}

impl Step {
    pub fn text(message: impl Into<String>) -> Self {
        Step::Text(message.into())
    }

    pub fn group(title: impl Into<String>, children: Vec<Step>) -> Self {
        let mut items = vec![Step::Text(title.into())];
        items.extend(children);
        Step::Group(items)
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Step::Group(items) if items.is_empty())
    }
}

/// Accumulates steps for a single driver pass; flattened into a [`Step`]
/// tree at the end rather than built recursively, since most rewrite
/// sites just want to push one line and move on.
#[derive(Debug, Default, Clone)]
pub struct StepLog {
    entries: Vec<Step>,
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(Step::text(message));
    }

    pub fn push_group(&mut self, title: impl Into<String>, children: Vec<Step>) {
        if !children.is_empty() {
            self.entries.push(Step::group(title, children));
        }
    }

    pub fn into_steps(self) -> Vec<Step> {
        self.entries
    }

    pub fn into_step(self) -> Step {
        Step::Group(self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouping_nests_children_under_a_title() {
        let mut log = StepLog::new();
        log.push_group("pass 1", vec![Step::text("folded 1+1 to 2")]);
        let steps = log.into_steps();
        assert_eq!(steps.len(), 1);
        assert!(matches!(&steps[0], Step::Group(items) if items.len() == 2));
    }

    #[test]
    fn empty_group_is_dropped() {
        let mut log = StepLog::new();
        log.push_group("pass 1", vec![]);
        assert!(log.into_steps().is_empty());
    }
}
