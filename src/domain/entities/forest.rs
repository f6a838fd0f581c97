//! Forest entity module
//!
//! A forest is an ordered sequence of job lines, each line a sequence of
//! internal jobs and/or external dependencies (spec §3). Dashes-only lines
//! split a family's text into forests at parse time. Internal items are
//! stored as job-name references; the `Job` values themselves live in the
//! owning `Family`'s `jobs_by_name` map so each job has exactly one owner.

use crate::domain::entities::ExternalDependency;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForestItem {
    Internal(String),
    External(ExternalDependency),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    pub lines: Vec<Vec<ForestItem>>,
}

impl Forest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn push_line(&mut self, line: Vec<ForestItem>) {
        self.lines.push(line);
    }

    pub fn internal_job_names(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().flatten().filter_map(|item| match item {
            ForestItem::Internal(name) => Some(name.as_str()),
            ForestItem::External(_) => None,
        })
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_forest_has_no_lines() {
        let forest = Forest::new();
        assert!(forest.is_empty());
        assert_eq!(forest.internal_job_names().count(), 0);
    }

    #[test]
    fn internal_job_names_skip_external_items() {
        let mut forest = Forest::new();
        forest.push_line(vec![
            ForestItem::Internal("J1".to_string()),
            ForestItem::External(ExternalDependency {
                family_name: "F2".to_string(),
                job_name: "JA".to_string(),
            }),
        ]);
        let names: Vec<_> = forest.internal_job_names().collect();
        assert_eq!(names, vec!["J1"]);
    }
}
