// Read-only views over the task collection

use crate::models::Task;
use std::fmt;
use std::str::FromStr;

/// Which tasks to show by completion state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Visibility {
    #[default]
    All,
    Active,
    Done,
}

impl Visibility {
    pub fn admits(self, task: &Task) -> bool {
        match self {
            Visibility::All => true,
            Visibility::Active => !task.is_done,
            Visibility::Done => task.is_done,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Visibility::All => write!(f, "all"),
            Visibility::Active => write!(f, "active"),
            Visibility::Done => write!(f, "done"),
        }
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(Visibility::All),
            "active" => Ok(Visibility::Active),
            "done" => Ok(Visibility::Done),
            other => Err(format!("unknown visibility: {} (expected all, active or done)", other)),
        }
    }
}

/// Search query plus visibility, as held by the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filter {
    pub query: String,
    pub visibility: Visibility,
}

impl Filter {
    /// Tasks passing both the query and the visibility, in stored order
    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        search(tasks, &self.query)
            .into_iter()
            .filter(|task| self.visibility.admits(task))
            .collect()
    }
}

/// Case-insensitive substring match on the title
pub fn matches(task: &Task, query: &str) -> bool {
    query.is_empty() || task.title.to_lowercase().contains(&query.to_lowercase())
}

/// Filter `tasks` by `query`; an empty query returns everything in order
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    tasks.iter().filter(|task| matches(task, query)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskId;

    fn titles<'a>(tasks: &[&'a Task]) -> Vec<&'a str> {
        tasks.iter().map(|t| t.title.as_str()).collect()
    }

    fn sample() -> Vec<Task> {
        let mut house = Task::new(TaskId::new(2), "Clean House");
        house.toggle();
        vec![
            Task::new(TaskId::new(1), "Buy Milk"),
            house,
            Task::new(TaskId::new(3), "buy bread"),
        ]
    }

    #[test]
    fn test_search_empty_query_returns_all() {
        let tasks = sample();
        let result = search(&tasks, "");
        assert_eq!(result, tasks.iter().collect::<Vec<_>>());
    }

    #[test]
    fn test_search_case_insensitive() {
        let tasks = vec![
            Task::new(TaskId::new(1), "Buy Milk"),
            Task::new(TaskId::new(2), "Clean House"),
        ];
        assert_eq!(titles(&search(&tasks, "MILK")), vec!["Buy Milk"]);
    }

    #[test]
    fn test_search_keeps_order() {
        let tasks = sample();
        assert_eq!(titles(&search(&tasks, "buy")), vec!["Buy Milk", "buy bread"]);
    }

    #[test]
    fn test_search_no_match() {
        let tasks = sample();
        assert!(search(&tasks, "garage").is_empty());
    }

    #[test]
    fn test_search_whitespace_query_is_literal() {
        let tasks = sample();
        assert_eq!(titles(&search(&tasks, " ")), vec!["Buy Milk", "Clean House", "buy bread"]);
        assert!(search(&tasks, "  ").is_empty());
    }

    #[test]
    fn test_visibility() {
        let tasks = sample();
        let active = Filter {
            query: String::new(),
            visibility: Visibility::Active,
        };
        let done = Filter {
            query: String::new(),
            visibility: Visibility::Done,
        };
        assert_eq!(titles(&active.apply(&tasks)), vec!["Buy Milk", "buy bread"]);
        assert_eq!(titles(&done.apply(&tasks)), vec!["Clean House"]);
    }

    #[test]
    fn test_filter_combines_query_and_visibility() {
        let tasks = sample();
        let filter = Filter {
            query: "BUY".to_string(),
            visibility: Visibility::Active,
        };
        assert_eq!(titles(&filter.apply(&tasks)), vec!["Buy Milk", "buy bread"]);
    }

    #[test]
    fn test_visibility_parse_and_display() {
        assert_eq!("Active".parse::<Visibility>().unwrap(), Visibility::Active);
        assert_eq!(Visibility::Done.to_string(), "done");
        assert!("later".parse::<Visibility>().is_err());
    }
}
