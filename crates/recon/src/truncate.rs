use serde::Serialize;

use crate::artifacts::ArtifactSink;
use crate::error::SurveyError;
use crate::model::{PointName, PointSet};
use crate::operator::Operator;

/// A plan truncation, as chosen by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Truncation {
    /// Listed points, in the order given.
    Individual { names: Vec<PointName> },
    /// Every point whose name lies in `start..=end`.
    Range { start: PointName, end: PointName },
}

impl std::fmt::Display for Truncation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Individual { names } => {
                let list: Vec<String> = names.iter().map(|n| n.to_string()).collect();
                write!(f, "{}", list.join(", "))
            }
            Self::Range { start, end } => write!(f, "from {start} to {end}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Individual,
    Range,
}

const MODE_PROMPT: &str = "Do you want to delete individual points (e.g. 1, 2, 3) or a range of \
points (e.g. 1 to 250) from the flight plan? ";
const LIST_PROMPT: &str = "Enter the flight plan point number(s) to delete (comma-separated): ";
const START_PROMPT: &str = "Enter the first flight plan point number to delete: ";
const END_PROMPT: &str = "Enter the last flight plan point number to delete: ";
const RETRY_PROMPT: &str = "Enter a valid flight plan point number to delete: ";

/// Remove planned points so the plan matches the captures.
///
/// Every name the operator supplies is validated against `planned` before
/// anything is removed. Afterwards `planned` is sorted by name and its
/// artifacts regenerated.
pub fn truncate(
    operator: &mut dyn Operator,
    planned: &mut PointSet,
    sink: &mut dyn ArtifactSink,
) -> Result<Truncation, SurveyError> {
    operator.tell(
        "Now we know there are no duplicates, we can amend the flight plan to match the \
         number of images taken.",
    );

    let truncation = match ask_mode(operator)? {
        Mode::Individual => {
            let names = ask_list(operator, planned)?;
            let removed = planned.remove_names(&names);
            log::info!("removed planned points {removed:?}");
            Truncation::Individual { names }
        }
        Mode::Range => {
            let start = ask_member(operator, planned, START_PROMPT, 1)?;
            let end = ask_member(operator, planned, END_PROMPT, start)?;
            let removed = planned.remove_range(start, end);
            log::info!("removed {} planned points from {start} to {end}", removed.len());
            Truncation::Range { start, end }
        }
    };

    planned.sort_by_name();
    sink.planned_changed(planned)?;
    Ok(truncation)
}

fn ask_mode(operator: &mut dyn Operator) -> Result<Mode, SurveyError> {
    loop {
        let answer = operator.ask(MODE_PROMPT)?;
        match answer.trim().to_ascii_lowercase().as_str() {
            "individual" | "i" => return Ok(Mode::Individual),
            "range" | "r" => return Ok(Mode::Range),
            _ => operator.tell("Enter individual or range"),
        }
    }
}

/// Ask for a comma-separated list until every entry names a planned point.
/// The whole list is re-requested on any bad entry.
fn ask_list(operator: &mut dyn Operator, planned: &PointSet) -> Result<Vec<PointName>, SurveyError> {
    loop {
        let answer = operator.ask(LIST_PROMPT)?;
        let entries: Vec<&str> = answer
            .split(',')
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .collect();

        if entries.is_empty() {
            operator.tell("Enter at least one point number");
            continue;
        }

        let mut names = Vec::with_capacity(entries.len());
        let mut missing = Vec::new();
        for entry in entries {
            match entry.parse::<PointName>() {
                Ok(name) if planned.contains(name) => {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                _ => missing.push(entry),
            }
        }

        if missing.is_empty() {
            return Ok(names);
        }
        operator.tell(&format!("Points [{}] not present in the flight plan", missing.join(", ")));
    }
}

/// Ask for a single planned point name no lower than `floor`.
fn ask_member(
    operator: &mut dyn Operator,
    planned: &PointSet,
    prompt: &str,
    floor: PointName,
) -> Result<PointName, SurveyError> {
    let mut answer = operator.ask(prompt)?;
    loop {
        match answer.trim().parse::<PointName>() {
            Ok(name) if name >= floor && planned.contains(name) => return Ok(name),
            Ok(name) if planned.contains(name) => {
                operator.tell(&format!("Point {name} comes before the start of the range ({floor})"));
            }
            _ => operator.tell(&format!("Point {} not present in the flight plan", answer.trim())),
        }
        answer = operator.ask(RETRY_PROMPT)?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::NoArtifacts;
    use crate::model::{Point, SetKind};
    use crate::operator::ScriptedOperator;

    fn planned(names: &[PointName]) -> PointSet {
        PointSet::new(
            SetKind::Planned,
            names.iter().map(|&n| Point::new(n, f64::from(n), 0.0)).collect(),
        )
        .unwrap()
    }

    #[test]
    fn individual_removal() {
        let mut op = ScriptedOperator::new(["I", "5, 2"]);
        let mut set = planned(&[1, 2, 3, 4, 5]);
        let t = truncate(&mut op, &mut set, &mut NoArtifacts).unwrap();
        assert_eq!(t, Truncation::Individual { names: vec![5, 2] });
        assert_eq!(set.names(), vec![1, 3, 4]);
    }

    #[test]
    fn individual_reprompts_whole_list() {
        let mut op = ScriptedOperator::new(["individual", "2, 9, x", "", "2,3"]);
        let mut set = planned(&[1, 2, 3, 4]);
        let t = truncate(&mut op, &mut set, &mut NoArtifacts).unwrap();
        assert_eq!(t, Truncation::Individual { names: vec![2, 3] });
        assert_eq!(set.names(), vec![1, 4]);
        assert!(op.transcript().iter().any(|t| t == "Points [9, x] not present in the flight plan"));
        let asks = op.transcript().iter().filter(|t| *t == LIST_PROMPT).count();
        assert_eq!(asks, 3);
    }

    #[test]
    fn range_removal_ignores_gaps() {
        let mut op = ScriptedOperator::new(["range", "2", "6"]);
        let mut set = planned(&[1, 2, 4, 6, 7]);
        let t = truncate(&mut op, &mut set, &mut NoArtifacts).unwrap();
        assert_eq!(t, Truncation::Range { start: 2, end: 6 });
        assert_eq!(set.names(), vec![1, 7]);
    }

    #[test]
    fn range_endpoints_validated_separately() {
        let mut op = ScriptedOperator::new(["r", "3", "4", "1", "9", "5"]);
        let mut set = planned(&[1, 2, 4, 5]);
        let t = truncate(&mut op, &mut set, &mut NoArtifacts).unwrap();
        // 3 missing, start 4; end 1 below start, 9 missing, end 5
        assert_eq!(t, Truncation::Range { start: 4, end: 5 });
        assert_eq!(set.names(), vec![1, 2]);
        let retries = op.transcript().iter().filter(|t| *t == RETRY_PROMPT).count();
        assert_eq!(retries, 3);
    }

    #[test]
    fn mode_reprompts() {
        let mut op = ScriptedOperator::new(["both", "R", "1", "1"]);
        let mut set = planned(&[1, 2]);
        truncate(&mut op, &mut set, &mut NoArtifacts).unwrap();
        assert!(op.transcript().iter().any(|t| t == "Enter individual or range"));
        assert_eq!(set.names(), vec![2]);
    }

    #[test]
    fn display() {
        assert_eq!(Truncation::Individual { names: vec![4, 7] }.to_string(), "4, 7");
        assert_eq!(Truncation::Range { start: 4, end: 5 }.to_string(), "from 4 to 5");
    }
}
