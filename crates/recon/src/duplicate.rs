use crate::align::Alignment;
use crate::artifacts::ArtifactSink;
use crate::error::SurveyError;
use crate::images::CaptureStore;
use crate::model::{PointName, PointSet};
use crate::operator::{ask_yes_no, Operator};

/// What one pass of the duplicate resolver did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicateOutcome {
    Removed(PointName),
    NoAction,
}

const TIP: &str = "Tip - follow the flight pattern as the numbers increase, comparing the \
planned and captured plots; look for the moment the captured numbers stop matching the planned ones.";

/// Ask whether a duplicate capture exists and, if so, delete it.
///
/// The duplicate's name must have both an image in `store` and a point in
/// `captured`; anything else re-prompts until the operator gives a valid
/// name or cancels. On acceptance the image is deleted, the point removed,
/// and the captured artifacts regenerated.
pub fn resolve(
    operator: &mut dyn Operator,
    store: &mut dyn CaptureStore,
    captured: &mut PointSet,
    sink: &mut dyn ArtifactSink,
    context: Alignment,
) -> Result<DuplicateOutcome, SurveyError> {
    operator.tell(&intro(context));

    if !ask_yes_no(operator, "Are there any duplicate images? ")? {
        log::info!("operator reports no duplicate captures");
        return Ok(DuplicateOutcome::NoAction);
    }

    let mut answer = operator.ask("What is the duplicate image number? ")?;
    let name = loop {
        match answer.trim().parse::<PointName>() {
            Ok(name) if captured.contains(name) && store.contains(name) => {
                match store.remove(name) {
                    Ok(_) => break name,
                    Err(e) => {
                        log::warn!("could not delete image {name}: {e}");
                        operator.tell(&format!("Could not delete image {name}: {e}"));
                    }
                }
            }
            _ => operator.tell("That image does not exist."),
        }
        answer = operator.ask("Enter a different image number: ")?;
    };

    captured.remove(name);
    log::info!("removed duplicate capture {name}; {} captured points remain", captured.len());
    sink.captured_changed(captured)?;

    Ok(DuplicateOutcome::Removed(name))
}

fn intro(context: Alignment) -> String {
    match context {
        Alignment::Deficit => format!(
            "There are fewer captured images than planned waypoints. Was the flight completed?\n\
             Before amending the flight plan, check whether any duplicate images were taken:\n\
             this happens in windy conditions when the drone repositions itself on the flight path.\n\
             {TIP}"
        ),
        _ => format!(
            "There are more captured images than planned waypoints, most likely a duplicate image.\n\
             {TIP}"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::NoArtifacts;
    use crate::model::{Point, SetKind};
    use crate::operator::ScriptedOperator;
    use std::collections::BTreeSet;
    use std::path::PathBuf;

    /// In-memory image store.
    #[derive(Default)]
    struct Images(BTreeSet<PointName>);

    impl CaptureStore for Images {
        fn contains(&self, name: PointName) -> bool {
            self.0.contains(&name)
        }

        fn remove(&mut self, name: PointName) -> Result<PathBuf, SurveyError> {
            self.0.remove(&name);
            Ok(PathBuf::from(format!("{name}.jpg")))
        }
    }

    fn captured(n: u32) -> PointSet {
        PointSet::new(SetKind::Captured, (1..=n).map(|i| Point::new(i, 0.0, 0.0)).collect())
            .unwrap()
    }

    #[test]
    fn no_duplicate_is_no_action() {
        let mut op = ScriptedOperator::new(["no"]);
        let mut store = Images((1..=4).collect());
        let mut set = captured(4);
        let out =
            resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Deficit).unwrap();
        assert_eq!(out, DuplicateOutcome::NoAction);
        assert_eq!(set.len(), 4);
        assert_eq!(store.0.len(), 4);
    }

    #[test]
    fn removes_named_duplicate() {
        let mut op = ScriptedOperator::new(["y", "3"]);
        let mut store = Images((1..=4).collect());
        let mut set = captured(4);
        let out =
            resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Excess).unwrap();
        assert_eq!(out, DuplicateOutcome::Removed(3));
        assert_eq!(set.names(), vec![1, 2, 4]);
        assert!(!store.contains(3));
    }

    #[test]
    fn reprompts_until_image_exists() {
        let mut op = ScriptedOperator::new(["yes", "9", "abc", "", "2"]);
        let mut store = Images((1..=4).collect());
        let mut set = captured(4);
        let out =
            resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Excess).unwrap();
        assert_eq!(out, DuplicateOutcome::Removed(2));
        let misses = op.transcript().iter().filter(|t| *t == "That image does not exist.").count();
        assert_eq!(misses, 3);
    }

    #[test]
    fn image_without_point_is_rejected() {
        let mut op = ScriptedOperator::new(["yes", "7", "1"]);
        let mut store = Images([1, 7].into_iter().collect());
        let mut set = captured(2);
        let out =
            resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Excess).unwrap();
        assert_eq!(out, DuplicateOutcome::Removed(1));
        assert!(store.contains(7));
    }

    /// Every image exists but the first deletion fails.
    #[derive(Default)]
    struct LockedOnce {
        failed: bool,
        removed: Vec<PointName>,
    }

    impl CaptureStore for LockedOnce {
        fn contains(&self, _: PointName) -> bool {
            true
        }

        fn remove(&mut self, name: PointName) -> Result<PathBuf, SurveyError> {
            if !self.failed {
                self.failed = true;
                return Err(SurveyError::Io(format!("{name}.jpg: permission denied")));
            }
            self.removed.push(name);
            Ok(PathBuf::from(format!("{name}.jpg")))
        }
    }

    #[test]
    fn failed_deletion_reprompts() {
        let mut op = ScriptedOperator::new(["y", "2", "3"]);
        let mut store = LockedOnce::default();
        let mut set = captured(4);
        let out =
            resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Excess).unwrap();

        assert_eq!(out, DuplicateOutcome::Removed(3));
        assert_eq!(set.names(), vec![1, 2, 4]);
        assert_eq!(store.removed, vec![3]);

        let transcript = op.transcript();
        let failure = transcript
            .iter()
            .position(|t| t.starts_with("Could not delete image 2:"))
            .unwrap();
        assert!(transcript[failure].contains("permission denied"));
        assert_eq!(transcript[failure + 1], "Enter a different image number: ");
        assert!(!transcript.iter().any(|t| t == "That image does not exist."));
    }

    #[test]
    fn cancel_leaves_state_untouched() {
        let mut op = ScriptedOperator::new(["yes", "9"]);
        let mut store = Images((1..=4).collect());
        let mut set = captured(4);
        let err = resolve(&mut op, &mut store, &mut set, &mut NoArtifacts, Alignment::Excess)
            .unwrap_err();
        assert!(matches!(err, SurveyError::Cancelled));
        assert_eq!(set.len(), 4);
        assert_eq!(store.0.len(), 4);
    }
}
