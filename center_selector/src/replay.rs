//! Feeds a recorded event stream through a [`Reconciler`].
//!
//! Input is JSON Lines, one tagged event per line:
//!
//! ```text
//! {"type":"controlled","value":{"latitude":-23.5,"longitude":-46.6}}
//! {"type":"idle","event":{"properties":{"center":[-46.7,-23.6]}}}
//! {"type":"location","event":{"coords":{"latitude":-23.4,"longitude":-46.5}}}
//! ```
//!
//! Idle and location payloads are kept raw so a malformed payload takes the
//! same path it would take in the widget.

use std::io::BufRead;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::{Coordinate, Reconciler, Update, UserLocationEvent};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReplayEvent {
    Controlled { value: Coordinate },
    Idle { event: serde_json::Value },
    Location { event: serde_json::Value },
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReplaySummary {
    pub events: usize,
    pub skipped_lines: usize,
    pub synced: usize,
    pub moved: usize,
    pub seeded: usize,
    pub unchanged: usize,
    pub final_center: Option<Coordinate>,
}

impl ReplaySummary {
    fn record(&mut self, update: Update) {
        match update {
            Update::Unchanged => self.unchanged += 1,
            Update::Synced(_) => self.synced += 1,
            Update::Moved(_) => self.moved += 1,
            Update::Seeded(_) => self.seeded += 1,
        }
    }
}

pub fn apply(reconciler: &mut Reconciler, event: &ReplayEvent) -> Update {
    match event {
        ReplayEvent::Controlled { value } => reconciler.on_controlled_value_changed(*value),
        ReplayEvent::Idle { event } => reconciler.on_map_idle_value(event),
        ReplayEvent::Location { event } => match UserLocationEvent::from_value(event.clone()) {
            Ok(e) => reconciler.on_user_location_event(&e),
            Err(e) => {
                log::warn!("Ignoring location event: {e}");
                Update::Unchanged
            }
        },
    }
}

/// Replays every line of `reader`. Blank lines are ignored, lines that are
/// not a [`ReplayEvent`] are logged and skipped. Only read errors abort.
pub fn replay<R: BufRead>(reader: R, reconciler: &mut Reconciler) -> anyhow::Result<ReplaySummary> {
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Cannot read line {line_no}"))?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let event = match serde_json::from_str::<ReplayEvent>(line) {
            Ok(e) => e,
            Err(e) => {
                log::error!("Skipping line {line_no}: {e}");
                summary.skipped_lines += 1;
                continue;
            }
        };

        let update = apply(reconciler, &event);
        log::debug!("Line {line_no}: {update:?}");
        summary.events += 1;
        summary.record(update);
    }

    summary.final_center = Some(reconciler.center());
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::io::Cursor;
    use std::rc::Rc;

    use super::*;
    use crate::SelectorConfig;

    #[test]
    fn replays_jsonl() {
        let input = r#"
{"type":"idle","event":{"properties":{"center":[20.0,10.0]}}}
{"type":"idle","event":{"properties":{"center":[30.0,11.0]}}}
this is not json
{"type":"idle","event":{"properties":{}}}
{"type":"location","event":{"coords":{"latitude":1.0,"longitude":2.0}}}
{"type":"controlled","value":{"latitude":5.0,"longitude":5.0}}
{"type":"teleport"}
"#;

        let calls = Rc::new(RefCell::new(vec![]));
        let calls_clone = calls.clone();
        let mut reconciler = Reconciler::new(
            None,
            Some(Coordinate::new(10.0, 20.0)),
            move |c| calls_clone.borrow_mut().push(c),
            &SelectorConfig::default(),
        );

        let summary = replay(Cursor::new(input), &mut reconciler).unwrap();

        assert_eq!(summary.events, 5);
        assert_eq!(summary.skipped_lines, 2);
        assert_eq!(summary.moved, 1);
        assert_eq!(summary.synced, 1);
        // Initial coordinates were supplied, so the fix is ignored
        assert_eq!(summary.seeded, 0);
        assert_eq!(summary.unchanged, 3);
        assert_eq!(summary.final_center, Some(Coordinate::new(5.0, 5.0)));
        assert_eq!(*calls.borrow(), vec![Coordinate::new(11.0, 30.0)]);
    }

    #[test]
    fn event_tags() {
        let event: ReplayEvent =
            serde_json::from_str(r#"{"type":"controlled","value":{"latitude":1.0,"longitude":2.0}}"#)
                .unwrap();
        assert_eq!(
            event,
            ReplayEvent::Controlled {
                value: Coordinate::new(1.0, 2.0)
            }
        );
    }
}
