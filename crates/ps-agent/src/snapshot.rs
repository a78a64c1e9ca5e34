//! Owned, read-only views of agent state handed to callers.

use std::sync::Arc;

use ps_core::{AgentId, JourneyId, Point, StageId};

use crate::Agent;

/// The externally visible state of one agent at snapshot time.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentSnapshot {
    pub id:         AgentId,
    pub position:   Point,
    pub journey_id: JourneyId,
    pub stage_id:   StageId,
}

impl From<&Agent> for AgentSnapshot {
    fn from(a: &Agent) -> Self {
        Self {
            id:         a.id,
            position:   a.position,
            journey_id: a.journey_id,
            stage_id:   a.stage_id,
        }
    }
}

/// Iterator over an immutable agent snapshot, in ascending id order.
///
/// Cloning is O(1) (the backing slice is shared) and yields an independent
/// cursor, so a sequence can be walked any number of times.  Later
/// simulation steps never affect an `Agents` value already handed out.
#[derive(Clone, Debug)]
pub struct Agents {
    items: Arc<[AgentSnapshot]>,
    next:  usize,
}

impl Agents {
    /// All snapshots, independent of the cursor position.
    pub fn as_slice(&self) -> &[AgentSnapshot] {
        &self.items
    }

    /// Restart from the first agent.
    pub fn rewind(&mut self) {
        self.next = 0;
    }
}

impl FromIterator<AgentSnapshot> for Agents {
    fn from_iter<I: IntoIterator<Item = AgentSnapshot>>(iter: I) -> Self {
        Self { items: iter.into_iter().collect(), next: 0 }
    }
}

impl Iterator for Agents {
    type Item = AgentSnapshot;

    fn next(&mut self) -> Option<AgentSnapshot> {
        let item = self.items.get(self.next).copied()?;
        self.next += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.items.len() - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Agents {}
