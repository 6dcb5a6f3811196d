use std::collections::{HashMap, HashSet};

use crate::types::{Step, StepId};

/// UI element a step can be scrolled to
pub trait StepAnchor: Send {
	fn scroll_into_view(&mut self);
}

/// Per-step anchors retained by the controller
#[derive(Default)]
pub struct AnchorRegistry {
	anchors: HashMap<StepId, Box<dyn StepAnchor>>,
}

impl AnchorRegistry {
	pub fn register(&mut self, step_id: impl Into<StepId>, anchor: Box<dyn StepAnchor>) {
		self.anchors.insert(step_id.into(), anchor);
	}

	pub fn unregister(&mut self, step_id: &str) -> bool {
		self.anchors.remove(step_id).is_some()
	}

	/// Drop anchors whose step is no longer present; returns how many went
	pub fn retain_steps(&mut self, steps: &[Step]) -> usize {
		let live: HashSet<&str> = steps.iter().map(|s| s.id.as_str()).collect();
		let before = self.anchors.len();
		self.anchors.retain(|id, _| live.contains(id.as_str()));
		before - self.anchors.len()
	}

	pub fn scroll_to(&mut self, step_id: &str) -> bool {
		match self.anchors.get_mut(step_id) {
			Some(anchor) => {
				anchor.scroll_into_view();
				true
			}
			None => false,
		}
	}

	pub fn contains(&self, step_id: &str) -> bool {
		self.anchors.contains_key(step_id)
	}

	pub fn len(&self) -> usize {
		self.anchors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.anchors.is_empty()
	}
}

impl std::fmt::Debug for AnchorRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let mut ids: Vec<&StepId> = self.anchors.keys().collect();
		ids.sort();
		f.debug_struct("AnchorRegistry").field("steps", &ids).finish()
	}
}
