//! Playlist derivation.
//!
//! Turns the flat, unordered segment collection into the reading-order
//! playlist plus the lookups the controller resolves positions with.

use std::collections::{HashMap, HashSet};

use crate::types::{AudioSegment, OrderedSegmentEntry, SegmentKey, Step, StepId, TalkingPointId};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentIndex {
	entries: Vec<OrderedSegmentEntry>,
	segment_by_step_key: HashMap<StepId, AudioSegment>,
	segment_by_step_and_point: HashMap<StepId, HashMap<TalkingPointId, AudioSegment>>,
	order_index_by_key: HashMap<SegmentKey, usize>,
	first_segment_index_by_step: HashMap<StepId, usize>,
}

impl SegmentIndex {
	/// Build the playlist for `steps` from `segments`.
	///
	/// Steps are walked in order and, inside a step, talking points in order.
	/// A step that narrates at least one talking point does not also play its
	/// step-level clip. Segments that match nothing in the structure are
	/// appended afterwards in the order they were supplied.
	pub fn build(steps: &[Step], segments: &[AudioSegment]) -> Self {
		let mut index = Self::default();

		for segment in segments.iter().filter(|s| s.is_well_formed()) {
			match &segment.talking_point_id {
				Some(point) => {
					index
						.segment_by_step_and_point
						.entry(segment.step_id.clone())
						.or_default()
						.entry(point.clone())
						.or_insert_with(|| segment.clone());
				}
				None => {
					index.segment_by_step_key.entry(segment.step_id.clone()).or_insert_with(|| segment.clone());
				}
			}
		}

		for step in steps {
			let points = index.segment_by_step_and_point.get(&step.id);
			let mut flow: Vec<AudioSegment> = step
				.talking_points
				.iter()
				.filter_map(|p| points.and_then(|by_point| by_point.get(&p.id)).cloned())
				.collect();

			if flow.is_empty() {
				flow.extend(index.segment_by_step_key.get(&step.id).cloned());
			}
			for segment in flow {
				index.push(segment);
			}
		}

		let known: HashSet<SegmentKey> = steps
			.iter()
			.flat_map(|step| {
				std::iter::once(SegmentKey::step(step.id.clone())).chain(step.talking_points.iter().map(|p| SegmentKey::point(step.id.clone(), p.id.clone())))
			})
			.collect();

		for segment in segments.iter().filter(|s| s.is_well_formed()) {
			if !known.contains(&segment.key()) {
				index.push(segment.clone());
			}
		}

		index
	}

	fn push(&mut self, segment: AudioSegment) {
		let key = segment.key();
		if self.order_index_by_key.contains_key(&key) {
			return;
		}
		let position = self.entries.len();
		self.order_index_by_key.insert(key.clone(), position);
		self.first_segment_index_by_step.entry(key.step_id.clone()).or_insert(position);
		self.entries.push(OrderedSegmentEntry { key, segment });
	}

	pub fn entries(&self) -> &[OrderedSegmentEntry] {
		&self.entries
	}

	pub fn get(&self, position: usize) -> Option<&OrderedSegmentEntry> {
		self.entries.get(position)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	pub fn keys(&self) -> impl Iterator<Item = &SegmentKey> {
		self.entries.iter().map(|e| &e.key)
	}

	/// Step-level clip for a step, whether or not it is part of the playlist
	pub fn segment_for_step(&self, step_id: &str) -> Option<&AudioSegment> {
		self.segment_by_step_key.get(step_id)
	}

	pub fn segment_for_point(&self, step_id: &str, talking_point_id: &str) -> Option<&AudioSegment> {
		self.segment_by_step_and_point.get(step_id).and_then(|points| points.get(talking_point_id))
	}

	pub fn has_point_segments(&self, step_id: &str) -> bool {
		self.segment_by_step_and_point.get(step_id).is_some_and(|points| !points.is_empty())
	}

	pub fn position_of(&self, key: &SegmentKey) -> Option<usize> {
		self.order_index_by_key.get(key).copied()
	}

	/// Playlist position following `key`, if any
	pub fn next_after(&self, key: &SegmentKey) -> Option<usize> {
		let next = self.position_of(key)? + 1;
		(next < self.entries.len()).then_some(next)
	}

	pub fn first_position_for_step(&self, step_id: &str) -> Option<usize> {
		self.first_segment_index_by_step.get(step_id).copied()
	}
}
