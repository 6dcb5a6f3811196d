/// Step index narrated at `current_time` of a single track spanning `step_count` steps.
///
/// `None` when there are no steps or the duration is not yet known.
pub fn step_index_at(current_time: f64, duration: f64, step_count: usize) -> Option<usize> {
	if step_count == 0 || !duration.is_finite() || duration <= 0.0 || !current_time.is_finite() {
		return None;
	}
	let ratio = (current_time / duration).max(0.0);
	let index = (ratio * step_count as f64).floor() as usize;
	Some(index.min(step_count - 1))
}

/// Offset into the track where `step_index` begins
pub fn step_start_time(step_index: usize, duration: f64, step_count: usize) -> Option<f64> {
	if step_count == 0 || !duration.is_finite() || duration <= 0.0 {
		return None;
	}
	Some(duration * step_index.min(step_count - 1) as f64 / step_count as f64)
}
