use log::error;

use super::sim::{SimConfig, SimNode, Simulation};
use super::types::NetworkData;

/// Per-instance visualization state: the simulation plus the hover selection
/// the renderer highlights. Owned exclusively by one mounted canvas.
pub struct NetworkGraphState {
	pub sim: Simulation,
	pub hover: Option<usize>,
	pub animation_running: bool,
}

impl NetworkGraphState {
	/// Builds the state for a snapshot, or `None` (with an error log) when
	/// the snapshot is rejected outright.
	pub fn new(data: &NetworkData, width: f64, height: f64, seed: u64) -> Option<Self> {
		match Simulation::new(data, width, height, SimConfig::default(), seed) {
			Ok(sim) => Some(Self {
				sim,
				hover: None,
				animation_running: true,
			}),
			Err(err) => {
				error!("network snapshot rejected: {err}");
				None
			}
		}
	}

	pub fn tick(&mut self) {
		if self.animation_running {
			self.sim.step();
		}
	}

	/// Index of the node under the pointer, insertion order breaking ties.
	pub fn node_at_position(&self, x: f64, y: f64) -> Option<usize> {
		self.sim.hit_test(x, y)
	}

	pub fn set_hover(&mut self, node: Option<usize>) {
		self.hover = node;
	}

	pub fn hovered(&self) -> Option<&SimNode> {
		self.hover.and_then(|idx| self.sim.nodes().get(idx))
	}

	/// Adopts new canvas bounds; positions are re-clamped, never re-seeded.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.sim.resize(width, height);
		// The hovered node may have moved out from under the pointer.
		self.hover = None;
	}
}
