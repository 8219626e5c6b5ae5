//! Force-directed layout simulation for the support network.
//!
//! Pure state machine with no DOM or canvas types: the component calls
//! [`Simulation::step`] once per animation frame and the renderer reads the
//! resulting positions. Three forces act on node velocity each step —
//! pairwise overlap repulsion, link springs toward a rest length, and a
//! centering pull on the focal node — followed by integration, damping, and
//! a hard clamp to the viewport.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;

use log::warn;

use super::types::NetworkData;

/// Tunable force constants.
///
/// The defaults are a visual-tuning choice, not a contract; callers wanting a
/// different feel override fields here instead of editing the loop.
#[derive(Clone, Debug)]
pub struct SimConfig {
	/// Gain applied to the overlap amount when two nodes sit closer than the
	/// sum of their radii plus `padding`.
	pub repulsion_gain: f64,
	/// Clearance beyond touching radii before repulsion stops acting.
	pub padding: f64,
	/// Spring rest length for links.
	pub rest_length: f64,
	/// Gain applied to the deviation from rest length, scaled by link strength.
	pub spring_gain: f64,
	/// Gain pulling the focal node toward the viewport center.
	pub center_gain: f64,
	/// Multiplicative velocity damping per step, < 1.
	pub damping: f64,
	/// Fraction of velocity kept (reflected inward) when a node hits a wall.
	pub bounce: f64,
	/// Radius of the focal node.
	pub focal_radius: f64,
	/// Base radius of every other node.
	pub base_radius: f64,
	/// Extra radius per unit of node weight.
	pub weight_scale: f64,
}

impl Default for SimConfig {
	fn default() -> Self {
		Self {
			repulsion_gain: 0.05,
			padding: 10.0,
			rest_length: 150.0,
			spring_gain: 0.01,
			center_gain: 0.01,
			damping: 0.9,
			bounce: 0.5,
			focal_radius: 35.0,
			base_radius: 25.0,
			weight_scale: 0.1,
		}
	}
}

/// Constructor failures. Malformed links are dropped with a warning rather
/// than surfaced here; the only fail-fast case is a link set with nothing to
/// attach to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimError {
	/// Links were supplied but the node set is empty.
	LinksWithoutNodes,
}

impl fmt::Display for SimError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::LinksWithoutNodes => write!(f, "links supplied without any nodes"),
		}
	}
}

impl Error for SimError {}

/// Live per-node simulation state plus the display attributes the renderer
/// needs (category color key, focal flag, label).
#[derive(Clone, Debug)]
pub struct SimNode {
	/// Stable identity from the input snapshot.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Journey stage, used only for color.
	pub category: String,
	/// Weight attribute the radius was derived from.
	pub weight: f64,
	/// Visual radius, always > 0.
	pub radius: f64,
	/// Whether this is the viewer's own node.
	pub is_focal: bool,
	/// Position.
	pub x: f64,
	/// Position.
	pub y: f64,
	/// Velocity.
	pub vx: f64,
	/// Velocity.
	pub vy: f64,
}

/// Link resolved to node indices at construction time.
#[derive(Clone, Copy, Debug)]
struct SimLink {
	a: usize,
	b: usize,
	strength: f64,
}

/// Resolved line segment handed to the renderer each frame.
#[derive(Clone, Copy, Debug)]
pub struct Segment {
	/// Endpoint of the link's first node.
	pub x1: f64,
	/// Endpoint of the link's first node.
	pub y1: f64,
	/// Endpoint of the link's second node.
	pub x2: f64,
	/// Endpoint of the link's second node.
	pub y2: f64,
	/// Link strength in (0, 1].
	pub strength: f64,
}

/// The layout engine. Owns all node positions and velocities; advanced by
/// [`Simulation::step`], queried by the renderer, never mutated elsewhere.
#[derive(Debug)]
pub struct Simulation {
	nodes: Vec<SimNode>,
	links: Vec<SimLink>,
	width: f64,
	height: f64,
	config: SimConfig,
}

impl Simulation {
	/// Builds a simulation from an input snapshot.
	///
	/// Self-links, links with an unknown endpoint, and links with strength
	/// ≤ 0 are dropped with a warning; strength above 1 is clamped to 1.
	/// If several nodes claim the focal flag, the first by insertion order
	/// wins. Positions are seeded pseudo-randomly from `seed` inside the
	/// viewport minus each node's radius; velocities start at zero.
	pub fn new(
		data: &NetworkData,
		width: f64,
		height: f64,
		config: SimConfig,
		seed: u64,
	) -> Result<Self, SimError> {
		if data.nodes.is_empty() && !data.links.is_empty() {
			return Err(SimError::LinksWithoutNodes);
		}

		let mut rng = seed;
		let mut nodes: Vec<SimNode> = Vec::with_capacity(data.nodes.len());
		let mut index_of = HashMap::new();
		let mut focal_seen = false;

		for member in &data.nodes {
			if index_of.contains_key(member.id.as_str()) {
				warn!("duplicate node id {:?} dropped", member.id);
				continue;
			}
			let mut is_focal = member.is_focal;
			if is_focal && focal_seen {
				warn!("extra focal node {:?} demoted", member.id);
				is_focal = false;
			}
			focal_seen |= is_focal;

			let radius = if is_focal {
				config.focal_radius
			} else {
				(config.base_radius + member.weight * config.weight_scale).max(1.0)
			};
			let x = radius + next_unit(&mut rng) * (width - 2.0 * radius).max(0.0);
			let y = radius + next_unit(&mut rng) * (height - 2.0 * radius).max(0.0);

			index_of.insert(member.id.clone(), nodes.len());
			nodes.push(SimNode {
				id: member.id.clone(),
				label: member.label.clone(),
				category: member.category.clone(),
				weight: member.weight,
				radius,
				is_focal,
				x,
				y,
				vx: 0.0,
				vy: 0.0,
			});
		}

		let mut links = Vec::with_capacity(data.links.len());
		for link in &data.links {
			if link.from_id == link.to_id {
				warn!("self-link on {:?} dropped", link.from_id);
				continue;
			}
			let (Some(&a), Some(&b)) = (
				index_of.get(link.from_id.as_str()),
				index_of.get(link.to_id.as_str()),
			) else {
				warn!("link {:?} -> {:?} references unknown node, dropped", link.from_id, link.to_id);
				continue;
			};
			if link.strength <= 0.0 {
				warn!("link {:?} -> {:?} has non-positive strength, dropped", link.from_id, link.to_id);
				continue;
			}
			links.push(SimLink {
				a,
				b,
				strength: link.strength.min(1.0),
			});
		}

		Ok(Self {
			nodes,
			links,
			width,
			height,
			config,
		})
	}

	/// Current nodes in insertion order.
	pub fn nodes(&self) -> &[SimNode] {
		&self.nodes
	}

	/// Resolved link segments for drawing.
	pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
		self.links.iter().map(|link| Segment {
			x1: self.nodes[link.a].x,
			y1: self.nodes[link.a].y,
			x2: self.nodes[link.b].x,
			y2: self.nodes[link.b].y,
			strength: link.strength,
		})
	}

	/// Number of links that survived validation.
	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	/// Viewport width.
	pub fn width(&self) -> f64 {
		self.width
	}

	/// Viewport height.
	pub fn height(&self) -> f64 {
		self.height
	}

	/// Moves a node to an exact position and zeroes its velocity. Returns
	/// false if the id is unknown. Useful for deterministic layouts.
	pub fn set_position(&mut self, id: &str, x: f64, y: f64) -> bool {
		match self.nodes.iter_mut().find(|n| n.id == id) {
			Some(node) => {
				node.x = x;
				node.y = y;
				node.vx = 0.0;
				node.vy = 0.0;
				true
			}
			None => false,
		}
	}

	/// Advances the simulation by one frame. No-op for an empty node set.
	pub fn step(&mut self) {
		let n = self.nodes.len();
		if n == 0 {
			return;
		}

		// Overlap repulsion between every pair closer than touching + padding.
		for i in 0..n {
			for j in (i + 1)..n {
				let dx = self.nodes[j].x - self.nodes[i].x;
				let dy = self.nodes[j].y - self.nodes[i].y;
				let dist = (dx * dx + dy * dy).sqrt();
				let min_dist = self.nodes[i].radius + self.nodes[j].radius + self.config.padding;
				if dist >= min_dist {
					continue;
				}
				// Coincident centers have no direction; push along x so the
				// pair still separates.
				let (ux, uy) = if dist > f64::EPSILON {
					(dx / dist, dy / dist)
				} else {
					(1.0, 0.0)
				};
				let f = (min_dist - dist) * self.config.repulsion_gain;
				self.nodes[i].vx -= ux * f;
				self.nodes[i].vy -= uy * f;
				self.nodes[j].vx += ux * f;
				self.nodes[j].vy += uy * f;
			}
		}

		// Springs along links toward the rest length.
		for link in &self.links {
			let dx = self.nodes[link.b].x - self.nodes[link.a].x;
			let dy = self.nodes[link.b].y - self.nodes[link.a].y;
			let dist = (dx * dx + dy * dy).sqrt();
			if dist <= f64::EPSILON {
				// Repulsion separates coincident endpoints first.
				continue;
			}
			let f = (dist - self.config.rest_length) * self.config.spring_gain * link.strength;
			let (ux, uy) = (dx / dist, dy / dist);
			self.nodes[link.a].vx += ux * f;
			self.nodes[link.a].vy += uy * f;
			self.nodes[link.b].vx -= ux * f;
			self.nodes[link.b].vy -= uy * f;
		}

		// Centering pull on the focal node only.
		let (cx, cy) = (self.width / 2.0, self.height / 2.0);
		for node in &mut self.nodes {
			if node.is_focal {
				node.vx += (cx - node.x) * self.config.center_gain;
				node.vy += (cy - node.y) * self.config.center_gain;
			}
		}

		// Integrate, damp, clamp.
		for node in &mut self.nodes {
			node.x += node.vx;
			node.y += node.vy;
			node.vx *= self.config.damping;
			node.vy *= self.config.damping;

			let (x, vx) = clamp_axis(node.x, node.vx, node.radius, self.width - node.radius, self.config.bounce);
			let (y, vy) = clamp_axis(node.y, node.vy, node.radius, self.height - node.radius, self.config.bounce);
			node.x = x;
			node.vx = vx;
			node.y = y;
			node.vy = vy;
		}
	}

	/// First node in insertion order whose circle contains the point, if any.
	/// Insertion order is the deterministic tie-break when circles overlap.
	pub fn hit_test(&self, px: f64, py: f64) -> Option<usize> {
		self.nodes.iter().position(|node| {
			let dx = px - node.x;
			let dy = py - node.y;
			(dx * dx + dy * dy).sqrt() < node.radius
		})
	}

	/// Adopts new viewport bounds and re-clamps existing positions into them.
	/// Never re-seeds.
	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		for node in &mut self.nodes {
			let (x, vx) = clamp_axis(node.x, node.vx, node.radius, width - node.radius, self.config.bounce);
			let (y, vy) = clamp_axis(node.y, node.vy, node.radius, height - node.radius, self.config.bounce);
			node.x = x;
			node.vx = vx;
			node.y = y;
			node.vy = vy;
		}
	}
}

/// Clamps `pos` into `[lo, hi]`; a clamped axis reflects velocity toward the
/// interior at `bounce` of its magnitude so nodes bounce softly off walls.
fn clamp_axis(pos: f64, vel: f64, lo: f64, hi: f64, bounce: f64) -> (f64, f64) {
	if lo > hi {
		// Node larger than the viewport: pin it to the middle.
		return ((lo + hi) / 2.0, 0.0);
	}
	if pos < lo {
		(lo, vel.abs() * bounce)
	} else if pos > hi {
		(hi, -vel.abs() * bounce)
	} else {
		(pos, vel)
	}
}

/// Simple pseudo-random number generator in [0, 1) (deterministic for a
/// given seed, no external crate needed for this).
fn next_unit(state: &mut u64) -> f64 {
	*state = state
		.wrapping_mul(6364136223846793005)
		.wrapping_add(1442695040888963407);
	(*state >> 33) as f64 / (1u64 << 31) as f64
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::network_graph::types::{MemberNode, NetworkLink};

	fn member(id: &str, weight: f64, focal: bool) -> MemberNode {
		MemberNode {
			id: id.into(),
			label: id.to_uppercase(),
			weight,
			category: "pregnancy".into(),
			is_focal: focal,
		}
	}

	fn link(from: &str, to: &str, strength: f64) -> NetworkLink {
		NetworkLink {
			from_id: from.into(),
			to_id: to.into(),
			strength,
		}
	}

	fn distance(a: &SimNode, b: &SimNode) -> f64 {
		((a.x - b.x).powi(2) + (a.y - b.y).powi(2)).sqrt()
	}

	fn pair_sim(strength: f64) -> Simulation {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false), member("b", 10.0, false)],
			links: vec![link("a", "b", strength)],
		};
		Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 7).unwrap()
	}

	#[test]
	fn empty_input_is_a_valid_noop() {
		let data = NetworkData::default();
		let mut sim = Simulation::new(&data, 300.0, 200.0, SimConfig::default(), 1).unwrap();
		sim.step();
		assert!(sim.nodes().is_empty());
		assert_eq!(sim.link_count(), 0);
	}

	#[test]
	fn links_without_nodes_fail_fast() {
		let data = NetworkData {
			nodes: vec![],
			links: vec![link("a", "b", 0.5)],
		};
		let err = Simulation::new(&data, 300.0, 200.0, SimConfig::default(), 1).unwrap_err();
		assert_eq!(err, SimError::LinksWithoutNodes);
	}

	#[test]
	fn invalid_links_are_dropped() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false), member("b", 10.0, false)],
			links: vec![
				link("a", "b", 0.8),
				link("a", "a", 1.0),    // self-link
				link("a", "ghost", 0.9), // unknown endpoint
				link("b", "a", 0.0),    // non-positive strength
			],
		};
		let sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 1).unwrap();
		assert_eq!(sim.link_count(), 1);
	}

	#[test]
	fn strength_above_one_is_clamped() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false), member("b", 10.0, false)],
			links: vec![link("a", "b", 3.0)],
		};
		let sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 1).unwrap();
		let seg = sim.segments().next().unwrap();
		assert_eq!(seg.strength, 1.0);
	}

	#[test]
	fn only_first_focal_claim_survives() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, true), member("b", 10.0, true)],
			links: vec![],
		};
		let sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 1).unwrap();
		let focal: Vec<&str> = sim
			.nodes()
			.iter()
			.filter(|n| n.is_focal)
			.map(|n| n.id.as_str())
			.collect();
		assert_eq!(focal, vec!["a"]);
	}

	#[test]
	fn positions_stay_in_bounds_under_long_iteration() {
		let nodes: Vec<MemberNode> = (0..20)
			.map(|i| member(&format!("n{i}"), (i * 7 % 50) as f64, i == 0))
			.collect();
		let links: Vec<NetworkLink> = (1..20)
			.map(|i| link(&format!("n{}", i / 2), &format!("n{i}"), 0.5 + (i % 5) as f64 * 0.1))
			.collect();
		let data = NetworkData { nodes, links };
		let mut sim = Simulation::new(&data, 640.0, 480.0, SimConfig::default(), 42).unwrap();
		for _ in 0..1000 {
			sim.step();
			for node in sim.nodes() {
				assert!(node.x >= node.radius && node.x <= 640.0 - node.radius, "x out of bounds for {}", node.id);
				assert!(node.y >= node.radius && node.y <= 480.0 - node.radius, "y out of bounds for {}", node.id);
			}
		}
	}

	#[test]
	fn spring_settles_at_rest_length() {
		// Concrete scenario: two weight-10 nodes, one strength-1 link, 400x400.
		let mut sim = pair_sim(1.0);
		for _ in 0..200 {
			sim.step();
		}
		let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
		assert!((d - 150.0).abs() < 5.0, "distance {d} not near rest length");
		for node in sim.nodes() {
			assert!(node.x > node.radius && node.x < 400.0 - node.radius);
			assert!(node.y > node.radius && node.y < 400.0 - node.radius);
		}
	}

	#[test]
	fn spring_deviation_shrinks_toward_tolerance() {
		let mut sim = pair_sim(1.0);
		sim.set_position("a", 100.0, 200.0);
		sim.set_position("b", 120.0, 200.0);
		// Approach is monotonic until the pair first comes within tolerance
		// of the rest length; after that the damped overshoot rings down.
		let mut prev = (distance(&sim.nodes()[0], &sim.nodes()[1]) - 150.0).abs();
		let mut steps = 0;
		while prev >= 10.0 {
			sim.step();
			steps += 1;
			assert!(steps < 200, "spring never reached tolerance, deviation {prev}");
			let dev = (distance(&sim.nodes()[0], &sim.nodes()[1]) - 150.0).abs();
			assert!(dev < prev, "deviation grew before settling: {prev} -> {dev}");
			prev = dev;
		}
		for _ in steps..200 {
			sim.step();
		}
		let dev = (distance(&sim.nodes()[0], &sim.nodes()[1]) - 150.0).abs();
		assert!(dev < 1.0, "spring did not settle, deviation {dev}");
	}

	#[test]
	fn repulsion_resolves_coincident_nodes() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false), member("b", 10.0, false)],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 3).unwrap();
		sim.set_position("a", 200.0, 200.0);
		sim.set_position("b", 200.0, 200.0);
		let touching = sim.nodes()[0].radius + sim.nodes()[1].radius;
		let mut prev = 0.0;
		for _ in 0..500 {
			sim.step();
			let d = distance(&sim.nodes()[0], &sim.nodes()[1]);
			if d >= touching {
				return;
			}
			assert!(d > prev, "distance did not grow: {prev} -> {d}");
			prev = d;
		}
		panic!("overlap never resolved, distance {prev}");
	}

	#[test]
	fn focal_node_drifts_toward_center() {
		let data = NetworkData {
			nodes: vec![member("me", 10.0, true)],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 9).unwrap();
		sim.set_position("me", 50.0, 350.0);
		for _ in 0..300 {
			sim.step();
		}
		let node = &sim.nodes()[0];
		assert!((node.x - 200.0).abs() < 2.0 && (node.y - 200.0).abs() < 2.0);
	}

	#[test]
	fn hit_test_center_hit_and_far_miss() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false), member("b", 10.0, false)],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 5).unwrap();
		sim.set_position("a", 100.0, 100.0);
		sim.set_position("b", 300.0, 300.0);
		let idx = sim.hit_test(100.0, 100.0).unwrap();
		assert_eq!(sim.nodes()[idx].id, "a");
		assert_eq!(sim.hit_test(200.0, 10.0), None);
	}

	#[test]
	fn hit_test_breaks_overlap_ties_by_insertion_order() {
		let data = NetworkData {
			nodes: vec![member("first", 10.0, false), member("second", 10.0, false)],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 400.0, 400.0, SimConfig::default(), 5).unwrap();
		sim.set_position("first", 200.0, 200.0);
		sim.set_position("second", 205.0, 200.0);
		let idx = sim.hit_test(202.0, 200.0).unwrap();
		assert_eq!(sim.nodes()[idx].id, "first");
	}

	#[test]
	fn resize_reclamps_instead_of_reseeding() {
		let data = NetworkData {
			nodes: vec![member("a", 10.0, false)],
			links: vec![],
		};
		let mut sim = Simulation::new(&data, 800.0, 600.0, SimConfig::default(), 11).unwrap();
		sim.set_position("a", 790.0, 590.0);
		let radius = sim.nodes()[0].radius;
		sim.resize(400.0, 300.0);
		let node = &sim.nodes()[0];
		assert_eq!(node.x, 400.0 - radius);
		assert_eq!(node.y, 300.0 - radius);
	}

	#[test]
	fn seeding_stays_inside_bounds() {
		let nodes: Vec<MemberNode> = (0..30).map(|i| member(&format!("n{i}"), 90.0, false)).collect();
		let data = NetworkData { nodes, links: vec![] };
		for seed in 0..10 {
			let sim = Simulation::new(&data, 500.0, 300.0, SimConfig::default(), seed).unwrap();
			for node in sim.nodes() {
				assert!(node.x >= node.radius && node.x <= 500.0 - node.radius);
				assert!(node.y >= node.radius && node.y <= 300.0 - node.radius);
			}
		}
	}
}
