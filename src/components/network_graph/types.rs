//! Input snapshot types consumed by the simulation.

/// A community member as supplied by the data layer.
#[derive(Clone, Debug)]
pub struct MemberNode {
	/// Stable identity.
	pub id: String,
	/// Display name.
	pub label: String,
	/// Weight attribute (support score) the node radius is derived from.
	pub weight: f64,
	/// Journey stage, used only for color.
	pub category: String,
	/// Marks the viewer's own node. At most one per snapshot; extras are
	/// demoted during validation.
	pub is_focal: bool,
}

/// A weighted connection between two members.
#[derive(Clone, Debug)]
pub struct NetworkLink {
	/// One endpoint's member id.
	pub from_id: String,
	/// The other endpoint's member id.
	pub to_id: String,
	/// Spring strength, expected in (0, 1].
	pub strength: f64,
}

/// The full input snapshot handed to the visualization once on mount.
#[derive(Clone, Debug, Default)]
pub struct NetworkData {
	/// Members to lay out.
	pub nodes: Vec<MemberNode>,
	/// Connections between them.
	pub links: Vec<NetworkLink>,
}
