//! Static community snapshot backing the demo.
//!
//! Mirrors the seed data of the community app: a dozen members across the
//! three journey stages, with the viewer ("Sarah Johnson") as the focal node.
//! Link strength is jittered deterministically into [0.5, 1.0] so the layout
//! looks organic without an external randomness source.

use crate::components::network_graph::{MemberNode, NetworkData, NetworkLink};

struct Member {
	id: &'static str,
	name: &'static str,
	support: f64,
	stage: &'static str,
	connections: &'static [&'static str],
}

const MEMBERS: &[Member] = &[
	Member {
		id: "user1",
		name: "Sarah Johnson",
		support: 85.0,
		stage: "pregnancy",
		connections: &["user2", "user3", "user4", "user7", "user8", "user12"],
	},
	Member {
		id: "user2",
		name: "Emily Rodriguez",
		support: 110.0,
		stage: "early-postpartum",
		connections: &["user1", "user3", "user5", "user6"],
	},
	Member {
		id: "user3",
		name: "Jessica Kim",
		support: 65.0,
		stage: "pregnancy",
		connections: &["user1", "user2", "user7"],
	},
	Member {
		id: "user4",
		name: "Michelle Torres",
		support: 130.0,
		stage: "ongoing-postpartum",
		connections: &["user1", "user5", "user6", "user7"],
	},
	Member {
		id: "user5",
		name: "Ashley Williams",
		support: 95.0,
		stage: "ongoing-postpartum",
		connections: &["user2", "user4", "user6"],
	},
	Member {
		id: "user6",
		name: "Lisa Chen",
		support: 75.0,
		stage: "early-postpartum",
		connections: &["user2", "user4", "user5"],
	},
	Member {
		id: "user7",
		name: "Nicole Taylor",
		support: 60.0,
		stage: "pregnancy",
		connections: &["user1", "user3", "user4"],
	},
	Member {
		id: "user8",
		name: "Maya Patel",
		support: 45.0,
		stage: "pregnancy",
		connections: &["user1", "user3", "user9", "user11"],
	},
	Member {
		id: "user9",
		name: "Isabella Rodriguez",
		support: 92.0,
		stage: "pregnancy",
		connections: &["user2", "user5", "user8", "user10", "user12"],
	},
	Member {
		id: "user10",
		name: "Olivia Chen",
		support: 78.0,
		stage: "early-postpartum",
		connections: &["user4", "user6", "user9", "user11"],
	},
	Member {
		id: "user11",
		name: "Aisha Mohammed",
		support: 55.0,
		stage: "pregnancy",
		connections: &["user3", "user8", "user10", "user12"],
	},
	Member {
		id: "user12",
		name: "Sophie Anderson",
		support: 88.0,
		stage: "early-postpartum",
		connections: &["user1", "user7", "user9", "user11"],
	},
];

/// Id of the viewer's own node.
pub const VIEWER_ID: &str = "user1";

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// The network snapshot for the demo community.
///
/// Each unordered connection pair is emitted once, regardless of how many
/// member records list it.
pub fn community_network() -> NetworkData {
	let nodes: Vec<MemberNode> = MEMBERS
		.iter()
		.map(|m| MemberNode {
			id: m.id.into(),
			label: m.name.into(),
			weight: m.support,
			category: m.stage.into(),
			is_focal: m.id == VIEWER_ID,
		})
		.collect();

	let mut links = Vec::new();
	let mut seen = std::collections::HashSet::new();
	for member in MEMBERS {
		for other in member.connections {
			let key = if member.id < *other {
				(member.id, *other)
			} else {
				(*other, member.id)
			};
			if seen.insert(key) {
				links.push(NetworkLink {
					from_id: key.0.into(),
					to_id: key.1.into(),
					strength: 0.5 + rand_simple(links.len()) * 0.5,
				});
			}
		}
	}

	NetworkData { nodes, links }
}
