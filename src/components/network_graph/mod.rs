mod component;
mod render;
pub mod sim;
mod state;
mod types;

pub use component::NetworkGraphCanvas;
pub use sim::{SimConfig, SimError, SimNode, Simulation};
pub use types::{MemberNode, NetworkData, NetworkLink};
