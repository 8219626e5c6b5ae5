//! WASM entry point: mount the app to the document body.

use leptos::prelude::*;
use network_graph_canvas::{App, init_logging};

fn main() {
	init_logging();
	mount_to_body(App);
}
