use leptos::prelude::*;

use crate::components::network_graph::NetworkGraphCanvas;
use crate::data::community_network;

const LEGEND: &[(&str, &str)] = &[
	("Pregnancy", "#e9d5ff"),
	("Early Postpartum", "#fbcfe8"),
	("Ongoing Postpartum", "#a5f3fc"),
];

/// The network page: heading, stage legend, and the live graph canvas.
#[component]
pub fn Home() -> impl IntoView {
	let network = Signal::derive(community_network);

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="network-page">
				<h1>"Your Support Network"</h1>
				<p class="subtitle">
					"Connections in your community. Larger nodes have higher support "
					"scores; colors show journey stages. Hover over a node for details."
				</p>

				<div class="legend">
					{LEGEND
						.iter()
						.map(|(label, color)| {
							view! {
								<span class="legend-item">
									<span
										class="legend-swatch"
										style=format!("background-color: {color};")
									></span>
									{*label}
								</span>
							}
						})
						.collect_view()}
				</div>

				<div class="network-canvas-frame">
					<NetworkGraphCanvas data=network />
				</div>
			</div>
		</ErrorBoundary>
	}
}
