use leptos::prelude::*;

/// 404 fallback page.
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<div class="not-found">
			<h1>"Page not found"</h1>
			<p>
				"Nothing lives here. "
				<a href="/">"Back to your support network"</a>
			</p>
		</div>
	}
}
