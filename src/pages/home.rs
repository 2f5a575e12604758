use leptos::prelude::*;

use crate::components::graph_view::{GraphData, GraphEdge, GraphNode, GraphViewCanvas};

/// Generate sample graph data (deterministic random tree).
fn generate_sample_data(n: usize) -> GraphData {
	let nodes: Vec<GraphNode> = (0..n)
		.map(|i| {
			let mut node = GraphNode::new(i.to_string());
			if i < 10 {
				node.label = Some(format!("Node {}", i));
			}
			node
		})
		.collect();

	let edges: Vec<GraphEdge> = (1..n)
		.map(|i| {
			let target = (rand_simple(i) * (i as f64)) as usize;
			GraphEdge::new(format!("e{}", i), i.to_string(), target.to_string())
		})
		.collect();

	GraphData { nodes, edges }
}

/// Simple pseudo-random number generator (deterministic for consistency).
fn rand_simple(seed: usize) -> f64 {
	let x = ((seed + 1) * 9301 + 49297) % 233280;
	(x as f64) / 233280.0
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let graph_data = RwSignal::new(generate_sample_data(60));

	let add_node = move |_| {
		graph_data.update(|data| {
			let id = data.nodes.len().to_string();
			let anchor = (rand_simple(data.nodes.len()) * data.nodes.len() as f64) as usize;
			data.nodes.push(GraphNode::new(id.clone()));
			data.edges
				.push(GraphEdge::new(format!("e{}", id), id, anchor.to_string()));
		});
	};

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

			<div class="fullscreen-graph">
				<GraphViewCanvas data=graph_data fullscreen=true />
				<div class="graph-overlay">
					<h1>"Graph View"</h1>
					<p class="subtitle">
						"Click a node to select it. Ctrl+Z undoes, Ctrl+Shift+Z / Ctrl+Y redoes."
					</p>
					<button on:click=add_node>"Add node"</button>
				</div>
			</div>
		</ErrorBoundary>
	}
}
