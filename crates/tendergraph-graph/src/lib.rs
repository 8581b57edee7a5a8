pub mod builder;
pub mod cluster;
pub mod graph;
pub mod path;
pub mod similarity;
pub mod view;

pub use builder::build_graph;
pub use cluster::{find_cartel_clusters, find_cartel_clusters_with, DEFAULT_MIN_CARTEL_SIZE, DEFAULT_MIN_CO_BIDS};
pub use graph::{EdgeKind, GraphEdge, GraphNode, NodeKind, TenderGraph};
pub use path::shortest_path;
pub use view::{neighborhood, project, GraphView, ViewEdge, ViewNode};
