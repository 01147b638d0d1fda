//! Board topology: nodes, edges and zones of a diamond lattice
//!
//! A layout is built once per match from a list of odd row widths and then
//! shared read-only. Besides the raw graph it caches the derived tables the
//! rules and the AI query on every move: the zones incident to each edge, the
//! edges adjacent to each edge, per-zone edge masks and per-edge center weights.
//!
//! # Example
//!
//! ```
//! use enclose::board::BoardLayout;
//!
//! let board = BoardLayout::from_rows(&[1, 3, 5, 3, 1]);
//! assert_eq!(board.zone_count(), 13);
//! assert_eq!(board.edge_count(), 36);
//! assert_eq!(board.zone(0).edge_ids, vec![0, 1, 2, 3]);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use crate::error::{Error, Result};

use super::{EdgeId, IdSet, NodeId, ZoneId, MAX_IDS};

/// Half the side of a cell in lattice units
const HALF: i32 = 1;
/// Distance between neighbouring cell centers
const STEP: i32 = 2;

/// A lattice point
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

/// A drawable unit segment. Endpoints are canonicalized so that `a < b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge {
    pub id: EdgeId,
    pub a: NodeId,
    pub b: NodeId,
}

/// A cell bounded by its edges.
///
/// Boards built from rows always carry 4 corners (top-left, top-right,
/// bottom-right, bottom-left) and 4 edges in the same winding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: ZoneId,
    pub node_ids: Vec<NodeId>,
    pub edge_ids: Vec<EdgeId>,
}

/// Immutable board graph plus derived lookup tables.
#[derive(Debug, Clone)]
pub struct BoardLayout {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    zones: Vec<Zone>,
    /// Edge mask of each zone
    zone_masks: Vec<IdSet>,
    /// Zones incident to each edge, ascending
    edge_zones: Vec<Vec<ZoneId>>,
    /// Edges sharing a node or a zone with each edge, ascending
    adjacency: Vec<Vec<EdgeId>>,
    center_weights: Vec<f64>,
    all_edges: IdSet,
    /// Hash of the edge endpoints and zone masks
    fingerprint: u64,
}

/// Deduplicating builder for lattice construction
#[derive(Default)]
struct LatticeBuilder {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<(i32, i32), NodeId>,
    edge_index: HashMap<(NodeId, NodeId), EdgeId>,
}

impl LatticeBuilder {
    fn node(&mut self, x: i32, y: i32) -> NodeId {
        if let Some(&id) = self.node_index.get(&(x, y)) {
            return id;
        }
        let id = self.nodes.len();
        self.node_index.insert((x, y), id);
        self.nodes.push(Node {
            id,
            x: f64::from(x),
            y: f64::from(y),
        });
        id
    }

    fn edge(&mut self, p: NodeId, q: NodeId) -> EdgeId {
        let key = (p.min(q), p.max(q));
        if let Some(&id) = self.edge_index.get(&key) {
            return id;
        }
        let id = self.edges.len();
        self.edge_index.insert(key, id);
        self.edges.push(Edge {
            id,
            a: key.0,
            b: key.1,
        });
        id
    }
}

impl BoardLayout {
    /// Build a diamond board from row widths, top to bottom.
    ///
    /// Rows must be odd, positive and symmetric (e.g. `[1, 3, 5, 3, 1]`).
    /// Node and edge ids are assigned in construction order, row by row and
    /// left to right, so the same rows always yield the same ids.
    #[must_use]
    pub fn from_rows(rows: &[usize]) -> Self {
        debug_assert!(rows.iter().all(|w| w % 2 == 1), "row widths must be odd");

        let y_start = (rows.len() as i32 - 1) / 2;
        let mut lattice = LatticeBuilder::default();
        let mut zones = Vec::with_capacity(rows.iter().sum());

        for (row, &width) in rows.iter().enumerate() {
            let y = (y_start - row as i32) * STEP;
            let start = -(width as i32 - 1) / 2;

            for i in 0..width as i32 {
                let x = (start + i) * STEP;

                let top_left = lattice.node(x - HALF, y + HALF);
                let top_right = lattice.node(x + HALF, y + HALF);
                let bottom_left = lattice.node(x - HALF, y - HALF);
                let bottom_right = lattice.node(x + HALF, y - HALF);

                let top = lattice.edge(top_left, top_right);
                let right = lattice.edge(top_right, bottom_right);
                let bottom = lattice.edge(bottom_right, bottom_left);
                let left = lattice.edge(bottom_left, top_left);

                zones.push(Zone {
                    id: zones.len(),
                    node_ids: vec![top_left, top_right, bottom_right, bottom_left],
                    edge_ids: vec![top, right, bottom, left],
                });
            }
        }

        Self::assemble(lattice.nodes, lattice.edges, zones)
    }

    /// Build a layout from externally supplied parts, validating the topology.
    ///
    /// Ids must be dense (`list[i].id == i`), every reference must be in
    /// range, edges must join two distinct nodes, zones must list at least
    /// one edge and every edge must border one or two zones. Edge endpoints
    /// are canonicalized to `a < b`.
    pub fn from_parts(nodes: Vec<Node>, mut edges: Vec<Edge>, zones: Vec<Zone>) -> Result<Self> {
        if edges.len() > MAX_IDS {
            return Err(Error::TooLarge { kind: "edges", max: MAX_IDS });
        }
        if zones.len() > MAX_IDS {
            return Err(Error::TooLarge { kind: "zones", max: MAX_IDS });
        }

        for (index, node) in nodes.iter().enumerate() {
            if node.id != index {
                return Err(Error::NonDenseId { kind: "node", index, id: node.id });
            }
        }

        for (index, edge) in edges.iter_mut().enumerate() {
            if edge.id != index {
                return Err(Error::NonDenseId { kind: "edge", index, id: edge.id });
            }
            for node in [edge.a, edge.b] {
                if node >= nodes.len() {
                    return Err(Error::EdgeNodeOutOfRange { edge: index, node, nodes: nodes.len() });
                }
            }
            if edge.a == edge.b {
                return Err(Error::DegenerateEdge { edge: index, node: edge.a });
            }
            if edge.a > edge.b {
                std::mem::swap(&mut edge.a, &mut edge.b);
            }
        }

        for (index, zone) in zones.iter().enumerate() {
            if zone.id != index {
                return Err(Error::NonDenseId { kind: "zone", index, id: zone.id });
            }
            if zone.edge_ids.is_empty() {
                return Err(Error::EmptyZone { zone: index });
            }
            if let Some(&edge) = zone.edge_ids.iter().find(|&&e| e >= edges.len()) {
                return Err(Error::ZoneEdgeOutOfRange { zone: index, edge, edges: edges.len() });
            }
            if let Some(&node) = zone.node_ids.iter().find(|&&n| n >= nodes.len()) {
                return Err(Error::ZoneNodeOutOfRange { zone: index, node, nodes: nodes.len() });
            }
        }

        let mut incidence = vec![0usize; edges.len()];
        for zone in &zones {
            let distinct: IdSet = zone.edge_ids.iter().copied().collect();
            for edge in distinct.iter() {
                incidence[edge] += 1;
                if incidence[edge] > 2 {
                    return Err(Error::CrowdedEdge { edge, zones: incidence[edge] });
                }
            }
        }

        if let Some(edge) = incidence.iter().position(|&n| n == 0) {
            return Err(Error::OrphanEdge { edge });
        }

        Ok(Self::assemble(nodes, edges, zones))
    }

    /// Compute the derived tables. Inputs are assumed consistent.
    fn assemble(nodes: Vec<Node>, edges: Vec<Edge>, zones: Vec<Zone>) -> Self {
        let zone_masks: Vec<IdSet> = zones
            .iter()
            .map(|z| z.edge_ids.iter().copied().collect())
            .collect();

        let mut edge_zones = vec![Vec::new(); edges.len()];
        for (zone, mask) in zone_masks.iter().enumerate() {
            for edge in mask {
                edge_zones[edge].push(zone);
            }
        }

        let mut node_edges = vec![IdSet::new(); nodes.len()];
        for edge in &edges {
            node_edges[edge.a].insert(edge.id);
            node_edges[edge.b].insert(edge.id);
        }

        let adjacency = edges
            .iter()
            .map(|edge| {
                let mut near = node_edges[edge.a] | node_edges[edge.b];
                for &zone in &edge_zones[edge.id] {
                    near = near | zone_masks[zone];
                }
                near.remove(edge.id);
                near.iter().collect()
            })
            .collect();

        let center_weights = Self::center_weights(&nodes, &edges);
        let all_edges = IdSet::prefix(edges.len());

        let mut hasher = DefaultHasher::new();
        edges.hash(&mut hasher);
        zone_masks.hash(&mut hasher);
        let fingerprint = hasher.finish();

        Self {
            nodes,
            edges,
            zones,
            zone_masks,
            edge_zones,
            adjacency,
            center_weights,
            all_edges,
            fingerprint,
        }
    }

    /// Weight in [0, 1] of each edge midpoint by distance to the bounding-box center
    fn center_weights(nodes: &[Node], edges: &[Edge]) -> Vec<f64> {
        if nodes.is_empty() {
            return vec![0.0; edges.len()];
        }

        let (mut min_x, mut min_y) = (f64::INFINITY, f64::INFINITY);
        let (mut max_x, mut max_y) = (f64::NEG_INFINITY, f64::NEG_INFINITY);
        for node in nodes {
            min_x = min_x.min(node.x);
            min_y = min_y.min(node.y);
            max_x = max_x.max(node.x);
            max_y = max_y.max(node.y);
        }

        let cx = (min_x + max_x) / 2.0;
        let cy = (min_y + max_y) / 2.0;
        let max_dist = (max_x - cx).hypot(max_y - cy).max(1e-4);

        edges
            .iter()
            .map(|edge| {
                let a = nodes[edge.a];
                let b = nodes[edge.b];
                let mx = (a.x + b.x) / 2.0;
                let my = (a.y + b.y) / 2.0;
                (1.0 - (mx - cx).hypot(my - cy) / max_dist).max(0.0)
            })
            .collect()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    #[inline]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id]
    }

    #[inline]
    pub fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id]
    }

    /// Topology hash: equal for layouts with the same edges and zones.
    ///
    /// Search tables key positions by drawn edges only, so they use this to
    /// notice a board change.
    #[inline]
    pub fn fingerprint(&self) -> u64 {
        self.fingerprint
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Zones bounded by `edge`
    #[inline]
    pub fn zones_of(&self, edge: EdgeId) -> &[ZoneId] {
        &self.edge_zones[edge]
    }

    /// Edges sharing a node or a zone with `edge`
    #[inline]
    pub fn adjacent_edges(&self, edge: EdgeId) -> &[EdgeId] {
        &self.adjacency[edge]
    }

    /// Edge mask of a zone
    #[inline]
    pub fn zone_mask(&self, zone: ZoneId) -> &IdSet {
        &self.zone_masks[zone]
    }

    /// Positional bias in [0, 1], higher near the board center
    #[inline]
    pub fn center_weight(&self, edge: EdgeId) -> f64 {
        self.center_weights.get(edge).copied().unwrap_or(0.0)
    }

    /// Set of every edge id on the board
    #[inline]
    pub fn all_edges(&self) -> &IdSet {
        &self.all_edges
    }

    #[inline]
    pub fn contains_edge(&self, edge: EdgeId) -> bool {
        edge < self.edges.len()
    }

    /// Midpoint of an edge in lattice coordinates
    pub fn edge_midpoint(&self, edge: EdgeId) -> (f64, f64) {
        let e = self.edges[edge];
        let a = self.nodes[e.a];
        let b = self.nodes[e.b];
        ((a.x + b.x) / 2.0, (a.y + b.y) / 2.0)
    }

    /// Bounding box of all nodes as `(min_x, min_y, max_x, max_y)`
    pub fn bounds(&self) -> (f64, f64, f64, f64) {
        self.nodes.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(x0, y0, x1, y1), n| (x0.min(n.x), y0.min(n.y), x1.max(n.x), y1.max(n.y)),
        )
    }
}
