//! Board rendering for the Enclose GUI

use egui::{Align2, CornerRadius, FontId, Painter, Pos2, Rect, Sense, Shape, Stroke, Vec2};

use crate::board::{BoardLayout, EdgeId, GameState};

use super::theme::*;

/// Board view handles rendering and input for the game board
pub struct BoardView {
    /// Screen pixels per lattice unit
    scale: f32,
    /// Lattice point drawn at the center of `board_rect`
    lattice_center: (f64, f64),
    /// Board drawing area
    board_rect: Rect,
}

impl Default for BoardView {
    fn default() -> Self {
        Self {
            scale: 30.0,
            lattice_center: (0.0, 0.0),
            board_rect: Rect::NOTHING,
        }
    }
}

impl BoardView {
    /// Render the board and return the clicked edge if any
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        board: &BoardLayout,
        state: &GameState,
        last_move: Option<EdgeId>,
        hints: &[EdgeId],
        interactive: bool,
    ) -> Option<EdgeId> {
        let available_size = ui.available_size();
        let side = available_size.x.min(available_size.y) - 20.0;

        let (response, painter) = ui.allocate_painter(Vec2::new(side, side), Sense::click());
        self.board_rect = response.rect;
        self.fit(board);

        painter.rect_filled(self.board_rect, CornerRadius::same(4), BOARD_BG);
        painter.rect_stroke(
            self.board_rect,
            CornerRadius::same(4),
            Stroke::new(1.0, BOARD_BORDER),
            egui::StrokeKind::Inside,
        );

        self.draw_zones(&painter, board, state);
        self.draw_edges(&painter, board, state);

        for &edge in hints {
            let (x, y) = board.edge_midpoint(edge);
            painter.circle_stroke(self.to_screen(x, y), 7.0, Stroke::new(2.0, HINT_MARKER));
        }

        if let Some(edge) = last_move {
            let (x, y) = board.edge_midpoint(edge);
            painter.circle_filled(self.to_screen(x, y), LAST_MOVE_MARKER_RADIUS, LAST_MOVE_MARKER);
        }

        self.draw_dots(&painter, board);

        if !interactive {
            return None;
        }

        // Hover preview and click
        let pointer = response.hover_pos()?;
        let (x, y) = self.to_lattice(pointer);
        let edge = nearest_open_edge(board, state, (x, y), HIT_DISTANCE)?;

        let (a, b) = self.edge_points(board, edge);
        painter.line_segment([a, b], Stroke::new(EDGE_WIDTH, hover_preview(state.current_player())));

        if response.clicked() {
            Some(edge)
        } else {
            None
        }
    }

    /// Choose scale and center so the whole board fits the drawing area
    fn fit(&mut self, board: &BoardLayout) {
        let (x0, y0, x1, y1) = board.bounds();
        let span = (x1 - x0).max(y1 - y0).max(1.0) as f32;
        let usable = (self.board_rect.width().min(self.board_rect.height()) - 2.0 * BOARD_MARGIN).max(1.0);
        self.scale = usable / span;
        self.lattice_center = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    }

    fn draw_zones(&self, painter: &Painter, board: &BoardLayout, state: &GameState) {
        for zone in board.zones() {
            let Some(owner) = state.owner(zone.id) else {
                continue;
            };
            let points: Vec<Pos2> = zone
                .node_ids
                .iter()
                .map(|&n| {
                    let node = board.node(n);
                    self.to_screen(node.x, node.y)
                })
                .collect();
            if points.len() < 3 {
                continue;
            }
            let center = points.iter().fold(Vec2::ZERO, |acc, p| acc + p.to_vec2()) / points.len() as f32;
            painter.add(Shape::convex_polygon(points, zone_fill(owner), Stroke::NONE));
            painter.text(
                center.to_pos2(),
                Align2::CENTER_CENTER,
                owner.symbol().to_ascii_uppercase(),
                FontId::proportional(self.scale * 0.9),
                player_color(owner),
            );
        }
    }

    fn draw_edges(&self, painter: &Painter, board: &BoardLayout, state: &GameState) {
        for edge in board.edges() {
            let (a, b) = self.edge_points(board, edge.id);
            if state.is_occupied(edge.id) {
                painter.line_segment([a, b], Stroke::new(EDGE_WIDTH, DOT));
            } else {
                painter.line_segment([a, b], Stroke::new(GUIDE_WIDTH, EDGE_GUIDE));
            }
        }
    }

    fn draw_dots(&self, painter: &Painter, board: &BoardLayout) {
        for node in board.nodes() {
            painter.circle_filled(self.to_screen(node.x, node.y), DOT_RADIUS, DOT);
        }
    }

    fn edge_points(&self, board: &BoardLayout, edge: EdgeId) -> (Pos2, Pos2) {
        let e = board.edge(edge);
        let a = board.node(e.a);
        let b = board.node(e.b);
        (self.to_screen(a.x, a.y), self.to_screen(b.x, b.y))
    }

    /// Convert lattice coordinates (y up) to screen coordinates (y down)
    pub fn to_screen(&self, x: f64, y: f64) -> Pos2 {
        let center = self.board_rect.center();
        Pos2::new(
            center.x + (x - self.lattice_center.0) as f32 * self.scale,
            center.y - (y - self.lattice_center.1) as f32 * self.scale,
        )
    }

    /// Convert screen coordinates to lattice coordinates
    pub fn to_lattice(&self, pos: Pos2) -> (f64, f64) {
        let center = self.board_rect.center();
        (
            self.lattice_center.0 + ((pos.x - center.x) / self.scale) as f64,
            self.lattice_center.1 - ((pos.y - center.y) / self.scale) as f64,
        )
    }
}

/// Undrawn edge closest to `point`, if within `max_distance` (lattice units).
///
/// Ties go to the lowest edge id.
pub fn nearest_open_edge(
    board: &BoardLayout,
    state: &GameState,
    point: (f64, f64),
    max_distance: f64,
) -> Option<EdgeId> {
    let mut best: Option<(f64, EdgeId)> = None;
    for edge in state.legal_moves(board) {
        let e = board.edge(edge);
        let a = board.node(e.a);
        let b = board.node(e.b);
        let d = segment_distance(point, (a.x, a.y), (b.x, b.y));
        let closer = match best {
            Some((best_d, _)) => d < best_d,
            None => true,
        };
        if d <= max_distance && closer {
            best = Some((d, edge));
        }
    }
    best.map(|(_, edge)| edge)
}

fn segment_distance(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > 0.0 {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardPreset;
    use crate::rules::apply_move;

    #[test]
    fn test_pointer_snaps_to_edge_midpoint() {
        let board = BoardPreset::Mini.layout();
        let state = GameState::new();
        for edge in 0..board.edge_count() {
            let mid = board.edge_midpoint(edge);
            assert_eq!(nearest_open_edge(&board, &state, mid, HIT_DISTANCE), Some(edge));
        }
    }

    #[test]
    fn test_drawn_edges_are_skipped() {
        let board = BoardPreset::Mini.layout();
        let state = apply_move(&board, &GameState::new(), 0).state;
        let hit = nearest_open_edge(&board, &state, board.edge_midpoint(0), HIT_DISTANCE);
        assert_ne!(hit, Some(0));
    }

    #[test]
    fn test_far_pointer_hits_nothing() {
        let board = BoardPreset::Mini.layout();
        assert_eq!(nearest_open_edge(&board, &GameState::new(), (40.0, 40.0), HIT_DISTANCE), None);
    }

    #[test]
    fn test_segment_distance() {
        assert_eq!(segment_distance((0.0, 1.0), (-1.0, 0.0), (1.0, 0.0)), 1.0);
        assert_eq!(segment_distance((3.0, 0.0), (-1.0, 0.0), (1.0, 0.0)), 2.0);
    }
}
