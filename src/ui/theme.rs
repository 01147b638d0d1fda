//! Theme constants for the Enclose GUI

use egui::Color32;

use crate::board::Player;

// Board colors
pub const BOARD_BG: Color32 = Color32::from_rgb(236, 230, 214);
pub const BOARD_BORDER: Color32 = Color32::from_rgb(190, 180, 160);
pub const DOT: Color32 = Color32::from_rgb(45, 45, 52);
pub const EDGE_GUIDE: Color32 = Color32::from_rgb(214, 206, 188);

// Player colors
pub const X_COLOR: Color32 = Color32::from_rgb(214, 72, 64);
pub const O_COLOR: Color32 = Color32::from_rgb(58, 112, 204);

// Markers
pub const LAST_MOVE_MARKER: Color32 = Color32::from_rgb(250, 196, 40);
pub const HINT_MARKER: Color32 = Color32::from_rgb(60, 170, 90);
pub const WIN_HIGHLIGHT: Color32 = Color32::from_rgb(50, 220, 50);

/// Solid color of a player's edges and marks
pub fn player_color(player: Player) -> Color32 {
    match player {
        Player::X => X_COLOR,
        Player::O => O_COLOR,
    }
}

/// Translucent fill of a captured zone
pub fn zone_fill(player: Player) -> Color32 {
    match player {
        Player::X => Color32::from_rgba_unmultiplied(214, 72, 64, 90),
        Player::O => Color32::from_rgba_unmultiplied(58, 112, 204, 90),
    }
}

pub fn hover_preview(player: Player) -> Color32 {
    match player {
        Player::X => Color32::from_rgba_unmultiplied(214, 72, 64, 120),
        Player::O => Color32::from_rgba_unmultiplied(58, 112, 204, 120),
    }
}

// Panel colors - dark modern theme
pub const PANEL_BG: Color32 = Color32::from_rgb(25, 27, 31);
pub const CARD_BG: Color32 = Color32::from_rgb(35, 38, 43);
pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(240, 240, 245);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(160, 165, 175);
pub const TEXT_MUTED: Color32 = Color32::from_rgb(120, 125, 135);

// Timer colors
pub const TIMER_NORMAL: Color32 = Color32::from_rgb(80, 200, 120);
pub const TIMER_WARNING: Color32 = Color32::from_rgb(255, 180, 50);
pub const TIMER_CRITICAL: Color32 = Color32::from_rgb(255, 70, 70);

// Sizes
pub const BOARD_MARGIN: f32 = 40.0;
pub const DOT_RADIUS: f32 = 4.5;
pub const EDGE_WIDTH: f32 = 5.0;
pub const GUIDE_WIDTH: f32 = 1.5;
pub const LAST_MOVE_MARKER_RADIUS: f32 = 4.0;
/// Pointer snap distance to an edge in lattice units (edges are 2 long)
pub const HIT_DISTANCE: f64 = 0.7;
