//! Main application for the Enclose GUI

use eframe::egui;
use egui::{CentralPanel, Context, CornerRadius, Frame, RichText, SidePanel, TopBottomPanel, Vec2};

use crate::board::{BoardPreset, Player};
use crate::config::EngineConfig;
use crate::eval::AiLevel;
use crate::rules::{near_capture_edges, Outcome};
use crate::session::MatchSession;

use super::board_view::BoardView;
use super::theme::*;

/// Main Enclose application
pub struct EncloseApp {
    session: MatchSession,
    board_view: BoardView,
    show_debug: bool,
    show_hints: bool,
    message: Option<String>,
}

impl Default for EncloseApp {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EncloseApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            session: MatchSession::new(BoardPreset::default(), Some(AiLevel::Medium), config),
            board_view: BoardView::default(),
            show_debug: true,
            show_hints: false,
            message: None,
        }
    }

    fn new_game(&mut self, preset: BoardPreset) {
        self.session.reset(preset);
        self.message = None;
    }

    /// Render the top menu bar
    fn render_menu_bar(&mut self, ctx: &Context) {
        TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("Game", |ui| {
                    for preset in BoardPreset::ALL {
                        if ui.button(format!("New Game ({})", preset.name())).clicked() {
                            self.new_game(preset);
                            ui.close_menu();
                        }
                    }
                    ui.separator();
                    if ui.button("Play as X").clicked() {
                        self.session.set_ai_player(Player::O);
                        self.new_game(self.session.preset());
                        ui.close_menu();
                    }
                    if ui.button("Play as O").clicked() {
                        self.session.set_ai_player(Player::X);
                        self.new_game(self.session.preset());
                        ui.close_menu();
                    }
                });

                ui.menu_button("AI", |ui| {
                    for level in AiLevel::ALL {
                        if ui.button(level.name()).clicked() {
                            self.session.set_ai_level(Some(level));
                            ui.close_menu();
                        }
                    }
                    if ui.button("Off (hotseat)").clicked() {
                        self.session.set_ai_level(None);
                        ui.close_menu();
                    }
                });

                ui.menu_button("View", |ui| {
                    ui.checkbox(&mut self.show_debug, "Debug Panel (D)");
                    ui.checkbox(&mut self.show_hints, "Capture Hints (H)");
                });

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let mode_text = match self.session.ai_seat() {
                        Some(seat) => format!("vs {} AI - You: {}", seat.level.name(), seat.player.opponent()),
                        None => "Hotseat".to_string(),
                    };
                    ui.label(mode_text);
                });
            });
        });
    }

    /// Render the side panel with game info and debug
    fn render_side_panel(&mut self, ctx: &Context) {
        SidePanel::right("info_panel")
            .min_width(240.0)
            .max_width(280.0)
            .frame(Frame::new().fill(PANEL_BG))
            .show(ctx, |ui| {
                ui.add_space(12.0);
                self.render_title_card(ui);
                ui.add_space(12.0);

                self.render_turn_card(ui);
                ui.add_space(10.0);

                self.render_score_card(ui);
                ui.add_space(10.0);

                self.render_actions_card(ui);

                if self.show_debug {
                    ui.add_space(10.0);
                    self.render_debug_card(ui);
                }

                if let Some(outcome) = self.session.winner() {
                    ui.add_space(10.0);
                    self.render_game_over_card(ui, outcome);
                }

                if let Some(msg) = self.message.clone() {
                    ui.add_space(10.0);
                    self.render_message_card(ui, &msg);
                }
            });
    }

    /// Helper to create a card frame
    fn card_frame() -> Frame {
        Frame::new()
            .fill(CARD_BG)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
    }

    fn render_title_card(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(RichText::new("ENCLOSE").size(22.0).strong().color(TEXT_PRIMARY));
        });
        ui.horizontal(|ui| {
            ui.add_space(8.0);
            ui.label(
                RichText::new(format!("{} board", self.session.preset().name()))
                    .size(11.0)
                    .color(TEXT_MUTED),
            );
        });
    }

    fn render_turn_card(&self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            let player = self.session.state().current_player();

            ui.horizontal(|ui| {
                let (rect, _) = ui.allocate_exact_size(Vec2::new(48.0, 48.0), egui::Sense::hover());
                ui.painter().circle_filled(rect.center(), 22.0, player_color(player));
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    player.symbol().to_ascii_uppercase(),
                    egui::FontId::proportional(26.0),
                    TEXT_PRIMARY,
                );

                ui.add_space(12.0);

                ui.vertical(|ui| {
                    ui.add_space(4.0);
                    ui.label(
                        RichText::new(format!("{} to move", player.symbol().to_ascii_uppercase()))
                            .size(18.0)
                            .strong()
                            .color(TEXT_PRIMARY),
                    );

                    let status = if self.session.is_over() {
                        ("Game Over".to_string(), WIN_HIGHLIGHT)
                    } else if let Some(elapsed) = self.session.ai_thinking_elapsed() {
                        let secs = elapsed.as_secs_f32();
                        let color = if secs < 0.8 {
                            TIMER_NORMAL
                        } else if secs < 1.5 {
                            TIMER_WARNING
                        } else {
                            TIMER_CRITICAL
                        };
                        (format!("AI thinking... {secs:.1}s"), color)
                    } else if self.session.is_ai_turn() {
                        ("AI to move".to_string(), TIMER_WARNING)
                    } else {
                        ("Your turn".to_string(), TIMER_NORMAL)
                    };
                    ui.label(RichText::new(status.0).size(12.0).color(status.1));
                });
            });
        });
    }

    fn render_score_card(&self, ui: &mut egui::Ui) {
        let score = self.session.score();
        let total = self.session.board().zone_count();
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ZONES").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);
            for player in Player::ALL {
                ui.horizontal(|ui| {
                    ui.label(
                        RichText::new(player.symbol().to_ascii_uppercase().to_string())
                            .size(18.0)
                            .strong()
                            .color(player_color(player)),
                    );
                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        ui.label(
                            RichText::new(format!("{} / {total}", score.of(player)))
                                .size(14.0)
                                .color(TEXT_SECONDARY),
                        );
                    });
                });
            }
        });
    }

    fn render_actions_card(&mut self, ui: &mut egui::Ui) {
        Self::card_frame().show(ui, |ui| {
            ui.label(RichText::new("ACTIONS").size(10.0).color(TEXT_MUTED));
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn_frame = Frame::new()
                    .fill(egui::Color32::from_rgb(50, 53, 58))
                    .corner_radius(CornerRadius::same(6))
                    .inner_margin(8.0);

                btn_frame.show(ui, |ui| {
                    let label = egui::Label::new(RichText::new("New Game").size(12.0).color(TEXT_PRIMARY));
                    if ui.add(label.sense(egui::Sense::click())).clicked() {
                        self.new_game(self.session.preset());
                    }
                });
            });

            ui.add_space(8.0);
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new(format!("Move #{}", self.session.move_count()))
                        .size(11.0)
                        .color(TEXT_SECONDARY),
                );
            });
        });
    }

    fn render_debug_card(&self, ui: &mut egui::Ui) {
        Frame::new()
            .fill(egui::Color32::from_rgb(30, 33, 38))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(RichText::new("AI DEBUG").size(10.0).color(TEXT_MUTED));
                ui.add_space(6.0);

                if let Some(result) = self.session.last_ai_result() {
                    ui.horizontal(|ui| {
                        ui.vertical(|ui| {
                            ui.label(
                                RichText::new(format!("{:?}", result.search_type))
                                    .size(11.0)
                                    .strong()
                                    .color(TIMER_NORMAL),
                            );
                            ui.label(RichText::new(format!("Score: {}", result.score)).size(10.0).color(TEXT_SECONDARY));
                            if result.depth > 0 {
                                ui.label(RichText::new(format!("Depth: {}", result.depth)).size(10.0).color(TEXT_SECONDARY));
                            }
                        });
                        ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                            ui.vertical(|ui| {
                                ui.label(RichText::new(format!("{}ms", result.time_ms)).size(10.0).color(TEXT_SECONDARY));
                                ui.label(RichText::new(format!("{} nodes", result.nodes)).size(10.0).color(TEXT_MUTED));
                            });
                        });
                    });

                    if let Some(edge) = result.best_move {
                        ui.add_space(4.0);
                        ui.label(RichText::new(format!("-> edge {edge}")).size(12.0).strong().color(WIN_HIGHLIGHT));
                    }
                } else {
                    ui.label(RichText::new("Waiting for AI...").size(10.0).color(TEXT_MUTED));
                }
            });
    }

    fn render_game_over_card(&mut self, ui: &mut egui::Ui, outcome: Outcome) {
        let headline = match outcome {
            Outcome::Win(player) => format!("{} WINS!", player.symbol().to_ascii_uppercase()),
            Outcome::Draw => "DRAW".to_string(),
        };
        let score = self.session.score();

        Frame::new()
            .fill(egui::Color32::from_rgb(45, 80, 55))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.vertical_centered(|ui| {
                    ui.label(RichText::new("GAME OVER").size(12.0).color(egui::Color32::from_rgb(180, 255, 180)));
                    ui.add_space(8.0);
                    ui.label(RichText::new(headline).size(18.0).strong().color(TEXT_PRIMARY));
                    ui.label(RichText::new(format!("{} - {}", score.x, score.o)).size(14.0).color(WIN_HIGHLIGHT));
                    ui.add_space(12.0);

                    Frame::new()
                        .fill(egui::Color32::from_rgb(60, 100, 70))
                        .corner_radius(CornerRadius::same(6))
                        .inner_margin(10.0)
                        .show(ui, |ui| {
                            let label = egui::Label::new(RichText::new("New Game").size(14.0).strong().color(TEXT_PRIMARY));
                            if ui.add(label.sense(egui::Sense::click())).clicked() {
                                self.new_game(self.session.preset());
                            }
                        });
                });
            });
    }

    fn render_message_card(&self, ui: &mut egui::Ui, msg: &str) {
        Frame::new()
            .fill(egui::Color32::from_rgb(80, 60, 30))
            .corner_radius(CornerRadius::same(8))
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.label(RichText::new(msg).size(11.0).color(TEXT_PRIMARY));
            });
    }

    fn render_board(&mut self, ctx: &Context) {
        CentralPanel::default().show(ctx, |ui| {
            let board = self.session.board();
            let state = self.session.state();
            let hints = if self.show_hints {
                near_capture_edges(board, state)
            } else {
                Vec::new()
            };
            let interactive = self.session.is_human_turn() && !self.session.is_ai_thinking();

            let clicked = self
                .board_view
                .show(ui, board, state, self.session.last_move(), &hints, interactive);

            if let Some(edge) = clicked {
                self.message = self.session.try_play(edge).err().map(|r| r.to_string());
            }
        });
    }

    fn handle_input(&mut self, ctx: &Context) {
        ctx.input(|i| {
            // D - Toggle debug panel
            if i.key_pressed(egui::Key::D) {
                self.show_debug = !self.show_debug;
            }

            // H - Toggle capture hints
            if i.key_pressed(egui::Key::H) {
                self.show_hints = !self.show_hints;
            }

            // N - New game
            if i.key_pressed(egui::Key::N) {
                self.new_game(self.session.preset());
            }
        });
    }
}

impl eframe::App for EncloseApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_input(ctx);

        self.session.poll_ai();
        if self.session.is_ai_turn() {
            self.session.start_ai_thinking();
        }

        self.render_menu_bar(ctx);
        self.render_side_panel(ctx);
        self.render_board(ctx);

        if self.session.is_ai_thinking() {
            ctx.request_repaint();
        }
    }
}
