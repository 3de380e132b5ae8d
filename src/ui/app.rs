//! Main overlay window.
//!
//! Implements eframe::App on top of [`Overlay`]: translates egui key events,
//! swallows the ones the overlay prevents, and paints the intro, the search
//! container, the results list and the toast stack from overlay state.

use std::time::Instant;

use eframe::egui::{self, Align2, Color32, Event, FontId, Frame, Margin, RichText, TextEdit};

use crate::input::{Key, KeyCode, KeyEvent};
use crate::ui::intro::{SUBTITLE, TITLE};
use crate::ui::overlay::Overlay;
use crate::ui::results::SearchResultsList;

/// Seconds for the container and intro fades.
const REVEAL_SECONDS: f32 = 0.5;

/// Seconds for toast fades.
const TOAST_SECONDS: f32 = 0.3;

/// Gap between the container and the bottom of the window.
const BOTTOM_GAP: f32 = 16.0;

const BAR_FILL: Color32 = Color32::from_rgba_premultiplied(58, 59, 71, 230);
const PANEL_FILL: Color32 = Color32::from_rgba_premultiplied(26, 26, 28, 204);
const MUTED: Color32 = Color32::from_rgb(0x8e, 0x8e, 0xa0);

/// The overlay application.
pub struct FloatbarApp {
    overlay: Overlay,
    /// Bar rectangle from the previous frame, for mousedown hit-testing.
    last_bar_rect: Option<egui::Rect>,
    /// A press landed inside the focused bar this frame; the text field keeps focus.
    keep_focus: bool,
}

impl FloatbarApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, overlay: Overlay) -> Self {
        Self {
            overlay,
            last_bar_rect: None,
            keep_focus: false,
        }
    }

    /// Feed this frame's keydowns to the overlay and drop the suppressed ones.
    fn handle_keyboard(&mut self, ctx: &egui::Context, now: Instant) {
        let events = ctx.input(|i| i.events.clone());
        let mut suppressed = Vec::new();
        let mut suppress_space_text = false;

        for event in &events {
            let Event::Key {
                key,
                physical_key,
                pressed: true,
                repeat,
                modifiers,
            } = event
            else {
                continue;
            };

            let key_event = key_event_from_egui(*key, *physical_key, *repeat, *modifiers);
            let outcome = self.overlay.handle_key(&key_event, now);

            if outcome.disposition.prevents_default() {
                suppressed.push(event.clone());
                suppress_space_text |= key_event.code == KeyCode::Space;
            }
            if let Some(text) = outcome.submitted {
                self.overlay.add_toast(format!("Searching for \"{}\"", text), None, now);
            }
        }

        if !suppressed.is_empty() {
            ctx.input_mut(|i| {
                i.events.retain(|e| {
                    let space_text = matches!(e, Event::Text(t) if t == " ");
                    !suppressed.contains(e) && !(suppress_space_text && space_text)
                });
            });
        }
    }

    /// Mousedown inside the focused bar keeps it from collapsing.
    fn handle_pointer(&mut self, ctx: &egui::Context) {
        let Some(rect) = self.last_bar_rect else {
            return;
        };
        let pressed_inside = ctx.input(|i| {
            i.pointer.any_pressed()
                && i.pointer.interact_pos().is_some_and(|pos| rect.contains(pos))
        });
        if pressed_inside {
            self.keep_focus = self.overlay.search_bar_mut().on_mouse_down();
        }
    }

    fn show_search(&mut self, ctx: &egui::Context, now: Instant) {
        let style = self.overlay.reveal_style();
        let opacity = ctx.animate_value_with_time(
            egui::Id::new("floatbar_search_opacity"),
            style.opacity,
            REVEAL_SECONDS,
        );
        let offset_y = ctx.animate_value_with_time(
            egui::Id::new("floatbar_search_offset"),
            style.offset_y,
            REVEAL_SECONDS,
        );
        if opacity <= 0.0 && !style.interactive {
            self.last_bar_rect = None;
            return;
        }

        egui::Area::new(egui::Id::new("floatbar_search"))
            .anchor(Align2::CENTER_BOTTOM, [0.0, offset_y - BOTTOM_GAP])
            .interactable(style.interactive)
            .show(ctx, |ui| {
                ui.set_opacity(opacity);

                let results = self.overlay.results().to_vec();
                let selected = self.overlay.selected_index();
                let mut clicked = None;
                Frame::none()
                    .fill(PANEL_FILL)
                    .rounding(12.0)
                    .inner_margin(Margin::symmetric(0.0, 8.0))
                    .show(ui, |ui| {
                        ui.set_width(self.overlay.search_bar().width());
                        SearchResultsList::new(&results, style.interactive)
                            .selected_index(selected)
                            .on_result_click(|result| clicked = Some(result.clone()))
                            .show(ui);
                    });
                if let Some(result) = clicked {
                    tracing::info!("Result clicked: {}", result.id);
                    self.overlay.add_toast(result.title.clone(), None, now);
                }

                ui.add_space(8.0);
                self.show_bar(ui, now, style.interactive);
            });
    }

    fn show_bar(&mut self, ui: &mut egui::Ui, now: Instant, visible: bool) {
        let bar = self.overlay.search_bar();
        let width = ui.ctx().animate_value_with_time(
            egui::Id::new("floatbar_bar_width"),
            bar.width(),
            REVEAL_SECONDS,
        );
        let accessory = bar.state().accessory_opacity();
        let placeholder = bar.placeholder().to_owned();
        let hint = bar.hint().is_visible().then(|| bar.hint().text().to_owned());
        let mut text = bar.text().to_owned();

        if let Some(hint) = hint {
            ui.label(RichText::new(hint).small());
        }

        let frame = Frame::none()
            .fill(BAR_FILL)
            .rounding(12.0)
            .inner_margin(Margin::symmetric(20.0, 10.0))
            .show(ui, |ui| {
                ui.set_width(width);
                ui.horizontal(|ui| {
                    let response = ui.add(
                        TextEdit::singleline(&mut text)
                            .hint_text(RichText::new(placeholder).color(MUTED))
                            .frame(false)
                            .desired_width(width - 64.0),
                    );

                    ui.label(RichText::new("➡").color(MUTED.gamma_multiply(accessory)));
                    let mic = ui.add(
                        egui::Button::new(RichText::new("🎤").color(MUTED.gamma_multiply(accessory)))
                            .frame(false),
                    );
                    (response, mic.clicked())
                })
                .inner
            });
        let (response, mic_clicked) = frame.inner;
        self.last_bar_rect = Some(frame.response.rect);

        let enter_pressed = ui.input(|i| i.key_pressed(egui::Key::Enter));
        let bar = self.overlay.search_bar_mut();

        if response.changed() {
            bar.on_text_change(text);
        }
        if mic_clicked {
            bar.on_mic_click(now);
        }
        if response.gained_focus() {
            bar.on_focus();
        }
        if response.lost_focus() && !enter_pressed {
            bar.on_blur();
        }

        let keep_focus = std::mem::take(&mut self.keep_focus);
        let wants_focus = self.overlay.take_focus_request()
            || (keep_focus && !response.has_focus())
            || (visible && self.overlay.search_bar().is_focused() && !response.has_focus());
        if !visible && response.has_focus() {
            response.surrender_focus();
        } else if visible && wants_focus {
            response.request_focus();
        }
    }

    fn show_intro(&self, ctx: &egui::Context) {
        let Some(phase) = self.overlay.intro_phase() else {
            return;
        };
        let opacity = ctx.animate_value_with_time(
            egui::Id::new("floatbar_intro_opacity"),
            phase.opacity(),
            REVEAL_SECONDS,
        );

        let screen = ctx.screen_rect();
        egui::Area::new(egui::Id::new("floatbar_intro"))
            .order(egui::Order::Foreground)
            .fixed_pos(screen.min)
            .interactable(phase.is_interactive())
            .show(ctx, |ui| {
                ui.set_opacity(opacity);
                let painter = ui.painter();
                painter.rect_filled(screen, 0.0, Color32::from_black_alpha(178));
                painter.text(
                    screen.center() - egui::vec2(0.0, 32.0),
                    Align2::CENTER_CENTER,
                    TITLE,
                    FontId::proportional(28.0),
                    Color32::WHITE,
                );
                painter.text(
                    screen.center() + egui::vec2(0.0, 8.0),
                    Align2::CENTER_CENTER,
                    SUBTITLE,
                    FontId::proportional(18.0),
                    MUTED,
                );
            });
    }

    fn show_toasts(&self, ctx: &egui::Context) {
        if self.overlay.toasts().is_empty() {
            return;
        }

        egui::Area::new(egui::Id::new("floatbar_toasts"))
            .order(egui::Order::Tooltip)
            .anchor(Align2::RIGHT_TOP, [-16.0, 16.0])
            .interactable(false)
            .show(ctx, |ui| {
                ui.with_layout(egui::Layout::top_down(egui::Align::Max), |ui| {
                    for view in self.overlay.toasts().views() {
                        let id = egui::Id::new(("toast", view.toast.id.as_str()));
                        let opacity =
                            ctx.animate_value_with_time(id.with("opacity"), view.opacity(), TOAST_SECONDS);
                        let offset =
                            ctx.animate_value_with_time(id.with("offset"), view.offset_x(), TOAST_SECONDS);

                        ui.scope(|ui| {
                            ui.set_opacity(opacity);
                            ui.with_layout(egui::Layout::right_to_left(egui::Align::TOP), |ui| {
                                ui.add_space(offset);
                                Frame::none()
                                    .fill(Color32::from_black_alpha(204))
                                    .rounding(8.0)
                                    .inner_margin(Margin::symmetric(16.0, 12.0))
                                    .show(ui, |ui| {
                                        ui.set_max_width(320.0);
                                        ui.label(RichText::new(&view.toast.message).color(Color32::WHITE));
                                    });
                            });
                        });
                        ui.add_space(12.0);
                    }
                });
            });
    }
}

impl eframe::App for FloatbarApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();

        self.handle_keyboard(ctx, now);
        self.handle_pointer(ctx);
        self.overlay.tick(now);

        egui::CentralPanel::default()
            .frame(Frame::none().fill(Color32::BLACK))
            .show(ctx, |_ui| {});

        self.show_search(ctx, now);
        self.show_intro(ctx);
        self.show_toasts(ctx);

        if let Some(deadline) = self.overlay.next_deadline() {
            ctx.request_repaint_after(deadline.saturating_duration_since(now));
        }
    }
}

/// Translate an egui key event. The physical key decides the code when egui
/// reports one.
pub fn key_event_from_egui(
    key: egui::Key,
    physical_key: Option<egui::Key>,
    repeat: bool,
    modifiers: egui::Modifiers,
) -> KeyEvent {
    let code = code_from_egui(physical_key.unwrap_or(key));
    let mut event = KeyEvent::new(code_from_egui(key).default_key(), code);
    if modifiers.shift {
        event = event.with_shift();
    }
    if repeat {
        event = event.repeated();
    }
    if event.key == Key::Unidentified {
        event.key = code.default_key();
    }
    event
}

fn code_from_egui(key: egui::Key) -> KeyCode {
    match key {
        egui::Key::Enter => KeyCode::Enter,
        egui::Key::Space => KeyCode::Space,
        egui::Key::Escape => KeyCode::Escape,
        egui::Key::ArrowUp => KeyCode::ArrowUp,
        egui::Key::ArrowDown => KeyCode::ArrowDown,
        other => {
            let mut chars = other.name().chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_alphabetic() => KeyCode::Letter(c.to_ascii_uppercase()),
                (Some(c), None) if c.is_ascii_digit() => KeyCode::Digit(c as u8 - b'0'),
                _ => KeyCode::Unidentified,
            }
        }
    }
}
