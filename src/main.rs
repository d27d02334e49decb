#[cfg(feature = "gui")]
use eframe::egui;

#[cfg(feature = "gui")]
use tappad::{IndicatorId, Instrument, InstrumentEvent, PadIndex, Rgb};

#[cfg(feature = "gui")]
fn main() -> Result<(), eframe::Error> {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([480.0, 640.0])
            .with_title("TAPPAD"),
        ..Default::default()
    };

    eframe::run_native(
        "TAPPAD",
        options,
        Box::new(|_cc| Ok(Box::new(PadApp::new()))),
    )
}

#[cfg(not(feature = "gui"))]
fn main() {
    eprintln!("This binary requires the 'gui' feature to be enabled");
    std::process::exit(1);
}

#[cfg(feature = "gui")]
const GRID_SIDE: usize = 4;

#[cfg(feature = "gui")]
fn color32(rgb: Rgb) -> egui::Color32 {
    egui::Color32::from_rgb(rgb.0, rgb.1, rgb.2)
}

/// Widget state for one pad, built once at startup and indexed by pad
#[cfg(feature = "gui")]
struct PadView {
    pad: PadIndex,
    fill: egui::Color32,
    pressed_fill: egui::Color32,
    active: bool,
}

#[cfg(feature = "gui")]
struct PadApp {
    instrument: Instrument,
    pads: Vec<PadView>,
    track: Vec<(IndicatorId, egui::Color32)>,
}

#[cfg(feature = "gui")]
impl PadApp {
    fn new() -> Self {
        let pads = PadIndex::all()
            .map(|pad| PadView {
                pad,
                fill: color32(pad.color()),
                pressed_fill: color32(pad.color().darken(0.7)),
                active: false,
            })
            .collect();

        Self {
            instrument: Instrument::with_defaults(),
            pads,
            track: Vec::new(),
        }
    }

    fn handle_instrument_events(&mut self) {
        self.instrument.tick();

        for event in self.instrument.poll_events() {
            match event {
                InstrumentEvent::PadActivated(pad) => self.pads[pad.get()].active = true,
                InstrumentEvent::PadReleased(pad) => self.pads[pad.get()].active = false,
                InstrumentEvent::TapRecorded { id, color, .. } => {
                    self.track.push((id, color32(color)));
                }
                InstrumentEvent::IndicatorExpired(id) => {
                    self.track.retain(|(shown, _)| *shown != id);
                }
                InstrumentEvent::SequenceCleared => self.track.clear(),
                InstrumentEvent::RecordingChanged(_) | InstrumentEvent::PlaybackChanged(_) => {}
            }
        }
    }

    fn transport(&mut self, ui: &mut egui::Ui) {
        let idle_fill = egui::Color32::from_white_alpha(50);
        let armed_fill = egui::Color32::from_rgba_unmultiplied(255, 99, 99, 80);

        ui.horizontal(|ui| {
            let (label, fill) = if self.instrument.is_playing() {
                ("⏸ STOP", armed_fill)
            } else {
                ("▶ PLAY", idle_fill)
            };
            if ui.add(egui::Button::new(label).fill(fill)).clicked() {
                self.instrument.play();
            }

            if ui.add(egui::Button::new("🗑 CLEAR").fill(idle_fill)).clicked() {
                self.instrument.clear_sequence();
            }

            let (label, fill) = if self.instrument.is_recording() {
                ("■ STOP", armed_fill)
            } else {
                ("● REC", idle_fill)
            };
            if ui.add(egui::Button::new(label).fill(fill)).clicked() {
                self.instrument.toggle_recording();
            }
        });
    }

    fn sequence_track(&self, ui: &mut egui::Ui) {
        let size = egui::vec2(ui.available_width(), 20.0);
        let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);

        for (i, (_, color)) in self.track.iter().enumerate() {
            let center = rect.left_center() + egui::vec2(10.0 + 16.0 * i as f32, 0.0);
            painter.circle_filled(center, 6.0, *color);
        }
    }
}

#[cfg(feature = "gui")]
impl eframe::App for PadApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.handle_instrument_events();

        let mut tapped = None;

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("TAPPAD");
            ui.add_space(10.0);

            egui::Grid::new("pads")
                .spacing([8.0, 8.0])
                .show(ui, |ui| {
                    for row in self.pads.chunks(GRID_SIDE) {
                        for view in row {
                            let fill = if view.active { view.pressed_fill } else { view.fill };
                            let button = egui::Button::new(
                                egui::RichText::new(view.pad.to_string())
                                    .size(22.0)
                                    .color(egui::Color32::WHITE),
                            )
                            .min_size(egui::vec2(100.0, 100.0))
                            .fill(fill);

                            if ui.add(button).clicked() {
                                tapped = Some(view.pad);
                            }
                        }
                        ui.end_row();
                    }
                });

            ui.add_space(20.0);
            self.transport(ui);

            ui.add_space(10.0);
            ui.label("Sequence:");
            self.sequence_track(ui);

            ui.separator();
            if !self.instrument.audio_enabled() {
                ui.colored_label(
                    egui::Color32::YELLOW,
                    "⚠ No audio output available - visual only",
                );
            }
        });

        if let Some(pad) = tapped {
            self.instrument.trigger_pad(pad);
        }

        if let Some(wait) = self.instrument.next_wakeup() {
            ctx.request_repaint_after(wait);
        }
    }
}
