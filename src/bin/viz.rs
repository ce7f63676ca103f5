use std::collections::VecDeque;
use std::f32::consts::PI;
use std::time::Instant;

use eframe::egui;
use egui_plot::{Line, Plot, PlotPoints};

use turbo_sim::engine::{ControlInput, EngineConfig, Shift, Telemetry};
use turbo_sim::sim::{FixedTimestep, Simulation};

/// Seconds of rpm history in the live plot.
const HISTORY_S: f64 = 10.0;
/// Throttle change per second while Up/Down is held.
const THROTTLE_RATE: f64 = 1.5;
/// How long the BACKFIRE lamp stays lit after a pop.
const BACKFIRE_LAMP_S: f64 = 0.25;

fn main() -> eframe::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_secs());
    let app = Dashboard::new(EngineConfig::default(), seed);
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 760.0]),
        ..Default::default()
    };
    eframe::run_native("Turbo Engine Simulator", options, Box::new(|_| Ok(Box::new(app))))
}

struct Dashboard {
    sim: Simulation,
    clock: FixedTimestep,
    last_frame: Instant,
    throttle: f64,
    load: f64,
    pending_shift: Shift,
    pending_reset: bool,
    history: VecDeque<[f64; 2]>,
    last_backfire: Option<f64>,
    telemetry: Telemetry,
}

impl Dashboard {
    fn new(config: EngineConfig, seed: u64) -> Self {
        let sim = Simulation::new(config, seed);
        let telemetry = sim.telemetry();
        Self {
            clock: FixedTimestep::new(sim.dt()),
            sim,
            last_frame: Instant::now(),
            throttle: 0.0,
            load: 0.0,
            pending_shift: Shift::Hold,
            pending_reset: false,
            history: VecDeque::new(),
            last_backfire: None,
            telemetry,
        }
    }

    fn read_keys(&mut self, ctx: &egui::Context, elapsed: f64) -> bool {
        let (up, down, brake, shift_up, shift_down, reset) = ctx.input(|i| {
            (
                i.key_down(egui::Key::ArrowUp),
                i.key_down(egui::Key::ArrowDown),
                i.key_down(egui::Key::Space),
                i.key_pressed(egui::Key::E),
                i.key_pressed(egui::Key::Q),
                i.key_pressed(egui::Key::R),
            )
        });
        if up {
            self.throttle += THROTTLE_RATE * elapsed;
        }
        if down {
            self.throttle -= THROTTLE_RATE * elapsed;
        }
        self.throttle = self.throttle.clamp(0.0, 1.0);
        if shift_up {
            self.pending_shift = Shift::Up;
        } else if shift_down {
            self.pending_shift = Shift::Down;
        }
        self.pending_reset |= reset;
        brake
    }

    /// Run the ticks owed for this frame. A gear request or reset goes out
    /// with the first tick only.
    fn advance(&mut self, elapsed: f64, brake: bool) {
        let ticks = self.clock.advance(elapsed);
        for _ in 0..ticks {
            let input = if std::mem::take(&mut self.pending_reset) {
                ControlInput::reset()
            } else {
                ControlInput::throttle(self.throttle)
                    .with_brake(brake)
                    .with_load(self.load)
                    .with_shift(std::mem::take(&mut self.pending_shift))
            };
            let t = self.sim.apply(&input);
            if t.backfire {
                self.last_backfire = Some(t.time);
            }
            self.history.push_back([t.time, t.rpm]);
            self.telemetry = t;
        }
        while self
            .history
            .front()
            .is_some_and(|p| self.telemetry.time - p[0] > HISTORY_S)
        {
            self.history.pop_front();
        }
    }

    fn backfire_lit(&self) -> bool {
        self.last_backfire
            .is_some_and(|t| self.telemetry.time - t < BACKFIRE_LAMP_S)
    }
}

impl eframe::App for Dashboard {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f64();
        self.last_frame = now;

        let brake = self.read_keys(ctx, elapsed);
        self.advance(elapsed, brake);

        let t = self.telemetry;
        let cfg = self.sim.config().clone();

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Turbo Engine Simulator");
            ui.horizontal(|ui| {
                let gear = if t.gear == 0 { "N".to_owned() } else { t.gear.to_string() };
                ui.label(format!(
                    "Gear: {gear}  |  Torque: {:.0} Nm  |  AFR: {:.1}  |  Coolant: {:.1} °C  |  t = {:.1} s",
                    t.torque, t.afr, t.coolant_temp, t.time
                ));
                ui.separator();
                lamp(ui, "CHECK ENGINE", t.limp_mode, egui::Color32::from_rgb(255, 170, 0));
                lamp(ui, "BACKFIRE", self.backfire_lit(), egui::Color32::from_rgb(255, 60, 30));
                lamp(ui, "FUEL CUT", t.fuel_cut, egui::Color32::from_rgb(220, 40, 40));
            });
        });

        egui::TopBottomPanel::bottom("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.add(egui::Slider::new(&mut self.throttle, 0.0..=1.0).text("Throttle"));
                ui.add(egui::Slider::new(&mut self.load, 0.0..=1.0).text("Road load"));
                if ui.button("Reset").clicked() {
                    self.pending_reset = true;
                }
                ui.label("Up/Down throttle  ·  E/Q gear  ·  Space brake  ·  R reset");
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let gauge_size = (ui.available_width() / 3.0 - 12.0).min(260.0);
            ui.horizontal(|ui| {
                gauge(ui, gauge_size, "RPM", t.rpm, cfg.redline() + 1000.0, Some(cfg.redline()), 0);
                gauge(ui, gauge_size, "km/h", t.speed_kmh, 260.0, None, 0);
                gauge(ui, gauge_size, "Boost (bar)", t.boost, cfg.max_boost().max(0.1), None, 2);
            });

            ui.label("Engine speed (rpm)");
            let points: PlotPoints = self.history.iter().copied().collect();
            let x0 = (t.time - HISTORY_S).max(0.0);
            let redline: PlotPoints = vec![[x0, cfg.redline()], [x0 + HISTORY_S, cfg.redline()]].into();
            Plot::new("rpm")
                .height(ui.available_height() - 8.0)
                .x_axis_label("Time (s)")
                .include_y(0.0)
                .include_y(cfg.redline() + 500.0)
                .allow_drag(false)
                .allow_scroll(false)
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("Redline", redline).color(egui::Color32::RED));
                    plot_ui.line(Line::new("RPM", points));
                });
        });

        ctx.request_repaint();
    }
}

// ---------------------------------------------------------------------------
// Widgets
// ---------------------------------------------------------------------------

fn lamp(ui: &mut egui::Ui, label: &str, lit: bool, color: egui::Color32) {
    let color = if lit { color } else { egui::Color32::from_gray(70) };
    ui.label(egui::RichText::new(label).strong().color(color));
}

/// Analogue needle gauge over a 270° sweep, with an optional red zone.
fn gauge(
    ui: &mut egui::Ui,
    size: f32,
    label: &str,
    value: f64,
    max: f64,
    red_from: Option<f64>,
    decimals: usize,
) {
    let (response, painter) = ui.allocate_painter(egui::vec2(size, size), egui::Sense::hover());
    let center = response.rect.center();
    let radius = size * 0.45;
    let start = 0.75 * PI;
    let sweep = 1.5 * PI;
    let angle_of = |v: f64| start + sweep * (v / max).clamp(0.0, 1.0) as f32;
    let at = |angle: f32, r: f32| center + egui::vec2(angle.cos(), angle.sin()) * r;

    painter.circle_stroke(center, radius, egui::Stroke::new(2.0, egui::Color32::GRAY));

    if let Some(red) = red_from {
        let segments = 24;
        let (a0, a1) = (angle_of(red), angle_of(max));
        for i in 0..segments {
            let f0 = a0 + (a1 - a0) * i as f32 / segments as f32;
            let f1 = a0 + (a1 - a0) * (i + 1) as f32 / segments as f32;
            painter.line_segment(
                [at(f0, radius * 0.92), at(f1, radius * 0.92)],
                egui::Stroke::new(5.0, egui::Color32::from_rgb(200, 30, 30)),
            );
        }
    }

    for i in 0..=10 {
        let a = start + sweep * i as f32 / 10.0;
        painter.line_segment(
            [at(a, radius * 0.82), at(a, radius)],
            egui::Stroke::new(1.5, egui::Color32::LIGHT_GRAY),
        );
    }

    painter.line_segment(
        [center, at(angle_of(value), radius * 0.85)],
        egui::Stroke::new(3.0, egui::Color32::from_rgb(255, 140, 0)),
    );

    painter.text(
        center + egui::vec2(0.0, radius * 0.45),
        egui::Align2::CENTER_CENTER,
        format!("{value:.decimals$}"),
        egui::FontId::proportional(size * 0.11),
        egui::Color32::WHITE,
    );
    painter.text(
        center + egui::vec2(0.0, radius * 0.7),
        egui::Align2::CENTER_CENTER,
        label,
        egui::FontId::proportional(size * 0.07),
        egui::Color32::LIGHT_GRAY,
    );
}
