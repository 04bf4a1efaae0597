use eframe::egui;
use egui_plot::{Legend, Line, Plot, PlotPoints};

use nalgebra::Vector2;

use particle_integrate::integrator::{self, Method};
use particle_integrate::physics::spring;
use particle_integrate::types::{AccelerationModel, ParticleState, SimConfig};

const OMEGA: f64 = 2.0;

/// Sampled run of one method: (t, x) and (t, relative energy error).
struct Run {
    name: String,
    position: Vec<[f64; 2]>,
    energy_error: Vec<[f64; 2]>,
}

fn run(method: Method, config: &SimConfig) -> Run {
    let x0 = Vector2::new(1.0, 0.0);
    let v0 = Vector2::new(0.0, OMEGA);
    let e0 = spring::energy(OMEGA, &x0, &v0);

    let mut state = ParticleState::new(x0, v0);
    let mut model = AccelerationModel::new(|_t: f64, s: &ParticleState<2>| {
        spring::hooke(OMEGA * OMEGA, &s.pos)
    });
    let mut position = vec![[0.0, x0.x]];
    let mut energy_error = vec![[0.0, 0.0]];

    let result = integrator::propagate(&mut state, config, method, &mut model, |t, s| {
        position.push([t, s.pos.x]);
        energy_error.push([t, (spring::energy(OMEGA, &s.pos, &s.vel) - e0) / e0]);
    });
    if let Err(e) = result {
        eprintln!("{method}: {e}");
    }

    Run {
        name: method.name().to_string(),
        position,
        energy_error,
    }
}

fn main() -> eframe::Result {
    let period = std::f64::consts::TAU / OMEGA;
    let config = SimConfig {
        dt: 0.1,
        max_time: 5.0 * period,
    };
    let runs = Method::ALL.iter().map(|m| run(*m, &config)).collect();

    let app = IntegratorViz { runs, config };
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1200.0, 800.0]),
        ..Default::default()
    };
    eframe::run_native("Integrator Comparison", options, Box::new(|_| Ok(Box::new(app))))
}

struct IntegratorViz {
    runs: Vec<Run>,
    config: SimConfig,
}

impl eframe::App for IntegratorViz {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.heading("Harmonic oscillator, x(t)");
            ui.label(format!(
                "omega = {OMEGA}  |  dt = {} s  |  t_end = {:.2} s",
                self.config.dt, self.config.max_time
            ));
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();
            let half_h = available.y / 2.0 - 8.0;

            // Exact solution, densely sampled
            let x0 = Vector2::new(1.0, 0.0);
            let v0 = Vector2::new(0.0, OMEGA);
            let exact: PlotPoints = (0..=1000)
                .map(|i| {
                    let t = self.config.max_time * i as f64 / 1000.0;
                    let (x, _) = spring::exact(OMEGA, &x0, &v0, t);
                    [t, x.x]
                })
                .collect();

            ui.label("Position x (m)");
            Plot::new("position")
                .height(half_h)
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    plot_ui.line(Line::new("exact", exact));
                    for run in &self.runs {
                        let points = PlotPoints::from(run.position.clone());
                        plot_ui.line(Line::new(run.name.clone(), points));
                    }
                });

            ui.label("Relative energy error");
            Plot::new("energy")
                .height(half_h)
                .legend(Legend::default())
                .x_axis_label("Time (s)")
                .show(ui, |plot_ui| {
                    for run in &self.runs {
                        let points = PlotPoints::from(run.energy_error.clone());
                        plot_ui.line(Line::new(run.name.clone(), points));
                    }
                });
        });
    }
}
