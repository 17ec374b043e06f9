use clap::Parser;
use dagpad_data::{arrange, validate, PipelineGraph, Verdict};
use dagpad_ui::{panels, Canvas};
use eframe::egui;
use tracing::debug;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Start with a small example pipeline instead of an empty canvas
    #[arg(long)]
    demo: bool,
}

struct App {
    graph: PipelineGraph,
    canvas: Canvas,
    verdict: Verdict,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, args: Args) -> Self {
        cc.egui_ctx.set_visuals(egui::Visuals {
            dark_mode: true,
            ..egui::Visuals::dark()
        });

        let mut graph = PipelineGraph::default();
        if args.demo {
            let fetch = graph.add_node(egui::pos2(40.0, 40.0));
            let build = graph.add_node(egui::pos2(300.0, 40.0));
            let test = graph.add_node(egui::pos2(560.0, 40.0));
            graph.connect(&fetch, &build);
            graph.connect(&build, &test);
        }

        let verdict = validate(&graph.nodes, &graph.edges);

        Self {
            graph,
            canvas: Canvas::default(),
            verdict,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let mut changed = false;

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            let response = panels::toolbar(ui);
            if response.add_node {
                // Drop new steps along a loose diagonal so they don't stack
                let count = self.graph.nodes.len() as f32;
                self.graph
                    .add_node(egui::pos2(60.0 + 40.0 * count, 60.0 + 30.0 * count));
                changed = true;
            }
            if response.auto_layout {
                debug!("Auto layout requested");
                let arranged = arrange(&self.graph.nodes, &self.graph.edges);
                self.graph.apply(arranged);
                self.canvas.request_fit();
            }
        });

        egui::SidePanel::right("status")
            .min_width(260.0)
            .show(ctx, |ui| {
                panels::status_panel(ui, &self.verdict);
                ui.separator();
                panels::debug_panel(ui, &self.graph.nodes, &self.graph.edges);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            changed |= self.canvas.show(ui, &mut self.graph);
        });

        // Validation is cheap and reruns after every structural change;
        // layout only ever runs on explicit request above
        if changed {
            self.verdict = validate(&self.graph.nodes, &self.graph.edges);
        }
    }
}

fn main() -> Result<(), eframe::Error> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size((1024.0, 768.0)),
        ..Default::default()
    };
    eframe::run_native(
        "dagpad",
        options,
        Box::new(|cc| Ok(Box::new(App::new(cc, args)))),
    )
}
