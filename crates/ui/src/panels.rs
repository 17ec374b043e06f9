use dagpad_data::{ser, Edge, Node, Verdict};
use egui::Color32;

/// What the user clicked in the toolbar this frame
#[derive(Debug, Default, Clone, Copy)]
pub struct ToolbarResponse {
    pub add_node: bool,
    pub auto_layout: bool,
}

pub fn toolbar(ui: &mut egui::Ui) -> ToolbarResponse {
    let mut response = ToolbarResponse::default();

    ui.horizontal(|ui| {
        ui.heading("dagpad");
        ui.separator();
        if ui.button("➕ Add node").clicked() {
            response.add_node = true;
        }
        if ui.button("⟲ Auto layout").clicked() {
            response.auto_layout = true;
        }
    });

    response
}

/// Affirmative/negative indicator plus the verdict message, verbatim
pub fn status_panel(ui: &mut egui::Ui, verdict: &Verdict) {
    ui.horizontal_wrapped(|ui| {
        let (icon, color) = if verdict.is_valid {
            ("✔", Color32::from_rgb(0x4c, 0xaf, 0x50))
        } else {
            ("✘", Color32::from_rgb(0xf4, 0x43, 0x36))
        };
        ui.colored_label(color, icon);
        ui.label(&verdict.message);
    });
}

/// Collapsible JSON view of the {id, label} / {source, target} projection
pub fn debug_panel(ui: &mut egui::Ui, nodes: &[Node], edges: &[Edge]) {
    egui::CollapsingHeader::new("Graph JSON")
        .default_open(false)
        .show(ui, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                ui.monospace(ser::debug_json(nodes, edges));
            });
        });
}
