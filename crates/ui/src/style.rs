use egui::{Color32, Stroke};

/// Visual parameters for the graph canvas, derived from the egui style
pub trait GraphStyle {
    fn node_bg_color(&self) -> Color32;
    fn node_bg_hover_color(&self) -> Color32;
    fn node_stroke(&self) -> Stroke;
    fn port_bg_fill(&self) -> Color32;
    fn port_stroke(&self) -> Stroke;
    fn port_radius(&self) -> f32;
    fn link_stroke(&self) -> Stroke;
}

impl GraphStyle for egui::Style {
    fn node_bg_color(&self) -> Color32 {
        self.visuals
            .extreme_bg_color
            .lerp_to_gamma(self.visuals.window_fill, 0.5)
    }

    fn node_bg_hover_color(&self) -> Color32 {
        self.node_bg_color()
            .lerp_to_gamma(self.visuals.window_fill, 0.8)
    }

    fn node_stroke(&self) -> Stroke {
        self.visuals.window_stroke
    }

    fn port_bg_fill(&self) -> Color32 {
        self.node_bg_color()
    }

    fn port_stroke(&self) -> Stroke {
        self.link_stroke()
    }

    fn port_radius(&self) -> f32 {
        5.0
    }

    fn link_stroke(&self) -> Stroke {
        let color = self
            .visuals
            .strong_text_color()
            .gamma_multiply(0.3)
            .to_opaque();
        Stroke::new(1.0, color)
    }
}
