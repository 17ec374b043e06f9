use crate::style::GraphStyle;
use dagpad_data::{AnchorSide, Node, NodeId, PipelineGraph, NODE_SIZE};
use egui::emath::TSTransform;
use egui::{Align2, Color32, FontId, Pos2, Rect, Rounding, Sense, Vec2};
use tracing::debug;

/// Pan/zoom surface the graph is drawn on
///
/// The transform lives in egui's memory: dragging the background pans,
/// scrolling zooms around the pointer, double-click resets.
#[derive(Clone, Default)]
pub struct PanZoomArea {
    /// When set, fit this content rect into the viewport this frame
    pub fit: Option<Rect>,
}

impl PanZoomArea {
    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui, TSTransform) -> R,
    ) -> R {
        let ctx = ui.ctx().clone();
        let (id, rect) = ui.allocate_space(ui.available_size());
        let mut transform = ctx
            .data_mut(|d| d.get_temp::<TSTransform>(id))
            .unwrap_or_default();
        let response = ui.interact(rect, id, Sense::click_and_drag());

        if let Some(bounds) = self.fit {
            transform = fit_transform(bounds, rect.size());
        }

        // Allow dragging the background as well
        if response.dragged() {
            transform.translation += response.drag_delta();
        }

        // Plot-like reset
        if response.double_clicked() {
            transform = TSTransform::default();
        }

        let to_screen =
            TSTransform::from_translation(ui.min_rect().left_top().to_vec2()) * transform;

        if let Some(pointer) = ui.ctx().input(|i| i.pointer.hover_pos()) {
            // Note: doesn't catch zooming / panning if a widget in this area is hovered
            if response.hovered() {
                let pointer_in_layer = to_screen.inverse() * pointer;
                let zoom_delta = ui.ctx().input(|i| i.zoom_delta());
                let pan_delta = ui.ctx().input(|i| i.smooth_scroll_delta);

                // Zoom in on pointer:
                transform = transform
                    * TSTransform::from_translation(pointer_in_layer.to_vec2())
                    * TSTransform::from_scaling(zoom_delta)
                    * TSTransform::from_translation(-pointer_in_layer.to_vec2());

                // Pan:
                transform = TSTransform::from_translation(pan_delta) * transform;
            }
        }

        let to_screen =
            TSTransform::from_translation(ui.min_rect().left_top().to_vec2()) * transform;
        let inner = add_contents(ui, to_screen);
        ctx.data_mut(|d| d.insert_temp(id, transform));
        inner
    }
}

/// Transform that centers `bounds` in a viewport of the given size
fn fit_transform(bounds: Rect, viewport: Vec2) -> TSTransform {
    let bounds = bounds.expand(40.0);
    let scaling = (viewport.x / bounds.width())
        .min(viewport.y / bounds.height())
        .min(1.0);
    let translation = 0.5 * viewport - scaling * bounds.center().to_vec2();
    TSTransform::new(translation, scaling)
}

/// Interactive graph canvas
///
/// Draws the steps and their connections; handles node dragging, dragging
/// new connections out of output ports, and context-menu deletion.
#[derive(Default)]
pub struct Canvas {
    fit_next: bool,
    /// Source of the connection currently being dragged out
    pending: Option<NodeId>,
}

impl Canvas {
    /// Fit the viewport to the graph on the next `show` (after auto layout)
    pub fn request_fit(&mut self) {
        self.fit_next = true;
    }

    /// Draw the graph; returns true when its topology changed this frame
    pub fn show(&mut self, ui: &mut egui::Ui, graph: &mut PipelineGraph) -> bool {
        let fit = if self.fit_next {
            content_bounds(&graph.nodes)
        } else {
            None
        };
        self.fit_next = false;

        PanZoomArea { fit }.show(ui, |ui, to_screen| self.show_graph(ui, graph, to_screen))
    }

    fn show_graph(
        &mut self,
        ui: &mut egui::Ui,
        graph: &mut PipelineGraph,
        to_screen: TSTransform,
    ) -> bool {
        let mut changed = false;
        let zoom = to_screen.scaling;

        // Connections first so they sit under the nodes
        let mut deleted_edge = None;
        for (index, edge) in graph.edges.iter().enumerate() {
            let (Some(source), Some(target)) =
                (graph.node(&edge.source), graph.node(&edge.target))
            else {
                // Cascade delete keeps this transient at worst
                continue;
            };

            let from = to_screen * output_anchor(source);
            let to = to_screen * input_anchor(target);
            let stroke = ui.style().link_stroke();
            let points = compute_bezier_points(from, to, 0.5);
            ui.painter()
                .add(epaint::Shape::CubicBezier(
                    epaint::CubicBezierShape::from_points_stroke(
                        points,
                        false,
                        Color32::TRANSPARENT,
                        stroke,
                    ),
                ));

            // A small handle halfway along the curve carries the edge's
            // context menu
            let mid = cubic_midpoint(&points);
            let handle = ui.interact(
                Rect::from_center_size(mid, Vec2::splat(10.0 * zoom)),
                ui.id().with(("edge", index)),
                Sense::click(),
            );
            if handle.hovered() {
                ui.painter().circle_filled(mid, 3.0 * zoom, stroke.color);
            }
            handle.context_menu(|ui| {
                if ui.button("Delete edge").clicked() {
                    deleted_edge = Some(index);
                    ui.close_menu();
                }
            });
        }
        if let Some(index) = deleted_edge {
            graph.remove_edge(index);
            changed = true;
        }

        // Then the nodes
        let mut deleted_node = None;
        let mut hovered_input = None;
        for node in &mut graph.nodes {
            let rect = Rect::from_min_size(to_screen * node.pos, NODE_SIZE * zoom);
            let response = ui.interact(
                rect,
                ui.id().with(("node", &node.id)),
                Sense::click_and_drag(),
            );

            if response.dragged() {
                node.pos += response.drag_delta() / zoom;
            }
            response.context_menu(|ui| {
                if ui.button("Delete node").clicked() {
                    deleted_node = Some(node.id.clone());
                    ui.close_menu();
                }
            });

            let style = ui.style();
            let fill = if response.hovered() {
                style.node_bg_hover_color()
            } else {
                style.node_bg_color()
            };
            ui.painter()
                .rect(rect, Rounding::same(5.0 * zoom), fill, style.node_stroke());
            ui.painter().text(
                rect.center(),
                Align2::CENTER_CENTER,
                &node.label,
                FontId::proportional(14.0 * zoom),
                ui.visuals().strong_text_color(),
            );

            // Ports on the anchor faces
            let in_pos = to_screen * anchor(node, node.input_side);
            let out_pos = to_screen * anchor(node, node.output_side);
            let radius = ui.style().port_radius() * zoom;
            for pos in [in_pos, out_pos] {
                ui.painter().circle(
                    pos,
                    radius,
                    ui.style().port_bg_fill(),
                    ui.style().port_stroke(),
                );
            }

            let out_response = ui.interact(
                Rect::from_center_size(out_pos, Vec2::splat(radius * 2.0)),
                ui.id().with(("out", &node.id)),
                Sense::drag(),
            );
            if out_response.drag_started() {
                debug!("Starting connection from {}", node.id);
                self.pending = Some(node.id.clone());
            }

            // A slightly generous hit area for dropping connections
            if ui.rect_contains_pointer(Rect::from_center_size(
                in_pos,
                Vec2::splat(radius * 4.0),
            )) {
                hovered_input = Some(node.id.clone());
            }
        }
        if let Some(id) = deleted_node {
            graph.remove_node(&id);
            changed = true;
        }

        // Connection being dragged out of an output port
        if let Some(source_id) = self.pending.clone() {
            match graph.node(&source_id) {
                Some(source) => {
                    if let Some(pointer) = ui.ctx().pointer_latest_pos() {
                        let from = to_screen * output_anchor(source);
                        ui.painter().add(epaint::Shape::CubicBezier(
                            epaint::CubicBezierShape::from_points_stroke(
                                compute_bezier_points(from, pointer, 0.5),
                                false,
                                Color32::TRANSPARENT,
                                ui.style().link_stroke(),
                            ),
                        ));
                    }
                }
                None => {
                    // Source vanished mid-drag
                    self.pending = None;
                }
            }

            if ui.input(|i| i.pointer.any_released()) {
                if let Some(target_id) = hovered_input {
                    // Self-loops are refused by the graph itself
                    changed |= graph.connect(&source_id, &target_id);
                }
                self.pending = None;
            }
        }

        changed
    }
}

/// Union of the node rectangles, `None` for an empty graph
fn content_bounds(nodes: &[Node]) -> Option<Rect> {
    let mut rects = nodes.iter().map(Node::rect);
    let first = rects.next()?;
    Some(rects.fold(first, |bounds, rect| bounds.union(rect)))
}

fn anchor(node: &Node, side: AnchorSide) -> Pos2 {
    match side {
        AnchorSide::Left => node.rect().left_center(),
        AnchorSide::Right => node.rect().right_center(),
    }
}

fn input_anchor(node: &Node) -> Pos2 {
    anchor(node, node.input_side)
}

fn output_anchor(node: &Node) -> Pos2 {
    anchor(node, node.output_side)
}

fn compute_bezier_points(from: Pos2, to: Pos2, curvature: f32) -> [Pos2; 4] {
    let dx = to.x - from.x;
    let control_x_offset = dx * curvature;
    let control1 = Pos2::new(from.x + control_x_offset, from.y);
    let control2 = Pos2::new(to.x - control_x_offset, to.y);
    [from, control1, control2, to]
}

fn cubic_midpoint(points: &[Pos2; 4]) -> Pos2 {
    // De Casteljau at t = 0.5
    Pos2::new(
        (points[0].x + 3.0 * points[1].x + 3.0 * points[2].x + points[3].x) / 8.0,
        (points[0].y + 3.0 * points[1].y + 3.0 * points[2].y + points[3].y) / 8.0,
    )
}
