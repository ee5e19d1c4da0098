//! Damage-driven painting of the hosted widgets
//!
//! The scene owns the surface and renderer. Each frame it repaints only the
//! regions the host reports as damaged: clear, clip, redraw every widget that
//! touches the region, then the snap guides on top.

use hudsnap_core::{FrameOutput, LayoutSink, OverlayHost};
use hudsnap_types::{Point, Rect, Size};

use crate::chrome;
use crate::colors;
use crate::guides::{GuideRenderer, GuideStyle};
use crate::platform::{OverlaySurface, PlatformError};
use crate::renderer::Renderer;
use crate::utils::{clip_to_surface, to_skia};

pub struct Scene<P: OverlaySurface> {
    surface: P,
    renderer: Renderer,
    guides: GuideRenderer,
}

impl<P: OverlaySurface> Scene<P> {
    pub fn new(surface: P, style: GuideStyle) -> Self {
        Self {
            surface,
            renderer: Renderer::new(),
            guides: GuideRenderer::new(style),
        }
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut P {
        &mut self.surface
    }

    pub fn set_guide_style(&mut self, style: GuideStyle) {
        self.guides.set_style(style);
    }

    /// Run one host frame and paint whatever it damaged
    pub fn present<S: LayoutSink>(&mut self, host: &mut OverlayHost<S>) -> FrameOutput {
        let output = host.on_frame();
        if !output.damage.is_empty() {
            self.render(host, &output.damage);
        }
        output
    }

    /// Repaint the given regions and commit them. Returns how many regions
    /// were painted after clipping to the surface.
    pub fn render<S: LayoutSink>(&mut self, host: &OverlayHost<S>, damage: &[Rect]) -> usize {
        let size = self.surface.size();
        let regions: Vec<Rect> = damage
            .iter()
            .filter_map(|r| clip_to_surface(pixel_aligned(*r), size))
            .collect();
        if regions.is_empty() {
            return 0;
        }

        let (width, height) = (self.surface.width(), self.surface.height());
        let Some(buffer) = self.surface.pixel_buffer() else {
            tracing::warn!("Surface has no pixel buffer, skipping frame");
            return 0;
        };
        let edit_mode = host.edit_mode();

        for region in &regions {
            self.renderer.set_clip(to_skia(*region), width, height);
            self.renderer.clear_rect(
                buffer,
                width,
                height,
                region.x,
                region.y,
                region.width,
                region.height,
                colors::transparent(),
            );
            for widget in host.widgets().filter(|w| w.rect.intersects(region)) {
                chrome::draw_widget(&mut self.renderer, buffer, width, height, &widget, edit_mode);
            }
            if edit_mode {
                self.guides
                    .draw(&mut self.renderer, buffer, width, height, host.guides());
            }
        }
        self.renderer.set_clip(None, width, height);

        tracing::trace!(regions = regions.len(), "Committing damaged regions");
        self.surface.commit(&regions);
        regions.len()
    }

    /// Repaint the whole surface
    pub fn render_full<S: LayoutSink>(&mut self, host: &OverlayHost<S>) -> usize {
        let full = Rect::from_origin_size(Point::ORIGIN, self.surface.size());
        self.render(host, &[full])
    }

    /// Push the host's input state to the surface: click-through outside
    /// edit mode unless an interactive widget needs input
    pub fn sync_input<S: LayoutSink>(&mut self, host: &OverlayHost<S>) {
        let region = host.input_region();
        self.surface.set_input_region(&region);
        self.surface.set_click_through(region.is_empty());
    }

    /// Follow a screen size change: reallocate, re-clamp the layout and
    /// repaint everything
    pub fn resize<S: LayoutSink>(
        &mut self,
        host: &mut OverlayHost<S>,
        width: u32,
        height: u32,
    ) -> Result<(), PlatformError> {
        self.surface.resize(width, height)?;
        host.set_container_size(Size::new(width as f32, height as f32));
        // Everything is damaged anyway; drop the host's own list
        host.on_frame();
        self.render_full(host);
        self.sync_input(host);
        Ok(())
    }
}

/// Grow a rectangle to whole pixels so clears leave no partial edges
fn pixel_aligned(rect: Rect) -> Rect {
    let x = rect.x.floor();
    let y = rect.y.floor();
    Rect::new(x, y, rect.right().ceil() - x, rect.bottom().ceil() - y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hudsnap_core::{AppConfig, PersistedLayout, PointerId, WidgetSpec};

    use crate::platform::HeadlessSurface;

    struct NullSink;

    impl LayoutSink for NullSink {
        fn load(&self) -> PersistedLayout {
            PersistedLayout::new()
        }

        fn save(&self, _layout: PersistedLayout) {}
    }

    fn setup() -> (OverlayHost<NullSink>, Scene<HeadlessSurface>) {
        let mut config = AppConfig::default();
        config.layout.container_width = 400.0;
        config.layout.container_height = 300.0;
        let mut host = OverlayHost::new(&config, NullSink);
        host.register_widget(WidgetSpec::new(
            "status",
            Point::new(10.0, 10.0),
            Size::new(100.0, 50.0),
        ));
        let surface = HeadlessSurface::new(400, 300).unwrap();
        (host, Scene::new(surface, GuideStyle::default()))
    }

    fn alpha(scene: &Scene<HeadlessSurface>, x: u32, y: u32) -> u8 {
        scene.surface().pixel(x, y).unwrap()[3]
    }

    #[test]
    fn test_full_render_paints_widgets_only() {
        let (host, mut scene) = setup();
        assert_eq!(scene.render_full(&host), 1);
        assert_eq!(scene.surface().commits(), 1);
        assert!(alpha(&scene, 50, 35) > 0);
        assert_eq!(alpha(&scene, 300, 200), 0);
    }

    #[test]
    fn test_offscreen_damage_is_not_committed() {
        let (host, mut scene) = setup();
        assert_eq!(scene.render(&host, &[]), 0);
        assert_eq!(scene.render(&host, &[Rect::new(500.0, 500.0, 10.0, 10.0)]), 0);
        assert_eq!(scene.surface().commits(), 0);
    }

    #[test]
    fn test_moved_widget_clears_old_area() {
        let (mut host, mut scene) = setup();
        scene.render_full(&host);
        host.update_position("status", Point::new(200.0, 100.0));

        let output = scene.present(&mut host);
        assert!(!output.damage.is_empty());
        assert_eq!(scene.surface().commits(), 2);
        assert_eq!(alpha(&scene, 50, 35), 0);
        assert!(alpha(&scene, 250, 125) > 0);
    }

    #[test]
    fn test_guides_are_painted_during_drag() {
        let (mut host, mut scene) = setup();
        host.set_edit_mode(true);
        scene.render_full(&host);
        assert_eq!(alpha(&scene, 200, 52), 0);

        // Grab the move handle, then bring the widget's center near x = 200
        host.pointer_down(PointerId::PRIMARY, Point::new(15.0, 15.0));
        host.pointer_move(PointerId::PRIMARY, Point::new(157.0, 225.0));
        scene.present(&mut host);

        assert_eq!(host.position("status"), Some(Point::new(150.0, 220.0)));
        assert!(alpha(&scene, 200, 52) > 0);
    }

    #[test]
    fn test_sync_input_follows_edit_mode() {
        let (mut host, mut scene) = setup();
        scene.sync_input(&host);
        assert!(scene.surface().is_click_through());
        assert!(scene.surface().input_region().is_empty());

        host.set_edit_mode(true);
        scene.sync_input(&host);
        assert!(!scene.surface().is_click_through());
        assert_eq!(
            scene.surface().input_region(),
            &[Rect::new(0.0, 0.0, 400.0, 300.0)]
        );
    }

    #[test]
    fn test_resize_reclamps_layout() {
        let (mut host, mut scene) = setup();
        host.update_position("status", Point::new(280.0, 200.0));
        scene.resize(&mut host, 200, 150).unwrap();

        assert_eq!(scene.surface().width(), 200);
        assert_eq!(host.position("status"), Some(Point::new(100.0, 100.0)));
        assert!(alpha(&scene, 150, 125) > 0);
    }
}
