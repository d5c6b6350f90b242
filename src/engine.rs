//! Core rendering engine.
//!
//! The [`Engine`] sequences the pipeline. [`Engine::prepare`] runs the
//! one-shot stages (transform, depth sort, projection, shading) and
//! [`Engine::run`] drives the per-frame loop: poll input, rasterize, pack,
//! present. When the loop ends the final surface is exported.

use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::colors::{self, Color};
use crate::config::Settings;
use crate::error::{ConfigError, RenderError};
use crate::geometry::GeometryStore;
use crate::light::DirectionalLight;
use crate::math::vec2::Vec2;
use crate::projection::Projector;
use crate::render::{Surface, ToneMap};
use crate::scene::Scene;
use crate::time::{FrameLimiter, FrameStats};
use crate::transform::Transform;
use crate::window::{Presenter, WindowEvent};

const VERTEX_RADIUS: f32 = 2.0;
const LINE_THICKNESS: u32 = 1;

/// Rendering mode presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum RenderMode {
    /// Wireframe only
    Wireframe,
    /// Wireframe + vertices
    WireframeVertices,
    /// Filled + wireframe
    FilledWireframe,
    /// Filled + wireframe + vertices
    FilledWireframeVertices,
    /// Filled only
    #[default]
    Filled,
}

impl RenderMode {
    /// `(filled, wireframe, vertices)`
    fn layers(self) -> (bool, bool, bool) {
        match self {
            RenderMode::Wireframe => (false, true, false),
            RenderMode::WireframeVertices => (false, true, true),
            RenderMode::FilledWireframe => (true, true, false),
            RenderMode::FilledWireframeVertices => (true, true, true),
            RenderMode::Filled => (true, false, false),
        }
    }
}

/// How each face's fill color is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ShadingMode {
    /// Base color lit by the directional light.
    #[default]
    Flat,
    /// Face normal mapped to RGB.
    Normals,
    /// Base color, unlit.
    None,
}

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many frames even without a quit event.
    pub max_frames: Option<u64>,
    /// Where to export the final frame.
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub output: Option<PathBuf>,
}

pub struct Engine {
    settings: Settings,
    geometry: GeometryStore,
    projector: Projector,
    surface: Surface,
    packed: Vec<u32>,
    /// One fill color per face, in the current face order.
    face_colors: Vec<Color>,
    light: DirectionalLight,
    base_color: Color,
    render_mode: RenderMode,
    shading_mode: ShadingMode,
    tone_map: ToneMap,
}

impl Engine {
    pub fn new(settings: Settings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let (width, height) = (settings.width, settings.height);

        Ok(Self {
            projector: Projector::new(&settings.projection(), width, height),
            surface: Surface::new(width, height),
            packed: vec![0; width as usize * height as usize],
            settings,
            geometry: GeometryStore::default(),
            face_colors: Vec::new(),
            light: DirectionalLight::default(),
            base_color: colors::FILL,
            render_mode: RenderMode::default(),
            shading_mode: ShadingMode::default(),
            tone_map: ToneMap::default(),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn geometry(&self) -> &GeometryStore {
        &self.geometry
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// The packed buffer from the last [`Engine::render_frame`] or loop iteration.
    pub fn packed(&self) -> &[u32] {
        &self.packed
    }

    pub fn face_colors(&self) -> &[Color] {
        &self.face_colors
    }

    pub fn set_render_mode(&mut self, mode: RenderMode) {
        self.render_mode = mode;
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    pub fn set_shading_mode(&mut self, mode: ShadingMode) {
        self.shading_mode = mode;
        self.shade();
    }

    pub fn shading_mode(&self) -> ShadingMode {
        self.shading_mode
    }

    pub fn set_base_color(&mut self, color: Color) {
        self.base_color = color;
        self.shade();
    }

    pub fn set_light(&mut self, light: DirectionalLight) {
        self.light = light;
        self.shade();
    }

    pub fn set_tone_map(&mut self, operator: ToneMap) {
        self.tone_map = operator;
    }

    /// Takes ownership of a loaded scene, replacing any previous geometry.
    ///
    /// Projected triangles and face colors are cleared until the next
    /// [`Engine::prepare`].
    pub fn load_scene(&mut self, scene: Scene) {
        self.geometry = scene.into_geometry();
        self.face_colors.clear();
        self.projector.clear();

        log::info!(
            "scene '{}' ready: {} vertices, {} triangles in {} objects",
            self.geometry.name(),
            self.geometry.vertex_count(),
            self.geometry.triangle_count(),
            self.geometry.objects().len()
        );
    }

    /// Runs the one-shot stages in order: transform the vertices, sort the
    /// faces back to front, project them, and compute face colors.
    ///
    /// Call once per vertex change. Calling it again compounds the transform.
    pub fn prepare(&mut self, transform: &Transform) {
        let start = Instant::now();
        self.geometry.apply_transform(transform);
        log::debug!(
            "transform: {} vertices in {}µs",
            self.geometry.vertex_count(),
            start.elapsed().as_micros()
        );

        let start = Instant::now();
        self.geometry.sort_by_depth();
        log::debug!(
            "depth sort: {} faces in {}µs",
            self.geometry.triangle_count(),
            start.elapsed().as_micros()
        );

        let start = Instant::now();
        self.projector.project(&self.geometry);
        log::debug!(
            "projection: {} triangles in {}µs",
            self.projector.triangles().len(),
            start.elapsed().as_micros()
        );

        self.shade();
    }

    fn shade(&mut self) {
        let vertices = self.geometry.vertices();
        let epsilon = self.settings.epsilon;
        let (mode, light, base) = (self.shading_mode, self.light, self.base_color);

        self.face_colors.clear();
        self.face_colors
            .extend(self.geometry.faces().iter().map(|face| {
                let normal = face.normal(vertices, epsilon);
                match mode {
                    ShadingMode::Flat => light.shade(base, normal),
                    ShadingMode::Normals => normal.map_or(colors::BLACK, Color::from_direction),
                    ShadingMode::None => base,
                }
            }));
    }

    /// Clears the surface, draws every projected triangle in depth order,
    /// adds the overlays, and tone maps.
    pub fn rasterize(&mut self) {
        let start = Instant::now();
        self.surface.clear(colors::BACKGROUND);

        let (draw_filled, draw_wireframe, draw_vertices) = self.render_mode.layers();
        let triangles = self.projector.triangles();

        if draw_filled {
            for (triangle, &color) in triangles.iter().zip(&self.face_colors) {
                self.surface.fill_triangle(triangle, color);
            }
        }

        for triangle in triangles {
            if draw_wireframe {
                self.surface
                    .draw_triangle(triangle, colors::WIREFRAME, LINE_THICKNESS);
            }
            if draw_vertices {
                for &vertex in &triangle.points {
                    self.surface.fill_circle(vertex, VERTEX_RADIUS, colors::VERTEX);
                }
            }
        }

        if self.settings.debug {
            self.draw_axes();
        }

        self.surface.tonemap(self.tone_map);
        log::trace!("rasterize: {}µs", start.elapsed().as_micros());
    }

    /// Red horizontal and green vertical lines through the surface center.
    fn draw_axes(&mut self) {
        let w = self.surface.width() as f32;
        let h = self.surface.height() as f32;
        let (cx, cy) = ((w / 2.0).floor(), (h / 2.0).floor());
        self.surface.draw_line(
            Vec2::new(0.0, cy),
            Vec2::new(w - 1.0, cy),
            colors::AXIS_X,
            LINE_THICKNESS,
        );
        self.surface.draw_line(
            Vec2::new(cx, 0.0),
            Vec2::new(cx, h - 1.0),
            colors::AXIS_Y,
            LINE_THICKNESS,
        );
    }

    /// Rasterizes and packs one frame, returning the packed pixels.
    pub fn render_frame(&mut self) -> &[u32] {
        self.rasterize();
        self.surface.pack_into(&mut self.packed);
        &self.packed
    }

    /// Drives the frame loop until the presenter reports a quit or
    /// `max_frames` is reached, then exports the last frame.
    pub fn run<P: Presenter>(
        &mut self,
        presenter: &mut P,
        options: &RunOptions,
    ) -> Result<RunSummary, RenderError> {
        let mut limiter = FrameLimiter::new(self.settings.frame_budget());
        let mut stats = FrameStats::new(self.settings.stats_interval());
        let mut frames = 0u64;

        log::info!("entering render loop");
        loop {
            if options.max_frames.is_some_and(|max| frames >= max) {
                log::info!("frame limit of {frames} reached");
                break;
            }
            if presenter.poll_events() == WindowEvent::Quit {
                log::info!("quit requested after {frames} frames");
                break;
            }

            let start = Instant::now();
            self.render_frame();
            let render_time = start.elapsed();

            presenter.present(&self.packed)?;
            frames += 1;

            let dt = limiter.wait_and_get_delta();
            if let Some(report) = stats.record(dt, render_time) {
                log::info!(
                    "{:.1} FPS over {} frames (render {:.3}ms, dt {:.3}ms)",
                    report.fps,
                    report.frames,
                    report.render_ms,
                    report.dt_ms
                );
            }
        }

        if let Some(path) = &options.output {
            self.export(path)?;
        }

        Ok(RunSummary {
            frames,
            output: options.output.clone(),
        })
    }

    /// Writes the current surface to an image file.
    pub fn export(&self, path: &Path) -> Result<(), RenderError> {
        let start = Instant::now();
        self.surface.save_png(path)?;
        log::info!(
            "exported {} in {}ms",
            path.display(),
            start.elapsed().as_millis()
        );
        Ok(())
    }
}
