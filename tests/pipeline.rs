use std::fs;
use std::path::PathBuf;

use liraster::colors;
use liraster::error::RenderError;
use liraster::prelude::*;
use liraster::LoadError;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("liraster-{name}-{}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir
}

/// Quits after a fixed number of frames and keeps the last one.
struct Recorder {
    frames_left: u32,
    last_frame: Vec<u32>,
}

impl Presenter for Recorder {
    fn poll_events(&mut self) -> WindowEvent {
        if self.frames_left == 0 {
            WindowEvent::Quit
        } else {
            WindowEvent::None
        }
    }

    fn present(&mut self, pixels: &[u32]) -> Result<(), RenderError> {
        self.frames_left -= 1;
        self.last_frame = pixels.to_vec();
        Ok(())
    }
}

const SETTINGS: &str = r#"{
    "W": 120, "H": 90, "AOV": 90, "NEAR_CLIP": 0.1, "FAR_CLIP": 100,
    "FPS": 0, "UPDATE_TIME": 0, "DEBUG": false
}"#;

const QUAD: &str = r#"{
    "name": "quad",
    "vertexCount": 4,
    "objectCount": 1,
    "vertices": [-1, -1, 0,  1, -1, 0,  1, 1, 0,  -1, 1, 0],
    "objects": [
        { "name": "quad", "vertexCount": 4, "indexCount": 6, "triangleCount": 2,
          "indices": [0, 1, 2,  0, 2, 3] }
    ]
}"#;

#[test]
fn scene_file_renders_and_exports() {
    let dir = scratch_dir("pipeline");
    let scene_path = dir.join("quad.json");
    let config_path = dir.join("settings.json");
    let output = dir.join("Out").join("img.png");
    fs::write(&scene_path, QUAD).unwrap();
    fs::write(&config_path, SETTINGS).unwrap();

    let settings = Settings::load(&config_path).unwrap();
    assert_eq!((settings.width, settings.height), (120, 90));

    let mut engine = Engine::new(settings).unwrap();
    engine.set_shading_mode(ShadingMode::None);
    engine.load_scene(Scene::load(&scene_path).unwrap());
    assert_eq!(engine.geometry().vertex_count(), 4);
    assert_eq!(engine.geometry().triangle_count(), 2);

    let mut transform = Transform::new();
    transform.set_translation_xyz(0.0, 0.0, -3.0);
    engine.prepare(&transform);

    let mut recorder = Recorder {
        frames_left: 3,
        last_frame: Vec::new(),
    };
    let options = RunOptions {
        max_frames: None,
        output: Some(output.clone()),
    };
    let summary = engine.run(&mut recorder, &options).unwrap();
    assert_eq!(summary.frames, 3);
    assert_eq!(recorder.last_frame, engine.packed());

    // Quad spans x in [45, 75) and y in [30, 60) on a 120x90 surface.
    let fill = colors::FILL.to_argb8888();
    let background = colors::BACKGROUND.to_argb8888();
    let at = |x: usize, y: usize| recorder.last_frame[y * 120 + x];
    assert_eq!(at(60, 45), fill);
    assert_eq!(at(45, 30), fill);
    assert_eq!(at(74, 59), fill);
    assert_eq!(at(44, 45), background);
    assert_eq!(at(75, 45), background);
    assert_eq!(at(60, 60), background);

    // The diagonal shared by both triangles leaves no gap.
    for i in 0..30 {
        assert_eq!(at(45 + i, 59 - i), fill, "gap on the diagonal at {i}");
    }

    let image = image::open(&output).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (120, 90));
    assert_eq!(image.get_pixel(60, 45).0, [0, 0, 255, 255]);
    assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn legacy_triangles_form_renders() {
    let json = r#"{
        "vertexCount": 3,
        "triangleCount": 1,
        "vertices": [0, 0, -5,  1, 0, -5,  0, 1, -5],
        "triangles": [0, 1, 2]
    }"#;
    let mut settings = Settings::default();
    settings.apply_json(SETTINGS).unwrap();

    let mut engine = Engine::new(settings).unwrap();
    engine.load_scene(Scene::from_json_str(json).unwrap());
    engine.prepare(&Transform::new());

    let frame = engine.render_frame().to_vec();
    assert!(frame
        .iter()
        .any(|&p| p != colors::BACKGROUND.to_argb8888()));
}

#[test]
fn invalid_scene_is_rejected_before_rendering() {
    let json = r#"{
        "vertexCount": 3,
        "objectCount": 1,
        "vertices": [0, 0, -5,  1, 0, -5,  0, 1, -5],
        "objects": [{ "name": "bad", "indexCount": 3, "indices": [0, 1, 3] }]
    }"#;
    match Scene::from_json_str(json) {
        Err(LoadError::IndexOutOfRange {
            field,
            index,
            vertex_count,
        }) => {
            assert_eq!(field, "objects[0].indices[2]");
            assert_eq!(index, 3);
            assert_eq!(vertex_count, 3);
        }
        other => panic!("expected an index error, got {other:?}"),
    }

    let missing = scratch_dir("missing").join("nope.json");
    assert!(matches!(
        Scene::load(&missing),
        Err(LoadError::Io { .. })
    ));
}

#[test]
fn projected_y_decreases_as_source_y_increases() {
    let json = r#"{
        "vertexCount": 3,
        "objectCount": 1,
        "vertices": [0, 0, -5,  1, 0, -5,  0, 1, -5],
        "objects": [{ "name": "tri", "indexCount": 3, "indices": [0, 1, 2] }]
    }"#;
    let geometry = Scene::from_json_str(json).unwrap().into_geometry();

    let projection = Projection::from_degrees(90.0, 1.0, 0.1, 100.0);
    let mut projector = liraster::Projector::new(&projection, 200, 200);
    let triangles = projector.project(&geometry);
    let [a, b, c] = triangles[0].points;

    approx::assert_relative_eq!(a.x, 100.0, epsilon = 1e-3);
    approx::assert_relative_eq!(a.y, 100.0, epsilon = 1e-3);
    approx::assert_relative_eq!(b.y, a.y, epsilon = 1e-3);
    assert!(b.x > a.x);
    assert!(c.y < a.y);
}
