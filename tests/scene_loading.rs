//! Loading app configs and scene documents from disk, then running them headlessly.
use std::fs;
use std::path::Path;

use road_rush::gfx::RecordingContext;
use road_rush::scene::{LightType, SceneError};
use road_rush::{App, AppError, RunOptions};

fn write_assets(dir: &Path) {
    fs::create_dir_all(dir.join("shaders")).unwrap();
    for name in ["tinted.vert", "tinted.frag", "lit.vert", "lit.frag"] {
        fs::write(dir.join("shaders").join(name), "void main() {}").unwrap();
    }
    fs::create_dir_all(dir.join("textures")).unwrap();
    image::RgbaImage::from_pixel(2, 2, image::Rgba([120, 120, 120, 255]))
        .save(dir.join("textures/asphalt.png"))
        .unwrap();
}

const ROAD_SCENE: &str = r#"{
    "assets": {
        "shaders": {
            "tinted": { "vs": "shaders/tinted.vert", "fs": "shaders/tinted.frag" },
            "lit": { "vs": "shaders/lit.vert", "fs": "shaders/lit.frag" }
        },
        "textures": { "asphalt": "textures/asphalt.png" },
        "samplers": { "repeat": { "MIN_FILTER": "GL_LINEAR_MIPMAP_LINEAR", "WRAP_S": "GL_REPEAT" } },
        "meshes": {
            "car": { "primitive": "cube" },
            "road": { "primitive": "plane", "uvScale": [1, 40] },
            "coin": { "primitive": "sphere", "segments": 12, "rings": 8 }
        },
        "materials": {
            "road": { "type": "lit", "shader": "lit", "albedo": "asphalt", "sampler": "repeat" },
            "car": { "type": "tinted", "shader": "tinted", "tint": [0.9, 0.1, 0.1, 1] },
            "coin": {
                "type": "tinted", "shader": "tinted", "transparent": true,
                "tint": [1, 0.8, 0, 0.6],
                "pipelineState": {
                    "depthTesting": { "enabled": true },
                    "blending": {
                        "enabled": true,
                        "sourceFactor": "GL_SRC_ALPHA",
                        "destinationFactor": "GL_ONE_MINUS_SRC_ALPHA"
                    }
                }
            }
        }
    },
    "world": [
        {
            "name": "player",
            "position": [0, 0, 0],
            "components": [
                { "type": "Mesh Renderer", "mesh": "car", "material": "car" },
                { "type": "Movement", "linearVelocity": [0, 0, -10] }
            ],
            "children": [
                {
                    "name": "chase camera",
                    "position": [0, 3, 8],
                    "rotation": [-15, 0, 0],
                    "components": [ { "type": "Camera", "fovY": 70, "far": 200 } ]
                }
            ]
        },
        {
            "name": "road",
            "position": [0, -0.5, -50],
            "scale": [6, 1, 100],
            "components": [ { "type": "Mesh Renderer", "mesh": "road", "material": "road" } ]
        },
        {
            "name": "coin",
            "position": [1, 0.5, -20],
            "components": [
                { "type": "Mesh Renderer", "mesh": "coin", "material": "coin" },
                { "type": "Movement", "angularVelocity": [0, 90, 0] }
            ]
        },
        {
            "name": "sun",
            "components": [
                { "type": "Light", "lightType": "DIRECTIONAL", "diffuse": [1, 1, 0.9], "direction": [-0.8, 0, 0] }
            ]
        }
    ]
}"#;

#[test]
fn scene_file_referenced_from_app_config_renders_and_tears_down() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    fs::write(dir.path().join("road.json"), ROAD_SCENE).unwrap();
    fs::write(
        dir.path().join("app.json"),
        r#"{
            "window": { "title": "Road Rush", "size": { "width": 640, "height": 360 }, "fullscreen": false },
            "start-scene": "scene",
            "scene": "road.json"
        }"#,
    )
    .unwrap();

    let app = App::from_config_path(dir.path().join("app.json")).unwrap();
    assert_eq!(app.config().resolution.width, 640);

    let report = app
        .dry_run(&RunOptions {
            frames: 4,
            ..RunOptions::default()
        })
        .unwrap();

    assert_eq!(report.scene, "scene");
    assert_eq!(report.entities, 5);
    for stats in &report.frames {
        assert!(stats.camera_found);
        assert_eq!(stats.opaque_draws, 2);
        assert_eq!(stats.transparent_draws, 1);
        assert_eq!(stats.light_count, 1);
        assert_eq!(stats.skipped_commands, 0);
    }
    assert_eq!(report.total_draw_calls(), 12);
}

#[test]
fn inline_scene_is_loaded_relative_to_the_app_config() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    let scene: serde_json::Value = serde_json::from_str(ROAD_SCENE).unwrap();
    let app_config = serde_json::json!({ "gameover-scene": scene });
    fs::write(dir.path().join("app.json"), app_config.to_string()).unwrap();

    let app = App::from_config_path(dir.path().join("app.json")).unwrap();
    let report = app
        .dry_run(&RunOptions {
            scene: Some("gameover-scene".to_string()),
            frames: 1,
            dt: 0.5,
        })
        .unwrap();
    assert_eq!(report.frames[0].draw_calls(), 3);
}

#[test]
fn shader_compile_failure_surfaces_and_releases_loaded_assets() {
    let dir = tempfile::tempdir().unwrap();
    write_assets(dir.path());
    fs::write(dir.path().join("road.json"), ROAD_SCENE).unwrap();
    fs::write(dir.path().join("app.json"), r#"{ "scene": "road.json" }"#).unwrap();

    let app = App::from_config_path(dir.path().join("app.json")).unwrap();
    let mut gl = RecordingContext::new();
    gl.fail_compile(true);
    let result = app.run(
        &mut gl,
        &RunOptions {
            scene: Some("scene".to_string()),
            ..RunOptions::default()
        },
    );

    assert!(matches!(
        result,
        Err(AppError::Scene(SceneError::Render(_)))
    ));
    assert_eq!(gl.live_total(), 0);
    assert_eq!(gl.invalid_releases(), 0);
}

#[test]
fn light_components_reach_the_world() {
    let document = road_rush::scene::SceneLoader::from_value(
        &serde_json::from_str::<serde_json::Value>(ROAD_SCENE).unwrap(),
    )
    .unwrap();
    let mut scene = road_rush::scene::Scene::new();
    let assets = road_rush::asset::Assets::new();

    // Only the sun has no asset references.
    let sun: Vec<_> = document
        .world
        .iter()
        .filter(|entity| entity.name == "sun")
        .cloned()
        .collect();
    road_rush::scene::SceneLoader::load_world(&sun, &mut scene, &assets).unwrap();

    let lights = scene.world_lights();
    assert_eq!(lights.len(), 1);
    assert_eq!(lights[0].kind, LightType::Directional);
}

#[test]
fn missing_app_config_is_a_config_error() {
    let result = App::from_config_path("does/not/exist.json");
    assert!(matches!(result, Err(AppError::Config(_))));
}
