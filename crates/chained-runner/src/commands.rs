//! The headless subcommands behind the `chained` binary. Each returns the
//! text to print so it can be tested without a terminal.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use chained_engine::core::scene_file;
use chained_engine::{AssetPalette, EngineConfig, EngineContext, PlayState, SpriteAtlas};

use crate::headless::HeadlessRenderer;
use crate::runner::{load_palette, Runner};

/// Run a scene in the play state for `frames` frames of `dt` seconds and
/// report where every object ended up.
pub fn play(config: EngineConfig, scene: &Path, frames: u32, dt: f32) -> Result<String> {
    let loaded = scene_file::load(scene)
        .with_context(|| format!("failed to load scene {}", scene.display()))?;

    let palette = load_palette(&config);
    let ctx = EngineContext::new(config, palette);
    let state = PlayState::from_scene(&ctx, loaded.scene, loaded.camera, loaded.name);
    let mut runner = Runner::new(ctx, Box::new(state));

    let screen = runner.context().screen();
    let mut renderer = HeadlessRenderer::new(screen.x as u32, screen.y as u32);
    let mut steps = 0;
    for _ in 0..frames {
        if !runner.is_running() {
            break;
        }
        steps += runner.tick(dt);
        runner.render_to(&mut renderer);
    }
    log::info!("ran {} frames ({} fixed steps)", renderer.frames, steps);

    let mut out = String::new();
    writeln!(out, "after {} frames ({} steps):", renderer.frames, steps)?;
    writeln!(
        out,
        "last frame: {} sprites, {} debug lines",
        renderer.last_sprites, renderer.last_lines
    )?;
    if let Some(scene) = runner.stack().top().and_then(|s| s.scene()) {
        for obj in scene.iter() {
            log::info!("{} #{} at ({:.1}, {:.1})", obj.name, obj.id.0, obj.position.x, obj.position.y);
            writeln!(
                out,
                "  {} at ({:.1}, {:.1}) rot {:.2}",
                obj.name, obj.position.x, obj.position.y, obj.rotation
            )?;
        }
    }
    Ok(out)
}

/// List a scene file's objects and camera.
pub fn inspect(scene: &Path) -> Result<String> {
    let loaded = scene_file::load(scene)
        .with_context(|| format!("failed to load scene {}", scene.display()))?;

    let mut out = String::new();
    writeln!(out, "{}: {} objects", loaded.name, loaded.scene.len())?;
    match loaded.camera {
        Some(cam) => writeln!(out, "camera: pos ({:.1}, {:.1}) zoom {:.2}", cam.pos.x, cam.pos.y, cam.zoom)?,
        None => writeln!(out, "camera: none")?,
    }
    let objects: Vec<_> = loaded
        .scene
        .iter()
        .map(|o| {
            let physics = if o.physics.enabled {
                format!("{:?} {:?}", o.physics.body_type, o.physics.shape_type)
            } else {
                "no physics".to_string()
            };
            format!(
                "  {} asset {} at ({:.1}, {:.1}) rot {:.2} scale ({:.2}, {:.2}) {}",
                o.name, o.asset_id, o.position.x, o.position.y, o.rotation, o.scale.x, o.scale.y, physics
            )
        })
        .collect();
    for line in objects {
        writeln!(out, "{}", line)?;
    }
    Ok(out)
}

/// List the asset palette an atlas produces, with the ids scene files use.
pub fn palette(atlas: &Path) -> Result<String> {
    let atlas = SpriteAtlas::load(atlas)
        .with_context(|| format!("failed to load atlas {}", atlas.display()))?;
    let palette = AssetPalette::from_atlas(&atlas);

    let mut out = String::new();
    writeln!(out, "{} ({} assets)", atlas.image(), palette.len())?;
    for (id, entry) in palette.iter().enumerate() {
        writeln!(
            out,
            "  {:>3} {} {}x{}",
            id, entry.name, entry.frame.size_px.x, entry.frame.size_px.y
        )?;
    }
    Ok(out)
}

/// List the scene files in a directory.
pub fn scenes(dir: &Path) -> Result<String> {
    let names = scene_file::list_scenes(dir)
        .with_context(|| format!("failed to list scenes in {}", dir.display()))?;
    let mut out = String::new();
    if names.is_empty() {
        writeln!(out, "no scenes in {}", dir.display())?;
    }
    for name in names {
        writeln!(out, "{}", name)?;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chained_engine::{PhysicsBody, Scene};
    use glam::Vec2;

    fn write_scene(dir: &Path) -> std::path::PathBuf {
        let mut scene = Scene::new();
        let ground = scene.spawn("ground", 0, Vec2::ZERO);
        if let Some(obj) = scene.get_mut(ground) {
            obj.physics = PhysicsBody::static_box(Vec2::new(800.0, 32.0));
        }
        let falling = scene.spawn("crate", 1, Vec2::new(0.0, 300.0));
        if let Some(obj) = scene.get_mut(falling) {
            obj.physics = PhysicsBody::dynamic_box(Vec2::splat(32.0));
        }
        scene_file::save(dir.join("level.json"), scene.objects(), None).unwrap()
    }

    #[test]
    fn inspect_lists_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scene(dir.path());
        let out = inspect(&path).unwrap();
        assert!(out.starts_with("level.json: 2 objects"));
        assert!(out.contains("camera: none"));
        assert!(out.contains("crate asset 1 at (0.0, 300.0)"));
    }

    #[test]
    fn inspect_missing_scene_fails_with_context() {
        let dir = tempfile::tempdir().unwrap();
        let err = inspect(&dir.path().join("nope.json")).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to load scene"));
    }

    #[test]
    fn play_runs_requested_frames() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scene(dir.path());
        let config = EngineConfig { atlas_path: dir.path().join("none.json"), ..Default::default() };
        let out = play(config, &path, 30, 1.0 / 60.0).unwrap();
        assert!(out.starts_with("after 30 frames (30 steps):"));
        assert!(out.contains("ground at (0.0, 0.0)"));
    }

    #[cfg(feature = "physics")]
    #[test]
    fn play_moves_dynamic_objects() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_scene(dir.path());
        let config = EngineConfig { atlas_path: dir.path().join("none.json"), ..Default::default() };
        let out = play(config, &path, 30, 1.0 / 60.0).unwrap();
        assert!(!out.contains("crate at (0.0, 300.0)"));
    }

    #[test]
    fn palette_lists_sorted_slices() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sprites.json");
        std::fs::write(&path, r#"{
            "frames": {},
            "meta": {
                "image": "sprites.png",
                "size": { "w": 64, "h": 64 },
                "slices": [
                    { "name": "zombie", "keys": [{ "bounds": { "x": 0, "y": 0, "w": 16, "h": 24 } }] },
                    { "name": "crate", "keys": [{ "bounds": { "x": 16, "y": 0, "w": 32, "h": 32 } }] }
                ]
            }
        }"#).unwrap();
        let out = palette(&path).unwrap();
        assert_eq!(out, "sprites.png (2 assets)\n    0 crate 32x32\n    1 zombie 16x24\n");
    }

    #[test]
    fn scenes_lists_or_reports_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(scenes(dir.path()).unwrap().starts_with("no scenes"));
        write_scene(dir.path());
        assert_eq!(scenes(dir.path()).unwrap(), "level.json\n");
    }
}
