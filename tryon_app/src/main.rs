//! Headless try-on demo
//!
//! Drives the whole material pipeline end to end without a window: loads (or
//! generates) an avatar mesh, classifies its submeshes, synthesizes a normal
//! map from a diffuse texture in the background, and reports every state
//! transition. The derived normal map is written next to the working
//! directory so the relief can be inspected.
//!
//! Usage:
//!   tryon_demo [mesh.obj] [texture.{jpg,png}]
//!
//! With no arguments a synthetic mannequin + saree mesh and a checkerboard
//! texture are used.

use std::sync::Arc;
use std::time::{Duration, Instant};

use drape_engine::prelude::*;

/// How long the demo waits for the pipeline to settle before giving up
const SETTLE_TIMEOUT: Duration = Duration::from_secs(30);

struct TryOnApp {
    pipeline: MaterialAssignmentPipeline,
    shader: TriplanarShader,
    handles: Vec<SubmeshHandle>,
}

impl TryOnApp {
    fn new(config: DrapeConfig, mesh: SceneMesh) -> Self {
        let mut normalizer = ModelNormalizer::from_config(&config.normalizer);
        let frame = normalizer.normalize(&mesh);
        log::info!(
            "Viewing frame: scale {:.4}, translation ({:.3}, {:.3}, {:.3})",
            frame.scale,
            frame.translation.x,
            frame.translation.y,
            frame.translation.z
        );

        let shader = TriplanarShader::from_config(&config.shading);
        let mut pipeline = MaterialAssignmentPipeline::new(config);
        let handles = pipeline.load_mesh(mesh);

        Self {
            pipeline,
            shader,
            handles,
        }
    }

    /// Swap the garment texture and pump the pipeline until it settles
    fn apply_texture(&mut self, diffuse: Arc<ImageData>) -> Result<(), String> {
        self.pipeline.set_diffuse_texture(diffuse);

        let start = Instant::now();
        while !self.pipeline.is_settled() {
            self.pipeline.pump();
            self.report_events();
            if start.elapsed() > SETTLE_TIMEOUT {
                return Err("pipeline did not settle in time".to_string());
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        self.report_events();
        Ok(())
    }

    fn report_events(&mut self) {
        for event in self.pipeline.drain_events() {
            match event {
                PipelineEvent::MaterialReady { submesh } => {
                    let name = self
                        .pipeline
                        .submesh(submesh)
                        .map_or("<gone>", |s| s.name.as_str());
                    log::info!("Material ready for '{name}'");
                }
                PipelineEvent::SynthesisFailed { submesh, reason } => {
                    let name = self
                        .pipeline
                        .submesh(submesh)
                        .map_or("<gone>", |s| s.name.as_str());
                    log::warn!("Synthesis failed for '{name}': {reason}");
                }
            }
        }
    }

    /// Log a shaded sample per garment submesh as a sanity preview
    fn preview(&self) {
        for &handle in &self.handles {
            let Some(submesh) = self.pipeline.submesh(handle) else {
                continue;
            };
            let Some(material) = self.pipeline.material(handle) else {
                continue;
            };

            match material {
                Material::Triplanar(params) => {
                    let pos = submesh.positions.first().copied().unwrap_or_else(Vec3::zeros);
                    let normal = submesh.normals.first().copied().unwrap_or_else(Vec3::z);
                    let color = self.shader.shade(
                        &pos,
                        &normal,
                        Some(params.diffuse.as_ref()),
                        Some(params.normal.as_ref()),
                    );
                    log::info!(
                        "'{}' sample color at {:?}: {:?}",
                        submesh.name,
                        (pos.x, pos.y, pos.z),
                        color
                    );
                }
                Material::Simple(params) => {
                    log::info!(
                        "'{}' flat color ({:.2}, {:.2}, {:.2}), roughness {:.2}",
                        submesh.name,
                        params.base_color.x,
                        params.base_color.y,
                        params.base_color.z,
                        params.roughness
                    );
                }
            }
        }
    }

    fn save_normal_map(&self, path: &str) -> Result<(), String> {
        let Some(map) = self.pipeline.active_normal_map() else {
            return Err("no normal map is ready".to_string());
        };
        image::save_buffer(
            path,
            map.image().data(),
            map.width(),
            map.height(),
            image::ColorType::Rgba8,
        )
        .map_err(|e| format!("failed to write {path}: {e}"))?;
        log::info!("Wrote derived normal map to {path}");
        Ok(())
    }
}

/// A flat vertex grid standing in for scanned geometry
fn grid_submesh(name: &str, side: u32, spacing: f32, z: f32) -> Submesh {
    let mut positions = Vec::with_capacity((side * side) as usize);
    let mut normals = Vec::with_capacity((side * side) as usize);
    let half = (side as f32 - 1.0) * spacing * 0.5;

    for y in 0..side {
        for x in 0..side {
            positions.push(Vec3::new(
                x as f32 * spacing - half,
                y as f32 * spacing,
                z,
            ));
            normals.push(Vec3::z());
        }
    }

    Submesh::new(name, None, positions, normals)
}

/// Mannequin + saree stand-in used when no OBJ path is given
fn synthetic_mesh() -> SceneMesh {
    SceneMesh::new(vec![
        // Coarse body: 71*71 = 5041 vertices, below the garment threshold
        grid_submesh("Body", 71, 0.025, 0.0),
        // Finely tessellated drape: 200*200 = 40000 vertices
        grid_submesh("Saree", 200, 0.009, 0.05),
    ])
}

fn main() {
    drape_engine::foundation::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let mesh_path = args.get(1);
    let texture_path = args.get(2);

    let config = DrapeConfig::default();

    let mesh = match mesh_path {
        Some(path) => match ObjLoader::load_obj(path) {
            Ok(mesh) => mesh,
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No mesh path given, using the synthetic mannequin");
            synthetic_mesh()
        }
    };

    let diffuse = match texture_path {
        Some(path) => match ImageData::from_file(path) {
            Ok(image) => Arc::new(image),
            Err(e) => {
                log::error!("Failed to load {path}: {e}");
                std::process::exit(1);
            }
        },
        None => {
            log::info!("No texture path given, using a checkerboard");
            Arc::new(ImageData::checkerboard(
                64,
                64,
                [196, 32, 48, 255],
                [240, 220, 160, 255],
            ))
        }
    };

    let mut app = TryOnApp::new(config, mesh);

    if let Err(e) = app.apply_texture(diffuse) {
        log::error!("{e}");
        std::process::exit(1);
    }
    app.preview();
    if let Err(e) = app.save_normal_map("derived_normal_map.png") {
        log::warn!("{e}");
    }

    // Simulate the picker swapping to a recommended pattern: a second,
    // differently colored texture re-enters the pipeline at assignment
    let catalog = TextureCatalog::bundled();
    if let Some(entry) = catalog.recommend(SkinTone::Medium) {
        log::info!("Recommended pattern for medium tone: {}", entry.file);
    }
    let swapped = Arc::new(ImageData::checkerboard(
        64,
        64,
        [40, 60, 180, 255],
        [230, 230, 230, 255],
    ));
    if let Err(e) = app.apply_texture(swapped) {
        log::error!("{e}");
        std::process::exit(1);
    }
    app.preview();

    log::info!("Demo finished");
}
