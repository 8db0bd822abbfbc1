//! Per-submesh material lifecycle
//!
//! Each submesh moves through `Unclassified -> Placeholder ->
//! NormalMapPending -> Shaded`, with a reset edge back to `Placeholder` when
//! the diffuse texture changes. Body submeshes short-circuit straight to a
//! terminal `Shaded` simple material and never touch the normal-map path.
//!
//! Synthesis runs on a background thread and marshals its result back over
//! an `mpsc` channel consumed only by [`MaterialAssignmentPipeline::pump`],
//! so the active-texture identity and all state transitions stay on one
//! logical thread. A result that no longer matches the active texture is
//! discarded on arrival; stale maps are never applied.

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use crate::assets::{AssetError, ImageData};
use crate::config::DrapeConfig;
use crate::foundation::collections::{Handle, HandleMap};
use crate::foundation::math::Vec2;
use crate::pipeline::events::PipelineEvent;
use crate::render::material::{Material, SimpleMaterialParams, TriplanarMaterialParams};
use crate::scene::{MaterialRole, MeshMaterialClassifier, SceneMesh, Submesh};
use crate::texture::{NormalMap, NormalMapSynthesizer};

/// Stable handle to a submesh owned by the pipeline
pub type SubmeshHandle = Handle;

/// Identity of a distinct diffuse texture submission
///
/// Synthesis is deduplicated and stale results rejected by comparing these
/// identities, not by comparing pixel contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(u64);

/// Lifecycle tag of a submesh's material assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentState {
    /// Created at mesh load, no role or material yet
    Unclassified,
    /// Visible stand-in while the derived material is unavailable
    Placeholder,
    /// Normal-map synthesis for the active texture is in flight
    NormalMapPending,
    /// Final material bound; terminal until the texture changes
    Shaded,
}

/// A submesh with its role, lifecycle state, and bound material
struct SubmeshSlot {
    submesh: Submesh,
    role: MaterialRole,
    state: AssignmentState,
    material: Material,
}

/// Completed synthesis, tagged with the texture it was computed for
struct SynthesisOutcome {
    texture: TextureId,
    result: Result<NormalMap, AssetError>,
}

/// Orchestrates classification, placeholder assignment, background synthesis,
/// and the atomic swap to the final triplanar material
pub struct MaterialAssignmentPipeline {
    config: DrapeConfig,
    classifier: MeshMaterialClassifier,
    slots: HandleMap<SubmeshSlot>,
    active_texture: Option<(TextureId, Arc<ImageData>)>,
    ready_map: Option<Arc<NormalMap>>,
    in_flight: Option<TextureId>,
    next_texture_id: u64,
    outcome_tx: Sender<SynthesisOutcome>,
    outcome_rx: Receiver<SynthesisOutcome>,
    events: VecDeque<PipelineEvent>,
}

impl MaterialAssignmentPipeline {
    /// Create a pipeline with the given configuration
    pub fn new(config: DrapeConfig) -> Self {
        let classifier = MeshMaterialClassifier::from_config(&config.classifier);
        let (outcome_tx, outcome_rx) = channel();

        Self {
            config,
            classifier,
            slots: HandleMap::default(),
            active_texture: None,
            ready_map: None,
            in_flight: None,
            next_texture_id: 0,
            outcome_tx,
            outcome_rx,
            events: VecDeque::new(),
        }
    }

    /// Load a mesh, classify its submeshes, and bind initial materials
    ///
    /// Body submeshes receive their terminal simple material immediately.
    /// Garment submeshes receive a placeholder and, when a diffuse texture is
    /// active, are routed into the synthesis path.
    pub fn load_mesh(&mut self, mesh: SceneMesh) -> Vec<SubmeshHandle> {
        let mut handles = Vec::with_capacity(mesh.submeshes.len());

        for submesh in mesh.submeshes {
            let role = self.classifier.classify(&submesh);
            log::debug!(
                "Submesh '{}' ({} vertices) classified as {:?}",
                submesh.name,
                submesh.vertex_count(),
                role
            );

            let handle = self.slots.insert(SubmeshSlot {
                submesh,
                role,
                state: AssignmentState::Unclassified,
                material: Material::Simple(SimpleMaterialParams::new()),
            });
            self.assign_initial_material(handle);
            handles.push(handle);
        }

        self.ensure_synthesis_scheduled();
        handles
    }

    /// Drop all submesh state, e.g. when the mesh is unloaded
    pub fn unload_mesh(&mut self) {
        self.slots.clear();
    }

    /// Make `image` the active diffuse texture
    ///
    /// Garment submeshes reset to their placeholder and synthesis restarts
    /// for the new image. Submitting the image that is already active is a
    /// no-op (synthesis runs once per distinct image, not per submesh or per
    /// call). Returns the identity assigned to the submission.
    pub fn set_diffuse_texture(&mut self, image: Arc<ImageData>) -> TextureId {
        if let Some((id, active)) = &self.active_texture {
            if Arc::ptr_eq(active, &image) {
                log::debug!("Texture {id:?} already active, skipping resynthesis");
                return *id;
            }
        }

        let id = self.begin_texture_change(image);
        self.ensure_synthesis_scheduled();
        id
    }

    /// Drain completed synthesis results and apply material swaps
    ///
    /// Intended to run on the rendering thread between frames; it never
    /// blocks. Returns the number of results handled.
    pub fn pump(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
            handled += 1;
        }
        handled
    }

    /// Whether no submesh is waiting on synthesis
    pub fn is_settled(&self) -> bool {
        !self
            .slots
            .values()
            .any(|slot| slot.state == AssignmentState::NormalMapPending)
    }

    /// Take all queued advisory events
    pub fn drain_events(&mut self) -> Vec<PipelineEvent> {
        self.events.drain(..).collect()
    }

    /// Lifecycle state of a submesh
    pub fn state(&self, handle: SubmeshHandle) -> Option<AssignmentState> {
        self.slots.get(handle).map(|slot| slot.state)
    }

    /// Material role of a submesh
    pub fn role(&self, handle: SubmeshHandle) -> Option<MaterialRole> {
        self.slots.get(handle).map(|slot| slot.role)
    }

    /// Material currently bound to a submesh
    pub fn material(&self, handle: SubmeshHandle) -> Option<&Material> {
        self.slots.get(handle).map(|slot| &slot.material)
    }

    /// Geometry view of a submesh
    pub fn submesh(&self, handle: SubmeshHandle) -> Option<&Submesh> {
        self.slots.get(handle).map(|slot| &slot.submesh)
    }

    /// The normal map of the active texture, once synthesis has completed
    pub fn active_normal_map(&self) -> Option<Arc<NormalMap>> {
        self.ready_map.clone()
    }

    /// Handles of all loaded submeshes
    pub fn handles(&self) -> Vec<SubmeshHandle> {
        self.slots.keys().collect()
    }

    fn next_texture_id(&mut self) -> TextureId {
        self.next_texture_id += 1;
        TextureId(self.next_texture_id)
    }

    /// Activate a new texture and reset garment submeshes to placeholders
    fn begin_texture_change(&mut self, image: Arc<ImageData>) -> TextureId {
        let id = self.next_texture_id();
        log::info!(
            "Diffuse texture changed: {:?} ({}x{})",
            id,
            image.width(),
            image.height()
        );

        self.active_texture = Some((id, image));
        self.ready_map = None;
        // Anything still in flight is for a previous texture now
        self.in_flight = None;

        let placeholder = self.garment_placeholder();
        for slot in self.slots.values_mut() {
            if slot.role == MaterialRole::Garment {
                slot.state = AssignmentState::Placeholder;
                slot.material = Material::Simple(placeholder.clone());
            }
        }

        id
    }

    /// Kick off background synthesis when it is needed and not yet running
    fn ensure_synthesis_scheduled(&mut self) {
        let Some((id, image)) = self.active_texture.clone() else {
            return;
        };
        if self.ready_map.is_some() {
            return;
        }
        if self.in_flight == Some(id) {
            // A garment loaded mid-flight joins the running synthesis so the
            // commit sweep picks it up with the rest
            self.mark_garments_pending();
            return;
        }
        let has_garment = self
            .slots
            .values()
            .any(|slot| slot.role == MaterialRole::Garment);
        if !has_garment {
            return;
        }

        self.mark_garments_pending();
        self.in_flight = Some(id);

        let tx = self.outcome_tx.clone();
        let strength = self.config.synthesis.normal_strength;
        thread::spawn(move || {
            let result = NormalMapSynthesizer::synthesize(&image, strength);
            // The pipeline may already have been torn down; nothing to do then
            let _ = tx.send(SynthesisOutcome {
                texture: id,
                result,
            });
        });
    }

    fn mark_garments_pending(&mut self) {
        for slot in self.slots.values_mut() {
            if slot.role == MaterialRole::Garment
                && slot.state == AssignmentState::Placeholder
            {
                slot.state = AssignmentState::NormalMapPending;
            }
        }
    }

    /// Apply one synthesis result, discarding it when stale
    fn apply_outcome(&mut self, outcome: SynthesisOutcome) {
        let active_id = self.active_texture.as_ref().map(|(id, _)| *id);
        if active_id != Some(outcome.texture) {
            log::debug!(
                "Discarding stale synthesis result for {:?} (active: {:?})",
                outcome.texture,
                active_id
            );
            return;
        }

        if self.in_flight == Some(outcome.texture) {
            self.in_flight = None;
        }

        match outcome.result {
            Ok(map) => self.commit_normal_map(map),
            Err(error) => {
                log::warn!("Normal-map synthesis failed: {error}");
                let reason = error.to_string();
                for (handle, slot) in &mut self.slots {
                    if slot.state == AssignmentState::NormalMapPending {
                        slot.state = AssignmentState::Placeholder;
                        self.events.push_back(PipelineEvent::SynthesisFailed {
                            submesh: handle,
                            reason: reason.clone(),
                        });
                    }
                }
            }
        }
    }

    /// Swap every pending garment submesh to the final triplanar material
    ///
    /// The swap replaces the whole material value, so no frame can observe a
    /// normal map that mismatches the bound diffuse texture.
    fn commit_normal_map(&mut self, map: NormalMap) {
        let Some((_, diffuse)) = self.active_texture.clone() else {
            return;
        };

        let map = Arc::new(map);
        self.ready_map = Some(Arc::clone(&map));

        let [tile_x, tile_y] = self.config.shading.tile_repeat;
        let mut shaded = 0;
        for (handle, slot) in &mut self.slots {
            if slot.state != AssignmentState::NormalMapPending {
                continue;
            }
            slot.material = Material::Triplanar(TriplanarMaterialParams {
                diffuse: Arc::clone(&diffuse),
                normal: Arc::clone(&map),
                tile_scale: Vec2::new(tile_x, tile_y),
            });
            slot.state = AssignmentState::Shaded;
            shaded += 1;
            self.events
                .push_back(PipelineEvent::MaterialReady { submesh: handle });
        }

        log::info!(
            "Normal map ready ({}x{}), {} garment submesh(es) shaded",
            map.width(),
            map.height(),
            shaded
        );
    }

    /// Immediate material for a freshly loaded submesh
    fn assign_initial_material(&mut self, handle: SubmeshHandle) {
        let shading = &self.config.shading;

        let (state, material, ready_event) = match self.slots[handle].role {
            MaterialRole::Body => {
                // Terminal immediately, never enters the normal-map path
                let params = SimpleMaterialParams::new()
                    .with_color(
                        shading.body_color[0],
                        shading.body_color[1],
                        shading.body_color[2],
                    )
                    .with_roughness(shading.body_roughness)
                    .with_metalness(shading.body_metalness);
                (AssignmentState::Shaded, Material::Simple(params), true)
            }
            MaterialRole::Garment => {
                match (&self.active_texture, &self.ready_map) {
                    // The active texture's map is already synthesized;
                    // new garment submeshes can bind it directly
                    (Some((_, diffuse)), Some(map)) => {
                        let [tile_x, tile_y] = shading.tile_repeat;
                        let params = TriplanarMaterialParams {
                            diffuse: Arc::clone(diffuse),
                            normal: Arc::clone(map),
                            tile_scale: Vec2::new(tile_x, tile_y),
                        };
                        (AssignmentState::Shaded, Material::Triplanar(params), true)
                    }
                    _ => (
                        AssignmentState::Placeholder,
                        Material::Simple(self.garment_placeholder()),
                        false,
                    ),
                }
            }
        };

        let slot = &mut self.slots[handle];
        slot.state = state;
        slot.material = material;
        if ready_event {
            self.events
                .push_back(PipelineEvent::MaterialReady { submesh: handle });
        }
    }

    fn garment_placeholder(&self) -> SimpleMaterialParams {
        let shading = &self.config.shading;
        SimpleMaterialParams::new()
            .with_color(
                shading.garment_placeholder_color[0],
                shading.garment_placeholder_color[1],
                shading.garment_placeholder_color[2],
            )
            .with_roughness(shading.garment_roughness)
            .with_metalness(shading.garment_metalness)
    }
}
