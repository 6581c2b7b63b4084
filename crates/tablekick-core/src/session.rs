//! Session context and the per-frame tick
//!
//! A [`Session`] owns everything that lives between XR session start and
//! end: anchor, rig, scene, physics, gesture and kick state, and the output
//! sinks. Hosts call [`Session::tick`] once per frame (or [`Session::pump`],
//! which pulls the frame from an [`XrHost`]).
//!
//! Order within a frame: host events, pose update, placement, gestures and
//! kicks, physics step and visual sync, present.

use std::collections::BTreeSet;

use tablekick_config::{AppConfig, SessionProfile};
use tablekick_xr::audio::CueSink;
use tablekick_xr::display::{Color, DisplaySink, NodeId, Scene, Shape, VisualNode};
use tablekick_xr::host::{open_session, Capability, CapabilitySet, FrameInput, SessionGrant, XrHost};
use tablekick_xr::input::{EventQueue, HostEvent, PinchRecognizer, PinchTrigger};
use tablekick_xr::spatial::Point3D;

use crate::anchor::{Anchor, AnchorManager};
use crate::error::SessionError;
use crate::kick::{GameEvent, KickController};
use crate::layout::RigLayout;
use crate::physics::PhysicsBridge;
use crate::rig::{generate, Rig, SpawnedRig};

/// What happened during one tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    /// Physics sub-steps run
    pub substeps: usize,
    pub triggers: Vec<PinchTrigger>,
    pub game_events: Vec<GameEvent>,
    /// Anchor committed this frame
    pub placed: Option<Anchor>,
    /// The session ended during (or before) this frame
    pub ended: bool,
}

/// Running totals for the whole session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub frames: u64,
    pub placements: u64,
    pub kicks: u64,
    pub goals: u64,
    pub out_of_bounds: u64,
    pub substeps: u64,
}

struct ActiveRig {
    rig: Rig,
    spawned: SpawnedRig,
}

pub struct Session<C: CueSink, D: DisplaySink> {
    profile: SessionProfile,
    grant: SessionGrant,
    layout: RigLayout,
    anchors: AnchorManager,
    active: Option<ActiveRig>,
    scene: Scene,
    reticle: NodeId,
    physics: PhysicsBridge,
    pinch: PinchRecognizer,
    kick: KickController,
    events: EventQueue,
    cues: C,
    display: D,
    stats: SessionStats,
    ended: bool,
}

/// Capabilities a profile needs from the host
pub fn required_capabilities(profile: SessionProfile) -> CapabilitySet {
    let mut required = CapabilitySet::new().with(Capability::HitTest);
    if profile.requires_hand_tracking() {
        required.insert(Capability::HandTracking);
    }
    required
}

impl<C: CueSink, D: DisplaySink> Session<C, D> {
    /// Validate `config`, run the capability gate and start the host session.
    ///
    /// Nothing is simulated until this succeeds.
    pub async fn start<H>(host: &mut H, config: &AppConfig, mut cues: C, display: D) -> Result<Self, SessionError>
    where
        H: XrHost + ?Sized,
    {
        config.validate()?;
        let profile = config.profile;
        let grant = open_session(host, &required_capabilities(profile)).await?;

        let layout = RigLayout::from_config(&config.rig, profile);
        let [inner, outer] = config.rig.reticle_radii;
        let mut scene = Scene::new();
        let reticle = scene.insert(
            VisualNode::new("reticle", Shape::Ring { inner, outer })
                .with_color(Color::RETICLE_GREEN)
                .hidden(),
        );
        cues.set_volume(config.audio.volume);

        tracing::info!(
            "session started: profile {}, {} bars, {} players",
            profile,
            layout.bars.len(),
            layout.player_count()
        );

        Ok(Self {
            profile,
            grant,
            anchors: AnchorManager::new(),
            active: None,
            scene,
            reticle,
            physics: PhysicsBridge::new(&config.physics),
            pinch: PinchRecognizer::new(config.gesture.pinch_threshold),
            kick: KickController::new(&config.kick, layout.ball_spawn),
            layout,
            events: EventQueue::new(),
            cues,
            display,
            stats: SessionStats::default(),
            ended: false,
        })
    }

    /// Advance one frame
    pub fn tick(&mut self, input: &FrameInput, events: Vec<HostEvent>) -> FrameReport {
        let mut report = FrameReport::default();
        if self.ended {
            tracing::debug!("tick after session end ignored");
            report.ended = true;
            return report;
        }

        let mut select = false;
        let mut ending = false;
        self.events.extend(events);
        for event in self.events.drain() {
            match event {
                HostEvent::Select => select = true,
                HostEvent::Resize { width, height } => {
                    if let Err(e) = self.display.resize(width, height) {
                        tracing::warn!("display resize to {}x{} failed: {}", width, height, e);
                    }
                }
                HostEvent::SessionEnded => ending = true,
            }
        }

        let tracking = input.is_tracking();
        self.anchors
            .update_candidate(if tracking { input.hit_pose } else { None });
        self.update_reticle();

        if select && !ending {
            if let Some(anchor) = self.anchors.commit() {
                self.rebuild_rig(anchor);
                self.stats.placements += 1;
                report.placed = Some(anchor);
            }
        }

        // Pinch latches follow the hands from the first frame, rig or not
        let ball = self.active.as_ref().and_then(|a| a.rig.ball()).map(|e| e.id);
        if tracking && !ending && self.profile.requires_hand_tracking() {
            report.triggers = self.pinch.update(&input.hands);
            if let Some(ball) = ball {
                for trigger in &report.triggers {
                    if let Some(event) =
                        self.kick
                            .on_trigger(trigger.side, ball, &mut self.physics, &mut self.cues)
                    {
                        report.game_events.push(event);
                    }
                }
            }
        } else if !tracking {
            self.pinch.reset();
        }

        report.substeps = self.physics.step(input.delta, &mut self.scene);
        if report.substeps > 0 {
            if let Some(ball) = ball {
                if let Some(event) =
                    self.kick
                        .after_step(ball, &mut self.physics, &mut self.scene, &mut self.cues)
                {
                    report.game_events.push(event);
                }
            }
        }

        if let Err(e) = self.display.present(&self.scene) {
            tracing::warn!("present failed: {}", e);
        }

        self.record(&report);
        if ending {
            self.shutdown();
            report.ended = true;
        }
        report
    }

    /// Pull one frame from `host` and tick it. Returns `None` once the host
    /// has no more frames or the session has ended.
    pub fn pump<H>(&mut self, host: &mut H) -> Option<FrameReport>
    where
        H: XrHost + ?Sized,
    {
        if self.ended {
            return None;
        }
        let input = host.next_frame()?;
        let events = host.drain_events();
        let report = self.tick(&input, events);
        if report.ended {
            host.end_session();
        }
        Some(report)
    }

    /// Tear the session down: close the event queue, release the rig and
    /// shut the display down. Idempotent.
    pub fn shutdown(&mut self) {
        if self.ended {
            return;
        }
        self.events.close();
        self.pinch.reset();
        self.teardown_rig();
        self.anchors.clear();
        self.scene.set_visible(self.reticle, false);
        if let Err(e) = self.display.shutdown() {
            tracing::warn!("display shutdown failed: {}", e);
        }
        self.ended = true;
        tracing::info!(
            "session ended after {} frames: {} kicks, {} goals",
            self.stats.frames,
            self.stats.kicks,
            self.stats.goals
        );
    }

    fn update_reticle(&mut self) {
        match self.anchors.candidate().copied() {
            Some(pose) => {
                self.scene.set_local_transform(self.reticle, pose);
                self.scene.set_visible(self.reticle, true);
            }
            None => {
                self.scene.set_visible(self.reticle, false);
            }
        }
    }

    fn teardown_rig(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };
        self.physics.release_all();
        let removed = self.scene.remove_subtree(active.spawned.root);
        tracing::info!(
            "tore down rig {} ({} nodes)",
            active.rig.anchor.generation,
            removed
        );
    }

    fn rebuild_rig(&mut self, anchor: Anchor) {
        self.teardown_rig();

        let rig = generate(&anchor, &self.layout);
        let spawned = rig.spawn(&mut self.scene);

        self.load_mesh_assets(&rig, &spawned);

        self.physics.register_rig(&rig, &spawned);
        self.kick.reset();
        tracing::info!(
            "built rig {}: {} entities, {} scene nodes",
            anchor.generation,
            rig.entities.len(),
            spawned.nodes().len()
        );
        self.active = Some(ActiveRig { rig, spawned });
    }

    /// Load each mesh asset once; nodes whose asset fails are hidden
    fn load_mesh_assets(&mut self, rig: &Rig, spawned: &SpawnedRig) {
        let keys: BTreeSet<&str> = rig.mesh_assets().map(|(_, key)| key).collect();
        let mut failed = BTreeSet::new();
        for key in keys {
            if let Err(e) = self.display.load_asset(key) {
                tracing::warn!("mesh asset '{}' failed to load: {}", key, e);
                failed.insert(key);
            }
        }
        for (index, key) in rig.mesh_assets() {
            if failed.contains(key) {
                if let Some(node) = spawned.node(index) {
                    self.scene.set_visible(node, false);
                }
            }
        }
    }

    fn record(&mut self, report: &FrameReport) {
        self.stats.frames += 1;
        self.stats.substeps += report.substeps as u64;
        for event in &report.game_events {
            match event {
                GameEvent::Kicked { .. } => self.stats.kicks += 1,
                GameEvent::Goal { .. } => self.stats.goals += 1,
                GameEvent::OutOfBounds => self.stats.out_of_bounds += 1,
            }
        }
        if report.substeps > 0 {
            tracing::trace!("frame {}: {} sub-steps", self.stats.frames, report.substeps);
        }
    }

    pub fn profile(&self) -> SessionProfile {
        self.profile
    }

    pub fn grant(&self) -> &SessionGrant {
        &self.grant
    }

    pub fn layout(&self) -> &RigLayout {
        &self.layout
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchors.anchor()
    }

    pub fn anchors(&self) -> &AnchorManager {
        &self.anchors
    }

    pub fn rig(&self) -> Option<&Rig> {
        self.active.as_ref().map(|a| &a.rig)
    }

    pub fn spawned_rig(&self) -> Option<&SpawnedRig> {
        self.active.as_ref().map(|a| &a.spawned)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn reticle(&self) -> NodeId {
        self.reticle
    }

    pub fn physics(&self) -> &PhysicsBridge {
        &self.physics
    }

    /// Direct access for hosts and tests that script the ball
    pub fn physics_mut(&mut self) -> (&mut PhysicsBridge, &mut Scene) {
        (&mut self.physics, &mut self.scene)
    }

    pub fn pinch(&self) -> &PinchRecognizer {
        &self.pinch
    }

    pub fn kick(&self) -> &KickController {
        &self.kick
    }

    /// Ball position in the rig frame
    pub fn ball_position(&self) -> Option<Point3D> {
        let ball = self.rig()?.ball()?;
        self.physics.body_position(ball.id)
    }

    /// Ball position in the tracking frame
    pub fn ball_world_position(&self) -> Option<Point3D> {
        let anchor = self.anchors.anchor()?;
        Some(anchor.pose.transform_point(self.ball_position()?))
    }

    pub fn cues(&self) -> &C {
        &self.cues
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn is_event_queue_closed(&self) -> bool {
        self.events.is_closed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_capabilities_by_profile() {
        let hit_only = required_capabilities(SessionProfile::HitTestOnly);
        assert!(hit_only.contains(Capability::HitTest));
        assert!(!hit_only.contains(Capability::HandTracking));

        for profile in [SessionProfile::HitTestHandTracking, SessionProfile::AssetDrivenRig] {
            assert_eq!(required_capabilities(profile), CapabilitySet::all());
        }
    }
}
