//! Placement candidate and committed anchor

use tablekick_xr::spatial::Pose;

/// A committed placement; the origin of the rig frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub pose: Pose,
    /// Increases by one on every commit within a session
    pub generation: u64,
}

/// Tracks the surface under the reticle and the committed anchor.
///
/// Placement is explicit: only [`AnchorManager::commit`] creates an anchor,
/// and a later commit replaces it.
#[derive(Debug, Default)]
pub struct AnchorManager {
    candidate: Option<Pose>,
    anchor: Option<Anchor>,
    generation: u64,
}

impl AnchorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record this frame's hit pose. Non-finite poses count as no hit.
    pub fn update_candidate(&mut self, pose: Option<Pose>) {
        self.candidate = pose.filter(|p| p.is_finite());
    }

    /// Freeze the visible candidate as the new anchor.
    ///
    /// Returns `None` and changes nothing when no candidate is visible.
    pub fn commit(&mut self) -> Option<Anchor> {
        let Some(pose) = self.candidate else {
            tracing::debug!("placement ignored: no surface under the reticle");
            return None;
        };

        self.generation += 1;
        let anchor = Anchor {
            pose,
            generation: self.generation,
        };
        if let Some(previous) = self.anchor.replace(anchor) {
            tracing::info!(
                "re-placing table (anchor {} replaces {})",
                anchor.generation,
                previous.generation
            );
        } else {
            tracing::info!("table placed (anchor {})", anchor.generation);
        }
        Some(anchor)
    }

    pub fn candidate(&self) -> Option<&Pose> {
        self.candidate.as_ref()
    }

    pub fn is_candidate_visible(&self) -> bool {
        self.candidate.is_some()
    }

    pub fn anchor(&self) -> Option<&Anchor> {
        self.anchor.as_ref()
    }

    /// Forget candidate and anchor (session teardown)
    pub fn clear(&mut self) {
        self.candidate = None;
        self.anchor = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tablekick_xr::spatial::{Point3D, Transform};

    #[test]
    fn test_commit_without_candidate_is_noop() {
        let mut anchors = AnchorManager::new();
        anchors.update_candidate(None);
        assert!(anchors.commit().is_none());
        assert!(anchors.anchor().is_none());
    }

    #[test]
    fn test_commit_freezes_candidate() {
        let mut anchors = AnchorManager::new();
        let hit = Transform::from_position(Point3D::new(0.2, -0.5, -1.0));
        anchors.update_candidate(Some(hit));
        let anchor = anchors.commit().unwrap();
        assert_eq!(anchor.pose, hit);
        assert_eq!(anchor.generation, 1);

        // Later candidates do not move the anchor
        anchors.update_candidate(Some(Transform::identity()));
        assert_eq!(anchors.anchor().unwrap().pose, hit);
    }

    #[test]
    fn test_recommit_replaces_and_lost_surface_keeps_anchor() {
        let mut anchors = AnchorManager::new();
        anchors.update_candidate(Some(Transform::identity()));
        anchors.commit();
        anchors.update_candidate(Some(Transform::from_position(Point3D::new(1.0, 0.0, 0.0))));
        let second = anchors.commit().unwrap();
        assert_eq!(second.generation, 2);

        anchors.update_candidate(None);
        assert!(!anchors.is_candidate_visible());
        assert!(anchors.commit().is_none());
        assert_eq!(anchors.anchor().unwrap().generation, 2);
    }

    #[test]
    fn test_non_finite_candidate_ignored() {
        let mut anchors = AnchorManager::new();
        anchors.update_candidate(Some(Transform::from_position(Point3D::new(f32::NAN, 0.0, 0.0))));
        assert!(!anchors.is_candidate_visible());
    }
}
