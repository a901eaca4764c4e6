use tron_rider_core::{ObstacleId, ObstacleSnapshot, Rect};

/// Wall travelling toward the left edge of the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Obstacle {
    pub(crate) id: ObstacleId,
    pub(crate) rect: Rect,
}

/// Active obstacles kept in spawn order.
#[derive(Debug, Default)]
pub(crate) struct ObstacleSet {
    obstacles: Vec<Obstacle>,
    next_id: u32,
}

impl ObstacleSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, rect: Rect) -> ObstacleId {
        let id = ObstacleId::new(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.obstacles.push(Obstacle { id, rect });
        id
    }

    pub(crate) fn clear(&mut self) {
        self.obstacles.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub(crate) fn snapshots(&self) -> Vec<ObstacleSnapshot> {
        self.obstacles
            .iter()
            .map(|obstacle| ObstacleSnapshot {
                id: obstacle.id,
                rect: obstacle.rect,
            })
            .collect()
    }

    /// Moves every obstacle left by `distance`.
    pub(crate) fn scroll(&mut self, distance: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.rect = obstacle.rect.translated(-distance, 0.0);
        }
    }

    /// First obstacle, in spawn order, whose interior intersects `target`.
    pub(crate) fn first_overlapping(&self, target: &Rect) -> Option<ObstacleId> {
        self.obstacles
            .iter()
            .find(|obstacle| obstacle.rect.overlaps(target))
            .map(|obstacle| obstacle.id)
    }

    /// Drops obstacles whose right edge passed the left screen edge and
    /// returns their identifiers in spawn order.
    ///
    /// The obstacle named by `keep` stays in place even when it has exited.
    pub(crate) fn remove_exited(&mut self, keep: Option<ObstacleId>) -> Vec<ObstacleId> {
        let mut removed = Vec::new();
        self.obstacles.retain(|obstacle| {
            let exited = obstacle.rect.right() < 0.0 && Some(obstacle.id) != keep;
            if exited {
                removed.push(obstacle.id);
            }
            !exited
        });
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_exited_spares_the_kept_obstacle() {
        let mut set = ObstacleSet::new();
        let first = set.push(Rect::new(-60.0, 450.0, 50.0, 50.0));
        let second = set.push(Rect::new(-55.0, 500.0, 50.0, 50.0));
        let third = set.push(Rect::new(-50.0, 500.0, 50.0, 50.0));

        let removed = set.remove_exited(Some(second));

        assert_eq!(removed, vec![first]);
        let remaining: Vec<ObstacleId> = set.iter().map(|obstacle| obstacle.id).collect();
        assert_eq!(remaining, vec![second, third]);
    }

    #[test]
    fn first_overlapping_prefers_spawn_order() {
        let mut set = ObstacleSet::new();
        let first = set.push(Rect::new(120.0, 500.0, 50.0, 50.0));
        let _ = set.push(Rect::new(110.0, 500.0, 50.0, 50.0));

        let player = Rect::new(100.0, 500.0, 100.0, 60.0);
        assert_eq!(set.first_overlapping(&player), Some(first));
    }
}
