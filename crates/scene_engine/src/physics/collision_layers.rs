//! Collision layer filtering
//!
//! Every collider sits on one or more layers and carries a mask of the
//! layers it wants to collide with. A pair is tested only when each side's
//! layer appears in the other side's mask.

use bitflags::bitflags;

bitflags! {
    /// Collision layer bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CollisionLayers: u32 {
        /// Player character
        const PLAYER = 1 << 0;
        /// Non-player characters
        const ENEMY = 1 << 1;
        /// Projectiles
        const PROJECTILE = 1 << 2;
        /// Static level geometry
        const ENVIRONMENT = 1 << 3;
        /// Trigger volumes
        const TRIGGER = 1 << 4;
        /// Loose props
        const PROP = 1 << 5;
        /// Pickups and collectibles
        const PICKUP = 1 << 6;
    }
}

impl Default for CollisionLayers {
    fn default() -> Self {
        Self::all()
    }
}

impl CollisionLayers {
    /// Check if two colliders should collide based on their layers and masks
    ///
    /// ```
    /// use scene_engine::physics::CollisionLayers;
    ///
    /// let player = (CollisionLayers::PLAYER, CollisionLayers::ENVIRONMENT);
    /// let wall = (CollisionLayers::ENVIRONMENT, CollisionLayers::all());
    /// assert!(CollisionLayers::should_collide(player.0, player.1, wall.0, wall.1));
    /// ```
    pub fn should_collide(
        layer_a: CollisionLayers,
        mask_a: CollisionLayers,
        layer_b: CollisionLayers,
        mask_b: CollisionLayers,
    ) -> bool {
        mask_b.intersects(layer_a) && mask_a.intersects(layer_b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_collide_mutual() {
        assert!(CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::PLAYER,
        ));
    }

    #[test]
    fn test_should_not_collide_one_way() {
        // Player wants the enemy, the enemy ignores players
        assert!(!CollisionLayers::should_collide(
            CollisionLayers::PLAYER,
            CollisionLayers::ENEMY,
            CollisionLayers::ENEMY,
            CollisionLayers::ENVIRONMENT,
        ));
    }

    #[test]
    fn test_default_collides_with_everything() {
        let all = CollisionLayers::default();
        assert!(CollisionLayers::should_collide(all, all, CollisionLayers::PICKUP, all));
        assert!(!CollisionLayers::should_collide(all, CollisionLayers::empty(), all, all));
    }
}
