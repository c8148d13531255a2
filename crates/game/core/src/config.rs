/// Rule tunables for slide and combat resolution.
///
/// Every field has a default, so a partial `config.toml` only needs to name
/// the values it overrides.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Damage of an ordinary entity-on-entity hit.
    pub base_damage: i32,
    /// Multiplier applied to `base_damage` on a wall slam.
    pub crit_multiplier: i32,
    /// Damage taken by an entity that crosses or lands on a trap.
    pub trap_damage: i32,
    /// Hit points for spawns that do not carry their own value.
    pub default_hp: i32,
    /// Overrides `default_hp` for enemy spawns without an explicit value.
    pub enemy_hp: Option<i32>,
    /// When set, a trap turns into an empty cell once it has fired.
    pub disarm_traps_on_trigger: bool,
    /// When set, slamming a defender into a breakable wall destroys the wall.
    pub slam_breaks_walls: bool,
    /// Manhattan radius within which enemies notice players. `None` means unlimited.
    pub ai_detection_range: Option<u32>,
}

impl GameConfig {
    pub const DEFAULT_BASE_DAMAGE: i32 = 1;
    pub const DEFAULT_CRIT_MULTIPLIER: i32 = 2;
    pub const DEFAULT_TRAP_DAMAGE: i32 = 999;
    pub const DEFAULT_HP: i32 = 3;

    pub fn new() -> Self {
        Self {
            base_damage: Self::DEFAULT_BASE_DAMAGE,
            crit_multiplier: Self::DEFAULT_CRIT_MULTIPLIER,
            trap_damage: Self::DEFAULT_TRAP_DAMAGE,
            default_hp: Self::DEFAULT_HP,
            enemy_hp: None,
            disarm_traps_on_trigger: false,
            slam_breaks_walls: true,
            ai_detection_range: None,
        }
    }

    /// Damage dealt by a wall slam.
    pub fn critical_damage(&self) -> i32 {
        self.base_damage.saturating_mul(self.crit_multiplier)
    }

    /// Hit points for a spawn of `faction` that did not specify its own.
    pub fn spawn_hp(&self, faction: crate::Faction) -> i32 {
        match faction {
            crate::Faction::Enemy => self.enemy_hp.unwrap_or(self.default_hp),
            crate::Faction::Player => self.default_hp,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}
