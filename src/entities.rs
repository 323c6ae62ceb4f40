/// All game entity types — pure data, no logic.
///
/// The only methods here are bounding-box accessors and display labels;
/// movement, collision and scoring live in the logic modules.

use crate::geometry::Rect;

// ── Enumerations ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Weapon {
    Basic,
    Spread,
    Laser,
    Rapid,
    Missile,
}

impl Weapon {
    pub fn label(&self) -> &'static str {
        match self {
            Weapon::Basic => "BLASTER",
            Weapon::Spread => "SPREAD",
            Weapon::Laser => "LASER",
            Weapon::Rapid => "RAPID",
            Weapon::Missile => "MISSILE",
        }
    }
}

/// The eight power-up kinds. The enumeration order here is the fixed
/// draw order of the weighted selector — it defines first-match
/// behavior for equal weights, so keep it stable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    Spread,
    Laser,
    Rapid,
    Missile,
    Shield,
    ExtraLife,
    Bomb,
    Bonus,
}

impl PowerUpKind {
    pub fn label(&self) -> &'static str {
        match self {
            PowerUpKind::Spread => "Spread Shot",
            PowerUpKind::Laser => "Laser Cannon",
            PowerUpKind::Rapid => "Rapid Fire",
            PowerUpKind::Missile => "Homing Missiles",
            PowerUpKind::Shield => "Shield",
            PowerUpKind::ExtraLife => "Extra Life",
            PowerUpKind::Bomb => "Mega Bomb",
            PowerUpKind::Bonus => "Score Cache",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProjectileKind {
    Normal,
    Laser,
    Missile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

/// Top-level state machine of the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    Start,
    Running,
    Paused,
    LevelComplete,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

// ── Console messages ──────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageKind {
    System,
    Commander,
    Hint,
    Briefing,
    Taunt,
}

/// One line of the scrolling console, stamped with the frame it arrived on.
#[derive(Clone, Debug)]
pub struct DisplayMessage {
    pub frame: u64,
    pub kind: MessageKind,
    pub text: String,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub speed: f32,
    pub weapon: Weapon,
    pub can_fire: bool,
    /// Frame at which `can_fire` resets after a shot.
    pub cooldown_until: u64,
}

impl Player {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Enemy ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Enemy {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Grid row, 0 at the top — selects the sprite variant.
    pub row: usize,
    /// Dead enemies stay in the backing Vec as inert entries; the grid is
    /// never compacted mid-level.
    pub alive: bool,
    /// Two-frame sprite animation phase.
    pub phase: u8,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Projectile ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub w: f32,
    pub h: f32,
    pub owner: Owner,
    pub kind: ProjectileKind,
    pub active: bool,
}

impl Projectile {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

// ── Power-up ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub x: f32,
    pub y: f32,
    pub vy: f32,
    pub size: f32,
    pub kind: PowerUpKind,
    pub active: bool,
    /// Spin phase, cosmetic only.
    pub rotation: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.size, self.size)
    }
}

// ── Particle ──────────────────────────────────────────────────────────────────

/// Cosmetic debris from explosions and hits. Dead once `life` drops to 0.
#[derive(Clone, Debug)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Remaining life in [0, 1].
    pub life: f32,
    pub decay: f32,
    pub size: f32,
}
