//! Canned commander lines for when the backend is offline or a request
//! fails. Pools are either drawn from at random or indexed by tier.

use rand::Rng;

use super::PerformanceTier;
use crate::entities::PowerUpKind;

pub const TAUNTS: &[&str] = &[
    "Is that the best your species can do?",
    "My formation grows impatient, earthling.",
    "You fight like a cargo drone.",
    "Surrender now and I may spare your high score.",
    "Your aim amuses the armada.",
    "We have dismantled better pilots before breakfast.",
];

pub const BRIEFINGS: &[&str] = &[
    "Commander on deck. Hostile formation detected — clear the sector.",
    "Intel reports a fresh invasion wave. Weapons free, pilot.",
    "This is command. Hold the line and watch for supply drops.",
];

pub const LEVEL_DESCRIPTIONS: &[&str] = &[
    "The next wave flies tighter and shoots faster. Stay mobile.",
    "Enemy reinforcements inbound — expect a meaner formation.",
    "Sector cleared, but the armada adapts. Brace for the next push.",
];

pub fn taunt(rng: &mut impl Rng) -> String {
    pick(rng, TAUNTS)
}

pub fn briefing(rng: &mut impl Rng) -> String {
    pick(rng, BRIEFINGS)
}

pub fn level_description(rng: &mut impl Rng) -> String {
    pick(rng, LEVEL_DESCRIPTIONS)
}

/// Hints are fixed per kind rather than drawn from a pool.
pub fn powerup_hint(kind: PowerUpKind) -> String {
    let hint = match kind {
        PowerUpKind::Spread => "Spread Shot dropped — three lanes of fire beat one.",
        PowerUpKind::Laser => "Laser Cannon dropped — fast, wide, and unforgiving.",
        PowerUpKind::Rapid => "Rapid Fire dropped — hold the trigger and sweep.",
        PowerUpKind::Missile => "Homing Missiles dropped — they find what you miss.",
        PowerUpKind::Shield => "Shield dropped — one more hit you can walk away from.",
        PowerUpKind::ExtraLife => "Extra Life dropped — grab it before it falls away.",
        PowerUpKind::Bomb => "Mega Bomb dropped — one pickup, zero formation.",
        PowerUpKind::Bonus => "Score Cache dropped — free points, falling fast.",
    };
    hint.to_string()
}

pub fn performance_comment(rng: &mut impl Rng, tier: PerformanceTier) -> String {
    let pool: &[&str] = match tier {
        PerformanceTier::Excellent => &[
            "Outstanding marksmanship, pilot. Keep it up.",
            "Command is impressed — barely a shot wasted.",
        ],
        PerformanceTier::Good => &[
            "Solid shooting. Tighten up and you'll ace this sector.",
            "Good work out there. Watch the flanks.",
        ],
        PerformanceTier::Average => &[
            "You're holding on, pilot, but your accuracy needs work.",
            "Half those shots hit vacuum. Breathe, then fire.",
        ],
        PerformanceTier::Poor => &[
            "Are you aiming with your eyes closed, pilot?",
            "The armada thanks you for the light show. Hit something.",
        ],
    };
    pick(rng, pool)
}

pub fn game_over_comment(rng: &mut impl Rng, tier: PerformanceTier) -> String {
    let pool: &[&str] = match tier {
        PerformanceTier::Excellent => &[
            "A legendary run, pilot. The armada will remember you.",
            "You fell, but you made them bleed for every inch.",
        ],
        PerformanceTier::Good => &[
            "A worthy fight. Refit and return to the line.",
            "They got you this time. Next sortie is yours.",
        ],
        PerformanceTier::Average => &[
            "The sector is lost — but pilots are forged in defeat.",
            "Down, not out. Study the formation and fly again.",
        ],
        PerformanceTier::Poor => &[
            "That was... brief. The simulator is always open, pilot.",
            "The armada barely noticed you. Make them notice next time.",
        ],
    };
    pick(rng, pool)
}

fn pick(rng: &mut impl Rng, pool: &[&str]) -> String {
    pool[rng.gen_range(0..pool.len())].to_string()
}
