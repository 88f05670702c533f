//! Catch and miss detection
//!
//! Every tick each falling entity is checked against the floor line first,
//! then against the collector's box. Anything that touches either is scored
//! and recycled in place.

use rand::Rng;

use super::collector::Collector;
use super::entity::FallingEntity;
use super::state::{GameEvent, MissKind, Session};
use crate::audio::{AudioCue, SoundEffect};
use crate::consts::FLOOR_Y;
use crate::tuning::Tuning;

/// What happened to one entity this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Still falling
    None,
    /// Lower edge crossed the floor line
    Floor,
    /// Landed in the collector
    Collector,
}

/// Classify an entity against the floor and the collector
///
/// The floor wins: an entity below the floor line is a miss even if it also
/// overlaps the collector box. A catch needs horizontal overlap, the lower
/// edge at or below the collector top, and the entity centre still at or
/// above the collector centre, so one pass can never score twice.
pub fn contact(entity: &FallingEntity, collector: &Collector) -> Contact {
    if entity.bottom() < FLOOR_Y {
        return Contact::Floor;
    }
    let overlaps_x = entity.right() > collector.left() && entity.left() < collector.right();
    if overlaps_x && entity.bottom() <= collector.top() && entity.pos.y >= collector.y {
        Contact::Collector
    } else {
        Contact::None
    }
}

/// Resolve contacts for every entity in the session
///
/// Returns `true` once the miss budget is spent. Processing stops at that
/// entity; the rest of the collection is left untouched for this tick.
pub fn resolve<R: Rng + ?Sized>(
    session: &mut Session,
    rng: &mut R,
    tuning: &Tuning,
    events: &mut Vec<GameEvent>,
) -> bool {
    for i in 0..session.entities.len() {
        let entity = session.entities.entities()[i];
        match contact(&entity, &session.collector) {
            Contact::None => continue,
            Contact::Floor => {
                session.record_miss(tuning);
                events.push(GameEvent::Missed {
                    kind: MissKind::Floor,
                    misses: session.misses,
                });
            }
            Contact::Collector if entity.category == session.collector.category => {
                session.score += 1;
                events.push(GameEvent::Cue(AudioCue::Sfx(SoundEffect::Correct)));
                events.push(GameEvent::Scored {
                    score: session.score,
                });
            }
            Contact::Collector => {
                session.record_miss(tuning);
                events.push(GameEvent::Cue(AudioCue::Sfx(SoundEffect::Wrong)));
                events.push(GameEvent::Missed {
                    kind: MissKind::WrongBin,
                    misses: session.misses,
                });
            }
        }

        session.entities.recycle(i, rng, &session.difficulty);

        if session.misses >= tuning.max_misses {
            log::info!(
                "Miss budget spent: score {} after {} ticks",
                session.score,
                session.ticks
            );
            return true;
        }

        if let Some(next) = session.difficulty.advance(session.score, tuning) {
            session.difficulty = next;
            session.entities.spawn_one(rng, &session.difficulty);
            log::debug!(
                "Tier {} (delay {} ticks, cap {}, speed {:.3}..{:.3})",
                next.tier,
                next.spawn_delay,
                next.max_entities,
                next.min_speed,
                next.min_speed + next.speed_offset
            );
            events.push(GameEvent::TierUp { tier: next.tier });
        }
    }
    false
}
