use serde::Serialize;

/// Reason a bird was removed from a batch.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
pub enum DeathCause {
    #[display("pipe collision")]
    PipeCollision,
    #[display("hit the floor")]
    HitFloor,
    #[display("left the top of the screen")]
    HitCeiling,
}

/// Counters collected while a batch runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchStats {
    ticks: u64,
    score: u32,
    pipes_spawned: u32,
    pipe_collisions: u32,
    floor_hits: u32,
    ceiling_hits: u32,
}

impl BatchStats {
    #[must_use]
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Number of pass events.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    /// Number of pipes created, including the initial one.
    #[must_use]
    pub fn pipes_spawned(&self) -> u32 {
        self.pipes_spawned
    }

    #[must_use]
    pub fn deaths(&self, cause: DeathCause) -> u32 {
        match cause {
            DeathCause::PipeCollision => self.pipe_collisions,
            DeathCause::HitFloor => self.floor_hits,
            DeathCause::HitCeiling => self.ceiling_hits,
        }
    }

    #[must_use]
    pub fn total_deaths(&self) -> u32 {
        self.pipe_collisions + self.floor_hits + self.ceiling_hits
    }

    pub(crate) fn record_tick(&mut self) {
        self.ticks += 1;
    }

    pub(crate) fn record_spawn(&mut self) {
        self.pipes_spawned += 1;
    }

    pub(crate) fn record_pass(&mut self) {
        self.score += 1;
    }

    pub(crate) fn record_death(&mut self, cause: DeathCause) {
        let counter = match cause {
            DeathCause::PipeCollision => &mut self.pipe_collisions,
            DeathCause::HitFloor => &mut self.floor_hits,
            DeathCause::HitCeiling => &mut self.ceiling_hits,
        };
        *counter += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deaths_by_cause() {
        let mut stats = BatchStats::default();
        stats.record_death(DeathCause::HitFloor);
        stats.record_death(DeathCause::HitFloor);
        stats.record_death(DeathCause::PipeCollision);
        assert_eq!(stats.deaths(DeathCause::HitFloor), 2);
        assert_eq!(stats.deaths(DeathCause::PipeCollision), 1);
        assert_eq!(stats.deaths(DeathCause::HitCeiling), 0);
        assert_eq!(stats.total_deaths(), 3);
    }

    #[test]
    fn test_cause_display() {
        assert_eq!(DeathCause::PipeCollision.to_string(), "pipe collision");
        assert_eq!(
            serde_json::to_string(&DeathCause::HitCeiling).unwrap(),
            "\"HitCeiling\""
        );
    }
}
