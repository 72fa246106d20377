use crate::{PacingRule, PipelineError, PlayPhase, ScoringPipeline, Table};

/// Drives a [`ScoringPipeline`] from a frame loop, one beat per interval.
#[derive(Debug, Clone)]
pub struct Pacer {
    rule: PacingRule,
    timer: u32,
}

impl Pacer {
    pub fn new(rule: PacingRule) -> Self {
        Self { rule, timer: 0 }
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn reset(&mut self) {
        self.timer = 0;
    }

    /// Frames between beats while in `phase`.
    pub fn interval_for(&self, phase: PlayPhase) -> u32 {
        match phase {
            PlayPhase::PlayingAnimation => self.rule.playing_interval,
            PlayPhase::EndingAnimation | PlayPhase::Ended => self.rule.ending_interval,
            PlayPhase::ScoringCards
            | PlayPhase::ScoringHeld
            | PlayPhase::ScoringIndependent
            | PlayPhase::ScoringHandEnd => self.rule.scoring_interval,
        }
    }

    /// Advances one frame. Returns true when the frame produced a beat.
    /// A finished pipeline idles.
    pub fn tick(
        &mut self,
        pipeline: &mut ScoringPipeline,
        table: &mut Table,
    ) -> Result<bool, PipelineError> {
        if pipeline.is_finished() {
            return Ok(false);
        }
        self.timer = self.timer.saturating_add(1);
        if self.timer <= self.rule.start_delay {
            return Ok(false);
        }
        let interval = self.interval_for(pipeline.phase()).max(1);
        if (self.timer - self.rule.start_delay) % interval != 0 {
            return Ok(false);
        }
        let before = pipeline.phase();
        let phase = pipeline.step(table)?;
        // Scoring and the closing animation each wait out the start delay.
        if phase != before && matches!(phase, PlayPhase::ScoringCards | PlayPhase::EndingAnimation) {
            self.timer = 0;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{parse_cards, GameConfig};

    #[test]
    fn nothing_happens_during_the_start_delay() {
        let config = GameConfig::default();
        let mut table = Table::new(&config.scoring, 1);
        table.play(parse_cards("AS").unwrap(), Vec::new());
        let mut pipeline = ScoringPipeline::begin(&config, &mut table).unwrap();
        let mut pacer = Pacer::new(config.scoring.pacing);

        for _ in 0..config.scoring.pacing.start_delay {
            assert!(!pacer.tick(&mut pipeline, &mut table).unwrap());
        }
        assert_eq!(pipeline.phase(), PlayPhase::PlayingAnimation);
    }

    #[test]
    fn ticking_reaches_the_end() {
        let config = GameConfig::default();
        let mut table = Table::new(&config.scoring, 1);
        table.play(parse_cards("AS KS").unwrap(), Vec::new());
        let mut pipeline = ScoringPipeline::begin(&config, &mut table).unwrap();
        let mut pacer = Pacer::new(config.scoring.pacing);

        let mut frames = 0;
        while !pipeline.is_finished() {
            pacer.tick(&mut pipeline, &mut table).unwrap();
            frames += 1;
            assert!(frames < 10_000);
        }
        assert!(!pacer.tick(&mut pipeline, &mut table).unwrap());
        // High card: only the ace scores.
        assert_eq!(pipeline.outcome().score, 5 + 11);
    }
}
