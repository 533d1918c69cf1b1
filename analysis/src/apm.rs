//! Actions-per-minute, straight off the raw command counts. Every framed
//! command counts as one action; there is no filtering of spam clicks, so
//! the figures read like the ones players quote at each other.

use sage_replay::{ReplayBody, TICKS_PER_SECOND};
use serde::Serialize;

/// APM figures for every player slot.
#[derive(Debug, Clone, Serialize)]
pub struct ApmReport {
    /// Whole-game average per player.
    pub average: Vec<f64>,

    /// `series[player][second]`: APM over the window ending at that second.
    pub series: Vec<Vec<f64>>,

    /// `(second, apm)` of each player's busiest window.
    pub peak: Vec<(u32, f64)>,
}

pub struct ApmAnalyzer<'a> {
    body: &'a ReplayBody,
    player_count: usize,
}

impl<'a> ApmAnalyzer<'a> {
    pub fn new(body: &'a ReplayBody, player_count: usize) -> Self {
        Self { body, player_count }
    }

    /// Computes per-player APM. `interval` is the sliding-window width in
    /// seconds; each series point covers the window ending at its second, so
    /// points earlier than `interval` lean on a shorter prefix.
    pub fn calc(&self, interval: u32) -> ApmReport {
        assert!(interval > 0, "the APM window must be at least one second wide");

        let counts = self.counts_by_second();
        let game_len = counts.len() as u32;

        let average = match game_len {
            0 => vec![0.0; self.player_count],
            _ => {
                let mut totals = vec![0u32; self.player_count];
                for per_second in &counts {
                    for (player, count) in per_second.iter().enumerate() {
                        totals[player] += count;
                    }
                }
                totals
                    .into_iter()
                    .map(|total| f64::from(total) * 60.0 / f64::from(game_len))
                    .collect()
            },
        };

        let mut series: Vec<Vec<f64>> = vec![Vec::new(); self.player_count];
        for second in 0..counts.len() {
            let window = &counts[second.saturating_sub(interval as usize)..=second];
            for (player, apms) in series.iter_mut().enumerate() {
                let in_window: u32 = window.iter().map(|per_second| per_second[player]).sum();
                apms.push(f64::from(in_window) * 60.0 / f64::from(interval));
            }
        }

        let peak = series
            .iter()
            .map(|apms| {
                let mut best = (0u32, 0.0f64);
                for (second, apm) in apms.iter().enumerate() {
                    if *apm > best.1 {
                        best = (second as u32, *apm);
                    }
                }
                best
            })
            .collect();

        ApmReport { average, series, peak }
    }

    /// `counts[second][player]`: commands issued by that player during that
    /// second. The outer vector runs to the last second any command landed
    /// on; trailing command-free chunks don't stretch it.
    fn counts_by_second(&self) -> Vec<Vec<u32>> {
        let mut counts: Vec<Vec<u32>> = Vec::new();
        for command in self.body.commands() {
            let Ok(player) = usize::try_from(command.player_id) else {
                continue;
            };
            if player >= self.player_count {
                continue;
            }

            let second = (command.time_code / TICKS_PER_SECOND) as usize;
            if counts.len() <= second {
                counts.resize(second + 1, vec![0; self.player_count]);
            }
            counts[second][player] += 1;
        }
        counts
    }
}
