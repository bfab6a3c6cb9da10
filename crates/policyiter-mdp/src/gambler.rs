use policyiter_core::{Outcome, TabularModel};

use crate::MdpError;

/// Gambler's problem: stake part of the current capital on a biased coin flip
/// until the capital reaches `goal` (reward 1) or drops to 0.
///
/// States are capitals `0..=goal`; actions are stakes. Both ends only allow a
/// zero stake, which leaves the capital unchanged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GamblerProblem {
    goal: u32,
    head_prob: f64,
}

impl Default for GamblerProblem {
    fn default() -> Self {
        GamblerProblem {
            goal: 100,
            head_prob: 0.4,
        }
    }
}

impl GamblerProblem {
    pub fn new(goal: u32, head_prob: f64) -> Result<Self, MdpError> {
        if goal == 0 {
            return Err(MdpError::InvalidGoal { goal });
        }
        if !(0.0..=1.0).contains(&head_prob) {
            return Err(MdpError::InvalidHeadProbability { value: head_prob });
        }
        Ok(GamblerProblem { goal, head_prob })
    }

    pub fn goal(&self) -> u32 {
        self.goal
    }

    pub fn head_prob(&self) -> f64 {
        self.head_prob
    }

    /// Legal stakes for `capital`: up to what is held and no more than what is missing.
    pub fn stakes(&self, capital: u32) -> Vec<u32> {
        if capital == 0 || capital >= self.goal {
            return vec![0];
        }
        (1..=capital.min(self.goal - capital)).collect()
    }

    /// Enumerate the full transition table.
    pub fn model(&self) -> TabularModel<u32, u32> {
        let mut model = TabularModel::new();
        for capital in 0..=self.goal {
            for stake in self.stakes(capital) {
                let win = capital + stake;
                let reward = if win == self.goal && capital != self.goal {
                    1.0
                } else {
                    0.0
                };
                model.add_action(
                    capital,
                    stake,
                    vec![
                        Outcome::new(win, reward, self.head_prob),
                        Outcome::new(capital - stake, 0.0, 1.0 - self.head_prob),
                    ],
                );
            }
        }
        model
    }
}
