//! Player economy touched by the combat phases.

/// Lives and gold, plus running tallies for summaries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Ledger {
    lives: u32,
    gold: u64,
    kills: u32,
    leaks: u32,
}

impl Ledger {
    /// Creates a ledger with the provided starting balances.
    #[must_use]
    pub const fn new(lives: u32, gold: u64) -> Self {
        Self {
            lives,
            gold,
            kills: 0,
            leaks: 0,
        }
    }

    /// Remaining lives.
    #[must_use]
    pub const fn lives(&self) -> u32 {
        self.lives
    }

    /// Current gold.
    #[must_use]
    pub const fn gold(&self) -> u64 {
        self.gold
    }

    /// Enemies defeated so far.
    #[must_use]
    pub const fn kills(&self) -> u32 {
        self.kills
    }

    /// Enemies leaked so far.
    #[must_use]
    pub const fn leaks(&self) -> u32 {
        self.leaks
    }

    /// Deducts lives for a leak, stopping at zero. Returns the lives removed.
    pub fn record_leak(&mut self, cost: u32) -> u32 {
        let lost = cost.min(self.lives);
        self.lives -= lost;
        self.leaks = self.leaks.saturating_add(1);
        lost
    }

    /// Credits the reward of a defeated enemy.
    pub fn record_kill(&mut self, reward: u32) {
        self.gold = self.gold.saturating_add(u64::from(reward));
        self.kills = self.kills.saturating_add(1);
    }
}
