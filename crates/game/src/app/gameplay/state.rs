#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GamePhase {
    Playing,
    Won,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GoalOutcome {
    NotReached,
    Won,
    MissingCoins,
}

/// Score and phase for one generated layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GameState {
    phase: GamePhase,
    total_coins: usize,
    collected_coins: usize,
}

impl GameState {
    pub(crate) fn new(total_coins: usize) -> Self {
        Self {
            phase: GamePhase::Playing,
            total_coins,
            collected_coins: 0,
        }
    }

    pub(crate) fn phase(&self) -> GamePhase {
        self.phase
    }

    pub(crate) fn total_coins(&self) -> usize {
        self.total_coins
    }

    pub(crate) fn collected_coins(&self) -> usize {
        self.collected_coins
    }

    pub(crate) fn all_coins_collected(&self) -> bool {
        self.collected_coins == self.total_coins
    }

    pub(crate) fn collect_coin(&mut self) {
        self.collected_coins = (self.collected_coins + 1).min(self.total_coins);
    }

    /// `Playing -> Won` happens at most once; later calls report `NotReached`.
    pub(crate) fn evaluate_goal(&mut self, on_win_platform: bool) -> GoalOutcome {
        if self.phase == GamePhase::Won || !on_win_platform {
            return GoalOutcome::NotReached;
        }
        if self.all_coins_collected() {
            self.phase = GamePhase::Won;
            GoalOutcome::Won
        } else {
            GoalOutcome::MissingCoins
        }
    }

    pub(crate) fn score_label(&self) -> String {
        format!("Coins: {}/{}", self.collected_coins, self.total_coins)
    }
}
