//! Running totals carried from one statement period to the next

/// Periods in one annual bonus window
pub const PERIODS_PER_WINDOW: u32 = 12;

/// Accrual state at a point in the simulation
#[derive(Debug, Clone, Default)]
pub struct AccrualState {
    /// Current period (1-indexed, 0 before the first period)
    pub period_index: u32,

    /// Bonus window containing the current period (1-indexed)
    pub window: u32,

    /// Period within the bonus window (1-12)
    pub period_in_window: u32,

    /// Miles earned so far, bonuses included
    pub cumulative_miles: f64,

    /// THB spent so far
    pub cumulative_spend: f64,

    /// THB spent in the current bonus window
    pub year_to_date_spend: f64,
}

impl AccrualState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move to the next period
    pub fn advance_period(&mut self) {
        self.period_index += 1;
        self.window = (self.period_index - 1) / PERIODS_PER_WINDOW + 1;
        self.period_in_window = (self.period_index - 1) % PERIODS_PER_WINDOW + 1;
    }

    /// Book a period's spend and earn
    pub fn accrue(&mut self, spend: f64, miles: f64) {
        self.cumulative_miles += miles;
        self.cumulative_spend += spend;
        self.year_to_date_spend += spend;
    }

    /// Add bonus miles to the running balance
    pub fn post_bonus(&mut self, miles: f64) {
        self.cumulative_miles += miles;
    }

    /// Whether the current period is the last one in its bonus window
    pub fn closes_window(&self) -> bool {
        self.period_index > 0 && self.period_index % PERIODS_PER_WINDOW == 0
    }

    /// Reset the window spend once a window closes
    pub fn close_period(&mut self) {
        if self.closes_window() {
            self.year_to_date_spend = 0.0;
        }
    }
}
