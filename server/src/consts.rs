pub const DEFAULT_TOP_STREAKS: usize = 5;
pub const MAX_TOP_STREAKS: usize = 100;

// Ten years of daily cells is plenty for a heatmap
pub const MAX_WINDOW_DAYS: u32 = 3660;
