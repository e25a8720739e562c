use chrono::Datelike;

use super::*;

pub const DAYS_PER_WEEK: usize = 7;

/// Column (week) and row (day) of a sequence entry in the heatmap grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridPosition {
    pub week: usize,
    pub day: usize,
}

pub const fn grid_position(index: usize) -> GridPosition {
    GridPosition {
        week: index / DAYS_PER_WEEK,
        day: index % DAYS_PER_WEEK,
    }
}

pub const fn week_count(len: usize) -> usize {
    len.div_ceil(DAYS_PER_WEEK)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthLabel {
    pub week: usize,
    /// Zero-based month.
    pub month: u32,
    pub name: String,
}

impl ContributionSequence {
    pub fn positioned(&self) -> impl Iterator<Item = (GridPosition, &ContributionDay)> + '_ {
        self.iter()
            .enumerate()
            .map(|(index, day)| (grid_position(index), day))
    }

    pub fn week_count(&self) -> usize {
        week_count(self.len())
    }

    /// First column of every month. When two months start within the same
    /// column only the later one is labeled.
    pub fn month_labels(&self) -> Vec<MonthLabel> {
        let mut labels: Vec<MonthLabel> = Vec::new();
        for (position, day) in self.positioned() {
            let month = day.date.month0();
            if labels.last().is_some_and(|label| label.month == month) {
                continue;
            }
            let label = MonthLabel {
                week: position.week,
                month,
                name: MONTH_NAMES[month as usize].to_string(),
            };
            match labels.last_mut() {
                Some(last) if last.week == position.week => *last = label,
                _ => labels.push(label),
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn positions_cycle_through_days() {
        let positions: Vec<_> = (0..16).map(grid_position).collect();
        assert_eq!(positions[0], GridPosition { week: 0, day: 0 });
        assert_eq!(positions[6], GridPosition { week: 0, day: 6 });
        assert_eq!(positions[7], GridPosition { week: 1, day: 0 });
        assert_eq!(positions[15], GridPosition { week: 2, day: 1 });
    }

    #[test]
    fn weeks_cover_sequence_without_gaps() {
        for len in [1, 6, 7, 8, 364, 365, 366] {
            let weeks: Vec<usize> = (0..len).map(|i| grid_position(i).week).collect();
            let mut distinct = weeks.clone();
            distinct.dedup();
            assert_eq!(distinct, (0..week_count(len)).collect::<Vec<_>>());
            assert!(weeks.windows(2).all(|pair| pair[0] <= pair[1]));
            let days: Vec<usize> = (0..len).map(|i| grid_position(i).day).collect();
            let cycle = [0, 1, 2, 3, 4, 5, 6];
            for chunk in days.chunks(DAYS_PER_WEEK) {
                assert_eq!(chunk, &cycle[..chunk.len()]);
            }
        }
        assert_eq!(week_count(0), 0);
        assert_eq!(week_count(365), 53);
    }

    #[test]
    fn month_labels_follow_month_starts() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let sequence = ContributionSequence::from_counts(start, [1; 70]).unwrap();
        let labels = sequence.month_labels();
        let names: Vec<_> = labels.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Jan", "Feb", "Mar"]);
        // Feb 1 is index 31, Mar 1 is index 60
        assert_eq!(labels[1].week, 4);
        assert_eq!(labels[2].week, 8);
    }

    #[test]
    fn month_starting_in_first_column_replaces_label() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 29).unwrap();
        let sequence = ContributionSequence::from_counts(start, [0; 14]).unwrap();
        let labels = sequence.month_labels();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].name, "Feb");
        assert_eq!(labels[0].week, 0);
    }
}
