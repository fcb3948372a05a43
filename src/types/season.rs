//! Defines the `Season` enum and the month-based season classifier used to tag
//! every weather record.

use chrono::Datelike;
use std::fmt;

/// Meteorological season of a calendar date.
///
/// The mapping is month based and always uses northern-hemisphere seasons,
/// whatever the location of the city the date belongs to.
///
/// | Months     | Season   |
/// |------------|----------|
/// | 12, 1, 2   | Winter   |
/// | 3, 4, 5    | Spring   |
/// | 6, 7, 8    | Summer   |
/// | 9, 10, 11  | Autumn   |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    /// December, January and February.
    Winter,
    /// March, April and May.
    Spring,
    /// June, July and August.
    Summer,
    /// September, October and November.
    Autumn,
}

impl Season {
    /// All seasons in calendar order, starting with winter.
    pub const ALL: [Season; 4] = [
        Season::Winter,
        Season::Spring,
        Season::Summer,
        Season::Autumn,
    ];

    /// Classifies any date-like value into its season.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use disaster_gold::Season;
    ///
    /// let date = NaiveDate::from_ymd_opt(2020, 1, 15).unwrap();
    /// assert_eq!(Season::of(&date), Season::Winter);
    /// ```
    pub fn of(date: &impl Datelike) -> Season {
        Season::from_month(date.month())
    }

    /// Classifies a month number (1-12). Values outside that range fall
    /// through to autumn, so the function is total.
    pub fn from_month(month: u32) -> Season {
        match month {
            12 | 1 | 2 => Season::Winter,
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            _ => Season::Autumn,
        }
    }

    /// The label written into the `season` column of gold tables.
    pub fn label(&self) -> &'static str {
        match self {
            Season::Winter => "Winter",
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Autumn => "Autumn",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_every_month_maps_to_one_season() {
        let expected = [
            (1, Season::Winter),
            (2, Season::Winter),
            (3, Season::Spring),
            (4, Season::Spring),
            (5, Season::Spring),
            (6, Season::Summer),
            (7, Season::Summer),
            (8, Season::Summer),
            (9, Season::Autumn),
            (10, Season::Autumn),
            (11, Season::Autumn),
            (12, Season::Winter),
        ];
        for (month, season) in expected {
            assert_eq!(Season::from_month(month), season, "month {}", month);
            assert!(Season::ALL.contains(&Season::from_month(month)));
        }
    }

    #[test]
    fn test_of_uses_the_month_of_the_date() {
        let leap_day = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let solstice = NaiveDate::from_ymd_opt(2021, 6, 21).unwrap();
        let new_year_eve = NaiveDate::from_ymd_opt(1999, 12, 31).unwrap();

        assert_eq!(Season::of(&leap_day), Season::Winter);
        assert_eq!(Season::of(&solstice), Season::Summer);
        assert_eq!(Season::of(&new_year_eve), Season::Winter);
    }

    #[test]
    fn test_display_matches_label() {
        for season in Season::ALL {
            assert_eq!(season.to_string(), season.label());
        }
        assert_eq!(Season::Autumn.to_string(), "Autumn");
    }
}
