use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::fmt;

/// MAP administration seasons, in school-year order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Fall,
    Winter,
    Spring,
}

impl Season {
    pub fn parse(word: &str) -> Option<Season> {
        if word.eq_ignore_ascii_case("fall") {
            Some(Season::Fall)
        } else if word.eq_ignore_ascii_case("winter") {
            Some(Season::Winter)
        } else if word.eq_ignore_ascii_case("spring") {
            Some(Season::Spring)
        } else {
            None
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            Season::Fall => "Fall",
            Season::Winter => "Winter",
            Season::Spring => "Spring",
        };
        f.write_str(word)
    }
}

/// A school year identified by its starting calendar year; `start: 2024`
/// displays as `2024-2025`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AcademicYear {
    pub start: i32,
}

impl AcademicYear {
    /// Strict `YYYY-YYYY` with the second year exactly one after the first.
    /// Shorthand like `2024-25` is rejected, as is a start year with no
    /// representable successor.
    pub fn parse(input: &str) -> Option<AcademicYear> {
        let (start, end) = input.trim().split_once('-')?;
        let start: i32 = start.parse().ok()?;
        let end: i32 = end.parse().ok()?;
        (start.checked_add(1) == Some(end)).then_some(AcademicYear { start })
    }

    /// The academic year a calendar date falls in. July 1 starts the new
    /// year, so June 2025 is still 2024-2025 while July 2025 is 2025-2026.
    pub fn for_date(date: NaiveDate) -> AcademicYear {
        if date.month() >= 7 {
            AcademicYear { start: date.year() }
        } else {
            AcademicYear {
                start: date.year() - 1,
            }
        }
    }

    pub fn current() -> AcademicYear {
        AcademicYear::for_date(chrono::Local::now().date_naive())
    }

    /// The school year after this one, if representable.
    pub fn next(self) -> Option<AcademicYear> {
        let start = self.start.checked_add(1)?;
        Some(AcademicYear { start })
    }
}

impl fmt::Display for AcademicYear {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Widened so the year after i32::MAX still formats.
        write!(f, "{}-{}", self.start, i64::from(self.start) + 1)
    }
}

impl Serialize for AcademicYear {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One MAP administration window, e.g. `Fall 2024-2025`. Ordering follows
/// the calendar: year first, then season within the year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Term {
    pub season: Season,
    pub year: AcademicYear,
}

impl Term {
    pub fn new(season: Season, year_start: i32) -> Term {
        Term {
            season,
            year: AcademicYear { start: year_start },
        }
    }

    /// `"Fall 2024-2025"` and nothing looser. Records carrying a term that
    /// does not parse are dropped from aggregation upstream, never fatal.
    pub fn parse(input: &str) -> Option<Term> {
        let (season_word, year_part) = input.trim().split_once(char::is_whitespace)?;
        let season = Season::parse(season_word)?;
        let year = AcademicYear::parse(year_part)?;
        Some(Term { season, year })
    }
}

impl PartialOrd for Term {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Term {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.year
            .cmp(&other.year)
            .then(self.season.cmp(&other.season))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.season, self.year)
    }
}

impl Serialize for Term {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthPeriodKind {
    /// Fall to Spring of the same school year.
    WithinYear,
    /// Fall to Fall of consecutive school years.
    YearOverYear,
    /// Spring to the following Fall. No published norm exists for this
    /// window; expected growth stays absent rather than defaulted.
    Summer,
}

impl GrowthPeriodKind {
    pub fn parse(input: &str) -> Option<GrowthPeriodKind> {
        let folded = input.trim().to_ascii_lowercase().replace('_', "-");
        match folded.as_str() {
            "within-year" => Some(GrowthPeriodKind::WithinYear),
            "year-over-year" => Some(GrowthPeriodKind::YearOverYear),
            "summer" => Some(GrowthPeriodKind::Summer),
            _ => None,
        }
    }

    pub fn has_official_norm(self) -> bool {
        !matches!(self, GrowthPeriodKind::Summer)
    }

    /// How many grades a student advances across the window.
    pub fn grade_increment(self) -> u8 {
        match self {
            GrowthPeriodKind::WithinYear => 0,
            GrowthPeriodKind::YearOverYear | GrowthPeriodKind::Summer => 1,
        }
    }
}

impl fmt::Display for GrowthPeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let word = match self {
            GrowthPeriodKind::WithinYear => "within-year",
            GrowthPeriodKind::YearOverYear => "year-over-year",
            GrowthPeriodKind::Summer => "summer",
        };
        f.write_str(word)
    }
}

/// A recognized pair of administrations with its classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrowthPeriod {
    pub from: Term,
    pub to: Term,
    pub kind: GrowthPeriodKind,
}

impl GrowthPeriod {
    /// Norm tables are keyed by the school year the period starts in.
    pub fn norm_year(&self) -> AcademicYear {
        self.from.year
    }

    pub fn ending_year(&self) -> AcademicYear {
        self.to.year
    }

    pub fn grade_increment(&self) -> u8 {
        self.kind.grade_increment()
    }
}

impl fmt::Display for GrowthPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.from, self.to)
    }
}

/// Classify a pair of administrations into one of the three recognized
/// growth windows. Winter administrations, multi-year gaps, and reversed
/// pairs are unrecognized and yield `None`; callers treat that as "nothing
/// to aggregate", not an error.
pub fn classify_growth_period(from: Term, to: Term) -> Option<GrowthPeriod> {
    let kind = match (from.season, to.season) {
        (Season::Fall, Season::Spring) if to.year == from.year => GrowthPeriodKind::WithinYear,
        (Season::Fall, Season::Fall) if from.year.next() == Some(to.year) => {
            GrowthPeriodKind::YearOverYear
        }
        (Season::Spring, Season::Fall) if from.year.next() == Some(to.year) => {
            GrowthPeriodKind::Summer
        }
        _ => return None,
    };
    Some(GrowthPeriod { from, to, kind })
}
