//! [`DaySchedule`] definitions.

use common::{daytime::Weekday, DayTime, Moment};

/// Single weekday's operating hours of an office.
#[derive(Clone, Copy, Debug)]
pub struct DaySchedule {
    /// Day of the week this schedule applies to.
    pub day: Weekday,

    /// Indicator whether the office opens on this day at all.
    pub is_active: bool,

    /// Time the office opens at.
    pub opens_at: DayTime,

    /// Time the office closes at.
    ///
    /// Not later than [`opens_at`] means the window wraps past midnight.
    ///
    /// [`opens_at`]: DaySchedule::opens_at
    pub closes_at: DayTime,

    /// Midday [`BreakTime`] of the office, if any.
    pub break_time: Option<BreakTime>,
}

impl DaySchedule {
    /// Checks whether the office is open at the provided time of this
    /// schedule's day.
    ///
    /// Equal [`opens_at`] and [`closes_at`] form a 24-hour window, so the
    /// office is open around the clock unless on a break.
    ///
    /// [`opens_at`]: DaySchedule::opens_at
    /// [`closes_at`]: DaySchedule::closes_at
    #[must_use]
    pub fn is_open_at(&self, now: DayTime) -> bool {
        if !self.is_active || !within(self.opens_at, self.closes_at, now) {
            return false;
        }
        !self.break_time.is_some_and(|b| within(b.from, b.to, now))
    }
}

/// Midday break of a [`DaySchedule`].
#[derive(Clone, Copy, Debug)]
pub struct BreakTime {
    /// Time the break starts at.
    pub from: DayTime,

    /// Time the break ends at.
    ///
    /// Not later than [`from`] means the break wraps past midnight.
    ///
    /// [`from`]: BreakTime::from
    pub to: DayTime,
}

/// Checks whether `now` falls into the window, wrapping past midnight when
/// `to` is not later than `from`.
fn within(from: DayTime, to: DayTime, now: DayTime) -> bool {
    if to > from {
        from <= now && now < to
    } else {
        now >= from || now < to
    }
}

/// Weekly set of [`DaySchedule`]s of an office.
#[derive(Clone, Debug, Default)]
pub struct WeekSchedule(Vec<DaySchedule>);

impl WeekSchedule {
    /// Creates a new [`WeekSchedule`] of the provided [`DaySchedule`]s.
    #[must_use]
    pub fn new(days: impl IntoIterator<Item = DaySchedule>) -> Self {
        Self(days.into_iter().collect())
    }

    /// Returns the [`DaySchedule`] of the provided day, if the office
    /// defines one.
    #[must_use]
    pub fn day(&self, day: Weekday) -> Option<&DaySchedule> {
        self.0.iter().find(|s| s.day == day)
    }

    /// Checks whether the office is open at the provided [`Moment`].
    ///
    /// No [`DaySchedule`] for the [`Moment`]'s day means closed.
    #[must_use]
    pub fn is_open_at(&self, at: Moment) -> bool {
        self.day(at.day).is_some_and(|d| d.is_open_at(at.time))
    }
}
