use insights_common::filter::{CustomerFilter, FilterBounds};

pub const SPEND_STEP: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Segments,
    OrdersMin,
    OrdersMax,
    SpendMin,
    SpendMax,
}

impl FilterField {
    const ORDER: [FilterField; 5] = [
        FilterField::Segments,
        FilterField::OrdersMin,
        FilterField::OrdersMax,
        FilterField::SpendMin,
        FilterField::SpendMax,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    fn previous(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Keyboard-driven editing of a [`CustomerFilter`] within its [`FilterBounds`].
#[derive(Debug, Clone)]
pub struct FilterEditor {
    filter: CustomerFilter,
    bounds: FilterBounds,
    field: FilterField,
    segment_cursor: usize,
}

impl FilterEditor {
    pub fn new(bounds: FilterBounds) -> Self {
        Self {
            filter: CustomerFilter::defaults(&bounds),
            bounds,
            field: FilterField::Segments,
            segment_cursor: 0,
        }
    }

    pub fn filter(&self) -> &CustomerFilter {
        &self.filter
    }

    pub fn bounds(&self) -> &FilterBounds {
        &self.bounds
    }

    pub fn field(&self) -> FilterField {
        self.field
    }

    pub fn segment_cursor(&self) -> usize {
        self.segment_cursor
    }

    pub fn next_field(&mut self) {
        self.field = self.field.next();
    }

    pub fn previous_field(&mut self) {
        self.field = self.field.previous();
    }

    /// Moves the segment cursor or nudges the focused bound. Returns whether the filter changed.
    pub fn adjust(&mut self, steps: i64) -> bool {
        let before = self.filter.clone();
        let orders = &self.bounds.orders;
        let spend = &self.bounds.spend;
        match self.field {
            FilterField::Segments => {
                let count = self.bounds.segments.len();
                if count > 0 {
                    let cursor = self.segment_cursor as i64 + steps;
                    self.segment_cursor = cursor.rem_euclid(count as i64) as usize;
                }
            }
            FilterField::OrdersMin => {
                let (min, max) = (*self.filter.orders.start(), *self.filter.orders.end());
                let min = step_u32(min, steps).clamp(*orders.start(), max);
                self.filter.orders = min..=max;
            }
            FilterField::OrdersMax => {
                let (min, max) = (*self.filter.orders.start(), *self.filter.orders.end());
                let max = step_u32(max, steps).clamp(min, *orders.end());
                self.filter.orders = min..=max;
            }
            FilterField::SpendMin => {
                let (min, max) = (*self.filter.spend.start(), *self.filter.spend.end());
                let min = (min + steps as f64 * SPEND_STEP).clamp(*spend.start(), max);
                self.filter.spend = min..=max;
            }
            FilterField::SpendMax => {
                let (min, max) = (*self.filter.spend.start(), *self.filter.spend.end());
                let max = (max + steps as f64 * SPEND_STEP).clamp(min, *spend.end());
                self.filter.spend = min..=max;
            }
        }
        self.filter != before
    }

    /// Flips the segment under the cursor. Only acts while the segment field is focused.
    pub fn toggle_segment(&mut self) -> bool {
        if self.field != FilterField::Segments {
            return false;
        }
        let Some(segment) = self.bounds.segments.get(self.segment_cursor) else {
            return false;
        };
        if !self.filter.segments.remove(segment) {
            self.filter.segments.insert(segment.clone());
        }
        true
    }

    pub fn reset(&mut self) -> bool {
        let defaults = CustomerFilter::defaults(&self.bounds);
        if self.filter == defaults {
            return false;
        }
        self.filter = defaults;
        true
    }
}

fn step_u32(value: u32, steps: i64) -> u32 {
    (i64::from(value) + steps).clamp(0, i64::from(u32::MAX)) as u32
}
