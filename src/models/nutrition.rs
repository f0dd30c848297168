//! Shared nutrition data structure
//!
//! Used by food records, daily totals, and history points.

use serde::{Deserialize, Serialize};

/// Macronutrient amounts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Nutrition {
    pub calories: f64,
    pub protein_grams: f64,
    pub carbs_grams: f64,
    pub fat_grams: f64,
}

/// Sum of the records logged on one day. Derived on demand, never stored.
pub type DailyTotals = Nutrition;

impl Nutrition {
    /// Create a new Nutrition with all zeros
    pub fn zero() -> Self {
        Self::default()
    }

    /// Add another nutrition to this one
    pub fn add(&self, other: &Nutrition) -> Self {
        Self {
            calories: self.calories + other.calories,
            protein_grams: self.protein_grams + other.protein_grams,
            carbs_grams: self.carbs_grams + other.carbs_grams,
            fat_grams: self.fat_grams + other.fat_grams,
        }
    }

    /// Calories to whole numbers, grams to one decimal place
    pub fn rounded_for_display(&self) -> Self {
        use crate::nutrition::aggregator::round_display;

        Self {
            calories: round_display(self.calories, 0),
            protein_grams: round_display(self.protein_grams, 1),
            carbs_grams: round_display(self.carbs_grams, 1),
            fat_grams: round_display(self.fat_grams, 1),
        }
    }
}

impl std::ops::Add for Nutrition {
    type Output = Nutrition;

    fn add(self, other: Nutrition) -> Nutrition {
        Nutrition::add(&self, &other)
    }
}

impl std::iter::Sum for Nutrition {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Nutrition::zero(), |acc, n| acc + n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let total: Nutrition = Vec::<Nutrition>::new().into_iter().sum();
        assert_eq!(total, Nutrition::zero());
    }

    #[test]
    fn test_rounded_for_display() {
        let n = Nutrition {
            calories: 512.5,
            protein_grams: 12.34,
            carbs_grams: 40.05,
            fat_grams: 9.96,
        };
        let r = n.rounded_for_display();
        assert_eq!(r.calories, 513.0);
        assert_eq!(r.protein_grams, 12.3);
        assert_eq!(r.fat_grams, 10.0);
    }
}
