mod meal;

pub use meal::{coerce_amount, MealEntry, MealRecord, DATE_FORMAT, TIME_FORMAT};
