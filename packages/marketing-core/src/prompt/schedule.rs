//! Schedule-day generation (spec §4.4): start from `best_day_index`, place
//! additional days spaced by `floor(7 / recommended_posts_per_week)`,
//! wrapping modulo 7.

const WEEKDAYS: [&str; 7] = ["Sunday", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday"];

/// ISO weekday (1 = Monday .. 7 = Sunday) to a 0-based index into `WEEKDAYS`
/// (0 = Sunday .. 6 = Saturday).
fn iso_to_index(best_day_iso: u32) -> usize {
    (best_day_iso % 7) as usize
}

/// Generate `count` weekday names for one week, starting at `best_day_iso`
/// and spaced by `floor(7 / count)`, wrapping modulo 7.
pub fn schedule_days(best_day_iso: u32, count: u32) -> Vec<&'static str> {
    if count == 0 {
        return Vec::new();
    }
    let spacing = 7 / count;
    let start = iso_to_index(best_day_iso);

    (0..count)
        .map(|i| {
            let offset = (i * spacing) as usize;
            WEEKDAYS[(start + offset) % 7]
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_post_per_week_uses_best_day_only() {
        let days = schedule_days(1, 1);
        assert_eq!(days, vec!["Monday"]);
    }

    #[test]
    fn three_posts_per_week_spaced_by_two() {
        let days = schedule_days(1, 3);
        assert_eq!(days, vec!["Monday", "Wednesday", "Friday"]);
    }

    #[test]
    fn wraps_modulo_seven() {
        let days = schedule_days(6, 2);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0], "Saturday");
    }
}
