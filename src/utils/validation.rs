use crate::models::airplane::SeatLayout;
use crate::utils::error::{AppError, AppResult, FieldErrors};

/// Checks a (row, seat) pair against the airplane grid, 1-indexed and
/// inclusive. Each attribute out of range gets its own field error naming
/// the valid range.
pub fn validate_seat_and_row(row: i32, seat: i32, layout: Option<SeatLayout>) -> AppResult<()> {
    let Some(layout) = layout else {
        return Err(AppError::field(
            "flight",
            "The flight has no airplane assigned, so no seats can be booked.",
        ));
    };

    let attrs = [
        (row, "row", layout.rows),
        (seat, "seat", layout.seats_in_row),
    ];

    let mut errors = FieldErrors::new();
    for (value, name, upper) in attrs {
        if !(1..=upper).contains(&value) {
            errors.insert(
                name.to_string(),
                vec![format!(
                    "{} must be in available range: (1, {})",
                    capitalize(name),
                    upper
                )],
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::ValidationError(errors))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
