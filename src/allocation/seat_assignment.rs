//! Seat assignment.
//!
//! Maps the office group onto concrete seats. Seats are taken in
//! (floor, label) order and handed out positionally: the i-th employee gets
//! the i-th seat. Every run reassigns from scratch; there is no sticky seat
//! preference.

use crate::error::{EngineError, EngineResult};
use crate::models::{Seat, SeatAssignment, SeatMutation};

use super::partition::RankedEmployee;

/// Returns the seats in allocation order: floor ascending, then label.
pub fn order_seats(seats: &[Seat]) -> Vec<Seat> {
    let mut ordered = seats.to_vec();
    ordered.sort_by(|a, b| a.allocation_order(b));
    ordered
}

/// Pairs the office group with seats.
///
/// # Errors
///
/// Returns `Configuration` if there are more office employees than seats.
/// The partitioner bounds the office group, so this only fires when the
/// two are called with inconsistent inputs.
///
/// # Examples
///
/// ```
/// use seat_allocator::allocation::assign_seats;
///
/// let pairs = assign_seats(&[], &[]).unwrap();
/// assert!(pairs.is_empty());
/// ```
pub fn assign_seats(
    office: &[RankedEmployee],
    seats: &[Seat],
) -> EngineResult<Vec<SeatAssignment>> {
    if office.len() > seats.len() {
        return Err(EngineError::configuration(format!(
            "office group of {} does not fit {} seat(s)",
            office.len(),
            seats.len()
        )));
    }

    let ordered = order_seats(seats);

    Ok(office
        .iter()
        .zip(ordered.iter())
        .map(|(ranked, seat)| SeatAssignment {
            employee_id: ranked.employee.id.clone(),
            employee_name: ranked.employee.name.clone(),
            seat_id: seat.id.clone(),
            seat_label: seat.seat_label.clone(),
            floor_number: seat.floor_number,
        })
        .collect())
}

/// Mutations that empty every occupied seat of the branch.
///
/// `seats` must be freshly loaded; a seat that reads as empty is skipped.
pub fn clear_mutations(seats: &[Seat]) -> Vec<SeatMutation> {
    order_seats(seats)
        .into_iter()
        .filter(Seat::is_assigned)
        .map(|seat| SeatMutation::clear(seat.id))
        .collect()
}

/// Mutations that write the planned assignments.
pub fn assignment_mutations(assignments: &[SeatAssignment]) -> Vec<SeatMutation> {
    assignments
        .iter()
        .map(|a| SeatMutation::assign(a.seat_id.clone(), a.employee_id.clone()))
        .collect()
}
