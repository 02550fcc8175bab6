//! Derivation of a ticket's overall odd and status from its pronostics.
//!
//! Nothing computed here is persisted: callers run the aggregation every time
//! a ticket is read so the result always reflects the current pronostics.

use model::entities::pronostic::{self, PronosticStatus};
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{error, trace};

use crate::error::{ComputeError, Result};

/// Number of decimal places kept on the aggregate odd.
pub const ODD_SCALE: u32 = 2;

/// Overall odd and status of a ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketAggregate {
    pub odd: Decimal,
    pub status: PronosticStatus,
}

impl Default for TicketAggregate {
    /// The aggregate of a ticket with nothing to settle.
    fn default() -> Self {
        Self {
            odd: Decimal::new(100, ODD_SCALE),
            status: PronosticStatus::Win,
        }
    }
}

/// Aggregates the pronostics of a single ticket.
pub fn aggregate(pronostics: &[pronostic::Model]) -> Result<TicketAggregate> {
    aggregate_legs(pronostics.iter().map(|p| (p.status, p.odd)))
}

/// Aggregates `(status, odd)` legs.
///
/// Canceled legs are ignored altogether. The odd is the product of the
/// remaining odds rounded half away from zero to [`ODD_SCALE`] places. The
/// status starts at win; a lost leg makes the ticket lost whatever else it
/// holds, otherwise any leg still in progress keeps the ticket in progress.
pub fn aggregate_legs<I>(legs: I) -> Result<TicketAggregate>
where
    I: IntoIterator<Item = (PronosticStatus, Decimal)>,
{
    let mut odd = Decimal::ONE;
    let mut status = PronosticStatus::Win;
    let mut counted = 0usize;

    for (leg_status, leg_odd) in legs {
        if leg_status == PronosticStatus::Canceled {
            continue;
        }
        counted += 1;

        odd = odd.checked_mul(leg_odd).ok_or_else(|| {
            let err = ComputeError::OddOverflow { legs: counted };
            error!(?err, %leg_odd, "Ticket odd overflowed");
            err
        })?;

        status = match (status, leg_status) {
            (PronosticStatus::Lose, _) | (_, PronosticStatus::Lose) => PronosticStatus::Lose,
            (PronosticStatus::InProgress, _) | (_, PronosticStatus::InProgress) => {
                PronosticStatus::InProgress
            }
            _ => status,
        };
    }

    // rescale keeps "1.00" rather than "1" for an untouched product
    let mut odd = odd.round_dp_with_strategy(ODD_SCALE, RoundingStrategy::MidpointAwayFromZero);
    odd.rescale(ODD_SCALE);
    trace!(%odd, ?status, counted, "Aggregated ticket");
    Ok(TicketAggregate { odd, status })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn leg(status: PronosticStatus, odd: &str) -> pronostic::Model {
        let at = Utc.with_ymd_and_hms(2024, 4, 6, 21, 0, 0).unwrap();
        pronostic::Model {
            id: 1,
            ticket_id: 1,
            sport_id: 1,
            competition_id: 1,
            first_team: "Real Madrid".to_string(),
            second_team: "Barcelona".to_string(),
            pronostic: "Real Madrid wins".to_string(),
            odd: dec(odd),
            status,
            event_date: at,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_empty_ticket_is_won_at_even_odd() {
        let aggregate = aggregate(&[]).unwrap();
        assert_eq!(aggregate, TicketAggregate::default());
        assert_eq!(aggregate.odd.to_string(), "1.00");
        assert_eq!(aggregate.status, PronosticStatus::Win);
    }

    #[test]
    fn test_odd_is_product_of_non_canceled_legs() {
        let legs = vec![
            leg(PronosticStatus::Win, "1.85"),
            leg(PronosticStatus::Canceled, "3.40"),
            leg(PronosticStatus::Win, "2.10"),
        ];
        let aggregate = aggregate(&legs).unwrap();
        // 1.85 * 2.10 = 3.885
        assert_eq!(aggregate.odd, dec("3.89"));
        assert_eq!(aggregate.status, PronosticStatus::Win);
    }

    #[test]
    fn test_odd_rounds_half_away_from_zero() {
        // 1.5 * 1.5 * 1.5 = 3.375
        let a = aggregate_legs([
            (PronosticStatus::Win, dec("1.5")),
            (PronosticStatus::Win, dec("1.5")),
            (PronosticStatus::Win, dec("1.5")),
        ])
        .unwrap();
        assert_eq!(a.odd, dec("3.38"));

        // 1.25 * 1.01 = 1.2625 stays below the midpoint
        let b = aggregate_legs([
            (PronosticStatus::Win, dec("1.25")),
            (PronosticStatus::Win, dec("1.01")),
        ])
        .unwrap();
        assert_eq!(b.odd, dec("1.26"));

        // 1.005 alone sits exactly on the midpoint
        let c = aggregate_legs([(PronosticStatus::InProgress, dec("1.005"))]).unwrap();
        assert_eq!(c.odd, dec("1.01"));
        assert_eq!(c.odd.to_string(), "1.01");
    }

    #[test]
    fn test_lose_takes_precedence_over_everything() {
        for others in [
            vec![PronosticStatus::Win, PronosticStatus::InProgress],
            vec![PronosticStatus::InProgress, PronosticStatus::InProgress],
            vec![PronosticStatus::Win, PronosticStatus::Canceled],
        ] {
            let mut legs: Vec<_> = others.into_iter().map(|s| (s, dec("1.50"))).collect();
            legs.insert(1, (PronosticStatus::Lose, dec("2.00")));
            assert_eq!(aggregate_legs(legs).unwrap().status, PronosticStatus::Lose);
        }

        // Order of the legs does not matter
        let late_loss = aggregate_legs([
            (PronosticStatus::InProgress, dec("1.30")),
            (PronosticStatus::Win, dec("1.30")),
            (PronosticStatus::Lose, dec("1.30")),
        ])
        .unwrap();
        assert_eq!(late_loss.status, PronosticStatus::Lose);
    }

    #[test]
    fn test_in_progress_without_loss() {
        let a = aggregate_legs([
            (PronosticStatus::Win, dec("1.40")),
            (PronosticStatus::InProgress, dec("1.60")),
            (PronosticStatus::Canceled, dec("9.00")),
        ])
        .unwrap();
        assert_eq!(a.status, PronosticStatus::InProgress);
        assert_eq!(a.odd, dec("2.24"));
    }

    #[test]
    fn test_canceled_legs_do_not_affect_status() {
        let a = aggregate_legs([
            (PronosticStatus::Canceled, dec("1.70")),
            (PronosticStatus::Canceled, dec("2.70")),
        ])
        .unwrap();
        assert_eq!(a, TicketAggregate::default());
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = aggregate_legs([
            (PronosticStatus::Win, Decimal::MAX),
            (PronosticStatus::Win, dec("2")),
        ])
        .unwrap_err();
        assert_eq!(err, ComputeError::OddOverflow { legs: 2 });
    }
}
