use chrono::Utc;

use crate::domain::arena::{RawTicket, SortArena};
use crate::domain::request::{DeliveryPlan, SortRequest};
use crate::domain::ticket::TicketHandle;
use crate::engine::{distribution, elimination, locker, partition};
use crate::error::{CupidError, Result};

/// Sorts a batch of tickets into a `DeliveryPlan` (§4.3, C8).
///
/// Runs a serenade-only pass first (C4 locking, C5 distribution, C6
/// elimination), then a full pass that extends the same classroom index
/// with non-serenade candidates before a second elimination and the final
/// partition into delivery groups.
pub fn sort(tickets: Vec<RawTicket>, request: SortRequest) -> Result<DeliveryPlan> {
    let mut arena = SortArena::new();
    let mut diagnostics = Vec::new();

    let mut serenade_handles = Vec::new();
    let mut non_serenade_raw = Vec::new();

    for raw in tickets {
        if raw.item_type.is_serenade() {
            match arena.add_ticket(raw) {
                Ok(handle) => serenade_handles.push(handle),
                Err(diagnostic) => diagnostics.push(diagnostic),
            }
        } else {
            non_serenade_raw.push(raw);
        }
    }

    locker::lock_special_serenades(&mut arena, &serenade_handles, request.extra_special_serenades);
    distribution::distribute(&mut arena, &serenade_handles, request.enforce_distribution);

    let serenade_classrooms = arena.all_classroom_handles();
    let _pass1_survivors = elimination::eliminate(
        &mut arena,
        serenade_classrooms,
        true,
        request.max_serenades_per_class,
        0,
    );

    verify_locked(&arena, &serenade_handles)?;

    let mut non_serenade_handles = Vec::new();
    for raw in non_serenade_raw {
        match arena.add_ticket(raw) {
            Ok(handle) => non_serenade_handles.push(handle),
            Err(diagnostic) => diagnostics.push(diagnostic),
        }
    }

    let all_classrooms = arena.all_classroom_handles();
    let full_survivors = elimination::eliminate(
        &mut arena,
        all_classrooms,
        false,
        0,
        request.max_non_serenades_per_serenading_class,
    );

    let mut all_tickets = serenade_handles;
    all_tickets.extend(non_serenade_handles);
    verify_locked(&arena, &all_tickets)?;

    let (serenading_groups, non_serenading_groups, mut capacity_diagnostics) = partition::partition(
        &arena,
        &full_survivors,
        request.num_serenading_groups,
        request.num_non_serenading_groups,
    );
    diagnostics.append(&mut capacity_diagnostics);

    Ok(DeliveryPlan {
        serenading_groups,
        non_serenading_groups,
        diagnostics,
        generated_at: Utc::now(),
    })
}

fn verify_locked(arena: &SortArena, tickets: &[TicketHandle]) -> Result<()> {
    for &handle in tickets {
        let ticket = arena.ticket(handle);
        if ticket.num_available() != 1 {
            return Err(CupidError::InvariantViolation {
                ticket: ticket.id.to_string(),
                detail: format!(
                    "expected ticket to be locked to exactly one classroom, found {} available",
                    ticket.num_available()
                ),
            });
        }
    }
    Ok(())
}
