use std::collections::BTreeMap;

use crate::domain::arena::SortArena;
use crate::domain::ticket::{RecipientId, TicketHandle};

/// Spreads each recipient's tickets across distinct periods where that is
/// free or cheap (§4.5). Processes `tickets` grouped by recipient, within a
/// recipient ordered most-constrained (`numAvailable`) first.
pub fn distribute(arena: &mut SortArena, tickets: &[TicketHandle], enforce_distribution: bool) {
    let mut period_distribution = [0usize; 4];
    let mut order: Vec<RecipientId> = Vec::new();
    let mut by_recipient: BTreeMap<RecipientId, Vec<TicketHandle>> = BTreeMap::new();

    for &handle in tickets {
        let recipient = arena.ticket(handle).recipient.clone();
        by_recipient.entry(recipient.clone()).or_insert_with(Vec::new).push(handle);
        if !order.contains(&recipient) {
            order.push(recipient);
        }
    }

    for recipient in order {
        let mut person_tickets = by_recipient.remove(&recipient).unwrap_or_default();
        person_tickets.sort_by_key(|&h| arena.ticket(h).num_available());
        let num_tickets = person_tickets.len();
        let mut per_recipient_uses = [0usize; 4];

        for &h in &person_tickets {
            if let Some(p) = arena.ticket(h).chosen_period() {
                per_recipient_uses[(p - 1) as usize] += 1;
            }
        }

        for &handle in &person_tickets {
            if arena.ticket(handle).is_locked() {
                continue;
            }
            let num_available = arena.ticket(handle).num_available();
            let should_distribute =
                enforce_distribution || (num_available > 1 && num_tickets >= num_available as usize);
            if should_distribute {
                choose_emptiest_period(arena, handle, &mut per_recipient_uses, &mut period_distribution);
            }
        }
    }
}

fn choose_emptiest_period(
    arena: &mut SortArena,
    ticket: TicketHandle,
    per_recipient_uses: &mut [usize; 4],
    period_distribution: &mut [usize; 4],
) {
    let available = arena.ticket(ticket).available_periods();
    let chosen = *available
        .iter()
        .min_by_key(|&&p| (per_recipient_uses[(p - 1) as usize], period_distribution[(p - 1) as usize], p))
        .expect("unlocked ticket always has at least one available period");

    arena.lock_ticket_to_period(ticket, chosen);
    per_recipient_uses[(chosen - 1) as usize] += 1;
    period_distribution[(chosen - 1) as usize] += 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::RawTicket;
    use crate::domain::item_type::ItemType;
    use crate::domain::ticket::TicketId;

    fn serenade(id: &str, recipient: &str, rooms: [&str; 4]) -> RawTicket {
        RawTicket {
            id: TicketId::new(id),
            recipient: RecipientId::new(recipient),
            item_type: ItemType::Serenade,
            rooms: rooms.map(|s| s.to_string()),
            ss_period: None,
        }
    }

    #[test]
    fn two_serenades_for_same_recipient_land_in_distinct_periods() {
        let mut arena = SortArena::new();
        let a = arena
            .add_ticket(serenade("T1", "R1", ["F101", "F202", "F303", "F404"]))
            .unwrap();
        let b = arena
            .add_ticket(serenade("T2", "R1", ["F101", "F202", "F303", "F404"]))
            .unwrap();
        distribute(&mut arena, &[a, b], true);
        assert_ne!(arena.ticket(a).chosen_period(), arena.ticket(b).chosen_period());
    }

    #[test]
    fn disabled_distribution_leaves_a_single_free_ticket_unlocked() {
        let mut arena = SortArena::new();
        let a = arena
            .add_ticket(serenade("T1", "R1", ["F101", "F202", "F303", "F404"]))
            .unwrap();
        distribute(&mut arena, &[a], false);
        assert!(!arena.ticket(a).is_locked());
    }
}
