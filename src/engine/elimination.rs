use crate::domain::arena::SortArena;
use crate::domain::classroom::ClassroomHandle;
use crate::domain::classroom::ClassroomValidity;
use crate::domain::ticket::{Ticket, TicketHandle};

/// Reduces every candidate classroom to locked status: either every ticket
/// inside it stays, or none do (§4.6). Returns the classrooms that survived
/// (the must-keep ones); destroyed classrooms end up empty and are dropped.
pub fn eliminate(
    arena: &mut SortArena,
    mut candidates: Vec<ClassroomHandle>,
    serenade_only_pass: bool,
    max_serenades_per_class: usize,
    max_non_serenades_per_serenading_class: usize,
) -> Vec<ClassroomHandle> {
    let mut eliminated_per_period = [0usize; 4];
    let mut survivors = Vec::new();

    loop {
        candidates.retain(|&h| !arena.classroom(h).tickets.is_empty());
        if candidates.is_empty() {
            break;
        }

        let period = match (1..=4u8)
            .filter(|&p| candidates.iter().any(|&h| arena.classroom(h).period == p))
            .min_by_key(|&p| (eliminated_per_period[(p - 1) as usize], p))
        {
            Some(p) => p,
            None => break,
        };

        let chosen = *candidates
            .iter()
            .filter(|&&h| arena.classroom(h).period == period)
            .min_by(|&&a, &&b| {
                elimination_rank(arena, a, serenade_only_pass)
                    .cmp(&elimination_rank(arena, b, serenade_only_pass))
                    .then_with(|| arena.classroom(a).tickets.len().cmp(&arena.classroom(b).tickets.len()))
                    .then_with(|| arena.classroom(a).clean_name.cmp(&arena.classroom(b).clean_name))
            })
            .expect("period was chosen because it has at least one candidate classroom");

        candidates.retain(|&h| h != chosen);

        let bad_forced_destroy = !serenade_only_pass
            && arena.classroom(chosen).validity == ClassroomValidity::Bad
            && !pinned_by_special_serenade(arena, chosen);

        let must_keep = !bad_forced_destroy
            && arena.classroom(chosen).tickets.iter().any(|&t| arena.ticket(t).is_locked());

        if must_keep {
            if serenade_only_pass {
                if max_serenades_per_class > 0 {
                    enforce_cap(arena, chosen, period, max_serenades_per_class, |t| t.item_type.is_serenade());
                }
            } else if classroom_has_serenade(arena, chosen) && max_non_serenades_per_serenading_class > 0 {
                enforce_cap(arena, chosen, period, max_non_serenades_per_serenading_class, |t| {
                    t.item_type.is_non_serenade()
                });
            }

            let remaining: Vec<TicketHandle> = arena.classroom(chosen).tickets.clone();
            for ticket in remaining {
                arena.lock_ticket_to_period(ticket, period);
            }
            survivors.push(chosen);
        } else {
            let removed: Vec<TicketHandle> = arena.classroom(chosen).tickets.clone();
            for &ticket in &removed {
                arena.evict_ticket_from_period(ticket, period);
            }
            eliminated_per_period[(period - 1) as usize] += removed.len();
        }
    }

    survivors
}

fn elimination_rank(arena: &SortArena, handle: ClassroomHandle, serenade_only_pass: bool) -> u8 {
    if serenade_only_pass || !classroom_has_serenade(arena, handle) {
        0
    } else {
        1
    }
}

fn classroom_has_serenade(arena: &SortArena, handle: ClassroomHandle) -> bool {
    arena
        .classroom(handle)
        .tickets
        .iter()
        .any(|&t| arena.ticket(t).item_type.is_serenade())
}

fn pinned_by_special_serenade(arena: &SortArena, handle: ClassroomHandle) -> bool {
    use crate::domain::item_type::ItemType;
    arena
        .classroom(handle)
        .tickets
        .iter()
        .any(|&t| arena.ticket(t).item_type == ItemType::SpecialSerenade)
}

fn enforce_cap(
    arena: &mut SortArena,
    classroom: ClassroomHandle,
    period: u8,
    cap: usize,
    matches: impl Fn(&Ticket) -> bool,
) {
    loop {
        let qualifying = arena
            .classroom(classroom)
            .tickets
            .iter()
            .filter(|&&t| matches(arena.ticket(t)))
            .count();
        if qualifying <= cap {
            break;
        }
        let evictable = arena
            .classroom(classroom)
            .tickets
            .iter()
            .copied()
            .filter(|&t| matches(arena.ticket(t)) && arena.ticket(t).num_available() > 1)
            .max_by_key(|&t| arena.ticket(t).num_available());
        match evictable {
            Some(t) => arena.evict_ticket_from_period(t, period),
            None => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::RawTicket;
    use crate::domain::item_type::ItemType;
    use crate::domain::ticket::{RecipientId, TicketId};

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
    fn single_ticket_ends_up_locked_to_some_classroom() {
        let mut arena = SortArena::new();
        let t = arena
            .add_ticket(serenade("T1", "R1", ["F101", "F202", "F303", "F404"]))
            .unwrap();
        let handles = arena.all_classroom_handles();
        eliminate(&mut arena, handles, true, 0, 0);
        assert!(arena.ticket(t).is_locked());
    }

    #[test]
    fn max_serenades_per_class_is_enforced_when_tickets_have_other_options() {
        let mut arena = SortArena::new();
        for i in 0..3 {
            arena
                .add_ticket(serenade(&format!("T{i}"), &format!("R{i}"), ["F101", "F202", "F303", "F404"]))
                .unwrap();
        }
        let handles = arena.all_classroom_handles();
        let survivors = eliminate(&mut arena, handles, true, 2, 0);
        for &c in &survivors {
            assert!(arena.classroom(c).tickets.len() <= 2);
        }
    }

    #[test]
    fn bad_classroom_without_special_serenade_is_destroyed_in_full_pass() {
        let mut arena = SortArena::new();
        let t = arena
            .add_ticket(serenade("T1", "R1", ["F101", "F202", "POOL", "F404"]))
            .unwrap();
        arena.lock_ticket_to_period(t, 3);
        let handles = arena.all_classroom_handles();
        let survivors = eliminate(&mut arena, handles, false, 0, 0);
        assert!(survivors.is_empty());
    }
}
