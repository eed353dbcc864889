use crate::domain::arena::SortArena;
use crate::domain::item_type::ItemType;
use crate::domain::ticket::TicketHandle;

/// Pins every special serenade to its requested period, then (when enabled)
/// isolates it from regular serenades sharing the same room (§4.4).
pub fn lock_special_serenades(arena: &mut SortArena, serenades: &[TicketHandle], extra_special: bool) {
    let special: Vec<TicketHandle> = serenades
        .iter()
        .copied()
        .filter(|&h| arena.ticket(h).item_type == ItemType::SpecialSerenade)
        .collect();

    for &handle in &special {
        let period = arena
            .ticket(handle)
            .ss_period
            .expect("special serenades are validated to carry ssPeriod at intake");
        arena.lock_ticket_to_period(handle, period);
    }

    if !extra_special {
        return;
    }

    for &handle in &special {
        isolate_special_serenade(arena, handle);
    }
}

fn isolate_special_serenade(arena: &mut SortArena, special: TicketHandle) {
    let period = arena
        .ticket(special)
        .chosen_period()
        .expect("special serenade is locked by this point");
    let classroom = arena
        .ticket(special)
        .candidate(period)
        .expect("locked ticket retains its chosen candidate");

    let occupants: Vec<TicketHandle> = arena
        .classroom(classroom)
        .tickets
        .iter()
        .copied()
        .filter(|&t| t != special)
        .collect();

    for other in occupants {
        let other_ticket = arena.ticket(other);
        if other_ticket.item_type != ItemType::Serenade {
            continue;
        }

        if other_ticket.num_available() > 1 {
            arena.evict_ticket_from_period(other, period);
        } else if other_ticket.chosen_period() == Some(period) {
            let clean_name = arena.classroom(classroom).clean_name.clone();
            let original_name = arena.classroom(classroom).original_name.clone();
            let duplicate = arena.intern_special_duplicate(period, &clean_name, &original_name);
            arena.relocate_ticket(special, classroom, duplicate, period);
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::RawTicket;
    use crate::domain::ticket::{RecipientId, TicketId};

    fn ticket(id: &str, recipient: &str, item_type: ItemType, room: &str, ss_period: Option<u8>) -> RawTicket {
        RawTicket {
            id: TicketId::new(id),
            recipient: RecipientId::new(recipient),
            item_type,
            rooms: [room.to_string(), room.to_string(), room.to_string(), room.to_string()],
            ss_period,
        }
    }

    #[test]
    fn special_serenade_locks_to_its_period() {
        let mut arena = SortArena::new();
        let t = arena
            .add_ticket(ticket("T1", "R1", ItemType::SpecialSerenade, "F101", Some(3)))
            .unwrap();
        lock_special_serenades(&mut arena, &[t], false);
        assert_eq!(arena.ticket(t).chosen_period(), Some(3));
    }

    #[test]
    fn evicts_unlocked_regular_serenade_sharing_the_room() {
        let mut arena = SortArena::new();
        let ss = arena
            .add_ticket(ticket("T1", "R1", ItemType::SpecialSerenade, "F101", Some(2)))
            .unwrap();
        let reg = arena
            .add_ticket(ticket("T2", "R2", ItemType::Serenade, "F101", None))
            .unwrap();
        lock_special_serenades(&mut arena, &[ss, reg], true);
        assert!(!arena.ticket(reg).is_available(2));
    }

    #[test]
    fn duplicates_room_when_regular_serenade_already_locked_there() {
        let mut arena = SortArena::new();
        let ss = arena
            .add_ticket(ticket("T1", "R1", ItemType::SpecialSerenade, "F101", Some(2)))
            .unwrap();
        let reg = arena
            .add_ticket(ticket("T2", "R2", ItemType::Serenade, "F101", None))
            .unwrap();
        arena.lock_ticket_to_period(reg, 2);
        lock_special_serenades(&mut arena, &[ss, reg], true);

        let ss_classroom = arena.ticket(ss).candidate(2).unwrap();
        let reg_classroom = arena.ticket(reg).candidate(2).unwrap();
        assert_ne!(ss_classroom, reg_classroom);
        assert!(arena.classroom(ss_classroom).special);
    }
}
