use crate::domain::arena::SortArena;
use crate::domain::classroom::ClassroomHandle;
use crate::domain::item_type::ItemType;
use crate::domain::request::{Diagnostic, DeliveryGroup, PlannedClassroom, PlannedTicket};

/// Splits the surviving classrooms of one period into `k` geographically
/// contiguous, roughly-balanced groups (§4.7 steps 1-4). `k == 0` yields no
/// groups at all — the caller's `SortRequest` validation prevents this in
/// practice, but the helper stays total.
fn build_period_groups(arena: &SortArena, classrooms: &mut [ClassroomHandle], k: usize) -> Vec<Vec<ClassroomHandle>> {
    if k == 0 {
        return Vec::new();
    }
    classrooms.sort_by_key(|&h| arena.classroom(h).geography_sort_key());
    let split = split_balanced(classrooms.to_vec(), k);
    rebalance(arena, split)
}

fn split_balanced(items: Vec<ClassroomHandle>, k: usize) -> Vec<Vec<ClassroomHandle>> {
    let len = items.len();
    let base = len / k;
    let remainder = len % k;
    let mut iter = items.into_iter();
    (0..k)
        .map(|i| {
            let take = base + usize::from(i < remainder);
            iter.by_ref().take(take).collect()
        })
        .collect()
}

fn rebalance(arena: &SortArena, mut groups: Vec<Vec<ClassroomHandle>>) -> Vec<Vec<ClassroomHandle>> {
    if groups.len() < 2 || !groups.iter().any(|g| g.len() > 1) {
        return groups;
    }

    let mut best = groups.clone();
    let mut best_range = ticket_range(arena, &groups);
    let mut iterations_since_improvement = 0;

    loop {
        let totals: Vec<usize> = groups.iter().map(|g| group_ticket_count(arena, g)).collect();
        let fullest = totals
            .iter()
            .enumerate()
            .max_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        let emptiest = totals
            .iter()
            .enumerate()
            .min_by_key(|&(_, &v)| v)
            .map(|(i, _)| i)
            .unwrap();
        if fullest == emptiest {
            break;
        }

        shift_one_classroom(&mut groups, fullest, emptiest);

        let range = ticket_range(arena, &groups);
        if range < best_range {
            best_range = range;
            best = groups.clone();
            iterations_since_improvement = 0;
        } else {
            iterations_since_improvement += 1;
            if iterations_since_improvement >= 7 {
                break;
            }
        }
    }

    best
}

fn shift_one_classroom(groups: &mut [Vec<ClassroomHandle>], fullest: usize, emptiest: usize) {
    if fullest < emptiest {
        for i in fullest..emptiest {
            if let Some(c) = groups[i].pop() {
                groups[i + 1].insert(0, c);
            }
        }
    } else {
        for i in ((emptiest + 1)..=fullest).rev() {
            if !groups[i].is_empty() {
                let c = groups[i].remove(0);
                groups[i - 1].push(c);
            }
        }
    }
}

fn group_ticket_count(arena: &SortArena, group: &[ClassroomHandle]) -> usize {
    group.iter().map(|&h| arena.classroom(h).tickets.len()).sum()
}

fn ticket_range(arena: &SortArena, groups: &[Vec<ClassroomHandle>]) -> usize {
    let totals: Vec<usize> = groups.iter().map(|g| group_ticket_count(arena, g)).collect();
    let max = totals.iter().copied().max().unwrap_or(0);
    let min = totals.iter().copied().min().unwrap_or(0);
    max - min
}

fn has_serenade(arena: &SortArena, handle: ClassroomHandle) -> bool {
    arena
        .classroom(handle)
        .tickets
        .iter()
        .any(|&t| arena.ticket(t).item_type.is_serenade())
}

fn snapshot(arena: &SortArena, handle: ClassroomHandle) -> PlannedClassroom {
    let classroom = arena.classroom(handle);
    let mut tickets: Vec<PlannedTicket> = classroom
        .tickets
        .iter()
        .map(|&t| {
            let ticket = arena.ticket(t);
            PlannedTicket {
                id: ticket.id.clone(),
                recipient: ticket.recipient.clone(),
                item_type: ticket.item_type,
            }
        })
        .collect();
    tickets.sort_by(|a, b| a.recipient.cmp(&b.recipient).then_with(|| a.item_type.cmp(&b.item_type)));
    PlannedClassroom {
        period: classroom.period,
        clean_name: classroom.clean_name.clone(),
        original_name: classroom.original_name.clone(),
        special: classroom.special,
        tickets,
    }
}

/// Partitions every surviving classroom across `num_serenading_groups`
/// `S`-groups and `num_non_serenading_groups` `N`-groups (§4.7).
pub fn partition(
    arena: &SortArena,
    survivors: &[ClassroomHandle],
    num_serenading_groups: usize,
    num_non_serenading_groups: usize,
) -> (Vec<DeliveryGroup>, Vec<DeliveryGroup>, Vec<Diagnostic>) {
    let mut diagnostics = Vec::new();
    let mut serenade_period_groups: Vec<Vec<Vec<ClassroomHandle>>> = Vec::with_capacity(4);
    let mut non_serenade_period_groups: Vec<Vec<Vec<ClassroomHandle>>> = Vec::with_capacity(4);

    for period in 1..=4u8 {
        let mut serenading: Vec<ClassroomHandle> = survivors
            .iter()
            .copied()
            .filter(|&h| arena.classroom(h).period == period && has_serenade(arena, h))
            .collect();
        let mut non_serenading: Vec<ClassroomHandle> = survivors
            .iter()
            .copied()
            .filter(|&h| arena.classroom(h).period == period && !has_serenade(arena, h))
            .collect();

        if serenading.len() < num_serenading_groups {
            diagnostics.push(Diagnostic::InsufficientCapacity {
                period,
                serenading_pool: true,
                groups_needed: num_serenading_groups,
                classrooms_available: serenading.len(),
            });
        }
        if non_serenading.len() < num_non_serenading_groups {
            diagnostics.push(Diagnostic::InsufficientCapacity {
                period,
                serenading_pool: false,
                groups_needed: num_non_serenading_groups,
                classrooms_available: non_serenading.len(),
            });
        }

        serenade_period_groups.push(build_period_groups(arena, &mut serenading, num_serenading_groups));
        non_serenade_period_groups.push(build_period_groups(arena, &mut non_serenading, num_non_serenading_groups));
    }

    let serenading_groups = assign_to_delivery_groups(arena, serenade_period_groups, num_serenading_groups, true);
    let non_serenading_groups =
        assign_to_delivery_groups(arena, non_serenade_period_groups, num_non_serenading_groups, false);

    (serenading_groups, non_serenading_groups, diagnostics)
}

fn assign_to_delivery_groups(
    arena: &SortArena,
    mut period_groups_by_period: Vec<Vec<Vec<ClassroomHandle>>>,
    k: usize,
    is_serenading: bool,
) -> Vec<DeliveryGroup> {
    let mut groups: Vec<DeliveryGroup> = (1..=k).map(|n| DeliveryGroup::new(n, is_serenading)).collect();
    let mut running_totals = vec![0usize; k];

    for (period_index, mut period_groups) in period_groups_by_period.drain(..).enumerate() {
        let period = (period_index + 1) as u8;
        period_groups.sort_by_key(|g| std::cmp::Reverse(group_ticket_count(arena, g)));

        // Each delivery group receives at most one period group per period,
        // so a (group, period) bucket is always a single already-geography-sorted
        // slice rather than a concatenation of two that would need re-sorting.
        let mut used = vec![false; k];
        for period_group in period_groups {
            let target = (0..k)
                .filter(|&i| !used[i])
                .min_by_key(|&i| running_totals[i])
                .unwrap_or(0);
            used[target] = true;
            running_totals[target] += group_ticket_count(arena, &period_group);
            let bucket = groups[target].by_period.get_mut(period);
            bucket.extend(period_group.into_iter().map(|h| snapshot(arena, h)));
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::arena::RawTicket;
    use crate::domain::ticket::{RecipientId, TicketId};

    fn serenade(id: &str, recipient: &str, room: &str) -> RawTicket {
        RawTicket {
            id: TicketId::new(id),
            recipient: RecipientId::new(recipient),
            item_type: ItemType::Serenade,
            rooms: std::array::from_fn(|_| room.to_string()),
            ss_period: None,
        }
    }

    #[test]
    fn split_balanced_distributes_remainder_to_leading_groups() {
        let groups = split_balanced(vec![ClassroomHandle(0), ClassroomHandle(1), ClassroomHandle(2)], 2);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[1].len(), 1);
    }

    #[test]
    fn partition_produces_requested_group_counts() {
        let mut arena = SortArena::new();
        let mut handles = Vec::new();
        for (i, room) in ["A101", "B102", "C103", "D104"].iter().enumerate() {
            let t = arena.add_ticket(serenade(&format!("T{i}"), &format!("R{i}"), room)).unwrap();
            arena.lock_ticket_to_period(t, 1);
            handles.push(arena.ticket(t).candidate(1).unwrap());
        }
        let (serenading, non_serenading, _diagnostics) = partition(&arena, &handles, 2, 2);
        assert_eq!(serenading.len(), 2);
        assert_eq!(non_serenading.len(), 2);
        assert_eq!(serenading[0].code, "S1");
        assert_eq!(non_serenading[1].code, "N2");
    }
}
