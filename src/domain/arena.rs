use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::classroom::{normalize_classroom_name, Classroom, ClassroomHandle, ClassroomValidity};
use crate::domain::item_type::ItemType;
use crate::domain::request::Diagnostic;
use crate::domain::ticket::{period_index, RecipientId, Ticket, TicketHandle, TicketId};

/// One ticket as handed to the engine, before candidates have been resolved
/// into classroom handles (§6 "Input — tickets").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawTicket {
    pub id: TicketId,
    pub recipient: RecipientId,
    pub item_type: ItemType,
    pub rooms: [String; 4],
    pub ss_period: Option<u8>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ClassroomKey {
    period: u8,
    clean_name: String,
    special: bool,
}

/// Owns every classroom and ticket created during one `sort()` call (§9
/// "Cyclic references"). Tickets and classrooms reference each other only
/// through `TicketHandle`/`ClassroomHandle` indices into this arena, so the
/// whole graph is freed in one step when the arena is dropped at the end of
/// the call.
#[derive(Debug, Default)]
pub struct SortArena {
    classrooms: Vec<Classroom>,
    tickets: Vec<Ticket>,
    index: HashMap<ClassroomKey, ClassroomHandle>,
}

impl SortArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classroom(&self, handle: ClassroomHandle) -> &Classroom {
        &self.classrooms[handle.0]
    }

    pub fn classroom_mut(&mut self, handle: ClassroomHandle) -> &mut Classroom {
        &mut self.classrooms[handle.0]
    }

    pub fn ticket(&self, handle: TicketHandle) -> &Ticket {
        &self.tickets[handle.0]
    }

    pub fn ticket_mut(&mut self, handle: TicketHandle) -> &mut Ticket {
        &mut self.tickets[handle.0]
    }

    pub fn ticket_count(&self) -> usize {
        self.tickets.len()
    }

    /// Every classroom handle created so far, oldest first. Callers track
    /// their own "still live" subset as tickets are eliminated; this is
    /// just the arena's full allocation history.
    pub fn all_classroom_handles(&self) -> Vec<ClassroomHandle> {
        (0..self.classrooms.len()).map(ClassroomHandle).collect()
    }

    pub fn all_ticket_handles(&self) -> Vec<TicketHandle> {
        (0..self.tickets.len()).map(TicketHandle).collect()
    }

    /// Interns a classroom by `(period, cleanName, special)`, normalising
    /// `raw_name` first (§4.1, §4.2). Reuses an existing classroom if the
    /// key already exists.
    pub fn intern(&mut self, period: u8, raw_name: &str, special: bool) -> (ClassroomHandle, ClassroomValidity) {
        let (clean_name, validity) = normalize_classroom_name(raw_name);
        let key = ClassroomKey {
            period,
            clean_name: clean_name.clone(),
            special,
        };
        if let Some(&handle) = self.index.get(&key) {
            return (handle, self.classrooms[handle.0].validity);
        }
        let handle = ClassroomHandle(self.classrooms.len());
        let mut classroom = Classroom::new(period, clean_name, raw_name.to_string(), validity);
        classroom.special = special;
        self.classrooms.push(classroom);
        self.index.insert(key, handle);
        (handle, validity)
    }

    /// Creates a fresh `special`-flagged duplicate of an existing classroom
    /// at the same period and clean name (§4.4 extra-special handling).
    pub fn intern_special_duplicate(&mut self, period: u8, clean_name: &str, original_name: &str) -> ClassroomHandle {
        let key = ClassroomKey {
            period,
            clean_name: clean_name.to_string(),
            special: true,
        };
        if let Some(&handle) = self.index.get(&key) {
            return handle;
        }
        let handle = ClassroomHandle(self.classrooms.len());
        let mut classroom = Classroom::new(period, clean_name.to_string(), original_name.to_string(), ClassroomValidity::Normal);
        classroom.special = true;
        self.classrooms.push(classroom);
        self.index.insert(key, handle);
        handle
    }

    /// Resolves a raw ticket's four candidates, registers it with whichever
    /// classrooms it can reach, and returns its handle — or a diagnostic if
    /// the ticket has no usable candidate at all (§4.2 failure modes).
    pub fn add_ticket(&mut self, raw: RawTicket) -> std::result::Result<TicketHandle, Diagnostic> {
        let mut candidates = [None; 4];
        let mut availability = [false; 4];

        for period in 1..=4u8 {
            let (handle, validity) = self.intern(period, &raw.rooms[period_index(period)], false);
            candidates[period_index(period)] = Some(handle);
            availability[period_index(period)] = validity.is_available_candidate();
        }

        if raw.item_type == ItemType::SpecialSerenade {
            match raw.ss_period {
                None => {
                    return Err(Diagnostic::InvalidTicket {
                        ticket: raw.id,
                        recipient: raw.recipient,
                        reason: "special serenade missing ssPeriod".to_string(),
                    })
                }
                Some(p) if !(1..=4).contains(&p) => {
                    return Err(Diagnostic::InvalidTicket {
                        ticket: raw.id,
                        recipient: raw.recipient,
                        reason: format!("ssPeriod {p} out of range"),
                    })
                }
                Some(p) if !availability[period_index(p)] => {
                    return Err(Diagnostic::InvalidTicket {
                        ticket: raw.id,
                        recipient: raw.recipient,
                        reason: format!("ssPeriod {p} candidate classroom is invalid"),
                    })
                }
                Some(_) => {}
            }
        }

        if availability.iter().all(|&a| !a) {
            return Err(Diagnostic::InvalidTicket {
                ticket: raw.id,
                recipient: raw.recipient,
                reason: "no valid candidate classroom in any period".to_string(),
            });
        }

        let handle = TicketHandle(self.tickets.len());
        let ticket = Ticket::new(raw.id, raw.recipient, raw.item_type, candidates, availability, raw.ss_period);
        self.tickets.push(ticket);

        for period in 1..=4u8 {
            if availability[period_index(period)] {
                let classroom_handle = candidates[period_index(period)].unwrap();
                self.classroom_mut(classroom_handle).add_ticket(handle);
            }
        }

        Ok(handle)
    }

    /// Marks `period` unavailable for `ticket` and removes it from that
    /// period's classroom, if it was registered there.
    pub fn evict_ticket_from_period(&mut self, ticket: TicketHandle, period: u8) {
        if let Some(classroom_handle) = self.ticket(ticket).candidate(period) {
            self.classroom_mut(classroom_handle).remove_ticket(ticket);
        }
        self.ticket_mut(ticket).set_available(period, false);
    }

    /// Locks `ticket` to `period`: evicts it from every other period and
    /// ensures it is registered with `period`'s classroom (§4.4 `choose_period`).
    pub fn lock_ticket_to_period(&mut self, ticket: TicketHandle, period: u8) {
        for p in 1..=4u8 {
            if p != period {
                self.evict_ticket_from_period(ticket, p);
            }
        }
        self.ticket_mut(ticket).set_available(period, true);
        if let Some(classroom_handle) = self.ticket(ticket).candidate(period) {
            self.classroom_mut(classroom_handle).add_ticket(ticket);
        }
    }

    /// Moves a ticket out of `from` (without touching availability) and
    /// into `to`, both at the same period — used when an extra-special
    /// serenade is relocated into its own duplicate classroom (§4.4).
    pub fn relocate_ticket(&mut self, ticket: TicketHandle, from: ClassroomHandle, to: ClassroomHandle, period: u8) {
        self.classroom_mut(from).remove_ticket(ticket);
        self.classroom_mut(to).add_ticket(ticket);
        self.ticket_mut(ticket).set_available(period, true);
        self.ticket_mut(ticket).retarget_candidate(period, to);
    }

    /// Drops handles whose classroom currently has no tickets, preserving
    /// relative order (§4.6 cleanup step).
    pub fn retain_non_empty(&self, handles: &mut Vec<ClassroomHandle>) {
        handles.retain(|&h| !self.classroom(h).tickets.is_empty());
    }
}
