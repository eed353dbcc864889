use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::classroom::ClassroomHandle;
use crate::domain::item_type::ItemType;

/// Opaque, caller-supplied ticket identifier. The engine never mints one
/// itself — ticket-code generation is an external collaborator (§1).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(String);

impl TicketId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque, caller-supplied recipient identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecipientId(String);

impl RecipientId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque handle into a `SortArena`'s ticket pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketHandle(pub usize);

/// A ticket plus its four candidate classrooms and per-period availability.
///
/// `available` is conceptually the 4-bit mask described in DESIGN.md — kept
/// here as `[bool; 4]` rather than a packed integer because the engine
/// never needs more than popcount/trailing-zero style queries on it, and
/// the array form keeps call sites readable without bit-twiddling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub recipient: RecipientId,
    pub item_type: ItemType,
    /// Candidate classroom for each period (index 0 = period 1, ..., index
    /// 3 = period 4). `None` means the raw room was `Invalid` and this
    /// ticket never had a candidate there.
    candidates: [Option<ClassroomHandle>; 4],
    available: [bool; 4],
    pub ss_period: Option<u8>,
}

impl Ticket {
    pub fn new(
        id: TicketId,
        recipient: RecipientId,
        item_type: ItemType,
        candidates: [Option<ClassroomHandle>; 4],
        availability_seed: [bool; 4],
        ss_period: Option<u8>,
    ) -> Self {
        Self {
            id,
            recipient,
            item_type,
            candidates,
            available: availability_seed,
            ss_period,
        }
    }

    pub fn candidate(&self, period: u8) -> Option<ClassroomHandle> {
        self.candidates[period_index(period)]
    }

    pub fn is_available(&self, period: u8) -> bool {
        self.available[period_index(period)]
    }

    pub fn set_available(&mut self, period: u8, value: bool) {
        self.available[period_index(period)] = value;
    }

    pub fn num_available(&self) -> u8 {
        self.available.iter().filter(|&&a| a).count() as u8
    }

    pub fn is_locked(&self) -> bool {
        self.num_available() <= 1
    }

    /// The period this ticket is locked to, if any. `None` if more than one
    /// period remains available, or if none do (an invalid ticket that
    /// should already have been excluded upstream).
    pub fn chosen_period(&self) -> Option<u8> {
        if self.num_available() == 1 {
            (1..=4u8).find(|&p| self.is_available(p))
        } else {
            None
        }
    }

    pub fn available_periods(&self) -> Vec<u8> {
        (1..=4u8).filter(|&p| self.is_available(p)).collect()
    }

    /// Repoints a single period's candidate to a different classroom, used
    /// when an extra-special serenade is moved into its own duplicate room.
    pub fn retarget_candidate(&mut self, period: u8, classroom: ClassroomHandle) {
        self.candidates[period_index(period)] = Some(classroom);
    }
}

pub fn period_index(period: u8) -> usize {
    debug_assert!((1..=4).contains(&period), "period out of range: {period}");
    (period - 1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ticket(available: [bool; 4]) -> Ticket {
        Ticket::new(
            TicketId::new("T1"),
            RecipientId::new("R1"),
            ItemType::Serenade,
            [
                Some(ClassroomHandle(0)),
                Some(ClassroomHandle(1)),
                Some(ClassroomHandle(2)),
                Some(ClassroomHandle(3)),
            ],
            available,
            None,
        )
    }

    #[test]
    fn num_available_counts_true_flags() {
        let ticket = sample_ticket([true, false, true, false]);
        assert_eq!(ticket.num_available(), 2);
        assert!(!ticket.is_locked());
    }

    #[test]
    fn locked_ticket_reports_chosen_period() {
        let ticket = sample_ticket([false, false, true, false]);
        assert!(ticket.is_locked());
        assert_eq!(ticket.chosen_period(), Some(3));
    }

    #[test]
    fn unlocked_ticket_has_no_chosen_period() {
        let ticket = sample_ticket([true, true, false, false]);
        assert_eq!(ticket.chosen_period(), None);
    }

    #[test]
    fn available_periods_lists_1_based_periods() {
        let ticket = sample_ticket([true, false, false, true]);
        assert_eq!(ticket.available_periods(), vec![1, 4]);
    }
}
