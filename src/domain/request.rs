use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::item_type::ItemType;
use crate::domain::ticket::{RecipientId, TicketId};
use crate::error::{CupidError, Result};

/// Tuning knobs for one `sort()` call (§3, §6).
///
/// A value of `0` for either cap means "no limit" — constructed directly
/// rather than through a builder since every field is required and there
/// is no sensible partial default for a one-shot batch operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SortRequest {
    pub num_serenading_groups: usize,
    pub num_non_serenading_groups: usize,
    pub max_serenades_per_class: usize,
    pub max_non_serenades_per_serenading_class: usize,
    pub extra_special_serenades: bool,
    pub enforce_distribution: bool,
}

impl SortRequest {
    pub fn new(
        num_serenading_groups: usize,
        num_non_serenading_groups: usize,
        max_serenades_per_class: usize,
        max_non_serenades_per_serenading_class: usize,
        extra_special_serenades: bool,
        enforce_distribution: bool,
    ) -> Result<Self> {
        if num_serenading_groups == 0 {
            return Err(CupidError::InvalidSortRequest(
                "numSerenadingGroups must be at least 1".to_string(),
            ));
        }
        if num_non_serenading_groups == 0 {
            return Err(CupidError::InvalidSortRequest(
                "numNonSerenadingGroups must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            num_serenading_groups,
            num_non_serenading_groups,
            max_serenades_per_class,
            max_non_serenades_per_serenading_class,
            extra_special_serenades,
            enforce_distribution,
        })
    }
}

/// A ticket as it appears inside a planned classroom visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedTicket {
    pub id: TicketId,
    pub recipient: RecipientId,
    pub item_type: ItemType,
}

/// A classroom visit as it appears in the final plan — a snapshot, not a
/// live handle, since the arena it was built from is dropped at the end of
/// `sort()` (§9).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannedClassroom {
    pub period: u8,
    pub clean_name: String,
    pub original_name: String,
    pub special: bool,
    pub tickets: Vec<PlannedTicket>,
}

impl PlannedClassroom {
    pub fn has_serenade(&self) -> bool {
        self.tickets.iter().any(|t| t.item_type.is_serenade())
    }

    pub fn num_serenades(&self) -> usize {
        self.tickets.iter().filter(|t| t.item_type.is_serenade()).count()
    }

    pub fn num_non_serenades(&self) -> usize {
        self.tickets.iter().filter(|t| t.item_type.is_non_serenade()).count()
    }
}

/// The four periods' worth of classrooms visited by one delivery group.
///
/// Mirrors the source's `p1..p4` attributes on a delivery group rather than
/// a generic `map<Period, _>`, since the period count is fixed at 4 by the
/// timetable and a small named struct is clearer than indexing into an
/// array at every call site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PeriodClassrooms {
    pub p1: Vec<PlannedClassroom>,
    pub p2: Vec<PlannedClassroom>,
    pub p3: Vec<PlannedClassroom>,
    pub p4: Vec<PlannedClassroom>,
}

impl PeriodClassrooms {
    pub fn get(&self, period: u8) -> &Vec<PlannedClassroom> {
        match period {
            1 => &self.p1,
            2 => &self.p2,
            3 => &self.p3,
            4 => &self.p4,
            other => panic!("period out of range: {other}"),
        }
    }

    pub fn get_mut(&mut self, period: u8) -> &mut Vec<PlannedClassroom> {
        match period {
            1 => &mut self.p1,
            2 => &mut self.p2,
            3 => &mut self.p3,
            4 => &mut self.p4,
            other => panic!("period out of range: {other}"),
        }
    }

    pub fn iter_periods(&self) -> impl Iterator<Item = (u8, &Vec<PlannedClassroom>)> {
        [1u8, 2, 3, 4].into_iter().map(move |p| (p, self.get(p)))
    }

    pub fn num_tickets(&self) -> usize {
        self.iter_periods()
            .flat_map(|(_, classrooms)| classrooms.iter())
            .map(|c| c.tickets.len())
            .sum()
    }
}

/// One delivery team: either serenading (`S1..SN`) or not (`N1..NM`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryGroup {
    pub code: String,
    pub is_serenading: bool,
    pub by_period: PeriodClassrooms,
}

impl DeliveryGroup {
    pub fn new(number: usize, is_serenading: bool) -> Self {
        let prefix = if is_serenading { "S" } else { "N" };
        Self {
            code: format!("{prefix}{number}"),
            is_serenading,
            by_period: PeriodClassrooms::default(),
        }
    }

    pub fn num_tickets(&self) -> usize {
        self.by_period.num_tickets()
    }
}

/// A recoverable condition encountered while sorting (§7). Collected
/// alongside, not instead of, a successfully-returned plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Diagnostic {
    InvalidTicket {
        ticket: TicketId,
        recipient: RecipientId,
        reason: String,
    },
    InsufficientCapacity {
        period: u8,
        serenading_pool: bool,
        groups_needed: usize,
        classrooms_available: usize,
    },
}

/// The engine's sole output: two sequences of delivery groups plus any
/// diagnostics gathered along the way (§3, §7).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeliveryPlan {
    pub serenading_groups: Vec<DeliveryGroup>,
    pub non_serenading_groups: Vec<DeliveryGroup>,
    pub diagnostics: Vec<Diagnostic>,
    pub generated_at: DateTime<Utc>,
}
