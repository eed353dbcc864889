use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::ticket::TicketHandle;

/// Physical adjacency order of classroom blocks (first letter of a clean
/// name). Blocks earlier in this string are physically closer together;
/// the delivery-group partitioner (C7) uses it to keep each group's route
/// geographically contiguous.
pub const CLASSROOM_GEOGRAPHIC_ORDER: &str = "LBCDAEFGOPTJHIRX";

/// Opaque handle into a `SortArena`'s classroom pool. Cheap to copy, stable
/// for the lifetime of one `sort()` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClassroomHandle(pub usize);

/// Outcome of classifying a classroom's clean name (§4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassroomValidity {
    /// A normal classroom the heuristic may freely choose.
    Normal,
    /// A library-substitution room (`LIBA..D`, optionally suffixed `Y`).
    Special,
    /// A real but disruptive location (ovals, the pool) that must only be
    /// used when a special serenade forces it.
    Bad,
    /// Not a deliverable location at all.
    Invalid,
}

impl ClassroomValidity {
    /// Whether a ticket may list this classroom as an initial candidate.
    pub fn is_available_candidate(self) -> bool {
        !matches!(self, ClassroomValidity::Invalid)
    }
}

/// A physical room during one period — the unit of a delivery visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classroom {
    pub period: u8,
    pub clean_name: String,
    pub original_name: String,
    pub validity: ClassroomValidity,
    /// True for a duplicate classroom split off to isolate a special
    /// serenade (§4.4). Distinguishes it from the original room it shares
    /// a clean name with so the two never collide as the same key.
    pub special: bool,
    /// Tickets that currently list this classroom as an available
    /// candidate, in insertion order.
    pub tickets: Vec<TicketHandle>,
}

impl Classroom {
    pub fn new(period: u8, clean_name: String, original_name: String, validity: ClassroomValidity) -> Self {
        Self {
            period,
            clean_name,
            original_name,
            validity,
            special: false,
            tickets: Vec::new(),
        }
    }

    /// First character of the clean name — the geographic block.
    pub fn block(&self) -> char {
        self.clean_name
            .chars()
            .next()
            .expect("clean names are never empty")
    }

    /// Sort key used by the geography-ordering step of C7. A `special`
    /// duplicate's block is rotated by half the geographic order's length
    /// so it lands in a different delivery group than its twin (§4.4, §4.7,
    /// DESIGN.md Open Question 1).
    pub fn geography_sort_key(&self) -> (usize, String) {
        let order = CLASSROOM_GEOGRAPHIC_ORDER.as_bytes();
        let raw_index = CLASSROOM_GEOGRAPHIC_ORDER
            .find(self.block())
            .unwrap_or(order.len());
        let index = if self.special {
            (raw_index + order.len() / 2) % order.len()
        } else {
            raw_index
        };
        (index, self.clean_name.clone())
    }

    pub fn remove_ticket(&mut self, ticket: TicketHandle) {
        if let Some(pos) = self.tickets.iter().position(|&t| t == ticket) {
            self.tickets.remove(pos);
        }
    }

    pub fn add_ticket(&mut self, ticket: TicketHandle) {
        if !self.tickets.contains(&ticket) {
            self.tickets.push(ticket);
        }
    }
}

static SUBSTITUTION_TABLE: [(&str, &str); 4] = [
    ("LIBA", "B101"),
    ("LIBB", "B102"),
    ("LIBC", "B103"),
    ("LIBD", "B104"),
];

fn g_to_zero_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([A-Z])G").unwrap())
}

fn normal_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z][G\d].?\d{1,2}$").unwrap())
}

fn special_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^LIB[A-D]Y?$").unwrap())
}

fn bad_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(OVAL[A-D]|OVLJ|POOL)$").unwrap())
}

/// Canonicalises a raw timetable room string (§4.1).
///
/// Returns the clean name and the validity classification. The original
/// string is never mutated here — callers keep it around for rendering.
pub fn normalize_classroom_name(raw: &str) -> (String, ClassroomValidity) {
    if let Some((_, substituted)) = SUBSTITUTION_TABLE.iter().find(|(from, _)| *from == raw) {
        return (substituted.to_string(), ClassroomValidity::Normal);
    }

    let dotless: String = raw.chars().filter(|&c| c != '.').collect();
    let clean = g_to_zero_re().replace_all(&dotless, "${1}0").into_owned();

    let validity = if normal_re().is_match(&clean) {
        ClassroomValidity::Normal
    } else if special_re().is_match(&clean) {
        ClassroomValidity::Special
    } else if bad_re().is_match(&clean) {
        ClassroomValidity::Bad
    } else {
        ClassroomValidity::Invalid
    };

    (clean, validity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitution_rooms_are_normal() {
        assert_eq!(
            normalize_classroom_name("LIBA"),
            ("B101".to_string(), ClassroomValidity::Normal)
        );
        assert_eq!(
            normalize_classroom_name("LIBD"),
            ("B104".to_string(), ClassroomValidity::Normal)
        );
    }

    #[test]
    fn dots_are_stripped() {
        let (clean, validity) = normalize_classroom_name("E2.07");
        assert_eq!(clean, "E207");
        assert_eq!(validity, ClassroomValidity::Normal);
    }

    #[test]
    fn capital_g_becomes_zero() {
        let (clean, validity) = normalize_classroom_name("EG04");
        assert_eq!(clean, "E004");
        assert_eq!(validity, ClassroomValidity::Normal);
    }

    #[test]
    fn library_rooms_are_special() {
        assert_eq!(
            normalize_classroom_name("LIBAY").1,
            ClassroomValidity::Special
        );
    }

    #[test]
    fn ovals_and_pool_are_bad() {
        for raw in ["OVALA", "OVALB", "OVLJ", "POOL"] {
            assert_eq!(normalize_classroom_name(raw).1, ClassroomValidity::Bad, "{raw}");
        }
    }

    #[test]
    fn garbage_is_invalid() {
        assert_eq!(
            normalize_classroom_name("STAFFROOM").1,
            ClassroomValidity::Invalid
        );
        assert_eq!(normalize_classroom_name("").1, ClassroomValidity::Invalid);
    }

    #[test]
    fn geography_key_orders_by_block_then_name() {
        let mut a = Classroom::new(1, "F101".to_string(), "F101".to_string(), ClassroomValidity::Normal);
        let mut b = Classroom::new(1, "A101".to_string(), "A101".to_string(), ClassroomValidity::Normal);
        a.special = false;
        b.special = false;
        // 'A' sorts after 'L','B','C','D' in the geographic order.
        assert!(b.geography_sort_key() > a.geography_sort_key());
    }

    #[test]
    fn special_duplicate_rotates_block() {
        let mut plain = Classroom::new(1, "L101".to_string(), "L101".to_string(), ClassroomValidity::Normal);
        let mut special = plain.clone();
        special.special = true;
        assert_ne!(plain.geography_sort_key().0, special.geography_sort_key().0);
        plain.special = false;
        assert_eq!(plain.geography_sort_key().0, 0);
    }
}
