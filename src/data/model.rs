use std::collections::{BTreeSet, HashSet};

// ---------------------------------------------------------------------------
// Markers used by the cutoff sheet
// ---------------------------------------------------------------------------

/// Category code of unreserved seats, compared against the CRL rank.
pub const OPEN_CATEGORY: &str = "OPEN";

/// Gender cell marking seats reserved for female applicants
/// (supernumerary seats included). Any other value is unrestricted.
pub const FEMALE_ONLY: &str = "female-only (including supernumerary)";

// ---------------------------------------------------------------------------
// SeatRecord – one row of the cutoff sheet
// ---------------------------------------------------------------------------

/// A single seat row, case-normalized at parse time:
/// `category` and `quota` uppercase, `gender` lowercase, `institute` and
/// `branch` trimmed but otherwise as published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatRecord {
    pub institute: String,
    pub branch: String,
    pub quota: String,
    pub category: String,
    pub gender: String,
    /// Worst rank admitted in the reference round; the eligibility ceiling.
    /// Strictly positive — rows without a usable value never reach the table.
    pub closing_rank: u32,
}

// ---------------------------------------------------------------------------
// CutoffTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed sheet with pre-computed value lists for the form widgets.
#[derive(Debug, Clone)]
pub struct CutoffTable {
    /// All seats (rows), in sheet order.
    pub seats: Vec<SeatRecord>,
    /// Sorted unique category codes.
    pub categories: Vec<String>,
    /// Sorted unique branch names.
    pub branches: Vec<String>,
    /// Sorted unique quota codes.
    pub quotas: Vec<String>,
}

impl CutoffTable {
    /// Build the value indices from the parsed rows.
    pub fn from_seats(seats: Vec<SeatRecord>) -> Self {
        let mut categories: BTreeSet<String> = BTreeSet::new();
        let mut branches: BTreeSet<String> = BTreeSet::new();
        let mut quotas: BTreeSet<String> = BTreeSet::new();

        for seat in &seats {
            categories.insert(seat.category.clone());
            branches.insert(seat.branch.clone());
            quotas.insert(seat.quota.clone());
        }

        CutoffTable {
            seats,
            categories: categories.into_iter().collect(),
            branches: branches.into_iter().collect(),
            quotas: quotas.into_iter().collect(),
        }
    }

    /// Number of seats.
    pub fn len(&self) -> usize {
        self.seats.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.seats.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Query – one filtering request
// ---------------------------------------------------------------------------

/// Gender of the applicant, as selected in the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

/// Student input for one search. Built fresh from the form on every trigger;
/// carries no state between searches.
#[derive(Debug, Clone)]
pub struct Query {
    /// Reservation category of the student (folded to uppercase when matched).
    pub category: String,
    /// Rank within the student's own category pool.
    pub category_rank: u32,
    /// Common Rank List rank, compared against OPEN seats.
    pub crl_rank: u32,
    pub gender: Gender,
    /// `None` means every quota qualifies.
    pub quota: Option<String>,
    /// Preferred branches; empty means no restriction.
    pub branches: HashSet<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seat(category: &str, branch: &str, quota: &str, closing_rank: u32) -> SeatRecord {
        SeatRecord {
            institute: "NIT Trichy".to_string(),
            branch: branch.to_string(),
            quota: quota.to_string(),
            category: category.to_string(),
            gender: "gender-neutral".to_string(),
            closing_rank,
        }
    }

    #[test]
    fn value_lists_are_sorted_and_deduplicated() {
        let table = CutoffTable::from_seats(vec![
            seat("SC", "ECE", "OS", 40),
            seat("OPEN", "CSE", "HS", 10),
            seat("OPEN", "CSE", "OS", 25),
        ]);

        assert_eq!(table.categories, vec!["OPEN", "SC"]);
        assert_eq!(table.branches, vec!["CSE", "ECE"]);
        assert_eq!(table.quotas, vec!["HS", "OS"]);
        assert_eq!(table.len(), 3);
        assert!(!table.is_empty());
    }

    #[test]
    fn empty_table_has_no_values() {
        let table = CutoffTable::from_seats(Vec::new());
        assert!(table.is_empty());
        assert!(table.categories.is_empty());
        assert!(table.branches.is_empty());
        assert!(table.quotas.is_empty());
    }
}
