use super::model::{CutoffTable, Gender, Query, SeatRecord, FEMALE_ONLY, OPEN_CATEGORY};

// ---------------------------------------------------------------------------
// Margin factors
// ---------------------------------------------------------------------------

/// Rank slack applied to OPEN seats: a CRL rank up to 20% past the closing
/// rank still counts, absorbing rank drift between allocation rounds.
pub const OPEN_MARGIN: f64 = 1.20;

/// Tighter slack for seats matched through the student's own category.
pub const RESERVED_MARGIN: f64 = 1.15;

// ---------------------------------------------------------------------------
// Eligibility filter
// ---------------------------------------------------------------------------

/// Return indices of seats the student qualifies for, sorted ascending by
/// closing rank. Equal closing ranks keep their sheet order (stable sort).
///
/// Pure: the table is never mutated and no process state is touched. An empty
/// result means "no eligible seats", not a failure.
pub fn eligible_indices(table: &CutoffTable, query: &Query) -> Vec<usize> {
    let category = query.category.trim().to_ascii_uppercase();
    let quota = query
        .quota
        .as_deref()
        .map(|q| q.trim().to_ascii_uppercase());

    let mut indices: Vec<usize> = table
        .seats
        .iter()
        .enumerate()
        .filter(|(_, seat)| seat_matches(seat, query, &category, quota.as_deref()))
        .map(|(i, _)| i)
        .collect();

    indices.sort_by_key(|&i| table.seats[i].closing_rank);
    indices
}

/// The per-row predicate. `category` and `quota` are the query values already
/// folded to the sheet's canonical case.
fn seat_matches(seat: &SeatRecord, query: &Query, category: &str, quota: Option<&str>) -> bool {
    // Female-only seats are out for everyone else, whatever the rank.
    if seat.gender == FEMALE_ONLY && query.gender != Gender::Female {
        return false;
    }

    if let Some(wanted) = quota {
        if seat.quota != wanted {
            return false;
        }
    }

    if !query.branches.is_empty() && !query.branches.contains(&seat.branch) {
        return false;
    }

    let ceiling = seat.closing_rank as f64;
    if seat.category == OPEN_CATEGORY {
        query.crl_rank as f64 <= ceiling * OPEN_MARGIN
    } else if seat.category == category {
        query.category_rank as f64 <= ceiling * RESERVED_MARGIN
    } else {
        // Some other reserved category; the student cannot claim it.
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn seat(
        category: &str,
        gender: &str,
        quota: &str,
        branch: &str,
        closing_rank: u32,
    ) -> SeatRecord {
        SeatRecord {
            institute: "NIT Trichy".to_string(),
            branch: branch.to_string(),
            quota: quota.to_string(),
            category: category.to_string(),
            gender: gender.to_string(),
            closing_rank,
        }
    }

    fn open_seat(closing_rank: u32) -> SeatRecord {
        seat("OPEN", "gender-neutral", "HS", "CSE", closing_rank)
    }

    fn query() -> Query {
        Query {
            category: "SC".to_string(),
            category_rank: 1,
            crl_rank: 1,
            gender: Gender::Male,
            quota: None,
            branches: HashSet::new(),
        }
    }

    #[test]
    fn open_seat_included_up_to_twenty_percent_past_closing() {
        let table = CutoffTable::from_seats(vec![open_seat(100)]);
        let mut q = query();

        q.crl_rank = 120; // 100 * 1.20 exactly
        assert_eq!(eligible_indices(&table, &q), vec![0]);

        q.crl_rank = 121;
        assert!(eligible_indices(&table, &q).is_empty());
    }

    #[test]
    fn reserved_seat_uses_category_rank_and_tighter_margin() {
        let table = CutoffTable::from_seats(vec![seat("SC", "gender-neutral", "HS", "CSE", 100)]);
        let mut q = query();
        // CRL rank is irrelevant for a reserved seat.
        q.crl_rank = 9_999_999;

        q.category_rank = 114; // inside 100 * 1.15
        assert_eq!(eligible_indices(&table, &q), vec![0]);

        q.category_rank = 116;
        assert!(eligible_indices(&table, &q).is_empty());
    }

    #[test]
    fn other_reserved_category_never_matches() {
        let table = CutoffTable::from_seats(vec![seat("EWS", "gender-neutral", "HS", "CSE", 100)]);
        let mut q = query();
        q.category_rank = 1;
        q.crl_rank = 1;
        assert!(eligible_indices(&table, &q).is_empty());
    }

    #[test]
    fn female_only_seat_excluded_for_male_even_with_qualifying_rank() {
        let table =
            CutoffTable::from_seats(vec![seat("OPEN", FEMALE_ONLY, "HS", "CSE", 100)]);
        let mut q = query();
        q.crl_rank = 1;

        assert!(eligible_indices(&table, &q).is_empty());

        q.gender = Gender::Female;
        assert_eq!(eligible_indices(&table, &q), vec![0]);
    }

    #[test]
    fn quota_mismatch_excludes() {
        let table = CutoffTable::from_seats(vec![open_seat(100)]);
        let mut q = query();
        q.crl_rank = 50;

        q.quota = Some("OS".to_string());
        assert!(eligible_indices(&table, &q).is_empty());

        q.quota = Some("HS".to_string());
        assert_eq!(eligible_indices(&table, &q), vec![0]);

        q.quota = None;
        assert_eq!(eligible_indices(&table, &q), vec![0]);
    }

    #[test]
    fn quota_and_category_comparisons_fold_case() {
        let table =
            CutoffTable::from_seats(vec![seat("SC", "gender-neutral", "HS", "CSE", 100)]);
        let mut q = query();
        q.category = "sc".to_string();
        q.category_rank = 50;
        q.quota = Some("hs".to_string());

        assert_eq!(eligible_indices(&table, &q), vec![0]);
    }

    #[test]
    fn branch_filter_restricts_to_the_selected_set() {
        let table = CutoffTable::from_seats(vec![
            seat("OPEN", "gender-neutral", "HS", "CSE", 100),
            seat("OPEN", "gender-neutral", "HS", "ECE", 100),
        ]);
        let mut q = query();
        q.crl_rank = 50;

        q.branches = ["ECE".to_string()].into_iter().collect();
        assert_eq!(eligible_indices(&table, &q), vec![1]);

        q.branches.clear();
        assert_eq!(eligible_indices(&table, &q), vec![0, 1]);
    }

    #[test]
    fn results_sorted_by_closing_rank_with_stable_ties() {
        let table = CutoffTable::from_seats(vec![
            seat("OPEN", "gender-neutral", "HS", "CSE", 300),
            seat("OPEN", "gender-neutral", "HS", "ECE", 100),
            seat("OPEN", "gender-neutral", "HS", "MECH", 300),
            seat("OPEN", "gender-neutral", "HS", "CIVIL", 200),
        ]);
        let mut q = query();
        q.crl_rank = 100;

        let result = eligible_indices(&table, &q);
        assert_eq!(result, vec![1, 3, 0, 2]);

        let ranks: Vec<u32> = result.iter().map(|&i| table.seats[i].closing_rank).collect();
        for pair in ranks.windows(2) {
            assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn filter_is_pure_and_idempotent() {
        let table = CutoffTable::from_seats(vec![open_seat(100), open_seat(50)]);
        let before = table.clone();
        let q = query();

        let first = eligible_indices(&table, &q);
        let second = eligible_indices(&table, &q);

        assert_eq!(first, second);
        assert_eq!(table.seats, before.seats);
    }

    #[test]
    fn no_matching_seat_yields_empty_result() {
        let table = CutoffTable::from_seats(vec![seat("ST", "gender-neutral", "OS", "CSE", 10)]);
        let mut q = query();
        q.branches = ["EEE".to_string()].into_iter().collect();

        assert!(eligible_indices(&table, &q).is_empty());
    }
}
