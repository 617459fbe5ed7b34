/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  Google Drive export (.xlsx)
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  download once → cache file → CutoffTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ CutoffTable   │  Vec<SeatRecord>, unique value lists
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  apply the eligibility predicate → seat indices
///   └──────────┘
/// ```
pub mod loader;
pub mod model;
pub mod filter;

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::fs;

    use super::filter::eligible_indices;
    use super::loader::parse_file;
    use super::model::{Gender, Query};

    // Parse → filter, the way a search runs against the downloaded sheet.
    #[test]
    fn parsed_sheet_filters_end_to_end() {
        let path = std::env::temp_dir().join(format!("cutoff-pipeline-{}.csv", std::process::id()));
        fs::write(
            &path,
            "Institute,Branch,Quota,Category,Gender,ClosingRank\n\
             NIT Trichy,CSE,HS,OPEN,Gender-Neutral,100\n\
             NIT Trichy,CSE,HS,SC,Gender-Neutral,40\n\
             NIT Surathkal,CSE,OS,OPEN,Female-only (including Supernumerary),500\n\
             NIT Trichy,ECE,HS,OPEN,Gender-Neutral,90\n",
        )
        .expect("write temp sheet");

        let table = parse_file(&path).unwrap();
        fs::remove_file(&path).ok();

        let query = Query {
            category: "SC".to_string(),
            category_rank: 45,
            crl_rank: 110,
            gender: Gender::Male,
            quota: Some("HS".to_string()),
            branches: ["CSE".to_string()].into_iter().collect::<HashSet<_>>(),
        };

        // SC seat via category rank (45 ≤ 40·1.15) and the OPEN seat via CRL
        // (110 ≤ 100·1.20); the female-only seat and the ECE seat are out.
        let result = eligible_indices(&table, &query);
        assert_eq!(result, vec![1, 0]);
        assert_eq!(table.seats[result[0]].category, "SC");
        assert_eq!(table.seats[result[1]].category, "OPEN");
    }
}
