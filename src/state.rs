use std::collections::HashSet;

use crate::data::filter::eligible_indices;
use crate::data::loader;
use crate::data::model::{CutoffTable, Gender, Query};

// ---------------------------------------------------------------------------
// Query form
// ---------------------------------------------------------------------------

/// Draft of the student's inputs, edited in place by the form widgets.
pub struct QueryForm {
    pub category: String,
    pub category_rank: u32,
    pub crl_rank: u32,
    pub gender: Gender,
    /// `None` renders as "All".
    pub quota: Option<String>,
    /// Selected preferred branches; empty means no restriction.
    pub branches: HashSet<String>,
}

impl QueryForm {
    /// Defaults for a freshly loaded table.
    pub fn new(table: &CutoffTable) -> Self {
        Self {
            category: table.categories.first().cloned().unwrap_or_default(),
            category_rank: 1,
            crl_rank: 1,
            gender: Gender::Male,
            quota: None,
            branches: HashSet::new(),
        }
    }

    /// Snapshot the draft into the request handed to the filter.
    pub fn to_query(&self) -> Query {
        Query {
            category: self.category.clone(),
            category_rank: self.category_rank,
            crl_rank: self.crl_rank,
            gender: self.gender,
            quota: self.quota.clone(),
            branches: self.branches.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Handle to the memoized cutoff table (None until loaded, or on failure).
    pub table: Option<&'static CutoffTable>,

    /// Form draft; present once the table is loaded.
    pub form: Option<QueryForm>,

    /// Seat indices from the last search, sorted by closing rank.
    /// None until the user first triggers a search.
    pub results: Option<Vec<usize>>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether the one-shot load has been attempted.
    load_attempted: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            table: None,
            form: None,
            results: None,
            status_message: None,
            load_attempted: false,
        }
    }
}

impl AppState {
    /// Acquire the dataset on the first frame. The loader memoizes both
    /// outcomes, so a failure is reported once and never retried.
    pub fn ensure_table(&mut self) {
        if self.load_attempted {
            return;
        }
        self.load_attempted = true;

        match loader::load() {
            Ok(table) => {
                self.form = Some(QueryForm::new(table));
                self.table = Some(table);
            }
            Err(e) => {
                log::error!("Failed to load cutoff data: {e}");
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Run the eligibility filter over the current form inputs.
    pub fn run_search(&mut self) {
        if let (Some(table), Some(form)) = (self.table, &self.form) {
            let query = form.to_query();
            let indices = eligible_indices(table, &query);
            log::info!("Search matched {} of {} seats", indices.len(), table.len());
            self.results = Some(indices);
        }
    }
}
