//! Analytics kinds, query scoping, and the payload records returned by each kind.
//!
//! [`QueryScope`] is the single place where a principal's role turns into a row
//! filter and a cache-key identity segment. Everything that reads ledger rows for
//! analytics takes a scope, never a raw principal.

use crate::{Money, Principal, PrincipalId, YearMonth};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Bucket name for expense rows without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Identity segment used by scopes that see the whole ledger.
pub const ALL_USERS: &str = "all-users";

/// The three analytics views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalyticsKind {
    /// Income and expense totals per month.
    Monthly,
    /// Expense totals per category.
    Category,
    /// Income and expense series per month.
    IncomeExpense,
}

impl AnalyticsKind {
    /// Returns every kind.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [Self::Monthly, Self::Category, Self::IncomeExpense]
    }

    /// Name used in cache keys, routes and metric labels.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::Category => "category",
            Self::IncomeExpense => "income-expense",
        }
    }

    /// Human-readable label used in error messages.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Monthly => "monthly analytics",
            Self::Category => "category breakdown",
            Self::IncomeExpense => "income vs expense",
        }
    }
}

impl fmt::Display for AnalyticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a single analytics request may see.
///
/// `owner_filter` is `None` only for principals that see the whole ledger.
/// A scope with `Some(owner)` selects rows owned by `owner` and nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryScope {
    pub kind: AnalyticsKind,
    pub year: i32,
    pub owner_filter: Option<PrincipalId>,
}

impl QueryScope {
    /// Derives the scope for `principal` asking for `kind` in `year`.
    #[must_use]
    pub fn derive(principal: &Principal, kind: AnalyticsKind, year: i32) -> Self {
        let owner_filter = if principal.role.sees_whole_ledger() {
            None
        } else {
            Some(principal.id)
        };
        Self {
            kind,
            year,
            owner_filter,
        }
    }

    /// Cache-key identity segment: `all-users` or `user-<id>`.
    #[must_use]
    pub fn identity_segment(&self) -> String {
        match self.owner_filter {
            None => ALL_USERS.to_string(),
            Some(owner) => format!("user-{}", owner),
        }
    }

    /// Returns true if a row owned by `owner` is visible through this scope.
    #[must_use]
    pub fn admits(&self, owner: PrincipalId) -> bool {
        self.owner_filter.map_or(true, |filter| filter == owner)
    }
}

/// Resolves the `year` query parameter.
///
/// Missing, unparseable, or out-of-range (`1..=9999`) values fall back to the
/// current UTC year rather than being rejected.
#[must_use]
pub fn resolve_year(raw: Option<&str>) -> i32 {
    raw.and_then(|s| s.trim().parse::<i32>().ok())
        .filter(|year| (1..=9999).contains(year))
        .unwrap_or_else(current_year)
}

/// Current calendar year in UTC.
#[must_use]
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Monthly income and expense totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTotal {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-03"))]
    pub month: YearMonth,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub total_income: Money,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub total_expense: Money,
}

/// Expense total for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct CategoryTotal {
    pub category: String,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub total: Money,
}

/// One point of the income vs expense series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct IncomeExpensePoint {
    #[cfg_attr(feature = "openapi", schema(value_type = String, example = "2024-03"))]
    pub month: YearMonth,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub income: Money,
    #[cfg_attr(feature = "openapi", schema(value_type = f64))]
    pub expense: Money,
}

/// Orders category totals by total descending, then name ascending.
pub fn sort_category_totals(totals: &mut [CategoryTotal]) {
    totals.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
}
