use crate::domain::knowledge_base::entities::RiskLevel;

/// Cache key for one search: trimmed query, effective limit and filter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub query: String,
    pub limit: usize,
    pub risk_filter: Option<RiskLevel>,
}

impl SearchKey {
    pub fn new(query: &str, limit: usize, risk_filter: Option<RiskLevel>) -> Self {
        Self {
            query: query.trim().to_string(),
            limit,
            risk_filter,
        }
    }
}
