use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub kind: CategoryKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Expense,
    Income,
}

impl CategoryKind {
    pub fn as_str(self) -> &'static str {
        match self {
            CategoryKind::Expense => "expense",
            CategoryKind::Income => "income",
        }
    }

    /// Column text is not constrained in older databases; anything unknown reads as an expense.
    pub fn from_db(value: &str) -> Self {
        match value {
            "income" => CategoryKind::Income,
            _ => CategoryKind::Expense,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_text_round_trips() {
        for kind in [CategoryKind::Expense, CategoryKind::Income] {
            assert_eq!(CategoryKind::from_db(kind.as_str()), kind);
        }
    }

    #[test]
    fn unknown_kind_reads_as_expense() {
        assert_eq!(CategoryKind::from_db("transfer"), CategoryKind::Expense);
        assert_eq!(CategoryKind::from_db(""), CategoryKind::Expense);
    }
}
