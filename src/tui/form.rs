use crate::error::{AppError, Result};
use crate::models::{Bill, BudgetLine, Expense};

const MISSING_FIELDS: &str = "Please enter all fields.";
const INVALID_AMOUNT: &str = "Invalid amount format.";
const MISSING_INCOME: &str = "Please enter the income amount.";
const INVALID_INCOME: &str = "Invalid income amount format.";

/// What a form creates or edits when submitted.
#[derive(Debug, Clone, PartialEq)]
pub enum FormKind {
    AddExpense,
    EditExpense(i64),
    AddBudget,
    EditBudget(String),
    AddBill,
    EditBill(String),
    AddIncome,
}

#[derive(Debug, Clone)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
    numeric: bool,
}

impl Field {
    fn text(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            numeric: false,
        }
    }

    fn amount(label: &'static str) -> Self {
        Self {
            label,
            value: String::new(),
            numeric: true,
        }
    }

    fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }
}

/// Validated form input, ready to hand to a DAO.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    NewExpense {
        category: String,
        amount: f64,
        date: String,
    },
    UpdatedExpense {
        id: i64,
        category: String,
        amount: f64,
        date: String,
    },
    NewBudget {
        category: String,
        amount: f64,
    },
    UpdatedBudget {
        category: String,
        amount: f64,
    },
    NewBill {
        name: String,
        amount: f64,
    },
    UpdatedBill {
        name: String,
        amount: f64,
    },
    NewIncome {
        amount: f64,
        received_on: String,
    },
}

#[derive(Debug, Clone)]
pub struct Form {
    pub kind: FormKind,
    pub fields: Vec<Field>,
    pub focus: usize,
}

impl Form {
    fn new(kind: FormKind, fields: Vec<Field>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
        }
    }

    pub fn add_expense(today: &str) -> Self {
        Self::new(
            FormKind::AddExpense,
            vec![
                Field::text("Category"),
                Field::amount("Amount"),
                Field::text("Date (YYYY-MM-DD)").with_value(today),
            ],
        )
    }

    pub fn edit_expense(expense: &Expense) -> Self {
        Self::new(
            FormKind::EditExpense(expense.id),
            vec![
                Field::text("Category").with_value(&expense.category),
                Field::amount("Amount").with_value(expense.amount.to_string()),
                Field::text("Date (YYYY-MM-DD)").with_value(&expense.date),
            ],
        )
    }

    pub fn add_budget() -> Self {
        Self::new(
            FormKind::AddBudget,
            vec![Field::text("Category"), Field::amount("Budget amount")],
        )
    }

    pub fn edit_budget(line: &BudgetLine) -> Self {
        Self::new(
            FormKind::EditBudget(line.category.clone()),
            vec![Field::amount("Budget amount").with_value(line.amount.to_string())],
        )
    }

    pub fn add_bill() -> Self {
        Self::new(
            FormKind::AddBill,
            vec![Field::text("Bill name"), Field::amount("Bill amount")],
        )
    }

    pub fn edit_bill(bill: &Bill) -> Self {
        Self::new(
            FormKind::EditBill(bill.name.clone()),
            vec![Field::amount("Bill amount").with_value(bill.amount.to_string())],
        )
    }

    pub fn add_income(today: &str) -> Self {
        Self::new(
            FormKind::AddIncome,
            vec![
                Field::amount("Income amount"),
                Field::text("Received on (YYYY-MM-DD)").with_value(today),
            ],
        )
    }

    pub fn title(&self) -> String {
        match &self.kind {
            FormKind::AddExpense => "Add Expense".to_string(),
            FormKind::EditExpense(id) => format!("Edit Expense #{id}"),
            FormKind::AddBudget => "Add Budget".to_string(),
            FormKind::EditBudget(category) => format!("Edit Budget '{category}'"),
            FormKind::AddBill => "Add Bill".to_string(),
            FormKind::EditBill(name) => format!("Edit Bill '{name}'"),
            FormKind::AddIncome => "Add Income".to_string(),
        }
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Messages for a blank field and for an amount that is not a number.
    fn rejections(&self) -> (&'static str, &'static str) {
        match self.kind {
            FormKind::AddIncome => (MISSING_INCOME, INVALID_INCOME),
            _ => (MISSING_FIELDS, INVALID_AMOUNT),
        }
    }

    /// Checks every field is filled in and every amount parses as a number.
    /// Text fields are submitted exactly as typed.
    pub fn validate(&self) -> Result<Submission> {
        let (missing, invalid) = self.rejections();
        if self.fields.iter().any(|f| f.value.trim().is_empty()) {
            return Err(AppError::validation(missing));
        }
        for field in self.fields.iter().filter(|f| f.numeric) {
            parse_amount(&field.value, invalid)?;
        }

        let text = |i: usize| self.fields[i].value.clone();
        let amount = |i: usize| parse_amount(&self.fields[i].value, invalid);

        let submission = match &self.kind {
            FormKind::AddExpense => Submission::NewExpense {
                category: text(0),
                amount: amount(1)?,
                date: text(2),
            },
            FormKind::EditExpense(id) => Submission::UpdatedExpense {
                id: *id,
                category: text(0),
                amount: amount(1)?,
                date: text(2),
            },
            FormKind::AddBudget => Submission::NewBudget {
                category: text(0),
                amount: amount(1)?,
            },
            FormKind::EditBudget(category) => Submission::UpdatedBudget {
                category: category.clone(),
                amount: amount(0)?,
            },
            FormKind::AddBill => Submission::NewBill {
                name: text(0),
                amount: amount(1)?,
            },
            FormKind::EditBill(name) => Submission::UpdatedBill {
                name: name.clone(),
                amount: amount(0)?,
            },
            FormKind::AddIncome => Submission::NewIncome {
                amount: amount(0)?,
                received_on: text(1),
            },
        };
        Ok(submission)
    }
}

fn parse_amount(input: &str, invalid: &'static str) -> Result<f64> {
    match input.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(AppError::validation(invalid)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fill(form: &mut Form, values: &[&str]) {
        for (i, value) in values.iter().enumerate() {
            form.focus = i;
            form.fields[i].value.clear();
            value.chars().for_each(|c| form.push_char(c));
        }
    }

    #[test]
    fn complete_expense_form_validates() {
        let mut form = Form::add_expense("2024-01-01");
        fill(&mut form, &["Groceries", " 12.50 "]);

        assert_eq!(
            form.validate().expect("valid"),
            Submission::NewExpense {
                category: "Groceries".into(),
                amount: 12.5,
                date: "2024-01-01".into(),
            }
        );
    }

    #[test]
    fn blank_field_is_rejected_first() {
        let mut form = Form::add_expense("");
        fill(&mut form, &["Groceries", "abc"]);

        let err = form.validate().expect_err("missing date");
        assert_eq!(err.to_string(), "Please enter all fields.");
    }

    #[test]
    fn non_numeric_amount_is_rejected() {
        let mut form = Form::add_bill();
        fill(&mut form, &["Rent", "twelve hundred"]);

        let err = form.validate().expect_err("bad amount");
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Invalid amount format.");
    }

    #[test]
    fn non_finite_amounts_are_rejected() {
        for input in ["inf", "NaN", "-infinity"] {
            assert!(parse_amount(input, INVALID_AMOUNT).is_err(), "{input}");
        }
        assert_eq!(parse_amount("-3", INVALID_AMOUNT).expect("negative"), -3.0);
    }

    #[test]
    fn text_is_stored_as_typed() {
        let mut form = Form::add_bill();
        fill(&mut form, &["  Rent ", " 900 "]);

        assert_eq!(
            form.validate().expect("valid"),
            Submission::NewBill {
                name: "  Rent ".into(),
                amount: 900.0,
            }
        );
    }

    #[test]
    fn income_form_has_its_own_messages() {
        let mut form = Form::add_income("2024-03-01");
        let err = form.validate().expect_err("blank amount");
        assert_eq!(err.to_string(), "Please enter the income amount.");

        fill(&mut form, &["a lot"]);
        let err = form.validate().expect_err("bad amount");
        assert_eq!(err.to_string(), "Invalid income amount format.");

        fill(&mut form, &["2500"]);
        assert_eq!(
            form.validate().expect("valid"),
            Submission::NewIncome {
                amount: 2500.0,
                received_on: "2024-03-01".into(),
            }
        );
    }

    #[test]
    fn edit_budget_keeps_category_from_the_row() {
        let line = BudgetLine {
            category: "Fuel".into(),
            amount: 80.0,
            remaining: 20.0,
        };
        let mut form = Form::edit_budget(&line);
        assert_eq!(form.fields[0].value, "80");
        fill(&mut form, &["95"]);

        assert_eq!(
            form.validate().expect("valid"),
            Submission::UpdatedBudget {
                category: "Fuel".into(),
                amount: 95.0,
            }
        );
    }

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = Form::add_expense("2024-01-01");
        form.prev_field();
        assert_eq!(form.focus, 2);
        form.next_field();
        assert_eq!(form.focus, 0);

        form.push_char('x');
        form.backspace();
        form.backspace();
        assert_eq!(form.fields[0].value, "");
    }
}
