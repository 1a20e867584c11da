use crate::config::Config;
use crate::db::{Bills, Budgets, Categories, Expenses, Incomes, Store};
use crate::error::{AppError, Result};
use crate::models::{Bill, BudgetLine, Category, CategoryTotal, Expense, Income, Screen};
use crate::tui::{AppAction, Form, InputMode, Submission};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusMessage {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusMessage {
    fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }
}

/// A delete waiting for the user to confirm it.
#[derive(Debug, Clone, PartialEq)]
pub enum PendingDelete {
    Expense(i64),
    Budget(String),
    Bill(String),
    Income(i64),
}

impl PendingDelete {
    pub fn prompt(&self) -> String {
        let target = match self {
            PendingDelete::Expense(id) => format!("expense #{id}"),
            PendingDelete::Budget(category) => format!("the '{category}' budget"),
            PendingDelete::Bill(name) => format!("'{name}'"),
            PendingDelete::Income(id) => format!("income #{id}"),
        };
        format!("Are you sure you want to delete {target}?")
    }

    fn deleted_message(&self) -> String {
        match self {
            PendingDelete::Expense(id) => format!("Expense #{id} has been deleted."),
            PendingDelete::Budget(category) => format!("Budget '{category}' has been deleted."),
            PendingDelete::Bill(name) => format!("'{name}' has been deleted."),
            PendingDelete::Income(id) => format!("Income #{id} has been deleted."),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Stats {
    pub total_expenses: f64,
    pub total_income: f64,
    pub total_bills: f64,
    pub by_category: Vec<CategoryTotal>,
    pub categories: Vec<Category>,
}

impl Stats {
    pub fn net(&self) -> f64 {
        self.total_income - self.total_expenses
    }
}

pub struct App {
    // Data
    pub expenses: Vec<Expense>,
    pub budgets: Vec<BudgetLine>,
    pub bills: Vec<Bill>,
    pub income: Vec<Income>,
    pub stats: Stats,

    // UI State
    pub screen: Screen,
    pub selected_index: usize,
    pub form: Option<Form>,
    pub pending_delete: Option<PendingDelete>,
    pub status: Option<StatusMessage>,
    pub show_help: bool,

    // Data access
    expenses_dao: Expenses,
    budgets_dao: Budgets,
    bills_dao: Bills,
    income_dao: Incomes,
    categories_dao: Categories,
}

impl App {
    pub async fn new(config: &Config) -> Result<Self> {
        let store = Store::open(&config.db_path).await?;
        let screen = Screen::from_name(&config.default_screen).unwrap_or_else(|| {
            tracing::warn!("Unknown default screen '{}'", config.default_screen);
            Screen::Home
        });
        Self::with_store(store, screen).await
    }

    pub async fn with_store(store: Store, screen: Screen) -> Result<Self> {
        let mut app = Self {
            expenses: Vec::new(),
            budgets: Vec::new(),
            bills: Vec::new(),
            income: Vec::new(),
            stats: Stats::default(),
            screen: Screen::Home,
            selected_index: 0,
            form: None,
            pending_delete: None,
            status: None,
            show_help: false,
            expenses_dao: Expenses::new(store.clone()),
            budgets_dao: Budgets::new(store.clone()),
            bills_dao: Bills::new(store.clone()),
            income_dao: Incomes::new(store.clone()),
            categories_dao: Categories::new(store),
        };
        app.switch_to(screen).await?;
        Ok(app)
    }

    pub fn input_mode(&self) -> InputMode {
        if self.show_help {
            InputMode::Help
        } else if self.pending_delete.is_some() {
            InputMode::Confirm
        } else if self.form.is_some() {
            if self.screen == Screen::Add {
                InputMode::InlineForm
            } else {
                InputMode::Form
            }
        } else {
            InputMode::Normal
        }
    }

    /// Number of selectable rows on the current screen.
    pub fn row_count(&self) -> usize {
        match self.screen {
            Screen::Home => self.expenses.len(),
            Screen::Budgets => self.budgets.len(),
            Screen::Bills => self.bills.len(),
            Screen::Income => self.income.len(),
            Screen::Add | Screen::Stats => 0,
        }
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextScreen => self.navigate(self.screen.next()).await,
            AppAction::PrevScreen => self.navigate(self.screen.prev()).await,
            AppAction::GoTo(screen) => self.navigate(screen).await,

            AppAction::MoveUp => {
                if self.selected_index > 0 {
                    self.selected_index -= 1;
                }
            }

            AppAction::MoveDown => {
                let len = self.row_count();
                if len > 0 && self.selected_index < len - 1 {
                    self.selected_index += 1;
                }
            }

            AppAction::StartAdd => {
                if let Err(e) = self.start_add().await {
                    self.report(e);
                }
            }
            AppAction::StartEdit => self.start_edit(),
            AppAction::Delete => self.request_delete(),

            AppAction::ConfirmYes => {
                if let Some(pending) = self.pending_delete.take() {
                    if let Err(e) = self.delete(&pending).await {
                        self.report(e);
                    }
                }
            }

            AppAction::ConfirmNo => {
                self.pending_delete = None;
            }

            AppAction::FormChar(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.push_char(c);
                }
            }

            AppAction::FormBackspace => {
                if let Some(form) = self.form.as_mut() {
                    form.backspace();
                }
            }

            AppAction::FormNextField => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
            }

            AppAction::FormPrevField => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
            }

            AppAction::FormSubmit => {
                if let Err(e) = self.submit_form().await {
                    self.report(e);
                }
            }

            AppAction::FormCancel => {
                self.form = None;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    /// Screen switch from a key press. A failed reload keeps the app running.
    async fn navigate(&mut self, screen: Screen) {
        if let Err(e) = self.switch_to(screen).await {
            self.report(e);
        }
    }

    async fn switch_to(&mut self, screen: Screen) -> Result<()> {
        self.screen = screen;
        self.selected_index = 0;
        self.pending_delete = None;
        self.status = None;
        self.form = match screen {
            Screen::Add => Some(Form::add_expense(&today())),
            _ => None,
        };
        self.refresh().await
    }

    /// Re-queries everything the screens display.
    pub async fn refresh(&mut self) -> Result<()> {
        self.expenses = self.expenses_dao.get().await?;

        let mut budgets = Vec::new();
        for budget in self.budgets_dao.get_budgets().await? {
            let remaining = self.budgets_dao.get_remaining_amount(&budget.category).await?;
            budgets.push(BudgetLine {
                category: budget.category,
                amount: budget.amount,
                remaining,
            });
        }
        self.budgets = budgets;

        self.bills = self.bills_dao.get_bills().await?;
        self.income = self.income_dao.get().await?;

        self.stats = Stats {
            total_expenses: self.expenses.iter().map(|e| e.amount).sum(),
            total_income: self.income_dao.total().await?,
            total_bills: self.bills.iter().map(|b| b.amount).sum(),
            by_category: self.expenses_dao.totals_by_category().await?,
            categories: self.categories_dao.get_categories().await?,
        };

        let len = self.row_count();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
        Ok(())
    }

    async fn start_add(&mut self) -> Result<()> {
        let today = today();
        self.form = match self.screen {
            Screen::Home => return self.switch_to(Screen::Add).await,
            Screen::Add => Some(Form::add_expense(&today)),
            Screen::Budgets => Some(Form::add_budget()),
            Screen::Bills => Some(Form::add_bill()),
            Screen::Income => Some(Form::add_income(&today)),
            Screen::Stats => None,
        };
        Ok(())
    }

    fn start_edit(&mut self) {
        let form = match self.screen {
            Screen::Home => self.expenses.get(self.selected_index).map(Form::edit_expense),
            Screen::Budgets => self.budgets.get(self.selected_index).map(Form::edit_budget),
            Screen::Bills => self.bills.get(self.selected_index).map(Form::edit_bill),
            _ => None,
        };
        if form.is_some() {
            self.form = form;
        }
    }

    fn request_delete(&mut self) {
        let i = self.selected_index;
        self.pending_delete = match self.screen {
            Screen::Home => self.expenses.get(i).map(|e| PendingDelete::Expense(e.id)),
            Screen::Budgets => self
                .budgets
                .get(i)
                .map(|b| PendingDelete::Budget(b.category.clone())),
            Screen::Bills => self.bills.get(i).map(|b| PendingDelete::Bill(b.name.clone())),
            Screen::Income => self.income.get(i).map(|r| PendingDelete::Income(r.id)),
            Screen::Add | Screen::Stats => None,
        };
    }

    async fn delete(&mut self, pending: &PendingDelete) -> Result<()> {
        match pending {
            PendingDelete::Expense(id) => self.expenses_dao.delete(*id).await?,
            PendingDelete::Budget(category) => self.budgets_dao.delete(category).await?,
            PendingDelete::Bill(name) => self.bills_dao.delete(name).await?,
            PendingDelete::Income(id) => self.income_dao.delete(*id).await?,
        }
        self.refresh().await?;
        self.status = Some(StatusMessage::info(pending.deleted_message()));
        Ok(())
    }

    async fn submit_form(&mut self) -> Result<()> {
        let Some(form) = &self.form else {
            return Ok(());
        };
        let submission = form.validate()?;

        let message = match submission {
            Submission::NewExpense {
                category,
                amount,
                date,
            } => {
                self.expenses_dao.add(&category, amount, &date).await?;
                "Expense saved.".to_string()
            }
            Submission::UpdatedExpense {
                id,
                category,
                amount,
                date,
            } => {
                self.expenses_dao.update(id, &category, amount, &date).await?;
                format!("Expense #{id} updated.")
            }
            Submission::NewBudget { category, amount } => {
                self.budgets_dao.add(&category, amount).await?;
                format!("Budget for '{category}' added.")
            }
            Submission::UpdatedBudget { category, amount } => {
                self.budgets_dao.update(&category, amount).await?;
                format!("Budget for '{category}' updated.")
            }
            Submission::NewBill { name, amount } => {
                self.bills_dao.add(&name, amount).await?;
                format!("Bill '{name}' added.")
            }
            Submission::UpdatedBill { name, amount } => {
                self.bills_dao.update(&name, amount).await?;
                format!("Bill '{name}' updated.")
            }
            Submission::NewIncome {
                amount,
                received_on,
            } => {
                self.income_dao.add(amount, &received_on).await?;
                "Income saved.".to_string()
            }
        };

        // The Add screen stays ready for the next expense
        self.form = match self.screen {
            Screen::Add => Some(Form::add_expense(&today())),
            _ => None,
        };
        self.refresh().await?;
        self.status = Some(StatusMessage::info(message));
        Ok(())
    }

    fn report(&mut self, err: AppError) {
        match &err {
            AppError::Validation(_) | AppError::DuplicateBill(_) => {}
            other => tracing::error!("Action failed: {}", other),
        }
        self.status = Some(StatusMessage::error(err.to_string()));
    }
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::block_on;

    async fn app_on(screen: Screen) -> App {
        let store = Store::open_in_memory().await.expect("open store");
        App::with_store(store, screen).await.expect("app")
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_action(AppAction::FormChar(c)).await.expect("type");
        }
    }

    async fn clear_field(app: &mut App) {
        let len = app
            .form
            .as_ref()
            .map(|f| f.fields[f.focus].value.len())
            .unwrap_or_default();
        for _ in 0..len {
            app.handle_action(AppAction::FormBackspace).await.expect("backspace");
        }
    }

    async fn add_expense(app: &mut App, category: &str, amount: &str, date: &str) {
        app.handle_action(AppAction::GoTo(Screen::Add)).await.expect("go to add");
        type_text(app, category).await;
        app.handle_action(AppAction::FormNextField).await.expect("next");
        type_text(app, amount).await;
        app.handle_action(AppAction::FormNextField).await.expect("next");
        clear_field(app).await;
        type_text(app, date).await;
        app.handle_action(AppAction::FormSubmit).await.expect("submit");
    }

    #[test]
    fn starts_on_requested_screen_with_empty_tables() {
        let app = block_on(app_on(Screen::Bills));
        assert_eq!(app.screen, Screen::Bills);
        assert_eq!(app.input_mode(), InputMode::Normal);
        assert!(app.expenses.is_empty());
        assert_eq!(app.stats.categories.len(), 3);
    }

    #[test]
    fn add_screen_form_is_inline() {
        let app = block_on(app_on(Screen::Add));
        assert_eq!(app.input_mode(), InputMode::InlineForm);
    }

    #[test]
    fn navigation_survives_a_closed_database() {
        block_on(async {
            let store = Store::open_in_memory().await.expect("open store");
            let mut app = App::with_store(store.clone(), Screen::Home)
                .await
                .expect("app");
            store.conn().clone().close().await.expect("close");

            for action in [
                AppAction::NextScreen,
                AppAction::PrevScreen,
                AppAction::GoTo(Screen::Stats),
                AppAction::GoTo(Screen::Home),
                AppAction::StartAdd,
            ] {
                app.status = None;
                let quit = app.handle_action(action.clone()).await.expect("keeps running");
                assert!(!quit);
                let status = app.status.as_ref().expect("error reported");
                assert_eq!(status.kind, StatusKind::Error, "{action:?}");
                assert!(status.text.starts_with("Database error"), "{}", status.text);
            }
        });
    }

    #[test]
    fn add_screen_saves_expense_and_resets_form() {
        block_on(async {
            let mut app = app_on(Screen::Home).await;
            add_expense(&mut app, "Groceries", "50", "2024-01-01").await;

            assert_eq!(app.expenses.len(), 1);
            assert_eq!(app.expenses[0].category, "Groceries");
            assert_eq!(app.status, Some(StatusMessage::info("Expense saved.")));

            let form = app.form.as_ref().expect("form stays open on Add");
            assert_eq!(form.fields[0].value, "");
        });
    }

    #[test]
    fn invalid_amount_is_reported_without_saving() {
        block_on(async {
            let mut app = app_on(Screen::Home).await;
            add_expense(&mut app, "Groceries", "lots", "2024-01-01").await;

            assert!(app.expenses.is_empty());
            assert_eq!(
                app.status,
                Some(StatusMessage::error("Invalid amount format."))
            );
            assert_eq!(app.form.as_ref().expect("form kept").fields[1].value, "lots");
        });
    }

    #[test]
    fn budgets_show_remaining_amount() {
        block_on(async {
            let mut app = app_on(Screen::Home).await;
            add_expense(&mut app, "Groceries", "50.0", "2024-01-01").await;
            add_expense(&mut app, "Groceries", "25.0", "2024-01-02").await;

            app.handle_action(AppAction::GoTo(Screen::Budgets)).await.expect("go");
            app.handle_action(AppAction::StartAdd).await.expect("add");
            type_text(&mut app, "Groceries").await;
            app.handle_action(AppAction::FormNextField).await.expect("next");
            type_text(&mut app, "100").await;
            app.handle_action(AppAction::FormSubmit).await.expect("submit");

            assert!(app.form.is_none());
            assert_eq!(
                app.budgets,
                vec![BudgetLine {
                    category: "Groceries".into(),
                    amount: 100.0,
                    remaining: 25.0,
                }]
            );
        });
    }

    #[test]
    fn duplicate_bill_is_reported_and_not_saved() {
        block_on(async {
            let mut app = app_on(Screen::Bills).await;
            for _ in 0..2 {
                app.handle_action(AppAction::StartAdd).await.expect("add");
                type_text(&mut app, "Rent").await;
                app.handle_action(AppAction::FormNextField).await.expect("next");
                type_text(&mut app, "1200").await;
                app.handle_action(AppAction::FormSubmit).await.expect("submit");
                app.form = None;
            }

            assert_eq!(app.bills.len(), 1);
            assert_eq!(
                app.status,
                Some(StatusMessage::error("A bill named 'Rent' already exists"))
            );
        });
    }

    #[test]
    fn bill_delete_needs_confirmation() {
        block_on(async {
            let mut app = app_on(Screen::Bills).await;
            app.handle_action(AppAction::StartAdd).await.expect("add");
            type_text(&mut app, "Rent").await;
            app.handle_action(AppAction::FormNextField).await.expect("next");
            type_text(&mut app, "1200").await;
            app.handle_action(AppAction::FormSubmit).await.expect("submit");

            app.handle_action(AppAction::Delete).await.expect("delete");
            assert_eq!(app.input_mode(), InputMode::Confirm);
            assert_eq!(
                app.pending_delete.as_ref().map(|p| p.prompt()),
                Some("Are you sure you want to delete 'Rent'?".to_string())
            );

            app.handle_action(AppAction::ConfirmNo).await.expect("no");
            assert_eq!(app.bills.len(), 1);

            app.handle_action(AppAction::Delete).await.expect("delete");
            app.handle_action(AppAction::ConfirmYes).await.expect("yes");
            assert!(app.bills.is_empty());
            assert_eq!(
                app.status,
                Some(StatusMessage::info("'Rent' has been deleted."))
            );
        });
    }

    #[test]
    fn income_is_recorded_separately_from_budgets() {
        block_on(async {
            let mut app = app_on(Screen::Income).await;
            app.handle_action(AppAction::StartAdd).await.expect("add");
            type_text(&mut app, "3000").await;
            app.handle_action(AppAction::FormSubmit).await.expect("submit");

            assert_eq!(app.income.len(), 1);
            assert!(app.budgets.is_empty());
            assert_eq!(app.stats.total_income, 3000.0);
        });
    }

    #[test]
    fn editing_an_expense_from_home() {
        block_on(async {
            let mut app = app_on(Screen::Home).await;
            add_expense(&mut app, "Coffee", "3.5", "2024-02-02").await;
            app.handle_action(AppAction::GoTo(Screen::Home)).await.expect("home");

            app.handle_action(AppAction::StartEdit).await.expect("edit");
            app.handle_action(AppAction::FormNextField).await.expect("next");
            clear_field(&mut app).await;
            type_text(&mut app, "4").await;
            app.handle_action(AppAction::FormSubmit).await.expect("submit");

            assert_eq!(app.expenses[0].amount, 4.0);
            assert_eq!(app.stats.total_expenses, 4.0);
        });
    }

    #[test]
    fn selection_is_clamped_to_rows() {
        block_on(async {
            let mut app = app_on(Screen::Home).await;
            add_expense(&mut app, "A", "1", "2024-01-01").await;
            add_expense(&mut app, "B", "2", "2024-01-01").await;
            app.handle_action(AppAction::GoTo(Screen::Home)).await.expect("home");

            for _ in 0..5 {
                app.handle_action(AppAction::MoveDown).await.expect("down");
            }
            assert_eq!(app.selected_index, 1);

            app.handle_action(AppAction::Delete).await.expect("delete");
            app.handle_action(AppAction::ConfirmYes).await.expect("yes");
            assert_eq!(app.selected_index, 0);
            assert_eq!(
                app.status,
                Some(StatusMessage::info("Expense #2 has been deleted."))
            );
        });
    }
}
