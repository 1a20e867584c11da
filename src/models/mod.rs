mod bill;
mod budget;
mod category;
mod expense;
mod income;
mod screen;

pub use bill::Bill;
pub use budget::{Budget, BudgetLine};
pub use category::{Category, CategoryKind};
pub use expense::{CategoryTotal, Expense};
pub use income::Income;
pub use screen::Screen;
