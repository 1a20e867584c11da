mod bills;
mod budgets;
mod categories;
mod expenses;
mod income;
mod schema;
mod store;

pub use bills::Bills;
pub use budgets::Budgets;
pub use categories::Categories;
pub use expenses::Expenses;
pub use income::Incomes;
pub use store::Store;
