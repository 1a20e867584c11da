pub const SCHEMA: &str = r#"
-- users table (kept for compatibility, no screen reads or writes it)
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY,
    username TEXT UNIQUE,
    password TEXT
);

-- expenses table
CREATE TABLE IF NOT EXISTS expenses (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    amount REAL,
    date DATE,
    category TEXT,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category);

-- budgets table (category is not unique; lookups take the lowest id)
CREATE TABLE IF NOT EXISTS budgets (
    id INTEGER PRIMARY KEY,
    user_id INTEGER,
    category TEXT,
    amount REAL,
    FOREIGN KEY (user_id) REFERENCES users(id)
);

-- categories table
CREATE TABLE IF NOT EXISTS categories (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE,
    type TEXT
);

-- bills table
CREATE TABLE IF NOT EXISTS bills (
    id INTEGER PRIMARY KEY,
    name TEXT UNIQUE,
    amount REAL
);

-- income table
CREATE TABLE IF NOT EXISTS income (
    id INTEGER PRIMARY KEY,
    amount REAL NOT NULL,
    received_on TEXT NOT NULL
);
"#;

pub const SEED_CATEGORIES: &str = r#"
INSERT OR IGNORE INTO categories (name, type) VALUES ('Bills', 'expense');
INSERT OR IGNORE INTO categories (name, type) VALUES ('Groceries', 'expense');
INSERT OR IGNORE INTO categories (name, type) VALUES ('Salary', 'income');
"#;

pub const SCHEMA_VERSION: i64 = 1;

/// Older databases recorded income as budget rows under this category.
pub const LEGACY_INCOME_CATEGORY: &str = "Income";

/// Copies legacy income budget rows (category bound as `?1`) into `income`.
pub const COPY_LEGACY_INCOME: &str = "INSERT INTO income (amount, received_on)
    SELECT COALESCE(amount, 0.0), '' FROM budgets WHERE category = ?1 ORDER BY id";

pub const DELETE_LEGACY_INCOME: &str = "DELETE FROM budgets WHERE category = ?1";
