//! SQLite schema. Applied on every open; all statements are idempotent.

pub(super) const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    username TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS units (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS ingredients (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL UNIQUE,
    default_unit INTEGER,

    FOREIGN KEY (default_unit) REFERENCES units(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS recipes (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    author TEXT NOT NULL,
    portion INTEGER NOT NULL CHECK (portion > 0),
    steps TEXT,
    created_at TEXT NOT NULL,
    modified_at TEXT NOT NULL,

    FOREIGN KEY (author) REFERENCES users(id) ON DELETE CASCADE
);

-- Recipe-Ingredient join table (many-to-many)
CREATE TABLE IF NOT EXISTS recipes_ingredients (
    recipe_id INTEGER NOT NULL,
    ingredient_id INTEGER NOT NULL,
    amount REAL NOT NULL,
    unit_id INTEGER NOT NULL,

    PRIMARY KEY (recipe_id, ingredient_id),
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE,
    FOREIGN KEY (ingredient_id) REFERENCES ingredients(id) ON DELETE CASCADE,
    FOREIGN KEY (unit_id) REFERENCES units(id)
);

CREATE INDEX IF NOT EXISTS recipes_ingredients_ingredient
ON recipes_ingredients (ingredient_id);

CREATE TABLE IF NOT EXISTS schedules (
    id INTEGER PRIMARY KEY,
    author TEXT,
    created_at TEXT NOT NULL,

    FOREIGN KEY (author) REFERENCES users(id) ON DELETE SET NULL
);

-- Schedule-Recipe join table (many-to-many)
CREATE TABLE IF NOT EXISTS schedules_recipes (
    schedule_id INTEGER NOT NULL,
    recipe_id INTEGER NOT NULL,
    portion INTEGER NOT NULL CHECK (portion > 0),

    PRIMARY KEY (schedule_id, recipe_id),
    FOREIGN KEY (schedule_id) REFERENCES schedules(id) ON DELETE CASCADE,
    FOREIGN KEY (recipe_id) REFERENCES recipes(id) ON DELETE CASCADE
);
"#;
