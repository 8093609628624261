//! SQLite implementation of the [`Querier`] capability set.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::error::Result;
use crate::storage::traits::Querier;
use crate::storage::types::{
    Grocery, Ingredient, NewIngredient, Recipe, RecipeFields, RecipeIngredient,
    RecipeIngredientRow, Schedule, ScheduleRecipe, ScheduleRecipeRow, Unit, User,
};

use super::row::{RecipeRow, ScheduleRow, UserRow};

/// Query handle over a connection or an open transaction.
///
/// A `rusqlite::Transaction` derefs to `Connection`, so the same handle
/// serves both.
pub struct Queries<'conn> {
    pub(super) conn: &'conn Connection,
}

impl<'conn> Queries<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

fn ingredient_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Ingredient> {
    Ok(Ingredient {
        id: row.get(0)?,
        name: row.get(1)?,
        default_unit: row.get(2)?,
    })
}

/// Escape LIKE wildcards so a search fragment matches literally.
fn escape_like(fragment: &str) -> String {
    let mut escaped = String::with_capacity(fragment.len());
    for c in fragment.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Querier for Queries<'_> {
    fn create_user(&self, username: &str) -> Result<User> {
        let row = self.conn.query_row(
            &format!(
                "INSERT INTO users (id, username, created_at) VALUES (?, ?, ?) RETURNING {}",
                UserRow::COLUMNS
            ),
            (Uuid::new_v4().to_string(), username, Utc::now().to_rfc3339()),
            UserRow::from_row,
        )?;
        row.try_into()
    }

    fn get_user(&self, id: &Uuid) -> Result<Option<User>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM users WHERE id = ?", UserRow::COLUMNS),
                [id.to_string()],
                UserRow::from_row,
            )
            .optional()?;
        row.map(User::try_from).transpose()
    }

    fn create_unit(&self, name: &str) -> Result<Unit> {
        let unit = self.conn.query_row(
            "INSERT INTO units (name) VALUES (?) RETURNING id, name",
            [name],
            |row| {
                Ok(Unit {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            },
        )?;
        Ok(unit)
    }

    fn get_unit(&self, id: i64) -> Result<Option<Unit>> {
        let unit = self
            .conn
            .query_row("SELECT id, name FROM units WHERE id = ?", [id], |row| {
                Ok(Unit {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .optional()?;
        Ok(unit)
    }

    fn list_units(&self) -> Result<Vec<Unit>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM units ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok(Unit {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut units = Vec::new();
        for row in rows {
            units.push(row?);
        }
        Ok(units)
    }

    fn try_create_ingredient(&self, ingredient: &NewIngredient) -> Result<Option<Ingredient>> {
        // DO NOTHING only swallows the name conflict; foreign key and other
        // constraint failures still surface as errors.
        let created = self
            .conn
            .query_row(
                r#"
                INSERT INTO ingredients (name, default_unit)
                VALUES (?, ?)
                ON CONFLICT (name) DO NOTHING
                RETURNING id, name, default_unit
                "#,
                (&ingredient.name, ingredient.default_unit),
                ingredient_from_row,
            )
            .optional()?;
        Ok(created)
    }

    fn get_ingredient(&self, id: i64) -> Result<Option<Ingredient>> {
        let ingredient = self
            .conn
            .query_row(
                "SELECT id, name, default_unit FROM ingredients WHERE id = ?",
                [id],
                ingredient_from_row,
            )
            .optional()?;
        Ok(ingredient)
    }

    fn find_ingredient_by_name(&self, name: &str) -> Result<Option<Ingredient>> {
        let ingredient = self
            .conn
            .query_row(
                "SELECT id, name, default_unit FROM ingredients WHERE name = ?",
                [name],
                ingredient_from_row,
            )
            .optional()?;
        Ok(ingredient)
    }

    fn search_ingredients(&self, fragment: &str) -> Result<Vec<Ingredient>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT id, name, default_unit
            FROM ingredients
            WHERE name LIKE '%' || ? || '%' ESCAPE '\'
            ORDER BY name
            "#,
        )?;
        let rows = stmt.query_map([escape_like(fragment)], ingredient_from_row)?;

        let mut ingredients = Vec::new();
        for row in rows {
            ingredients.push(row?);
        }
        Ok(ingredients)
    }

    fn create_recipe(&self, author: &Uuid, fields: &RecipeFields) -> Result<Recipe> {
        let now = Utc::now().to_rfc3339();
        let row = self.conn.query_row(
            &format!(
                r#"
                INSERT INTO recipes (name, author, portion, steps, created_at, modified_at)
                VALUES (?, ?, ?, ?, ?, ?)
                RETURNING {}
                "#,
                RecipeRow::COLUMNS
            ),
            (
                &fields.name,
                author.to_string(),
                fields.portion,
                &fields.steps,
                &now,
                &now,
            ),
            RecipeRow::from_row,
        )?;
        row.try_into()
    }

    fn get_recipe(&self, id: i64) -> Result<Option<Recipe>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM recipes WHERE id = ?", RecipeRow::COLUMNS),
                [id],
                RecipeRow::from_row,
            )
            .optional()?;
        row.map(Recipe::try_from).transpose()
    }

    fn update_recipe(&self, id: i64, fields: &RecipeFields) -> Result<Option<Recipe>> {
        let row = self
            .conn
            .query_row(
                &format!(
                    r#"
                    UPDATE recipes
                    SET name = ?, portion = ?, steps = ?, modified_at = ?
                    WHERE id = ?
                    RETURNING {}
                    "#,
                    RecipeRow::COLUMNS
                ),
                (
                    &fields.name,
                    fields.portion,
                    &fields.steps,
                    Utc::now().to_rfc3339(),
                    id,
                ),
                RecipeRow::from_row,
            )
            .optional()?;
        row.map(Recipe::try_from).transpose()
    }

    fn list_recipes(&self) -> Result<Vec<Recipe>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM recipes ORDER BY name, id",
            RecipeRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], RecipeRow::from_row)?;

        let mut recipes = Vec::new();
        for row in rows {
            let recipe: Recipe = row?.try_into()?;
            recipes.push(recipe);
        }
        Ok(recipes)
    }

    fn delete_recipe(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM recipes WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    fn create_recipe_ingredient(&self, row: &RecipeIngredient) -> Result<RecipeIngredient> {
        self.conn.execute(
            r#"
            INSERT INTO recipes_ingredients (recipe_id, ingredient_id, amount, unit_id)
            VALUES (?, ?, ?, ?)
            "#,
            (row.recipe_id, row.ingredient_id, row.amount, row.unit_id),
        )?;
        Ok(row.clone())
    }

    fn update_recipe_ingredient(&self, row: &RecipeIngredient) -> Result<Option<RecipeIngredient>> {
        let changed = self.conn.execute(
            r#"
            UPDATE recipes_ingredients
            SET amount = ?, unit_id = ?
            WHERE recipe_id = ? AND ingredient_id = ?
            "#,
            (row.amount, row.unit_id, row.recipe_id, row.ingredient_id),
        )?;
        Ok((changed > 0).then(|| row.clone()))
    }

    fn delete_recipe_ingredient(&self, recipe_id: i64, ingredient_id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM recipes_ingredients WHERE recipe_id = ? AND ingredient_id = ?",
            (recipe_id, ingredient_id),
        )?;
        Ok(changed > 0)
    }

    fn list_recipe_ingredients(&self, recipe_id: i64) -> Result<Vec<RecipeIngredientRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT ri.recipe_id, ri.ingredient_id, i.name, ri.amount, ri.unit_id, u.name
            FROM recipes_ingredients ri
            JOIN ingredients i ON i.id = ri.ingredient_id
            JOIN units u ON u.id = ri.unit_id
            WHERE ri.recipe_id = ?
            ORDER BY ri.rowid
            "#,
        )?;
        let rows = stmt.query_map([recipe_id], |row| {
            Ok(RecipeIngredientRow {
                recipe_id: row.get(0)?,
                ingredient_id: row.get(1)?,
                name: row.get(2)?,
                amount: row.get(3)?,
                unit_id: row.get(4)?,
                unit_name: row.get(5)?,
            })
        })?;

        let mut ingredients = Vec::new();
        for row in rows {
            ingredients.push(row?);
        }
        Ok(ingredients)
    }

    fn create_schedule(&self, author: Option<&Uuid>) -> Result<Schedule> {
        let row = self.conn.query_row(
            &format!(
                "INSERT INTO schedules (author, created_at) VALUES (?, ?) RETURNING {}",
                ScheduleRow::COLUMNS
            ),
            (author.map(Uuid::to_string), Utc::now().to_rfc3339()),
            ScheduleRow::from_row,
        )?;
        row.try_into()
    }

    fn get_schedule(&self, id: i64) -> Result<Option<Schedule>> {
        let row = self
            .conn
            .query_row(
                &format!("SELECT {} FROM schedules WHERE id = ?", ScheduleRow::COLUMNS),
                [id],
                ScheduleRow::from_row,
            )
            .optional()?;
        row.map(Schedule::try_from).transpose()
    }

    fn list_schedules(&self) -> Result<Vec<Schedule>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM schedules ORDER BY created_at DESC, id DESC",
            ScheduleRow::COLUMNS
        ))?;
        let rows = stmt.query_map([], ScheduleRow::from_row)?;

        let mut schedules = Vec::new();
        for row in rows {
            let schedule: Schedule = row?.try_into()?;
            schedules.push(schedule);
        }
        Ok(schedules)
    }

    fn delete_schedule(&self, id: i64) -> Result<bool> {
        let changed = self.conn.execute("DELETE FROM schedules WHERE id = ?", [id])?;
        Ok(changed > 0)
    }

    fn create_schedule_recipe(&self, row: &ScheduleRecipe) -> Result<ScheduleRecipe> {
        self.conn.execute(
            "INSERT INTO schedules_recipes (schedule_id, recipe_id, portion) VALUES (?, ?, ?)",
            (row.schedule_id, row.recipe_id, row.portion),
        )?;
        Ok(row.clone())
    }

    fn delete_schedule_recipe(&self, schedule_id: i64, recipe_id: i64) -> Result<bool> {
        let changed = self.conn.execute(
            "DELETE FROM schedules_recipes WHERE schedule_id = ? AND recipe_id = ?",
            (schedule_id, recipe_id),
        )?;
        Ok(changed > 0)
    }

    fn list_schedule_recipes(&self, schedule_id: i64) -> Result<Vec<ScheduleRecipeRow>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT sr.schedule_id, sr.recipe_id, r.name, sr.portion
            FROM schedules_recipes sr
            JOIN recipes r ON r.id = sr.recipe_id
            WHERE sr.schedule_id = ?
            ORDER BY sr.rowid
            "#,
        )?;
        let rows = stmt.query_map([schedule_id], |row| {
            Ok(ScheduleRecipeRow {
                schedule_id: row.get(0)?,
                recipe_id: row.get(1)?,
                name: row.get(2)?,
                portion: row.get(3)?,
            })
        })?;

        let mut recipes = Vec::new();
        for row in rows {
            recipes.push(row?);
        }
        Ok(recipes)
    }

    fn list_groceries(&self, schedule_id: i64) -> Result<Vec<Grocery>> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT DISTINCT i.id, i.name
            FROM schedules_recipes sr
            JOIN recipes_ingredients ri ON ri.recipe_id = sr.recipe_id
            JOIN ingredients i ON i.id = ri.ingredient_id
            WHERE sr.schedule_id = ?
            ORDER BY i.name, i.id
            "#,
        )?;
        let rows = stmt.query_map([schedule_id], |row| {
            Ok(Grocery {
                ingredient_id: row.get(0)?,
                name: row.get(1)?,
            })
        })?;

        let mut groceries = Vec::new();
        for row in rows {
            groceries.push(row?);
        }
        Ok(groceries)
    }
}
