use std::path::Path;
use std::sync::{Arc, Barrier};
use std::thread;

use grocer_core::storage::{
    GroceryStore, IngredientLine, NewRecipe, Querier, RecipeFields, SqliteStore, StoreOptions,
    UpdateRecipe,
};
use grocer_core::{ErrorKind, GrocerError};
use uuid::Uuid;

struct Seed {
    author: Uuid,
    gram: i64,
    pinch: i64,
}

fn seed(store: &SqliteStore) -> Seed {
    store
        .execute_tx("seed", |q| {
            let user = q.create_user("chef")?;
            let gram = q.create_unit("gram")?;
            let pinch = q.create_unit("pinch")?;
            Ok(Seed {
                author: user.id,
                gram: gram.id,
                pinch: pinch.id,
            })
        })
        .expect("seed should succeed")
}

fn open(path: &Path) -> SqliteStore {
    SqliteStore::open(path, &StoreOptions::default()).expect("open should succeed")
}

#[test]
fn test_create_reuses_existing_ingredient_by_name() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let salt = store
        .execute_tx("seed salt", |q| {
            q.try_create_ingredient(
                &grocer_core::storage::NewIngredient::new("salt").with_default_unit(seed.pinch),
            )
        })
        .expect("insert should succeed")
        .expect("salt should be new");

    let soup = NewRecipe::new(seed.author, RecipeFields::new("soup", 4).with_steps("simmer"))
        .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch))
        .with_ingredient(IngredientLine::named("carrot", 300.0, seed.gram));

    let created = store
        .create_recipe_with_ingredients(&soup)
        .expect("create should succeed");

    assert_eq!(created.recipe.name, "soup");
    assert_eq!(created.recipe.portion, 4);
    assert_eq!(created.ingredients.len(), 2);
    assert_eq!(created.ingredients[0].ingredient_id, salt.id);
    assert_eq!(created.ingredients[0].unit_name, "pinch");
    assert_eq!(created.ingredients[1].name, "carrot");
    assert_eq!(created.ingredients[1].amount, 300.0);

    let loaded = store
        .load_recipe_composition(created.recipe.id)
        .expect("load should succeed");
    assert_eq!(loaded, created);
    store.check_integrity().expect("integrity should hold");
}

#[test]
fn test_soup_creates_salt_with_line_unit_as_default() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let soup = NewRecipe::new(seed.author, RecipeFields::new("soup", 2))
        .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch));
    let created = store
        .create_recipe_with_ingredients(&soup)
        .expect("create should succeed");

    assert!(created.recipe.id > 0);
    assert_eq!(created.recipe.portion, 2);
    assert_eq!(created.ingredients.len(), 1);
    assert_eq!(created.ingredients[0].name, "salt");
    assert_eq!(created.ingredients[0].amount, 1.0);
    assert_eq!(created.ingredients[0].unit_id, seed.pinch);

    let (salt, all) = store
        .execute_tx("inspect", |q| {
            Ok((q.find_ingredient_by_name("salt")?, q.search_ingredients("")?))
        })
        .expect("inspect should succeed");
    let salt = salt.expect("salt should exist");
    assert_eq!(salt.default_unit, Some(seed.pinch));
    assert_eq!(salt.id, created.ingredients[0].ingredient_id);
    assert_eq!(all.len(), 1);
}

#[test]
fn test_padded_name_reuses_ingredient() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let first = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("a", 1))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch)),
        )
        .expect("create should succeed");
    let second = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("b", 1))
                .with_ingredient(IngredientLine::named("salt ", 1.0, seed.pinch)),
        )
        .expect("create should succeed");

    assert_eq!(
        first.ingredients[0].ingredient_id,
        second.ingredients[0].ingredient_id
    );
    assert_eq!(second.ingredients[0].name, "salt");

    let salts = store
        .execute_tx("inspect", |q| q.search_ingredients("salt"))
        .expect("inspect should succeed");
    assert_eq!(salts.len(), 1);
}

#[test]
fn test_delete_recipe_keeps_ingredients() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let created = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("soup", 2))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch))
                .with_ingredient(IngredientLine::named("carrot", 200.0, seed.gram)),
        )
        .expect("create should succeed");
    let recipe_id = created.recipe.id;

    store
        .delete_recipe(recipe_id)
        .expect("delete should succeed");

    let err = store
        .load_recipe_composition(recipe_id)
        .expect_err("deleted recipe should be gone");
    assert!(matches!(err, GrocerError::NotFound(_)));

    let (lines, ingredients) = store
        .execute_tx("inspect", |q| {
            Ok((q.list_recipe_ingredients(recipe_id)?, q.search_ingredients("")?))
        })
        .expect("inspect should succeed");
    assert!(lines.is_empty());
    assert_eq!(ingredients.len(), 2);

    let err = store
        .delete_recipe(recipe_id)
        .expect_err("second delete should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));
    store.check_integrity().expect("integrity should hold");
}

#[test]
fn test_list_recipes_by_name() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    for name in ["stew", "bread", "pasta"] {
        store
            .create_recipe_with_ingredients(&NewRecipe::new(seed.author, RecipeFields::new(name, 1)))
            .expect("create should succeed");
    }

    let names: Vec<String> = store
        .list_recipes()
        .expect("list should succeed")
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["bread", "pasta", "stew"]);
}

#[test]
fn test_create_with_existing_ingredient_id() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let first = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("bread", 1))
                .with_ingredient(IngredientLine::named("flour", 500.0, seed.gram)),
        )
        .expect("create should succeed");
    let flour_id = first.ingredients[0].ingredient_id;

    let second = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("pancakes", 2))
                .with_ingredient(IngredientLine::existing(flour_id, 200.0, seed.gram)),
        )
        .expect("create should succeed");

    assert_eq!(second.ingredients.len(), 1);
    assert_eq!(second.ingredients[0].ingredient_id, flour_id);
    assert_eq!(second.ingredients[0].name, "flour");
}

#[test]
fn test_recipe_without_lines_is_allowed() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let created = store
        .create_recipe_with_ingredients(&NewRecipe::new(seed.author, RecipeFields::new("toast", 1)))
        .expect("create should succeed");
    assert!(created.ingredients.is_empty());
}

#[test]
fn test_invalid_unit_rolls_back_everything() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let recipe = NewRecipe::new(seed.author, RecipeFields::new("stew", 2))
        .with_ingredient(IngredientLine::named("onion", 1.0, seed.gram))
        .with_ingredient(IngredientLine::named("beef", 1.0, 9_999));

    let err = store
        .create_recipe_with_ingredients(&recipe)
        .expect_err("unknown unit should fail");
    assert_eq!(err.kind(), ErrorKind::NotFound);

    let (recipes, ingredients) = store
        .execute_tx("inspect", |q| Ok((q.list_recipes()?, q.search_ingredients("")?)))
        .expect("inspect should succeed");
    assert!(recipes.is_empty());
    assert!(ingredients.is_empty());
    store.check_integrity().expect("integrity should hold");
}

#[test]
fn test_unknown_author_is_not_found() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let err = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(Uuid::new_v4(), RecipeFields::new("ghost", 1))
                .with_ingredient(IngredientLine::named("air", 1.0, seed.gram)),
        )
        .expect_err("unknown author should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));
}

#[test]
fn test_duplicate_line_is_conflict() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let err = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("salty", 1))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch))
                .with_ingredient(IngredientLine::named("salt", 2.0, seed.pinch)),
        )
        .expect_err("duplicate ingredient should fail");
    assert!(matches!(err, GrocerError::Conflict(_)));

    let recipes = store
        .execute_tx("inspect", |q| q.list_recipes())
        .expect("inspect should succeed");
    assert!(recipes.is_empty());
}

#[test]
fn test_validation_rejects_before_writing() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let err = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("", 1))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch)),
        )
        .expect_err("empty name should fail");
    assert_eq!(err.kind(), ErrorKind::Invalid);

    let err = store
        .create_recipe_with_ingredients(&NewRecipe::new(seed.author, RecipeFields::new("soup", 0)))
        .expect_err("zero portion should fail");
    assert_eq!(err.kind(), ErrorKind::Invalid);
}

#[test]
fn test_load_missing_recipe_is_not_found() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let err = store
        .load_recipe_composition(404)
        .expect_err("missing recipe should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));
}

#[test]
fn test_update_merges_lines_without_removing() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let created = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("soup", 2))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch))
                .with_ingredient(IngredientLine::named("carrot", 200.0, seed.gram)),
        )
        .expect("create should succeed");
    let salt_id = created.ingredients[0].ingredient_id;
    let carrot_id = created.ingredients[1].ingredient_id;

    let update = UpdateRecipe::new(
        created.recipe.id,
        RecipeFields::new("carrot soup", 3).with_steps("blend"),
    )
    .with_ingredient(IngredientLine::existing(salt_id, 2.0, seed.pinch))
    .with_ingredient(IngredientLine::named("ginger", 10.0, seed.gram));

    let updated = store
        .update_recipe_composition(&update)
        .expect("update should succeed");

    assert_eq!(updated.recipe.id, created.recipe.id);
    assert_eq!(updated.recipe.name, "carrot soup");
    assert_eq!(updated.recipe.portion, 3);
    assert_eq!(updated.recipe.steps.as_deref(), Some("blend"));
    assert_eq!(updated.recipe.created_at, created.recipe.created_at);
    assert!(updated.recipe.modified_at >= created.recipe.modified_at);

    let ids: Vec<i64> = updated.ingredients.iter().map(|i| i.ingredient_id).collect();
    assert_eq!(ids.len(), 3);
    assert_eq!(ids[0], salt_id);
    assert_eq!(ids[1], carrot_id);
    assert_eq!(updated.ingredients[0].amount, 2.0);
    assert_eq!(updated.ingredients[2].name, "ginger");

    let loaded = store
        .load_recipe_composition(created.recipe.id)
        .expect("load should succeed");
    assert_eq!(loaded, updated);
}

#[test]
fn test_update_missing_recipe_is_not_found() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let update = UpdateRecipe::new(777, RecipeFields::new("nothing", 1))
        .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch));
    let err = store
        .update_recipe_composition(&update)
        .expect_err("missing recipe should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));

    let salt = store
        .execute_tx("inspect", |q| q.find_ingredient_by_name("salt"))
        .expect("inspect should succeed");
    assert!(salt.is_none());
}

#[test]
fn test_update_unknown_line_rolls_back_header() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let created = store
        .create_recipe_with_ingredients(&NewRecipe::new(seed.author, RecipeFields::new("soup", 2)))
        .expect("create should succeed");

    let update = UpdateRecipe::new(created.recipe.id, RecipeFields::new("renamed", 5))
        .with_ingredient(IngredientLine::existing(12_345, 1.0, seed.gram));
    let err = store
        .update_recipe_composition(&update)
        .expect_err("line without junction row should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));

    let loaded = store
        .load_recipe_composition(created.recipe.id)
        .expect("load should succeed");
    assert_eq!(loaded.recipe.name, "soup");
    assert_eq!(loaded.recipe.portion, 2);
}

#[test]
fn test_remove_recipe_ingredient() {
    let store = SqliteStore::open_in_memory().expect("open should succeed");
    let seed = seed(&store);

    let created = store
        .create_recipe_with_ingredients(
            &NewRecipe::new(seed.author, RecipeFields::new("soup", 2))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch))
                .with_ingredient(IngredientLine::named("carrot", 200.0, seed.gram)),
        )
        .expect("create should succeed");
    let salt_id = created.ingredients[0].ingredient_id;

    store
        .remove_recipe_ingredient(created.recipe.id, salt_id)
        .expect("remove should succeed");

    let loaded = store
        .load_recipe_composition(created.recipe.id)
        .expect("load should succeed");
    assert_eq!(loaded.ingredients.len(), 1);
    assert_eq!(loaded.ingredients[0].name, "carrot");

    let err = store
        .remove_recipe_ingredient(created.recipe.id, salt_id)
        .expect_err("second remove should fail");
    assert!(matches!(err, GrocerError::NotFound(_)));

    let salt = store
        .execute_tx("inspect", |q| q.get_ingredient(salt_id))
        .expect("inspect should succeed");
    assert!(salt.is_some());
}

#[test]
fn test_concurrent_creates_share_one_ingredient() {
    let dir = tempfile::tempdir().expect("tempdir should succeed");
    let path = dir.path().join("grocer.db");
    let seed = seed(&open(&path));

    let barrier = Arc::new(Barrier::new(2));
    let handles: Vec<_> = ["soup", "salad"]
        .into_iter()
        .map(|name| {
            let path = path.clone();
            let barrier = Arc::clone(&barrier);
            let recipe = NewRecipe::new(seed.author, RecipeFields::new(name, 1))
                .with_ingredient(IngredientLine::named("salt", 1.0, seed.pinch));
            thread::spawn(move || {
                let store = open(&path);
                barrier.wait();
                store
                    .create_recipe_with_ingredients(&recipe)
                    .expect("create should succeed")
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|h| h.join().expect("thread should finish"))
        .collect();

    assert_ne!(results[0].recipe.id, results[1].recipe.id);
    assert_eq!(
        results[0].ingredients[0].ingredient_id,
        results[1].ingredients[0].ingredient_id
    );

    let store = open(&path);
    let salts = store
        .execute_tx("inspect", |q| q.search_ingredients("salt"))
        .expect("inspect should succeed");
    assert_eq!(salts.len(), 1);
    store.check_integrity().expect("integrity should hold");
}
