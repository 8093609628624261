use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::Value;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_grocer"))
}

struct Env {
    _dir: tempfile::TempDir,
    home: PathBuf,
}

impl Env {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("tempdir should succeed");
        let home = dir.path().to_path_buf();
        Self { _dir: dir, home }
    }

    fn config_path(&self) -> PathBuf {
        self.home.join("config").join("grocer").join("config.toml")
    }

    fn database_path(&self) -> PathBuf {
        self.home.join("data").join("grocer").join("grocer.db")
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(bin())
            .args(args)
            .env("HOME", &self.home)
            .env("XDG_CONFIG_HOME", self.home.join("config"))
            .env("XDG_DATA_HOME", self.home.join("data"))
            .env_remove("GROCER_DB")
            .env_remove("GROCER_CONFIG")
            .env_remove("RUST_LOG")
            .output()
            .expect("grocer should run")
    }

    fn json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let output = self.run(&full);
        assert!(
            output.status.success(),
            "grocer {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON")
    }
}

fn initialized() -> Env {
    let env = Env::new();
    let output = env.run(&["init"]);
    assert!(
        output.status.success(),
        "init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    env
}

#[test]
fn test_init_writes_config_and_database() {
    let env = initialized();
    assert!(env.config_path().exists());
    assert!(env.database_path().exists());

    let config = std::fs::read_to_string(env.config_path()).expect("config should be readable");
    assert!(config.contains("[database]"));
    assert!(config.contains("busy_timeout_ms = 5000"));

    let again = env.run(&["init"]);
    assert_eq!(again.status.code(), Some(2));

    let forced = env.run(&["init", "--force"]);
    assert!(forced.status.success());
}

#[test]
fn test_commands_without_database_exit_not_found() {
    let env = Env::new();
    let output = env.run(&["unit", "list"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Error:"));
    assert!(stderr.contains("grocer init"));
}

#[test]
fn test_recipe_to_grocery_list_flow() {
    let env = initialized();

    let unit = env.json(&["unit", "add", "piece"]);
    let unit_id = unit["id"].as_i64().expect("unit id");
    let user = env.json(&["user", "add", "chef"]);
    let author = user["id"].as_str().expect("user id").to_string();

    let salt = format!("name=salt:1:{}", unit_id);
    let carrot = format!("name=carrot:3:{}", unit_id);
    let soup = env.json(&[
        "recipe", "create", "--name", "soup", "--author", &author, "--portion", "2",
        "--ingredient", &salt, "--ingredient", &carrot,
    ]);
    let soup_id = soup["recipe"]["id"].as_i64().expect("recipe id");
    assert_eq!(soup["ingredients"].as_array().map(Vec::len), Some(2));

    let bread = format!("name=bread:1:{}", unit_id);
    let salad = env.json(&[
        "recipe", "create", "--name", "salad", "--author", &author, "--portion", "1",
        "--ingredient", &carrot, "--ingredient", &bread,
    ]);
    let salad_id = salad["recipe"]["id"].as_i64().expect("recipe id");
    assert_eq!(
        soup["ingredients"][1]["ingredient_id"],
        salad["ingredients"][0]["ingredient_id"]
    );

    let shown = env.json(&["recipe", "show", &soup_id.to_string()]);
    assert_eq!(shown, soup);

    let generated = env.json(&[
        "groceries",
        "generate",
        "--recipe",
        &format!("{}:4", soup_id),
        "--recipe",
        &format!("{}:2", salad_id),
    ]);
    let names: Vec<&str> = generated["groceries"]
        .as_array()
        .expect("groceries")
        .iter()
        .filter_map(|g| g["name"].as_str())
        .collect();
    assert_eq!(names, vec!["bread", "carrot", "salt"]);

    let schedule_id = generated["schedule"]["id"].as_i64().expect("schedule id");
    let loaded = env.json(&["groceries", "show", &schedule_id.to_string()]);
    assert_eq!(loaded, generated);

    let found = env.json(&["ingredient", "search", "car"]);
    assert_eq!(found.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_update_and_remove_ingredient() {
    let env = initialized();
    let unit_id = env.json(&["unit", "add", "gram"])["id"]
        .as_i64()
        .expect("unit id");
    let author = env.json(&["user", "add", "cook"])["id"]
        .as_str()
        .expect("user id")
        .to_string();

    let rice = format!("name=rice:200:{}", unit_id);
    let created = env.json(&[
        "recipe", "create", "--name", "rice", "--author", &author, "--portion", "2",
        "--ingredient", &rice,
    ]);
    let recipe_id = created["recipe"]["id"].as_i64().expect("recipe id").to_string();
    let rice_id = created["ingredients"][0]["ingredient_id"]
        .as_i64()
        .expect("ingredient id");

    let more_rice = format!("id={}:300:{}", rice_id, unit_id);
    let peas = format!("name=peas:50:{}", unit_id);
    let updated = env.json(&[
        "recipe", "update", &recipe_id, "--name", "rice and peas", "--portion", "3",
        "--ingredient", &more_rice, "--ingredient", &peas,
    ]);
    assert_eq!(updated["recipe"]["name"], "rice and peas");
    assert_eq!(updated["ingredients"].as_array().map(Vec::len), Some(2));
    assert_eq!(updated["ingredients"][0]["amount"], 300.0);

    let removed = env.run(&["recipe", "remove-ingredient", &recipe_id, &rice_id.to_string()]);
    assert!(removed.status.success());
    let shown = env.json(&["recipe", "show", &recipe_id]);
    assert_eq!(shown["ingredients"].as_array().map(Vec::len), Some(1));
    assert_eq!(shown["ingredients"][0]["name"], "peas");
}

#[test]
fn test_failures_map_to_exit_codes() {
    let env = initialized();
    let author = env.json(&["user", "add", "chef"])["id"]
        .as_str()
        .expect("user id")
        .to_string();

    let missing = env.run(&["recipe", "show", "999"]);
    assert_eq!(missing.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&missing.stderr).contains("Recipe 999 not found"));

    // Unit 42 does not exist; nothing from the recipe may persist.
    let bad_unit = env.run(&[
        "recipe", "create", "--name", "stew", "--author", &author, "--portion", "2",
        "--ingredient", "name=beef:1:42",
    ]);
    assert_eq!(bad_unit.status.code(), Some(3));
    let found = env.json(&["ingredient", "search", "beef"]);
    assert_eq!(found.as_array().map(Vec::len), Some(0));

    let zero_portion = env.run(&[
        "recipe", "create", "--name", "stew", "--author", &author, "--portion", "0",
    ]);
    assert_eq!(zero_portion.status.code(), Some(2));

    let bad_line = env.run(&[
        "recipe", "create", "--name", "stew", "--author", &author, "--portion", "1",
        "--ingredient", "beef",
    ]);
    assert_eq!(bad_line.status.code(), Some(2));
}

#[test]
fn test_db_flag_overrides_config() {
    let env = initialized();
    let other = env.home.join("other.db");
    let other_str = other.to_string_lossy().to_string();

    let init = env.run(&["--db", &other_str, "init", "--force"]);
    assert!(init.status.success());
    assert!(other.exists());

    let unit = env.json(&["--db", &other_str, "unit", "add", "cup"]);
    assert_eq!(unit["name"], "cup");

    let units = env.json(&["unit", "list"]);
    assert_eq!(units.as_array().map(Vec::len), Some(1));
}

#[test]
fn test_completions_are_generated() {
    let env = Env::new();
    let output = env.run(&["completions", "bash"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("grocer"));
}

#[test]
fn test_list_and_delete_recipes_and_schedules() {
    let env = initialized();
    let unit_id = env.json(&["unit", "add", "piece"])["id"]
        .as_i64()
        .expect("unit id");
    let author = env.json(&["user", "add", "chef"])["id"]
        .as_str()
        .expect("user id")
        .to_string();

    let leek = format!("name=leek:1:{}", unit_id);
    let bread = format!("name=bread:1:{}", unit_id);
    let soup_id = env.json(&[
        "recipe", "create", "--name", "soup", "--author", &author, "--portion", "2",
        "--ingredient", &leek,
    ])["recipe"]["id"]
        .as_i64()
        .expect("recipe id");
    let toast_id = env.json(&[
        "recipe", "create", "--name", "toast", "--author", &author, "--portion", "1",
        "--ingredient", &bread,
    ])["recipe"]["id"]
        .as_i64()
        .expect("recipe id");

    let recipes = env.json(&["recipe", "list"]);
    assert_eq!(recipes.as_array().map(Vec::len), Some(2));
    assert_eq!(recipes[0]["name"], "soup");

    let generated = env.json(&[
        "groceries",
        "generate",
        "--recipe",
        &format!("{}:2", soup_id),
        "--recipe",
        &format!("{}:1", toast_id),
    ]);
    let schedule_id = generated["schedule"]["id"].as_i64().expect("schedule id");

    let trimmed = env.json(&[
        "groceries",
        "remove-recipe",
        &schedule_id.to_string(),
        &toast_id.to_string(),
    ]);
    assert_eq!(trimmed["recipes"].as_array().map(Vec::len), Some(1));
    assert_eq!(trimmed["groceries"][0]["name"], "leek");

    let deleted = env.run(&["recipe", "delete", &soup_id.to_string()]);
    assert!(deleted.status.success());
    let again = env.run(&["recipe", "delete", &soup_id.to_string()]);
    assert_eq!(again.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&again.stderr).contains("grocer recipe list"));

    let found = env.json(&["ingredient", "search", "leek"]);
    assert_eq!(found.as_array().map(Vec::len), Some(1));

    let schedules = env.json(&["groceries", "list"]);
    assert_eq!(schedules.as_array().map(Vec::len), Some(1));
    assert!(env
        .run(&["groceries", "delete", &schedule_id.to_string()])
        .status
        .success());
    let schedules = env.json(&["groceries", "list"]);
    assert_eq!(schedules.as_array().map(Vec::len), Some(0));
}
