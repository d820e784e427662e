//! Seeded randomized round-trips: apply a random statement to a random
//! document, undo the returned diff, and require the pre-pass snapshot back.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde_json::{json, Map, Value};

use json_state_update::{undo, update, MergeStatement, Statement};

fn random_scalar(rng: &mut Xoshiro256StarStar) -> Value {
    match rng.gen_range(0..4) {
        0 => Value::Null,
        1 => json!(rng.gen_bool(0.5)),
        2 => json!(rng.gen_range(-100i64..100)),
        _ => json!(format!("s{}", rng.gen_range(0..10))),
    }
}

fn random_doc(rng: &mut Xoshiro256StarStar, depth: u8) -> Value {
    let mut map = Map::new();
    for i in 0..rng.gen_range(1..5) {
        let key = format!("k{i}");
        let value = if depth > 0 && rng.gen_bool(0.4) {
            random_doc(rng, depth - 1)
        } else if rng.gen_bool(0.2) {
            json!([rng.gen_range(0..9), rng.gen_range(0..9)])
        } else {
            random_scalar(rng)
        };
        map.insert(key, value);
    }
    Value::Object(map)
}

fn random_statement(rng: &mut Xoshiro256StarStar, doc: &Value, depth: u8) -> MergeStatement {
    let mut level = MergeStatement::new();
    if let Value::Object(map) = doc {
        for (key, value) in map {
            match rng.gen_range(0..6) {
                0 => {}
                1 => {
                    level = level.entry(key.clone(), Statement::set(random_scalar(rng)));
                }
                2 => {
                    level = level.entry(
                        key.clone(),
                        Statement::replace(json!({"r": rng.gen_range(0..9)})),
                    );
                }
                3 => {
                    level = level.entry(key.clone(), Statement::delete());
                }
                _ => {
                    if value.is_object() && depth > 0 {
                        level = level
                            .entry(key.clone(), random_statement(rng, value, depth - 1).into());
                    } else if let Value::Array(arr) = value {
                        // Index entries, including the boundary index, which
                        // appends; a second entry past it lands in range only
                        // after that append happened.
                        let index = rng.gen_range(0..=arr.len());
                        let mut sub = MergeStatement::new()
                            .entry(index.to_string(), Statement::set(random_scalar(rng)));
                        if rng.gen_bool(0.3) {
                            sub = sub.entry(
                                (arr.len() + 1).to_string(),
                                Statement::set(random_scalar(rng)),
                            );
                        }
                        level = level.entry(key.clone(), sub.into());
                    }
                }
            }
        }
    }
    if rng.gen_bool(0.3) {
        level = level.entry(format!("new{}", rng.gen_range(0..3)), Statement::set(1));
    }
    level
}

#[test]
fn seeded_undo_restores_snapshot() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0xA11CE);
    for round in 0..500 {
        let mut data = random_doc(&mut rng, 3);
        let snapshot = data.clone();
        let statement = random_statement(&mut rng, &data, 3);
        if let Some(diff) = update(&mut data, &statement) {
            undo(&mut data, &diff);
        }
        assert_eq!(data, snapshot, "round {round} failed to round-trip");
    }
}

#[test]
fn seeded_two_statements_one_diff() {
    // Two statements threaded through one diff must still undo as one pass.
    let mut rng = Xoshiro256StarStar::seed_from_u64(0xBEEF);
    for round in 0..200 {
        let mut data = random_doc(&mut rng, 2);
        let snapshot = data.clone();
        let first = random_statement(&mut rng, &data, 2);
        let second = random_statement(&mut rng, &data, 2);
        let mut diff = json_state_update::Diff::new();
        json_state_update::update_into(&mut data, &first, &mut diff);
        json_state_update::update_into(&mut data, &second, &mut diff);
        undo(&mut data, &diff);
        assert_eq!(data, snapshot, "round {round} failed to round-trip");
    }
}
