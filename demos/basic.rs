//! Basic example of using the dungeon puzzle engine

use dungeon_core::{
    classify, EditablePuzzle, Rules, SolvablePuzzle, TargetMode, Tile, Validator,
};

const VAULT: &str = r#"{
    "name": "Vault",
    "rowTargets": [6, 3, 3, 1, 6],
    "colTargets": [5, 2, 2, 2, 4, 4],
    "tiles": [
        "......",
        ".💎....",
        "......",
        ".....👾",
        "......"
    ]
}"#;

const SOLUTION: [&str; 5] = ["------", "-t..--", "-...--", "-....m", "------"];

fn main() {
    // Load a puzzle from JSON
    let mut puzzle = match SolvablePuzzle::from_json(VAULT) {
        Ok(puzzle) => puzzle,
        Err(err) => {
            eprintln!("Could not load puzzle: {}", err);
            return;
        }
    };
    println!("Loaded \"{}\":", puzzle.name());
    println!("{}", puzzle);

    // Check it before doing anything
    let verdict = puzzle.is_solved();
    println!("Solved? {} ({})\n", verdict.solved, verdict.reason);

    // Play: place the walls of the solution
    for (row, line) in SOLUTION.iter().enumerate() {
        for (col, symbol) in line.chars().enumerate() {
            if symbol == '-' {
                puzzle.set_tile(row as isize, col as isize, Tile::wall());
            }
        }
    }
    println!("After placing walls:");
    println!("{}", puzzle);

    let verdict = puzzle.is_solved();
    println!("Solved? {} ({})", verdict.solved, verdict.reason);
    for check in &verdict.unchecked {
        println!("  not checked: {}", check);
    }

    let full = Validator::with_rules(Rules::Full).is_solved(&puzzle);
    println!("With full rules: {} ({})\n", full.solved, full.reason);

    // Fixed tiles can't be overwritten while solving
    let moved = puzzle.set_tile(1, 1, Tile::floor());
    println!("Overwrite the treasure while solving: {}", moved);

    // Author a new puzzle
    println!("\n--- Authoring ---\n");
    let mut draft = match EditablePuzzle::new("Draft", vec![0; 3], vec![0; 3]) {
        Ok(draft) => draft,
        Err(err) => {
            eprintln!("{}", err);
            return;
        }
    };
    for symbol in ["🧱", "#", "🧱"] {
        println!("{:?} classifies as {}", symbol, classify(symbol));
    }
    draft.set_tile(1, 0, Tile::from_glyph("🧱"));
    draft.set_tile(1, 1, Tile::from_glyph("#"));
    let placed = draft.update_monsters(0, 0, 3, 3, Some("🐉"));
    println!("Placed or removed {} monsters", placed);
    if let Err(err) = draft.resize_by(1, 0, TargetMode::Recount) {
        eprintln!("{}", err);
    }
    println!("{}", draft);

    match draft.into_solvable().to_data().to_json_pretty() {
        Ok(json) => println!("{}", json),
        Err(err) => eprintln!("{}", err),
    }
}
