//! Level curve example: pick a formula, inspect floors, walk a character.
//!
//! This example demonstrates:
//! - Selecting a formula from JSON configuration
//! - Inverting it to find level floors
//! - Chaining immutable transitions
//!
//! Run with `RUST_LOG=debug` to see search and transition logs.

use xpcurve::*;

fn main() -> Result<(), ProgressionError> {
    env_logger::init();

    // Closure formula, as an external caller would supply it
    let progression = Progression::new(|experience: i64| (experience / 100) as f64);
    println!("Experience for level 3: {}", progression.experience_for_level(3)?);

    // Formula selected from configuration
    let config = ProgressionConfig::from_json(
        r#"{
            "formula": { "kind": "power", "base": 100.0, "exponent": 2.0 },
            "percentage": "fractional"
        }"#,
    )?;
    let start = Progression::from_config(&config)?;

    println!("\n=== Level Floors ({}) ===", start.formula().describe());
    for level in 0..=10 {
        println!("  Level {:>2}: {:>6} xp", level, start.experience_for_level(level)?);
    }

    println!("\n=== Progression ===");
    let hero = start.add_experience(1_250)?;
    println!("After quest:   {}", hero.report()?);

    let hero = hero.add_experience(800)?;
    println!("After boss:    {}", hero.report()?);

    let hero = hero.remove_experience(300)?;
    println!("After death:   {}", hero.report()?);

    let hero = hero.reset_experience_to_current_level()?;
    println!("After reset:   {}", hero.report()?);

    let hero = hero.set_level(8)?;
    println!("After set 8:   {}", hero.report()?);

    // Invalid input is rejected without touching the snapshot
    match hero.add_experience(-5) {
        Ok(_) => println!("\nunexpected success"),
        Err(err) => println!("\nRejected: {} (still {} xp)", err, hero.experience()),
    }

    Ok(())
}
