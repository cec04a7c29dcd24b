use std::sync::Arc;
use xpcurve::*;

fn linear(step: i64) -> Progression {
    Progression::new(LinearFormula::new(step).unwrap())
}

/// The reference run: e / 100, level 3 floor is 300.
#[test]
fn test_reference_floor() {
    let progression = Progression::new(|e: i64| (e / 100) as f64);
    assert_eq!(progression.experience_for_level(3).unwrap(), 300);
}

/// Integer division gives 3.0 at 350 experience, so the level is 3.
#[test]
fn test_level_after_add() {
    let progression = Progression::new(|e: i64| (e / 100) as f64)
        .add_experience(350)
        .unwrap();
    assert_eq!(progression.level().unwrap(), 3);
    assert_eq!(progression.expected_level(350).unwrap(), 3.0);
}

/// Floors round-trip through the formula and nothing below them reaches the level.
#[test]
fn test_floor_round_trip() {
    let formulas: Vec<Arc<dyn LevelFormula>> = vec![
        Arc::new(LinearFormula::new(100).unwrap()),
        Arc::new(LinearFormula::new(1).unwrap()),
        Arc::new(PowerFormula::new(25.0, 1.5).unwrap()),
        Arc::new(TableFormula::new(vec![10, 35, 90, 200, 1_000, 50_000]).unwrap()),
    ];

    for formula in formulas {
        let progression = Progression::with_shared_formula(formula.clone());
        for level in 0..=6 {
            let floor = progression.experience_for_level(level).unwrap();
            assert!(floor >= 0);
            assert_eq!(
                formula.level_at(floor).round() as i64,
                level,
                "{} level {}",
                formula.describe(),
                level
            );
            if floor > 0 {
                assert!(formula.level_at(floor - 1) < level as f64);
            }
        }
    }
}

#[test]
fn test_floors_are_monotonic() {
    let progression = Progression::new(PowerFormula::new(100.0, 2.0).unwrap());
    let floors: Vec<i64> = (0..30)
        .map(|level| progression.experience_for_level(level).unwrap())
        .collect();
    assert!(floors.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(floors[5], 2_500);
}

/// Power curve floors stay exact at high levels.
#[test]
fn test_set_level_on_steep_power_curve() {
    let progression = Progression::new(PowerFormula::new(100.0, 2.0).unwrap());
    let hero = progression.set_level(6_000_000).unwrap();
    assert_eq!(hero.experience(), 3_600_000_000_000_000);
    assert_eq!(hero.level().unwrap(), 6_000_000);
    assert_eq!(hero.remove_experience(1).unwrap().level().unwrap(), 5_999_999);
}

#[test]
fn test_reset_is_idempotent() {
    let progression = linear(100).add_experience(777).unwrap();
    let once = progression.reset_experience_to_current_level().unwrap();
    let twice = once.reset_experience_to_current_level().unwrap();
    assert_eq!(once.experience(), 700);
    assert_eq!(twice.experience(), once.experience());
}

#[test]
fn test_negative_add_leaves_original() {
    let progression = linear(100).add_experience(42).unwrap();
    let err = progression.add_experience(-5).unwrap_err();
    assert_eq!(
        err,
        ProgressionError::InvalidArgument {
            name: "amount",
            value: -5
        }
    );
    assert_eq!(progression.experience(), 42);
}

#[test]
fn test_negative_arguments_rejected() {
    let progression = linear(100);
    assert!(progression.remove_experience(-1).unwrap_err().is_invalid_argument());
    assert!(progression.set_level(-1).unwrap_err().is_invalid_argument());
    assert!(progression
        .experience_from_current_to_level(-2)
        .unwrap_err()
        .is_invalid_argument());
    assert!(progression.expected_level(-10).unwrap_err().is_invalid_argument());
}

#[test]
fn test_non_negativity_across_sequences() {
    let mut progression = linear(50);
    let steps: [(char, i64); 8] = [
        ('+', 120),
        ('-', 20),
        ('L', 5),
        ('-', 250),
        ('+', 1),
        ('-', 2),
        ('L', 0),
        ('-', 1),
    ];

    for (op, amount) in steps {
        let next = match op {
            '+' => progression.add_experience(amount),
            '-' => progression.remove_experience(amount),
            _ => progression.set_level(amount),
        };
        match next {
            Ok(next) => {
                assert!(next.experience() >= 0);
                progression = next;
            }
            Err(err) => assert!(err.is_internal(), "unexpected {:?}", err),
        }
    }
    assert_eq!(progression.experience(), 0);
}

#[test]
fn test_remove_exact_balance() {
    let progression = linear(10).add_experience(30).unwrap();
    assert_eq!(progression.remove_experience(30).unwrap().experience(), 0);
    assert!(progression.remove_experience(31).unwrap_err().is_internal());
}

#[test]
fn test_set_level_zero() {
    let progression = linear(100).add_experience(999).unwrap();
    let zero = progression.set_level(0).unwrap();
    assert_eq!(zero.experience(), progression.experience_for_level(0).unwrap());
    assert_eq!(zero.experience(), 0);
}

#[test]
fn test_set_level_lands_on_floor() {
    let progression = linear(100).set_level(12).unwrap();
    assert_eq!(progression.experience(), 1_200);
    assert_eq!(progression.level().unwrap(), 12);
    assert_eq!(progression.experience_until_level_up().unwrap(), 100);
    assert_eq!(progression.percentage_until_level_up().unwrap(), 92);
}

#[test]
fn test_percentage_bounds() {
    let mut progression = linear(100);
    for _ in 0..40 {
        let percent = progression.percentage_until_level_up().unwrap();
        assert!((0..=100).contains(&percent));
        progression = progression.add_experience(37).unwrap();
    }
}

#[test]
fn test_percentage_modes() {
    let fractional = linear(100).add_experience(350).unwrap();
    assert_eq!(fractional.percentage_until_level_up().unwrap(), 87);

    let config = ProgressionConfig {
        percentage: PercentageMode::Truncated,
        ..ProgressionConfig::default()
    };
    let truncated = Progression::builder()
        .formula(LinearFormula::new(100).unwrap())
        .config(config)
        .experience(350)
        .build()
        .unwrap();
    assert_eq!(truncated.percentage_until_level_up().unwrap(), 0);
}

#[test]
fn test_experience_from_current_to_level() {
    let progression = linear(100).add_experience(350).unwrap();
    assert_eq!(progression.experience_from_current_to_level(2).unwrap(), 150);
    assert_eq!(progression.experience_from_current_to_level(5).unwrap(), -150);
}

#[test]
fn test_half_level_formula_skips_next_level() {
    // Only half levels exist: 150 xp rounds to level 2, but 3.0 is never hit.
    let progression = Progression::with_experience(|e: i64| (e / 100) as f64 + 0.5, 150).unwrap();
    assert_eq!(progression.level().unwrap(), 2);
    assert!(matches!(
        progression.experience_for_level(3),
        Err(ProgressionError::LevelSkipped { level: 3, .. })
    ));
}

#[test]
fn test_config_driven_progression() {
    let config = ProgressionConfig::from_json(
        r#"{
            "formula": { "kind": "power", "base": 100.0, "exponent": 2.0 },
            "search": { "max_experience": 100000 }
        }"#,
    )
    .unwrap();
    let progression = Progression::from_config(&config).unwrap();
    assert_eq!(progression.set_level(31).unwrap().experience(), 96_100);
    assert!(matches!(
        progression.set_level(32),
        Err(ProgressionError::LevelUnreachable { level: 32, .. })
    ));
}

#[test]
fn test_report() {
    let progression = Progression::new(TableFormula::new(vec![100, 300, 600]).unwrap())
        .add_experience(450)
        .unwrap();
    let report = progression.report().unwrap();
    assert_eq!(report.level, 2);
    assert_eq!(report.level_floor, 300);
    assert_eq!(report.next_level_floor, 600);
    assert_eq!(report.experience_until_level_up, 150);
    assert_eq!(report.percentage_until_level_up, 75);
    assert_eq!(report.experience_into_level(), 150);
}

#[test]
fn test_report_at_max_table_level_fails() {
    let progression = Progression::new(TableFormula::new(vec![100]).unwrap())
        .add_experience(150)
        .unwrap();
    assert_eq!(progression.level().unwrap(), 1);
    assert!(progression.report().is_err());
}

#[test]
fn test_shared_across_threads() {
    let progression = linear(100).add_experience(250).unwrap();
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let progression = progression.clone();
            std::thread::spawn(move || progression.add_experience(i * 100).unwrap().level().unwrap())
        })
        .collect();
    let levels: Vec<i64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(levels, vec![2, 3, 4, 5]);
    assert_eq!(progression.experience(), 250);
}
