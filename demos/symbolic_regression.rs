//! Symbolic regression demo
//!
//! Recovers `x0 * x0 + 2 * x1` from noiseless samples and prints the best
//! program, simplified, with feature names.
//!
//! Run with `RUST_LOG=info` to see per-generation scores.

use koza::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn main() -> GpResult<()> {
    env_logger::init();

    let rows: Vec<Vec<f64>> = (0..60)
        .map(|i| {
            let a = (i % 12) as f64 / 3.0 - 2.0;
            let b = (i / 12) as f64 - 2.0;
            vec![a, b]
        })
        .collect();
    let targets: Vec<f64> = rows.iter().map(|r| r[0] * r[0] + 2.0 * r[1]).collect();

    let data = Dataset::new(rows, targets)?.with_names(vec!["a".into(), "b".into()], "y");
    let train = data.sample(45, &mut StdRng::seed_from_u64(0))?;

    let mut gp = GpConfig::new()
        .with_loss_metric("mse")
        .with_eval_metric("r2")
        .with_functions("sum,sub,mul,div")
        .with_population_size(300)
        .with_generations(40)
        .with_parsimony(0.001)
        .with_seed(42)
        .build()?;
    gp.fit_dataset(&train, Some(&data), true)?;

    let best = gp.best_program()?;
    let simplified = best.root.clone().simplify();
    println!("best program: {}", best.root);
    println!("simplified:   {}", simplified.display_with_names(data.x_names()));
    println!("d/da:         {}", simplified.diff(0).simplify().display_with_names(data.x_names()));
    println!("fitness:      {:.6}", gp.best_fitness().unwrap_or(f64::INFINITY));
    println!("f(1, 1) =     {:.4}", gp.predict_partial(&[1.0, 1.0], false)?);
    Ok(())
}
