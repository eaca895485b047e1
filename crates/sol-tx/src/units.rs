use crate::constants::{LAMPORTS_PER_SOL, SOL_FLOATING_PRECISION};

/// Convert SOL to lamports, truncating toward zero.
pub fn sol_to_lamports(sol: f64) -> i64 {
    (sol * LAMPORTS_PER_SOL as f64) as i64
}

/// Convert lamports to SOL, cut to 9 fractional digits.
pub fn lamports_to_sol(lamports: i64) -> f64 {
    let sol = lamports as f64 / LAMPORTS_PER_SOL as f64;
    format!("{sol:.SOL_FLOATING_PRECISION$}")
        .parse()
        .unwrap_or(sol)
}
