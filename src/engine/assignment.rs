//! engine::assignment
//!
//! Minimum-cost perfect assignment on a square cost matrix (Hungarian
//! method with row and column potentials, `O(n³)`).

/// Cost and row-to-column assignment of a minimum-cost perfect matching.
///
/// `cost` must be square with finite entries.
pub(crate) fn min_cost_assignment(cost: &[Vec<f64>]) -> (f64, Vec<usize>) {
    let n = cost.len();
    if n == 0 {
        return (0.0, Vec::new());
    }

    // 1-based; row 0 and column 0 are sentinels.
    let mut row_potential = vec![0.0; n + 1];
    let mut col_potential = vec![0.0; n + 1];
    let mut owner = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for row in 1..=n {
        owner[0] = row;
        let mut col = 0;
        let mut slack = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[col] = true;
            let current = owner[col];
            let mut delta = f64::INFINITY;
            let mut next = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[current - 1][j - 1] - row_potential[current] - col_potential[j];
                if reduced < slack[j] {
                    slack[j] = reduced;
                    way[j] = col;
                }
                if slack[j] < delta {
                    delta = slack[j];
                    next = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    row_potential[owner[j]] += delta;
                    col_potential[j] -= delta;
                } else {
                    slack[j] -= delta;
                }
            }
            col = next;
            if owner[col] == 0 {
                break;
            }
        }

        // Flip the augmenting path.
        while col != 0 {
            let prev = way[col];
            owner[col] = owner[prev];
            col = prev;
        }
    }

    let mut assignment = vec![0; n];
    for j in 1..=n {
        assignment[owner[j] - 1] = j - 1;
    }
    let total = assignment
        .iter()
        .enumerate()
        .map(|(i, &j)| cost[i][j])
        .sum();
    (total, assignment)
}
