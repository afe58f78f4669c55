#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Run-position encoding.
//!
//! Each cell `j` of a line carries a progress counter `c_j` that counts the
//! filled cells seen so far plus the number of runs already closed. With
//! hints `h_1..h_k`, the run `i` ends exactly when the counter reaches the
//! breakpoint
//!
//! ```text
//! b_i = h_1 + ... + h_i + (i - 1)
//! ```
//!
//! and the value `b_k + 1` marks a finished line. A counter steps by one on
//! every filled cell and on the first empty cell after a run; otherwise it
//! holds. The clauses say:
//!
//! - `c_0` is 1 when the first cell is filled and 0 otherwise;
//! - `c_j = c_{j-1} + 1` if `x_j` or `x_{j-1}` is filled, else `c_j = c_{j-1}`;
//! - a run may only end (filled followed by empty) on a breakpoint;
//! - a filled cell never sits on a gap value `b_i + 1` (nor on `b_k + 1`);
//! - the line finishes at `b_k` when the last cell is filled, at `b_k + 1`
//!   otherwise.
//!
//! The gap-value clause is what stops a run from swallowing the separating
//! cell and continuing into the next run's budget: without it `[1, 1, 1]`
//! would also accept `#.###`, whose counter path passes through the same
//! breakpoints.
//!
//! Counters use the order encoding from [`OrderVar`], so every comparison
//! above is a two-literal disjunction and the clause count per line is
//! `O(length * (b_k + 1))`, independent of slack. Counted as constraints over
//! integer counters the encoding is linear in the line length, but as CNF
//! each counter carries `b_k + 1` threshold variables, and `b_k` grows with
//! the line. A line that is mostly filled therefore costs clauses quadratic
//! in its length.

use crate::encoding::LineEncoder;
use crate::nonogram::error::NonogramError;
use crate::nonogram::puzzle::line_slack;
use crate::sat::cnf::Cnf;
use crate::sat::int_var::OrderVar;
use crate::sat::literal::Lit;

/// Counter values at which the runs of `hints` end when packed to the left.
#[must_use]
pub fn breakpoints(hints: &[usize]) -> Vec<usize> {
    let mut filled = 0;
    hints
        .iter()
        .enumerate()
        .map(|(i, &hint)| {
            filled += hint;
            filled + i
        })
        .collect()
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RunPositionEncoder;

impl LineEncoder for RunPositionEncoder {
    fn name(&self) -> &'static str {
        "run-position"
    }

    fn encode_line(&mut self, cnf: &mut Cnf, cells: &[Lit], hints: &[usize]) -> Result<(), NonogramError> {
        line_slack(hints, cells.len())?;

        let breaks = breakpoints(hints);
        let Some(&last) = breaks.last() else {
            for &cell in cells {
                cnf.add_unit(-cell);
            }
            return Ok(());
        };
        let finished = last + 1;

        let mut is_break = vec![false; finished + 1];
        for &b in &breaks {
            is_break[b] = true;
        }
        let gaps: Vec<usize> = breaks.iter().map(|b| b + 1).collect();

        let counters: Vec<OrderVar> = cells.iter().map(|_| OrderVar::new(cnf, finished)).collect();

        let (first, c0) = (cells[0], &counters[0]);
        cnf.add_clause([-first, c0.ge(1)]);
        cnf.add_clause([-first, -c0.ge(2)]);
        cnf.add_clause([first, -c0.ge(1)]);

        for j in 1..cells.len() {
            let (prev, cur) = (&counters[j - 1], &counters[j]);
            let (x_prev, x_cur) = (cells[j - 1], cells[j]);

            // step
            for v in 0..=finished {
                for x in [x_cur, x_prev] {
                    cnf.add_clause([-x, -prev.ge(v), cur.ge(v + 1)]);
                    cnf.add_clause([-x, prev.ge(v), -cur.ge(v + 1)]);
                }
            }
            // hold
            for v in 1..=finished {
                cnf.add_clause([x_cur, x_prev, -prev.ge(v), cur.ge(v)]);
                cnf.add_clause([x_cur, x_prev, prev.ge(v), -cur.ge(v)]);
            }
            // a run ending at j - 1 must end on a breakpoint
            for v in (0..=finished).filter(|&v| !is_break[v]) {
                let [below, above] = prev.ne_lits(v);
                cnf.add_clause([-x_prev, x_cur, below, above]);
            }
        }

        for (&cell, counter) in cells.iter().zip(&counters) {
            for &gap in &gaps {
                let [below, above] = counter.ne_lits(gap);
                cnf.add_clause([-cell, below, above]);
            }
        }

        let (x_last, c_last) = (cells[cells.len() - 1], &counters[cells.len() - 1]);
        cnf.add_clause([-x_last, c_last.ge(last)]);
        cnf.add_clause([-x_last, -c_last.ge(finished)]);
        cnf.add_clause([x_last, c_last.ge(finished)]);

        log::trace!(
            "run-position {hints:?}/{}: breakpoints {breaks:?}, {} counter thresholds",
            cells.len(),
            cells.len() * finished
        );
        Ok(())
    }
}
