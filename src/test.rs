#[cfg(test)]
pub mod test {
    use anyhow::{anyhow, Result};

    use crate::coloring::{ColoringClimb, FewestColors, Graph, GraphColoring, CYCLE_8};
    use crate::csp::Strategy;
    use crate::hanoi::{Hanoi, Towers};
    use crate::knight::{self, KnightsTour, A_STAR_STATE_CAP, BACKTRACK_NODE_BUDGET};
    use crate::puzzles;
    use crate::queens::{self, Queens, QueensClimb};
    use crate::report::{Comparison, Run};
    use crate::search::*;
    use crate::SEED;

    use std::time::Duration;

    #[test]
    pub fn csp_puzzles() -> Result<()> {
        let inequalities = puzzles::inequalities()?;
        let scheduling = puzzles::scheduling()?;
        let australia = puzzles::australia()?;
        let four_queens = puzzles::four_queens()?;

        // every strategy must agree on the answer
        for &strategy in Strategy::ALL.iter() {
            let label = strategy.label();

            let values = inequalities
                .solve(strategy)
                .assignment
                .ok_or_else(|| anyhow!("{} found no X < Y < Z", label))?;
            assert_eq!(inequalities.describe(&values, &["X", "Y", "Z"])?, "X=1, Y=2, Z=3");

            let values = scheduling
                .solve(strategy)
                .assignment
                .ok_or_else(|| anyhow!("{} found no schedule", label))?;
            assert_eq!(scheduling.describe(&values, &["A", "B", "C"])?, "A=1, B=2, C=3");

            let values = australia
                .solve(strategy)
                .assignment
                .ok_or_else(|| anyhow!("{} found no map colouring", label))?;
            assert_eq!(
                australia.describe(&values, &["SA", "NT", "Q"])?,
                "SA=Blue, NT=Green, Q=Red"
            );

            let values = four_queens
                .solve(strategy)
                .assignment
                .ok_or_else(|| anyhow!("{} found no queens", label))?;
            assert_eq!(values, vec![1, 3, 0, 2]);
        }
        Ok(())
    }

    #[test]
    pub fn csp_inference() -> Result<()> {
        // forward checking never tries more values than plain backtracking
        let csp = puzzles::four_queens()?;
        let plain = csp.solve(Strategy::BACKTRACKING).nodes;
        let checked = csp.solve(Strategy::FORWARD_CHECKING).nodes;
        assert!(checked <= plain);

        // a pre-assignment outside the domain is refused
        let mut csp = puzzles::inequalities()?;
        assert!(csp.assign("X", 7).is_err());
        assert!(csp.assign("W", 1).is_err());
        assert!(csp.constrain("X", "X", |a, b| a == b).is_err());

        // arc consistency alone pins X < Y < Z down
        let mut domains = csp.domains().to_vec();
        assert!(csp.ac3(&mut domains));
        assert_eq!(domains, vec![vec![1], vec![2], vec![3]]);

        // and finds that Z = 2 leaves no room for X
        let mut domains = csp.domains().to_vec();
        domains[2] = vec![2];
        assert!(!csp.ac3(&mut domains));
        Ok(())
    }

    #[test]
    pub fn csp_unsatisfiable() -> Result<()> {
        let mut csp = puzzles::inequalities()?;
        csp.assign("Z", 1)?;
        for &strategy in Strategy::ALL.iter() {
            assert!(csp.solve(strategy).assignment.is_none());
        }
        Ok(())
    }

    #[test]
    pub fn queens_counts() -> Result<()> {
        let expected = [(1, 1), (2, 0), (3, 0), (4, 2), (6, 4), (8, 92)];
        for &(size, count) in expected.iter() {
            let puzzle = Queens::new(size)?;
            assert_eq!(puzzle.count_solutions(), count, "N={}", size);
            assert_eq!(puzzle.count_solutions_parallel(), count, "N={}", size);
        }
        assert!(Queens::new(0).is_err());
        assert!(Queens::new(queens::MAX_SIZE + 1).is_err());
        Ok(())
    }

    #[test]
    pub fn backtracking_budget() -> Result<()> {
        let puzzle = Queens::new(8)?;

        // running out of nodes means nothing was found, even mid-count
        let result = backtrack(&puzzle, Mode::All, 200);
        assert!(result.exhausted);
        assert!(!result.found());
        assert!(result.first.is_none());
        assert!(result.solutions < 92);

        let result = backtrack(&puzzle, Mode::First, 5);
        assert!(result.exhausted);
        assert!(!result.found());

        let result = backtrack(&puzzle, Mode::All, usize::MAX);
        assert!(!result.exhausted);
        assert!(result.found());
        assert_eq!(result.solutions, 92);
        Ok(())
    }

    #[test]
    pub fn queens_searches() -> Result<()> {
        let puzzle = Queens::new(6)?;
        for outcome in [
            breadth_first(&puzzle, Limits::UNBOUNDED),
            depth_first(&puzzle, Limits::UNBOUNDED),
            a_star(&puzzle, Limits::UNBOUNDED),
        ]
        .iter()
        {
            let board = outcome.goal().ok_or_else(|| anyhow!("no board found"))?;
            assert_eq!(board.len(), 6);
            assert_eq!(queens::conflicts(board), 0);
        }

        // depth-first placement tries columns left to right
        let first = backtrack(&Queens::new(4)?, Mode::First, usize::MAX)
            .first
            .and_then(|path| path.last().cloned());
        assert_eq!(first, Some(vec![1, 3, 0, 2]));
        let table = queens::compare(&Queens::new(4)?)?.render();
        let row = table
            .lines()
            .find(|line| line.contains("DFS (first solution)"))
            .ok_or_else(|| anyhow!("no DFS row"))?;
        assert!(row.contains(" Yes |"));

        assert!(QueensClimb::seeded(0, SEED).is_err());
        assert!(QueensClimb::seeded(queens::MAX_SIZE + 1, SEED).is_err());

        let climber = QueensClimb::seeded(8, SEED)?;
        let mut columns = climber.start().to_vec();
        columns.sort();
        assert_eq!(columns, (0..8).collect::<Vec<u8>>());

        let climb = hill_climb(&climber, queens::CLIMB_CAP);
        assert_eq!(climb.score, queens::conflicts(&climb.state));
        assert_eq!(climb.found, climb.score == 0);
        Ok(())
    }

    #[test]
    pub fn knight_tours() -> Result<()> {
        let puzzle = KnightsTour::new(5, (0, 0))?;
        let result = backtrack(&puzzle, Mode::First, BACKTRACK_NODE_BUDGET);
        let path = result.first.ok_or_else(|| anyhow!("no 5x5 tour found"))?;
        assert!(puzzle.is_valid_tour(&knight::squares(&path)));

        let outcome = a_star(&puzzle, Limits::states(A_STAR_STATE_CAP));
        let path = outcome.path.ok_or_else(|| anyhow!("A* found no 5x5 tour"))?;
        assert!(puzzle.is_valid_tour(&knight::squares(&path)));

        // no tour exists on 4x4
        let small = KnightsTour::new(4, (0, 0))?;
        let result = backtrack(&small, Mode::First, BACKTRACK_NODE_BUDGET);
        assert!(!result.found());
        assert!(!result.exhausted);

        let single = KnightsTour::new(1, (0, 0))?;
        assert!(backtrack(&single, Mode::First, 10).found());
        Ok(())
    }

    #[test]
    pub fn knight_limits() -> Result<()> {
        assert!(KnightsTour::new(0, (0, 0)).is_err());
        assert!(KnightsTour::new(knight::MAX_SIZE + 1, (0, 0)).is_err());
        assert!(KnightsTour::new(5, (5, 0)).is_err());

        let puzzle = KnightsTour::new(5, (0, 0))?;
        let outcome = breadth_first(&puzzle, Limits::states(10_000));
        assert!(!outcome.found());
        assert!(outcome.exhausted);

        // a broken path is not a tour
        assert!(!puzzle.is_valid_tour(&[0, 1]));
        Ok(())
    }

    #[test]
    pub fn knight_warnsdorff() -> Result<()> {
        let puzzle = KnightsTour::new(6, (0, 0))?;
        let climb = hill_climb(&puzzle, 36);
        // every jump lowers the heuristic, so the climb only stops when stuck
        assert!(climb.state.length() >= 2);
        assert_eq!(climb.found, climb.state.length() == 36);
        assert_eq!(puzzle.onward_moves(0, 1), 2);
        Ok(())
    }

    #[test]
    pub fn hanoi_optimal_moves() -> Result<()> {
        let three = Hanoi::new(3, 3)?;
        let outcome = breadth_first(&three, Limits::UNBOUNDED);
        assert_eq!(outcome.path.map(|path| path.len() - 1), Some(7));
        assert_eq!(three.minimum_moves(), Some(7));

        let four = Hanoi::new(4, 4)?;
        let outcome = a_star(&four, Limits::UNBOUNDED);
        assert_eq!(outcome.path.map(|path| path.len() - 1), Some(9));
        assert_eq!(four.minimum_moves(), Some(9));

        assert_eq!(Hanoi::new(4, 9)?.minimum_moves(), Some(41));
        assert_eq!(Hanoi::new(3, 9)?.minimum_moves(), Some(511));
        Ok(())
    }

    #[test]
    pub fn hanoi_recursive_replay() -> Result<()> {
        for &(pegs, disks) in [(3, 5), (4, 9), (5, 7)].iter() {
            let puzzle = Hanoi::new(pegs, disks)?;
            let moves = puzzle
                .recursive()
                .ok_or_else(|| anyhow!("no solution for {} pegs", pegs))?;
            assert_eq!(Some(moves.len() as u64), puzzle.minimum_moves());

            let mut towers: Towers = puzzle.start();
            for &step in moves.iter() {
                towers.apply(step)?;
            }
            assert!(puzzle.is_solved(&towers));
        }
        Ok(())
    }

    #[test]
    pub fn hanoi_edge_cases() -> Result<()> {
        assert!(Hanoi::new(0, 3).is_err());

        let stuck = Hanoi::new(2, 2)?;
        assert_eq!(stuck.recursive(), None);
        assert!(!breadth_first(&stuck, Limits::UNBOUNDED).found());

        // the greedy climb moves the smallest disk across and stalls
        let climb = hill_climb(&Hanoi::new(3, 3)?, 1_000);
        assert!(!climb.found);
        assert_eq!(climb.score, 2);
        Ok(())
    }

    #[test]
    pub fn coloring_cycles() -> Result<()> {
        let puzzle = GraphColoring::new(Graph::from_matrix(&CYCLE_8)?, 3)?;
        let result = backtrack(&puzzle, Mode::First, usize::MAX);
        let colors = result
            .first
            .and_then(|path| path.last().cloned())
            .ok_or_else(|| anyhow!("C8 was not coloured"))?;
        assert_eq!(colors, vec![1, 2, 1, 2, 1, 2, 1, 2]);
        assert!(puzzle.graph().is_proper(&colors));

        let fewest = a_star(&FewestColors(&puzzle), Limits::UNBOUNDED);
        let colors = fewest.goal().ok_or_else(|| anyhow!("no C8 colouring"))?;
        assert_eq!(colors.iter().max(), Some(&2));

        let odd = GraphColoring::new(Graph::cycle(5), 3)?;
        let fewest = a_star(&FewestColors(&odd), Limits::UNBOUNDED);
        let colors = fewest.goal().ok_or_else(|| anyhow!("no C5 colouring"))?;
        assert_eq!(colors.iter().max(), Some(&3));

        let two = GraphColoring::new(Graph::cycle(5), 2)?;
        assert!(!backtrack(&two, Mode::First, usize::MAX).found());
        Ok(())
    }

    #[test]
    pub fn coloring_graphs() -> Result<()> {
        assert!(Graph::from_matrix(&[[0u8, 1], [0, 0]]).is_err());
        assert!(Graph::from_matrix(&[[1u8]]).is_err());
        assert!(Graph::from_matrix(&[vec![0u8, 1], vec![1]]).is_err());
        assert_eq!(Graph::from_matrix(&CYCLE_8)?, Graph::cycle(8));

        let puzzle = GraphColoring::new(Graph::cycle(8), 3)?;
        let climb = hill_climb(&ColoringClimb::seeded(&puzzle, SEED), 100);
        assert_eq!(climb.score, puzzle.graph().conflicts(&climb.state));
        Ok(())
    }

    #[test]
    pub fn comparison_winner() -> Result<()> {
        let mut comparison = Comparison::new("winner", "Nodes");
        let runs = [("slow", 30, true), ("failed", 1, false), ("fast", 10, true), ("tied", 10, true)];
        for &(name, millis, found) in runs.iter() {
            comparison.push(Run {
                name: name.to_string(),
                elapsed: Duration::from_millis(millis),
                found,
                metric: 0,
            });
        }
        let winner = comparison.winner().ok_or_else(|| anyhow!("no winner"))?;
        assert_eq!(winner.name, "fast");

        let table = comparison.render();
        assert!(table.contains("--- winner ---"));
        assert_eq!(table.matches("| failed").count(), 1);

        let empty = Comparison::new("empty", "Nodes");
        assert!(empty.winner().is_none());
        Ok(())
    }
}
