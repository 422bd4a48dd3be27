//! Diagram fixtures and seeded random relabelings.
//!
//! Purpose
//! - Small named diagrams (unknot, theta curve, handcuff, trefoil, figure-eight, Hopf
//!   link) for tests, benches and CLI demos.
//! - Reproducible isomorphic copies (`shuffle`) and random rotation systems
//!   (`random_graph`) for invariance checks.
//!
//! Crossings follow the planar-diagram convention: `[i, j, k, l]` counterclockwise with
//! `i -> k` the under strand.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::StructuralError;
use crate::model::{ArcLabel, Diagram, Direction, NodeKind, NodeSpec};

pub const TREFOIL: [[usize; 4]; 3] = [[1, 5, 2, 4], [3, 1, 4, 6], [5, 3, 6, 2]];
pub const FIGURE_EIGHT: [[usize; 4]; 4] = [[4, 2, 5, 1], [8, 6, 1, 5], [6, 3, 7, 4], [2, 7, 3, 8]];
pub const HOPF: [[usize; 4]; 2] = [[4, 1, 3, 2], [2, 3, 1, 4]];

/// A single free circle.
pub fn unknot() -> Result<Diagram, StructuralError> {
    Diagram::new([NodeSpec::strand(0, 0)])
}

/// One vertex carrying `loops` nested-free loops.
pub fn bouquet(loops: usize) -> Result<Diagram, StructuralError> {
    let arcs = (0..loops).flat_map(|i| [i, i]).collect();
    Diagram::from_rotations(vec![arcs])
}

/// Two vertices joined by three arcs, planar rotations.
pub fn theta() -> Result<Diagram, StructuralError> {
    Diagram::from_rotations(vec![vec![0, 1, 2], vec![2, 1, 0]])
}

/// Two loops joined by a bridge.
pub fn handcuff() -> Result<Diagram, StructuralError> {
    Diagram::from_rotations(vec![vec![0, 0, 2], vec![2, 1, 1]])
}

/// `n` graph vertices on a circle (`n >= 1`).
pub fn cycle(n: usize) -> Result<Diagram, StructuralError> {
    Diagram::from_rotations((0..n).map(|i| vec![(i + n - 1) % n, i]).collect())
}

/// Unoriented crossings from planar-diagram quadruples.
pub fn from_pd(pd: &[[usize; 4]]) -> Result<Diagram, StructuralError> {
    Diagram::new(pd.iter().map(|x| NodeSpec::crossing(*x)))
}

/// Oriented knot from planar-diagram quadruples whose arcs are numbered `1..=n` along
/// the orientation (so arc `x` is followed by `x % n + 1`).
pub fn oriented_knot(pd: &[[usize; 4]]) -> Result<Diagram, StructuralError> {
    let n = pd.len() * 2;
    let succ = |x: usize| x % n + 1;
    Diagram::new(pd.iter().map(|&[i, j, k, l]| {
        // Over strand runs l -> j when j follows l.
        let dirs = if succ(l) == j {
            vec![Direction::In, Direction::Out, Direction::Out, Direction::In]
        } else {
            vec![Direction::In, Direction::In, Direction::Out, Direction::Out]
        };
        NodeSpec::crossing([i, j, k, l]).with_dirs(dirs)
    }))
}

pub fn trefoil() -> Result<Diagram, StructuralError> {
    from_pd(&TREFOIL)
}

pub fn figure_eight() -> Result<Diagram, StructuralError> {
    from_pd(&FIGURE_EIGHT)
}

pub fn hopf() -> Result<Diagram, StructuralError> {
    from_pd(&HOPF)
}

/// Isomorphic copy: arcs relabeled by a random permutation, nodes reordered, and each
/// rotation shifted by an amount its kind allows.
pub fn shuffle<L: ArcLabel>(d: &Diagram<L>, seed: u64) -> Result<Diagram, StructuralError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut perm: Vec<usize> = (0..d.arc_count()).collect();
    perm.shuffle(&mut rng);
    let indexed = d.to_indexed();
    let mut specs = indexed.relabel(|&a| perm[a])?.to_specs();
    specs.shuffle(&mut rng);
    for spec in specs.iter_mut() {
        let deg = spec.arcs.len();
        let step = spec.kind.rotation_step();
        if deg == 0 {
            continue;
        }
        let shift = rng.gen_range(0..deg / step) * step;
        spec.arcs.rotate_left(shift);
        if let Some(dirs) = spec.dirs.as_mut() {
            dirs.rotate_left(shift);
        }
    }
    Diagram::new(specs)
}

/// Random rotation system on graph vertices (not necessarily planar).
pub fn random_graph(vertices: usize, edges: usize, seed: u64) -> Result<Diagram, StructuralError> {
    if vertices == 0 {
        return Ok(Diagram::default());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rotations: Vec<Vec<usize>> = vec![Vec::new(); vertices];
    for e in 0..edges {
        let u = rng.gen_range(0..vertices);
        let v = rng.gen_range(0..vertices);
        rotations[u].push(e);
        rotations[v].push(e);
    }
    for r in rotations.iter_mut() {
        r.shuffle(&mut rng);
    }
    Diagram::from_rotations(rotations)
}

/// Random diagram over all node kinds: `components` independent blocks of `nodes`
/// crossings, strand points and vertices each, with endpoints paired at random (loops
/// and free circles included), plus `circles` extra free circles.
pub fn random_diagram(
    components: usize,
    nodes: usize,
    circles: usize,
    seed: u64,
) -> Result<Diagram, StructuralError> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut specs = Vec::new();
    let mut next_arc = 0;
    for _ in 0..components {
        let kinds: Vec<NodeKind> = (0..nodes)
            .map(|_| match rng.gen_range(0..3) {
                0 => NodeKind::Crossing,
                1 => NodeKind::Strand,
                _ => NodeKind::Vertex,
            })
            .collect();
        let mut degrees: Vec<usize> = kinds
            .iter()
            .map(|kind| match kind {
                NodeKind::Crossing => 4,
                NodeKind::Strand => 2,
                NodeKind::Vertex => rng.gen_range(0..5),
            })
            .collect();
        // Only vertices have odd degree, so an odd total always has one to pad.
        if degrees.iter().sum::<usize>() % 2 == 1 {
            if let Some(i) = kinds.iter().position(|k| *k == NodeKind::Vertex) {
                degrees[i] += 1;
            }
        }
        let mut slots: Vec<usize> = degrees
            .iter()
            .enumerate()
            .flat_map(|(i, &deg)| std::iter::repeat(i).take(deg))
            .collect();
        slots.shuffle(&mut rng);
        let mut arcs: Vec<Vec<usize>> = degrees.iter().map(|&d| Vec::with_capacity(d)).collect();
        for pair in slots.chunks(2) {
            arcs[pair[0]].push(next_arc);
            arcs[pair[1]].push(next_arc);
            next_arc += 1;
        }
        for (kind, mut rotation) in kinds.into_iter().zip(arcs) {
            rotation.shuffle(&mut rng);
            specs.push(match kind {
                NodeKind::Crossing => {
                    NodeSpec::crossing([rotation[0], rotation[1], rotation[2], rotation[3]])
                }
                NodeKind::Strand => NodeSpec::strand(rotation[0], rotation[1]),
                NodeKind::Vertex => NodeSpec::vertex(rotation),
            });
        }
    }
    for _ in 0..circles {
        specs.push(NodeSpec::strand(next_arc, next_arc));
        next_arc += 1;
    }
    specs.shuffle(&mut rng);
    Diagram::new(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_are_well_formed_and_planar() {
        for d in [
            unknot().unwrap(),
            bouquet(3).unwrap(),
            theta().unwrap(),
            handcuff().unwrap(),
            cycle(4).unwrap(),
            trefoil().unwrap(),
            figure_eight().unwrap(),
            hopf().unwrap(),
        ] {
            assert!(d.is_planar(), "{d:?}");
        }
    }

    #[test]
    fn oriented_writhes() {
        assert_eq!(oriented_knot(&TREFOIL).unwrap().writhe(), Some(3));
        assert_eq!(oriented_knot(&FIGURE_EIGHT).unwrap().writhe(), Some(0));
    }

    #[test]
    fn shuffle_is_reproducible_and_keeps_counts() {
        let d = figure_eight().unwrap();
        let a = shuffle(&d, 7).unwrap();
        let b = shuffle(&d, 7).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.node_count(), d.node_count());
        assert_eq!(a.arc_count(), d.arc_count());
        assert!(a.is_planar());
    }

    #[test]
    fn random_graph_has_requested_size() {
        let d = random_graph(5, 8, 3).unwrap();
        assert_eq!(d.node_count(), 5);
        assert_eq!(d.arc_count(), 8);
    }

    #[test]
    fn random_diagram_mixes_kinds() {
        let d = random_diagram(3, 6, 2, 11).unwrap();
        assert_eq!(d.node_count(), 3 * 6 + 2);
        assert_eq!(random_diagram(3, 6, 2, 11).unwrap(), d);
        let circles = d
            .nodes()
            .filter(|(_, n)| n.kind() == NodeKind::Strand && n.arcs()[0] == n.arcs()[1])
            .count();
        assert!(circles >= 2);
        for (_, n) in d.nodes() {
            match n.kind() {
                NodeKind::Crossing => assert_eq!(n.degree(), 4),
                NodeKind::Strand => assert_eq!(n.degree(), 2),
                NodeKind::Vertex => assert!(n.degree() <= 5),
            }
        }
        assert_eq!(random_diagram(0, 4, 0, 1).unwrap().node_count(), 0);
    }
}
