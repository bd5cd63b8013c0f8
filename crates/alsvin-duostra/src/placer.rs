//! Initial logical-to-physical placement strategies.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::PlacerKind;
use crate::device::Device;
use crate::error::{DuostraError, DuostraResult};

/// Produces and applies an initial placement.
#[derive(Debug, Clone)]
pub struct Placer {
    kind: PlacerKind,
    seed: u64,
}

impl Placer {
    /// Create a placer of the given kind.
    pub fn new(kind: PlacerKind, seed: u64) -> Self {
        Self { kind, seed }
    }

    /// Compute an assignment (`assignment[logical] = physical`) for
    /// `num_logical` qubits and bind it on the device.
    pub fn place_and_assign(
        &self,
        device: &mut Device,
        num_logical: usize,
    ) -> DuostraResult<Vec<usize>> {
        if num_logical > device.num_qubits() {
            return Err(DuostraError::ArityMismatch {
                logical: num_logical,
                physical: device.num_qubits(),
            });
        }
        let mut assignment = match self.kind {
            PlacerKind::Naive => (0..device.num_qubits()).collect::<Vec<_>>(),
            PlacerKind::Random => {
                let mut order: Vec<usize> = (0..device.num_qubits()).collect();
                order.shuffle(&mut StdRng::seed_from_u64(self.seed));
                order
            }
            PlacerKind::Dfs => dfs_order(device),
        };
        assignment.truncate(num_logical);
        device.place(&assignment)?;
        Ok(assignment)
    }
}

/// Depth-first device traversal, visiting degree-1 neighbors eagerly so
/// chain ends are packed before junctions fan out.
fn dfs_order(device: &Device) -> Vec<usize> {
    let n = device.num_qubits();
    let mut order = Vec::with_capacity(n);
    let mut visited = vec![false; n];
    for start in 0..n {
        if !visited[start] {
            dfs_visit(device, start, &mut visited, &mut order);
        }
    }
    order
}

fn dfs_visit(device: &Device, current: usize, visited: &mut [bool], order: &mut Vec<usize>) {
    visited[current] = true;
    order.push(current);

    let mut waitlist = Vec::new();
    for &adj in device.qubit(current).adjacencies() {
        if visited[adj] {
            continue;
        }
        if device.qubit(current).adjacencies().len() == 1 {
            dfs_visit(device, adj, visited, order);
        } else {
            waitlist.push(adj);
        }
    }
    for adj in waitlist {
        if !visited[adj] {
            dfs_visit(device, adj, visited, order);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvin_qcir::QubitId;

    #[test]
    fn test_naive_is_identity() {
        let mut device = Device::linear(4);
        let assignment = Placer::new(PlacerKind::Naive, 0)
            .place_and_assign(&mut device, 3)
            .unwrap();
        assert_eq!(assignment, vec![0, 1, 2]);
        assert_eq!(device.physical_by_logical(QubitId(2)), Some(2));
    }

    #[test]
    fn test_random_is_seed_deterministic() {
        let mut d1 = Device::linear(6);
        let mut d2 = Device::linear(6);
        let a1 = Placer::new(PlacerKind::Random, 42)
            .place_and_assign(&mut d1, 6)
            .unwrap();
        let a2 = Placer::new(PlacerKind::Random, 42)
            .place_and_assign(&mut d2, 6)
            .unwrap();
        assert_eq!(a1, a2);

        let mut sorted = a1.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_dfs_covers_device() {
        let mut device = Device::with_edges("t", 5, &[(0, 1), (1, 2), (1, 3), (3, 4)]);
        let assignment = Placer::new(PlacerKind::Dfs, 0)
            .place_and_assign(&mut device, 5)
            .unwrap();
        let mut sorted = assignment.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4]);
        assert_eq!(assignment[0], 0);
    }

    #[test]
    fn test_too_many_logical_qubits() {
        let mut device = Device::linear(2);
        assert!(matches!(
            Placer::new(PlacerKind::Naive, 0).place_and_assign(&mut device, 3),
            Err(DuostraError::ArityMismatch { .. })
        ));
    }
}
