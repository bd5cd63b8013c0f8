//! Dense GF(2) biadjacency matrices with logged row operations.

use rustc_hash::FxHashMap;

const WORD_BITS: usize = 64;

/// One recorded matrix operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOp {
    /// `row tgt ^= row src`.
    RowXor {
        /// The row read from.
        src: usize,
        /// The row modified.
        tgt: usize,
    },
    /// Rows `a` and `b` exchanged.
    RowSwap {
        /// First row.
        a: usize,
        /// Second row.
        b: usize,
    },
}

/// A dense matrix over GF(2).
///
/// Rows are bit-packed in 64-bit words. Row XORs are recorded in an
/// operation log; the extractor derives one CNOT per logged XOR. Row swaps
/// are logged only when swap tracking is enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BiadjacencyMatrix {
    num_rows: usize,
    num_cols: usize,
    words: usize,
    data: Vec<Vec<u64>>,
    ops: Vec<MatrixOp>,
    track_swaps: bool,
}

impl BiadjacencyMatrix {
    /// Create a zero matrix.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        let words = num_cols.div_ceil(WORD_BITS).max(1);
        Self {
            num_rows,
            num_cols,
            words,
            data: vec![vec![0; words]; num_rows],
            ops: Vec::new(),
            track_swaps: false,
        }
    }

    /// Enable logging of row swaps alongside XORs.
    #[must_use]
    pub fn with_swap_tracking(mut self) -> Self {
        self.track_swaps = true;
        self
    }

    /// Number of rows.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns.
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    /// The bit at `(row, col)`.
    pub fn get(&self, row: usize, col: usize) -> bool {
        self.data[row][col / WORD_BITS] >> (col % WORD_BITS) & 1 == 1
    }

    /// Set the bit at `(row, col)`.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        let mask = 1u64 << (col % WORD_BITS);
        if value {
            self.data[row][col / WORD_BITS] |= mask;
        } else {
            self.data[row][col / WORD_BITS] &= !mask;
        }
    }

    /// `row tgt ^= row src`, recorded in the op log.
    pub fn row_xor(&mut self, tgt: usize, src: usize) {
        debug_assert_ne!(tgt, src);
        let (src_row, tgt_row) = if src < tgt {
            let (a, b) = self.data.split_at_mut(tgt);
            (&a[src], &mut b[0])
        } else {
            let (a, b) = self.data.split_at_mut(src);
            (&b[0], &mut a[tgt])
        };
        for (t, s) in tgt_row.iter_mut().zip(src_row) {
            *t ^= *s;
        }
        self.ops.push(MatrixOp::RowXor { src, tgt });
    }

    /// Exchange two rows, logged when swap tracking is enabled.
    pub fn row_swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        self.data.swap(a, b);
        if self.track_swaps {
            self.ops.push(MatrixOp::RowSwap { a, b });
        }
    }

    /// `col tgt ^= col src`. Column operations are not logged.
    pub fn col_xor(&mut self, tgt: usize, src: usize) {
        for r in 0..self.num_rows {
            if self.get(r, src) {
                let bit = self.get(r, tgt);
                self.set(r, tgt, !bit);
            }
        }
    }

    /// Exchange two columns. Not logged.
    pub fn col_swap(&mut self, a: usize, b: usize) {
        if a == b {
            return;
        }
        for r in 0..self.num_rows {
            let (x, y) = (self.get(r, a), self.get(r, b));
            self.set(r, a, y);
            self.set(r, b, x);
        }
    }

    /// Number of set bits in a row.
    pub fn row_weight(&self, row: usize) -> usize {
        self.data[row]
            .iter()
            .map(|w| w.count_ones() as usize)
            .sum()
    }

    /// The single set column of a weight-1 row.
    pub fn row_single_one(&self, row: usize) -> Option<usize> {
        if self.row_weight(row) != 1 {
            return None;
        }
        (0..self.num_cols).find(|&c| self.get(row, c))
    }

    fn window_key(&self, row: usize, c0: usize, c1: usize) -> u64 {
        let mut key = 0u64;
        for c in c0..c1 {
            key = key << 1 | u64::from(self.get(row, c));
        }
        key
    }

    /// The recorded XOR pairs `(src, tgt)` in application order.
    pub fn op_log(&self) -> Vec<(usize, usize)> {
        self.ops
            .iter()
            .filter_map(|op| match *op {
                MatrixOp::RowXor { src, tgt } => Some((src, tgt)),
                MatrixOp::RowSwap { .. } => None,
            })
            .collect()
    }

    /// Every recorded operation, including swaps when tracked.
    pub fn ops(&self) -> &[MatrixOp] {
        &self.ops
    }

    /// Forget the recorded operations.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }

    /// Reduce to reduced row-echelon form, every row allowed as an XOR
    /// source. See [`gaussian_elimination_restricted`](Self::gaussian_elimination_restricted).
    pub fn gaussian_elimination(&mut self, blocksize: usize) -> bool {
        let allowed = vec![true; self.num_rows];
        self.gaussian_elimination_restricted(blocksize, &allowed)
    }

    /// Reduce to reduced row-echelon form using block-wise pattern reuse:
    /// within each `blocksize`-wide column window, rows sharing a non-zero
    /// bit pattern are eliminated against one representative with a single
    /// XOR before the window's columns are pivoted. `blocksize` 1 is plain
    /// Gauss–Jordan. Only rows flagged in `allowed_sources` may serve as
    /// XOR sources (pattern representatives and pivots); tied pivots
    /// resolve to the lowest row index.
    pub fn gaussian_elimination_restricted(
        &mut self,
        blocksize: usize,
        allowed_sources: &[bool],
    ) -> bool {
        if self.num_rows == 0 || self.num_cols == 0 {
            return false;
        }
        let blocksize = blocksize.max(1).min(WORD_BITS);
        let mut is_pivot_row = vec![false; self.num_rows];

        let mut c0 = 0;
        while c0 < self.num_cols {
            let c1 = (c0 + blocksize).min(self.num_cols);

            // Pattern reuse: one XOR eliminates every duplicate window.
            let mut chunks: FxHashMap<u64, usize> = FxHashMap::default();
            for r in 0..self.num_rows {
                if is_pivot_row[r] {
                    continue;
                }
                let key = self.window_key(r, c0, c1);
                if key == 0 {
                    continue;
                }
                match chunks.get(&key) {
                    Some(&rep) => self.row_xor(r, rep),
                    None => {
                        if allowed_sources[r] {
                            chunks.insert(key, r);
                        }
                    }
                }
            }

            for p in c0..c1 {
                let pivot = (0..self.num_rows)
                    .find(|&r| allowed_sources[r] && !is_pivot_row[r] && self.get(r, p));
                let Some(pr) = pivot else { continue };
                is_pivot_row[pr] = true;
                for r in 0..self.num_rows {
                    if r != pr && self.get(r, p) {
                        self.row_xor(r, pr);
                    }
                }
            }
            c0 = c1;
        }
        true
    }

    /// Number of linearly independent rows.
    pub fn rank(&self) -> usize {
        let mut probe = self.clone();
        probe.clear_ops();
        probe.gaussian_elimination(1);
        (0..probe.num_rows)
            .filter(|&r| probe.row_weight(r) > 0)
            .count()
    }
}
