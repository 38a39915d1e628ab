extern crate nalgebra as na;

use na::{DMatrix,DMatrixView,Dim,Dyn,Matrix,storage::Storage,base::{default_allocator::DefaultAllocator,allocator::Allocator}};
use na::constraint::{ShapeConstraint,SameNumberOfRows,SameNumberOfColumns};
use crate::Float;

/**
 * Dense symmetric matrix partitioned into blocks of (possibly) different widths.
 * Only blocks (i,j) with i <= j are authoritative. The lower triangle is materialized on demand by self_adjoint_view.
 */
#[derive(Debug,Clone,PartialEq)]
pub struct SymmetricBlockMatrix {
    dims: Vec<usize>,
    offsets: Vec<usize>,
    matrix: DMatrix<Float>
}

impl SymmetricBlockMatrix {

    pub fn zeros(dims: &[usize]) -> SymmetricBlockMatrix {
        let offsets = Self::compute_offsets(dims);
        let size = *offsets.last().expect("offsets always has a leading zero");
        SymmetricBlockMatrix{dims: dims.to_vec(), offsets, matrix: DMatrix::<Float>::zeros(size,size)}
    }

    /**
     * Wraps a full symmetric matrix. Panics if the matrix size does not match the block dimensions.
     */
    pub fn from_self_adjoint(dims: &[usize], matrix: DMatrix<Float>) -> SymmetricBlockMatrix {
        let offsets = Self::compute_offsets(dims);
        let size = *offsets.last().expect("offsets always has a leading zero");
        assert_eq!((size,size), matrix.shape(), "from_self_adjoint: matrix does not match block dimensions");
        SymmetricBlockMatrix{dims: dims.to_vec(), offsets, matrix}
    }

    fn compute_offsets(dims: &[usize]) -> Vec<usize> {
        dims.iter().scan(0, |acc, &d| {
            *acc += d;
            Some(*acc)
        }).fold(vec![0], |mut offsets, o| {
            offsets.push(o);
            offsets
        })
    }

    pub fn n_blocks(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &Vec<usize> {
        &self.dims
    }

    pub fn rows(&self) -> usize {
        self.matrix.nrows()
    }

    pub fn block_dim(&self, block: usize) -> usize {
        self.dims[block]
    }

    pub fn block_offset(&self, block: usize) -> usize {
        self.offsets[block]
    }

    fn block(&self, i: usize, j: usize) -> DMatrixView<Float> {
        self.matrix.view((self.offsets[i],self.offsets[j]),(self.dims[i],self.dims[j]))
    }

    pub fn diagonal_block(&self, i: usize) -> DMatrix<Float> {
        // upper triangle is authoritative, mirror it
        let upper = self.block(i,i);
        DMatrix::<Float>::from_fn(upper.nrows(), upper.ncols(), |r,c| match r <= c {
            true => upper[(r,c)],
            false => upper[(c,r)]
        })
    }

    pub fn above_diagonal_block(&self, i: usize, j: usize) -> DMatrix<Float> {
        assert!(i < j, "above_diagonal_block: ({},{}) is not above the diagonal", i, j);
        self.block(i,j).into_owned()
    }

    pub fn set_diagonal_block<R,C,S>(&mut self, i: usize, block: &Matrix<Float,R,C,S>) -> () where R: Dim, C: Dim, S: Storage<Float,R,C>, ShapeConstraint: SameNumberOfRows<Dyn,R> + SameNumberOfColumns<Dyn,C> {
        let (o,d) = (self.offsets[i],self.dims[i]);
        self.matrix.view_mut((o,o),(d,d)).copy_from(block);
    }

    pub fn update_diagonal_block<R,C,S>(&mut self, i: usize, block: &Matrix<Float,R,C,S>) -> () where R: Dim, C: Dim, S: Storage<Float,R,C>, ShapeConstraint: SameNumberOfRows<Dyn,R> + SameNumberOfColumns<Dyn,C> {
        let (o,d) = (self.offsets[i],self.dims[i]);
        let mut target = self.matrix.view_mut((o,o),(d,d));
        target += block;
    }

    pub fn set_off_diagonal_block<R,C,S>(&mut self, i: usize, j: usize, block: &Matrix<Float,R,C,S>) -> () where R: Dim, C: Dim, S: Storage<Float,R,C>, ShapeConstraint: SameNumberOfRows<Dyn,R> + SameNumberOfColumns<Dyn,C> {
        assert!(i < j, "set_off_diagonal_block: ({},{}) is not above the diagonal", i, j);
        let (o_i,o_j) = (self.offsets[i],self.offsets[j]);
        let (d_i,d_j) = (self.dims[i],self.dims[j]);
        self.matrix.view_mut((o_i,o_j),(d_i,d_j)).copy_from(block);
    }

    /**
     * Adds to block (i,j). If i > j the transposed block is added to (j,i) instead.
     */
    pub fn update_off_diagonal_block<R,C,S>(&mut self, i: usize, j: usize, block: &Matrix<Float,R,C,S>) -> () where R: Dim, C: Dim, S: Storage<Float,R,C>, DefaultAllocator: Allocator<Float,C,R>,
        ShapeConstraint: SameNumberOfRows<Dyn,R> + SameNumberOfColumns<Dyn,C> + SameNumberOfRows<Dyn,C> + SameNumberOfColumns<Dyn,R> {
        assert_ne!(i, j, "update_off_diagonal_block: diagonal block {} requested", i);
        match i < j {
            true => {
                let (o_i,o_j) = (self.offsets[i],self.offsets[j]);
                let mut target = self.matrix.view_mut((o_i,o_j),(self.dims[i],self.dims[j]));
                target += block;
            },
            false => {
                let (o_i,o_j) = (self.offsets[j],self.offsets[i]);
                let mut target = self.matrix.view_mut((o_i,o_j),(self.dims[j],self.dims[i]));
                target += block.transpose();
            }
        }
    }

    /**
     * Full symmetric matrix reconstructed from the upper triangle
     */
    pub fn self_adjoint_view(&self) -> DMatrix<Float> {
        let n = self.matrix.nrows();
        DMatrix::<Float>::from_fn(n, n, |r,c| match r <= c {
            true => self.matrix[(r,c)],
            false => self.matrix[(c,r)]
        })
    }

    pub fn is_zero(&self) -> bool {
        self.matrix.iter().all(|v| *v == 0.0)
    }

}
