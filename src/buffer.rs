use nalgebra::{DMatrix, Scalar};

use crate::error::Error;

const MIN_GROW: usize = 16;

/**
 * An output buffer that grows by doubling and reports allocation failure
 * instead of aborting.
 *
 * Extraction can produce outputs whose size is not known up front, most of
 * all the Voronoi ridge tables. Those are accumulated here so that a failed
 * reservation surfaces as `Error::ResizeFailure` with everything built so
 * far dropped cleanly.
 */
pub struct GrowBuf<T> {
    data: Vec<T>,
}

impl<T> Default for GrowBuf<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GrowBuf<T> {
    pub fn new() -> Self {
        GrowBuf { data: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Result<Self, Error> {
        let mut data = Vec::new();
        data.try_reserve(capacity)
            .map_err(|_| Error::ResizeFailure(capacity))?;
        Ok(GrowBuf { data })
    }

    /// Make room for at least `extra` more elements, at least doubling the
    /// current capacity when growth is needed.
    fn reserve_for(&mut self, extra: usize) -> Result<(), Error> {
        let spare = self.data.capacity() - self.data.len();
        if spare < extra {
            let want = extra.max(self.data.capacity()).max(MIN_GROW);
            self.data
                .try_reserve(want)
                .map_err(|_| Error::ResizeFailure(want))?;
        }
        Ok(())
    }

    pub fn push(&mut self, value: T) -> Result<(), Error> {
        self.reserve_for(1)?;
        self.data.push(value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Copy> GrowBuf<T> {
    pub fn push_slice(&mut self, values: &[T]) -> Result<(), Error> {
        self.reserve_for(values.len())?;
        self.data.extend_from_slice(values);
        Ok(())
    }
}

/**
 * Row major staging area for a matrix whose row count is discovered while
 * building. Rows all have the same width; the finished buffer converts into
 * a dense `nalgebra` matrix.
 */
pub struct MatBuf<T> {
    buf: GrowBuf<T>,
    ncols: usize,
}

impl<T: Scalar + Copy> MatBuf<T> {
    pub fn new(ncols: usize) -> Self {
        MatBuf {
            buf: GrowBuf::new(),
            ncols,
        }
    }

    pub fn push_row(&mut self, row: &[T]) -> Result<(), Error> {
        debug_assert_eq!(row.len(), self.ncols);
        self.buf.push_slice(row)
    }

    pub fn nrows(&self) -> usize {
        if self.ncols == 0 {
            0
        } else {
            self.buf.len() / self.ncols
        }
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn into_matrix(self) -> DMatrix<T> {
        let nrows = self.nrows();
        DMatrix::from_row_slice(nrows, self.ncols, self.buf.as_slice())
    }
}

#[cfg(test)]
mod test {
    use super::{GrowBuf, MatBuf};
    use crate::error::Error;

    #[test]
    fn t_push_and_read_back() {
        let mut buf = GrowBuf::new();
        for i in 0..100 {
            buf.push(i).unwrap();
        }
        assert_eq!(buf.len(), 100);
        assert_eq!(buf.as_slice()[37], 37);
        assert_eq!(buf.into_vec().len(), 100);
    }

    #[test]
    fn t_push_slice_grows_to_fit() {
        let mut buf = GrowBuf::new();
        let wide = [7i32; 1000];
        buf.push_slice(&wide).unwrap();
        buf.push_slice(&wide).unwrap();
        assert_eq!(buf.len(), 2000);
        assert!(buf.as_slice().iter().all(|v| *v == 7));
    }

    #[test]
    fn t_absurd_reservation_fails_cleanly() {
        assert!(matches!(
            GrowBuf::<i64>::with_capacity(usize::MAX),
            Err(Error::ResizeFailure(_))
        ));
    }

    #[test]
    fn t_matbuf_row_major() {
        let mut mat = MatBuf::new(3);
        mat.push_row(&[1, 2, 3]).unwrap();
        mat.push_row(&[4, 5, 6]).unwrap();
        assert_eq!(mat.nrows(), 2);
        let m = mat.into_matrix();
        assert_eq!(m[(0, 1)], 2);
        assert_eq!(m[(1, 0)], 4);
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
    }

    #[test]
    fn t_matbuf_empty() {
        let mat = MatBuf::<f64>::new(4);
        let m = mat.into_matrix();
        assert_eq!(m.nrows(), 0);
        assert_eq!(m.ncols(), 4);
    }
}
