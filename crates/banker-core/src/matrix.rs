//! [`Matrix`]: a fixed-shape process-by-resource table.

use std::fmt;

use crate::error::{ContractViolation, Dimension};
use crate::id::{ProcessId, ResourceId};
use crate::vector::{checked_add_in_place, checked_sub_in_place, ResourceVector};

/// A `processes x resources` table of unit counts, stored row-major in a
/// single flat buffer.
///
/// Used for `Allocation`, `MaxDemand` and the derived `Need`. The shape
/// is fixed at construction; rows are addressed by [`ProcessId`] and are
/// always exactly `resources` wide.
///
/// # Examples
///
/// ```
/// use banker_core::{Matrix, ProcessId};
///
/// let m = Matrix::from_rows([[7, 5, 3], [3, 2, 2]]).unwrap();
/// assert_eq!(m.shape(), (2, 3));
/// assert_eq!(m.row(ProcessId(1)), Some(&[3, 2, 2][..]));
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Matrix {
    processes: usize,
    resources: usize,
    data: Vec<u32>,
}

impl Matrix {
    /// A zero-filled matrix of the given shape.
    pub fn zeros(processes: usize, resources: usize) -> Self {
        Self {
            processes,
            resources,
            data: vec![0; processes * resources],
        }
    }

    /// Build a matrix from rows, rejecting ragged input.
    ///
    /// An empty row list produces a `0 x 0` matrix.
    pub fn from_rows<I, R>(rows: I) -> Result<Self, ContractViolation>
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[u32]>,
    {
        let mut data = Vec::new();
        let mut resources = None;
        let mut processes = 0;
        for (i, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *resources.get_or_insert(row.len());
            if row.len() != expected {
                return Err(ContractViolation::RaggedMatrix {
                    row: i,
                    expected,
                    actual: row.len(),
                });
            }
            data.extend_from_slice(row);
            processes += 1;
        }
        Ok(Self {
            processes,
            resources: resources.unwrap_or(0),
            data,
        })
    }

    /// `(processes, resources)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.processes, self.resources)
    }

    /// Number of rows.
    pub fn process_count(&self) -> usize {
        self.processes
    }

    /// Number of columns.
    pub fn resource_count(&self) -> usize {
        self.resources
    }

    /// Borrow one row, or `None` if `process` is out of range.
    pub fn row(&self, process: ProcessId) -> Option<&[u32]> {
        let i = process.index();
        if i >= self.processes {
            return None;
        }
        let start = i * self.resources;
        Some(&self.data[start..start + self.resources])
    }

    /// Copy one row out as a [`ResourceVector`].
    pub fn row_vector(&self, process: ProcessId) -> Option<ResourceVector> {
        self.row(process).map(ResourceVector::from)
    }

    /// A single cell.
    pub fn get(&self, process: ProcessId, resource: ResourceId) -> Option<u32> {
        self.row(process)
            .and_then(|r| r.get(resource.index()))
            .copied()
    }

    /// Iterate rows in process order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = &[u32]> + '_ {
        let width = self.resources;
        (0..self.processes).map(move |i| &self.data[i * width..(i + 1) * width])
    }

    /// Component-wise `self - other`, failing on shape mismatch or on any
    /// negative result.
    ///
    /// Underflow is reported as [`ContractViolation::NegativeNeed`] since
    /// the only subtraction of whole matrices in this system is
    /// `MaxDemand - Allocation`.
    pub fn checked_sub(&self, other: &Matrix) -> Result<Matrix, ContractViolation> {
        self.expect_shape("allocation", other)?;
        let mut out = self.clone();
        let width = self.resources;
        for i in 0..self.processes {
            let span = i * width..(i + 1) * width;
            let rhs = &other.data[span.clone()];
            let lhs = &mut out.data[span];
            if let Some(j) = lhs.iter().zip(rhs).position(|(&a, &b)| b > a) {
                return Err(ContractViolation::NegativeNeed {
                    process: ProcessId(i as u32),
                    resource: ResourceId(j as u32),
                });
            }
            for (a, &b) in lhs.iter_mut().zip(rhs) {
                *a -= b;
            }
        }
        Ok(out)
    }

    /// `row(process) += delta`, all or nothing.
    pub fn checked_add_row(
        &mut self,
        process: ProcessId,
        delta: &[u32],
    ) -> Result<(), ContractViolation> {
        let row = self.row_mut(process)?;
        checked_add_in_place(row, delta)
    }

    /// `row(process) -= delta`, all or nothing.
    pub fn checked_sub_row(
        &mut self,
        process: ProcessId,
        delta: &[u32],
    ) -> Result<(), ContractViolation> {
        let row = self.row_mut(process)?;
        checked_sub_in_place(row, delta)
    }

    /// Fail unless `other` has exactly this matrix's shape.
    ///
    /// `what` names the other operand in the error.
    pub fn expect_shape(&self, what: &'static str, other: &Matrix) -> Result<(), ContractViolation> {
        if other.processes != self.processes {
            return Err(ContractViolation::ShapeMismatch {
                what,
                dimension: Dimension::Processes,
                expected: self.processes,
                actual: other.processes,
            });
        }
        if other.resources != self.resources {
            return Err(ContractViolation::ShapeMismatch {
                what,
                dimension: Dimension::Resources,
                expected: self.resources,
                actual: other.resources,
            });
        }
        Ok(())
    }

    fn row_mut(&mut self, process: ProcessId) -> Result<&mut [u32], ContractViolation> {
        let i = process.index();
        if i >= self.processes {
            return Err(ContractViolation::ProcessOutOfRange {
                process,
                process_count: self.processes,
            });
        }
        let start = i * self.resources;
        Ok(&mut self.data[start..start + self.resources])
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", ProcessId(i as u32), ResourceVector::from(row))?;
        }
        Ok(())
    }
}
