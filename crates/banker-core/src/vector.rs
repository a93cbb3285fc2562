//! [`ResourceVector`]: one non-negative count per resource class.

use std::fmt;

use smallvec::SmallVec;

use crate::error::ContractViolation;
use crate::id::ResourceId;

/// Inline storage for the common case of a handful of resource classes.
/// Larger systems spill to the heap transparently.
type Components = SmallVec<[u32; 4]>;

/// An ordered sequence of unit counts, one per resource class.
///
/// Used for `Available`, for requests, and for single rows of the
/// `Allocation`, `MaxDemand` and `Need` matrices. Components are `u32`,
/// so the non-negativity invariant holds by construction; arithmetic is
/// checked and reports [`ContractViolation::ComponentOverflow`] instead of
/// wrapping.
///
/// The arity is fixed when the vector is built. There is deliberately no
/// `push`: a vector never changes shape after construction.
///
/// # Examples
///
/// ```
/// use banker_core::ResourceVector;
///
/// let mut available = ResourceVector::from([3, 3, 2]);
/// let request = ResourceVector::from([1, 0, 2]);
/// assert!(request.fits_within(available.as_slice()));
///
/// available.checked_sub_assign(request.as_slice()).unwrap();
/// assert_eq!(available.as_slice(), &[2, 3, 0]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ResourceVector(Components);

impl ResourceVector {
    /// A vector of `resources` zero components.
    pub fn zeros(resources: usize) -> Self {
        Self(smallvec::smallvec![0; resources])
    }

    /// Number of resource classes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` for a vector over zero resource classes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if every component is zero.
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&c| c == 0)
    }

    /// Borrow the components.
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    /// The component for `resource`, or `None` if out of range.
    pub fn get(&self, resource: ResourceId) -> Option<u32> {
        self.0.get(resource.index()).copied()
    }

    /// Iterate over the components in resource order.
    pub fn iter(&self) -> std::slice::Iter<'_, u32> {
        self.0.iter()
    }

    /// The first resource class whose component exceeds `bound`.
    ///
    /// Callers must have checked that `bound` has the same arity;
    /// excess components on either side are ignored.
    pub fn first_exceeding(&self, bound: &[u32]) -> Option<ResourceId> {
        self.0
            .iter()
            .zip(bound)
            .position(|(&c, &b)| c > b)
            .map(|j| ResourceId(j as u32))
    }

    /// Component-wise `self <= bound`.
    pub fn fits_within(&self, bound: &[u32]) -> bool {
        fits_within(&self.0, bound)
    }

    /// Component-wise `self += other`, all or nothing.
    pub fn checked_add_assign(&mut self, other: &[u32]) -> Result<(), ContractViolation> {
        checked_add_in_place(&mut self.0, other)
    }

    /// Component-wise `self -= other`, all or nothing.
    pub fn checked_sub_assign(&mut self, other: &[u32]) -> Result<(), ContractViolation> {
        checked_sub_in_place(&mut self.0, other)
    }

    /// Component-wise `self - other` as a new vector.
    pub fn checked_sub(&self, other: &[u32]) -> Result<Self, ContractViolation> {
        let mut out = self.clone();
        out.checked_sub_assign(other)?;
        Ok(out)
    }
}

/// Component-wise `a <= b` over two equal-length slices.
pub(crate) fn fits_within(a: &[u32], b: &[u32]) -> bool {
    a.iter().zip(b).all(|(&x, &y)| x <= y)
}

fn check_arity(dst: &[u32], src: &[u32]) -> Result<(), ContractViolation> {
    if dst.len() != src.len() {
        return Err(ContractViolation::ArityMismatch {
            expected: dst.len(),
            actual: src.len(),
        });
    }
    Ok(())
}

/// `dst += src` with overflow detection. `dst` is untouched on error.
pub(crate) fn checked_add_in_place(dst: &mut [u32], src: &[u32]) -> Result<(), ContractViolation> {
    check_arity(dst, src)?;
    if let Some(j) = dst
        .iter()
        .zip(src)
        .position(|(&d, &s)| d.checked_add(s).is_none())
    {
        return Err(ContractViolation::ComponentOverflow {
            resource: ResourceId(j as u32),
        });
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        *d += s;
    }
    Ok(())
}

/// `dst -= src` with underflow detection. `dst` is untouched on error.
pub(crate) fn checked_sub_in_place(dst: &mut [u32], src: &[u32]) -> Result<(), ContractViolation> {
    check_arity(dst, src)?;
    if let Some(j) = dst.iter().zip(src).position(|(&d, &s)| s > d) {
        return Err(ContractViolation::ComponentOverflow {
            resource: ResourceId(j as u32),
        });
    }
    for (d, &s) in dst.iter_mut().zip(src) {
        *d -= s;
    }
    Ok(())
}

impl fmt::Display for ResourceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (j, c) in self.0.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{c}")?;
        }
        write!(f, "]")
    }
}

impl AsRef<[u32]> for ResourceVector {
    fn as_ref(&self) -> &[u32] {
        &self.0
    }
}

impl<const N: usize> From<[u32; N]> for ResourceVector {
    fn from(v: [u32; N]) -> Self {
        Self(v.into_iter().collect())
    }
}

impl From<Vec<u32>> for ResourceVector {
    fn from(v: Vec<u32>) -> Self {
        Self(Components::from_vec(v))
    }
}

impl From<&[u32]> for ResourceVector {
    fn from(v: &[u32]) -> Self {
        Self(Components::from_slice(v))
    }
}

impl FromIterator<u32> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = u32>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResourceVector {
    type Item = &'a u32;
    type IntoIter = std::slice::Iter<'a, u32>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
