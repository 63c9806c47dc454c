use crate::Vec3;

/// Orthonormal basis built around a single direction `w`.
///
/// Used to move directions sampled in a local frame (where +Z is the
/// surface normal or the axis of a cone) into world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Onb {
    pub u: Vec3,
    pub v: Vec3,
    pub w: Vec3,
}

impl Onb {
    /// Build a basis whose `w` axis is `n` normalized.
    ///
    /// The helper axis switches from X to Y when `n` is nearly parallel to X,
    /// otherwise the cross product would collapse.
    pub fn from_w(n: Vec3) -> Self {
        let w = n.normalize();
        let helper = if w.x.abs() > 0.9 { Vec3::Y } else { Vec3::X };
        let v = w.cross(helper).normalize();
        let u = w.cross(v);
        Self { u, v, w }
    }

    /// Express local coordinates `a` in world space.
    #[inline]
    pub fn local(&self, a: Vec3) -> Vec3 {
        a.x * self.u + a.y * self.v + a.z * self.w
    }
}
