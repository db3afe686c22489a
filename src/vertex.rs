//! Non-owning typed accessors over one packed vertex block.
//!
//! [`VertexView`] and [`VertexViewMut`] wrap a borrowed byte block plus the
//! [`VertexFormat`] describing its shape, and compute every attribute offset
//! from the format on access. They are the only place in the crate that
//! reinterprets raw bytes as typed values; the helpers at the top of this
//! module are that entire boundary.
//!
//! The views are hot-path types: channel indices and format agreement are
//! checked with `debug_assert!` only, never at runtime in release builds.
//! Multiple views over the same block alias the same mutable state; any
//! cross-thread synchronization is the block owner's responsibility.

use crate::format::{VertexFormat, NORMAL_OFFSET, POSITION_OFFSET, TANGENT_OFFSET};
use crate::math::{transform_direction, transform_point, Mat4, Vec2, Vec3, Vec4};

// ---------------------------------------------------------------------------
// Raw block packing boundary
// ---------------------------------------------------------------------------
//
// Blocks live inside a shared byte pool with no alignment guarantee, so all
// reads are unaligned. Multi-byte values use the platform's native byte
// order, the same bytes the GPU upload path consumes.

fn read_pod<T: bytemuck::Pod>(block: &[u8], offset: usize) -> T {
    bytemuck::pod_read_unaligned(&block[offset..offset + std::mem::size_of::<T>()])
}

fn write_pod<T: bytemuck::Pod>(block: &mut [u8], offset: usize, value: &T) {
    block[offset..offset + std::mem::size_of::<T>()].copy_from_slice(bytemuck::bytes_of(value));
}

/// Componentwise epsilon comparison used by the closeness predicate.
fn within_epsilon(a: f32, b: f32) -> bool {
    (a - b).abs() <= f32::EPSILON
}

// ---------------------------------------------------------------------------
// Read-only view
// ---------------------------------------------------------------------------

/// Read-only accessor over one packed vertex block.
///
/// Valid exactly as long as the borrowed block; performs no allocation.
/// The block's layout must match `format` — this is a construction-time
/// contract, checked only by a debug assertion.
#[derive(Clone, Copy)]
pub struct VertexView<'a> {
    block: &'a [u8],
    format: VertexFormat,
}

impl<'a> VertexView<'a> {
    /// Bind a view to a raw block of the given format.
    pub fn new(block: &'a [u8], format: VertexFormat) -> Self {
        debug_assert_eq!(block.len(), format.block_size());
        Self { block, format }
    }

    /// The format this view was constructed with.
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// The underlying raw bytes, laid out per [`crate::format`].
    pub fn raw_block(&self) -> &'a [u8] {
        self.block
    }

    /// Vertex position.
    pub fn position(&self) -> Vec3 {
        Vec3::from(self.position_array())
    }

    /// Vertex position as a raw float array.
    pub fn position_array(&self) -> [f32; 3] {
        read_pod(self.block, POSITION_OFFSET)
    }

    /// Vertex normal.
    pub fn normal(&self) -> Vec3 {
        Vec3::from(self.normal_array())
    }

    /// Vertex normal as a raw float array.
    pub fn normal_array(&self) -> [f32; 3] {
        read_pod(self.block, NORMAL_OFFSET)
    }

    /// Vertex tangent; w carries the bitangent handedness.
    pub fn tangent(&self) -> Vec4 {
        Vec4::from(self.tangent_array())
    }

    /// Vertex tangent as a raw float array.
    pub fn tangent_array(&self) -> [f32; 4] {
        read_pod(self.block, TANGENT_OFFSET)
    }

    /// UV pair of channel `index`.
    pub fn uv(&self, index: usize) -> Vec2 {
        Vec2::from(self.uv_array(index))
    }

    /// UV pair of channel `index` as a raw float array.
    pub fn uv_array(&self, index: usize) -> [f32; 2] {
        debug_assert!(index < self.format.uv_count as usize);
        read_pod(self.block, self.format.uv_offset(index))
    }

    /// Color channel `index` as stored: `[r, g, b, a]` bytes in 0-255 form.
    pub fn color(&self, index: usize) -> [u8; 4] {
        debug_assert!(index < self.format.color_count as usize);
        read_pod(self.block, self.format.color_offset(index))
    }

    /// Color channel `index` as one native-endian 32-bit word, for fast
    /// whole-word comparison and copy.
    pub fn raw_color(&self, index: usize) -> u32 {
        debug_assert!(index < self.format.color_count as usize);
        read_pod(self.block, self.format.color_offset(index))
    }

    /// Decide whether this vertex and `other` can be merged into one shared
    /// vertex. Both are assumed to already share a position (the caller's
    /// precondition), so position is not compared; vertices are split only
    /// when their non-positional attributes differ.
    ///
    /// Returns true iff every UV channel matches within machine epsilon
    /// componentwise, every packed color matches exactly, and normal and
    /// tangent match within epsilon componentwise.
    ///
    /// Both vertices must have the same format; checked by debug assertion
    /// only.
    pub fn close_to(&self, other: &VertexView<'_>) -> bool {
        debug_assert_eq!(self.format, other.format);

        for i in 0..self.format.uv_count as usize {
            let a = self.uv_array(i);
            let b = other.uv_array(i);
            if !within_epsilon(a[0], b[0]) || !within_epsilon(a[1], b[1]) {
                return false;
            }
        }

        // Colors are already quantized; exact word compare is sufficient.
        for i in 0..self.format.color_count as usize {
            if self.raw_color(i) != other.raw_color(i) {
                return false;
            }
        }

        let (na, nb) = (self.normal_array(), other.normal_array());
        let (ta, tb) = (self.tangent_array(), other.tangent_array());
        na.iter().zip(&nb).all(|(a, b)| within_epsilon(*a, *b))
            && ta.iter().zip(&tb).all(|(a, b)| within_epsilon(*a, *b))
    }
}

impl std::fmt::Debug for VertexView<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexView")
            .field("format", &self.format)
            .field("position", &self.position_array())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Mutable view
// ---------------------------------------------------------------------------

/// Mutable accessor over one packed vertex block.
///
/// Adds the setters, the transform operations, and the color quantization
/// on top of everything [`VertexView`] reads.
pub struct VertexViewMut<'a> {
    block: &'a mut [u8],
    format: VertexFormat,
}

impl<'a> VertexViewMut<'a> {
    /// Bind a mutable view to a raw block of the given format.
    pub fn new(block: &'a mut [u8], format: VertexFormat) -> Self {
        debug_assert_eq!(block.len(), format.block_size());
        Self { block, format }
    }

    /// Reborrow as a read-only view.
    pub fn as_view(&self) -> VertexView<'_> {
        VertexView {
            block: self.block,
            format: self.format,
        }
    }

    /// The format this view was constructed with.
    pub fn format(&self) -> VertexFormat {
        self.format
    }

    /// Vertex position.
    pub fn position(&self) -> Vec3 {
        self.as_view().position()
    }

    /// Vertex normal.
    pub fn normal(&self) -> Vec3 {
        self.as_view().normal()
    }

    /// Vertex tangent.
    pub fn tangent(&self) -> Vec4 {
        self.as_view().tangent()
    }

    /// UV pair of channel `index`.
    pub fn uv(&self, index: usize) -> Vec2 {
        self.as_view().uv(index)
    }

    /// Color channel `index` as `[r, g, b, a]` bytes.
    pub fn color(&self, index: usize) -> [u8; 4] {
        self.as_view().color(index)
    }

    /// Color channel `index` as one native-endian 32-bit word.
    pub fn raw_color(&self, index: usize) -> u32 {
        self.as_view().raw_color(index)
    }

    /// Set the vertex position.
    pub fn set_position(&mut self, position: &Vec3) {
        self.set_position_array([position.x, position.y, position.z]);
    }

    /// Set the vertex position from a raw float array.
    pub fn set_position_array(&mut self, position: [f32; 3]) {
        write_pod(self.block, POSITION_OFFSET, &position);
    }

    /// Set the vertex normal.
    pub fn set_normal(&mut self, normal: &Vec3) {
        self.set_normal_array([normal.x, normal.y, normal.z]);
    }

    /// Set the vertex normal from a raw float array.
    pub fn set_normal_array(&mut self, normal: [f32; 3]) {
        write_pod(self.block, NORMAL_OFFSET, &normal);
    }

    /// Set the vertex tangent.
    pub fn set_tangent(&mut self, tangent: &Vec4) {
        self.set_tangent_array([tangent.x, tangent.y, tangent.z, tangent.w]);
    }

    /// Set the vertex tangent from a raw float array.
    pub fn set_tangent_array(&mut self, tangent: [f32; 4]) {
        write_pod(self.block, TANGENT_OFFSET, &tangent);
    }

    /// Set the UV pair of channel `index`.
    pub fn set_uv(&mut self, index: usize, uv: &Vec2) {
        self.set_uv_array(index, [uv.x, uv.y]);
    }

    /// Set the UV pair of channel `index` from a raw float array.
    pub fn set_uv_array(&mut self, index: usize, uv: [f32; 2]) {
        debug_assert!(index < self.format.uv_count as usize);
        write_pod(self.block, self.format.uv_offset(index), &uv);
    }

    /// Store a packed color word directly, no conversion.
    pub fn set_raw_color(&mut self, index: usize, color: u32) {
        debug_assert!(index < self.format.color_count as usize);
        write_pod(self.block, self.format.color_offset(index), &color);
    }

    /// Quantize a normalized `[0, 1]` float color to bytes and store it.
    ///
    /// Each component is converted with the truncating cast
    /// `(c * 255.0) as u8`, not round-to-nearest. Components outside
    /// `[0, 1]` are not clamped here beyond the cast's saturation; callers
    /// are expected to pre-clamp.
    pub fn set_color(&mut self, index: usize, color: &Vec4) {
        debug_assert!(index < self.format.color_count as usize);
        let bytes = [
            (color.x * 255.0) as u8,
            (color.y * 255.0) as u8,
            (color.z * 255.0) as u8,
            (color.w * 255.0) as u8,
        ];
        write_pod(self.block, self.format.color_offset(index), &bytes);
    }

    /// Apply `model` to the position and `normal_matrix` to the normal and
    /// tangent, writing the results back in place.
    ///
    /// `normal_matrix` is assumed to be the pre-computed inverse transpose
    /// of the model matrix, so normals and tangents stay correct under
    /// non-uniform scale. The normal is transformed as a direction; the
    /// tangent as a full 4-component vector (w rides through unchanged for
    /// the usual rotation-scale normal matrix).
    pub fn transform(&mut self, model: &Mat4, normal_matrix: &Mat4) {
        let position = transform_point(model, &self.position());
        self.set_position(&position);
        let normal = transform_direction(normal_matrix, &self.normal());
        self.set_normal(&normal);
        let tangent = normal_matrix * self.tangent();
        self.set_tangent(&tangent);
    }

    /// Apply `matrix` to the UV pair of channel `index` by lifting it to
    /// the 3D point `(u, v, 0)` and writing back the resulting `(x, y)`.
    /// Used for UV-space transforms such as atlas remapping.
    pub fn transform_uv(&mut self, index: usize, matrix: &Mat4) {
        let uv = self.uv(index);
        let lifted = transform_point(matrix, &Vec3::new(uv.x, uv.y, 0.0));
        self.set_uv(index, &Vec2::new(lifted.x, lifted.y));
    }
}

impl std::fmt::Debug for VertexViewMut<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VertexViewMut")
            .field("format", &self.format)
            .field("position", &self.as_view().position_array())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::nalgebra;

    fn block(format: VertexFormat) -> Vec<u8> {
        vec![0u8; format.block_size()]
    }

    #[test]
    fn test_header_roundtrip() {
        let format = VertexFormat::new(0, 0);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_position(&Vec3::new(1.0, 2.0, 3.0));
        v.set_normal(&Vec3::new(0.0, 1.0, 0.0));
        v.set_tangent(&Vec4::new(1.0, 0.0, 0.0, -1.0));

        assert_eq!(v.position(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(v.normal(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(v.tangent(), Vec4::new(1.0, 0.0, 0.0, -1.0));
    }

    #[test]
    fn test_array_setters_match_vector_setters() {
        let format = VertexFormat::new(1, 0);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_position_array([4.0, 5.0, 6.0]);
        v.set_uv_array(0, [0.25, 0.75]);

        let view = v.as_view();
        assert_eq!(view.position_array(), [4.0, 5.0, 6.0]);
        assert_eq!(view.uv(0), Vec2::new(0.25, 0.75));
    }

    #[test]
    fn test_uv_roundtrip_exact() {
        let format = VertexFormat::new(2, 0);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_uv(0, &Vec2::new(0.1, 0.9));
        v.set_uv(1, &Vec2::new(-3.5, 7.25));

        // No quantization on UV: exact float equality.
        assert_eq!(v.uv(0), Vec2::new(0.1, 0.9));
        assert_eq!(v.uv(1), Vec2::new(-3.5, 7.25));
    }

    #[test]
    fn test_raw_color_roundtrip() {
        let format = VertexFormat::new(0, 2);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_raw_color(0, 0xFFAABBCC);
        v.set_raw_color(1, 0x01020304);

        assert_eq!(v.raw_color(0), 0xFFAABBCC);
        assert_eq!(v.raw_color(1), 0x01020304);
    }

    #[test]
    fn test_color_quantization_truncates() {
        let format = VertexFormat::new(0, 1);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        // 0.999 * 255 = 254.745 -> truncates to 254, never rounds to 255.
        v.set_color(0, &Vec4::new(0.999, 0.5, 0.0, 1.0));
        let c = v.color(0);
        assert_eq!(c, [254, 127, 0, 255]);
    }

    #[test]
    fn test_color_bytes_are_rgba_order() {
        let format = VertexFormat::new(0, 1);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_color(0, &Vec4::new(1.0, 0.0, 0.0, 1.0));
        assert_eq!(v.color(0), [255, 0, 0, 255]);
        assert_eq!(v.raw_color(0), u32::from_ne_bytes([255, 0, 0, 255]));
    }

    #[test]
    fn test_color_slots_follow_uv_slots() {
        let format = VertexFormat::new(2, 1);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);

        v.set_uv(1, &Vec2::new(9.0, 9.0));
        v.set_raw_color(0, 0xDEADBEEF);

        // Writing the last UV slot must not clobber the color slot.
        assert_eq!(v.uv(1), Vec2::new(9.0, 9.0));
        assert_eq!(v.raw_color(0), 0xDEADBEEF);
    }

    fn filled_pair(format: VertexFormat) -> (Vec<u8>, Vec<u8>) {
        let mut a = block(format);
        {
            let mut v = VertexViewMut::new(&mut a, format);
            v.set_position(&Vec3::new(1.0, 2.0, 3.0));
            v.set_normal(&Vec3::new(0.0, 1.0, 0.0));
            v.set_tangent(&Vec4::new(1.0, 0.0, 0.0, 1.0));
            for i in 0..format.uv_count as usize {
                v.set_uv(i, &Vec2::new(0.5, 0.5));
            }
            for i in 0..format.color_count as usize {
                v.set_raw_color(i, 0xFFAABBCC);
            }
        }
        let b = a.clone();
        (a, b)
    }

    #[test]
    fn test_close_to_reflexive() {
        let format = VertexFormat::new(2, 2);
        let (a, b) = filled_pair(format);
        let va = VertexView::new(&a, format);
        let vb = VertexView::new(&b, format);
        assert!(va.close_to(&vb));
        assert!(va.close_to(&va));
    }

    #[test]
    fn test_close_to_ignores_position() {
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);
        VertexViewMut::new(&mut b, format).set_position(&Vec3::new(100.0, 0.0, 0.0));
        assert!(VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_close_to_uv_perturbation() {
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);
        VertexViewMut::new(&mut b, format).set_uv(0, &Vec2::new(0.5, 0.5 + 2.0 * f32::EPSILON));
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_close_to_single_color_bit() {
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);
        VertexViewMut::new(&mut b, format).set_raw_color(0, 0xFFAABBCD);
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_close_to_normal_perturbation() {
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);
        VertexViewMut::new(&mut b, format).set_normal(&Vec3::new(0.0, 1.0 + 4.0 * f32::EPSILON, 0.0));
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_close_to_tangent_perturbation() {
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);
        VertexViewMut::new(&mut b, format).set_tangent(&Vec4::new(1.0, 0.0, 0.0, -1.0));
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_close_to_restores_after_fixing_attributes() {
        // Perturb UV, then color, then restore both; the predicate must
        // track each independently.
        let format = VertexFormat::new(1, 1);
        let (a, mut b) = filled_pair(format);

        VertexViewMut::new(&mut b, format).set_uv(0, &Vec2::new(0.5, 0.5 + 2.0 * f32::EPSILON));
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));

        {
            let mut v = VertexViewMut::new(&mut b, format);
            v.set_uv(0, &Vec2::new(0.5, 0.5));
            v.set_raw_color(0, 0xFFAABBCD);
        }
        assert!(!VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));

        VertexViewMut::new(&mut b, format).set_raw_color(0, 0xFFAABBCC);
        assert!(VertexView::new(&a, format).close_to(&VertexView::new(&b, format)));
    }

    #[test]
    fn test_transform_identity_is_noop() {
        let format = VertexFormat::new(1, 0);
        let (mut a, reference) = filled_pair(format);
        VertexViewMut::new(&mut a, format).transform(&Mat4::identity(), &Mat4::identity());
        assert_eq!(a, reference);
    }

    #[test]
    fn test_transform_translates_position_only() {
        let format = VertexFormat::new(0, 0);
        let mut data = block(format);
        {
            let mut v = VertexViewMut::new(&mut data, format);
            v.set_position(&Vec3::new(1.0, 0.0, 0.0));
            v.set_normal(&Vec3::new(0.0, 1.0, 0.0));
            v.set_tangent(&Vec4::new(1.0, 0.0, 0.0, 1.0));
            let model = Mat4::new_translation(&Vec3::new(10.0, 0.0, 0.0));
            v.transform(&model, &Mat4::identity());
        }
        let v = VertexView::new(&data, format);
        assert_eq!(v.position(), Vec3::new(11.0, 0.0, 0.0));
        assert_eq!(v.normal(), Vec3::new(0.0, 1.0, 0.0));
        assert_eq!(v.tangent(), Vec4::new(1.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_transform_rotates_normal_and_tangent() {
        let format = VertexFormat::new(0, 0);
        let mut data = block(format);
        let rotation = nalgebra::Rotation3::from_axis_angle(
            &nalgebra::Vector3::z_axis(),
            std::f32::consts::FRAC_PI_2,
        )
        .to_homogeneous();
        {
            let mut v = VertexViewMut::new(&mut data, format);
            v.set_position(&Vec3::new(1.0, 0.0, 0.0));
            v.set_normal(&Vec3::new(1.0, 0.0, 0.0));
            v.set_tangent(&Vec4::new(0.0, 1.0, 0.0, 1.0));
            // Pure rotation: the normal matrix equals the model matrix.
            v.transform(&rotation, &rotation);
        }
        let v = VertexView::new(&data, format);
        assert!((v.normal() - Vec3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
        assert!((v.tangent() - Vec4::new(-1.0, 0.0, 0.0, 1.0)).norm() < 1e-6);
    }

    #[test]
    fn test_transform_uv_offsets_in_uv_space() {
        let format = VertexFormat::new(1, 0);
        let mut data = block(format);
        let mut v = VertexViewMut::new(&mut data, format);
        v.set_uv(0, &Vec2::new(0.25, 0.5));

        // Atlas remap: shift by (0.5, 0.0).
        let remap = Mat4::new_translation(&Vec3::new(0.5, 0.0, 0.0));
        v.transform_uv(0, &remap);
        assert_eq!(v.uv(0), Vec2::new(0.75, 0.5));
    }

    #[test]
    fn test_views_alias_same_block() {
        let format = VertexFormat::new(0, 1);
        let mut data = block(format);
        VertexViewMut::new(&mut data, format).set_raw_color(0, 7);
        // A fresh view over the same bytes sees the write.
        assert_eq!(VertexView::new(&data, format).raw_color(0), 7);
    }
}
