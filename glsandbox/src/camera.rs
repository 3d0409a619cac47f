use std::f32::consts::{PI, TAU};

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Vector3};

///
/// Virtual camera orbiting by a horizontal angle theta and a vertical
/// angle phi. `view_matrix` looks along the camera's forward vector from
/// its position, `view_matrix_focus` looks at a focus point from a given
/// distance along the same orientation.
///
#[derive(Clone)]
pub struct OrbitCamera {
    theta: f32,
    phi: f32,
    position: Vector3<f32>,
    up: Vector3<f32>,
    right: Vector3<f32>,
    forward: Vector3<f32>,
}

impl OrbitCamera {
    pub fn new() -> Self {
        let mut camera = Self {
            theta: 0.0,
            phi: 0.0,
            position: Vector3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            right: Vector3::unit_x(),
            forward: -Vector3::unit_z(),
        };
        camera.update_vectors();

        camera
    }

    pub fn rotate_left(&mut self, t: f32) {
        self.theta = (self.theta - t).rem_euclid(TAU);
        self.update_vectors();
    }

    pub fn rotate_right(&mut self, t: f32) {
        self.theta = (self.theta + t).rem_euclid(TAU);
        self.update_vectors();
    }

    pub fn rotate_up(&mut self, t: f32) {
        if self.phi < PI {
            self.phi += t;
        }
        self.update_vectors();
    }

    pub fn rotate_down(&mut self, t: f32) {
        if self.phi > -PI {
            self.phi -= t;
        }
        self.update_vectors();
    }

    pub fn set_horizontal_angle(&mut self, t: f32) {
        self.theta = t.rem_euclid(TAU);
        self.update_vectors();
    }

    pub fn set_vertical_angle(&mut self, t: f32) {
        let sign = if t < 0.0 { -1.0 } else { 1.0 };
        self.phi = t.abs().rem_euclid(PI) * sign;
        self.update_vectors();
    }

    pub fn set_position(&mut self, p: Vector3<f32>) {
        self.position = p;
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.forward
    }

    pub fn right(&self) -> Vector3<f32> {
        self.right
    }

    pub fn up(&self) -> Vector3<f32> {
        self.up
    }

    pub fn position(&self) -> Vector3<f32> {
        self.position
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(self.position),
            Point3::from_vec(self.position + self.forward),
            self.up,
        )
    }

    pub fn view_matrix_focus(&self, radius: f32, focus: Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(
            Point3::from_vec(focus + self.forward * radius),
            Point3::from_vec(focus),
            self.up,
        )
    }

    fn update_vectors(&mut self) {
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let (sin_phi, cos_phi) = self.phi.sin_cos();

        self.forward = Vector3::new(cos_phi * sin_theta, sin_phi, -cos_phi * cos_theta);
        self.right = Vector3::new(cos_theta, 0.0, sin_theta);
        self.up = self.right.cross(self.forward);
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
        assert!(
            (a - b).magnitude() < 1e-5,
            "expected {:?}, got {:?}",
            b,
            a
        );
    }

    #[test]
    fn default_vectors() {
        let camera = OrbitCamera::new();

        assert_close(camera.forward(), -Vector3::unit_z());
        assert_close(camera.right(), Vector3::unit_x());
        assert_close(camera.up(), Vector3::unit_y());
    }

    #[test]
    fn vectors_stay_orthonormal() {
        let mut camera = OrbitCamera::new();
        camera.rotate_right(1.3);
        camera.rotate_up(0.7);

        assert!((camera.forward().magnitude() - 1.0).abs() < 1e-5);
        assert!((camera.right().magnitude() - 1.0).abs() < 1e-5);
        assert!(camera.forward().dot(camera.right()).abs() < 1e-5);
        assert!(camera.forward().dot(camera.up()).abs() < 1e-5);
    }

    #[test]
    fn horizontal_angle_wraps() {
        let mut camera = OrbitCamera::new();
        camera.set_horizontal_angle(TAU + 1.0);

        let mut reference = OrbitCamera::new();
        reference.set_horizontal_angle(1.0);

        assert_close(camera.forward(), reference.forward());
    }

    #[test]
    fn quarter_turn_right_faces_east() {
        let mut camera = OrbitCamera::new();
        camera.rotate_right(PI / 2.0);

        assert_close(camera.forward(), Vector3::unit_x());
    }

    #[test]
    fn focus_view_places_focus_down_the_view_axis() {
        let camera = OrbitCamera::new();
        let view = camera.view_matrix_focus(4.0, Vector3::new(0.0, 0.0, 0.0));

        let focus = view * cgmath::Vector4::new(0.0, 0.0, 0.0, 1.0);
        assert!((focus.x).abs() < 1e-5);
        assert!((focus.y).abs() < 1e-5);
        assert!((focus.z + 4.0).abs() < 1e-5);
    }
}
