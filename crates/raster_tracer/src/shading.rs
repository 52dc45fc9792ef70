//! Phong shading of a single primary ray.

use raster_math::EPSILON;

use crate::{Color, PointLight, Ray, RayIntersection, Scene};

/// Ambient term added to every hit, per channel.
pub const AMBIENT: f64 = 15.0;

/// Largest value a channel can reach.
pub const MAX_CHANNEL: f64 = 255.0;

/// Compute the RGB value seen along `ray`.
///
/// Black when nothing is hit; otherwise ambient plus the diffuse and
/// specular contribution of every light that is not occluded. Channels are
/// clamped to [`MAX_CHANNEL`] after each light.
pub fn trace(scene: &Scene, ray: &Ray) -> [u16; 3] {
    let Some(hit) = scene.find_closest_intersection(ray) else {
        return [0, 0, 0];
    };

    let to_eye = (ray.origin() - hit.point).normalize();
    let mut rgb = Color::splat(AMBIENT);

    for light in scene.lights() {
        if is_shadowed(scene, light, &hit) {
            continue;
        }
        rgb = (rgb + light_contribution(light, &hit, to_eye)).min(Color::splat(MAX_CHANNEL));
    }

    [rgb.x as u16, rgb.y as u16, rgb.z as u16]
}

/// Whether another surface sits between `light` and the hit point.
fn is_shadowed(scene: &Scene, light: &PointLight, hit: &RayIntersection) -> bool {
    let shadow_ray = Ray::from_points(light.position, hit.point);
    let light_distance = (hit.point - light.position).length();

    scene
        .find_closest_intersection(&shadow_ray)
        .is_some_and(|occluder| occluder.distance < light_distance - EPSILON)
}

fn light_contribution(light: &PointLight, hit: &RayIntersection, to_eye: crate::Vector3) -> Color {
    let to_light = (light.position - hit.point).normalize();
    let normal = hit.normal;
    let material = &hit.material;

    let diffuse = to_light.dot(normal).max(0.0);

    // Reflection of the incoming light direction about the normal
    let reflected = normal * (2.0 * to_light.dot(normal)) - to_light;
    let specular = reflected.dot(to_eye).max(0.0).powf(material.shininess);

    light.intensity * (material.reflective * specular + material.diffuse * diffuse)
}
