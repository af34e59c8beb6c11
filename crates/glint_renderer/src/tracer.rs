//! Recursive Whitted shading.
//!
//! A traced ray finds its nearest hit through the accelerator, then shades
//! it from three independently gated parts:
//! - a mirror ray when the material is reflective,
//! - the direct term of every light,
//! - a refracted ray when the material is transmissive, blended over the
//!   local color by the transmittance.
//!
//! Reflection and refraction share one depth budget, so every ray tree is
//! finite.

use crate::{Accelerator, Hit, Light, ObjectRef, Primitive, Sphere, Surface};
use glint_core::{Color, Material, RenderConfig, EPSILON, MAX_INTERNAL_REFLECTIONS};
use glint_math::{optics, Ray, Vec3};
use rand::RngCore;

/// Scene, lights and settings needed to shade rays.
pub struct Tracer<A: Accelerator> {
    index: A,
    lights: Vec<Light>,
    config: RenderConfig,
}

/// Per-ray bookkeeping carried down the recursion.
#[derive(Debug, Clone, Copy)]
struct Pass {
    depth: u32,
    narrate: bool,
}

impl Pass {
    fn deeper(self) -> Self {
        Self {
            depth: self.depth + 1,
            ..self
        }
    }
}

impl<A: Accelerator> Tracer<A> {
    pub fn new(index: A, lights: Vec<Light>, config: RenderConfig) -> Self {
        Self {
            index,
            lights,
            config,
        }
    }

    pub fn index(&self) -> &A {
        &self.index
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Color seen along `origin -> target`, or `None` when nothing is hit.
    pub fn trace(&self, origin: Vec3, target: Vec3, rng: &mut dyn RngCore) -> Option<Color> {
        self.trace_at_depth(origin, target, 0, rng)
    }

    /// Same as [`Tracer::trace`], narrating every decision at debug level.
    pub fn inspect(&self, origin: Vec3, target: Vec3, rng: &mut dyn RngCore) -> Option<Color> {
        log::debug!("Inspecting ray {} -> {}", origin, target);
        let color = self.cast(
            origin,
            target,
            Pass {
                depth: 0,
                narrate: true,
            },
            rng,
        );
        log::debug!("Inspection result: {:?}", color);
        color
    }

    /// Trace a secondary ray already `depth` bounces deep.
    ///
    /// Past the configured maximum depth this reports a miss without looking
    /// at the scene.
    pub fn trace_at_depth(
        &self,
        origin: Vec3,
        target: Vec3,
        depth: u32,
        rng: &mut dyn RngCore,
    ) -> Option<Color> {
        self.cast(
            origin,
            target,
            Pass {
                depth,
                narrate: false,
            },
            rng,
        )
    }

    fn cast(&self, origin: Vec3, target: Vec3, pass: Pass, rng: &mut dyn RngCore) -> Option<Color> {
        if pass.depth > self.config.max_depth {
            if pass.narrate {
                log::debug!("[depth {}] recursion limit reached", pass.depth);
            }
            return None;
        }

        let ray = Ray::between(origin, target);
        let Some((object, hit)) = self.index.nearest(&ray) else {
            if pass.narrate {
                log::debug!("[depth {}] miss", pass.depth);
            }
            return None;
        };
        let primitive = self.index.objects().owner(object)?;
        if pass.narrate {
            log::debug!(
                "[depth {}] hit {} {:?} at t={} point={} normal={}",
                pass.depth,
                primitive.kind(),
                object,
                hit.t,
                hit.point,
                hit.normal
            );
        }

        Some(self.shade(object, primitive, &hit, &ray, pass, rng))
    }

    fn shade(
        &self,
        object: ObjectRef,
        primitive: &Primitive,
        hit: &Hit,
        ray: &Ray,
        pass: Pass,
        rng: &mut dyn RngCore,
    ) -> Color {
        let (material, normal) = self.surface_detail(object, primitive, hit);
        let view = (-ray.direction).normalize_or_zero();
        let point = hit.point;

        let mut local = Color::ZERO;

        if material.is_reflective() {
            let mirror = optics::reflect(view, normal);
            let reflected = self
                .cast(point + EPSILON * mirror, point + mirror, pass.deeper(), rng)
                .unwrap_or(self.config.background);
            if pass.narrate {
                log::debug!("[depth {}] reflected {}", pass.depth, reflected);
            }
            local += material.reflective * reflected;
        }

        let surface = Surface {
            point,
            normal,
            view,
            material,
        };
        for light in &self.lights {
            let contribution = light.illuminate(&surface, &self.index, rng);
            if pass.narrate {
                log::debug!("[depth {}] light {:?} adds {}", pass.depth, light, contribution);
            }
            local += contribution;
        }

        if !material.is_transmissive() {
            return local;
        }

        let transmitted = match self.exit_ray(object, primitive, hit, ray, &material) {
            Some(out) => self
                .cast(out.origin, out.origin + out.direction, pass.deeper(), rng)
                .unwrap_or(self.config.background),
            None => {
                if pass.narrate {
                    log::debug!("[depth {}] refracted ray lost", pass.depth);
                }
                Color::ZERO
            }
        };
        if pass.narrate {
            log::debug!("[depth {}] transmitted {}", pass.depth, transmitted);
        }

        let kt = material.transmissive;
        local * (Color::ONE - kt) + transmitted * kt
    }

    /// Material and normal after the primitive's texture or bump map.
    fn surface_detail(&self, object: ObjectRef, primitive: &Primitive, hit: &Hit) -> (Material, Vec3) {
        let material = *primitive.material();
        let Some(detail) = primitive.detail() else {
            return (material, hit.normal);
        };

        let uv = match (primitive, object) {
            (Primitive::Sphere(_), _) => Some(Sphere::uv(hit.normal)),
            (Primitive::Mesh(mesh), ObjectRef::MeshTriangle { triangle, .. }) => mesh
                .triangles()
                .get(triangle)
                .and_then(|tri| tri.uv_at(hit.point))
                .map(|uv| (uv.x, uv.y)),
            _ => None,
        };

        match uv {
            Some((u, v)) => detail.apply(material, hit.normal, u, v),
            None => (material, hit.normal),
        }
    }

    /// The ray leaving the far side of a transmissive object.
    ///
    /// Thin surfaces and index-zero materials let the ray continue unbent.
    /// Solids refract in, then look for the exit surface of the whole owning
    /// primitive, reflecting internally while refraction out is impossible.
    /// `None` means the ray never found a way out.
    fn exit_ray(
        &self,
        object: ObjectRef,
        primitive: &Primitive,
        hit: &Hit,
        ray: &Ray,
        material: &Material,
    ) -> Option<Ray> {
        let direction = ray.direction.normalize_or_zero();
        if material.refraction == 0.0 || primitive.is_thin() {
            return Some(Ray::new(hit.point + EPSILON * direction, direction));
        }

        let eta = material.refraction;
        let mut inner = optics::refract(direction, hit.normal, eta)?;
        let mut point = hit.point;

        for _ in 0..MAX_INTERNAL_REFLECTIONS {
            let probe = Ray::new(point + EPSILON * inner, inner);
            let exit = self.index.objects().intersect_owner(object, &probe, true)?;
            point = exit.point;
            match optics::refract(inner, exit.normal, eta) {
                Some(out) => return Some(Ray::new(point + EPSILON * out, out)),
                None => inner = optics::reflect(-inner, exit.normal),
            }
        }

        log::debug!("Refracted ray lost after {} internal reflections", MAX_INTERNAL_REFLECTIONS);
        None
    }
}
