use std::collections::VecDeque;

use nalgebra::Point3;

use crate::error::{Error, Result};

mod body;

pub use body::{Body, BodyID, BodyInfo, BodyPose, Motion};

/// A flat arena of bodies, each optionally orbiting another one.
///
/// Parents are referred to by ID, and the order in which bodies get updated
/// is computed up front so that every parent is moved before its children.
#[derive(Debug, Clone)]
pub struct Orrery {
    bodies: Vec<Body>,
    // Invariant: every parent appears before all of its children
    update_order: Vec<BodyID>,
    frame: u64,
    clockwise: bool,
}

impl Orrery {
    pub fn new(clockwise: bool) -> Self {
        Orrery {
            bodies: vec![],
            update_order: vec![],
            frame: 0,
            clockwise,
        }
    }

    pub fn is_clockwise(&self) -> bool {
        self.clockwise
    }

    pub fn set_clockwise(&mut self, clockwise: bool) {
        self.clockwise = clockwise;
    }

    pub fn add_fixed_body(&mut self, info: BodyInfo) -> BodyID {
        self.add_root_body(info, Motion::fixed())
    }

    /// A body with no parent. It still moves, circling the world origin.
    pub fn add_root_body(&mut self, info: BodyInfo, motion: Motion) -> BodyID {
        self.insert_new_body(info, motion, None)
    }

    pub fn add_body(&mut self, info: BodyInfo, motion: Motion, parent_id: BodyID) -> BodyID {
        // A parent that exists already can't be our descendant, so no cycle check
        assert!(parent_id.0 < self.bodies.len(), "No body {:?}", parent_id);
        self.insert_new_body(info, motion, Some(parent_id))
    }

    fn insert_new_body(&mut self, info: BodyInfo, motion: Motion, parent: Option<BodyID>) -> BodyID {
        let id = BodyID(self.bodies.len());
        self.bodies.push(Body {
            id,
            info,
            motion,
            parent,
            pose: BodyPose::identity(),
            last_frame: None,
        });
        self.update_order = self.compute_update_order();
        id
    }

    /// Re-links `child` to orbit `parent` (or nothing). Refuses links that
    /// would make a body its own ancestor.
    pub fn set_parent(&mut self, child: BodyID, parent: Option<BodyID>) -> Result<()> {
        if let Some(parent) = parent {
            let mut ancestor = Some(parent);
            while let Some(id) = ancestor {
                if id == child {
                    return Err(Error::ParentCycle { child, parent });
                }
                ancestor = self.bodies[id.0].parent;
            }
        }

        self.bodies[child.0].parent = parent;
        self.update_order = self.compute_update_order();
        log::debug!("New update order: {:?}", self.update_order);
        Ok(())
    }

    // Breadth-first from the roots, so bodies come out grouped by generation.
    fn compute_update_order(&self) -> Vec<BodyID> {
        let mut children = vec![vec![]; self.bodies.len()];
        let mut queue = VecDeque::new();
        for body in self.bodies.iter() {
            match body.parent {
                Some(parent) => children[parent.0].push(body.id),
                None => queue.push_back(body.id),
            }
        }

        let mut order = Vec::with_capacity(self.bodies.len());
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(children[id.0].iter().copied());
        }
        debug_assert_eq!(order.len(), self.bodies.len());
        order
    }

    pub fn update_order(&self) -> &[BodyID] {
        &self.update_order
    }

    /// How many parents separate this body from a root.
    pub fn generation(&self, id: BodyID) -> usize {
        let mut depth = 0;
        let mut current = self.bodies[id.0].parent;
        while let Some(parent) = current {
            depth += 1;
            current = self.bodies[parent.0].parent;
        }
        depth
    }

    pub fn get_parent(&self, id: BodyID) -> Option<BodyID> {
        self.bodies[id.0].parent
    }

    pub fn get_body(&self, id: BodyID) -> &Body {
        &self.bodies[id.0]
    }

    pub fn get_body_mut(&mut self, id: BodyID) -> &mut Body {
        &mut self.bodies[id.0]
    }

    pub fn bodies(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter()
    }

    pub fn num_bodies(&self) -> usize {
        self.bodies.len()
    }

    pub fn find_body(&self, name: &str) -> Option<BodyID> {
        self.bodies
            .iter()
            .find(|b| b.info.name.eq_ignore_ascii_case(name))
            .map(|b| b.id)
    }

    /// Bodies that act as point lights, in ID order.
    pub fn light_sources(&self) -> impl Iterator<Item = &Body> + '_ {
        self.bodies.iter().filter(|b| b.info.emits_light)
    }

    pub fn signed_time(&self, time: f32) -> f32 {
        if self.clockwise {
            -time
        } else {
            time
        }
    }

    /// Starts a new frame. Bodies updated before this are considered stale.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
    }

    /// Moves a single body to where it is at `time`, reading its parent's
    /// position from the current frame. Fails if the parent hasn't been
    /// updated yet this frame.
    pub fn update_body(&mut self, id: BodyID, time: f32) -> Result<BodyPose> {
        let center = match self.bodies[id.0].parent {
            None => Point3::origin(),
            Some(parent) => {
                let parent_body = &self.bodies[parent.0];
                if parent_body.last_frame != Some(self.frame) {
                    return Err(Error::StaleParent { child: id, parent });
                }
                parent_body.position()
            }
        };

        let signed_time = self.signed_time(time);
        let body = &mut self.bodies[id.0];
        body.pose = body.motion.pose(&center, signed_time, body.info.scale);
        body.last_frame = Some(self.frame);
        Ok(body.pose)
    }

    /// Moves every body to where it is at `time`, parents first.
    pub fn update(&mut self, time: f32) -> Result<()> {
        self.begin_frame();
        for idx in 0..self.update_order.len() {
            let id = self.update_order[idx];
            self.update_body(id, time)?;
        }
        Ok(())
    }

    pub fn pose(&self, id: BodyID) -> BodyPose {
        self.bodies[id.0].pose
    }

    pub fn position(&self, id: BodyID) -> Point3<f32> {
        self.bodies[id.0].position()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use nalgebra::{Matrix4, Vector3};

    use crate::math::geometry::perpendicular_vector;

    fn info(name: &str) -> BodyInfo {
        BodyInfo::new(name, Point3::new(1.0, 1.0, 1.0), 1.0)
    }

    // A -> B -> C, all orbiting at different rates
    fn three_generations() -> (Orrery, BodyID, BodyID, BodyID) {
        let mut orrery = Orrery::new(false);
        let root = orrery.add_fixed_body(info("Root"));
        let a = orrery.add_body(info("A"), Motion::circular(10.0, 0.5, 0.0), root);
        let b = orrery.add_body(info("B"), Motion::circular(3.0, 1.5, 0.2), a);
        let c = orrery.add_body(info("C"), Motion::circular(1.0, -2.0, 1.0), b);
        (orrery, a, b, c)
    }

    #[test]
    fn test_zero_radius_tracks_parent() {
        let mut orrery = Orrery::new(true);
        let root = orrery.add_fixed_body(info("Root"));
        let planet = orrery.add_body(info("Planet"), Motion::circular(5.0, 1.0, 0.3), root);
        let moon = orrery.add_body(info("Moon"), Motion::circular(0.0, 3.0, 2.0), planet);

        for i in 0..20 {
            let t = i as f32 * 0.37;
            orrery.update(t).unwrap();
            assert_relative_eq!(orrery.position(moon), orrery.position(planet), epsilon = 1e-5);
        }
    }

    #[test]
    fn test_zero_speed_is_constant() {
        let mut orrery = Orrery::new(false);
        let root = orrery.add_fixed_body(info("Root"));
        let still = orrery.add_body(info("Still"), Motion::circular(7.0, 0.0, 4.0), root);

        orrery.update(0.0).unwrap();
        let start = orrery.position(still);
        assert_relative_eq!((start - Point3::origin()).norm(), 7.0, epsilon = 1e-5);
        for i in 1..20 {
            orrery.update(i as f32 * 1.3).unwrap();
            assert_relative_eq!(orrery.position(still), start, epsilon = 1e-5);
        }
    }

    #[test]
    fn test_hierarchy_composes() {
        let (mut orrery, a, b, c) = three_generations();
        for i in 0..10 {
            let t = i as f32 * 0.25;
            orrery.update(t).unwrap();

            let pa = orrery.position(a);
            let pb = orrery.position(b);
            let pc = orrery.position(c);

            // Each body stays on its circle around its parent's current position
            assert_relative_eq!((pa - Point3::origin()).norm(), 10.0, epsilon = 1e-4);
            assert_relative_eq!((pb - pa).norm(), 3.0, epsilon = 1e-4);
            assert_relative_eq!((pc - pb).norm(), 1.0, epsilon = 1e-4);
        }
    }

    #[test]
    fn test_update_order_is_enforced() {
        let (mut orrery, a, b, c) = three_generations();
        orrery.update(1.0).unwrap();

        orrery.begin_frame();
        orrery.update_body(BodyID(0), 2.0).unwrap();
        orrery.update_body(a, 2.0).unwrap();
        match orrery.update_body(c, 2.0) {
            Err(Error::StaleParent { child, parent }) => {
                assert_eq!(child, c);
                assert_eq!(parent, b);
            }
            other => panic!("Expected a stale parent error, got {:?}", other),
        }

        // Doing it in the right order works, and matches a full update
        orrery.update_body(b, 2.0).unwrap();
        orrery.update_body(c, 2.0).unwrap();
        let pc = orrery.position(c);

        let (mut fresh, _, _, c2) = three_generations();
        fresh.update(2.0).unwrap();
        assert_relative_eq!(pc, fresh.position(c2), epsilon = 1e-5);
    }

    #[test]
    fn test_child_depends_on_every_ancestor() {
        let (mut orrery, a, b, c) = three_generations();
        orrery.update(1.0).unwrap();
        let before = orrery.position(c);

        // Slowing down either ancestor must move C
        orrery.get_body_mut(a).motion.orbit_speed = 0.0;
        orrery.update(1.0).unwrap();
        let without_a = orrery.position(c);
        assert!((without_a - before).norm() > 1e-2);

        orrery.get_body_mut(b).motion.orbit_speed = 0.0;
        orrery.update(1.0).unwrap();
        assert!((orrery.position(c) - without_a).norm() > 1e-2);
    }

    #[test]
    fn test_model_matrix_matches_step_by_step_composition() {
        let mut orrery = Orrery::new(true);
        let root = orrery.add_fixed_body(info("Root"));
        let motion = Motion {
            orbit_radius: 2.5,
            orbit_speed: 0.8,
            orbit_axis: nalgebra::Unit::new_normalize(Vector3::new(-1.0, 4.0, 1.0)),
            spin_speed: 0.5,
            spin_axis: nalgebra::Unit::new_normalize(Vector3::new(1.0, 4.0, 1.0)),
        };
        let mut body_info = info("Tilted");
        body_info.scale = 0.35;
        let id = orrery.add_body(body_info, motion.clone(), root);

        let time = 3.0;
        orrery.update(time).unwrap();

        let t = -time;
        let expected = Matrix4::from_axis_angle(&motion.orbit_axis, motion.orbit_speed * t)
            * Matrix4::new_translation(
                &(perpendicular_vector(&motion.orbit_axis).into_inner() * motion.orbit_radius),
            )
            * Matrix4::from_axis_angle(&motion.spin_axis, motion.spin_speed * t)
            * Matrix4::new_scaling(0.35);
        assert_relative_eq!(orrery.pose(id).model_matrix(), expected, epsilon = 1e-5);
    }

    #[test]
    fn test_clockwise_flips_direction() {
        let build = |clockwise| {
            let mut orrery = Orrery::new(clockwise);
            let root = orrery.add_fixed_body(info("Root"));
            let id = orrery.add_body(info("P"), Motion::circular(4.0, 1.0, 0.0), root);
            orrery.update(0.5).unwrap();
            orrery.position(id)
        };
        let ccw = build(false);
        let cw = build(true);
        let axis = Vector3::y();

        // Same circle, but mirrored around the starting point
        let start = perpendicular_vector(&Vector3::y_axis()).into_inner() * 4.0;
        assert_relative_eq!(ccw.coords.dot(&axis), cw.coords.dot(&axis), epsilon = 1e-5);
        assert_relative_eq!(ccw.coords.dot(&start), cw.coords.dot(&start), epsilon = 1e-4);
        assert!((ccw - cw).norm() > 1.0);
    }

    #[test]
    fn test_reparenting() {
        let mut orrery = Orrery::new(false);
        let sun = orrery.add_fixed_body(info("Sun"));
        let companion = orrery.add_body(info("Companion"), Motion::circular(2.5, 1.0, 0.0), sun);
        let planet = orrery.add_body(info("Planet"), Motion::circular(28.0, 0.2, 0.0), sun);

        // The companion star moves over to the outer planet
        orrery.set_parent(companion, Some(planet)).unwrap();
        assert_eq!(orrery.update_order(), &[sun, planet, companion]);
        assert_eq!(orrery.generation(companion), 2);

        orrery.update(4.0).unwrap();
        assert_relative_eq!(
            (orrery.position(companion) - orrery.position(planet)).norm(),
            2.5,
            epsilon = 1e-4
        );

        // But the planet can't then orbit the companion
        assert!(matches!(
            orrery.set_parent(planet, Some(companion)),
            Err(Error::ParentCycle { .. })
        ));
        assert!(matches!(
            orrery.set_parent(planet, Some(planet)),
            Err(Error::ParentCycle { .. })
        ));
        assert_eq!(orrery.get_parent(planet), Some(sun));
    }
}
