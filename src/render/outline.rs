use nalgebra::{Matrix4, Point3};

/// How much bigger the outline silhouette is than the body it surrounds.
pub const OUTLINE_SCALE: f32 = 1.025;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StencilFunc {
    Always,
    NotEqual,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shading {
    /// The regular lit material
    Lit,
    /// A single flat color, no lighting
    Flat(Point3<f32>),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outline {
    pub color: Point3<f32>,
    pub scale: f32,
}

impl Outline {
    pub fn new(color: Point3<f32>) -> Self {
        Outline {
            color,
            scale: OUTLINE_SCALE,
        }
    }
}

/// The slice of GL state the outline protocol needs. Stencil ops are assumed
/// to be KEEP, KEEP, REPLACE, so a passing fragment writes the reference
/// value (through the write mask).
pub trait StencilTarget {
    type Mesh: ?Sized;

    /// Sets the test. The comparison mask is always 0xFF.
    fn stencil_func(&mut self, func: StencilFunc, reference: u8);
    fn stencil_mask(&mut self, mask: u8);
    fn clear_stencil(&mut self);
    fn draw(&mut self, mesh: &Self::Mesh, model: &Matrix4<f32>, shading: Shading);
}

/// Draws a mesh, optionally with a colored silhouette around it.
///
/// With an outline, the mesh is drawn once while tagging the stencil buffer,
/// then again slightly enlarged and flat-colored wherever the tag is missing.
/// The stencil buffer is left cleared for the next object.
pub fn draw_outlined<T: StencilTarget>(
    target: &mut T,
    mesh: &T::Mesh,
    model: &Matrix4<f32>,
    outline: Option<&Outline>,
) {
    let outline = match outline {
        Some(outline) => outline,
        None => {
            target.stencil_mask(0x00);
            target.draw(mesh, model, Shading::Lit);
            return;
        }
    };

    target.stencil_func(StencilFunc::Always, 1);
    target.stencil_mask(0xFF);
    target.draw(mesh, model, Shading::Lit);

    target.stencil_func(StencilFunc::NotEqual, 1);
    target.stencil_mask(0x00);
    let enlarged = model * Matrix4::new_scaling(outline.scale);
    target.draw(mesh, &enlarged, Shading::Flat(outline.color));

    target.stencil_func(StencilFunc::Always, 0);
    target.stencil_mask(0xFF);
    target.clear_stencil();
}

#[derive(Debug, Clone, PartialEq)]
pub enum GlCommand {
    StencilFunc { func: StencilFunc, reference: u8 },
    StencilMask(u8),
    ClearStencil,
    Draw { model: Matrix4<f32>, shading: Shading },
}

/// Records commands instead of executing them. Meshes are ignored; only the
/// transforms and shading are kept.
#[derive(Debug, Default, Clone)]
pub struct CommandList {
    pub commands: Vec<GlCommand>,
}

impl CommandList {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StencilTarget for CommandList {
    type Mesh = ();

    fn stencil_func(&mut self, func: StencilFunc, reference: u8) {
        self.commands.push(GlCommand::StencilFunc { func, reference });
    }

    fn stencil_mask(&mut self, mask: u8) {
        self.commands.push(GlCommand::StencilMask(mask));
    }

    fn clear_stencil(&mut self) {
        self.commands.push(GlCommand::ClearStencil);
    }

    fn draw(&mut self, _mesh: &(), model: &Matrix4<f32>, shading: Shading) {
        self.commands.push(GlCommand::Draw {
            model: *model,
            shading,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn orange() -> Point3<f32> {
        Point3::new(1.0, 0.5, 0.0)
    }

    #[test]
    fn test_outline_command_sequence() {
        let model = Matrix4::new_translation(&Vector3::new(1.0, 2.0, 3.0));
        let mut list = CommandList::new();
        draw_outlined(&mut list, &(), &model, Some(&Outline::new(orange())));

        let enlarged = model * Matrix4::new_scaling(1.025);
        let expected = vec![
            GlCommand::StencilFunc {
                func: StencilFunc::Always,
                reference: 1,
            },
            GlCommand::StencilMask(0xFF),
            GlCommand::Draw {
                model,
                shading: Shading::Lit,
            },
            GlCommand::StencilFunc {
                func: StencilFunc::NotEqual,
                reference: 1,
            },
            GlCommand::StencilMask(0x00),
            GlCommand::Draw {
                model: enlarged,
                shading: Shading::Flat(orange()),
            },
            GlCommand::StencilFunc {
                func: StencilFunc::Always,
                reference: 0,
            },
            GlCommand::StencilMask(0xFF),
            GlCommand::ClearStencil,
        ];
        assert_eq!(list.commands, expected);

        // The enlargement happens in model space, so the translation is kept
        if let GlCommand::Draw { model: m, .. } = &list.commands[5] {
            assert_relative_eq!(m[(0, 0)], 1.025);
            assert_relative_eq!(m[(0, 3)], 1.0);
        }
    }

    #[test]
    fn test_no_outline() {
        let mut list = CommandList::new();
        draw_outlined(&mut list, &(), &Matrix4::identity(), None);
        assert_eq!(
            list.commands,
            vec![
                GlCommand::StencilMask(0x00),
                GlCommand::Draw {
                    model: Matrix4::identity(),
                    shading: Shading::Lit,
                },
            ]
        );
    }

    /// A one-dimensional framebuffer: a mesh of radius r covers the pixels
    /// whose index is below r times the model's x scale.
    struct Strip {
        color: Vec<Option<Shading>>,
        stencil: Vec<u8>,
        func: StencilFunc,
        reference: u8,
        mask: u8,
    }

    impl Strip {
        fn new(len: usize) -> Self {
            Strip {
                color: vec![None; len],
                stencil: vec![0; len],
                func: StencilFunc::Always,
                reference: 0,
                mask: 0xFF,
            }
        }
    }

    impl StencilTarget for Strip {
        type Mesh = f32;

        fn stencil_func(&mut self, func: StencilFunc, reference: u8) {
            self.func = func;
            self.reference = reference;
        }

        fn stencil_mask(&mut self, mask: u8) {
            self.mask = mask;
        }

        fn clear_stencil(&mut self) {
            for s in self.stencil.iter_mut() {
                *s = 0;
            }
        }

        fn draw(&mut self, radius: &f32, model: &Matrix4<f32>, shading: Shading) {
            let extent = radius * model[(0, 0)];
            for i in 0..self.color.len() {
                if i as f32 >= extent {
                    continue;
                }
                let passes = match self.func {
                    StencilFunc::Always => true,
                    StencilFunc::NotEqual => self.stencil[i] != self.reference,
                };
                if passes {
                    self.color[i] = Some(shading);
                    self.stencil[i] = (self.stencil[i] & !self.mask) | (self.reference & self.mask);
                }
            }
        }
    }

    #[test]
    fn test_outline_only_covers_the_fringe() {
        let mut strip = Strip::new(250);
        let outline = Outline::new(orange());
        draw_outlined(&mut strip, &200.0, &Matrix4::identity(), Some(&outline));

        // Body is lit, the 2.5% fringe gets the outline, beyond is untouched
        assert!(strip.color[..200].iter().all(|c| *c == Some(Shading::Lit)));
        assert!(strip.color[200..205]
            .iter()
            .all(|c| *c == Some(Shading::Flat(orange()))));
        assert!(strip.color[205..].iter().all(|c| c.is_none()));
        assert!(strip.stencil.iter().all(|&s| s == 0));

        // A second body drawn afterwards isn't masked by the first one's tag
        draw_outlined(&mut strip, &100.0, &Matrix4::identity(), None);
        assert!(strip.color[..100].iter().all(|c| *c == Some(Shading::Lit)));
    }
}
