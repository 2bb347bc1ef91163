//! Fixed-function state a material draws with.
//!
//! [`PipelineState`] is a plain value. [`PipelineState::effects`] turns it into the
//! exact list of state changes it stands for, and [`PipelineState::apply`] replays
//! that list on a context. Nothing is cached between applications, so the result of
//! `apply` never depends on what was applied before.

use glam::{BVec4, Vec4};
use serde::{Deserialize, Serialize};

use crate::gfx::{
    BlendEquation, BlendFactor, Capability, CompareFunction, Face, GraphicsContext, Winding,
};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FaceCulling {
    pub enabled: bool,
    pub culled_face: Face,
    pub front_face: Winding,
}

impl Default for FaceCulling {
    fn default() -> Self {
        Self {
            enabled: false,
            culled_face: Face::Back,
            front_face: Winding::Ccw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DepthTesting {
    pub enabled: bool,
    pub function: CompareFunction,
}

impl Default for DepthTesting {
    fn default() -> Self {
        Self {
            enabled: false,
            function: CompareFunction::LessEqual,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Blending {
    pub enabled: bool,
    pub equation: BlendEquation,
    pub source_factor: BlendFactor,
    pub destination_factor: BlendFactor,
    pub constant_color: Vec4,
}

impl Default for Blending {
    fn default() -> Self {
        Self {
            enabled: false,
            equation: BlendEquation::Add,
            source_factor: BlendFactor::SrcAlpha,
            destination_factor: BlendFactor::OneMinusSrcAlpha,
            constant_color: Vec4::ZERO,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PipelineState {
    pub face_culling: FaceCulling,
    pub depth_testing: DepthTesting,
    pub blending: Blending,
    pub color_mask: BVec4,
    pub depth_mask: bool,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            face_culling: FaceCulling::default(),
            depth_testing: DepthTesting::default(),
            blending: Blending::default(),
            color_mask: BVec4::TRUE,
            depth_mask: true,
        }
    }
}

/// A single fixed-function state change.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StateEffect {
    ColorMask(BVec4),
    DepthMask(bool),
    Toggle(Capability, bool),
    CullFace(Face),
    FrontFace(Winding),
    DepthFunc(CompareFunction),
    BlendEquation(BlendEquation),
    BlendFunc(BlendFactor, BlendFactor),
    BlendColor(Vec4),
}

impl StateEffect {
    pub fn apply(self, gl: &mut dyn GraphicsContext) {
        match self {
            StateEffect::ColorMask(mask) => gl.color_mask(mask),
            StateEffect::DepthMask(enabled) => gl.depth_mask(enabled),
            StateEffect::Toggle(capability, enabled) => gl.set_capability(capability, enabled),
            StateEffect::CullFace(face) => gl.cull_face(face),
            StateEffect::FrontFace(winding) => gl.front_face(winding),
            StateEffect::DepthFunc(function) => gl.depth_func(function),
            StateEffect::BlendEquation(equation) => gl.blend_equation(equation),
            StateEffect::BlendFunc(source, destination) => gl.blend_func(source, destination),
            StateEffect::BlendColor(color) => gl.blend_color(color),
        }
    }
}

impl PipelineState {
    pub fn effects(&self) -> Vec<StateEffect> {
        let mut effects = vec![
            StateEffect::ColorMask(self.color_mask),
            StateEffect::DepthMask(self.depth_mask),
        ];

        let culling = &self.face_culling;
        effects.push(StateEffect::Toggle(Capability::CullFace, culling.enabled));
        if culling.enabled {
            effects.push(StateEffect::CullFace(culling.culled_face));
            effects.push(StateEffect::FrontFace(culling.front_face));
        }

        let depth = &self.depth_testing;
        effects.push(StateEffect::Toggle(Capability::DepthTest, depth.enabled));
        if depth.enabled {
            effects.push(StateEffect::DepthFunc(depth.function));
        }

        let blending = &self.blending;
        effects.push(StateEffect::Toggle(Capability::Blend, blending.enabled));
        if blending.enabled {
            effects.push(StateEffect::BlendEquation(blending.equation));
            effects.push(StateEffect::BlendFunc(
                blending.source_factor,
                blending.destination_factor,
            ));
            effects.push(StateEffect::BlendColor(blending.constant_color));
        }

        effects
    }

    pub fn apply(&self, gl: &mut dyn GraphicsContext) {
        for effect in self.effects() {
            effect.apply(gl);
        }
    }
}
